//! Plain-text comparison table.

use std::fmt::Write as _;

use traffic_map_neighborhood::AggregationResult;

/// Renders traffic and transit sums side by side, one row per
/// neighborhood and dataset. Unknown names print as zeros.
#[must_use]
pub fn comparison_table(
    names: &[&str],
    traffic: &AggregationResult,
    transit: &AggregationResult,
) -> String {
    let name_width = names
        .iter()
        .map(|n| n.len())
        .chain(std::iter::once("Neighborhood".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = write!(out, "{:<name_width$}  {:<8}", "Neighborhood", "Dataset");
    for label in &traffic.bucket_labels {
        let _ = write!(out, "  {label:>10}");
    }
    out.push('\n');

    for name in names {
        for (dataset, result) in [("traffic", traffic), ("transit", transit)] {
            let _ = write!(out, "{name:<name_width$}  {dataset:<8}");
            for sum in result.sums_or_zero(name) {
                let _ = write!(out, "  {sum:>10}");
            }
            out.push('\n');
        }
    }
    out
}
