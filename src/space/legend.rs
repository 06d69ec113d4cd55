use std::collections::BTreeMap;

/// Whole-number percentage, with ties rounded to even.
fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).round_ties_even()
}

/// Formats a fraction as a whole percentage, e.g. `0.426` as `43%`.
pub fn percent_label(fraction: f64) -> String {
    format!("{:.0}%", (fraction * 100.0).round_ties_even())
}

/// Legend label of every cluster, keyed by cluster id.
///
/// Percentages are rounded per cluster; when they add up to less than 100
/// the shortfall goes to cluster 0 (or the lowest id present).
pub fn cluster_labels(clusters: &[usize]) -> BTreeMap<usize, String> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &c in clusters {
        *counts.entry(c).or_default() += 1;
    }

    let mut shares: BTreeMap<usize, f64> = counts
        .iter()
        .map(|(&c, &count)| (c, percent(count, clusters.len())))
        .collect();
    let shortfall = 100.0 - shares.values().sum::<f64>();
    if shortfall > 0.0 {
        if let Some(first) = shares.values_mut().next() {
            *first += shortfall;
        }
    }

    shares
        .into_iter()
        .map(|(c, share)| (c, format!("Cluster {c} - {share:.0}%")))
        .collect()
}

/// Labels for the selected clusters and for everything else.
pub fn selection_labels(clusters: &[usize], selected: &[usize]) -> (String, String) {
    let hits = clusters.iter().filter(|c| selected.contains(c)).count();
    let share = percent(hits, clusters.len());
    let other = if clusters.is_empty() { 0.0 } else { 100.0 - share };
    (
        format!("Selected - {share:.0}%"),
        format!("Other - {other:.0}%"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_format_as_whole_percentages() {
        assert_eq!(percent_label(0.426), "43%");
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(1.0), "100%");
    }

    #[test]
    fn shares_that_sum_to_hundred_are_left_alone() {
        let labels = cluster_labels(&[0, 0, 1, 1]);
        assert_eq!(labels[&0], "Cluster 0 - 50%");
        assert_eq!(labels[&1], "Cluster 1 - 50%");
    }

    #[test]
    fn rounding_shortfall_goes_to_cluster_zero() {
        // 3 x 33% = 99%
        let labels = cluster_labels(&[0, 1, 2]);
        assert_eq!(labels[&0], "Cluster 0 - 34%");
        assert_eq!(labels[&1], "Cluster 1 - 33%");
        assert_eq!(labels[&2], "Cluster 2 - 33%");
    }

    #[test]
    fn rounding_excess_is_not_corrected() {
        // 2/8 = 25%, 3/8 = 37.5% -> 38% twice: 101%
        let labels = cluster_labels(&[0, 0, 1, 1, 1, 2, 2, 2]);
        assert_eq!(labels[&0], "Cluster 0 - 25%");
        assert_eq!(labels[&1], "Cluster 1 - 38%");
    }

    #[test]
    fn selected_and_other_split() {
        let (selected, other) = selection_labels(&[0, 1, 1, 2, 2], &[1]);
        assert_eq!(selected, "Selected - 40%");
        assert_eq!(other, "Other - 60%");
    }

    #[test]
    fn selecting_absent_cluster_is_zero_percent() {
        let (selected, other) = selection_labels(&[0, 0], &[7]);
        assert_eq!(selected, "Selected - 0%");
        assert_eq!(other, "Other - 100%");
    }
}
