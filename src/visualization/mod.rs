// src/visualization/mod.rs

//! Text rendering of measurement counts.

use crate::simulation::Counts;

const BAR: char = '█';

/// Draws `counts` as a horizontal bar chart, one row per outcome in key
/// order. The most frequent outcome gets a bar `width` cells long and the
/// others are scaled against it. Each row ends with the outcome's
/// probability and raw count.
///
/// ```
/// use qteleport::visualization::plot_histogram;
/// use qteleport::Counts;
///
/// let counts: Counts = [("0".to_string(), 3), ("1".to_string(), 1)].into_iter().collect();
/// let chart = plot_histogram(&counts, 12);
/// assert_eq!(chart.lines().next(), Some("0 │████████████ 0.750 (3)"));
/// assert_eq!(chart.lines().nth(1), Some("1 │████         0.250 (1)"));
/// ```
pub fn plot_histogram(counts: &Counts, width: usize) -> String {
    if counts.is_empty() {
        return "(no counts)\n".to_string();
    }
    let label_width = counts.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let max = counts.iter().map(|(_, n)| n).max().unwrap_or(0).max(1);

    let mut out = String::new();
    for (key, n) in counts.iter() {
        let cells = ((n as f64 / max as f64) * width as f64).round() as usize;
        let bar: String = std::iter::repeat_n(BAR, cells).collect();
        out.push_str(&format!(
            "{:<lw$} │{:<bw$} {:.3} ({})\n",
            key,
            bar,
            counts.probability(key),
            n,
            lw = label_width,
            bw = width
        ));
    }
    out
}
