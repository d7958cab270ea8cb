use hifz::progress::TimelinePoint;

/// Chart coordinates for a recall timeline: x is the day index, y the
/// average percent.
pub fn timeline_coords(points: &[TimelinePoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.average))
        .collect()
}

/// X (last day index) and Y (highest average rounded up to a multiple of
/// ten) bounds for the timeline chart.
pub fn compute_chart_params(coords: &[(f64, f64)]) -> (f64, f64) {
    let highest = coords.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let last_x = coords.last().map_or(0.0, |&(x, _)| x).max(1.0);
    let top = ((highest / 10.0).ceil() * 10.0).clamp(10.0, 100.0);
    (last_x, top)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
