//! Small geometry helpers shared by the detectors.

/// Euclidean distance between two points
#[must_use]
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Mean of a set of points, `None` when empty
pub fn centroid<I>(points: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut count = 0usize;
    let (mut sx, mut sy) = (0.0, 0.0);
    for (x, y) in points {
        sx += x;
        sy += y;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some((sx / n, sy / n))
}

/// Z component of the cross product `a × b`
///
/// In image coordinates (y grows downward) a positive value means `b` lies
/// clockwise from `a` as seen on screen.
#[must_use]
pub fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Mean and population standard deviation
#[must_use]
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
