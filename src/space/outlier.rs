/// Rows whose standardized score has magnitude below this on both axes are kept.
pub const Z_LIMIT: f64 = 3.0;

fn z_scores(values: impl Iterator<Item = f64> + Clone) -> Vec<f64> {
    let finite = values.clone().filter(|v| v.is_finite());
    let n = finite.clone().count() as f64;
    let mean = finite.clone().sum::<f64>() / n;
    let sd = (finite.map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    values
        .map(|v| match v {
            v if !v.is_finite() => f64::NAN,
            v if sd > 0.0 => (v - mean) / sd,
            _ => 0.0,
        })
        .collect()
}

/// Marks the points that lie within [`Z_LIMIT`] standard deviations of the
/// mean on both axes.
///
/// Scores use the population standard deviation over the finite values. An
/// axis without spread scores every point as 0; a non-finite coordinate is
/// always an outlier.
pub fn inliers(coordinates: &[[f64; 2]]) -> Vec<bool> {
    let zx = z_scores(coordinates.iter().map(|p| p[0]));
    let zy = z_scores(coordinates.iter().map(|p| p[1]));
    zx.iter()
        .zip(&zy)
        .map(|(x, y)| x.abs() < Z_LIMIT && y.abs() < Z_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_with_outlier() -> Vec<[f64; 2]> {
        let mut points: Vec<[f64; 2]> = (0..20)
            .map(|i| [f64::from(i % 5), f64::from(i / 5)])
            .collect();
        points.push([100.0, 1.0]);
        points
    }

    #[test]
    fn far_point_is_removed() {
        let mask = inliers(&cloud_with_outlier());
        assert_eq!(mask.len(), 21);
        assert!(!mask[20]);
        assert!(mask[..20].iter().all(|&keep| keep));
    }

    #[test]
    fn flat_axis_keeps_everything() {
        let points = vec![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
        assert!(inliers(&points).into_iter().all(|keep| keep));
    }

    #[test]
    fn non_finite_points_are_outliers() {
        let mut points = cloud_with_outlier();
        points[20] = [f64::NAN, 1.0];
        points.push([2.0, f64::INFINITY]);
        let mask = inliers(&points);
        assert_eq!(mask.len(), 22);
        assert!(!mask[20]);
        assert!(!mask[21]);
        assert!(mask[..20].iter().all(|&keep| keep));
    }

    #[test]
    fn empty_input_gives_empty_mask() {
        assert!(inliers(&[]).is_empty());
    }
}
