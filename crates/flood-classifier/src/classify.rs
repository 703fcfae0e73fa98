use flood_common::{ClassificationError, Grid, Severity, SeverityGrid, ThresholdGrid};
use ndarray::Zip;
use tracing::debug;

/// Classify a single discharge value.
///
/// Checks run in a fixed order and the first match wins:
///
/// 1. NaN discharge is missing (`None`)
/// 2. `v >= q20` is [`Severity::Severe`]
/// 3. `v < q2` is [`Severity::None`]
/// 4. `q2 <= v < q5` is [`Severity::Medium`]
/// 5. `q5 <= v < q20` is [`Severity::High`]
///
/// Ties go to the higher band. With well-ordered thresholds exactly one
/// numeric branch matches. With inverted thresholds (e.g. `q5 < q2`) the
/// precedence above decides. A value that matches no branch, which only
/// happens when a threshold is NaN, is [`Severity::None`]: only missing
/// discharge produces a missing cell.
pub fn classify_value(v: f64, q2: f64, q5: f64, q20: f64) -> Option<Severity> {
    if v.is_nan() {
        return None;
    }

    if v >= q20 {
        Some(Severity::Severe)
    } else if v < q2 {
        Some(Severity::None)
    } else if v >= q2 && v < q5 {
        Some(Severity::Medium)
    } else if v >= q5 && v < q20 {
        Some(Severity::High)
    } else {
        Some(Severity::None)
    }
}

/// [`classify_value`] encoded as a stored cell (level or NaN).
#[inline]
pub fn classify_cell(v: f64, q2: f64, q5: f64, q20: f64) -> f32 {
    classify_value(v, q2, q5, q20).map_or(f32::NAN, |s| s.as_cell())
}

/// Classify every cell of `grid` against `thresholds`.
///
/// The threshold fields must have exactly the grid's (lat, lon) shape; they
/// are broadcast along the time axis. Inputs are not modified.
pub fn classify(
    grid: &Grid,
    thresholds: &ThresholdGrid,
) -> Result<SeverityGrid, ClassificationError> {
    let dim = grid.shape();
    let broadcast_error = || ClassificationError::Broadcast {
        grid: grid.spatial_shape(),
        thresholds: thresholds.shape(),
    };

    if thresholds.shape() != grid.spatial_shape() {
        return Err(broadcast_error());
    }

    let q2 = thresholds.q2.broadcast(dim).ok_or_else(broadcast_error)?;
    let q5 = thresholds.q5.broadcast(dim).ok_or_else(broadcast_error)?;
    let q20 = thresholds.q20.broadcast(dim).ok_or_else(broadcast_error)?;

    let levels = Zip::from(grid.values())
        .and(&q2)
        .and(&q5)
        .and(&q20)
        .map_collect(|&v, &q2, &q5, &q20| classify_cell(v, q2, q5, q20));

    debug!(shape = ?dim, "Classified discharge grid");

    Ok(SeverityGrid::new(levels))
}
