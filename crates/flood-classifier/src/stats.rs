use flood_common::{Severity, SeverityGrid};
use serde::Serialize;

/// Cell counts per severity level for one classified grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityStats {
    /// Counts indexed by [`Severity::level`].
    pub counts: [usize; 4],
    /// Cells with missing discharge.
    pub missing: usize,
}

impl SeverityStats {
    pub fn from_grid(grid: &SeverityGrid) -> Self {
        grid.values()
            .iter()
            .fold(Self::default(), |mut stats, &cell| {
                match Severity::from_cell(cell) {
                    Some(severity) => stats.counts[severity.level() as usize] += 1,
                    None => stats.missing += 1,
                }
                stats
            })
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity.level() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.missing
    }

    /// Cells at medium severity or above.
    pub fn flooded(&self) -> usize {
        self.counts[1..].iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_counts_levels_and_missing() {
        let cells = vec![0.0, 1.0, 2.0, 3.0, f32::NAN, 3.0];
        let grid = SeverityGrid::new(Array3::from_shape_vec((1, 2, 3), cells).unwrap());
        let stats = SeverityStats::from_grid(&grid);

        assert_eq!(stats.count(Severity::None), 1);
        assert_eq!(stats.count(Severity::Medium), 1);
        assert_eq!(stats.count(Severity::High), 1);
        assert_eq!(stats.count(Severity::Severe), 2);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.flooded(), 4);
        assert_eq!(stats.total(), 6);
    }
}
