//! Placement points table

use serde::{Deserialize, Serialize};

/// Points for ranks 1 through 16; index 0 is unused
pub const DEFAULT_POINTS_TABLE: [u32; 17] = [0, 16, 12, 10, 8, 6, 6, 4, 4, 2, 2, 2, 2, 1, 1, 1, 1];

/// Maps a placement rank to the points it is worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable(Vec<u32>);

impl PointsTable {
    pub fn new(points: Vec<u32>) -> Self {
        Self(points)
    }

    /// Points for `rank`; ranks outside the table are worth nothing
    pub fn points_for(&self, rank: u32) -> u32 {
        usize::try_from(rank)
            .ok()
            .and_then(|index| self.0.get(index))
            .copied()
            .unwrap_or(0)
    }

    /// Highest rank that still scores
    pub fn scoring_ranks(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl Default for PointsTable {
    fn default() -> Self {
        Self(DEFAULT_POINTS_TABLE.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = PointsTable::default();
        assert_eq!(table.points_for(1), 16);
        assert_eq!(table.points_for(3), 10);
        assert_eq!(table.points_for(16), 1);
        assert_eq!(table.scoring_ranks(), 16);
    }

    #[test]
    fn test_unmapped_ranks_score_zero() {
        let table = PointsTable::default();
        assert_eq!(table.points_for(0), 0);
        assert_eq!(table.points_for(17), 0);
        assert_eq!(table.points_for(20), 0);
        assert_eq!(table.points_for(u32::MAX), 0);
    }
}
