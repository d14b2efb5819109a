use serde::{Deserialize, Serialize};

/// Lines cleared per level.
pub const LINES_PER_LEVEL: usize = 10;

/// Game statistics tracking score, level and piece count.
///
/// - **Score**: one point per cleared line, no multi-line bonus
/// - **Level**: `total lines / 10`
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: drops that cleared 0, 1, 2, 3 and 4 lines
///
/// # Example
///
/// ```
/// use stackbot_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert!(!stats.complete_piece_drop(4));
/// assert!(!stats.complete_piece_drop(4));
/// assert!(stats.complete_piece_drop(2)); // reaches level 1
///
/// assert_eq!(stats.score(), 10);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 2);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Total lines cleared.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.score / LINES_PER_LEVEL
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Histogram of drops indexed by the number of lines they cleared.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a locked piece and returns `true` if the level changed.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) -> bool {
        let level = self.level();
        self.completed_pieces += 1;
        self.score += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        self.level() != level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_raw_line_count() {
        let mut stats = GameStats::new();
        for lines in [1, 2, 3, 4, 0] {
            stats.complete_piece_drop(lines);
        }
        assert_eq!(stats.score(), 10);
        assert_eq!(stats.completed_pieces(), 5);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_level_change_reported_once() {
        let mut stats = GameStats::new();
        let changes: Vec<_> = (0..25).map(|_| stats.complete_piece_drop(1)).collect();
        let changed_at: Vec<_> = changes
            .iter()
            .enumerate()
            .filter_map(|(i, changed)| changed.then_some(i))
            .collect();
        assert_eq!(changed_at, [9, 19]);
        assert_eq!(stats.level(), 2);
    }
}
