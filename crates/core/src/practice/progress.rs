/// Position within the current pass, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the word being asked.
    pub current_position: usize,
    pub total_in_pass: usize,
    /// Words already missed twice in this pass.
    pub missed_count: usize,
}
