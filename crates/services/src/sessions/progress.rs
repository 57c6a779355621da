/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SessionProgress {
    pub total: usize,
    /// 1-based number of the level on screen.
    pub current: usize,
    pub solved: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// `n / total` readout.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} / {}", self.current, self.total)
    }
}
