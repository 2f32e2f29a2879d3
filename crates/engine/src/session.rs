use chrono::NaiveDateTime;
use serde::Serialize;

/// Cross-analyzer signals for one pipeline pass.
///
/// Owned by the [`crate::Pipeline`] and lent mutably to each analyzer in turn.
/// A fresh context is created per pass and never outlives it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionContext {
    /// Name of the task opened by the most recent start marker
    pub current_task: Option<String>,

    /// Set when a fight opens, cleared by the combat-end marker
    pub in_combat: bool,

    /// Most recent exception type seen; cleared when a fight opens or ends
    pub last_crash_error: Option<String>,

    /// Most recent timestamp seen across all records
    pub last_timestamp: Option<NaiveDateTime>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A crash signal is attributable to the active fight.
    pub fn crash_in_combat(&self) -> bool {
        self.in_combat && self.last_crash_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_empty() {
        let ctx = SessionContext::new();
        assert!(ctx.current_task.is_none());
        assert!(!ctx.in_combat);
        assert!(ctx.last_crash_error.is_none());
        assert!(ctx.last_timestamp.is_none());
    }

    #[test]
    fn test_crash_in_combat_needs_both_signals() {
        let mut ctx = SessionContext::new();
        ctx.last_crash_error = Some("GameStuckError".into());
        assert!(!ctx.crash_in_combat());

        ctx.in_combat = true;
        assert!(ctx.crash_in_combat());

        ctx.last_crash_error = None;
        assert!(!ctx.crash_in_combat());
    }
}
