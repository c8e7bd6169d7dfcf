//! Per-session identity and question quota.

use uuid::Uuid;

/// Identity and quota bookkeeping for one chat session.
///
/// Only reports whether another question may be asked; callers are
/// responsible for refusing a submit when [`SessionState::can_ask`] is false.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    identity: Option<String>,
    question_count: u32,
    limit: u32,
    active: bool,
}

impl SessionState {
    pub fn new(limit: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity: None,
            question_count: 0,
            limit,
            active: false,
        }
    }

    /// True while the session is active and below its limit.
    pub fn can_ask(&self) -> bool {
        self.active && self.question_count < self.limit
    }

    /// Charges one question at submit time.
    pub fn record_attempt(&mut self) {
        self.question_count += 1;
    }

    /// Reverts the charge of an attempt whose exchange failed.
    pub fn record_failure(&mut self) {
        self.question_count = self.question_count.saturating_sub(1);
    }

    /// Activates the session. The seed count is clamped to the limit.
    pub fn activate(&mut self, identity: impl Into<String>, seed_count: u32) {
        self.identity = Some(identity.into());
        self.question_count = seed_count.min(self.limit);
        self.active = true;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.question_count)
    }

    /// Counter as displayed to the user, e.g. `3/10`.
    pub fn counter_label(&self) -> String {
        format!("{}/{}", self.question_count, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_session_cannot_ask() {
        let session = SessionState::new(10);
        assert!(!session.can_ask());
        assert_eq!(session.identity(), None);
        assert_eq!(session.counter_label(), "0/10");
    }

    #[test]
    fn quota_is_reached_at_limit() {
        let mut session = SessionState::new(2);
        session.activate("E123", 0);
        assert!(session.can_ask());
        session.record_attempt();
        assert!(session.can_ask());
        session.record_attempt();
        assert!(!session.can_ask());
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn failure_is_floored_at_zero() {
        let mut session = SessionState::new(10);
        session.activate("E123", 0);
        session.record_failure();
        assert_eq!(session.question_count(), 0);
    }

    #[test]
    fn seed_is_clamped_to_limit() {
        let mut session = SessionState::new(10);
        session.activate("E123", 14);
        assert_eq!(session.question_count(), 10);
        assert!(!session.can_ask());
    }
}
