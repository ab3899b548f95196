use crate::exercise::{Mode, Problem};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_SCORE: u32 = 15;

/// When the problem following a wrong answer becomes current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrongAnswerPolicy {
    /// Replace the problem right away
    Immediate,
    /// Stage the next problem until the caller advances
    #[default]
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub target_score: u32,
    pub wrong_answer: WrongAnswerPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            wrong_answer: WrongAnswerPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Finished,
}

/// Mutable state of one play-through. Only `Drill` mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub mode: Option<Mode>,
    pub current: Option<Problem>,
    pub pending: Option<Problem>,
    pub history: Vec<Problem>,
    pub score: u32,
    pub attempts: u32,
    pub started_at: Option<u64>,
    pub ended_at: Option<u64>,
    pub last_wrong: Option<Problem>,
}

impl Session {
    pub fn phase(&self) -> Phase {
        match (self.mode, self.ended_at) {
            (None, _) => Phase::Idle,
            (Some(_), None) => Phase::Active,
            (Some(_), Some(_)) => Phase::Finished,
        }
    }

    pub fn elapsed_millis(&self) -> Option<u64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            current: self.current,
            score: self.score,
            attempts: self.attempts,
            last_wrong: self.last_wrong,
            finished: self.phase() == Phase::Finished,
            elapsed_millis: self.elapsed_millis(),
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub mode: Option<Mode>,
    pub current: Option<Problem>,
    pub score: u32,
    pub attempts: u32,
    pub last_wrong: Option<Problem>,
    pub finished: bool,
    pub elapsed_millis: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Operator;

    #[test]
    fn default_session_is_idle() {
        let session = Session::default();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.elapsed_millis(), None);
        assert!(!session.snapshot().finished);
    }

    #[test]
    fn phase_follows_mode_and_end() {
        let mut session = Session {
            mode: Some(Mode::All),
            current: Some(Problem::new(1, 2, Operator::Add)),
            started_at: Some(1_000),
            ..Default::default()
        };
        assert_eq!(session.phase(), Phase::Active);

        session.ended_at = Some(4_500);
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.elapsed_millis(), Some(3_500));
        assert!(session.snapshot().finished);
    }

    #[test]
    fn policy_serializes_snake_case() {
        let json = serde_json::to_string(&WrongAnswerPolicy::Immediate).unwrap();
        assert_eq!(json, "\"immediate\"");
        assert_eq!(WrongAnswerPolicy::default(), WrongAnswerPolicy::Deferred);
    }
}
