use crate::answer::Answer;
use crate::clock::Clock;
use crate::exercise::{generate, Mode, NumberSource, Problem};
use crate::session::{Phase, Session, SessionConfig, Snapshot, WrongAnswerPolicy};
use thiserror::Error;

/// Calls made in a state that does not allow them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrillError {
    #[error("no mode selected")]
    NoModeSelected,
    #[error("a mode is already selected, restart first")]
    ModeAlreadySelected,
    #[error("session already reached its target score")]
    AlreadyFinished,
    #[error("the next problem has not been shown yet")]
    AwaitingNextProblem,
    #[error("no problem is waiting to be shown")]
    NothingPending,
}

/// Result of one submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub new_score: u32,
    pub finished: bool,
}

/// Drives one session: problem generation, scoring and termination
#[derive(Debug)]
pub struct Drill<N: NumberSource, C: Clock> {
    config: SessionConfig,
    numbers: N,
    clock: C,
    session: Session,
}

impl<N: NumberSource, C: Clock> Drill<N, C> {
    pub fn new(config: SessionConfig, numbers: N, clock: C) -> Self {
        Self {
            config,
            numbers,
            clock,
            session: Session::default(),
        }
    }

    pub fn select_mode(&mut self, mode: Mode) -> Result<&Problem, DrillError> {
        if self.session.mode.is_some() {
            return Err(DrillError::ModeAlreadySelected);
        }

        self.session = Session {
            mode: Some(mode),
            started_at: Some(self.clock.now_millis()),
            ..Session::default()
        };
        let first = self.next_problem(mode);
        self.session.current = Some(first);

        log::info!(
            "session started: mode {}, target {}, first problem {}",
            mode,
            self.config.target_score,
            first
        );
        self.current().ok_or(DrillError::NoModeSelected)
    }

    pub fn submit_answer(&mut self, raw: impl Into<Answer>) -> Result<Verdict, DrillError> {
        let mode = match self.session.phase() {
            Phase::Idle => return Err(DrillError::NoModeSelected),
            Phase::Finished => return Err(DrillError::AlreadyFinished),
            Phase::Active => self.session.mode.ok_or(DrillError::NoModeSelected)?,
        };
        if self.session.pending.is_some() {
            return Err(DrillError::AwaitingNextProblem);
        }
        let problem = self.session.current.ok_or(DrillError::NoModeSelected)?;

        let answer = raw.into();
        let correct = answer.matches(problem.value());

        self.session.attempts += 1;
        self.session.score = if correct {
            self.session.score + 1
        } else {
            self.session.score.saturating_sub(1)
        };
        if !correct {
            self.session.last_wrong = Some(problem);
        }
        log::debug!(
            "answer {:?} to {} judged {}, score {}",
            answer,
            problem,
            if correct { "correct" } else { "wrong" },
            self.session.score
        );

        let finished = self.session.score >= self.config.target_score;
        if finished {
            self.session.ended_at = Some(self.clock.now_millis());
            log::info!(
                "session finished after {} attempts in {} ms",
                self.session.attempts,
                self.session.elapsed_millis().unwrap_or_default()
            );
        } else {
            let next = self.next_problem(mode);
            match (correct, self.config.wrong_answer) {
                (false, WrongAnswerPolicy::Deferred) => self.session.pending = Some(next),
                _ => self.session.current = Some(next),
            }
        }

        Ok(Verdict {
            correct,
            new_score: self.session.score,
            finished,
        })
    }

    /// Shows the problem staged after a wrong answer
    pub fn advance(&mut self) -> Result<&Problem, DrillError> {
        let next = self.session.pending.take().ok_or(DrillError::NothingPending)?;
        self.session.current = Some(next);
        self.current().ok_or(DrillError::NothingPending)
    }

    pub fn restart(&mut self) {
        if let Some(mode) = self.session.mode {
            log::info!(
                "session restarted: mode {}, score {}, attempts {}",
                mode,
                self.session.score,
                self.session.attempts
            );
        }
        self.session = Session::default();
    }

    fn next_problem(&mut self, mode: Mode) -> Problem {
        let problem = generate(mode, &self.session.history, &mut self.numbers).problem();
        self.session.history.push(problem);
        problem
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.session.mode
    }

    pub fn current(&self) -> Option<&Problem> {
        self.session.current.as_ref()
    }

    pub fn pending(&self) -> Option<&Problem> {
        self.session.pending.as_ref()
    }

    pub fn history(&self) -> &[Problem] {
        &self.session.history
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn attempts(&self) -> u32 {
        self.session.attempts
    }

    pub fn last_wrong(&self) -> Option<&Problem> {
        self.session.last_wrong.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase() == Phase::Finished
    }

    pub fn elapsed_millis(&self) -> Option<u64> {
        self.session.elapsed_millis()
    }

    /// Time since the session started, whether or not it has finished
    pub fn running_millis(&self) -> Option<u64> {
        let start = self.session.started_at?;
        let end = self.session.ended_at.unwrap_or_else(|| self.clock.now_millis());
        Some(end.saturating_sub(start))
    }
}
