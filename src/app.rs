use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::celebration::Celebration;
use crate::clock::Clock;
use crate::config::Config;
use crate::drill::{Drill, DrillError, Verdict};
use crate::exercise::{Mode, NumberSource, Problem};
use crate::runtime::Countdown;
use crate::session::Phase;

/// Longest answer the input field accepts
const MAX_INPUT_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Results,
}

/// Correction shown after a wrong answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongFeedback {
    pub problem: Problem,
    pub timer: Countdown,
}

/// Presentation state around a [`Drill`]
#[derive(Debug)]
pub struct App<N: NumberSource, C: Clock> {
    pub drill: Drill<N, C>,
    pub config: Config,
    pub input: String,
    pub feedback: Option<WrongFeedback>,
    pub celebration: Celebration,
    pub should_quit: bool,
    size: (u16, u16),
}

impl<N: NumberSource, C: Clock> App<N, C> {
    pub fn new(drill: Drill<N, C>, config: Config) -> Self {
        Self {
            drill,
            config,
            input: String::new(),
            feedback: None,
            celebration: Celebration::new(),
            should_quit: false,
            size: (80, 24),
        }
    }

    pub fn screen(&self) -> Screen {
        match self.drill.phase() {
            Phase::Idle => Screen::Menu,
            Phase::Active => Screen::Playing,
            Phase::Finished => Screen::Results,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    /// Input is closed while the next problem waits behind a correction
    pub fn accepts_input(&self) -> bool {
        self.screen() == Screen::Playing && self.drill.pending().is_none()
    }

    pub fn start(&mut self, mode: Mode) -> Result<(), DrillError> {
        self.drill.select_mode(mode)?;
        self.clear_transients();
        Ok(())
    }

    pub fn restart(&mut self) {
        self.drill.restart();
        self.clear_transients();
    }

    fn clear_transients(&mut self) {
        self.input.clear();
        self.feedback = None;
        self.celebration.stop();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Result<(), DrillError> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match self.screen() {
            Screen::Menu => match key.code {
                KeyCode::Char(c @ '1'..='4') => {
                    let idx = c as usize - '1' as usize;
                    self.start(Mode::ALL[idx])?;
                }
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            Screen::Playing => {
                if !self.accepts_input() {
                    return Ok(());
                }
                match key.code {
                    KeyCode::Esc => self.restart(),
                    KeyCode::Enter => {
                        self.submit()?;
                    }
                    KeyCode::Backspace => {
                        self.input.pop();
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '.' => {
                        if self.input.len() < MAX_INPUT_LEN {
                            self.input.push(c);
                        }
                    }
                    _ => {}
                }
            }
            Screen::Results => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => self.restart(),
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
        }

        Ok(())
    }

    /// Submits whatever is in the input field
    pub fn submit(&mut self) -> Result<Verdict, DrillError> {
        let answer = std::mem::take(&mut self.input);
        let problem = self.drill.current().copied();
        let verdict = self.drill.submit_answer(answer)?;

        let (width, height) = self.size;
        if verdict.finished {
            self.celebration
                .start(width, height, self.config.reward_millis * 2);
        } else if verdict.correct {
            self.feedback = None;
            self.celebration
                .start(width, height, self.config.reward_millis);
        } else if let Some(problem) = problem {
            self.celebration.stop();
            self.feedback = Some(WrongFeedback {
                problem,
                timer: Countdown::new(self.config.feedback_millis),
            });
            if self.config.feedback_millis == 0 {
                self.dismiss_feedback()?;
            }
        }

        Ok(verdict)
    }

    pub fn on_tick(&mut self, elapsed_ms: u64) -> Result<(), DrillError> {
        self.celebration.update(elapsed_ms);

        let expired = self
            .feedback
            .as_mut()
            .map(|feedback| feedback.timer.tick(elapsed_ms))
            .unwrap_or(false);
        if expired {
            self.dismiss_feedback()?;
        }
        Ok(())
    }

    fn dismiss_feedback(&mut self) -> Result<(), DrillError> {
        self.feedback = None;
        if self.drill.pending().is_some() {
            self.drill.advance()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::exercise::{Operator, ScriptedNumbers};
    use crate::session::WrongAnswerPolicy;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_answer<N: NumberSource, C: Clock>(app: &mut App<N, C>, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c))).unwrap();
        }
        app.on_key(key(KeyCode::Enter)).unwrap();
    }

    fn app(config: Config, draws: &[u32]) -> App<ScriptedNumbers, ManualClock> {
        let drill = Drill::new(
            config.session_config(),
            ScriptedNumbers::new(draws.to_vec()),
            ManualClock::new(0),
        );
        App::new(drill, config)
    }

    #[test]
    fn menu_keys_pick_modes() {
        let mut app = app(Config::default(), &[]);
        assert_eq!(app.screen(), Screen::Menu);

        app.on_key(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.screen(), Screen::Playing);
        assert_eq!(app.drill.mode(), Some(Mode::Multiplication));
    }

    #[test]
    fn input_accepts_numbers_only() {
        let mut app = app(Config::default(), &[]);
        app.start(Mode::Multiplication).unwrap();

        for c in "1x2a3".chars() {
            app.on_key(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.input, "123");
        app.on_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.input, "12");
        for _ in 0..10 {
            app.on_key(key(KeyCode::Char('9'))).unwrap();
        }
        assert_eq!(app.input.len(), MAX_INPUT_LEN);
    }

    #[test]
    fn correct_answer_starts_reward() {
        let mut app = app(Config::default(), &[5, 3, 0, 10, 4, 1]);
        app.start(Mode::AdditionSubtraction).unwrap();

        type_answer(&mut app, "8");
        assert!(app.celebration.is_active());
        assert!(app.feedback.is_none());
        assert!(app.input.is_empty());
        assert_eq!(app.drill.score(), 1);
        // reward does not block the next answer
        assert!(app.accepts_input());
    }

    #[test]
    fn wrong_answer_blocks_until_feedback_expires() {
        let config = Config {
            feedback_millis: 300,
            ..Default::default()
        };
        let mut app = app(config, &[5, 3, 0, 10, 4, 1]);
        app.start(Mode::AdditionSubtraction).unwrap();

        type_answer(&mut app, "7");
        let feedback = app.feedback.expect("correction shown");
        assert_eq!(feedback.problem, Problem::new(5, 3, Operator::Add));
        assert!(!app.accepts_input());

        // typing during the correction is ignored
        app.on_key(key(KeyCode::Char('1'))).unwrap();
        assert!(app.input.is_empty());

        app.on_tick(100).unwrap();
        app.on_tick(100).unwrap();
        assert!(app.feedback.is_some());
        app.on_tick(100).unwrap();
        assert!(app.feedback.is_none());
        assert!(app.accepts_input());
        assert_eq!(
            app.drill.current(),
            Some(&Problem::new(10, 4, Operator::Subtract))
        );
    }

    #[test]
    fn immediate_policy_keeps_input_open() {
        let config = Config {
            wrong_answer: WrongAnswerPolicy::Immediate,
            ..Default::default()
        };
        let mut app = app(config, &[5, 3, 0, 10, 4, 1]);
        app.start(Mode::AdditionSubtraction).unwrap();

        type_answer(&mut app, "7");
        assert!(app.feedback.is_some());
        assert!(app.accepts_input());
        assert_eq!(
            app.drill.current(),
            Some(&Problem::new(10, 4, Operator::Subtract))
        );
    }

    #[test]
    fn zero_feedback_advances_at_once() {
        let config = Config {
            feedback_millis: 0,
            ..Default::default()
        };
        let mut app = app(config, &[5, 3, 0, 10, 4, 1]);
        app.start(Mode::AdditionSubtraction).unwrap();

        type_answer(&mut app, "");
        assert!(app.feedback.is_none());
        assert!(app.drill.pending().is_none());
        assert_eq!(app.drill.attempts(), 1);
    }

    #[test]
    fn reaching_target_shows_results_then_restarts() {
        let config = Config {
            target_score: 1,
            ..Default::default()
        };
        let mut app = app(config, &[5, 3, 0]);
        app.start(Mode::AdditionSubtraction).unwrap();

        type_answer(&mut app, "8");
        assert_eq!(app.screen(), Screen::Results);
        assert!(app.celebration.is_active());

        app.on_key(key(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.screen(), Screen::Menu);
        assert!(!app.celebration.is_active());
    }

    #[test]
    fn escape_returns_to_menu_and_quits_from_menu() {
        let mut app = app(Config::default(), &[]);
        app.start(Mode::All).unwrap();
        app.on_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen(), Screen::Menu);
        assert!(!app.should_quit);

        app.on_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app(Config::default(), &[]);
        app.start(Mode::All).unwrap();
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(app.should_quit);
    }
}
