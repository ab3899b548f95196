use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use mathdrill::{
    app::App,
    clock::{Clock, MonotonicClock},
    config::{Config, ConfigStore, FileConfigStore},
    drill::Drill,
    exercise::{Mode, NumberSource, RandomNumbers},
    runtime::{CrosstermEventSource, DrillEvent, EventSource, FixedTicker, Runner, Ticker},
    session::WrongAnswerPolicy,
    ui,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

/// arithmetic drill game: pick an operation and answer problems until you reach the target score
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// skip the menu and start with this mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// points needed to finish a session
    #[clap(short = 't', long)]
    target: Option<u32>,

    /// show the next problem right after a wrong answer instead of after the correction
    #[clap(long)]
    immediate: bool,

    /// seed the problem generator for a repeatable session
    #[clap(long)]
    seed: Option<u64>,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over stored settings
    fn apply(&self, mut config: Config) -> Config {
        if let Some(target) = self.target {
            config.target_score = target;
        }
        if self.immediate {
            config.wrong_answer = WrongAnswerPolicy::Immediate;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        log::info!("saved settings to {}", store.path().display());
    }

    match cli.seed {
        Some(seed) => run(&cli, config, RandomNumbers::new(StdRng::seed_from_u64(seed))),
        None => run(&cli, config, RandomNumbers::thread()),
    }
}

fn run<N: NumberSource>(cli: &Cli, config: Config, numbers: N) -> Result<(), Box<dyn Error>> {
    let drill = Drill::new(config.session_config(), numbers, MonotonicClock::new());
    let mut app = App::new(drill, config);
    if let Some(mode) = cli.mode {
        app.start(mode)?;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B, N, C, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<N, C>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    N: NumberSource,
    C: Clock,
    E: EventSource,
    T: Ticker,
{
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit {
        match runner.step() {
            DrillEvent::Tick => {
                let animating = app.celebration.is_active() || app.feedback.is_some();
                app.on_tick(runner.tick_millis())?;
                if animating {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            DrillEvent::Resize => {
                let size = terminal.size()?;
                app.resize(size.width, size.height);
                terminal.draw(|f| ui::draw(app, f))?;
            }
            DrillEvent::Key(key) => {
                app.on_key(key)?;
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["mathdrill"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.target, None);
        assert!(!cli.immediate);
        assert_eq!(cli.seed, None);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_modes() {
        let cases = [
            ("add-sub", Mode::AdditionSubtraction),
            ("mul", Mode::Multiplication),
            ("mul-div", Mode::MultiplicationDivision),
            ("all", Mode::All),
        ];
        for (arg, mode) in cases {
            let cli = Cli::parse_from(["mathdrill", "--mode", arg]);
            assert_eq!(cli.mode, Some(mode));
        }

        let cli = Cli::parse_from(["mathdrill", "-m", "mul"]);
        assert_eq!(cli.mode, Some(Mode::Multiplication));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["mathdrill", "--mode", "modulo"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["mathdrill", "-t", "20", "--immediate"]);
        let config = cli.apply(Config::default());

        assert_eq!(config.target_score, 20);
        assert_eq!(config.wrong_answer, WrongAnswerPolicy::Immediate);
    }

    #[test]
    fn test_cli_keeps_stored_values_when_unset() {
        let stored = Config {
            target_score: 20,
            wrong_answer: WrongAnswerPolicy::Immediate,
            ..Default::default()
        };
        let cli = Cli::parse_from(["mathdrill"]);
        assert_eq!(cli.apply(stored.clone()), stored);
    }

    #[test]
    fn test_tui_loop_quits_on_escape() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
        use mathdrill::{clock::ManualClock, exercise::ScriptedNumbers, runtime::TestEventSource};
        use ratatui::backend::TestBackend;
        use std::{sync::mpsc, time::Duration};

        let config = Config::default();
        let drill = Drill::new(
            config.session_config(),
            ScriptedNumbers::new([5, 3, 0, 10, 4, 1]),
            ManualClock::new(0),
        );
        let mut app = App::new(drill, config);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        let (tx, rx) = mpsc::channel();
        for code in [
            KeyCode::Char('1'),
            KeyCode::Char('8'),
            KeyCode::Enter,
            KeyCode::Esc,
            KeyCode::Esc,
        ] {
            tx.send(DrillEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
                .unwrap();
        }
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        start_tui(&mut terminal, &mut app, &runner).unwrap();
        assert!(app.should_quit);
    }
}
