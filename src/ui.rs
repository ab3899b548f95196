use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use crate::{
    app::{App, Screen, WrongFeedback},
    celebration::Celebration,
    clock::Clock,
    exercise::{Mode, NumberSource},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const SPARK_COLORS: [Color; 7] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::LightYellow,
];

pub fn draw<N: NumberSource, C: Clock>(app: &App<N, C>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

/// `m:ss` for short sessions, `h:mm:ss` beyond an hour
pub fn format_duration(millis: u64) -> String {
    let secs = millis / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

impl<N: NumberSource, C: Clock> Widget for &App<N, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let legend = match self.screen() {
            Screen::Menu => {
                render_menu(chunks[0], buf);
                "(1-4) choose / (esc)ape"
            }
            Screen::Playing => {
                render_playing(self, chunks[0], buf);
                if self.accepts_input() {
                    "(enter) check / (esc) menu"
                } else {
                    ""
                }
            }
            Screen::Results => {
                render_results(self, chunks[0], buf);
                "(r)estart / (esc)ape"
            }
        };

        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[1], buf);

        if self.celebration.is_active() {
            render_celebration(&self.celebration, area, buf);
        }
    }
}

fn render_menu(area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let colors = [Color::Yellow, Color::Green, Color::Red, Color::Blue];

    let mut lines = vec![
        Line::from(Span::styled("What would you like to practice?", bold)),
        Line::from(""),
    ];
    lines.extend(Mode::ALL.iter().zip(colors).enumerate().map(|(i, (mode, color))| {
        Line::from(vec![
            Span::styled(format!("({}) ", i + 1), bold),
            Span::styled(mode.to_string(), Style::default().patch(bold).fg(color)),
        ])
    }));

    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let [_, body] = split_top(area, top);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(body, buf);
}

fn render_playing<N: NumberSource, C: Clock>(app: &App<N, C>, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let drill = &app.drill;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // score
            Constraint::Fill(1),
            Constraint::Length(1), // problem
            Constraint::Length(1),
            Constraint::Length(1), // input
            Constraint::Fill(1),
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled("Points: ", bold),
        Span::styled(
            format!("⭐ {} / {}", drill.score(), drill.config().target_score),
            Style::default().patch(bold).fg(Color::Yellow),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    if let (Some(feedback), false) = (&app.feedback, app.accepts_input()) {
        render_correction(feedback, area, buf);
        return;
    }

    if let Some(problem) = drill.current() {
        Paragraph::new(Span::styled(
            format!("{problem} = ?"),
            Style::default().patch(bold).fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    }

    Paragraph::new(Line::from(vec![
        Span::styled(app.input.clone(), bold),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    // the next problem is already up, so the correction is just a hint
    if let Some(feedback) = &app.feedback {
        let hint = Rect {
            height: chunks[5].height.min(1),
            ..chunks[5]
        };
        Paragraph::new(Span::styled(
            format!("✗ {} = {}", feedback.problem, solution_text(feedback)),
            Style::default().fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(hint, buf);
    }
}

fn solution_text(feedback: &WrongFeedback) -> String {
    feedback
        .problem
        .solution()
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("{:.2}", feedback.problem.value()))
}

fn render_correction(feedback: &WrongFeedback, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let solution = solution_text(feedback);

    let lines = vec![
        Line::from(Span::styled(
            "✗ Wrong",
            Style::default().patch(bold).fg(Color::Red),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} = ", feedback.problem), bold),
            Span::styled(solution, Style::default().patch(bold).fg(Color::Green)),
        ]),
        Line::from(""),
        Line::from("You lost 1 point"),
    ];

    let height = (lines.len() as u16 + 2).min(area.height);
    let top = area.height.saturating_sub(height) / 2;
    let [_, rest] = split_top(area, top);
    let box_area = Rect {
        height,
        ..rest
    };

    Clear.render(box_area, buf);
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(box_area, buf);
}

fn render_results<N: NumberSource, C: Clock>(app: &App<N, C>, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let drill = &app.drill;
    let elapsed = drill
        .elapsed_millis()
        .map(format_duration)
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(Span::styled(
            "🎉 Well played! 🎉",
            Style::default().patch(bold).fg(Color::Green),
        )),
        Line::from(""),
        Line::from(format!(
            "You collected {} points!",
            drill.config().target_score
        )),
        Line::from(vec![
            Span::raw("Attempts: "),
            Span::styled(drill.attempts().to_string(), bold),
        ]),
        Line::from(vec![Span::raw("Time: "), Span::styled(elapsed, bold)]),
    ];

    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let [_, body] = split_top(area, top);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(body, buf);
}

fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    for spark in &celebration.sparks {
        if spark.x < 0.0 || spark.y < 0.0 {
            continue;
        }
        let (x, y) = (spark.x as u16, spark.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let color = SPARK_COLORS[spark.color_index % SPARK_COLORS.len()];
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&spark.symbol.to_string());
            cell.set_style(Style::default().fg(color));
        }
    }

    if let Some(message) = celebration.message {
        let row = Rect {
            x: area.x,
            y: area.y + area.height / 4,
            width: area.width,
            height: 1.min(area.height),
        };
        Paragraph::new(Span::styled(
            message,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(row, buf);
    }
}

fn split_top(area: Rect, top: u16) -> [Rect; 2] {
    let top = top.min(area.height);
    [
        Rect { height: top, ..area },
        Rect {
            y: area.y + top,
            height: area.height - top,
            ..area
        },
    ]
}
