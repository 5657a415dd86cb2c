use crate::db::GuestStore;
use crate::handler::{confirm_rsvp, RsvpRequest};
use crate::presenter::{View, CONTACT_HINT};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Terminal rendition of the confirmation page.
/// The view is owned by the instance and moves Loading -> terminal exactly once.
pub struct ConfirmApp {
    pub request: RsvpRequest,
    pub view: View,
}

impl ConfirmApp {
    pub fn new(request: RsvpRequest) -> Self {
        Self {
            request,
            view: View::Loading,
        }
    }

    /// Run the handler once. Later calls keep the first result.
    pub fn resolve<S: GuestStore + ?Sized>(&mut self, store: &S) -> View {
        if !self.view.is_terminal() {
            let outcome = confirm_rsvp(store, &self.request);
            self.view = View::from_outcome(&outcome);
        }
        self.view
    }
}

/// Where key presses come from
pub trait Input {
    /// True when an event is already buffered
    fn pending(&mut self) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

pub struct CrosstermInput;

impl Input for CrosstermInput {
    fn pending(&mut self) -> io::Result<bool> {
        event::poll(Duration::ZERO)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub fn run_confirm<S: GuestStore + ?Sized>(app: &mut ConfirmApp, store: &S) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut CrosstermInput, app, store);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B, I, S>(
    terminal: &mut Terminal<B>,
    input: &mut I,
    app: &mut ConfirmApp,
    store: &S,
) -> Result<()>
where
    B: ratatui::backend::Backend,
    I: Input,
    S: GuestStore + ?Sized,
{
    terminal.draw(|f| ui(f, app))?;

    app.resolve(store);

    // Keys typed while Loading was shown are discarded
    while input.pending()? {
        input.read()?;
    }

    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = input.read()? {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                return Ok(());
            }
        }
    }
}

pub fn ui(f: &mut Frame, app: &ConfirmApp) {
    let area = centered(f.size(), 70, 60);
    let wording = app.view.wording();
    let theme = app.view.theme();
    let accent = rgb(theme.accent);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}  {}", theme.icon, wording.title),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(wording.message),
    ];

    if let Some(badge) = wording.badge {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {} ", badge),
            Style::default().fg(rgb(theme.background)).bg(accent),
        )));
    }

    if !wording.next_steps.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "What's next?",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for step in wording.next_steps {
            lines.push(Line::from(format!("  • {}", step)));
        }
    }

    if matches!(app.view, View::Error(_)) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            CONTACT_HINT,
            Style::default().fg(Color::DarkGray),
        )));
    }

    if app.view.is_terminal() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press q to close",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title(" RSVP "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(card, area);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
