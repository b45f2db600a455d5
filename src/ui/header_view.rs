use crate::calc::selection::SelectionChange;
use crate::calc::{CalendarHeader, ChangePayload, HeaderInputs, ScrollContainer, ViewMode};
use crate::data::EventData;
use crate::ui::picker_overlay::TerminalPicker;
use crate::ui::strip_viewport::StripViewport;
use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::Duration as StdDuration;
use tracing::debug;

pub struct App<'a> {
    header: CalendarHeader,
    event_data: &'a EventData,
    picker: TerminalPicker,
    viewport: StripViewport,
    /// Last change notification delivered to the schedule list.
    last_change: Option<ChangePayload>,
    /// One-line feedback (errors, "nothing to pick"). Cleared on next keypress.
    status: Option<(String, Color)>,
}

impl<'a> App<'a> {
    pub fn new(header: CalendarHeader, event_data: &'a EventData) -> Self {
        let viewport = StripViewport::new(header.config().geometry);
        App {
            header,
            event_data,
            picker: TerminalPicker::default(),
            viewport,
            last_change: None,
            status: None,
        }
    }

    /// Builds the header from the loaded data, honoring a configured start date.
    pub fn from_data(
        header: CalendarHeader,
        event_data: &'a EventData,
        inputs: &HeaderInputs,
    ) -> Result<Self> {
        let mut app = App::new(header, event_data);
        let previous = HeaderInputs::default();
        app.header.on_inputs_changed(&previous, inputs)?;
        Ok(app)
    }

    pub fn header(&self) -> &CalendarHeader {
        &self.header
    }

    /// Work that must run one loop iteration after a key was handled: the
    /// picker's deferred reset and smooth scrolling.
    pub fn tick(&mut self) {
        if self.header.picker_has_pending() {
            self.header.run_deferred(&mut self.picker);
            debug!("picker deferred reset applied");
        }
        self.viewport.tick();
    }

    /// A smooth scroll is still moving toward its target.
    pub fn is_animating(&self) -> bool {
        !self.viewport.is_settled()
    }

    /// Measures the strip area and keeps the viewport on the active item.
    fn layout_strip(&mut self, width: u16) {
        if self.viewport.visible_width() as u16 != width {
            let content = self.header.slider_width(width as f64);
            self.viewport.resize(width, content);
            self.header.apply_scroll(&mut self.viewport);
        }
    }

    fn emit(&mut self, change: Option<SelectionChange>) {
        if let Some(change) = change {
            let payload = self.header.payload(&change);
            debug!(?payload, "selection change emitted");
            self.last_change = Some(payload);
        }
        let width = self.viewport.visible_width();
        let content = self.header.slider_width(width);
        self.viewport.resize(width as u16, content);
        self.header.apply_scroll(&mut self.viewport);
    }

    fn report(&mut self, e: impl std::fmt::Display) {
        self.status = Some((e.to_string(), Color::Red));
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status = None;

        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.picker.is_visible() {
            self.handle_picker_key(code);
            return false;
        }

        match code {
            KeyCode::Left | KeyCode::Char('h') => self.step(-1),
            KeyCode::Right | KeyCode::Char('l') => self.step(1),
            KeyCode::Home => self.step(isize::MIN),
            KeyCode::End => self.step(isize::MAX),
            KeyCode::PageUp => self.step_year(-1),
            KeyCode::PageDown => self.step_year(1),
            KeyCode::Enter | KeyCode::Char('p') => self.open_picker(),
            KeyCode::Char('q') | KeyCode::Esc => return true,
            _ => {}
        }
        false
    }

    fn step(&mut self, delta: isize) {
        match self.header.step(delta) {
            Ok(change) => self.emit(change),
            Err(e) => self.report(e),
        }
    }

    fn step_year(&mut self, delta: isize) {
        match self.header.step_year(delta) {
            Ok(change) => self.emit(change),
            Err(e) => self.report(e),
        }
    }

    fn open_picker(&mut self) {
        match self.header.open_picker(&mut self.picker) {
            Ok(true) => {}
            Ok(false) => {
                self.status = Some(("Nothing else to pick".to_string(), Color::DarkGray));
            }
            Err(e) => self.report(e),
        }
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Right => self.picker.focus_next(),
            KeyCode::BackTab | KeyCode::Left => self.picker.focus_prev(),
            KeyCode::Up | KeyCode::Down => {
                let delta = if code == KeyCode::Up { -1 } else { 1 };
                if self.picker.move_selection(delta) {
                    let values = self.picker.values();
                    if let Err(e) = self.header.picker_changed(values, &mut self.picker) {
                        self.report(e);
                    }
                }
            }
            KeyCode::Enter => {
                let values = self.picker.values();
                self.picker.close();
                match self.header.commit_picker(values) {
                    Ok(change) => self.emit(change),
                    Err(e) => self.report(e),
                }
            }
            KeyCode::Esc => {
                self.picker.close();
                self.header.cancel_picker();
            }
            _ => {}
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // headline + subline
                Constraint::Length(3), // strip
                Constraint::Min(4),    // sessions on the selected day
                Constraint::Length(5), // key bindings
            ])
            .split(area);

        self.render_headline(f, chunks[0]);
        self.render_strip(f, chunks[1]);
        self.render_sessions(f, chunks[2]);
        self.render_help(f, chunks[3]);
        if self.header.picker_is_open() {
            self.picker.render(f, area);
        }
    }

    fn render_headline(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let title = match self.header.headline() {
            Some(headline) => Span::styled(headline, bold),
            None => Span::raw("No scheduled dates"),
        };
        let mut lines = vec![Line::from(title)];
        if let Some(sub) = self.header.subline() {
            let dim = Style::default().add_modifier(Modifier::DIM);
            lines.push(Line::from(Span::styled(sub, dim)));
        }
        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_strip(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
        let inner = block.inner(area);
        f.render_widget(block, area);
        self.layout_strip(inner.width);
        let line = self.viewport.line(&self.header.strip_items());
        f.render_widget(Paragraph::new(line), inner);
    }

    fn render_sessions(&self, f: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        if let Some((msg, color)) = &self.status {
            let style = Style::default().fg(*color).add_modifier(Modifier::BOLD);
            lines.push(Line::from(Span::styled(msg.clone(), style)));
        }

        match self.header.active() {
            Some(active) => {
                let title = match self.header.config().view {
                    ViewMode::Days => format!("Sessions on {}:", active.date_string()),
                    ViewMode::Months => format!("Sessions starting {}:", active.date_string()),
                };
                lines.push(Line::from(title));
                let events = self.event_data.events_on(active);
                if events.is_empty() {
                    lines.push(Line::from("  (no sessions)"));
                }
                for e in events {
                    let row = format!("  • {}  {}", e.date, e.title);
                    lines.push(Line::from(row));
                }
            }
            None => {
                let hint = "Add events to events.json to get started.";
                lines.push(Line::from(hint));
            }
        }

        if let Some(payload) = &self.last_change {
            let text = match payload {
                ChangePayload::DateString(s) => s.clone(),
                ChangePayload::Instant(dt) => dt.to_rfc3339(),
            };
            let label = Span::styled("change ", Style::default().fg(Color::DarkGray));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![label, Span::raw(text)]));
        }

        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let rows = vec![
            Row::new(["← →", "Move along strip", "Home / End", "First / last"]),
            Row::new(["PgUp / PgDn", "Previous / next year", "", ""]),
            Row::new(["Enter / p", "Open picker", "q / Esc", "Quit"]),
            Row::new(["Picker: ↑ ↓", "Change value", "Tab", "Next column"]),
        ];
        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(20),
                Constraint::Length(12),
                Constraint::Length(20),
            ],
        )
        .block(Block::default().borders(Borders::TOP))
        .column_spacing(1);
        f.render_widget(table, area);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| app.render(f))?;
        let wait = if app.is_animating() { 16 } else { 250 };
        if event::poll(StdDuration::from_millis(wait))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}
