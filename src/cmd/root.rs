use crate::calc::{CalendarHeader, HeaderInputs};
use crate::data::{AppSettings, EventData, Persistable};
use crate::ui::header_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::{Context, Result};
use tracing::info;

pub fn run() -> Result<()> {
    let mut settings = AppSettings::load()?;
    let event_data = EventData::load()?;

    // a remembered date is meaningless without events to index
    let has_events = !event_data.events.is_empty();
    let inputs = HeaderInputs {
        dates: event_data.date_inputs(),
        target: settings.target().filter(|_| has_events),
    };
    let mut app = App::from_data(
        CalendarHeader::new(settings.header_config()),
        &event_data,
        &inputs,
    )
    .context("failed to index event dates")?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    // Reopen on the same day next time
    let last = app.header().active().map(|a| a.date_string());
    if last.is_some() && last != settings.active_date {
        info!(date = ?last, "remembering active date");
        settings.active_date = last;
        settings.save()?;
    }

    result
}
