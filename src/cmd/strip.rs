use crate::calc::{CalendarHeader, DateInput, HeaderInputs, Notify};
use crate::data::{AppSettings, EventData, Persistable};
use anyhow::{Context, Result};

pub fn run(date: Option<&str>, width: f64) -> Result<()> {
    let settings = AppSettings::load()?;
    let event_data = EventData::load()?;

    let mut header = CalendarHeader::new(settings.header_config());
    let has_events = !event_data.events.is_empty();
    let inputs = HeaderInputs {
        dates: event_data.date_inputs(),
        target: settings.target().filter(|_| has_events),
    };
    header
        .on_inputs_changed(&HeaderInputs::default(), &inputs)
        .context("failed to index event dates")?;

    if let Some(date) = date {
        header
            .jump_to(&DateInput::from(date), Notify::Silent)
            .with_context(|| format!("cannot show {date}"))?;
    }

    write_strip(&header, width, &mut std::io::stdout())
}

pub(crate) fn write_strip<W: std::io::Write>(
    header: &CalendarHeader,
    width: f64,
    out: &mut W,
) -> Result<()> {
    let Some(active) = header.active() else {
        writeln!(out, "No event dates.")?;
        return Ok(());
    };

    let headline = header.headline().unwrap_or_default();
    match header.subline() {
        Some(sub) => writeln!(out, "{} {}", headline, sub)?,
        None => writeln!(out, "{}", headline)?,
    }
    writeln!(out, "---")?;
    let cells: Vec<String> = header
        .strip_items()
        .into_iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.label)
            } else {
                format!(" {} ", item.label)
            }
        })
        .collect();
    writeln!(out, "  {}", cells.join(" "))?;
    writeln!(out, "---")?;
    writeln!(out, "{:<16} {}", "Selected:", active.date_string())?;
    let years: Vec<String> = header
        .index()
        .years()
        .iter()
        .map(|y| y.to_string())
        .collect();
    writeln!(out, "{:<16} {}", "Years:", years.join(", "))?;
    let strip_width = header.slider_width(width);
    writeln!(out, "{:<16} {:.1}", "Strip width:", strip_width)?;
    if let Some(offset) = header.scroll_offset(width) {
        writeln!(out, "{:<16} {:.1}", "Scroll offset:", offset)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::header::HeaderConfig;
    use crate::calc::ViewMode;

    fn header(dates: &[&str], view: ViewMode) -> CalendarHeader {
        let mut header = CalendarHeader::new(HeaderConfig {
            view,
            ..HeaderConfig::default()
        });
        let inputs = HeaderInputs {
            dates: dates.iter().map(|d| DateInput::from(*d)).collect(),
            target: None,
        };
        header
            .on_inputs_changed(&HeaderInputs::default(), &inputs)
            .unwrap();
        header
    }

    fn render(header: &CalendarHeader) -> String {
        let mut buf = Vec::new();
        write_strip(header, 320.0, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_strip_empty() {
        let out = render(&header(&[], ViewMode::Days));
        assert!(out.contains("No event dates."));
    }

    #[test]
    fn test_write_strip_days_marks_active() {
        let h = header(&["2024-03-05", "2024-03-21", "2024-07-01"], ViewMode::Days);
        let out = render(&h);
        assert!(out.starts_with("March 2024\n"));
        assert!(out.contains("[5]  21 "));
        assert!(out.contains("2024-03-05"));
        // two items at the default six-cell pitch in a 320-cell container
        assert!(out.contains("Strip width:     652.0"));
        assert!(out.contains("Scroll offset:   -156.0"));
    }

    #[test]
    fn test_write_strip_months_view() {
        let mut h = header(&["2024-03-05", "2024-07-01"], ViewMode::Months);
        h.jump_to(&"2024-07-01".into(), Notify::Silent).unwrap();
        let out = render(&h);
        assert!(out.starts_with("2024\n"));
        assert!(out.contains(" Mar  [Jul]"));
        assert!(out.contains("2024-07-01"));
    }

    #[test]
    fn test_write_strip_lists_indexed_years() {
        let h = header(&["2025-01-10", "2024-03-05"], ViewMode::Days);
        let out = render(&h);
        assert!(out.contains("Years:           2024, 2025\n"));
    }
}
