use crate::calc::HierarchicalDateIndex;
use crate::data::{EventData, Persistable};
use anyhow::{Context, Result};

pub fn run() -> Result<()> {
    let event_data = EventData::load()?;
    let index = HierarchicalDateIndex::build(&event_data.date_inputs())
        .context("failed to index event dates")?;
    write_index(&index, &mut std::io::stdout())
}

pub(crate) fn write_index<W: std::io::Write>(
    index: &HierarchicalDateIndex,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Event Dates")?;
    writeln!(out, "---")?;
    if index.is_empty() {
        writeln!(out, "No event dates.")?;
        return Ok(());
    }
    let mut months = 0usize;
    let mut days = 0usize;
    let mut events = 0usize;
    for year in index.year_groups() {
        let year_events = year.source_dates().len();
        writeln!(out, "{} ({} events)", year.year, year_events)?;
        for month in year.months() {
            let list: Vec<String> = month.days().map(|d| format!("{:>2}", d)).collect();
            writeln!(out, "  {:<10} {}", month.month_name, list.join(" "))?;
            months += 1;
            days += list.len();
            events += month.source_dates().len();
        }
    }
    writeln!(out, "---")?;
    writeln!(
        out,
        "Total: {} year(s), {} month(s), {} day(s), {} event(s)",
        index.year_count(),
        months,
        days,
        events
    )?;
    Ok(())
}
