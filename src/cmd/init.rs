use crate::data::app_settings::SettingsWrapper;
use crate::data::{AppSettings, EventData, Persistable, ScheduleEvent};
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    info!(dir = %dir.display(), "data files initialized");
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes all default data files into `dir`. Exposed for unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    write_config(dir)?;
    write_events(dir)?;
    Ok(())
}

fn write_config(dir: &Path) -> Result<()> {
    SettingsWrapper {
        settings: AppSettings::default(),
    }
    .save_to(dir)
}

fn write_events(dir: &Path) -> Result<()> {
    let mut data = EventData::default();
    for event in sample_schedule() {
        data.add(event);
    }
    data.save_to(dir)
}

/// A two-year conference schedule so the strip and both picker columns have
/// something to show.
fn sample_schedule() -> Vec<ScheduleEvent> {
    vec![
        ScheduleEvent::new("2025-06-10T08:30:00Z", "Registration and breakfast"),
        ScheduleEvent::new("2025-06-10T09:30:00Z", "Opening keynote"),
        ScheduleEvent::new("2025-06-11T09:00:00Z", "Workshops"),
        ScheduleEvent::new("2025-06-12T16:00:00Z", "Closing panel"),
        ScheduleEvent::new("2025-09-23T10:00:00Z", "Autumn meetup"),
        ScheduleEvent::new("2026-02-04T09:00:00Z", "Winter summit day 1"),
        ScheduleEvent::new("2026-02-05T09:00:00Z", "Winter summit day 2"),
        ScheduleEvent::new("2026-05-19T13:00:00Z", "Community day"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::HierarchicalDateIndex;
    use tempfile::TempDir;

    #[test]
    fn test_run_in_dir_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        run_in_dir(tmp.path()).unwrap();
        assert!(tmp.path().join("config.yaml").exists());
        assert!(tmp.path().join("events.json").exists());
    }

    #[test]
    fn test_config_yaml_is_parseable_as_settings() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path()).unwrap();
        let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(
            content.contains("settings"),
            "config.yaml missing 'settings' key"
        );
        let w: SettingsWrapper = serde_norway::from_str(&content).unwrap();
        assert_eq!(w.settings, AppSettings::default());
    }

    #[test]
    fn test_events_file_loads_sorted() {
        let tmp = TempDir::new().unwrap();
        write_events(tmp.path()).unwrap();
        let data = EventData::load_from(tmp.path()).unwrap();
        assert_eq!(data.events.len(), 8);
        assert_eq!(data.events[0].title, "Registration and breakfast");
    }

    #[test]
    fn test_sample_schedule_spans_two_years() {
        let mut data = EventData::default();
        for e in sample_schedule() {
            data.add(e);
        }
        let index = HierarchicalDateIndex::build(&data.date_inputs()).unwrap();
        assert_eq!(index.years(), vec![2025, 2026]);
        assert_eq!(index.months_of(2025).unwrap(), vec![5, 8]);
        assert_eq!(index.days_of(2025, 5).unwrap(), vec![10, 11, 12]);
    }
}
