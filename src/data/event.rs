use crate::calc::normalize::{normalize, DateInput};
use crate::calc::selection::ActiveSelection;
use crate::data::persistence::{FileFormat, Persistable};
use serde::{Deserialize, Serialize};

/// One scheduled session. `date` is anything the date normalizer accepts,
/// typically an RFC 3339 timestamp or a bare `YYYY-MM-DD`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScheduleEvent {
    pub date: String,
    pub title: String,
}

impl ScheduleEvent {
    pub fn new(date: &str, title: &str) -> Self {
        ScheduleEvent {
            date: date.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct EventData {
    pub events: Vec<ScheduleEvent>,
}

impl Persistable for EventData {
    fn filename() -> &'static str {
        "events.json"
    }
    fn format() -> FileFormat {
        FileFormat::Json
    }
}

impl EventData {
    pub fn add(&mut self, event: ScheduleEvent) {
        self.events.push(event);
        self.events.sort_by(|a, b| a.date.cmp(&b.date));
    }

    /// The date list handed to the calendar header.
    pub fn date_inputs(&self) -> Vec<DateInput> {
        self.events
            .iter()
            .map(|e| DateInput::Text(e.date.clone()))
            .collect()
    }

    /// Events whose UTC day is the selected day. Unparseable dates never
    /// match.
    pub fn events_on(&self, selection: ActiveSelection) -> Vec<&ScheduleEvent> {
        let wanted = (selection.year, selection.month, selection.day);
        self.events
            .iter()
            .filter(|e| {
                normalize(&DateInput::Text(e.date.clone()))
                    .map(|n| n.key() == wanted)
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sel(year: i32, month: u32, day: u32) -> ActiveSelection {
        ActiveSelection { year, month, day }
    }

    #[test]
    fn test_add_sorts_by_date() {
        let mut data = EventData::default();
        data.add(ScheduleEvent::new("2024-03-21", "Closing keynote"));
        data.add(ScheduleEvent::new("2024-03-05", "Opening keynote"));
        assert_eq!(data.events[0].title, "Opening keynote");
        assert_eq!(data.events[1].title, "Closing keynote");
    }

    #[test]
    fn test_date_inputs_preserve_raw_text() {
        let mut data = EventData::default();
        data.add(ScheduleEvent::new("2024-03-05T09:00:00Z", "Registration"));
        assert_eq!(
            data.date_inputs(),
            vec![DateInput::Text("2024-03-05T09:00:00Z".to_string())]
        );
    }

    #[test]
    fn test_events_on_matches_utc_day() {
        let mut data = EventData::default();
        data.add(ScheduleEvent::new("2024-03-05T09:00:00Z", "Registration"));
        // 23:30 at -05:00 is 04:30 UTC on the 6th
        let late = ScheduleEvent::new("2024-03-05T23:30:00-05:00", "Late social");
        data.add(late);
        data.add(ScheduleEvent::new("2024-03-06", "Workshops"));
        let on_5th: Vec<&str> = data
            .events_on(sel(2024, 2, 5))
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(on_5th, vec!["Registration"]);
        assert_eq!(data.events_on(sel(2024, 2, 6)).len(), 2);
    }

    #[test]
    fn test_events_on_skips_bad_dates() {
        let mut data = EventData::default();
        data.add(ScheduleEvent::new("tbd", "Unscheduled"));
        assert!(data.events_on(sel(2024, 2, 5)).is_empty());
    }

    #[test]
    fn test_event_data_json_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut data = EventData::default();
        data.add(ScheduleEvent::new("2024-07-01", "Sprint"));
        data.save_to(tmp.path()).unwrap();
        let loaded = EventData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.events, data.events);
    }

    #[test]
    fn test_default_event_data_is_empty() {
        assert!(EventData::default().events.is_empty());
        assert!(EventData::default().date_inputs().is_empty());
    }
}
