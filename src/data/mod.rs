pub mod app_settings;
pub mod event;
pub mod persistence;

pub use app_settings::AppSettings;
pub use event::{EventData, ScheduleEvent};
pub use persistence::Persistable;
