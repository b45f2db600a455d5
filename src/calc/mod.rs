pub mod error;
pub mod geometry;
pub mod header;
pub mod index;
pub mod month_names;
pub mod normalize;
pub mod picker;
pub mod selection;

pub use geometry::{ScrollContainer, StripGeometry};
pub use header::{CalendarHeader, HeaderInputs, StripItem, ViewMode};
pub use index::HierarchicalDateIndex;
pub use normalize::DateInput;
pub use picker::{ColumnName, PickerColumn, PickerOption, PickerOverlay, PickerValues};
pub use selection::{ChangePayload, Notify};
