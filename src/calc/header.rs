use crate::calc::error::CalendarResult;
use crate::calc::geometry::{ScrollBehavior, ScrollContainer, StripGeometry};
use crate::calc::index::HierarchicalDateIndex;
use crate::calc::month_names::month_name;
use crate::calc::normalize::DateInput;
use crate::calc::picker::{DependentPickerSync, PickerOverlay, PickerValues};
use crate::calc::selection::{
    ActiveSelection, ChangeFormat, ChangePayload, Notify, SelectionChange, SelectionState,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which calendar level the strip navigates.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Days,
    Months,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderConfig {
    pub view: ViewMode,
    pub picker_enabled: bool,
    pub geometry: StripGeometry,
    pub scroll: ScrollBehavior,
    pub emit: ChangeFormat,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        HeaderConfig {
            view: ViewMode::default(),
            picker_enabled: true,
            geometry: StripGeometry::default(),
            scroll: ScrollBehavior::default(),
            emit: ChangeFormat::default(),
        }
    }
}

/// What the host feeds the header: the event dates and an optional date to
/// show.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderInputs {
    pub dates: Vec<DateInput>,
    pub target: Option<DateInput>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripItem {
    /// Day of month in `Days` view, zero-based month in `Months` view.
    pub value: u32,
    pub label: String,
    pub active: bool,
}

/// The calendar header: date index, active selection, strip geometry and the
/// year/month picker behind one host-facing API.
#[derive(Debug)]
pub struct CalendarHeader {
    config: HeaderConfig,
    index: HierarchicalDateIndex,
    selection: SelectionState,
    picker: DependentPickerSync,
}

impl CalendarHeader {
    pub fn new(config: HeaderConfig) -> Self {
        CalendarHeader {
            config,
            index: HierarchicalDateIndex::default(),
            selection: SelectionState::default(),
            picker: DependentPickerSync::default(),
        }
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    pub fn index(&self) -> &HierarchicalDateIndex {
        &self.index
    }

    pub fn active(&self) -> Option<ActiveSelection> {
        self.selection.active()
    }

    pub fn picker_is_open(&self) -> bool {
        self.picker.is_open()
    }

    pub fn picker_has_pending(&self) -> bool {
        self.picker.has_pending()
    }

    /// Applies a change of host inputs. A new date list rebuilds the index
    /// and then shows `next.target` if it is still present, or the earliest
    /// date otherwise. A new target on unchanged dates is a silent jump that
    /// leaves the selection alone if the date is not indexed.
    pub fn on_inputs_changed(
        &mut self,
        previous: &HeaderInputs,
        next: &HeaderInputs,
    ) -> CalendarResult<()> {
        let dates_changed = previous.dates != next.dates;
        let target_changed = previous.target != next.target;

        if dates_changed {
            let index = HierarchicalDateIndex::build(&next.dates)?;
            self.index = index;
            self.picker.cancel();

            let kept = match &next.target {
                Some(target) => match self.jump_to(target, Notify::Silent) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(error = %e, "target date not in new data, resetting selection");
                        false
                    }
                },
                None => false,
            };
            if !kept {
                self.selection.reset(&self.index, Notify::Silent);
            }
        } else if target_changed {
            if let Some(target) = &next.target {
                self.jump_to(target, Notify::Silent)?;
            }
        }
        Ok(())
    }

    pub fn jump_to(
        &mut self,
        target: &DateInput,
        notify: Notify,
    ) -> CalendarResult<Option<SelectionChange>> {
        self.selection.set_target(&self.index, target, notify)
    }

    /// Selects `year`, landing on its first month and first day.
    pub fn set_active_year(&mut self, year: i32) -> CalendarResult<Option<SelectionChange>> {
        let index = &self.index;
        self.selection
            .set_year(index, year, None, None, Notify::Emit)
    }

    pub fn set_active_month(
        &mut self,
        month: u32,
        year: Option<i32>,
    ) -> CalendarResult<Option<SelectionChange>> {
        let index = &self.index;
        self.selection.set_month(index, month, year, Notify::Emit)
    }

    pub fn set_active_day(&mut self, day: u32) -> CalendarResult<Option<SelectionChange>> {
        let index = &self.index;
        self.selection.set_day(index, day, None, None, Notify::Emit)
    }

    /// Moves `delta` years along the index, stopping at the first and last
    /// year.
    pub fn step_year(&mut self, delta: isize) -> CalendarResult<Option<SelectionChange>> {
        let Some(active) = self.selection.active() else {
            return Ok(None);
        };
        let years = self.index.years();
        let Some(current) = years.iter().position(|y| *y == active.year) else {
            return Ok(None);
        };
        let last = years.len().saturating_sub(1);
        let target = current.saturating_add_signed(delta).min(last);
        if target == current {
            return Ok(None);
        }
        self.set_active_year(years[target])
    }

    pub fn payload(&self, change: &SelectionChange) -> ChangePayload {
        change.payload(self.config.emit)
    }

    // ── Strip ────────────────────────────────────────────────────────────────

    /// Values shown on the strip: days of the active month, or months of the
    /// active year.
    pub fn strip_values(&self) -> Vec<u32> {
        let Some(sel) = self.selection.active() else {
            return Vec::new();
        };
        let values = match self.config.view {
            ViewMode::Days => self.index.days_of(sel.year, sel.month),
            ViewMode::Months => self.index.months_of(sel.year),
        };
        values.unwrap_or_default()
    }

    pub fn strip_items(&self) -> Vec<StripItem> {
        let active = self.active_strip_value();
        self.strip_values()
            .into_iter()
            .map(|value| StripItem {
                value,
                label: self.strip_label(value),
                active: Some(value) == active,
            })
            .collect()
    }

    fn strip_label(&self, value: u32) -> String {
        let Some(sel) = self.selection.active() else {
            return String::new();
        };
        match self.config.view {
            ViewMode::Days => value.to_string(),
            ViewMode::Months => match self.index.month(sel.year, value) {
                Ok(group) => group.short_name().to_string(),
                Err(_) => String::new(),
            },
        }
    }

    fn active_strip_value(&self) -> Option<u32> {
        let sel = self.selection.active()?;
        Some(match self.config.view {
            ViewMode::Days => sel.day,
            ViewMode::Months => sel.month,
        })
    }

    pub fn active_strip_index(&self) -> Option<usize> {
        let active = self.active_strip_value()?;
        self.strip_values().iter().position(|v| *v == active)
    }

    /// Tap on the `i`-th strip item. Out-of-range taps do nothing.
    pub fn select_strip_item(&mut self, i: usize) -> CalendarResult<Option<SelectionChange>> {
        let Some(value) = self.strip_values().get(i).copied() else {
            debug!(item = i, "strip tap outside items ignored");
            return Ok(None);
        };
        match self.config.view {
            ViewMode::Days => self.set_active_day(value),
            ViewMode::Months => self.set_active_month(value, None),
        }
    }

    /// Moves `delta` items along the strip, stopping at either end.
    pub fn step(&mut self, delta: isize) -> CalendarResult<Option<SelectionChange>> {
        let Some(current) = self.active_strip_index() else {
            return Ok(None);
        };
        let last = self.strip_values().len().saturating_sub(1);
        let target = current.saturating_add_signed(delta).min(last);
        if target == current {
            return Ok(None);
        }
        self.select_strip_item(target)
    }

    /// Large label above the strip: the month name in `Days` view, the year
    /// in `Months` view.
    pub fn headline(&self) -> Option<String> {
        let sel = self.selection.active()?;
        match self.config.view {
            ViewMode::Days => month_name(sel.month).map(str::to_string),
            ViewMode::Months => Some(sel.year.to_string()),
        }
    }

    pub fn subline(&self) -> Option<String> {
        let sel = self.selection.active()?;
        match self.config.view {
            ViewMode::Days => Some(sel.year.to_string()),
            ViewMode::Months => None,
        }
    }

    pub fn slider_width(&self, container_width: f64) -> f64 {
        let count = self.strip_values().len();
        self.config.geometry.strip_width(container_width, count)
    }

    pub fn scroll_offset(&self, container_width: f64) -> Option<f64> {
        let idx = self.active_strip_index()?;
        Some(self.config.geometry.plan_offset(container_width, idx))
    }

    /// Repositions `container` on the active strip item.
    pub fn apply_scroll<C: ScrollContainer + ?Sized>(&self, container: &mut C) {
        if let Some(idx) = self.active_strip_index() {
            let geometry = self.config.geometry;
            geometry.apply(container, self.config.scroll, idx);
        }
    }

    // ── Picker ───────────────────────────────────────────────────────────────

    pub fn open_picker<O: PickerOverlay + ?Sized>(
        &mut self,
        overlay: &mut O,
    ) -> CalendarResult<bool> {
        if !self.config.picker_enabled {
            return Ok(false);
        }
        let with_month = self.config.view == ViewMode::Days;
        self.picker.open(&self.index, with_month, overlay)
    }

    pub fn picker_changed<O: PickerOverlay + ?Sized>(
        &mut self,
        values: PickerValues,
        overlay: &mut O,
    ) -> CalendarResult<()> {
        self.picker.column_changed(&self.index, values, overlay)
    }

    pub fn run_deferred<O: PickerOverlay + ?Sized>(&mut self, overlay: &mut O) -> bool {
        self.picker.run_deferred(overlay)
    }

    /// "Done": selects the first day of the picked month.
    pub fn commit_picker(
        &mut self,
        values: PickerValues,
    ) -> CalendarResult<Option<SelectionChange>> {
        match self.picker.commit(&self.index, values)? {
            Some((year, month)) => self.set_active_month(month, Some(year)),
            None => Ok(None),
        }
    }

    /// "Cancel": the selection stays as it was before the picker opened.
    pub fn cancel_picker(&mut self) {
        self.picker.cancel();
    }
}
