use crate::calc::error::{CalendarError, CalendarResult};
use crate::calc::index::HierarchicalDateIndex;
use crate::calc::normalize::{format_date_key, normalize, utc_midnight, DateInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A pointer into the index. `month` is zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveSelection {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ActiveSelection {
    pub fn date_string(&self) -> String {
        format_date_key(self.year, self.month, self.day)
    }
}

/// Whether a transition is reported to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notify {
    Emit,
    Silent,
}

/// How the host wants change notifications shaped.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeFormat {
    #[default]
    DateString,
    Instant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangePayload {
    DateString(String),
    Instant(DateTime<Utc>),
}

/// Emitted by every transition that is not silent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub selection: ActiveSelection,
}

impl SelectionChange {
    pub fn date_string(&self) -> String {
        self.selection.date_string()
    }

    /// UTC midnight of the selected day.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        let s = self.selection;
        utc_midnight(s.year, s.month, s.day)
    }

    pub fn payload(&self, format: ChangeFormat) -> ChangePayload {
        match (format, self.instant()) {
            (ChangeFormat::Instant, Some(instant)) => ChangePayload::Instant(instant),
            _ => ChangePayload::DateString(self.date_string()),
        }
    }
}

/// Active (year, month, day) tracked against a [`HierarchicalDateIndex`].
///
/// Every setter resolves the full triple before touching `self`, so a failed
/// call never leaves a partially updated selection behind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Uninitialized,
    Active(ActiveSelection),
}

impl SelectionState {
    pub fn active(&self) -> Option<ActiveSelection> {
        match self {
            SelectionState::Uninitialized => None,
            SelectionState::Active(sel) => Some(*sel),
        }
    }

    /// Points at the earliest entry of `index`, or drops back to
    /// `Uninitialized` when the index is empty.
    pub fn reset(
        &mut self,
        index: &HierarchicalDateIndex,
        notify: Notify,
    ) -> Option<SelectionChange> {
        match index.first_entry() {
            Some((year, month, day)) => self.commit(ActiveSelection { year, month, day }, notify),
            None => {
                debug!("date index empty, selection uninitialized");
                *self = SelectionState::Uninitialized;
                None
            }
        }
    }

    /// Selects `year`, cascading to its first month and that month's first
    /// day unless they are given explicitly.
    pub fn set_year(
        &mut self,
        index: &HierarchicalDateIndex,
        year: i32,
        month: Option<u32>,
        day: Option<u32>,
        notify: Notify,
    ) -> CalendarResult<Option<SelectionChange>> {
        let next = resolve(index, year, month, day)?;
        Ok(self.commit(next, notify))
    }

    /// Selects `month` of `year` (or of the active year), cascading to the
    /// month's first day.
    pub fn set_month(
        &mut self,
        index: &HierarchicalDateIndex,
        month: u32,
        year: Option<i32>,
        notify: Notify,
    ) -> CalendarResult<Option<SelectionChange>> {
        let year = self.year_or_active(year)?;
        self.set_year(index, year, Some(month), None, notify)
    }

    /// Selects `day`, defaulting month and year to the active ones.
    pub fn set_day(
        &mut self,
        index: &HierarchicalDateIndex,
        day: u32,
        month: Option<u32>,
        year: Option<i32>,
        notify: Notify,
    ) -> CalendarResult<Option<SelectionChange>> {
        let year = self.year_or_active(year)?;
        let month = match (month, self.active()) {
            (Some(m), _) => m,
            (None, Some(sel)) => sel.month,
            (None, None) => index
                .year(year)?
                .first_month()
                .map(|m| m.month)
                .ok_or(CalendarError::UnknownYear(Some(year)))?,
        };
        self.set_year(index, year, Some(month), Some(day), notify)
    }

    /// Jumps to an externally supplied date. The date must be present in
    /// `index`; otherwise the current selection is kept.
    pub fn set_target(
        &mut self,
        index: &HierarchicalDateIndex,
        target: &DateInput,
        notify: Notify,
    ) -> CalendarResult<Option<SelectionChange>> {
        let date = normalize(target)?;
        if !index.contains(date.year, date.month, date.day) {
            return Err(CalendarError::DateNotInIndex {
                year: date.year,
                month: date.month,
                day: date.day,
            });
        }
        let next = resolve(index, date.year, Some(date.month), Some(date.day))?;
        Ok(self.commit(next, notify))
    }

    fn year_or_active(&self, year: Option<i32>) -> CalendarResult<i32> {
        year.or(self.active().map(|s| s.year))
            .ok_or(CalendarError::UnknownYear(None))
    }

    fn commit(&mut self, next: ActiveSelection, notify: Notify) -> Option<SelectionChange> {
        debug!(date = %next.date_string(), ?notify, "selection changed");
        *self = SelectionState::Active(next);
        match notify {
            Notify::Emit => Some(SelectionChange { selection: next }),
            Notify::Silent => None,
        }
    }
}

fn resolve(
    index: &HierarchicalDateIndex,
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
) -> CalendarResult<ActiveSelection> {
    let year_group = index.year(year)?;
    let month_group = match month {
        Some(m) => year_group
            .month(m)
            .ok_or(CalendarError::UnknownMonth { year, month: m })?,
        None => year_group
            .first_month()
            .ok_or(CalendarError::UnknownYear(Some(year)))?,
    };
    let day = match day {
        Some(d) if month_group.contains_day(d) => d,
        Some(d) => {
            return Err(CalendarError::DateNotInIndex {
                year,
                month: month_group.month,
                day: d,
            });
        }
        None => month_group.first_day(),
    };
    Ok(ActiveSelection {
        year,
        month: month_group.month,
        day,
    })
}
