use crate::calc::error::{CalendarError, CalendarResult};
use crate::calc::index::HierarchicalDateIndex;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnName {
    Year,
    Month,
}

impl ColumnName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnName::Year => "Year",
            ColumnName::Month => "Month",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerOption {
    pub value: i32,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerColumn {
    pub name: ColumnName,
    pub options: Vec<PickerOption>,
}

/// Column values as reported by the overlay. A column that is not shown
/// reports `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PickerValues {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// The overlay that renders picker columns and collects the user's choice.
///
/// Implementations keep whatever per-column "previously selected" state they
/// need for rendering; the sync protocol only ever asks them to drop it.
pub trait PickerOverlay {
    fn present(&mut self, columns: Vec<PickerColumn>);
    fn replace_options(&mut self, column: ColumnName, options: Vec<PickerOption>);
    fn reset_column_selection_cache(&mut self, column: ColumnName);
    fn select_option(&mut self, column: ColumnName, index: usize);
    fn refresh(&mut self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerColumns {
    pub year: Option<PickerColumn>,
    pub month: Option<PickerColumn>,
}

impl PickerColumns {
    fn iter(&self) -> impl Iterator<Item = &PickerColumn> {
        self.year.iter().chain(self.month.iter())
    }

    pub fn option_count(&self) -> usize {
        self.iter().map(|c| c.options.len()).sum()
    }

    pub fn names(&self) -> Vec<ColumnName> {
        self.iter().map(|c| c.name).collect()
    }

    pub fn into_vec(self) -> Vec<PickerColumn> {
        self.year.into_iter().chain(self.month).collect()
    }
}

pub fn year_options(index: &HierarchicalDateIndex) -> Vec<PickerOption> {
    index
        .year_groups()
        .map(|y| PickerOption {
            value: y.year,
            text: y.year.to_string(),
        })
        .collect()
}

pub fn month_options(
    index: &HierarchicalDateIndex,
    year: i32,
) -> CalendarResult<Vec<PickerOption>> {
    Ok(index
        .year(year)?
        .months()
        .map(|m| PickerOption {
            value: m.month as i32,
            text: m.month_name.to_string(),
        })
        .collect())
}

/// Columns for a picker whose Year column currently shows `year`. The Year
/// column is elided for single-year data.
pub fn build_columns(
    index: &HierarchicalDateIndex,
    year: i32,
    with_month: bool,
) -> CalendarResult<PickerColumns> {
    let year_column = (index.year_count() > 1).then(|| PickerColumn {
        name: ColumnName::Year,
        options: year_options(index),
    });
    let month_column = if with_month {
        Some(PickerColumn {
            name: ColumnName::Month,
            options: month_options(index, year)?,
        })
    } else {
        None
    };
    Ok(PickerColumns {
        year: year_column,
        month: month_column,
    })
}

#[derive(Debug)]
struct PickerSession {
    year: i32,
    columns: Vec<ColumnName>,
    /// Columns whose cached selection must be dropped on the next tick.
    pending: Vec<ColumnName>,
}

/// Keeps the Month column of an open picker consistent with its Year column.
///
/// Swapping the Month options happens immediately; dropping the overlay's
/// cached selection and refreshing happens in [`run_deferred`], which the
/// host calls on the tick after the swap so the overlay has observed the new
/// options first.
///
/// [`run_deferred`]: DependentPickerSync::run_deferred
#[derive(Debug, Default)]
pub struct DependentPickerSync {
    session: Option<PickerSession>,
}

impl DependentPickerSync {
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.pending.is_empty())
    }

    /// Presents the picker positioned on the first year. Returns `false`
    /// without touching the overlay when there is nothing meaningful to pick.
    pub fn open<O: PickerOverlay + ?Sized>(
        &mut self,
        index: &HierarchicalDateIndex,
        with_month: bool,
        overlay: &mut O,
    ) -> CalendarResult<bool> {
        let Some(year) = index.first_year() else {
            debug!("picker not opened: no dates");
            return Ok(false);
        };
        let columns = build_columns(index, year, with_month)?;

        let month_count = columns.month.as_ref().map_or(0, |c| c.options.len());
        let meaningful = if with_month {
            index.year_count() >= 2 || month_count >= 2
        } else {
            index.year_count() >= 2
        };
        if !meaningful {
            debug!(
                options = columns.option_count(),
                "picker not opened: fewer than two choices"
            );
            return Ok(false);
        }

        let names = columns.names();
        info!(year, columns = ?names, "opening date picker");
        overlay.present(columns.into_vec());
        self.session = Some(PickerSession {
            year,
            pending: names.clone(),
            columns: names,
        });
        Ok(true)
    }

    /// Reacts to a value change inside the open picker. A new Year swaps the
    /// Month options and schedules the cache reset for the next tick.
    pub fn column_changed<O: PickerOverlay + ?Sized>(
        &mut self,
        index: &HierarchicalDateIndex,
        values: PickerValues,
        overlay: &mut O,
    ) -> CalendarResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if !session.columns.contains(&ColumnName::Month) {
            return Ok(());
        }
        let Some(year) = values.year.filter(|y| *y != session.year) else {
            return Ok(());
        };

        let options = month_options(index, year)?;
        debug!(
            from = session.year,
            to = year,
            months = options.len(),
            "rebuilding month column"
        );
        overlay.replace_options(ColumnName::Month, options);
        session.year = year;
        if !session.pending.contains(&ColumnName::Month) {
            session.pending.push(ColumnName::Month);
        }
        Ok(())
    }

    /// Runs the deferred step: drop cached selections, return each affected
    /// column to its first option, then refresh. Returns whether anything ran.
    pub fn run_deferred<O: PickerOverlay + ?Sized>(&mut self, overlay: &mut O) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.pending.is_empty() {
            return false;
        }
        for column in session.pending.drain(..) {
            overlay.reset_column_selection_cache(column);
            overlay.select_option(column, 0);
        }
        overlay.refresh();
        true
    }

    /// Closes the picker and resolves the chosen (year, month). An elided
    /// Year column means the index's first year; a missing Month means the
    /// first month of the chosen year.
    pub fn commit(
        &mut self,
        index: &HierarchicalDateIndex,
        values: PickerValues,
    ) -> CalendarResult<Option<(i32, u32)>> {
        if self.session.take().is_none() {
            return Ok(None);
        }
        let year = match values.year.or(index.first_year()) {
            Some(y) => y,
            None => return Err(CalendarError::UnknownYear(None)),
        };
        let month = match values.month {
            Some(m) => m,
            None => index
                .year(year)?
                .first_month()
                .map(|m| m.month)
                .ok_or(CalendarError::UnknownYear(Some(year)))?,
        };
        info!(year, month, "picker committed");
        Ok(Some((year, month)))
    }

    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("picker dismissed");
        }
    }
}
