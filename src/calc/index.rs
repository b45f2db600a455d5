use crate::calc::error::{CalendarError, CalendarResult};
use crate::calc::month_names::{month_name, month_short_name};
use crate::calc::normalize::{normalize, DateInput, NormalizedDate};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGroup {
    /// Zero-based month.
    pub month: u32,
    pub month_name: &'static str,
    days: BTreeSet<u32>,
    source_dates: Vec<NormalizedDate>,
}

impl MonthGroup {
    fn new(month: u32) -> Self {
        MonthGroup {
            month,
            month_name: month_name(month).unwrap_or_default(),
            days: BTreeSet::new(),
            source_dates: Vec::new(),
        }
    }

    pub fn short_name(&self) -> &'static str {
        month_short_name(self.month).unwrap_or_default()
    }

    /// Distinct days with at least one event, ascending.
    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.iter().copied()
    }

    pub fn first_day(&self) -> u32 {
        // a group is only ever created for a date that lands in it
        self.days.first().copied().unwrap_or(1)
    }

    pub fn contains_day(&self, day: u32) -> bool {
        self.days.contains(&day)
    }

    pub fn source_dates(&self) -> &[NormalizedDate] {
        &self.source_dates
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearGroup {
    pub year: i32,
    months: BTreeMap<u32, MonthGroup>,
    source_dates: Vec<NormalizedDate>,
}

impl YearGroup {
    fn new(year: i32) -> Self {
        YearGroup {
            year,
            months: BTreeMap::new(),
            source_dates: Vec::new(),
        }
    }

    /// Month groups ascending by month.
    pub fn months(&self) -> impl Iterator<Item = &MonthGroup> {
        self.months.values()
    }

    pub fn month(&self, month: u32) -> Option<&MonthGroup> {
        self.months.get(&month)
    }

    pub fn first_month(&self) -> Option<&MonthGroup> {
        self.months.values().next()
    }

    pub fn source_dates(&self) -> &[NormalizedDate] {
        &self.source_dates
    }
}

/// Year → month → day grouping of a set of event dates.
///
/// The index is never edited in place: a new date list means a new index.
/// Every (year, month) with at least one source date appears exactly once,
/// and every level iterates in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchicalDateIndex {
    years: BTreeMap<i32, YearGroup>,
}

impl HierarchicalDateIndex {
    /// Normalizes every input and groups it. Fails on the first unparseable
    /// input without producing a partial index.
    pub fn build<'a, I>(dates: I) -> CalendarResult<Self>
    where
        I: IntoIterator<Item = &'a DateInput>,
    {
        let normalized = dates
            .into_iter()
            .map(normalize)
            .collect::<CalendarResult<Vec<_>>>()?;
        Ok(Self::from_normalized(normalized))
    }

    fn from_normalized(mut dates: Vec<NormalizedDate>) -> Self {
        // order source dates so reordered input yields an identical index
        dates.sort();

        let mut years: BTreeMap<i32, YearGroup> = BTreeMap::new();
        for date in dates {
            let year = years
                .entry(date.year)
                .or_insert_with(|| YearGroup::new(date.year));
            year.source_dates.push(date);
            let month = year
                .months
                .entry(date.month)
                .or_insert_with(|| MonthGroup::new(date.month));
            month.source_dates.push(date);
            month.days.insert(date.day);
        }

        let months: usize = years.values().map(|y| y.months.len()).sum();
        debug!(years = years.len(), months, "built date index");
        HierarchicalDateIndex { years }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    pub fn year_groups(&self) -> impl Iterator<Item = &YearGroup> {
        self.years.values()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.keys().next().copied()
    }

    pub fn year(&self, year: i32) -> CalendarResult<&YearGroup> {
        self.years
            .get(&year)
            .ok_or(CalendarError::UnknownYear(Some(year)))
    }

    pub fn month(&self, year: i32, month: u32) -> CalendarResult<&MonthGroup> {
        self.year(year)?
            .month(month)
            .ok_or(CalendarError::UnknownMonth { year, month })
    }

    pub fn months_of(&self, year: i32) -> CalendarResult<Vec<u32>> {
        Ok(self.year(year)?.months.keys().copied().collect())
    }

    pub fn days_of(&self, year: i32, month: u32) -> CalendarResult<Vec<u32>> {
        Ok(self.month(year, month)?.days().collect())
    }

    /// Earliest (year, month, day) in the index.
    pub fn first_entry(&self) -> Option<(i32, u32, u32)> {
        let year = self.years.values().next()?;
        let month = year.first_month()?;
        Some((year.year, month.month, month.first_day()))
    }

    pub fn contains(&self, year: i32, month: u32, day: u32) -> bool {
        self.month(year, month)
            .map(|m| m.contains_day(day))
            .unwrap_or(false)
    }
}
