use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::models::InteractionRecord;

/// Inclusive range of calendar days. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// `to` covers its whole day, up to the last instant before midnight.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        let day = time.date();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date `{}`, expected YYYY-MM-DD", raw))
}

/// Keeps the records whose interaction time falls inside `range`.
///
/// Records without a usable timestamp are dropped once any bound is set;
/// an unbounded range returns everything untouched.
pub fn filter_by_date(records: Vec<InteractionRecord>, range: &DateRange) -> Vec<InteractionRecord> {
    if range.is_unbounded() {
        return records;
    }

    let total = records.len();
    let kept: Vec<InteractionRecord> = records
        .into_iter()
        .filter(|record| match record.interaction_time() {
            Some(time) => range.contains(time),
            None => {
                debug!("Dropping record without a timestamp: {:?}", record.signature());
                false
            }
        })
        .collect();

    info!(
        "Date filter {:?}..{:?} kept {} of {} records",
        range.from,
        range.to,
        kept.len(),
        total
    );
    kept
}
