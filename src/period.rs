// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Resolution of period selectors into closed `[from, to]` ranges.
//!
//! Every function here takes "now" as an argument; nothing reads the clock.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

const DISPLAY_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    MonthToDate,
    Last7Days,
    LastMonth,
    LastThreeMonths,
    YearToDate,
    Custom,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::MonthToDate,
        Period::Last7Days,
        Period::LastMonth,
        Period::LastThreeMonths,
        Period::YearToDate,
        Period::Custom,
    ];

    /// Unknown selectors resolve as month-to-date.
    pub fn parse(s: &str) -> Period {
        let wanted = s.trim().to_lowercase();
        Period::ALL
            .iter()
            .copied()
            .find(|p| p.id() == wanted)
            .unwrap_or_default()
    }

    pub fn id(&self) -> &'static str {
        match self {
            Period::MonthToDate => "mtd",
            Period::Last7Days => "7d",
            Period::LastMonth => "lastm",
            Period::LastThreeMonths => "3m",
            Period::YearToDate => "ytd",
            Period::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::MonthToDate => "Month",
            Period::Last7Days => "7D",
            Period::LastMonth => "Last M",
            Period::LastThreeMonths => "3M",
            Period::YearToDate => "Year",
            Period::Custom => "Date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    /// Whole-day range: `from` at 00:00:00.000, `to` at 23:59:59.999.
    pub fn days(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: start_of_day(from),
            to: end_of_day(to),
        }
    }

    /// A dated entry counts as occurring at local midnight of its date.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let at = start_of_day(date);
        at >= self.from && at <= self.to
    }

    pub fn start_date(&self) -> NaiveDate {
        self.from.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.to.date()
    }

    pub fn label(&self) -> String {
        format!(
            "{} → {}",
            self.start_date().format(DISPLAY_FORMAT),
            self.end_date().format(DISPLAY_FORMAT)
        )
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Resolve a selector against `now`. `from`/`to` are only read for
/// [`Period::Custom`]; a missing, malformed or inverted custom range resolves
/// as month-to-date.
pub fn resolve(
    period: Period,
    now: NaiveDateTime,
    from: Option<&str>,
    to: Option<&str>,
) -> DateRange {
    let today = now.date();
    let month_start = first_of_month(today);
    match period {
        Period::MonthToDate => DateRange::days(month_start, today),
        Period::Last7Days => {
            let start = today - Duration::days(6);
            DateRange::days(start, today)
        }
        Period::LastMonth => {
            let start = month_start
                .checked_sub_months(Months::new(1))
                .unwrap_or(month_start);
            let end = month_start.pred_opt().unwrap_or(month_start);
            DateRange::days(start, end)
        }
        Period::LastThreeMonths => {
            let start = month_start
                .checked_sub_months(Months::new(3))
                .unwrap_or(month_start);
            DateRange::days(start, today)
        }
        Period::YearToDate => {
            let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(month_start);
            DateRange::days(start, today)
        }
        Period::Custom => resolve_custom(from, to)
            .unwrap_or_else(|| resolve(Period::MonthToDate, now, None, None)),
    }
}

/// Parse an explicit range, or `None` when it is incomplete, unparseable or inverted.
pub fn resolve_custom(from: Option<&str>, to: Option<&str>) -> Option<DateRange> {
    let from = NaiveDate::parse_from_str(from?.trim(), "%Y-%m-%d").ok()?;
    let to = NaiveDate::parse_from_str(to?.trim(), "%Y-%m-%d").ok()?;
    if from > to {
        return None;
    }
    Some(DateRange::days(from, to))
}
