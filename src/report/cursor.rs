use std::fmt;

use time::{Date, Month};

/// The (month, year) pair currently shown on the reports page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthCursor {
    // Field order matters for the derived ordering.
    year: i32,
    month: u8,
}

impl MonthCursor {
    /// Create a cursor, returning `None` if `month` is not in 1..=12.
    pub fn new(month: u8, year: i32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month that contains `date`.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// The month before this one, wrapping January to December of the previous year.
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one, wrapping December to January of the next year.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = Month::try_from(self.month)
            .map_or_else(|_| self.month.to_string(), |month| month.to_string());

        write!(f, "{name} {}", self.year)
    }
}
