//! Display formatting for monthly aggregates.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::report::domain::MonthlyAggregate;

/// The price of one kWh in VND, used to estimate the amount of a charge session.
pub const PRICE_PER_KWH: f64 = 7_600.0;

fn get_thousands_separator_formatter() -> &'static Formatter {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    FORMATTER.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    })
}

/// numfmt switches to scientific notation from here on.
const SCIENTIFIC_NOTATION_THRESHOLD: f64 = 1e15;

/// Group the digits of a whole number with `.` between thousands.
fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    grouped
}

/// Format `number` rounded to a whole number with `.` between thousands,
/// e.g. "1.250.000".
///
/// Values that are not finite are shown as "0".
pub fn format_thousands(number: f64) -> String {
    let number = number.round();

    // Zero is hardcoded as "0", so we must specify the formatted string for zero
    if number == 0.0 || !number.is_finite() {
        return "0".to_owned();
    }

    let formatted = if number.abs() < SCIENTIFIC_NOTATION_THRESHOLD {
        get_thousands_separator_formatter()
            .fmt_string(number.abs())
            .replace(',', ".")
    } else {
        group_digits(&format!("{:.0}", number.abs()))
    };

    if number < 0.0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Format an amount of money in VND, e.g. "1.250.000 VND".
pub fn format_currency(amount: Option<f64>) -> String {
    format!("{} VND", format_thousands(amount.unwrap_or_default()))
}

/// Format an amount of energy as sent by the backend, e.g. "37.5 kWh".
pub fn format_energy(energy: Option<f64>) -> String {
    let energy = energy.unwrap_or_default();

    // Avoid "-0 kWh".
    let energy = if energy == 0.0 { 0.0 } else { energy };

    format!("{energy} kWh")
}

pub fn format_count(count: Option<u64>) -> String {
    count.unwrap_or_default().to_string()
}

/// The display strings for one month's aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSummary {
    pub revenue: String,
    pub sessions: String,
    pub energy: String,
}

impl From<Option<&MonthlyAggregate>> for AggregateSummary {
    fn from(aggregate: Option<&MonthlyAggregate>) -> Self {
        let aggregate = aggregate.cloned().unwrap_or_default();

        Self {
            revenue: format_currency(aggregate.revenue),
            sessions: format_count(aggregate.quantity),
            energy: format_energy(aggregate.electric),
        }
    }
}
