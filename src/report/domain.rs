//! The monthly aggregates returned by the backend's yearly report.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::backend::optional_number;

/// Summarised statistics for one calendar month.
///
/// Absent fields are `None` and display as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyAggregate {
    /// Revenue in VND.
    pub revenue: Option<f64>,
    /// The number of charge sessions.
    pub quantity: Option<u64>,
    /// Energy delivered in kWh.
    pub electric: Option<f64>,
    field_count: usize,
}

#[derive(Deserialize)]
struct RawAggregate {
    #[serde(default, deserialize_with = "optional_number")]
    revenue: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    quantity: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    electric: Option<f64>,
}

impl MonthlyAggregate {
    fn from_value(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };

        let field_count = fields.len();
        let raw: RawAggregate = match serde_json::from_value(Value::Object(fields)) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!("Could not read monthly aggregate: {error}");
                RawAggregate {
                    revenue: None,
                    quantity: None,
                    electric: None,
                }
            }
        };

        Self {
            revenue: raw.revenue,
            quantity: raw
                .quantity
                .filter(|quantity| *quantity >= 0.0)
                .map(|quantity| quantity.round() as u64),
            electric: raw.electric,
            field_count,
        }
    }

    /// Whether the backend sent a record without any fields.
    ///
    /// An empty record means the same as a missing month.
    pub fn is_empty(&self) -> bool {
        self.field_count == 0
    }
}

/// The monthly aggregates for one calendar year, keyed by month number 1-12.
///
/// Keys that are not month numbers, e.g. `"year"`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct YearReport {
    months: BTreeMap<u8, MonthlyAggregate>,
}

impl From<Map<String, Value>> for YearReport {
    fn from(payload: Map<String, Value>) -> Self {
        let months = payload
            .into_iter()
            .filter_map(|(key, value)| {
                let month = key.trim().parse::<u8>().ok()?;
                (1..=12)
                    .contains(&month)
                    .then(|| (month, MonthlyAggregate::from_value(value)))
            })
            .collect();

        Self { months }
    }
}

impl YearReport {
    /// Get the aggregate for `month`, if the backend sent one.
    pub fn month(&self, month: u8) -> Option<&MonthlyAggregate> {
        self.months.get(&month)
    }

    /// Whether `month` has a record with at least one field.
    pub fn has_month(&self, month: u8) -> bool {
        self.month(month)
            .is_some_and(|aggregate| !aggregate.is_empty())
    }
}

#[cfg(test)]
mod domain_tests {
    use serde_json::json;

    use super::{MonthlyAggregate, YearReport};

    fn parse(value: serde_json::Value) -> YearReport {
        serde_json::from_value(value).expect("Could not parse year report")
    }

    #[test]
    fn ignores_non_month_keys() {
        let report = parse(json!({
            "3": {"revenue": 100},
            "13": {"revenue": 5},
            "0": {"revenue": 5},
            "year": "2025",
        }));

        assert!(report.has_month(3));
        assert!(report.month(13).is_none());
        assert!(report.month(0).is_none());
    }

    #[test]
    fn reads_numeric_strings() {
        let report = parse(json!({
            "11": {"revenue": "1250000", "quantity": "4", "electric": 37.5}
        }));

        let aggregate = report.month(11).unwrap();
        assert_eq!(aggregate.revenue, Some(1_250_000.0));
        assert_eq!(aggregate.quantity, Some(4));
        assert_eq!(aggregate.electric, Some(37.5));
    }

    #[test]
    fn empty_record_is_no_data() {
        let report = parse(json!({"2": {}, "3": {"revenue": 100}}));

        assert!(report.month(2).unwrap().is_empty());
        assert!(!report.has_month(2));
        assert!(!report.has_month(4));
    }

    #[test]
    fn record_with_only_unknown_fields_is_data() {
        let report = parse(json!({"5": {"discount": 0}}));

        assert!(report.has_month(5));
        assert_eq!(
            report.month(5).unwrap().revenue,
            MonthlyAggregate::default().revenue
        );
    }

    #[test]
    fn non_object_month_is_no_data() {
        let report = parse(json!({"6": null, "7": 42}));

        assert!(!report.has_month(6));
        assert!(!report.has_month(7));
    }
}
