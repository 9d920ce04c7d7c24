use serde::{Deserialize, Serialize};
use time::{
    Date, PrimitiveDateTime, Time, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::Error;

/// The vehicle types offered on the data entry form, as sent to the backend.
pub const VEHICLE_TYPES: [&str; 5] = ["VinFast", "BYD", "MG", "Wuling", "Hyundai"];

/// The raw charge session form.
///
/// Every field is a string so that an empty input reaches validation
/// instead of failing to deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChargeSessionForm {
    pub customer_id: String,
    pub station_id: String,
    pub charger_id: String,
    pub vehicle_type: String,
    pub date: String,
    pub time: String,
    /// Minutes.
    pub duration: String,
    /// kWh.
    pub electricity: String,
}

/// The JSON body of a charge session creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewChargeSession {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "stationId")]
    pub station_id: String,
    #[serde(rename = "postId")]
    pub charger_id: String,
    #[serde(rename = "carType")]
    pub vehicle_type: String,
    /// An RFC 3339 UTC timestamp.
    #[serde(rename = "startTime")]
    pub start_time: String,
    /// Minutes.
    #[serde(rename = "chargeTime")]
    pub charge_time: u32,
    /// kWh.
    #[serde(rename = "electricalConsumption")]
    pub electrical_consumption: f64,
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, Error> {
    match value.trim() {
        "" => Err(Error::InvalidForm(message.to_owned())),
        value => Ok(value),
    }
}

fn parse_date(text: &str) -> Result<Date, Error> {
    let text = required(text, "Please choose a date")?;

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidForm("Please enter a valid date".to_owned()))
}

/// Parse a time as `HH:MM` or `HH:MM:SS`.
fn parse_time(text: &str) -> Result<Time, Error> {
    let text = required(text, "Please choose a time")?;

    Time::parse(text, format_description!("[hour]:[minute]:[second]"))
        .or_else(|_| Time::parse(text, format_description!("[hour]:[minute]")))
        .map_err(|_| Error::InvalidForm("Please enter a valid time".to_owned()))
}

fn parse_duration(text: &str) -> Result<u32, Error> {
    match text.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(Error::InvalidForm(
            "Charge duration must be a positive number of minutes".to_owned(),
        )),
    }
}

fn parse_electricity(text: &str) -> Result<f64, Error> {
    match text.trim().parse::<f64>() {
        Ok(kilowatt_hours) if kilowatt_hours.is_finite() && kilowatt_hours > 0.0 => {
            Ok(kilowatt_hours)
        }
        _ => Err(Error::InvalidForm(
            "Electricity must be a positive number of kWh".to_owned(),
        )),
    }
}

impl ChargeSessionForm {
    /// Validate the form in field order, stopping at the first invalid field.
    ///
    /// The date and time are read as local time at `local_offset` and
    /// converted to UTC.
    ///
    /// # Errors
    /// Returns [Error::InvalidForm] with a message for the first invalid field.
    pub fn validate(&self, local_offset: UtcOffset) -> Result<NewChargeSession, Error> {
        let customer_id = required(&self.customer_id, "Please enter a customer ID")?;
        let station_id = required(&self.station_id, "Please choose a station")?;
        let charger_id = required(&self.charger_id, "Please choose a charger")?;
        let vehicle_type = required(&self.vehicle_type, "Please choose a vehicle type")?;
        let date = parse_date(&self.date)?;
        let time = parse_time(&self.time)?;
        let charge_time = parse_duration(&self.duration)?;
        let electrical_consumption = parse_electricity(&self.electricity)?;

        let start_time = PrimitiveDateTime::new(date, time)
            .assume_offset(local_offset)
            .checked_to_offset(UtcOffset::UTC)
            .ok_or_else(|| Error::InvalidForm("Please enter a valid date".to_owned()))?
            .format(&Rfc3339)
            .map_err(|error| Error::InvalidForm(format!("Could not format start time: {error}")))?;

        Ok(NewChargeSession {
            customer_id: customer_id.to_owned(),
            station_id: station_id.to_owned(),
            charger_id: charger_id.to_owned(),
            vehicle_type: vehicle_type.to_owned(),
            start_time,
            charge_time,
            electrical_consumption,
        })
    }
}
