use crate::Value;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Converts an attribute between its wire form and its in-memory [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    /// The JSON value is kept as-is.
    #[default]
    Passthrough,

    /// Strings are parsed into UTC date-times and written back in the
    /// canonical `YYYY-MM-DDTHH:MM:SSZ` form.
    Date,
}

impl Codec {
    /// Decodes a wire value.
    ///
    /// A date attribute that does not parse is kept as a passthrough value.
    pub fn decode(self, wire: &serde_json::Value) -> Value {
        self.normalize(Value::from_json(wire.clone()))
    }

    /// Converts a value assigned by the caller into the shape the codec
    /// stores, e.g. a date string into a [`Value::DateTime`].
    pub fn normalize(self, value: Value) -> Value {
        match (self, value) {
            (Codec::Date, Value::String(raw)) => match parse_date(&raw) {
                Some(date) => Value::DateTime(date),
                None => {
                    tracing::warn!(value = %raw, "date attribute did not parse; keeping raw value");
                    Value::String(raw)
                }
            },
            (_, value) => value,
        }
    }

    /// Encodes a value for the wire.
    pub fn encode(self, value: &Value) -> serde_json::Value {
        value.to_json()
    }
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    let naive = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}
