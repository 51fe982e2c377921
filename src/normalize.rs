use crate::error::DecodeError;
use crate::model::{
    RawRecord, ShipRow, WireValue, ATTR_LATITUDE, ATTR_LONGITUDE, ATTR_MMSI, ATTR_NAME,
    ATTR_TIMESTAMP,
};
use chrono::{DateTime, Utc};

/// Decode every record, stopping at the first one that does not fit.
pub fn normalize_all(records: &[RawRecord]) -> Result<Vec<ShipRow>, DecodeError> {
    records.iter().map(normalize).collect()
}

pub fn normalize(record: &RawRecord) -> Result<ShipRow, DecodeError> {
    Ok(ShipRow {
        ship_name: string_field(record, ATTR_NAME)?.to_string(),
        mmsi: number_field(record, ATTR_MMSI)?.to_string(),
        latitude: coordinate(record, ATTR_LATITUDE)?,
        longitude: coordinate(record, ATTR_LONGITUDE)?,
        timestamp: epoch_seconds(record, ATTR_TIMESTAMP)?,
    })
}

fn field<'a>(record: &'a RawRecord, name: &'static str) -> Result<&'a WireValue, DecodeError> {
    record.get(name).ok_or(DecodeError::MissingField(name))
}

fn string_field<'a>(record: &'a RawRecord, name: &'static str) -> Result<&'a str, DecodeError> {
    match field(record, name)? {
        WireValue::S(value) => Ok(value),
        other => Err(DecodeError::WrongTag {
            field: name,
            expected: "S",
            found: other.tag(),
        }),
    }
}

fn number_field<'a>(record: &'a RawRecord, name: &'static str) -> Result<&'a str, DecodeError> {
    match field(record, name)? {
        WireValue::N(value) => Ok(value),
        other => Err(DecodeError::WrongTag {
            field: name,
            expected: "N",
            found: other.tag(),
        }),
    }
}

fn coordinate(record: &RawRecord, name: &'static str) -> Result<f64, DecodeError> {
    let raw = number_field(record, name)?;
    // non-finite values would not survive the trip into the map document
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DecodeError::InvalidNumber {
            field: name,
            value: raw.to_string(),
        }),
    }
}

fn epoch_seconds(record: &RawRecord, name: &'static str) -> Result<DateTime<Utc>, DecodeError> {
    let raw = number_field(record, name)?;
    let seconds = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| DecodeError::InvalidNumber {
            field: name,
            value: raw.to_string(),
        })?;

    DateTime::from_timestamp(seconds, 0).ok_or(DecodeError::TimestampOutOfRange {
        field: name,
        seconds,
    })
}
