use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// attribute names as written by the position ingestor.
pub const ATTR_NAME: &str = "Name";
pub const ATTR_MMSI: &str = "MMSI";
pub const ATTR_LATITUDE: &str = "Latitude";
pub const ATTR_LONGITUDE: &str = "Longitude";
pub const ATTR_TIMESTAMP: &str = "TS";

/// A single attribute as the table store encodes it on the wire.
///
/// Numbers travel as strings, e.g. `{"N": "52.3712"}`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum WireValue {
    S(String),
    N(String),
    BOOL(bool),
    NULL(bool),
}

impl WireValue {
    pub fn tag(&self) -> &'static str {
        match self {
            WireValue::S(_) => "S",
            WireValue::N(_) => "N",
            WireValue::BOOL(_) => "BOOL",
            WireValue::NULL(_) => "NULL",
        }
    }
}

/// One stored item, keyed by attribute name.
pub type RawRecord = BTreeMap<String, WireValue>;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
//1.	ship_name	Vessel name reported in the AIS metadata, may be empty
//2.	mmsi		MMSI number of vessel, kept as text
//3.	latitude	WGS84 degrees
//4.	longitude	WGS84 degrees
//5.	timestamp	Time the ingestor stored the report, UTC
pub struct ShipRow {
    pub ship_name: String,
    pub mmsi: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl ShipRow {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// Rows of one vessel in ascending time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub ship_name: String,
    pub rows: Vec<ShipRow>,
}

impl Track {
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.rows.iter().map(|r| [r.latitude, r.longitude]).collect()
    }
}
