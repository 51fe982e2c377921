use crate::error::SourceError;
use crate::model::{RawRecord, WireValue};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Anything that can hand over the complete set of stored position records.
pub trait RecordSource {
    fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError>;
}

/// Scans a DynamoDB table once, using the default credential chain.
#[derive(Debug, Clone)]
pub struct DynamoDbSource {
    pub table: String,
    pub region: String,
}

impl DynamoDbSource {
    pub fn new(table: &str, region: &str) -> Self {
        DynamoDbSource {
            table: table.to_string(),
            region: region.to_string(),
        }
    }

    fn store_error(&self, message: String) -> SourceError {
        SourceError::Store {
            table: self.table.clone(),
            message,
        }
    }

    async fn scan(&self) -> Result<Vec<RawRecord>, SourceError> {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()))
            .load()
            .await;
        let client = aws_sdk_dynamodb::Client::new(&config);

        let output = client
            .scan()
            .table_name(&self.table)
            .send()
            .await
            .map_err(|e| self.store_error(DisplayErrorContext(&e).to_string()))?;

        // only the first page is read
        if output.last_evaluated_key().is_some() {
            warn!(
                "scan of '{}' returned a continuation key; remaining pages are not fetched",
                self.table
            );
        }

        Ok(output.items().iter().map(from_item).collect())
    }
}

impl RecordSource for DynamoDbSource {
    fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError> {
        info!("scanning table '{}' in {}", self.table, self.region);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| self.store_error(e.to_string()))?;

        let records = runtime.block_on(self.scan())?;
        info!("fetched {} records", records.len());
        Ok(records)
    }
}

fn from_item(item: &HashMap<String, AttributeValue>) -> RawRecord {
    item.iter()
        .filter_map(|(name, value)| {
            let value = match value {
                AttributeValue::S(s) => WireValue::S(s.clone()),
                AttributeValue::N(n) => WireValue::N(n.clone()),
                AttributeValue::Bool(b) => WireValue::BOOL(*b),
                AttributeValue::Null(b) => WireValue::NULL(*b),
                other => {
                    debug!("skipping attribute '{name}' with unsupported type {other:?}");
                    return None;
                }
            };
            Some((name.clone(), value))
        })
        .collect()
}

#[derive(Debug, serde::Deserialize)]
struct ScanDump {
    #[serde(rename = "Items")]
    items: Vec<BTreeMap<String, serde_json::Value>>,
}

// Same policy as `from_item`: attributes with tags outside `WireValue` are
// dropped, they only matter if the normalizer asks for them.
fn from_json_item(item: BTreeMap<String, serde_json::Value>) -> RawRecord {
    item.into_iter()
        .filter_map(|(name, value)| match serde_json::from_value::<WireValue>(value) {
            Ok(value) => Some((name, value)),
            Err(e) => {
                debug!("skipping attribute '{name}': {e}");
                None
            }
        })
        .collect()
}

/// Reads a scan result saved in the store's JSON format, e.g. the output of
/// `aws dynamodb scan --table-name ShipCords`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }
}

impl RecordSource for JsonFileSource {
    fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            source,
            path: self.path.clone(),
        })?;

        let dump: ScanDump = serde_json::from_str(&text).map_err(|source| SourceError::Parse {
            source,
            path: self.path.clone(),
        })?;

        let records: Vec<RawRecord> = dump.items.into_iter().map(from_json_item).collect();
        info!("read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Fixed set of records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource(pub Vec<RawRecord>);

impl RecordSource for MemorySource {
    fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError> {
        Ok(self.0.clone())
    }
}
