use crate::model::{ShipRow, Track};
use std::collections::BTreeMap;

/// Order the whole table by timestamp. The sort is stable, so rows sharing a
/// timestamp keep the order the source returned them in.
pub fn sort_rows(mut rows: Vec<ShipRow>) -> Vec<ShipRow> {
    rows.sort_by_key(|r| r.timestamp);
    rows
}

/// Group rows per vessel name. Tracks come out ordered by name, each one in
/// ascending time order.
pub fn assemble(rows: &[ShipRow]) -> Vec<Track> {
    let mut groups: BTreeMap<&str, Vec<ShipRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.ship_name.as_str()).or_default().push(row.clone());
    }

    groups
        .into_iter()
        .map(|(ship_name, rows)| Track {
            ship_name: ship_name.to_string(),
            rows: sort_rows(rows),
        })
        .collect()
}
