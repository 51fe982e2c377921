use crate::error::{PipelineError, PipelineResult};
use crate::model::{ShipRow, Track};

pub const PATH_COLOR: &str = "blue";
pub const PATH_WEIGHT: f64 = 2.5;
pub const PATH_OPACITY: f64 = 1.0;
pub const MARKER_COLOR: &str = "red";
pub const MARKER_ICON: &str = "info-sign";
pub const DEFAULT_ZOOM: u8 = 5;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Path {
    pub ship_name: String,
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Marker {
    pub location: [f64; 2],
    pub popup: String,
}

/// Map document before it is written out.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RenderedMap {
    pub center: [f64; 2],
    pub zoom: u8,
    pub paths: Vec<Path>,
    pub markers: Vec<Marker>,
}

/// Build the map. `sorted` is the full table in time order and decides the
/// initial view; every track contributes one path and one marker per row.
pub fn render(sorted: &[ShipRow], tracks: &[Track], zoom: u8) -> PipelineResult<RenderedMap> {
    let first = sorted.first().ok_or(PipelineError::EmptyInput)?;

    let mut map = RenderedMap {
        center: [first.latitude, first.longitude],
        zoom,
        paths: Vec::with_capacity(tracks.len()),
        markers: Vec::with_capacity(sorted.len()),
    };

    for track in tracks {
        map.paths.push(Path {
            ship_name: track.ship_name.clone(),
            coordinates: track.coordinates(),
        });

        for row in &track.rows {
            map.markers.push(Marker {
                location: [row.latitude, row.longitude],
                popup: format!("Timestamp: {}", row.formatted_timestamp()),
            });
        }
    }

    log::debug!(
        "rendered {} paths and {} markers",
        map.paths.len(),
        map.markers.len()
    );
    Ok(map)
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Ship tracks</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css" />
  <link rel="stylesheet" href="https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css" />
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css" />
  <script src="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"></script>
  <style>
    html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
"#;

const HTML_SCRIPT: &str = r#"
    var map = L.map("map").setView(DATA.center, DATA.zoom);
    L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
      maxZoom: 18,
      attribution: "&copy; OpenStreetMap contributors"
    }).addTo(map);

    DATA.paths.forEach(function (path) {
      L.polyline(path.coordinates, STYLE.path).addTo(map);
    });

    var icon = L.AwesomeMarkers.icon(STYLE.icon);
    DATA.markers.forEach(function (marker) {
      L.marker(marker.location, { icon: icon })
        .bindPopup(document.createTextNode(marker.popup))
        .addTo(map);
    });
  </script>
</body>
</html>
"#;

impl RenderedMap {
    /// Standalone Leaflet page. Only static assets are pulled from CDNs.
    pub fn to_html(&self) -> PipelineResult<String> {
        let style = serde_json::json!({
            "path": { "color": PATH_COLOR, "weight": PATH_WEIGHT, "opacity": PATH_OPACITY },
            "icon": { "markerColor": MARKER_COLOR, "icon": MARKER_ICON, "prefix": "glyphicon" },
        });

        let mut html = String::from(HTML_HEAD);
        html.push_str(&format!(
            "    var DATA = {};\n    var STYLE = {};\n",
            script_json(self)?,
            script_json(&style)?
        ));
        html.push_str(HTML_SCRIPT);
        Ok(html)
    }
}

// A "</script>" inside a ship name must not close the script element.
fn script_json<T: serde::Serialize>(value: &T) -> PipelineResult<String> {
    let json = serde_json::to_string(value).map_err(PipelineError::Encode)?;
    Ok(json.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{assemble, sort_rows};
    use chrono::DateTime;

    fn row(name: &str, lat: f64, lon: f64, seconds: i64) -> ShipRow {
        ShipRow {
            ship_name: name.to_string(),
            mmsi: "244810627".to_string(),
            latitude: lat,
            longitude: lon,
            timestamp: DateTime::from_timestamp(seconds, 0).unwrap(),
        }
    }

    fn render_rows(rows: Vec<ShipRow>) -> PipelineResult<RenderedMap> {
        let sorted = sort_rows(rows);
        let tracks = assemble(&sorted);
        render(&sorted, &tracks, DEFAULT_ZOOM)
    }

    #[test]
    fn one_vessel_two_records() {
        let map = render_rows(vec![
            row("A", 52.1, 4.1, 1_000_000_060),
            row("A", 52.0, 4.0, 1_000_000_000),
        ])
        .unwrap();

        assert_eq!(map.paths.len(), 1);
        assert_eq!(map.paths[0].coordinates, vec![[52.0, 4.0], [52.1, 4.1]]);
        let popups: Vec<&str> = map.markers.iter().map(|m| m.popup.as_str()).collect();
        assert_eq!(
            popups,
            vec!["Timestamp: 2001-09-09 01:46:40", "Timestamp: 2001-09-09 01:47:40"]
        );
    }

    #[test]
    fn center_is_earliest_row_overall() {
        let map = render_rows(vec![
            row("A", 10.0, 10.0, 300),
            row("B", 20.0, 20.0, 100),
            row("A", 30.0, 30.0, 200),
        ])
        .unwrap();

        assert_eq!(map.center, [20.0, 20.0]);
        assert_eq!(map.zoom, DEFAULT_ZOOM);
        assert_eq!(map.paths.len(), 2);
        assert_eq!(map.markers.len(), 3);
    }

    #[test]
    fn single_record_gives_one_point_path() {
        let map = render_rows(vec![row("A", 1.0, 2.0, 10)]).unwrap();

        assert_eq!(map.paths[0].coordinates.len(), 1);
        assert_eq!(map.markers.len(), 1);
    }

    #[test]
    fn empty_table_is_an_error() {
        assert!(matches!(render_rows(vec![]), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn html_embeds_data_and_style() {
        let map = render_rows(vec![row("</script><b>", 1.0, 2.0, 10)]).unwrap();

        let html = map.to_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#""color":"blue""#));
        assert!(html.contains(r#""markerColor":"red""#));
        assert!(html.contains("Timestamp: 1970-01-01 00:00:10"));
        assert!(!html.contains("</script><b>"));
    }

    #[test]
    fn script_json_escapes_closing_tags() {
        assert_eq!(script_json(&"</b>").unwrap(), r#""<\/b>""#);
    }

    #[test]
    fn unencodable_data_is_an_error() {
        let keyed_by_bytes = std::collections::BTreeMap::from([(vec![1u8], 1)]);

        assert!(matches!(
            script_json(&keyed_by_bytes),
            Err(PipelineError::Encode(_))
        ));
    }

    #[test]
    fn html_is_deterministic() {
        let rows = vec![row("A", 1.0, 2.0, 10), row("B", 3.0, 4.0, 20)];

        let first = render_rows(rows.clone()).unwrap().to_html().unwrap();
        let second = render_rows(rows).unwrap().to_html().unwrap();

        assert_eq!(first, second);
    }
}
