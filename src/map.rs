//! Builds the route map from geocoded stops and renders it as a Leaflet fragment.
//!
//! The map only displays the registry order. It doesn't reorder stops or
//! compute any distance.
use serde::Serialize;

use crate::{
    geocoding::ResolvedStop,
    model::{Coordinate, StopKind},
    utils::escape_html,
};

pub const PICKUP_COLOR: &str = "blue";
pub const DELIVERY_COLOR: &str = "green";
pub const LINE_COLOR: &str = "red";
pub const LINE_WEIGHT: u8 = 3;
pub const DEFAULT_ZOOM: u8 = 6;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub fn marker_color(kind: StopKind) -> &'static str {
    match kind {
        StopKind::Pickup => PICKUP_COLOR,
        StopKind::Delivery => DELIVERY_COLOR,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub position: [f64; 2],
    pub color: &'static str,
    pub tooltip: String,
    pub popup: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteLine {
    pub points: Vec<[f64; 2]>,
    pub color: &'static str,
    pub weight: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub line: RouteLine,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MapError {
    #[error("At least two valid addresses are required.")]
    InsufficientCoordinates { resolved: usize },
}

/// One marker per resolved stop, in registry order, joined by a single line.
///
/// Marker labels use the stop's registry position so they match the list view
/// even when earlier stops didn't resolve.
pub fn build_map(resolved: &[ResolvedStop]) -> Result<MapView, MapError> {
    let placed: Vec<(&ResolvedStop, Coordinate)> = resolved
        .iter()
        .filter_map(|r| r.coordinate.map(|c| (r, c)))
        .collect();

    let Some((_, first)) = placed.first() else {
        return Err(MapError::InsufficientCoordinates { resolved: 0 });
    };
    if placed.len() < 2 {
        return Err(MapError::InsufficientCoordinates {
            resolved: placed.len(),
        });
    }

    let markers = placed
        .iter()
        .map(|(r, coordinate)| {
            let n = r.position + 1;
            Marker {
                position: coordinate.as_pair(),
                color: marker_color(r.stop.kind),
                tooltip: format!("Step {n}"),
                popup: format!("{n}. {} - {}", r.stop.kind, r.stop.address),
            }
        })
        .collect();

    Ok(MapView {
        center: first.as_pair(),
        zoom: DEFAULT_ZOOM,
        markers,
        line: RouteLine {
            points: placed.iter().map(|(_, c)| c.as_pair()).collect(),
            color: LINE_COLOR,
            weight: LINE_WEIGHT,
        },
    })
}

impl MapView {
    /// A map container plus the script drawing this view. Needs Leaflet loaded on the page.
    pub fn to_html(&self, element_id: &str) -> Result<String, serde_json::Error> {
        // JSON is embedded in a <script>, so "</script>" inside an address must not survive
        let view = serde_json::to_string(self)?.replace('<', "\\u003c");
        let element_id = escape_html(element_id);

        Ok(format!(
            r#"<div id="{element_id}" class="route-map" style="width: 700px; height: 500px;"></div>
<script>
(function () {{
  const view = {view};
  const map = L.map("{element_id}").setView(view.center, view.zoom);
  L.tileLayer("{TILE_URL}", {{ maxZoom: 19, attribution: '{TILE_ATTRIBUTION}' }}).addTo(map);
  for (const marker of view.markers) {{
    L.circleMarker(marker.position, {{ radius: 9, color: marker.color, fillColor: marker.color, fillOpacity: 0.9 }})
      .bindTooltip(marker.tooltip)
      .bindPopup(document.createTextNode(marker.popup))
      .addTo(map);
  }}
  L.polyline(view.line.points, {{ color: view.line.color, weight: view.line.weight }}).addTo(map);
}})();
</script>"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stop::tests::stop;

    fn resolved(kind: StopKind, address: &str, position: usize, coordinate: Option<(f64, f64)>) -> ResolvedStop {
        ResolvedStop {
            position,
            stop: stop(kind, address),
            coordinate: coordinate.map(|(lat, lon)| Coordinate::new(lat, lon)),
        }
    }

    #[test]
    fn test_two_stops_one_line() -> Result<(), MapError> {
        let view = build_map(&[
            resolved(StopKind::Pickup, "10 Rue de Paris, Lyon", 0, Some((45.764, 4.835))),
            resolved(StopKind::Delivery, "5 Avenue Victor Hugo, Lyon", 1, Some((45.755, 4.829))),
        ])?;

        assert_eq!(view.center, [45.764, 4.835]);
        assert_eq!(view.zoom, DEFAULT_ZOOM);
        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[0].position, [45.764, 4.835]);
        assert_eq!(view.markers[1].position, [45.755, 4.829]);
        assert_eq!(view.line.points, vec![[45.764, 4.835], [45.755, 4.829]]);
        assert_eq!(view.line.color, LINE_COLOR);
        assert_eq!(view.line.weight, LINE_WEIGHT);

        assert_eq!(view.markers[0].tooltip, "Step 1");
        assert_eq!(view.markers[0].popup, "1. Pickup - 10 Rue de Paris, Lyon");
        assert_eq!(view.markers[1].popup, "2. Delivery - 5 Avenue Victor Hugo, Lyon");

        Ok(())
    }

    #[test]
    fn test_insufficient_coordinates() {
        assert_eq!(
            build_map(&[]),
            Err(MapError::InsufficientCoordinates { resolved: 0 })
        );
        assert_eq!(
            build_map(&[
                resolved(StopKind::Pickup, "a", 0, Some((1.0, 1.0))),
                resolved(StopKind::Pickup, "b", 1, None),
            ]),
            Err(MapError::InsufficientCoordinates { resolved: 1 })
        );
    }

    #[test]
    fn test_color_depends_only_on_kind() -> Result<(), MapError> {
        let mut stops = vec![];
        for (i, kind) in [StopKind::Pickup, StopKind::Delivery, StopKind::Pickup, StopKind::Delivery]
            .into_iter()
            .enumerate()
        {
            let mut r = resolved(kind, "x", i, Some((i as f64, 0.0)));
            r.stop.priority = ((i % 3) as u8 + 1).try_into().unwrap();
            r.stop.comment = (i % 2 == 0).then(|| "fragile".to_string());
            stops.push(r);
        }

        let view = build_map(&stops)?;

        let colors: Vec<_> = view.markers.iter().map(|m| m.color).collect();
        assert_eq!(colors, [PICKUP_COLOR, DELIVERY_COLOR, PICKUP_COLOR, DELIVERY_COLOR]);

        Ok(())
    }

    #[test]
    fn test_unresolved_stop_keeps_labels_aligned() -> Result<(), MapError> {
        let view = build_map(&[
            resolved(StopKind::Pickup, "a", 0, Some((1.0, 1.0))),
            resolved(StopKind::Delivery, "lost", 1, None),
            resolved(StopKind::Delivery, "c", 2, Some((3.0, 3.0))),
        ])?;

        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[1].tooltip, "Step 3");
        assert_eq!(view.markers[1].popup, "3. Delivery - c");
        assert_eq!(view.markers[1].color, DELIVERY_COLOR);
        assert_eq!(view.line.points, vec![[1.0, 1.0], [3.0, 3.0]]);

        Ok(())
    }

    #[test]
    fn test_to_html_escapes_script_end() -> Result<(), anyhow::Error> {
        let view = build_map(&[
            resolved(StopKind::Pickup, "</script><b>x", 0, Some((1.0, 1.0))),
            resolved(StopKind::Delivery, "b", 1, Some((2.0, 2.0))),
        ])?;

        let html = view.to_html("map")?;

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r#"<div id="map""#));
        assert!(html.contains("\\u003c/script>\\u003cb>x"));

        Ok(())
    }
}
