use crate::discrete::types::{EdgeAggregate, NodeAggregate};
use crate::error::{Error, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use std::collections::HashMap;

/// Geospatial feature collection: one point per located location, one
/// line per transition whose endpoints both carry coordinates.
/// Coordinates follow the GeoJSON (longitude, latitude) order.
pub fn render_map_geojson(nodes: &[NodeAggregate], edges: &[EdgeAggregate]) -> Result<Vec<u8>> {
    let located: HashMap<&str, (f64, f64)> = nodes
        .iter()
        .filter_map(|node| {
            match (node.latitude, node.longitude) {
                (Some(latitude), Some(longitude)) => {
                    Some((node.location.as_str(), (latitude, longitude)))
                }
                _ => None,
            }
        })
        .collect();

    let mut features = Vec::new();

    for node in nodes {
        let (Some(latitude), Some(longitude)) = (node.latitude, node.longitude) else {
            continue;
        };
        let mut properties = JsonObject::new();
        properties.insert("location".to_string(), JsonValue::from(node.location.clone()));
        properties.insert(
            "ancestral_weight".to_string(),
            JsonValue::from(node.ancestral_weight),
        );
        properties.insert("tip_weight".to_string(), JsonValue::from(node.tip_weight));
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    for edge in edges {
        let (Some(&(src_lat, src_lon)), Some(&(dst_lat, dst_lon))) = (
            located.get(edge.src.as_str()),
            located.get(edge.dst.as_str()),
        ) else {
            continue;
        };
        let mut properties = JsonObject::new();
        properties.insert("src".to_string(), JsonValue::from(edge.src.clone()));
        properties.insert("dst".to_string(), JsonValue::from(edge.dst.clone()));
        properties.insert("weight".to_string(), JsonValue::from(edge.weight));
        properties.insert("time_median".to_string(), optional(edge.time_median));
        properties.insert("time_hpd_low".to_string(), optional(edge.time_hpd_low));
        properties.insert("time_hpd_high".to_string(), optional(edge.time_hpd_high));
        properties.insert("bayes_factor".to_string(), optional(edge.bayes_factor));
        properties.insert(
            "posterior_support".to_string(),
            optional(edge.posterior_support),
        );
        properties.insert("jumps_mean".to_string(), optional(edge.jumps_mean));
        properties.insert("jumps_hpd_low".to_string(), optional(edge.jumps_hpd_low));
        properties.insert("jumps_hpd_high".to_string(), optional(edge.jumps_hpd_high));
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(vec![
                vec![src_lon, src_lat],
                vec![dst_lon, dst_lat],
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_vec_pretty(&collection)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
}

fn optional(value: Option<f64>) -> JsonValue {
    value.map(JsonValue::from).unwrap_or(JsonValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> NodeAggregate {
        NodeAggregate {
            location: "Berlin".to_string(),
            ancestral_weight: 1.0,
            tip_weight: 0.5,
            latitude: Some(52.52),
            longitude: Some(13.405),
        }
    }

    fn paris() -> NodeAggregate {
        NodeAggregate {
            location: "Paris".to_string(),
            ancestral_weight: 0.3,
            tip_weight: 0.7,
            latitude: Some(48.857),
            longitude: Some(2.352),
        }
    }

    #[test]
    fn test_point_coordinates_are_lon_lat() {
        let bytes = render_map_geojson(&[berlin()], &[]).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let coordinates = &parsed["features"][0]["geometry"]["coordinates"];
        assert_eq!(coordinates[0].as_f64(), Some(13.405));
        assert_eq!(coordinates[1].as_f64(), Some(52.52));
    }

    #[test]
    fn test_lines_require_located_endpoints() {
        let edge = EdgeAggregate {
            src: "Berlin".to_string(),
            dst: "Paris".to_string(),
            weight: 0.4,
            ..EdgeAggregate::default()
        };
        let unlocated = EdgeAggregate {
            src: "Berlin".to_string(),
            dst: "Madrid".to_string(),
            weight: 0.2,
            ..EdgeAggregate::default()
        };
        let bytes =
            render_map_geojson(&[berlin(), paris()], &[edge, unlocated]).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let features = parsed["features"].as_array().unwrap();
        // Two points plus one line; the Madrid edge has no coordinates.
        assert_eq!(features.len(), 3);
        assert_eq!(features[2]["geometry"]["type"], "LineString");
        assert_eq!(features[2]["properties"]["time_median"], serde_json::Value::Null);
    }
}
