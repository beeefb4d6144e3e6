use foundation::math::LngLat;
use serde_json::{Value, json};

/// Encodes a route as a GeoJSON `Feature<LineString>`.
pub fn route_feature(coordinates: &[LngLat]) -> Value {
    let coords: Vec<[f64; 2]> = coordinates.iter().map(|c| c.as_array()).collect();
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "LineString",
            "coordinates": coords,
        },
    })
}

/// Reads the coordinates back out of a `Feature<LineString>`.
pub fn line_string_coordinates(feature: &Value) -> Option<Vec<LngLat>> {
    let geometry = feature.get("geometry")?;
    if geometry.get("type")?.as_str()? != "LineString" {
        return None;
    }
    geometry
        .get("coordinates")?
        .as_array()?
        .iter()
        .map(|pair| {
            let pair = pair.as_array()?;
            let lng = pair.first()?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            Some(LngLat::new(lng, lat))
        })
        .collect()
}
