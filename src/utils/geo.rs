use serde::{Deserialize, Serialize};

/// Geographic coordinate as used across establishments, parking lots and slots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Polygon vertices, closing point removed. At least 3 vertices.
pub type GeoPolygon = Vec<LatLng>;

fn to_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Extracts the inner coordinate text of a WKT literal, e.g.
/// `POINT (lng lat)` -> `lng lat`, `POLYGON ((a, b, c))` -> `a, b, c`.
fn wkt_body<'a>(input: &'a str, keyword: &str, parens: usize) -> Option<&'a str> {
    let trimmed = input.trim();
    let head = trimmed.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let mut rest = trimmed[keyword.len()..].trim_start();
    for _ in 0..parens {
        rest = rest.strip_prefix('(')?.trim_start();
    }
    let mut body = rest.trim_end();
    for _ in 0..parens {
        body = body.strip_suffix(')')?.trim_end();
    }
    Some(body)
}

fn parse_wkt_pair(pair: &str) -> Option<LatLng> {
    let mut parts = pair.split_whitespace();
    let lng = parts.next()?.parse::<f64>().ok()?;
    let lat = parts.next()?.parse::<f64>().ok()?;
    if !lng.is_finite() || !lat.is_finite() {
        return None;
    }
    Some(LatLng {
        latitude: lat,
        longitude: lng,
    })
}

/// Accepts WKT `POINT(lng lat)`, `[lng, lat]` arrays and
/// `{latitude, longitude}` / `{lat, lng}` / `{coordinates}` objects.
pub fn parse_lat_lng(value: &serde_json::Value) -> Option<LatLng> {
    match value {
        serde_json::Value::String(s) => wkt_body(s, "POINT", 1).and_then(parse_wkt_pair),
        serde_json::Value::Array(items) if items.len() >= 2 => {
            let lng = to_number(&items[0])?;
            let lat = to_number(&items[1])?;
            Some(LatLng {
                latitude: lat,
                longitude: lng,
            })
        }
        serde_json::Value::Object(map) => {
            if let (Some(lat), Some(lng)) = (map.get("latitude"), map.get("longitude")) {
                return Some(LatLng {
                    latitude: to_number(lat)?,
                    longitude: to_number(lng)?,
                });
            }
            if let (Some(lat), Some(lng)) = (map.get("lat"), map.get("lng")) {
                return Some(LatLng {
                    latitude: to_number(lat)?,
                    longitude: to_number(lng)?,
                });
            }
            map.get("coordinates").and_then(parse_lat_lng)
        }
        _ => None,
    }
}

/// Drops a repeated closing point and rejects polygons with fewer than 3
/// remaining vertices.
fn normalize_polygon(mut points: Vec<LatLng>) -> Option<GeoPolygon> {
    if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
        if points.len() > 1 && first == last {
            points.pop();
        }
    }
    if points.len() >= 3 { Some(points) } else { None }
}

/// Accepts WKT `POLYGON((lng lat, ...))`, arrays of points (including the
/// GeoJSON nested-ring form) and `{coordinates}` / `{points}` objects.
pub fn parse_polygon(value: &serde_json::Value) -> Option<GeoPolygon> {
    match value {
        serde_json::Value::String(s) => {
            let body = wkt_body(s, "POLYGON", 2)?;
            let points: Vec<LatLng> = body
                .split(',')
                .map(str::trim)
                .filter(|chunk| !chunk.is_empty())
                .filter_map(parse_wkt_pair)
                .collect();
            normalize_polygon(points)
        }
        serde_json::Value::Array(items) => {
            // GeoJSON polygons nest rings one level deeper; take the outer ring.
            if let Some(serde_json::Value::Array(inner)) = items.first() {
                if inner.first().map(serde_json::Value::is_array).unwrap_or(false) {
                    return parse_polygon(&items[0]);
                }
            }
            let points: Vec<LatLng> = items.iter().filter_map(parse_lat_lng).collect();
            normalize_polygon(points)
        }
        serde_json::Value::Object(map) => map
            .get("coordinates")
            .or_else(|| map.get("points"))
            .and_then(parse_polygon),
        _ => None,
    }
}

pub fn lat_lng_to_json(point: &LatLng) -> serde_json::Value {
    serde_json::json!({ "latitude": point.latitude, "longitude": point.longitude })
}

pub fn polygon_to_json(polygon: &GeoPolygon) -> serde_json::Value {
    serde_json::Value::Array(polygon.iter().map(lat_lng_to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wkt_point() {
        let parsed = parse_lat_lng(&json!("POINT(-58.3816 -34.6037)")).unwrap();
        assert_eq!(parsed.longitude, -58.3816);
        assert_eq!(parsed.latitude, -34.6037);
    }

    #[test]
    fn parses_point_objects_and_arrays() {
        let from_array = parse_lat_lng(&json!([-58.4, -34.6])).unwrap();
        assert_eq!(from_array.latitude, -34.6);

        let from_object = parse_lat_lng(&json!({"latitude": -34.6, "longitude": -58.4})).unwrap();
        assert_eq!(from_object.longitude, -58.4);

        let from_short = parse_lat_lng(&json!({"lat": "-34.6", "lng": "-58.4"})).unwrap();
        assert_eq!(from_short.latitude, -34.6);
    }

    #[test]
    fn rejects_non_coordinates() {
        assert!(parse_lat_lng(&json!("POINT(abc def)")).is_none());
        assert!(parse_lat_lng(&json!(42)).is_none());
        assert!(parse_lat_lng(&json!({"latitude": -34.6})).is_none());
    }

    #[test]
    fn parses_wkt_polygon_and_drops_closing_point() {
        let wkt = "POLYGON((-58.4 -34.6, -58.4 -34.5, -58.3 -34.5, -58.4 -34.6))";
        let polygon = parse_polygon(&json!(wkt)).unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(polygon[0].longitude, -58.4);
    }

    #[test]
    fn parses_geojson_nested_ring() {
        let value = json!([[[-58.4, -34.6], [-58.4, -34.5], [-58.3, -34.5], [-58.4, -34.6]]]);
        let polygon = parse_polygon(&value).unwrap();
        assert_eq!(polygon.len(), 3);
    }

    #[test]
    fn rejects_degenerate_polygon() {
        assert!(parse_polygon(&json!([[-58.4, -34.6], [-58.4, -34.5]])).is_none());
        assert!(parse_polygon(&json!("POLYGON(())")).is_none());
    }
}
