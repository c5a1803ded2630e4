use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::field::GeometryKind;

/// The eight numbers that fully determine one visualization.
///
/// Parsing never fails on field level: anything missing, non-numeric or
/// out of domain falls back to the baseline in [`ParameterSet::default`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    pub geometry_type: i32,
    pub density: f32,
    pub speed: f32,
    pub chaos: f32,
    pub morph: f32,
    pub hue: f32,
    pub saturation: f32,
    pub intensity: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            geometry_type: 0,
            density: 1.0,
            speed: 0.5,
            chaos: 0.0,
            morph: 0.0,
            hue: 0.0,
            saturation: 0.8,
            intensity: 0.5,
        }
    }
}

/// Query-string keys in the order they are emitted.
const QUERY_KEYS: [&str; 8] = [
    "geometry",
    "density",
    "speed",
    "chaos",
    "morph",
    "hue",
    "saturation",
    "intensity",
];

impl ParameterSet {
    pub fn geometry(&self) -> GeometryKind {
        GeometryKind::from_index(self.geometry_type)
    }

    /// Build from an arbitrary JSON value. Non-objects yield the defaults.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let base = Self::default();
        Self {
            geometry_type: number(map, &["geometryType", "geometry"])
                .map_or(base.geometry_type, |g| g.floor() as i32),
            density: number(map, &["density"])
                .filter(|d| *d > 0.0)
                .map_or(base.density, |d| d as f32),
            speed: number(map, &["speed"])
                .filter(|s| *s >= 0.0)
                .map_or(base.speed, |s| s as f32),
            chaos: field(map, "chaos", base.chaos),
            morph: field(map, "morph", base.morph),
            hue: field(map, "hue", base.hue),
            saturation: field(map, "saturation", base.saturation),
            intensity: field(map, "intensity", base.intensity),
        }
    }

    /// Parse JSON text. Only a syntax error is reported; bad fields are defaulted.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode `geometry=4&density=1.2&...`. A leading URL or `?` is skipped;
    /// keys and values are percent-decoded (`hue=%2D90` is -90).
    pub fn from_query(query: &str) -> Self {
        let query = query.split_once('?').map_or(query, |(_, q)| q);
        let query = query.split_once('#').map_or(query, |(q, _)| q);
        let map: Map<String, Value> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        Self::from_map(&map)
    }

    pub fn to_query(&self) -> String {
        let values = [
            self.geometry_type.to_string(),
            self.density.to_string(),
            self.speed.to_string(),
            self.chaos.to_string(),
            self.morph.to_string(),
            self.hue.to_string(),
            self.saturation.to_string(),
            self.intensity.to_string(),
        ];
        QUERY_KEYS
            .iter()
            .zip(values.iter())
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(|value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|v| v.is_finite())
}

fn field(map: &Map<String, Value>, key: &str, fallback: f32) -> f32 {
    number(map, &[key]).map_or(fallback, |v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_alias_is_accepted() {
        let p = ParameterSet::from_json(r#"{"geometry": 3}"#).unwrap();
        assert_eq!(p.geometry_type, 3);
        let p = ParameterSet::from_json(r#"{"geometryType": 5, "geometry": 3}"#).unwrap();
        assert_eq!(p.geometry_type, 5);
    }

    #[test]
    fn fractional_geometry_floors_like_the_shader() {
        let p = ParameterSet::from_json(r#"{"geometry": -1.5}"#).unwrap();
        assert_eq!(p.geometry(), GeometryKind::Wave);
    }

    #[test]
    fn query_ignores_fragment_and_prefix() {
        let p = ParameterSet::from_query("demo.html?hue=120&speed=abc#top");
        assert_eq!(p.hue, 120.0);
        assert_eq!(p.speed, 0.5);
    }
}
