//! Static map image URLs.

use notebook_core::note::GeoPoint;
use serde::Deserialize;
use url::Url;

/// Where and how large the rendered map image is.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
  pub base_url: String,
  pub width:    u32,
  pub height:   u32,
  /// Appended as `key=` when the map service requires one.
  pub api_key:  Option<String>,
}

impl Default for MapConfig {
  fn default() -> Self {
    Self {
      base_url: "https://maps.googleapis.com/maps/api/staticmap".to_owned(),
      width:    700,
      height:   400,
      api_key:  None,
    }
  }
}

/// Build one map URL with a marker for every point.
///
/// Performs no I/O. Returns `None` when there is nothing to mark or the
/// configured base URL is unusable.
pub fn static_map_url(config: &MapConfig, points: &[GeoPoint]) -> Option<String> {
  if points.is_empty() {
    return None;
  }

  let markers = points
    .iter()
    .map(|p| format!("{},{}", p.lat, p.lon))
    .collect::<Vec<_>>()
    .join("|");

  let mut url = match Url::parse(&config.base_url) {
    Ok(u) => u,
    Err(e) => {
      tracing::warn!(base_url = %config.base_url, error = %e, "invalid map base url");
      return None;
    }
  };

  {
    let mut query = url.query_pairs_mut();
    query
      .append_pair("size", &format!("{}x{}", config.width, config.height))
      .append_pair("markers", &markers);
    if let Some(key) = &config.api_key {
      query.append_pair("key", key);
    }
  }

  Some(url.into())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pt(lat: f64, lon: f64) -> GeoPoint { GeoPoint::new(lat, lon).unwrap() }

  #[test]
  fn no_points_no_map() {
    assert_eq!(static_map_url(&MapConfig::default(), &[]), None);
  }

  #[test]
  fn all_points_become_markers() {
    let url = static_map_url(
      &MapConfig::default(),
      &[pt(37.3861, -122.0838), pt(51.5, -0.12)],
    )
    .unwrap();

    let parsed = Url::parse(&url).unwrap();
    assert_eq!(parsed.path(), "/maps/api/staticmap");
    let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("size".into(), "700x400".into())));
    assert!(pairs.contains(&(
      "markers".into(),
      "37.3861,-122.0838|51.5,-0.12".into()
    )));
    assert!(!pairs.iter().any(|(k, _)| k == "key"));
  }

  #[test]
  fn api_key_is_appended() {
    let config = MapConfig { api_key: Some("abc".into()), ..MapConfig::default() };
    let url = static_map_url(&config, &[pt(0.0, 0.0)]).unwrap();
    assert!(url.ends_with("key=abc"), "{url}");
  }

  #[test]
  fn bad_base_url_yields_none() {
    let config = MapConfig { base_url: "not a url".into(), ..MapConfig::default() };
    assert_eq!(static_map_url(&config, &[pt(0.0, 0.0)]), None);
  }
}
