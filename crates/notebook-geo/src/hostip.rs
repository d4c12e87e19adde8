//! IP geolocation against a hostip-style XML service.
//!
//! The service is queried with `GET <endpoint>?ip=<addr>` and answers with a
//! small GML document. The only element read is `coordinates`, whose text is
//! `lon,lat`:
//!
//! ```xml
//! <gml:Point>
//!   <gml:coordinates>-122.0838,37.3861</gml:coordinates>
//! </gml:Point>
//! ```

use std::{net::IpAddr, time::Duration};

use notebook_core::note::GeoPoint;
use quick_xml::events::Event;
use reqwest::Client;

use crate::{GeoResolver, error::GeoError, is_routable};

pub const DEFAULT_ENDPOINT: &str = "http://api.hostip.info/";

/// Resolver backed by a hostip-compatible HTTP endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HostIpResolver {
  client:   Client,
  endpoint: String,
}

impl HostIpResolver {
  /// Build a resolver whose every lookup is bounded by `timeout`.
  pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GeoError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, endpoint: endpoint.into() })
  }

  /// Perform the lookup, surfacing every failure.
  pub async fn lookup(&self, addr: IpAddr) -> Result<GeoPoint, GeoError> {
    let resp = self
      .client
      .get(&self.endpoint)
      .query(&[("ip", addr.to_string())])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(GeoError::Status(status.as_u16()));
    }

    let body = resp.bytes().await?;
    parse_coordinates(&body)
  }
}

impl GeoResolver for HostIpResolver {
  async fn resolve(&self, addr: IpAddr) -> Option<GeoPoint> {
    if !is_routable(addr) {
      tracing::debug!(%addr, "skipping geo lookup for non-routable address");
      return None;
    }

    match self.lookup(addr).await {
      Ok(point) => Some(point),
      Err(GeoError::NoCoordinates) => {
        tracing::debug!(%addr, "geo lookup found no location");
        None
      }
      Err(e) => {
        tracing::warn!(%addr, error = %e, "geo lookup failed");
        None
      }
    }
  }
}

/// Extract the first `coordinates` pair from a lookup response.
pub fn parse_coordinates(xml: &[u8]) -> Result<GeoPoint, GeoError> {
  let mut reader = quick_xml::Reader::from_reader(xml);
  reader.config_mut().trim_text(true);

  let mut in_coordinates = false;
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) => {
        if local_name(e.name().as_ref()) == b"coordinates" {
          in_coordinates = true;
        }
      }
      Ok(Event::Text(ref e)) if in_coordinates => {
        let text = e.unescape().map_err(|e| GeoError::Xml(e.to_string()))?;
        return parse_lon_lat(&text);
      }
      Ok(Event::End(ref e)) => {
        if local_name(e.name().as_ref()) == b"coordinates" {
          in_coordinates = false;
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(GeoError::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  Err(GeoError::NoCoordinates)
}

/// Parse `lon,lat` (GML order) into a point.
fn parse_lon_lat(text: &str) -> Result<GeoPoint, GeoError> {
  let malformed = || GeoError::MalformedCoordinates(text.to_owned());

  let (lon, lat) = text.split_once(',').ok_or_else(malformed)?;
  let lon: f64 = lon.trim().parse().map_err(|_| malformed())?;
  let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
  GeoPoint::new(lat, lon).ok_or_else(malformed)
}

/// Strip an XML namespace prefix (`gml:coordinates` → `coordinates`).
fn local_name(name: &[u8]) -> &[u8] {
  match name.iter().position(|&b| b == b':') {
    Some(i) => &name[i + 1..],
    None => name,
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  const FOUND: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<HostipLookupResultSet version="1.0.1" xmlns:gml="http://www.opengis.net/gml">
 <gml:description>This is the Hostip Lookup Service</gml:description>
 <gml:featureMember>
  <Hostip>
   <ip>8.8.8.8</ip>
   <gml:name>Mountain View, CA</gml:name>
   <countryName>UNITED STATES</countryName>
   <ipLocation>
    <gml:pointProperty>
     <gml:Point srsName="http://www.opengis.net/gml/srs/epsg.xml#4326">
      <gml:coordinates>-122.0838,37.3861</gml:coordinates>
     </gml:Point>
    </gml:pointProperty>
   </ipLocation>
  </Hostip>
 </gml:featureMember>
</HostipLookupResultSet>"#;

  const UNKNOWN: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<HostipLookupResultSet version="1.0.1" xmlns:gml="http://www.opengis.net/gml">
 <gml:featureMember>
  <Hostip>
   <gml:name>(Unknown City?)</gml:name>
   <countryName>(Unknown Country?)</countryName>
  </Hostip>
 </gml:featureMember>
</HostipLookupResultSet>"#;

  #[test]
  fn parses_lon_lat_order() {
    let p = parse_coordinates(FOUND.as_bytes()).unwrap();
    assert_eq!(p.lat, 37.3861);
    assert_eq!(p.lon, -122.0838);
  }

  #[test]
  fn missing_location_is_no_coordinates() {
    assert!(matches!(
      parse_coordinates(UNKNOWN.as_bytes()),
      Err(GeoError::NoCoordinates)
    ));
  }

  #[test]
  fn garbage_coordinates_are_malformed() {
    let xml = b"<r><gml:coordinates>north,south</gml:coordinates></r>";
    assert!(matches!(
      parse_coordinates(xml),
      Err(GeoError::MalformedCoordinates(_))
    ));

    let xml = b"<r><coordinates>10.0</coordinates></r>";
    assert!(matches!(
      parse_coordinates(xml),
      Err(GeoError::MalformedCoordinates(_))
    ));

    let xml = b"<r><coordinates>10.0,95.0</coordinates></r>";
    assert!(matches!(
      parse_coordinates(xml),
      Err(GeoError::MalformedCoordinates(_))
    ));
  }

  #[test]
  fn broken_xml_is_an_error() {
    assert!(parse_coordinates(b"<a><b></a>").is_err());
  }

  // ── Live resolver against a local stub service ───────────────────────────

  async fn serve(status: u16, body: &'static str) -> String {
    use axum::{Router, http::StatusCode, routing::get};

    let status = StatusCode::from_u16(status).unwrap();
    let app = Router::new().route("/", get(move || async move { (status, body) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/")
  }

  fn public() -> IpAddr { "8.8.8.8".parse().unwrap() }

  #[tokio::test]
  async fn resolves_from_service() {
    let endpoint = serve(200, FOUND).await;
    let resolver = HostIpResolver::new(endpoint, Duration::from_secs(5)).unwrap();
    let p = resolver.resolve(public()).await.unwrap();
    assert_eq!(p, GeoPoint::new(37.3861, -122.0838).unwrap());
  }

  #[tokio::test]
  async fn server_error_resolves_to_none() {
    let endpoint = serve(500, "boom").await;
    let resolver = HostIpResolver::new(endpoint, Duration::from_secs(5)).unwrap();
    assert!(matches!(resolver.lookup(public()).await, Err(GeoError::Status(500))));
    assert_eq!(resolver.resolve(public()).await, None);
  }

  #[tokio::test]
  async fn unreachable_service_resolves_to_none() {
    // Bind then drop a listener so the port is known to be closed.
    let addr = {
      let l = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
      l.local_addr().unwrap()
    };
    let resolver =
      HostIpResolver::new(format!("http://{addr}/"), Duration::from_millis(500)).unwrap();
    assert_eq!(resolver.resolve(public()).await, None);
  }

  #[tokio::test]
  async fn slow_service_times_out_to_none() {
    use axum::{Router, routing::get};

    let app = Router::new().route(
      "/",
      get(|| async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        FOUND
      }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let resolver =
      HostIpResolver::new(format!("http://{addr}/"), Duration::from_millis(200)).unwrap();
    let started = std::time::Instant::now();
    assert!(matches!(resolver.lookup(public()).await, Err(GeoError::Transport(_))));
    assert_eq!(resolver.resolve(public()).await, None);
    assert!(started.elapsed() < Duration::from_secs(5));
  }

  #[tokio::test]
  async fn loopback_is_never_looked_up() {
    let endpoint = serve(200, FOUND).await;
    let resolver = HostIpResolver::new(endpoint, Duration::from_secs(5)).unwrap();
    assert_eq!(resolver.resolve("127.0.0.1".parse().unwrap()).await, None);
  }
}
