//! Best-effort geo-enrichment for notes.
//!
//! [`GeoResolver`] turns a submitter's network address into an approximate
//! [`GeoPoint`]. Resolution never fails loudly: every transport, status, or
//! parse problem is logged and reported as "no coordinates".
//!
//! [`static_map_url`] is the pure companion that turns a set of points into a
//! single static map image URL.

pub mod error;
pub mod hostip;
pub mod map;

use std::{future::Future, net::IpAddr};

use notebook_core::note::GeoPoint;

pub use error::GeoError;
pub use hostip::HostIpResolver;
pub use map::{MapConfig, static_map_url};

/// Resolve a network address to approximate coordinates.
pub trait GeoResolver: Send + Sync {
  /// Returns `None` on any failure; never propagates an error.
  fn resolve(
    &self,
    addr: IpAddr,
  ) -> impl Future<Output = Option<GeoPoint>> + Send + '_;
}

/// Resolver used when enrichment is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl GeoResolver for NoopResolver {
  async fn resolve(&self, _addr: IpAddr) -> Option<GeoPoint> { None }
}

/// An absent resolver resolves nothing; lets callers switch enrichment off
/// without changing types.
impl<G: GeoResolver> GeoResolver for Option<G> {
  async fn resolve(&self, addr: IpAddr) -> Option<GeoPoint> {
    match self {
      Some(inner) => inner.resolve(addr).await,
      None => None,
    }
  }
}

/// Whether `addr` can meaningfully be geolocated. Loopback, private,
/// link-local and similar addresses never can.
pub fn is_routable(addr: IpAddr) -> bool {
  match addr {
    IpAddr::V4(v4) => {
      !(v4.is_loopback()
        || v4.is_private()
        || v4.is_link_local()
        || v4.is_unspecified()
        || v4.is_broadcast()
        || v4.is_multicast()
        || v4.is_documentation())
    }
    IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
      Some(v4) => is_routable(IpAddr::V4(v4)),
      None => {
        !(v6.is_loopback()
          || v6.is_unspecified()
          || v6.is_multicast()
          || v6.is_unique_local()
          || v6.is_unicast_link_local())
      }
    },
  }
}
