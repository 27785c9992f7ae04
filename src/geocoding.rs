//! Turning stop addresses into coordinates.
pub mod cache;
pub mod nominatim;
pub mod rate_limit;

use std::future::Future;
use std::time::Duration;

pub use cache::CachedGeocoder;
pub use nominatim::NominatimClient;
pub use rate_limit::RateLimited;

use tracing::{info, warn};

use crate::model::{Coordinate, Stop};

/// Upstream usage policy, applies to every remote geocoder.
pub const MIN_DELAY: Duration = Duration::from_secs(1);

pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the service answered but knows no such address.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, GeocodeError>> + Send;
}

#[derive(thiserror::Error, Debug)]
pub enum GeocodeError {
    #[error("error requesting the geocoding service")]
    Http(#[from] reqwest::Error),

    #[error("error parsing the geocoding response \n{source} \n{body}")]
    Parse {
        source: serde_json::Error,
        body: String,
    },

    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
}

/// A registry entry paired with its geocoding result.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStop {
    /// Zero-based position in the registry at trigger time.
    pub position: usize,
    pub stop: Stop,
    pub coordinate: Option<Coordinate>,
}

/// One result per address, in order. Failures are logged and count as unresolved.
async fn geocode_each<G: Geocoder>(geocoder: &G, addresses: &[&str]) -> Vec<Option<Coordinate>> {
    let mut results = Vec::with_capacity(addresses.len());

    for address in addresses {
        let coordinate = match geocoder.geocode(address).await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!("geocoding {address:?} failed: {e}");
                None
            }
        };
        if coordinate.is_none() {
            info!("couldn't resolve {address:?}");
        }
        results.push(coordinate);
    }

    results
}

/// Coordinates of the addresses that resolved, in input order. Unresolved
/// addresses are left out, so the output can be shorter than the input.
#[tracing::instrument(skip(geocoder))]
pub async fn geocode_addresses<G: Geocoder>(geocoder: &G, addresses: &[&str]) -> Vec<Coordinate> {
    geocode_each(geocoder, addresses)
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Geocodes every stop, keeping unresolved ones so results stay aligned with the registry.
#[tracing::instrument(skip_all, fields(stops = stops.len()))]
pub async fn resolve_stops<G: Geocoder>(geocoder: &G, stops: &[Stop]) -> Vec<ResolvedStop> {
    let addresses: Vec<&str> = stops.iter().map(|s| s.address.as_str()).collect();
    let coordinates = geocode_each(geocoder, &addresses).await;

    stops
        .iter()
        .zip(coordinates)
        .enumerate()
        .map(|(position, (stop, coordinate))| ResolvedStop {
            position,
            stop: stop.clone(),
            coordinate,
        })
        .collect()
}
