//! Bounded, expiring memo of geocoding results keyed by normalized address.
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::{GeocodeError, Geocoder};
use crate::{model::Coordinate, utils::normalize_address};

#[derive(Copy, Clone, Debug)]
struct CacheEntry {
    coordinate: Option<Coordinate>,
    inserted_at: Instant,
}

pub struct CachedGeocoder<G> {
    inner: G,
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, ttl: Duration, capacity: usize) -> Self {
        CachedGeocoder {
            inner,
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, key: &str) -> Option<Option<Coordinate>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = *entries.get(key)?;

        if entry.inserted_at.elapsed() >= self.ttl {
            entries.remove(key);
            return None;
        }

        Some(entry.coordinate)
    }

    fn store(&self, key: String, coordinate: Option<Coordinate>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!("evicting {oldest:?} from geocoding cache");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                coordinate,
                inserted_at: now,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let key = normalize_address(address);

        if let Some(coordinate) = self.lookup(&key) {
            debug!("geocoding cache hit for {key:?}");
            return Ok(coordinate);
        }

        // errors are not cached so the next trigger asks again
        let coordinate = self.inner.geocode(address).await?;
        self.store(key, coordinate);

        Ok(coordinate)
    }
}
