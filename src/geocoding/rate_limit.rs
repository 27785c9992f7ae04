use std::time::Duration;

use tokio::{
    sync::Mutex,
    time::{Instant, sleep_until},
};
use tracing::{Instrument, debug, info_span};

use super::{GeocodeError, Geocoder, MIN_DELAY};
use crate::model::Coordinate;

/// Serializes calls to the inner geocoder and spaces their starts at least `min_delay` apart.
pub struct RateLimited<G> {
    inner: G,
    min_delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl<G: Geocoder> RateLimited<G> {
    /// `min_delay` below [`MIN_DELAY`] is raised to it.
    pub fn new(inner: G, min_delay: Duration) -> Self {
        RateLimited {
            inner,
            min_delay: min_delay.max(MIN_DELAY),
            last_call: Mutex::new(None),
        }
    }
}

impl<G: Geocoder> Geocoder for RateLimited<G> {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let next_allowed = last + self.min_delay;
            if next_allowed > Instant::now() {
                debug!("waiting {:?} before next geocoding call", next_allowed - Instant::now());
                sleep_until(next_allowed)
                    .instrument(info_span!("Rate limiting"))
                    .await;
            }
        }

        *last_call = Some(Instant::now());
        self.inner.geocode(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::tests::FakeGeocoder;

    #[tokio::test(start_paused = true)]
    async fn test_calls_are_spaced() -> Result<(), anyhow::Error> {
        let limited = RateLimited::new(FakeGeocoder::with(&[("a", 1.0, 2.0)]), MIN_DELAY);
        let start = Instant::now();

        limited.geocode("a").await?;
        assert_eq!(Instant::now() - start, Duration::ZERO);

        limited.geocode("b").await?;
        limited.geocode("a").await?;
        assert!(Instant::now() - start >= Duration::from_secs(2));
        assert_eq!(limited.inner.call_count(), 3);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_idle() -> Result<(), anyhow::Error> {
        let limited = RateLimited::new(FakeGeocoder::default(), Duration::from_millis(1500));

        limited.geocode("a").await?;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let before = Instant::now();
        limited.geocode("b").await?;
        assert_eq!(Instant::now() - before, Duration::ZERO);

        Ok(())
    }

    #[test]
    fn test_delay_floor() {
        let limited = RateLimited::new(FakeGeocoder::default(), Duration::from_millis(10));
        assert_eq!(limited.min_delay, MIN_DELAY);
    }
}
