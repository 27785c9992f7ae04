use serde::Serialize;

/// Latitude and longitude in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    /// `[lat, lon]`, the pair order Leaflet expects.
    pub fn as_pair(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}
