//! The session's ordered list of stops.
use crate::model::Stop;

/// Stops in insertion order. Nothing here sorts by time or priority.
#[derive(Debug, Default)]
pub struct StopRegistry {
    stops: Vec<Stop>,
}

impl StopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    /// Removes the stop at `index`, shifting the following ones left.
    /// Returns `None` and leaves the registry untouched if `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<Stop> {
        (index < self.stops.len()).then(|| self.stops.remove(index))
    }

    pub fn list_all(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
