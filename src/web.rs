//! HTTP surface: the stop form, the list view and the route map.
pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::Mutex;

use crate::{geocoding::Geocoder, registry::StopRegistry};

/// Everything one session owns. The registry lives here and nowhere else.
pub struct AppState<G> {
    pub registry: Arc<Mutex<StopRegistry>>,
    pub geocoder: Arc<G>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        AppState {
            registry: Arc::clone(&self.registry),
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

impl<G: Geocoder> AppState<G> {
    pub fn new(geocoder: G) -> Self {
        AppState {
            registry: Arc::new(Mutex::new(StopRegistry::new())),
            geocoder: Arc::new(geocoder),
        }
    }
}

pub fn router<G: Geocoder + 'static>(state: AppState<G>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<G>))
        .route("/stops", post(handlers::add_stop::<G>))
        .route("/stops/{index}/delete", post(handlers::delete_stop::<G>))
        .route("/route", post(handlers::show_route::<G>))
        .route("/api/stops", get(handlers::list_stops::<G>))
        .route("/api/coordinates", get(handlers::list_coordinates::<G>))
        .with_state(state)
}
