use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{debug, error, info, warn};

use super::{
    AppState,
    page::{RouteSection, render_page},
};
use crate::{
    geocoding::{Geocoder, geocode_addresses, resolve_stops},
    map::{MapError, build_map},
    model::{Coordinate, Stop, StopForm},
};

#[tracing::instrument(skip_all)]
pub async fn index<G: Geocoder>(State(state): State<AppState<G>>) -> Html<String> {
    let registry = state.registry.lock().await;
    Html(render_page(registry.list_all(), None))
}

/// Invalid submissions are dropped without a message, the form just comes back.
/// That includes fields the form extractor can't decode, like `priority=300`.
#[tracing::instrument(skip(state))]
pub async fn add_stop<G: Geocoder>(
    State(state): State<AppState<G>>,
    form: Result<Form<StopForm>, FormRejection>,
) -> Redirect {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("ignoring undecodable submission: {rejection}");
            return Redirect::to("/");
        }
    };

    match Stop::try_from(form) {
        Ok(stop) => {
            let mut registry = state.registry.lock().await;
            info!("adding {} stop at {:?}", stop.kind, stop.address);
            registry.add(stop);
        }
        Err(e) => debug!("ignoring submission: {e}"),
    }

    Redirect::to("/")
}

#[tracing::instrument(skip(state))]
pub async fn delete_stop<G: Geocoder>(
    State(state): State<AppState<G>>,
    Path(index): Path<usize>,
) -> Redirect {
    let mut registry = state.registry.lock().await;
    match registry.remove_at(index) {
        Some(stop) => info!("removed stop {} at {:?}", index + 1, stop.address),
        None => warn!("no stop at index {index}, {} stops registered", registry.len()),
    }

    Redirect::to("/")
}

/// Geocodes the current stops and shows them on a map in entry order.
#[tracing::instrument(skip_all)]
pub async fn show_route<G: Geocoder>(State(state): State<AppState<G>>) -> Response {
    // snapshot so the registry isn't locked during the slow geocoding calls
    let stops = {
        let registry = state.registry.lock().await;
        if registry.is_empty() {
            return Redirect::to("/").into_response();
        }
        registry.list_all().to_vec()
    };

    let resolved = resolve_stops(state.geocoder.as_ref(), &stops).await;
    let unresolved = resolved
        .iter()
        .filter(|r| r.coordinate.is_none())
        .map(|r| r.position)
        .collect();

    let section = match build_map(&resolved) {
        Ok(view) => match view.to_html("map") {
            Ok(map_html) => RouteSection::Map {
                map_html,
                unresolved,
            },
            Err(e) => {
                error!("couldn't serialize map view: {e}");
                RouteSection::Warning(e.to_string())
            }
        },
        Err(e @ MapError::InsufficientCoordinates { resolved: count }) => {
            info!("only {count} of {} stops resolved, not rendering map", stops.len());
            RouteSection::Warning(e.to_string())
        }
    };

    Html(render_page(&stops, Some(section))).into_response()
}

pub async fn list_stops<G: Geocoder>(State(state): State<AppState<G>>) -> Json<Vec<Stop>> {
    Json(state.registry.lock().await.list_all().to_vec())
}

/// Coordinates of the stops that resolved, in registry order. Unresolved stops
/// are left out, use the page for a per-stop view.
#[tracing::instrument(skip_all)]
pub async fn list_coordinates<G: Geocoder>(
    State(state): State<AppState<G>>,
) -> Json<Vec<Coordinate>> {
    let addresses: Vec<String> = state
        .registry
        .lock()
        .await
        .list_all()
        .iter()
        .map(|s| s.address.clone())
        .collect();
    let addresses: Vec<&str> = addresses.iter().map(String::as_str).collect();

    Json(geocode_addresses(state.geocoder.as_ref(), &addresses).await)
}
