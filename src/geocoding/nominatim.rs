//! Client for the OpenStreetMap Nominatim search API
use std::time::Duration;

use reqwest::{
    Client,
    header::{ACCEPT, HeaderValue},
};
use serde::Deserialize;
use tracing::{Instrument, debug, info_span};

use super::{GeocodeError, Geocoder};
use crate::model::Coordinate;

pub struct NominatimClient {
    client: Client,
    search_url: String,
}

impl NominatimClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(NominatimClient {
            client,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
        })
    }
}

impl Geocoder for NominatimClient {
    #[tracing::instrument(skip(self), err)]
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .instrument(info_span!("Fetching geocode"))
            .await?
            .error_for_status()?;

        let body = response
            .text()
            .instrument(info_span!("Reading body of response"))
            .await?;

        let coordinate = parse_search_response(&body)?;
        debug!(?coordinate);

        Ok(coordinate)
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    /// Nominatim sends coordinates as strings
    lat: String,
    lon: String,
}

/// First hit of a `format=json` search response, `None` when the array is empty.
fn parse_search_response(body: &str) -> Result<Option<Coordinate>, GeocodeError> {
    let places: Vec<Place> = serde_json::from_str(body).map_err(|source| GeocodeError::Parse {
        source,
        body: body.to_string(),
    })?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let lat: f64 = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::InvalidCoordinate(place.lat.clone()))?;
    let lon: f64 = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::InvalidCoordinate(place.lon.clone()))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(GeocodeError::InvalidCoordinate(format!("{lat},{lon}")));
    }

    Ok(Some(Coordinate::new(lat, lon)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() -> Result<(), anyhow::Error> {
        let body = r##"[{"place_id":87412563,"licence":"Data © OpenStreetMap contributors, ODbL 1.0. http://osm.org/copyright","osm_type":"way","osm_id":29005396,"lat":"45.7640430","lon":"4.8356590","class":"highway","type":"residential","place_rank":26,"importance":0.10001,"addresstype":"road","name":"Rue de Paris","display_name":"Rue de Paris, Lyon, Métropole de Lyon, Auvergne-Rhône-Alpes, France métropolitaine, 69001, France","boundingbox":["45.7636","45.7645","4.8350","4.8362"]}]"##;

        let coordinate = parse_search_response(body)?;

        assert_eq!(coordinate, Some(Coordinate::new(45.764043, 4.835659)));

        Ok(())
    }

    #[test]
    fn test_parse_empty_response() -> Result<(), anyhow::Error> {
        assert_eq!(parse_search_response("[]")?, None);
        Ok(())
    }

    #[test]
    fn test_parse_garbage() {
        match parse_search_response("<html>Too Many Requests</html>") {
            Err(GeocodeError::Parse { body, .. }) => assert!(body.contains("Too Many Requests")),
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            parse_search_response(r#"[{"lat":"north","lon":"4.8"}]"#),
            Err(GeocodeError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            parse_search_response(r#"[{"lat":"95.0","lon":"4.8"}]"#),
            Err(GeocodeError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_search_url() -> Result<(), anyhow::Error> {
        let client = NominatimClient::new(
            "https://nominatim.openstreetmap.org/",
            "dispatch_app",
            Duration::from_secs(10),
        )?;

        assert_eq!(
            client.search_url,
            "https://nominatim.openstreetmap.org/search"
        );

        Ok(())
    }
}
