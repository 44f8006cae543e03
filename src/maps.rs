use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::MapsConfig,
    error::{InviteError, Result},
    models::{Coordinates, Venue},
};

const ZOOM: u8 = 16;
const SIZE: &str = "600x400";

#[async_trait]
pub trait MapFetcher: Send + Sync {
    async fn fetch_map(&self, lat: f64, lon: f64, label: &str) -> Result<Vec<u8>>;
}

/// Static map snapshots for the location page.
#[derive(Clone)]
pub struct MapClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MapClient {
    pub fn new(config: &MapsConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.static_maps_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Map for a venue, centred on Seoul when the venue has no coordinates.
    pub async fn fetch_venue_map(&self, venue: &Venue) -> Result<Vec<u8>> {
        let Coordinates {
            latitude,
            longitude,
        } = venue.coordinates.unwrap_or_default();
        self.fetch_map(latitude, longitude, &venue.name).await
    }
}

/// Query parameters for one snapshot; the marker is labelled with the first
/// character of the venue name.
pub fn static_map_query(lat: f64, lon: f64, label: &str, api_key: &str) -> Vec<(String, String)> {
    let center = format!("{:.6},{:.6}", lat, lon);
    let mut marker = String::from("color:red");
    if let Some(first) = label.trim().chars().next() {
        marker.push_str(&format!("|label:{}", first));
    }
    marker.push_str(&format!("|{}", center));

    vec![
        ("center".to_string(), center),
        ("zoom".to_string(), ZOOM.to_string()),
        ("size".to_string(), SIZE.to_string()),
        ("markers".to_string(), marker),
        ("key".to_string(), api_key.to_string()),
    ]
}

#[async_trait]
impl MapFetcher for MapClient {
    async fn fetch_map(&self, lat: f64, lon: f64, label: &str) -> Result<Vec<u8>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| InviteError::UpstreamMapError("GOOGLE_MAPS_API_KEY is not set".into()))?;

        log::info!("Fetching map snapshot for {} at {:.5},{:.5}", label, lat, lon);

        let response = self
            .client
            .get(&self.base_url)
            .query(&static_map_query(lat, lon, label, api_key))
            .send()
            .await
            .map_err(|e| InviteError::UpstreamMapError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InviteError::UpstreamMapError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| InviteError::UpstreamMapError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::http::stub_server;

    #[test]
    fn query_carries_center_marker_and_key() {
        let query = static_map_query(37.5, 127.0, "서울 웨딩홀", "abc");
        let get = |k: &str| {
            query
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(get("center"), "37.500000,127.000000");
        assert_eq!(get("zoom"), "16");
        assert_eq!(get("size"), "600x400");
        assert_eq!(get("markers"), "color:red|label:서|37.500000,127.000000");
        assert_eq!(get("key"), "abc");
    }

    #[tokio::test]
    async fn missing_key_is_map_error() {
        let client = MapClient::new(&MapsConfig::default(), Client::new());
        let err = client
            .fetch_venue_map(&Venue::new("서울 웨딩홀", "서울시"))
            .await
            .unwrap_err();
        assert!(matches!(err, InviteError::UpstreamMapError(_)));
    }

    fn client_at(static_maps_url: String) -> MapClient {
        let config = MapsConfig {
            static_maps_url,
            ..MapsConfig::default()
        }
        .with_api_key("maps-key");
        MapClient::new(&config, Client::new())
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_map_error() {
        let url = format!("{}/maps/api/staticmap", stub_server::UNREACHABLE);
        let err = client_at(url)
            .fetch_map(37.5, 127.0, "서울 웨딩홀")
            .await
            .unwrap_err();
        assert!(matches!(err, InviteError::UpstreamMapError(_)));
    }

    #[tokio::test]
    async fn error_status_is_map_error() {
        let base = stub_server::respond_with(403, "REQUEST_DENIED").await;
        let err = client_at(format!("{}/maps/api/staticmap", base))
            .fetch_map(37.5, 127.0, "서울 웨딩홀")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InviteError::UpstreamMapError(msg) if msg.contains("HTTP 403")
        ));
    }

    #[tokio::test]
    async fn success_returns_body_bytes() {
        let base = stub_server::respond_with(200, "PNGDATA").await;
        let bytes = client_at(format!("{}/maps/api/staticmap", base))
            .fetch_map(37.5, 127.0, "서울 웨딩홀")
            .await
            .unwrap();
        assert_eq!(bytes, b"PNGDATA");
    }
}
