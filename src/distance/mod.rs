//! Travel distance lookups through the Google Distance Matrix API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::models::Coordinate;

/// Road distance and travel time between two points
#[derive(Debug, Clone, PartialEq)]
pub struct TravelEstimate {
    /// Human readable distance, e.g. `45.3 km`
    pub distance_text: String,

    /// Distance in metres
    pub distance_meters: u64,

    /// Human readable duration, e.g. `1 hour 5 mins`
    pub duration_text: String,
}

impl TravelEstimate {
    /// Distance in kilometres
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }
}

/// Anything that can estimate a road trip
#[async_trait]
pub trait DistanceService: Send + Sync {
    /// Estimate the trip from `origin` to `destination`
    async fn travel(&self, origin: Coordinate, destination: Coordinate) -> Result<TravelEstimate, Error>;
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}

/// Client for the Distance Matrix endpoint
#[derive(Clone)]
pub struct GoogleDistanceMatrix {
    /// API host
    base_url: String,

    /// API key
    api_key: String,

    /// HTTP client used for requests
    client: Client,
}

impl GoogleDistanceMatrix {
    /// Create a new client
    pub fn new(base_url: &str, api_key: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    fn get_url(&self) -> String {
        format!("{}/maps/api/distancematrix/json", self.base_url)
    }
}

#[async_trait]
impl DistanceService for GoogleDistanceMatrix {
    async fn travel(&self, origin: Coordinate, destination: Coordinate) -> Result<TravelEstimate, Error> {
        let url = self.get_url();
        let response = Fetch::get(&self.client, &url)
            .query([
                ("units", "metric".to_string()),
                ("origins", origin.to_string()),
                ("destinations", destination.to_string()),
                ("key", self.api_key.clone()),
            ])
            .execute::<MatrixResponse>()
            .await?;

        if response.status != "OK" {
            return Err(Error::distance(format!(
                "API status {}{}",
                response.status,
                response
                    .error_message
                    .map(|m| format!(": {}", m))
                    .unwrap_or_default()
            )));
        }

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| Error::distance("empty distance matrix"))?;

        if element.status != "OK" {
            return Err(Error::distance(format!("element status {}", element.status)));
        }

        match (element.distance, element.duration) {
            (Some(distance), Some(duration)) => Ok(TravelEstimate {
                distance_text: distance.text,
                distance_meters: distance.value,
                duration_text: duration.text,
            }),
            _ => Err(Error::distance("element without distance or duration")),
        }
    }
}
