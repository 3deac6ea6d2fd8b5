use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::app::{ProgressEvent, ProgressSink};
use crate::domain::{RawObservation, RegionCode};
use crate::error::RarebirdError;

pub const TOKEN_HEADER: &str = "X-eBirdApiToken";

pub trait ObservationSource: Send + Sync {
    fn fetch_notable(
        &self,
        region: &RegionCode,
        days_back: u32,
    ) -> Result<Vec<RawObservation>, RarebirdError>;
}

#[derive(Clone)]
pub struct EbirdHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl EbirdHttpClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, RarebirdError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("rarebird/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| RarebirdError::EbirdHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| RarebirdError::EbirdHttp(err.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn notable_url(base_url: &str, region: &RegionCode) -> String {
        format!(
            "{}/data/obs/{}/recent/notable",
            base_url.trim_end_matches('/'),
            region.as_str()
        )
    }

    /// `hotspot=false` asks for every location, not only public hotspots.
    pub fn notable_query(days_back: u32) -> [(&'static str, String); 3] {
        [
            ("back", days_back.to_string()),
            ("detail", "full".to_string()),
            ("hotspot", "false".to_string()),
        ]
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, RarebirdError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "eBird request failed".to_string());
        Err(RarebirdError::EbirdStatus { status, message })
    }
}

impl ObservationSource for EbirdHttpClient {
    fn fetch_notable(
        &self,
        region: &RegionCode,
        days_back: u32,
    ) -> Result<Vec<RawObservation>, RarebirdError> {
        let url = Self::notable_url(&self.base_url, region);
        // Built per request: an unencodable key fails this fetch, not client construction.
        let token = HeaderValue::from_str(&self.api_key)
            .map_err(|err| RarebirdError::EbirdHttp(format!("{TOKEN_HEADER}: {err}")))?;
        tracing::debug!(%url, days_back, "requesting notable observations");
        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .query(Self::notable_query(days_back).as_slice())
            .send()
            .map_err(|err| RarebirdError::EbirdHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let body: Value = response
            .json()
            .map_err(|err| RarebirdError::EbirdDecode(err.to_string()))?;
        decode_observations(body)
    }
}

/// Splits a response body into observation objects, skipping elements that are not objects.
pub fn decode_observations(body: Value) -> Result<Vec<RawObservation>, RarebirdError> {
    let Value::Array(items) = body else {
        return Err(RarebirdError::EbirdDecode(
            "expected a JSON array of observations".to_string(),
        ));
    };
    let mut observations = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => observations.push(map),
            other => tracing::warn!(index, value = %other, "skipping non-object observation"),
        }
    }
    Ok(observations)
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub observations: Vec<RawObservation>,
    /// Operator-facing description of the upstream failure, if any.
    pub error: Option<String>,
}

/// Runs one fetch and degrades every upstream failure to an empty result.
pub fn fetch_or_empty<S: ObservationSource + ?Sized>(
    source: &S,
    region: &RegionCode,
    days_back: u32,
    sink: &dyn ProgressSink,
) -> FetchOutcome {
    match source.fetch_notable(region, days_back) {
        Ok(observations) => FetchOutcome {
            observations,
            error: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, %region, "notable observation fetch failed");
            let message = match &err {
                RarebirdError::EbirdStatus { status, message } => {
                    format!("Error: {status} - {message}")
                }
                other => format!("Error: {other}"),
            };
            sink.event(ProgressEvent::failure(message.clone()));
            FetchOutcome {
                observations: Vec::new(),
                error: Some(message),
            }
        }
    }
}
