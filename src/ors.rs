//! OpenRouteService directions adapter.

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderErrorKind};
use crate::location::Location;
use crate::route::RouteCost;
use crate::traits::{CostMetric, DistanceProvider};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "ORS_API_KEY";

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub profile: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub metric: CostMetric,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "driving-car".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
            metric: CostMetric::Distance,
        }
    }
}

impl OrsConfig {
    /// Default config with the key taken from `ORS_API_KEY`.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_api_key(std::env::var(API_KEY_VAR).ok())
    }

    /// A missing or blank key is an authorization failure.
    fn from_api_key(api_key: Option<String>) -> Result<Self, ProviderError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::unauthorized(format!("{} is not set", API_KEY_VAR)))?;
        Ok(Self {
            api_key,
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}/geojson",
            self.config.base_url, self.config.profile
        )
    }
}

impl DistanceProvider for OrsClient {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        let request = DirectionsRequest::between(from, to);
        let response = self
            .client
            .post(self.directions_url())
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key)
            .json(&request)
            .send()?;

        // Routing failures come back as 4xx with an error body worth reading.
        let status = response.status();
        if matches!(status.as_u16(), 401 | 403 | 429) || status.is_server_error() {
            response.error_for_status_ref()?;
        }

        let body = response.json::<DirectionsResponse>()?;
        cost_from_response(body, self.config.metric)
    }
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    /// [lng, lat] pairs.
    coordinates: [[f64; 2]; 2],
}

impl DirectionsRequest {
    fn between(from: &Location, to: &Location) -> Self {
        Self {
            coordinates: [
                [from.longitude(), from.latitude()],
                [to.longitude(), to.latitude()],
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
    error: Option<OrsError>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OrsError {
    code: Option<i64>,
    message: Option<String>,
}

fn cost_from_response(
    body: DirectionsResponse,
    metric: CostMetric,
) -> Result<RouteCost, ProviderError> {
    if let Some(error) = body.error {
        let kind = match error.code {
            Some(2009) | Some(2010) => ProviderErrorKind::NoRoute,
            Some(2002) | Some(2003) => ProviderErrorKind::InvalidCoordinates,
            _ => ProviderErrorKind::Other,
        };
        let reason = error
            .message
            .unwrap_or_else(|| format!("ORS error {:?}", error.code));
        return Err(ProviderError::new(kind, reason));
    }

    let segment = body
        .features
        .first()
        .and_then(|feature| feature.properties.segments.first())
        .ok_or_else(|| ProviderError::no_route("ORS returned no route segments"))?;

    Ok(match metric {
        CostMetric::Distance => segment.distance,
        CostMetric::Duration => segment.duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DirectionsResponse {
        serde_json::from_str(json).expect("valid ORS response")
    }

    #[test]
    fn test_request_is_lng_lat() {
        let request = DirectionsRequest::between(
            &Location::new("Nairobi", -1.2921, 36.8219),
            &Location::new("Nyeri", -0.4167, 36.95),
        );
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"coordinates":[[36.8219,-1.2921],[36.95,-0.4167]]}"#);
    }

    #[test]
    fn test_missing_api_key_is_unauthorized() {
        let err = OrsConfig::from_api_key(None).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Unauthorized);
        assert!(err.is_fatal());
        assert!(err.reason.contains(API_KEY_VAR));

        let blank = OrsConfig::from_api_key(Some("  ".to_string())).unwrap_err();
        assert_eq!(blank.kind, ProviderErrorKind::Unauthorized);
    }

    #[test]
    fn test_api_key_kept() {
        let config = OrsConfig::from_api_key(Some("secret".to_string())).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.profile, "driving-car");
    }

    #[test]
    fn test_directions_url() {
        let client = OrsClient::new(OrsConfig::default()).expect("build ORS client");
        assert_eq!(
            client.directions_url(),
            "https://api.openrouteservice.org/v2/directions/driving-car/geojson"
        );
    }

    #[test]
    fn test_reads_first_segment() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "segments": [{"distance": 152034.1, "duration": 7410.5, "steps": []}],
                    "summary": {"distance": 152034.1, "duration": 7410.5}
                },
                "geometry": {"type": "LineString", "coordinates": []}
            }]
        }"#;
        assert_eq!(cost_from_response(parse(json), CostMetric::Distance).unwrap(), 152034.1);
        assert_eq!(cost_from_response(parse(json), CostMetric::Duration).unwrap(), 7410.5);
    }

    #[test]
    fn test_routable_point_error() {
        let json = r#"{"error":{"code":2010,"message":"Could not find routable point"}}"#;
        let err = cost_from_response(parse(json), CostMetric::Distance).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::NoRoute);
        assert!(err.reason.contains("routable point"));
    }

    #[test]
    fn test_unknown_error_code() {
        let json = r#"{"error":{"code":2099}}"#;
        let err = cost_from_response(parse(json), CostMetric::Distance).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Other);
        assert!(err.reason.contains("2099"));
    }

    #[test]
    fn test_empty_features() {
        let err = cost_from_response(parse(r#"{"features":[]}"#), CostMetric::Distance).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::NoRoute);
    }
}
