//! OSRM HTTP adapter for single-leg costs.

use serde::Deserialize;

use crate::error::{ProviderError, ProviderErrorKind};
use crate::location::Location;
use crate::route::RouteCost;
use crate::traits::{CostMetric, DistanceProvider};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    pub metric: CostMetric,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            metric: CostMetric::Distance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: &Location, to: &Location) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url,
            self.config.profile,
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude()
        )
    }
}

impl DistanceProvider for OsrmClient {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        let response = self.client.get(self.route_url(from, to)).send()?;

        // OSRM reports NoRoute and bad input as 400 with a JSON body.
        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            response.error_for_status_ref()?;
        }

        let body = response.json::<OsrmRouteResponse>()?;
        cost_from_response(body, self.config.metric)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}

fn cost_from_response(
    body: OsrmRouteResponse,
    metric: CostMetric,
) -> Result<RouteCost, ProviderError> {
    if body.code != "Ok" {
        let kind = match body.code.as_str() {
            "NoRoute" | "NoSegment" => ProviderErrorKind::NoRoute,
            "InvalidValue" | "InvalidQuery" => ProviderErrorKind::InvalidCoordinates,
            _ => ProviderErrorKind::Other,
        };
        let reason = body.message.unwrap_or(body.code);
        return Err(ProviderError::new(kind, reason));
    }

    let route = body
        .routes
        .first()
        .ok_or_else(|| ProviderError::no_route("OSRM returned no routes"))?;

    Ok(match metric {
        CostMetric::Distance => route.distance,
        CostMetric::Duration => route.duration,
    })
}
