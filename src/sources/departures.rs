//! Bus departures via a GraphQL stop query
//!
//! Departures churn quickly, so the cache TTL is short; the endpoint still
//! benefits from the per-API rate limit when several widgets watch nearby
//! stops.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cache::CachePolicy;
use crate::fetch::{FetchClient, FetchError, GraphqlRequest, Transport};

const API_NAME: &str = "transit";
const CACHE_TTL: Duration = Duration::from_secs(30);

const DEPARTURES_QUERY: &str = r#"
query StopDepartures($stopId: String!, $limit: Int!) {
  stop(id: $stopId) {
    name
    stoptimesWithoutPatterns(numberOfDepartures: $limit) {
      scheduledDeparture
      realtimeDeparture
      realtime
      headsign
      trip { route { shortName } }
    }
  }
}
"#;

/// One upcoming departure from the monitored stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Departure {
    /// Line identifier, e.g. "U79"
    pub line: String,
    /// Destination shown on the vehicle
    pub headsign: String,
    /// Scheduled departure, seconds since midnight of the service day
    pub scheduled_departure: u32,
    /// Realtime estimate when available, otherwise the scheduled time
    pub departure: u32,
    /// Whether the estimate comes from realtime data
    pub realtime: bool,
}

/// Fetches upcoming departures for a stop from a GraphQL transit endpoint
#[derive(Debug, Clone)]
pub struct DeparturesSource {
    endpoint: String,
    limit: u32,
}

impl DeparturesSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            limit: 8,
        }
    }

    /// Limits how many upcoming departures are requested
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Fetches upcoming departures for the given stop id
    pub async fn fetch_departures<T: Transport>(
        &self,
        client: &FetchClient<T>,
        stop_id: &str,
    ) -> Result<Vec<Departure>, FetchError> {
        let request = GraphqlRequest::new(API_NAME, &self.endpoint, DEPARTURES_QUERY)
            .with_variables(serde_json::json!({
                "stopId": stop_id,
                "limit": self.limit,
            }))
            .with_cache(CachePolicy::MaxAge(CACHE_TTL));
        let body = client.fetch_graphql(&request).await?;
        parse_departures(&body)
    }
}

/// Flattens the nested GraphQL stop response into departure rows
fn parse_departures(body: &serde_json::Value) -> Result<Vec<Departure>, FetchError> {
    let stoptimes = body
        .pointer("/data/stop/stoptimesWithoutPatterns")
        .and_then(|v| v.as_array())
        .ok_or_else(|| FetchError::Unknown("missing stoptimes in response".to_string()))?;

    let mut departures = Vec::with_capacity(stoptimes.len());
    for stoptime in stoptimes {
        let scheduled = stoptime
            .get("scheduledDeparture")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                FetchError::Unknown("stoptime without scheduledDeparture".to_string())
            })? as u32;
        let realtime = stoptime
            .get("realtime")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let departure = if realtime {
            stoptime
                .get("realtimeDeparture")
                .and_then(|v| v.as_u64())
                .map(|v| v as u32)
                .unwrap_or(scheduled)
        } else {
            scheduled
        };

        departures.push(Departure {
            line: stoptime
                .pointer("/trip/route/shortName")
                .and_then(|v| v.as_str())
                .unwrap_or("?")
                .to_string(),
            headsign: stoptime
                .get("headsign")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            scheduled_departure: scheduled,
            departure,
            realtime,
        });
    }
    Ok(departures)
}
