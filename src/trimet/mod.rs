use std::future::Future;

use reqwest::{Url, header::ACCEPT};
use tracing::debug;

mod models;
pub use models::*;

use crate::{config::Config, error::QueryError, query::StopQuery};

/// Anything that can answer an arrivals request for a set of stops.
///
/// One call is one request; retrying is left to the caller.
pub trait UpstreamClient: Send + Sync {
    fn fetch(
        &self,
        stops: &StopQuery,
    ) -> impl Future<Output = Result<RawResponse, QueryError>> + Send;
}

/// HTTP client for the TriMet arrivals web service.
#[derive(Debug, Clone)]
pub struct TriMetClient {
    http: reqwest::Client,
    arrivals_url: Url,
    api_key: String,
}

impl TriMetClient {
    pub fn new(config: &Config) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let arrivals_url = Url::parse(&config.arrivals_url).map_err(|err| QueryError::Transport {
            message: format!("bad arrivals url {:?}: {err}", config.arrivals_url),
        })?;
        Ok(Self {
            http,
            arrivals_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn request_url(&self, stops: &StopQuery) -> Url {
        let mut url = self.arrivals_url.clone();
        url.query_pairs_mut()
            .append_pair("locIDs", &stops.to_string())
            .append_pair("appID", &self.api_key)
            .append_pair("json", "true");
        url
    }
}

impl UpstreamClient for TriMetClient {
    async fn fetch(&self, stops: &StopQuery) -> Result<RawResponse, QueryError> {
        if stops.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        debug!("Fetching arrivals for stops {stops}");
        let response = self
            .http
            .get(self.request_url(stops))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Transport {
                message: format!("TriMet responded with HTTP {status}"),
            });
        }

        let body = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        envelope.result_set.try_into()
    }
}

#[test]
fn request_url_carries_query() {
    let config = Config {
        api_key: "KEY".into(),
        ..Default::default()
    };
    let client = TriMetClient::new(&config).unwrap();
    let stops = StopQuery::parse("8989, 2").unwrap();
    let url = client.request_url(&stops);
    assert_eq!(
        url.as_str(),
        "https://developer.trimet.org/ws/v2/arrivals?locIDs=2%2C8989&appID=KEY&json=true"
    );
}
