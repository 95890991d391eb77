//! reqwest-backed gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::{Gateway, GatewayResult, RequestError};
use crate::config::{Config, ConfigError};
use crate::models::{
    Claimant, ClaimantCreate, ClaimantUpdate, Service, ServiceCreate, ServiceFilter, ServiceUpdate,
};

/// Gateway that talks to the backend over HTTP/JSON.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    /// Create a gateway from the application config.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Self::new(&config.api_url, &config.user_agent, timeout)
    }

    /// Create a gateway for `api_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded; a slow response is
    /// handled by the caller's staleness rules rather than cancelled.
    pub fn new(
        api_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let mut base =
            Url::parse(api_url).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", api_url, e)))?;
        // Url::join replaces the last segment unless the base ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(user_agent).gzip(true).brotli(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        self.base
            .join(path)
            .map_err(|e| RequestError::Network(format!("invalid URL {}: {}", path, e)))
    }

    /// Send a request and turn any non-success status into a [`RequestError`].
    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = RequestError::from_response(status.as_u16(), &body);
        warn!("Request to {} failed: {}", url, err);
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RequestError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_services(&self, filter: &ServiceFilter) -> GatewayResult<Vec<Service>> {
        let mut url = self.endpoint("services/")?;
        {
            let pairs = filter.query_pairs();
            if !pairs.is_empty() {
                let mut query = url.query_pairs_mut();
                for (key, value) in pairs {
                    query.append_pair(key, value);
                }
            }
        }
        debug!("GET {}", url);
        self.send_json(self.client.get(url)).await
    }

    async fn list_services_within_claimant(
        &self,
        claimant_id: i64,
    ) -> GatewayResult<Vec<Service>> {
        let url = self.endpoint(&format!("services/within/claimant/{}", claimant_id))?;
        debug!("GET {}", url);
        self.send_json(self.client.get(url)).await
    }

    async fn create_service(&self, payload: &ServiceCreate) -> GatewayResult<Service> {
        let url = self.endpoint("services/")?;
        debug!("POST {}", url);
        self.send_json(self.client.post(url).json(payload)).await
    }

    async fn update_service(&self, id: i64, payload: &ServiceUpdate) -> GatewayResult<Service> {
        let url = self.endpoint(&format!("services/{}", id))?;
        debug!("PATCH {}", url);
        self.send_json(self.client.patch(url).json(payload)).await
    }

    async fn delete_service(&self, id: i64) -> GatewayResult<()> {
        let url = self.endpoint(&format!("services/{}", id))?;
        debug!("DELETE {}", url);
        // The body, if any, is not needed.
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn list_claimants(&self) -> GatewayResult<Vec<Claimant>> {
        let url = self.endpoint("claimants/")?;
        debug!("GET {}", url);
        self.send_json(self.client.get(url)).await
    }

    async fn get_claimant(&self, id: i64) -> GatewayResult<Claimant> {
        let url = self.endpoint(&format!("claimants/{}", id))?;
        debug!("GET {}", url);
        self.send_json(self.client.get(url)).await
    }

    async fn create_claimant(&self, payload: &ClaimantCreate) -> GatewayResult<Claimant> {
        let url = self.endpoint("claimants/")?;
        debug!("POST {}", url);
        self.send_json(self.client.post(url).json(payload)).await
    }

    async fn update_claimant(
        &self,
        id: i64,
        payload: &ClaimantUpdate,
    ) -> GatewayResult<Claimant> {
        let url = self.endpoint(&format!("claimants/{}", id))?;
        debug!("PATCH {}", url);
        self.send_json(self.client.patch(url).json(payload)).await
    }

    async fn delete_claimant(&self, id: i64) -> GatewayResult<()> {
        let url = self.endpoint(&format!("claimants/{}", id))?;
        debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}
