//! JSON client bound to a single REST resource.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// Client for a collection resource at a fixed base URL.
///
/// `GET base` lists, `POST base` creates and `GET|PUT|DELETE base/{id}` address
/// one item. Every call is attempted exactly once.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    base: Url,
    http: reqwest::Client,
}

impl ResourceClient {
    /// Build a client for `base_url`. Without `timeout` the reqwest default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let base = Url::parse(base_url.trim()).map_err(|e| TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry path segments".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL of the item `id`, with `id` percent-encoded as one path segment.
    pub fn item_url(&self, id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    /// Fetch the whole collection. One undecodable record fails the listing,
    /// and that record is logged by position and id.
    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>, TransportError> {
        let url = self.base.clone();
        let response = self.send(Method::GET, url.clone(), |req| req).await?;
        let records: Vec<Value> = decode(Method::GET, &url, response).await?;

        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let record_id = record_id(&record);
                serde_json::from_value(record).map_err(|source| {
                    tracing::warn!(
                        url = %url,
                        index,
                        record_id = record_id.as_deref().unwrap_or("-"),
                        error = %source,
                        "listing record failed to decode"
                    );
                    TransportError::Decode {
                        method: method_name(&Method::GET),
                        url: url.to_string(),
                        source,
                    }
                })
            })
            .collect()
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T, TransportError> {
        let url = self.item_url(id);
        let response = self.send(Method::GET, url.clone(), |req| req).await?;
        decode(Method::GET, &url, response).await
    }

    pub async fn create<B, T>(&self, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.base.clone();
        let response = self
            .send(Method::POST, url.clone(), |req| req.json(body))
            .await?;
        decode(Method::POST, &url, response).await
    }

    pub async fn update<B, T>(&self, id: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.item_url(id);
        let response = self
            .send(Method::PUT, url.clone(), |req| req.json(body))
            .await?;
        decode(Method::PUT, &url, response).await
    }

    /// Delete the item `id`. Any response body is ignored.
    pub async fn delete(&self, id: &str) -> Result<(), TransportError> {
        let url = self.item_url(id);
        self.send(Method::DELETE, url, |req| req).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, TransportError> {
        let request = build(self.http.request(method.clone(), url.clone()));

        let response = request.send().await.map_err(|source| {
            tracing::error!(method = %method, url = %url, error = %source, "request failed");
            TransportError::Network {
                method: method_name(&method),
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        tracing::debug!(method = %method, url = %url, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(TransportError::Status {
                method: method_name(&method),
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(
    method: Method,
    url: &Url,
    response: Response,
) -> Result<T, TransportError> {
    let body = response
        .bytes()
        .await
        .map_err(|source| TransportError::Network {
            method: method_name(&method),
            url: url.to_string(),
            source,
        })?;

    serde_json::from_slice(&body).map_err(|source| {
        tracing::warn!(method = %method, url = %url, error = %source, "response body failed to decode");
        TransportError::Decode {
            method: method_name(&method),
            url: url.to_string(),
            source,
        }
    })
}

/// Id of a raw record, read from `_id` or `id`.
fn record_id(record: &Value) -> Option<String> {
    let id = record.get("_id").or_else(|| record.get("id"))?;
    Some(match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    })
}

fn method_name(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        _ => "HTTP",
    }
}
