//! HTTP clients for the auth and ads services.
//!
//! Every call is bounded by the client-wide timeout. Transport failures and
//! unexpected statuses both surface as [`UpstreamError`]; callers decide how
//! to render them.

use std::time::Duration;

use common::types::{Ad, AdCreated, CreateAdForm, StudentForm, VisibilityToggled};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::readiness::HttpHealthProbe;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
}

impl UpstreamError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status(s) => Some(*s),
            UpstreamError::Transport(e) => e.status(),
            UpstreamError::InvalidUrl(_) => None,
        }
    }
}

pub fn build_http_client(timeout: Duration) -> Result<Client, UpstreamError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Clone)]
struct Endpoint {
    base: Url,
}

impl Endpoint {
    fn parse(base: &str) -> Result<Self, UpstreamError> {
        let base = Url::parse(base).map_err(|e| UpstreamError::InvalidUrl(format!("{base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base.to_string()));
        }
        Ok(Self { base })
    }

    /// `base` joined with percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn expect_ok(resp: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(UpstreamError::Status(status))
    }
}

async fn json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, UpstreamError> {
    Ok(expect_ok(resp)?.json::<T>().await?)
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    endpoint: Endpoint,
}

impl AuthClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, UpstreamError> {
        Ok(Self { http, endpoint: Endpoint::parse(base_url)? })
    }

    /// `Ok(())` only when the auth service answers 200 for this id.
    pub async fn login(&self, student_id: &str) -> Result<(), UpstreamError> {
        let url = self.endpoint.url(&["login"])?;
        let form = StudentForm { student_id: student_id.to_string() };
        let resp = self.http.post(url).form(&form).send().await?;
        expect_ok(resp).map(|_| ())
    }

    pub fn health_probe(&self) -> Result<HttpHealthProbe, UpstreamError> {
        Ok(HttpHealthProbe::new("auth", self.http.clone(), self.endpoint.url(&["auth", "health"])?))
    }
}

#[derive(Debug, Clone)]
pub struct AdsClient {
    http: Client,
    endpoint: Endpoint,
}

impl AdsClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, UpstreamError> {
        Ok(Self { http, endpoint: Endpoint::parse(base_url)? })
    }

    pub async fn list_public(&self) -> Result<Vec<Ad>, UpstreamError> {
        let resp = self.http.get(self.endpoint.url(&["ads"])?).send().await?;
        json(resp).await
    }

    pub async fn create(&self, form: &CreateAdForm) -> Result<String, UpstreamError> {
        let url = self.endpoint.url(&["ads", "create"])?;
        let resp = self.http.post(url).form(form).send().await?;
        let created: AdCreated = json(resp).await?;
        Ok(created.id)
    }

    pub async fn delete(&self, ad_id: &str, student_id: &str) -> Result<(), UpstreamError> {
        let url = self.endpoint.url(&["ads", ad_id, "delete"])?;
        let form = StudentForm { student_id: student_id.to_string() };
        let resp = self.http.post(url).form(&form).send().await?;
        expect_ok(resp).map(|_| ())
    }

    /// Returns the ad's new `hidden` value.
    pub async fn toggle_hide(&self, ad_id: &str, student_id: &str) -> Result<bool, UpstreamError> {
        let url = self.endpoint.url(&["ads", ad_id, "toggle_hide"])?;
        let form = StudentForm { student_id: student_id.to_string() };
        let resp = self.http.post(url).form(&form).send().await?;
        let toggled: VisibilityToggled = json(resp).await?;
        Ok(toggled.hidden)
    }

    pub fn health_probe(&self) -> Result<HttpHealthProbe, UpstreamError> {
        Ok(HttpHealthProbe::new("ads", self.http.clone(), self.endpoint.url(&["ads", "health"])?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_and_encodes_segments() {
        let ep = Endpoint::parse("http://localhost:8001").unwrap();
        assert_eq!(ep.url(&["ads", "create"]).unwrap().as_str(), "http://localhost:8001/ads/create");

        let ep = Endpoint::parse("http://localhost:8001/prefix/").unwrap();
        assert_eq!(
            ep.url(&["ads", "a/b c", "delete"]).unwrap().as_str(),
            "http://localhost:8001/prefix/ads/a%2Fb%20c/delete"
        );
    }

    #[test]
    fn rejects_unusable_base() {
        assert!(matches!(Endpoint::parse("not a url"), Err(UpstreamError::InvalidUrl(_))));
        assert!(matches!(Endpoint::parse("mailto:x@y"), Err(UpstreamError::InvalidUrl(_))));
    }
}
