//! REST client for bucket properties

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

use crate::codec::rest::{parse_from_response, to_json, RestResponse, JSON_CONTENT_TYPE};
use crate::common::utils::bucket_path;
use crate::common::{ClientConfig, Error, Result};
use crate::props::BucketProperties;

pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.rest_url.clone(), config.request_timeout())
    }

    pub fn bucket_url(&self, bucket: &str) -> String {
        format!("{}{}", self.base_url, bucket_path(bucket))
    }

    /// Fetch every property of `bucket`
    pub async fn get_bucket_properties(&self, bucket: &str) -> Result<BucketProperties> {
        let url = self.bucket_url(bucket);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("props", "true"), ("keys", "false")])
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("GET {} returned {}", url, status);
            return Err(Error::Http(format!("GET {} returned {}: {}", url, status, body)));
        }

        parse_from_response(&RestResponse { content_type, body })
    }

    /// Send `props` as a JSON `PUT`; absent settings stay untouched
    pub async fn set_bucket_properties(&self, bucket: &str, props: &BucketProperties) -> Result<()> {
        let url = self.bucket_url(bucket);
        let body = to_json(props)?;
        tracing::debug!("PUT {} ({} bytes)", url, body.len());

        let response = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("PUT {} returned {}", url, status);
            return Err(Error::Http(format!("PUT {} returned {}: {}", url, status, body)));
        }
        Ok(())
    }
}
