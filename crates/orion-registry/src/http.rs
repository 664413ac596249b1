//! Thin HTTP layer shared by the registry clients

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("request failed: {message}")]
    RequestFailed { message: String },
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
    #[error("timeout")]
    Timeout,
    #[error("rate limited")]
    RateLimited,
    #[error("parse error: {message}")]
    ParseError { message: String },
}

/// Status and body of a completed exchange. Non-2xx statuses are returned
/// here, not as errors: the callers decide what not-found means.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            user_agent: user_agent.to_string(),
        }
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(request_error)?;

        read_response(response).await
    }

    pub async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let url =
            reqwest::Url::parse_with_params(url, params).map_err(|_| HttpError::InvalidUrl {
                url: url.to_string(),
            })?;

        self.get(url.as_str()).await
    }

    pub async fn post_json<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .post(url)
            .header("User-Agent", &self.user_agent)
            .json(body)
            .send()
            .await
            .map_err(request_error)?;

        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<HttpResponse, HttpError> {
    let status = response.status().as_u16();

    if status == 429 {
        return Err(HttpError::RateLimited);
    }

    let body = response.text().await.map_err(|e| HttpError::ParseError {
        message: e.to_string(),
    })?;

    Ok(HttpResponse { status, body })
}

fn request_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::RequestFailed {
            message: e.to_string(),
        }
    }
}
