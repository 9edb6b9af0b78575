//! HttpFetcher - performs one fetch attempt per call
//!
//! Flags are flipped stepwise so a failed attempt still carries everything
//! learned up to the failing step: status first, then content type, then
//! JSON well-formedness, then the decode.

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::info;
use uuid::Uuid;

use contracts::{ContractError, Descriptor, FetchFailure, Fetcher, RequestTemplate};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetcher performing GET requests and decoding JSON bodies into `T`
///
/// The inner `reqwest::Client` is owned, not process-global, so every
/// monitor gets an explicitly injected dependency.
pub struct HttpFetcher<T> {
    http: reqwest::Client,
    _payload: PhantomData<fn() -> T>,
}

impl<T> HttpFetcher<T> {
    /// Create a fetcher with a 10s request timeout
    pub fn new() -> Result<Self, ContractError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ContractError::Other(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            _payload: PhantomData,
        })
    }

    /// Create a fetcher around an existing client
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            _payload: PhantomData,
        }
    }
}

impl<T> Fetcher for HttpFetcher<T>
where
    T: DeserializeOwned + Default + Send + Sync,
{
    type Payload = T;

    async fn perform(
        &self,
        template: &RequestTemplate,
    ) -> Result<Descriptor<T>, FetchFailure<T>> {
        let mut desc: Descriptor<T> = Descriptor::new(Uuid::new_v4().to_string(), template.url());
        info!(id = %desc.id, url = %desc.url, "request");

        let mut request = self.http.get(template.url());
        for (name, value) in template.headers() {
            request = request.header(name, value);
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = ContractError::transport(&desc.url, e.to_string());
                return Err(FetchFailure {
                    descriptor: desc,
                    error,
                });
            }
        };
        desc.duration = started.elapsed();
        info!(id = %desc.id, duration = ?desc.duration, "request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let error =
                    ContractError::response(&desc.url, format!("unable to read body: {e}"));
                return Err(FetchFailure {
                    descriptor: desc,
                    error,
                });
            }
        };

        desc.valid_status_code = status == StatusCode::OK;
        info!(id = %desc.id, valid_status_code = desc.valid_status_code, "request");
        if !desc.valid_status_code {
            let error = ContractError::response(&desc.url, format!("status code {status}"));
            return Err(FetchFailure {
                descriptor: desc,
                error,
            });
        }

        desc.json_content_type = content_type
            .split(';')
            .next()
            .map(str::trim)
            .is_some_and(|t| t.eq_ignore_ascii_case("application/json"));
        info!(id = %desc.id, valid_content_type = desc.json_content_type, "request");
        if !desc.json_content_type {
            let error =
                ContractError::payload(&desc.url, format!("unsupported content type '{content_type}'"));
            return Err(FetchFailure {
                descriptor: desc,
                error,
            });
        }

        desc.well_formed_payload = serde_json::from_slice::<IgnoredAny>(&body).is_ok();
        info!(id = %desc.id, valid_json = desc.well_formed_payload, "request");
        if !desc.well_formed_payload {
            let error = ContractError::payload(&desc.url, "invalid json");
            return Err(FetchFailure {
                descriptor: desc,
                error,
            });
        }

        match serde_json::from_slice::<T>(&body) {
            Ok(payload) => {
                desc.payload = payload;
                Ok(desc)
            }
            Err(e) => {
                let error =
                    ContractError::response(&desc.url, format!("unable to decode body: {e}"));
                Err(FetchFailure {
                    descriptor: desc,
                    error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetchers_get_distinct_clients() {
        let a: HttpFetcher<Currencyish> = HttpFetcher::new().unwrap();
        let b: HttpFetcher<Currencyish> = HttpFetcher::new().unwrap();
        // Construction must not panic or share hidden global state; the
        // clients are independent values.
        drop((a, b));
    }

    #[derive(Debug, Default, serde::Deserialize)]
    struct Currencyish {
        #[allow(dead_code)]
        code: Option<String>,
    }
}
