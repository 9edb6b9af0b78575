//! NBP exchange-rate API support
//!
//! Request builder for `api.nbp.pl` plus the response payload types and
//! the converter into the domain `Currency` model.
//!
//! Target shape: `http://api.nbp.pl/api/exchangerates/rates/a/eur/last/100/?format=json`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use contracts::{
    ContractError, Currency, Descriptor, FetchFailure, Fetcher, Rate, RequestTemplate,
};

use crate::HttpFetcher;

const ENDPOINT: &str = "api/exchangerates/rates/a";
const USER_AGENT: &str = "ratewatch";

/// Response format requested from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
}

impl ResponseFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

/// Builder for NBP rate request templates
#[derive(Debug, Clone)]
pub struct RateRequest {
    domain: String,
    currency: String,
    history_days: u32,
    format: ResponseFormat,
}

impl RateRequest {
    /// Start a builder for the given API domain
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            currency: "EUR".to_string(),
            history_days: 1,
            format: ResponseFormat::default(),
        }
    }

    /// Set the ISO 4217 currency code
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    /// Set the number of historical rates to request
    pub fn history(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    /// Set the response format
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the read-only request template
    ///
    /// # Errors
    /// Rejects an empty domain, a non-three-letter currency code, or a
    /// zero history window.
    pub fn build(self) -> Result<RequestTemplate, ContractError> {
        if self.domain.is_empty() {
            return Err(ContractError::config_validation(
                "request.domain",
                "must not be empty",
            ));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ContractError::config_validation(
                "request.currency",
                format!("must be a three-letter currency code, got '{}'", self.currency),
            ));
        }
        if self.history_days == 0 {
            return Err(ContractError::config_validation(
                "request.history_days",
                "must be >= 1",
            ));
        }

        let url = format!(
            "http://{}/{}/{}/last/{}?format={}",
            self.domain,
            ENDPOINT,
            self.currency.to_lowercase(),
            self.history_days,
            self.format.as_str(),
        );

        Ok(RequestTemplate::new(url)
            .with_header("Accept", "application/json")
            .with_header("User-Agent", USER_AGENT))
    }
}

/// Raw NBP rates response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyResponse {
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub rates: Vec<RateEntry>,
}

/// One row of an NBP rates response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    #[serde(default)]
    pub no: String,
    #[serde(rename = "effectiveDate", default)]
    pub effective_date: String,
    #[serde(default)]
    pub mid: f64,
}

/// Converter from the raw NBP response to the domain model
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter;

impl Converter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a raw response, skipping rows whose date fails to parse
    pub fn convert(&self, from: CurrencyResponse) -> Currency {
        let mut result = Currency {
            code: from.code,
            rates: Vec::with_capacity(from.rates.len()),
        };
        for entry in from.rates {
            match NaiveDate::parse_from_str(&entry.effective_date, "%Y-%m-%d") {
                Ok(date) => result.rates.push(Rate {
                    date,
                    value: entry.mid,
                }),
                Err(e) => {
                    warn!(date = %entry.effective_date, error = %e, "failed to convert rate date");
                }
            }
        }
        result
    }
}

/// Fetcher producing domain `Currency` descriptors
///
/// Wraps an `HttpFetcher<CurrencyResponse>` and converts the payload after
/// a fully valid attempt. Failed attempts keep the default payload.
pub struct CurrencyFetcher {
    inner: HttpFetcher<CurrencyResponse>,
    converter: Converter,
}

impl CurrencyFetcher {
    pub fn new(converter: Converter) -> Result<Self, ContractError> {
        Ok(Self {
            inner: HttpFetcher::new()?,
            converter,
        })
    }
}

impl Fetcher for CurrencyFetcher {
    type Payload = Currency;

    async fn perform(
        &self,
        template: &RequestTemplate,
    ) -> Result<Descriptor<Currency>, FetchFailure<Currency>> {
        match self.inner.perform(template).await {
            Ok(desc) => Ok(desc.map_payload(|raw| self.converter.convert(raw))),
            Err(failure) => Err(FetchFailure {
                descriptor: failure.descriptor.map_payload(|_| Currency::default()),
                error: failure.error,
            }),
        }
    }
}
