//! Upstream client error type.
//!
//! Every provider call resolves to `Result<T, UpstreamError>` so callers can
//! tell "the provider had nothing" (Ok(None) / empty) apart from "the call
//! failed". The aggregation layer decides how failures surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} returned an unexpected payload: {detail}")]
    Payload {
        service: &'static str,
        detail: String,
    },
}

impl UpstreamError {
    pub fn payload(service: &'static str, detail: impl Into<String>) -> Self {
        Self::Payload {
            service,
            detail: detail.into(),
        }
    }
}
