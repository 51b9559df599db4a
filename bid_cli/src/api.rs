//! HTTP client for the remote bid-pricing service.
//!
//! Five JSON endpoints, all POST. The server is a black box: requests
//! carry the wire shapes from `bid_core`, responses deserialize straight
//! into the data model. No retry, no request coalescing; a failure is
//! reported once and the user decides what to do.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use bid_core::costs::{EstimateResponse, MaterialCostsResponse};
use bid_core::forms::{EstimationForm, FenceDetails, JobDetails, PricingStrategy};

use crate::config::Config;

/// Errors surfaced to the wizard's UI boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure: DNS, TLS, timeout, connection refused
    #[error("Failed to reach the pricing service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status and (usually) a
    /// `detail` message
    #[error("{endpoint} rejected the request ({status}): {detail}")]
    Rejected {
        endpoint: &'static str,
        status: u16,
        detail: String,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// FastAPI-style error body: `{ "detail": "..." }`
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Deserialize)]
struct JobCreated {
    job_id: String,
}

#[derive(Serialize)]
struct FenceDetailsRequest<'a> {
    job_id: &'a str,
    #[serde(flatten)]
    details: &'a FenceDetails,
}

#[derive(Serialize)]
struct MaterialCostsRequest<'a> {
    job_id: &'a str,
    /// Per-material price overrides; always empty (server prices from its
    /// own book for the chosen strategy)
    material_prices: HashMap<String, f64>,
    pricing_strategy: PricingStrategy,
}

#[derive(Serialize)]
struct EstimateRequest<'a> {
    job_id: &'a str,
    material_prices: HashMap<String, f64>,
    #[serde(flatten)]
    form: &'a EstimationForm,
}

#[derive(Serialize)]
struct ProposalRequest<'a> {
    job_id: &'a str,
}

/// Async client for the bid-pricing API.
pub struct ProposalClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProposalClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("FenceBid/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(ProposalClient {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Register the job and customer details; returns the server-issued
    /// job id the rest of the flow references.
    pub async fn submit_job_details(&self, job: &JobDetails) -> ApiResult<String> {
        let created: JobCreated = self.post_json("new_bid/job_details", job).await?;
        info!(job_id = %created.job_id, "job registered");
        Ok(created.job_id)
    }

    /// Record the fence specification for a job.
    pub async fn submit_fence_details(
        &self,
        job_id: &str,
        details: &FenceDetails,
    ) -> ApiResult<()> {
        let request = FenceDetailsRequest { job_id, details };
        let response = self
            .http
            .post(self.url("new_bid/fence_details"))
            .json(&request)
            .send()
            .await?;
        Self::check("new_bid/fence_details", response).await?;
        Ok(())
    }

    /// Price the bill of materials under a pricing strategy.
    pub async fn fetch_material_costs(
        &self,
        job_id: &str,
        pricing_strategy: PricingStrategy,
    ) -> ApiResult<MaterialCostsResponse> {
        let request = MaterialCostsRequest {
            job_id,
            material_prices: HashMap::new(),
            pricing_strategy,
        };
        self.post_json("new_bid/material_costs", &request).await
    }

    /// Run the full cost estimation for a job.
    pub async fn estimate_cost(
        &self,
        job_id: &str,
        form: &EstimationForm,
    ) -> ApiResult<EstimateResponse> {
        let request = EstimateRequest {
            job_id,
            material_prices: HashMap::new(),
            form,
        };
        self.post_json("new_bid/cost_estimation", &request).await
    }

    /// Generate the proposal document server-side; returns the PDF bytes.
    pub async fn generate_proposal(&self, job_id: &str) -> ApiResult<Vec<u8>> {
        let response = self
            .http
            .post(self.url("generate_proposal"))
            .json(&ProposalRequest { job_id })
            .send()
            .await?;
        let response = Self::check("generate_proposal", response).await?;
        let bytes = response.bytes().await?;
        info!(bytes = bytes.len(), "proposal generated");
        Ok(bytes.to_vec())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post_json<B, T>(&self, endpoint: &'static str, body: &B) -> ApiResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        debug!(endpoint, "POST");
        let response = self.http.post(self.url(endpoint)).json(body).send().await?;
        let response = Self::check(endpoint, response).await?;
        Ok(response.json().await?)
    }

    async fn check(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| "request failed".to_string());
        Err(ApiError::Rejected {
            endpoint,
            status: status.as_u16(),
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bid_core::forms::FenceSpec;

    #[test]
    fn test_fence_request_wire_shape() {
        let details = FenceDetails {
            linear_feet: 300.0,
            height: 6,
            spec: FenceSpec::ChainLink {
                top_rail: true,
                corner_posts: 2,
                end_posts: 2,
            },
        };
        let request = FenceDetailsRequest {
            job_id: "job-17",
            details: &details,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["job_id"], "job-17");
        assert_eq!(json["fence_type"], "Chain Link");
        assert_eq!(json["linear_feet"], 300.0);
        assert_eq!(json["top_rail"], true);
    }

    #[test]
    fn test_estimate_request_flattens_form() {
        let form = EstimationForm::default();
        let request = EstimateRequest {
            job_id: "job-17",
            material_prices: HashMap::new(),
            form: &form,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["job_id"], "job-17");
        assert_eq!(json["daily_rate"], 150.0);
        assert_eq!(json["pricing_strategy"], "Master Halco Pricing");
        assert_eq!(json["dirt_complexity"], "soft");
        assert_eq!(json["productivity"], 1.0);
        assert!(json["material_prices"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_material_costs_request_wire_shape() {
        let request = MaterialCostsRequest {
            job_id: "job-17",
            material_prices: HashMap::new(),
            pricing_strategy: PricingStrategy::FenceSpecialties,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pricing_strategy"], "Fence Specialties Pricing");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = Config {
            api_url: "https://pricing.example.com/".to_string(),
            timeout_secs: 30,
        };
        let client = ProposalClient::new(&config).unwrap();
        assert_eq!(client.url("generate_proposal"), "https://pricing.example.com/generate_proposal");
    }
}
