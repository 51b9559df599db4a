//! # Typed Form Inputs
//!
//! The boundary between free-text form entry and the calculator: every
//! screen's fields become a typed struct with a `validate()` method, and
//! out-of-range input is rejected here rather than coerced downstream.
//! Serialized shapes match the remote API's wire payloads field for field.
//!
//! ## JSON Example (chain link fence details)
//!
//! ```json
//! {
//!   "linear_feet": 300.0,
//!   "height": 6,
//!   "fence_type": "Chain Link",
//!   "top_rail": true,
//!   "corner_posts": 2,
//!   "end_posts": 2
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BidError, BidResult};

/// Customer and job-site details collected on the first screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    pub proposal_to: String,
    pub phone: String,
    pub email: String,
    pub job_address: String,
    pub job_name: String,
    #[serde(default)]
    pub notes: String,
}

impl JobDetails {
    /// All fields except notes are required; the email must at least look
    /// like an address.
    pub fn validate(&self) -> BidResult<()> {
        let required = [
            ("proposal_to", &self.proposal_to),
            ("phone", &self.phone),
            ("email", &self.email),
            ("job_address", &self.job_address),
            ("job_name", &self.job_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BidError::missing_field(field));
            }
        }
        if !self.email.contains('@') {
            return Err(BidError::invalid_input(
                "email",
                self.email.clone(),
                "Not an email address",
            ));
        }
        Ok(())
    }
}

/// Wood fence style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WoodStyle {
    #[serde(rename = "good neighbor")]
    GoodNeighbor,
    #[serde(rename = "dogeared")]
    Dogeared,
}

impl fmt::Display for WoodStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WoodStyle::GoodNeighbor => write!(f, "Good Neighbor"),
            WoodStyle::Dogeared => write!(f, "Dogeared"),
        }
    }
}

/// Per-fence-type fields, tagged on the wire as `fence_type`.
///
/// Corner and end post counts only exist for Chain Link and Vinyl; wood
/// styles carry their own options instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fence_type")]
pub enum FenceSpec {
    #[serde(rename = "Chain Link")]
    ChainLink {
        top_rail: bool,
        corner_posts: u32,
        end_posts: u32,
    },
    #[serde(rename = "SP Wrought Iron")]
    SpWroughtIron,
    #[serde(rename = "Vinyl")]
    Vinyl {
        with_chain_link: bool,
        corner_posts: u32,
        end_posts: u32,
    },
    #[serde(rename = "Wood")]
    Wood {
        style: WoodStyle,
        /// Board-on-board option; only meaningful for good-neighbor style
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bob: Option<bool>,
    },
}

impl FenceSpec {
    /// Human-readable fence type name (matches the wire tag).
    pub fn type_name(&self) -> &'static str {
        match self {
            FenceSpec::ChainLink { .. } => "Chain Link",
            FenceSpec::SpWroughtIron => "SP Wrought Iron",
            FenceSpec::Vinyl { .. } => "Vinyl",
            FenceSpec::Wood { .. } => "Wood",
        }
    }
}

/// Fence specification collected on the second screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenceDetails {
    pub linear_feet: f64,
    /// Fence height in feet; the product line comes in 4, 5, and 6 ft
    pub height: u32,
    #[serde(flatten)]
    pub spec: FenceSpec,
}

impl FenceDetails {
    pub fn validate(&self) -> BidResult<()> {
        if !self.linear_feet.is_finite() || self.linear_feet <= 0.0 {
            return Err(BidError::invalid_input(
                "linear_feet",
                self.linear_feet.to_string(),
                "Fence length must be positive",
            ));
        }
        if ![4, 5, 6].contains(&self.height) {
            return Err(BidError::invalid_input(
                "height",
                self.height.to_string(),
                "Height must be 4, 5, or 6 ft",
            ));
        }
        if let FenceSpec::Wood { style, bob } = &self.spec {
            match (style, bob) {
                (WoodStyle::GoodNeighbor, None) => {
                    return Err(BidError::missing_field("bob"));
                }
                (WoodStyle::Dogeared, Some(_)) => {
                    return Err(BidError::invalid_input(
                        "bob",
                        "set",
                        "Board-on-board applies to good-neighbor style only",
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Material pricing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingStrategy {
    #[serde(rename = "Master Halco Pricing")]
    MasterHalco,
    #[serde(rename = "Fence Specialties Pricing")]
    FenceSpecialties,
}

impl PricingStrategy {
    pub const ALL: [PricingStrategy; 2] =
        [PricingStrategy::MasterHalco, PricingStrategy::FenceSpecialties];
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingStrategy::MasterHalco => write!(f, "Master Halco Pricing"),
            PricingStrategy::FenceSpecialties => write!(f, "Fence Specialties Pricing"),
        }
    }
}

/// Ground condition at the job site; drives post-hole labor pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirtComplexity {
    #[serde(rename = "soft")]
    Soft,
    #[serde(rename = "hard")]
    Hard,
    #[serde(rename = "core drill")]
    CoreDrill,
    #[serde(rename = "jack hammer")]
    JackHammer,
}

impl fmt::Display for DirtComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirtComplexity::Soft => write!(f, "Soft"),
            DirtComplexity::Hard => write!(f, "Hard"),
            DirtComplexity::CoreDrill => write!(f, "Core Drill"),
            DirtComplexity::JackHammer => write!(f, "Jack Hammer"),
        }
    }
}

/// Cost-estimation request parameters (third screen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationForm {
    pub daily_rate: f64,
    pub pricing_strategy: PricingStrategy,
    pub dirt_complexity: DirtComplexity,
    /// Slope grade of the run, in percent
    pub grade_of_slope_complexity: f64,
    /// Crew productivity factor, 0.01 to 1.00
    pub productivity: f64,
}

impl Default for EstimationForm {
    fn default() -> Self {
        EstimationForm {
            daily_rate: 150.0,
            pricing_strategy: PricingStrategy::MasterHalco,
            dirt_complexity: DirtComplexity::Soft,
            grade_of_slope_complexity: 0.0,
            productivity: 1.0,
        }
    }
}

impl EstimationForm {
    pub fn validate(&self) -> BidResult<()> {
        if !self.daily_rate.is_finite() || self.daily_rate <= 0.0 {
            return Err(BidError::invalid_input(
                "daily_rate",
                self.daily_rate.to_string(),
                "Daily labor rate must be positive",
            ));
        }
        if !self.grade_of_slope_complexity.is_finite() || self.grade_of_slope_complexity < 0.0 {
            return Err(BidError::invalid_input(
                "grade_of_slope_complexity",
                self.grade_of_slope_complexity.to_string(),
                "Slope grade cannot be negative",
            ));
        }
        if !self.productivity.is_finite()
            || self.productivity < 0.01
            || self.productivity > 1.0
        {
            return Err(BidError::invalid_input(
                "productivity",
                self.productivity.to_string(),
                "Productivity must be between 0.01 and 1.00",
            ));
        }
        Ok(())
    }
}
