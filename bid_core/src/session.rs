//! # Bid Session
//!
//! The `BidSession` struct is the root container for one prospective job
//! bid: everything the three wizard screens collect, everything the
//! remote API returned, and the projection inputs layered on top.
//! Sessions serialize to `.afb` (fence bid) files as human-readable JSON.
//!
//! State changes flow through a single reducer,
//! [`BidSession::apply`], mapping `(session, event) -> session`. The
//! reducer is where the projection calculator's pure functions get
//! called; derived figures (custom day estimates, custom margin
//! projections) are never mutated anywhere else.
//!
//! ## Structure
//!
//! ```text
//! BidSession
//! ├── meta: SessionMetadata (version, session id, timestamps)
//! ├── job_id + job/fence details (as submitted to the API)
//! ├── estimation: EstimationForm (request parameters)
//! ├── materials / estimate (API responses, read-only)
//! └── projection inputs: selections, custom crew, extra days, custom margin
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bid_core::session::{BidSession, SessionEvent};
//!
//! let session = BidSession::new()
//!     .apply(SessionEvent::CrewOptionToggled(4))
//!     .apply(SessionEvent::AdditionalDaysChanged(2.0));
//!
//! assert_eq!(session.resolved_crew_size(), 4);
//! assert_eq!(session.additional_labor_cost(), 2.0 * 150.0 * 4.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costs::{EstimateResponse, MaterialCostsResponse};
use crate::forms::{DirtComplexity, EstimationForm, FenceDetails, JobDetails, PricingStrategy};
use crate::projection::{
    estimate_days_for_crew, project_custom_margin, MarginProjection, BASELINE_CREW_SIZE,
};
use crate::selection::Selection;

/// Current schema version for .afb files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Session metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Local session id; exists before the server assigns a job_id
    pub session_id: Uuid,

    /// When the session was created
    pub created: DateTime<Utc>,

    /// When the session was last modified
    pub modified: DateTime<Utc>,
}

/// Everything a wizard screen can do to the session.
///
/// Network responses arrive as events too, so replaying an event list
/// reproduces the exact screen state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Job details accepted by the server, which assigned a job id
    JobRegistered { job_id: String, details: JobDetails },
    /// Fence details accepted by the server
    FenceRecorded(FenceDetails),
    /// Material cost lookup returned
    MaterialCostsReceived(MaterialCostsResponse),
    /// Cost estimation returned
    EstimateReceived(EstimateResponse),
    /// Material pricing source switched
    PricingStrategyChanged(PricingStrategy),
    /// Daily labor rate edited
    DailyRateChanged(f64),
    /// Ground condition edited
    DirtComplexityChanged(DirtComplexity),
    /// Slope grade (percent) edited
    SlopeGradeChanged(f64),
    /// Productivity factor edited
    ProductivityChanged(f64),
    /// A row of the labor duration table clicked
    CrewOptionToggled(u32),
    /// A row of the profit margin table clicked (keyed by label, e.g. "20%")
    MarginTierToggled(String),
    /// Custom crew size text edited
    CustomCrewChanged(String),
    /// Additional labor days edited
    AdditionalDaysChanged(f64),
    /// Custom margin applied (already parsed at the input boundary)
    CustomMarginApplied(f64),
    /// Explicit "remove" on the custom margin projection
    CustomMarginCleared,
}

/// Root session container. See the module docs for the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidSession {
    pub meta: SessionMetadata,

    /// Server-issued bid identifier (absent until job details submit)
    pub job_id: Option<String>,
    pub job: Option<JobDetails>,
    pub fence: Option<FenceDetails>,

    /// Cost-estimation request parameters
    pub estimation: EstimationForm,

    /// Latest material cost lookup (priced under `estimation.pricing_strategy`)
    pub materials: Option<MaterialCostsResponse>,
    /// Latest cost estimate (priced under `estimation.pricing_strategy`)
    pub estimate: Option<EstimateResponse>,

    /// Highlighted row of the labor duration table
    pub crew_selection: Selection<u32>,
    /// Highlighted row of the profit margin table, by label
    pub margin_selection: Selection<String>,

    /// Custom crew size as typed; parsed on change
    pub custom_crew_text: String,
    /// Day estimate derived from the custom crew size
    pub custom_days: Option<f64>,

    /// Extra labor days beyond the estimate
    pub additional_labor_days: f64,

    /// Custom margin as typed; parsed at the boundary
    pub custom_margin_text: String,
    /// Projection derived from the custom margin
    pub custom_projection: Option<MarginProjection>,
}

impl BidSession {
    /// Create an empty session with default estimation parameters.
    pub fn new() -> Self {
        let now = Utc::now();
        BidSession {
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                session_id: Uuid::new_v4(),
                created: now,
                modified: now,
            },
            job_id: None,
            job: None,
            fence: None,
            estimation: EstimationForm::default(),
            materials: None,
            estimate: None,
            crew_selection: Selection::Unselected,
            margin_selection: Selection::Unselected,
            custom_crew_text: String::new(),
            custom_days: None,
            additional_labor_days: 0.0,
            custom_margin_text: String::new(),
            custom_projection: None,
        }
    }

    /// The reducer: fold one event into the session.
    ///
    /// Consumes and returns the session so call sites read as a fold over
    /// an event stream. Every derived figure is recomputed here and only
    /// here.
    pub fn apply(mut self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::JobRegistered { job_id, details } => {
                self.job_id = Some(job_id);
                self.job = Some(details);
            }
            SessionEvent::FenceRecorded(details) => {
                self.fence = Some(details);
            }
            SessionEvent::MaterialCostsReceived(materials) => {
                self.materials = Some(materials);
            }
            SessionEvent::EstimateReceived(estimate) => {
                self.estimate = Some(estimate);
                // A fresh estimate invalidates the previous crew-day figure;
                // the entered crew text is retained for the next edit.
                self.custom_days = None;
                self.custom_projection = self.derive_custom_projection();
            }
            SessionEvent::PricingStrategyChanged(strategy) => {
                if self.estimation.pricing_strategy != strategy {
                    self.estimation.pricing_strategy = strategy;
                    // Fetched numbers were priced under the old strategy.
                    self.materials = None;
                    self.estimate = None;
                    self.custom_days = None;
                    self.custom_projection = None;
                }
            }
            SessionEvent::DailyRateChanged(rate) => {
                self.estimation.daily_rate = rate;
            }
            SessionEvent::DirtComplexityChanged(dirt) => {
                self.estimation.dirt_complexity = dirt;
            }
            SessionEvent::SlopeGradeChanged(grade) => {
                self.estimation.grade_of_slope_complexity = grade;
            }
            SessionEvent::ProductivityChanged(productivity) => {
                self.estimation.productivity = productivity;
            }
            SessionEvent::CrewOptionToggled(crew_size) => {
                self.crew_selection.toggle(crew_size);
            }
            SessionEvent::MarginTierToggled(label) => {
                self.margin_selection.toggle(label);
            }
            SessionEvent::CustomCrewChanged(text) => {
                self.custom_crew_text = text;
                self.custom_days = self.derive_custom_days();
            }
            SessionEvent::AdditionalDaysChanged(days) => {
                self.additional_labor_days = days;
            }
            SessionEvent::CustomMarginApplied(percent) => {
                self.custom_margin_text = trim_number(percent);
                self.custom_projection = self.derive_custom_projection();
                if self.custom_projection.is_some() {
                    // The custom margin joins the same highlighted-selection
                    // state as the server tiers, under its "<value>%" label.
                    self.margin_selection = Selection::Selected(margin_label(percent));
                }
            }
            SessionEvent::CustomMarginCleared => {
                if let Some(label) = self.custom_margin_label() {
                    if self.margin_selection.is_selected(&label) {
                        self.margin_selection.clear();
                    }
                }
                self.custom_margin_text.clear();
                self.custom_projection = None;
            }
        }
        self.touch();
        self
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Fence length, once fence details have been recorded.
    pub fn linear_feet(&self) -> Option<f64> {
        self.fence.as_ref().map(|fence| fence.linear_feet)
    }

    /// Crew size used for labor-cost projections.
    ///
    /// Priority: explicitly selected duration-table row, else a parsed
    /// custom crew size, else the baseline crew of 3.
    pub fn resolved_crew_size(&self) -> u32 {
        if let Some(&crew) = self.crew_selection.selected() {
            return crew;
        }
        if let Some(crew) = parse_crew(&self.custom_crew_text) {
            return crew;
        }
        BASELINE_CREW_SIZE
    }

    /// Cost of the session's additional labor days at the current daily
    /// rate and resolved crew size.
    pub fn additional_labor_cost(&self) -> f64 {
        crate::projection::additional_labor_cost(
            self.additional_labor_days,
            self.estimation.daily_rate,
            f64::from(self.resolved_crew_size()),
        )
    }

    /// The "<value>%" label for the current custom margin text, if it
    /// parses.
    pub fn custom_margin_label(&self) -> Option<String> {
        self.custom_margin_text
            .trim()
            .parse::<f64>()
            .ok()
            .map(margin_label)
    }

    fn derive_custom_days(&self) -> Option<f64> {
        let crew = parse_crew(&self.custom_crew_text)?;
        let estimate = self.estimate.as_ref()?;
        estimate_days_for_crew(estimate.costs.labor_costs.num_days, BASELINE_CREW_SIZE, crew).ok()
    }

    fn derive_custom_projection(&self) -> Option<MarginProjection> {
        let percent = self.custom_margin_text.trim().parse::<f64>().ok()?;
        let estimate = self.estimate.as_ref()?;
        let linear_feet = self.linear_feet()?;
        project_custom_margin(estimate.costs.total_cost, linear_feet, percent).ok()
    }
}

impl Default for BidSession {
    fn default() -> Self {
        BidSession::new()
    }
}

/// Strict positive-integer parse for crew sizes; "5.7" and "five" are
/// rejected at this boundary rather than coerced.
fn parse_crew(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|&crew| crew > 0)
}

/// Format a margin percentage as its selection label, e.g. `27.5` ->
/// `"27.5%"`, `30.0` -> `"30%"`.
pub fn margin_label(percent: f64) -> String {
    format!("{}%", trim_number(percent))
}

fn trim_number(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
