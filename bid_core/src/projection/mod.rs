//! # Bid Projection Calculator
//!
//! Pure, synchronous arithmetic over an already-fetched cost estimate and
//! user-adjustable parameters. Each operation follows the pattern:
//!
//! - validated typed inputs
//! - `BidResult<T>` output, where `Err(InvalidInput)` means "nothing to
//!   display" rather than a crash
//!
//! No I/O, no hidden state: every derived figure is a function of the
//! cost breakdown and the inputs passed in.
//!
//! ## Available Operations
//!
//! - [`crew::estimate_days_for_crew`] - scale job duration to a different crew
//! - [`crew::additional_labor_cost`] - cost of extra labor days
//! - [`margin::project_custom_margin`] - revenue/profit at a custom margin

pub mod crew;
pub mod margin;

pub use crew::{additional_labor_cost, estimate_days_for_crew};
pub use margin::{project_custom_margin, MarginProjection};

/// Reference crew size against which the server computes `num_days`.
///
/// Day estimates for other crews are scaled proportionally from this.
pub const BASELINE_CREW_SIZE: u32 = 3;
