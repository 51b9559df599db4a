//! # Crew Scaling
//!
//! Converts total labor effort between crew sizes and prices extra labor
//! days. The duration model assumes constant total person-days: twice the
//! crew finishes in half the days.
//!
//! ## Example
//!
//! ```rust
//! use bid_core::projection::{estimate_days_for_crew, BASELINE_CREW_SIZE};
//!
//! // A 10-day job for the baseline crew of 3, done by a crew of 5:
//! let days = estimate_days_for_crew(10.0, BASELINE_CREW_SIZE, 5).unwrap();
//! assert_eq!(days, 6.0);
//! ```

use crate::errors::{BidError, BidResult};

/// Estimate how many days a job takes with a different crew size.
///
/// Assumes labor effort is crew-size-inversely-proportional (constant
/// total person-days): `estimated_days = base_days * base_crew / requested_crew`.
///
/// # Arguments
///
/// * `base_days` - days required at the baseline crew size (must be positive and finite)
/// * `base_crew_size` - the reference crew the base days were computed for
/// * `requested_crew_size` - the crew to scale to
///
/// # Returns
///
/// * `Ok(f64)` - the scaled day count, unrounded (format at display time)
/// * `Err(BidError::InvalidInput)` - zero crew or out-of-domain base days;
///   the caller shows no estimate
pub fn estimate_days_for_crew(
    base_days: f64,
    base_crew_size: u32,
    requested_crew_size: u32,
) -> BidResult<f64> {
    if !base_days.is_finite() || base_days <= 0.0 {
        return Err(BidError::invalid_input(
            "base_days",
            base_days.to_string(),
            "Base day count must be positive",
        ));
    }
    if base_crew_size == 0 {
        return Err(BidError::invalid_input(
            "base_crew_size",
            base_crew_size.to_string(),
            "Baseline crew must have at least one worker",
        ));
    }
    if requested_crew_size == 0 {
        return Err(BidError::invalid_input(
            "requested_crew_size",
            requested_crew_size.to_string(),
            "Crew must have at least one worker",
        ));
    }

    Ok(base_days * f64::from(base_crew_size) / f64::from(requested_crew_size))
}

/// Cost of working extra days beyond the estimate.
///
/// `cost = extra_days * daily_rate * round(crew_size)`. Crew size is
/// rounded to the nearest whole worker (fractional crews are not
/// physically meaningful) and floored at one.
///
/// Unlike the other operations this never fails: non-finite or negative
/// days/rates contribute zero, so a half-filled form degrades to "no
/// added cost" instead of an error.
pub fn additional_labor_cost(extra_days: f64, daily_rate: f64, crew_size: f64) -> f64 {
    let extra_days = if extra_days.is_finite() && extra_days > 0.0 {
        extra_days
    } else {
        0.0
    };
    let daily_rate = if daily_rate.is_finite() && daily_rate > 0.0 {
        daily_rate
    } else {
        0.0
    };
    let crew = if crew_size.is_finite() {
        crew_size.round().max(1.0)
    } else {
        1.0
    };

    extra_days * daily_rate * crew
}
