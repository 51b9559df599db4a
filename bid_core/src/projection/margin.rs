//! # Custom Margin Projection
//!
//! Converts a net profit margin percentage into projected revenue, profit,
//! and per-linear-foot pricing. Net margin means profit as a fraction of
//! *revenue*, not of cost:
//!
//! ```text
//! revenue = total_cost / (1 - margin/100)
//! profit  = revenue - total_cost
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bid_core::projection::project_custom_margin;
//!
//! let p = project_custom_margin(1000.0, 100.0, 20.0).unwrap();
//! assert_eq!(p.revenue, 1250.0);
//! assert_eq!(p.profit, 250.0);
//! assert_eq!(p.price_per_linear_foot, 12.5);
//! assert_eq!(p.profit_per_linear_foot, 2.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BidError, BidResult};

/// Projected figures for a user-chosen margin.
///
/// Ephemeral: recomputed on demand from `(total_cost, linear_feet,
/// margin_percent)`, never cached across input changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginProjection {
    pub revenue: f64,
    pub profit: f64,
    pub cost_per_linear_foot: f64,
    pub price_per_linear_foot: f64,
    pub profit_per_linear_foot: f64,
}

/// Project revenue and profit for a custom net profit margin.
///
/// # Arguments
///
/// * `total_cost` - the estimate's total job cost (must be positive)
/// * `linear_feet` - fence length for per-LF normalization (must be positive)
/// * `margin_percent` - desired net margin, e.g. `27.5` for 27.5%. Must be
///   finite and below 100: at 100% the revenue formula divides by zero,
///   and above it revenue goes negative, so those inputs are rejected
///   outright. Negative margins are allowed (pricing below cost).
///
/// # Returns
///
/// * `Ok(MarginProjection)` - display-ready figures
/// * `Err(BidError::InvalidInput)` - out-of-domain input; the caller
///   suppresses the projection rather than showing garbage
pub fn project_custom_margin(
    total_cost: f64,
    linear_feet: f64,
    margin_percent: f64,
) -> BidResult<MarginProjection> {
    if !total_cost.is_finite() || total_cost <= 0.0 {
        return Err(BidError::invalid_input(
            "total_cost",
            total_cost.to_string(),
            "Total cost must be positive",
        ));
    }
    if !linear_feet.is_finite() || linear_feet <= 0.0 {
        return Err(BidError::invalid_input(
            "linear_feet",
            linear_feet.to_string(),
            "Fence length must be positive",
        ));
    }
    if !margin_percent.is_finite() {
        return Err(BidError::invalid_input(
            "margin_percent",
            margin_percent.to_string(),
            "Margin must be a number",
        ));
    }
    if margin_percent >= 100.0 {
        return Err(BidError::invalid_input(
            "margin_percent",
            margin_percent.to_string(),
            "Net margin must be below 100%",
        ));
    }

    let revenue = total_cost / (1.0 - margin_percent / 100.0);
    let profit = revenue - total_cost;
    let cost_per_linear_foot = total_cost / linear_feet;
    let price_per_linear_foot = revenue / linear_feet;
    let profit_per_linear_foot = price_per_linear_foot - cost_per_linear_foot;

    Ok(MarginProjection {
        revenue,
        profit,
        cost_per_linear_foot,
        price_per_linear_foot,
        profit_per_linear_foot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_percent_margin() {
        let p = project_custom_margin(1000.0, 100.0, 20.0).unwrap();
        assert_eq!(p.revenue, 1250.0);
        assert_eq!(p.profit, 250.0);
        assert_eq!(p.cost_per_linear_foot, 10.0);
        assert_eq!(p.price_per_linear_foot, 12.5);
        assert_eq!(p.profit_per_linear_foot, 2.5);
    }

    #[test]
    fn test_margin_is_fraction_of_revenue_not_cost() {
        // Net margin convention: profit / revenue == margin
        let p = project_custom_margin(7300.0, 250.0, 27.5).unwrap();
        let realized_margin = p.profit / p.revenue;
        assert!((realized_margin - 0.275).abs() < 1e-12);
    }

    #[test]
    fn test_zero_margin_is_break_even() {
        let p = project_custom_margin(1000.0, 100.0, 0.0).unwrap();
        assert_eq!(p.revenue, 1000.0);
        assert_eq!(p.profit, 0.0);
        assert_eq!(p.profit_per_linear_foot, 0.0);
    }

    #[test]
    fn test_negative_margin_prices_below_cost() {
        let p = project_custom_margin(1000.0, 100.0, -25.0).unwrap();
        assert_eq!(p.revenue, 800.0);
        assert_eq!(p.profit, -200.0);
    }

    #[test]
    fn test_zero_linear_feet_rejected() {
        assert!(project_custom_margin(1000.0, 0.0, 20.0).is_err());
    }

    #[test]
    fn test_non_numeric_margin_rejected() {
        assert!(project_custom_margin(1000.0, 100.0, f64::NAN).is_err());
    }

    #[test]
    fn test_margin_at_or_above_hundred_rejected() {
        assert!(project_custom_margin(1000.0, 100.0, 100.0).is_err());
        assert!(project_custom_margin(1000.0, 100.0, 150.0).is_err());
    }

    #[test]
    fn test_zero_or_negative_cost_rejected() {
        assert!(project_custom_margin(0.0, 100.0, 20.0).is_err());
        assert!(project_custom_margin(-50.0, 100.0, 20.0).is_err());
    }

    #[test]
    fn test_projection_serialization_roundtrip() {
        let p = project_custom_margin(1000.0, 100.0, 20.0).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let roundtrip: MarginProjection = serde_json::from_str(&json).unwrap();
        assert_eq!(p, roundtrip);
    }
}
