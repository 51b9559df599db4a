//! # Remote Pricing Data Model
//!
//! Wire shapes for the remote bid-pricing API. These structs mirror the
//! server's JSON exactly (field names are the wire names) and are
//! read-only from the calculator's perspective: the server computes them,
//! the projection module derives secondary figures from them.
//!
//! ## JSON Example (cost estimation response)
//!
//! ```json
//! {
//!   "costs": {
//!     "total_cost": 10450.0,
//!     "material_total": 5200.0,
//!     "material_tax": 429.0,
//!     "delivery_charge": 150.0,
//!     "labor_costs": { "total_labor_cost": 4500.0, "num_days": 10.0 },
//!     "labor_duration_options": [
//!       { "crew_size": 2, "estimated_days": 15.0 },
//!       { "crew_size": 3, "estimated_days": 10.0 },
//!       { "crew_size": 4, "estimated_days": 7.5 }
//!     ],
//!     "profit_margins": {
//!       "20%": { "revenue": 13062.5, "profit": 2612.5, "price_per_linear_foot": 43.54 }
//!     },
//!     "detailed_costs": {
//!       "line_posts": {
//!         "quantity": 30.0, "unit_size": 1.0, "order_size": 30.0,
//!         "unit_price": 22.5, "total_cost": 675.0
//!       }
//!     }
//!   },
//!   "price_per_linear_foot": 34.83
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One material line in the detailed cost table.
///
/// `unit_size` is how many units one order covers (e.g. feet per roll of
/// chain link fabric); `order_size` is how many orders the job needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLineItem {
    pub quantity: f64,
    pub unit_size: f64,
    pub order_size: f64,
    pub unit_price: f64,
    pub total_cost: f64,
}

/// Labor cost summary for the baseline crew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborCosts {
    /// Total labor cost over the whole job
    pub total_labor_cost: f64,
    /// Days required at the baseline crew size
    pub num_days: f64,
}

/// One row of the labor duration options table: how long the job takes
/// with a given crew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewOption {
    pub crew_size: u32,
    pub estimated_days: f64,
}

/// A server-computed profit margin tier (e.g. the "20%" row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginTier {
    pub revenue: f64,
    pub profit: f64,
    pub price_per_linear_foot: f64,
}

/// Full cost breakdown returned by the cost-estimation endpoint.
///
/// Margin tiers and detailed costs use `BTreeMap` so tables render in a
/// stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total_cost: f64,
    pub material_total: f64,
    pub material_tax: f64,
    pub delivery_charge: f64,
    pub labor_costs: LaborCosts,
    pub labor_duration_options: Vec<CrewOption>,
    pub profit_margins: BTreeMap<String, MarginTier>,
    pub detailed_costs: BTreeMap<String, MaterialLineItem>,
}

impl CostBreakdown {
    /// Look up a duration option by crew size.
    pub fn duration_option(&self, crew_size: u32) -> Option<&CrewOption> {
        self.labor_duration_options
            .iter()
            .find(|opt| opt.crew_size == crew_size)
    }

    /// Whether a margin label is one of the server-computed tiers.
    pub fn has_margin_tier(&self, label: &str) -> bool {
        self.profit_margins.contains_key(label)
    }
}

/// Top-level response of the cost-estimation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub costs: CostBreakdown,
    /// Base cost per linear foot (cost, not price: no margin applied)
    pub price_per_linear_foot: f64,
}

/// Response of the material-cost lookup endpoint.
///
/// Tax and delivery are not always present at this stage (they depend on
/// estimation parameters the user has not submitted yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCostsResponse {
    pub detailed_costs: BTreeMap<String, MaterialLineItem>,
    pub material_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_charge: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_estimate_json() -> &'static str {
        r#"{
            "costs": {
                "total_cost": 10450.0,
                "material_total": 5200.0,
                "material_tax": 429.0,
                "delivery_charge": 150.0,
                "labor_costs": { "total_labor_cost": 4500.0, "num_days": 10.0 },
                "labor_duration_options": [
                    { "crew_size": 2, "estimated_days": 15.0 },
                    { "crew_size": 3, "estimated_days": 10.0 },
                    { "crew_size": 4, "estimated_days": 7.5 }
                ],
                "profit_margins": {
                    "20%": { "revenue": 13062.5, "profit": 2612.5, "price_per_linear_foot": 43.54 },
                    "30%": { "revenue": 14928.57, "profit": 4478.57, "price_per_linear_foot": 49.76 }
                },
                "detailed_costs": {
                    "chain_link_fabric": {
                        "quantity": 300.0, "unit_size": 50.0, "order_size": 6.0,
                        "unit_price": 189.0, "total_cost": 1134.0
                    },
                    "line_posts": {
                        "quantity": 30.0, "unit_size": 1.0, "order_size": 30.0,
                        "unit_price": 22.5, "total_cost": 675.0
                    }
                }
            },
            "price_per_linear_foot": 34.83
        }"#
    }

    #[test]
    fn test_estimate_response_deserializes_wire_names() {
        let estimate: EstimateResponse = serde_json::from_str(sample_estimate_json()).unwrap();
        assert_eq!(estimate.costs.labor_costs.num_days, 10.0);
        assert_eq!(estimate.costs.labor_duration_options.len(), 3);
        assert!(estimate.costs.profit_margins.contains_key("20%"));
        assert_eq!(
            estimate.costs.detailed_costs["line_posts"].unit_price,
            22.5
        );
        assert_eq!(estimate.price_per_linear_foot, 34.83);
    }

    #[test]
    fn test_estimate_response_roundtrip() {
        let estimate: EstimateResponse = serde_json::from_str(sample_estimate_json()).unwrap();
        let json = serde_json::to_string(&estimate).unwrap();
        let roundtrip: EstimateResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(estimate, roundtrip);
    }

    #[test]
    fn test_duration_option_lookup() {
        let estimate: EstimateResponse = serde_json::from_str(sample_estimate_json()).unwrap();
        assert_eq!(estimate.costs.duration_option(4).unwrap().estimated_days, 7.5);
        assert!(estimate.costs.duration_option(9).is_none());
    }

    #[test]
    fn test_margin_tier_lookup() {
        let estimate: EstimateResponse = serde_json::from_str(sample_estimate_json()).unwrap();
        assert!(estimate.costs.has_margin_tier("30%"));
        assert!(!estimate.costs.has_margin_tier("27.5%"));
    }

    #[test]
    fn test_material_costs_without_tax_or_delivery() {
        let json = r#"{
            "detailed_costs": {
                "end_posts": {
                    "quantity": 2.0, "unit_size": 1.0, "order_size": 2.0,
                    "unit_price": 31.0, "total_cost": 62.0
                }
            },
            "material_total": 62.0
        }"#;
        let materials: MaterialCostsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(materials.material_total, 62.0);
        assert!(materials.material_tax.is_none());
        assert!(materials.delivery_charge.is_none());
    }
}
