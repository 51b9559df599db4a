//! Text tables for the estimation screen.
//!
//! Rendering only: every function takes already-computed values and
//! returns a `String`, so the screens stay trivially testable.

use std::collections::BTreeMap;

use bid_core::costs::{CrewOption, EstimateResponse, MarginTier, MaterialLineItem};
use bid_core::projection::MarginProjection;
use bid_core::selection::Selection;
use bid_core::session::BidSession;

/// Format a dollar-ish amount: two decimals, thousands separators.
pub fn format_number(value: f64) -> String {
    let negative = value < 0.0;
    let text = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some(parts) => parts,
        None => (text.as_str(), "00"),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        int_grouped,
        frac_part
    )
}

/// Material names arrive snake_cased on the wire; show them with spaces.
fn display_material_name(name: &str) -> String {
    name.replace('_', " ")
}

/// The materials breakdown table.
pub fn render_materials(
    detailed_costs: &BTreeMap<String, MaterialLineItem>,
    material_total: f64,
) -> String {
    let mut out = String::new();
    out.push_str("Materials Breakdown\n");
    out.push_str(&format!(
        "{:<28} {:>10} {:>10} {:>10} {:>12} {:>12}\n",
        "Material", "Quantity", "Unit Size", "Order Size", "Unit Price", "Total Cost"
    ));
    for (name, item) in detailed_costs {
        out.push_str(&format!(
            "{:<28} {:>10} {:>10} {:>10} {:>12} {:>12}\n",
            display_material_name(name),
            item.quantity,
            item.unit_size,
            item.order_size,
            format!("${}", format_number(item.unit_price)),
            format!("${}", format_number(item.total_cost)),
        ));
    }
    out.push_str(&format!(
        "{:>86}\n",
        format!("Material Total: ${}", format_number(material_total))
    ));
    out
}

/// The labor duration options table; the selected row is marked.
pub fn render_duration_options(
    options: &[CrewOption],
    selection: &Selection<u32>,
) -> String {
    let mut out = String::new();
    out.push_str("Labor Duration Options\n");
    out.push_str(&format!("    {:>9} {:>15}\n", "Crew Size", "Estimated Days"));
    for option in options {
        let marker = if selection.is_selected(&option.crew_size) {
            ">>"
        } else {
            "  "
        };
        out.push_str(&format!(
            " {} {:>9} {:>15}\n",
            marker,
            option.crew_size,
            format_number(option.estimated_days),
        ));
    }
    out
}

/// The profit margin projections table: server tiers plus, if present,
/// the custom margin row.
pub fn render_margins(
    tiers: &BTreeMap<String, MarginTier>,
    selection: &Selection<String>,
    custom: Option<(&str, &MarginProjection)>,
) -> String {
    let mut out = String::new();
    out.push_str("Profit Margin Projections\n");
    out.push_str(&format!(
        "    {:<10} {:>14} {:>14} {:>14}\n",
        "Margin", "Revenue", "Profit", "Price Per LF"
    ));
    for (label, tier) in tiers {
        out.push_str(&margin_row(
            label,
            tier.revenue,
            tier.profit,
            tier.price_per_linear_foot,
            selection,
        ));
    }
    if let Some((label, projection)) = custom {
        out.push_str(&margin_row(
            label,
            projection.revenue,
            projection.profit,
            projection.price_per_linear_foot,
            selection,
        ));
        out.push_str(&format!(
            "    (custom) profit per LF: ${}\n",
            format_number(projection.profit_per_linear_foot)
        ));
    }
    out
}

fn margin_row(
    label: &str,
    revenue: f64,
    profit: f64,
    price_per_lf: f64,
    selection: &Selection<String>,
) -> String {
    let marker = if selection.is_selected(&label.to_string()) {
        ">>"
    } else {
        "  "
    };
    format!(
        " {} {:<10} {:>14} {:>14} {:>14}\n",
        marker,
        label,
        format!("${}", format_number(revenue)),
        format!("${}", format_number(profit)),
        format!("${}", format_number(price_per_lf)),
    )
}

/// The cost summary block under the tables.
pub fn render_summary(session: &BidSession, estimate: &EstimateResponse) -> String {
    let costs = &estimate.costs;
    let mut out = String::new();
    out.push_str("Summary\n");
    out.push_str(&format!(
        "  Material Total:        ${}\n",
        format_number(costs.material_total)
    ));
    out.push_str(&format!(
        "  Material Tax:          ${}\n",
        format_number(costs.material_tax)
    ));
    out.push_str(&format!(
        "  Delivery Charge:       ${}\n",
        format_number(costs.delivery_charge)
    ));
    out.push_str(&format!(
        "  Labor Cost:            ${}\n",
        format_number(costs.labor_costs.total_labor_cost)
    ));
    out.push_str(&format!(
        "  Total Cost:            ${}\n",
        format_number(costs.total_cost)
    ));
    out.push_str(&format!(
        "  Cost Per Linear Foot:  ${}\n",
        format_number(estimate.price_per_linear_foot)
    ));
    if let Some(crew) = session.crew_selection.selected() {
        out.push_str(&format!("  Selected Crew Size:    {} workers\n", crew));
    }
    if let Some(days) = session.custom_days {
        out.push_str(&format!(
            "  Custom Crew Estimate:  {} days\n",
            format_number(days)
        ));
    }
    if session.additional_labor_days > 0.0 {
        out.push_str(&format!(
            "  Additional Labor:      {} days @ crew of {} = ${}\n",
            format_number(session.additional_labor_days),
            session.resolved_crew_size(),
            format_number(session.additional_labor_cost()),
        ));
    }
    if let Some(margin) = session.margin_selection.selected() {
        out.push_str(&format!("  Selected Margin:       {}\n", margin));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bid_core::costs::{CostBreakdown, LaborCosts};
    use bid_core::session::SessionEvent;

    fn sample_estimate() -> EstimateResponse {
        let mut profit_margins = BTreeMap::new();
        profit_margins.insert(
            "20%".to_string(),
            MarginTier {
                revenue: 13062.5,
                profit: 2612.5,
                price_per_linear_foot: 43.54,
            },
        );
        let mut detailed_costs = BTreeMap::new();
        detailed_costs.insert(
            "line_posts".to_string(),
            MaterialLineItem {
                quantity: 30.0,
                unit_size: 1.0,
                order_size: 30.0,
                unit_price: 22.5,
                total_cost: 675.0,
            },
        );
        EstimateResponse {
            costs: CostBreakdown {
                total_cost: 10450.0,
                material_total: 5200.0,
                material_tax: 429.0,
                delivery_charge: 150.0,
                labor_costs: LaborCosts {
                    total_labor_cost: 4500.0,
                    num_days: 10.0,
                },
                labor_duration_options: vec![
                    CrewOption { crew_size: 3, estimated_days: 10.0 },
                    CrewOption { crew_size: 4, estimated_days: 7.5 },
                ],
                profit_margins,
                detailed_costs,
            },
            price_per_linear_foot: 34.83,
        }
    }

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891), "1,234,567.89");
        assert_eq!(format_number(999.5), "999.50");
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(-1250.0), "-1,250.00");
    }

    #[test]
    fn test_materials_table_humanizes_names() {
        let estimate = sample_estimate();
        let table = render_materials(&estimate.costs.detailed_costs, estimate.costs.material_total);
        assert!(table.contains("line posts"));
        assert!(!table.contains("line_posts"));
        assert!(table.contains("$675.00"));
        assert!(table.contains("Material Total: $5,200.00"));
    }

    #[test]
    fn test_duration_table_marks_selection() {
        let estimate = sample_estimate();
        let mut selection = Selection::Unselected;
        selection.toggle(4);
        let table = render_duration_options(&estimate.costs.labor_duration_options, &selection);
        let selected_line = table.lines().find(|l| l.contains(">>")).unwrap();
        assert!(selected_line.contains('4'));
        assert!(selected_line.contains("7.50"));
    }

    #[test]
    fn test_margin_table_includes_custom_row() {
        let estimate = sample_estimate();
        let projection = MarginProjection {
            revenue: 14413.79,
            profit: 3963.79,
            cost_per_linear_foot: 34.83,
            price_per_linear_foot: 48.05,
            profit_per_linear_foot: 13.21,
        };
        let selection = Selection::Selected("27.5%".to_string());
        let table = render_margins(
            &estimate.costs.profit_margins,
            &selection,
            Some(("27.5%", &projection)),
        );
        assert!(table.contains("20%"));
        let custom_line = table.lines().find(|l| l.contains("27.5%")).unwrap();
        assert!(custom_line.starts_with(" >>"));
        assert!(table.contains("$13.21"));
    }

    #[test]
    fn test_summary_shows_projection_extras() {
        let estimate = sample_estimate();
        let session = BidSession::new()
            .apply(SessionEvent::EstimateReceived(sample_estimate()))
            .apply(SessionEvent::CrewOptionToggled(4))
            .apply(SessionEvent::AdditionalDaysChanged(2.0));
        let summary = render_summary(&session, &estimate);
        assert!(summary.contains("Total Cost:            $10,450.00"));
        assert!(summary.contains("Selected Crew Size:    4 workers"));
        // 2 days * $150 * crew 4
        assert!(summary.contains("$1,200.00"));
    }
}
