//! Infrastructure spend under the three-stage cost regime.
//!
//! Per-company cost is the sum of five components, discounted when the
//! stage is self-hosted. Fixed costs are added on top, then cloud credits
//! (capped per month) are netted off when the stage has them.

use serde::{Deserialize, Serialize};

use crate::error::{checked_ratio, Result};
use crate::params::{ensure_non_negative, GrowthStage, InfrastructureParameters};

/// Infrastructure spend for one month.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InfraCost {
    /// Per-company cost after any self-hosting discount.
    pub per_company_cost: f64,
    /// Gross spend before credits.
    pub total_cost: f64,
    /// Credits netted off; never exceeds `total_cost`.
    pub credits_applied: f64,
    /// Spend avoided versus running the same base on paid cloud.
    pub self_hosting_savings: f64,
    /// `total_cost - credits_applied`.
    pub net_cost: f64,
}

/// Cost of running `company_count` companies for one month in `stage`.
pub fn calculate_infra_cost(
    company_count: f64,
    infra: &InfrastructureParameters,
    stage: &GrowthStage,
) -> Result<InfraCost> {
    ensure_non_negative("company_count", company_count)?;

    let baseline_per_company = infra.per_company_monthly_cost();
    let per_company_cost = if stage.self_hosting_active {
        baseline_per_company * (1.0 - infra.self_hosting_savings_rate)
    } else {
        baseline_per_company
    };

    let total_cost = per_company_cost * company_count + infra.fixed_monthly_costs;
    let baseline_total = baseline_per_company * company_count + infra.fixed_monthly_costs;
    let self_hosting_savings = if stage.self_hosting_active {
        baseline_total - total_cost
    } else {
        0.0
    };

    let credits_applied = if stage.aws_credits_active {
        total_cost.min(infra.monthly_credits_cap)
    } else {
        0.0
    };

    Ok(InfraCost {
        per_company_cost,
        total_cost,
        credits_applied,
        self_hosting_savings,
        net_cost: total_cost - credits_applied,
    })
}

/// Months of self-hosting savings needed to recover the setup cost.
///
/// Savings are measured at a fixed `company_count`; zero savings is a
/// domain error rather than an infinite breakeven.
pub fn self_hosting_breakeven_months(
    infra: &InfrastructureParameters,
    company_count: f64,
) -> Result<f64> {
    ensure_non_negative("company_count", company_count)?;
    let monthly_savings =
        infra.per_company_monthly_cost() * infra.self_hosting_savings_rate * company_count;
    checked_ratio(
        infra.self_hosting_setup_cost,
        monthly_savings,
        "monthly self-hosting savings",
    )
}
