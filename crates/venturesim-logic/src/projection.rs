//! Growth projection engine — month-by-month companies, revenue, and profit.
//!
//! Each run validates its inputs once, then iterates months `1..=N`
//! threading a running company count through the calculators:
//!
//! 1. Resolve the governing stage (first-stage fallback past the last stage)
//! 2. Add direct acquisition (constant every month) plus viral inflow from
//!    the existing base
//! 3. Churn the pre-existing base; this month's new companies do not churn
//! 4. Price formation fees and recurring revenue at the stage multiplier
//! 5. Subtract formation COGS, payment processing, and net infrastructure
//!
//! All state is local to one call; concurrent runs never interact.
//!
//! ```
//! use venturesim_logic::params::ModelInputs;
//! use venturesim_logic::projection::project_growth;
//!
//! let projection = project_growth(&ModelInputs::reference()).unwrap();
//! assert_eq!(projection.cohorts.len(), 24);
//! assert!(projection.ltv_cac_ratio > 0.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::acquisition::{calculate_cac, monthly_viral_inflow, CacResult};
use crate::constants::horizons::MONTHS_PER_YEAR;
use crate::error::{checked_ratio, ensure_finite, ensure_positive, ConfigurationIssue, Result};
use crate::infrastructure::calculate_infra_cost;
use crate::ltv::{calculate_ltv, LtvResult};
use crate::params::{validate, ModelInputs};
use crate::revenue::calculate_saas_revenue;
use crate::stages::resolve_stage;

/// One simulated month. Created once by the engine and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCohort {
    /// 1-based month index.
    pub month: u32,
    pub stage_name: String,
    /// No stage covered this month; the first stage was applied.
    pub stage_fallback: bool,

    /// Companies acquired through the marketing funnel.
    pub direct_companies: f64,
    /// Companies referred by the existing base.
    pub viral_companies: f64,
    pub new_companies: f64,
    /// Running company count after churn and this month's additions.
    pub total_companies: f64,

    pub formation_revenue: f64,
    /// Subscription revenue (MRR) for the month.
    pub recurring_revenue: f64,
    pub total_revenue: f64,

    pub formation_cogs: f64,
    pub processing_cost: f64,
    /// Net of credits.
    pub infrastructure_cost: f64,
    pub credits_applied: f64,
    pub self_hosting_savings: f64,
    pub gross_profit: f64,

    pub cumulative_revenue: f64,
    pub cumulative_profit: f64,
}

/// Result of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjections {
    /// One entry per month, in month order.
    pub cohorts: Vec<MonthlyCohort>,
    pub total_revenue: f64,
    pub total_gross_profit: f64,
    pub total_infrastructure_cost: f64,
    /// Recurring revenue of the final month.
    pub final_mrr: f64,
    pub final_arr: f64,
    pub final_companies: f64,
    pub cac: CacResult,
    pub ltv: LtvResult,
    /// LTV per founder ÷ CAC per founder.
    pub ltv_cac_ratio: f64,
    /// CAC per founder ÷ final-month MRR per founder.
    pub payback_months: f64,
}

impl FinancialProjections {
    /// Total gross profit over total revenue.
    pub fn gross_margin(&self) -> Result<f64> {
        checked_ratio(self.total_gross_profit, self.total_revenue, "total revenue")
    }

    /// Months in which the first-stage fallback was applied.
    pub fn fallback_months(&self) -> Vec<u32> {
        self.cohorts
            .iter()
            .filter(|c| c.stage_fallback)
            .map(|c| c.month)
            .collect()
    }
}

/// Run the projection over `inputs.horizon_months` months.
pub fn project_growth(inputs: &ModelInputs) -> Result<FinancialProjections> {
    validate(inputs)?;

    let business = &inputs.business;
    let infra = &inputs.infrastructure;

    let cac = calculate_cac(business)?;
    let direct_per_month = cac.direct_companies;
    let unit_formation_cogs = infra.formation_cogs(business.formation_fee);
    let retention = 1.0 - business.monthly_churn_rate;

    let mut running_total = 0.0_f64;
    let mut total_revenue = 0.0_f64;
    let mut total_gross_profit = 0.0_f64;
    let mut total_infrastructure_cost = 0.0_f64;
    let mut cohorts = Vec::new();

    for month in 1..=inputs.horizon_months {
        let resolution = resolve_stage(&inputs.stages, month)?;
        let stage = resolution.stage();
        if resolution.is_fallback() {
            warn!(
                "Month {} not covered by any stage; applying '{}'",
                month, stage.name
            );
        }

        let viral_new = monthly_viral_inflow(running_total, business.viral_coefficient);
        let new_companies = direct_per_month + viral_new;
        running_total = running_total * retention + new_companies;

        let formation_revenue = new_companies * business.formation_fee;
        let saas = calculate_saas_revenue(business, running_total, stage.pricing_multiplier)?;
        let month_revenue = formation_revenue + saas.total_revenue;

        let formation_cogs = new_companies * unit_formation_cogs;
        let processing_cost = saas.total_revenue * infra.payment_processing_rate;
        let infra_cost = calculate_infra_cost(running_total, infra, stage)?;

        let gross_profit = month_revenue - (formation_cogs + processing_cost + infra_cost.net_cost);

        total_revenue += month_revenue;
        total_gross_profit += gross_profit;
        total_infrastructure_cost += infra_cost.net_cost;

        // Large finite inputs can still overflow; stop at the first bad month.
        ensure_finite("company count", running_total)?;
        ensure_finite("monthly revenue", month_revenue)?;
        ensure_finite("monthly gross profit", gross_profit)?;
        ensure_finite("cumulative revenue", total_revenue)?;
        ensure_finite("cumulative gross profit", total_gross_profit)?;
        ensure_finite("cumulative infrastructure cost", total_infrastructure_cost)?;

        debug!(
            "Month {} [{}]: {:.1} companies (+{:.1}), revenue {:.2}, profit {:.2}",
            month, stage.name, running_total, new_companies, month_revenue, gross_profit
        );

        cohorts.push(MonthlyCohort {
            month,
            stage_name: stage.name.clone(),
            stage_fallback: resolution.is_fallback(),
            direct_companies: direct_per_month,
            viral_companies: viral_new,
            new_companies,
            total_companies: running_total,
            formation_revenue,
            recurring_revenue: saas.total_revenue,
            total_revenue: month_revenue,
            formation_cogs,
            processing_cost,
            infrastructure_cost: infra_cost.net_cost,
            credits_applied: infra_cost.credits_applied,
            self_hosting_savings: infra_cost.self_hosting_savings,
            gross_profit,
            cumulative_revenue: total_revenue,
            cumulative_profit: total_gross_profit,
        });
    }

    let ltv = calculate_ltv(business, infra, &inputs.stages)?;

    let final_mrr = cohorts
        .last()
        .map(|c| c.recurring_revenue)
        .ok_or(ConfigurationIssue::NonPositiveHorizon(inputs.horizon_months))?;
    let final_arr = final_mrr * MONTHS_PER_YEAR as f64;

    let ltv_cac_ratio = checked_ratio(ltv.ltv_per_founder, cac.cac_per_founder, "CAC per founder")?;
    ensure_finite("LTV/CAC ratio", ltv_cac_ratio)?;

    ensure_positive("final MRR", final_mrr)?;
    let mrr_per_company = checked_ratio(final_mrr, running_total, "final company count")?;
    let payback_months = checked_ratio(
        cac.cac_per_founder,
        mrr_per_company * business.companies_per_founder,
        "final MRR per founder",
    )?;
    ensure_finite("payback months", payback_months)?;

    info!(
        "Projected {} months: {:.0} companies, ARR {:.0}, LTV/CAC {:.2}",
        inputs.horizon_months, running_total, final_arr, ltv_cac_ratio
    );

    Ok(FinancialProjections {
        cohorts,
        total_revenue,
        total_gross_profit,
        total_infrastructure_cost,
        final_mrr,
        final_arr,
        final_companies: running_total,
        cac,
        ltv,
        ltv_cac_ratio,
        payback_months,
    })
}

/// Projection of the reference base case, computed fresh on each call.
pub fn reference_projection() -> Result<FinancialProjections> {
    project_growth(&ModelInputs::reference())
}
