//! Lifetime value per company and per founder.
//!
//! LTV has two parts: the margin on the one-time formation fee, and the
//! recurring margin over a fixed cohort horizon. Retention decays
//! exponentially at `1 - churn` per month with no discounting.
//!
//! The recurring part is computed per stage and the stage values are
//! averaged with equal weight, regardless of how long each stage lasts.

use serde::{Deserialize, Serialize};

use crate::constants::horizons::COHORT_LTV_MONTHS;
use crate::error::{ConfigurationIssue, Result};
use crate::params::{BusinessParameters, GrowthStage, InfrastructureParameters};
use crate::revenue::blended_price;

/// Recurring value of one company under a single stage's economics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLtv {
    pub stage_name: String,
    /// Price minus processing minus infrastructure, per company per month.
    pub monthly_profit: f64,
    /// Retention-weighted sum of `monthly_profit` over the cohort horizon.
    pub ltv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtvResult {
    /// Formation fee minus formation COGS.
    pub formation_ltv: f64,
    /// One entry per input stage, in input order.
    pub stage_ltvs: Vec<StageLtv>,
    /// Unweighted mean of `stage_ltvs`.
    pub average_stage_ltv: f64,
    /// `formation_ltv + average_stage_ltv`.
    pub blended_ltv: f64,
    pub ltv_per_founder: f64,
}

/// Retention-weighted value of a constant monthly profit stream.
///
/// Month `m` (1-based) is weighted by `retention^(m-1)`.
pub fn cohort_value(monthly_profit: f64, retention_rate: f64, months: u32) -> f64 {
    (0..months)
        .map(|m| monthly_profit * retention_rate.powi(m as i32))
        .sum()
}

/// Per-company monthly profit under one stage.
pub fn stage_monthly_profit(
    business: &BusinessParameters,
    infra: &InfrastructureParameters,
    stage: &GrowthStage,
) -> f64 {
    let price = blended_price(business, stage.pricing_multiplier);
    let processing = price * infra.payment_processing_rate;
    let infra_cost = if stage.aws_credits_active {
        0.0
    } else if stage.self_hosting_active {
        infra.per_company_monthly_cost() * (1.0 - infra.self_hosting_savings_rate)
    } else {
        infra.per_company_monthly_cost()
    };
    price - processing - infra_cost
}

/// LTV across an ordered stage list.
pub fn calculate_ltv(
    business: &BusinessParameters,
    infra: &InfrastructureParameters,
    stages: &[GrowthStage],
) -> Result<LtvResult> {
    if stages.is_empty() {
        return Err(ConfigurationIssue::EmptyStages.into());
    }

    let formation_ltv = business.formation_fee - infra.formation_cogs(business.formation_fee);
    let retention = 1.0 - business.monthly_churn_rate;

    let stage_ltvs: Vec<StageLtv> = stages
        .iter()
        .map(|stage| {
            let monthly_profit = stage_monthly_profit(business, infra, stage);
            StageLtv {
                stage_name: stage.name.clone(),
                monthly_profit,
                ltv: cohort_value(monthly_profit, retention, COHORT_LTV_MONTHS),
            }
        })
        .collect();

    let average_stage_ltv =
        stage_ltvs.iter().map(|s| s.ltv).sum::<f64>() / stage_ltvs.len() as f64;
    let blended_ltv = formation_ltv + average_stage_ltv;

    Ok(LtvResult {
        formation_ltv,
        stage_ltvs,
        average_stage_ltv,
        blended_ltv,
        ltv_per_founder: blended_ltv * business.companies_per_founder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::reference_stages;

    #[test]
    fn test_formation_ltv_reference() {
        let ltv = calculate_ltv(
            &BusinessParameters::default(),
            &InfrastructureParameters::default(),
            &reference_stages(),
        )
        .unwrap();
        // 120 - (80 + 1.50 + 3.51 + 3.60)
        assert!((ltv.formation_ltv - 31.39).abs() < 1e-9);
    }

    #[test]
    fn test_cohort_value_no_churn() {
        assert!((cohort_value(10.0, 1.0, 12) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_cohort_value_decay() {
        // 10 + 5 + 2.5
        assert!((cohort_value(10.0, 0.5, 3) - 17.5).abs() < 1e-12);
        assert_eq!(cohort_value(10.0, 0.9, 0), 0.0);
    }

    #[test]
    fn test_stage_profits_reference() {
        let business = BusinessParameters::default();
        let infra = InfrastructureParameters::default();
        let stages = reference_stages();
        // 41.5 - 1.245 - 0 (credits)
        assert!((stage_monthly_profit(&business, &infra, &stages[0]) - 40.255).abs() < 1e-9);
        // 41.5 - 1.245 - 1.85
        assert!((stage_monthly_profit(&business, &infra, &stages[1]) - 38.405).abs() < 1e-9);
        // 45.65 - 1.3695 - 0.74
        assert!((stage_monthly_profit(&business, &infra, &stages[2]) - 43.5405).abs() < 1e-9);
    }

    #[test]
    fn test_blended_is_formation_plus_average() {
        let ltv = calculate_ltv(
            &BusinessParameters::default(),
            &InfrastructureParameters::default(),
            &reference_stages(),
        )
        .unwrap();
        let avg = ltv.stage_ltvs.iter().map(|s| s.ltv).sum::<f64>() / 3.0;
        assert!((ltv.blended_ltv - (ltv.formation_ltv + avg)).abs() < 1e-9);
        assert!((ltv.ltv_per_founder - ltv.blended_ltv * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_equal_weighting_ignores_duration() {
        let business = BusinessParameters::default();
        let infra = InfrastructureParameters::default();
        let mut stretched = reference_stages();
        stretched[2].end_month = 120;
        let a = calculate_ltv(&business, &infra, &reference_stages()).unwrap();
        let b = calculate_ltv(&business, &infra, &stretched).unwrap();
        assert_eq!(a.blended_ltv, b.blended_ltv);
    }

    #[test]
    fn test_empty_stages_rejected() {
        let result = calculate_ltv(
            &BusinessParameters::default(),
            &InfrastructureParameters::default(),
            &[],
        );
        assert!(result.is_err());
    }
}
