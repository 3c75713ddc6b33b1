//! Model inputs — business, infrastructure, and stage configuration.
//!
//! All three structures are supplied externally and treated as immutable
//! for the length of a run. Money is plain USD, rates are fractions in
//! `[0, 1]`, and time is an integer month index starting at 1.
//!
//! Reference values live in the `Default` impls and in
//! [`ModelInputs::reference`]; nothing is cached globally.
//!
//! ```
//! use venturesim_logic::params::{validate, ModelInputs};
//!
//! let inputs = ModelInputs::reference();
//! assert!(validate(&inputs).is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::horizons;
use crate::error::{ConfigurationIssue, ModelError, Result};
use crate::stages;

// ============================================================================
// BUSINESS
// ============================================================================

/// Acquisition, retention, and pricing assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessParameters {
    /// Paid video views per month before organic amplification.
    pub base_video_views: f64,
    /// Organic reach multiplier applied to paid views.
    pub organic_multiplier: f64,
    /// Fraction of impressions that sign up.
    pub view_to_signup_rate: f64,
    /// Fraction of signups that form a company.
    pub formation_conversion_rate: f64,
    /// K-factor: additional companies generated per company.
    pub viral_coefficient: f64,
    /// Fraction of existing companies lost each month.
    pub monthly_churn_rate: f64,
    /// Average companies formed by one founder.
    pub companies_per_founder: f64,
    /// Basic tier monthly price.
    pub basic_price: f64,
    /// Pro tier monthly price.
    pub pro_price: f64,
    /// Fraction of companies on the pro tier.
    pub pro_adoption_rate: f64,
    /// One-time fee charged per formation.
    pub formation_fee: f64,
    /// Marketing spend per month.
    pub monthly_marketing_spend: f64,
}

impl Default for BusinessParameters {
    fn default() -> Self {
        Self {
            base_video_views: 100_000.0,
            organic_multiplier: 3.0,
            view_to_signup_rate: 0.005,
            formation_conversion_rate: 0.30,
            viral_coefficient: 0.4,
            monthly_churn_rate: 0.03,
            companies_per_founder: 1.5,
            basic_price: 29.0,
            pro_price: 79.0,
            pro_adoption_rate: 0.25,
            formation_fee: 120.0,
            monthly_marketing_spend: 5_000.0,
        }
    }
}

// ============================================================================
// INFRASTRUCTURE
// ============================================================================

/// Per-company running costs, per-formation costs, and stage levers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureParameters {
    /// Compute cost per company per month.
    pub compute_per_company: f64,
    /// Storage cost per company per month.
    pub storage_per_company: f64,
    /// Database cost per company per month.
    pub database_per_company: f64,
    /// CDN cost per company per month.
    pub cdn_per_company: f64,
    /// Email/SMS cost per company per month.
    pub communications_per_company: f64,
    /// State filing fee paid per formation.
    pub state_filing_fee: f64,
    /// Identity verification cost per formation.
    pub identity_verification: f64,
    /// Infrastructure cost incurred per formation.
    pub infrastructure_per_formation: f64,
    /// Payment processing fee as a fraction of charged revenue.
    pub payment_processing_rate: f64,
    /// Maximum cloud credits applied in one month.
    pub monthly_credits_cap: f64,
    /// Fraction of per-company cost saved once self-hosted.
    pub self_hosting_savings_rate: f64,
    /// One-time cost to move onto self-hosted infrastructure.
    pub self_hosting_setup_cost: f64,
    /// Costs paid every month regardless of company count.
    pub fixed_monthly_costs: f64,
}

impl InfrastructureParameters {
    /// Sum of the five per-company monthly cost components.
    pub fn per_company_monthly_cost(&self) -> f64 {
        self.compute_per_company
            + self.storage_per_company
            + self.database_per_company
            + self.cdn_per_company
            + self.communications_per_company
    }

    /// Direct cost of forming one company charged `formation_fee`.
    pub fn formation_cogs(&self, formation_fee: f64) -> f64 {
        self.state_filing_fee
            + self.identity_verification
            + self.infrastructure_per_formation
            + formation_fee * self.payment_processing_rate
    }
}

impl Default for InfrastructureParameters {
    fn default() -> Self {
        Self {
            compute_per_company: 0.85,
            storage_per_company: 0.12,
            database_per_company: 0.45,
            cdn_per_company: 0.08,
            communications_per_company: 0.35,
            state_filing_fee: 80.0,
            identity_verification: 1.50,
            infrastructure_per_formation: 3.51,
            payment_processing_rate: 0.03,
            monthly_credits_cap: 10_000.0,
            self_hosting_savings_rate: 0.60,
            self_hosting_setup_cost: 25_000.0,
            fixed_monthly_costs: 500.0,
        }
    }
}

// ============================================================================
// STAGES
// ============================================================================

/// A contiguous, inclusive month range with its own cost and pricing regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthStage {
    pub name: String,
    /// First month of the stage (inclusive).
    pub start_month: u32,
    /// Last month of the stage (inclusive).
    pub end_month: u32,
    /// Cloud credits offset infrastructure spend.
    pub aws_credits_active: bool,
    /// Infrastructure runs self-hosted at reduced per-company cost.
    pub self_hosting_active: bool,
    /// Multiplier applied to both tier prices.
    pub pricing_multiplier: f64,
}

impl GrowthStage {
    pub fn contains(&self, month: u32) -> bool {
        (self.start_month..=self.end_month).contains(&month)
    }

    pub fn duration_months(&self) -> u32 {
        self.end_month.saturating_sub(self.start_month) + 1
    }
}

/// Credits → paid cloud → self-hosted, covering months 1–24.
pub fn reference_stages() -> Vec<GrowthStage> {
    vec![
        GrowthStage {
            name: "AWS Credits".to_string(),
            start_month: 1,
            end_month: 6,
            aws_credits_active: true,
            self_hosting_active: false,
            pricing_multiplier: 1.0,
        },
        GrowthStage {
            name: "Paid Cloud".to_string(),
            start_month: 7,
            end_month: 12,
            aws_credits_active: false,
            self_hosting_active: false,
            pricing_multiplier: 1.0,
        },
        GrowthStage {
            name: "Self-Hosted".to_string(),
            start_month: 13,
            end_month: 24,
            aws_credits_active: false,
            self_hosting_active: true,
            pricing_multiplier: 1.1,
        },
    ]
}

// ============================================================================
// COMBINED INPUTS
// ============================================================================

/// Everything one projection run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInputs {
    pub business: BusinessParameters,
    pub infrastructure: InfrastructureParameters,
    pub stages: Vec<GrowthStage>,
    pub horizon_months: u32,
}

impl ModelInputs {
    /// The reference base case, built fresh on every call.
    pub fn reference() -> Self {
        Self {
            business: BusinessParameters::default(),
            infrastructure: InfrastructureParameters::default(),
            stages: reference_stages(),
            horizon_months: horizons::REFERENCE_MONTHS,
        }
    }
}

impl Default for ModelInputs {
    fn default() -> Self {
        Self::reference()
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Fail with a range error unless `value` is finite and non-negative.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::Range { field, value })
    }
}

/// Fail with a range error unless `value` lies in `[0, 1]`.
pub(crate) fn ensure_fraction(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::Range { field, value })
    }
}

fn business_issues(b: &BusinessParameters, issues: &mut Vec<ModelError>) {
    let fractions = [
        ("view_to_signup_rate", b.view_to_signup_rate),
        ("formation_conversion_rate", b.formation_conversion_rate),
        ("monthly_churn_rate", b.monthly_churn_rate),
        ("pro_adoption_rate", b.pro_adoption_rate),
    ];
    let non_negative = [
        ("base_video_views", b.base_video_views),
        ("organic_multiplier", b.organic_multiplier),
        ("viral_coefficient", b.viral_coefficient),
        ("companies_per_founder", b.companies_per_founder),
        ("basic_price", b.basic_price),
        ("pro_price", b.pro_price),
        ("formation_fee", b.formation_fee),
        ("monthly_marketing_spend", b.monthly_marketing_spend),
    ];
    issues.extend(fractions.iter().filter_map(|&(f, v)| ensure_fraction(f, v).err()));
    issues.extend(
        non_negative
            .iter()
            .filter_map(|&(f, v)| ensure_non_negative(f, v).err()),
    );
}

fn infrastructure_issues(i: &InfrastructureParameters, issues: &mut Vec<ModelError>) {
    let fractions = [
        ("payment_processing_rate", i.payment_processing_rate),
        ("self_hosting_savings_rate", i.self_hosting_savings_rate),
    ];
    let non_negative = [
        ("compute_per_company", i.compute_per_company),
        ("storage_per_company", i.storage_per_company),
        ("database_per_company", i.database_per_company),
        ("cdn_per_company", i.cdn_per_company),
        ("communications_per_company", i.communications_per_company),
        ("state_filing_fee", i.state_filing_fee),
        ("identity_verification", i.identity_verification),
        ("infrastructure_per_formation", i.infrastructure_per_formation),
        ("monthly_credits_cap", i.monthly_credits_cap),
        ("self_hosting_setup_cost", i.self_hosting_setup_cost),
        ("fixed_monthly_costs", i.fixed_monthly_costs),
    ];
    issues.extend(fractions.iter().filter_map(|&(f, v)| ensure_fraction(f, v).err()));
    issues.extend(
        non_negative
            .iter()
            .filter_map(|&(f, v)| ensure_non_negative(f, v).err()),
    );
}

/// Validate a full input set, returning every problem found.
pub fn collect_issues(inputs: &ModelInputs) -> Vec<ModelError> {
    let mut issues = Vec::new();

    if inputs.horizon_months < 1 {
        issues.push(ConfigurationIssue::NonPositiveHorizon(inputs.horizon_months).into());
    }
    issues.extend(
        stages::coverage_issues(&inputs.stages)
            .into_iter()
            .map(ModelError::from),
    );
    for stage in &inputs.stages {
        if let Err(e) = ensure_non_negative("pricing_multiplier", stage.pricing_multiplier) {
            issues.push(e);
        }
    }

    business_issues(&inputs.business, &mut issues);
    infrastructure_issues(&inputs.infrastructure, &mut issues);
    issues
}

/// Validate a full input set, returning the first problem found.
pub fn validate(inputs: &ModelInputs) -> Result<()> {
    match collect_issues(inputs).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_inputs_valid() {
        assert!(collect_issues(&ModelInputs::reference()).is_empty());
    }

    #[test]
    fn test_default_matches_reference() {
        assert_eq!(ModelInputs::default(), ModelInputs::reference());
    }

    #[test]
    fn test_per_company_cost_sum() {
        let infra = InfrastructureParameters::default();
        assert!((infra.per_company_monthly_cost() - 1.85).abs() < 1e-9);
    }

    #[test]
    fn test_formation_cogs_reference() {
        let infra = InfrastructureParameters::default();
        assert!((infra.formation_cogs(120.0) - 88.61).abs() < 1e-9);
    }

    #[test]
    fn test_stage_contains_inclusive() {
        let stage = &reference_stages()[1];
        assert!(!stage.contains(6));
        assert!(stage.contains(7));
        assert!(stage.contains(12));
        assert!(!stage.contains(13));
        assert_eq!(stage.duration_months(), 6);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let mut inputs = ModelInputs::reference();
        inputs.horizon_months = 0;
        assert_eq!(
            validate(&inputs),
            Err(ModelError::Configuration(
                ConfigurationIssue::NonPositiveHorizon(0)
            ))
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut inputs = ModelInputs::reference();
        inputs.business.pro_price = -1.0;
        assert_eq!(
            validate(&inputs),
            Err(ModelError::Range {
                field: "pro_price",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_rate_above_one_rejected() {
        let mut inputs = ModelInputs::reference();
        inputs.business.monthly_churn_rate = 1.5;
        assert!(matches!(
            validate(&inputs),
            Err(ModelError::Range {
                field: "monthly_churn_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let mut inputs = ModelInputs::reference();
        inputs.infrastructure.fixed_monthly_costs = f64::NAN;
        assert_eq!(collect_issues(&inputs).len(), 1);
    }

    #[test]
    fn test_collects_all_issues() {
        let mut inputs = ModelInputs::reference();
        inputs.horizon_months = 0;
        inputs.business.basic_price = -5.0;
        inputs.infrastructure.payment_processing_rate = 2.0;
        inputs.stages[0].pricing_multiplier = -1.0;
        assert_eq!(collect_issues(&inputs).len(), 4);
    }

    #[test]
    fn test_inputs_json_roundtrip() {
        let inputs = ModelInputs::reference();
        let json = serde_json::to_string(&inputs).unwrap();
        let back: ModelInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inputs);
    }
}
