//! Recurring SaaS revenue for a company base split across two tiers.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{ensure_non_negative, BusinessParameters};

/// Pricing multiplier when no stage adjustment applies.
pub const LIST_PRICE_MULTIPLIER: f64 = 1.0;

/// Monthly recurring revenue broken down by tier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaasRevenue {
    /// Companies on the basic tier (fractional).
    pub basic_companies: f64,
    /// Companies on the pro tier (fractional).
    pub pro_companies: f64,
    pub basic_revenue: f64,
    pub pro_revenue: f64,
    pub total_revenue: f64,
    /// Adoption-weighted average price per company.
    pub blended_price: f64,
}

/// Adoption-weighted price per company at the given multiplier.
pub fn blended_price(params: &BusinessParameters, pricing_multiplier: f64) -> f64 {
    let basic = params.basic_price * pricing_multiplier;
    let pro = params.pro_price * pricing_multiplier;
    basic * (1.0 - params.pro_adoption_rate) + pro * params.pro_adoption_rate
}

/// Revenue from `company_count` companies at `pricing_multiplier` × list price.
///
/// Companies are split proportionally between tiers without rounding.
/// A zero count yields all-zero revenue.
pub fn calculate_saas_revenue(
    params: &BusinessParameters,
    company_count: f64,
    pricing_multiplier: f64,
) -> Result<SaasRevenue> {
    ensure_non_negative("company_count", company_count)?;
    ensure_non_negative("pricing_multiplier", pricing_multiplier)?;

    let basic_price = params.basic_price * pricing_multiplier;
    let pro_price = params.pro_price * pricing_multiplier;

    let pro_companies = company_count * params.pro_adoption_rate;
    let basic_companies = company_count * (1.0 - params.pro_adoption_rate);

    let basic_revenue = basic_companies * basic_price;
    let pro_revenue = pro_companies * pro_price;

    Ok(SaasRevenue {
        basic_companies,
        pro_companies,
        basic_revenue,
        pro_revenue,
        total_revenue: basic_revenue + pro_revenue,
        blended_price: blended_price(params, pricing_multiplier),
    })
}
