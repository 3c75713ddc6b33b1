//! Customer acquisition — marketing funnel, viral lift, and CAC.
//!
//! Two distinct viral computations live here and must stay separate:
//! - [`viral_companies_from_signups`] lifts the companies produced by one
//!   month's marketing funnel (used for CAC).
//! - [`monthly_viral_inflow`] grows the *existing* company base by a
//!   monthly share of the annual K-factor (used by the projection engine).

use serde::{Deserialize, Serialize};

use crate::constants::horizons::MONTHS_PER_YEAR;
use crate::error::{checked_ratio, Result};
use crate::params::BusinessParameters;

/// Funnel breakdown and blended acquisition cost for one month of spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacResult {
    /// Paid views × organic multiplier.
    pub total_views: f64,
    pub signups: f64,
    /// Companies formed directly from signups.
    pub direct_companies: f64,
    /// Additional companies referred by the direct ones.
    pub viral_companies: f64,
    pub total_companies: f64,
    pub cac_per_company: f64,
    pub cac_per_founder: f64,
}

/// Companies referred by newly acquired companies.
pub fn viral_companies_from_signups(direct_companies: f64, viral_coefficient: f64) -> f64 {
    direct_companies * viral_coefficient
}

/// Companies referred this month by the existing base.
///
/// The viral coefficient is annual; a twelfth of it applies each month.
pub fn monthly_viral_inflow(existing_companies: f64, viral_coefficient: f64) -> f64 {
    existing_companies * viral_coefficient / MONTHS_PER_YEAR as f64
}

/// Run the marketing funnel and derive CAC.
///
/// Fails with a domain error when the funnel yields no companies.
pub fn calculate_cac(params: &BusinessParameters) -> Result<CacResult> {
    let total_views = params.base_video_views * params.organic_multiplier;
    let signups = total_views * params.view_to_signup_rate;
    let direct_companies = signups * params.formation_conversion_rate;
    let viral_companies = viral_companies_from_signups(direct_companies, params.viral_coefficient);
    let total_companies = direct_companies + viral_companies;

    let cac_per_company = checked_ratio(
        params.monthly_marketing_spend,
        total_companies,
        "acquired companies",
    )?;
    let cac_per_founder = cac_per_company * params.companies_per_founder;

    Ok(CacResult {
        total_views,
        signups,
        direct_companies,
        viral_companies,
        total_companies,
        cac_per_company,
        cac_per_founder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_reference_funnel() {
        let cac = calculate_cac(&BusinessParameters::default()).unwrap();
        assert!(close(cac.total_views, 300_000.0));
        assert!(close(cac.signups, 1_500.0));
        assert!(close(cac.direct_companies, 450.0));
        assert!(close(cac.viral_companies, 180.0));
        assert!(close(cac.total_companies, 630.0));
        assert!((cac.cac_per_company - 7.94).abs() < 0.005);
        assert!(close(cac.cac_per_founder, cac.cac_per_company * 1.5));
    }

    #[test]
    fn test_zero_conversion_is_domain_error() {
        let params = BusinessParameters {
            formation_conversion_rate: 0.0,
            ..BusinessParameters::default()
        };
        assert!(matches!(
            calculate_cac(&params),
            Err(ModelError::Domain { .. })
        ));
    }

    #[test]
    fn test_zero_views_is_domain_error() {
        let params = BusinessParameters {
            base_video_views: 0.0,
            ..BusinessParameters::default()
        };
        assert!(calculate_cac(&params).is_err());
    }

    #[test]
    fn test_zero_spend_gives_zero_cac() {
        let params = BusinessParameters {
            monthly_marketing_spend: 0.0,
            ..BusinessParameters::default()
        };
        let cac = calculate_cac(&params).unwrap();
        assert_eq!(cac.cac_per_company, 0.0);
    }

    #[test]
    fn test_viral_functions_differ() {
        // Same coefficient, different bases and time scales.
        assert!(close(viral_companies_from_signups(450.0, 0.4), 180.0));
        assert!(close(monthly_viral_inflow(1200.0, 0.4), 40.0));
        assert_eq!(monthly_viral_inflow(0.0, 0.4), 0.0);
    }

    #[test]
    fn test_cac_idempotent() {
        let params = BusinessParameters::default();
        assert_eq!(calculate_cac(&params), calculate_cac(&params));
    }
}
