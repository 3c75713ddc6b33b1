//! Property-based tests for the projection engine and calculators
//!
//! These tests verify invariants that should hold for all valid inputs:
//! - Every run yields exactly N cohorts numbered 1..=N
//! - Credits never exceed gross infrastructure cost
//! - Blended LTV decomposes into formation LTV plus the stage average
//! - Calculators are bit-for-bit deterministic
//! - A sweep over three equal values yields three equal projections

use proptest::prelude::*;
use venturesim_logic::infrastructure::calculate_infra_cost;
use venturesim_logic::ltv::calculate_ltv;
use venturesim_logic::params::{
    reference_stages, BusinessParameters, GrowthStage, InfrastructureParameters, ModelInputs,
};
use venturesim_logic::projection::project_growth;
use venturesim_logic::revenue::calculate_saas_revenue;
use venturesim_logic::sensitivity::{analyze_sensitivity, SensitivityParameter};

/// Business parameters in a range that always yields a viable projection
fn business_params() -> impl Strategy<Value = BusinessParameters> {
    (
        0.0f64..1.5,
        0.001f64..0.02,
        0.1f64..0.6,
        0.0f64..0.2,
        10.0f64..60.0,
        0.0f64..1.0,
    )
        .prop_map(
            |(viral, signup, conversion, churn, basic_price, pro_adoption)| BusinessParameters {
                viral_coefficient: viral,
                view_to_signup_rate: signup,
                formation_conversion_rate: conversion,
                monthly_churn_rate: churn,
                basic_price,
                pro_adoption_rate: pro_adoption,
                ..BusinessParameters::default()
            },
        )
}

fn stage_flags() -> impl Strategy<Value = GrowthStage> {
    (any::<bool>(), any::<bool>(), 0.5f64..2.0).prop_map(|(credits, hosted, multiplier)| {
        GrowthStage {
            name: "Generated".to_string(),
            start_month: 1,
            end_month: 12,
            aws_credits_active: credits,
            self_hosting_active: hosted,
            pricing_multiplier: multiplier,
        }
    })
}

proptest! {
    /// Property: the engine emits one cohort per month, numbered contiguously
    #[test]
    fn prop_cohorts_contiguous(
        business in business_params(),
        horizon in 1u32..40
    ) {
        let inputs = ModelInputs {
            business,
            horizon_months: horizon,
            ..ModelInputs::reference()
        };
        let p = project_growth(&inputs).unwrap();
        prop_assert_eq!(p.cohorts.len(), horizon as usize);
        for (i, cohort) in p.cohorts.iter().enumerate() {
            prop_assert_eq!(cohort.month, i as u32 + 1);
            prop_assert_eq!(cohort.stage_fallback, cohort.month > 24);
        }
    }

    /// Property: credits are capped by gross cost and absent when inactive
    #[test]
    fn prop_credits_bounded(
        stage in stage_flags(),
        companies in 0.0f64..200_000.0,
        cap in 0.0f64..50_000.0
    ) {
        let infra = InfrastructureParameters {
            monthly_credits_cap: cap,
            ..InfrastructureParameters::default()
        };
        let cost = calculate_infra_cost(companies, &infra, &stage).unwrap();
        prop_assert!(cost.credits_applied <= cost.total_cost);
        prop_assert!(cost.credits_applied >= 0.0);
        if !stage.aws_credits_active {
            prop_assert_eq!(cost.net_cost, cost.total_cost);
        }
        if !stage.self_hosting_active {
            prop_assert_eq!(cost.self_hosting_savings, 0.0);
        }
    }

    /// Property: blended LTV is formation LTV plus the unweighted stage mean
    #[test]
    fn prop_ltv_decomposes(business in business_params()) {
        let ltv = calculate_ltv(
            &business,
            &InfrastructureParameters::default(),
            &reference_stages(),
        )
        .unwrap();
        let mean = ltv.stage_ltvs.iter().map(|s| s.ltv).sum::<f64>()
            / ltv.stage_ltvs.len() as f64;
        prop_assert!((ltv.blended_ltv - (ltv.formation_ltv + mean)).abs() < 1e-9);
    }

    /// Property: identical inputs give bit-identical outputs
    #[test]
    fn prop_calculators_deterministic(
        business in business_params(),
        companies in 0.0f64..100_000.0,
        multiplier in 0.0f64..3.0
    ) {
        let a = calculate_saas_revenue(&business, companies, multiplier).unwrap();
        let b = calculate_saas_revenue(&business, companies, multiplier).unwrap();
        prop_assert_eq!(a, b);

        let inputs = ModelInputs { business, ..ModelInputs::reference() };
        prop_assert_eq!(project_growth(&inputs).unwrap(), project_growth(&inputs).unwrap());
    }

    /// Property: sweeping one value three times gives three equal projections
    #[test]
    fn prop_sensitivity_round_trip(business in business_params()) {
        let value = business.viral_coefficient;
        let points = analyze_sensitivity(
            &business,
            &InfrastructureParameters::default(),
            &reference_stages(),
            SensitivityParameter::ViralCoefficient,
            [value, value, value],
        )
        .unwrap();
        prop_assert_eq!(&points[0].projection, &points[1].projection);
        prop_assert_eq!(&points[1].projection, &points[2].projection);
    }
}
