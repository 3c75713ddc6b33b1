//! One-factor-at-a-time sensitivity sweeps.
//!
//! Each sweep varies exactly one business parameter across a
//! pessimistic/base/optimistic triple, holding everything else at its base
//! value, and reruns the projection over a fixed 12-month horizon.
//! Interactions between parameters are not modeled.

use serde::{Deserialize, Serialize};

use crate::constants::horizons::SENSITIVITY_MONTHS;
use crate::error::Result;
use crate::params::{BusinessParameters, GrowthStage, InfrastructureParameters, ModelInputs};
use crate::projection::{project_growth, FinancialProjections};

/// A business parameter that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensitivityParameter {
    BaseVideoViews,
    OrganicMultiplier,
    ViewToSignupRate,
    FormationConversionRate,
    ViralCoefficient,
    MonthlyChurnRate,
    CompaniesPerFounder,
    BasicPrice,
    ProPrice,
    ProAdoptionRate,
    FormationFee,
    MonthlyMarketingSpend,
}

impl SensitivityParameter {
    pub const ALL: [SensitivityParameter; 12] = [
        Self::BaseVideoViews,
        Self::OrganicMultiplier,
        Self::ViewToSignupRate,
        Self::FormationConversionRate,
        Self::ViralCoefficient,
        Self::MonthlyChurnRate,
        Self::CompaniesPerFounder,
        Self::BasicPrice,
        Self::ProPrice,
        Self::ProAdoptionRate,
        Self::FormationFee,
        Self::MonthlyMarketingSpend,
    ];

    /// Stable field name, matching the serialized parameter key.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BaseVideoViews => "base_video_views",
            Self::OrganicMultiplier => "organic_multiplier",
            Self::ViewToSignupRate => "view_to_signup_rate",
            Self::FormationConversionRate => "formation_conversion_rate",
            Self::ViralCoefficient => "viral_coefficient",
            Self::MonthlyChurnRate => "monthly_churn_rate",
            Self::CompaniesPerFounder => "companies_per_founder",
            Self::BasicPrice => "basic_price",
            Self::ProPrice => "pro_price",
            Self::ProAdoptionRate => "pro_adoption_rate",
            Self::FormationFee => "formation_fee",
            Self::MonthlyMarketingSpend => "monthly_marketing_spend",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    fn field_mut<'a>(&self, params: &'a mut BusinessParameters) -> &'a mut f64 {
        match self {
            Self::BaseVideoViews => &mut params.base_video_views,
            Self::OrganicMultiplier => &mut params.organic_multiplier,
            Self::ViewToSignupRate => &mut params.view_to_signup_rate,
            Self::FormationConversionRate => &mut params.formation_conversion_rate,
            Self::ViralCoefficient => &mut params.viral_coefficient,
            Self::MonthlyChurnRate => &mut params.monthly_churn_rate,
            Self::CompaniesPerFounder => &mut params.companies_per_founder,
            Self::BasicPrice => &mut params.basic_price,
            Self::ProPrice => &mut params.pro_price,
            Self::ProAdoptionRate => &mut params.pro_adoption_rate,
            Self::FormationFee => &mut params.formation_fee,
            Self::MonthlyMarketingSpend => &mut params.monthly_marketing_spend,
        }
    }

    /// Current value of this parameter in `params`.
    pub fn value_in(&self, params: &BusinessParameters) -> f64 {
        match self {
            Self::BaseVideoViews => params.base_video_views,
            Self::OrganicMultiplier => params.organic_multiplier,
            Self::ViewToSignupRate => params.view_to_signup_rate,
            Self::FormationConversionRate => params.formation_conversion_rate,
            Self::ViralCoefficient => params.viral_coefficient,
            Self::MonthlyChurnRate => params.monthly_churn_rate,
            Self::CompaniesPerFounder => params.companies_per_founder,
            Self::BasicPrice => params.basic_price,
            Self::ProPrice => params.pro_price,
            Self::ProAdoptionRate => params.pro_adoption_rate,
            Self::FormationFee => params.formation_fee,
            Self::MonthlyMarketingSpend => params.monthly_marketing_spend,
        }
    }

    /// Rates that must stay within `[0, 1]`.
    pub fn is_fraction(&self) -> bool {
        matches!(
            self,
            Self::ViewToSignupRate
                | Self::FormationConversionRate
                | Self::MonthlyChurnRate
                | Self::ProAdoptionRate
        )
    }

    /// `[base·(1−delta), base, base·(1+delta)]`, clamped to 1 for rates.
    pub fn spread_around(&self, params: &BusinessParameters, delta: f64) -> [f64; 3] {
        let base = self.value_in(params);
        let high = base * (1.0 + delta);
        let high = if self.is_fraction() { high.min(1.0) } else { high };
        [base * (1.0 - delta), base, high]
    }

    /// Copy of `params` with only this parameter replaced.
    pub fn with_value(&self, params: &BusinessParameters, value: f64) -> BusinessParameters {
        let mut copy = params.clone();
        *self.field_mut(&mut copy) = value;
        copy
    }
}

/// Position of a value within a sweep triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepCase {
    Pessimistic,
    Base,
    Optimistic,
}

impl SweepCase {
    pub const ORDER: [SweepCase; 3] = [Self::Pessimistic, Self::Base, Self::Optimistic];
}

/// Projection for one swept value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub case: SweepCase,
    pub value: f64,
    pub projection: FinancialProjections,
}

/// Sweep `parameter` across `[pessimistic, base, optimistic]`.
///
/// Results come back in input order.
pub fn analyze_sensitivity(
    base: &BusinessParameters,
    infra: &InfrastructureParameters,
    stages: &[GrowthStage],
    parameter: SensitivityParameter,
    values: [f64; 3],
) -> Result<Vec<SensitivityPoint>> {
    SweepCase::ORDER
        .into_iter()
        .zip(values)
        .map(|(case, value)| -> Result<SensitivityPoint> {
            let inputs = ModelInputs {
                business: parameter.with_value(base, value),
                infrastructure: infra.clone(),
                stages: stages.to_vec(),
                horizon_months: SENSITIVITY_MONTHS,
            };
            Ok(SensitivityPoint {
                case,
                value,
                projection: project_growth(&inputs)?,
            })
        })
        .collect()
}

/// Final-ARR swing of one parameter's sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoRow {
    pub parameter: SensitivityParameter,
    pub values: [f64; 3],
    /// Final ARR at each swept value, in sweep order.
    pub final_arr: [f64; 3],
    /// `|optimistic ARR - pessimistic ARR|`.
    pub spread: f64,
}

/// Run an independent sweep per parameter and rank them by ARR spread.
///
/// Each row is still one factor at a time; rows never combine changes.
pub fn tornado(
    base: &BusinessParameters,
    infra: &InfrastructureParameters,
    stages: &[GrowthStage],
    sweeps: &[(SensitivityParameter, [f64; 3])],
) -> Result<Vec<TornadoRow>> {
    let mut rows = Vec::with_capacity(sweeps.len());
    for &(parameter, values) in sweeps {
        let points = analyze_sensitivity(base, infra, stages, parameter, values)?;
        let final_arr = [
            points[0].projection.final_arr,
            points[1].projection.final_arr,
            points[2].projection.final_arr,
        ];
        rows.push(TornadoRow {
            parameter,
            values,
            final_arr,
            spread: (final_arr[2] - final_arr[0]).abs(),
        });
    }
    rows.sort_by(|a, b| b.spread.total_cmp(&a.spread));
    Ok(rows)
}
