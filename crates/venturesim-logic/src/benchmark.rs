//! Comparison of projected unit economics against industry norms.
//!
//! Each row reports how many times better than industry the projection is.
//! The direction depends on the metric: LTV/CAC and gross margin are better
//! when higher (`ours / industry`), payback is better when shorter
//! (`industry / ours`).

use serde::{Deserialize, Serialize};

use crate::constants::industry;
use crate::error::{checked_ratio, Result};
use crate::projection::FinancialProjections;

/// Industry reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBenchmarks {
    pub ltv_cac_ratio: f64,
    pub payback_months: f64,
    pub gross_margin: f64,
}

impl Default for IndustryBenchmarks {
    fn default() -> Self {
        Self {
            ltv_cac_ratio: industry::LTV_CAC_RATIO,
            payback_months: industry::PAYBACK_MONTHS,
            gross_margin: industry::GROSS_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkMetric {
    LtvCacRatio,
    PaybackMonths,
    GrossMargin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl BenchmarkMetric {
    pub fn direction(&self) -> Direction {
        match self {
            Self::LtvCacRatio | Self::GrossMargin => Direction::HigherIsBetter,
            Self::PaybackMonths => Direction::LowerIsBetter,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LtvCacRatio => "LTV/CAC ratio",
            Self::PaybackMonths => "Payback period",
            Self::GrossMargin => "Gross margin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub metric: BenchmarkMetric,
    pub ours: f64,
    pub industry: f64,
    /// Times better than industry; above 1.0 means we beat it.
    pub multiple: f64,
}

fn compare(metric: BenchmarkMetric, ours: f64, industry: f64) -> Result<BenchmarkRow> {
    let multiple = match metric.direction() {
        Direction::HigherIsBetter => checked_ratio(ours, industry, metric.label())?,
        Direction::LowerIsBetter => checked_ratio(industry, ours, metric.label())?,
    };
    Ok(BenchmarkRow {
        metric,
        ours,
        industry,
        multiple,
    })
}

/// LTV/CAC, payback, and gross margin rows, in that order.
pub fn compare_to_industry(
    projection: &FinancialProjections,
    benchmarks: &IndustryBenchmarks,
) -> Result<Vec<BenchmarkRow>> {
    let gross_margin = projection.gross_margin()?;
    Ok(vec![
        compare(
            BenchmarkMetric::LtvCacRatio,
            projection.ltv_cac_ratio,
            benchmarks.ltv_cac_ratio,
        )?,
        compare(
            BenchmarkMetric::PaybackMonths,
            projection.payback_months,
            benchmarks.payback_months,
        )?,
        compare(
            BenchmarkMetric::GrossMargin,
            gross_margin,
            benchmarks.gross_margin,
        )?,
    ])
}
