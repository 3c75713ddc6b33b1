//! Investor returns at a range of exit revenue multiples.
//!
//! Equity is a flat `investment / valuation` share with no dilution from
//! later rounds. Exit valuation is the projection's final ARR times the
//! multiple.

use serde::{Deserialize, Serialize};

use crate::error::{checked_ratio, Result};
use crate::params::ensure_non_negative;
use crate::projection::FinancialProjections;

/// Deal terms offered to an investor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentTerms {
    pub amount: f64,
    pub pre_money_valuation: f64,
}

impl Default for InvestmentTerms {
    fn default() -> Self {
        Self {
            amount: 500_000.0,
            pre_money_valuation: 5_000_000.0,
        }
    }
}

/// Outcome of exiting at one revenue multiple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitScenario {
    pub exit_multiple: f64,
    pub exit_valuation: f64,
    /// Investor's share of the exit.
    pub return_value: f64,
    /// `return_value / amount`.
    pub return_multiple: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentReturns {
    /// Fraction of the company bought, `amount / pre_money_valuation`.
    pub equity_share: f64,
    /// One entry per requested multiple, in request order.
    pub scenarios: Vec<ExitScenario>,
}

pub fn calculate_returns(
    terms: &InvestmentTerms,
    projection: &FinancialProjections,
    exit_multiples: &[f64],
) -> Result<InvestmentReturns> {
    let equity_share = checked_ratio(terms.amount, terms.pre_money_valuation, "pre-money valuation")?;

    let scenarios = exit_multiples
        .iter()
        .map(|&exit_multiple| -> Result<ExitScenario> {
            ensure_non_negative("exit_multiple", exit_multiple)?;
            let exit_valuation = projection.final_arr * exit_multiple;
            let return_value = exit_valuation * equity_share;
            Ok(ExitScenario {
                exit_multiple,
                exit_valuation,
                return_value,
                return_multiple: checked_ratio(return_value, terms.amount, "investment amount")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(InvestmentReturns {
        equity_share,
        scenarios,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exits::DEFAULT_MULTIPLES;
    use crate::error::ModelError;
    use crate::projection::reference_projection;

    #[test]
    fn test_equity_share_flat() {
        let p = reference_projection().unwrap();
        let r = calculate_returns(&InvestmentTerms::default(), &p, &DEFAULT_MULTIPLES).unwrap();
        assert!((r.equity_share - 0.1).abs() < 1e-12);
        assert_eq!(r.scenarios.len(), 4);
    }

    #[test]
    fn test_scenario_math() {
        let p = reference_projection().unwrap();
        let terms = InvestmentTerms::default();
        let r = calculate_returns(&terms, &p, &[5.0]).unwrap();
        let s = &r.scenarios[0];
        assert!((s.exit_valuation - p.final_arr * 5.0).abs() < 1e-6);
        assert!((s.return_value - s.exit_valuation * 0.1).abs() < 1e-6);
        assert!((s.return_multiple - s.return_value / terms.amount).abs() < 1e-12);
    }

    #[test]
    fn test_return_multiple_scales_with_exit_multiple() {
        let p = reference_projection().unwrap();
        let r = calculate_returns(&InvestmentTerms::default(), &p, &[3.0, 6.0]).unwrap();
        let ratio = r.scenarios[1].return_multiple / r.scenarios[0].return_multiple;
        assert!((ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_valuation_rejected() {
        let p = reference_projection().unwrap();
        let terms = InvestmentTerms {
            amount: 100.0,
            pre_money_valuation: 0.0,
        };
        assert!(matches!(
            calculate_returns(&terms, &p, &[3.0]),
            Err(ModelError::Domain { .. })
        ));
    }

    #[test]
    fn test_zero_investment_rejected() {
        let p = reference_projection().unwrap();
        let terms = InvestmentTerms {
            amount: 0.0,
            pre_money_valuation: 1_000_000.0,
        };
        assert!(calculate_returns(&terms, &p, &[3.0]).is_err());
    }

    #[test]
    fn test_negative_multiple_rejected() {
        let p = reference_projection().unwrap();
        assert!(matches!(
            calculate_returns(&InvestmentTerms::default(), &p, &[-1.0]),
            Err(ModelError::Range { .. })
        ));
    }

    #[test]
    fn test_no_multiples_no_scenarios() {
        let p = reference_projection().unwrap();
        let r = calculate_returns(&InvestmentTerms::default(), &p, &[]).unwrap();
        assert!(r.scenarios.is_empty());
    }
}
