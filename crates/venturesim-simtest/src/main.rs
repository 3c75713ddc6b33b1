//! VentureSim Headless Projection Harness
//!
//! Validates the unit-economics model end to end against known reference
//! figures and structural invariants. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p venturesim-simtest
//!   cargo run -p venturesim-simtest -- --verbose
//!   cargo run -p venturesim-simtest -- --inputs scenario.json --json

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use venturesim_logic::acquisition::{self, calculate_cac};
use venturesim_logic::benchmark::{compare_to_industry, IndustryBenchmarks};
use venturesim_logic::constants::exits::DEFAULT_MULTIPLES;
use venturesim_logic::infrastructure::{calculate_infra_cost, self_hosting_breakeven_months};
use venturesim_logic::investment::{calculate_returns, InvestmentTerms};
use venturesim_logic::ltv::calculate_ltv;
use venturesim_logic::params::{
    collect_issues, BusinessParameters, InfrastructureParameters, ModelInputs,
};
use venturesim_logic::projection::{project_growth, FinancialProjections};
use venturesim_logic::revenue::calculate_saas_revenue;
use venturesim_logic::sensitivity::{analyze_sensitivity, tornado, SensitivityParameter};
use venturesim_logic::stages::{covered_through, resolve_stage};
use venturesim_logic::ModelError;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    json: bool,
    inputs_path: Option<String>,
}

fn parse_options() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let inputs_path = args
        .iter()
        .position(|a| a == "--inputs")
        .and_then(|i| args.get(i + 1).cloned());
    Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        json: args.iter().any(|a| a == "--json"),
        inputs_path,
    }
}

fn load_inputs(path: Option<&str>) -> Result<ModelInputs, String> {
    let Some(path) = path else {
        return Ok(ModelInputs::reference());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path, e))
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "venturesim_simtest=info,venturesim_logic=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opts = parse_options();
    let inputs = match load_inputs(opts.inputs_path.as_deref()) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("failed to load inputs: {}", e);
            std::process::exit(2);
        }
    };

    println!("=== VentureSim Projection Harness ===\n");
    tracing::info!(
        "Running harness over {} months, {} stages",
        inputs.horizon_months,
        inputs.stages.len()
    );

    let mut results = Vec::new();

    // 1. Reference acquisition funnel
    results.extend(validate_funnel(opts.verbose));

    // 2. Formation economics and LTV
    results.extend(validate_ltv(&inputs, opts.verbose));

    // 3. Input validation and stage coverage
    results.extend(validate_inputs(&inputs, opts.verbose));

    // 4. Infrastructure cost regime
    results.extend(validate_infrastructure(&inputs, opts.verbose));

    // 5. Projection engine
    let projection = match project_growth(&inputs) {
        Ok(p) => Some(p),
        Err(e) => {
            results.push(TestResult {
                name: "projection_runs".into(),
                passed: false,
                detail: e.to_string(),
            });
            None
        }
    };
    if let Some(p) = &projection {
        results.extend(validate_projection(&inputs, p, opts.verbose));

        // 6. Sensitivity sweeps
        results.extend(validate_sensitivity(&inputs, opts.verbose));

        // 7. Investment returns and benchmarks
        results.extend(validate_deal_and_benchmarks(p, opts.verbose));

        if opts.json {
            match serde_json::to_string_pretty(p) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("failed to serialize projection: {}", e),
            }
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Acquisition Funnel ───────────────────────────────────────────────

fn validate_funnel(verbose: bool) -> Vec<TestResult> {
    println!("--- Acquisition Funnel ---");
    let mut results = Vec::new();

    let cac = match calculate_cac(&BusinessParameters::default()) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "funnel_cac".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "funnel_reference_counts".into(),
        passed: close(cac.total_views, 300_000.0, 1e-6)
            && close(cac.signups, 1_500.0, 1e-6)
            && close(cac.direct_companies, 450.0, 1e-6)
            && close(cac.viral_companies, 180.0, 1e-6)
            && close(cac.total_companies, 630.0, 1e-6),
        detail: format!(
            "views={:.0} signups={:.0} direct={:.0} viral={:.0} total={:.0}",
            cac.total_views,
            cac.signups,
            cac.direct_companies,
            cac.viral_companies,
            cac.total_companies
        ),
    });

    results.push(TestResult {
        name: "funnel_reference_cac".into(),
        passed: close(cac.cac_per_company, 7.94, 0.005),
        detail: format!("CAC per company {:.4}", cac.cac_per_company),
    });

    // Degenerate funnel must raise, not divide by zero
    let degenerate = BusinessParameters {
        formation_conversion_rate: 0.0,
        ..BusinessParameters::default()
    };
    results.push(TestResult {
        name: "funnel_zero_companies_domain_error".into(),
        passed: matches!(
            calculate_cac(&degenerate),
            Err(ModelError::Domain { .. })
        ),
        detail: "zero conversion → domain error".into(),
    });

    // The two viral models stay distinct
    let signup_lift = acquisition::viral_companies_from_signups(450.0, 0.4);
    let base_inflow = acquisition::monthly_viral_inflow(450.0, 0.4);
    results.push(TestResult {
        name: "funnel_viral_models_distinct".into(),
        passed: close(signup_lift, 180.0, 1e-9) && close(base_inflow, 15.0, 1e-9),
        detail: format!(
            "signup lift {:.1} vs monthly base inflow {:.1}",
            signup_lift, base_inflow
        ),
    });

    if verbose {
        println!(
            "  CAC per company {:.2}, per founder {:.2}",
            cac.cac_per_company, cac.cac_per_founder
        );
    }

    results
}

// ── 2. LTV ──────────────────────────────────────────────────────────────

fn validate_ltv(inputs: &ModelInputs, verbose: bool) -> Vec<TestResult> {
    println!("--- Lifetime Value ---");
    let mut results = Vec::new();

    match calculate_ltv(
        &BusinessParameters::default(),
        &InfrastructureParameters::default(),
        &inputs.stages,
    ) {
        Ok(ltv) => results.push(TestResult {
            name: "ltv_reference_formation".into(),
            passed: close(ltv.formation_ltv, 31.39, 1e-9),
            detail: format!("formation LTV {:.2}", ltv.formation_ltv),
        }),
        Err(e) => results.push(TestResult {
            name: "ltv_reference_formation".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    match calculate_ltv(&inputs.business, &inputs.infrastructure, &inputs.stages) {
        Ok(ltv) => {
            let mean = ltv.stage_ltvs.iter().map(|s| s.ltv).sum::<f64>()
                / ltv.stage_ltvs.len() as f64;
            results.push(TestResult {
                name: "ltv_decomposition".into(),
                passed: close(ltv.blended_ltv, ltv.formation_ltv + mean, 1e-9),
                detail: format!(
                    "blended {:.2} = formation {:.2} + stage mean {:.2}",
                    ltv.blended_ltv, ltv.formation_ltv, mean
                ),
            });
            if verbose {
                for stage in &ltv.stage_ltvs {
                    println!(
                        "    {:14} profit/mo {:8.3}  LTV {:9.2}",
                        stage.stage_name, stage.monthly_profit, stage.ltv
                    );
                }
            }
        }
        Err(e) => results.push(TestResult {
            name: "ltv_decomposition".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 3. Inputs ───────────────────────────────────────────────────────────

fn validate_inputs(inputs: &ModelInputs, verbose: bool) -> Vec<TestResult> {
    println!("--- Inputs & Stages ---");
    let mut results = Vec::new();

    let issues = collect_issues(inputs);
    results.push(TestResult {
        name: "inputs_valid".into(),
        passed: issues.is_empty(),
        detail: if issues.is_empty() {
            "no validation issues".into()
        } else {
            issues
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    let mut fallback_months = Vec::new();
    let mut ambiguous_months = Vec::new();
    for month in 1..=inputs.horizon_months {
        let matching = inputs.stages.iter().filter(|s| s.contains(month)).count();
        if matching > 1 {
            ambiguous_months.push(month);
        }
        if let Ok(res) = resolve_stage(&inputs.stages, month) {
            if res.is_fallback() {
                fallback_months.push(month);
            }
        }
    }
    results.push(TestResult {
        name: "stages_unique_match".into(),
        passed: ambiguous_months.is_empty(),
        detail: format!("{} months matched by several stages", ambiguous_months.len()),
    });
    // Fallback is only legitimate past the last stage; inside the declared
    // range it means the stage list has a hole.
    let covered = covered_through(&inputs.stages).unwrap_or(0);
    let spanned = inputs
        .stages
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.duration_months()));
    let inside = fallback_months.iter().filter(|&&m| m <= covered).count();
    results.push(TestResult {
        name: "stages_fallback_past_coverage".into(),
        passed: inside == 0 && spanned == covered,
        detail: match (fallback_months.first(), fallback_months.last()) {
            (Some(first), Some(last)) => format!(
                "stages cover 1..={}; first-stage fallback in months {}..={} ({} inside coverage)",
                covered, first, last, inside
            ),
            _ => format!("stages cover 1..={}, every month covered", covered),
        },
    });

    if verbose {
        for stage in &inputs.stages {
            println!(
                "    {:14} months {:>3}..={:<3} ({} mo, price ×{:.2})",
                stage.name,
                stage.start_month,
                stage.end_month,
                stage.duration_months(),
                stage.pricing_multiplier
            );
        }
    }

    results
}

// ── 4. Infrastructure ───────────────────────────────────────────────────

fn validate_infrastructure(inputs: &ModelInputs, verbose: bool) -> Vec<TestResult> {
    println!("--- Infrastructure ---");
    let mut results = Vec::new();

    let mut violations = 0;
    let mut checks = 0;
    for stage in &inputs.stages {
        for &count in &[0.0, 10.0, 1_000.0, 10_000.0, 100_000.0] {
            checks += 1;
            match calculate_infra_cost(count, &inputs.infrastructure, stage) {
                Ok(cost) => {
                    let credits_ok = cost.credits_applied <= cost.total_cost;
                    let net_ok = stage.aws_credits_active || cost.net_cost == cost.total_cost;
                    if !(credits_ok && net_ok) {
                        violations += 1;
                    }
                }
                Err(_) => violations += 1,
            }
        }
    }
    results.push(TestResult {
        name: "infra_credit_invariants".into(),
        passed: violations == 0,
        detail: format!("{} of {} stage/count combos violate", violations, checks),
    });

    match self_hosting_breakeven_months(&inputs.infrastructure, 1_000.0) {
        Ok(months) => {
            results.push(TestResult {
                name: "infra_self_hosting_breakeven".into(),
                passed: months > 0.0,
                detail: format!("{:.1} months to recover setup at 1,000 companies", months),
            });
            if verbose {
                println!("  Self-hosting breakeven at 1,000 companies: {:.1} months", months);
            }
        }
        Err(e) => results.push(TestResult {
            name: "infra_self_hosting_breakeven".into(),
            passed: inputs.infrastructure.self_hosting_savings_rate == 0.0,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 5. Projection ───────────────────────────────────────────────────────

fn validate_projection(
    inputs: &ModelInputs,
    p: &FinancialProjections,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Growth Projection ---");
    let mut results = Vec::new();

    let contiguous = p
        .cohorts
        .iter()
        .enumerate()
        .all(|(i, c)| c.month == i as u32 + 1);
    results.push(TestResult {
        name: "projection_cohort_sequence".into(),
        passed: p.cohorts.len() == inputs.horizon_months as usize && contiguous,
        detail: format!("{} cohorts, contiguous={}", p.cohorts.len(), contiguous),
    });

    let bad_profit = p
        .cohorts
        .iter()
        .filter(|c| {
            let expected =
                c.total_revenue - (c.formation_cogs + c.processing_cost + c.infrastructure_cost);
            !close(c.gross_profit, expected, 1e-6)
        })
        .count();
    results.push(TestResult {
        name: "projection_profit_identity".into(),
        passed: bad_profit == 0,
        detail: format!("{} months break revenue − costs = profit", bad_profit),
    });

    let all_finite = p.cohorts.iter().all(|c| {
        c.total_companies.is_finite() && c.total_revenue.is_finite() && c.gross_profit.is_finite()
    }) && p.ltv_cac_ratio.is_finite()
        && p.payback_months.is_finite();
    results.push(TestResult {
        name: "projection_all_finite".into(),
        passed: all_finite,
        detail: "no NaN/Infinity in cohorts or summary".into(),
    });

    results.push(TestResult {
        name: "projection_arr".into(),
        passed: close(p.final_arr, p.final_mrr * 12.0, 1e-6),
        detail: format!("MRR {:.0} → ARR {:.0}", p.final_mrr, p.final_arr),
    });

    match project_growth(inputs) {
        Ok(again) => results.push(TestResult {
            name: "projection_deterministic".into(),
            passed: &again == p,
            detail: "two runs, identical output".into(),
        }),
        Err(e) => results.push(TestResult {
            name: "projection_deterministic".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    if verbose {
        println!(
            "  {:>5} {:14} {:>10} {:>10} {:>12} {:>12} {:>12}",
            "month", "stage", "new", "total", "mrr", "infra", "profit"
        );
        for c in &p.cohorts {
            println!(
                "  {:>5} {:14} {:>10.1} {:>10.1} {:>12.2} {:>12.2} {:>12.2}{}",
                c.month,
                c.stage_name,
                c.new_companies,
                c.total_companies,
                c.recurring_revenue,
                c.infrastructure_cost,
                c.gross_profit,
                if c.stage_fallback { " (fallback)" } else { "" }
            );
        }
        println!(
            "  LTV/CAC {:.2}, payback {:.2} months, companies {:.0}",
            p.ltv_cac_ratio, p.payback_months, p.final_companies
        );
    }

    results
}

// ── 6. Sensitivity ──────────────────────────────────────────────────────

fn validate_sensitivity(inputs: &ModelInputs, verbose: bool) -> Vec<TestResult> {
    println!("--- Sensitivity ---");
    let mut results = Vec::new();

    let base = &inputs.business;
    let k = base.viral_coefficient;
    match analyze_sensitivity(
        base,
        &inputs.infrastructure,
        &inputs.stages,
        SensitivityParameter::ViralCoefficient,
        [k, k, k],
    ) {
        Ok(points) => results.push(TestResult {
            name: "sensitivity_round_trip".into(),
            passed: points[0].projection == points[1].projection
                && points[1].projection == points[2].projection,
            detail: "three equal values → three equal projections".into(),
        }),
        Err(e) => results.push(TestResult {
            name: "sensitivity_round_trip".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    let sweeps: Vec<_> = [
        SensitivityParameter::ViralCoefficient,
        SensitivityParameter::MonthlyChurnRate,
        SensitivityParameter::FormationConversionRate,
        SensitivityParameter::ProAdoptionRate,
    ]
    .into_iter()
    .map(|param| (param, param.spread_around(base, 0.5)))
    .collect();

    match tornado(base, &inputs.infrastructure, &inputs.stages, &sweeps) {
        Ok(rows) => {
            results.push(TestResult {
                name: "sensitivity_tornado".into(),
                passed: rows.len() == sweeps.len(),
                detail: format!(
                    "widest ARR swing: {}",
                    rows.first().map_or("none", |r| r.parameter.label())
                ),
            });
            if verbose {
                for row in &rows {
                    println!(
                        "    {:26} ARR {:>12.0} … {:>12.0} (spread {:.0})",
                        row.parameter.label(),
                        row.final_arr[0],
                        row.final_arr[2],
                        row.spread
                    );
                }
            }
        }
        Err(e) => results.push(TestResult {
            name: "sensitivity_tornado".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 7. Deal & Benchmarks ────────────────────────────────────────────────

fn validate_deal_and_benchmarks(p: &FinancialProjections, verbose: bool) -> Vec<TestResult> {
    println!("--- Investment & Benchmarks ---");
    let mut results = Vec::new();

    let terms = InvestmentTerms::default();
    match calculate_returns(&terms, p, &DEFAULT_MULTIPLES) {
        Ok(returns) => {
            let increasing = returns
                .scenarios
                .windows(2)
                .all(|w| w[1].return_multiple > w[0].return_multiple);
            results.push(TestResult {
                name: "investment_returns_scale".into(),
                passed: returns.scenarios.len() == DEFAULT_MULTIPLES.len() && increasing,
                detail: format!(
                    "equity {:.3}, {} exit scenarios",
                    returns.equity_share,
                    returns.scenarios.len()
                ),
            });
            if verbose {
                for s in &returns.scenarios {
                    println!(
                        "    {:>4.1}x ARR → valuation {:>14.0}, return {:>12.0} ({:.2}x)",
                        s.exit_multiple, s.exit_valuation, s.return_value, s.return_multiple
                    );
                }
            }
        }
        Err(e) => results.push(TestResult {
            name: "investment_returns_scale".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    let bench = IndustryBenchmarks::default();
    match compare_to_industry(p, &bench) {
        Ok(rows) => {
            let payback_direction = rows.get(1).is_some_and(|r| {
                close(r.multiple, bench.payback_months / p.payback_months, 1e-9)
            });
            results.push(TestResult {
                name: "benchmark_rows".into(),
                passed: rows.len() == 3 && payback_direction,
                detail: rows
                    .iter()
                    .map(|r| format!("{} {:.2}x", r.metric.label(), r.multiple))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Err(e) => results.push(TestResult {
            name: "benchmark_rows".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    // Zero-company revenue is a boundary, not an error
    let zero = calculate_saas_revenue(&BusinessParameters::default(), 0.0, 1.0);
    results.push(TestResult {
        name: "revenue_zero_companies".into(),
        passed: zero.is_ok_and(|r| r.total_revenue == 0.0),
        detail: "0 companies → 0 revenue".into(),
    });

    results
}
