//! Pure unit-economics and growth projection logic for VentureSim.
//!
//! This crate models a subscription-plus-formation-fee business with viral
//! acquisition and a three-stage infrastructure regime (cloud credits →
//! paid cloud → self-hosted). Functions take plain data and return plain
//! data, so every result is reproducible and unit-testable. Presentation
//! (formatting, charts, slides) belongs to callers.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`acquisition`] | Marketing funnel, viral lift, CAC per company/founder |
//! | [`benchmark`] | LTV/CAC, payback, gross margin versus industry norms |
//! | [`constants`] | Horizons, default exit multiples, industry reference values |
//! | [`error`] | Configuration / domain / range error taxonomy |
//! | [`infrastructure`] | Per-month infra spend, credits, self-hosting savings |
//! | [`investment`] | Equity share and investor returns at exit multiples |
//! | [`ltv`] | Formation margin plus retention-weighted stage LTVs |
//! | [`params`] | Business, infrastructure, and stage inputs; validation |
//! | [`projection`] | Month-by-month growth engine and summary metrics |
//! | [`revenue`] | Two-tier recurring revenue at a pricing multiplier |
//! | [`sensitivity`] | One-factor-at-a-time sweeps and tornado ranking |
//! | [`stages`] | Month → stage resolution with explicit fallback |

pub mod acquisition;
pub mod benchmark;
pub mod constants;
pub mod error;
pub mod infrastructure;
pub mod investment;
pub mod ltv;
pub mod params;
pub mod projection;
pub mod revenue;
pub mod sensitivity;
pub mod stages;

pub use error::{ConfigurationIssue, ModelError, Result};
