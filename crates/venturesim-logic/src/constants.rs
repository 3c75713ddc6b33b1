//! Model constants — horizons, calendar conversions, reference deal terms.
//!
//! Plain `const` values with no dependency on any other module.
//! The simtest harness and the calculators both read these.

pub mod horizons {
    /// Months in a year; converts MRR to ARR and annual viral rates to monthly.
    pub const MONTHS_PER_YEAR: u32 = 12;
    /// Fixed cohort horizon used for every stage LTV.
    pub const COHORT_LTV_MONTHS: u32 = 12;
    /// Horizon of every sensitivity sweep run.
    pub const SENSITIVITY_MONTHS: u32 = 12;
    /// Horizon of the reference projection.
    pub const REFERENCE_MONTHS: u32 = 24;
}

pub mod exits {
    /// Exit revenue multiples shown alongside the reference deal.
    pub const DEFAULT_MULTIPLES: [f64; 4] = [3.0, 5.0, 8.0, 10.0];
}

pub mod industry {
    /// Typical SaaS LTV/CAC ratio.
    pub const LTV_CAC_RATIO: f64 = 3.0;
    /// Typical SaaS CAC payback, in months.
    pub const PAYBACK_MONTHS: f64 = 12.0;
    /// Typical SaaS gross margin, as a fraction.
    pub const GROSS_MARGIN: f64 = 0.75;
}
