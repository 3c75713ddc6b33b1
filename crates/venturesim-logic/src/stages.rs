//! Month → stage resolution and stage-list coverage checks.
//!
//! A stage list is well formed when it starts at month 1 and each stage
//! begins the month after its predecessor ends. Months past the last stage
//! are still resolvable: they fall back to the first stage, and the
//! resolution says so explicitly.

use crate::error::{ConfigurationIssue, Result};
use crate::params::GrowthStage;

/// Outcome of looking up the stage governing one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageResolution<'a> {
    /// Exactly one stage's range contains the month.
    Matched(&'a GrowthStage),
    /// No stage contains the month; the first stage is used instead.
    Fallback(&'a GrowthStage),
}

impl<'a> StageResolution<'a> {
    pub fn stage(&self) -> &'a GrowthStage {
        match *self {
            Self::Matched(stage) | Self::Fallback(stage) => stage,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Find the stage containing `month`, falling back to the first stage.
///
/// Only an empty list is an error. Callers that need gap-free coverage
/// should run [`coverage_issues`] first.
pub fn resolve_stage(stages: &[GrowthStage], month: u32) -> Result<StageResolution<'_>> {
    let first = stages.first().ok_or(ConfigurationIssue::EmptyStages)?;
    Ok(match stages.iter().find(|s| s.contains(month)) {
        Some(stage) => StageResolution::Matched(stage),
        None => StageResolution::Fallback(first),
    })
}

/// Check that the stages tile months 1.. without gaps or overlaps.
pub fn coverage_issues(stages: &[GrowthStage]) -> Vec<ConfigurationIssue> {
    let mut issues = Vec::new();
    let Some(first) = stages.first() else {
        issues.push(ConfigurationIssue::EmptyStages);
        return issues;
    };

    if first.start_month != 1 {
        issues.push(ConfigurationIssue::FirstStageStart(first.start_month));
    }

    for stage in stages {
        if stage.end_month < stage.start_month {
            issues.push(ConfigurationIssue::InvertedStage {
                name: stage.name.clone(),
                start: stage.start_month,
                end: stage.end_month,
            });
        }
    }

    for pair in stages.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let expected = prev.end_month.saturating_add(1);
        if next.start_month > expected {
            issues.push(ConfigurationIssue::Gap {
                from: expected,
                to: next.start_month - 1,
            });
        } else if next.start_month < expected {
            issues.push(ConfigurationIssue::Overlap {
                first: prev.name.clone(),
                second: next.name.clone(),
                month: next.start_month,
            });
        }
    }

    issues
}

/// Last month covered by the list, if any.
pub fn covered_through(stages: &[GrowthStage]) -> Option<u32> {
    stages.last().map(|s| s.end_month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::reference_stages;

    fn stage(name: &str, start: u32, end: u32) -> GrowthStage {
        GrowthStage {
            name: name.to_string(),
            start_month: start,
            end_month: end,
            aws_credits_active: false,
            self_hosting_active: false,
            pricing_multiplier: 1.0,
        }
    }

    #[test]
    fn test_resolve_each_reference_month() {
        let stages = reference_stages();
        for month in 1..=24 {
            let res = resolve_stage(&stages, month).unwrap();
            assert!(!res.is_fallback(), "month {month} fell back");
            let matching = stages.iter().filter(|s| s.contains(month)).count();
            assert_eq!(matching, 1);
        }
        assert_eq!(resolve_stage(&stages, 6).unwrap().stage().name, "AWS Credits");
        assert_eq!(resolve_stage(&stages, 7).unwrap().stage().name, "Paid Cloud");
        assert_eq!(resolve_stage(&stages, 24).unwrap().stage().name, "Self-Hosted");
    }

    #[test]
    fn test_resolve_past_last_stage_falls_back_to_first() {
        let stages = reference_stages();
        let res = resolve_stage(&stages, 25).unwrap();
        assert!(res.is_fallback());
        assert_eq!(res.stage().name, "AWS Credits");
    }

    #[test]
    fn test_resolve_empty_is_error() {
        assert!(resolve_stage(&[], 1).is_err());
    }

    #[test]
    fn test_reference_coverage_clean() {
        assert!(coverage_issues(&reference_stages()).is_empty());
        assert_eq!(covered_through(&reference_stages()), Some(24));
    }

    #[test]
    fn test_coverage_empty() {
        assert_eq!(coverage_issues(&[]), vec![ConfigurationIssue::EmptyStages]);
    }

    #[test]
    fn test_coverage_gap() {
        let stages = vec![stage("a", 1, 6), stage("b", 10, 12)];
        assert_eq!(
            coverage_issues(&stages),
            vec![ConfigurationIssue::Gap { from: 7, to: 9 }]
        );
    }

    #[test]
    fn test_coverage_overlap() {
        let stages = vec![stage("a", 1, 6), stage("b", 5, 12)];
        assert_eq!(
            coverage_issues(&stages),
            vec![ConfigurationIssue::Overlap {
                first: "a".to_string(),
                second: "b".to_string(),
                month: 5
            }]
        );
    }

    #[test]
    fn test_coverage_late_start() {
        let stages = vec![stage("a", 3, 6)];
        assert_eq!(
            coverage_issues(&stages),
            vec![ConfigurationIssue::FirstStageStart(3)]
        );
    }

    #[test]
    fn test_coverage_inverted() {
        let stages = vec![stage("a", 1, 6), stage("b", 7, 6)];
        assert!(matches!(
            coverage_issues(&stages)[0],
            ConfigurationIssue::InvertedStage { .. }
        ));
    }
}
