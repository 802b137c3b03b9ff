//! Composite risk scoring.
//!
//! Seven independent threshold rules, each a monotonic step function over
//! one column of the latest row. Increments are summed, warnings collected
//! in rule order. A rule whose input is missing contributes nothing (silent
//! skip). The rule table itself is static configuration: it is validated
//! once when the set is constructed, never while scoring.

use crate::domain::{ColumnKey, RiskAssessment, RiskLevel, RowSnapshot, SeriesKey};
use crate::error::AnalysisError;

/// Which side of a threshold is the risky side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// `value > threshold` triggers (rates, spreads, delinquencies).
    Above,
    /// `value < threshold` triggers (the yield curve).
    Below,
}

/// One severity band of a rule.
#[derive(Debug, Clone)]
pub struct Band {
    pub threshold: f64,
    pub increment: u32,
    pub warning: &'static str,
}

/// A threshold rule over one column, bands ordered most severe first.
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    pub factor: ColumnKey,
    pub trigger: Trigger,
    pub bands: Vec<Band>,
}

impl ThresholdRule {
    fn matching_band(&self, value: f64) -> Option<&Band> {
        self.bands.iter().find(|band| match self.trigger {
            Trigger::Above => value > band.threshold,
            Trigger::Below => value < band.threshold,
        })
    }

    /// Reject malformed band tables up front.
    ///
    /// Bands must be strictly ordered most-severe-first: thresholds
    /// descending for `Above` rules and ascending for `Below` rules, with
    /// strictly decreasing increments. Anything else would make the rule
    /// non-monotonic or leave a band unreachable.
    fn validate(&self) -> Result<(), AnalysisError> {
        if self.bands.is_empty() {
            return Err(AnalysisError::InvalidRange(format!(
                "rule for {} has no bands",
                self.factor.key()
            )));
        }

        for band in &self.bands {
            if !band.threshold.is_finite() {
                return Err(AnalysisError::InvalidRange(format!(
                    "rule for {} has a non-finite threshold",
                    self.factor.key()
                )));
            }
            if band.increment == 0 {
                return Err(AnalysisError::InvalidRange(format!(
                    "rule for {} has a zero increment band",
                    self.factor.key()
                )));
            }
        }

        for pair in self.bands.windows(2) {
            let ordered = match self.trigger {
                Trigger::Above => pair[0].threshold > pair[1].threshold,
                Trigger::Below => pair[0].threshold < pair[1].threshold,
            };
            if !ordered {
                return Err(AnalysisError::InvalidRange(format!(
                    "rule for {} has overlapping or inverted bands",
                    self.factor.key()
                )));
            }
            if pair[0].increment <= pair[1].increment {
                return Err(AnalysisError::InvalidRange(format!(
                    "rule for {} has non-decreasing increments",
                    self.factor.key()
                )));
            }
        }

        Ok(())
    }
}

/// The validated set of rules, in evaluation (and warning) order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ThresholdRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ThresholdRule>) -> Result<Self, AnalysisError> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    /// The standard seven-factor table. Thresholds and increments are fixed
    /// and must not drift: downstream consumers compare scores across runs.
    pub fn standard() -> Result<Self, AnalysisError> {
        Self::new(vec![
            ThresholdRule {
                factor: ColumnKey::YieldCurve,
                trigger: Trigger::Below,
                bands: vec![
                    Band {
                        threshold: 0.0,
                        increment: 3,
                        warning: "Yield curve inverted (classic recession precursor)",
                    },
                    Band {
                        threshold: 0.3,
                        increment: 1,
                        warning: "Yield curve nearly flat (inversion approaching)",
                    },
                ],
            },
            ThresholdRule {
                factor: ColumnKey::Series(SeriesKey::TenYear),
                trigger: Trigger::Above,
                bands: vec![
                    Band {
                        threshold: 4.5,
                        increment: 2,
                        warning: "10Y Treasury in peak-rate territory",
                    },
                    Band {
                        threshold: 4.0,
                        increment: 1,
                        warning: "10Y Treasury trending higher",
                    },
                ],
            },
            ThresholdRule {
                factor: ColumnKey::Series(SeriesKey::HySpread),
                trigger: Trigger::Above,
                bands: vec![
                    Band {
                        threshold: 5.0,
                        increment: 3,
                        warning: "High-yield spread blowing out",
                    },
                    Band {
                        threshold: 4.5,
                        increment: 2,
                        warning: "High-yield spread widening",
                    },
                ],
            },
            ThresholdRule {
                factor: ColumnKey::RateGap,
                trigger: Trigger::Above,
                bands: vec![
                    Band {
                        threshold: 1.0,
                        increment: 2,
                        warning: "Rate gap excessively wide",
                    },
                    Band {
                        threshold: 0.5,
                        increment: 1,
                        warning: "Rate gap widening",
                    },
                ],
            },
            ThresholdRule {
                factor: ColumnKey::Series(SeriesKey::CcDelinq),
                trigger: Trigger::Above,
                bands: vec![
                    Band {
                        threshold: 5.0,
                        increment: 3,
                        warning: "Credit card delinquency above 5%",
                    },
                    Band {
                        threshold: 3.5,
                        increment: 2,
                        warning: "Credit card delinquency climbing",
                    },
                ],
            },
            ThresholdRule {
                factor: ColumnKey::Series(SeriesKey::CreDelinq),
                trigger: Trigger::Above,
                bands: vec![
                    Band {
                        threshold: 3.0,
                        increment: 3,
                        warning: "CRE delinquency above 3%",
                    },
                    Band {
                        threshold: 2.0,
                        increment: 2,
                        warning: "CRE delinquency rising",
                    },
                ],
            },
            ThresholdRule {
                factor: ColumnKey::Series(SeriesKey::AutoDelinq),
                trigger: Trigger::Above,
                bands: vec![
                    Band {
                        threshold: 3.0,
                        increment: 2,
                        warning: "Auto loan delinquency above 3%",
                    },
                    Band {
                        threshold: 2.5,
                        increment: 1,
                        warning: "Auto loan delinquency trending up",
                    },
                ],
            },
        ])
    }

    /// Score the latest row: sum triggered increments, collect warnings.
    pub fn assess(&self, latest: &RowSnapshot) -> RiskAssessment {
        let mut score = 0u32;
        let mut warnings = Vec::new();

        for rule in &self.rules {
            let Some(value) = latest.get(rule.factor) else {
                continue;
            };
            if let Some(band) = rule.matching_band(value) {
                score += band.increment;
                warnings.push(band.warning.to_string());
            }
        }

        RiskAssessment {
            score,
            level: RiskLevel::from_score(score),
            warnings,
            latest: latest.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    fn snapshot(values: &[(ColumnKey, f64)]) -> RowSnapshot {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        RowSnapshot::new(date, values.iter().copied().collect::<BTreeMap<_, _>>())
    }

    #[test]
    fn empty_row_scores_low_with_no_warnings() {
        let rules = RuleSet::standard().unwrap();
        let risk = rules.assess(&snapshot(&[]));
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.warnings.is_empty());
    }

    #[test]
    fn inverted_curve_adds_three() {
        let rules = RuleSet::standard().unwrap();
        let risk = rules.assess(&snapshot(&[(ColumnKey::YieldCurve, -0.1)]));
        assert_eq!(risk.score, 3);
        assert_eq!(risk.warnings.len(), 1);
        assert!(risk.warnings[0].contains("inverted"));
    }

    #[test]
    fn band_edges_match_the_original_rules() {
        let rules = RuleSet::standard().unwrap();

        // Curve: strictly below 0.3 for the flattening band; 0.3 itself is clean.
        assert_eq!(rules.assess(&snapshot(&[(ColumnKey::YieldCurve, 0.3)])).score, 0);
        assert_eq!(rules.assess(&snapshot(&[(ColumnKey::YieldCurve, 0.29)])).score, 1);
        assert_eq!(rules.assess(&snapshot(&[(ColumnKey::YieldCurve, 0.0)])).score, 1);

        // 10Y: strictly above 4.5 for the top band; 4.5 itself is the lower band.
        let ten = ColumnKey::Series(SeriesKey::TenYear);
        assert_eq!(rules.assess(&snapshot(&[(ten, 4.5)])).score, 1);
        assert_eq!(rules.assess(&snapshot(&[(ten, 4.51)])).score, 2);
        assert_eq!(rules.assess(&snapshot(&[(ten, 4.0)])).score, 0);

        // Auto: 3.0 sits in the 2.5-3.0 band, not the top one.
        let auto = ColumnKey::Series(SeriesKey::AutoDelinq);
        assert_eq!(rules.assess(&snapshot(&[(auto, 3.0)])).score, 1);
        assert_eq!(rules.assess(&snapshot(&[(auto, 3.1)])).score, 2);
    }

    #[test]
    fn single_factor_scoring_is_monotonic() {
        let rules = RuleSet::standard().unwrap();
        let hy = ColumnKey::Series(SeriesKey::HySpread);
        let low = rules.assess(&snapshot(&[(hy, 4.0)])).score;
        let mid = rules.assess(&snapshot(&[(hy, 4.8)])).score;
        let high = rules.assess(&snapshot(&[(hy, 5.5)])).score;
        assert!(low <= mid && mid <= high);
        assert_eq!((low, mid, high), (0, 2, 3));
    }

    #[test]
    fn rules_are_additive_and_warnings_keep_rule_order() {
        let rules = RuleSet::standard().unwrap();
        let risk = rules.assess(&snapshot(&[
            (ColumnKey::YieldCurve, -0.5),
            (ColumnKey::Series(SeriesKey::TenYear), 4.8),
            (ColumnKey::Series(SeriesKey::HySpread), 5.2),
            (ColumnKey::RateGap, 1.4),
            (ColumnKey::Series(SeriesKey::CcDelinq), 5.5),
            (ColumnKey::Series(SeriesKey::CreDelinq), 3.2),
            (ColumnKey::Series(SeriesKey::AutoDelinq), 3.4),
        ]));

        assert_eq!(risk.score, 3 + 2 + 3 + 2 + 3 + 3 + 2);
        assert_eq!(risk.level, RiskLevel::Critical);
        assert_eq!(risk.warnings.len(), 7);
        assert!(risk.warnings[0].starts_with("Yield curve"));
        assert!(risk.warnings[6].starts_with("Auto loan"));
    }

    #[test]
    fn missing_factor_is_a_silent_skip() {
        let rules = RuleSet::standard().unwrap();
        let with_cc = rules.assess(&snapshot(&[
            (ColumnKey::YieldCurve, -0.1),
            (ColumnKey::Series(SeriesKey::CcDelinq), 4.0),
        ]));
        let without_cc = rules.assess(&snapshot(&[(ColumnKey::YieldCurve, -0.1)]));

        assert_eq!(with_cc.score, 5);
        assert_eq!(without_cc.score, 3);
        assert_eq!(without_cc.warnings.len(), 1);
    }

    #[test]
    fn construction_rejects_malformed_tables() {
        let unordered = ThresholdRule {
            factor: ColumnKey::RateGap,
            trigger: Trigger::Above,
            bands: vec![
                Band { threshold: 0.5, increment: 2, warning: "a" },
                Band { threshold: 1.0, increment: 1, warning: "b" },
            ],
        };
        assert!(matches!(
            RuleSet::new(vec![unordered]),
            Err(AnalysisError::InvalidRange(_))
        ));

        let non_monotonic = ThresholdRule {
            factor: ColumnKey::RateGap,
            trigger: Trigger::Above,
            bands: vec![
                Band { threshold: 1.0, increment: 1, warning: "a" },
                Band { threshold: 0.5, increment: 2, warning: "b" },
            ],
        };
        assert!(matches!(
            RuleSet::new(vec![non_monotonic]),
            Err(AnalysisError::InvalidRange(_))
        ));

        let empty = ThresholdRule {
            factor: ColumnKey::YieldCurve,
            trigger: Trigger::Below,
            bands: Vec::new(),
        };
        assert!(matches!(
            RuleSet::new(vec![empty]),
            Err(AnalysisError::InvalidRange(_))
        ));
    }

    #[test]
    fn standard_table_is_valid() {
        assert!(RuleSet::standard().is_ok());
    }
}
