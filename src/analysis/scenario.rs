//! Macro scenario classification.
//!
//! Two booleans off the latest row — curve inverted, easing priced in —
//! select one of four static scenario profiles. The profiles are
//! configuration, not computation: immutable records with a title, a
//! one-line reading, a risk label, and an asset-allocation guidance table.

use crate::domain::ScenarioId;

/// Static metadata for one scenario.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioProfile {
    pub id: ScenarioId,
    pub title: &'static str,
    pub meaning: &'static str,
    pub risk_label: &'static str,
    /// (asset class, guidance) rows, in display order.
    pub allocations: &'static [(&'static str, &'static str)],
}

/// Classify the current regime.
///
/// A missing derived value reads as the signal being off (not inverted /
/// no easing expected) — the conservative reading the original rule set
/// used for unavailable data.
pub fn classify(yield_curve: Option<f64>, policy_spread: Option<f64>) -> ScenarioId {
    let inverted = yield_curve.is_some_and(|v| v < 0.0);
    let easing_expected = policy_spread.is_some_and(|v| v < 0.0);

    match (inverted, easing_expected) {
        (true, false) => ScenarioId::StagflationConcern,
        (true, true) => ScenarioId::RecessionWarning,
        (false, false) => ScenarioId::HealthyGrowth,
        (false, true) => ScenarioId::PolicyPivot,
    }
}

/// Resolve a scenario id to its static profile.
pub fn profile(id: ScenarioId) -> &'static ScenarioProfile {
    match id {
        ScenarioId::StagflationConcern => &STAGFLATION_CONCERN,
        ScenarioId::RecessionWarning => &RECESSION_WARNING,
        ScenarioId::HealthyGrowth => &HEALTHY_GROWTH,
        ScenarioId::PolicyPivot => &POLICY_PIVOT,
    }
}

static STAGFLATION_CONCERN: ScenarioProfile = ScenarioProfile {
    id: ScenarioId::StagflationConcern,
    title: "Stagflation concern",
    meaning: "Inverted curve with tightening still priced in: persistent \
              inflation paired with slowing growth.",
    risk_label: "High risk",
    allocations: &[
        ("Growth equities", "Reduce (20-30%)"),
        ("Value equities", "Hold (30-40%)"),
        ("Technology", "Cut sharply (10-15%)"),
        ("Bitcoin / high-beta assets", "Minimal (0-5%)"),
        ("Real estate / REITs", "Selective (10-15%)"),
        ("Bonds", "Short-duration focus (20-30%)"),
        ("Commodities / gold", "Increase (15-20%)"),
        ("Cash", "Increase (10-20%)"),
    ],
};

static RECESSION_WARNING: ScenarioProfile = ScenarioProfile {
    id: ScenarioId::RecessionWarning,
    title: "Recession warning",
    meaning: "Inverted curve with easing priced in: the classic signal that \
              a downturn is close.",
    risk_label: "Severe risk",
    allocations: &[
        ("Growth equities", "Cut hard / exit (0-10%)"),
        ("Value equities", "Minimal (10-20%)"),
        ("Technology / high-beta", "Exit recommended"),
        ("Bitcoin / high-beta assets", "Near zero"),
        ("Real estate / REITs", "Reduce (0-5%)"),
        ("Bonds", "Extend long Treasuries (40-50%)"),
        ("Gold / defensive real assets", "Core holding (20-30%)"),
        ("Cash", "Hold 20-30%"),
    ],
};

static HEALTHY_GROWTH: ScenarioProfile = ScenarioProfile {
    id: ScenarioId::HealthyGrowth,
    title: "Healthy growth",
    meaning: "Normal curve with tightening priced in: growth is holding up \
              while inflation is being managed.",
    risk_label: "Low risk",
    allocations: &[
        ("Growth equities", "Aggressive (40-50%)"),
        ("Value equities", "Balanced (20-30%)"),
        ("Technology", "Increase (25-35%)"),
        ("Bitcoin / risk assets", "Selective (5-10%)"),
        ("Real estate / REITs", "Favorable backdrop (10-20%)"),
        ("Bonds", "Minimal (5-10%)"),
        ("Gold / commodities", "Neutral (5-10%)"),
        ("Cash", "Minimal (5-10%)"),
    ],
};

static POLICY_PIVOT: ScenarioProfile = ScenarioProfile {
    id: ScenarioId::PolicyPivot,
    title: "Policy pivot",
    meaning: "Normal curve with easing priced in: the tightening cycle looks \
              finished and a pivot is expected.",
    risk_label: "Moderate risk",
    allocations: &[
        ("Growth equities", "Trim (25-35%)"),
        ("Value equities", "Increase (25-35%)"),
        ("Technology", "Selective (20-25%)"),
        ("Bitcoin / risk assets", "Scale in (10-15%)"),
        ("Real estate / REITs", "Buying opportunity (15-20%)"),
        ("Bonds", "Extend duration (20-30%)"),
        ("Gold / commodities", "Neutral (5-10%)"),
        ("Cash", "Hold 10-15%"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_covers_the_whole_grid() {
        assert_eq!(classify(Some(-0.1), Some(0.2)), ScenarioId::StagflationConcern);
        assert_eq!(classify(Some(-0.1), Some(-0.4)), ScenarioId::RecessionWarning);
        assert_eq!(classify(Some(0.5), Some(0.2)), ScenarioId::HealthyGrowth);
        assert_eq!(classify(Some(0.5), Some(-0.2)), ScenarioId::PolicyPivot);

        let mut numbers: Vec<u8> = ScenarioId::ALL.iter().map(|s| s.number()).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn zero_is_not_inverted_and_not_easing() {
        assert_eq!(classify(Some(0.0), Some(0.0)), ScenarioId::HealthyGrowth);
    }

    #[test]
    fn missing_signals_read_as_off() {
        assert_eq!(classify(None, None), ScenarioId::HealthyGrowth);
        assert_eq!(classify(Some(-0.1), None), ScenarioId::StagflationConcern);
        assert_eq!(classify(None, Some(-0.1)), ScenarioId::PolicyPivot);
    }

    #[test]
    fn every_profile_is_complete_and_consistent() {
        for id in ScenarioId::ALL {
            let p = profile(id);
            assert_eq!(p.id, id);
            assert!(!p.title.is_empty());
            assert!(!p.meaning.is_empty());
            assert!(!p.risk_label.is_empty());
            assert_eq!(p.allocations.len(), 8);
        }
    }
}
