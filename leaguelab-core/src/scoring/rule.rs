//! Points rule trait, weighted implementation and named presets.
//!
//! The rule is an explicit, injectable parameter of the ranking engine.
//! Presets cover the variants studied so far:
//! - **TwoPointsForWin**: 2/1/0, the pre-1981 scheme
//! - **ThreePointsForWin**: 3/1/0, the current official scheme
//! - **ThreeWinTwoDraw**: 3/2/0, a draw-friendly alternative

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maps a team's results to a points total.
///
/// Implementations must be pure: the same `(won, drawn, lost)` always yields
/// the same value, and nothing else about the team may influence it.
pub trait PointsRule: Send + Sync {
    /// Human-readable name used in reports and persisted results.
    fn name(&self) -> &str;

    fn points(&self, won: u32, drawn: u32, lost: u32) -> f64;
}

#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("points weight '{field}' must be finite, got {value}")]
    NonFiniteWeight { field: &'static str, value: f64 },

    #[error("unknown points rule '{0}' (valid: two_points_for_win, three_points_for_win, three_win_two_draw)")]
    UnknownPreset(String),
}

/// `won * win + drawn * draw + lost * loss`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRule {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
    label: String,
}

impl WeightedRule {
    pub fn new(win: f64, draw: f64, loss: f64) -> Result<Self, RuleError> {
        for (field, value) in [("win", win), ("draw", draw), ("loss", loss)] {
            if !value.is_finite() {
                return Err(RuleError::NonFiniteWeight { field, value });
            }
        }
        Ok(Self {
            win,
            draw,
            loss,
            label: format!("{}-{}-{}", win, draw, loss),
        })
    }

    fn named(win: f64, draw: f64, loss: f64, label: &str) -> Self {
        Self {
            win,
            draw,
            loss,
            label: label.to_string(),
        }
    }
}

impl PointsRule for WeightedRule {
    fn name(&self) -> &str {
        &self.label
    }

    fn points(&self, won: u32, drawn: u32, lost: u32) -> f64 {
        f64::from(won) * self.win + f64::from(drawn) * self.draw + f64::from(lost) * self.loss
    }
}

/// Named points schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    #[default]
    TwoPointsForWin,
    ThreePointsForWin,
    ThreeWinTwoDraw,
}

impl RulePreset {
    pub const ALL: [RulePreset; 3] = [
        RulePreset::TwoPointsForWin,
        RulePreset::ThreePointsForWin,
        RulePreset::ThreeWinTwoDraw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoPointsForWin => "two_points_for_win",
            Self::ThreePointsForWin => "three_points_for_win",
            Self::ThreeWinTwoDraw => "three_win_two_draw",
        }
    }

    /// (win, draw, loss) weights.
    pub fn weights(&self) -> (f64, f64, f64) {
        match self {
            Self::TwoPointsForWin => (2.0, 1.0, 0.0),
            Self::ThreePointsForWin => (3.0, 1.0, 0.0),
            Self::ThreeWinTwoDraw => (3.0, 2.0, 0.0),
        }
    }

    pub fn to_rule(self) -> WeightedRule {
        let (win, draw, loss) = self.weights();
        WeightedRule::named(win, draw, loss, self.as_str())
    }
}

impl fmt::Display for RulePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RulePreset {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "two_points_for_win" | "2_1_0" => Ok(Self::TwoPointsForWin),
            "three_points_for_win" | "3_1_0" => Ok(Self::ThreePointsForWin),
            "three_win_two_draw" | "3_2_0" => Ok(Self::ThreeWinTwoDraw),
            _ => Err(RuleError::UnknownPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_for_win_weights() {
        let rule = RulePreset::TwoPointsForWin.to_rule();
        assert_eq!(rule.points(10, 0, 0), 20.0);
        assert_eq!(rule.points(9, 3, 0), 21.0);
        assert_eq!(rule.points(5, 5, 2), 15.0);
        assert_eq!(rule.name(), "two_points_for_win");
    }

    #[test]
    fn three_points_for_win_weights() {
        let rule = RulePreset::ThreePointsForWin.to_rule();
        assert_eq!(rule.points(10, 0, 0), 30.0);
        assert_eq!(rule.points(20, 10, 8), 70.0);
    }

    #[test]
    fn three_win_two_draw_weights() {
        let rule = RulePreset::ThreeWinTwoDraw.to_rule();
        assert_eq!(rule.points(20, 10, 8), 80.0);
    }

    #[test]
    fn custom_rule_counts_losses() {
        let rule = WeightedRule::new(2.0, 1.0, -1.0).unwrap();
        assert_eq!(rule.points(3, 2, 4), 4.0);
        assert_eq!(rule.name(), "2-1--1");
    }

    #[test]
    fn custom_rule_rejects_non_finite_weights() {
        let err = WeightedRule::new(f64::NAN, 1.0, 0.0).unwrap_err();
        assert!(matches!(err, RuleError::NonFiniteWeight { field: "win", .. }));
        assert!(WeightedRule::new(2.0, f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn preset_parses_names_and_shorthand() {
        assert_eq!("two_points_for_win".parse::<RulePreset>().unwrap(), RulePreset::TwoPointsForWin);
        assert_eq!("three-points-for-win".parse::<RulePreset>().unwrap(), RulePreset::ThreePointsForWin);
        assert_eq!("3-2-0".parse::<RulePreset>().unwrap(), RulePreset::ThreeWinTwoDraw);
        assert_eq!("2-1-0".parse::<RulePreset>().unwrap(), RulePreset::TwoPointsForWin);
        assert!("4-1-0".parse::<RulePreset>().is_err());
    }

    #[test]
    fn every_preset_roundtrips_through_its_name() {
        for preset in RulePreset::ALL {
            assert_eq!(preset.as_str().parse::<RulePreset>().unwrap(), preset);
        }
    }
}
