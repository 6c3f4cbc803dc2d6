//! Points rules: how a (won, drawn, lost) record turns into a points total.

pub mod rule;

pub use rule::{PointsRule, RuleError, RulePreset, WeightedRule};
