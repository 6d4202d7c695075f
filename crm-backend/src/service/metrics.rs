// src/service/metrics.rs

//! 率・成長率のゼロ除算ガード付き算術
//!
//! 「データがまだ無い」は新規の会社・目標では正常な状態なので、
//! 分母0はエラーではなく0として扱う。呼び出し側は元の件数を併せて
//! 返すことで、本当の0と区別できるようにする。

use serde::{Deserialize, Serialize};

/// part / whole × 100。whole が0以下なら0
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}

/// numer / denom。denom が0以下なら0
pub fn ratio(numer: f64, denom: f64) -> f64 {
    if denom > 0.0 {
        numer / denom
    } else {
        0.0
    }
}

/// 前期間比の傾向ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// 前期間比の成長指標
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthMetrics {
    /// (current - previous) / previous × 100。previous が0なら0
    pub rate: f64,
    pub trend: Trend,
}

pub fn growth(current: f64, previous: f64) -> GrowthMetrics {
    let rate = if previous > 0.0 {
        ((current - previous) / previous) * 100.0
    } else {
        0.0
    };

    let trend = if rate > 0.0 {
        Trend::Up
    } else if rate < 0.0 {
        Trend::Down
    } else {
        Trend::Stable
    };

    GrowthMetrics { rate, trend }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_guards_zero_denominator() {
        assert_eq!(percentage(25.0, 100.0), 25.0);
        assert_eq!(percentage(10.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert!(percentage(1.0, 0.0).is_finite());
    }

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(ratio(50_000.0, 5.0), 10_000.0);
        assert_eq!(ratio(50_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_growth_up() {
        let growth = growth(120.0, 100.0);
        assert_eq!(growth.rate, 20.0);
        assert_eq!(growth.trend, Trend::Up);
    }

    #[test]
    fn test_growth_down() {
        let growth = growth(80.0, 100.0);
        assert_eq!(growth.rate, -20.0);
        assert_eq!(growth.trend, Trend::Down);
    }

    #[test]
    fn test_growth_with_zero_previous_is_stable() {
        let growth = growth(50.0, 0.0);
        assert_eq!(growth.rate, 0.0);
        assert_eq!(growth.trend, Trend::Stable);
    }

    #[test]
    fn test_growth_flat_is_stable() {
        let growth = growth(100.0, 100.0);
        assert_eq!(growth.rate, 0.0);
        assert_eq!(growth.trend, Trend::Stable);
    }

    #[test]
    fn test_trend_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Trend::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Trend::Down).unwrap(), "\"down\"");
        assert_eq!(serde_json::to_string(&Trend::Stable).unwrap(), "\"stable\"");
    }
}
