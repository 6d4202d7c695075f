// src/service/funnel.rs

//! ファネル健全性の評価（純関数）
//!
//! 正規順の隣接ステージ間の転換率を求め、最悪のステージが
//! ファネル全体のラベルを決める（worst-stage-wins）。

use crate::domain::deal_stage::DealStage;
use crate::domain::raw_metrics::StageBreakdown;
use crate::service::metrics::percentage;
use serde::Serialize;

/// どこかの隣接転換率がこの値を下回ると critical
const CRITICAL_RATE: f64 = 10.0;
/// どこかの隣接転換率がこの値を下回ると at_risk
const AT_RISK_RATE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelHealth {
    Healthy,
    AtRisk,
    Critical,
}

/// 隣接ステージ間の転換率
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageConversion {
    pub from_stage: String,
    pub to_stage: String,
    /// count[to] ÷ count[from] × 100（from が0件なら0）
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelEvaluation {
    pub conversion_rates: Vec<StageConversion>,
    pub health: FunnelHealth,
}

pub fn evaluate(stages: &[StageBreakdown]) -> FunnelEvaluation {
    let count_of = |stage: DealStage| -> i64 {
        stages
            .iter()
            .find(|s| s.stage == stage.as_str())
            .map(|s| s.count)
            .unwrap_or(0)
    };

    let order = DealStage::funnel_order();
    let conversion_rates: Vec<StageConversion> = order
        .windows(2)
        .map(|pair| StageConversion {
            from_stage: pair[0].as_str().to_string(),
            to_stage: pair[1].as_str().to_string(),
            rate: percentage(count_of(pair[1]) as f64, count_of(pair[0]) as f64),
        })
        .collect();

    let worst = conversion_rates
        .iter()
        .map(|c| c.rate)
        .fold(f64::INFINITY, f64::min);

    let health = if worst < CRITICAL_RATE {
        FunnelHealth::Critical
    } else if worst < AT_RISK_RATE {
        FunnelHealth::AtRisk
    } else {
        FunnelHealth::Healthy
    };

    FunnelEvaluation {
        conversion_rates,
        health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stages(counts: &[(&str, i64)]) -> Vec<StageBreakdown> {
        counts
            .iter()
            .map(|(stage, count)| StageBreakdown {
                stage: stage.to_string(),
                count: *count,
                value: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_healthy_funnel() {
        let stages = stages(&[
            ("lead", 100),
            ("qualified", 60),
            ("proposal", 30),
            ("negotiation", 15),
            ("won", 8),
        ]);
        let evaluation = evaluate(&stages);
        assert_eq!(evaluation.health, FunnelHealth::Healthy);
        assert_eq!(evaluation.conversion_rates.len(), 4);
        assert_eq!(evaluation.conversion_rates[0].rate, 60.0);
    }

    #[test]
    fn test_single_weak_stage_marks_whole_funnel_critical() {
        // negotiation → won が5%: 他が健全でも全体は critical
        let stages = stages(&[
            ("lead", 100),
            ("qualified", 60),
            ("proposal", 40),
            ("negotiation", 20),
            ("won", 1),
        ]);
        assert_eq!(evaluate(&stages).health, FunnelHealth::Critical);
    }

    #[test]
    fn test_at_risk_between_thresholds() {
        let stages = stages(&[
            ("lead", 100),
            ("qualified", 50),
            ("proposal", 25),
            ("negotiation", 12),
            ("won", 2),
        ]);
        // negotiation → won = 16.7% で at_risk 帯
        assert_eq!(evaluate(&stages).health, FunnelHealth::AtRisk);
    }

    #[test]
    fn test_empty_stage_counts_as_zero_rate() {
        let stages = stages(&[("lead", 0), ("qualified", 0)]);
        let evaluation = evaluate(&stages);
        assert_eq!(evaluation.conversion_rates[0].rate, 0.0);
        assert_eq!(evaluation.health, FunnelHealth::Critical);
    }

    #[test]
    fn test_health_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&FunnelHealth::AtRisk).unwrap(),
            "\"at_risk\""
        );
    }
}
