// src/service/insight.rs

//! 導出済み指標への閾値ルールによる推奨テキスト生成
//!
//! インサイトは助言テキストのみで、元の指標を変更することはない。

use crate::service::deal_metrics::DealMetrics;
use crate::service::lead_metrics::LeadMetrics;
use crate::service::metrics::percentage;

/// リード転換率がこの値を下回ると注意を促す
const LOW_CONVERSION_RATE: f64 = 10.0;
/// 商談成立率がこの値を下回ると注意を促す
const LOW_WIN_RATE: f64 = 20.0;
/// 順調な目標の割合がこの値を下回ると警告
const TARGETS_CAUTION_SHARE: f64 = 50.0;
/// 順調な目標の割合がこの値以上なら好調と評価
const TARGETS_PRAISE_SHARE: f64 = 80.0;

pub fn lead_insights(metrics: &LeadMetrics) -> Vec<String> {
    let mut insights = Vec::new();
    if metrics.conversion_rate < LOW_CONVERSION_RATE {
        insights.push(
            "Lead conversion rate is below average. Consider improving lead qualification."
                .to_string(),
        );
    }
    insights
}

pub fn deal_insights(metrics: &DealMetrics) -> Vec<String> {
    let mut insights = Vec::new();
    if metrics.win_rate < LOW_WIN_RATE {
        insights.push(
            "Deal win rate needs improvement. Focus on better prospect targeting.".to_string(),
        );
    }
    insights
}

pub fn dashboard_insights(lead: &LeadMetrics, deal: &DealMetrics) -> Vec<String> {
    let mut insights = lead_insights(lead);
    insights.extend(deal_insights(deal));
    insights
}

pub fn target_insights(on_track: usize, total: usize) -> Vec<String> {
    let mut insights = Vec::new();
    if total == 0 {
        return insights;
    }

    let on_track_share = percentage(on_track as f64, total as f64);
    if on_track_share < TARGETS_CAUTION_SHARE {
        insights.push(
            "Less than 50% of targets are on track. Consider reviewing target settings or increasing team focus."
                .to_string(),
        );
    } else if on_track_share >= TARGETS_PRAISE_SHARE {
        insights.push("Excellent performance! 80% or more of targets are on track.".to_string());
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_conversion_rate_emits_insight() {
        let metrics = LeadMetrics {
            conversion_rate: 5.0,
            qualification_rate: 30.0,
        };
        let insights = lead_insights(&metrics);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("conversion rate"));
    }

    #[test]
    fn test_healthy_conversion_rate_is_silent() {
        let metrics = LeadMetrics {
            conversion_rate: 25.0,
            qualification_rate: 30.0,
        };
        assert!(lead_insights(&metrics).is_empty());
    }

    #[test]
    fn test_low_win_rate_emits_insight() {
        let metrics = DealMetrics {
            win_rate: 15.0,
            average_deal_value: 1_000.0,
        };
        let insights = deal_insights(&metrics);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("win rate"));
    }

    #[test]
    fn test_target_insights_thresholds() {
        // 50%未満は警告
        let caution = target_insights(2, 5);
        assert_eq!(caution.len(), 1);
        assert!(caution[0].contains("Less than 50%"));

        // 80%以上は好調
        let praise = target_insights(4, 5);
        assert_eq!(praise.len(), 1);
        assert!(praise[0].contains("80%"));

        // 中間帯は沈黙
        assert!(target_insights(3, 5).is_empty());
    }

    #[test]
    fn test_no_targets_yields_no_insight() {
        assert!(target_insights(0, 0).is_empty());
    }
}
