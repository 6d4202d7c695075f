// src/service/deal_metrics.rs

//! 商談側の導出指標と売上予測（純関数）

use crate::domain::raw_metrics::RawDealMetrics;
use crate::service::metrics::{percentage, ratio};
use serde::Serialize;

// 固定係数による簡易予測。統計モデルではなくプレースホルダのヒューリスティクス
const NEXT_MONTH_MULTIPLIER: f64 = 1.1;
const NEXT_QUARTER_MULTIPLIER: f64 = 3.2;
const FORECAST_CONFIDENCE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DealMetrics {
    /// 成立 ÷ (成立 + 失注) × 100（クローズ0件なら0）
    pub win_rate: f64,
    /// 成立金額合計 ÷ 成立件数（成立0件なら0）
    pub average_deal_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueForecast {
    pub next_month: f64,
    pub next_quarter: f64,
    pub confidence: f64,
}

pub fn calculate(raw: &RawDealMetrics) -> DealMetrics {
    let closed = (raw.won_deals + raw.lost_deals) as f64;
    DealMetrics {
        win_rate: percentage(raw.won_deals as f64, closed),
        average_deal_value: ratio(raw.total_revenue, raw.won_deals as f64),
    }
}

pub fn forecast(raw: &RawDealMetrics) -> RevenueForecast {
    RevenueForecast {
        next_month: raw.total_revenue * NEXT_MONTH_MULTIPLIER,
        next_quarter: raw.total_revenue * NEXT_QUARTER_MULTIPLIER,
        confidence: FORECAST_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(won: u64, lost: u64, revenue: f64) -> RawDealMetrics {
        RawDealMetrics {
            total_deals: won + lost,
            won_deals: won,
            lost_deals: lost,
            total_revenue: revenue,
            ..Default::default()
        }
    }

    #[test]
    fn test_win_rate_and_average_value() {
        let metrics = calculate(&raw(3, 1, 30_000.0));
        assert_eq!(metrics.win_rate, 75.0);
        assert_eq!(metrics.average_deal_value, 10_000.0);
    }

    #[test]
    fn test_no_closed_deals_yields_zero_win_rate() {
        let metrics = calculate(&raw(0, 0, 0.0));
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.average_deal_value, 0.0);
        assert!(metrics.win_rate.is_finite());
    }

    #[test]
    fn test_no_won_deals_yields_zero_average_value() {
        let metrics = calculate(&raw(0, 5, 0.0));
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.average_deal_value, 0.0);
    }

    #[test]
    fn test_forecast_uses_fixed_multipliers() {
        let forecast = forecast(&raw(2, 0, 1_000.0));
        assert!((forecast.next_month - 1_100.0).abs() < 1e-9);
        assert!((forecast.next_quarter - 3_200.0).abs() < 1e-9);
        assert_eq!(forecast.confidence, 0.75);
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let input = raw(4, 6, 48_000.0);
        assert_eq!(calculate(&input), calculate(&input));
    }
}
