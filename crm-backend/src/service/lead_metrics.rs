// src/service/lead_metrics.rs

//! リード側の導出指標（入力が同じなら出力も同じ純関数）

use crate::domain::raw_metrics::RawLeadMetrics;
use crate::service::metrics::percentage;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeadMetrics {
    /// 転換済みリード ÷ 総リード × 100（総リード0件なら0）
    pub conversion_rate: f64,
    /// 有望リード ÷ 総リード × 100（総リード0件なら0）
    pub qualification_rate: f64,
}

pub fn calculate(raw: &RawLeadMetrics) -> LeadMetrics {
    let total = raw.total_leads as f64;
    LeadMetrics {
        conversion_rate: percentage(raw.converted_leads as f64, total),
        qualification_rate: percentage(raw.qualified_leads as f64, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(total: u64, qualified: u64, converted: u64) -> RawLeadMetrics {
        RawLeadMetrics {
            total_leads: total,
            qualified_leads: qualified,
            converted_leads: converted,
            ..Default::default()
        }
    }

    #[test]
    fn test_rates_from_counts() {
        let metrics = calculate(&raw(100, 40, 25));
        assert_eq!(metrics.conversion_rate, 25.0);
        assert_eq!(metrics.qualification_rate, 40.0);
    }

    #[test]
    fn test_zero_leads_never_errors() {
        let metrics = calculate(&raw(0, 0, 0));
        assert_eq!(metrics.conversion_rate, 0.0);
        assert_eq!(metrics.qualification_rate, 0.0);
        assert!(metrics.conversion_rate.is_finite());
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let input = raw(80, 30, 12);
        assert_eq!(calculate(&input), calculate(&input));
    }
}
