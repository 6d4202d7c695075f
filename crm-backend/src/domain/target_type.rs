// src/domain/target_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 目標の種別（何を集計して実績値とするか）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// 期間内に成立した商談金額の合計
    Revenue,
    /// 期間内に作成されたリード数
    Leads,
    /// 期間内に作成された商談数
    Deals,
    /// 成立商談数 ÷ 作成リード数 × 100
    Conversion,
}

impl TargetType {
    /// 文字列からTargetTypeに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "revenue" => Some(Self::Revenue),
            "leads" => Some(Self::Leads),
            "deals" => Some(Self::Deals),
            "conversion" => Some(Self::Conversion),
            _ => None,
        }
    }

    /// TargetTypeを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Leads => "leads",
            Self::Deals => "deals",
            Self::Conversion => "conversion",
        }
    }

    /// すべての有効な種別を取得
    pub fn all() -> Vec<Self> {
        vec![Self::Revenue, Self::Leads, Self::Deals, Self::Conversion]
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trip() {
        for target_type in TargetType::all() {
            assert_eq!(TargetType::from_str(target_type.as_str()), Some(target_type));
        }
        assert_eq!(TargetType::from_str("Revenue"), Some(TargetType::Revenue));
        assert_eq!(TargetType::from_str("pipeline"), None);
    }
}
