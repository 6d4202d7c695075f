// src/domain/deal_stage.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 商談のステージを表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl DealStage {
    /// 文字列からDealStageに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lead" => Some(Self::Lead),
            "qualified" => Some(Self::Qualified),
            "proposal" => Some(Self::Proposal),
            "negotiation" => Some(Self::Negotiation),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }

    /// DealStageを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// すべてのステージを取得（ファネルの正規順）
    pub fn all() -> Vec<Self> {
        vec![
            Self::Lead,
            Self::Qualified,
            Self::Proposal,
            Self::Negotiation,
            Self::Won,
            Self::Lost,
        ]
    }

    /// ファネルの転換経路となるステージ列
    ///
    /// lost は経路の外（どのステージからも脱落しうる）なので含めない
    pub fn funnel_order() -> [Self; 5] {
        [
            Self::Lead,
            Self::Qualified,
            Self::Proposal,
            Self::Negotiation,
            Self::Won,
        ]
    }

    /// ステージが終端（成立・失注）かチェック
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trip() {
        for stage in DealStage::all() {
            assert_eq!(DealStage::from_str(stage.as_str()), Some(stage));
        }
        assert_eq!(DealStage::from_str("WON"), Some(DealStage::Won));
        assert_eq!(DealStage::from_str("closed"), None);
    }

    #[test]
    fn test_funnel_order_ends_at_won() {
        let order = DealStage::funnel_order();
        assert_eq!(order.first(), Some(&DealStage::Lead));
        assert_eq!(order.last(), Some(&DealStage::Won));
        assert!(!order.contains(&DealStage::Lost));
    }

    #[test]
    fn test_is_closed() {
        assert!(DealStage::Won.is_closed());
        assert!(DealStage::Lost.is_closed());
        assert!(!DealStage::Negotiation.is_closed());
    }
}
