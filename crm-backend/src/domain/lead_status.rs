// src/domain/lead_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// リードの状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    /// 文字列からLeadStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "qualified" => Some(Self::Qualified),
            "converted" => Some(Self::Converted),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }

    /// LeadStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Converted => "converted",
            Self::Lost => "lost",
        }
    }

    /// すべての有効なステータスを取得
    pub fn all() -> Vec<Self> {
        vec![
            Self::New,
            Self::Contacted,
            Self::Qualified,
            Self::Converted,
            Self::Lost,
        ]
    }

    /// 商談化の見込みが残っているステータスかチェック
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::Contacted | Self::Qualified)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trip() {
        for status in LeadStatus::all() {
            assert_eq!(LeadStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::from_str("QUALIFIED"), Some(LeadStatus::Qualified));
        assert_eq!(LeadStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_is_open() {
        assert!(LeadStatus::New.is_open());
        assert!(LeadStatus::Qualified.is_open());
        assert!(!LeadStatus::Converted.is_open());
        assert!(!LeadStatus::Lost.is_open());
    }
}
