// steward-core/src/domain/rules/vocabulary.rs
//
// Closed value sets of the DQC rule form. Records keep raw strings (imports
// can carry anything); these enums give the decision tables something to
// match on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

pub const PAYMENTS_DATABASE: &str = "CFOPAYMENTSDB";
pub const INFORMATION_DATABASE: &str = "CFOINFODMDB";

pub const SEQUENCE_RANGE: std::ops::RangeInclusive<u8> = 1..=20;

/// Start of every application code; overridable per project.
pub const DEFAULT_APPL_CD_PREFIX: &str = "EMM_";

/// Validation method codes (`RULE_VALID_METH_CD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMethod {
    CntChk,
    SumChk,
    DiffCntChk,
    DiffSumChk,
    DupChk,
    OverlapChk,
}

/// How a method compares layers; drives the rule name fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodGroup {
    /// Count or sum within one layer.
    SingleLayer,
    /// Count or sum difference between two layers.
    Difference,
    /// Duplicate or overlap detection.
    Uniqueness,
}

impl ValidationMethod {
    pub const ALL: [ValidationMethod; 6] = [
        Self::CntChk,
        Self::SumChk,
        Self::DiffCntChk,
        Self::DiffSumChk,
        Self::DupChk,
        Self::OverlapChk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CntChk => "CNT_CHK",
            Self::SumChk => "SUM_CHK",
            Self::DiffCntChk => "DIFF_CNT_CHK",
            Self::DiffSumChk => "DIFF_SUM_CHK",
            Self::DupChk => "DUP_CHK",
            Self::OverlapChk => "OVERLAP_CHK",
        }
    }

    /// Exact, case-sensitive lookup of a stored code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == code)
    }

    pub fn group(&self) -> MethodGroup {
        match self {
            Self::CntChk | Self::SumChk => MethodGroup::SingleLayer,
            Self::DiffCntChk | Self::DiffSumChk => MethodGroup::Difference,
            Self::DupChk | Self::OverlapChk => MethodGroup::Uniqueness,
        }
    }

    /// Plain count and sum checks only warn; every other method aborts the load.
    pub fn abort_indicator(&self) -> &'static str {
        match self.group() {
            MethodGroup::SingleLayer => "N",
            _ => "Y",
        }
    }

    /// Sum checks need the column being summed.
    pub fn requires_target_attribute(&self) -> bool {
        matches!(self, Self::SumChk | Self::DiffSumChk)
    }
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ValidationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.trim().to_uppercase())
            .ok_or_else(|| format!("Unknown validation method: {}", s))
    }
}

/// `RULE_VALID_CTGY_NM`: whether the rule runs before or after the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationCategory {
    #[default]
    Post,
    Pre,
}

impl ValidationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Pre => "PRE",
        }
    }
}

impl fmt::Display for ValidationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ValidationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "POST" => Ok(Self::Post),
            "PRE" => Ok(Self::Pre),
            _ => Err(format!("Unknown validation category: {}", s)),
        }
    }
}

/// `RULE_TRGT_DATA_LAYER_NM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataLayer {
    #[serde(rename = "DL2")]
    Dl2,
    #[serde(rename = "DL3")]
    Dl3,
    #[serde(rename = "OnPrem_HOP1")]
    OnPremHop1,
    #[serde(rename = "OnPrem_HOP2")]
    OnPremHop2,
    #[serde(rename = "OnPrem_HOP3")]
    OnPremHop3,
    #[serde(rename = "OnPrem")]
    OnPrem,
}

impl DataLayer {
    pub const ALL: [DataLayer; 6] = [
        Self::Dl2,
        Self::Dl3,
        Self::OnPremHop1,
        Self::OnPremHop2,
        Self::OnPremHop3,
        Self::OnPrem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dl2 => "DL2",
            Self::Dl3 => "DL3",
            Self::OnPremHop1 => "OnPrem_HOP1",
            Self::OnPremHop2 => "OnPrem_HOP2",
            Self::OnPremHop3 => "OnPrem_HOP3",
            Self::OnPrem => "OnPrem",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == code)
    }

    /// On-prem hops only exist behind the payments database.
    pub fn implies_payments_database(&self) -> bool {
        matches!(
            self,
            Self::OnPremHop1 | Self::OnPremHop2 | Self::OnPremHop3 | Self::OnPrem
        )
    }
}

impl fmt::Display for DataLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().to_uppercase() == wanted)
            .ok_or_else(|| format!("Unknown data layer: {}", s))
    }
}

pub fn is_valid_sequence_number(value: &str) -> bool {
    value
        .trim()
        .parse::<u8>()
        .is_ok_and(|n| SEQUENCE_RANGE.contains(&n))
}

/// Category and sequence number only take values from fixed lists; anything
/// else is refused before the rule reaches validation.
pub fn check_selections(category: &str, sequence: &str) -> Result<(), DomainError> {
    if category.parse::<ValidationCategory>().is_err() {
        return Err(DomainError::InvalidSelection {
            field: "RULE_VALID_CTGY_NM",
            value: category.to_string(),
            expected: "POST or PRE",
        });
    }
    if !is_valid_sequence_number(sequence) {
        return Err(DomainError::InvalidSelection {
            field: "RULE_SEQ_NR",
            value: sequence.to_string(),
            expected: "a number from 1 to 20",
        });
    }
    Ok(())
}
