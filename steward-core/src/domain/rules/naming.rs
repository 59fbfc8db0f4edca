// steward-core/src/domain/rules/naming.rs
//
// Rule name generation: {TARGET_OBJECT}_{FRAGMENT}_{METHOD}, where the
// fragment says which layer (or pair of layers) the rule inspects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::rules::vocabulary::{
    DataLayer, INFORMATION_DATABASE, MethodGroup, PAYMENTS_DATABASE, ValidationMethod,
};

pub const RULE_NAME_PLACEHOLDER: &str = "Enter a rule name (e.g. TABLE_NM_DL2_CNT_CHK)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFragment {
    OpHop3,
    OpHop2,
    OpHop1,
    Dl2,
    FndDl3,
    /// Either HOP3→HOP2 or HOP2→HOP1; the user picks one by hand.
    OpHopPair,
    OpHop1Dl2,
    Dl2Fnd,
    /// Either staging or information DL3; the user picks one by hand.
    StgOrInfoDl3,
    StgInfo,
    InfoDl3,
    Unknown,
}

impl RuleFragment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpHop3 => "OP_HOP3",
            Self::OpHop2 => "OP_HOP2",
            Self::OpHop1 => "OP_HOP1",
            Self::Dl2 => "DL2",
            Self::FndDl3 => "FND_DL3",
            Self::OpHopPair => "OP_(HOP3_HOP2|HOP2_HOP1)",
            Self::OpHop1Dl2 => "OP_HOP1_DL2",
            Self::Dl2Fnd => "DL2_FND",
            Self::StgOrInfoDl3 => "(STG|INFO)_DL3",
            Self::StgInfo => "STG_INFO",
            Self::InfoDl3 => "INFO_DL3",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::OpHopPair | Self::StgOrInfoDl3)
    }

    /// Decision table over (target database, method group, data layer).
    /// Anything outside the documented combinations is `Unknown`.
    pub fn resolve(method: &str, database: &str, layer: &str) -> Self {
        let Some(group) = ValidationMethod::from_code(method).map(|m| m.group()) else {
            return Self::Unknown;
        };
        let layer = DataLayer::from_code(layer);

        match database {
            PAYMENTS_DATABASE => match (group, layer) {
                (MethodGroup::SingleLayer, Some(DataLayer::OnPremHop3)) => Self::OpHop3,
                (MethodGroup::SingleLayer, Some(DataLayer::OnPremHop2)) => Self::OpHop2,
                (MethodGroup::SingleLayer, Some(DataLayer::OnPremHop1)) => Self::OpHop1,
                (MethodGroup::SingleLayer, Some(DataLayer::Dl2)) => Self::Dl2,
                (MethodGroup::SingleLayer, Some(DataLayer::Dl3)) => Self::FndDl3,
                (MethodGroup::Difference, Some(DataLayer::OnPrem)) => Self::OpHopPair,
                (MethodGroup::Difference, Some(DataLayer::Dl2)) => Self::OpHop1Dl2,
                (MethodGroup::Difference, Some(DataLayer::Dl3)) => Self::Dl2Fnd,
                (MethodGroup::Uniqueness, Some(DataLayer::Dl3)) => Self::FndDl3,
                _ => Self::Unknown,
            },
            INFORMATION_DATABASE => match group {
                MethodGroup::SingleLayer => Self::StgOrInfoDl3,
                MethodGroup::Difference => Self::StgInfo,
                MethodGroup::Uniqueness => Self::InfoDl3,
            },
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RuleFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds the canonical rule name, or the placeholder while any input is empty.
pub fn generate_rule_name(
    target_object: &str,
    method: &str,
    database: &str,
    layer: &str,
) -> String {
    if [target_object, method, database, layer]
        .iter()
        .any(|v| v.is_empty())
    {
        return RULE_NAME_PLACEHOLDER.to_string();
    }
    let fragment = RuleFragment::resolve(method, database, layer);
    format!("{}_{}_{}", target_object, fragment, method)
}

/// A generated name that still encodes an unresolved choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameAmbiguity {
    StagingOrInformation,
    OnPremHopPair,
}

impl NameAmbiguity {
    pub fn detect(rule_name: &str) -> Option<Self> {
        if rule_name.contains("(STG|INFO)") {
            Some(Self::StagingOrInformation)
        } else if rule_name.contains("(HOP3_HOP2|HOP2_HOP1)") {
            Some(Self::OnPremHopPair)
        } else {
            None
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::StagingOrInformation => {
                "Rule name contains (STG|INFO) - you must manually choose either STG or INFO in the rule name."
            }
            Self::OnPremHopPair => {
                "Rule name contains (HOP3_HOP2|HOP2_HOP1) - you must manually choose either HOP3_HOP2 or HOP2_HOP1 in the rule name."
            }
        }
    }
}
