// steward-core/src/domain/rules/standards.rs

use regex::Regex;

use crate::domain::error::DomainError;

/// Accepted rule name shapes, one per fragment the name generator can
/// settle on. Ambiguous fragments are deliberately absent.
pub const NAMING_PATTERNS: [&str; 14] = [
    r"^[A-Z0-9_]+OP_HOP3_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+OP_HOP2_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+OP_HOP1_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+DL2_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+FND_DL3_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+STG_DL3_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+INFO_DL3_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+OP_HOP3_HOP2_DIFF_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+OP_HOP2_HOP1_DIFF_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+OP_HOP1_DL2_DIFF_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+DL2_FND_DIFF_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+STG_INFO_DIFF_(CNT|SUM)_CHK$",
    r"^[A-Z0-9_]+INFO_DL3_DUP_CHK$",
    r"^[A-Z0-9_]+INFO_DL3_OVERLAP_CHK$",
];

pub struct NamingStandard {
    patterns: Vec<Regex>,
}

impl NamingStandard {
    pub fn new() -> Result<Self, DomainError> {
        let patterns = NAMING_PATTERNS
            .iter()
            .map(|p| Regex::new(p).map_err(|e| DomainError::pattern(p, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, rule_name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(rule_name))
    }
}
