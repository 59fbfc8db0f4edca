// steward-core/src/domain/rules/validation.rs
//
// Business checks over DQC rules. Each checker returns its violation
// messages; an empty list means the rule passes that check.

use crate::domain::error::DomainError;
use crate::domain::rules::record::RuleRecord;
use crate::domain::rules::standards::NamingStandard;
use crate::domain::rules::vocabulary::{DEFAULT_APPL_CD_PREFIX, ValidationMethod};

pub const APPL_CD_INCOMPLETE: &str = "APPL_CD must be completed. Please provide a full application code (e.g., EMM_PAYMENTS, EMM_FINANCE, etc.).";
pub const APPL_CD_TOO_SHORT: &str =
    "APPL_CD appears to be too short. Please provide a meaningful application code.";
pub const ABORT_MUST_BE_N: &str = "RULE_ABORT_IND must be 'N' for CNT_CHK or SUM_CHK.";
pub const ABORT_MUST_BE_Y: &str = "RULE_ABORT_IND must be 'Y' for RULE_VALID_METH_CD values other than CNT_CHK or SUM_CHK.";
pub const TARGET_ATTRIBUTE_REQUIRED: &str = "RULE_TRGT_ATTR_NM cannot be blank or 'NA' when RULE_VALID_METH_CD is SUM_CHK or DIFF_SUM_CHK. Please specify the attribute/column name to sum.";
pub const DUPLICATE_SEQUENCE: &str =
    "Duplicate RULE_TRGT_OBJ_ID_TXT with same RULE_VALID_CTGY_NM and RULE_SEQ_NR.";
pub const DUPLICATE_RULE_NAME: &str = "RULE_NM already exists.";
pub const NON_STANDARD_NAME: &str = "RULE_NM does not match any of the specified patterns";

const APPL_CD_MIN_LEN: usize = 4;

/// Whether the rule under check is already part of the collection it is
/// checked against. A member always matches itself once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    New,
    Existing,
}

impl RowOrigin {
    fn allowed_duplicates(self) -> usize {
        match self {
            Self::New => 0,
            Self::Existing => 1,
        }
    }
}

/// `prefix` is the project's application code prefix; the bare prefix is incomplete.
pub fn check_appl_cd(rule: &RuleRecord, prefix: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let appl_cd = rule.appl_cd.trim();
    if appl_cd.is_empty() || appl_cd == prefix.trim() || appl_cd.ends_with('_') {
        errors.push(APPL_CD_INCOMPLETE.to_string());
    }
    if !appl_cd.is_empty() && appl_cd.chars().count() < APPL_CD_MIN_LEN {
        errors.push(APPL_CD_TOO_SHORT.to_string());
    }
    errors
}

pub fn check_abort_indicator(rule: &RuleRecord) -> Vec<String> {
    let relaxed = is_relaxed_method(&rule.rule_valid_meth_cd);
    let mut errors = Vec::new();
    if relaxed && rule.rule_abort_ind == "Y" {
        errors.push(ABORT_MUST_BE_N.to_string());
    }
    if !relaxed && rule.rule_abort_ind == "N" {
        errors.push(ABORT_MUST_BE_Y.to_string());
    }
    errors
}

pub fn check_target_attribute(rule: &RuleRecord) -> Vec<String> {
    let needs_attribute = ValidationMethod::from_code(&rule.rule_valid_meth_cd)
        .is_some_and(|m| m.requires_target_attribute());
    let attribute = rule.rule_trgt_attr_nm.as_str();
    if needs_attribute && (attribute.trim().is_empty() || attribute == "NA") {
        vec![TARGET_ATTRIBUTE_REQUIRED.to_string()]
    } else {
        Vec::new()
    }
}

pub fn check_sequence_number(
    rule: &RuleRecord,
    rules: &[RuleRecord],
    origin: RowOrigin,
) -> Vec<String> {
    let duplicates = rules
        .iter()
        .filter(|r| {
            r.rule_trgt_obj_id_txt == rule.rule_trgt_obj_id_txt
                && r.rule_valid_ctgy_nm == rule.rule_valid_ctgy_nm
                && r.rule_seq_nr == rule.rule_seq_nr
        })
        .count();
    if duplicates > origin.allowed_duplicates() {
        vec![DUPLICATE_SEQUENCE.to_string()]
    } else {
        Vec::new()
    }
}

pub fn check_rule_name_unique(
    rule: &RuleRecord,
    rules: &[RuleRecord],
    origin: RowOrigin,
) -> Vec<String> {
    let duplicates = rules.iter().filter(|r| r.rule_nm == rule.rule_nm).count();
    if duplicates > origin.allowed_duplicates() {
        vec![DUPLICATE_RULE_NAME.to_string()]
    } else {
        Vec::new()
    }
}

pub fn check_naming_standard(standard: &NamingStandard, rule: &RuleRecord) -> Vec<String> {
    if standard.matches(&rule.rule_nm) {
        Vec::new()
    } else {
        vec![NON_STANDARD_NAME.to_string()]
    }
}

// Unknown codes count as non-relaxed, so they must abort.
fn is_relaxed_method(code: &str) -> bool {
    matches!(code, "CNT_CHK" | "SUM_CHK")
}

/// Runs every check in a fixed order and concatenates the messages.
pub struct RuleValidator {
    standard: NamingStandard,
    appl_cd_prefix: String,
}

impl RuleValidator {
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            standard: NamingStandard::new()?,
            appl_cd_prefix: DEFAULT_APPL_CD_PREFIX.to_string(),
        })
    }

    pub fn with_appl_cd_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.appl_cd_prefix = prefix.into();
        self
    }

    pub fn validate(
        &self,
        rule: &RuleRecord,
        rules: &[RuleRecord],
        origin: RowOrigin,
    ) -> Vec<String> {
        let mut errors = check_appl_cd(rule, &self.appl_cd_prefix);
        errors.extend(check_abort_indicator(rule));
        errors.extend(check_target_attribute(rule));
        errors.extend(check_sequence_number(rule, rules, origin));
        errors.extend(check_rule_name_unique(rule, rules, origin));
        errors.extend(check_naming_standard(&self.standard, rule));
        errors
    }
}
