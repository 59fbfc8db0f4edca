// steward-core/src/application/rules.rs
//
// Rule session: the DQC rule collection plus everything that mutates it.
// Invalid rules never enter the collection through add or edit; imported
// files are taken as they are and checked with `validate_all`.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::project::RuleDefaults;
use crate::domain::rules::{RowOrigin, RuleForm, RuleRecord, RuleValidator, check_selections};

const EXPORT_PREFIX: &str = "DATA_QC_RULE_INFO";
const DEFAULT_EXPORT_APPL_CD: &str = "EMM";

/// A violation tied to its 1-based row in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowViolation {
    pub row: usize,
    pub message: String,
}

impl fmt::Display for RowViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

pub struct RuleSession {
    rules: Vec<RuleRecord>,
    original: Vec<RuleRecord>,
    validator: RuleValidator,
    defaults: RuleDefaults,
}

impl RuleSession {
    pub fn new(defaults: RuleDefaults) -> Result<Self, DomainError> {
        Self::with_rules(Vec::new(), defaults)
    }

    /// Session over an already persisted collection; it is also the reset point.
    pub fn with_rules(rules: Vec<RuleRecord>, defaults: RuleDefaults) -> Result<Self, DomainError> {
        Ok(Self {
            original: rules.clone(),
            rules,
            validator: RuleValidator::new()?.with_appl_cd_prefix(&defaults.appl_cd_prefix),
            defaults,
        })
    }

    pub fn rules(&self) -> &[RuleRecord] {
        &self.rules
    }

    pub fn defaults(&self) -> &RuleDefaults {
        &self.defaults
    }

    /// An empty form prefilled for this project.
    pub fn new_form(&self) -> RuleForm {
        RuleForm::with_defaults(&self.defaults)
    }

    /// Violations `rule` would raise if added now.
    pub fn check(&self, rule: &RuleRecord) -> Vec<String> {
        self.validator.validate(rule, &self.rules, RowOrigin::New)
    }

    fn reject(rule_name: &str, violations: Vec<String>) -> DomainError {
        warn!(rule = rule_name, count = violations.len(), "Rule rejected");
        DomainError::RuleRejected {
            rule_name: rule_name.to_string(),
            violations,
        }
    }

    /// Appends a valid rule and returns its index.
    #[instrument(skip(self, rule), fields(rule = %rule.rule_nm))]
    pub fn add_rule(&mut self, rule: RuleRecord) -> Result<usize, DomainError> {
        let violations = self.check(&rule);
        if !violations.is_empty() {
            return Err(Self::reject(&rule.rule_nm, violations));
        }
        self.rules.push(rule);
        if self.rules.len() == 1 && self.original.is_empty() {
            self.original = self.rules.clone();
        }
        info!(total = self.rules.len(), "Rule added");
        Ok(self.rules.len() - 1)
    }

    /// Builds a record from the form (uppercasing text inputs) and adds it.
    pub fn add_from_form(
        &mut self,
        mut form: RuleForm,
        now: NaiveDateTime,
    ) -> Result<usize, DomainError> {
        check_selections(&form.category, &form.sequence_number)?;
        form.category = form.category.trim().to_uppercase();
        form.sequence_number = form.sequence_number.trim().to_string();
        form.normalize_text_inputs();
        let record = form.into_record(&self.defaults, now);
        self.add_rule(record)
    }

    /// Applies `edit` to a copy of row `index` and validates it in place,
    /// against the collection as it would look after the edit.
    #[instrument(skip(self, edit))]
    pub fn edit_rule<F>(&mut self, index: usize, edit: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut RuleRecord) -> Result<(), DomainError>,
    {
        let len = self.rules.len();
        let mut candidate = self
            .rules
            .get(index)
            .cloned()
            .ok_or(DomainError::RecordNotFound { index, len })?;
        let before = (
            candidate.rule_valid_ctgy_nm.clone(),
            candidate.rule_seq_nr.clone(),
        );
        edit(&mut candidate)?;
        candidate.normalize_edited_case();
        // Imported rows may hold odd selections; only changed ones are checked.
        if (&candidate.rule_valid_ctgy_nm, &candidate.rule_seq_nr) != (&before.0, &before.1) {
            check_selections(&candidate.rule_valid_ctgy_nm, &candidate.rule_seq_nr)?;
        }

        let mut edited = self.rules.clone();
        edited[index] = candidate.clone();
        let violations = self
            .validator
            .validate(&candidate, &edited, RowOrigin::Existing);
        if !violations.is_empty() {
            return Err(Self::reject(&candidate.rule_nm, violations));
        }
        self.rules = edited;
        info!("Rule updated");
        Ok(())
    }

    /// Sets columns by file header name, e.g. `("RULE_SEQ_NR", "2")`.
    pub fn update_fields(
        &mut self,
        index: usize,
        changes: &[(String, String)],
    ) -> Result<(), DomainError> {
        self.edit_rule(index, |rule| {
            for (field, value) in changes {
                rule.set_field(field, value.as_str())?;
            }
            Ok(())
        })
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<RuleRecord, DomainError> {
        if index >= self.rules.len() {
            return Err(DomainError::RecordNotFound {
                index,
                len: self.rules.len(),
            });
        }
        let removed = self.rules.remove(index);
        info!(rule = %removed.rule_nm, "Rule deleted");
        Ok(removed)
    }

    /// Checks every row as a member of the collection.
    pub fn validate_all(&self) -> Vec<RowViolation> {
        self.rules
            .iter()
            .enumerate()
            .flat_map(|(i, rule)| {
                self.validator
                    .validate(rule, &self.rules, RowOrigin::Existing)
                    .into_iter()
                    .map(move |message| RowViolation {
                        row: i + 1,
                        message,
                    })
            })
            .collect()
    }

    /// Replaces the collection with imported rows and makes them the reset point.
    pub fn import(&mut self, mut rules: Vec<RuleRecord>) -> usize {
        for rule in &mut rules {
            rule.normalize_case();
        }
        self.original = rules.clone();
        self.rules = rules;
        info!(count = self.rules.len(), "Rules imported");
        self.rules.len()
    }

    pub fn reset(&mut self) {
        self.rules = self.original.clone();
        info!(count = self.rules.len(), "Rules reset to original");
    }

    pub fn stats(&self) -> RuleStats {
        let total = self.rules.len();
        let active = self.rules.iter().filter(|r| r.is_active()).count();
        RuleStats {
            total,
            active,
            inactive: total - active,
        }
    }

    pub fn export_file_name(&self) -> String {
        let appl_cd = self
            .rules
            .first()
            .map(|r| r.appl_cd.replace(' ', "_"))
            .unwrap_or_else(|| DEFAULT_EXPORT_APPL_CD.to_string());
        format!("{}_{}.csv", EXPORT_PREFIX, appl_cd)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::rules::validation::{
        APPL_CD_INCOMPLETE, DUPLICATE_RULE_NAME, NON_STANDARD_NAME,
    };
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn form(target: &str, seq: &str) -> RuleForm {
        let mut form = RuleForm {
            appl_cd: "emm_payments".to_string(),
            target_object: target.to_string(),
            sequence_number: seq.to_string(),
            ..Default::default()
        };
        form.refresh();
        form
    }

    fn session_with(targets: &[&str]) -> RuleSession {
        let mut session = RuleSession::new(RuleDefaults::default()).unwrap();
        for target in targets {
            session.add_from_form(form(target, "1"), now()).unwrap();
        }
        session
    }

    #[test]
    fn test_add_from_form_uppercases_and_validates() -> anyhow::Result<()> {
        let mut session = RuleSession::new(RuleDefaults::default())?;
        let index = session.add_from_form(form("payment_tbl", "1"), now())?;
        let rule = &session.rules()[index];
        assert_eq!(rule.appl_cd, "EMM_PAYMENTS");
        assert_eq!(rule.rule_nm, "PAYMENT_TBL_DL2_CNT_CHK");
        assert_eq!(rule.rule_trgt_obj_id_txt, "PAYMENT_TBL");
        Ok(())
    }

    #[test]
    fn test_invalid_rule_is_rejected() -> anyhow::Result<()> {
        let mut session = session_with(&["PAYMENT_TBL"]);
        let err = session
            .add_from_form(form("PAYMENT_TBL", "2"), now())
            .unwrap_err();
        match err {
            DomainError::RuleRejected { violations, .. } => {
                assert_eq!(violations, vec![DUPLICATE_RULE_NAME.to_string()]);
            }
            other => anyhow::bail!("unexpected error: {other}"),
        }
        assert_eq!(session.rules().len(), 1);
        Ok(())
    }

    #[test]
    fn test_edit_validates_in_place() -> anyhow::Result<()> {
        let mut session = session_with(&["A_TBL", "B_TBL"]);
        session.update_fields(0, &[("RULE_RMRK_TXT".to_string(), "checked".to_string())])?;
        assert_eq!(session.rules()[0].rule_rmrk_txt, "CHECKED");

        let err = session
            .update_fields(1, &[("rule_nm".to_string(), "A_TBL_DL2_CNT_CHK".to_string())])
            .unwrap_err();
        assert!(matches!(err, DomainError::RuleRejected { .. }));
        assert_eq!(session.rules()[1].rule_nm, "B_TBL_DL2_CNT_CHK");

        assert!(matches!(
            session.update_fields(0, &[("NOPE".to_string(), "x".to_string())]),
            Err(DomainError::UnknownField(_))
        ));
        assert!(matches!(
            session.update_fields(9, &[]),
            Err(DomainError::RecordNotFound { index: 9, len: 2 })
        ));
        Ok(())
    }

    #[test]
    fn test_out_of_list_category_and_sequence_are_refused() -> anyhow::Result<()> {
        let mut session = RuleSession::new(RuleDefaults::default())?;

        let mut bad_sequence = form("PAYMENT_TBL", "99");
        bad_sequence.category = "POST".to_string();
        assert!(matches!(
            session.add_from_form(bad_sequence, now()),
            Err(DomainError::InvalidSelection {
                field: "RULE_SEQ_NR",
                ..
            })
        ));

        let mut bad_category = form("PAYMENT_TBL", "1");
        bad_category.category = "BOGUS".to_string();
        assert!(matches!(
            session.add_from_form(bad_category, now()),
            Err(DomainError::InvalidSelection {
                field: "RULE_VALID_CTGY_NM",
                ..
            })
        ));
        assert!(session.rules().is_empty());

        session.add_from_form(form("PAYMENT_TBL", "1"), now())?;
        assert!(matches!(
            session.update_fields(0, &[("RULE_SEQ_NR".to_string(), "99".to_string())]),
            Err(DomainError::InvalidSelection { .. })
        ));
        assert!(matches!(
            session.update_fields(0, &[("RULE_VALID_CTGY_NM".to_string(), "BOGUS".to_string())]),
            Err(DomainError::InvalidSelection { .. })
        ));
        assert_eq!(session.rules()[0].rule_seq_nr, "1");
        assert_eq!(session.rules()[0].rule_valid_ctgy_nm, "POST");
        Ok(())
    }

    #[test]
    fn test_project_prefix_drives_form_and_validation() -> anyhow::Result<()> {
        let defaults = RuleDefaults {
            appl_cd_prefix: "FIN_".to_string(),
            ..Default::default()
        };
        let mut session = RuleSession::new(defaults)?;
        let mut form = session.new_form();
        assert_eq!(form.appl_cd, "FIN_");

        form.target_object = "PAYMENT_TBL".to_string();
        form.refresh();
        match session.add_from_form(form.clone(), now()) {
            Err(DomainError::RuleRejected { violations, .. }) => {
                assert_eq!(violations, vec![APPL_CD_INCOMPLETE.to_string()]);
            }
            other => anyhow::bail!("unexpected outcome: {other:?}"),
        }

        form.appl_cd = "FIN_PAYMENTS".to_string();
        session.add_from_form(form, now())?;
        assert_eq!(session.rules()[0].appl_cd, "FIN_PAYMENTS");
        Ok(())
    }

    #[test]
    fn test_lowercase_object_is_described_uppercased() -> anyhow::Result<()> {
        let mut session = RuleSession::new(RuleDefaults::default())?;
        session.add_from_form(form("payment_tbl", "1"), now())?;
        let rule = &session.rules()[0];
        assert_eq!(rule.rule_trgt_obj_id_txt, "PAYMENT_TBL");
        assert_eq!(rule.rule_dsc_txt, "Performs count check on DL2 table PAYMENT_TBL.");
        Ok(())
    }

    #[test]
    fn test_import_validate_all_and_reset() -> anyhow::Result<()> {
        let mut session = session_with(&["A_TBL"]);
        let mut imported = session.rules()[0].clone();
        imported.rule_nm = "a_tbl_custom".to_string();
        let count = session.import(vec![imported.clone(), session.rules()[0].clone()]);
        assert_eq!(count, 2);
        assert_eq!(session.rules()[0].rule_nm, "A_TBL_CUSTOM");

        let violations = session.validate_all();
        let rendered: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        assert!(rendered.contains(&format!("Row 1: {}", NON_STANDARD_NAME)));
        assert!(violations.iter().all(|v| v.row == 1 || v.row == 2));

        session.delete_rule(0)?;
        assert_eq!(session.rules().len(), 1);
        session.reset();
        assert_eq!(session.rules().len(), 2);
        Ok(())
    }

    #[test]
    fn test_stats_and_export_name() -> anyhow::Result<()> {
        let mut session = RuleSession::new(RuleDefaults::default())?;
        assert_eq!(session.export_file_name(), "DATA_QC_RULE_INFO_EMM.csv");

        let mut inactive = form("B_TBL", "1");
        inactive.active = "N".to_string();
        session.add_from_form(form("A_TBL", "1"), now())?;
        session.add_from_form(inactive, now())?;
        assert_eq!(
            session.stats(),
            RuleStats {
                total: 2,
                active: 1,
                inactive: 1
            }
        );

        session.update_fields(0, &[("APPL_CD".to_string(), "EMM PAY".to_string())])?;
        assert_eq!(session.export_file_name(), "DATA_QC_RULE_INFO_EMM_PAY.csv");
        Ok(())
    }
}
