// steward-core/src/domain/rules/derive.rs
//
// The rule form and the fields derived from it. Callers change a selection,
// then call `refresh()` (or one of the `with_*` helpers) to recompute the
// derived fields in one place.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::project::RuleDefaults;
use crate::domain::rules::description::generate_rule_description;
use crate::domain::rules::naming::{NameAmbiguity, generate_rule_name};
use crate::domain::rules::record::RuleRecord;
use crate::domain::rules::vocabulary::{DataLayer, PAYMENTS_DATABASE, ValidationMethod};

/// Fields the form computes from the user's selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub rule_name: String,
    pub description: String,
    pub abort_indicator: String,
    pub target_attribute: String,
}

impl DerivedFields {
    pub fn ambiguity(&self) -> Option<NameAmbiguity> {
        NameAmbiguity::detect(&self.rule_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleForm {
    pub appl_cd: String,
    pub category: String,
    pub method: String,
    pub source_database: String,
    pub source_schema: String,
    pub source_object: String,
    pub target_database: String,
    pub target_schema: String,
    pub target_object: String,
    pub target_attribute: String,
    pub data_layer: String,
    pub sequence_number: String,
    pub active: String,
    pub rule_logic: String,
    pub rule_name: String,
    pub description: String,
    pub abort_indicator: String,
}

impl Default for RuleForm {
    fn default() -> Self {
        Self::with_defaults(&RuleDefaults::default())
    }
}

impl RuleForm {
    /// A fresh form whose application code starts at the project prefix.
    pub fn with_defaults(defaults: &RuleDefaults) -> Self {
        let mut form = Self {
            appl_cd: defaults.appl_cd_prefix.clone(),
            category: "POST".to_string(),
            method: ValidationMethod::CntChk.as_str().to_string(),
            source_database: "DL2_CHIEF_FINANCIAL_OFFICE_RQ".to_string(),
            source_schema: "ENTERPRISE".to_string(),
            source_object: "SOURCE_TABLE".to_string(),
            target_database: PAYMENTS_DATABASE.to_string(),
            target_schema: "APP_CFOPYMTS".to_string(),
            target_object: "TARGET_TABLE".to_string(),
            target_attribute: "NA".to_string(),
            data_layer: DataLayer::Dl2.as_str().to_string(),
            sequence_number: "1".to_string(),
            active: "Y".to_string(),
            rule_logic: "Enter rule SQL statement here".to_string(),
            rule_name: String::new(),
            description: String::new(),
            abort_indicator: "N".to_string(),
        };
        form.refresh();
        form
    }

    /// Computes the derived fields from the current selections without
    /// touching the form.
    pub fn derive(&self) -> DerivedFields {
        let abort_indicator = match ValidationMethod::from_code(&self.method) {
            Some(method) => method.abort_indicator(),
            None => "N",
        };

        let sum_method = ValidationMethod::from_code(&self.method)
            .is_some_and(|m| m.requires_target_attribute());
        let target_attribute = if !sum_method {
            "NA".to_string()
        } else if self.target_attribute == "NA" {
            String::new()
        } else {
            self.target_attribute.clone()
        };

        let rule_name = generate_rule_name(
            &self.target_object,
            &self.method,
            &self.target_database,
            &self.data_layer,
        );
        let description = generate_rule_description(
            &rule_name,
            &self.method,
            &target_attribute,
            &self.target_object,
        );

        DerivedFields {
            rule_name,
            description,
            abort_indicator: abort_indicator.to_string(),
            target_attribute,
        }
    }

    pub fn apply(&mut self, derived: DerivedFields) {
        self.rule_name = derived.rule_name;
        self.description = derived.description;
        self.abort_indicator = derived.abort_indicator;
        self.target_attribute = derived.target_attribute;
    }

    pub fn refresh(&mut self) -> Option<NameAmbiguity> {
        let derived = self.derive();
        let ambiguity = derived.ambiguity();
        self.apply(derived);
        ambiguity
    }

    /// On-prem layers only exist behind the payments database, so picking
    /// one also switches the target database.
    pub fn with_data_layer(mut self, layer: &str) -> Self {
        self.data_layer = layer.to_string();
        if DataLayer::from_code(layer).is_some_and(|l| l.implies_payments_database()) {
            self.target_database = PAYMENTS_DATABASE.to_string();
        }
        self.refresh();
        self
    }

    /// A hand-edited rule name keeps its text; only the description follows.
    pub fn with_rule_name(mut self, rule_name: &str) -> Self {
        self.rule_name = rule_name.to_uppercase();
        self.description = generate_rule_description(
            &self.rule_name,
            &self.method,
            &self.target_attribute,
            &self.target_object,
        );
        self
    }

    pub fn normalize_text_inputs(&mut self) {
        for value in [
            &mut self.appl_cd,
            &mut self.source_object,
            &mut self.target_schema,
            &mut self.target_object,
            &mut self.rule_name,
            &mut self.target_attribute,
            &mut self.rule_logic,
        ] {
            *value = value.to_uppercase();
        }
        self.description = generate_rule_description(
            &self.rule_name,
            &self.method,
            &self.target_attribute,
            &self.target_object,
        );
    }

    pub fn into_record(self, defaults: &RuleDefaults, now: NaiveDateTime) -> RuleRecord {
        let sum_method = ValidationMethod::from_code(&self.method)
            .is_some_and(|m| m.requires_target_attribute());
        let target_attribute = if sum_method {
            self.target_attribute
        } else {
            defaults.target_attribute.clone()
        };

        RuleRecord {
            data_qc_id: defaults.data_qc_id.clone(),
            asset_nm: self.appl_cd.clone(),
            appl_cd: self.appl_cd,
            rule_nm: self.rule_name,
            rule_dsc_txt: self.description,
            rule_freq_cd: defaults.frequency.clone(),
            rule_valid_ctgy_nm: self.category,
            rule_valid_meth_cd: self.method,
            rule_abort_ind: self.abort_indicator,
            rule_src_db_nm: self.source_database,
            rule_src_schm_nm: self.source_schema,
            rule_src_obj_id_txt: self.source_object,
            rule_src_attr_nm: defaults.source_attribute.clone(),
            rule_trgt_db_nm: self.target_database,
            rule_trgt_schm_nm: self.target_schema,
            rule_trgt_obj_id_txt: self.target_object,
            rule_trgt_attr_nm: target_attribute,
            rule_trgt_data_layer_nm: self.data_layer,
            rule_cde_ind: defaults.cde_indicator.clone(),
            rule_logic_txt: self.rule_logic,
            rule_eff_dt: now.format("%Y-%m-%d").to_string(),
            rule_exp_dt: defaults.expiry_date.clone(),
            rule_actv_ind: self.active,
            crea_prty_id: defaults.creator_id.clone(),
            crea_ts: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            asset_id: defaults.asset_id.clone(),
            rule_seq_nr: self.sequence_number,
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::rules::naming::RULE_NAME_PLACEHOLDER;
    use crate::domain::rules::vocabulary::INFORMATION_DATABASE;
    use chrono::NaiveDate;

    fn payment_form() -> RuleForm {
        let mut form = RuleForm {
            appl_cd: "EMM_PAYMENTS".to_string(),
            target_object: "PAYMENT_TBL".to_string(),
            ..Default::default()
        };
        form.refresh();
        form
    }

    #[test]
    fn test_default_form_is_derived() {
        let form = RuleForm::default();
        assert_eq!(form.rule_name, "TARGET_TABLE_DL2_CNT_CHK");
        assert_eq!(form.description, "Performs count check on DL2 table TARGET_TABLE.");
        assert_eq!(form.abort_indicator, "N");
    }

    #[test]
    fn test_sum_method_clears_na_attribute() {
        let mut form = payment_form();
        form.method = "SUM_CHK".to_string();
        let derived = form.derive();
        assert_eq!(derived.target_attribute, "");
        assert_eq!(derived.abort_indicator, "N");

        form.target_attribute = "PMT_AMT".to_string();
        assert_eq!(form.derive().target_attribute, "PMT_AMT");
    }

    #[test]
    fn test_non_sum_method_forces_na_and_abort() {
        let mut form = payment_form();
        form.method = "DUP_CHK".to_string();
        form.target_attribute = "PMT_AMT".to_string();
        let derived = form.derive();
        assert_eq!(derived.target_attribute, "NA");
        assert_eq!(derived.abort_indicator, "Y");
    }

    #[test]
    fn test_empty_target_object_gives_placeholders() {
        let mut form = payment_form();
        form.target_object.clear();
        form.refresh();
        assert_eq!(form.rule_name, RULE_NAME_PLACEHOLDER);
        assert_eq!(
            form.description,
            "Rule description will be auto-generated based on rule name"
        );
    }

    #[test]
    fn test_onprem_layer_forces_payments_database() {
        let mut form = payment_form();
        form.target_database = INFORMATION_DATABASE.to_string();
        let form = form.with_data_layer("OnPrem_HOP2");
        assert_eq!(form.target_database, PAYMENTS_DATABASE);
        assert_eq!(form.rule_name, "PAYMENT_TBL_OP_HOP2_CNT_CHK");

        let mut form = payment_form();
        form.target_database = INFORMATION_DATABASE.to_string();
        let form = form.with_data_layer("DL3");
        assert_eq!(form.target_database, INFORMATION_DATABASE);
    }

    #[test]
    fn test_ambiguity_is_reported() {
        let mut form = payment_form();
        form.target_database = INFORMATION_DATABASE.to_string();
        assert_eq!(form.refresh(), Some(NameAmbiguity::StagingOrInformation));
    }

    #[test]
    fn test_manual_rule_name_rederives_description_only() {
        let mut form = payment_form();
        form.target_database = INFORMATION_DATABASE.to_string();
        form.refresh();
        let form = form.with_rule_name("payment_tbl_stg_dl3_cnt_chk");
        assert_eq!(form.rule_name, "PAYMENT_TBL_STG_DL3_CNT_CHK");
        assert_eq!(
            form.description,
            "Performs count check on staging DL3 table PAYMENT_TBL."
        );
        assert_eq!(form.abort_indicator, "N");
    }

    #[test]
    fn test_into_record_stamps_defaults() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap();
        let record = payment_form().into_record(&RuleDefaults::default(), now);
        assert_eq!(record.data_qc_id, "23");
        assert_eq!(record.rule_freq_cd, "DAILY");
        assert_eq!(record.rule_src_attr_nm, "NA");
        assert_eq!(record.rule_trgt_attr_nm, "NA");
        assert_eq!(record.rule_eff_dt, "2024-05-17");
        assert_eq!(record.rule_exp_dt, "9999-12-31");
        assert_eq!(record.crea_ts, "2024-05-17 14:03:09");
        assert_eq!(record.crea_prty_id, "PL6P223");
        assert_eq!(record.asset_nm, "EMM_PAYMENTS");
        assert_eq!(record.rule_nm, "PAYMENT_TBL_DL2_CNT_CHK");
        assert_eq!(record.updt_ts, "");
    }

    #[test]
    fn test_normalize_text_inputs() {
        let mut form = RuleForm {
            appl_cd: "emm_pay".to_string(),
            source_database: "dl2_db".to_string(),
            ..Default::default()
        };
        form.normalize_text_inputs();
        assert_eq!(form.appl_cd, "EMM_PAY");
        assert_eq!(form.source_database, "dl2_db");
    }

    #[test]
    fn test_normalized_form_describes_uppercased_object() {
        let mut form = RuleForm {
            target_object: "payment_tbl".to_string(),
            ..Default::default()
        };
        form.refresh();
        assert_eq!(form.description, "Performs count check on DL2 table payment_tbl.");

        form.normalize_text_inputs();
        assert_eq!(form.rule_name, "PAYMENT_TBL_DL2_CNT_CHK");
        assert_eq!(form.description, "Performs count check on DL2 table PAYMENT_TBL.");
    }

    #[test]
    fn test_form_starts_at_project_prefix() {
        let defaults = RuleDefaults {
            appl_cd_prefix: "FIN_".to_string(),
            ..Default::default()
        };
        assert_eq!(RuleForm::with_defaults(&defaults).appl_cd, "FIN_");
        assert_eq!(RuleForm::default().appl_cd, "EMM_");
    }
}
