// steward-core/src/domain/rules/record.rs

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Column order of the DQC rule file. Exports follow it exactly.
pub const RULE_FIELDS: [&str; 37] = [
    "DATA_QC_ID",
    "APPL_CD",
    "RULE_NM",
    "RULE_DSC_TXT",
    "RULE_FREQ_CD",
    "RULE_VALID_CTGY_NM",
    "RULE_VALID_METH_CD",
    "RULE_ABORT_IND",
    "RULE_SRC_DB_NM",
    "RULE_SRC_SCHM_NM",
    "RULE_SRC_OBJ_ID_TXT",
    "RULE_SRC_ATTR_NM",
    "RULE_TRGT_DB_NM",
    "RULE_TRGT_SCHM_NM",
    "RULE_TRGT_OBJ_ID_TXT",
    "RULE_TRGT_ATTR_NM",
    "RULE_ACPT_VARY_PCT",
    "RULE_MIN_THRESH_VALUE_TXT",
    "RULE_MAX_THRESH_VALUE_TXT",
    "RULE_TRGT_DATA_LAYER_NM",
    "RULE_CDE_IND",
    "RULE_LOGIC_TXT",
    "RULE_EFF_DT",
    "RULE_EXP_DT",
    "RULE_ACTV_IND",
    "RULE_RMRK_TXT",
    "CREA_PRTY_ID",
    "CREA_TS",
    "UPDT_PRTY_ID",
    "UPDT_TS",
    "ETL_CREA_NR",
    "ETL_CREA_TS",
    "ETL_UPDT_NR",
    "ETL_UPDT_TS",
    "ASSET_ID",
    "ASSET_NM",
    "RULE_SEQ_NR",
];

/// Fields uppercased when a rule enters the collection by import.
pub const UPPERCASE_FIELDS: [&str; 8] = [
    "APPL_CD",
    "RULE_NM",
    "RULE_DSC_TXT",
    "RULE_SRC_OBJ_ID_TXT",
    "RULE_TRGT_SCHM_NM",
    "RULE_TRGT_OBJ_ID_TXT",
    "RULE_TRGT_ATTR_NM",
    "RULE_LOGIC_TXT",
];

/// Fields uppercased when a row is edited in place: the import set plus the
/// remark and the asset name.
pub const EDIT_UPPERCASE_FIELDS: [&str; 10] = [
    "APPL_CD",
    "RULE_NM",
    "RULE_DSC_TXT",
    "RULE_SRC_OBJ_ID_TXT",
    "RULE_TRGT_SCHM_NM",
    "RULE_TRGT_OBJ_ID_TXT",
    "RULE_TRGT_ATTR_NM",
    "RULE_LOGIC_TXT",
    "RULE_RMRK_TXT",
    "ASSET_NM",
];

/// One DQC rule row. Every value is kept as text: imported files may hold
/// anything, and the validator is the one that judges the content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct RuleRecord {
    pub data_qc_id: String,
    pub appl_cd: String,
    pub rule_nm: String,
    pub rule_dsc_txt: String,
    pub rule_freq_cd: String,
    pub rule_valid_ctgy_nm: String,
    pub rule_valid_meth_cd: String,
    pub rule_abort_ind: String,
    pub rule_src_db_nm: String,
    pub rule_src_schm_nm: String,
    pub rule_src_obj_id_txt: String,
    pub rule_src_attr_nm: String,
    pub rule_trgt_db_nm: String,
    pub rule_trgt_schm_nm: String,
    pub rule_trgt_obj_id_txt: String,
    pub rule_trgt_attr_nm: String,
    pub rule_acpt_vary_pct: String,
    pub rule_min_thresh_value_txt: String,
    pub rule_max_thresh_value_txt: String,
    pub rule_trgt_data_layer_nm: String,
    pub rule_cde_ind: String,
    pub rule_logic_txt: String,
    pub rule_eff_dt: String,
    pub rule_exp_dt: String,
    pub rule_actv_ind: String,
    pub rule_rmrk_txt: String,
    pub crea_prty_id: String,
    pub crea_ts: String,
    pub updt_prty_id: String,
    pub updt_ts: String,
    pub etl_crea_nr: String,
    pub etl_crea_ts: String,
    pub etl_updt_nr: String,
    pub etl_updt_ts: String,
    pub asset_id: String,
    pub asset_nm: String,
    pub rule_seq_nr: String,
}

impl RuleRecord {
    pub fn is_active(&self) -> bool {
        self.rule_actv_ind == "Y"
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "DATA_QC_ID" => &self.data_qc_id,
            "APPL_CD" => &self.appl_cd,
            "RULE_NM" => &self.rule_nm,
            "RULE_DSC_TXT" => &self.rule_dsc_txt,
            "RULE_FREQ_CD" => &self.rule_freq_cd,
            "RULE_VALID_CTGY_NM" => &self.rule_valid_ctgy_nm,
            "RULE_VALID_METH_CD" => &self.rule_valid_meth_cd,
            "RULE_ABORT_IND" => &self.rule_abort_ind,
            "RULE_SRC_DB_NM" => &self.rule_src_db_nm,
            "RULE_SRC_SCHM_NM" => &self.rule_src_schm_nm,
            "RULE_SRC_OBJ_ID_TXT" => &self.rule_src_obj_id_txt,
            "RULE_SRC_ATTR_NM" => &self.rule_src_attr_nm,
            "RULE_TRGT_DB_NM" => &self.rule_trgt_db_nm,
            "RULE_TRGT_SCHM_NM" => &self.rule_trgt_schm_nm,
            "RULE_TRGT_OBJ_ID_TXT" => &self.rule_trgt_obj_id_txt,
            "RULE_TRGT_ATTR_NM" => &self.rule_trgt_attr_nm,
            "RULE_ACPT_VARY_PCT" => &self.rule_acpt_vary_pct,
            "RULE_MIN_THRESH_VALUE_TXT" => &self.rule_min_thresh_value_txt,
            "RULE_MAX_THRESH_VALUE_TXT" => &self.rule_max_thresh_value_txt,
            "RULE_TRGT_DATA_LAYER_NM" => &self.rule_trgt_data_layer_nm,
            "RULE_CDE_IND" => &self.rule_cde_ind,
            "RULE_LOGIC_TXT" => &self.rule_logic_txt,
            "RULE_EFF_DT" => &self.rule_eff_dt,
            "RULE_EXP_DT" => &self.rule_exp_dt,
            "RULE_ACTV_IND" => &self.rule_actv_ind,
            "RULE_RMRK_TXT" => &self.rule_rmrk_txt,
            "CREA_PRTY_ID" => &self.crea_prty_id,
            "CREA_TS" => &self.crea_ts,
            "UPDT_PRTY_ID" => &self.updt_prty_id,
            "UPDT_TS" => &self.updt_ts,
            "ETL_CREA_NR" => &self.etl_crea_nr,
            "ETL_CREA_TS" => &self.etl_crea_ts,
            "ETL_UPDT_NR" => &self.etl_updt_nr,
            "ETL_UPDT_TS" => &self.etl_updt_ts,
            "ASSET_ID" => &self.asset_id,
            "ASSET_NM" => &self.asset_nm,
            "RULE_SEQ_NR" => &self.rule_seq_nr,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match name {
            "DATA_QC_ID" => &mut self.data_qc_id,
            "APPL_CD" => &mut self.appl_cd,
            "RULE_NM" => &mut self.rule_nm,
            "RULE_DSC_TXT" => &mut self.rule_dsc_txt,
            "RULE_FREQ_CD" => &mut self.rule_freq_cd,
            "RULE_VALID_CTGY_NM" => &mut self.rule_valid_ctgy_nm,
            "RULE_VALID_METH_CD" => &mut self.rule_valid_meth_cd,
            "RULE_ABORT_IND" => &mut self.rule_abort_ind,
            "RULE_SRC_DB_NM" => &mut self.rule_src_db_nm,
            "RULE_SRC_SCHM_NM" => &mut self.rule_src_schm_nm,
            "RULE_SRC_OBJ_ID_TXT" => &mut self.rule_src_obj_id_txt,
            "RULE_SRC_ATTR_NM" => &mut self.rule_src_attr_nm,
            "RULE_TRGT_DB_NM" => &mut self.rule_trgt_db_nm,
            "RULE_TRGT_SCHM_NM" => &mut self.rule_trgt_schm_nm,
            "RULE_TRGT_OBJ_ID_TXT" => &mut self.rule_trgt_obj_id_txt,
            "RULE_TRGT_ATTR_NM" => &mut self.rule_trgt_attr_nm,
            "RULE_ACPT_VARY_PCT" => &mut self.rule_acpt_vary_pct,
            "RULE_MIN_THRESH_VALUE_TXT" => &mut self.rule_min_thresh_value_txt,
            "RULE_MAX_THRESH_VALUE_TXT" => &mut self.rule_max_thresh_value_txt,
            "RULE_TRGT_DATA_LAYER_NM" => &mut self.rule_trgt_data_layer_nm,
            "RULE_CDE_IND" => &mut self.rule_cde_ind,
            "RULE_LOGIC_TXT" => &mut self.rule_logic_txt,
            "RULE_EFF_DT" => &mut self.rule_eff_dt,
            "RULE_EXP_DT" => &mut self.rule_exp_dt,
            "RULE_ACTV_IND" => &mut self.rule_actv_ind,
            "RULE_RMRK_TXT" => &mut self.rule_rmrk_txt,
            "CREA_PRTY_ID" => &mut self.crea_prty_id,
            "CREA_TS" => &mut self.crea_ts,
            "UPDT_PRTY_ID" => &mut self.updt_prty_id,
            "UPDT_TS" => &mut self.updt_ts,
            "ETL_CREA_NR" => &mut self.etl_crea_nr,
            "ETL_CREA_TS" => &mut self.etl_crea_ts,
            "ETL_UPDT_NR" => &mut self.etl_updt_nr,
            "ETL_UPDT_TS" => &mut self.etl_updt_ts,
            "ASSET_ID" => &mut self.asset_id,
            "ASSET_NM" => &mut self.asset_nm,
            "RULE_SEQ_NR" => &mut self.rule_seq_nr,
            _ => return None,
        };
        Some(value)
    }

    /// Sets a column by its file header name (case-insensitive).
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), DomainError> {
        let key = name.trim().to_uppercase();
        match self.field_mut(&key) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(DomainError::UnknownField(name.to_string())),
        }
    }

    /// Values in file column order.
    pub fn values(&self) -> Vec<&str> {
        RULE_FIELDS
            .iter()
            .map(|name| self.field(name).unwrap_or_default())
            .collect()
    }

    pub fn normalize_case(&mut self) {
        self.uppercase(&UPPERCASE_FIELDS);
    }

    pub fn normalize_edited_case(&mut self) {
        self.uppercase(&EDIT_UPPERCASE_FIELDS);
    }

    fn uppercase(&mut self, fields: &[&str]) {
        for name in fields {
            if let Some(slot) = self.field_mut(name) {
                *slot = slot.to_uppercase();
            }
        }
    }
}
