// steward-core/src/domain/rules/description.rs
//
// Rule descriptions are matched against the fragments `naming` produces.
// Keep both tables in step.

use crate::domain::rules::naming::RULE_NAME_PLACEHOLDER;

pub const DESCRIPTION_PLACEHOLDER: &str =
    "Rule description will be auto-generated based on rule name";
pub const TARGET_TABLE_PLACEHOLDER: &str = "TARGET_TABLE";

enum Sentence {
    /// "Performs {check} on {layer} table {target}."
    On(&'static str),
    /// "Performs {check} between {layers}"
    Between(&'static str),
    /// "Performs {check} between {layers} {target}."
    BetweenTable(&'static str),
    /// "Performs {fixed} {target}." (check phrase not used)
    Fixed(&'static str),
}

// First matching substring wins.
const SENTENCES: [(&[&str], Sentence); 14] = [
    (&["_OP_HOP3_CNT_CHK", "_OP_HOP3_SUM_CHK"], Sentence::On("OnPrem Source Records (HOP3)")),
    (&["_OP_HOP2_CNT_CHK", "_OP_HOP2_SUM_CHK"], Sentence::On("OnPrem DS Records (HOP2)")),
    (&["_OP_HOP1_CNT_CHK", "_OP_HOP1_SUM_CHK"], Sentence::On("OnPrem CSV Records (HOP1)")),
    (&["_DL2_CNT_CHK", "_DL2_SUM_CHK"], Sentence::On("DL2")),
    (&["_FND_DL3_CNT_CHK", "_FND_DL3_SUM_CHK"], Sentence::On("foundation")),
    (&["_STG_DL3_CNT_CHK", "_STG_DL3_SUM_CHK"], Sentence::On("staging DL3")),
    (&["_INFO_DL3_CNT_CHK", "_INFO_DL3_SUM_CHK"], Sentence::On("information DL3")),
    (
        &["_OP_HOP3_HOP2_DIFF_CNT_CHK", "_OP_HOP3_HOP2_DIFF_SUM_CHK"],
        Sentence::Between("OnPrem Source Records (HOP3) and OnPrem DS Records (HOP2)"),
    ),
    (
        &["_OP_HOP2_HOP1_DIFF_CNT_CHK", "_OP_HOP2_HOP1_DIFF_SUM_CHK"],
        Sentence::Between("OnPrem DS Records (HOP2) and OnPrem CSV Records (HOP1)"),
    ),
    (
        &["_OP_HOP1_DL2_DIFF_CNT_CHK", "_OP_HOP1_DL2_DIFF_SUM_CHK"],
        Sentence::Between("OnPrem CSV Records (HOP1) and DL2 table"),
    ),
    (
        &["_DL2_FND_DIFF_CNT_CHK", "_DL2_FND_DIFF_SUM_CHK"],
        Sentence::BetweenTable("DL2 and foundation table"),
    ),
    (
        &["_STG_INFO_DIFF_CNT_CHK", "_STG_INFO_DIFF_SUM_CHK"],
        Sentence::BetweenTable("staging table and information DL3 table"),
    ),
    (&["_INFO_DL3_DUP_CHK"], Sentence::Fixed("Duplicate check on information DL3 table")),
    (&["_INFO_DL3_OVERLAP_CHK"], Sentence::Fixed("Overlap check on information DL3 table")),
];

/// Phrase naming the kind of check, e.g. "sum check on PMT_AMT".
pub fn check_type_phrase(method: &str, target_attribute: &str) -> String {
    let has_attribute = !target_attribute.is_empty() && target_attribute != "NA";
    let with_attribute = |base: &str| {
        if has_attribute {
            format!("{} on {}", base, target_attribute)
        } else {
            base.to_string()
        }
    };

    if method.contains("CNT_CHK") {
        if method.contains("DIFF_CNT_CHK") {
            "difference count check".to_string()
        } else {
            "count check".to_string()
        }
    } else if method.contains("SUM_CHK") {
        if method.contains("DIFF_SUM_CHK") {
            with_attribute("difference sum check")
        } else {
            with_attribute("sum check")
        }
    } else if method.contains("DUP_CHK") {
        "duplicate check".to_string()
    } else if method.contains("OVERLAP_CHK") {
        "overlap check".to_string()
    } else {
        "data quality check".to_string()
    }
}

pub fn generate_rule_description(
    rule_name: &str,
    method: &str,
    target_attribute: &str,
    target_object: &str,
) -> String {
    if rule_name.is_empty() || rule_name == RULE_NAME_PLACEHOLDER {
        return DESCRIPTION_PLACEHOLDER.to_string();
    }

    let check = check_type_phrase(method, target_attribute);
    let sentence = SENTENCES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| rule_name.contains(n)))
        .map(|(_, sentence)| sentence);

    let description = match sentence {
        Some(Sentence::On(layer)) => {
            format!("Performs {} on {} table {}.", check, layer, target_object)
        }
        Some(Sentence::Between(layers)) => format!("Performs {} between {}", check, layers),
        Some(Sentence::BetweenTable(layers)) => {
            format!("Performs {} between {} {}.", check, layers, target_object)
        }
        Some(Sentence::Fixed(text)) => format!("Performs {} {}.", text, target_object),
        None if !target_object.is_empty() && target_object != TARGET_TABLE_PLACEHOLDER => {
            format!("Performs {} on table {}.", check, target_object)
        }
        None => format!("Performs {}.", check),
    };

    capitalize_first(description)
}

fn capitalize_first(text: String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => first.to_uppercase().chain(chars).collect(),
        _ => text,
    }
}
