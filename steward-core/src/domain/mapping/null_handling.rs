// steward-core/src/domain/mapping/null_handling.rs
//
// Decoder for the `handle_empty_or_null_value` DBT macro, the one
// transformation whose parameters we understand well enough to describe.

use regex::Regex;

use crate::domain::error::DomainError;

pub const NULL_HANDLING_MACRO: &str = "handle_empty_or_null_value";

/// Target type requested through `chk_type`, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckType {
    Varchar,
    Number,
    Timestamp,
    Date,
    Other(String),
}

impl CheckType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "VARCHAR" => Self::Varchar,
            "NUMBER" => Self::Number,
            "TIMESTAMP" => Self::Timestamp,
            "DATE" => Self::Date,
            _ => Self::Other(raw.to_string()),
        }
    }
}

/// Macro parameters. Absent keys fall back to empty / zero / false.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NullHandlingParams {
    pub chk_type: String,
    pub first_val: String,
    pub length: u64,
    pub precision: u64,
    pub default_val: String,
    pub empty_val: String,
    pub format: String,
    pub is_string: bool,
}

impl NullHandlingParams {
    /// Human-readable description of the transformation, parts joined by "; ".
    pub fn describe(&self) -> String {
        let field = &self.first_val;
        let mut parts = Vec::new();

        match CheckType::parse(&self.chk_type) {
            CheckType::Varchar => {
                parts.push(format!("Transform {} to VARCHAR({})", field, self.length));
                parts.push("Replace NULL values with '!'".to_string());
            }
            CheckType::Number => {
                parts.push(format!(
                    "Transform {} to NUMBER({},{})",
                    field, self.length, self.precision
                ));
                if self.precision == 0 {
                    parts.push("Replace NULL values with '-1'".to_string());
                } else {
                    parts.push("NULL values remain NULL (precision > 0)".to_string());
                }
            }
            kind @ (CheckType::Timestamp | CheckType::Date) => {
                let type_name = if kind == CheckType::Date { "DATE" } else { "TIMESTAMP" };
                parts.push(format!("Transform {} to {}", field, type_name));
                if !self.default_val.is_empty() {
                    parts.push(format!("Set default value to '{}' if empty", self.default_val));
                }
                if !self.format.is_empty() {
                    parts.push(format!("Format: {}", self.format));
                }
                if kind == CheckType::Date && !self.empty_val.is_empty() {
                    parts.push(format!("Empty value representation: '{}'", self.empty_val));
                }
            }
            CheckType::Other(raw) => {
                parts.push(format!("Transform {} to {}", field, raw));
                if !self.default_val.is_empty() {
                    parts.push(format!("Default value: '{}'", self.default_val));
                }
            }
        }

        if self.is_string {
            parts.push("Convert to string representation".to_string());
        }

        parts.join("; ")
    }
}

/// Parameter lookups are independent, so key order in the call never matters.
pub struct NullHandlingDecoder {
    chk_type: Regex,
    first_val: Regex,
    length: Regex,
    precision: Regex,
    default_val: Regex,
    empty_val: Regex,
    format: Regex,
    is_string: Regex,
}

impl NullHandlingDecoder {
    pub fn new() -> Result<Self, DomainError> {
        let compile = |p: &str| Regex::new(p).map_err(|e| DomainError::pattern(p, e));
        Ok(Self {
            chk_type: compile(r#"chk_type=['"]([^'"]+)['"]"#)?,
            first_val: compile(r#"first_val=['"]([^'"]+)['"]"#)?,
            length: compile(r"length=(\d+)")?,
            precision: compile(r"precision=(\d+)")?,
            default_val: compile(r#"default_val=['"]([^'"]+)['"]"#)?,
            empty_val: compile(r#"empty_val=['"]([^'"]*)['"]"#)?,
            format: compile(r#"format=['"]([^'"]+)['"]"#)?,
            is_string: compile(r"is_string=(\w+)")?,
        })
    }

    pub fn parse_params(&self, params: &str) -> NullHandlingParams {
        let text = |re: &Regex| {
            re.captures(params)
                .map(|c| c[1].to_string())
                .unwrap_or_default()
        };
        let number = |re: &Regex| {
            re.captures(params)
                .and_then(|c| c[1].parse::<u64>().ok())
                .unwrap_or(0)
        };

        NullHandlingParams {
            chk_type: text(&self.chk_type),
            first_val: text(&self.first_val),
            length: number(&self.length),
            precision: number(&self.precision),
            default_val: text(&self.default_val),
            empty_val: text(&self.empty_val),
            format: text(&self.format),
            is_string: text(&self.is_string).eq_ignore_ascii_case("true"),
        }
    }

    /// Returns (source field, description) for the macro's parameter text.
    pub fn decode(&self, params: &str) -> (String, String) {
        let parsed = self.parse_params(params);
        let description = parsed.describe();
        (parsed.first_val, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_varchar() -> Result<()> {
        let decoder = NullHandlingDecoder::new()?;
        let (field, desc) = decoder.decode("chk_type='VARCHAR', length=36, first_val='ABA_ROUTING_NR'");
        assert_eq!(field, "ABA_ROUTING_NR");
        assert_eq!(
            desc,
            "Transform ABA_ROUTING_NR to VARCHAR(36); Replace NULL values with '!'"
        );
        Ok(())
    }

    #[test]
    fn test_decoding_is_repeatable() -> Result<()> {
        let decoder = NullHandlingDecoder::new()?;
        let params = "first_val='X', chk_type=\"NUMBER\", precision=2, length=10";
        assert_eq!(decoder.decode(params), decoder.decode(params));
        Ok(())
    }

    #[test]
    fn test_number_precision_branches() -> Result<()> {
        let decoder = NullHandlingDecoder::new()?;
        let (_, integer) = decoder.decode(
            "chk_type='NUMBER', is_string=true, length=3, precision=0, first_val='RETRY_ATTEMPT_NR'",
        );
        assert_eq!(
            integer,
            "Transform RETRY_ATTEMPT_NR to NUMBER(3,0); Replace NULL values with '-1'; Convert to string representation"
        );

        let (_, decimal) = decoder.decode("chk_type='number', length=18, precision=2, first_val='AMT'");
        assert_eq!(
            decimal,
            "Transform AMT to NUMBER(18,2); NULL values remain NULL (precision > 0)"
        );
        Ok(())
    }

    #[test]
    fn test_timestamp_with_optional_notes() -> Result<()> {
        let decoder = NullHandlingDecoder::new()?;
        let (field, desc) = decoder.decode(
            "chk_type='TIMESTAMP', is_string=true, empty_val='', default_val='1800-01-02 00:00:00.000000', format='YYYY-MM-DD HH:MI:SS.FF6', first_val='AUTH_START_GMTS'",
        );
        assert_eq!(field, "AUTH_START_GMTS");
        insta::assert_snapshot!(desc, @"Transform AUTH_START_GMTS to TIMESTAMP; Set default value to '1800-01-02 00:00:00.000000' if empty; Format: YYYY-MM-DD HH:MI:SS.FF6; Convert to string representation");
        Ok(())
    }

    #[test]
    fn test_date_reports_empty_value() -> Result<()> {
        let decoder = NullHandlingDecoder::new()?;
        let (_, desc) = decoder.decode("chk_type='DATE', empty_val='0000-00-00', first_val='EFF_DT'");
        assert_eq!(desc, "Transform EFF_DT to DATE; Empty value representation: '0000-00-00'");

        // TIMESTAMP ignores empty_val
        let (_, desc) = decoder.decode("chk_type='TIMESTAMP', empty_val='X', first_val='TS'");
        assert_eq!(desc, "Transform TS to TIMESTAMP");
        Ok(())
    }

    #[test]
    fn test_other_type_and_missing_params() -> Result<()> {
        let decoder = NullHandlingDecoder::new()?;
        let (_, desc) = decoder.decode("chk_type='BOOLEAN', default_val='FALSE', first_val='FLAG'");
        assert_eq!(desc, "Transform FLAG to BOOLEAN; Default value: 'FALSE'");

        let (field, desc) = decoder.decode("");
        assert_eq!(field, "");
        assert_eq!(desc, "Transform  to ");
        Ok(())
    }
}
