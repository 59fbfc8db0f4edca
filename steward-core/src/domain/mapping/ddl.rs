// steward-core/src/domain/mapping/ddl.rs
//
// Column discovery for CREATE TABLE scripts. This is a line scanner, not a
// SQL parser: anything that does not look like `IDENT TYPE[(size)]` is dropped.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::mapping::script::logical_lines;

const COLUMN_PATTERN: &str = r"^([A-Za-z_][A-Za-z0-9_]*)\s+([A-Za-z]+(?:\([^)]+\))?)";

/// Lines containing any of these (case-insensitive) are constraint or index
/// clauses. `KEY` alone also catches columns whose name contains it.
const CONSTRAINT_KEYWORDS: [&str; 5] = ["PRIMARY KEY", "FOREIGN KEY", "CONSTRAINT", "INDEX", "KEY"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: String,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

pub struct ColumnExtractor {
    column: Regex,
}

impl ColumnExtractor {
    pub fn new() -> Result<Self, DomainError> {
        let column = Regex::new(COLUMN_PATTERN).map_err(|e| DomainError::pattern(COLUMN_PATTERN, e))?;
        Ok(Self { column })
    }

    /// Extracts the ordered (name, type) pairs between the first `(` and the
    /// last `)` of the script. Returns an empty vector when either delimiter
    /// is missing.
    pub fn extract(&self, script: &str) -> Vec<ColumnDefinition> {
        let script = script.trim();
        let (Some(start), Some(end)) = (script.find('('), script.rfind(')')) else {
            return Vec::new();
        };
        if end <= start {
            return Vec::new();
        }

        logical_lines(&script[start + 1..end])
            .filter(|line| !is_constraint_clause(line))
            .filter_map(|line| {
                let caps = self.column.captures(line)?;
                Some(ColumnDefinition::new(&caps[1], &caps[2]))
            })
            .collect()
    }
}

fn is_constraint_clause(line: &str) -> bool {
    let upper = line.to_uppercase();
    CONSTRAINT_KEYWORDS.iter().any(|kw| upper.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn names(cols: &[ColumnDefinition]) -> Vec<&str> {
        cols.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_extracts_columns_in_order() -> Result<()> {
        let extractor = ColumnExtractor::new()?;
        let cols = extractor.extract("(\n  A VARCHAR(10),\n  B NUMBER(38,0)\n)");
        assert_eq!(
            cols,
            vec![
                ColumnDefinition::new("A", "VARCHAR(10)"),
                ColumnDefinition::new("B", "NUMBER(38,0)"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_snowflake_transient_table() -> Result<()> {
        let extractor = ColumnExtractor::new()?;
        let ddl = "create or replace TRANSIENT TABLE OCFOPAYMENTSDBI.APP_CFOPYMTS.API1_API_INVOICE_STATUS_ACTION (\n\
                   \tKAFKA_HEADERS VARCHAR(16777216),\n\
                   \tKAFKA_META VARCHAR(16777216),\n\
                   \t-- legacy column\n\
                   \tMFP_FILE_ID NUMBER(38,0),\n\
                   \tMFP_LOAD_TS TIMESTAMP_NTZ(9)\n\
                   );";
        let cols = extractor.extract(ddl);
        assert_eq!(names(&cols), vec!["KAFKA_HEADERS", "KAFKA_META", "MFP_FILE_ID", "MFP_LOAD_TS"]);
        // The type token is letters plus an optional size clause directly after them.
        assert_eq!(cols[3].data_type, "TIMESTAMP");
        Ok(())
    }

    #[test]
    fn test_constraint_lines_never_emitted() -> Result<()> {
        let extractor = ColumnExtractor::new()?;
        let ddl = "CREATE TABLE T (\n\
                   ID NUMBER(38,0),\n\
                   NAME VARCHAR(100),\n\
                   CONSTRAINT PK_T PRIMARY KEY (ID),\n\
                   primary key (ID),\n\
                   FOREIGN KEY (NAME) REFERENCES O(NAME),\n\
                   INDEX IDX_NAME (NAME)\n\
                   )";
        let cols = extractor.extract(ddl);
        assert_eq!(names(&cols), vec!["ID", "NAME"]);
        Ok(())
    }

    #[test]
    fn test_column_named_with_key_is_dropped() -> Result<()> {
        let extractor = ColumnExtractor::new()?;
        let cols = extractor.extract("(\n API_KEY VARCHAR(10),\n OTHER DATE\n)");
        assert_eq!(names(&cols), vec!["OTHER"]);
        Ok(())
    }

    #[test]
    fn test_malformed_lines_are_silently_skipped() -> Result<()> {
        let extractor = ColumnExtractor::new()?;
        let cols = extractor.extract("(\n GOOD VARCHAR(1),\n 123BAD VARCHAR(1),\n LONELY,\n ALSO_GOOD DATE\n)");
        assert_eq!(names(&cols), vec!["GOOD", "ALSO_GOOD"]);
        Ok(())
    }

    #[test]
    fn test_missing_parentheses_yields_nothing() -> Result<()> {
        let extractor = ColumnExtractor::new()?;
        assert!(extractor.extract("CREATE TABLE T A VARCHAR(1)").is_empty());
        assert!(extractor.extract(") A VARCHAR (").is_empty());
        assert!(extractor.extract("").is_empty());
        Ok(())
    }
}
