// steward-core/src/domain/mapping/classifier.rs
//
// Line classifier for DBT SELECT scripts. Each line is matched against an
// ordered dispatch table; the first pattern that matches wins.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::mapping::null_handling::NullHandlingDecoder;
use crate::domain::mapping::record::{DIRECT_MAPPING, MANUAL_INPUT_REQUIRED, UNKNOWN};
use crate::domain::mapping::script::logical_lines;

const TARGET: &str = r"\s+AS\s+([A-Za-z_][A-Za-z0-9_]*)";

/// Which line shape produced a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    NullHandlingMacro,
    OtherMacro,
    DirectAlias,
    CaseExpression,
    AliasedExpression,
    /// Not parsed from a script: a mandatory column appended by ingestion.
    AuditColumn,
}

/// How unrecognized expressions fill in their source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFieldPolicy {
    /// Always `UNKNOWN`; a person supplies the real lineage.
    #[default]
    Strict,
    /// Guess a source field from the expression text and keep the raw
    /// expression as the transformation. Macro and CASE lines only.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub shape: LineShape,
    pub source_field: String,
    pub target_field: String,
    pub transformation: String,
}

impl FieldMapping {
    fn unknown(shape: LineShape, target_field: &str) -> Self {
        Self {
            shape,
            source_field: UNKNOWN.to_string(),
            target_field: target_field.to_string(),
            transformation: MANUAL_INPUT_REQUIRED.to_string(),
        }
    }
}

type Handler = fn(&TransformationClassifier, &Captures<'_>) -> FieldMapping;

struct LineRule {
    shape: LineShape,
    pattern: Regex,
    handler: Handler,
}

pub struct TransformationClassifier {
    rules: Vec<LineRule>,
    decoder: NullHandlingDecoder,
    policy: SourceFieldPolicy,
    first_val: Regex,
    identifier: Regex,
}

// Tokens the heuristic must not mistake for a column name.
const SQL_KEYWORDS: [&str; 12] = [
    "CASE", "WHEN", "THEN", "ELSE", "END", "AND", "OR", "NOT", "NULL", "IS", "IN", "CAST",
];

impl TransformationClassifier {
    pub fn new(policy: SourceFieldPolicy) -> Result<Self, DomainError> {
        let compile = |p: String| Regex::new(&p).map_err(|e| DomainError::pattern(&p, e));

        let table: [(LineShape, String, Handler); 5] = [
            (
                LineShape::NullHandlingMacro,
                format!(r"(?i)\{{\{{\s*handle_empty_or_null_value\(([^}}]+)\)\s*\}}\}}{TARGET}"),
                Self::null_handling_macro,
            ),
            (
                LineShape::OtherMacro,
                format!(r"(?i)\{{\{{\s*([^}}]+)\s*\}}\}}{TARGET}"),
                Self::other_macro,
            ),
            (
                LineShape::DirectAlias,
                format!(r"(?i)^([A-Za-z_][A-Za-z0-9_]*){TARGET}"),
                Self::direct_alias,
            ),
            (
                LineShape::CaseExpression,
                format!(r"(?is)(CASE\s+.+?END){TARGET}"),
                Self::case_expression,
            ),
            (
                LineShape::AliasedExpression,
                format!(r"(?i)^(.+?){TARGET}"),
                Self::aliased_expression,
            ),
        ];

        let mut rules = Vec::with_capacity(table.len());
        for (shape, pattern, handler) in table {
            rules.push(LineRule {
                shape,
                pattern: compile(pattern)?,
                handler,
            });
        }

        Ok(Self {
            rules,
            decoder: NullHandlingDecoder::new()?,
            policy,
            first_val: compile(r#"first_val=['"]([^'"]+)['"]"#.to_string())?,
            identifier: compile(r"\b([A-Z][A-Z0-9_]*)\b".to_string())?,
        })
    }

    pub fn policy(&self) -> SourceFieldPolicy {
        self.policy
    }

    /// Classifies one cleaned line. `None` when no pattern matches.
    pub fn classify_line(&self, line: &str) -> Option<FieldMapping> {
        self.rules.iter().find_map(|rule| {
            let caps = rule.pattern.captures(line)?;
            let mapping = (rule.handler)(self, &caps);
            debug_assert_eq!(mapping.shape, rule.shape);
            Some(mapping)
        })
    }

    /// Classifies every meaningful line of a script, in order.
    pub fn parse_script(&self, script: &str) -> Vec<FieldMapping> {
        logical_lines(script)
            .filter_map(|line| self.classify_line(line))
            .collect()
    }

    // --- HANDLERS ---

    fn null_handling_macro(&self, caps: &Captures<'_>) -> FieldMapping {
        let (source_field, transformation) = self.decoder.decode(caps[1].trim());
        FieldMapping {
            shape: LineShape::NullHandlingMacro,
            source_field,
            target_field: caps[2].to_string(),
            transformation,
        }
    }

    fn other_macro(&self, caps: &Captures<'_>) -> FieldMapping {
        self.unrecognized(LineShape::OtherMacro, caps[1].trim(), &caps[2])
    }

    fn direct_alias(&self, caps: &Captures<'_>) -> FieldMapping {
        FieldMapping {
            shape: LineShape::DirectAlias,
            source_field: caps[1].to_string(),
            target_field: caps[2].to_string(),
            transformation: DIRECT_MAPPING.to_string(),
        }
    }

    fn case_expression(&self, caps: &Captures<'_>) -> FieldMapping {
        self.unrecognized(LineShape::CaseExpression, caps[1].trim(), &caps[2])
    }

    fn aliased_expression(&self, caps: &Captures<'_>) -> FieldMapping {
        FieldMapping::unknown(LineShape::AliasedExpression, &caps[2])
    }

    fn unrecognized(&self, shape: LineShape, expression: &str, target: &str) -> FieldMapping {
        match self.policy {
            SourceFieldPolicy::Strict => FieldMapping::unknown(shape, target),
            SourceFieldPolicy::Heuristic => match self.guess_source_field(expression) {
                Some(source_field) => FieldMapping {
                    shape,
                    source_field,
                    target_field: target.to_string(),
                    transformation: expression.to_string(),
                },
                None => FieldMapping::unknown(shape, target),
            },
        }
    }

    /// `first_val='X'` wins, otherwise the first upper-case identifier that
    /// is not a SQL keyword.
    fn guess_source_field(&self, expression: &str) -> Option<String> {
        if let Some(caps) = self.first_val.captures(expression) {
            return Some(caps[1].to_string());
        }
        self.identifier
            .captures_iter(expression)
            .map(|c| c[1].to_string())
            .find(|token| !SQL_KEYWORDS.contains(&token.as_str()))
    }
}
