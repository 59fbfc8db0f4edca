// steward-core/src/application/report.rs
//
// Mapping report: per-transition table overviews plus the table-level
// lineage graph, exportable as JSON or Mermaid.

use serde::{Deserialize, Serialize};

use crate::application::mapping::{MappingSession, TransitionOverview};
use crate::domain::mapping::{LayerTransition, MappingRecord, TableLocator};
use crate::domain::project::ProjectConfig;

// ── Report Structures ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MappingReport {
    pub project_prefix: String,
    pub transitions: Vec<TransitionOverview>,
    pub edges: Vec<LineageEdge>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageEdge {
    pub transition: LayerTransition,
    pub from: String,
    pub to: String,
    pub fields: usize,
    /// Fields whose source is still UNKNOWN
    pub unknown_fields: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_mappings: usize,
    pub total_tables: usize,
    pub unknown_lineage: usize,
}

impl MappingReport {
    pub fn build(session: &MappingSession, config: &ProjectConfig) -> Self {
        let transitions: Vec<TransitionOverview> = LayerTransition::ALL
            .into_iter()
            .map(|t| session.overview(t))
            .collect();
        let edges = collect_edges(session.mappings());

        let summary = ReportSummary {
            total_mappings: session.mappings().len(),
            total_tables: transitions.iter().map(|t| t.total_tables).sum(),
            unknown_lineage: session
                .mappings()
                .iter()
                .filter(|m| m.is_unknown_lineage())
                .count(),
        };

        Self {
            project_prefix: config.export_prefix(),
            transitions,
            edges,
            summary,
        }
    }

    pub fn has_unknown_lineage(&self) -> bool {
        self.summary.unknown_lineage > 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_mermaid(&self) -> String {
        let mut lines = vec!["graph LR".to_string()];

        let mut nodes: Vec<&str> = Vec::new();
        for edge in &self.edges {
            for name in [edge.from.as_str(), edge.to.as_str()] {
                if !nodes.contains(&name) {
                    nodes.push(name);
                }
            }
        }
        for name in &nodes {
            lines.push(format!("    {}[\"{}\"]", node_id(name), name));
        }

        for edge in &self.edges {
            if edge.unknown_fields == 0 {
                lines.push(format!(
                    "    {} -->|\"{} fields\"| {}",
                    node_id(&edge.from),
                    edge.fields,
                    node_id(&edge.to)
                ));
            } else {
                lines.push(format!(
                    "    {} -.->|\"⚠️ {} of {} UNKNOWN\"| {}",
                    node_id(&edge.from),
                    edge.unknown_fields,
                    edge.fields,
                    node_id(&edge.to)
                ));
            }
        }

        lines.join("\n")
    }
}

fn qualified(locator: &TableLocator) -> String {
    [&locator.database, &locator.schema, &locator.table]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

// Mermaid ids cannot contain dots.
fn node_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// One edge per (transition, source table, target table), first-seen order.
fn collect_edges(mappings: &[MappingRecord]) -> Vec<LineageEdge> {
    let mut edges: Vec<LineageEdge> = Vec::new();
    for mapping in mappings {
        let from = qualified(&mapping.source);
        let to = qualified(&mapping.target);
        let unknown = usize::from(mapping.is_unknown_lineage());
        match edges
            .iter_mut()
            .find(|e| e.transition == mapping.layer_transition && e.from == from && e.to == to)
        {
            Some(edge) => {
                edge.fields += 1;
                edge.unknown_fields += unknown;
            }
            None => edges.push(LineageEdge {
                transition: mapping.layer_transition,
                from,
                to,
                fields: 1,
                unknown_fields: unknown,
            }),
        }
    }
    edges
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::mapping::{DbtIngest, DdlIngest};
    use crate::domain::mapping::{InformationTableType, SourceFieldPolicy};
    use chrono::NaiveDate;

    fn session() -> MappingSession {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut session = MappingSession::new().unwrap();
        session
            .ingest_ddl(
                &DdlIngest {
                    source: TableLocator::new("DL2", "ENT", "SRC"),
                    target: TableLocator::new("FND", "APP", "PMT"),
                    ddl: "(\n  A VARCHAR(10)\n)".to_string(),
                },
                now,
            )
            .unwrap();
        session
            .ingest_dbt(
                &DbtIngest {
                    source: TableLocator::new("FND", "APP", "PMT"),
                    target: TableLocator::new("INFO", "APP", "PMT_INFO"),
                    table_type: InformationTableType::Type1,
                    script: "COALESCE(A, 0) AS A_NR".to_string(),
                    policy: SourceFieldPolicy::Strict,
                },
                now,
            )
            .unwrap();
        session
    }

    #[test]
    fn test_report_summary() {
        let report = MappingReport::build(&session(), &ProjectConfig::builtin());
        assert_eq!(report.project_prefix, "DDLC_Export");
        assert_eq!(report.summary.total_mappings, 4 + 10);
        assert_eq!(report.summary.total_tables, 2);
        assert_eq!(report.summary.unknown_lineage, 1);
        assert!(report.has_unknown_lineage());
        assert_eq!(report.edges.len(), 2);
    }

    #[test]
    fn test_report_json_lists_transitions() -> anyhow::Result<()> {
        let report = MappingReport::build(&session(), &ProjectConfig::builtin());
        let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
        assert_eq!(value["transitions"][0]["transition"], "DL2_to_Foundation");
        assert_eq!(value["transitions"][1]["type1_tables"], 1);
        Ok(())
    }

    #[test]
    fn test_mermaid_output() {
        let report = MappingReport::build(&session(), &ProjectConfig::builtin());
        insta::assert_snapshot!(report.to_mermaid(), @r#"
        graph LR
            DL2_ENT_SRC["DL2.ENT.SRC"]
            FND_APP_PMT["FND.APP.PMT"]
            INFO_APP_PMT_INFO["INFO.APP.PMT_INFO"]
            DL2_ENT_SRC -->|"4 fields"| FND_APP_PMT
            FND_APP_PMT -.->|"⚠️ 1 of 10 UNKNOWN"| INFO_APP_PMT_INFO
        "#);
    }
}
