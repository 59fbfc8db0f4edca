// steward-core/src/application/mapping.rs
//
// Mapping session: owns the lineage collection and turns pasted DDL and DBT
// scripts into mapping records.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::mapping::record::{
    DEFAULT_CHANGE_TYPE, ETL_AUDIT_COLUMN, MANUAL_INPUT_REQUIRED, NOT_APPLICABLE, STRAIGHT_MOVE,
    UNKNOWN,
};
use crate::domain::mapping::{
    ColumnExtractor, FieldMapping, InformationTableType, LayerTransition, MappingRecord,
    SourceFieldPolicy, TableLocator, TransformationClassifier, foundation_audit_columns,
    is_foundation_audit_column,
};

/// DL2 → Foundation request: a table DDL and where it comes from.
#[derive(Debug, Clone)]
pub struct DdlIngest {
    pub source: TableLocator,
    pub target: TableLocator,
    pub ddl: String,
}

/// Foundation → Information request: a DBT SELECT body.
#[derive(Debug, Clone)]
pub struct DbtIngest {
    pub source: TableLocator,
    pub target: TableLocator,
    pub table_type: InformationTableType,
    pub script: String,
    pub policy: SourceFieldPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    pub transition: LayerTransition,
    pub target_table: String,
    pub business_columns: usize,
    pub audit_columns: usize,
    /// Business columns whose lineage needs a person.
    pub unknown_lineage: usize,
}

impl IngestOutcome {
    pub fn total(&self) -> usize {
        self.business_columns + self.audit_columns
    }
}

/// Mappings of one target table, in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct TableGroup {
    pub target_table: String,
    /// "TYPE 1"/"TYPE 2" for information tables.
    pub table_type: Option<String>,
    pub mappings: Vec<MappingRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionOverview {
    pub transition: LayerTransition,
    pub tables: Vec<TableGroup>,
    pub total_tables: usize,
    pub total_mappings: usize,
    pub type1_tables: usize,
    pub type2_tables: usize,
}

fn require(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::MissingInput(field))
    } else {
        Ok(())
    }
}

pub struct MappingSession {
    mappings: Vec<MappingRecord>,
    extractor: ColumnExtractor,
}

impl MappingSession {
    pub fn new() -> Result<Self, DomainError> {
        Self::with_mappings(Vec::new())
    }

    pub fn with_mappings(mappings: Vec<MappingRecord>) -> Result<Self, DomainError> {
        Ok(Self {
            mappings,
            extractor: ColumnExtractor::new()?,
        })
    }

    pub fn mappings(&self) -> &[MappingRecord] {
        &self.mappings
    }

    pub fn into_mappings(self) -> Vec<MappingRecord> {
        self.mappings
    }

    #[instrument(skip(self, request), fields(target = %request.target.table))]
    pub fn ingest_ddl(
        &mut self,
        request: &DdlIngest,
        now: NaiveDateTime,
    ) -> Result<IngestOutcome, DomainError> {
        require(&request.target.table, "target table")?;
        require(&request.ddl, "DDL script")?;
        require(&request.source.table, "source table")?;

        let mut columns = self.extractor.extract(&request.ddl);
        if columns.is_empty() {
            warn!("No columns parsed from DDL");
            return Err(DomainError::NoColumnsFound);
        }
        let business_columns = columns.len();
        columns.extend(foundation_audit_columns());

        let transition = LayerTransition::Dl2ToFoundation;
        for column in columns {
            let (source_field, transformation) = if is_foundation_audit_column(&column.name) {
                (NOT_APPLICABLE, ETL_AUDIT_COLUMN)
            } else {
                ("", STRAIGHT_MOVE)
            };
            self.mappings.push(MappingRecord {
                layer_transition: transition,
                source: request.source.clone(),
                source_field: source_field.to_string(),
                target: request.target.clone(),
                target_field: column.name,
                target_data_type: column.data_type,
                transformation_logic: transformation.to_string(),
                change_type: DEFAULT_CHANGE_TYPE.to_string(),
                timestamp: now,
            });
        }

        let outcome = IngestOutcome {
            transition,
            target_table: request.target.table.clone(),
            business_columns,
            audit_columns: foundation_audit_columns().len(),
            unknown_lineage: 0,
        };
        info!(
            business = outcome.business_columns,
            audit = outcome.audit_columns,
            "DDL mappings added"
        );
        Ok(outcome)
    }

    #[instrument(skip(self, request), fields(target = %request.target.table, table_type = %request.table_type))]
    pub fn ingest_dbt(
        &mut self,
        request: &DbtIngest,
        now: NaiveDateTime,
    ) -> Result<IngestOutcome, DomainError> {
        require(&request.target.table, "target table")?;
        require(&request.script, "DBT script")?;
        require(&request.source.table, "source table")?;

        let classifier = TransformationClassifier::new(request.policy)?;
        let business = classifier.parse_script(&request.script);
        if business.is_empty() {
            warn!("No field mappings parsed from DBT script");
            return Err(DomainError::NoFieldMappings);
        }
        let audit = request.table_type.audit_columns();

        let outcome = IngestOutcome {
            transition: LayerTransition::FoundationToInformation,
            target_table: request.target.table.clone(),
            business_columns: business.len(),
            audit_columns: audit.len(),
            unknown_lineage: business.iter().filter(|m| m.source_field == UNKNOWN).count(),
        };

        for field in business.into_iter().chain(audit) {
            self.mappings
                .push(Self::information_record(request, field, now));
        }

        info!(
            business = outcome.business_columns,
            audit = outcome.audit_columns,
            unknown = outcome.unknown_lineage,
            "DBT mappings added"
        );
        Ok(outcome)
    }

    fn information_record(
        request: &DbtIngest,
        field: FieldMapping,
        now: NaiveDateTime,
    ) -> MappingRecord {
        let transformation_logic = if field.source_field == UNKNOWN {
            MANUAL_INPUT_REQUIRED.to_string()
        } else {
            field.transformation
        };
        MappingRecord {
            layer_transition: LayerTransition::FoundationToInformation,
            source: request.source.clone(),
            source_field: field.source_field,
            target: request.target.clone(),
            target_field: field.target_field,
            target_data_type: request.table_type.as_str().to_string(),
            transformation_logic,
            change_type: DEFAULT_CHANGE_TYPE.to_string(),
            timestamp: now,
        }
    }

    pub fn delete(&mut self, index: usize) -> Result<MappingRecord, DomainError> {
        if index >= self.mappings.len() {
            return Err(DomainError::RecordNotFound {
                index,
                len: self.mappings.len(),
            });
        }
        Ok(self.mappings.remove(index))
    }

    /// Removes every mapping of `table` within `transition`; returns how many went.
    pub fn delete_table(&mut self, transition: LayerTransition, table: &str) -> usize {
        let before = self.mappings.len();
        self.mappings
            .retain(|m| !(m.layer_transition == transition && m.target.table == table));
        let removed = before - self.mappings.len();
        info!(%transition, table, removed, "Table mappings deleted");
        removed
    }

    pub fn clear(&mut self, transition: LayerTransition) -> usize {
        let before = self.mappings.len();
        self.mappings.retain(|m| m.layer_transition != transition);
        let removed = before - self.mappings.len();
        info!(%transition, removed, "Transition cleared");
        removed
    }

    pub fn for_transition(
        &self,
        transition: LayerTransition,
    ) -> impl Iterator<Item = &MappingRecord> + '_ {
        self.mappings
            .iter()
            .filter(move |m| m.layer_transition == transition)
    }

    pub fn overview(&self, transition: LayerTransition) -> TransitionOverview {
        let mut tables: Vec<TableGroup> = Vec::new();
        for mapping in self.for_transition(transition) {
            match tables
                .iter_mut()
                .find(|g| g.target_table == mapping.target.table)
            {
                Some(group) => group.mappings.push(mapping.clone()),
                None => tables.push(TableGroup {
                    target_table: mapping.target.table.clone(),
                    table_type: None,
                    mappings: vec![mapping.clone()],
                }),
            }
        }

        if transition == LayerTransition::FoundationToInformation {
            for group in &mut tables {
                group.table_type = group
                    .mappings
                    .first()
                    .map(|m| m.target_data_type.clone())
                    .filter(|t| {
                        t == InformationTableType::Type1.as_str()
                            || t == InformationTableType::Type2.as_str()
                    });
            }
        }

        let count_type = |ty: InformationTableType| {
            tables
                .iter()
                .filter(|g| g.table_type.as_deref() == Some(ty.as_str()))
                .count()
        };
        let type1_tables = count_type(InformationTableType::Type1);
        let type2_tables = count_type(InformationTableType::Type2);

        TransitionOverview {
            transition,
            total_tables: tables.len(),
            total_mappings: tables.iter().map(|g| g.mappings.len()).sum(),
            type1_tables,
            type2_tables,
            tables,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn ddl_request(table: &str) -> DdlIngest {
        DdlIngest {
            source: TableLocator::new("PROD_DL2_CHIEF_FINANCIAL_OFFICE_RQ", "ENTERPRISE", "EWJ_SRC"),
            target: TableLocator::new("PCFOPAYMENTSDBI", "APP_CFOPYMT5", table),
            ddl: "create or replace TABLE X (\n  A VARCHAR(10),\n  B NUMBER(38,0),\n  PRIMARY KEY (A)\n);"
                .to_string(),
        }
    }

    fn dbt_request(table: &str, table_type: InformationTableType) -> DbtIngest {
        DbtIngest {
            source: TableLocator::new("PCFOPAYMENTSDBI", "APP_CFOPYMT5", "APP_SRC"),
            target: TableLocator::new("PCFOINFOMDBI", "APP_CFOPYMT5", table),
            table_type,
            script: [
                "{{ handle_empty_or_null_value(chk_type='VARCHAR', length=36, first_val='ABA_ROUTING_NR') }} AS ABA_ROUTE_NR,",
                "PMT_ID AS PAYMENT_ID,",
                "CASE WHEN STATUS_CD = 'A' THEN 'Y' ELSE 'N' END AS ACTIVE_IND",
            ]
            .join("\n"),
            policy: SourceFieldPolicy::Strict,
        }
    }

    #[test]
    fn test_ddl_ingest_appends_audit_columns() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        let outcome = session.ingest_ddl(&ddl_request("APP_TBL"), now())?;
        assert_eq!(outcome.business_columns, 2);
        assert_eq!(outcome.audit_columns, 3);
        assert_eq!(session.mappings().len(), 5);

        let first = &session.mappings()[0];
        assert_eq!(first.source_field, "");
        assert_eq!(first.transformation_logic, STRAIGHT_MOVE);
        assert_eq!(first.target_data_type, "VARCHAR(10)");

        let last = &session.mappings()[4];
        assert_eq!(last.target_field, "ETL_CREA_NR");
        assert_eq!(last.source_field, NOT_APPLICABLE);
        assert_eq!(last.transformation_logic, ETL_AUDIT_COLUMN);
        Ok(())
    }

    #[test]
    fn test_ddl_without_columns_is_an_error() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        let mut request = ddl_request("APP_TBL");
        request.ddl = "no parentheses here".to_string();
        assert!(matches!(
            session.ingest_ddl(&request, now()),
            Err(DomainError::NoColumnsFound)
        ));
        assert!(session.mappings().is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_inputs_are_rejected() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        let mut request = ddl_request("");
        assert!(matches!(
            session.ingest_ddl(&request, now()),
            Err(DomainError::MissingInput("target table"))
        ));
        request.target.table = "T".to_string();
        request.source.table = " ".to_string();
        assert!(matches!(
            session.ingest_ddl(&request, now()),
            Err(DomainError::MissingInput("source table"))
        ));
        Ok(())
    }

    #[test]
    fn test_dbt_ingest_strict() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        let outcome =
            session.ingest_dbt(&dbt_request("INFO_TBL", InformationTableType::Type2), now())?;
        assert_eq!(outcome.business_columns, 3);
        assert_eq!(outcome.audit_columns, 12);
        assert_eq!(outcome.unknown_lineage, 1);
        assert_eq!(outcome.total(), session.mappings().len());

        let m = session.mappings();
        assert_eq!(m[0].source_field, "ABA_ROUTING_NR");
        assert_eq!(m[1].transformation_logic, "Direct mapping");
        assert_eq!(m[2].source_field, UNKNOWN);
        assert_eq!(m[2].transformation_logic, MANUAL_INPUT_REQUIRED);
        assert!(m.iter().all(|r| r.target_data_type == "TYPE 2"));
        Ok(())
    }

    #[test]
    fn test_dbt_ingest_heuristic_guesses_case_source() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        let mut request = dbt_request("INFO_TBL", InformationTableType::Type1);
        request.policy = SourceFieldPolicy::Heuristic;
        let outcome = session.ingest_dbt(&request, now())?;
        assert_eq!(outcome.unknown_lineage, 0);
        assert_eq!(session.mappings()[2].source_field, "STATUS_CD");
        Ok(())
    }

    #[test]
    fn test_audit_columns_alone_are_not_a_parse() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        let mut request = dbt_request("INFO_TBL", InformationTableType::Type1);
        request.script = "-- only a comment\n".to_string();
        assert!(matches!(
            session.ingest_dbt(&request, now()),
            Err(DomainError::NoFieldMappings)
        ));
        Ok(())
    }

    #[test]
    fn test_delete_and_clear() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        session.ingest_ddl(&ddl_request("A"), now())?;
        session.ingest_ddl(&ddl_request("B"), now())?;
        session.ingest_dbt(&dbt_request("C", InformationTableType::Type1), now())?;

        assert_eq!(session.delete_table(LayerTransition::Dl2ToFoundation, "A"), 5);
        assert_eq!(session.delete_table(LayerTransition::FoundationToInformation, "B"), 0);
        let removed = session.delete(0)?;
        assert_eq!(removed.target.table, "B");
        assert!(matches!(
            session.delete(100),
            Err(DomainError::RecordNotFound { index: 100, .. })
        ));
        assert_eq!(session.clear(LayerTransition::FoundationToInformation), 12);
        assert_eq!(session.mappings().len(), 4);
        Ok(())
    }

    #[test]
    fn test_overview_groups_by_table() -> anyhow::Result<()> {
        let mut session = MappingSession::new()?;
        session.ingest_dbt(&dbt_request("T2", InformationTableType::Type2), now())?;
        session.ingest_dbt(&dbt_request("T1", InformationTableType::Type1), now())?;
        session.ingest_ddl(&ddl_request("F"), now())?;

        let overview = session.overview(LayerTransition::FoundationToInformation);
        assert_eq!(overview.total_tables, 2);
        assert_eq!(overview.tables[0].target_table, "T2");
        assert_eq!(overview.tables[0].table_type.as_deref(), Some("TYPE 2"));
        assert_eq!(overview.total_mappings, 15 + 12);
        assert_eq!((overview.type1_tables, overview.type2_tables), (1, 1));

        let foundation = session.overview(LayerTransition::Dl2ToFoundation);
        assert_eq!(foundation.total_tables, 1);
        assert_eq!(foundation.tables[0].table_type, None);
        Ok(())
    }
}
