//! The built-in table catalog.
//!
//! Column names, types, nullability, defaults and uniqueness are a
//! compatibility contract with existing databases and must not drift.
//! Tables are registered parents-before-children; the registry enforces it.

use crate::registry::{SchemaError, SchemaRegistry};
use crate::table::{ColumnSpec, DefaultValue, TableDef};

/// Builds the full registry. Registration order is the creation order for
/// migrations; reversed, it is the teardown order.
pub fn builtin() -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();
    for table in tables() {
        registry.define(table)?;
    }
    Ok(registry)
}

fn tables() -> Vec<TableDef> {
    vec![
        // identity and messaging
        users(),
        conversations(),
        messages(),
        documents(),
        // audit and compliance
        security_events(),
        fraud_alerts(),
        system_metrics(),
        audit_logs(),
        compliance_events(),
        user_behavior_profiles(),
        // self-healing and observability
        self_healing_actions(),
        security_incidents(),
        system_health_snapshots(),
        error_corrections(),
        health_check_results(),
        failover_events(),
        performance_baselines(),
        alert_rules(),
        circuit_breaker_states(),
        uptime_incidents(),
        autonomous_operations(),
        maintenance_tasks(),
        government_compliance_audits(),
        security_metrics(),
        // civic identity documents
        biometric_profiles(),
        civic_applicants(),
        civic_documents(),
        civic_document_verifications(),
        // assistant sessions
        assistant_sessions(),
        assistant_commands(),
    ]
}

fn users() -> TableDef {
    TableDef::new("users")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("username").not_null().unique())
        .col(ColumnSpec::text("email").unique())
        .col(ColumnSpec::text("password_hash").not_null())
        .col(
            ColumnSpec::text("role")
                .not_null()
                .default(DefaultValue::Text("user")),
        )
        .col(
            ColumnSpec::boolean("is_active")
                .not_null()
                .default(DefaultValue::Bool(true)),
        )
        .col(
            ColumnSpec::integer("failed_attempts")
                .not_null()
                .default(DefaultValue::Int(0)),
        )
        .col(ColumnSpec::timestamp("last_login_at"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::timestamp("updated_at"))
}

fn conversations() -> TableDef {
    TableDef::new("conversations")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").not_null().references("users", "id"))
        .col(ColumnSpec::text("title").not_null())
        .col(
            ColumnSpec::timestamp("last_message_at")
                .not_null()
                .default_now(),
        )
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn messages() -> TableDef {
    TableDef::new("messages")
        .col(ColumnSpec::text("id").primary_key())
        .col(
            ColumnSpec::text("conversation_id")
                .not_null()
                .references("conversations", "id"),
        )
        .col(ColumnSpec::text("content").not_null())
        .col(ColumnSpec::text("role").not_null())
        .col(ColumnSpec::json("metadata"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn documents() -> TableDef {
    TableDef::new("documents")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").not_null().references("users", "id"))
        .col(ColumnSpec::text("type").not_null())
        .col(ColumnSpec::text("title").not_null())
        .col(ColumnSpec::text("content").not_null())
        .col(ColumnSpec::text("processing_status").default(DefaultValue::Text("pending")))
        .col(ColumnSpec::boolean("is_encrypted").default(DefaultValue::Bool(false)))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn security_events() -> TableDef {
    TableDef::new("security_events")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").references("users", "id"))
        .col(ColumnSpec::text("event_type").not_null())
        .col(
            ColumnSpec::text("severity")
                .not_null()
                .default(DefaultValue::Text("medium")),
        )
        .col(ColumnSpec::text("description").not_null())
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn fraud_alerts() -> TableDef {
    TableDef::new("fraud_alerts")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").references("users", "id"))
        .col(ColumnSpec::text("alert_type").not_null())
        .col(ColumnSpec::text("severity").not_null())
        .col(ColumnSpec::text("description").not_null())
        .col(
            ColumnSpec::boolean("is_resolved")
                .not_null()
                .default(DefaultValue::Bool(false)),
        )
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::timestamp("resolved_at"))
        .col(ColumnSpec::json("metadata"))
}

fn system_metrics() -> TableDef {
    TableDef::new("system_metrics")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("metric_name").not_null())
        .col(ColumnSpec::double("value").not_null())
        .col(ColumnSpec::text("unit").not_null())
        .col(ColumnSpec::timestamp("timestamp").not_null().default_now())
        .col(ColumnSpec::json("tags"))
}

fn audit_logs() -> TableDef {
    TableDef::new("audit_logs")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").references("users", "id"))
        .col(ColumnSpec::text("action").not_null())
        .col(ColumnSpec::text("entity_type").not_null())
        .col(ColumnSpec::text("entity_id").not_null())
        .col(ColumnSpec::json("old_value"))
        .col(ColumnSpec::json("new_value"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn compliance_events() -> TableDef {
    TableDef::new("compliance_events")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("event_type").not_null())
        .col(ColumnSpec::text("regulation").not_null())
        .col(ColumnSpec::text("compliance_status").not_null())
        .col(ColumnSpec::text("details").not_null())
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn user_behavior_profiles() -> TableDef {
    TableDef::new("user_behavior_profiles")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").not_null().references("users", "id"))
        .col(ColumnSpec::json("login_patterns").not_null())
        .col(ColumnSpec::double("risk_score").not_null())
        .col(ColumnSpec::double("anomaly_threshold").not_null())
        .col(ColumnSpec::timestamp("last_updated").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn self_healing_actions() -> TableDef {
    TableDef::new("self_healing_actions")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("action_type").not_null())
        .col(ColumnSpec::text("trigger").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::timestamp("start_time").not_null())
        .col(ColumnSpec::timestamp("end_time"))
        .col(ColumnSpec::boolean("success"))
        .col(ColumnSpec::json("details"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn security_incidents() -> TableDef {
    TableDef::new("security_incidents")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("incident_type").not_null())
        .col(ColumnSpec::text("severity").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::text("description").not_null())
        .col(ColumnSpec::timestamp("detection_time").not_null())
        .col(ColumnSpec::timestamp("resolution_time"))
        .col(ColumnSpec::json("impacted_systems"))
        .col(ColumnSpec::json("metadata"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn system_health_snapshots() -> TableDef {
    TableDef::new("system_health_snapshots")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::double("cpu_usage").not_null())
        .col(ColumnSpec::double("memory_usage").not_null())
        .col(ColumnSpec::double("disk_usage").not_null())
        .col(ColumnSpec::double("network_latency").not_null())
        .col(ColumnSpec::integer("active_connections").not_null())
        .col(ColumnSpec::double("error_rate").not_null())
        .col(ColumnSpec::timestamp("timestamp").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn error_corrections() -> TableDef {
    TableDef::new("error_corrections")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("error_type").not_null())
        .col(ColumnSpec::text("correction_type").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::timestamp("start_time").not_null())
        .col(ColumnSpec::timestamp("end_time"))
        .col(ColumnSpec::boolean("success"))
        .col(ColumnSpec::json("details"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn health_check_results() -> TableDef {
    TableDef::new("health_check_results")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("check_id").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::integer("response_time").not_null())
        .col(ColumnSpec::json("details"))
        .col(ColumnSpec::timestamp("timestamp").not_null().default_now())
}

fn failover_events() -> TableDef {
    TableDef::new("failover_events")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("service_id").not_null())
        .col(ColumnSpec::text("trigger_type").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::timestamp("trigger_time").not_null())
        .col(ColumnSpec::timestamp("completion_time"))
        .col(ColumnSpec::boolean("success"))
        .col(ColumnSpec::json("details"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn performance_baselines() -> TableDef {
    TableDef::new("performance_baselines")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("service_name").not_null())
        .col(ColumnSpec::text("metric_name").not_null())
        .col(ColumnSpec::double("baseline_value").not_null())
        .col(ColumnSpec::double("upper_threshold").not_null())
        .col(ColumnSpec::double("lower_threshold").not_null())
        .col(ColumnSpec::timestamp("last_updated").not_null())
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::json("metadata"))
}

fn alert_rules() -> TableDef {
    TableDef::new("alert_rules")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("name").not_null())
        .col(ColumnSpec::text("description").not_null())
        .col(ColumnSpec::json("conditions").not_null())
        .col(ColumnSpec::json("actions").not_null())
        .col(
            ColumnSpec::boolean("enabled")
                .not_null()
                .default(DefaultValue::Bool(true)),
        )
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::timestamp("updated_at"))
}

fn circuit_breaker_states() -> TableDef {
    TableDef::new("circuit_breaker_states")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("service_name").not_null().unique())
        .col(ColumnSpec::text("state").not_null())
        .col(
            ColumnSpec::integer("failure_count")
                .not_null()
                .default(DefaultValue::Int(0)),
        )
        .col(ColumnSpec::timestamp("last_state_change").not_null())
        .col(ColumnSpec::json("metadata"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn uptime_incidents() -> TableDef {
    TableDef::new("uptime_incidents")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("service_id").not_null())
        .col(ColumnSpec::text("incident_type").not_null())
        .col(ColumnSpec::text("severity").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::timestamp("start_time").not_null())
        .col(ColumnSpec::timestamp("end_time"))
        .col(ColumnSpec::text("resolution"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn autonomous_operations() -> TableDef {
    TableDef::new("autonomous_operations")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("operation_type").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::timestamp("start_time").not_null())
        .col(ColumnSpec::timestamp("end_time"))
        .col(ColumnSpec::json("details"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn maintenance_tasks() -> TableDef {
    TableDef::new("maintenance_tasks")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("task_type").not_null())
        .col(ColumnSpec::text("status").not_null())
        .col(ColumnSpec::text("priority").not_null())
        .col(ColumnSpec::timestamp("scheduled_time").not_null())
        .col(ColumnSpec::timestamp("completion_time"))
        .col(ColumnSpec::json("details"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn government_compliance_audits() -> TableDef {
    TableDef::new("government_compliance_audits")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("audit_type").not_null())
        .col(ColumnSpec::text("department").not_null())
        .col(ColumnSpec::text("compliance_status").not_null())
        .col(ColumnSpec::json("findings"))
        .col(ColumnSpec::json("recommendations"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::timestamp("completed_at"))
}

fn security_metrics() -> TableDef {
    TableDef::new("security_metrics")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("metric_name").not_null())
        .col(ColumnSpec::double("value").not_null())
        .col(ColumnSpec::text("category").not_null())
        .col(ColumnSpec::timestamp("timestamp").not_null())
        .col(ColumnSpec::json("metadata"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn biometric_profiles() -> TableDef {
    TableDef::new("biometric_profiles")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").not_null().references("users", "id"))
        .col(ColumnSpec::json("fingerprints"))
        .col(ColumnSpec::json("facial_data"))
        .col(ColumnSpec::json("iris_scans"))
        .col(ColumnSpec::json("voice_print"))
        .col(ColumnSpec::timestamp("last_verified"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::timestamp("updated_at"))
}

fn civic_applicants() -> TableDef {
    TableDef::new("civic_applicants")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::var_char("id_number", 13).not_null().unique())
        .col(ColumnSpec::var_char("passport_number", 50).unique())
        .col(ColumnSpec::var_char("first_name", 100).not_null())
        .col(ColumnSpec::var_char("last_name", 100).not_null())
        .col(ColumnSpec::timestamp("date_of_birth").not_null())
        .col(ColumnSpec::var_char("gender", 20).not_null())
        .col(ColumnSpec::var_char("nationality", 100).not_null())
        .col(ColumnSpec::var_char("contact_number", 20))
        .col(ColumnSpec::var_char("email_address", 255))
        .col(ColumnSpec::json("physical_address"))
        .col(ColumnSpec::text("biometric_id").references("biometric_profiles", "id"))
        .col(ColumnSpec::var_char("verification_status", 50).not_null())
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::timestamp("updated_at"))
}

fn civic_documents() -> TableDef {
    TableDef::new("civic_documents")
        .col(ColumnSpec::text("id").primary_key())
        .col(
            ColumnSpec::text("applicant_id")
                .not_null()
                .references("civic_applicants", "id"),
        )
        .col(ColumnSpec::var_char("document_type", 100).not_null())
        .col(ColumnSpec::var_char("document_number", 100).not_null().unique())
        .col(ColumnSpec::timestamp("issue_date").not_null())
        .col(ColumnSpec::timestamp("expiry_date"))
        .col(ColumnSpec::var_char("status", 50).not_null())
        .col(ColumnSpec::json("security_features"))
        .col(ColumnSpec::text("digital_signature"))
        .col(ColumnSpec::json("document_data"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
        .col(ColumnSpec::timestamp("updated_at"))
}

fn civic_document_verifications() -> TableDef {
    TableDef::new("civic_document_verifications")
        .col(ColumnSpec::text("id").primary_key())
        .col(
            ColumnSpec::text("document_id")
                .not_null()
                .references("civic_documents", "id"),
        )
        .col(ColumnSpec::var_char("verification_code", 100).not_null().unique())
        .col(ColumnSpec::var_char("verification_type", 100).not_null())
        .col(ColumnSpec::var_char("verification_result", 50).not_null())
        .col(ColumnSpec::text("verified_by").references("users", "id"))
        .col(ColumnSpec::timestamp("verification_timestamp").not_null())
        .col(ColumnSpec::json("details"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn assistant_sessions() -> TableDef {
    TableDef::new("assistant_sessions")
        .col(ColumnSpec::text("id").primary_key())
        .col(ColumnSpec::text("user_id").not_null().references("users", "id"))
        .col(ColumnSpec::var_char("session_type", 100).not_null())
        .col(ColumnSpec::json("context").not_null())
        .col(
            ColumnSpec::boolean("session_active")
                .not_null()
                .default(DefaultValue::Bool(true)),
        )
        .col(ColumnSpec::timestamp("last_activity").not_null())
        .col(ColumnSpec::json("metadata"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

fn assistant_commands() -> TableDef {
    TableDef::new("assistant_commands")
        .col(ColumnSpec::text("id").primary_key())
        .col(
            ColumnSpec::text("session_id")
                .not_null()
                .references("assistant_sessions", "id"),
        )
        .col(ColumnSpec::var_char("command_type", 100).not_null())
        .col(ColumnSpec::json("parameters").not_null())
        .col(ColumnSpec::var_char("execution_status", 50).not_null())
        .col(ColumnSpec::json("result"))
        .col(ColumnSpec::json("error_details"))
        .col(ColumnSpec::timestamp("created_at").not_null().default_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_is_internally_consistent() {
        let registry = builtin().expect("catalog must register cleanly");
        assert_eq!(registry.len(), 30);
    }

    #[test]
    fn every_table_has_an_application_generated_primary_key() {
        let registry = builtin().unwrap();
        for table in registry.tables() {
            let pk = table
                .primary_key_column()
                .unwrap_or_else(|| panic!("{} has no primary key", table.name()));
            assert_eq!(pk.name(), "id");
            assert_eq!(pk.column_type(), crate::table::ColumnType::Text);
        }
    }

    #[test]
    fn foreign_keys_only_point_backwards() {
        let registry = builtin().unwrap();
        let mut seen = HashSet::new();
        for table in registry.tables() {
            for target in table.referenced_tables() {
                assert!(
                    seen.contains(target) || target == table.name(),
                    "{} references {} before it is defined",
                    table.name(),
                    target
                );
            }
            seen.insert(table.name());
        }
    }

    #[test]
    fn documents_defaulted_columns_stay_nullable() {
        // processing_status and is_encrypted carry defaults but accept NULL
        // in existing databases; their nullability must not drift.
        let registry = builtin().unwrap();
        let documents = registry.table("documents").unwrap();

        let status = documents.column("processing_status").unwrap();
        assert!(!status.is_not_null());
        assert_eq!(
            status.default_value(),
            Some(&crate::table::DefaultValue::Text("pending"))
        );

        let encrypted = documents.column("is_encrypted").unwrap();
        assert!(!encrypted.is_not_null());
        assert_eq!(
            encrypted.default_value(),
            Some(&crate::table::DefaultValue::Bool(false))
        );

        use sea_orm::sea_query::PostgresQueryBuilder;
        let sql = documents.create_statement().to_string(PostgresQueryBuilder);
        assert!(sql.contains("\"processing_status\" text DEFAULT 'pending'"));
        assert!(!sql.contains("\"processing_status\" text NOT NULL"));
        assert!(sql.contains("\"is_encrypted\" bool DEFAULT FALSE"));
    }

    #[test]
    fn foreign_keys_resolve_to_primary_keys() {
        let registry = builtin().unwrap();
        for table in registry.tables() {
            for column in table.columns() {
                if let Some(fk) = column.foreign_key() {
                    let resolved = registry
                        .resolve_foreign_key(table.name(), column.name())
                        .unwrap();
                    assert_eq!(resolved.table, fk.table);
                    let target = registry.table(fk.table).unwrap();
                    assert!(target.column(fk.column).unwrap().is_primary_key());
                }
            }
        }
    }
}
