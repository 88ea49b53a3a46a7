//! Report rendering for the register exports (CSV or JSON).
//!
//! The original tool rendered these tables into PDFs in the browser; here
//! they are produced server-side in formats an auditor can actually ingest.

use serde::Serialize;

use crate::db::AuditLog;
use crate::domain::types::IncidentStatus;
use crate::entities::{incident_history, incidents, ropa_entries};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported export format: {other}")),
        }
    }
}

impl ExportFormat {
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

#[derive(Debug, Serialize)]
struct RopaRow<'a> {
    process_name: &'a str,
    department: &'a str,
    data_types: Vec<String>,
    data_subjects: &'a str,
    legal_basis: &'a str,
    retention_period: &'a str,
    security_measures: &'a str,
    updated_at: &'a str,
}

pub fn render_ropa_register(entries: &[ropa_entries::Model], format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => {
            let rows: Vec<RopaRow<'_>> = entries
                .iter()
                .map(|e| RopaRow {
                    process_name: &e.process_name,
                    department: &e.department,
                    data_types: serde_json::from_str(&e.data_types).unwrap_or_default(),
                    data_subjects: &e.data_subjects,
                    legal_basis: &e.legal_basis,
                    retention_period: &e.retention_period,
                    security_measures: e.security_measures.as_deref().unwrap_or(""),
                    updated_at: &e.updated_at,
                })
                .collect();
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        }
        ExportFormat::Csv => {
            let mut out = String::from(
                "process_name,department,data_types,data_subjects,legal_basis,retention_period,security_measures,updated_at\n",
            );
            for e in entries {
                let data_types: Vec<String> =
                    serde_json::from_str(&e.data_types).unwrap_or_default();
                push_csv_row(
                    &mut out,
                    &[
                        &e.process_name,
                        &e.department,
                        &data_types.join("; "),
                        &e.data_subjects,
                        &e.legal_basis,
                        &e.retention_period,
                        e.security_measures.as_deref().unwrap_or(""),
                        &e.updated_at,
                    ],
                );
            }
            out
        }
    }
}

#[derive(Debug, Serialize)]
struct IncidentRow<'a> {
    date_reported: &'a str,
    title: &'a str,
    severity: &'a str,
    status: &'a str,
}

pub fn render_incident_register(incidents: &[incidents::Model], format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => {
            let rows: Vec<IncidentRow<'_>> = incidents
                .iter()
                .map(|i| IncidentRow {
                    date_reported: &i.date_reported,
                    title: &i.title,
                    severity: &i.severity,
                    status: &i.status,
                })
                .collect();
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        }
        ExportFormat::Csv => {
            let mut out = String::from("date_reported,title,severity,status\n");
            for i in incidents {
                let status_label = i
                    .status
                    .parse::<IncidentStatus>()
                    .map_or_else(|_| i.status.clone(), |s| s.label().to_string());
                push_csv_row(
                    &mut out,
                    &[
                        &i.date_reported,
                        &i.title,
                        &i.severity.to_uppercase(),
                        &status_label,
                    ],
                );
            }
            out
        }
    }
}

/// Renders one incident's full audit trail, newest entry last.
pub fn render_incident_audit(
    incident: &incidents::Model,
    history: &[incident_history::Model],
    format: ExportFormat,
) -> String {
    match format {
        ExportFormat::Json => {
            #[derive(Serialize)]
            struct Audit<'a> {
                incident_id: &'a str,
                title: &'a str,
                date_reported: &'a str,
                status: &'a str,
                history: &'a [incident_history::Model],
            }

            serde_json::to_string_pretty(&Audit {
                incident_id: &incident.id,
                title: &incident.title,
                date_reported: &incident.date_reported,
                status: &incident.status,
                history,
            })
            .unwrap_or_else(|_| "{}".to_string())
        }
        ExportFormat::Csv => {
            let mut out = String::from("date,user,action,description\n");
            for h in history {
                push_csv_row(&mut out, &[&h.date, &h.user, &h.action, &h.description]);
            }
            out
        }
    }
}

pub fn render_audit_logs(logs: &[AuditLog], format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(logs).unwrap_or_else(|_| "[]".to_string())
        }
        ExportFormat::Csv => {
            let mut out = String::from("created_at,level,event_type,message,details\n");
            for log in logs {
                push_csv_row(
                    &mut out,
                    &[
                        &log.created_at,
                        &log.level,
                        &log.event_type,
                        &log.message,
                        log.details.as_deref().unwrap_or(""),
                    ],
                );
            }
            out
        }
    }
}

fn push_csv_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_csv(field));
    }
    out.push('\n');
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(title: &str, status: &str) -> incidents::Model {
        incidents::Model {
            id: "i-1".to_string(),
            tenant_id: "t-1".to_string(),
            title: title.to_string(),
            description: "desc".to_string(),
            severity: "high".to_string(),
            status: status.to_string(),
            affected_data_types: None,
            date_occurred: None,
            date_reported: "2026-03-01T12:00:00Z".to_string(),
            analysis_report: None,
            remediation_plan: None,
        }
    }

    #[test]
    fn csv_escapes_commas_and_quotes() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn incident_register_csv_uses_status_labels() {
        let rows = vec![incident("Notebook perdido", "false_positive")];
        let csv = render_incident_register(&rows, ExportFormat::Csv);

        assert!(csv.starts_with("date_reported,title,severity,status\n"));
        assert!(csv.contains("Notebook perdido"));
        assert!(csv.contains("HIGH"));
        assert!(csv.contains("Falso Positivo"));
    }

    #[test]
    fn audit_trail_csv_has_one_row_per_entry() {
        let inc = incident("Vazamento", "open");
        let history = vec![
            incident_history::Model {
                id: 1,
                incident_id: "i-1".to_string(),
                date: "2026-03-01T12:00:00Z".to_string(),
                action: "Incidente Reportado".to_string(),
                description: "Registro inicial do incidente.".to_string(),
                user: "Alice".to_string(),
            },
            incident_history::Model {
                id: 2,
                incident_id: "i-1".to_string(),
                date: "2026-03-02T09:00:00Z".to_string(),
                action: "Status alterado para Investigando".to_string(),
                description: "Análise iniciada, logs coletados".to_string(),
                user: "Carol".to_string(),
            },
        ];

        let csv = render_incident_audit(&inc, &history, ExportFormat::Csv);
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("Status alterado para Investigando"));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
