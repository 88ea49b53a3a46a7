use serde::{Deserialize, Serialize};

use crate::db::{User, parse_quiz, parse_settings};
use crate::domain::types::{
    AwarenessCategory, DocType, DsarStatus, IncidentSeverity, IncidentStatus, PlanStatus, Quiz,
    TenantSettings, UserRole,
};
use crate::entities::{
    awareness_posts, dsar_requests, incident_history, incidents, legal_documents, ropa_entries,
    tenants, vendors,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TenantDto {
    pub id: String,
    pub cnpj: String,
    pub name: String,
    pub plan_status: PlanStatus,
    pub contact_email: Option<String>,
    pub settings: TenantSettings,
    pub created_at: String,
}

impl From<tenants::Model> for TenantDto {
    fn from(model: tenants::Model) -> Self {
        let settings = parse_settings(model.settings.as_deref());
        Self {
            id: model.id,
            cnpj: model.cnpj,
            name: model.name,
            plan_status: model.plan_status.parse().unwrap_or(PlanStatus::Suspended),
            contact_email: model.contact_email,
            settings,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub avatar_url: Option<String>,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.parse().unwrap_or(UserRole::User),
            is_active: user.is_active,
            avatar_url: user.avatar_url,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RopaEntryDto {
    pub id: String,
    pub process_name: String,
    pub department: String,
    pub data_types: Vec<String>,
    pub data_subjects: String,
    pub legal_basis: String,
    pub retention_period: String,
    pub security_measures: Option<String>,
    pub updated_at: String,
}

impl From<ropa_entries::Model> for RopaEntryDto {
    fn from(model: ropa_entries::Model) -> Self {
        Self {
            id: model.id,
            process_name: model.process_name,
            department: model.department,
            data_types: serde_json::from_str(&model.data_types).unwrap_or_default(),
            data_subjects: model.data_subjects,
            legal_basis: model.legal_basis,
            retention_period: model.retention_period,
            security_measures: model.security_measures,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IncidentDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub affected_data_types: Option<Vec<String>>,
    pub date_occurred: Option<String>,
    pub date_reported: String,
    pub analysis_report: Option<String>,
    pub remediation_plan: Option<String>,
}

impl From<incidents::Model> for IncidentDto {
    fn from(model: incidents::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            severity: model.severity.parse().unwrap_or(IncidentSeverity::Medium),
            status: model.status.parse().unwrap_or(IncidentStatus::Open),
            affected_data_types: model
                .affected_data_types
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
            date_occurred: model.date_occurred,
            date_reported: model.date_reported,
            analysis_report: model.analysis_report,
            remediation_plan: model.remediation_plan,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryDto {
    pub date: String,
    pub action: String,
    pub description: String,
    pub user: String,
}

impl From<incident_history::Model> for HistoryEntryDto {
    fn from(model: incident_history::Model) -> Self {
        Self {
            date: model.date,
            action: model.action,
            description: model.description,
            user: model.user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IncidentDetailDto {
    #[serde(flatten)]
    pub incident: IncidentDto,
    pub history: Vec<HistoryEntryDto>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisDto {
    pub severity: IncidentSeverity,
    pub analysis: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub doc_type: DocType,
    pub version: i32,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<legal_documents::Model> for DocumentDto {
    fn from(model: legal_documents::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            doc_type: model.doc_type.parse().unwrap_or(DocType::PrivacyPolicy),
            version: model.version,
            is_published: model.is_published,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GeneratedDocumentDto {
    #[serde(flatten)]
    pub document: DocumentDto,
    pub ai_assisted: bool,
}

#[derive(Debug, Serialize)]
pub struct AwarenessPostDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: AwarenessCategory,
    pub is_published: bool,
    pub view_count: i64,
    pub quiz: Option<Quiz>,
    pub created_at: String,
}

impl From<awareness_posts::Model> for AwarenessPostDto {
    fn from(model: awareness_posts::Model) -> Self {
        let quiz = parse_quiz(model.quiz.as_deref());
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            category: model.category.parse().unwrap_or(AwarenessCategory::Security),
            is_published: model.is_published,
            view_count: model.view_count,
            quiz,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizResultDto {
    pub correct: bool,
    pub correct_answer_index: u8,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedPostDto {
    pub title: String,
    pub content: String,
    pub quiz: Option<Quiz>,
}

#[derive(Debug, Serialize)]
pub struct DsarRequestDto {
    pub id: String,
    pub protocol_number: String,
    pub subject_name: String,
    pub subject_email: String,
    pub request_type: String,
    pub status: DsarStatus,
    pub deadline: String,
    pub overdue: bool,
    pub response_content: Option<String>,
    pub created_at: String,
}

impl From<dsar_requests::Model> for DsarRequestDto {
    fn from(model: dsar_requests::Model) -> Self {
        let status = model.status.parse().unwrap_or(DsarStatus::New);
        let overdue = !matches!(status, DsarStatus::Completed | DsarStatus::Rejected)
            && model.deadline < chrono::Utc::now().to_rfc3339();

        Self {
            id: model.id,
            protocol_number: model.protocol_number,
            subject_name: model.subject_name,
            subject_email: model.subject_email,
            request_type: model.request_type,
            status,
            deadline: model.deadline,
            overdue,
            response_content: model.response_content,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VendorDto {
    pub id: String,
    pub name: String,
    pub service_provided: String,
    pub risk_level: IncidentSeverity,
    pub has_signed_dpa: bool,
}

impl From<vendors::Model> for VendorDto {
    fn from(model: vendors::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            service_provided: model.service_provided,
            risk_level: model.risk_level.parse().unwrap_or(IncidentSeverity::Medium),
            has_signed_dpa: model.has_signed_dpa,
        }
    }
}

/// One labelled bucket in a dashboard breakdown.
#[derive(Debug, Serialize)]
pub struct BreakdownBucket {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub mapped_processes: u64,
    pub open_incidents: u64,
    pub critical_incidents: u64,
    pub incidents_by_severity: Vec<BreakdownBucket>,
    pub processes_by_department: Vec<BreakdownBucket>,
    pub published_awareness_posts: u64,
    pub open_dsar_requests: u64,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub tenant_users: usize,
    pub mapped_processes: usize,
    pub incidents: usize,
    pub documents: usize,
    pub awareness_posts: usize,
    pub ai_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct LogDto {
    pub id: i64,
    pub event_type: String,
    pub level: String,
    pub message: String,
    pub details: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub logs: Vec<LogDto>,
    pub total_pages: u64,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: Option<String>,
}
