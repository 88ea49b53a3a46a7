//! Typed domain vocabulary shared by services, DTOs and exports.
//!
//! Entities persist these as plain strings; everything above the repository
//! layer goes through the enums so an out-of-range value is rejected at
//! deserialization time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    CompanyAdmin,
    Dpo,
    User,
}

impl UserRole {
    /// Roles allowed to manage ROPA entries and legal documents.
    #[must_use]
    pub const fn can_manage_compliance(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::CompanyAdmin | Self::Dpo)
    }

    /// Roles allowed to change tenant settings and user accounts.
    #[must_use]
    pub const fn can_manage_settings(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::CompanyAdmin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    Investigating,
    Mitigated,
    Resolved,
    FalsePositive,
}

impl IncidentStatus {
    /// Human label used in audit-trail entries and report exports (pt-BR,
    /// matching the register's working language).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Aberto",
            Self::Investigating => "Investigando",
            Self::Mitigated => "Mitigado",
            Self::Resolved => "Resolvido",
            Self::FalsePositive => "Falso Positivo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DsarStatus {
    New,
    Validating,
    Processing,
    Completed,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    PrivacyPolicy,
    TermsOfUse,
    IncidentPlan,
    Dpia,
    RopaReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwarenessCategory {
    Security,
    PrivacyCulture,
    Governance,
    Compliance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Active,
    Trial,
    Suspended,
    Cancelled,
}

macro_rules! string_repr {
    ($ty:ty { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $(Self::$variant => $s),+
                };
                f.write_str(s)
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} value: {other}",
                        stringify!($ty)
                    )),
                }
            }
        }
    };
}

string_repr!(UserRole {
    SuperAdmin => "super_admin",
    CompanyAdmin => "company_admin",
    Dpo => "dpo",
    User => "user",
});

string_repr!(IncidentSeverity {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

string_repr!(IncidentStatus {
    Open => "open",
    Investigating => "investigating",
    Mitigated => "mitigated",
    Resolved => "resolved",
    FalsePositive => "false_positive",
});

string_repr!(DsarStatus {
    New => "new",
    Validating => "validating",
    Processing => "processing",
    Completed => "completed",
    Rejected => "rejected",
});

string_repr!(DocType {
    PrivacyPolicy => "privacy_policy",
    TermsOfUse => "terms_of_use",
    IncidentPlan => "incident_plan",
    Dpia => "dpia",
    RopaReport => "ropa_report",
});

string_repr!(AwarenessCategory {
    Security => "security",
    PrivacyCulture => "privacy_culture",
    Governance => "governance",
    Compliance => "compliance",
});

string_repr!(PlanStatus {
    Active => "active",
    Trial => "trial",
    Suspended => "suspended",
    Cancelled => "cancelled",
});

/// Multiple-choice quiz attached to an awareness post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    /// Exactly four options.
    pub options: Vec<String>,
    pub correct_answer_index: u8,
    pub explanation: String,
}

impl Quiz {
    /// A quiz is well-formed when it has exactly four options and the
    /// correct index points at one of them.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.options.len() == 4 && usize::from(self.correct_answer_index) < self.options.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub id: String,
    pub name: String,
    pub function: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub sidebar_color: String,
    pub sidebar_text_color: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityPolicy {
    pub mfa_enabled: bool,
    pub session_timeout_minutes: u32,
    /// "standard" or "strong".
    pub password_policy: String,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            mfa_enabled: false,
            session_timeout_minutes: 60,
            password_policy: "standard".to_string(),
        }
    }
}

/// Per-tenant settings blob, stored as JSON on the tenant row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TenantSettings {
    pub dpo_name: Option<String>,
    pub dpo_email: Option<String>,
    pub privacy_committee: Vec<CommitteeMember>,
    pub theme: Option<ThemeConfig>,
    pub security: Option<SecurityPolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            IncidentStatus::Open,
            IncidentStatus::Investigating,
            IncidentStatus::Mitigated,
            IncidentStatus::Resolved,
            IncidentStatus::FalsePositive,
        ] {
            let s = status.to_string();
            assert_eq!(s.parse::<IncidentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("escalated".parse::<IncidentStatus>().is_err());
    }

    #[test]
    fn role_permissions_match_navigation_matrix() {
        assert!(UserRole::Dpo.can_manage_compliance());
        assert!(!UserRole::Dpo.can_manage_settings());
        assert!(UserRole::CompanyAdmin.can_manage_settings());
        assert!(!UserRole::User.can_manage_compliance());
    }

    #[test]
    fn quiz_requires_four_options_and_valid_index() {
        let mut quiz = Quiz {
            question: "q".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: 3,
            explanation: "e".to_string(),
        };
        assert!(quiz.is_valid());

        quiz.correct_answer_index = 4;
        assert!(!quiz.is_valid());

        quiz.correct_answer_index = 0;
        quiz.options.pop();
        assert!(!quiz.is_valid());
    }
}
