//! Wire types for the checkup backend
//!
//! These mirror the JSON the backend produces. Values the backend computes
//! (score, risk band, cost ranges) are carried as-is; the client never
//! derives them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organization profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub owner: i64,
    pub name: String,
    pub business_type: String,
    pub employee_count: u32,
    pub revenue_range: String,
    pub work_style: String,
    pub downtime_impact: String,
    pub primary_domain: String,
    #[serde(default)]
    pub saas_stack: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Fields sent when creating or updating an organization; unset fields are
/// left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrganizationDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downtime_impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saas_stack: Option<BTreeMap<String, String>>,
}

/// One checkup run for an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub organization: Organization,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    pub score: u32,
    pub risk_band: String,
    pub breach_cost_low: u64,
    pub breach_cost_high: u64,
    pub downtime_days_low: u32,
    pub downtime_days_high: u32,
    pub insurance_readiness: String,
    #[serde(default)]
    pub checklist_notes: BTreeMap<String, String>,
}

impl Assessment {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A remediation item attached to a completed assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: i64,
    pub key: String,
    pub title: String,
    pub severity: String,
    pub category: String,
    pub impact: String,
    pub time_to_fix_minutes: u32,
    pub estimated_risk_reduction_pct: u32,
    pub explanation: String,
    #[serde(default)]
    pub remediation_steps: Vec<String>,
    pub priority_score: f64,
}

/// External scan of an organization's domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRun {
    pub id: i64,
    pub organization: i64,
    pub scanned_at: DateTime<Utc>,
    pub overall_scan_status: String,
    #[serde(default)]
    pub dns_results: Option<serde_json::Value>,
    #[serde(default)]
    pub tls_results: Option<serde_json::Value>,
    #[serde(default)]
    pub website_headers: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRun {
    pub id: i64,
    pub organization: i64,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    #[serde(default)]
    pub top_risks: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Latest assessment summary shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestAssessment {
    pub score: u32,
    pub risk_band: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOrg {
    pub id: i64,
    pub name: String,
    pub primary_domain: String,
    pub business_type: String,
    pub latest_assessment: Option<LatestAssessment>,
}

/// Task tools an organization can push findings to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationProvider {
    #[display("trello")]
    Trello,
    #[display("jira")]
    Jira,
    #[display("google_tasks")]
    GoogleTasks,
}

impl std::str::FromStr for IntegrationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trello" => Ok(Self::Trello),
            "jira" => Ok(Self::Jira),
            "google_tasks" => Ok(Self::GoogleTasks),
            other => Err(format!("Unknown integration provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgIntegration {
    pub id: i64,
    pub provider: IntegrationProvider,
    pub connected: bool,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedIntegration {
    pub id: i64,
    pub provider: IntegrationProvider,
    pub connected: bool,
}

/// Reference to a ticket created in a task tool; which fields are set
/// depends on the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTicket {
    pub provider: String,
    pub finding_key: String,
    #[serde(flatten)]
    pub ticket: TicketRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowError {
    pub provider: String,
    pub finding_key: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    #[serde(default)]
    pub created: Vec<CreatedTicket>,
    #[serde(default)]
    pub errors: Vec<WorkflowError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingSuggestions {
    pub finding_key: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// AI suggestions come back for one finding or for all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiSuggestions {
    All { findings: Vec<FindingSuggestions> },
    Single(FindingSuggestions),
}

impl AiSuggestions {
    pub fn into_findings(self) -> Vec<FindingSuggestions> {
        match self {
            AiSuggestions::All { findings } => findings,
            AiSuggestions::Single(one) => vec![one],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockTagResult {
    pub success: bool,
    pub message: String,
}
