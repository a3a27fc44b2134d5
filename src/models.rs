use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Medical,
    Education,
    Food,
    Shelter,
    Clothing,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
}

/// A funding request filed by an orphanage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Issue {
    pub id: String,
    pub orphanage_id: String,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: Priority,
    pub status: IssueStatus,
    pub estimated_cost: f64,
    /// Running total of completed donations, maintained as donations complete.
    #[serde(default)]
    pub raised_amount: f64,
    pub deadline: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Donation {
    pub id: String,
    /// Absent for anonymous donations.
    pub donor_id: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    pub amount: f64,
    pub currency: String,
    pub message: Option<String>,
    /// Issue this donation is earmarked for, if any.
    pub issue_id: Option<String>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Orphanage {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub address: Option<String>,
    pub children_count: u32,
    pub staff_count: u32,
    /// Set by an administrator after reviewing the registration.
    #[serde(default)]
    pub verified: bool,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A published record of a fully funded, resolved issue. Orphanage and issue
/// names are denormalized so stories stay readable if their sources go away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SuccessStory {
    pub id: String,
    pub orphanage_id: String,
    pub orphanage_name: String,
    pub issue_id: Option<String>,
    pub issue_title: Option<String>,
    pub title: String,
    pub description: String,
    pub impact: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub beneficiaries: u32,
    pub cost: f64,
    pub completed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
