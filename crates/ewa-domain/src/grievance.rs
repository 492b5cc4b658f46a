//! Grievances raised on behalf of members and their resolution trail.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::member::Member;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grievance {
    pub id: RecordId,
    pub member_id: RecordId,
    /// Name of the member when the grievance was reported. Kept as an audit
    /// copy; later renames of the member do not rewrite it.
    pub member_name: String,
    pub description: String,
    /// Section or department the problem pertains to.
    pub formation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addressed_to: Option<String>,
    pub date_reported: DateTime<Utc>,
    pub status: GrievanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_resolved: Option<DateTime<Utc>>,
}

impl Grievance {
    /// Opens a pending grievance for `member`, snapshotting the member's name.
    pub fn report(
        member: &Member,
        description: impl Into<String>,
        formation: impl Into<String>,
        addressed_to: Option<String>,
        reported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            member_id: member.id.clone(),
            member_name: member.name.clone(),
            description: description.into(),
            formation: formation.into(),
            addressed_to,
            date_reported: reported_at,
            status: GrievanceStatus::Pending,
            action_taken: None,
            date_resolved: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == GrievanceStatus::Pending
    }

    /// Marks the grievance resolved. Returns `false` and leaves the record
    /// untouched when it was already resolved.
    pub fn resolve(&mut self, action_taken: impl Into<String>, resolved_at: DateTime<Utc>) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = GrievanceStatus::Resolved;
        self.action_taken = Some(action_taken.into());
        self.date_resolved = Some(resolved_at);
        true
    }
}

impl Identifiable for Grievance {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for Grievance {
    fn display_label(&self) -> String {
        format!("grievance:{} [{}] {}", self.id, self.status, self.member_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrievanceStatus {
    Pending,
    Resolved,
}

impl fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GrievanceStatus::Pending => "Pending",
            GrievanceStatus::Resolved => "Resolved",
        };
        f.write_str(label)
    }
}
