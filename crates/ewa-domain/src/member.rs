//! Association member records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: RecordId,
    pub name: String,
    pub designation: String,
    pub place_of_posting: String,
    /// Reservation category as recorded by the association (e.g. `SC`, `ST`).
    pub category: String,
    pub mobile: String,
    pub joined_date: DateTime<Utc>,
    #[serde(default)]
    pub role: MemberRole,
}

impl Member {
    pub const DEFAULT_DESIGNATION: &'static str = "Member";
    pub const DEFAULT_POSTING: &'static str = "Unknown";
    pub const DEFAULT_CATEGORY: &'static str = "SC";

    /// Creates a member with the registration form's fallbacks for blank fields.
    pub fn new(name: impl Into<String>, mobile: impl Into<String>, joined: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            designation: Self::DEFAULT_DESIGNATION.into(),
            place_of_posting: Self::DEFAULT_POSTING.into(),
            category: Self::DEFAULT_CATEGORY.into(),
            mobile: mobile.into(),
            joined_date: joined,
            role: MemberRole::Member,
        }
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = non_blank_or(designation.into(), Self::DEFAULT_DESIGNATION);
        self
    }

    pub fn with_posting(mut self, posting: impl Into<String>) -> Self {
        self.place_of_posting = non_blank_or(posting.into(), Self::DEFAULT_POSTING);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank_or(category.into(), Self::DEFAULT_CATEGORY);
        self
    }

    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = role;
        self
    }

    pub fn mobile_digits(&self) -> String {
        mobile_digits(&self.mobile)
    }

    pub fn is_liaison(&self) -> bool {
        self.role == MemberRole::Liaison
    }
}

fn non_blank_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

impl Identifiable for Member {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for Member {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.designation, self.place_of_posting)
    }
}

/// Access role stored on a member record. Managers are not members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    #[default]
    Member,
    Liaison,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberRole::Member => "Member",
            MemberRole::Liaison => "Liaison",
        };
        f.write_str(label)
    }
}
