//! Notice board entries and the holiday calendar.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub is_important: bool,
}

impl Notice {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        important: bool,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            title: title.into(),
            content: content.into(),
            date,
            is_important: important,
        }
    }
}

impl Identifiable for Notice {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub id: RecordId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: HolidayKind,
}

impl Holiday {
    pub fn new(name: impl Into<String>, date: NaiveDate, kind: HolidayKind) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            date,
            kind,
        }
    }
}

impl Identifiable for Holiday {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for Holiday {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.date, self.name, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HolidayKind {
    Restricted,
    Closed,
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HolidayKind::Restricted => "Restricted",
            HolidayKind::Closed => "Closed",
        };
        f.write_str(label)
    }
}
