//! Group model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub location: String,
    pub chronic: String,
    /// Owning user; approves or denies join requests
    pub master: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub location: String,
    pub chronic: String,
    pub master: i64,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, master: i64) -> Self {
        Self {
            name: name.into(),
            master,
            ..Default::default()
        }
    }
}
