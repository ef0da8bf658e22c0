//! Project records as persisted in the key/value store.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub mod keys;

pub use keys::{
    generate_project_id, parse_index, record_key, serialize_index, INDEX_KEY, RECORD_PREFIX,
};

/// Default share supply offered by a new draft.
pub const DEFAULT_TOTAL_SHARES: u64 = 1000;

/// A research project listing.
///
/// Serialized as camelCase JSON under `project_{id}`. The `id` is also derivable from the key;
/// records written by older clients may omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub encrypted_shares: String,
    pub total_shares: u64,
    pub owner: String,
    /// Creation time, unix seconds.
    pub timestamp: i64,
    pub category: String,
    /// Missing or `null` both read as no contributors.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contributors: Vec<Contributor>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Contributor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Contributor>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProjectRecord {
    /// Case-insensitive lookup of an existing contribution.
    pub fn contribution_of(&self, address: &str) -> Option<&Contributor> {
        self.contributors
            .iter()
            .find(|c| c.address.eq_ignore_ascii_case(address))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub address: String,
    pub encrypted_shares: String,
    /// `shares / totalShares * 100`, computed once at investment time.
    pub percentage: f64,
}

/// Categories a new project can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
pub enum Category {
    #[default]
    Biotech,
    #[serde(rename = "AI")]
    Ai,
    Physics,
    Chemistry,
    Mathematics,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Biotech,
        Category::Ai,
        Category::Physics,
        Category::Chemistry,
        Category::Mathematics,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Biotech => "Biotech",
            Category::Ai => "AI",
            Category::Physics => "Physics",
            Category::Chemistry => "Chemistry",
            Category::Mathematics => "Mathematics",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// User input for a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub total_shares: u64,
    pub category: Category,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            total_shares: DEFAULT_TOTAL_SHARES,
            category: Category::default(),
        }
    }

    pub fn with_total_shares(mut self, total_shares: u64) -> Self {
        self.total_shares = total_shares;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Name and description must both be non-blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("project name is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("project description is required".to_string());
        }
        Ok(())
    }
}
