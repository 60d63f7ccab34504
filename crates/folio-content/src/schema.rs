//! Frontmatter schemas for each collection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A long-form article.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Writing {
    pub title: String,

    /// Used for SEO, previews, and the feed
    pub description: String,

    #[serde(deserialize_with = "coerce_date")]
    pub publish_date: NaiveDate,

    #[serde(default, deserialize_with = "coerce_optional_date")]
    pub updated_date: Option<NaiveDate>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Drafts are hidden from production output
    #[serde(default)]
    pub draft: bool,
}

/// A project case study.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub role: String,
    pub year: i32,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub team_size: Option<u32>,
    pub outcome_summary: String,
    pub overview: String,
    pub problem: String,
    pub constraints: Vec<String>,
    pub approach: String,
    pub key_decisions: Vec<KeyDecision>,
    pub tech_stack: Vec<String>,
    pub impact: Impact,
    pub learnings: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Lower sorts first
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub related_projects: Option<Vec<String>>,
    #[serde(default)]
    pub related_writing: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct KeyDecision {
    pub decision: String,
    pub reasoning: String,
    #[serde(default)]
    pub alternatives: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Impact {
    #[serde(default)]
    pub metrics: Option<Vec<Metric>>,
    pub qualitative: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Completed,
    Ongoing,
    Archived,
}

/// An opinion piece.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rant {
    pub title: String,
    #[serde(deserialize_with = "coerce_date")]
    pub date: NaiveDate,
    pub context: String,
    pub rant: String,
    pub reasoning: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub related_projects: Option<Vec<String>>,
    #[serde(default)]
    pub related_rants: Option<Vec<String>>,
}

/// A short note.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Note {
    #[serde(deserialize_with = "coerce_date")]
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
}

/// One category on the uses page.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Uses {
    pub category: UsesCategory,
    pub items: Vec<UsesItem>,
    pub order: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UsesCategory {
    Tools,
    Stack,
    Environment,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UsesItem {
    pub name: String,
    pub description: String,
    #[serde(default, deserialize_with = "absolute_url")]
    pub url: Option<String>,
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp (normalized to UTC).
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("invalid date `{raw}`"))
}

fn coerce_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

fn coerce_optional_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

fn absolute_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    url::Url::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid url `{raw}`: {e}")))?;
    Ok(Some(raw))
}
