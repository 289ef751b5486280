use serde::{Deserialize, Serialize};

use super::categories;

/// Publication state of an application in the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    Published,
    Pending,
    Draft,
    Rejected,
}

impl AppStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppStatus::Published => "published",
            AppStatus::Pending => "pending",
            AppStatus::Draft => "draft",
            AppStatus::Rejected => "rejected",
        }
    }
}

/// Application as returned by `/api/apps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// API category code, see [`categories`].
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub status: Option<AppStatus>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl App {
    pub fn display_category(&self) -> &'static str {
        categories::to_display_label(&self.category)
    }
}

/// Listing query for `/api/apps`. Unset fields are omitted from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AppStats {
    #[serde(default)]
    pub published: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub draft: u64,
    #[serde(default)]
    pub rejected: u64,
}

/// One page of applications with the catalogue-wide status counts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppPage {
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub stats: AppStats,
}

/// Body for `POST /api/apps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApp {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    pub version: String,
}

impl NewApp {
    /// Build a submission from a display category label, translating it to the API code.
    pub fn from_display_category(
        name: impl Into<String>,
        description: impl Into<String>,
        display_category: &str,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: categories::to_api_code(display_category).to_string(),
            demo_url: None,
            version: version.into(),
        }
    }
}

/// Partial body for `PUT /api/apps/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppStatus>,
}
