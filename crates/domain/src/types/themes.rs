//! Dashboard theme types

use serde::{Deserialize, Serialize};

/// Dashboard theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlaCrityTheme {
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_embed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(default)]
    pub built_in: bool,
}

/// Response of the theme listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemesResponse {
    #[serde(default)]
    pub themes: Option<Vec<AlaCrityTheme>>,
}

/// Response of the current theme query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentThemeResponse {
    pub theme: AlaCrityTheme,
}
