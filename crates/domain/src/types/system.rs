//! Server-wide settings and status types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root domain and SSL state of the server
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlacranInfo {
    #[serde(default)]
    pub has_root_ssl: bool,
    #[serde(default)]
    pub force_ssl: bool,
    #[serde(default)]
    pub root_domain: String,
    #[serde(default)]
    pub alacran_sub_domain: String,
}

/// Nginx stub-status counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadBalancerInfo {
    pub active_connections: u64,
    pub accepted: u64,
    pub handled: u64,
    pub total: u64,
    pub reading: u64,
    pub writing: u64,
    pub waiting: u64,
}

/// NetData monitoring settings
///
/// `data` holds the notification channel settings, which the server treats
/// as an open-ended object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetDataInfo {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_data_url: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// GoAccess log analysis settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoAccessInfo {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub data: GoAccessSettings,
}

/// GoAccess log rotation settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoAccessSettings {
    #[serde(default)]
    pub rotation_frequency_cron: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_retention_days: Option<u32>,
}

/// One generated GoAccess report for an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoAccessReportResponse {
    pub name: String,
    /// Endpoint to pass to `get_go_access_report`
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<String>,
}

/// One editable nginx config block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NginxConfigSection {
    #[serde(default)]
    pub by_default: String,
    #[serde(default)]
    pub custom_value: String,
}

/// Base and dashboard nginx templates
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NginxConfig {
    #[serde(default)]
    pub base_config: NginxConfigSection,
    #[serde(default)]
    pub alacran_config: NginxConfigSection,
}

/// Docker swarm node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDockerInfo {
    pub node_id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub is_leader: bool,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(rename = "nodeIP", default)]
    pub node_ip: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub docker_engine_version: String,
    #[serde(default)]
    pub memory_bytes: u64,
    #[serde(default)]
    pub nano_cpu: u64,
}

/// Response of the node listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodesResponse {
    #[serde(default)]
    pub nodes: Vec<ServerDockerInfo>,
}

/// Schedule for pruning unused images
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedCleanupConfigs {
    pub most_recent_limit: u32,
    pub cron_schedule: String,
    pub timezone: String,
}

/// Docker image no app references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedImage {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Response of the unused image listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedImagesResponse {
    #[serde(default)]
    pub unused_images: Vec<UnusedImage>,
}

/// Response of a backup request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupResponse {
    /// Token to download the archive with
    pub download_token: String,
}
