//! App definition, deployment and log types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Environment variable of an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

/// Volume mounted into an app container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMapping {
    pub container_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Host to container port mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
}

/// Basic auth guarding an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpAuth {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Free-form app tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppTag {
    pub tag_name: String,
}

/// Deployed app as the server describes it
///
/// Only the fields the client writes back are typed; everything else the
/// server sends is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the app keeps data across restarts
    #[serde(default)]
    pub has_persistent_data: bool,
    #[serde(default)]
    pub instance_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alacran_definition_relative_file_path: Option<String>,
    /// Environment variables
    #[serde(default)]
    pub env_vars: Vec<EnvVar>,
    #[serde(default)]
    pub volumes: Vec<VolumeMapping>,
    #[serde(default)]
    pub ports: Vec<PortMapping>,
    #[serde(default)]
    pub not_expose_as_web_app: bool,
    #[serde(default)]
    pub force_ssl: bool,
    #[serde(default)]
    pub websocket_support: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_push_webhook: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_nginx_config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_deploy_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_update_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_http_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_auth: Option<HttpAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_deploy_token_config: Option<Value>,
    #[serde(default)]
    pub tags: Vec<AppTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_domain: Option<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the app listing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDefinitionsResponse {
    #[serde(default)]
    pub app_definitions: Vec<AppDefinition>,
    #[serde(default)]
    pub root_domain: String,
    #[serde(default)]
    pub alacran_sub_domain: String,
    #[serde(default)]
    pub default_nginx_config: String,
}

/// Response of an app deletion
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDeleteResponse {
    /// Volumes the server could not remove
    #[serde(default)]
    pub volumes_failed_to_delete: Vec<String>,
}

/// Tail of a build log
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogs {
    #[serde(default)]
    pub first_line_number: i64,
    #[serde(default)]
    pub lines: Vec<String>,
}

/// Build progress of an app
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogsResponse {
    #[serde(default)]
    pub is_app_building: bool,
    #[serde(default)]
    pub is_build_failed: bool,
    #[serde(default)]
    pub logs: BuildLogs,
}

/// Container logs, hex encoded when requested with `encoding=hex`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: String,
}

/// Build recipe uploaded instead of a source archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlacranDefinition {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile_lines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Git repository used as an image source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    pub repo: String,
    pub branch: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
}

/// Source archive already uploaded to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedTarPathSource {
    pub uploaded_tar_path: String,
    pub git_hash: String,
}

/// Definition file sent inline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlacranDefinitionContentSource {
    pub alacran_definition_content: String,
    pub git_hash: String,
}

/// Where a build takes its source from; at most one field is set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_tar_path_source: Option<UploadedTarPathSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alacran_definition_content_source: Option<AlacranDefinitionContentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_info_source: Option<RepoInfo>,
}
