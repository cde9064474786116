//! Docker registry types

use serde::{Deserialize, Serialize};

/// Whether the registry is the self-hosted one or an external service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryType {
    /// Self-hosted registry
    #[serde(rename = "LOCAL_REG")]
    Local,
    /// External registry
    #[serde(rename = "REMOTE_REG")]
    Remote,
}

/// Docker registry credentials and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryInfo {
    /// Empty when inserting a new registry
    #[serde(default)]
    pub id: String,
    pub registry_user: String,
    pub registry_password: String,
    pub registry_domain: String,
    #[serde(default)]
    pub registry_image_prefix: String,
    pub registry_type: RegistryType,
}

/// Response of the registry listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistriesResponse {
    #[serde(default)]
    pub registries: Vec<RegistryInfo>,
    /// Registry that new images are pushed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_registry_id: Option<String>,
}
