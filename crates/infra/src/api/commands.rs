//! Typed API operations
//!
//! One method per server endpoint. Every call goes through the shared
//! [`Transport`], so all of them get the same auth, retry and destroy
//! handling.

use std::sync::Arc;

use alacrity_domain::constants::{APP_SOURCE_FIELD, BACKUP_FILE_NAME, DETACHED_QUERY};
use alacrity_domain::{
    AlaCrityTheme, AlacranDefinition, AlacranInfo, AppDefinition, AppDefinitionsResponse,
    AppDeleteResponse, AppTag, AutomatedCleanupConfigs, BackupResponse, BuildLogsResponse,
    ClientConfig, CurrentThemeResponse, EnvVar, GoAccessInfo, GoAccessReportResponse, HttpAuth,
    LoadBalancerInfo, LogsResponse, NetDataInfo, NginxConfig, NodesResponse, PortMapping,
    ProjectDefinition, ProjectsResponse, RegistriesResponse, RegistryInfo, ThemesResponse,
    UnusedImagesResponse, VolumeMapping,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};
use urlencoding::encode;

use super::auth::{Credentials, TokenProvider};
use super::client::Transport;
use super::errors::ApiError;
use super::request::{ApiRequest, FilePart, Payload, Verb};

/// Body of `update_config_and_save`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppDefinitionUpdate<'a> {
    app_name: &'a str,
    instance_count: u32,
    alacran_definition_relative_file_path: Option<&'a str>,
    not_expose_as_web_app: bool,
    force_ssl: bool,
    websocket_support: bool,
    volumes: &'a [VolumeMapping],
    ports: &'a [PortMapping],
    custom_nginx_config: Option<&'a str>,
    app_push_webhook: Option<&'a Value>,
    node_id: Option<&'a str>,
    pre_deploy_function: Option<&'a str>,
    service_update_override: Option<&'a str>,
    container_http_port: Option<u16>,
    description: Option<&'a str>,
    http_auth: Option<&'a HttpAuth>,
    env_vars: &'a [EnvVar],
    app_deploy_token_config: Option<&'a Value>,
    tags: &'a [AppTag],
    redirect_domain: Option<&'a str>,
    project_id: Option<&'a str>,
}

impl<'a> AppDefinitionUpdate<'a> {
    fn new(app_name: &'a str, app: &'a AppDefinition) -> Self {
        Self {
            app_name,
            instance_count: app.instance_count,
            alacran_definition_relative_file_path: app
                .alacran_definition_relative_file_path
                .as_deref(),
            not_expose_as_web_app: app.not_expose_as_web_app,
            force_ssl: app.force_ssl,
            websocket_support: app.websocket_support,
            volumes: &app.volumes,
            ports: &app.ports,
            custom_nginx_config: app.custom_nginx_config.as_deref(),
            app_push_webhook: app.app_push_webhook.as_ref(),
            node_id: app.node_id.as_deref(),
            pre_deploy_function: app.pre_deploy_function.as_deref(),
            service_update_override: app.service_update_override.as_deref(),
            container_http_port: app.container_http_port,
            description: app.description.as_deref(),
            http_auth: app.http_auth.as_ref(),
            env_vars: &app.env_vars,
            app_deploy_token_config: app.app_deploy_token_config.as_ref(),
            tags: &app.tags,
            redirect_domain: app.redirect_domain.as_deref(),
            project_id: app.project_id.as_deref(),
        }
    }
}

/// Body of `add_docker_node`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDockerNodeRequest {
    /// `manager` or `worker`
    pub node_type: String,
    /// SSH key used to join the node
    pub private_key: String,
    /// Address of the node to add
    pub remote_node_ip_address: String,
    /// SSH port on the node
    pub ssh_port: String,
    /// SSH user on the node
    pub ssh_user: String,
    /// Address of the leader as seen by the node
    pub alacran_ip_address: String,
}

/// Typed client for the platform-management API
#[derive(Debug, Clone)]
pub struct AlacrityApi {
    transport: Arc<Transport>,
}

impl AlacrityApi {
    /// Create a client for `config`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration is invalid
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        Ok(Self::with_transport(Arc::new(Transport::new(config, tokens)?)))
    }

    /// Client over an existing transport
    pub fn with_transport(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Underlying transport
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Tear down the underlying transport
    pub fn destroy(&self) {
        self.transport.destroy();
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let data = self.transport.issue(&request).await?;
        serde_json::from_value(data).map_err(|err| {
            ApiError::Decode(format!("unexpected response from {}: {err}", request.endpoint()))
        })
    }

    async fn fetch_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.transport.issue(&request).await.map(|_| ())
    }

    async fn post_json(&self, endpoint: impl Into<String>, body: Value) -> Result<(), ApiError> {
        self.fetch_unit(ApiRequest::post(endpoint).with_json(&body)?).await
    }

    // === Session ===

    /// Log in with a password and store the returned token
    ///
    /// # Errors
    ///
    /// Returns the server's rejection, e.g. wrong password
    pub async fn login(&self, password: &str) -> Result<(), ApiError> {
        self.transport.login(&Credentials::new(password)).await
    }

    // === Themes ===

    /// List dashboard themes
    pub async fn get_all_themes(&self) -> Result<ThemesResponse, ApiError> {
        self.fetch(ApiRequest::get("/user/system/themes/all")).await
    }

    /// Theme currently in use
    pub async fn get_current_theme(&self) -> Result<CurrentThemeResponse, ApiError> {
        self.fetch(ApiRequest::get("/theme/current")).await
    }

    /// Switch the dashboard theme
    pub async fn set_current_theme(&self, theme_name: &str) -> Result<(), ApiError> {
        self.post_json("/user/system/themes/setcurrent", json!({ "themeName": theme_name })).await
    }

    /// Create or replace a theme; `old_name` is the name being replaced
    pub async fn save_theme(&self, old_name: &str, theme: &AlaCrityTheme) -> Result<(), ApiError> {
        self.post_json(
            "/user/system/themes/update",
            json!({ "oldName": old_name, "name": theme.name, "content": theme.content }),
        )
        .await
    }

    /// Delete a theme
    pub async fn delete_theme(&self, theme_name: &str) -> Result<(), ApiError> {
        self.post_json("/user/system/themes/delete", json!({ "themeName": theme_name })).await
    }

    // === Root domain and SSL ===

    /// Root domain and SSL state
    pub async fn get_alacran_info(&self) -> Result<AlacranInfo, ApiError> {
        self.fetch(ApiRequest::get("/user/system/info")).await
    }

    /// Change the root domain
    pub async fn update_root_domain(&self, root_domain: &str, force: bool) -> Result<(), ApiError> {
        self.post_json(
            "/user/system/changerootdomain",
            json!({ "rootDomain": root_domain, "force": force }),
        )
        .await
    }

    /// Enable SSL for the root domain
    pub async fn enable_root_ssl(&self, email_address: &str) -> Result<(), ApiError> {
        self.post_json("/user/system/enablessl", json!({ "emailAddress": email_address })).await
    }

    /// Force HTTPS for the dashboard
    pub async fn force_ssl(&self, is_enabled: bool) -> Result<(), ApiError> {
        self.post_json("/user/system/forcessl", json!({ "isEnabled": is_enabled })).await
    }

    // === Apps ===

    /// List all apps
    pub async fn get_all_apps(&self) -> Result<AppDefinitionsResponse, ApiError> {
        self.fetch(ApiRequest::get("/user/apps/appDefinitions")).await
    }

    /// Build logs of an app
    pub async fn fetch_build_logs(&self, app_name: &str) -> Result<BuildLogsResponse, ApiError> {
        self.fetch(ApiRequest::get(format!("/user/apps/appData/{}", encode(app_name)))).await
    }

    /// Runtime logs of an app, hex encoded
    pub async fn fetch_app_logs_in_hex(&self, app_name: &str) -> Result<LogsResponse, ApiError> {
        let endpoint = format!("/user/apps/appData/{}/logs?encoding=hex", encode(app_name));
        self.fetch(ApiRequest::get(endpoint)).await
    }

    /// Upload a source tarball and start a detached build
    #[instrument(skip(self, bytes), fields(app = %app_name, len = bytes.len()))]
    pub async fn upload_app_data(
        &self,
        app_name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let endpoint = format!("/user/apps/appData/{}{DETACHED_QUERY}", encode(app_name));
        let file = FilePart::new(APP_SOURCE_FIELD, file_name, bytes)
            .with_mime_type("application/x-tar");

        self.fetch_unit(ApiRequest::post(endpoint).with_payload(Payload::Multipart(vec![file])))
            .await
    }

    /// Deploy from an inline definition instead of an uploaded tarball
    pub async fn upload_alacran_definition_content(
        &self,
        app_name: &str,
        definition: &AlacranDefinition,
        git_hash: &str,
        detached: bool,
    ) -> Result<(), ApiError> {
        let endpoint = format!(
            "/user/apps/appData/{}{}",
            encode(app_name),
            if detached { DETACHED_QUERY } else { "" }
        );
        let content = serde_json::to_string(definition)?;

        self.post_json(endpoint, json!({ "alacranDefinitionContent": content, "gitHash": git_hash }))
            .await
    }

    /// Replace the configuration of an app
    #[instrument(skip(self, definition), fields(app = %app_name))]
    pub async fn update_config_and_save(
        &self,
        app_name: &str,
        definition: &AppDefinition,
    ) -> Result<(), ApiError> {
        let body = AppDefinitionUpdate::new(app_name, definition);
        self.fetch_unit(ApiRequest::post("/user/apps/appDefinitions/update").with_json(&body)?)
            .await
    }

    /// Rename an app
    pub async fn rename_app(&self, old_app_name: &str, new_app_name: &str) -> Result<(), ApiError> {
        self.post_json(
            "/user/apps/appDefinitions/rename",
            json!({ "oldAppName": old_app_name, "newAppName": new_app_name }),
        )
        .await
    }

    /// Register a new app
    #[instrument(skip(self))]
    pub async fn register_new_app(
        &self,
        app_name: &str,
        project_id: &str,
        has_persistent_data: bool,
        detached: bool,
    ) -> Result<(), ApiError> {
        let endpoint = format!(
            "/user/apps/appDefinitions/register{}",
            if detached { DETACHED_QUERY } else { "" }
        );
        self.post_json(
            endpoint,
            json!({
                "appName": app_name,
                "projectId": project_id,
                "hasPersistentData": has_persistent_data,
            }),
        )
        .await
    }

    /// Delete one app (`app_name`) or several (`app_names`) with the listed
    /// volumes
    #[instrument(skip(self))]
    pub async fn delete_app(
        &self,
        app_name: Option<&str>,
        volumes: &[String],
        app_names: Option<&[String]>,
    ) -> Result<AppDeleteResponse, ApiError> {
        let body = json!({ "appName": app_name, "volumes": volumes, "appNames": app_names });
        let response: AppDeleteResponse =
            self.fetch(ApiRequest::post("/user/apps/appDefinitions/delete").with_json(&body)?).await?;

        if !response.volumes_failed_to_delete.is_empty() {
            debug!(failed = ?response.volumes_failed_to_delete, "some volumes were not deleted");
        }
        Ok(response)
    }

    /// Enable SSL on the app's default subdomain
    pub async fn enable_ssl_for_base_domain(&self, app_name: &str) -> Result<(), ApiError> {
        self.post_json(
            "/user/apps/appDefinitions/enablebasedomainssl",
            json!({ "appName": app_name }),
        )
        .await
    }

    /// Attach a custom domain
    pub async fn attach_new_custom_domain_to_app(
        &self,
        app_name: &str,
        custom_domain: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            "/user/apps/appDefinitions/customdomain",
            json!({ "appName": app_name, "customDomain": custom_domain }),
        )
        .await
    }

    /// Enable SSL on a custom domain
    pub async fn enable_ssl_for_custom_domain(
        &self,
        app_name: &str,
        custom_domain: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            "/user/apps/appDefinitions/enablecustomdomainssl",
            json!({ "appName": app_name, "customDomain": custom_domain }),
        )
        .await
    }

    /// Remove a custom domain
    pub async fn remove_custom_domain(
        &self,
        app_name: &str,
        custom_domain: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            "/user/apps/appDefinitions/removecustomdomain",
            json!({ "appName": app_name, "customDomain": custom_domain }),
        )
        .await
    }

    /// Images no longer used by any app, keeping the newest `most_recent_limit`
    pub async fn get_unused_images(
        &self,
        most_recent_limit: u32,
    ) -> Result<UnusedImagesResponse, ApiError> {
        let request = ApiRequest::get("/user/apps/appDefinitions/unusedImages")
            .with_json(&json!({ "mostRecentLimit": most_recent_limit }))?;
        self.fetch(request).await
    }

    /// Delete unused images
    pub async fn delete_images(&self, image_ids: &[String]) -> Result<(), ApiError> {
        self.post_json("/user/apps/appDefinitions/deleteImages", json!({ "imageIds": image_ids }))
            .await
    }

    /// Trigger a build through an app's push webhook path
    pub async fn force_build(&self, webhook_path: &str) -> Result<(), ApiError> {
        self.post_json(webhook_path, json!({})).await
    }

    // === Projects ===

    /// List projects
    pub async fn get_all_projects(&self) -> Result<ProjectsResponse, ApiError> {
        self.fetch(ApiRequest::get("/user/projects")).await
    }

    /// Create a project
    pub async fn register_project(
        &self,
        project: &ProjectDefinition,
    ) -> Result<ProjectDefinition, ApiError> {
        self.fetch(ApiRequest::post("/user/projects/register").with_json(project)?).await
    }

    /// Update a project
    pub async fn update_project(&self, project: &ProjectDefinition) -> Result<(), ApiError> {
        self.post_json("/user/projects/update", json!({ "projectDefinition": project })).await
    }

    /// Delete projects
    pub async fn delete_projects(&self, project_ids: &[String]) -> Result<(), ApiError> {
        self.post_json("/user/projects/delete", json!({ "projectIds": project_ids })).await
    }

    // === Monitoring ===

    /// nginx connection counters
    pub async fn get_load_balancer_info(&self) -> Result<LoadBalancerInfo, ApiError> {
        self.fetch(ApiRequest::get("/user/system/loadbalancerinfo")).await
    }

    /// NetData monitoring settings
    pub async fn get_net_data_info(&self) -> Result<NetDataInfo, ApiError> {
        self.fetch(ApiRequest::get("/user/system/netdata")).await
    }

    /// Update NetData settings
    pub async fn update_net_data_info(&self, info: &NetDataInfo) -> Result<(), ApiError> {
        self.post_json("/user/system/netdata", json!({ "netDataInfo": info })).await
    }

    /// GoAccess settings
    pub async fn get_go_access_info(&self) -> Result<GoAccessInfo, ApiError> {
        self.fetch(ApiRequest::get("/user/system/goaccess")).await
    }

    /// Update GoAccess settings
    pub async fn update_go_access_info(&self, info: &GoAccessInfo) -> Result<(), ApiError> {
        self.post_json("/user/system/goaccess", json!({ "goAccessInfo": info })).await
    }

    /// GoAccess reports available for an app
    pub async fn get_go_access_reports(
        &self,
        app_name: &str,
    ) -> Result<Vec<GoAccessReportResponse>, ApiError> {
        let endpoint = format!("/user/system/goaccess/{}/files", encode(app_name));
        self.fetch(ApiRequest::get(endpoint)).await
    }

    /// Rendered report; `report_url` comes from [`get_go_access_reports`](Self::get_go_access_reports)
    pub async fn get_go_access_report(&self, report_url: &str) -> Result<String, ApiError> {
        self.fetch(ApiRequest::get(report_url)).await
    }

    // === Account and maintenance ===

    /// Change the dashboard password
    pub async fn change_pass(&self, old_password: &str, new_password: &str) -> Result<(), ApiError> {
        self.post_json(
            "/user/changepassword",
            json!({ "oldPassword": old_password, "newPassword": new_password }),
        )
        .await
    }

    /// Request a backup archive
    pub async fn create_backup(&self) -> Result<BackupResponse, ApiError> {
        let request = ApiRequest::post("/user/system/createbackup")
            .with_json(&json!({ "postDownloadFileName": BACKUP_FILE_NAME }))?;
        self.fetch(request).await
    }

    /// Current nginx configuration
    pub async fn get_nginx_config(&self) -> Result<NginxConfig, ApiError> {
        self.fetch(ApiRequest::get("/user/system/nginxconfig")).await
    }

    /// Replace the custom nginx configuration
    pub async fn set_nginx_config(
        &self,
        custom_base: &str,
        custom_alacran: &str,
    ) -> Result<(), ApiError> {
        self.post_json(
            "/user/system/nginxconfig",
            json!({
                "baseConfig": { "customValue": custom_base },
                "alacranConfig": { "customValue": custom_alacran },
            }),
        )
        .await
    }

    /// Automatic image cleanup settings
    pub async fn get_disk_clean_up_settings(&self) -> Result<AutomatedCleanupConfigs, ApiError> {
        self.fetch(ApiRequest::get("/user/system/diskcleanup")).await
    }

    /// Update automatic image cleanup
    pub async fn set_disk_clean_up_settings(
        &self,
        most_recent_limit: u32,
        cron_schedule: &str,
        timezone: &str,
    ) -> Result<(), ApiError> {
        let settings = AutomatedCleanupConfigs {
            most_recent_limit,
            cron_schedule: cron_schedule.to_owned(),
            timezone: timezone.to_owned(),
        };
        self.fetch_unit(ApiRequest::post("/user/system/diskcleanup").with_json(&settings)?).await
    }

    // === Docker registries ===

    /// List docker registries
    pub async fn get_docker_registries(&self) -> Result<RegistriesResponse, ApiError> {
        self.fetch(ApiRequest::get("/user/registries")).await
    }

    /// Enable the self-hosted registry
    pub async fn enable_self_hosted_docker_registry(&self) -> Result<(), ApiError> {
        self.post_json("/user/system/selfhostregistry/enableregistry", json!({})).await
    }

    /// Disable the self-hosted registry
    pub async fn disable_self_hosted_docker_registry(&self) -> Result<(), ApiError> {
        self.post_json("/user/system/selfhostregistry/disableregistry", json!({})).await
    }

    /// Add a registry
    pub async fn add_docker_registry(&self, registry: &RegistryInfo) -> Result<(), ApiError> {
        self.fetch_unit(ApiRequest::post("/user/registries/insert").with_json(registry)?).await
    }

    /// Update a registry
    pub async fn update_docker_registry(&self, registry: &RegistryInfo) -> Result<(), ApiError> {
        self.fetch_unit(ApiRequest::post("/user/registries/update").with_json(registry)?).await
    }

    /// Delete a registry
    pub async fn delete_docker_registry(&self, registry_id: &str) -> Result<(), ApiError> {
        self.post_json("/user/registries/delete", json!({ "registryId": registry_id })).await
    }

    /// Make a registry the default push target
    pub async fn set_default_push_docker_registry(&self, registry_id: &str) -> Result<(), ApiError> {
        self.post_json("/user/registries/setpush", json!({ "registryId": registry_id })).await
    }

    // === Cluster nodes ===

    /// List cluster nodes
    pub async fn get_all_nodes(&self) -> Result<NodesResponse, ApiError> {
        self.fetch(ApiRequest::get("/user/system/nodes")).await
    }

    /// Join a node to the cluster
    #[instrument(skip(self, node), fields(node_type = %node.node_type, ip = %node.remote_node_ip_address))]
    pub async fn add_docker_node(&self, node: &AddDockerNodeRequest) -> Result<(), ApiError> {
        self.fetch_unit(ApiRequest::post("/user/system/nodes").with_json(node)?).await
    }

    // === Escape hatch ===

    /// Issue any request the typed methods do not cover
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for verbs other than GET and POST,
    /// or when `data` is not a JSON object or null
    #[instrument(skip(self, data))]
    pub async fn execute_generic_api_command(
        &self,
        verb: &str,
        endpoint: &str,
        data: Value,
    ) -> Result<Value, ApiError> {
        let verb: Verb = verb.parse()?;
        let request = ApiRequest::new(verb, endpoint, Payload::from_serialize(&data)?);
        self.transport.issue(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_definition_update_body() {
        let app = AppDefinition {
            instance_count: 2,
            force_ssl: true,
            container_http_port: Some(3000),
            env_vars: vec![EnvVar { key: "A".into(), value: "1".into() }],
            ..Default::default()
        };

        let body = serde_json::to_value(AppDefinitionUpdate::new("web", &app)).unwrap();

        assert_eq!(body["appName"], "web");
        assert_eq!(body["instanceCount"], 2);
        assert_eq!(body["forceSsl"], true);
        assert_eq!(body["containerHttpPort"], 3000);
        assert_eq!(body["envVars"], json!([{"key": "A", "value": "1"}]));
        assert_eq!(body["projectId"], Value::Null);
    }

    #[test]
    fn test_add_docker_node_body_is_camel_case() {
        let node = AddDockerNodeRequest {
            node_type: "worker".into(),
            private_key: "key".into(),
            remote_node_ip_address: "10.0.0.2".into(),
            ssh_port: "22".into(),
            ssh_user: "root".into(),
            alacran_ip_address: "10.0.0.1".into(),
        };

        let body = serde_json::to_value(&node).unwrap();
        assert_eq!(
            body,
            json!({
                "nodeType": "worker",
                "privateKey": "key",
                "remoteNodeIpAddress": "10.0.0.2",
                "sshPort": "22",
                "sshUser": "root",
                "alacranIpAddress": "10.0.0.1",
            })
        );
    }
}
