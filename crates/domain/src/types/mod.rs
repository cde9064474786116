//! Domain types and models
//!
//! The envelope every response arrives in, and the payload models of the
//! typed API methods.

pub mod apps;
pub mod envelope;
pub mod projects;
pub mod registries;
pub mod system;
pub mod themes;

pub use apps::{
    AlacranDefinition, AlacranDefinitionContentSource, AppDefinition, AppDefinitionsResponse,
    AppDeleteResponse, AppTag, BuildLogs, BuildLogsResponse, EnvVar, HttpAuth, ImageSource,
    LogsResponse, PortMapping, RepoInfo, UploadedTarPathSource, VolumeMapping,
};
pub use envelope::{Envelope, EnvelopeStatus};
pub use projects::{ProjectDefinition, ProjectsResponse};
pub use registries::{RegistriesResponse, RegistryInfo, RegistryType};
pub use system::{
    AlacranInfo, AutomatedCleanupConfigs, BackupResponse, GoAccessInfo, GoAccessReportResponse,
    GoAccessSettings, LoadBalancerInfo, NetDataInfo, NginxConfig, NginxConfigSection, NodesResponse,
    ServerDockerInfo, UnusedImage, UnusedImagesResponse,
};
pub use themes::{AlaCrityTheme, CurrentThemeResponse, ThemesResponse};
