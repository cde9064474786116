//! Protocol constants
//!
//! Header names, default paths and fixed request values shared by the
//! transport and the typed API client.

// Endpoints
/// Path prefix of every API endpoint
pub const DEFAULT_API_PATH: &str = "/api/v1";
/// Credential exchange endpoint
pub const DEFAULT_LOGIN_ENDPOINT: &str = "/login";

// Headers sent on every request
/// Header naming the API namespace
pub const NAMESPACE_HEADER: &str = "x-namespace";
/// Value of [`NAMESPACE_HEADER`]
pub const NAMESPACE_VALUE: &str = "alacran";
/// Header carrying the auth token
pub const TOKEN_HEADER: &str = "x-alacran-auth";

// Transport defaults
/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default `User-Agent`
pub const DEFAULT_USER_AGENT: &str = concat!("alacrity-client/", env!("CARGO_PKG_VERSION"));

// Fixed request values
/// Archive name requested by backups
pub const BACKUP_FILE_NAME: &str = "backup.tar";
/// Multipart field holding an app source archive
pub const APP_SOURCE_FIELD: &str = "sourceFile";
/// Query marking a build as detached
pub const DETACHED_QUERY: &str = "?detached=1";
