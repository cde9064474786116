//! Response envelope and status taxonomy
//!
//! Every API response body is `{status, description, data?}`. The status
//! partitions into a success family, the token-invalid code that triggers
//! re-authentication, and everything else, which is an application error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric status carried by an [`Envelope`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeStatus(pub i64);

impl EnvelopeStatus {
    /// Ordinary success
    pub const OKAY: Self = Self(100);
    /// Success; a build was started
    pub const OKAY_BUILD_STARTED: Self = Self(101);
    /// Partial success
    pub const OK_PARTIALLY: Self = Self(102);

    /// Unspecified server error
    pub const ERROR_GENERIC: Self = Self(1000);
    /// Server setup not finished
    pub const ERROR_SERVER_NOT_INITIALIZED: Self = Self(1001);
    /// User setup not finished
    pub const ERROR_USER_NOT_INITIALIZED: Self = Self(1101);
    /// Caller lacks permission
    pub const ERROR_NOT_AUTHORIZED: Self = Self(1102);
    /// Resource already exists
    pub const ERROR_ALREADY_EXIST: Self = Self(1103);
    /// Name fails validation
    pub const ERROR_BAD_NAME: Self = Self(1104);
    /// Login password rejected
    pub const WRONG_PASSWORD: Self = Self(1105);
    /// Auth token missing, expired or corrupted
    pub const AUTH_TOKEN_INVALID: Self = Self(1106);
    /// Two-factor verification failed
    pub const VERIFICATION_FAILED: Self = Self(1107);
    /// Operation not allowed in the current state
    pub const ILLEGAL_OPERATION: Self = Self(1108);
    /// App build failed
    pub const BUILD_ERROR: Self = Self(1109);
    /// Request parameter rejected
    pub const ILLEGAL_PARAMETER: Self = Self(1110);
    /// Resource does not exist
    pub const NOT_FOUND: Self = Self(1111);
    /// Authentication failed
    pub const AUTHENTICATION_FAILED: Self = Self(1112);
    /// Too many failed logins
    pub const PASSWORD_BACK_OFF: Self = Self(1113);
    /// Status absent or unrecognised
    pub const UNKNOWN_ERROR: Self = Self(1999);

    /// Raw numeric code
    pub const fn code(self) -> i64 {
        self.0
    }

    /// Ordinary, partial and build-started success
    pub const fn is_success(self) -> bool {
        matches!(self.0, 100..=102)
    }

    /// Whether the server rejected the auth token
    pub const fn is_token_invalid(self) -> bool {
        self.0 == Self::AUTH_TOKEN_INVALID.0
    }

    /// Symbolic name for known codes
    pub const fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            100 => "OKAY",
            101 => "OKAY_BUILD_STARTED",
            102 => "OK_PARTIALLY",
            1000 => "ERROR_GENERIC",
            1001 => "ERROR_SERVER_NOT_INITIALIZED",
            1101 => "ERROR_USER_NOT_INITIALIZED",
            1102 => "ERROR_NOT_AUTHORIZED",
            1103 => "ERROR_ALREADY_EXIST",
            1104 => "ERROR_BAD_NAME",
            1105 => "WRONG_PASSWORD",
            1106 => "AUTH_TOKEN_INVALID",
            1107 => "VERIFICATION_FAILED",
            1108 => "ILLEGAL_OPERATION",
            1109 => "BUILD_ERROR",
            1110 => "ILLEGAL_PARAMETER",
            1111 => "NOT_FOUND",
            1112 => "AUTHENTICATION_FAILED",
            1113 => "PASSWORD_BACK_OFF",
            1999 => "UNKNOWN_ERROR",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<i64> for EnvelopeStatus {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

/// Uniform response wrapper returned by every endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl Envelope {
    /// Status of the envelope; a missing or zero status reads as
    /// [`EnvelopeStatus::UNKNOWN_ERROR`]
    pub fn status(&self) -> EnvelopeStatus {
        match self.status {
            Some(code) if code != 0 => EnvelopeStatus(code),
            _ => EnvelopeStatus::UNKNOWN_ERROR,
        }
    }

    /// Server-provided description, empty when absent
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Payload, if the server sent one
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Split into `Ok(data)` for the success family, `Err((status,
    /// description))` otherwise. Absent data becomes `Value::Null`.
    pub fn into_result(self) -> std::result::Result<Value, (EnvelopeStatus, String)> {
        let status = self.status();
        if status.is_success() {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err((status, self.description.unwrap_or_default()))
        }
    }
}
