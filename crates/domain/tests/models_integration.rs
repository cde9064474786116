//! Integration tests for wire models
//!
//! Decodes realistic server payloads through the envelope and into the
//! typed models.

use alacrity_domain::{
    AppDefinitionsResponse, Envelope, EnvelopeStatus, RegistriesResponse, RegistryType,
};
use serde_json::{json, Value};

// ============================================================================
// Envelope Tests
// ============================================================================

/// Scenario: server answers an app listing with a full definition
#[test]
fn test_app_listing_through_envelope() {
    let body = json!({
        "status": 100,
        "description": "App definitions are retrieved.",
        "data": {
            "appDefinitions": [{
                "appName": "web",
                "hasPersistentData": false,
                "instanceCount": 1,
                "envVars": [{ "key": "PORT", "value": "80" }],
                "ports": [{ "containerPort": 80, "hostPort": 8080 }],
                "deployedVersion": 3
            }],
            "rootDomain": "apps.example.com",
            "alacranSubDomain": "captain",
            "defaultNginxConfig": ""
        }
    });

    let envelope: Envelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.status(), EnvelopeStatus::OKAY);

    let data = envelope.into_result().unwrap();
    let apps: AppDefinitionsResponse = serde_json::from_value(data).unwrap();

    assert_eq!(apps.root_domain, "apps.example.com");
    let web = &apps.app_definitions[0];
    assert_eq!(web.app_name.as_deref(), Some("web"));
    assert_eq!(web.env_vars[0].key, "PORT");
    assert_eq!(web.ports[0].host_port, 8080);
    assert_eq!(web.extra.get("deployedVersion"), Some(&json!(3)));
}

/// Scenario: build started is still a success and carries no data
#[test]
fn test_build_started_without_data() {
    let envelope: Envelope =
        serde_json::from_value(json!({ "status": 101, "description": "Deploy is started" }))
            .unwrap();

    assert_eq!(envelope.into_result(), Ok(Value::Null));
}

/// Scenario: an expired token is reported as an error, not as data
#[test]
fn test_token_invalid_is_not_success() {
    let envelope: Envelope = serde_json::from_value(json!({
        "status": 1106,
        "description": "Auth token corrupted",
        "data": { "ignored": true }
    }))
    .unwrap();

    let (status, description) = envelope.into_result().unwrap_err();
    assert!(status.is_token_invalid());
    assert_eq!(description, "Auth token corrupted");
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_registries_decode_both_kinds() {
    let registries: RegistriesResponse = serde_json::from_value(json!({
        "registries": [
            {
                "id": "local",
                "registryUser": "admin",
                "registryPassword": "secret",
                "registryDomain": "registry.captain.example.com",
                "registryImagePrefix": "",
                "registryType": "LOCAL_REG"
            },
            {
                "id": "hub",
                "registryUser": "me",
                "registryPassword": "pw",
                "registryDomain": "index.docker.io",
                "registryImagePrefix": "me",
                "registryType": "REMOTE_REG"
            }
        ]
    }))
    .unwrap();

    assert_eq!(registries.registries.len(), 2);
    assert_eq!(registries.registries[0].registry_type, RegistryType::Local);
    assert_eq!(registries.registries[1].registry_type, RegistryType::Remote);
    assert_eq!(registries.default_registry_id, None);
}
