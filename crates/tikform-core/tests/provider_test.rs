#![allow(clippy::unwrap_used)]
// End-to-end lifecycle tests: Provider over the real REST client against
// a wiremock router.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tikform_api::RestClient;
use tikform_core::plan::REDACTED;
use tikform_core::{PlanAction, Provider, ResourceConfig, RouterConfig, TlsVerification};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Provider<RestClient>) {
    let server = MockServer::start().await;
    let config = RouterConfig {
        url: Url::parse(&server.uri()).unwrap(),
        username: "admin".into(),
        password: SecretString::from("hunter2".to_string()),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
    };
    let provider = Provider::new(config.client().unwrap());
    (server, provider)
}

fn config(value: Value) -> ResourceConfig {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => ResourceConfig::new(),
    }
}

// ── /radius ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_radius_create_posts_defaults_and_reads_back() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/rest/radius"))
        .and(body_json(json!({
            "accounting-backup": "false",
            "accounting-port": "1813",
            "address": "10.0.0.1",
            "authentication-port": "1812",
            "certificate": "none",
            "protocol": "udp",
            "secret": "s3cret",
            "service": "ppp,login",
            "timeout": "300ms"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            ".id": "*1A", "address": "10.0.0.1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/radius/*1A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            ".id": "*1A",
            "accounting-backup": "false",
            "accounting-port": "1813",
            "address": "10.0.0.1",
            "authentication-port": "1812",
            "certificate": "none",
            "disabled": "false",
            "protocol": "udp",
            "secret": "s3cret",
            "service": "ppp,login",
            "timeout": "300ms",
            "realm": ""
        })))
        .mount(&server)
        .await;

    let cfg = config(json!({
        "address": "10.0.0.1",
        "secret": "s3cret",
        "service": "ppp,login"
    }));
    let plan = provider.plan("routeros_radius", "main", &cfg, None).unwrap();
    assert_eq!(plan.action, PlanAction::Create);
    assert!(!plan.to_string().contains("s3cret"));
    assert!(plan.to_string().contains(REDACTED));

    let (data, diags) = provider.apply(&plan, None).await;
    assert!(diags.is_empty(), "{diags}");
    assert_eq!(data.id(), Some("*1A"));
    assert_eq!(data.get("disabled"), Some(&json!(false)));
    assert!(data.get("realm").is_none());

    let again = provider.plan("routeros_radius", "main", &cfg, Some(&data)).unwrap();
    assert_eq!(again.action, PlanAction::NoOp, "{again}");
}

#[tokio::test]
async fn test_radius_router_error_detail_is_kept() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/rest/radius"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": 400,
            "message": "Bad Request",
            "detail": "failure: certificate not found"
        })))
        .mount(&server)
        .await;

    let cfg = config(json!({"address": "10.0.0.1", "protocol": "radsec", "certificate": "missing"}));
    let plan = provider.plan("routeros_radius", "main", &cfg, None).unwrap();
    let (data, diags) = provider.apply(&plan, None).await;

    assert!(!data.exists());
    let d = diags.iter().next().unwrap();
    assert_eq!(d.summary, "Bad Request");
    assert_eq!(d.detail.as_deref(), Some("failure: certificate not found"));
}

#[tokio::test]
async fn test_radius_vanished_entry_is_dropped_on_refresh() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/radius/*4"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": 404, "message": "Not Found"
        })))
        .mount(&server)
        .await;

    let mut data = tikform_core::ResourceData::with_id("*4");
    data.set("address", "10.0.0.1");
    let diags = provider.refresh("routeros_radius", &mut data).await;
    assert!(diags.is_empty(), "{diags}");
    assert!(!data.exists());
}

#[tokio::test]
async fn test_radius_update_patches_changed_fields_only() {
    let (server, provider) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/radius/*2"))
        .and(body_json(json!({"timeout": "1s", "comment": ""})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({".id": "*2"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/radius/*2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            ".id": "*2",
            "address": "10.0.0.2",
            "timeout": "1s",
            "protocol": "udp"
        })))
        .mount(&server)
        .await;

    let mut prior = tikform_core::ResourceData::with_id("*2");
    for (k, v) in [
        ("accounting_backup", json!(false)),
        ("accounting_port", json!(1813)),
        ("address", json!("10.0.0.2")),
        ("authentication_port", json!(1812)),
        ("certificate", json!("none")),
        ("comment", json!("lab")),
        ("protocol", json!("udp")),
        ("timeout", json!("300ms")),
    ] {
        prior.set(k, v);
    }

    let cfg = config(json!({"address": "10.0.0.2", "timeout": "1s"}));
    let plan = provider.plan("routeros_radius", "lab", &cfg, Some(&prior)).unwrap();
    assert_eq!(plan.action, PlanAction::Update);

    let (data, diags) = provider.apply(&plan, Some(prior)).await;
    assert!(diags.is_empty(), "{diags}");
    assert_eq!(data.get("timeout"), Some(&json!("1s")));
}

// ── /radius/incoming ────────────────────────────────────────────────

#[tokio::test]
async fn test_incoming_create_uses_settings_set() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/radius/incoming/set"))
        .and(body_json(json!({"accept": "true", "port": "3799"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/radius/incoming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accept": "true", "port": "3799", "vrf": "main"
        })))
        .mount(&server)
        .await;

    let cfg = config(json!({"accept": true}));
    let plan = provider
        .plan("routeros_radius_incoming", "this", &cfg, None)
        .unwrap();
    let (data, diags) = provider.apply(&plan, None).await;

    assert!(diags.is_empty(), "{diags}");
    assert_eq!(data.id(), Some("radius/incoming"));
    assert_eq!(data.effective_default("vrf"), Some(&json!("main")));

    let again = provider
        .plan("routeros_radius_incoming", "this", &cfg, Some(&data))
        .unwrap();
    assert_eq!(again.action, PlanAction::NoOp, "{again}");
}

#[tokio::test]
async fn test_incoming_on_old_firmware_has_no_vrf() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/radius/incoming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accept": "false", "port": "3799"
        })))
        .mount(&server)
        .await;

    let (data, diags) = provider.import("routeros_radius_incoming", "radius1").await;
    assert!(diags.is_empty(), "{diags}");
    assert_eq!(data.id(), Some("radius1"));
    assert!(data.effective_default("vrf").is_none());

    let plan = provider
        .plan("routeros_radius_incoming", "this", &ResourceConfig::new(), Some(&data))
        .unwrap();
    assert_eq!(plan.action, PlanAction::NoOp, "{plan}");
}

#[tokio::test]
async fn test_incoming_destroy_leaves_router_alone() {
    let (server, provider) = setup().await;

    let mut data = tikform_core::ResourceData::with_id("radius/incoming");
    let diags = provider.destroy("routeros_radius_incoming", &mut data).await;

    assert!(!diags.has_errors());
    assert!(!data.exists());
    assert!(server.received_requests().await.unwrap().is_empty());
}
