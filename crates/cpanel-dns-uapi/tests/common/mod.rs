//! Mock cPanel server and fixtures for UAPI contract tests

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cpanel_dns_core::CpanelConfig;
use cpanel_dns_uapi::CpanelClient;
use serde_json::{Value, json};
use std::collections::HashMap;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Session token issued by the mock login (without leading slash)
pub const SESSION: &str = "cpsess0123456789";

pub const ZONE: &str = "example.com";

pub const PARSE_ZONE_PATH: &str = "/cpsess0123456789/execute/DNS/parse_zone";
pub const MASS_EDIT_PATH: &str = "/cpsess0123456789/execute/DNS/mass_edit_zone";

pub fn b64(text: &str) -> String {
    STANDARD.encode(text)
}

pub fn test_config() -> CpanelConfig {
    CpanelConfig {
        hostname: "cpanel.example.com".to_string(),
        port: 2083,
        username: "alice".to_string(),
        password: "hunter2".to_string(),
        zone: ZONE.to_string(),
        ttl: 300,
        log_level: "debug".to_string(),
        dry_run: false,
    }
}

/// Client pointed at the mock server, not yet logged in
pub fn client_for(server: &MockServer, config: &CpanelConfig) -> CpanelClient {
    CpanelClient::new(config)
        .expect("client construction succeeds")
        .with_base_url(server.uri())
}

/// Mount a successful login and return a logged-in client
pub async fn logged_in_client(server: &MockServer) -> CpanelClient {
    logged_in_client_with(server, &test_config()).await
}

pub async fn logged_in_client_with(server: &MockServer, config: &CpanelConfig) -> CpanelClient {
    mount_login_ok(server).await;

    let mut client = client_for(server, config);
    client.login().await.expect("login succeeds");
    client
}

pub async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(query_param("login_only", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "security_token": format!("/{}", SESSION),
            "redirect": format!("/{}/frontend/jupiter/index.html", SESSION),
        })))
        .mount(server)
        .await;
}

/// A TXT line of a parsed zone: (line_index, name, value)
pub type TxtLine<'a> = (u64, &'a str, &'a str);

/// A `parse_zone` success payload with an SOA at index 3 and the given TXT lines
pub fn zone_payload(serial: u64, txt: &[TxtLine<'_>]) -> Value {
    let mut data = vec![
        json!({ "line_index": 0, "type": "comment", "text_b64": b64("; cPanel first:88.0.13") }),
        json!({ "line_index": 1, "type": "control", "text_b64": b64("$TTL 14400") }),
        json!({ "line_index": 2, "type": "comment", "text_b64": b64("; Zone file for example.com") }),
        json!({
            "line_index": 3,
            "type": "record",
            "record_type": "SOA",
            "dname_b64": b64("example.com."),
            "ttl": 86400,
            "data_b64": [
                b64("ns1.example.com."),
                b64("hostmaster.example.com."),
                b64(&serial.to_string()),
                b64("3600"),
                b64("1800"),
                b64("1209600"),
                b64("86400"),
            ]
        }),
        json!({
            "line_index": 4,
            "type": "record",
            "record_type": "A",
            "dname_b64": b64("www.example.com."),
            "ttl": 14400,
            "data_b64": [b64("192.0.2.10")]
        }),
    ];

    for (line_index, name, value) in txt {
        data.push(json!({
            "line_index": line_index,
            "type": "record",
            "record_type": "TXT",
            "dname_b64": b64(name),
            "ttl": 300,
            "data_b64": [b64(value)]
        }));
    }

    json!({
        "metadata": {},
        "data": data,
        "errors": null,
        "messages": null,
        "warnings": null,
        "status": 1
    })
}

pub fn error_payload(message: &str) -> Value {
    json!({
        "metadata": {},
        "data": null,
        "errors": [message],
        "messages": null,
        "warnings": null,
        "status": 0
    })
}

pub fn edit_ok_payload(new_serial: u64) -> Value {
    json!({
        "metadata": {},
        "data": { "new_serial": new_serial.to_string() },
        "errors": null,
        "messages": null,
        "warnings": null,
        "status": 1
    })
}

pub async fn mount_zone(server: &MockServer, payload: Value) {
    Mock::given(method("GET"))
        .and(path(PARSE_ZONE_PATH))
        .and(query_param("zone", ZONE))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(server)
        .await;
}

/// Requests received on the mass-edit endpoint, as decoded form fields
pub async fn mass_edit_forms(server: &MockServer) -> Vec<HashMap<String, String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == MASS_EDIT_PATH)
        .map(form_fields)
        .collect()
}

pub fn form_fields(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}
