#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Deeply nested uses in sub-modules are falsely flagged as being unused"
)]

use httpmock::MockServer;
use serde_json::{Value, json};
use srcom_client_sdk::{Client, Config};

pub const API_KEY: &str = "test-api-key";

/// Anonymous client against the mock server.
pub fn client(server: &MockServer) -> Client {
    Client::new(&server.base_url(), Config::default()).unwrap()
}

/// Client sending [`API_KEY`] against the mock server.
pub fn authenticated_client(server: &MockServer) -> Client {
    let config = Config::builder().api_key(API_KEY).build();
    Client::new(&server.base_url(), config).unwrap()
}

/// A paginated envelope whose links are resolved against the mock server.
pub fn page(server: &MockServer, data: Value, links: &[(&str, &str)]) -> Value {
    let links: Vec<Value> = links
        .iter()
        .map(|&(rel, path)| json!({"rel": rel, "uri": server.url(path)}))
        .collect();

    json!({
        "data": data,
        "pagination": {"offset": 0, "max": 200, "size": 2, "links": links}
    })
}
