//! Stand-ins for the identity provider and the vault.
//!
//! Both wrap a [`wiremock::MockServer`]; point the client at them with the
//! authority host and vault URL overrides.

use crate::fixtures;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;
use wiremock::{
    matchers::{body_string_contains, header, method, path, query_param},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

/// Mock OAuth2 token endpoint.
pub struct MockIdentityProvider {
    server: MockServer,
}

impl MockIdentityProvider {
    /// Start a new mock identity provider.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to use as the authority host.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a URL.
    #[must_use]
    pub fn authority(&self) -> Url {
        Url::parse(&self.server.uri()).expect("mock server uri")
    }

    /// Answer client-credentials requests for `tenant` with `access_token`.
    pub async fn grant_token(&self, tenant: &str, access_token: &str) {
        self.respond_with(
            tenant,
            ResponseTemplate::new(200).set_body_json(fixtures::token_response(access_token)),
        )
        .await;
    }

    /// Answer client-credentials requests for `tenant` with `template`.
    pub async fn respond_with(&self, tenant: &str, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(format!("/{tenant}/oauth2/token")))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Form fields of every token request received so far.
    pub async fn token_requests(&self) -> Vec<HashMap<String, String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                url::form_urlencoded::parse(&request.body)
                    .into_owned()
                    .collect()
            })
            .collect()
    }
}

/// Mock Key Vault REST API.
pub struct MockVault {
    server: MockServer,
}

impl MockVault {
    /// Start a new mock vault.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to use as the vault URL override.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&self.server.uri()).expect("mock server uri")
    }

    /// Serve `body` for authorized GETs of `key_name`.
    pub async fn serve_key(&self, key_name: &str, access_token: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/keys/{key_name}")))
            .and(query_param("api-version", "7.0"))
            .and(header("authorization", format!("Bearer {access_token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Accept authorized PUTs of `key_name`, reporting the submitted `k` back.
    pub async fn echo_rotations(&self, key_name: &str, access_token: &str) {
        Mock::given(method("PUT"))
            .and(path(format!("/keys/{key_name}")))
            .and(query_param("api-version", "7.0"))
            .and(header("authorization", format!("Bearer {access_token}").as_str()))
            .and(header("content-type", "application/json"))
            .respond_with(EchoRotation::new(key_name))
            .mount(&self.server)
            .await;
    }

    /// Answer any `http_method` call on `key_name` with `status`.
    pub async fn fail(&self, http_method: &str, key_name: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(format!("/keys/{key_name}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(fixtures::vault_error(
                "Unauthorized",
                "AKV10000: Request is missing a Bearer or PoP token.",
            )))
            .mount(&self.server)
            .await;
    }

    /// Answer any `http_method` call on `key_name` with a non-JSON 200.
    pub async fn garble(&self, http_method: &str, key_name: &str) {
        Mock::given(method(http_method))
            .and(path(format!("/keys/{key_name}")))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&self.server)
            .await;
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

/// Responds to a rotation PUT with a key bundle whose `key.k` is the submitted `k`.
pub struct EchoRotation {
    key_name: String,
}

impl EchoRotation {
    /// Create a responder for `key_name`.
    #[must_use]
    pub fn new(key_name: &str) -> Self {
        Self {
            key_name: key_name.to_string(),
        }
    }
}

impl Respond for EchoRotation {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match request.body_json::<Value>() {
            Ok(body) => {
                let k = body.get("k").and_then(Value::as_str).unwrap_or_default();
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::rotated_key_bundle(&self.key_name, k))
            }
            Err(_) => ResponseTemplate::new(400)
                .set_body_json(fixtures::vault_error("BadParameter", "body is not JSON")),
        }
    }
}
