//! Subsonic REST client built on reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use md5::{Digest, Md5};
use rand::distr::Alphanumeric;
use rand::Rng;
use reqwest::Url;

use crate::config::{AuthMethod, ServerConfig};
use crate::core::{extract_document, Param, Reply, ScrobbleError};
use crate::runtime::ScrobbleClient;

/// HTTP client sending authenticated GET requests to `{server}/rest/{endpoint}.view`.
#[derive(Clone)]
pub struct SubsonicHttpClient {
    http: reqwest::Client,
    base_url: Url,
    server: Arc<ServerConfig>,
}

impl SubsonicHttpClient {
    /// Build a client for the configured server.
    pub fn new(config: &ServerConfig) -> Result<Self, ScrobbleError> {
        config.validate().map_err(ScrobbleError::Config)?;
        let base_url = rest_base_url(&config.server_url)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("{}/{}", config.client_name, env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| ScrobbleError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            server: Arc::new(config.clone()),
        })
    }

    /// Absolute URL of a REST endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ScrobbleError> {
        self.base_url
            .join(&format!("{endpoint}.view"))
            .map_err(|e| ScrobbleError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl ScrobbleClient for SubsonicHttpClient {
    async fn get(&self, endpoint: &str, params: Vec<Param>) -> Reply {
        let url = match self.endpoint_url(endpoint) {
            Ok(url) => url,
            Err(e) => return Reply::Failed(e.to_string()),
        };

        let mut query = auth_params(&self.server);
        query.extend(params);

        let response = match self.http.get(url).query(&query).send().await {
            Ok(response) => response,
            Err(e) => return Reply::Failed(format!("network error: {e}")),
        };
        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => reply_from_parts(status, &body),
            Err(e) => Reply::Failed(format!("failed to read reply: {e}")),
        }
    }
}

/// Turn an HTTP status and body into a [`Reply`].
///
/// Error statuses still yield the body when it holds a JSON document, so the
/// server's own error message reaches the classifier.
pub fn reply_from_parts(status: u16, body: &[u8]) -> Reply {
    let ok = (200..300).contains(&status);
    if !ok && extract_document(body).is_none() {
        return Reply::Failed(format!("received HTTP code {status}"));
    }
    if body.is_empty() {
        Reply::NoContent
    } else {
        Reply::Data(body.to_vec())
    }
}

fn rest_base_url(server_url: &str) -> Result<Url, ScrobbleError> {
    let mut url = Url::parse(server_url.trim())
        .map_err(|e| ScrobbleError::InvalidUrl(format!("{server_url}: {e}")))?;
    let rest = format!("{}/rest/", url.path().trim_end_matches('/'));
    url.set_path(&rest);
    url.set_query(None);
    Ok(url)
}

const SALT_LEN: usize = 12;

/// Authentication and format parameters for one request.
///
/// Token auth draws a new salt on every call.
fn auth_params(config: &ServerConfig) -> Vec<Param> {
    let mut params = vec![
        ("c".to_string(), config.client_name.clone()),
        ("v".to_string(), config.api_version.clone()),
        ("f".to_string(), "json".to_string()),
        ("u".to_string(), config.username.clone()),
    ];
    match config.auth_method {
        AuthMethod::Hex => params.push((
            "p".to_string(),
            format!("enc:{}", hex::encode(&config.password)),
        )),
        AuthMethod::Plain => params.push(("p".to_string(), config.password.clone())),
        AuthMethod::Token => params.extend(token_params(&config.password, &new_salt())),
    }
    params
}

fn token_params(password: &str, salt: &str) -> [Param; 2] {
    let token = hex::encode(Md5::digest(format!("{password}{salt}")));
    [("t".to_string(), token), ("s".to_string(), salt.to_string())]
}

fn new_salt() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}
