// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! DSV client implementation.

use std::time::Duration;

use dsv_common_secret::SecretString;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::SecretDocument;

/// Header DSV uses to attribute API traffic to an integration.
const CLIENT_TAG_HEADER: &str = "Delinea-DSV-Client";

const GRANT_TYPE: &str = "client_credentials";

/// Configuration for the DSV client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// API base, e.g. `https://example.secretsvaultcloud.com/v1`.
	pub base_url: String,
	/// Bound on each request, connect through body.
	pub timeout: Duration,
	/// Value for the `Delinea-DSV-Client` header, if the CI host has one.
	pub client_tag: Option<String>,
	/// Allow a plain `http://` base. Only for local mock servers.
	pub allow_insecure: bool,
}

impl ClientConfig {
	/// Configuration for a tenant domain: `https://{domain}/v1`.
	pub fn for_domain(domain: &str) -> ClientResult<Self> {
		let domain = domain.trim();
		if domain.is_empty() {
			return Err(ClientError::Configuration("domain is empty".into()));
		}
		if domain.contains('/') || domain.chars().any(char::is_whitespace) {
			return Err(ClientError::Configuration(format!(
				"domain must be a host name, got '{domain}'"
			)));
		}

		Ok(Self {
			base_url: format!("https://{domain}/v1"),
			timeout: dsv_common_http::DEFAULT_TIMEOUT,
			client_tag: None,
			allow_insecure: false,
		})
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn with_client_tag(mut self, tag: Option<impl Into<String>>) -> Self {
		self.client_tag = tag.map(Into::into);
		self
	}
}

/// Body of the client-credentials token exchange.
#[derive(Serialize)]
struct TokenRequest<'a> {
	grant_type: &'static str,
	client_id: &'a str,
	client_secret: &'a str,
}

/// Client for the DSV REST API.
///
/// One client is built per run; it holds no token itself, the caller passes
/// the token obtained from [`DsvClient::get_token`] to each read.
pub struct DsvClient {
	http_client: reqwest::Client,
	base_url: Url,
	client_tag: Option<HeaderValue>,
}

impl DsvClient {
	pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
		let base_url = Url::parse(&config.base_url).map_err(|e| {
			ClientError::Configuration(format!("invalid base URL '{}': {e}", config.base_url))
		})?;

		match base_url.scheme() {
			"https" => {}
			"http" if config.allow_insecure => {}
			scheme => {
				return Err(ClientError::Configuration(format!(
					"base URL must use HTTPS, got '{scheme}'"
				)))
			}
		}
		if base_url.cannot_be_a_base() {
			return Err(ClientError::Configuration(format!(
				"base URL '{base_url}' cannot have path segments"
			)));
		}

		let client_tag = config
			.client_tag
			.as_deref()
			.map(HeaderValue::from_str)
			.transpose()
			.map_err(|e| ClientError::Configuration(format!("invalid client tag: {e}")))?;

		let http_client = dsv_common_http::new_client_with_timeout(config.timeout)
			.map_err(|e| ClientError::Configuration(format!("failed to create HTTP client: {e}")))?;

		Ok(Self {
			http_client,
			base_url,
			client_tag,
		})
	}

	/// Exchanges client credentials for an access token.
	///
	/// `POST {base}/token` with a `client_credentials` grant. The token comes
	/// back from the `accessToken` field of the response.
	#[instrument(skip_all)]
	pub async fn get_token(
		&self,
		client_id: &SecretString,
		client_secret: &SecretString,
	) -> ClientResult<SecretString> {
		let url = self.endpoint(["token"])?;
		let body = TokenRequest {
			grant_type: GRANT_TYPE,
			client_id: client_id.expose(),
			client_secret: client_secret.expose(),
		};

		debug!(url = %url, "requesting access token");

		let request = self.request(Method::POST, url.clone()).json(&body);
		let mut response: Value = self.send(request, Method::POST, url).await?;

		match response
			.as_object_mut()
			.and_then(|fields| fields.remove("accessToken"))
		{
			Some(Value::String(token)) => Ok(SecretString::new(token)),
			_ => Err(ClientError::MissingToken),
		}
	}

	/// Reads the secret at `secret_path`.
	///
	/// `GET {base}/secrets/{path}`; each `/`-separated part of the path becomes
	/// one URL segment, so stray slashes never produce empty segments.
	#[instrument(skip(self, token))]
	pub async fn get_secret(
		&self,
		token: &SecretString,
		secret_path: &str,
	) -> ClientResult<SecretDocument> {
		let url = self.secret_url(secret_path)?;

		let mut authorization = HeaderValue::from_str(token.expose()).map_err(|_| {
			ClientError::Configuration("access token is not a valid header value".into())
		})?;
		authorization.set_sensitive(true);

		debug!(url = %url, "fetching secret");

		let request = self
			.request(Method::GET, url.clone())
			.header(AUTHORIZATION, authorization);
		self.send(request, Method::GET, url).await
	}

	/// `{base}/secrets/{path}`. Empty segments collapse; `.` and `..` are
	/// refused so the URL always names the secret that was asked for.
	pub(crate) fn secret_url(&self, secret_path: &str) -> ClientResult<Url> {
		let segments: Vec<&str> = secret_path.split('/').filter(|s| !s.is_empty()).collect();
		if segments.is_empty() || segments.iter().any(|s| is_dot_segment(s)) {
			return Err(ClientError::Configuration(format!(
				"secret path '{secret_path}' does not name a secret"
			)));
		}
		self.endpoint(std::iter::once("secrets").chain(segments))
	}

	fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ClientResult<Url> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| ClientError::Configuration("base URL cannot have path segments".into()))?
			.pop_if_empty()
			.extend(segments.into_iter().filter(|s| !s.is_empty()));
		Ok(url)
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		let builder = self
			.http_client
			.request(method, url)
			.header(CONTENT_TYPE, "application/json");
		match &self.client_tag {
			Some(tag) => builder.header(CLIENT_TAG_HEADER, tag.clone()),
			None => builder,
		}
	}

	async fn send<T>(&self, request: RequestBuilder, method: Method, url: Url) -> ClientResult<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let response = request.send().await?;

		let status = response.status();
		if status != StatusCode::OK {
			return Err(ClientError::HttpStatus {
				method,
				url,
				status,
			});
		}

		let body = response.bytes().await?;
		Ok(serde_json::from_slice(&body)?)
	}
}

/// `.` and `..`, including their percent-encoded spellings, which URL path
/// parsing would resolve away.
fn is_dot_segment(segment: &str) -> bool {
	matches!(
		segment.to_ascii_lowercase().replace("%2e", ".").as_str(),
		"." | ".."
	)
}

impl std::fmt::Debug for DsvClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DsvClient")
			.field("base_url", &self.base_url.as_str())
			.field("client_tag", &self.client_tag)
			.finish()
	}
}
