// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the DSV client.

use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

/// Errors that can occur talking to the DSV API.
///
/// None of the variants carry credentials, tokens or secret values; the URL
/// only ever holds the tenant host and the secret path.
#[derive(Debug, Error)]
pub enum ClientError {
	/// The client could not be set up (bad domain, bad base URL, bad header).
	#[error("configuration error: {0}")]
	Configuration(String),

	/// The request could not be sent or its body could not be read.
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),

	/// The API answered with something other than 200 OK.
	#[error("{method} {url}: {status}")]
	HttpStatus {
		method: Method,
		url: Url,
		status: StatusCode,
	},

	/// The response body is not the JSON we expected.
	#[error("could not decode response body: {0}")]
	Decode(#[from] serde_json::Error),

	/// The token endpoint answered 200 without an `accessToken` string.
	#[error("could not read access token from response")]
	MissingToken,
}

impl ClientError {
	/// Status code for `HttpStatus` errors.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			ClientError::HttpStatus { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Result type for DSV client operations.
pub type ClientResult<T> = Result<T, ClientError>;
