// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field extraction and publication of one value.

use dsv_ci::{CiError, CiHost, EnvFile};
use dsv_client::SecretDocument;
use dsv_common_secret::SecretString;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PublishError {
	#[error("secret has no \"data\" object")]
	MissingDataSection,

	#[error("field '{0}' not found in secret data")]
	MissingKey(String),

	#[error("cannot register mask")]
	Mask(#[source] CiError),

	#[error("cannot publish output")]
	Output(#[source] CiError),

	#[error("cannot write environment file")]
	EnvFile(#[source] CiError),
}

impl PublishError {
	/// The message shown to the job, without any detail from the source.
	pub fn user_message(&self) -> &'static str {
		match self {
			PublishError::MissingDataSection => "cannot parse secret",
			PublishError::MissingKey(_) => "specified field was not found in data",
			PublishError::Mask(_) => "cannot mask value",
			PublishError::Output(_) => "cannot set output",
			PublishError::EnvFile(_) => "cannot set environment variable",
		}
	}
}

/// Reads `data[secret_key]` from a secret document. Only string values count.
pub fn extract(document: &SecretDocument, secret_key: &str) -> Result<SecretString, PublishError> {
	let data = document
		.get("data")
		.and_then(Value::as_object)
		.ok_or(PublishError::MissingDataSection)?;

	match data.get(secret_key) {
		Some(Value::String(value)) => Ok(SecretString::new(value.clone())),
		_ => Err(PublishError::MissingKey(secret_key.to_string())),
	}
}

/// Masks `value`, then sets it as a step output (when the host has them) and
/// appends it to `env_file` (when exporting).
pub fn publish(
	value: &SecretString,
	output_variable: &str,
	host: &mut dyn CiHost,
	env_file: Option<&mut EnvFile>,
) -> Result<(), PublishError> {
	host.mask(value).map_err(PublishError::Mask)?;

	if host.supports_outputs() {
		host.emit_output(output_variable, value)
			.map_err(PublishError::Output)?;
	}

	if let Some(env_file) = env_file {
		env_file
			.export(output_variable, value)
			.map_err(PublishError::EnvFile)?;
	}

	debug!(output = output_variable, "published value");
	Ok(())
}
