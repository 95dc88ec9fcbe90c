// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the CI host surface.

use std::path::PathBuf;

use thiserror::Error;

use crate::HostKind;

/// Errors raised while talking to the CI host.
///
/// Variable names and file paths appear in messages; values never do.
#[derive(Debug, Error)]
pub enum CiError {
	/// A variable the host needs to locate a file is not set.
	#[error("{0} environment variable is not set")]
	MissingEnv(&'static str),

	/// The host has no environment file and none was configured.
	#[error("no environment file is configured for {0}")]
	NoEnvFile(HostKind),

	/// The environment or output file could not be opened.
	#[error("cannot open file {path}: {source}")]
	Open {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The environment or output file could not be written.
	#[error("could not update file {path}: {source}")]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// Workflow commands could not be written to the host log.
	#[error("could not write workflow command: {0}")]
	Command(#[source] std::io::Error),

	/// The variable name cannot be written as `NAME=value`.
	#[error("invalid variable name '{0}'")]
	InvalidName(String),

	/// A multi-line value was given to a host that can't represent one.
	#[error("value for '{0}' spans multiple lines, which {1} cannot store")]
	MultilineValue(String, HostKind),

	/// The host does not offer the requested capability.
	#[error("{host} does not support {capability}")]
	Unsupported {
		host: HostKind,
		capability: &'static str,
	},
}

/// Result type for CI host operations.
pub type CiResult<T> = Result<T, CiError>;
