// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for retrieval spec parsing.

use thiserror::Error;

/// Errors produced while decoding a retrieval spec.
///
/// Messages name the offending input so the user can fix their workflow file;
/// a retrieval spec never contains secret material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	/// The JSON encoding is malformed or an entry is incomplete.
	#[error(
		"invalid json structure: {0}. Expected format: '[{{\"secretPath\": \"path\", \"secretKey\": \"data key\", \"outputVariable\": \"OUTPUT_NAME\"}}]'"
	)]
	InvalidFormat(String),

	/// A DSL line is not `<path> <key> as <output>`.
	#[error("invalid row: '{0}'. Expected format: '<secret path> <secret data key> as <output key>'")]
	InvalidRow(String),

	/// A DSL path contains characters outside the allowed set.
	#[error(
		"invalid path: '{0}'. Secret path may contain only letters, numbers, underscores, dashes, @, pluses and periods separated by colon or slash"
	)]
	InvalidPath(String),
}

/// Result type for retrieval spec parsing.
pub type ParseResult<T> = Result<T, ParseError>;
