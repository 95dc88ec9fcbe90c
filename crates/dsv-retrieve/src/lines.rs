// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Line-oriented encoding: one `<path> <data key> as <output key>` per line.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{ParseError, ParseResult};
use crate::request::RetrievalRequest;

static SECRET_PATH: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[a-zA-Z0-9:/@+._-]+$").expect("secret path pattern compiles"));

const ROW_KEYWORD: &str = "as";

/// Returns true if `path` only uses characters DSV allows in a secret path
/// and names a secret.
pub fn is_valid_secret_path(path: &str) -> bool {
	SECRET_PATH.is_match(path) && names_one_secret(path)
}

/// A path names one secret when it has a non-empty segment and no `.` or `..`
/// segment.
pub(crate) fn names_one_secret(path: &str) -> bool {
	let mut named = false;
	for segment in path.split('/') {
		match segment {
			"." | ".." => return false,
			"" => {}
			_ => named = true,
		}
	}
	named
}

/// Decodes the line-oriented encoding.
///
/// Blank lines are skipped and runs of whitespace count as one separator. When
/// the same `(path, data key)` pair appears twice, the entry keeps its first
/// position and takes the output key of the later line.
pub fn parse_lines(raw: &str) -> ParseResult<Vec<RetrievalRequest>> {
	let mut requests: Vec<RetrievalRequest> = Vec::new();

	for line in raw.lines() {
		let row = line.trim();
		if row.is_empty() {
			continue;
		}

		let tokens: Vec<&str> = row.split_whitespace().collect();
		let &[path, data_key, keyword, output_key] = tokens.as_slice() else {
			return Err(ParseError::InvalidRow(row.to_string()));
		};
		if keyword != ROW_KEYWORD {
			return Err(ParseError::InvalidRow(row.to_string()));
		}
		if !is_valid_secret_path(path) {
			return Err(ParseError::InvalidPath(path.to_string()));
		}

		match requests
			.iter_mut()
			.find(|r| r.secret_path == path && r.secret_key == data_key)
		{
			Some(existing) => {
				trace!(path, data_key, "later row overrides output key");
				existing.output_variable = output_key.to_string();
			}
			None => requests.push(RetrievalRequest::new(path, data_key, output_key)),
		}
	}

	debug!(count = requests.len(), "parsed line retrieval spec");
	Ok(requests)
}
