// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON-array encoding: `[{"secretPath": …, "secretKey": …, "outputVariable": …}]`.

use serde::Deserialize;
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::lines::names_one_secret;
use crate::request::RetrievalRequest;

/// Wire shape of one entry. Fields are optional here so a missing field is
/// reported with its entry index instead of a bare serde message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
	secret_path: Option<String>,
	secret_key: Option<String>,
	output_variable: Option<String>,
}

/// Decodes the JSON-array encoding.
///
/// Every entry must carry non-empty `secretPath`, `secretKey` and
/// `outputVariable` strings. Unknown fields are ignored.
pub fn parse_json(raw: &str) -> ParseResult<Vec<RetrievalRequest>> {
	let entries: Vec<RawEntry> =
		serde_json::from_str(raw).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;

	let requests = entries
		.into_iter()
		.enumerate()
		.map(|(index, entry)| {
			Ok(RetrievalRequest {
				secret_path: secret_path(entry.secret_path, index)?,
				secret_key: required(entry.secret_key, index, "secretKey")?,
				output_variable: required(entry.output_variable, index, "outputVariable")?,
			})
		})
		.collect::<ParseResult<Vec<_>>>()?;

	debug!(count = requests.len(), "parsed JSON retrieval spec");
	Ok(requests)
}

fn secret_path(value: Option<String>, index: usize) -> ParseResult<String> {
	let path = required(value, index, "secretPath")?;
	if !names_one_secret(&path) {
		return Err(ParseError::InvalidFormat(format!(
			"entry {index} has a \"secretPath\" that does not name a secret"
		)));
	}
	Ok(path)
}

fn required(value: Option<String>, index: usize, field: &str) -> ParseResult<String> {
	match value {
		Some(v) if !v.trim().is_empty() => Ok(v),
		Some(_) => Err(ParseError::InvalidFormat(format!(
			"entry {index} has an empty \"{field}\""
		))),
		None => Err(ParseError::InvalidFormat(format!(
			"entry {index} is missing \"{field}\""
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_entries_in_order() {
		let raw = r#"
			[
				{"secretPath": "folder1/folder2/secret1", "secretKey": "mykey1", "outputVariable": "KEY1"},
				{"secretPath": "folder1/folder2/secret1", "secretKey": "mykey2", "outputVariable": "KEY2"},
				{"secretPath": "folder1/folder2/secret2", "secretKey": "key3", "outputVariable": "KEY3"}
			]
		"#;

		let requests = parse_json(raw).unwrap();

		assert_eq!(
			requests,
			vec![
				RetrievalRequest::new("folder1/folder2/secret1", "mykey1", "KEY1"),
				RetrievalRequest::new("folder1/folder2/secret1", "mykey2", "KEY2"),
				RetrievalRequest::new("folder1/folder2/secret2", "key3", "KEY3"),
			]
		);
	}

	#[test]
	fn empty_array_is_valid() {
		assert!(parse_json("[]").unwrap().is_empty());
	}

	#[test]
	fn ignores_unknown_fields() {
		let raw = r#"[{"secretPath": "a", "secretKey": "b", "outputVariable": "C", "note": "x"}]"#;
		assert_eq!(parse_json(raw).unwrap().len(), 1);
	}

	#[test]
	fn rejects_wrong_field_names() {
		let raw = r#"[{"arg1": "path", "arg2": "path", "arg3": ""}]"#;
		let err = parse_json(raw).unwrap_err();
		assert_eq!(
			err,
			ParseError::InvalidFormat("entry 0 is missing \"secretPath\"".to_string())
		);
	}

	#[test]
	fn rejects_trailing_comma() {
		let raw = r#"[{"secretPath": "a", "secretKey": "b", "outputVariable": "C"},]"#;
		assert!(matches!(parse_json(raw), Err(ParseError::InvalidFormat(_))));
	}

	#[test]
	fn rejects_empty_secret_key() {
		let raw = r#"[
			{"secretPath": "a", "secretKey": "b", "outputVariable": "C"},
			{"secretPath": "a", "secretKey": "", "outputVariable": "D"}
		]"#;
		let err = parse_json(raw).unwrap_err();
		assert!(err.to_string().contains("entry 1 has an empty \"secretKey\""));
	}

	#[test]
	fn rejects_paths_that_name_no_secret() {
		for path in ["/", "a/../b", "..", "x/./y"] {
			let raw = format!(
				r#"[{{"secretPath": "a", "secretKey": "b", "outputVariable": "C"}},
				{{"secretPath": "{path}", "secretKey": "b", "outputVariable": "D"}}]"#
			);
			let err = parse_json(&raw).unwrap_err();
			assert_eq!(
				err,
				ParseError::InvalidFormat(
					"entry 1 has a \"secretPath\" that does not name a secret".to_string()
				),
				"path {path:?}"
			);
		}
	}

	#[test]
	fn rejects_missing_output_variable() {
		let raw = r#"[{"secretPath": "a", "secretKey": "b"}]"#;
		let err = parse_json(raw).unwrap_err();
		assert!(err.to_string().contains("missing \"outputVariable\""));
	}

	#[test]
	fn rejects_non_array_input() {
		for raw in ["", "{}", r#"{"secretPath": "a"}"#, "[1, 2]", r#"["a"]"#] {
			assert!(
				matches!(parse_json(raw), Err(ParseError::InvalidFormat(_))),
				"input {raw:?} should be rejected"
			);
		}
	}

	#[test]
	fn rejects_non_string_fields() {
		let raw = r#"[{"secretPath": 1, "secretKey": "b", "outputVariable": "C"}]"#;
		assert!(matches!(parse_json(raw), Err(ParseError::InvalidFormat(_))));
	}

	#[test]
	fn error_message_shows_expected_format() {
		let err = parse_json("[").unwrap_err().to_string();
		assert!(err.starts_with("invalid json structure: "));
		assert!(err.contains(r#"'[{"secretPath": "path""#));
	}
}
