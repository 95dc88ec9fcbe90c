// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use dsv_retrieve::{parse, parse_json, parse_lines, ParseError, RetrievalRequest, SpecFormat};
use proptest::prelude::*;

fn path_strategy() -> impl Strategy<Value = String> {
	"[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,11}(/[a-zA-Z0-9:@+_][a-zA-Z0-9:@+_.-]{0,11}){0,3}"
}

fn token_strategy() -> impl Strategy<Value = String> {
	"[a-zA-Z0-9_]{1,16}"
}

fn request_strategy() -> impl Strategy<Value = RetrievalRequest> {
	(path_strategy(), token_strategy(), token_strategy())
		.prop_map(|(path, key, output)| RetrievalRequest::new(path, key, output))
}

proptest! {
	/// A JSON spec decodes to one request per array entry with fields unchanged.
	#[test]
	fn json_preserves_length_and_fields(requests in prop::collection::vec(request_strategy(), 0..8)) {
		let raw = serde_json::to_string(&requests).unwrap();
		let parsed = parse_json(&raw).unwrap();
		prop_assert_eq!(parsed, requests);
	}

	/// Blank and whitespace-only lines never change the result.
	#[test]
	fn blank_lines_are_ignored(
		requests in prop::collection::vec(request_strategy(), 1..6),
		padding in prop::collection::vec("[ \t]{0,4}", 1..4),
	) {
		let rows: Vec<String> = requests
			.iter()
			.map(|r| format!("{} {} as {}", r.secret_path, r.secret_key, r.output_variable))
			.collect();

		let plain = rows.join("\n");
		let mut padded = String::new();
		for row in &rows {
			for blank in &padding {
				padded.push_str(blank);
				padded.push('\n');
			}
			padded.push_str(&format!("  {row}\t\n"));
		}

		prop_assert_eq!(parse_lines(&plain).unwrap(), parse_lines(&padded).unwrap());
	}

	/// Any path with a character outside the allowed set is named in the error.
	#[test]
	fn invalid_path_is_named(
		prefix in "[a-z]{1,6}",
		bad in "[$%^&*!=,;?#~]",
		suffix in "[a-z]{0,6}",
	) {
		let path = format!("{prefix}{bad}{suffix}");
		let err = parse_lines(&format!("{path} key as OUT")).unwrap_err();
		prop_assert_eq!(err, ParseError::InvalidPath(path));
	}

	/// Rows with other than four tokens are rejected with the row text.
	#[test]
	fn wrong_token_count_names_row(tokens in prop::collection::vec("[a-z]{1,5}", 1..8)) {
		prop_assume!(tokens.len() != 4);
		let row = tokens.join(" ");
		let err = parse(&row, SpecFormat::Lines).unwrap_err();
		prop_assert_eq!(err, ParseError::InvalidRow(row));
	}
}
