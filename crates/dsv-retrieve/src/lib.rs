// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retrieval spec parsing for the DSV action.
//!
//! A retrieval spec says which secret fields to fetch and where to publish
//! them. Two encodings decode into the same ordered list of
//! [`RetrievalRequest`]s:
//!
//! - a JSON array: `[{"secretPath": "folder/secret", "secretKey": "password", "outputVariable": "DB_PASSWORD"}]`
//! - one row per line: `folder/secret password as DB_PASSWORD`
//!
//! [`RetrievalPlan`] then groups the requests by path so each secret is
//! fetched once.

mod error;
mod json;
mod lines;
mod request;

pub use error::{ParseError, ParseResult};
pub use json::parse_json;
pub use lines::{is_valid_secret_path, parse_lines};
pub use request::{FieldMapping, RetrievalPlan, RetrievalRequest, SecretGroup};

/// Which decoder to run on a retrieval spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpecFormat {
	/// JSON if the input starts with `[`, rows otherwise.
	#[default]
	Auto,
	Json,
	Lines,
}

impl SpecFormat {
	/// Resolves `Auto` against the input; explicit formats are returned as is.
	pub fn resolve(self, raw: &str) -> SpecFormat {
		match self {
			SpecFormat::Auto if raw.trim_start().starts_with('[') => SpecFormat::Json,
			SpecFormat::Auto => SpecFormat::Lines,
			explicit => explicit,
		}
	}
}

/// Decodes a retrieval spec into requests in input order.
pub fn parse(raw: &str, format: SpecFormat) -> ParseResult<Vec<RetrievalRequest>> {
	match format.resolve(raw) {
		SpecFormat::Json => parse_json(raw),
		_ => parse_lines(raw),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auto_detects_json() {
		let raw = r#"
			[{"secretPath": "a/b", "secretKey": "k", "outputVariable": "OUT"}]
		"#;
		assert_eq!(SpecFormat::Auto.resolve(raw), SpecFormat::Json);
		assert_eq!(
			parse(raw, SpecFormat::Auto).unwrap(),
			vec![RetrievalRequest::new("a/b", "k", "OUT")]
		);
	}

	#[test]
	fn auto_detects_lines() {
		let raw = "a/b k as OUT";
		assert_eq!(SpecFormat::Auto.resolve(raw), SpecFormat::Lines);
		assert_eq!(
			parse(raw, SpecFormat::Auto).unwrap(),
			vec![RetrievalRequest::new("a/b", "k", "OUT")]
		);
	}

	#[test]
	fn explicit_format_is_not_second_guessed() {
		let err = parse("a/b k as OUT", SpecFormat::Json).unwrap_err();
		assert!(matches!(err, ParseError::InvalidFormat(_)));

		let err = parse(r#"[{"secretPath":"a"}]"#, SpecFormat::Lines).unwrap_err();
		assert!(matches!(err, ParseError::InvalidRow(_)));
	}

	#[test]
	fn both_encodings_build_the_same_plan() {
		let json = r#"[
			{"secretPath": "app/db", "secretKey": "user", "outputVariable": "DB_USER"},
			{"secretPath": "app/db", "secretKey": "password", "outputVariable": "DB_PASSWORD"},
			{"secretPath": "app/api", "secretKey": "token", "outputVariable": "API_TOKEN"}
		]"#;
		let rows = "
			app/db user as DB_USER
			app/db password as DB_PASSWORD
			app/api token as API_TOKEN
		";

		let from_json = RetrievalPlan::from_requests(&parse(json, SpecFormat::Auto).unwrap());
		let from_rows = RetrievalPlan::from_requests(&parse(rows, SpecFormat::Auto).unwrap());

		assert_eq!(from_json, from_rows);
		assert_eq!(from_json.path_count(), 2);
	}
}
