// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The canonical retrieval model shared by both spec encodings.

use serde::{Deserialize, Serialize};

/// One value to fetch: the field `secret_key` of the secret at `secret_path`,
/// published under `output_variable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalRequest {
	pub secret_path: String,
	pub secret_key: String,
	pub output_variable: String,
}

impl RetrievalRequest {
	pub fn new(
		secret_path: impl Into<String>,
		secret_key: impl Into<String>,
		output_variable: impl Into<String>,
	) -> Self {
		Self {
			secret_path: secret_path.into(),
			secret_key: secret_key.into(),
			output_variable: output_variable.into(),
		}
	}
}

/// A field to extract from an already-fetched secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
	pub secret_key: String,
	pub output_variable: String,
}

/// All fields requested from one secret path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretGroup {
	pub secret_path: String,
	pub fields: Vec<FieldMapping>,
}

/// Requests grouped by secret path so each secret is fetched once.
///
/// Groups keep the order in which their path first appeared, and fields keep
/// input order within a group, so publication order follows the retrieval spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalPlan {
	groups: Vec<SecretGroup>,
}

impl RetrievalPlan {
	pub fn from_requests(requests: &[RetrievalRequest]) -> Self {
		let mut groups: Vec<SecretGroup> = Vec::new();

		for request in requests {
			let field = FieldMapping {
				secret_key: request.secret_key.clone(),
				output_variable: request.output_variable.clone(),
			};

			match groups
				.iter_mut()
				.find(|g| g.secret_path == request.secret_path)
			{
				Some(group) => group.fields.push(field),
				None => groups.push(SecretGroup {
					secret_path: request.secret_path.clone(),
					fields: vec![field],
				}),
			}
		}

		Self { groups }
	}

	pub fn groups(&self) -> &[SecretGroup] {
		&self.groups
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	/// Number of distinct secret paths, i.e. fetches the run will make.
	pub fn path_count(&self) -> usize {
		self.groups.len()
	}

	/// Number of values the run will publish.
	pub fn field_count(&self) -> usize {
		self.groups.iter().map(|g| g.fields.len()).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn groups_by_path_in_first_seen_order() {
		let requests = vec![
			RetrievalRequest::new("folder1/secret1", "user", "DB_USER"),
			RetrievalRequest::new("folder1/secret2", "token", "API_TOKEN"),
			RetrievalRequest::new("folder1/secret1", "password", "DB_PASSWORD"),
		];

		let plan = RetrievalPlan::from_requests(&requests);

		assert_eq!(plan.path_count(), 2);
		assert_eq!(plan.field_count(), 3);

		let groups = plan.groups();
		assert_eq!(groups[0].secret_path, "folder1/secret1");
		assert_eq!(
			groups[0]
				.fields
				.iter()
				.map(|f| f.output_variable.as_str())
				.collect::<Vec<_>>(),
			vec!["DB_USER", "DB_PASSWORD"]
		);
		assert_eq!(groups[1].secret_path, "folder1/secret2");
		assert_eq!(groups[1].fields[0].secret_key, "token");
	}

	#[test]
	fn empty_requests_give_empty_plan() {
		let plan = RetrievalPlan::from_requests(&[]);
		assert!(plan.is_empty());
		assert_eq!(plan.field_count(), 0);
	}

	#[test]
	fn serde_uses_camel_case_names() {
		let request = RetrievalRequest::new("a/b", "k", "OUT");
		let json = serde_json::to_value(&request).unwrap();
		assert_eq!(json["secretPath"], "a/b");
		assert_eq!(json["secretKey"], "k");
		assert_eq!(json["outputVariable"], "OUT");
	}
}
