// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

/// Snapshot of the variables the CI host exposes to the job.
///
/// Taken once at start-up so host detection doesn't race with anything that
/// changes the process environment later, and so tests can supply their own.
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
	vars: HashMap<String, String>,
}

impl HostEnv {
	pub fn from_process() -> Self {
		Self {
			vars: std::env::vars().collect(),
		}
	}

	pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: pairs
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}

	/// Value of `name`; set-but-empty counts as unset.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.vars
			.get(name)
			.map(String::as_str)
			.filter(|v| !v.is_empty())
	}

	/// True when `name` is set to anything but `0` or `false`.
	pub fn flag(&self, name: &str) -> bool {
		match self.get(name) {
			Some(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false"),
			None => false,
		}
	}
}
