// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide set of literal values that must never reach a log sink.

use std::borrow::Cow;
use std::sync::Arc;

use dsv_common_secret::SecretString;
use parking_lot::RwLock;
use zeroize::Zeroizing;

/// What a masked value is replaced with, matching how CI hosts render masks.
pub const MASK: &str = "***";

/// Shared registry of masked values.
///
/// Cloning is cheap and every clone sees the same set. The CI host registers
/// each value it masks, and [`crate::RedactingMakeWriter`] consults the
/// registry for every line the action logs.
#[derive(Clone, Default)]
pub struct MaskRegistry {
	// Longest first, so a value that contains another is replaced whole.
	values: Arc<RwLock<Vec<SecretString>>>,
}

impl MaskRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `value` and, for multi-line values, each of its lines.
	///
	/// Logs are redacted line by line, so a multi-line secret is only caught
	/// if its lines are registered on their own. The JSON and `Debug` escaped
	/// spellings of each are registered too, since log formatters quote field
	/// values. Blank input is ignored.
	pub fn register(&self, value: &str) {
		let mut values = self.values.write();

		let candidates = std::iter::once(value).chain(value.lines());
		for candidate in candidates {
			let candidate = candidate.trim_end_matches('\r');
			if candidate.trim().is_empty() {
				continue;
			}
			for form in spellings(candidate) {
				insert_longest_first(&mut values, form);
			}
		}
	}

	pub fn len(&self) -> usize {
		self.values.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.read().is_empty()
	}

	/// Replaces every registered value in `input` with [`MASK`].
	pub fn redact<'a>(&self, input: &'a str) -> Cow<'a, str> {
		let values = self.values.read();

		let mut output = Cow::Borrowed(input);
		for value in values.iter() {
			let value = value.expose();
			if output.contains(value.as_str()) {
				output = Cow::Owned(output.replace(value.as_str(), MASK));
			}
		}
		output
	}
}

/// The raw value plus its escaped forms inside a JSON string and a `Debug`
/// string literal.
fn spellings(raw: &str) -> Vec<Cow<'_, str>> {
	let mut forms = vec![Cow::Borrowed(raw)];
	let escaped = [
		serde_json::to_string(raw).ok(),
		Some(format!("{raw:?}")),
	];
	for quoted in escaped.into_iter().flatten() {
		let quoted = Zeroizing::new(quoted);
		let inner = unquote(&quoted);
		if !forms.iter().any(|f| **f == *inner) {
			forms.push(Cow::Owned(inner.to_string()));
		}
	}
	forms
}

fn unquote(quoted: &str) -> &str {
	quoted
		.strip_prefix('"')
		.and_then(|s| s.strip_suffix('"'))
		.unwrap_or(quoted)
}

fn insert_longest_first(values: &mut Vec<SecretString>, candidate: Cow<'_, str>) {
	if values.iter().any(|v| v.expose().as_str() == &*candidate) {
		return;
	}
	let at = values
		.iter()
		.position(|v| v.expose().len() < candidate.len())
		.unwrap_or(values.len());
	values.insert(at, SecretString::from(candidate.into_owned()));
}

impl std::fmt::Debug for MaskRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MaskRegistry")
			.field("len", &self.len())
			.finish()
	}
}
