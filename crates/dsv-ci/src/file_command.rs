// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `NAME=value` records shared by environment and output files.

use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::{CiError, CiResult};
use crate::HostKind;

/// How a value containing a line break is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultilineStyle {
	/// `NAME<<DELIM` block, as GitHub Actions file commands accept.
	Heredoc,
	/// Refused; the host reads one `NAME=value` per line.
	Reject(HostKind),
}

pub(crate) fn validate_name(name: &str) -> CiResult<()> {
	if name.is_empty() || name.contains(['=', '\n', '\r']) {
		return Err(CiError::InvalidName(name.to_string()));
	}
	Ok(())
}

/// Formats one record, ending in a newline.
///
/// The record is built in a zeroizing buffer and written with a single call,
/// so a failed write leaves no half record behind on the caller's side.
pub(crate) fn format_record(
	name: &str,
	value: &str,
	style: MultilineStyle,
) -> CiResult<Zeroizing<String>> {
	validate_name(name)?;

	let multiline = value.contains(['\n', '\r']);
	let mut record = Zeroizing::new(String::with_capacity(name.len() + value.len() + 64));

	if !multiline {
		record.push_str(name);
		record.push('=');
		record.push_str(value);
		record.push('\n');
		return Ok(record);
	}

	match style {
		MultilineStyle::Reject(host) => Err(CiError::MultilineValue(name.to_string(), host)),
		MultilineStyle::Heredoc => {
			let delimiter = heredoc_delimiter(value);
			record.push_str(name);
			record.push_str("<<");
			record.push_str(&delimiter);
			record.push('\n');
			record.push_str(value);
			record.push('\n');
			record.push_str(&delimiter);
			record.push('\n');
			Ok(record)
		}
	}
}

fn heredoc_delimiter(value: &str) -> String {
	loop {
		let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
		if !value.contains(&delimiter) {
			return delimiter;
		}
	}
}
