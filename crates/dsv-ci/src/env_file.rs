// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Append-only environment file read by later job steps.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use dsv_common_secret::SecretString;
use tracing::debug;

use crate::error::{CiError, CiResult};
use crate::file_command::{format_record, MultilineStyle};

/// Open handle on an environment file.
///
/// The file is created owner-only (`0600`) if missing and always opened for
/// append, so records written by earlier steps are kept.
#[derive(Debug)]
pub struct EnvFile {
	path: PathBuf,
	file: File,
	style: MultilineStyle,
}

impl EnvFile {
	pub fn open(path: impl Into<PathBuf>, style: MultilineStyle) -> CiResult<Self> {
		let path = path.into();

		let mut options = OpenOptions::new();
		options.create(true).append(true);
		#[cfg(unix)]
		{
			use std::os::unix::fs::OpenOptionsExt;
			options.mode(0o600);
		}

		let file = options.open(&path).map_err(|source| CiError::Open {
			path: path.clone(),
			source,
		})?;

		debug!(path = %path.display(), "opened environment file");
		Ok(Self { path, file, style })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Appends `NAME=value` with the name upper-cased.
	pub fn export(&mut self, name: &str, value: &SecretString) -> CiResult<()> {
		let name = name.to_uppercase();
		let record = format_record(&name, value.expose(), self.style)?;

		self.file
			.write_all(record.as_bytes())
			.and_then(|()| self.file.flush())
			.map_err(|source| CiError::Write {
				path: self.path.clone(),
				source,
			})?;

		debug!(name = %name, path = %self.path.display(), "exported variable");
		Ok(())
	}
}
