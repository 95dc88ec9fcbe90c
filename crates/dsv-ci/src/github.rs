// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub Actions: workflow commands on stdout plus the file commands in
//! `$GITHUB_OUTPUT` and `$GITHUB_ENV`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use dsv_common_secret::SecretString;
use tracing::debug;

use crate::env::HostEnv;
use crate::error::{CiError, CiResult};
use crate::file_command::{format_record, validate_name, MultilineStyle};
use crate::mask::MaskRegistry;
use crate::{CiHost, HostKind};

const GITHUB_ENV: &str = "GITHUB_ENV";
const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

pub struct GitHubHost {
	masks: MaskRegistry,
	commands: Box<dyn Write + Send>,
	output_file: Option<PathBuf>,
	env_file: Option<PathBuf>,
}

impl GitHubHost {
	pub fn new(
		env: &HostEnv,
		masks: MaskRegistry,
		commands: Box<dyn Write + Send>,
		env_file_override: Option<PathBuf>,
	) -> Self {
		Self {
			masks,
			commands,
			output_file: env.get(GITHUB_OUTPUT).map(PathBuf::from),
			env_file: env_file_override.or_else(|| env.get(GITHUB_ENV).map(PathBuf::from)),
		}
	}

	fn command(&mut self, line: &str) -> CiResult<()> {
		self.commands
			.write_all(line.as_bytes())
			.and_then(|()| self.commands.write_all(b"\n"))
			.and_then(|()| self.commands.flush())
			.map_err(CiError::Command)
	}
}

impl CiHost for GitHubHost {
	fn kind(&self) -> HostKind {
		HostKind::GitHub
	}

	fn mask(&mut self, value: &SecretString) -> CiResult<()> {
		self.masks.register(value.expose());

		// The runner masks per line, so each line is its own command.
		for line in value.expose().lines() {
			let line = line.trim_end_matches('\r');
			if line.trim().is_empty() {
				continue;
			}
			self.command(&format!("::add-mask::{}", escape_data(line)))?;
		}
		Ok(())
	}

	fn supports_outputs(&self) -> bool {
		true
	}

	fn emit_output(&mut self, name: &str, value: &SecretString) -> CiResult<()> {
		let Some(path) = self.output_file.clone() else {
			validate_name(name)?;
			debug!(name, "setting output with workflow command");
			return self.command(&format!(
				"::set-output name={}::{}",
				escape_property(name),
				escape_data(value.expose())
			));
		};

		let record = format_record(name, value.expose(), MultilineStyle::Heredoc)?;
		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)
			.map_err(|source| CiError::Open {
				path: path.clone(),
				source,
			})?;
		file.write_all(record.as_bytes())
			.map_err(|source| CiError::Write { path, source })?;

		debug!(name, "set output");
		Ok(())
	}

	fn export_forced(&self) -> bool {
		false
	}

	fn env_file_path(&self) -> CiResult<PathBuf> {
		self.env_file.clone().ok_or(CiError::MissingEnv(GITHUB_ENV))
	}

	fn multiline_style(&self) -> MultilineStyle {
		MultilineStyle::Heredoc
	}
}

/// Escapes a workflow command's message part.
pub(crate) fn escape_data(value: &str) -> String {
	value
		.replace('%', "%25")
		.replace('\r', "%0D")
		.replace('\n', "%0A")
}

/// Escapes a workflow command's property value.
pub(crate) fn escape_property(value: &str) -> String {
	escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
