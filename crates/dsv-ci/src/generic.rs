// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use dsv_common_secret::SecretString;

use crate::error::{CiError, CiResult};
use crate::file_command::MultilineStyle;
use crate::mask::MaskRegistry;
use crate::{CiHost, HostKind};

/// Any other runner, or a local shell. Only the environment file given with
/// `--env-file` is available.
pub struct GenericHost {
	masks: MaskRegistry,
	env_file: Option<PathBuf>,
}

impl GenericHost {
	pub fn new(masks: MaskRegistry, env_file: Option<PathBuf>) -> Self {
		Self { masks, env_file }
	}
}

impl CiHost for GenericHost {
	fn kind(&self) -> HostKind {
		HostKind::Generic
	}

	fn mask(&mut self, value: &SecretString) -> CiResult<()> {
		self.masks.register(value.expose());
		Ok(())
	}

	fn supports_outputs(&self) -> bool {
		false
	}

	fn emit_output(&mut self, _name: &str, _value: &SecretString) -> CiResult<()> {
		Err(CiError::Unsupported {
			host: HostKind::Generic,
			capability: "step outputs",
		})
	}

	fn export_forced(&self) -> bool {
		false
	}

	fn env_file_path(&self) -> CiResult<PathBuf> {
		self.env_file
			.clone()
			.ok_or(CiError::NoEnvFile(HostKind::Generic))
	}

	fn multiline_style(&self) -> MultilineStyle {
		MultilineStyle::Reject(HostKind::Generic)
	}
}
