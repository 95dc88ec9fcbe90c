// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitLab CI. Masking is local only and values always go to a per-job
//! environment file under the builds directory.

use std::path::{Path, PathBuf};

use dsv_common_secret::SecretString;

use crate::env::HostEnv;
use crate::error::{CiError, CiResult};
use crate::file_command::MultilineStyle;
use crate::mask::MaskRegistry;
use crate::{CiHost, HostKind};

const DEFAULT_BUILDS_DIR: &str = "/builds";

pub struct GitLabHost {
	masks: MaskRegistry,
	// Name of the missing variable when the path can't be built.
	env_file: Result<PathBuf, &'static str>,
}

impl GitLabHost {
	pub fn new(env: &HostEnv, masks: MaskRegistry, env_file_override: Option<PathBuf>) -> Self {
		let env_file = match env_file_override {
			Some(path) => Ok(path),
			None => job_env_file(env),
		};
		Self { masks, env_file }
	}
}

fn job_env_file(env: &HostEnv) -> Result<PathBuf, &'static str> {
	let builds = env.get("CI_BUILDS_DIR").unwrap_or(DEFAULT_BUILDS_DIR);
	let project = env.get("CI_PROJECT_PATH").ok_or("CI_PROJECT_PATH")?;
	let job = env.get("CI_JOB_NAME").ok_or("CI_JOB_NAME")?;
	Ok(Path::new(builds).join(project).join(job))
}

impl CiHost for GitLabHost {
	fn kind(&self) -> HostKind {
		HostKind::GitLab
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
			host: HostKind::GitLab,
			capability: "step outputs",
		})
	}

	fn export_forced(&self) -> bool {
		true
	}

	fn env_file_path(&self) -> CiResult<PathBuf> {
		self.env_file.clone().map_err(CiError::MissingEnv)
	}

	fn multiline_style(&self) -> MultilineStyle {
		MultilineStyle::Reject(HostKind::GitLab)
	}
}
