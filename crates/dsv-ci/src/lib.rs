// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The CI host the action runs under.
//!
//! A host is detected once at start-up from environment markers and used
//! through the [`CiHost`] trait: masking values in the job log, emitting step
//! outputs and locating the environment file read by later steps. Every value
//! a host masks is also added to a shared [`MaskRegistry`], which
//! [`RedactingMakeWriter`] uses to keep those values out of the action's own
//! log output.

pub mod env;
pub mod env_file;
pub mod error;
pub mod file_command;
pub mod generic;
pub mod github;
pub mod gitlab;
pub mod mask;
pub mod redact;

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use dsv_common_secret::SecretString;
use tracing::info;

pub use env::HostEnv;
pub use env_file::EnvFile;
pub use error::{CiError, CiResult};
pub use file_command::MultilineStyle;
pub use generic::GenericHost;
pub use github::GitHubHost;
pub use gitlab::GitLabHost;
pub use mask::{MaskRegistry, MASK};
pub use redact::{RedactingMakeWriter, RedactingWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
	GitHub,
	GitLab,
	Generic,
}

impl HostKind {
	/// Value of the `Delinea-DSV-Client` header for this host.
	pub fn client_tag(self) -> Option<&'static str> {
		match self {
			HostKind::GitHub => Some("github-action"),
			HostKind::GitLab => Some("gitlab-job"),
			HostKind::Generic => None,
		}
	}

	pub fn detect(env: &HostEnv) -> Self {
		if env.get("GITHUB_ACTIONS") == Some("true") || env.get("GITHUB_ACTION").is_some() {
			HostKind::GitHub
		} else if env.get("GITLAB_CI").is_some() {
			HostKind::GitLab
		} else {
			HostKind::Generic
		}
	}
}

impl fmt::Display for HostKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HostKind::GitHub => write!(f, "GitHub Actions"),
			HostKind::GitLab => write!(f, "GitLab CI"),
			HostKind::Generic => write!(f, "generic"),
		}
	}
}

/// Capabilities of a CI host.
pub trait CiHost: Send {
	fn kind(&self) -> HostKind;

	fn client_tag(&self) -> Option<&'static str> {
		self.kind().client_tag()
	}

	/// Hides `value` in the job log. Must be called before the value is used.
	fn mask(&mut self, value: &SecretString) -> CiResult<()>;

	fn supports_outputs(&self) -> bool;

	/// Publishes a step output named `name`, verbatim.
	fn emit_output(&mut self, name: &str, value: &SecretString) -> CiResult<()>;

	/// Whether values are written to the environment file regardless of
	/// configuration.
	fn export_forced(&self) -> bool;

	fn env_file_path(&self) -> CiResult<PathBuf>;

	fn multiline_style(&self) -> MultilineStyle;

	fn open_env_file(&self) -> CiResult<EnvFile> {
		EnvFile::open(self.env_file_path()?, self.multiline_style())
	}
}

/// Picks the host from `env`.
///
/// `commands` receives workflow commands (stdout in the binary).
/// `env_file_override` replaces the host's own environment file location.
pub fn detect(
	env: &HostEnv,
	masks: MaskRegistry,
	commands: Box<dyn Write + Send>,
	env_file_override: Option<PathBuf>,
) -> Box<dyn CiHost> {
	let kind = HostKind::detect(env);
	info!(host = %kind, "detected CI host");

	match kind {
		HostKind::GitHub => Box::new(GitHubHost::new(env, masks, commands, env_file_override)),
		HostKind::GitLab => Box::new(GitLabHost::new(env, masks, env_file_override)),
		HostKind::Generic => Box::new(GenericHost::new(masks, env_file_override)),
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use test_support::SharedBuffer;

	fn detect_from(pairs: &[(&str, &str)]) -> Box<dyn CiHost> {
		detect(
			&HostEnv::from_pairs(pairs.iter().copied()),
			MaskRegistry::new(),
			Box::new(SharedBuffer::default()),
			None,
		)
	}

	#[test]
	fn detects_github() {
		assert_eq!(detect_from(&[("GITHUB_ACTIONS", "true")]).kind(), HostKind::GitHub);
		assert_eq!(detect_from(&[("GITHUB_ACTION", "__run")]).kind(), HostKind::GitHub);
	}

	#[test]
	fn detects_gitlab() {
		assert_eq!(detect_from(&[("GITLAB_CI", "true")]).kind(), HostKind::GitLab);
	}

	#[test]
	fn falls_back_to_generic() {
		assert_eq!(detect_from(&[]).kind(), HostKind::Generic);
		assert_eq!(detect_from(&[("GITHUB_ACTIONS", "false")]).kind(), HostKind::Generic);
	}

	#[test]
	fn client_tags() {
		assert_eq!(detect_from(&[("GITHUB_ACTIONS", "true")]).client_tag(), Some("github-action"));
		assert_eq!(detect_from(&[("GITLAB_CI", "true")]).client_tag(), Some("gitlab-job"));
		assert_eq!(detect_from(&[]).client_tag(), None);
	}

	#[test]
	fn only_gitlab_forces_export() {
		assert!(!detect_from(&[("GITHUB_ACTIONS", "true")]).export_forced());
		assert!(detect_from(&[("GITLAB_CI", "true")]).export_forced());
		assert!(!detect_from(&[]).export_forced());
	}

	#[test]
	fn opens_overridden_env_file() {
		let dir = tempfile::TempDir::new().unwrap();
		let path = dir.path().join("env");

		let host = detect(
			&HostEnv::default(),
			MaskRegistry::new(),
			Box::new(SharedBuffer::default()),
			Some(path.clone()),
		);
		let env_file = host.open_env_file().unwrap();
		assert_eq!(env_file.path(), path.as_path());
		assert!(path.exists());
	}
}
