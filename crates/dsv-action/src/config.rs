// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{Parser, ValueEnum};
use dsv_ci::HostEnv;
use dsv_common_secret::SecretString;
use dsv_retrieve::SpecFormat;
use thiserror::Error;

use crate::pipeline::RunInput;

pub const CLIENT_ID_VAR: &str = "DSV_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "DSV_CLIENT_SECRET";

/// Host variables that turn on debug logging when the job is re-run with
/// debugging enabled.
const HOST_DEBUG_VARS: [&str; 2] = ["RUNNER_DEBUG", "GITLAB_CI_DEBUG"];

/// Read secrets from Delinea DevOps Secrets Vault into a CI job
#[derive(Parser, Debug)]
#[command(name = "dsv-action", version, about, long_about = None)]
pub struct Args {
	/// Tenant domain, e.g. example.secretsvaultcloud.com
	#[arg(long, env = "DSV_DOMAIN", hide_env_values = true)]
	pub domain: Option<String>,

	/// Secrets to read: a JSON array or one `path key as OUTPUT` row per line
	#[arg(long, env = "DSV_RETRIEVE", hide_env_values = true)]
	pub retrieve: Option<String>,

	/// How to read --retrieve
	#[arg(long, env = "DSV_RETRIEVE_FORMAT", value_enum, default_value_t = FormatArg::Auto, hide_env_values = true)]
	pub format: FormatArg,

	/// Also write each value to the environment file read by later steps
	#[arg(long, env = "DSV_SET_ENV", value_parser = BoolishValueParser::new(), hide_env_values = true)]
	pub set_env: bool,

	/// Environment file to write, overriding the CI host's own
	#[arg(long, env = "DSV_ENV_FILE", hide_env_values = true)]
	pub env_file: Option<PathBuf>,

	/// Per-request timeout
	#[arg(long, env = "DSV_TIMEOUT", default_value = "5s", value_parser = humantime::parse_duration, hide_env_values = true)]
	pub timeout: Duration,

	/// Enable debug logging
	#[arg(long, env = "DSV_DEBUG", value_parser = BoolishValueParser::new(), hide_env_values = true)]
	pub debug: bool,

	/// Log output format
	#[arg(long, env = "DSV_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, hide_env_values = true)]
	pub log_format: LogFormat,
}

impl Args {
	/// `--debug`, or the CI host's own debug switch.
	pub fn debug_enabled(&self, env: &HostEnv) -> bool {
		self.debug || HOST_DEBUG_VARS.iter().any(|var| env.flag(var))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
	Auto,
	Json,
	Lines,
}

impl From<FormatArg> for SpecFormat {
	fn from(arg: FormatArg) -> Self {
		match arg {
			FormatArg::Auto => SpecFormat::Auto,
			FormatArg::Json => SpecFormat::Json,
			FormatArg::Lines => SpecFormat::Lines,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
	Pretty,
	Compact,
	Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("{flag} is required (or set {var})")]
	MissingArg {
		flag: &'static str,
		var: &'static str,
	},

	#[error("timeout must be greater than zero")]
	ZeroTimeout,

	#[error(transparent)]
	Secret(#[from] RequiredSecretError),
}

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

#[derive(Debug, Error)]
pub enum RequiredSecretError {
	#[error("required secret not found: set either {var} or {file_var}")]
	Missing { var: String, file_var: String },

	#[error(transparent)]
	Load(#[from] SecretEnvError),
}

/// Loads a secret using the `VAR` / `VAR_FILE` convention.
///
/// `VAR_FILE` takes precedence; one trailing newline is stripped from the
/// file's content. Returns `Ok(None)` when neither is set.
pub fn load_secret_env(env: &HostEnv, var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Some(path) = env.get(&file_var) {
		let path = PathBuf::from(path);
		let content = std::fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(env.get(var).map(SecretString::from))
}

pub fn require_secret_env(env: &HostEnv, var: &str) -> Result<SecretString, RequiredSecretError> {
	load_secret_env(env, var)?.ok_or_else(|| RequiredSecretError::Missing {
		var: var.to_string(),
		file_var: format!("{var}_FILE"),
	})
}

#[derive(Debug, Clone)]
pub struct Credentials {
	pub client_id: SecretString,
	pub client_secret: SecretString,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
	pub domain: String,
	pub credentials: Credentials,
	pub retrieve: String,
	pub format: SpecFormat,
	pub set_env: bool,
	pub env_file: Option<PathBuf>,
	pub timeout: Duration,
}

impl Config {
	pub fn from_args(args: Args, env: &HostEnv) -> Result<Self, ConfigError> {
		let domain = non_blank(args.domain).ok_or(ConfigError::MissingArg {
			flag: "--domain",
			var: "DSV_DOMAIN",
		})?;
		let retrieve = non_blank(args.retrieve).ok_or(ConfigError::MissingArg {
			flag: "--retrieve",
			var: "DSV_RETRIEVE",
		})?;
		if args.timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		let credentials = Credentials {
			client_id: require_secret_env(env, CLIENT_ID_VAR)?,
			client_secret: require_secret_env(env, CLIENT_SECRET_VAR)?,
		};

		Ok(Self {
			domain,
			credentials,
			retrieve,
			format: args.format.into(),
			set_env: args.set_env,
			env_file: args.env_file,
			timeout: args.timeout,
		})
	}

	pub fn run_input(&self) -> RunInput<'_> {
		RunInput {
			spec: &self.retrieve,
			format: self.format,
			credentials: &self.credentials,
			set_env: self.set_env,
		}
	}
}

fn non_blank(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn args(extra: &[&str]) -> Args {
		let mut argv = vec!["dsv-action"];
		argv.extend_from_slice(extra);
		Args::try_parse_from(argv).unwrap()
	}

	fn credential_env() -> HostEnv {
		HostEnv::from_pairs([(CLIENT_ID_VAR, "id"), (CLIENT_SECRET_VAR, "secret")])
	}

	mod load_secret_env_tests {
		use super::*;

		#[test]
		fn returns_none_when_unset() {
			assert!(load_secret_env(&HostEnv::default(), "X").unwrap().is_none());
		}

		#[test]
		fn reads_direct_value() {
			let env = HostEnv::from_pairs([("X", "direct")]);
			assert_eq!(load_secret_env(&env, "X").unwrap().unwrap().expose(), "direct");
		}

		#[test]
		fn file_takes_precedence_and_strips_one_newline() {
			let mut file = NamedTempFile::new().unwrap();
			file.write_all(b"from-file\n\n").unwrap();
			let path = file.path().to_str().unwrap().to_string();

			let env = HostEnv::from_pairs([("X", "direct".to_string()), ("X_FILE", path)]);
			assert_eq!(
				load_secret_env(&env, "X").unwrap().unwrap().expose(),
				"from-file\n"
			);
		}

		#[test]
		fn unreadable_file_is_io_error() {
			let env = HostEnv::from_pairs([("X_FILE", "/nonexistent/dsv/secret")]);
			assert!(matches!(
				load_secret_env(&env, "X"),
				Err(SecretEnvError::Io { .. })
			));
		}

		#[test]
		fn missing_required_secret_names_both_variables() {
			let err = require_secret_env(&HostEnv::default(), "DSV_CLIENT_ID").unwrap_err();
			assert_eq!(
				err.to_string(),
				"required secret not found: set either DSV_CLIENT_ID or DSV_CLIENT_ID_FILE"
			);
		}
	}

	#[test]
	fn defaults() {
		let args = args(&[]);
		assert_eq!(args.format, FormatArg::Auto);
		assert_eq!(args.timeout, Duration::from_secs(5));
		assert_eq!(args.log_format, LogFormat::Pretty);
		assert!(!args.set_env);
		assert!(!args.debug);
	}

	#[test]
	fn parses_flags() {
		let args = args(&[
			"--domain",
			"tenant.example.com",
			"--retrieve",
			"a b as C",
			"--format",
			"lines",
			"--set-env",
			"--env-file",
			"/tmp/env",
			"--timeout",
			"1500ms",
			"--log-format",
			"json",
		]);

		let config = Config::from_args(args, &credential_env()).unwrap();
		assert_eq!(config.domain, "tenant.example.com");
		assert_eq!(config.retrieve, "a b as C");
		assert_eq!(config.format, SpecFormat::Lines);
		assert!(config.set_env);
		assert_eq!(config.env_file, Some(PathBuf::from("/tmp/env")));
		assert_eq!(config.timeout, Duration::from_millis(1500));
		assert_eq!(config.credentials.client_id.expose(), "id");
		assert_eq!(config.credentials.client_secret.expose(), "secret");
	}

	#[test]
	fn blank_domain_is_missing() {
		let args = args(&["--domain", "  ", "--retrieve", "a b as C"]);
		let err = Config::from_args(args, &credential_env()).unwrap_err();
		assert_eq!(err.to_string(), "--domain is required (or set DSV_DOMAIN)");
	}

	#[test]
	fn retrieve_is_required() {
		let args = args(&["--domain", "tenant.example.com"]);
		let err = Config::from_args(args, &credential_env()).unwrap_err();
		assert!(matches!(err, ConfigError::MissingArg { flag: "--retrieve", .. }));
	}

	#[test]
	fn zero_timeout_is_rejected() {
		let args = args(&["--domain", "d", "--retrieve", "a b as C", "--timeout", "0s"]);
		let err = Config::from_args(args, &credential_env()).unwrap_err();
		assert!(matches!(err, ConfigError::ZeroTimeout));
	}

	#[test]
	fn missing_secret_is_reported_without_values() {
		let env = HostEnv::from_pairs([(CLIENT_ID_VAR, "id-value")]);
		let args = args(&["--domain", "d", "--retrieve", "a b as C"]);
		let err = Config::from_args(args, &env).unwrap_err().to_string();

		assert!(err.contains("DSV_CLIENT_SECRET"));
		assert!(!err.contains("id-value"));
	}

	#[test]
	fn config_debug_redacts_credentials() {
		let args = args(&["--domain", "d", "--retrieve", "a b as C"]);
		let config = Config::from_args(args, &credential_env()).unwrap();
		let debug = format!("{config:?}");
		assert!(!debug.contains("\"secret\""));
		assert!(debug.contains("[REDACTED]"));
	}

	#[test]
	fn host_debug_switches_enable_debug() {
		let args = args(&[]);
		assert!(!args.debug_enabled(&HostEnv::default()));
		assert!(args.debug_enabled(&HostEnv::from_pairs([("RUNNER_DEBUG", "1")])));
		assert!(args.debug_enabled(&HostEnv::from_pairs([("GITLAB_CI_DEBUG", "true")])));
	}
}
