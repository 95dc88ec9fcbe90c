// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use dsv_ci::{MaskRegistry, RedactingMakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Directive used when `RUST_LOG` is not set.
pub fn default_directive(debug: bool) -> String {
	format!("dsv={}", if debug { "debug" } else { "info" })
}

/// Installs the global subscriber. Logs go to stderr with every value in
/// `masks` replaced, including values registered after this call.
pub fn init_tracing(format: LogFormat, debug: bool, masks: MaskRegistry) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

	let redacting_writer = RedactingMakeWriter::new(std::io::stderr, masks);

	match format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(redacting_writer))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(redacting_writer))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(redacting_writer))
				.init();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_directive_follows_debug() {
		assert_eq!(default_directive(false), "dsv=info");
		assert_eq!(default_directive(true), "dsv=debug");
	}
}
