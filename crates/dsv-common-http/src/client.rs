// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use reqwest::{redirect, Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// Upper bound for a single vault request so a CI job can't hang on it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a client builder with the action's User-Agent and redirects disabled.
///
/// Redirects are refused so the `Authorization` header is never replayed to a
/// host other than the tenant.
fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.redirect(redirect::Policy::none())
}

/// Creates a client whose requests (connect through body) are bounded by `timeout`.
pub fn new_client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	debug!(timeout_ms = timeout.as_millis() as u64, "building HTTP client");
	builder().timeout(timeout).build()
}

/// Returns the User-Agent string: `dsv-action/{version}`.
pub fn user_agent() -> String {
	format!("dsv-action/{}", env!("CARGO_PKG_VERSION"))
}
