// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dsv_action::logging::init_tracing;
use dsv_action::{Args, Config, Pipeline};
use dsv_ci::{CiHost, HostEnv, MaskRegistry};
use dsv_client::{ClientConfig, DsvClient};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let args = Args::parse();
	let env = HostEnv::from_process();
	let masks = MaskRegistry::new();

	init_tracing(args.log_format, args.debug_enabled(&env), masks.clone());

	let host = dsv_ci::detect(
		&env,
		masks,
		Box::new(std::io::stdout()),
		args.env_file.clone(),
	);

	let (config, host) = match prepare(args, &env, host) {
		Ok(prepared) => prepared,
		Err(e) => {
			error!("{e:#}");
			return ExitCode::FAILURE;
		}
	};

	let client = match build_client(&config, host.as_ref()) {
		Ok(client) => client,
		Err(e) => {
			error!("{e:#}");
			return ExitCode::FAILURE;
		}
	};

	let mut pipeline = Pipeline::new(client, host);
	match pipeline.run(config.run_input()).await {
		Ok(summary) => {
			info!(
				secrets = summary.secrets_fetched,
				values = summary.values_published,
				"done"
			);
			ExitCode::SUCCESS
		}
		Err(e) => {
			error!("{e}");
			ExitCode::FAILURE
		}
	}
}

/// Validates configuration and masks the credentials before anything else
/// can log them.
fn prepare(args: Args, env: &HostEnv, mut host: Box<dyn CiHost>) -> Result<(Config, Box<dyn CiHost>)> {
	let config = Config::from_args(args, env).context("invalid configuration")?;

	host.mask(&config.credentials.client_id)
		.context("cannot mask client id")?;
	host.mask(&config.credentials.client_secret)
		.context("cannot mask client secret")?;

	Ok((config, host))
}

fn build_client(config: &Config, host: &dyn CiHost) -> Result<DsvClient> {
	let client_config = ClientConfig::for_domain(&config.domain)
		.context("invalid domain")?
		.with_timeout(config.timeout)
		.with_client_tag(host.client_tag());
	DsvClient::with_config(client_config).context("failed to create DSV client")
}
