// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One retrieval run: parse, authenticate, then fetch and publish each
//! secret in turn.

use std::error::Error as _;

use dsv_ci::{CiError, CiHost};
use dsv_client::{ClientError, DsvClient};
use dsv_retrieve::{ParseError, RetrievalPlan, SpecFormat};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::Credentials;
use crate::publish::{self, PublishError};

/// Where a run is. Only moves forward; any error ends in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
	Init,
	Parsed,
	Authenticated,
	Fetching(String),
	Publishing(String),
	Done,
	Failed(String),
}

/// Failure of a run.
///
/// `Display` is the short text shown to the job. The cause, which may name
/// URLs or files, is kept as the error source.
#[derive(Debug, Error)]
pub enum PipelineError {
	#[error(transparent)]
	Parse(#[from] ParseError),

	#[error("unable to get access token")]
	Auth(#[source] ClientError),

	#[error("cannot mask value")]
	Mask(#[source] CiError),

	#[error("unable to get secret")]
	Fetch(#[source] ClientError),

	#[error("{}", .0.user_message())]
	Extract(#[source] PublishError),

	#[error("{}", .0.user_message())]
	Publish(#[source] PublishError),

	#[error("cannot set environment variable")]
	EnvFile(#[source] CiError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
	pub secrets_fetched: usize,
	pub values_published: usize,
}

/// What to retrieve and how to authenticate.
#[derive(Debug, Clone, Copy)]
pub struct RunInput<'a> {
	pub spec: &'a str,
	pub format: SpecFormat,
	pub credentials: &'a Credentials,
	pub set_env: bool,
}

pub struct Pipeline {
	client: DsvClient,
	host: Box<dyn CiHost>,
	state: RunState,
}

impl Pipeline {
	pub fn new(client: DsvClient, host: Box<dyn CiHost>) -> Self {
		Self {
			client,
			host,
			state: RunState::Init,
		}
	}

	pub fn state(&self) -> &RunState {
		&self.state
	}

	pub async fn run(&mut self, input: RunInput<'_>) -> Result<RunSummary, PipelineError> {
		let result = self.execute(input).await;

		if let Err(err) = &result {
			match err.source() {
				Some(source) => debug!(error = %source, state = ?self.state, "run failed"),
				None => debug!(state = ?self.state, "run failed"),
			}
			self.state = RunState::Failed(err.to_string());
		}
		result
	}

	#[instrument(skip_all, fields(host = %self.host.kind()))]
	async fn execute(&mut self, input: RunInput<'_>) -> Result<RunSummary, PipelineError> {
		let requests = dsv_retrieve::parse(input.spec, input.format)?;
		let plan = RetrievalPlan::from_requests(&requests);
		self.state = RunState::Parsed;
		info!(
			secrets = plan.path_count(),
			fields = plan.field_count(),
			"parsed retrieval spec"
		);

		let token = self
			.client
			.get_token(&input.credentials.client_id, &input.credentials.client_secret)
			.await
			.map_err(PipelineError::Auth)?;
		self.host.mask(&token).map_err(PipelineError::Mask)?;
		self.state = RunState::Authenticated;
		debug!("authenticated");

		let export = input.set_env || self.host.export_forced();
		let mut env_file = if export {
			Some(self.host.open_env_file().map_err(PipelineError::EnvFile)?)
		} else {
			None
		};
		if !export && !self.host.supports_outputs() {
			warn!(host = %self.host.kind(), "values are masked but not published; enable --set-env to export them");
		}

		let mut summary = RunSummary::default();
		for group in plan.groups() {
			self.state = RunState::Fetching(group.secret_path.clone());
			let document = self
				.client
				.get_secret(&token, &group.secret_path)
				.await
				.map_err(PipelineError::Fetch)?;
			summary.secrets_fetched += 1;

			self.state = RunState::Publishing(group.secret_path.clone());
			for field in &group.fields {
				let value = publish::extract(&document, &field.secret_key)
					.map_err(PipelineError::Extract)?;
				publish::publish(
					&value,
					&field.output_variable,
					self.host.as_mut(),
					env_file.as_mut(),
				)
				.map_err(PipelineError::Publish)?;
				summary.values_published += 1;
			}
			info!(path = %group.secret_path, fields = group.fields.len(), "retrieved secret");
		}

		self.state = RunState::Done;
		Ok(summary)
	}
}
