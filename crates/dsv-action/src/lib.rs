// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reads secrets from Delinea DevOps Secrets Vault inside a CI job.
//!
//! The run parses a retrieval spec, exchanges client credentials for a
//! token, fetches each secret once and publishes the requested fields as
//! masked step outputs and environment-file entries for later steps.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod publish;

pub use config::{Args, Config, ConfigError, Credentials, LogFormat};
pub use pipeline::{Pipeline, PipelineError, RunInput, RunState, RunSummary};
pub use publish::{extract, publish, PublishError};
