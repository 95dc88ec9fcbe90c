// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the DSV REST API.
//!
//! Two calls make up a run:
//! 1. [`DsvClient::get_token`] exchanges a client ID/secret for an access token
//! 2. [`DsvClient::get_secret`] reads a secret document with that token
//!
//! ```ignore
//! use dsv_client::{ClientConfig, DsvClient};
//!
//! let client = DsvClient::with_config(ClientConfig::for_domain("example.secretsvaultcloud.com")?)?;
//! let token = client.get_token(&client_id, &client_secret).await?;
//! let secret = client.get_secret(&token, "servers/db").await?;
//! ```
//!
//! There is no retry and no token refresh: a run is short and any failure
//! ends it.

mod client;
mod error;

pub use client::{ClientConfig, DsvClient};
pub use error::{ClientError, ClientResult};

/// A secret as returned by `GET /secrets/{path}`; the field map is under `data`.
pub type SecretDocument = serde_json::Map<String, serde_json::Value>;
