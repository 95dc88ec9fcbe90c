// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for the DSV action.
//!
//! Every outbound call goes through a client built here, so the User-Agent,
//! the per-request timeout and the redirect policy are the same everywhere.

mod client;

pub use client::{new_client_with_timeout, user_agent, DEFAULT_TIMEOUT};
