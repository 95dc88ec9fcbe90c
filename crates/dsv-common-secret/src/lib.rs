// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for the sensitive strings that flow through a DSV run.
//!
//! Client IDs, client secrets, access tokens and the field values pulled out of
//! secret documents are all held in a [`SecretString`] from the moment they are
//! read until the moment they are handed to the CI host. The wrapper:
//!
//! - prints `[REDACTED]` for `Debug`, `Display` and `Serialize`
//! - zeroizes its memory on drop
//! - has no `Deref`; the raw value is only reachable through [`Secret::expose`]
//!
//! ```
//! use dsv_common_secret::SecretString;
//!
//! let token = SecretString::new("eyJhbGciOi".to_string());
//!
//! assert_eq!(format!("{token}"), "[REDACTED]");
//! assert_eq!(format!("{token:?}"), "Secret(\"[REDACTED]\")");
//! assert_eq!(token.expose(), "eyJhbGciOi");
//! ```
//!
//! Structured logging goes through the same impls, so
//! `debug!(token = %token, "authenticated")` records `[REDACTED]`.

use std::fmt;
use zeroize::Zeroize;

/// The placeholder written wherever a secret would otherwise be formatted.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be formatted, serialized or logged in clear.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: credentials, tokens and secret field values are strings.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Access the raw value.
	///
	/// Every call site is a place where the value leaves the wrapper, so keep
	/// them few: request bodies, headers, CI commands and environment files.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl From<String> for Secret<String> {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for Secret<String> {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	// Lets response structs deserialize tokens straight into the wrapper.
	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}
