// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log writer that masks registered values before they reach the sink.

use std::io::{self, Write};

use tracing_subscriber::fmt::MakeWriter;

use crate::mask::MaskRegistry;

/// A writer that masks registered values before writing to the underlying writer.
pub struct RedactingWriter<W: Write> {
	inner: W,
	masks: MaskRegistry,
	buffer: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
	pub fn new(inner: W, masks: MaskRegistry) -> Self {
		Self {
			inner,
			masks,
			buffer: Vec::new(),
		}
	}

	fn write_redacted(&mut self, bytes: &[u8]) -> io::Result<()> {
		// Non-UTF8: lossy decoding still lets ASCII values be found.
		let text = String::from_utf8_lossy(bytes);
		let redacted = self.masks.redact(&text);
		self.inner.write_all(redacted.as_bytes())
	}
}

impl<W: Write> Drop for RedactingWriter<W> {
	fn drop(&mut self) {
		let _ = self.flush();
	}
}

impl<W: Write> Write for RedactingWriter<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.buffer.extend_from_slice(buf);

		while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
			let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
			self.write_redacted(&line)?;
		}

		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		if !self.buffer.is_empty() {
			let rest = std::mem::take(&mut self.buffer);
			self.write_redacted(&rest)?;
		}
		self.inner.flush()
	}
}

/// A MakeWriter that wraps another MakeWriter and masks registered values.
pub struct RedactingMakeWriter<M> {
	inner: M,
	masks: MaskRegistry,
}

impl<M> RedactingMakeWriter<M> {
	pub fn new(inner: M, masks: MaskRegistry) -> Self {
		Self { inner, masks }
	}
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
	M: MakeWriter<'a>,
{
	type Writer = RedactingWriter<M::Writer>;

	fn make_writer(&'a self) -> Self::Writer {
		RedactingWriter::new(self.inner.make_writer(), self.masks.clone())
	}
}
