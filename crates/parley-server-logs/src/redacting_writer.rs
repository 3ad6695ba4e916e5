// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::{self, Write};

use tracing_subscriber::fmt::MakeWriter;

use crate::redact::redact;

/// Buffers output until a full line is available, then writes it with
/// credentials replaced. A trailing partial line is redacted on flush or drop.
pub struct RedactingWriter<W: Write> {
	inner: W,
	buffer: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
	pub fn new(inner: W) -> Self {
		Self {
			inner,
			buffer: Vec::new(),
		}
	}

	fn redacted(bytes: &[u8]) -> String {
		// Lossy decoding still lets ASCII tokens be found in mixed input.
		let text = String::from_utf8_lossy(bytes);
		redact(&text).into_owned()
	}
}

impl<W: Write> Drop for RedactingWriter<W> {
	fn drop(&mut self) {
		let _ = self.flush();
	}
}

impl<W: Write> Write for RedactingWriter<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
			self.buffer.extend_from_slice(buf);
			return Ok(buf.len());
		};

		// Nothing is kept from `buf` unless the completed lines reach `inner`,
		// so a retried write does not duplicate output.
		let (complete, rest) = buf.split_at(last_newline + 1);
		let mut pending = self.buffer.clone();
		pending.extend_from_slice(complete);

		let mut out = String::with_capacity(pending.len());
		for line in pending.split_inclusive(|&b| b == b'\n') {
			out.push_str(&Self::redacted(line));
		}
		self.inner.write_all(out.as_bytes())?;

		self.buffer.clear();
		self.buffer.extend_from_slice(rest);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		if !self.buffer.is_empty() {
			let out = Self::redacted(&self.buffer);
			self.inner.write_all(out.as_bytes())?;
			self.buffer.clear();
		}
		self.inner.flush()
	}
}

/// Wraps another [`MakeWriter`] so every writer it hands out redacts.
pub struct RedactingMakeWriter<M> {
	inner: M,
}

impl<M> RedactingMakeWriter<M> {
	pub fn new(inner: M) -> Self {
		Self { inner }
	}
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
	M: MakeWriter<'a>,
{
	type Writer = RedactingWriter<M::Writer>;

	fn make_writer(&'a self) -> Self::Writer {
		RedactingWriter::new(self.inner.make_writer())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	fn oauth_token() -> String {
		format!("gho_{}", "A1b2C3d4E5f6G7h8I9j0K1l2M3n4O5p6Q7r8")
	}

	fn render(chunks: &[&[u8]]) -> String {
		let mut output = Vec::new();
		{
			let mut writer = RedactingWriter::new(&mut output);
			for chunk in chunks {
				writer.write_all(chunk).unwrap();
			}
		}
		String::from_utf8(output).unwrap()
	}

	#[test]
	fn redacts_token_in_single_line() {
		let token = oauth_token();
		let line = format!("access_token={token}\n");
		let result = render(&[line.as_bytes()]);
		assert!(result.contains("[REDACTED:github-token]"), "Result: {result}");
		assert!(!result.contains(&token));
	}

	#[test]
	fn token_split_across_writes_is_still_redacted() {
		let token = oauth_token();
		let (head, tail) = token.split_at(10);
		let tail = format!("{tail}\n");
		let result = render(&[b"Authorization: Bearer ", head.as_bytes(), tail.as_bytes()]);
		assert!(!result.contains(&token), "Result: {result}");
		assert!(result.starts_with("Authorization: Bearer [REDACTED:"));
	}

	#[test]
	fn clean_lines_pass_through() {
		let result = render(&[b"github org check passed\n", b"user found\n"]);
		assert_eq!(result, "github org check passed\nuser found\n");
	}

	#[test]
	fn partial_line_is_redacted_on_drop() {
		let token = oauth_token();
		let result = render(&[format!("token {token}").as_bytes()]);
		assert!(result.contains("[REDACTED:"), "Result: {result}");
		assert!(!result.ends_with('\n'));
	}

	struct FlakyWriter<'a> {
		failures_left: usize,
		out: &'a mut Vec<u8>,
	}

	impl Write for FlakyWriter<'_> {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			if self.failures_left > 0 {
				self.failures_left -= 1;
				return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
			}
			self.out.extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn failed_write_can_be_retried_without_duplicates() {
		let mut output = Vec::new();
		{
			let mut writer = RedactingWriter::new(FlakyWriter {
				failures_left: 1,
				out: &mut output,
			});
			assert!(writer.write(b"org lookup failed\n").is_err());
			assert_eq!(writer.write(b"org lookup failed\n").unwrap(), 18);
		}
		assert_eq!(String::from_utf8(output).unwrap(), "org lookup failed\n");
	}

	#[test]
	fn failed_write_keeps_earlier_partial_line() {
		let mut output = Vec::new();
		{
			let mut writer = RedactingWriter::new(FlakyWriter {
				failures_left: 1,
				out: &mut output,
			});
			writer.write_all(b"checking ").unwrap();
			assert!(writer.write(b"membership\n").is_err());
			writer.write_all(b"membership\n").unwrap();
		}
		assert_eq!(String::from_utf8(output).unwrap(), "checking membership\n");
	}

	#[derive(Clone, Default)]
	struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

	impl Write for SharedBuffer {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	impl<'a> MakeWriter<'a> for SharedBuffer {
		type Writer = SharedBuffer;

		fn make_writer(&'a self) -> Self::Writer {
			self.clone()
		}
	}

	#[test]
	fn make_writer_wraps_each_writer() {
		let sink = SharedBuffer::default();
		let make_writer = RedactingMakeWriter::new(sink.clone());
		let token = oauth_token();

		{
			let mut writer = make_writer.make_writer();
			writeln!(writer, "fetching orgs with {token}").unwrap();
		}

		let result = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
		assert!(!result.contains(&token), "Result: {result}");
	}
}
