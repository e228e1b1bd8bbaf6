//! Lightweight terminal progress reporting without external dependencies.
//!
//! The bar renders a message, a block-character bar, position/length and a
//! percentage to stderr, redrawing in place. It is cloneable and
//! thread-safe, so concurrent fetch tasks can bump it directly, and it
//! degrades to a no-op when stderr is not a terminal (or when constructed
//! with [`ProgressBar::hidden`]).

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 30;
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

struct Inner {
	message: String,
	len: u64,
	pos: u64,
	enabled: bool,
	finished: bool,
	last_draw: Option<Instant>,
}

impl Inner {
	fn redraw(&mut self, force: bool) {
		if !self.enabled || self.finished {
			return;
		}
		if !force && self.last_draw.is_some_and(|t| t.elapsed() < REDRAW_INTERVAL) {
			return;
		}
		self.last_draw = Some(Instant::now());

		let len = self.len.max(1);
		let pos = self.pos.min(len);
		let filled = (pos as usize * BAR_WIDTH) / len as usize;

		let mut line = String::new();
		let _ = write!(
			&mut line,
			"{}: ▕{}{}▏ {}/{} ({:>3}%)",
			self.message,
			"█".repeat(filled),
			" ".repeat(BAR_WIDTH - filled),
			pos,
			len,
			pos * 100 / len
		);

		let mut stderr = io::stderr();
		let _ = write!(stderr, "\r\x1b[2K{line}");
		let _ = stderr.flush();
	}

	fn finish(&mut self) {
		if self.enabled && !self.finished {
			self.pos = self.len;
			self.redraw(true);
			let _ = writeln!(io::stderr());
		}
		self.finished = true;
	}
}

/// A cloneable, thread-safe progress bar handle.
#[derive(Clone)]
pub struct ProgressBar {
	inner: Arc<Mutex<Inner>>,
}

impl ProgressBar {
	/// Creates a bar with a message and a maximum value.
	///
	/// Output is suppressed automatically when stderr is not a terminal.
	pub fn new(message: &str, len: u64) -> ProgressBar {
		Self::build(message, len, io::stderr().is_terminal())
	}

	/// Creates a bar that never draws. Used for quiet runs and tests.
	pub fn hidden() -> ProgressBar {
		Self::build("", 0, false)
	}

	fn build(message: &str, len: u64, enabled: bool) -> ProgressBar {
		ProgressBar {
			inner: Arc::new(Mutex::new(Inner {
				message: message.to_string(),
				len,
				pos: 0,
				enabled,
				finished: false,
				last_draw: None,
			})),
		}
	}

	/// Resets the message and maximum value and restarts the bar.
	pub fn init(&self, message: &str, len: u64) {
		let mut inner = self.inner.lock().unwrap();
		inner.message = message.to_string();
		inner.len = len;
		inner.pos = 0;
		inner.finished = false;
		inner.redraw(true);
	}

	/// Advances the position by `delta`.
	pub fn inc(&self, delta: u64) {
		let mut inner = self.inner.lock().unwrap();
		inner.pos = inner.pos.saturating_add(delta);
		inner.redraw(false);
	}

	/// Sets the absolute position.
	pub fn set_position(&self, pos: u64) {
		let mut inner = self.inner.lock().unwrap();
		inner.pos = pos;
		inner.redraw(false);
	}

	/// Draws the final state and moves to the next line.
	pub fn finish(&self) {
		self.inner.lock().unwrap().finish();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn does_not_panic_without_a_terminal() {
		let progress = ProgressBar::new("testing", 10);
		progress.inc(4);
		progress.set_position(11);
		progress.finish();
	}

	#[test]
	fn hidden_bar_accepts_everything() {
		let progress = ProgressBar::hidden();
		progress.init("late init", 5);
		progress.inc(100);
		progress.finish();
		progress.finish();
	}

	#[test]
	fn clones_share_state() {
		let progress = ProgressBar::hidden();
		progress.init("shared", 10);
		let other = progress.clone();
		other.inc(3);
		assert_eq!(progress.inner.lock().unwrap().pos, 3);
	}
}
