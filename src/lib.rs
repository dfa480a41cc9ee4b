//! Line editing for VT100-like serial terminals.
//!
//! This library implements the input side of a small interactive shell, of
//! the kind found on a microcontroller's debug UART: it decodes the bytes a
//! terminal emulator sends, lets the user edit a line with the usual cursor
//! and history keys, and hands each completed line to the caller.
//!
//! The pieces, from the bottom up:
//!
//! - [`VtMachine`] classifies input bytes using the state machine from
//!   [Paul Flo Williams](https://hisdeedsaredust.com/)'
//!   [A parser for DEC’s ANSI-compatible video terminals](https://vt100.net/emu/dec_ansi_parser).
//! - [`LineBuffer`] is the editable line.
//! - [`History`] is a fixed-depth ring of submitted lines with prefix search.
//! - [`ArgBuffer`] and [`parse_args`] split a line into words.
//! - [`Session`] ties them to a [`Terminal`].
//!
//! Everything is allocation-free and sized at compile time. Input that does
//! not fit is dropped rather than reported.
//!
//! ```rust
//! # use vtline::{Flow, Session, Terminal};
//! struct Script<'a> {
//!     input: &'a [u8],
//!     output: Vec<u8>,
//! }
//!
//! impl Terminal for Script<'_> {
//!     type Error = core::convert::Infallible;
//!
//!     fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
//!         let n = buf.len().min(self.input.len());
//!         buf[..n].copy_from_slice(&self.input[..n]);
//!         self.input = &self.input[n..];
//!         Ok(n)
//!     }
//!
//!     fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
//!         self.output.extend_from_slice(data);
//!         Ok(data.len())
//!     }
//! }
//!
//! let mut session = Session::new(Script { input: b"led on\rexit\r", output: Vec::new() });
//! let mut lines = Vec::new();
//! session
//!     .run(|_, line| {
//!         lines.push(line.to_owned());
//!         if line == "exit" { Flow::Exit } else { Flow::Continue }
//!     })
//!     .unwrap();
//! assert_eq!(lines, ["led on", "exit"]);
//! ```
#![no_std]

#[cfg(test)]
extern crate std;

mod args;
mod config;
mod editor;
mod error;
mod event;
mod history;
mod machine;
mod session;

pub use args::{parse_args, ArgBuffer};
pub use config::Config;
pub use editor::LineBuffer;
pub use error::SessionError;
pub use event::{VtAction, VtEvent, VtState};
pub use history::History;
pub use machine::{VtIntermediates, VtMachine, VtParams};
pub use session::{Flow, Line, Session, Terminal};

/// Longest line a [`Session`] will edit, in bytes.
pub const LINE_CAPACITY: usize = 128;

/// Number of lines a [`Session`] remembers.
pub const HISTORY_DEPTH: usize = 8;

/// Longest prompt, in bytes.
pub const PROMPT_CAPACITY: usize = 32;

/// Most words [`parse_args`] will produce.
pub const MAX_ARGS: usize = 16;

/// Longest single word [`ArgBuffer`] keeps, in bytes.
pub const ARG_CAPACITY: usize = 32;
