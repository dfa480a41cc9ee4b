//! Splitting a command line into words.

use heapless::Vec;

use crate::{ARG_CAPACITY, LINE_CAPACITY, MAX_ARGS};

/// Scratch space for splitting lines into arguments.
///
/// Words are copied into a `CAP`-byte scratch buffer, at most `MAX` of them
/// and each cut to [`ARG_CAPACITY`] bytes. Running out of either simply ends
/// the argument list early.
#[derive(Debug, Clone)]
pub struct ArgBuffer<const MAX: usize, const CAP: usize> {
    scratch: [u8; CAP],
    spans: Vec<(usize, usize), MAX>,
}

impl<const MAX: usize, const CAP: usize> ArgBuffer<MAX, CAP> {
    pub const fn new() -> Self {
        Self {
            scratch: [0; CAP],
            spans: Vec::new(),
        }
    }

    /// Splits `line` on spaces, tabs, CR, LF and NUL.
    ///
    /// Runs of delimiters count as one, so no empty words are produced.
    pub fn parse(&mut self, line: &str) -> Vec<&str, MAX> {
        self.spans.clear();
        let bytes = line.as_bytes();
        let mut used = 0;
        let mut i = 0;
        while i < bytes.len() {
            if is_delimiter(bytes[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < bytes.len() && !is_delimiter(bytes[i]) {
                i += 1;
            }

            if self.spans.is_full() {
                log::trace!("argument list full at {MAX} words");
                break;
            }
            let word = truncate(&line[start..i], core::cmp::min(ARG_CAPACITY, CAP - used));
            if word.is_empty() {
                log::trace!("argument scratch space exhausted");
                break;
            }
            let end = used + word.len();
            self.scratch[used..end].copy_from_slice(word.as_bytes());
            let _ = self.spans.push((used, end));
            used = end;
        }

        let mut argv = Vec::new();
        for &(start, end) in &self.spans {
            // Spans always cover whole characters copied from a &str.
            let word = core::str::from_utf8(&self.scratch[start..end]).unwrap_or_default();
            let _ = argv.push(word);
        }
        argv
    }
}

impl<const MAX: usize, const CAP: usize> Default for ArgBuffer<MAX, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `line` into words and passes the count and the words to `f`,
/// returning whatever `f` returns.
///
/// ```rust
/// let argc = vtline::parse_args("  set   led   on  ", |argc, argv| {
///     assert_eq!(argv, &["set", "led", "on"]);
///     argc
/// });
/// assert_eq!(argc, 3);
/// ```
pub fn parse_args<R>(line: &str, f: impl FnOnce(usize, &[&str]) -> R) -> R {
    let mut buf = ArgBuffer::<MAX_ARGS, LINE_CAPACITY>::new();
    let argv = buf.parse(line);
    f(argv.len(), &argv)
}

#[inline(always)]
fn is_delimiter(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0)
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collapses_delimiter_runs() {
        let mut buf = ArgBuffer::<8, 64>::new();
        let argv = buf.parse("  set   led   on  ");
        assert_eq!(&argv[..], &["set", "led", "on"]);
    }

    #[test]
    fn all_delimiters_count() {
        let mut buf = ArgBuffer::<8, 64>::new();
        let argv = buf.parse("a\tb\rc\nd\0e f");
        assert_eq!(&argv[..], &["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn blank_line_has_no_words() {
        let mut buf = ArgBuffer::<8, 64>::new();
        assert!(buf.parse("").is_empty());
        assert!(buf.parse(" \t \r\n").is_empty());
    }

    #[test]
    fn stops_at_max_words() {
        let mut buf = ArgBuffer::<2, 64>::new();
        let argv = buf.parse("one two three");
        assert_eq!(&argv[..], &["one", "two"]);
    }

    #[test]
    fn long_words_are_cut() {
        let mut buf = ArgBuffer::<4, 128>::new();
        let long = "x".repeat(ARG_CAPACITY + 10);
        let line = std::format!("{long} tail");
        let argv = buf.parse(&line);
        assert_eq!(argv.len(), 2);
        assert_eq!(argv[0].len(), ARG_CAPACITY);
        assert_eq!(argv[1], "tail");
    }

    #[test]
    fn scratch_exhaustion_truncates() {
        let mut buf = ArgBuffer::<8, 6>::new();
        let argv = buf.parse("abcd efgh ijkl");
        assert_eq!(&argv[..], &["abcd", "ef"]);
    }

    #[test]
    fn parse_args_returns_callback_result() {
        let joined = parse_args("peek 0x20000000 4", |argc, argv| {
            assert_eq!(argc, 3);
            std::format!("{}|{}", argv[0], argv[2])
        });
        assert_eq!(joined, "peek|4");
    }
}
