use heapless::Vec;

/// An editable line of ASCII text with a cursor.
///
/// The buffer holds at most `N` bytes, all of them printable ASCII or space.
/// The cursor sits between characters: `0 <= pos() <= len()`.
///
/// Operations that can be refused report whether they changed anything, so
/// that a caller mirroring the line on a terminal knows whether to emit
/// anything.
#[derive(Debug, Clone)]
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
    pos: usize,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            pos: 0,
        }
    }

    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }

    /// The whole line.
    pub fn text(&self) -> &str {
        // Only ASCII is ever stored.
        core::str::from_utf8(&self.buf).unwrap_or_default()
    }

    /// The part of the line from the cursor to the end.
    pub fn tail(&self) -> &str {
        &self.text()[self.pos..]
    }

    /// Inserts `c` at the cursor and moves the cursor past it.
    ///
    /// Returns `false` without changing anything if the buffer is full or
    /// `c` is not printable ASCII.
    pub fn insert(&mut self, c: u8) -> bool {
        if !is_printable(c) {
            return false;
        }
        if self.buf.insert(self.pos, c).is_err() {
            return false;
        }
        self.pos += 1;
        true
    }

    /// Removes the character left of the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        self.buf.remove(self.pos);
        true
    }

    /// Removes the character under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.pos == self.buf.len() {
            return false;
        }
        self.buf.remove(self.pos);
        true
    }

    pub fn cursor_left(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        true
    }

    pub fn cursor_right(&mut self) -> bool {
        if self.pos == self.buf.len() {
            return false;
        }
        self.pos += 1;
        true
    }

    pub fn cursor_head(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos = 0;
        true
    }

    pub fn cursor_tail(&mut self) -> bool {
        if self.pos == self.buf.len() {
            return false;
        }
        self.pos = self.buf.len();
        true
    }

    /// Replaces the line with `text` and puts the cursor at its end.
    ///
    /// Copying stops at the first byte that [`LineBuffer::insert`] would
    /// refuse, or when the buffer is full.
    pub fn set_text(&mut self, text: &str) {
        self.buf.clear();
        for &b in text.as_bytes() {
            if !is_printable(b) || self.buf.push(b).is_err() {
                log::trace!("line text truncated at {} bytes", self.buf.len());
                break;
            }
        }
        self.pos = self.buf.len();
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.pos = 0;
    }

    /// Returns a copy of the line and clears the buffer.
    pub fn take(&mut self) -> heapless::String<N> {
        let mut ret = heapless::String::new();
        // Cannot fail: both sides have capacity N.
        let _ = ret.push_str(self.text());
        self.clear();
        ret
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn is_printable(c: u8) -> bool {
    (b' '..=b'~').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(text: &str, pos: usize) -> LineBuffer<8> {
        let mut b = LineBuffer::new();
        b.set_text(text);
        b.pos = pos;
        b
    }

    #[test]
    fn insert_shifts_tail() {
        let mut b = buffer("held", 3);
        assert!(b.insert(b'l'));
        assert_eq!(b.text(), "helld");
        assert_eq!(b.pos(), 4);
        assert!(b.insert(b'o'));
        assert_eq!(b.text(), "hellod");
        assert_eq!(b.tail(), "d");
    }

    #[test]
    fn insert_refuses_when_full() {
        let mut b = buffer("abcdefgh", 2);
        assert!(b.is_full());
        assert!(!b.insert(b'x'));
        assert_eq!(b.text(), "abcdefgh");
        assert_eq!(b.pos(), 2);
    }

    #[test]
    fn insert_refuses_unprintable() {
        let mut b = buffer("", 0);
        assert!(!b.insert(0));
        assert!(!b.insert(b'\t'));
        assert!(!b.insert(0x7f));
        assert!(!b.insert(0xe9));
        assert!(b.is_empty());
    }

    #[test]
    fn insert_then_backspace_round_trips() {
        for pos in 0..=5 {
            let mut b = buffer("hello", pos);
            assert!(b.insert(b'x'));
            assert!(b.backspace());
            assert_eq!(b.text(), "hello");
            assert_eq!(b.pos(), pos);
        }
    }

    #[test]
    fn backspace_at_head_is_noop() {
        let mut b = buffer("abc", 0);
        assert!(!b.backspace());
        assert_eq!(b.text(), "abc");
    }

    #[test]
    fn backspace_mid_line() {
        let mut b = buffer("abcd", 2);
        assert!(b.backspace());
        assert_eq!(b.text(), "acd");
        assert_eq!(b.pos(), 1);
    }

    #[test]
    fn delete_keeps_cursor() {
        let mut b = buffer("abcd", 1);
        assert!(b.delete());
        assert_eq!(b.text(), "acd");
        assert_eq!(b.pos(), 1);
        b.cursor_tail();
        assert!(!b.delete());
        assert_eq!(b.text(), "acd");
    }

    #[test]
    fn cursor_moves_report_change() {
        let mut b = buffer("ab", 0);
        assert!(!b.cursor_left());
        assert!(!b.cursor_head());
        assert!(b.cursor_right());
        assert!(b.cursor_tail());
        assert_eq!(b.pos(), 2);
        assert!(!b.cursor_right());
        assert!(!b.cursor_tail());
        assert!(b.cursor_head());
        assert_eq!(b.pos(), 0);
    }

    #[test]
    fn set_text_truncates_and_moves_cursor_to_end() {
        let mut b = buffer("", 0);
        b.set_text("0123456789");
        assert_eq!(b.text(), "01234567");
        assert_eq!(b.pos(), 8);
    }

    #[test]
    fn set_text_of_own_text_is_idempotent() {
        let mut b = buffer("status", 2);
        let copy = b.clone();
        b.set_text(copy.text());
        assert_eq!((b.text(), b.pos()), ("status", 6));
        let once = b.clone();
        b.set_text(once.text());
        assert_eq!((b.text(), b.pos()), (once.text(), once.pos()));
    }

    #[test]
    fn take_clears() {
        let mut b = buffer("ls", 1);
        assert_eq!(b.take().as_str(), "ls");
        assert!(b.is_empty());
        assert_eq!(b.pos(), 0);
    }
}
