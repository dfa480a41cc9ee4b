use core::fmt::Write as _;

use heapless::String;

use crate::{
    Config, History, LineBuffer, SessionError, VtAction, VtEvent, VtMachine, HISTORY_DEPTH,
    LINE_CAPACITY,
};

/// A submitted line, without its line terminator.
pub type Line = String<LINE_CAPACITY>;

/// The byte stream a [`Session`] talks to, typically a serial port.
pub trait Terminal {
    type Error: core::fmt::Debug;

    /// Reads at least one byte into `buf`, blocking until some is available.
    ///
    /// Returning `Ok(0)` signals the end of the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Writes some prefix of `data`, returning how many bytes were written.
    ///
    /// Whatever is left over is offered again straight away. Returning
    /// `Ok(0)` for non-empty `data` means the terminal cannot take more
    /// output, and the rest of that write is dropped.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;
}

/// What a line callback wants [`Session::run`] to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the prompt and keep reading.
    Continue,
    /// Stop the session.
    Exit,
}

/// The edits a key can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Head,
    Left,
    Cancel,
    Delete,
    Tail,
    Right,
    Backspace,
    Suggest,
    Enter,
    HistoryNext,
    HistoryPrev,
    /// `CSI <n> ~`, whose meaning depends on the parameter.
    Keypad,
    Insert(u8),
}

/// Key bindings, matched in order; the first match wins.
const KEYMAP: &[(VtAction, u8, Edit)] = &[
    (VtAction::Execute, 0x01, Edit::Head),
    (VtAction::Execute, 0x02, Edit::Left),
    (VtAction::Execute, 0x03, Edit::Cancel),
    (VtAction::Execute, 0x04, Edit::Delete),
    (VtAction::Execute, 0x05, Edit::Tail),
    (VtAction::Execute, 0x06, Edit::Right),
    (VtAction::Execute, 0x08, Edit::Backspace),
    (VtAction::Execute, 0x09, Edit::Suggest),
    (VtAction::Execute, 0x0d, Edit::Enter),
    (VtAction::Execute, 0x0e, Edit::HistoryNext),
    (VtAction::Execute, 0x10, Edit::HistoryPrev),
    (VtAction::CsiDispatch, b'A', Edit::HistoryPrev),
    (VtAction::CsiDispatch, b'B', Edit::HistoryNext),
    (VtAction::CsiDispatch, b'C', Edit::Right),
    (VtAction::CsiDispatch, b'D', Edit::Left),
    (VtAction::CsiDispatch, b'~', Edit::Keypad),
    (VtAction::CsiDispatch, b'H', Edit::Head),
    (VtAction::CsiDispatch, b'F', Edit::Tail),
    (VtAction::Print, 0x7f, Edit::Backspace),
];

fn lookup(event: VtEvent) -> Option<Edit> {
    KEYMAP
        .iter()
        .find(|&&(action, byte, _)| action == event.action && byte == event.byte)
        .map(|&(_, _, edit)| edit)
        .or_else(|| (event.action == VtAction::Print).then_some(Edit::Insert(event.byte)))
}

#[derive(Debug, Default)]
struct Suggestion {
    /// Which match the next Tab asks for, or `None` when no suggestion
    /// cycle is running.
    index: Option<usize>,
    source: Line,
}

/// An interactive line-editing session on a [`Terminal`].
///
/// Input bytes are decoded with a [`VtMachine`] and applied to a line
/// buffer, echoing just enough output to keep the terminal's copy of the
/// line in step. Submitted lines are recorded in a [`History`].
///
/// Drive it either with [`Session::run`], which blocks on the terminal, or
/// byte by byte with [`Session::feed`].
#[derive(Debug)]
pub struct Session<T> {
    term: T,
    config: Config,
    machine: VtMachine,
    editor: LineBuffer<LINE_CAPACITY>,
    history: History<HISTORY_DEPTH, LINE_CAPACITY>,
    suggestion: Suggestion,
    /// The line being edited before history recall replaced it.
    draft: Line,
    /// Width of the prompt as last written, which may differ from the
    /// configured one after [`Session::set_prompt`].
    shown_prompt_width: usize,
}

impl<T: Terminal> Session<T> {
    pub fn new(term: T) -> Self {
        Self::with_config(term, Config::default())
    }

    pub fn with_config(term: T, config: Config) -> Self {
        Self {
            term,
            config,
            machine: VtMachine::new(),
            editor: LineBuffer::new(),
            history: History::new(),
            suggestion: Suggestion::default(),
            draft: Line::new(),
            shown_prompt_width: 0,
        }
    }

    #[inline(always)]
    pub fn prompt(&self) -> &str {
        self.config.prompt()
    }

    /// Changes the prompt. Takes effect the next time it is shown.
    pub fn set_prompt(&mut self, prompt: &str) {
        self.config.set_prompt(prompt);
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The line currently being edited.
    #[inline(always)]
    pub fn text(&self) -> &str {
        self.editor.text()
    }

    #[inline(always)]
    pub fn history(&self) -> &History<HISTORY_DEPTH, LINE_CAPACITY> {
        &self.history
    }

    #[inline(always)]
    pub fn terminal(&self) -> &T {
        &self.term
    }

    #[inline(always)]
    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.term
    }

    pub fn into_terminal(self) -> T {
        self.term
    }

    pub fn show_prompt(&mut self) {
        put(&mut self.term, self.config.prompt().as_bytes());
        self.shown_prompt_width = self.config.prompt_width();
    }

    /// Runs the session until the callback returns [`Flow::Exit`] or the
    /// terminal stops delivering input.
    ///
    /// The prompt is shown first, and again after each line for which
    /// `on_line` returns [`Flow::Continue`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EndOfStream`] when a read returns zero bytes
    /// and [`SessionError::Read`] when it fails. Either way `on_line` is not
    /// called again.
    pub fn run<F>(&mut self, mut on_line: F) -> Result<(), SessionError<T::Error>>
    where
        F: FnMut(&mut Self, &str) -> Flow,
    {
        self.show_prompt();
        let mut buf = [0_u8; 16];
        loop {
            let len = match self.term.read(&mut buf) {
                Ok(0) => {
                    log::debug!("terminal reached end of stream");
                    return Err(SessionError::EndOfStream);
                }
                Ok(len) => core::cmp::min(len, buf.len()),
                Err(err) => {
                    log::warn!("terminal read failed: {err:?}");
                    return Err(SessionError::Read(err));
                }
            };
            for &byte in &buf[..len] {
                let Some(line) = self.feed(byte) else {
                    continue;
                };
                match on_line(&mut *self, line.as_str()) {
                    Flow::Continue => self.show_prompt(),
                    Flow::Exit => {
                        log::debug!("session ended by line callback");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Processes one input byte.
    ///
    /// Returns the submitted line when `byte` completes one. By then the
    /// line has been recorded in history and the editor is empty, but the
    /// prompt has not been shown again: call [`Session::show_prompt`] when
    /// ready for more input.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        let event = self.machine.feed(byte);
        let edit = lookup(event)?;
        if edit != Edit::Suggest {
            self.suggestion.index = None;
        }

        match edit {
            Edit::Head => self.cursor_head(),
            Edit::Left => {
                if self.editor.cursor_left() {
                    move_left(&mut self.term, 1);
                }
            }
            Edit::Cancel => self.cancel(),
            Edit::Delete => self.delete(),
            Edit::Tail => self.cursor_tail(),
            Edit::Right => {
                if self.editor.cursor_right() {
                    move_right(&mut self.term, 1);
                }
            }
            Edit::Backspace => self.backspace(),
            Edit::Suggest => self.suggest(),
            Edit::Enter => return Some(self.submit()),
            Edit::HistoryNext => self.history_next(),
            Edit::HistoryPrev => self.history_prev(),
            Edit::Keypad => match self.machine.params().get(0, 3) {
                1 | 7 => self.cursor_head(),
                4 | 8 => self.cursor_tail(),
                // Insert, Page Up, Page Down.
                2 | 5 | 6 => {}
                _ => self.delete(),
            },
            Edit::Insert(c) => self.insert(c),
        }
        None
    }

    fn insert(&mut self, c: u8) {
        if !self.editor.insert(c) {
            log::trace!("dropping input byte {c:#04x}");
            return;
        }
        put(&mut self.term, &[c]);
        let tail = self.editor.tail();
        put(&mut self.term, tail.as_bytes());
        move_left(&mut self.term, tail.len());
    }

    fn backspace(&mut self) {
        if !self.editor.backspace() {
            return;
        }
        move_left(&mut self.term, 1);
        self.rewrite_tail();
    }

    fn delete(&mut self) {
        if self.editor.delete() {
            self.rewrite_tail();
        }
    }

    /// Redraws the text right of the cursor after it shifted left by one.
    fn rewrite_tail(&mut self) {
        let tail = self.editor.tail();
        put(&mut self.term, tail.as_bytes());
        put(&mut self.term, b" ");
        move_left(&mut self.term, tail.len() + 1);
    }

    fn cursor_head(&mut self) {
        let pos = self.editor.pos();
        if self.editor.cursor_head() {
            move_left(&mut self.term, pos);
        }
    }

    fn cursor_tail(&mut self) {
        let remaining = self.editor.len() - self.editor.pos();
        if self.editor.cursor_tail() {
            move_right(&mut self.term, remaining);
        }
    }

    fn cancel(&mut self) {
        self.editor.clear();
        self.history.reset_recall();
        put(&mut self.term, b"^C\r\n");
        self.show_prompt();
    }

    fn submit(&mut self) -> Line {
        let line = self.editor.take();
        self.history.write(&line);
        self.history.reset_recall();
        put(&mut self.term, b"\r\n");
        log::debug!("line submitted ({} bytes)", line.len());
        line
    }

    fn history_prev(&mut self) {
        if !self.history.is_recalling() {
            self.draft.clear();
            let _ = self.draft.push_str(self.editor.text());
        }
        if !self.history.recall_prev() {
            return;
        }
        let column = self.editor.pos();
        self.editor.set_text(self.history.read());
        self.redraw(column);
    }

    fn history_next(&mut self) {
        if !self.history.recall_next() {
            return;
        }
        let column = self.editor.pos();
        if self.history.is_recalling() {
            self.editor.set_text(self.history.read());
        } else {
            self.editor.set_text(&self.draft);
        }
        self.redraw(column);
    }

    fn suggest(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.suggestion.index {
            Some(index) => index,
            None => {
                if self.editor.is_empty() {
                    return;
                }
                self.suggestion.source.clear();
                let _ = self.suggestion.source.push_str(self.editor.text());
                0
            }
        };

        let column = self.editor.pos();
        match self.history.find(index, &self.suggestion.source) {
            Some(found) => {
                self.editor.set_text(found);
                self.suggestion.index = Some(index + 1);
            }
            None if self.suggestion.index.is_some() => {
                // Out of matches: go back to what was typed and start over.
                self.editor.set_text(&self.suggestion.source);
                self.suggestion.index = Some(0);
            }
            None => return,
        }
        self.redraw(column);
    }

    /// Erases the terminal line and writes the prompt and the whole editor
    /// text again. `column` is where the cursor was within the old text.
    fn redraw(&mut self, column: usize) {
        put(&mut self.term, b"\x1b[2K");
        move_left(&mut self.term, self.shown_prompt_width + column);
        self.show_prompt();
        put(&mut self.term, self.editor.text().as_bytes());
    }
}

/// Writes straight to the terminal, for use by line callbacks.
impl<T: Terminal> core::fmt::Write for Session<T> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        if put(&mut self.term, s.as_bytes()) {
            Ok(())
        } else {
            Err(core::fmt::Error)
        }
    }
}

/// Writes all of `data`, returning `false` if the terminal stopped taking
/// bytes or failed part way.
fn put<T: Terminal>(term: &mut T, data: &[u8]) -> bool {
    let mut rest = data;
    while !rest.is_empty() {
        match term.write(rest) {
            Ok(0) => {
                log::warn!(
                    "terminal stalled after {} of {} bytes",
                    data.len() - rest.len(),
                    data.len()
                );
                return false;
            }
            Ok(n) => rest = rest.get(n..).unwrap_or_default(),
            Err(err) => {
                log::warn!("terminal write failed: {err:?}");
                return false;
            }
        }
    }
    true
}

fn move_left<T: Terminal>(term: &mut T, n: usize) {
    move_cursor(term, n, b'D');
}

fn move_right<T: Terminal>(term: &mut T, n: usize) {
    move_cursor(term, n, b'C');
}

fn move_cursor<T: Terminal>(term: &mut T, n: usize, cmd: u8) {
    let mut seq = String::<16>::new();
    let _ = match n {
        0 => return,
        1 => write!(seq, "\x1b[{}", cmd as char),
        n => write!(seq, "\x1b[{n}{}", cmd as char),
    };
    put(term, seq.as_bytes());
}
