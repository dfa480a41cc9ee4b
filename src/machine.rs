use crate::{VtAction, VtEvent, VtState};

/// Byte-at-a-time parser for VT100-like terminal input.
///
/// Each call to [`VtMachine::feed`] classifies one byte and reports it as a
/// [`VtEvent`]. Parameters and intermediates collected for the sequence in
/// progress stay available through [`VtMachine::params`] and
/// [`VtMachine::intermediates`] until the next sequence begins, so a caller
/// handling [`VtAction::CsiDispatch`] can inspect them.
#[derive(Debug, Clone)]
pub struct VtMachine {
    state: VtState,
    intermediates: VtIntermediates,
    params: VtParams,
}

impl VtMachine {
    pub const fn new() -> Self {
        Self {
            state: VtState::Ground,
            intermediates: VtIntermediates::new(),
            params: VtParams::new(),
        }
    }

    #[inline(always)]
    pub const fn state(&self) -> VtState {
        self.state
    }

    #[inline(always)]
    pub const fn params(&self) -> &VtParams {
        &self.params
    }

    #[inline(always)]
    pub const fn intermediates(&self) -> &VtIntermediates {
        &self.intermediates
    }

    /// Returns the machine to [`VtState::Ground`], abandoning any sequence
    /// in progress.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Classifies one byte, updating the machine's state.
    ///
    /// This never fails: bytes that make no sense in the current state are
    /// reported as [`VtAction::Ignore`] or [`VtAction::None`] and otherwise
    /// have no effect.
    ///
    /// Bytes in the GR area (0xA0 to 0xFF) are classified as their GL
    /// counterparts, but the event still carries the byte as received.
    pub fn feed(&mut self, byte: u8) -> VtEvent {
        let state = self.state;
        let code = gl(byte);
        let action = match transition(state, byte) {
            Transition::Stay(action) => {
                self.action(action, code);
                action
            }
            Transition::Enter(next, action) => {
                self.change_state(next, action, code);
                action
            }
        };
        VtEvent::new(state, action, byte)
    }

    /// Feeds each byte of `data` in turn, passing every resulting event
    /// to `f`.
    pub fn feed_all(&mut self, data: &[u8], mut f: impl FnMut(&Self, VtEvent)) {
        for &byte in data {
            let event = self.feed(byte);
            f(self, event);
        }
    }

    fn action(&mut self, action: VtAction, byte: u8) {
        match action {
            VtAction::Collect => self.intermediates.push(byte),
            VtAction::Param => self.params.push_csi_byte(byte),
            VtAction::Clear => {
                self.intermediates.clear();
                self.params.clear();
            }
            // Everything else is for the caller to interpret.
            _ => {}
        }
    }

    fn change_state(&mut self, state: VtState, transition: VtAction, byte: u8) {
        if let Some(exit) = exit_action(self.state) {
            self.action(exit, byte);
        }
        self.state = state;
        self.action(transition, byte);
        if let Some(entry) = entry_action(state) {
            self.action(entry, byte);
        }
    }
}

impl Default for VtMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Codes in the GR area are treated as aliases for GL codes.
#[inline(always)]
const fn gl(byte: u8) -> u8 {
    match byte {
        0xa0..=0xff => byte - 0x80,
        _ => byte,
    }
}

/// The effect of one byte on the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Remain in the current state, performing the action.
    Stay(VtAction),
    /// Leave the current state for another (possibly the same one),
    /// running exit and entry actions around the transition action.
    Enter(VtState, VtAction),
}

/// Classifies `byte` arriving in `state`.
pub(crate) const fn transition(state: VtState, byte: u8) -> Transition {
    use Transition::{Enter, Stay};
    use VtAction as A;
    use VtState as S;

    let byte = gl(byte);

    // Some bytes have the same effect regardless of the current state.
    match byte {
        0x18 | 0x1a | 0x80..=0x8f | 0x91..=0x97 | 0x99 | 0x9a => {
            return Enter(S::Ground, A::Execute);
        }
        0x9c => return Enter(S::Ground, A::None),
        0x1b => return Enter(S::Escape, A::None),
        0x98 | 0x9e | 0x9f => return Enter(S::SosPmApcString, A::None),
        0x90 => return Enter(S::DcsEntry, A::None),
        0x9d => return Enter(S::OscString, A::None),
        0x9b => return Enter(S::CsiEntry, A::None),
        _ => {
            // Only 0x00..=0x7f other than CAN, SUB and ESC remain.
        }
    }

    match state {
        S::Ground => match byte {
            0x00..=0x1f => Stay(A::Execute),
            _ => Stay(A::Print),
        },
        S::Escape => match byte {
            0x00..=0x1f => Stay(A::Execute),
            0x7f => Stay(A::Ignore),
            0x20..=0x2f => Enter(S::EscapeIntermediate, A::Collect),
            0x5b => Enter(S::CsiEntry, A::None),
            0x5d => Enter(S::OscString, A::None),
            0x50 => Enter(S::DcsEntry, A::None),
            0x58 | 0x5e | 0x5f => Enter(S::SosPmApcString, A::None),
            _ => Enter(S::Ground, A::EscDispatch),
        },
        S::EscapeIntermediate => match byte {
            0x00..=0x1f => Stay(A::Execute),
            0x20..=0x2f => Stay(A::Collect),
            0x7f => Stay(A::Ignore),
            _ => Enter(S::Ground, A::EscDispatch),
        },
        S::CsiEntry => match byte {
            0x00..=0x1f => Stay(A::Execute),
            0x7f => Stay(A::Ignore),
            0x20..=0x2f => Enter(S::CsiIntermediate, A::Collect),
            0x3a => Enter(S::CsiIgnore, A::None),
            0x30..=0x39 | 0x3b => Enter(S::CsiParam, A::Param),
            0x3c..=0x3f => Enter(S::CsiParam, A::Collect),
            _ => Enter(S::Ground, A::CsiDispatch),
        },
        S::CsiParam => match byte {
            0x00..=0x1f => Stay(A::Execute),
            0x30..=0x39 | 0x3b => Stay(A::Param),
            0x7f => Stay(A::Ignore),
            0x3a | 0x3c..=0x3f => Enter(S::CsiIgnore, A::None),
            0x20..=0x2f => Enter(S::CsiIntermediate, A::Collect),
            _ => Enter(S::Ground, A::CsiDispatch),
        },
        S::CsiIntermediate => match byte {
            0x00..=0x1f => Stay(A::Execute),
            0x20..=0x2f => Stay(A::Collect),
            0x7f => Stay(A::Ignore),
            0x30..=0x3f => Enter(S::CsiIgnore, A::None),
            _ => Enter(S::Ground, A::CsiDispatch),
        },
        S::CsiIgnore => match byte {
            0x00..=0x1f => Stay(A::Execute),
            0x20..=0x3f | 0x7f => Stay(A::Ignore),
            _ => Enter(S::Ground, A::None),
        },
        S::DcsEntry => match byte {
            0x00..=0x1f | 0x7f => Stay(A::Ignore),
            0x3a => Enter(S::DcsIgnore, A::None),
            0x20..=0x2f => Enter(S::DcsIntermediate, A::Collect),
            0x30..=0x39 | 0x3b => Enter(S::DcsParam, A::Param),
            0x3c..=0x3f => Enter(S::DcsParam, A::Collect),
            _ => Enter(S::DcsPassthrough, A::None),
        },
        S::DcsParam => match byte {
            0x00..=0x1f | 0x7f => Stay(A::Ignore),
            0x30..=0x39 | 0x3b => Stay(A::Param),
            0x3a | 0x3c..=0x3f => Enter(S::DcsIgnore, A::None),
            0x20..=0x2f => Enter(S::DcsIntermediate, A::Collect),
            _ => Enter(S::DcsPassthrough, A::None),
        },
        S::DcsIntermediate => match byte {
            0x00..=0x1f | 0x7f => Stay(A::Ignore),
            0x20..=0x2f => Stay(A::Collect),
            0x30..=0x3f => Enter(S::DcsIgnore, A::None),
            _ => Enter(S::DcsPassthrough, A::None),
        },
        S::DcsPassthrough => match byte {
            0x7f => Stay(A::Ignore),
            _ => Stay(A::Put),
        },
        S::DcsIgnore | S::SosPmApcString => Stay(A::Ignore),
        S::OscString => match byte {
            0x00..=0x1f => Stay(A::Ignore),
            _ => Stay(A::OscPut),
        },
    }
}

const fn entry_action(state: VtState) -> Option<VtAction> {
    match state {
        VtState::Escape | VtState::CsiEntry | VtState::DcsEntry => Some(VtAction::Clear),
        VtState::OscString => Some(VtAction::OscStart),
        VtState::DcsPassthrough => Some(VtAction::Hook),
        _ => None,
    }
}

const fn exit_action(state: VtState) -> Option<VtAction> {
    match state {
        VtState::OscString => Some(VtAction::OscEnd),
        VtState::DcsPassthrough => Some(VtAction::Unhook),
        _ => None,
    }
}

/// Numeric parameters collected for a control sequence.
///
/// At most 16 parameters are kept; any beyond that are dropped. Each value
/// saturates at [`u16::MAX`] instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtParams {
    buf: [u16; 16],
    len: usize,
    overrun: bool,
}

impl VtParams {
    pub const fn new() -> Self {
        Self {
            buf: [0; 16],
            len: 0,
            overrun: false,
        }
    }

    /// Builds a parameter list from `from`, dropping any values past the
    /// capacity.
    pub fn from_slice(from: &[u16]) -> Self {
        let mut ret = Self::new();
        for &v in from {
            ret.push(v);
        }
        ret
    }

    pub fn push(&mut self, v: u16) {
        if self.len == self.buf.len() {
            self.overrun = true;
            return;
        }
        self.buf[self.len] = v;
        self.len += 1;
    }

    fn push_csi_byte(&mut self, b: u8) {
        if b == b';' {
            if self.len == 0 {
                // An empty leading parameter still counts.
                self.push(0);
            }
            self.push(0);
            return;
        }
        if self.overrun {
            return;
        }
        if self.len == 0 {
            self.push(0);
        }
        let digit = u16::from(b.wrapping_sub(b'0'));
        let current = &mut self.buf[self.len - 1];
        *current = current.saturating_mul(10).saturating_add(digit);
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.len = 0;
        self.overrun = false;
    }

    #[inline(always)]
    pub fn values(&self) -> &[u16] {
        &self.buf[..self.len]
    }

    /// Returns parameter `i`, or `default` when it is absent or zero.
    ///
    /// Zero and absent parameters are interchangeable in ECMA-48.
    pub fn get(&self, i: usize, default: u16) -> u16 {
        match self.values().get(i) {
            Some(&v) if v != 0 => v,
            _ => default,
        }
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub const fn has_overrun(&self) -> bool {
        self.overrun
    }
}

impl Default for VtParams {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtIntermediates {
    buf: [u8; 2],
    len: u8, // greater than length of buf means overrun
}

impl VtIntermediates {
    const OVERRUN_LEN: usize = 3;

    pub const fn new() -> Self {
        Self { buf: [0; 2], len: 0 }
    }

    pub fn from_slice(from: &[u8]) -> Self {
        let mut ret = Self::new();
        for &b in from {
            ret.push(b);
        }
        ret
    }

    pub fn push(&mut self, b: u8) {
        let len = self.len();
        if len >= self.buf.len() {
            self.len = Self::OVERRUN_LEN as u8;
            return;
        }
        self.buf[len] = b;
        self.len += 1;
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn bytes(&self) -> &[u8] {
        let len = self.len();
        &self.buf[..len]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        core::cmp::min(self.buf.len(), self.len as usize)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub const fn has_overrun(&self) -> bool {
        self.len as usize > self.buf.len()
    }
}

impl Default for VtIntermediates {
    fn default() -> Self {
        Self::new()
    }
}
