/// The states of a [`crate::VtMachine`].
///
/// These follow the state diagram from Paul Williams' DEC ANSI parser, minus
/// the implicit "anywhere" pseudo-state whose transitions apply to all of
/// these.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VtState {
    CsiEntry,
    CsiIgnore,
    CsiIntermediate,
    CsiParam,
    DcsEntry,
    DcsIgnore,
    DcsIntermediate,
    DcsParam,
    DcsPassthrough,
    Escape,
    EscapeIntermediate,
    #[default]
    Ground,
    OscString,
    SosPmApcString,
}

impl VtState {
    /// Every state, in declaration order.
    pub const ALL: [VtState; 14] = [
        VtState::CsiEntry,
        VtState::CsiIgnore,
        VtState::CsiIntermediate,
        VtState::CsiParam,
        VtState::DcsEntry,
        VtState::DcsIgnore,
        VtState::DcsIntermediate,
        VtState::DcsParam,
        VtState::DcsPassthrough,
        VtState::Escape,
        VtState::EscapeIntermediate,
        VtState::Ground,
        VtState::OscString,
        VtState::SosPmApcString,
    ];
}

/// The action a [`crate::VtMachine`] associates with an input byte.
///
/// Only the actions attached to a transition are reported through
/// [`VtEvent`]. State entry and exit actions (clearing parameters when a
/// sequence begins, for example) are carried out by the machine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VtAction {
    /// The byte only moves the machine between states, if at all.
    None,
    /// Forget collected parameters and intermediates.
    Clear,
    /// Record an intermediate byte.
    Collect,
    /// The byte is the final character of a control sequence.
    CsiDispatch,
    /// The byte is the final character of a plain escape sequence.
    EscDispatch,
    /// Execute a C0 or C1 control character.
    Execute,
    /// Start of a device control string passthrough.
    Hook,
    /// The byte is deliberately ignored in this state.
    Ignore,
    OscEnd,
    OscPut,
    OscStart,
    /// Accumulate a parameter digit or separator.
    Param,
    /// The byte is printable text.
    Print,
    /// A byte passed through from a device control string.
    Put,
    /// End of a device control string passthrough.
    Unhook,
    /// The byte is not acceptable in any state. The DEC table has no such
    /// byte, so [`crate::VtMachine`] never reports this.
    Error,
}

/// One classified input byte, as returned by [`crate::VtMachine::feed`].
///
/// `state` is the state the machine was in when `byte` arrived, before any
/// transition the byte caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtEvent {
    pub state: VtState,
    pub action: VtAction,
    pub byte: u8,
}

impl VtEvent {
    pub const fn new(state: VtState, action: VtAction, byte: u8) -> Self {
        Self {
            state,
            action,
            byte,
        }
    }
}
