use thiserror::Error;

/// Why [`crate::Session::run`] stopped without being asked to.
///
/// `E` is the error type of the session's [`crate::Terminal`].
#[derive(Error, Debug)]
pub enum SessionError<E> {
    #[error("terminal reached end of stream")]
    EndOfStream,

    #[error("terminal read failed: {0:?}")]
    Read(E),
}
