use std::borrow::Cow;

use derive_more::Display;
use serde_derive::Serialize;

/// The closed set of failure categories. `Display` gives the name printed
/// inside `$error{...}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize)]
pub enum ErrorKind {
    #[display(fmt = "SyntaxError")]
    SyntaxError,
    #[display(fmt = "TypeError")]
    TypeError,
    #[display(fmt = "ArityError")]
    ArityError,
    #[display(fmt = "DivisionByZeroError")]
    DivisionByZeroError,
    #[display(fmt = "UnboundError")]
    UnboundError,
    #[display(fmt = "InapplicableHeadError")]
    InapplicableHeadError,
    #[display(fmt = "EvalError")]
    EvalError,
    #[display(fmt = "ListError")]
    ListError,
    #[display(fmt = "MemoryError")]
    OutOfMemory,
    #[display(fmt = "InputError")]
    InputError,
    #[display(fmt = "IOError")]
    IoError,
}

#[derive(Clone, Debug, PartialEq, Eq, Display, Serialize)]
#[display(fmt = "{} {}", kind, message)]
pub struct LispError {
    pub kind: ErrorKind,
    pub message: Cow<'static, str>,
}

impl LispError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        LispError {
            kind,
            message: message.into(),
        }
    }

    pub fn syntax(message: &'static str) -> Self {
        LispError::new(ErrorKind::SyntaxError, message)
    }

    pub fn type_error(message: &'static str) -> Self {
        LispError::new(ErrorKind::TypeError, message)
    }

    pub fn arity(message: &'static str) -> Self {
        LispError::new(ErrorKind::ArityError, message)
    }

    /// Out-of-memory errors only ever carry static text, so reporting one
    /// never allocates.
    pub fn out_of_memory(message: &'static str) -> Self {
        LispError::new(ErrorKind::OutOfMemory, message)
    }
}

impl std::error::Error for LispError {}
