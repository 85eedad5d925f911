mod lex;
pub mod error;
pub mod value;
pub mod parse;
pub mod builtins;
pub mod eval;
pub mod repl;

pub use error::{ErrorKind, LispError};
pub use eval::{evaluate, Outcome};
pub use value::Value;
