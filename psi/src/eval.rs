//! Evaluation of parsed expressions

use tracing::{debug, trace};

use crate::builtins::Builtin;
use crate::error::{ErrorKind, LispError};
use crate::value::Value;

/// What evaluating an expression produced.
///
/// Error values travel inside `Value`; `Halt` is the request to stop the
/// read loop and is never printed.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Value(Value),
    Halt,
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::Value(value)
    }
}

impl From<LispError> for Outcome {
    fn from(err: LispError) -> Self {
        Outcome::Value(Value::Error(err))
    }
}

/// Reduces `expr` to a fresh, independently owned result. The input is left
/// untouched.
pub fn evaluate(expr: &Value) -> Outcome {
    match expr {
        Value::Number(_) | Value::Boolean(_) | Value::Error(_) => expr.clone().into(),
        Value::Symbol(name) => match Builtin::lookup(name) {
            Some(builtin) => Value::function(builtin).into(),
            None => {
                debug!(symbol = %name, "unbound symbol");
                LispError::new(ErrorKind::UnboundError, "Symbol not bound to a function").into()
            },
        },
        Value::List(items) if items.is_empty() => match Value::empty_list() {
            Ok(list) => list.into(),
            Err(err) => err.into(),
        },
        Value::List(items) => evaluate_application(items),
        Value::Function(_) => {
            LispError::new(ErrorKind::EvalError, "Unsupported value for evaluation").into()
        },
    }
}

fn evaluate_application(items: &[Value]) -> Outcome {
    let mut evaluated = Vec::new();
    if evaluated.try_reserve_exact(items.len()).is_err() {
        return LispError::out_of_memory("Failed to allocate evaluated items").into();
    }
    for item in items {
        match evaluate(item) {
            Outcome::Value(Value::Error(err)) => {
                trace!(kind = %err.kind, "short-circuiting on error");
                return err.into();
            },
            Outcome::Value(value) => evaluated.push(value),
            Outcome::Halt => return Outcome::Halt,
        }
    }
    match evaluated.split_first() {
        Some((Value::Function(builtin), args)) => builtin.apply(args),
        Some(_) => LispError::new(
            ErrorKind::InapplicableHeadError,
            "Expression head is not a function",
        )
        .into(),
        None => LispError::new(ErrorKind::ListError, "Invalid list count").into(),
    }
}
