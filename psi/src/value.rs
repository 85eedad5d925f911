//! The runtime value tree.
//!
//! Every datum the reader produces and every result the evaluator returns is a
//! [`Value`]. A tree has exactly one owner; dropping it releases every child
//! once, so there is no separate release routine.

use std::borrow::Cow;
use std::fmt::{self, Formatter};

use derive_more::Display;
use serde_derive::Serialize;

use crate::builtins::Builtin;
use crate::error::{ErrorKind, LispError};

/// Capacity a fresh list starts with. Lists grow by doubling from here.
pub const INITIAL_LIST_CAPACITY: usize = 4;

/// Integral numbers below this magnitude print without a fractional part.
/// It is 2^53, past which `f64` stops representing every integer.
const INTEGRAL_LIMIT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Symbol(String),
    List(Vec<Value>),
    Function(Builtin),
    Error(LispError),
}

/// An `append` that did not take place. The item is handed back untouched.
#[derive(Debug, Display)]
#[display(fmt = "{}", reason)]
pub struct Refused {
    pub item: Value,
    pub reason: LispError,
}

impl std::error::Error for Refused {}

impl Value {
    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn boolean(b: bool) -> Value {
        Value::Boolean(b)
    }

    pub fn function(builtin: Builtin) -> Value {
        Value::Function(builtin)
    }

    /// Copies `text` into a new symbol.
    pub fn symbol(text: &str) -> Result<Value, LispError> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(text.len())
            .map_err(|_| LispError::out_of_memory("Failed to allocate symbol"))?;
        owned.push_str(text);
        Ok(Value::Symbol(owned))
    }

    pub fn empty_list() -> Result<Value, LispError> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(INITIAL_LIST_CAPACITY)
            .map_err(|_| LispError::out_of_memory("Failed to allocate list"))?;
        Ok(Value::List(items))
    }

    pub fn error(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Value {
        Value::Error(LispError::new(kind, message))
    }

    /// Pushes `item` as the last element of this list.
    ///
    /// The item is returned inside [`Refused`] when `self` is not a list or
    /// the backing storage cannot double; the caller decides what to do with
    /// it.
    pub fn append(&mut self, item: Value) -> Result<(), Refused> {
        let items = match self {
            Value::List(items) => items,
            _ => {
                return Err(Refused {
                    item,
                    reason: LispError::new(ErrorKind::ListError, "Append target is not a list"),
                })
            },
        };
        if items.len() == items.capacity() {
            let grow_by = items.capacity().max(INITIAL_LIST_CAPACITY);
            if items.try_reserve_exact(grow_by).is_err() {
                return Err(Refused {
                    item,
                    reason: LispError::out_of_memory("Failed to grow list"),
                });
            }
        }
        items.push(item);
        Ok(())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Name of the active variant, for log fields.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
        }
    }

    /// The printed form shown to the user.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn write_number(f: &mut Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < INTEGRAL_LIMIT {
        // goes through i64 so that -0.0 prints as 0
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{:.3}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write_number(f, *n),
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            },
            Value::Error(err) => write!(f, "$error{{{} {}}}", err.kind, err.message),
            Value::Function(_) => write!(f, "<function>"),
        }
    }
}
