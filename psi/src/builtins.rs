//! Native operations addressable by name.

use serde_derive::Serialize;
use tracing::debug;

use crate::error::{ErrorKind, LispError};
use crate::eval::Outcome;
use crate::value::Value;

/// Numbers closer than this compare equal under `=`.
pub const EQ_TOLERANCE: f64 = 1e-10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Builtin {
    /// +
    Add,
    /// -
    Sub,
    /// *
    Mul,
    /// /
    Div,
    /// =
    Eq,
    /// quit
    Quit,
}

/// Lookup table, searched front to back.
pub const REGISTRY: [(&str, Builtin); 6] = [
    ("+", Builtin::Add),
    ("-", Builtin::Sub),
    ("*", Builtin::Mul),
    ("/", Builtin::Div),
    ("=", Builtin::Eq),
    ("quit", Builtin::Quit),
];

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        REGISTRY
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, builtin)| *builtin)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Eq => "=",
            Builtin::Quit => "quit",
        }
    }

    /// Applies the operation to already-evaluated arguments.
    pub fn apply(self, args: &[Value]) -> Outcome {
        debug!(builtin = self.name(), argc = args.len(), "applying builtin");
        let result = match self {
            Builtin::Add => add(args).map(Value::Number),
            Builtin::Sub => sub(args).map(Value::Number),
            Builtin::Mul => mul(args).map(Value::Number),
            Builtin::Div => div(args).map(Value::Number),
            Builtin::Eq => eq(args).map(Value::Boolean),
            Builtin::Quit => {
                if !args.is_empty() {
                    Err(LispError::arity("quit takes no arguments"))
                } else {
                    return Outcome::Halt;
                }
            },
        };
        match result {
            Ok(value) => Outcome::Value(value),
            Err(err) => Outcome::Value(Value::Error(err)),
        }
    }
}

fn numbers<'a>(
    args: &'a [Value],
    message: &'static str,
) -> impl Iterator<Item = Result<f64, LispError>> + 'a {
    args.iter()
        .map(move |arg| arg.as_number().ok_or_else(|| LispError::type_error(message)))
}

fn add(args: &[Value]) -> Result<f64, LispError> {
    numbers(args, "Arguments to + must be numbers").sum()
}

fn mul(args: &[Value]) -> Result<f64, LispError> {
    numbers(args, "Arguments to * must be numbers").product()
}

fn sub(args: &[Value]) -> Result<f64, LispError> {
    let first = match args.first() {
        Some(first) => first,
        None => return Err(LispError::arity("'-' requires at least one argument")),
    };
    let first = first
        .as_number()
        .ok_or_else(|| LispError::type_error("First argument to - must be a number"))?;
    match args {
        [_] => Ok(-first),
        [_, second] => {
            let second = second
                .as_number()
                .ok_or_else(|| LispError::type_error("Second argument to - must be a number"))?;
            Ok(first - second)
        },
        _ => Err(LispError::arity("'-' currently supports 1 or 2 arguments")),
    }
}

fn div(args: &[Value]) -> Result<f64, LispError> {
    match args {
        [Value::Number(dividend), Value::Number(divisor)] => {
            if *divisor == 0.0 {
                Err(LispError::new(ErrorKind::DivisionByZeroError, "Division by zero"))
            } else {
                Ok(dividend / divisor)
            }
        },
        [_, _] => Err(LispError::type_error("Arguments to / must be numbers")),
        _ => Err(LispError::arity("'/' requires exactly 2 arguments")),
    }
}

fn eq(args: &[Value]) -> Result<bool, LispError> {
    match args {
        [Value::Number(a), Value::Number(b)] => Ok((a - b).abs() < EQ_TOLERANCE),
        [Value::Boolean(a), Value::Boolean(b)] => Ok(a == b),
        [Value::Symbol(a), Value::Symbol(b)] => Ok(a == b),
        [a, b] if std::mem::discriminant(a) != std::mem::discriminant(b) => Ok(false),
        [_, _] => Err(LispError::type_error("Unsupported types for equality comparison")),
        _ => Err(LispError::arity("'=' requires exactly 2 arguments")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(x: f64) -> Value {
        Value::number(x)
    }

    fn apply(builtin: Builtin, args: &[Value]) -> Value {
        match builtin.apply(args) {
            Outcome::Value(value) => value,
            Outcome::Halt => panic!("unexpected halt from {}", builtin.name()),
        }
    }

    fn kind_of(value: &Value) -> Option<ErrorKind> {
        if let Value::Error(err) = value {
            Some(err.kind)
        } else {
            None
        }
    }

    #[test]
    fn test_lookup() {
        for (name, builtin) in REGISTRY {
            assert_eq!(Builtin::lookup(name), Some(builtin));
            assert_eq!(builtin.name(), name);
        }
        assert_eq!(Builtin::lookup("car"), None);
        assert_eq!(Builtin::lookup(""), None);
    }

    #[test]
    fn test_arithmetic() {
        let cases = [
            (Builtin::Add, vec![], n(0.0)),
            (Builtin::Add, vec![n(1.0), n(2.0), n(3.0)], n(6.0)),
            (Builtin::Mul, vec![], n(1.0)),
            (Builtin::Mul, vec![n(2.0), n(3.0), n(4.0)], n(24.0)),
            (Builtin::Sub, vec![n(5.0)], n(-5.0)),
            (Builtin::Sub, vec![n(10.0), n(3.0)], n(7.0)),
            (Builtin::Div, vec![n(10.0), n(2.0)], n(5.0)),
            (Builtin::Div, vec![n(1.0), n(4.0)], n(0.25)),
        ];
        for (builtin, args, expected) in cases {
            assert_eq!(apply(builtin, &args), expected, "{}", builtin.name());
        }
    }

    #[test]
    fn test_arithmetic_errors() {
        let t = Value::boolean(true);
        let cases = [
            (Builtin::Add, vec![n(1.0), t.clone()], ErrorKind::TypeError),
            (Builtin::Mul, vec![t.clone()], ErrorKind::TypeError),
            (Builtin::Sub, vec![], ErrorKind::ArityError),
            (Builtin::Sub, vec![n(1.0), n(2.0), n(3.0)], ErrorKind::ArityError),
            (Builtin::Sub, vec![t.clone()], ErrorKind::TypeError),
            (Builtin::Sub, vec![n(1.0), t.clone()], ErrorKind::TypeError),
            (Builtin::Div, vec![n(1.0)], ErrorKind::ArityError),
            (Builtin::Div, vec![n(1.0), t.clone()], ErrorKind::TypeError),
            (Builtin::Div, vec![n(1.0), n(0.0)], ErrorKind::DivisionByZeroError),
            (Builtin::Div, vec![n(1.0), n(-0.0)], ErrorKind::DivisionByZeroError),
            (Builtin::Eq, vec![n(1.0)], ErrorKind::ArityError),
            (Builtin::Quit, vec![n(1.0)], ErrorKind::ArityError),
        ];
        for (builtin, args, expected) in cases {
            let result = apply(builtin, &args);
            assert_eq!(kind_of(&result), Some(expected), "{} {:?}", builtin.name(), args);
        }
    }

    #[test]
    fn test_equality() {
        let sym = |s: &str| Value::symbol(s).unwrap();
        let cases = [
            (n(5.0), n(5.0), true),
            (n(1.0000000001), n(1.0), true),
            (n(1.1), n(1.0), false),
            (Value::boolean(true), Value::boolean(true), true),
            (Value::boolean(true), Value::boolean(false), false),
            (sym("a"), sym("a"), true),
            (sym("a"), sym("b"), false),
            (n(1.0), Value::boolean(true), false),
            (Value::List(vec![]), n(0.0), false),
        ];
        for (a, b, expected) in cases {
            assert_eq!(apply(Builtin::Eq, &[a, b]), Value::boolean(expected));
        }
    }

    #[test]
    fn test_equality_unsupported() {
        let cases = [
            (Value::List(vec![]), Value::List(vec![])),
            (Value::function(Builtin::Add), Value::function(Builtin::Add)),
            (
                Value::error(ErrorKind::EvalError, "a"),
                Value::error(ErrorKind::EvalError, "a"),
            ),
        ];
        for (a, b) in cases {
            assert_eq!(kind_of(&apply(Builtin::Eq, &[a, b])), Some(ErrorKind::TypeError));
        }
    }

    #[test]
    fn test_quit_halts() {
        assert_eq!(Builtin::Quit.apply(&[]), Outcome::Halt);
    }
}
