//! Reader: turns text into [`Value`] trees.
//!
//! The reader is single-pass and never backtracks. Malformed input comes back
//! as a `SyntaxError` value rather than a failure of the whole call; after an
//! error the cursor is left wherever the problem was found and should not be
//! reused.

use tracing::trace;

use crate::error::LispError;
use crate::lex::number_prefix;
use crate::value::Value;

/// Longest symbol the reader accepts, in bytes.
pub const MAX_SYMBOL_BYTES: usize = 255;

/// Whitespace as the C locale sees it, which includes vertical tab.
fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

fn is_delimiter(c: char) -> bool {
    is_space(c) || c == '(' || c == ')'
}

/// A read position over one line of input.
///
/// Iterating a `Cursor` yields one expression per call until the input is
/// exhausted.
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    max_symbol_bytes: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Cursor<'a> {
        Cursor::with_symbol_limit(input, MAX_SYMBOL_BYTES)
    }

    pub fn with_symbol_limit(input: &'a str, max_symbol_bytes: usize) -> Cursor<'a> {
        Cursor {
            input,
            pos: 0,
            max_symbol_bytes,
        }
    }

    /// The part of the input not consumed yet.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, bytes: usize) {
        self.pos += bytes;
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(is_space);
        self.bump(rest.len() - trimmed.len());
    }

    /// Reads one expression. `None` means there was nothing left to read.
    pub fn parse(&mut self) -> Option<Value> {
        self.skip_whitespace();
        let rest = self.rest();
        let first = self.peek()?;
        let mut chars = rest.chars();
        chars.next();
        let second = chars.next();

        let value = if first == '(' {
            self.bump(1);
            self.parse_list()
        } else if first.is_ascii_digit()
            || (first == '-' && second.map_or(false, |c| c.is_ascii_digit()))
            || first == '.'
        {
            self.parse_number()
        } else if rest.starts_with("#t") {
            self.bump(2);
            Value::boolean(true)
        } else if rest.starts_with("#f") {
            self.bump(2);
            Value::boolean(false)
        } else {
            self.parse_symbol()
        };
        trace!(kind = value.type_name(), pos = self.pos, "parsed");
        Some(value)
    }

    fn parse_list(&mut self) -> Value {
        let mut list = match Value::empty_list() {
            Ok(list) => list,
            Err(err) => return Value::Error(err),
        };
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Value::Error(LispError::syntax("Unexpected EOF, expected ')'"));
                },
                Some(')') => {
                    self.bump(1);
                    return list;
                },
                Some(_) => {},
            }
            let item = match self.parse() {
                Some(Value::Error(err)) => return Value::Error(err),
                Some(item) => item,
                None => return Value::Error(LispError::syntax("Invalid expression inside list")),
            };
            if let Err(refused) = list.append(item) {
                return Value::Error(refused.reason);
            }
        }
    }

    fn parse_number(&mut self) -> Value {
        let literal = match number_prefix(self.rest()) {
            Some(literal) => literal,
            None => return Value::Error(LispError::syntax("Invalid number format")),
        };
        match literal.parse::<f64>() {
            Ok(n) => {
                self.bump(literal.len());
                Value::number(n)
            },
            Err(_) => Value::Error(LispError::syntax("Invalid number format")),
        }
    }

    fn parse_symbol(&mut self) -> Value {
        let rest = self.rest();
        let mut len = 0;
        for (offset, c) in rest.char_indices() {
            if is_delimiter(c) {
                break;
            }
            if offset + c.len_utf8() > self.max_symbol_bytes {
                self.bump(offset);
                return Value::Error(LispError::syntax("Symbol too long"));
            }
            len = offset + c.len_utf8();
        }
        if len == 0 {
            return Value::Error(LispError::syntax("Empty symbol or unparsable token"));
        }
        self.bump(len);
        Value::symbol(&rest[..len]).unwrap_or_else(Value::Error)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse()
    }
}

/// Reads the first expression of `input`.
pub fn parse(input: &str) -> Option<Value> {
    Cursor::new(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn num(n: f64) -> Value {
        Value::number(n)
    }

    fn sym(s: &str) -> Value {
        Value::symbol(s).unwrap()
    }

    fn lst(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    fn syntax_message(value: Option<Value>) -> String {
        match value {
            Some(Value::Error(err)) => {
                assert_eq!(err.kind, ErrorKind::SyntaxError);
                err.message.into_owned()
            },
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse() {
        let programs = [
            "(+ 1 2)",
            "12",
            "(+ 1 (+ 2 3))",
            "(+ 1 (+ 2 3)  4)",
            "  -3.5",
            "#t",
            "(= #f #f)",
            "()",
            "(() (()))",
            "foo?",
            ".25",
        ];
        let expected = [
            lst(vec![sym("+"), num(1.0), num(2.0)]),
            num(12.0),
            lst(vec![sym("+"), num(1.0), lst(vec![sym("+"), num(2.0), num(3.0)])]),
            lst(vec![
                sym("+"),
                num(1.0),
                lst(vec![sym("+"), num(2.0), num(3.0)]),
                num(4.0),
            ]),
            num(-3.5),
            Value::boolean(true),
            lst(vec![sym("="), Value::boolean(false), Value::boolean(false)]),
            lst(vec![]),
            lst(vec![lst(vec![]), lst(vec![lst(vec![])])]),
            sym("foo?"),
            num(0.25),
        ];

        programs
            .into_iter()
            .zip(expected.into_iter())
            .for_each(|(program, expected)| {
                assert_eq!(parse(program), Some(expected), "program: {:?}", program);
            });
    }

    #[test]
    fn test_nothing_to_parse() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   \t "), None);
    }

    #[test]
    fn test_minus_is_a_symbol_unless_a_digit_follows() {
        assert_eq!(parse("-"), Some(sym("-")));
        assert_eq!(parse("-x"), Some(sym("-x")));
        assert_eq!(parse("-.5"), Some(sym("-.5")));
        assert_eq!(parse("(- 5)"), Some(lst(vec![sym("-"), num(5.0)])));
    }

    #[test]
    fn test_tokens_split_at_literal_boundaries() {
        let read: Vec<Value> = Cursor::new("12abc #tx 1e 2e3").collect();
        assert_eq!(
            read,
            vec![
                num(12.0),
                sym("abc"),
                Value::boolean(true),
                sym("x"),
                num(1.0),
                sym("e"),
                num(2000.0),
            ]
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            syntax_message(parse("(+ 1 2")),
            "Unexpected EOF, expected ')'"
        );
        assert_eq!(syntax_message(parse(".")), "Invalid number format");
        assert_eq!(syntax_message(parse("(1 .)")), "Invalid number format");
        assert_eq!(
            syntax_message(parse(")")),
            "Empty symbol or unparsable token"
        );
    }

    #[test]
    fn test_symbol_length_limit() {
        let longest = "a".repeat(MAX_SYMBOL_BYTES);
        assert_eq!(parse(&longest), Some(sym(&longest)));

        let too_long = "a".repeat(MAX_SYMBOL_BYTES + 1);
        let mut cursor = Cursor::new(&too_long);
        assert_eq!(syntax_message(cursor.parse()), "Symbol too long");
        assert_eq!(cursor.position(), MAX_SYMBOL_BYTES);

        let mut short_limit = Cursor::with_symbol_limit("abcd", 3);
        assert_eq!(syntax_message(short_limit.parse()), "Symbol too long");
    }

    #[test]
    fn test_error_inside_list_discards_the_list() {
        let mut cursor = Cursor::new("(+ 1 . 2)");
        assert_eq!(syntax_message(cursor.parse()), "Invalid number format");
        assert_eq!(cursor.rest(), ". 2)");
    }

    #[test]
    fn test_cursor_advances_past_list() {
        let mut cursor = Cursor::new("(quit) rest");
        assert_eq!(cursor.parse(), Some(lst(vec![sym("quit")])));
        assert_eq!(cursor.rest(), " rest");
    }
}
