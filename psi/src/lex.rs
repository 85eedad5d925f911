use logos::Logos;

/// Mantissa of a numeric literal: optional minus, then either digits with an
/// optional fraction or a bare fraction (`.5`).
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum NumberToken {
    #[regex(r"-?([0-9]+(\.[0-9]*)?|\.[0-9]+)")]
    Number,

    #[error]
    Error,
}

/// Exponent suffix of a numeric literal. Scanned separately so that a
/// dangling `e` (as in `1e`) is left for the next token.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum ExponentToken {
    #[regex(r"[eE][+-]?[0-9]+")]
    Exponent,

    #[error]
    Error,
}

/// Returns the longest numeric literal at the very start of `input`, if any.
pub fn number_prefix(input: &str) -> Option<&str> {
    let mut lexer = NumberToken::lexer(input);
    let mantissa = match lexer.next() {
        Some(NumberToken::Number) => lexer.slice().len(),
        _ => return None,
    };
    let mut exponent = ExponentToken::lexer(&input[mantissa..]);
    let len = match exponent.next() {
        Some(ExponentToken::Exponent) => mantissa + exponent.slice().len(),
        _ => mantissa,
    };
    Some(&input[..len])
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum Paren {
    #[token("(")]
    Open,
    #[token(")")]
    Close,

    #[error]
    #[regex(r"[^()]+", logos::skip)]
    Other,
}

/// Checks that every `(` has a later matching `)` and no `)` closes nothing.
pub fn is_balanced(line: &str) -> bool {
    let mut depth: usize = 0;
    for paren in Paren::lexer(line) {
        match paren {
            Paren::Open => depth += 1,
            Paren::Close => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Paren::Other => {},
        }
    }
    depth == 0
}
