use std::panic;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use psi::parse::Cursor;
use psi::repl::{eval_line, ReplConfig, Step};

#[wasm_bindgen(typescript_custom_section)]
const VALUE: &str = r#"
interface LispError {
kind: string;
message: string;
}
interface Value {
Number?: number;
Boolean?: boolean;
Symbol?: string;
List?: Value[];
Function?: string;
Error?: LispError;
}
"#;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(typescript_type = "Value")]
    pub type JsLispValue;
}

/// Reads the first expression of `input` and hands the tree to JavaScript.
/// Returns `null` when there is nothing to read.
#[wasm_bindgen]
pub fn parse_value(input: &str) -> JsLispValue {
    let result = panic::catch_unwind(|| match Cursor::new(input).parse() {
        None => JsValue::NULL.unchecked_into::<JsLispValue>(),
        Some(value) => JsValue::from_serde(&value)
            .unwrap_or(JsValue::NULL)
            .unchecked_into(),
    });
    match result {
        Ok(value) => value,
        Err(_) => JsValue::from_str("code panicked").unchecked_into(),
    }
}

/// Runs one line through the interpreter and returns what the terminal
/// would show. `quit` comes back as `"Quitting..."`.
#[wasm_bindgen(js_name = runLine)]
pub fn run_line(input: &str) -> String {
    let config = ReplConfig {
        prompt: None,
        ..ReplConfig::default()
    };
    let result = panic::catch_unwind(|| eval_line(input, &config));
    match result {
        Ok(Step::Print(text)) => text,
        Ok(Step::Quit) => "Quitting...".to_string(),
        Err(_) => "code panicked".to_string(),
    }
}
