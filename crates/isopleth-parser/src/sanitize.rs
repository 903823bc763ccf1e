//! Textual preprocessing of the editor's output.
//!
//! These rewrites are purely textual and run before tokenization: they
//! normalize the few LaTeX spellings the math editor emits into the one
//! form the tokenizer understands.

use crate::error::ParseError;

/// Normalizes an input line for the tokenizer.
///
/// - `\operatorname{name}` becomes `\name`
/// - `\left(`/`\right)` and bare parentheses become `{`/`}` groups
/// - an explicit `\cdot` is inserted between a digit and a following
///   letter, so `2x` tokenizes without lookahead
pub fn sanitize(text: &str) -> Result<String, ParseError> {
    let mut out = text.to_string();

    while let Some(start) = out.find("\\operatorname{") {
        let name_start = start + "\\operatorname{".len();
        let Some(close) = out[name_start..].find('}') else {
            return Err(ParseError::UnbalancedGroup);
        };
        let name = out[name_start..name_start + close].to_string();
        out.replace_range(start..name_start + close + 1, &format!("\\{name}"));
    }

    let out = out
        .replace("\\left(", "{")
        .replace("\\right)", "}")
        .replace('(', "{")
        .replace(')', "}");

    let mut spaced = String::with_capacity(out.len());
    let mut previous: Option<char> = None;
    for c in out.chars() {
        if c.is_ascii_alphabetic() && previous.is_some_and(|p| p.is_ascii_digit()) {
            spaced.push_str("\\cdot ");
        }
        spaced.push(c);
        previous = Some(c);
    }

    Ok(spaced)
}
