//! Template lexer (tokenizer).
//!
//! Converts raw template source text into a stream of [`Token`]s representing
//! text literals, escaped placeholders (`{{ }}`), raw placeholders
//! (`{{{ }}}`), and region markers (`{{#name}}`, `{{/name}}`).
//!
//! Tokenizing never fails. A brace sequence that does not form a marker is
//! kept as literal text, and writing the tokens back with [`Display`]
//! reproduces the source byte for byte.
//!
//! [`Display`]: std::fmt::Display

use std::fmt;

/// A token produced by the template lexer.
///
/// Marker contents are stored exactly as written, without trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A literal text segment.
    Text(String),
    /// An escaped placeholder: `{{path}}`.
    Variable(String),
    /// A raw placeholder: `{{{path}}}`.
    Raw(String),
    /// A region opener: `{{#name}}` or `{{#if path}}`. Holds the text after `#`.
    Open(String),
    /// A region closer: `{{/name}}`. Holds the text after `/`.
    Close(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Variable(s) => write!(f, "{{{{{s}}}}}"),
            Self::Raw(s) => write!(f, "{{{{{{{s}}}}}}}"),
            Self::Open(s) => write!(f, "{{{{#{s}}}}}"),
            Self::Close(s) => write!(f, "{{{{/{s}}}}}"),
        }
    }
}

/// Tokenizes a template source string into a sequence of [`Token`]s.
///
/// Adjacent literal text is merged into a single [`Token::Text`].
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::lexer::{tokenize, Token};
///
/// let tokens = tokenize("Hi {{name}}{{{body}}}");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Text("Hi ".into()),
///         Token::Variable("name".into()),
///         Token::Raw("body".into()),
///     ]
/// );
/// ```
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut remaining = source;

    while !remaining.is_empty() {
        let Some(pos) = remaining.find("{{") else {
            text.push_str(remaining);
            break;
        };

        text.push_str(&remaining[..pos]);
        let at_open = &remaining[pos..];

        if let Some((token, consumed)) = scan_marker(at_open) {
            if !text.is_empty() {
                tokens.push(Token::Text(std::mem::take(&mut text)));
            }
            tokens.push(token);
            remaining = &at_open[consumed..];
        } else {
            // Not a marker: keep one brace and rescan from the next one.
            text.push('{');
            remaining = &at_open[1..];
        }
    }

    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

/// Writes a token stream back to template source.
pub fn untokenize(tokens: &[Token]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}

/// Scans a marker at the start of `s`, which begins with `{{`.
///
/// Returns the token and the number of bytes it spans.
fn scan_marker(s: &str) -> Option<(Token, usize)> {
    if let Some(inner) = s.strip_prefix("{{{") {
        if let Some(content) = marker_content(inner, "}}}") {
            return Some((Token::Raw(content.to_string()), content.len() + 6));
        }
    }

    let inner = s.strip_prefix("{{")?;
    let content = marker_content(inner, "}}")?;
    let consumed = content.len() + 4;

    let token = if let Some(name) = content.strip_prefix('#').filter(|n| !n.is_empty()) {
        Token::Open(name.to_string())
    } else if let Some(name) = content.strip_prefix('/').filter(|n| !n.is_empty()) {
        Token::Close(name.to_string())
    } else {
        Token::Variable(content.to_string())
    };
    Some((token, consumed))
}

/// Returns the non-empty, brace-free text before `terminator`.
fn marker_content<'a>(s: &'a str, terminator: &str) -> Option<&'a str> {
    let end = s.find(|c: char| c == '{' || c == '}')?;
    let content = &s[..end];
    (!content.is_empty() && s[end..].starts_with(terminator)).then_some(content)
}
