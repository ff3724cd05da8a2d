//! Placeholder substitution.
//!
//! [`Interpolator`] replaces `{{path}}` and `{{{path}}}` placeholders with
//! values from a [`Context`] in a single left-to-right pass over the
//! template's tokens. Substituted text is never scanned again, so the order
//! of keys in the context cannot change the result.

use std::collections::HashSet;

use crate::context::{escape_html, Context, ContextValue};
use crate::lexer::{self, Token};

/// Configurable placeholder substitution.
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::context::Context;
/// use newsletter_rs_template::interpolate::Interpolator;
///
/// let ctx: Context = [("name", "<Bruno>")].into_iter().collect();
///
/// let plain = Interpolator::new();
/// assert_eq!(plain.interpolate("Hi {{name}}{{gone}}", &ctx), "Hi <Bruno>");
///
/// let escaping = Interpolator::new().with_auto_escape(true);
/// assert_eq!(escaping.interpolate("Hi {{name}}", &ctx), "Hi &lt;Bruno&gt;");
/// ```
#[derive(Debug, Clone)]
pub struct Interpolator {
    preserved: HashSet<String>,
    cleanup: bool,
    auto_escape: bool,
}

impl Interpolator {
    /// Creates an interpolator that removes unresolved escaped placeholders
    /// and stray region markers, and does not escape.
    pub fn new() -> Self {
        Self {
            preserved: HashSet::new(),
            cleanup: true,
            auto_escape: false,
        }
    }

    /// Keeps placeholders for `name` untouched, resolved or not.
    #[must_use]
    pub fn preserve(mut self, name: impl Into<String>) -> Self {
        self.preserved.insert(name.into());
        self
    }

    /// Sets whether unresolved `{{…}}` placeholders and stray markers are removed.
    #[must_use]
    pub const fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Sets whether values substituted through `{{…}}` are HTML-escaped.
    #[must_use]
    pub const fn with_auto_escape(mut self, auto_escape: bool) -> Self {
        self.auto_escape = auto_escape;
        self
    }

    /// Substitutes every placeholder in `template` from `context`.
    pub fn interpolate(&self, template: &str, context: &Context) -> String {
        let mut out = String::with_capacity(template.len());

        let tokens = lexer::tokenize(template);
        for (i, token) in tokens.iter().enumerate() {
            // A brace on either side means a malformed raw marker; keep it visible.
            let keep_unresolved = !self.cleanup || touches_brace(&out, tokens.get(i + 1));
            match token {
                Token::Text(s) => out.push_str(s),
                Token::Variable(raw_path) => {
                    let path = raw_path.trim();
                    if self.preserved.contains(path) {
                        out.push_str(&token.to_string());
                    } else if let Some(value) = context.lookup_leaf(path) {
                        out.push_str(&self.escaped(value));
                    } else if keep_unresolved {
                        out.push_str(&token.to_string());
                    }
                }
                Token::Raw(raw_path) => {
                    let path = raw_path.trim();
                    if self.preserved.contains(path) {
                        out.push_str(&token.to_string());
                    } else if let Some(value) = context.lookup_leaf(path) {
                        out.push_str(&value.to_display_string());
                    } else {
                        if self.cleanup {
                            tracing::warn!(placeholder = %token, "raw placeholder left unresolved");
                        }
                        out.push_str(&token.to_string());
                    }
                }
                Token::Open(_) | Token::Close(_) => {
                    if keep_unresolved {
                        out.push_str(&token.to_string());
                    }
                }
            }
        }

        out
    }

    fn escaped(&self, value: &ContextValue) -> String {
        let text = value.to_display_string();
        if self.auto_escape {
            escape_html(&text)
        } else {
            text
        }
    }
}

fn touches_brace(out: &str, next: Option<&Token>) -> bool {
    out.ends_with('{') || matches!(next, Some(Token::Text(t)) if t.starts_with('}'))
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

/// Substitutes placeholders with the default [`Interpolator`].
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::context::Context;
/// use newsletter_rs_template::interpolate::interpolate;
///
/// let ctx: Context = [("x", "<b>")].into_iter().collect();
/// assert_eq!(interpolate("{{{x}}}", &ctx), "<b>");
/// assert_eq!(interpolate("a{{missing}}b", &Context::new()), "ab");
/// ```
pub fn interpolate(template: &str, context: &Context) -> String {
    Interpolator::new().interpolate(template, context)
}

/// Lists the paths of `{{{…}}}` placeholders remaining in rendered output.
///
/// Paths are trimmed and reported once each, in order of first appearance.
pub fn unresolved_raw_placeholders(rendered: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    lexer::tokenize(rendered)
        .into_iter()
        .filter_map(|token| match token {
            Token::Raw(path) => Some(path.trim().to_string()),
            _ => None,
        })
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
