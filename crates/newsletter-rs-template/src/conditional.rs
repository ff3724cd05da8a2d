//! Conditional region evaluation.
//!
//! [`evaluate`] resolves `{{#name}}…{{/name}}` regions against a list of
//! caller-declared [`Conditions`] and `{{#if path}}…{{/if}}` regions against
//! the render [`Context`]. Kept regions lose their markers; dropped regions
//! vanish with their body. Named regions with no binding are written back
//! verbatim so the interpolator's cleanup can strip their markers later.

use crate::context::Context;
use crate::parser::{Node, Section, Template};

/// An ordered list of named boolean conditions.
///
/// When a name is bound more than once, the first binding wins.
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::conditional::Conditions;
///
/// let conditions: Conditions = [("if_blog_logo", false), ("if_blog_logo", true)]
///     .into_iter()
///     .collect();
/// assert_eq!(conditions.get("if_blog_logo"), Some(false));
/// assert_eq!(conditions.get("unknown"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    entries: Vec<(String, bool)>,
}

impl Conditions {
    /// Creates an empty set of conditions.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a binding. Earlier bindings of the same name take precedence.
    pub fn push(&mut self, name: impl Into<String>, value: bool) {
        self.entries.push((name.into(), value));
    }

    /// Appends every binding from `other` after the existing ones.
    pub fn extend(&mut self, other: &Self) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Returns the first binding for `name`.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Returns the bindings in declaration order.
    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    /// Returns `true` if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

/// Resolves every conditional region in `template`.
///
/// Evaluation repeats until the output stops changing, so markers that only
/// pair up once an enclosing region is removed are resolved too, and the
/// function is idempotent.
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::conditional::{evaluate, Conditions};
/// use newsletter_rs_template::context::Context;
///
/// let conditions: Conditions = [("flag", true)].into_iter().collect();
/// assert_eq!(evaluate("{{#flag}}X{{/flag}}", &conditions, &Context::new()), "X");
///
/// let conditions: Conditions = [("flag", false)].into_iter().collect();
/// assert_eq!(evaluate("{{#flag}}X{{/flag}}", &conditions, &Context::new()), "");
/// ```
pub fn evaluate(template: &str, conditions: &Conditions, context: &Context) -> String {
    let mut current = template.to_string();
    let mut passes = 0usize;
    loop {
        passes += 1;
        let next = evaluate_once(&Template::parse(&current), conditions, context);
        if next == current {
            break;
        }
        current = next;
    }
    tracing::debug!(passes, "conditional regions evaluated");
    current
}

/// Runs a single evaluation pass over a parsed template.
pub fn evaluate_once(template: &Template, conditions: &Conditions, context: &Context) -> String {
    let mut out = String::new();
    render_nodes(template.nodes(), conditions, context, &mut out);
    out
}

fn render_nodes(nodes: &[Node], conditions: &Conditions, context: &Context, out: &mut String) {
    for node in nodes {
        match node {
            Node::Region {
                section,
                open,
                close,
                body,
            } => match section {
                Section::If(path) => {
                    if context.is_truthy(path) {
                        render_nodes(body, conditions, context, out);
                    }
                }
                Section::Named(name) => match conditions.get(name) {
                    Some(true) => render_nodes(body, conditions, context, out),
                    Some(false) => {}
                    None => {
                        out.push_str(open);
                        render_nodes(body, conditions, context, out);
                        out.push_str(close);
                    }
                },
            },
            other => other.write_source(out),
        }
    }
}
