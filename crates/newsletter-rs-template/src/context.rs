//! Render context and dotted-path resolution.
//!
//! Provides [`Context`], a stack of variable scopes used for layering
//! defaults beneath caller data, and [`ContextValue`], the dynamic value type
//! stored in it. Lookups never fail: a missing key, a missing segment, or a
//! type mismatch along a dotted path all resolve to "nothing".

use std::collections::HashMap;
use std::fmt;

/// Represents a dynamic value in a render context.
///
/// Lists are only ever tested for truthiness or length; the template syntax
/// has no iteration.
#[derive(Debug, Clone)]
pub enum ContextValue {
    /// A string value.
    String(String),
    /// A 64-bit integer.
    Integer(i64),
    /// A 64-bit floating point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// An ordered list of values.
    List(Vec<ContextValue>),
    /// A nested mapping.
    Dict(HashMap<String, ContextValue>),
    /// The absence of a value.
    None,
}

impl ContextValue {
    /// Returns `true` if this value is considered "truthy".
    ///
    /// - `None` is falsy
    /// - Empty strings, empty lists, empty dicts are falsy
    /// - `Bool(false)` is falsy
    /// - `Integer(0)` and `Float(0.0)` are falsy
    /// - Everything else is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Dict(d) => !d.is_empty(),
        }
    }

    /// Converts this value to its substitution text (without HTML escaping).
    ///
    /// `None` becomes the empty string, booleans render as `True`/`False`
    /// and integral floats keep one decimal place (`3.0`).
    pub fn to_display_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{f:.1}")
                } else {
                    f.to_string()
                }
            }
            Self::Bool(b) => bool_text(*b).to_string(),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Self::to_repr).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Dict(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                let inner: Vec<String> = keys
                    .into_iter()
                    .map(|k| format!("'{k}': {}", map[k].to_repr()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::None => String::new(),
        }
    }

    fn to_repr(&self) -> String {
        match self {
            Self::String(s) => format!("'{s}'"),
            Self::None => "None".to_string(),
            other => other.to_display_string(),
        }
    }

    /// Returns `true` if this value can be substituted into a template.
    ///
    /// Mappings are not leaves: `{{blog}}` never renders a whole mapping.
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Self::Dict(_))
    }

    /// Descends one segment into a mapping.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Dict(map) => map.get(key),
            _ => None,
        }
    }
}

const fn bool_text(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                (*a as f64) == *b
            }
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::None, Self::None) => true,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            _ => false,
        }
    }
}

// -- From implementations --

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for ContextValue {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<i32> for ContextValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for ContextValue {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<usize> for ContextValue {
    fn from(i: usize) -> Self {
        Self::Integer(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ContextValue>> From<HashMap<String, T>> for ContextValue {
    fn from(m: HashMap<String, T>) -> Self {
        Self::Dict(m.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(o: Option<T>) -> Self {
        o.map_or(Self::None, Into::into)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::None),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(arr) => Self::List(arr.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Dict(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// A render context that holds variables in a stack of scopes.
///
/// Lookup of the first path segment searches from the top of the stack
/// downward, so a pushed scope shadows whole top-level keys of the scopes
/// beneath it. This is how defaults are layered under caller data.
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::context::{Context, ContextValue};
///
/// let mut ctx = Context::new();
/// ctx.set("blog_title", ContextValue::from("Newsletter"));
///
/// ctx.push();
/// ctx.set("blog_title", ContextValue::from("The Weekly"));
/// assert_eq!(ctx.resolve("blog_title").unwrap().to_display_string(), "The Weekly");
///
/// ctx.pop();
/// assert_eq!(ctx.resolve("blog_title").unwrap().to_display_string(), "Newsletter");
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    stack: Vec<HashMap<String, ContextValue>>,
}

impl Context {
    /// Creates a new empty context with a single scope.
    pub fn new() -> Self {
        Self {
            stack: vec![HashMap::new()],
        }
    }

    /// Pushes a new scope onto the context stack.
    pub fn push(&mut self) {
        self.stack.push(HashMap::new());
    }

    /// Pops the top scope from the context stack.
    ///
    /// If only one scope remains, this is a no-op.
    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Sets a variable in the current (top) scope.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        if let Some(top) = self.stack.last_mut() {
            top.insert(key.into(), value.into());
        }
    }

    /// Returns a new context with `defaults` beneath every scope of `self`.
    #[must_use]
    pub fn layered_over(&self, defaults: &Self) -> Self {
        let mut stack = defaults.stack.clone();
        stack.extend(self.stack.iter().cloned());
        Self { stack }
    }

    /// Looks up a top-level key exactly as written, dots included.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.stack.iter().rev().find_map(|scope| scope.get(key))
    }

    /// Resolves a dot-separated path through nested mappings.
    ///
    /// Returns `None` as soon as a segment is missing or the current value is
    /// not a mapping.
    pub fn resolve(&self, path: &str) -> Option<&ContextValue> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Resolves `path` and reports whether the result is truthy.
    pub fn is_truthy(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(ContextValue::is_truthy)
    }

    /// Finds the value to substitute for a `{{path}}` placeholder.
    ///
    /// Nested resolution is tried first, then a top-level key spelled with
    /// dots (`"newsletter.header_image"`). Mappings are never leaves.
    pub fn lookup_leaf(&self, path: &str) -> Option<&ContextValue> {
        self.resolve(path)
            .filter(|v| v.is_leaf())
            .or_else(|| self.get(path).filter(|v| v.is_leaf()))
    }

    /// Returns `true` if no scope holds any variable.
    pub fn is_empty(&self) -> bool {
        self.stack.iter().all(HashMap::is_empty)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.set(k, v);
        }
        ctx
    }
}

impl From<serde_json::Value> for Context {
    /// Builds a context from a JSON object. Any other JSON value yields an
    /// empty context.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => Self::new(),
        }
    }
}

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their HTML entity equivalents.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Context {
        Context::from(json!({
            "blog": {"title": "Notes", "logo": "", "meta": {"lang": "en"}},
            "newsletter.header_image": "https://example.com/h.png",
            "posts": [{"title": "a"}],
            "empty_list": [],
            "zero": 0,
            "nothing": null,
        }))
    }

    #[test]
    fn test_truthiness() {
        assert!(!ContextValue::None.is_truthy());
        assert!(!ContextValue::from("").is_truthy());
        assert!(!ContextValue::from(false).is_truthy());
        assert!(!ContextValue::from(0).is_truthy());
        assert!(!ContextValue::from(0.0).is_truthy());
        assert!(!ContextValue::List(vec![]).is_truthy());
        assert!(!ContextValue::Dict(HashMap::new()).is_truthy());
        assert!(ContextValue::from("x").is_truthy());
        assert!(ContextValue::from(-1).is_truthy());
        assert!(ContextValue::from(vec![1]).is_truthy());
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(ContextValue::from(true).to_display_string(), "True");
        assert_eq!(ContextValue::from(3.0).to_display_string(), "3.0");
        assert_eq!(ContextValue::from(2.5).to_display_string(), "2.5");
        assert_eq!(ContextValue::from(42).to_display_string(), "42");
        assert_eq!(ContextValue::None.to_display_string(), "");
        assert_eq!(
            ContextValue::from(vec![ContextValue::from(1), ContextValue::from("a")])
                .to_display_string(),
            "[1, 'a']"
        );
    }

    #[test]
    fn test_resolve_nested() {
        let ctx = sample();
        assert_eq!(ctx.resolve("blog.title"), Some(&ContextValue::from("Notes")));
        assert_eq!(ctx.resolve("blog.meta.lang"), Some(&ContextValue::from("en")));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let ctx = sample();
        assert!(ctx.resolve("blog.missing").is_none());
        assert!(ctx.resolve("missing.title").is_none());
        assert!(ctx.resolve("blog.title.deeper").is_none());
        assert!(ctx.resolve("posts.0").is_none());
        assert!(ctx.resolve("").is_none());
        assert!(ctx.resolve("blog..title").is_none());
    }

    #[test]
    fn test_resolve_does_not_read_flat_dotted_keys() {
        let ctx = sample();
        assert!(ctx.resolve("newsletter.header_image").is_none());
        assert!(!ctx.is_truthy("newsletter.header_image"));
    }

    #[test]
    fn test_is_truthy_paths() {
        let ctx = sample();
        assert!(ctx.is_truthy("blog.title"));
        assert!(!ctx.is_truthy("blog.logo"));
        assert!(ctx.is_truthy("posts"));
        assert!(!ctx.is_truthy("empty_list"));
        assert!(!ctx.is_truthy("zero"));
        assert!(!ctx.is_truthy("nothing"));
        assert!(!ctx.is_truthy("absent"));
    }

    #[test]
    fn test_lookup_leaf() {
        let ctx = sample();
        assert_eq!(
            ctx.lookup_leaf("newsletter.header_image"),
            Some(&ContextValue::from("https://example.com/h.png"))
        );
        assert_eq!(ctx.lookup_leaf("blog.title"), Some(&ContextValue::from("Notes")));
        assert!(ctx.lookup_leaf("blog").is_none());
        assert_eq!(ctx.lookup_leaf("nothing"), Some(&ContextValue::None));
    }

    #[test]
    fn test_layered_over_defaults() {
        let defaults: Context = [("blog_title", "Newsletter"), ("featured_url", "#")]
            .into_iter()
            .collect();
        let data: Context = [("blog_title", "Mine")].into_iter().collect();
        let ctx = data.layered_over(&defaults);
        assert_eq!(ctx.resolve("blog_title"), Some(&ContextValue::from("Mine")));
        assert_eq!(ctx.resolve("featured_url"), Some(&ContextValue::from("#")));
    }

    #[test]
    fn test_layering_shadows_whole_top_level_key() {
        let defaults = Context::from(json!({"blog": {"title": "Default", "logo": "l.png"}}));
        let data = Context::from(json!({"blog": {"title": "Mine"}}));
        let ctx = data.layered_over(&defaults);
        assert!(ctx.resolve("blog.logo").is_none());
    }

    #[test]
    fn test_push_pop() {
        let mut ctx = Context::new();
        ctx.set("x", 1);
        ctx.push();
        ctx.set("x", 2);
        assert_eq!(ctx.resolve("x"), Some(&ContextValue::from(2)));
        ctx.pop();
        ctx.pop();
        assert_eq!(ctx.resolve("x"), Some(&ContextValue::from(1)));
    }

    #[test]
    fn test_from_non_object_json_is_empty() {
        assert!(Context::from(json!([1, 2])).is_empty());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }
}
