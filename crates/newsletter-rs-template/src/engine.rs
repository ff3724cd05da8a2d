//! Template rendering: conditional evaluation followed by interpolation.
//!
//! The [`Renderer`] struct is the central entry point. It owns the named
//! conditions, the default values layered beneath caller data, the set of
//! late-bound variables, and the auto-escape switch.

use newsletter_rs_core::error::NewsletterError;
use newsletter_rs_core::settings::TemplateSettings;

use crate::conditional::{self, Conditions};
use crate::context::{Context, ContextValue};
use crate::interpolate::{self, Interpolator};
use crate::parser::Template;

/// Renders templates against a context.
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::context::Context;
/// use newsletter_rs_template::engine::Renderer;
///
/// let renderer = Renderer::new()
///     .with_condition("if_blog_logo", false)
///     .with_defaults([("blog_title", "Newsletter")].into_iter().collect());
///
/// let out = renderer.render("{{#if_blog_logo}}<img>{{/if_blog_logo}}{{blog_title}}", &Context::new());
/// assert_eq!(out, "Newsletter");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    conditions: Conditions,
    defaults: Context,
    late_bound: Vec<String>,
    auto_escape: bool,
}

impl Renderer {
    /// Creates a renderer with no conditions, defaults, or late-bound names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer from template settings.
    ///
    /// Late-bound names and the auto-escape switch are copied; the settings'
    /// default values become the bottom context layer.
    pub fn from_settings(settings: &TemplateSettings) -> Self {
        let defaults: Context = settings
            .defaults
            .iter()
            .map(|(k, v)| (k.clone(), ContextValue::from(v.clone())))
            .collect();

        Self {
            conditions: Conditions::new(),
            defaults,
            late_bound: settings.late_bound.clone(),
            auto_escape: settings.auto_escape,
        }
    }

    /// Appends a named condition. The first binding of a name wins.
    #[must_use]
    pub fn with_condition(mut self, name: impl Into<String>, value: bool) -> Self {
        self.conditions.push(name, value);
        self
    }

    /// Appends a list of named conditions after the existing ones.
    #[must_use]
    pub fn with_conditions(mut self, conditions: &Conditions) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Replaces the named conditions.
    pub fn set_conditions(&mut self, conditions: Conditions) {
        self.conditions = conditions;
    }

    /// Layers `defaults` above any defaults already set.
    ///
    /// Caller data passed to [`render`](Self::render) always wins per
    /// top-level key.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Context) -> Self {
        self.defaults = defaults.layered_over(&self.defaults);
        self
    }

    /// Declares a variable that the main pass leaves untouched.
    pub fn add_late_bound(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.late_bound.contains(&name) {
            self.late_bound.push(name);
        }
    }

    /// Sets whether `{{…}}` substitutions are HTML-escaped.
    pub fn set_auto_escape(&mut self, enabled: bool) {
        self.auto_escape = enabled;
    }

    /// Returns whether auto-escaping is enabled.
    pub const fn auto_escape(&self) -> bool {
        self.auto_escape
    }

    /// Returns the late-bound variable names.
    pub fn late_bound(&self) -> &[String] {
        &self.late_bound
    }

    /// Returns the named conditions.
    pub const fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Renders `template` against `data` layered over the defaults.
    ///
    /// Missing data renders as empty output; this never fails.
    pub fn render(&self, template: &str, data: &Context) -> String {
        let context = data.layered_over(&self.defaults);
        let resolved = conditional::evaluate(template, &self.conditions, &context);
        self.main_interpolator().interpolate(&resolved, &context)
    }

    /// Renders like [`render`](Self::render), but rejects unbalanced region
    /// markers and raw placeholders left unresolved.
    ///
    /// Late-bound placeholders are expected to survive and are not reported.
    ///
    /// # Errors
    ///
    /// Returns `TemplateSyntaxError` for unbalanced markers and
    /// `UnresolvedPlaceholder` when raw placeholders remain in the output.
    pub fn render_strict(&self, template: &str, data: &Context) -> Result<String, NewsletterError> {
        Template::parse(template).validate()?;

        let rendered = self.render(template, data);
        let unresolved: Vec<String> = interpolate::unresolved_raw_placeholders(&rendered)
            .into_iter()
            .filter(|name| !self.late_bound.contains(name))
            .collect();

        if unresolved.is_empty() {
            Ok(rendered)
        } else {
            Err(NewsletterError::UnresolvedPlaceholder(unresolved))
        }
    }

    /// Substitutes only the keys present in `bindings`, leaving every other
    /// placeholder as it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use newsletter_rs_template::context::Context;
    /// use newsletter_rs_template::engine::Renderer;
    ///
    /// let mut renderer = Renderer::new();
    /// renderer.add_late_bound("unsubscribe_url");
    ///
    /// let main = renderer.render("<a href=\"{{unsubscribe_url}}\">{{gone}}</a>", &Context::new());
    /// assert_eq!(main, "<a href=\"{{unsubscribe_url}}\"></a>");
    ///
    /// let bindings: Context = [("unsubscribe_url", "https://x/u")].into_iter().collect();
    /// assert_eq!(renderer.bind_late(&main, &bindings), "<a href=\"https://x/u\"></a>");
    /// ```
    pub fn bind_late(&self, rendered: &str, bindings: &Context) -> String {
        Interpolator::new()
            .with_cleanup(false)
            .with_auto_escape(self.auto_escape)
            .interpolate(rendered, bindings)
    }

    fn main_interpolator(&self) -> Interpolator {
        self.late_bound
            .iter()
            .fold(Interpolator::new(), |interp, name| interp.preserve(name.clone()))
            .with_auto_escape(self.auto_escape)
    }
}

/// Renders `template` against `context` with a default [`Renderer`].
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::context::Context;
/// use newsletter_rs_template::render;
/// use serde_json::json;
///
/// let ctx = Context::from(json!({"show": true, "name": "Bruno", "raw": "<i>ok</i>"}));
/// assert_eq!(
///     render("{{#if show}}Hello {{name}}{{/if}}{{{raw}}}", &ctx),
///     "Hello Bruno<i>ok</i>"
/// );
/// ```
pub fn render(template: &str, context: &Context) -> String {
    Renderer::new().render(template, context)
}
