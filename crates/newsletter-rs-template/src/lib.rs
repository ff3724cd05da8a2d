//! # newsletter-rs-template
//!
//! A small logic-light template engine for email documents. Templates mix
//! literal text with conditional regions (`{{#name}}…{{/name}}`,
//! `{{#if path}}…{{/if}}`), escaped placeholders (`{{path}}`), and raw
//! placeholders (`{{{path}}}`). Rendering runs conditional evaluation first
//! and interpolation second.
//!
//! ## Modules
//!
//! - [`context`] - Render context, values, and dotted-path resolution
//! - [`lexer`] - Tokenizer for placeholders and region markers
//! - [`parser`] - Region tree with unbalanced-marker recovery
//! - [`conditional`] - Conditional region evaluation
//! - [`interpolate`] - Placeholder substitution and cleanup
//! - [`engine`] - The [`Renderer`] tying it all together

pub mod conditional;
pub mod context;
pub mod engine;
pub mod interpolate;
pub mod lexer;
pub mod parser;

pub use conditional::{evaluate, Conditions};
pub use context::{Context, ContextValue};
pub use engine::{render, Renderer};
pub use interpolate::{interpolate, unresolved_raw_placeholders, Interpolator};
pub use parser::Template;
