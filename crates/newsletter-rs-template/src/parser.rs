//! Template parser.
//!
//! Builds a region tree from the lexer's token stream. Regions nest
//! properly: a closer always closes the innermost open region it matches.
//! Markers that cannot be paired (a closer with no opener, an opener that is
//! never closed, or an opener skipped over by an overlapping closer) are
//! demoted to literal text and recorded in [`Template::unbalanced`].

use newsletter_rs_core::error::NewsletterError;

use crate::lexer::{self, Token};

/// The kind of conditional region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// `{{#name}}…{{/name}}`, decided by a caller-declared boolean.
    Named(String),
    /// `{{#if path}}…{{/if}}`, decided by the truthiness of `path`.
    If(String),
}

impl Section {
    /// Classifies the text after `#` in a region opener.
    pub fn from_open(content: &str) -> Self {
        match content.strip_prefix("if") {
            Some("") => Self::If(String::new()),
            Some(rest) if rest.starts_with(char::is_whitespace) => Self::If(rest.trim().to_string()),
            _ => Self::Named(content.trim().to_string()),
        }
    }

    /// Returns `true` if a closer with this text ends this section.
    pub fn is_closed_by(&self, close: &str) -> bool {
        let close = close.trim();
        match self {
            Self::If(_) => close == "if",
            Self::Named(name) => close == name,
        }
    }
}

/// A node in the parsed template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, including demoted markers.
    Text(String),
    /// An escaped placeholder, as written between the braces.
    Variable(String),
    /// A raw placeholder, as written between the braces.
    Raw(String),
    /// A balanced conditional region.
    Region {
        /// The kind of region and its name or path.
        section: Section,
        /// The opening marker's source text.
        open: String,
        /// The closing marker's source text.
        close: String,
        /// Nodes between the markers.
        body: Vec<Node>,
    },
}

impl Node {
    /// Writes this node back to template source.
    pub fn write_source(&self, out: &mut String) {
        match self {
            Self::Text(s) => out.push_str(s),
            Self::Variable(s) => out.push_str(&Token::Variable(s.clone()).to_string()),
            Self::Raw(s) => out.push_str(&Token::Raw(s.clone()).to_string()),
            Self::Region {
                open, close, body, ..
            } => {
                out.push_str(open);
                for node in body {
                    node.write_source(out);
                }
                out.push_str(close);
            }
        }
    }
}

/// A parsed template.
///
/// # Examples
///
/// ```
/// use newsletter_rs_template::parser::Template;
///
/// let template = Template::parse("{{#a}}x{{/a}}{{/b}}");
/// assert_eq!(template.unbalanced(), ["{{/b}}"]);
/// assert!(template.validate().is_err());
/// assert_eq!(template.source(), "{{#a}}x{{/a}}{{/b}}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
    unbalanced: Vec<String>,
}

/// An open region waiting for its closer.
struct Frame {
    section: Section,
    open: String,
    children: Vec<Node>,
}

impl Template {
    /// Parses template source into a region tree. Never fails.
    pub fn parse(source: &str) -> Self {
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut unbalanced = Vec::new();

        for token in lexer::tokenize(source) {
            let node = match token {
                Token::Text(s) => Node::Text(s),
                Token::Variable(s) => Node::Variable(s),
                Token::Raw(s) => Node::Raw(s),
                Token::Open(content) => {
                    stack.push(Frame {
                        section: Section::from_open(&content),
                        open: Token::Open(content).to_string(),
                        children: Vec::new(),
                    });
                    continue;
                }
                Token::Close(content) => {
                    let close = Token::Close(content.clone()).to_string();
                    let Some(depth) = stack.iter().rposition(|f| f.section.is_closed_by(&content))
                    else {
                        unbalanced.push(close.clone());
                        push_node(&mut stack, &mut root, Node::Text(close));
                        continue;
                    };

                    // Openers above the match overlap it and cannot be closed.
                    while stack.len() > depth + 1 {
                        if let Some(frame) = stack.pop() {
                            unbalanced.push(frame.open.clone());
                            for node in demote(frame) {
                                push_node(&mut stack, &mut root, node);
                            }
                        }
                    }

                    let Some(frame) = stack.pop() else { continue };
                    Node::Region {
                        section: frame.section,
                        open: frame.open,
                        close,
                        body: frame.children,
                    }
                }
            };
            push_node(&mut stack, &mut root, node);
        }

        while let Some(frame) = stack.pop() {
            unbalanced.push(frame.open.clone());
            for node in demote(frame) {
                push_node(&mut stack, &mut root, node);
            }
        }

        Self {
            nodes: merge_text(root),
            unbalanced,
        }
    }

    /// Returns the top-level nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the source text of every marker that could not be paired.
    pub fn unbalanced(&self) -> &[String] {
        &self.unbalanced
    }

    /// Checks that every region marker is balanced.
    ///
    /// # Errors
    ///
    /// Returns a `TemplateSyntaxError` listing the unpaired markers.
    pub fn validate(&self) -> Result<(), NewsletterError> {
        if self.unbalanced.is_empty() {
            Ok(())
        } else {
            Err(NewsletterError::TemplateSyntaxError(format!(
                "unbalanced region marker(s): {}",
                self.unbalanced.join(", ")
            )))
        }
    }

    /// Writes the template back to source. Parsing is lossless.
    pub fn source(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_source(&mut out);
        }
        out
    }
}

fn push_node(stack: &mut [Frame], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(frame) => frame.children.push(node),
        None => root.push(node),
    }
}

/// Turns an unclosed frame back into its opener text followed by its children.
fn demote(frame: Frame) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(frame.children.len() + 1);
    nodes.push(Node::Text(frame.open));
    nodes.extend(frame.children);
    nodes
}

fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            Node::Region {
                section,
                open,
                close,
                body,
            } => Node::Region {
                section,
                open,
                close,
                body: merge_text(body),
            },
            other => other,
        };
        if let (Node::Text(s), Some(Node::Text(prev))) = (&node, merged.last_mut()) {
            prev.push_str(s);
            continue;
        }
        merged.push(node);
    }
    merged
}
