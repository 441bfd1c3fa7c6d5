//! Starlark rendering
//!
//! Turns a [`StarlarkNode`] tree into BUILD file text. Rendering is pure and
//! deterministic: the same tree always yields the same bytes.

use crate::starlark::{Arg, StarlarkNode};

/// Renders Starlark syntax trees into text
#[derive(Debug, Clone)]
pub struct StarlarkCompiler {
    /// Spaces per indentation level
    indent_width: usize,
}

impl Default for StarlarkCompiler {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

impl StarlarkCompiler {
    /// Create a compiler with the default four-space indentation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Render a whole file; the output ends with a newline
    pub fn run(&self, node: &StarlarkNode) -> String {
        let mut output = self.compile(node, 0);
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output
    }

    /// Render a node at the given nesting level
    pub fn compile(&self, node: &StarlarkNode, level: usize) -> String {
        match node {
            StarlarkNode::Empty => "None".to_string(),
            StarlarkNode::Str(value) => quote(value),
            StarlarkNode::Int(value) => value.to_string(),
            StarlarkNode::Bool(true) => "True".to_string(),
            StarlarkNode::Bool(false) => "False".to_string(),
            StarlarkNode::Raw(value) => value.clone(),
            StarlarkNode::List(values) => {
                if values.is_empty() {
                    return "[]".to_string();
                }
                let items: Vec<String> = values
                    .iter()
                    .map(|value| self.compile(value, level + 1))
                    .collect();
                self.block("[", &items, "]", level)
            }
            StarlarkNode::Dict(entries) => {
                if entries.is_empty() {
                    return "{}".to_string();
                }
                let items: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", quote(key), self.compile(value, level + 1)))
                    .collect();
                self.block("{", &items, "}", level)
            }
            StarlarkNode::Call { name, args } => {
                let items: Vec<String> = args
                    .iter()
                    .filter_map(|arg| match arg {
                        Arg::Positional(value) => Some(self.compile(value, level + 1)),
                        Arg::Named(_, StarlarkNode::Empty) => None,
                        Arg::Named(_, StarlarkNode::List(values)) if values.is_empty() => None,
                        Arg::Named(_, StarlarkNode::Dict(entries)) if entries.is_empty() => None,
                        Arg::Named(key, value) => {
                            Some(format!("{} = {}", key, self.compile(value, level + 1)))
                        }
                    })
                    .collect();
                if items.is_empty() {
                    return format!("{}()", name);
                }
                self.block(&format!("{}(", name), &items, ")", level)
            }
            StarlarkNode::Expr { lhs, op, rhs } => format!(
                "{} {} {}",
                self.compile(lhs, level),
                op,
                self.compile(rhs, level)
            ),
            StarlarkNode::Lines(lines) => lines
                .iter()
                .filter(|line| !matches!(line, StarlarkNode::Empty))
                .map(|line| self.compile(line, level))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// One item per line, trailing commas, closing delimiter at `level`
    fn block(&self, open: &str, items: &[String], close: &str, level: usize) -> String {
        let inner = self.indent(level + 1);
        let mut output = String::from(open);
        output.push('\n');
        for item in items {
            output.push_str(&inner);
            output.push_str(item);
            output.push_str(",\n");
        }
        output.push_str(&self.indent(level));
        output.push_str(close);
        output
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.indent_width)
    }
}

/// Double-quoted Starlark string literal
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
