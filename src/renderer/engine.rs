//! AST walker that produces rendered text

use tracing::trace;

use crate::parser::{Ast, Key, Node};
use crate::renderer::value::Value;

/// Render an AST against a context value
///
/// Rendering is total: missing keys interpolate as nothing and sections
/// fall back to their truthiness rules, so any linked AST renders.
pub fn render(ast: &Ast, context: &Value) -> String {
    render_with_base(ast, &Value::Null, context)
}

/// Render with fallback bindings consulted below the caller's context
pub(crate) fn render_with_base(ast: &Ast, base: &Value, context: &Value) -> String {
    let mut stack = ContextStack::new(base, context);
    let mut out = String::new();
    render_nodes(&ast.nodes, &mut stack, &mut out);
    out
}

/// Innermost-wins stack of values keys are looked up against
struct ContextStack<'v> {
    frames: Vec<&'v Value>,
}

impl<'v> ContextStack<'v> {
    fn new(base: &'v Value, context: &'v Value) -> Self {
        let mut frames = Vec::new();
        if !matches!(base, Value::Null) {
            frames.push(base);
        }
        frames.push(context);
        Self { frames }
    }

    fn push(&mut self, value: &'v Value) {
        self.frames.push(value);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    /// The innermost frame defining a key's first segment wins; the
    /// remaining segments resolve within that value only, never in outer
    /// frames.
    fn lookup(&self, key: &Key) -> Option<&'v Value> {
        if key.is_implicit() {
            return self.frames.last().copied();
        }
        let (first, rest) = key.segments.split_first()?;
        for frame in self.frames.iter().rev() {
            if let Some(found) = frame.get(first) {
                let mut value = found;
                for segment in rest {
                    value = value.get(segment)?;
                }
                return Some(value);
            }
        }
        None
    }
}

fn render_nodes<'v>(nodes: &'v [Node], stack: &mut ContextStack<'v>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { text, .. } => out.push_str(text),
            Node::Variable { key, raw, .. } => {
                if let Some(value) = stack.lookup(key) {
                    let text = value.to_string();
                    if *raw {
                        out.push_str(&text);
                    } else {
                        escape_into(out, &text);
                    }
                }
            }
            Node::Section {
                key,
                inverted,
                children,
                ..
            } => {
                let value = stack.lookup(key);
                if *inverted {
                    if value.map_or(true, |v| !v.is_truthy()) {
                        render_nodes(children, stack, out);
                    }
                } else {
                    match value {
                        None => {}
                        Some(v) if !v.is_truthy() => {}
                        Some(Value::List(items)) => {
                            for item in items {
                                stack.push(item);
                                render_nodes(children, stack, out);
                                stack.pop();
                            }
                        }
                        Some(v) => {
                            stack.push(v);
                            render_nodes(children, stack, out);
                            stack.pop();
                        }
                    }
                }
            }
            Node::Partial { name, ast, .. } => match ast {
                Some(partial) => render_nodes(&partial.nodes, stack, out),
                // Only reachable for ASTs built outside a repository
                None => trace!(partial = %name, "skipping unresolved partial"),
            },
        }
    }
}

/// HTML escaping applied to `{{key}}` interpolations
fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}
