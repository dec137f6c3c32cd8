//! Tree builder over the lexed chunk stream
//!
//! A single left-to-right pass turns chunks into nodes, recursing once per
//! open section so that `{{/name}}` can be checked against the innermost
//! open tag.

use crate::error::ParseError;
use crate::parser::ast::{Ast, Key, Node};
use crate::parser::lexer::{lex, Chunk, Span};

/// Parse template source into an AST
///
/// Partial nodes come back unresolved; linking them to their own ASTs is
/// the repository's job.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    let mut chunks = lex(source);
    let (nodes, _) = parse_nodes(&mut chunks, None)?;
    Ok(Ast { nodes })
}

/// The section tag a nested parse is currently inside
struct OpenTag {
    name: String,
    span: Span,
}

/// Consume chunks until the close tag for `open` (or end of input at the
/// top level). Returns the collected nodes and the close tag's span.
fn parse_nodes<I>(
    chunks: &mut I,
    open: Option<&OpenTag>,
) -> Result<(Vec<Node>, Option<Span>), ParseError>
where
    I: Iterator<Item = (Chunk, Span)>,
{
    let mut nodes = Vec::new();

    while let Some((chunk, span)) = chunks.next() {
        match chunk {
            Chunk::Text(text) => push_text(&mut nodes, &text, span),
            Chunk::Variable(body) => nodes.push(variable(body, false, span)?),
            Chunk::Ampersand(body) | Chunk::Triple(body) => {
                nodes.push(variable(body, true, span)?)
            }
            Chunk::SectionOpen(body) => nodes.push(section(chunks, body, false, span)?),
            Chunk::InvertedOpen(body) => nodes.push(section(chunks, body, true, span)?),
            Chunk::Partial(name) => nodes.push(Node::Partial {
                name,
                ast: None,
                span,
            }),
            Chunk::SectionClose(found) => match open {
                Some(tag) if tag.name == found => return Ok((nodes, Some(span))),
                Some(tag) => {
                    return Err(ParseError::MismatchedClose {
                        expected: tag.name.clone(),
                        found,
                        span,
                    })
                }
                None => return Err(ParseError::UnopenedClose { name: found, span }),
            },
            Chunk::Unterminated => return Err(ParseError::UnterminatedTag { span }),
            Chunk::Comment => {}
        }
    }

    match open {
        Some(tag) => Err(ParseError::UnclosedSection {
            name: tag.name.clone(),
            span: tag.span.clone(),
        }),
        None => Ok((nodes, None)),
    }
}

/// Append literal text, merging with a directly preceding text node
fn push_text(nodes: &mut Vec<Node>, text: &str, span: Span) {
    if let Some(Node::Text {
        text: prev,
        span: prev_span,
    }) = nodes.last_mut()
    {
        if prev_span.end == span.start {
            prev.push_str(text);
            prev_span.end = span.end;
            return;
        }
    }
    nodes.push(Node::Text {
        text: text.to_string(),
        span,
    });
}

fn variable(body: String, raw: bool, span: Span) -> Result<Node, ParseError> {
    match Key::parse(&body) {
        Some(key) => Ok(Node::Variable { key, raw, span }),
        None => Err(ParseError::InvalidKey { key: body, span }),
    }
}

fn section<I>(
    chunks: &mut I,
    body: String,
    inverted: bool,
    open_span: Span,
) -> Result<Node, ParseError>
where
    I: Iterator<Item = (Chunk, Span)>,
{
    let key = match Key::parse(&body) {
        Some(key) => key,
        None => {
            return Err(ParseError::InvalidKey {
                key: body,
                span: open_span,
            })
        }
    };
    let open = OpenTag {
        name: body,
        span: open_span.clone(),
    };
    let (children, close) = parse_nodes(chunks, Some(&open))?;
    let end = close.map_or(open_span.end, |c| c.end);
    Ok(Node::Section {
        key,
        inverted,
        children,
        span: open_span.start..end,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_plain_text() {
        let ast = parse("Hello World!").expect("Should parse");
        assert_eq!(
            ast.nodes,
            vec![Node::Text {
                text: "Hello World!".to_string(),
                span: 0..12,
            }]
        );
    }

    #[test]
    fn test_parse_variable() {
        let ast = parse("Hello {{name}}!").expect("Should parse");
        assert_eq!(ast.nodes.len(), 3);
        match &ast.nodes[1] {
            Node::Variable { key, raw, span } => {
                assert_eq!(key.to_string(), "name");
                assert!(!raw);
                assert_eq!(*span, 6..14);
            }
            _ => panic!("Expected variable"),
        }
    }

    #[test]
    fn test_parse_raw_variables() {
        let ast = parse("{{&a}}{{{b}}}").expect("Should parse");
        assert_eq!(ast.nodes.len(), 2);
        for node in &ast.nodes {
            match node {
                Node::Variable { raw, .. } => assert!(raw),
                _ => panic!("Expected variable"),
            }
        }
    }

    #[test]
    fn test_parse_section() {
        let ast = parse("{{#items}}x{{/items}}").expect("Should parse");
        assert_eq!(ast.nodes.len(), 1);
        match &ast.nodes[0] {
            Node::Section {
                key,
                inverted,
                children,
                span,
            } => {
                assert_eq!(key.to_string(), "items");
                assert!(!inverted);
                assert_eq!(children.len(), 1);
                assert_eq!(*span, 0..21);
            }
            _ => panic!("Expected section"),
        }
    }

    #[test]
    fn test_parse_nested_sections() {
        let ast = parse("{{#a}}{{#b}}x{{/b}}{{/a}}").expect("Should parse");
        match &ast.nodes[0] {
            Node::Section { key, children, .. } => {
                assert_eq!(key.to_string(), "a");
                match &children[0] {
                    Node::Section { key, .. } => assert_eq!(key.to_string(), "b"),
                    _ => panic!("Expected inner section"),
                }
            }
            _ => panic!("Expected section"),
        }
    }

    #[test]
    fn test_parse_inverted_section() {
        let ast = parse("{{^items}}none{{/items}}").expect("Should parse");
        match &ast.nodes[0] {
            Node::Section { inverted, .. } => assert!(inverted),
            _ => panic!("Expected section"),
        }
    }

    #[test]
    fn test_parse_partial_placeholder() {
        let ast = parse("{{>header}}").expect("Should parse");
        match &ast.nodes[0] {
            Node::Partial { name, ast, .. } => {
                assert_eq!(name, "header");
                assert!(ast.is_none());
            }
            _ => panic!("Expected partial"),
        }
    }

    #[test]
    fn test_comments_leave_no_node() {
        let ast = parse("a{{! note }}b").expect("Should parse");
        assert_eq!(ast.nodes.len(), 2);
    }

    #[test]
    fn test_dotted_key_in_section() {
        let ast = parse("{{#user.tags}}{{.}}{{/user.tags}}").expect("Should parse");
        match &ast.nodes[0] {
            Node::Section { key, children, .. } => {
                assert_eq!(key.segments, vec!["user".to_string(), "tags".to_string()]);
                match &children[0] {
                    Node::Variable { key, .. } => assert!(key.is_implicit()),
                    _ => panic!("Expected variable"),
                }
            }
            _ => panic!("Expected section"),
        }
    }

    #[test]
    fn test_unclosed_section_error() {
        let err = parse("{{#Section}}text").expect_err("Should fail");
        match err {
            ParseError::UnclosedSection { name, span } => {
                assert_eq!(name, "Section");
                assert_eq!(span, 0..12);
            }
            other => panic!("Expected UnclosedSection, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_close_error() {
        let err = parse("{{#a}}{{/b}}").expect_err("Should fail");
        match err {
            ParseError::MismatchedClose {
                expected, found, ..
            } => {
                assert_eq!(expected, "a");
                assert_eq!(found, "b");
            }
            other => panic!("Expected MismatchedClose, got {other:?}"),
        }
    }

    #[test]
    fn test_unopened_close_error() {
        let err = parse("text{{/a}}").expect_err("Should fail");
        assert!(matches!(err, ParseError::UnopenedClose { .. }));
    }

    #[test]
    fn test_unterminated_tag_error() {
        let err = parse("Hello {{name").expect_err("Should fail");
        match err {
            ParseError::UnterminatedTag { span } => assert_eq!(span, 6..12),
            other => panic!("Expected UnterminatedTag, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_key_error() {
        let err = parse("{{a b}}").expect_err("Should fail");
        match err {
            ParseError::InvalidKey { key, .. } => assert_eq!(key, "a b"),
            other => panic!("Expected InvalidKey, got {other:?}"),
        }
    }

    #[test]
    fn test_set_delimiter_tag_rejected() {
        let err = parse("{{=<% %>=}}").expect_err("Should fail");
        assert!(matches!(err, ParseError::InvalidKey { .. }));
    }

    #[test]
    fn test_lone_braces_merge_into_text() {
        let ast = parse("a { b } c").expect("Should parse");
        assert_eq!(
            ast.nodes,
            vec![Node::Text {
                text: "a { b } c".to_string(),
                span: 0..9,
            }]
        );
    }
}
