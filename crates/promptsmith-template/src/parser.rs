//! Directive parser.
//!
//! Turns the token stream from the [`Tokenizer`] into a [`Template`]. Block
//! bodies are located by depth-tracked scanning and then parsed recursively
//! by the same routine, so blocks nest to any depth.
//!
//! # Block pairing
//!
//! - `#if` and `#unless` share one depth counter and are closed by either
//!   `{{/if}}` or `{{/unless}}`.
//! - `#each` has its own depth counter and is closed by `{{/each}}`.
//! - The first `{{else}}` at depth 1 of a conditional splits its branches.
//!   A second one lands in the else branch where, like any `{{else}}` or
//!   close tag that no block claims, it produces no node.
//!
//! # Example
//!
//! ```rust
//! use promptsmith_template::{parse, Node};
//!
//! let nodes = parse("Hi {{name}}!").unwrap();
//! assert_eq!(nodes, vec![Node::text("Hi "), Node::var("name"), Node::text("!")]);
//! ```

use crate::ast::{Condition, Loop, Node, Partial, Template};
use crate::error::{ParseError, Result};
use crate::lexer::{line_at, TagKind, Token, Tokenizer};

/// Parses template source into a node tree.
pub fn parse(source: &str) -> Result<Template> {
    let tokens = Tokenizer::new(source).collect::<Result<Vec<_>>>()?;
    parse_tokens(&tokens, source)
}

fn parse_tokens(tokens: &[Token<'_>], source: &str) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let (kind, offset) = match tokens[i] {
            Token::Text(text) => {
                nodes.push(Node::text(text));
                i += 1;
                continue;
            }
            Token::Tag { kind, offset } => (kind, offset),
        };

        match kind {
            TagKind::If(expr) | TagKind::Unless(expr) => {
                let negated = matches!(kind, TagKind::Unless(_));
                let block = scan_condition(&tokens[i + 1..]).ok_or_else(|| {
                    ParseError::UnclosedBlock {
                        directive: if negated { "unless" } else { "if" },
                        line: line_at(source, offset),
                    }
                })?;
                let body = &tokens[i + 1..i + 1 + block.end];
                let (then_tokens, else_tokens) = match block.split {
                    Some(split) => (&body[..split], Some(&body[split + 1..])),
                    None => (body, None),
                };
                nodes.push(Node::Condition(Condition {
                    expression: expr.to_string(),
                    negated,
                    then_branch: parse_tokens(then_tokens, source)?,
                    else_branch: else_tokens
                        .map(|t| parse_tokens(t, source))
                        .transpose()?,
                }));
                i += block.end + 2;
            }
            TagKind::Each(collection) => {
                let end = scan_loop(&tokens[i + 1..]).ok_or_else(|| ParseError::UnclosedBlock {
                    directive: "each",
                    line: line_at(source, offset),
                })?;
                nodes.push(Node::Loop(Loop {
                    collection: collection.to_string(),
                    body: parse_tokens(&tokens[i + 1..i + 1 + end], source)?,
                }));
                i += end + 2;
            }
            TagKind::Variable(name) => {
                nodes.push(Node::Variable(name.to_string()));
                i += 1;
            }
            TagKind::Raw(name) => {
                nodes.push(Node::RawVariable(name.to_string()));
                i += 1;
            }
            TagKind::Comment(text) => {
                nodes.push(Node::Comment(text.to_string()));
                i += 1;
            }
            TagKind::Partial(directive) => {
                nodes.push(Node::Partial(parse_partial(directive)));
                i += 1;
            }
            // Stray structural markers.
            TagKind::Else | TagKind::Close(_) => i += 1,
        }
    }

    Ok(nodes)
}

/// Location of a conditional's close tag (and optional else) relative to
/// the first token after the opening tag.
struct ConditionBlock {
    end: usize,
    split: Option<usize>,
}

fn scan_condition(tokens: &[Token<'_>]) -> Option<ConditionBlock> {
    let mut depth = 1usize;
    let mut split = None;

    for (idx, token) in tokens.iter().enumerate() {
        let Token::Tag { kind, .. } = token else {
            continue;
        };
        if kind.opens_condition() {
            depth += 1;
        } else if kind.closes_condition() {
            depth -= 1;
            if depth == 0 {
                return Some(ConditionBlock { end: idx, split });
            }
        } else if *kind == TagKind::Else && depth == 1 && split.is_none() {
            split = Some(idx);
        }
    }
    None
}

fn scan_loop(tokens: &[Token<'_>]) -> Option<usize> {
    let mut depth = 1usize;

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Tag {
                kind: TagKind::Each(_),
                ..
            } => depth += 1,
            Token::Tag {
                kind: TagKind::Close("each"),
                ..
            } => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses `name key="value" key2='value'` into a [`Partial`].
///
/// Values may be double-quoted, single-quoted or bare words. Pieces that
/// do not form a `key=value` pair are ignored.
fn parse_partial(directive: &str) -> Partial {
    let directive = directive.trim();
    let (name, mut rest) = match directive.find(char::is_whitespace) {
        Some(idx) => (&directive[..idx], &directive[idx..]),
        None => (directive, ""),
    };

    let mut params = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let Some(eq) = rest.find('=') else {
            break;
        };
        let key = rest[..eq].trim();
        let after = &rest[eq + 1..];

        let (value, remaining) = match after.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &after[1..];
                match body.find(quote) {
                    Some(close) => (&body[..close], &body[close + 1..]),
                    None => (body, ""),
                }
            }
            _ => match after.find(char::is_whitespace) {
                Some(ws) => (&after[..ws], &after[ws..]),
                None => (after, ""),
            },
        };

        // A key containing whitespace means a bare word preceded it.
        let key = key.rsplit(char::is_whitespace).next().unwrap_or(key);
        if !key.is_empty() {
            params.push((key.to_string(), value.to_string()));
        }
        rest = remaining;
    }

    Partial {
        name: name.to_string(),
        params,
    }
}
