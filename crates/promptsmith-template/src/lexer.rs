//! Tag scanner.
//!
//! Splits template source into literal text runs and `{{ ... }}` tags. The
//! scanner knows how to find tag boundaries and how to classify a tag's
//! content, but nothing about block structure; pairing `#if` with `/if` is
//! the parser's job.
//!
//! A tag ends at the first `}}` after its opening. A tag opened with `{{{`
//! ends at the first `}}}` and always classifies as a raw variable.

use crate::error::{ParseError, Result};

/// A classified tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind<'a> {
    /// `{{#if expr}}`
    If(&'a str),
    /// `{{#unless expr}}`
    Unless(&'a str),
    /// `{{#each name}}`
    Each(&'a str),
    /// `{{else}}`
    Else,
    /// `{{/name}}`
    Close(&'a str),
    /// `{{! text}}`
    Comment(&'a str),
    /// `{{{name}}}`
    Raw(&'a str),
    /// `{{> name key="value"}}`, holding everything after `>`.
    Partial(&'a str),
    /// `{{name}}`
    Variable(&'a str),
}

impl TagKind<'_> {
    /// Returns `true` for tags that open a conditional block.
    pub fn opens_condition(&self) -> bool {
        matches!(self, TagKind::If(_) | TagKind::Unless(_))
    }

    /// Returns `true` for tags that close a conditional block.
    pub fn closes_condition(&self) -> bool {
        matches!(self, TagKind::Close("if") | TagKind::Close("unless"))
    }
}

/// A token produced by the [`Tokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text between tags.
    Text(&'a str),
    /// A tag, with the byte offset of its opening `{{`.
    Tag { kind: TagKind<'a>, offset: usize },
}

/// Iterator over the tokens of a template source.
///
/// Yields an error for an unterminated tag and stops afterwards.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    /// Returns the full source being tokenized.
    pub fn source(&self) -> &'a str {
        self.input
    }

    fn scan_tag(&mut self, start: usize) -> Result<Token<'a>> {
        let rest = &self.input[start..];
        let (open, close) = if rest.starts_with("{{{") {
            ("{{{", "}}}")
        } else {
            ("{{", "}}")
        };

        let content_start = start + open.len();
        let Some(len) = self.input[content_start..].find(close) else {
            return Err(ParseError::UnclosedTag {
                line: line_at(self.input, start),
                expected: close,
            });
        };
        let content = &self.input[content_start..content_start + len];
        self.pos = content_start + len + close.len();

        let kind = if open == "{{{" {
            TagKind::Raw(content.trim())
        } else {
            classify(content, line_at(self.input, start))?
        };
        Ok(Token::Tag {
            kind,
            offset: start,
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }

        let rest = &self.input[self.pos..];
        match rest.find("{{") {
            Some(0) => {
                let result = self.scan_tag(self.pos);
                if result.is_err() {
                    self.failed = true;
                }
                Some(result)
            }
            Some(idx) => {
                let text = &rest[..idx];
                self.pos += idx;
                Some(Ok(Token::Text(text)))
            }
            None => {
                self.pos = self.input.len();
                Some(Ok(Token::Text(rest)))
            }
        }
    }
}

/// Classifies the content of a `{{ ... }}` tag.
fn classify(content: &str, line: usize) -> Result<TagKind<'_>> {
    let content = content.trim();

    if let Some(block) = content.strip_prefix('#') {
        let (keyword, arg) = split_keyword(block);
        let directive = match keyword {
            "if" => "if",
            "unless" => "unless",
            "each" => "each",
            _ => return Ok(TagKind::Variable(content)),
        };
        if arg.is_empty() {
            return Err(ParseError::MissingArgument { directive, line });
        }
        return Ok(match directive {
            "if" => TagKind::If(arg),
            "unless" => TagKind::Unless(arg),
            _ => TagKind::Each(arg),
        });
    }

    if let Some(text) = content.strip_prefix('!') {
        return Ok(TagKind::Comment(text.trim()));
    }
    if let Some(name) = content.strip_prefix('/') {
        return Ok(TagKind::Close(split_keyword(name).0));
    }
    if content == "else" {
        return Ok(TagKind::Else);
    }
    if let Some(rest) = content.strip_prefix('>') {
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(ParseError::MissingArgument {
                directive: "partial",
                line,
            });
        }
        return Ok(TagKind::Partial(rest));
    }
    if let Some(inner) = content
        .strip_prefix('{')
        .and_then(|c| c.strip_suffix('}'))
    {
        return Ok(TagKind::Raw(inner.trim()));
    }

    Ok(TagKind::Variable(content))
}

/// Splits `keyword rest` at the first whitespace, trimming the rest.
fn split_keyword(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim()),
        None => (s, ""),
    }
}

/// Returns the 1-based line containing byte `offset`.
pub fn line_at(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
