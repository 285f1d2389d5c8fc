//! # Bound Expression Templates
//!
//! Splits the text of a bound expression into literal text and
//! `{{name.path}}` interpolations, and parses each interpolation into a
//! [`Reference`].
//!
//! ```text
//! "Hello {{user.name}}!"
//!   ├── Text("Hello ")
//!   ├── Interpolation(user .name)
//!   └── Text("!")
//! ```
//!
//! A malformed interpolation doesn't fail the whole template. It becomes a
//! [`TemplatePart::Invalid`] so the caller can warn and substitute a
//! placeholder.

use crate::error::TemplateParseError;
use crate::lexer::PathToken;
use logos::Logos;
use std::fmt;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// One step after the root name of a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `.name`
    Field(String),
    /// `[0]`
    Index(u64),
    /// `["key"]`
    Key(String),
}

impl PathSegment {
    /// Name of a `.field` segment
    pub fn as_field(&self) -> Option<&str> {
        match self {
            PathSegment::Field(name) => Some(name),
            _ => None,
        }
    }
}

/// `root.seg[0]["key"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub root: String,
    pub segments: Vec<PathSegment>,
}

impl Reference {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Field(name.into()));
        self
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        f.write_str(&render_segments(&self.segments))
    }
}

/// Render path segments as property accesses
pub fn render_segments(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Field(name) => {
                out.push('.');
                out.push_str(name);
            }
            PathSegment::Index(index) => out.push_str(&format!("[{}]", index)),
            PathSegment::Key(key) => {
                let quoted = serde_json::to_string(key).unwrap_or_else(|_| format!("{:?}", key));
                out.push_str(&format!("[{}]", quoted));
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Interpolation(Reference),
    Invalid {
        /// Raw interpolation text, delimiters included
        source: String,
        error: TemplateParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub parts: Vec<TemplatePart>,
}

impl Template {
    /// True when the text is exactly one interpolation and nothing else
    pub fn is_single_interpolation(&self) -> bool {
        matches!(
            self.parts.as_slice(),
            [TemplatePart::Interpolation(_)] | [TemplatePart::Invalid { .. }]
        )
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Interpolation(reference) => Some(reference),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &TemplateParseError> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Invalid { error, .. } => Some(error),
            _ => None,
        })
    }
}

/// Parse bound expression text. Never fails as a whole.
pub fn parse_template(text: &str) -> Template {
    let mut parts = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            parts.push(TemplatePart::Text(rest[..start].to_string()));
        }

        let inner_start = start + OPEN.len();
        let Some(inner_len) = rest[inner_start..].find(CLOSE) else {
            parts.push(TemplatePart::Invalid {
                source: rest[start..].to_string(),
                error: TemplateParseError::Unclosed {
                    pos: offset + start,
                },
            });
            return Template { parts };
        };

        let inner = &rest[inner_start..inner_start + inner_len];
        let end = inner_start + inner_len + CLOSE.len();

        parts.push(match parse_reference_at(inner, offset + inner_start) {
            Ok(reference) => TemplatePart::Interpolation(reference),
            Err(error) => TemplatePart::Invalid {
                source: rest[start..end].to_string(),
                error,
            },
        });

        rest = &rest[end..];
        offset += end;
    }

    if !rest.is_empty() {
        parts.push(TemplatePart::Text(rest.to_string()));
    }

    Template { parts }
}

/// Parse a bare reference path such as `users.data[0]`
pub fn parse_reference(src: &str) -> Result<Reference, TemplateParseError> {
    parse_reference_at(src, 0)
}

fn parse_reference_at(src: &str, base: usize) -> Result<Reference, TemplateParseError> {
    let mut tokens = Vec::new();
    for (token, span) in PathToken::lexer(src).spanned() {
        match token {
            Ok(token) => tokens.push((token, base + span.start)),
            Err(()) => return Err(TemplateParseError::InvalidToken { pos: base + span.start }),
        }
    }

    let end = base + src.len();
    let mut tokens = tokens.into_iter().peekable();

    let root = match tokens.next() {
        Some((PathToken::Ident(name), _)) => name.to_string(),
        Some((token, pos)) => {
            return Err(TemplateParseError::unexpected_token(pos, "a name", token.describe()))
        }
        None => return Err(TemplateParseError::Empty { pos: base }),
    };

    let mut reference = Reference::new(root);

    while let Some((token, pos)) = tokens.next() {
        let segment = match token {
            PathToken::Dot => match tokens.next() {
                Some((PathToken::Ident(name), _)) => PathSegment::Field(name.to_string()),
                Some((token, pos)) => {
                    return Err(TemplateParseError::unexpected_token(
                        pos,
                        "a field name",
                        token.describe(),
                    ))
                }
                None => return Err(TemplateParseError::unexpected_end(end, "a field name")),
            },
            PathToken::LBracket => {
                let segment = match tokens.next() {
                    Some((PathToken::Number(index), _)) => PathSegment::Index(index),
                    Some((PathToken::String(key), _)) => PathSegment::Key(key),
                    Some((token, pos)) => {
                        return Err(TemplateParseError::unexpected_token(
                            pos,
                            "an index or a quoted key",
                            token.describe(),
                        ))
                    }
                    None => {
                        return Err(TemplateParseError::unexpected_end(
                            end,
                            "an index or a quoted key",
                        ))
                    }
                };
                match tokens.next() {
                    Some((PathToken::RBracket, _)) => segment,
                    Some((token, pos)) => {
                        return Err(TemplateParseError::unexpected_token(pos, "`]`", token.describe()))
                    }
                    None => return Err(TemplateParseError::unexpected_end(end, "`]`")),
                }
            }
            token => {
                return Err(TemplateParseError::unexpected_token(
                    pos,
                    "`.` or `[`",
                    token.describe(),
                ))
            }
        };
        reference.segments.push(segment);
    }

    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_interpolations() {
        let template = parse_template("Hello {{user.name}}, you have {{ inbox.count }} messages");
        assert_eq!(
            template.parts,
            vec![
                TemplatePart::Text("Hello ".into()),
                TemplatePart::Interpolation(Reference::new("user").field("name")),
                TemplatePart::Text(", you have ".into()),
                TemplatePart::Interpolation(Reference::new("inbox").field("count")),
                TemplatePart::Text(" messages".into()),
            ]
        );
        assert!(!template.is_single_interpolation());
    }

    #[test]
    fn test_single_interpolation() {
        let template = parse_template("{{total}}");
        assert!(template.is_single_interpolation());
        assert_eq!(template.references().count(), 1);

        // Surrounding whitespace counts as text
        assert!(!parse_template(" {{total}}").is_single_interpolation());
    }

    #[test]
    fn test_nested_path() {
        let reference = parse_reference(r#"users.data[0]["first name"]"#).unwrap();
        assert_eq!(reference.root, "users");
        assert_eq!(
            reference.segments,
            vec![
                PathSegment::Field("data".into()),
                PathSegment::Index(0),
                PathSegment::Key("first name".into()),
            ]
        );
        assert_eq!(reference.to_string(), r#"users.data[0]["first name"]"#);
    }

    #[test]
    fn test_no_interpolations() {
        let template = parse_template("plain text");
        assert_eq!(template.parts, vec![TemplatePart::Text("plain text".into())]);
        assert!(parse_template("").parts.is_empty());
    }

    #[test]
    fn test_malformed_interpolations_are_kept_as_invalid_parts() {
        let template = parse_template("a {{}} b {{x.}} c {{1abc}} d {{x[y]}}");
        let errors: Vec<_> = template.errors().collect();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], &TemplateParseError::Empty { pos: 4 });
        assert!(matches!(errors[1], TemplateParseError::UnexpectedEnd { .. }));
        assert!(matches!(errors[2], TemplateParseError::UnexpectedToken { .. }));
        assert!(matches!(errors[3], TemplateParseError::UnexpectedToken { .. }));

        // Text around the bad parts survives
        assert_eq!(template.parts[0], TemplatePart::Text("a ".into()));
        assert_eq!(template.parts.last(), Some(&TemplatePart::Invalid {
            source: "{{x[y]}}".into(),
            error: errors[3].clone(),
        }));
    }

    #[test]
    fn test_unclosed_interpolation() {
        let template = parse_template("Hi {{name");
        assert_eq!(
            template.parts,
            vec![
                TemplatePart::Text("Hi ".into()),
                TemplatePart::Invalid {
                    source: "{{name".into(),
                    error: TemplateParseError::Unclosed { pos: 3 },
                },
            ]
        );
    }

    #[test]
    fn test_operators_are_rejected_inside_interpolations() {
        let template = parse_template("{{a + b}}");
        assert!(matches!(
            template.errors().next(),
            Some(TemplateParseError::InvalidToken { pos: 4 })
        ));
    }
}
