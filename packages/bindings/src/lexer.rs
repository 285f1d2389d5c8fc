//! Lexer for the inside of `{{...}}` interpolations using logos

use logos::Logos;

/// Tokens of a reference path such as `users.data[0]["first name"]`
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum PathToken<'src> {
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Number(u64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'([^'\\]|\\.)*'", |lex| unquote(lex.slice()))]
    String(String),

    #[token(".")]
    Dot,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,
}

impl PathToken<'_> {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            PathToken::Ident(name) => format!("identifier `{}`", name),
            PathToken::Number(n) => format!("number {}", n),
            PathToken::String(s) => format!("string {:?}", s),
            PathToken::Dot => "`.`".to_string(),
            PathToken::LBracket => "`[`".to_string(),
            PathToken::RBracket => "`]`".to_string(),
        }
    }
}

/// Strip the quotes and resolve backslash escapes
fn unquote(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<PathToken<'_>> {
        PathToken::lexer(src).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(
            tokens("users.data[0]['first name']"),
            vec![
                PathToken::Ident("users"),
                PathToken::Dot,
                PathToken::Ident("data"),
                PathToken::LBracket,
                PathToken::Number(0),
                PathToken::RBracket,
                PathToken::LBracket,
                PathToken::String("first name".to_string()),
                PathToken::RBracket,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(
            tokens("  a . b "),
            vec![PathToken::Ident("a"), PathToken::Dot, PathToken::Ident("b")]
        );
    }

    #[test]
    fn test_escapes_in_strings() {
        assert_eq!(
            tokens(r#"["say \"hi\""]"#)[1],
            PathToken::String("say \"hi\"".to_string())
        );
    }

    #[test]
    fn test_invalid_character() {
        let mut lexer = PathToken::lexer("a + b");
        assert_eq!(lexer.next(), Some(Ok(PathToken::Ident("a"))));
        assert_eq!(lexer.next(), Some(Err(())));
    }
}
