//! # Pretty Printer
//!
//! Best-effort re-indentation of generated page source. Every line is
//! indented by the bracket and tag depth reached before it:
//!
//! ```text
//! (  {  [        open one level
//! )  }  ]        close one level
//! <Tag ...>      open one level (line starts a tag, doesn't self-close)
//! <Tag           open one level (attributes follow on their own lines)
//! </Tag>         close one level
//! >   />         end a multi-line opening tag
//! ```
//!
//! Lines inside a multi-line template literal are copied verbatim since
//! their whitespace is part of the string.

use thiserror::Error;

const INDENT: &str = "  ";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Unbalanced brackets at line {line}")]
    Unbalanced { line: usize },

    #[error("Unterminated string literal at line {line}")]
    UnterminatedString { line: usize },
}

/// Re-indent `source`. Fails without partial output when the brackets
/// don't balance.
pub fn format_source(source: &str) -> Result<String, FormatError> {
    let mut out = String::with_capacity(source.len());
    let mut levels = Levels::default();
    let mut in_template = false;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;

        if in_template {
            // The closing backtick may be followed by more code
            let scan = scan_line(raw, true, line_no)?;
            in_template = scan.in_template;
            levels.close(-scan.lowest, line_no)?;
            levels.open(scan.delta - scan.lowest);
            out.push_str(raw);
            out.push('\n');
            continue;
        }

        let line = raw.trim();
        if line.is_empty() {
            out.push('\n');
            continue;
        }

        let scan = scan_line(line, false, line_no)?;
        let (closes, opens) = tag_events(line, &scan);
        in_template = scan.in_template;

        levels.close(closes, line_no)?;
        out.push_str(&INDENT.repeat(levels.depth()));
        out.push_str(line);
        out.push('\n');
        levels.open(opens);
    }

    if levels.depth() != 0 {
        return Err(FormatError::Unbalanced {
            line: source.lines().count(),
        });
    }
    Ok(out)
}

/// Open brackets grouped by the line that opened them. A line opening
/// several brackets only indents what follows by one level.
#[derive(Default)]
struct Levels {
    open: Vec<i64>,
}

impl Levels {
    fn depth(&self) -> usize {
        self.open.len()
    }

    fn open(&mut self, count: i64) {
        if count > 0 {
            self.open.push(count);
        }
    }

    fn close(&mut self, mut count: i64, line: usize) -> Result<(), FormatError> {
        while count > 0 {
            let top = self
                .open
                .last_mut()
                .ok_or(FormatError::Unbalanced { line })?;
            if *top > count {
                *top -= count;
                return Ok(());
            }
            count -= *top;
            self.open.pop();
        }
        Ok(())
    }
}

/// Bracket movement of one line
struct LineScan {
    /// Lowest running depth reached, relative to the line start (never > 0)
    lowest: i64,
    /// Net change over the line
    delta: i64,
    /// Whether the line ends inside a template literal
    in_template: bool,
}

fn scan_line(line: &str, starts_in_template: bool, line_no: usize) -> Result<LineScan, FormatError> {
    let mut running = 0i64;
    let mut lowest = 0i64;
    let mut in_template = starts_in_template;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }

        if in_template {
            match c {
                '\\' => {
                    chars.next();
                }
                '`' => in_template = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '`' => in_template = true,
            '/' if chars.peek() == Some(&'/') => break,
            '(' | '{' | '[' => running += 1,
            ')' | '}' | ']' => {
                running -= 1;
                lowest = lowest.min(running);
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(FormatError::UnterminatedString { line: line_no });
    }

    Ok(LineScan {
        lowest,
        delta: running,
        in_template,
    })
}

/// Combine bracket movement with markup tags into the number of levels
/// closed before the line and opened after it
fn tag_events(line: &str, scan: &LineScan) -> (i64, i64) {
    let closes = -scan.lowest;
    let opens = scan.delta - scan.lowest;

    match line {
        ">" => return (1, 1),
        "/>" => return (1, 0),
        _ => {}
    }

    if line.starts_with("</") {
        return (closes + 1, opens);
    }

    let opens_tag = line.starts_with('<')
        && !line.ends_with("/>")
        && (line.ends_with('>') || !line.contains('>'));
    if opens_tag {
        return (closes, opens + 1);
    }

    (closes, opens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindents_statements_and_markup() {
        let source = "export default function Home() {\nconst x = 1;\nreturn (\n<Stack>\n<Text content={x} />\n</Stack>\n);\n}\n";
        assert_eq!(
            format_source(source).unwrap(),
            "export default function Home() {\n  const x = 1;\n  return (\n    <Stack>\n      <Text content={x} />\n    </Stack>\n  );\n}\n"
        );
    }

    #[test]
    fn test_well_formed_output_is_unchanged() {
        let source = "function A() {\n  return (\n    <Card\n      header={\n        <Text />\n      }\n    >\n      <Text />\n    </Card>\n  );\n}\n";
        assert_eq!(format_source(source).unwrap(), source);
    }

    #[test]
    fn test_self_closing_multi_line_tag() {
        let source = "<Card\na={1}\n/>\n";
        assert_eq!(format_source(source).unwrap(), "<Card\n  a={1}\n/>\n");
    }

    #[test]
    fn test_closing_brackets_mid_line() {
        let source = "const a = f(() => {\nreturn 1;\n}, [b]);\n";
        assert_eq!(
            format_source(source).unwrap(),
            "const a = f(() => {\n  return 1;\n}, [b]);\n"
        );
    }

    #[test]
    fn test_brackets_in_strings_are_ignored() {
        let source = "const a = \"(\";\nconst b = '}';\n";
        assert_eq!(format_source(source).unwrap(), source);
    }

    #[test]
    fn test_template_literal_lines_are_verbatim() {
        let source = "const a = `line {\n   keep  \n`;\nconst b = 1;\n";
        assert_eq!(format_source(source).unwrap(), source);
    }

    #[test]
    fn test_unbalanced_input_fails() {
        assert_eq!(
            format_source("function a() {\n"),
            Err(FormatError::Unbalanced { line: 1 })
        );
        assert_eq!(
            format_source("}\n"),
            Err(FormatError::Unbalanced { line: 1 })
        );
    }

    #[test]
    fn test_unterminated_string_fails() {
        assert_eq!(
            format_source("const a = \"oops;\n"),
            Err(FormatError::UnterminatedString { line: 1 })
        );
    }
}
