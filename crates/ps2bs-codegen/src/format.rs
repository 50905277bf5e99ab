//! Canonical formatting of generated Go source.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};
use crate::resolver::split_package_clause;

/// Turns raw generated text into the canonical form written to disk.
pub trait SourceFormatter {
    /// Format `source`, failing if it is not syntactically plausible Go.
    fn format(&self, source: &str) -> Result<String>;
}

/// Built-in formatter.
///
/// Validates the package clause and bracket balance, then normalizes
/// whitespace only: trailing blanks are stripped, blank-line runs collapse
/// to one, and the file ends with a single newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalFormatter;

impl SourceFormatter for CanonicalFormatter {
    fn format(&self, source: &str) -> Result<String> {
        let (_, rest) = split_package_clause(source).map_err(Error::Format)?;
        check_clause_end(rest)?;
        check_balanced(source)?;

        let mut out = String::with_capacity(source.len());
        let mut pending_blank = false;
        for line in source.lines().map(str::trim_end) {
            if line.is_empty() {
                pending_blank = !out.is_empty();
                continue;
            }
            if pending_blank {
                out.push('\n');
                pending_blank = false;
            }
            out.push_str(line);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Formats through an external `gofmt` binary.
#[derive(Debug, Clone)]
pub struct GofmtFormatter {
    program: String,
}

impl GofmtFormatter {
    /// Use `gofmt` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("gofmt")
    }

    /// Use a specific gofmt executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GofmtFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFormatter for GofmtFormatter {
    fn format(&self, source: &str) -> Result<String> {
        debug!(program = %self.program, "Running external formatter");
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::Format(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        String::from_utf8(output.stdout).map_err(|e| Error::Format(e.to_string()))
    }
}

/// Only comments or a semicolon may follow the package name on its line.
fn check_clause_end(mut rest: &str) -> Result<()> {
    loop {
        rest = rest.trim_start_matches(&[' ', '\t', '\r', ';'][..]);
        if rest.is_empty() || rest.starts_with('\n') || rest.starts_with("//") {
            return Ok(());
        }
        if let Some(after) = rest.strip_prefix("/*") {
            let end = after
                .find("*/")
                .ok_or_else(|| Error::Format("unterminated block comment".to_string()))?;
            rest = &after[end + 2..];
            continue;
        }
        let token: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
        return Err(Error::Format(format!(
            "unexpected '{token}' after package name"
        )));
    }
}

/// Check that `()`, `[]` and `{}` nest correctly outside comments and literals.
fn check_balanced(source: &str) -> Result<()> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                    }
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    prev = c;
                }
                if !closed {
                    return Err(Error::Format(format!(
                        "line {line}: unterminated block comment"
                    )));
                }
            }
            '"' | '\'' => {
                let mut escaped = false;
                let mut closed = false;
                for d in chars.by_ref() {
                    if d == '\n' {
                        break;
                    }
                    if escaped {
                        escaped = false;
                    } else if d == '\\' {
                        escaped = true;
                    } else if d == c {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(Error::Format(format!("line {line}: unterminated literal")));
                }
            }
            '`' => {
                let mut closed = false;
                for d in chars.by_ref() {
                    if d == '\n' {
                        line += 1;
                    }
                    if d == '`' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(Error::Format(format!(
                        "line {line}: unterminated raw string"
                    )));
                }
            }
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, opened_at)) => {
                        return Err(Error::Format(format!(
                            "line {line}: '{c}' does not match '{open}' opened on line {opened_at}"
                        )));
                    }
                    None => {
                        return Err(Error::Format(format!("line {line}: unexpected '{c}'")));
                    }
                }
            }
            _ => {}
        }
    }

    match stack.pop() {
        Some((open, opened_at)) => Err(Error::Format(format!(
            "'{open}' opened on line {opened_at} is never closed"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_whitespace() {
        let raw = "\n\n// header   \npackage demo\n\n\n\nfunc a() {\n\treturn  \n}\n\n";
        let formatted = CanonicalFormatter.format(raw).unwrap();
        assert_eq!(formatted, "// header\npackage demo\n\nfunc a() {\n\treturn\n}\n");
    }

    #[test]
    fn test_formatting_is_stable() {
        let raw = "package demo\n\nfunc a() {}\n";
        let once = CanonicalFormatter.format(raw).unwrap();
        let twice = CanonicalFormatter.format(&once).unwrap();
        assert_eq!(once, raw);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_missing_package_clause() {
        let err = CanonicalFormatter.format("func a() {}\n").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_rejects_invalid_package_name() {
        let err = CanonicalFormatter.format("package my-lib\n").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.to_string().contains("'-lib'"));

        let err = CanonicalFormatter
            .format("package demo junk (\n)\nfunc {\n}\n")
            .unwrap_err();
        assert!(err.to_string().contains("'junk'"));
    }

    #[test]
    fn test_accepts_trivia_after_package_name() {
        assert!(CanonicalFormatter.format("package demo // ptrs\n").is_ok());
        assert!(CanonicalFormatter.format("package demo /* x */;\n").is_ok());
        assert!(CanonicalFormatter.format("package demo").is_ok());
    }

    #[test]
    fn test_rejects_unbalanced_braces() {
        let err = CanonicalFormatter
            .format("package demo\n\nfunc a() {\n")
            .unwrap_err();
        assert!(err.to_string().contains("never closed"));

        let err = CanonicalFormatter
            .format("package demo\n\nfunc a() }\n")
            .unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_ignores_brackets_in_comments_and_literals() {
        let source = "package demo\n\n// {\n/* ( */\nvar s = \"}\"\nvar r = ')'\nvar b = `\n[`\n";
        assert!(CanonicalFormatter.format(source).is_ok());
    }

    #[test]
    fn test_gofmt_missing_binary_is_io_error() {
        let formatter = GofmtFormatter::with_program("ps2bs-no-such-gofmt");
        let err = formatter.format("package demo\n").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
