//! Built-in lint engine.
//!
//! Implements a small subset of JSHint's checks on top of the tokenizer.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | asi | boolean | false | Tolerate missing semicolons |
//! | eqeqeq | boolean | false | Require `===` and `!==` |
//! | debug | boolean | false | Tolerate `debugger` statements |
//! | maxlen | number | none | Maximum line length |
//! | maxerr | number | 50 | Errors reported before giving up |

use tracing::trace;

use crate::lexer::{Token, TokenKind, tokenize};
use crate::{EngineError, LintConfig, LintEngine, LintError};

const DEFAULT_MAXERR: u64 = 50;

/// Keywords that cannot be the last token of a statement.
const NON_TERMINAL_KEYWORDS: &[&str] = &[
    "if",
    "for",
    "while",
    "function",
    "var",
    "let",
    "const",
    "new",
    "typeof",
    "in",
    "of",
    "instanceof",
    "do",
    "try",
    "else",
    "case",
    "default",
    "switch",
    "catch",
    "finally",
    "class",
    "extends",
    "void",
    "delete",
    "throw",
    "yield",
    "await",
    "import",
    "export",
    "with",
];

/// Keywords whose parenthesized part is followed by a statement body.
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "with", "switch", "catch"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Block,
    Object,
    Paren { control: bool },
    Bracket,
}

#[derive(Debug)]
struct OpenFrame {
    frame: Frame,
    opener: &'static str,
    line: usize,
    column: usize,
}

#[derive(Debug)]
struct Options {
    asi: bool,
    eqeqeq: bool,
    debug: bool,
    maxlen: Option<usize>,
    maxerr: usize,
}

impl Options {
    fn from_config(config: &LintConfig) -> Self {
        Self {
            asi: config.bool_option("asi").unwrap_or(false),
            eqeqeq: config.bool_option("eqeqeq").unwrap_or(false),
            debug: config.bool_option("debug").unwrap_or(false),
            maxlen: config.u64_option("maxlen").map(|n| n as usize),
            maxerr: config.u64_option("maxerr").unwrap_or(DEFAULT_MAXERR).max(1) as usize,
        }
    }
}

/// The built-in engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEngine;

impl BasicEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }
}

impl LintEngine for BasicEngine {
    fn name(&self) -> &str {
        "basic"
    }

    fn lint(&self, source: &str, config: &LintConfig) -> Result<Vec<LintError>, EngineError> {
        let tokens = tokenize(source)?;
        let options = Options::from_config(config);
        trace!("Checking {} tokens with {:?}", tokens.len(), options);

        let mut errors = Vec::new();
        check_line_lengths(source, &options, &mut errors);
        check_tokens(&tokens, &options, &mut errors)?;

        errors.sort_by_key(|e| (e.line, e.column));
        Ok(apply_maxerr(errors, options.maxerr, source.lines().count()))
    }
}

fn check_line_lengths(source: &str, options: &Options, errors: &mut Vec<LintError>) {
    let Some(maxlen) = options.maxlen else {
        return;
    };
    for (index, line) in source.lines().enumerate() {
        let len = line.chars().count();
        if len > maxlen {
            errors.push(LintError::new(index + 1, len, "Line is too long."));
        }
    }
}

fn check_tokens(
    tokens: &[Token],
    options: &Options,
    errors: &mut Vec<LintError>,
) -> Result<(), EngineError> {
    let mut stack: Vec<OpenFrame> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &tokens[p]);
        let mut closes_control = false;

        match token.kind {
            TokenKind::Punct => match token.text.as_str() {
                "{" => {
                    let frame = if opens_block(prev) {
                        Frame::Block
                    } else {
                        Frame::Object
                    };
                    stack.push(open(frame, "{", token));
                }
                "(" => {
                    let control = is_control_paren(tokens, i);
                    stack.push(open(Frame::Paren { control }, "(", token));
                }
                "[" => stack.push(open(Frame::Bracket, "[", token)),
                closer @ (")" | "]" | "}") => {
                    let frame = close(&mut stack, closer, token)?;
                    closes_control = frame == Frame::Paren { control: true };
                }
                op @ ("==" | "!=") if options.eqeqeq => {
                    errors.push(LintError::new(
                        token.line,
                        token.column,
                        format!("Expected '{}=' and instead saw '{}'.", op, op),
                    ));
                }
                _ => {}
            },
            TokenKind::Identifier if token.text == "debugger" && !options.debug => {
                errors.push(LintError::new(
                    token.line,
                    token.column,
                    "Forgotten 'debugger' statement?",
                ));
            }
            _ => {}
        }

        if options.asi {
            continue;
        }

        let next = tokens.get(i + 1);
        let at_line_end = next.is_none_or(|n| n.newline_before);
        let in_statement = stack.last().is_none_or(|f| f.frame == Frame::Block);

        if at_line_end
            && in_statement
            && ends_statement(token, prev, closes_control)
            && !next.is_some_and(continues_expression)
        {
            errors.push(LintError::new(
                token.end_line,
                token.end_column,
                "Missing semicolon.",
            ));
        }
    }

    match stack.pop() {
        Some(frame) => Err(EngineError::parse(
            frame.line,
            frame.column,
            format!("Unmatched '{}'.", frame.opener),
        )),
        None => Ok(()),
    }
}

fn open(frame: Frame, opener: &'static str, token: &Token) -> OpenFrame {
    OpenFrame {
        frame,
        opener,
        line: token.line,
        column: token.column,
    }
}

fn close(stack: &mut Vec<OpenFrame>, closer: &str, token: &Token) -> Result<Frame, EngineError> {
    let expected = match closer {
        ")" => "(",
        "]" => "[",
        _ => "{",
    };
    match stack.pop() {
        None => Err(EngineError::parse(
            token.line,
            token.column,
            format!("Unexpected '{}'.", closer),
        )),
        Some(open) if open.opener != expected => Err(EngineError::parse(
            token.line,
            token.column,
            format!(
                "Expected '{}' to match '{}' from line {} and instead saw '{}'.",
                closer_for(open.opener),
                open.opener,
                open.line,
                closer
            ),
        )),
        Some(open) => Ok(open.frame),
    }
}

fn closer_for(opener: &str) -> &'static str {
    match opener {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

/// Decides whether a `{` starts a block (as opposed to an object literal).
fn opens_block(prev: Option<&Token>) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    match prev.kind {
        TokenKind::Punct => matches!(prev.text.as_str(), ")" | ";" | "{" | "}" | "=>"),
        TokenKind::Identifier => matches!(prev.text.as_str(), "else" | "do" | "try" | "finally"),
        _ => false,
    }
}

/// A `(` whose matching `)` is followed by a statement or function body.
fn is_control_paren(tokens: &[Token], index: usize) -> bool {
    let Some(prev) = index.checked_sub(1).map(|p| &tokens[p]) else {
        return false;
    };
    if prev.kind != TokenKind::Identifier {
        return false;
    }
    if CONTROL_KEYWORDS.contains(&prev.text.as_str()) || prev.text == "function" {
        return true;
    }
    index
        .checked_sub(2)
        .is_some_and(|p| tokens[p].is_keyword("function"))
}

fn ends_statement(token: &Token, prev: Option<&Token>, closes_control: bool) -> bool {
    match token.kind {
        TokenKind::Identifier => {
            let is_property = prev.is_some_and(|p| p.is_punct(".") || p.is_punct("?."));
            is_property || !NON_TERMINAL_KEYWORDS.contains(&token.text.as_str())
        }
        TokenKind::Number | TokenKind::String | TokenKind::Template | TokenKind::Regex => true,
        TokenKind::Punct => match token.text.as_str() {
            ")" => !closes_control,
            "]" => true,
            "++" | "--" => prev.is_some_and(|p| {
                p.kind == TokenKind::Identifier || p.is_punct(")") || p.is_punct("]")
            }),
            _ => false,
        },
    }
}

/// Whether the first token of the next line continues the current statement.
fn continues_expression(next: &Token) -> bool {
    match next.kind {
        TokenKind::Punct => !matches!(
            next.text.as_str(),
            "}" | "++" | "--" | "!" | "~" | "@" | "#"
        ),
        TokenKind::Identifier => matches!(next.text.as_str(), "in" | "instanceof" | "of"),
        _ => false,
    }
}

fn apply_maxerr(mut errors: Vec<LintError>, maxerr: usize, total_lines: usize) -> Vec<LintError> {
    if errors.len() <= maxerr {
        return errors;
    }
    errors.truncate(maxerr);
    let (line, column) = errors
        .last()
        .map(|e| (e.line, e.column))
        .unwrap_or((1, 1));
    let scanned = if total_lines == 0 {
        100
    } else {
        line * 100 / total_lines
    };
    errors.push(LintError::new(
        line,
        column,
        format!("Too many errors. ({}% scanned).", scanned),
    ));
    errors
}
