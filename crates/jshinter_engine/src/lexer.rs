//! Minimal JavaScript tokenizer.
//!
//! Produces just enough structure for statement-level checks: tokens carry
//! their position and whether a line break precedes them. Comments and
//! whitespace are dropped. String, template and regular expression bodies
//! are kept as opaque tokens.

use crate::EngineError;

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Identifier,
    /// Numeric literal.
    Number,
    /// Single or double quoted string.
    String,
    /// Template literal, including any substitutions.
    Template,
    /// Regular expression literal, including flags.
    Regex,
    /// Punctuator or operator.
    Punct,
}

/// A lexed token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character.
    pub column: usize,
    /// Line of the position just past the token.
    pub end_line: usize,
    /// Column of the position just past the token.
    pub end_column: usize,
    /// Whether a line break (or a comment containing one) precedes the token.
    pub newline_before: bool,
}

impl Token {
    /// Returns true if this is the given punctuator.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    /// Returns true if this is an identifier spelled `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == keyword
    }
}

// Longest first.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@", "#",
];

/// Keywords after which a `/` starts a regular expression.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "case",
    "do",
    "else",
    "in",
    "instanceof",
    "new",
    "delete",
    "void",
    "throw",
    "yield",
    "await",
];

/// Tokenizes JavaScript source.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EngineError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    newline_pending: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            newline_pending: false,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek(i) == Some(c))
    }

    fn run(mut self) -> Result<Vec<Token>, EngineError> {
        if self.starts_with("#!") {
            self.skip_line_comment();
        }

        while let Some(c) = self.peek(0) {
            match c {
                '\n' => {
                    self.bump();
                    self.newline_pending = true;
                }
                c if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment()?,
                '\'' | '"' => self.string(c)?,
                '`' => self.template()?,
                '/' if self.regex_allowed() => self.regex()?,
                c if c.is_ascii_digit()
                    || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    self.number()
                }
                c if is_identifier_start(c) => self.identifier(),
                _ => self.punct()?,
            }
        }

        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) {
        let text = self.chars[start..self.pos].iter().collect();
        let newline_before = std::mem::take(&mut self.newline_pending);
        self.tokens.push(Token {
            kind,
            text,
            line,
            column,
            end_line: self.line,
            end_column: self.column,
            newline_before,
        });
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), EngineError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        self.bump();
        loop {
            match self.peek(0) {
                None => return Err(EngineError::parse(line, column, "Unclosed comment.")),
                Some('*') if self.peek(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                Some('\n') => {
                    self.newline_pending = true;
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<(), EngineError> {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.bump();
        self.skip_quoted(quote, line, column)?;
        self.push(TokenKind::String, start, line, column);
        Ok(())
    }

    /// Skips to the closing `quote`; the opening quote is already consumed.
    fn skip_quoted(&mut self, quote: char, line: usize, column: usize) -> Result<(), EngineError> {
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(EngineError::parse(line, column, "Unclosed string."));
                }
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn template(&mut self) -> Result<(), EngineError> {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.bump();
        self.skip_template_body(line, column)?;
        self.push(TokenKind::Template, start, line, column);
        Ok(())
    }

    /// Skips to the closing backtick; the opening one is already consumed.
    fn skip_template_body(&mut self, line: usize, column: usize) -> Result<(), EngineError> {
        loop {
            match self.bump() {
                None => {
                    return Err(EngineError::parse(line, column, "Unclosed template literal."));
                }
                Some('\\') => {
                    self.bump();
                }
                Some('`') => return Ok(()),
                Some('$') if self.peek(0) == Some('{') => {
                    self.bump();
                    self.skip_substitution(line, column)?;
                }
                Some(_) => {}
            }
        }
    }

    fn skip_substitution(&mut self, line: usize, column: usize) -> Result<(), EngineError> {
        let mut depth = 1usize;
        loop {
            match self.bump() {
                None => {
                    return Err(EngineError::parse(line, column, "Unclosed template literal."));
                }
                Some('{') => depth += 1,
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(quote @ ('\'' | '"')) => {
                    let (l, c) = (self.line, self.column);
                    self.skip_quoted(quote, l, c)?;
                }
                Some('`') => self.skip_template_body(line, column)?,
                Some(_) => {}
            }
        }
    }

    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(token) => match token.kind {
                TokenKind::Punct => !matches!(token.text.as_str(), ")" | "]" | "}" | "++" | "--"),
                TokenKind::Identifier => REGEX_PRECEDING_KEYWORDS.contains(&token.text.as_str()),
                _ => false,
            },
        }
    }

    fn regex(&mut self) -> Result<(), EngineError> {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(EngineError::parse(
                        line,
                        column,
                        "Unclosed regular expression.",
                    ));
                }
                Some('\\') => {
                    if self.peek(0) != Some('\n') {
                        self.bump();
                    }
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.peek(0).is_some_and(is_identifier_part) {
            self.bump();
        }
        self.push(TokenKind::Regex, start, line, column);
        Ok(())
    }

    fn number(&mut self) {
        let (start, line, column) = (self.pos, self.line, self.column);
        let is_hex = self.starts_with("0x") || self.starts_with("0X");
        while let Some(c) = self.peek(0) {
            let after_exponent = !is_hex
                && self.pos > start
                && matches!(self.chars[self.pos - 1], 'e' | 'E')
                && matches!(c, '+' | '-');
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || after_exponent {
                self.bump();
            } else {
                break;
            }
        }
        self.push(TokenKind::Number, start, line, column);
    }

    fn identifier(&mut self) {
        let (start, line, column) = (self.pos, self.line, self.column);
        while self.peek(0).is_some_and(is_identifier_part) {
            self.bump();
        }
        self.push(TokenKind::Identifier, start, line, column);
    }

    fn punct(&mut self) -> Result<(), EngineError> {
        let (start, line, column) = (self.pos, self.line, self.column);
        let Some(punct) = PUNCTUATORS.iter().find(|p| self.starts_with(p)) else {
            let c = self.peek(0).unwrap_or_default();
            return Err(EngineError::parse(line, column, format!("Unexpected '{}'.", c)));
        };
        for _ in 0..punct.len() {
            self.bump();
        }
        self.push(TokenKind::Punct, start, line, column);
        Ok(())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_tokenize_statement() {
        assert_eq!(texts("var a = 1;"), vec!["var", "a", "=", "1", ";"]);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("var a\n  = 10").unwrap();

        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].end_line, tokens[1].end_column), (1, 6));
        assert!(tokens[2].newline_before);
        assert_eq!((tokens[3].line, tokens[3].column), (2, 5));
        assert_eq!(tokens[3].end_column, 7);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("a // one\n/* two\nthree */ b").unwrap();

        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].newline_before);
    }

    #[test]
    fn test_longest_punctuator_wins() {
        assert_eq!(texts("a === b !== c"), vec!["a", "===", "b", "!==", "c"]);
        assert_eq!(texts("x >>>= 1"), vec!["x", ">>>=", "1"]);
    }

    #[test]
    fn test_regex_versus_division() {
        let tokens = tokenize("var r = /[/]+/g; x = a / b / c;").unwrap();

        assert_eq!(tokens[3].kind, TokenKind::Regex);
        assert_eq!(tokens[3].text, "/[/]+/g");
        assert_eq!(tokens[8].text, "/");
        assert_eq!(tokens[8].kind, TokenKind::Punct);
    }

    #[test]
    fn test_template_with_substitution() {
        let tokens = tokenize("`a ${ {b: '}'}.b } c` + 1").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Template);
        assert_eq!(tokens[1].text, "+");
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let tokens = tokenize(r#"'it\'s' "a\"b""#).unwrap();

        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::String));
    }

    #[test]
    fn test_number_with_exponent() {
        assert_eq!(texts("1e-5 + 0x1F"), vec!["1e-5", "+", "0x1F"]);
    }

    #[test]
    fn test_unclosed_string() {
        let err = tokenize("var a = 'oops\n;").unwrap_err();
        assert_eq!(err, EngineError::parse(1, 9, "Unclosed string."));
    }

    #[test]
    fn test_unclosed_comment() {
        let err = tokenize("a;\n/* never closed").unwrap_err();
        assert_eq!(err, EngineError::parse(2, 1, "Unclosed comment."));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a \\ b").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected '\\'.");
    }

    #[test]
    fn test_hashbang_is_ignored() {
        assert_eq!(texts("#!/usr/bin/env node\nrun();"), vec!["run", "(", ")", ";"]);
    }
}
