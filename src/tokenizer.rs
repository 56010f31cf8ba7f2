/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

// https://drafts.csswg.org/css-syntax/#tokenization

use crate::parser::{ParseError, ParseErrorKind};
use std::fmt;

/// A line/column position in the source text, both 1-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceLocation {
    /// The line number, counted from 1.
    pub line: u32,
    /// The column number within the line, counted from 1 in codepoints.
    pub column: u32,
}

/// The range of text a token or tree node was produced from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceSpan {
    /// Where the construct starts.
    pub from: SourceLocation,
    /// Where the construct ends.
    pub to: SourceLocation,
}

/// One token, annotated with the range of text it came from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// What kind of token this is, with its payload.
    pub kind: TokenKind,
    /// The text range this token was tokenized from. Advisory only:
    /// it never affects parsing decisions.
    pub span: SourceSpan,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, from: SourceLocation, to: SourceLocation) -> Token {
        Token {
            kind,
            span: SourceSpan { from, to },
        }
    }
}

/// One of the token types of
/// [css-syntax §4](https://drafts.csswg.org/css-syntax/#tokenization).
///
/// This is a closed set: tokenization produces nothing outside it, and
/// every token list ends with an explicit [`EOF`](TokenKind::EOF) token
/// so consumers never need an out-of-band end marker.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    /// An [`<ident-token>`](https://drafts.csswg.org/css-syntax/#ident-token-diagram),
    /// with escapes already decoded.
    Ident(String),

    /// An [`<at-keyword-token>`](https://drafts.csswg.org/css-syntax/#at-keyword-token-diagram)
    ///
    /// The value does not include the `@` marker.
    AtKeyword(String),

    /// A [`<hash-token>`](https://drafts.csswg.org/css-syntax/#hash-token-diagram)
    ///
    /// The value does not include the `#` marker.
    Hash {
        /// The decoded name following `#`.
        value: String,
        /// Whether the name would also have been a valid identifier,
        /// decided at tokenization time from the codepoints after `#`.
        is_identifier: bool,
    },

    /// A [`<string-token>`](https://drafts.csswg.org/css-syntax/#string-token-diagram)
    ///
    /// The value does not include the quotes.
    QuotedString(String),

    /// A [`<url-token>`](https://drafts.csswg.org/css-syntax/#url-token-diagram)
    ///
    /// Only produced for unquoted urls: `url("…")` tokenizes as a
    /// [`Function`](TokenKind::Function) followed by a string.
    Url(String),

    /// A [`<delim-token>`](https://drafts.csswg.org/css-syntax/#typedef-delim-token):
    /// a single codepoint that matched nothing else.
    Delim(char),

    /// A [`<number-token>`](https://drafts.csswg.org/css-syntax/#number-token-diagram)
    Number {
        /// The numeric value, after exponent expansion.
        value: f64,
        /// Whether the text had neither a decimal point nor an exponent.
        is_integer: bool,
        /// The explicit sign character, if the text had one.
        sign: Option<char>,
    },

    /// A [`<percentage-token>`](https://drafts.csswg.org/css-syntax/#percentage-token-diagram)
    Percentage {
        /// The value as written, *not* divided by 100.
        value: f64,
        /// The explicit sign character, if the text had one.
        sign: Option<char>,
    },

    /// A [`<dimension-token>`](https://drafts.csswg.org/css-syntax/#dimension-token-diagram)
    Dimension {
        /// The numeric value.
        value: f64,
        /// The unit identifier, with escapes decoded. Case is preserved.
        unit: String,
        /// The explicit sign character, if the text had one.
        sign: Option<char>,
    },

    /// A `<unicode-range-token>` such as `U+26`, `U+4??` or `U+0-7F`.
    ///
    /// The bounds are kept as the hex digit strings that appeared in
    /// the text, with `?` wildcards already expanded: `U+4??` gives
    /// `"400"` and `"4FF"`.
    UnicodeRange {
        /// Hex digits of the first codepoint in the range.
        start: String,
        /// Hex digits of the last codepoint in the range.
        end: String,
    },

    /// A run of [whitespace](https://drafts.csswg.org/css-syntax/#whitespace),
    /// collapsed into a single token.
    WhiteSpace,

    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,

    /// `<!--`
    CDO,
    /// `-->`
    CDC,

    /// A [`<function-token>`](https://drafts.csswg.org/css-syntax/#function-token-diagram):
    /// an identifier immediately followed by `(`. The value does not
    /// include the parenthesis.
    Function(String),

    /// `(`
    ParenthesisBlock,
    /// `[`
    SquareBracketBlock,
    /// `{`
    CurlyBracketBlock,

    /// A [`<bad-url-token>`](https://drafts.csswg.org/css-syntax/#typedef-bad-url-token).
    /// Always preceded by a recorded diagnostic.
    BadUrl,
    /// A [`<bad-string-token>`](https://drafts.csswg.org/css-syntax/#typedef-bad-string-token).
    /// Always preceded by a recorded diagnostic.
    BadString,

    /// `)`
    CloseParenthesis,
    /// `]`
    CloseSquareBracket,
    /// `}`
    CloseCurlyBracket,

    /// The end of the token list. Exactly one of these terminates
    /// every tokenization result.
    EOF,
}

impl TokenKind {
    /// The closing token that balances this token, if it opens a block
    /// or function: `(`, `[`, `{` and `<function-token>` mirror to `)`,
    /// `]`, `}` and `)` respectively.
    ///
    /// Pure: depends only on the token kind, never on parser state.
    pub fn mirror(&self) -> Option<TokenKind> {
        match *self {
            TokenKind::ParenthesisBlock | TokenKind::Function(_) => {
                Some(TokenKind::CloseParenthesis)
            }
            TokenKind::SquareBracketBlock => Some(TokenKind::CloseSquareBracket),
            TokenKind::CurlyBracketBlock => Some(TokenKind::CloseCurlyBracket),
            _ => None,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Turn `input` into tokens.
///
/// Never fails: malformed input produces `BadString`, `BadUrl` or
/// `Delim` tokens plus recorded diagnostics. The token list always
/// ends with exactly one [`TokenKind::EOF`].
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<ParseError>) {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    // Every token consumes at least one codepoint, so a run that loops
    // more than twice per codepoint has stopped making progress.
    let budget = tokenizer.input.len() * 2;
    let mut iterations = 0;
    while tokenizer.next(1).is_some() {
        tokens.push(next_token(&mut tokenizer));
        iterations += 1;
        assert!(iterations <= budget, "tokenizer failed to advance");
    }
    // An unterminated comment at the end of the input already yields an
    // EOF token from `next_token`.
    match tokens.last() {
        Some(token) if token.kind == TokenKind::EOF => {}
        _ => {
            let position = tokenizer.position();
            tokens.push(Token::new(TokenKind::EOF, position, position));
        }
    }
    (tokens, tokenizer.errors)
}

// https://drafts.csswg.org/css-syntax/#input-preprocessing
fn preprocess(input: &str) -> Vec<char> {
    let mut codepoints = Vec::with_capacity(input.len());
    let mut iter = input.chars().peekable();
    while let Some(c) = iter.next() {
        match c {
            '\r' => {
                if iter.peek() == Some(&'\n') {
                    iter.next();
                }
                codepoints.push('\n')
            }
            '\x0C' => codepoints.push('\n'),
            '\0' => codepoints.push('\u{FFFD}'),
            _ => codepoints.push(c),
        }
    }
    codepoints
}

struct Tokenizer {
    input: Vec<char>,
    /// Number of codepoints consumed so far.
    cursor: usize,
    /// The most recently consumed codepoint. `None` before the first
    /// `consume` call and once the input is exhausted.
    current: Option<char>,
    line: u32,
    column: u32,
    /// Column count of the previous line, so `reconsume` can step back
    /// over a single newline.
    last_line_length: u32,
    errors: Vec<ParseError>,
}

impl Tokenizer {
    fn new(input: &str) -> Tokenizer {
        Tokenizer {
            input: preprocess(input),
            cursor: 0,
            current: None,
            line: 1,
            column: 1,
            last_line_length: 0,
            errors: Vec::new(),
        }
    }

    fn position(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
        }
    }

    /// Peek at the `n`th unconsumed codepoint, 1-based. The grammar
    /// never needs more than three codepoints of lookahead; asking for
    /// more is a bug in the caller.
    fn next(&self, n: usize) -> Option<char> {
        assert!((1..=3).contains(&n), "lookahead limited to 3 codepoints");
        self.input.get(self.cursor + n - 1).copied()
    }

    fn consume(&mut self, n: usize) {
        debug_assert!(n >= 1);
        self.cursor += n;
        self.current = self.input.get(self.cursor - 1).copied();
        if self.current == Some('\n') {
            self.line += 1;
            self.last_line_length = self.column;
            self.column = 0;
        } else {
            self.column += n as u32;
        }
    }

    /// Push the current codepoint back onto the input. Can back over at
    /// most one newline, which is all the grammar requires.
    fn reconsume(&mut self) {
        if self.current == Some('\n') {
            self.line -= 1;
            self.column = self.last_line_length;
        } else {
            self.column -= 1;
        }
        self.cursor -= 1;
        self.current = if self.cursor == 0 {
            None
        } else {
            self.input.get(self.cursor - 1).copied()
        };
    }

    fn is_eof(&self) -> bool {
        self.current.is_none()
    }

    fn parse_error(&mut self, kind: ParseErrorKind) {
        let location = self.position();
        self.errors.push(ParseError { kind, location });
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

// https://drafts.csswg.org/css-syntax/#ident-start-code-point
pub(crate) fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || is_non_ascii(c)
}

// https://drafts.csswg.org/css-syntax/#ident-code-point
pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

fn is_non_ascii(c: char) -> bool {
    matches!(c,
        '\u{B7}'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'
        | '\u{200D}'
        | '\u{203F}'
        | '\u{2040}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..)
}

// https://drafts.csswg.org/css-syntax/#non-printable-code-point
fn is_non_printable(c: char) -> bool {
    matches!(c, '\0'..='\x08' | '\x0B' | '\x0E'..='\x1F' | '\x7F')
}

// https://drafts.csswg.org/css-syntax/#starts-with-a-valid-escape
fn is_valid_escape(c1: Option<char>, c2: Option<char>) -> bool {
    c1 == Some('\\') && c2 != Some('\n')
}

// https://drafts.csswg.org/css-syntax/#would-start-an-identifier
fn would_start_an_identifier(c1: Option<char>, c2: Option<char>, c3: Option<char>) -> bool {
    match c1 {
        Some('-') => c2.map_or(false, is_name_start) || c2 == Some('-') || is_valid_escape(c2, c3),
        Some('\\') => is_valid_escape(c1, c2),
        Some(c) => is_name_start(c),
        None => false,
    }
}

// https://drafts.csswg.org/css-syntax/#starts-with-a-number
fn would_start_a_number(c1: Option<char>, c2: Option<char>, c3: Option<char>) -> bool {
    match c1 {
        Some('+') | Some('-') => {
            c2.map_or(false, |c| c.is_ascii_digit())
                || (c2 == Some('.') && c3.map_or(false, |c| c.is_ascii_digit()))
        }
        Some('.') => c2.map_or(false, |c| c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

// u or U, then + followed by a hex digit or ?.
fn would_start_a_unicode_range(c1: Option<char>, c2: Option<char>, c3: Option<char>) -> bool {
    matches!(c1, Some('u') | Some('U'))
        && c2 == Some('+')
        && (c3.map_or(false, is_hex_digit) || c3 == Some('?'))
}

fn starts_with_an_identifier(tokenizer: &Tokenizer) -> bool {
    would_start_an_identifier(tokenizer.current, tokenizer.next(1), tokenizer.next(2))
}

fn starts_with_a_number(tokenizer: &Tokenizer) -> bool {
    would_start_a_number(tokenizer.current, tokenizer.next(1), tokenizer.next(2))
}

// https://drafts.csswg.org/css-syntax/#consume-token
fn next_token(tokenizer: &mut Tokenizer) -> Token {
    consume_comments(tokenizer);
    let from = tokenizer.position();
    tokenizer.consume(1);
    let kind = match tokenizer.current {
        Some(c) if is_whitespace(c) => {
            while tokenizer.next(1).map_or(false, is_whitespace) {
                tokenizer.consume(1);
            }
            TokenKind::WhiteSpace
        }
        Some(ending @ '"') | Some(ending @ '\'') => {
            return consume_string(tokenizer, from, ending)
        }
        Some('#') => {
            if tokenizer.next(1).map_or(false, is_name_char)
                || is_valid_escape(tokenizer.next(1), tokenizer.next(2))
            {
                let is_identifier = would_start_an_identifier(
                    tokenizer.next(1),
                    tokenizer.next(2),
                    tokenizer.next(3),
                );
                TokenKind::Hash {
                    value: consume_name(tokenizer),
                    is_identifier,
                }
            } else {
                TokenKind::Delim('#')
            }
        }
        Some('(') => TokenKind::ParenthesisBlock,
        Some(')') => TokenKind::CloseParenthesis,
        Some('+') => {
            if starts_with_a_number(tokenizer) {
                tokenizer.reconsume();
                return consume_numeric(tokenizer, from);
            }
            TokenKind::Delim('+')
        }
        Some(',') => TokenKind::Comma,
        Some('-') => {
            if starts_with_a_number(tokenizer) {
                tokenizer.reconsume();
                return consume_numeric(tokenizer, from);
            }
            if tokenizer.next(1) == Some('-') && tokenizer.next(2) == Some('>') {
                tokenizer.consume(2);
                TokenKind::CDC
            } else if starts_with_an_identifier(tokenizer) {
                tokenizer.reconsume();
                return consume_ident_like(tokenizer, from);
            } else {
                TokenKind::Delim('-')
            }
        }
        Some('.') => {
            if starts_with_a_number(tokenizer) {
                tokenizer.reconsume();
                return consume_numeric(tokenizer, from);
            }
            TokenKind::Delim('.')
        }
        Some(':') => TokenKind::Colon,
        Some(';') => TokenKind::Semicolon,
        Some('<') => {
            if tokenizer.next(1) == Some('!')
                && tokenizer.next(2) == Some('-')
                && tokenizer.next(3) == Some('-')
            {
                tokenizer.consume(3);
                TokenKind::CDO
            } else {
                TokenKind::Delim('<')
            }
        }
        Some('@') => {
            if would_start_an_identifier(tokenizer.next(1), tokenizer.next(2), tokenizer.next(3))
            {
                TokenKind::AtKeyword(consume_name(tokenizer))
            } else {
                TokenKind::Delim('@')
            }
        }
        Some('[') => TokenKind::SquareBracketBlock,
        Some('\\') => {
            if is_valid_escape(tokenizer.current, tokenizer.next(1)) {
                tokenizer.reconsume();
                return consume_ident_like(tokenizer, from);
            }
            tokenizer.parse_error(ParseErrorKind::InvalidEscape);
            TokenKind::Delim('\\')
        }
        Some(']') => TokenKind::CloseSquareBracket,
        Some('{') => TokenKind::CurlyBracketBlock,
        Some('}') => TokenKind::CloseCurlyBracket,
        Some(c) if c.is_ascii_digit() => {
            tokenizer.reconsume();
            return consume_numeric(tokenizer, from);
        }
        Some(c @ 'u') | Some(c @ 'U') => {
            tokenizer.reconsume();
            if would_start_a_unicode_range(Some(c), tokenizer.next(2), tokenizer.next(3)) {
                return consume_unicode_range(tokenizer, from);
            }
            return consume_ident_like(tokenizer, from);
        }
        Some(c) if is_name_start(c) => {
            tokenizer.reconsume();
            return consume_ident_like(tokenizer, from);
        }
        None => return Token::new(TokenKind::EOF, from, from),
        Some(c) => TokenKind::Delim(c),
    };
    Token::new(kind, from, tokenizer.position())
}

// https://drafts.csswg.org/css-syntax/#consume-comment
fn consume_comments(tokenizer: &mut Tokenizer) {
    while tokenizer.next(1) == Some('/') && tokenizer.next(2) == Some('*') {
        tokenizer.consume(2);
        loop {
            tokenizer.consume(1);
            if tokenizer.current == Some('*') && tokenizer.next(1) == Some('/') {
                tokenizer.consume(1);
                break;
            }
            if tokenizer.is_eof() {
                tokenizer.parse_error(ParseErrorKind::UnterminatedComment);
                return;
            }
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-string-token
fn consume_string(tokenizer: &mut Tokenizer, from: SourceLocation, ending: char) -> Token {
    let mut value = String::new();
    loop {
        tokenizer.consume(1);
        match tokenizer.current {
            None => return Token::new(TokenKind::QuotedString(value), from, tokenizer.position()),
            Some(c) if c == ending => {
                return Token::new(TokenKind::QuotedString(value), from, tokenizer.position())
            }
            Some('\n') => {
                tokenizer.parse_error(ParseErrorKind::NewlineInString);
                tokenizer.reconsume();
                return Token::new(TokenKind::BadString, from, tokenizer.position());
            }
            Some('\\') => match tokenizer.next(1) {
                // A backslash at the very end of the input is dropped.
                None => {}
                // An escaped newline is a continuation, not content.
                Some('\n') => tokenizer.consume(1),
                _ => value.push(consume_escape(tokenizer)),
            },
            Some(c) => value.push(c),
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-name
fn consume_name(tokenizer: &mut Tokenizer) -> String {
    let mut value = String::new();
    loop {
        tokenizer.consume(1);
        match tokenizer.current {
            Some(c) if is_name_char(c) => value.push(c),
            current if is_valid_escape(current, tokenizer.next(1)) => {
                value.push(consume_escape(tokenizer))
            }
            _ => {
                tokenizer.reconsume();
                return value;
            }
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-escaped-code-point
//
// Called with the backslash as the current codepoint. Values above the
// Unicode range, surrogates, and an EOF right after the backslash all
// decode to U+FFFD.
fn consume_escape(tokenizer: &mut Tokenizer) -> char {
    tokenizer.consume(1);
    match tokenizer.current {
        Some(first) if is_hex_digit(first) => {
            let mut digits = String::new();
            digits.push(first);
            while digits.len() < 6 && tokenizer.next(1).map_or(false, is_hex_digit) {
                tokenizer.consume(1);
                if let Some(c) = tokenizer.current {
                    digits.push(c);
                }
            }
            if tokenizer.next(1).map_or(false, is_whitespace) {
                tokenizer.consume(1);
            }
            match u32::from_str_radix(&digits, 16) {
                Ok(value) if value <= 0x10FFFF => char::from_u32(value).unwrap_or('\u{FFFD}'),
                _ => '\u{FFFD}',
            }
        }
        None => '\u{FFFD}',
        Some(c) => c,
    }
}

// https://drafts.csswg.org/css-syntax/#consume-numeric-token
fn consume_numeric(tokenizer: &mut Tokenizer, from: SourceLocation) -> Token {
    let (value, is_integer, sign) = consume_number(tokenizer);
    let kind = if would_start_an_identifier(tokenizer.next(1), tokenizer.next(2), tokenizer.next(3))
    {
        TokenKind::Dimension {
            value,
            unit: consume_name(tokenizer),
            sign,
        }
    } else if tokenizer.next(1) == Some('%') {
        tokenizer.consume(1);
        TokenKind::Percentage { value, sign }
    } else {
        TokenKind::Number {
            value,
            is_integer,
            sign,
        }
    };
    Token::new(kind, from, tokenizer.position())
}

// https://drafts.csswg.org/css-syntax/#consume-number
//
// Collects the full textual form, exponent included, and parses it in
// one go. The callers guarantee the stream starts with a number.
fn consume_number(tokenizer: &mut Tokenizer) -> (f64, bool, Option<char>) {
    let mut repr = String::new();
    let mut is_integer = true;
    let sign = match tokenizer.next(1) {
        Some(c @ '+') | Some(c @ '-') => {
            tokenizer.consume(1);
            repr.push(c);
            Some(c)
        }
        _ => None,
    };
    consume_digits(tokenizer, &mut repr);
    if tokenizer.next(1) == Some('.') && tokenizer.next(2).map_or(false, |c| c.is_ascii_digit()) {
        tokenizer.consume(1);
        repr.push('.');
        consume_digits(tokenizer, &mut repr);
        is_integer = false;
    }
    if matches!(tokenizer.next(1), Some('e') | Some('E')) {
        let has_exponent = match tokenizer.next(2) {
            Some(c) if c.is_ascii_digit() => true,
            Some('+') | Some('-') => tokenizer.next(3).map_or(false, |c| c.is_ascii_digit()),
            _ => false,
        };
        if has_exponent {
            tokenizer.consume(1);
            repr.push('e');
            if let Some(c @ '+') | Some(c @ '-') = tokenizer.next(1) {
                tokenizer.consume(1);
                repr.push(c);
            }
            consume_digits(tokenizer, &mut repr);
            is_integer = false;
        }
    }
    let value = repr
        .parse::<f64>()
        .expect("numeric token text failed to parse");
    (value, is_integer, sign)
}

fn consume_digits(tokenizer: &mut Tokenizer, repr: &mut String) {
    while let Some(c) = tokenizer.next(1) {
        if !c.is_ascii_digit() {
            break;
        }
        tokenizer.consume(1);
        repr.push(c);
    }
}

// https://drafts.csswg.org/css-syntax/#consume-ident-like-token
fn consume_ident_like(tokenizer: &mut Tokenizer, from: SourceLocation) -> Token {
    let value = consume_name(tokenizer);
    if value.eq_ignore_ascii_case("url") && tokenizer.next(1) == Some('(') {
        tokenizer.consume(1);
        // Collapse the whitespace run after `url(` down to at most one
        // codepoint, then decide between a url token and a function
        // followed by a string.
        while tokenizer.next(1).map_or(false, is_whitespace)
            && tokenizer.next(2).map_or(false, is_whitespace)
        {
            tokenizer.consume(1);
        }
        let quoted = match (tokenizer.next(1), tokenizer.next(2)) {
            (Some('"'), _) | (Some('\''), _) => true,
            (Some(c), Some('"')) | (Some(c), Some('\'')) if is_whitespace(c) => true,
            _ => false,
        };
        if quoted {
            Token::new(TokenKind::Function(value), from, tokenizer.position())
        } else {
            consume_url(tokenizer, from)
        }
    } else if tokenizer.next(1) == Some('(') {
        tokenizer.consume(1);
        Token::new(TokenKind::Function(value), from, tokenizer.position())
    } else {
        Token::new(TokenKind::Ident(value), from, tokenizer.position())
    }
}

// https://drafts.csswg.org/css-syntax/#consume-url-token
//
// Called after `url(` has been consumed and the whitespace run inside
// it reduced to at most one leading codepoint.
fn consume_url(tokenizer: &mut Tokenizer, from: SourceLocation) -> Token {
    let mut value = String::new();
    while tokenizer.next(1).map_or(false, is_whitespace) {
        tokenizer.consume(1);
    }
    if tokenizer.next(1).is_none() {
        return Token::new(TokenKind::Url(value), from, tokenizer.position());
    }
    loop {
        tokenizer.consume(1);
        match tokenizer.current {
            Some(')') | None => {
                return Token::new(TokenKind::Url(value), from, tokenizer.position())
            }
            Some(c) if is_whitespace(c) => {
                while tokenizer.next(1).map_or(false, is_whitespace) {
                    tokenizer.consume(1);
                }
                if tokenizer.next(1) == Some(')') || tokenizer.next(1).is_none() {
                    tokenizer.consume(1);
                    return Token::new(TokenKind::Url(value), from, tokenizer.position());
                }
                return bad_url(tokenizer, from);
            }
            Some('"') | Some('\'') | Some('(') => return bad_url(tokenizer, from),
            Some(c) if is_non_printable(c) => return bad_url(tokenizer, from),
            Some('\\') => {
                if is_valid_escape(tokenizer.current, tokenizer.next(1)) {
                    value.push(consume_escape(tokenizer));
                } else {
                    return bad_url(tokenizer, from);
                }
            }
            Some(c) => value.push(c),
        }
    }
}

fn bad_url(tokenizer: &mut Tokenizer, from: SourceLocation) -> Token {
    tokenizer.parse_error(ParseErrorKind::BadUrl);
    consume_bad_url_remnants(tokenizer);
    Token::new(TokenKind::BadUrl, from, tokenizer.position())
}

// https://drafts.csswg.org/css-syntax/#consume-remnants-of-bad-url
fn consume_bad_url_remnants(tokenizer: &mut Tokenizer) {
    loop {
        tokenizer.consume(1);
        match tokenizer.current {
            Some(')') | None => return,
            current if is_valid_escape(current, tokenizer.next(1)) => {
                consume_escape(tokenizer);
            }
            _ => {}
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-unicode-range-token
//
// Called with the `u`/`U` still unconsumed. Wildcards pad the start
// bound with `0` and the end bound with `F`.
fn consume_unicode_range(tokenizer: &mut Tokenizer, from: SourceLocation) -> Token {
    // u/U then +
    tokenizer.consume(1);
    tokenizer.consume(1);
    let mut first = String::new();
    while first.len() < 6 && tokenizer.next(1).map_or(false, is_hex_digit) {
        tokenizer.consume(1);
        if let Some(c) = tokenizer.current {
            first.push(c);
        }
    }
    let mut wildcards = 0;
    while first.len() + wildcards < 6 && tokenizer.next(1) == Some('?') {
        tokenizer.consume(1);
        wildcards += 1;
    }
    let (start, end) = if wildcards > 0 {
        let mut start = first.clone();
        let mut end = first;
        for _ in 0..wildcards {
            start.push('0');
            end.push('F');
        }
        (start, end)
    } else if tokenizer.next(1) == Some('-') && tokenizer.next(2).map_or(false, is_hex_digit) {
        tokenizer.consume(1);
        let mut end = String::new();
        while end.len() < 6 && tokenizer.next(1).map_or(false, is_hex_digit) {
            tokenizer.consume(1);
            if let Some(c) = tokenizer.current {
                end.push(c);
            }
        }
        (first, end)
    } else {
        let end = first.clone();
        (first, end)
    };
    Token::new(
        TokenKind::UnicodeRange { start, end },
        from,
        tokenizer.position(),
    )
}
