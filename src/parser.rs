/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::tokenizer::{tokenize, SourceLocation, SourceSpan, Token, TokenKind};
use smallvec::SmallVec;
use std::error::Error;
use std::fmt;

/// A recoverable diagnostic recorded while tokenizing or parsing.
///
/// These never stop a parse: the algorithms repair and continue, and
/// the diagnostics accumulate on the [`TokenStream`] they came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub location: SourceLocation,
}

/// The reason a [`ParseError`] was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParseErrorKind {
    /// The input ended inside a `/* … */` comment.
    UnterminatedComment,
    /// A `\` immediately before a newline, outside a string.
    InvalidEscape,
    /// An unescaped newline inside a quoted string.
    NewlineInString,
    /// A malformed unquoted url.
    BadUrl,
    /// A `}` with no matching `{` in the current context.
    UnexpectedCloseBrace,
    /// A qualified rule ran into the end of its context before `{`.
    QualifiedRuleWithoutBlock,
    /// A declaration that could not be parsed or was invalid in its
    /// context, dropped during error recovery.
    InvalidDeclaration,
    /// A qualified rule that was invalid in its context, dropped after
    /// its block was consumed.
    InvalidRule,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self.kind {
            ParseErrorKind::UnterminatedComment => "unterminated comment",
            ParseErrorKind::InvalidEscape => "invalid escape",
            ParseErrorKind::NewlineInString => "newline in string",
            ParseErrorKind::BadUrl => "invalid unquoted url",
            ParseErrorKind::UnexpectedCloseBrace => "unmatched }",
            ParseErrorKind::QualifiedRuleWithoutBlock => "qualified rule without a block",
            ParseErrorKind::InvalidDeclaration => "invalid declaration",
            ParseErrorKind::InvalidRule => "invalid rule",
        };
        write!(f, "{} at {}", message, self.location)
    }
}

impl Error for ParseError {}

/// An unrecoverable failure from one of the single-construct entry
/// points, which promise exactly one construct or an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    /// The input had no tokens besides whitespace.
    EmptyInput,
    /// Tokens remained after the single expected construct.
    ExtraInput,
    /// A qualified rule was expected but could not be parsed, most
    /// often because the input ended before its `{ … }` block.
    MissingQualifiedRuleBlock,
    /// A declaration was expected but the input is not one.
    InvalidDeclaration,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            SyntaxError::EmptyInput => "empty input",
            SyntaxError::ExtraInput => "unexpected tokens after the parsed construct",
            SyntaxError::MissingQualifiedRuleBlock => "expected a qualified rule with a block",
            SyntaxError::InvalidDeclaration => "invalid declaration",
        })
    }
}

impl Error for SyntaxError {}

/// A cursor over a fully tokenized input.
///
/// Reading past the end yields [`TokenKind::EOF`] forever rather than
/// panicking, so parsing code never needs a separate end check before
/// looking at the next token.
///
/// Speculative parsing uses a LIFO mark stack: [`mark`](TokenStream::mark)
/// saves the position, then either [`restore_mark`](TokenStream::restore_mark)
/// rewinds to it or [`discard_mark`](TokenStream::discard_mark) commits.
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
    marks: SmallVec<[usize; 4]>,
    errors: Vec<ParseError>,
    eof: Token,
}

impl TokenStream {
    /// Wrap an already tokenized list. If the list does not end with an
    /// EOF token, a synthetic one is supplied when reading past it.
    pub fn new(tokens: Vec<Token>) -> TokenStream {
        TokenStream::with_errors(tokens, Vec::new())
    }

    fn with_errors(tokens: Vec<Token>, errors: Vec<ParseError>) -> TokenStream {
        let trailing = tokens.last().map_or_else(SourceSpan::default, |t| SourceSpan {
            from: t.span.to,
            to: t.span.to,
        });
        TokenStream {
            tokens,
            index: 0,
            marks: SmallVec::new(),
            errors,
            eof: Token {
                kind: TokenKind::EOF,
                span: trailing,
            },
        }
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> &Token {
        self.tokens.get(self.index).unwrap_or(&self.eof)
    }

    /// The next token's kind, without consuming it.
    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Consume and return the next token. At the end of the input this
    /// returns EOF tokens indefinitely.
    pub fn consume(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    /// Consume the next token without returning it.
    pub fn discard(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Where the next token starts. Used for the spans of tree nodes.
    pub fn position(&self) -> SourceLocation {
        self.peek().span.from
    }

    /// Whether the next token is EOF.
    pub fn is_empty(&self) -> bool {
        *self.peek_kind() == TokenKind::EOF
    }

    /// Discard any whitespace tokens at the current position.
    pub fn skip_whitespace(&mut self) {
        while *self.peek_kind() == TokenKind::WhiteSpace {
            self.discard();
        }
    }

    /// Save the current position on the mark stack.
    pub fn mark(&mut self) {
        self.marks.push(self.index);
    }

    /// Rewind to the most recent mark and pop it.
    ///
    /// Panics if no mark is set; that is a bug in the calling parser,
    /// not a property of the input.
    pub fn restore_mark(&mut self) {
        match self.marks.pop() {
            Some(index) => self.index = index,
            None => panic!("restore_mark with no mark set"),
        }
    }

    /// Pop the most recent mark without moving.
    ///
    /// Panics if no mark is set.
    pub fn discard_mark(&mut self) {
        if self.marks.pop().is_none() {
            panic!("discard_mark with no mark set");
        }
    }

    /// The diagnostics recorded so far, in source order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Take ownership of the recorded diagnostics, leaving none.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub(crate) fn parse_error(&mut self, kind: ParseErrorKind) {
        let location = self.position();
        self.errors.push(ParseError { kind, location });
    }
}

impl<'a> From<&'a str> for TokenStream {
    /// Tokenize `input`; tokenizer diagnostics carry over onto the
    /// stream ahead of any parser diagnostics.
    fn from(input: &'a str) -> TokenStream {
        let (tokens, errors) = tokenize(input);
        TokenStream::with_errors(tokens, errors)
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> TokenStream {
        TokenStream::new(tokens)
    }
}
