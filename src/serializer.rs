/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

// https://drafts.csswg.org/css-syntax/#serialization

use crate::ast::{
    AtRule, ComponentValue, Declaration, Function, QualifiedRule, Rule, SimpleBlock, Stylesheet,
};
use crate::tokenizer::{is_name_char, is_name_start, Token, TokenKind};
use std::fmt;

/// Trait for things that can be serialized back to CSS text.
///
/// Serialization is independent of parsing: it walks the tree and
/// nothing else. Escapes are normalized rather than preserved, so
/// `\66 oo` comes back out as `foo`, but re-parsing the output always
/// reproduces the same tree.
pub trait ToCss {
    /// Serialize `self` in CSS syntax, writing to `dest`.
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write;

    /// Serialize `self` in CSS syntax and return a string.
    ///
    /// (This is a convenience wrapper for `to_css` and probably should not be overridden.)
    #[inline]
    fn to_css_string(&self) -> String {
        let mut s = String::new();
        self.to_css(&mut s).unwrap();
        s
    }
}

/// Write `value` escaped so that it re-tokenizes as a single
/// identifier.
pub fn serialize_identifier<W>(value: &str, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    for (i, c) in value.chars().enumerate() {
        let bare = if i == 0 { is_name_start(c) } else { is_name_char(c) };
        if bare {
            dest.write_char(c)?;
        } else {
            serialize_escaped_char(c, dest)?;
        }
    }
    Ok(())
}

/// Write `value` escaped like the part of a hash token after `#`,
/// which only needs name codepoints, not a full identifier.
pub fn serialize_name<W>(value: &str, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    for c in value.chars() {
        if is_name_char(c) {
            dest.write_char(c)?;
        } else {
            serialize_escaped_char(c, dest)?;
        }
    }
    Ok(())
}

/// Write `value` as a double-quoted string token, quotes included.
pub fn serialize_string<W>(value: &str, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    dest.write_char('"')?;
    for c in value.chars() {
        match c {
            '\0'..='\x1F' | '\x7F' | '"' | '\\' => write!(dest, "\\{:x} ", c as u32)?,
            _ => dest.write_char(c)?,
        }
    }
    dest.write_char('"')
}

// Codepoints that would change meaning if written bare get a hex
// escape; anything else only needs a backslash.
fn serialize_escaped_char<W>(c: char, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    if c.is_ascii_alphanumeric() {
        write!(dest, "\\{:x} ", c as u32)
    } else {
        write!(dest, "\\{}", c)
    }
}

fn write_numeric<W>(value: f64, is_integer: bool, sign: Option<char>, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    if sign == Some('+') {
        dest.write_char('+')?;
    }
    if value == 0.0 && value.is_sign_negative() {
        // itoa and dtoa both drop the sign of negative zero.
        return dest.write_str(if is_integer { "-0" } else { "-0.0" });
    }
    // Integer-flagged values are mathematically whole, but only those
    // within the i64 range convert exactly; 2^63 and beyond would
    // saturate and come out as a different number.
    if is_integer && value.abs() < 9_223_372_036_854_775_808.0 {
        let mut buffer = itoa::Buffer::new();
        return dest.write_str(buffer.format(value as i64));
    }
    let notation = dtoa_short::write(&mut *dest, value)?;
    if !is_integer && value.fract() == 0.0 && !notation.decimal_point && !notation.scientific {
        // Keep a non-integer token non-integer across a round trip.
        dest.write_str(".0")?;
    }
    Ok(())
}

// Percentages and dimensions carry no integer flag, so the shortest
// form is always right.
fn write_unitless<W>(value: f64, sign: Option<char>, dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    if sign == Some('+') {
        dest.write_char('+')?;
    }
    if value == 0.0 && value.is_sign_negative() {
        return dest.write_str("-0");
    }
    dtoa_short::write(&mut *dest, value)?;
    Ok(())
}

impl ToCss for TokenKind {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {
            TokenKind::Ident(ref value) => serialize_identifier(value, dest),
            TokenKind::AtKeyword(ref value) => {
                dest.write_char('@')?;
                serialize_identifier(value, dest)
            }
            TokenKind::Hash {
                ref value,
                is_identifier,
            } => {
                dest.write_char('#')?;
                if is_identifier {
                    serialize_identifier(value, dest)
                } else {
                    serialize_name(value, dest)
                }
            }
            TokenKind::QuotedString(ref value) => serialize_string(value, dest),
            TokenKind::Url(ref value) => {
                dest.write_str("url(")?;
                serialize_string(value, dest)?;
                dest.write_char(')')
            }
            // A lone backslash is only a delim when followed by a
            // newline, so one has to come back out with it.
            TokenKind::Delim('\\') => dest.write_str("\\\n"),
            TokenKind::Delim(c) => dest.write_char(c),
            TokenKind::Number {
                value,
                is_integer,
                sign,
            } => write_numeric(value, is_integer, sign, dest),
            TokenKind::Percentage { value, sign } => {
                write_unitless(value, sign, dest)?;
                dest.write_char('%')
            }
            TokenKind::Dimension {
                value,
                ref unit,
                sign,
            } => {
                write_unitless(value, sign, dest)?;
                // A unit starting like an exponent would merge into the
                // number, so the leading `e` gets escaped.
                let mut chars = unit.chars();
                let first = chars.next();
                let second = chars.next();
                if matches!(first, Some('e') | Some('E'))
                    && matches!(second, Some('-') | Some('0'..='9'))
                {
                    dest.write_str("\\65 ")?;
                    for c in unit.chars().skip(1) {
                        if is_name_char(c) {
                            dest.write_char(c)?;
                        } else {
                            serialize_escaped_char(c, dest)?;
                        }
                    }
                    Ok(())
                } else {
                    serialize_identifier(unit, dest)
                }
            }
            TokenKind::UnicodeRange { ref start, ref end } => {
                if start == end {
                    write!(dest, "U+{}", start)
                } else {
                    write!(dest, "U+{}-{}", start, end)
                }
            }
            TokenKind::WhiteSpace => dest.write_char(' '),
            TokenKind::Colon => dest.write_char(':'),
            TokenKind::Semicolon => dest.write_char(';'),
            TokenKind::Comma => dest.write_char(','),
            TokenKind::CDO => dest.write_str("<!--"),
            TokenKind::CDC => dest.write_str("-->"),
            TokenKind::Function(ref name) => {
                serialize_identifier(name, dest)?;
                dest.write_char('(')
            }
            TokenKind::ParenthesisBlock => dest.write_char('('),
            TokenKind::SquareBracketBlock => dest.write_char('['),
            TokenKind::CurlyBracketBlock => dest.write_char('{'),
            // The canonical texts that re-tokenize as the same error
            // tokens.
            TokenKind::BadUrl => dest.write_str("url(BADURL '')"),
            TokenKind::BadString => dest.write_str("\"\n\""),
            TokenKind::CloseParenthesis => dest.write_char(')'),
            TokenKind::CloseSquareBracket => dest.write_char(']'),
            TokenKind::CloseCurlyBracket => dest.write_char('}'),
            TokenKind::EOF => Ok(()),
        }
    }
}

impl ToCss for Token {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        self.kind.to_css(dest)
    }
}

impl ToCss for ComponentValue {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {
            ComponentValue::Preserved(ref token) => token.to_css(dest),
            ComponentValue::Function(ref function) => function.to_css(dest),
            ComponentValue::Block(ref block) => block.to_css(dest),
        }
    }
}

impl ToCss for [ComponentValue] {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        for value in self {
            value.to_css(dest)?;
        }
        Ok(())
    }
}

impl ToCss for Function {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        serialize_identifier(&self.name, dest)?;
        dest.write_char('(')?;
        self.value.to_css(dest)?;
        dest.write_char(')')
    }
}

impl ToCss for SimpleBlock {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        dest.write_char(self.name)?;
        self.value.to_css(dest)?;
        dest.write_char(self.closing())
    }
}

impl ToCss for Declaration {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        declaration_to_css(self, dest, 0)
    }
}

impl ToCss for AtRule {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        at_rule_to_css(self, dest, 0)
    }
}

impl ToCss for QualifiedRule {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        qualified_rule_to_css(self, dest, 0)
    }
}

impl ToCss for Rule {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        rule_to_css(self, dest, 0)
    }
}

impl ToCss for Stylesheet {
    /// Rules come out separated by newlines, with nested contents
    /// indented by one tab per level.
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                dest.write_char('\n')?;
            }
            rule_to_css(rule, dest, 0)?;
        }
        Ok(())
    }
}

fn write_indent<W>(dest: &mut W, indent: usize) -> fmt::Result
where
    W: fmt::Write,
{
    for _ in 0..indent {
        dest.write_char('\t')?;
    }
    Ok(())
}

fn rule_to_css<W>(rule: &Rule, dest: &mut W, indent: usize) -> fmt::Result
where
    W: fmt::Write,
{
    match *rule {
        Rule::AtRule(ref rule) => at_rule_to_css(rule, dest, indent),
        Rule::QualifiedRule(ref rule) => qualified_rule_to_css(rule, dest, indent),
    }
}

fn declaration_to_css<W>(declaration: &Declaration, dest: &mut W, indent: usize) -> fmt::Result
where
    W: fmt::Write,
{
    write_indent(dest, indent)?;
    serialize_identifier(&declaration.name, dest)?;
    dest.write_str(": ")?;
    declaration.value.to_css(dest)?;
    if declaration.important {
        dest.write_str("!important")?;
    }
    dest.write_char(';')
}

fn at_rule_to_css<W>(rule: &AtRule, dest: &mut W, indent: usize) -> fmt::Result
where
    W: fmt::Write,
{
    write_indent(dest, indent)?;
    dest.write_char('@')?;
    serialize_identifier(&rule.name, dest)?;
    rule.prelude.to_css(dest)?;
    match rule.block {
        None => dest.write_char(';'),
        Some(ref contents) => {
            dest.write_str("{\n")?;
            block_contents_to_css(&contents.declarations, &contents.rules, dest, indent, true)?;
            write_indent(dest, indent)?;
            dest.write_char('}')
        }
    }
}

fn qualified_rule_to_css<W>(rule: &QualifiedRule, dest: &mut W, indent: usize) -> fmt::Result
where
    W: fmt::Write,
{
    write_indent(dest, indent)?;
    rule.prelude.to_css(dest)?;
    dest.write_str("{\n")?;
    block_contents_to_css(&rule.declarations, &rule.rules, dest, indent, false)?;
    write_indent(dest, indent)?;
    dest.write_char('}')
}

// At-rules keep the blank line of an empty declaration list,
// qualified rules collapse it.
fn block_contents_to_css<W>(
    declarations: &[Declaration],
    rules: &[Rule],
    dest: &mut W,
    indent: usize,
    keep_empty_line: bool,
) -> fmt::Result
where
    W: fmt::Write,
{
    if keep_empty_line || !declarations.is_empty() {
        for (i, declaration) in declarations.iter().enumerate() {
            if i > 0 {
                dest.write_char('\n')?;
            }
            declaration_to_css(declaration, dest, indent + 1)?;
        }
        dest.write_char('\n')?;
    }
    if !rules.is_empty() {
        for (i, rule) in rules.iter().enumerate() {
            if i > 0 {
                dest.write_char('\n')?;
            }
            rule_to_css(rule, dest, indent + 1)?;
        }
        dest.write_char('\n')?;
    }
    Ok(())
}
