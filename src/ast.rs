/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The tree produced by parsing: component values, declarations and
//! rules. Every node carries the [`SourceSpan`] it was parsed from.

use crate::tokenizer::{SourceSpan, Token};

/// A [component value](https://drafts.csswg.org/css-syntax/#component-value):
/// either a single preserved token, or a function or simple block with
/// its matched contents folded in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ComponentValue {
    /// Any token that does not open a block or function.
    Preserved(Token),
    /// A function and everything up to its matching `)`.
    Function(Function),
    /// A `( … )`, `[ … ]` or `{ … }` block.
    Block(SimpleBlock),
}

impl ComponentValue {
    /// The text range this value was parsed from.
    pub fn span(&self) -> SourceSpan {
        match *self {
            ComponentValue::Preserved(ref token) => token.span,
            ComponentValue::Function(ref function) => function.span,
            ComponentValue::Block(ref block) => block.span,
        }
    }
}

/// A function: `name(` followed by component values and the matching
/// `)`. An unclosed function is closed implicitly at the end of input.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Function {
    /// The function name, without the parenthesis.
    pub name: String,
    /// Everything between the parentheses.
    pub value: Vec<ComponentValue>,
    /// The text range of the whole function.
    pub span: SourceSpan,
}

/// A [simple block](https://drafts.csswg.org/css-syntax/#simple-block)
/// delimited by `(…)`, `[…]` or `{…}`. An unclosed block is closed
/// implicitly at the end of input.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimpleBlock {
    /// The opening delimiter: `(`, `[` or `{`.
    pub name: char,
    /// Everything between the delimiters.
    pub value: Vec<ComponentValue>,
    /// The text range of the whole block.
    pub span: SourceSpan,
}

impl SimpleBlock {
    /// The closing delimiter matching [`name`](SimpleBlock::name).
    pub fn closing(&self) -> char {
        match self.name {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            name => panic!("simple block opened with {:?}", name),
        }
    }
}

/// A property declaration: `name: value`, optionally `!important`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Declaration {
    /// The property name, with escapes decoded. Case is preserved.
    pub name: String,
    /// The component values after the colon, with surrounding
    /// whitespace and any `!important` suffix stripped.
    pub value: Vec<ComponentValue>,
    /// Whether the value ended with `!important`.
    pub important: bool,
    /// The text range of the whole declaration.
    pub span: SourceSpan,
}

/// An at-rule: `@name` followed by a prelude, then `;` or a block.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AtRule {
    /// The at-keyword name, without the `@`.
    pub name: String,
    /// The component values between the name and the `;` or block.
    pub prelude: Vec<ComponentValue>,
    /// The parsed block, or `None` for statement at-rules ended by `;`
    /// or the end of input.
    pub block: Option<BlockContents>,
    /// The text range of the whole rule.
    pub span: SourceSpan,
}

/// A qualified rule: a prelude followed by a `{ … }` block of
/// declarations and nested rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QualifiedRule {
    /// The component values before the block.
    pub prelude: Vec<ComponentValue>,
    /// The declarations directly inside the block.
    pub declarations: Vec<Declaration>,
    /// The rules nested inside the block, after the declarations.
    pub rules: Vec<Rule>,
    /// The text range of the whole rule.
    pub span: SourceSpan,
}

/// Either kind of rule.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Rule {
    /// An at-rule, with or without a block.
    AtRule(AtRule),
    /// A qualified rule.
    QualifiedRule(QualifiedRule),
}

impl Rule {
    /// The text range this rule was parsed from.
    pub fn span(&self) -> SourceSpan {
        match *self {
            Rule::AtRule(ref rule) => rule.span,
            Rule::QualifiedRule(ref rule) => rule.span,
        }
    }
}

/// The parsed contents of a `{ … }` block under CSS Nesting rules:
/// declarations and nested rules, kept apart. Relative order between
/// the two groups is not preserved.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockContents {
    /// The declarations, in source order.
    pub declarations: Vec<Declaration>,
    /// The nested rules, in source order.
    pub rules: Vec<Rule>,
}

/// A whole stylesheet: the list of top-level rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stylesheet {
    /// The top-level rules, in source order.
    pub rules: Vec<Rule>,
    /// The text range of the whole input.
    pub span: SourceSpan,
}
