/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![deny(missing_docs)]

/*!

Implementation of [CSS Syntax Module Level 3](https://drafts.csswg.org/css-syntax/)
for Rust: a tokenizer, a parser producing a tree of rules, declarations
and component values, and a serializer that turns the tree back into
CSS text.

# Input

Everything is based on [`TokenStream`] objects. Build one from text
with `TokenStream::from(input)`, which tokenizes the whole input up
front, or from an already tokenized `Vec<Token>`.

Malformed input never fails tokenization or the list-shaped parsing
entry points: the algorithms repair or drop bad constructs, and a
diagnostic is recorded for each repair. Read them back with
[`TokenStream::errors`] or [`TokenStream::take_errors`].

# Entry points

Pick the entry point matching what the input is supposed to be:

* [`parse_stylesheet`] / [`parse_stylesheet_rules`] for whole
  stylesheets,
* [`parse_block_contents`] for the inside of a `{ … }` block
  (declarations mixed with nested rules),
* [`parse_one_rule`], [`parse_one_declaration`] and
  [`parse_one_component_value`] when the input must be exactly one
  construct; these return `Result` and fail on empty or leftover input,
* [`parse_component_value_list`] and
  [`parse_comma_separated_value_list`] for raw component values.

Each one consumes from the stream it is given, so a single stream can
be parsed once with one entry point.

# Serialization

The [`ToCss`] trait serializes tokens and every tree node back to CSS
text. Escape sequences are normalized rather than preserved, so output
text can differ from the input, but re-parsing the output always gives
the same tree.

*/

pub use crate::ast::{
    AtRule, BlockContents, ComponentValue, Declaration, Function, QualifiedRule, Rule,
    SimpleBlock, Stylesheet,
};
pub use crate::parser::{ParseError, ParseErrorKind, SyntaxError, TokenStream};
pub use crate::rules_and_declarations::{
    parse_block_contents, parse_comma_separated_value_list, parse_component_value_list,
    parse_one_component_value, parse_one_declaration, parse_one_rule, parse_stylesheet,
    parse_stylesheet_rules,
};
pub use crate::serializer::{serialize_identifier, serialize_name, serialize_string, ToCss};
pub use crate::tokenizer::{tokenize, SourceLocation, SourceSpan, Token, TokenKind};

mod ast;
mod parser;
mod rules_and_declarations;
mod serializer;
mod tokenizer;

#[cfg(test)]
mod tests;
