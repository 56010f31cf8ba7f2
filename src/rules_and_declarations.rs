/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

// https://drafts.csswg.org/css-syntax/#parsing

use crate::ast::{
    AtRule, BlockContents, ComponentValue, Declaration, Function, QualifiedRule, Rule,
    SimpleBlock, Stylesheet,
};
use crate::parser::{ParseErrorKind, SyntaxError, TokenStream};
use crate::tokenizer::{SourceSpan, Token, TokenKind};

/// A token kind that ends a list of component values without being
/// consumed.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    None,
    Semicolon,
    Comma,
}

impl Delimiter {
    fn matches(self, kind: &TokenKind) -> bool {
        match self {
            Delimiter::None => false,
            Delimiter::Semicolon => *kind == TokenKind::Semicolon,
            Delimiter::Comma => *kind == TokenKind::Comma,
        }
    }
}

/// Parse a complete stylesheet. Never fails: malformed constructs are
/// dropped or repaired, with diagnostics recorded on `input`.
pub fn parse_stylesheet(input: &mut TokenStream) -> Stylesheet {
    let from = input.position();
    let rules = consume_a_stylesheets_contents(input);
    let to = input.position();
    Stylesheet {
        rules,
        span: SourceSpan { from, to },
    }
}

/// Parse the top-level rule list of a stylesheet, without the
/// [`Stylesheet`] wrapper.
pub fn parse_stylesheet_rules(input: &mut TokenStream) -> Vec<Rule> {
    consume_a_stylesheets_contents(input)
}

/// Parse `input` as the inside of a `{ … }` block: declarations mixed
/// with nested rules.
pub fn parse_block_contents(input: &mut TokenStream) -> BlockContents {
    consume_a_blocks_contents(input)
}

/// Parse exactly one rule. Fails if there is none, if there is anything
/// after it, or if a qualified rule cannot be completed.
pub fn parse_one_rule(input: &mut TokenStream) -> Result<Rule, SyntaxError> {
    input.skip_whitespace();
    let rule = match *input.peek_kind() {
        TokenKind::EOF => return Err(SyntaxError::EmptyInput),
        TokenKind::AtKeyword(_) => consume_an_at_rule(input, false).map(Rule::AtRule),
        _ => consume_a_qualified_rule(input, false, Delimiter::None).map(Rule::QualifiedRule),
    };
    let rule = rule.ok_or(SyntaxError::MissingQualifiedRuleBlock)?;
    input.skip_whitespace();
    if input.is_empty() {
        Ok(rule)
    } else {
        Err(SyntaxError::ExtraInput)
    }
}

/// Parse exactly one declaration. Anything after the declaration's
/// terminating `;` is left in the stream.
pub fn parse_one_declaration(input: &mut TokenStream) -> Result<Declaration, SyntaxError> {
    input.skip_whitespace();
    if input.is_empty() {
        return Err(SyntaxError::EmptyInput);
    }
    consume_a_declaration(input, false).ok_or(SyntaxError::InvalidDeclaration)
}

/// Parse exactly one component value. Fails on empty input and on
/// anything left over after the value.
pub fn parse_one_component_value(input: &mut TokenStream) -> Result<ComponentValue, SyntaxError> {
    input.skip_whitespace();
    if input.is_empty() {
        return Err(SyntaxError::EmptyInput);
    }
    let value = consume_a_component_value(input);
    input.skip_whitespace();
    if input.is_empty() {
        Ok(value)
    } else {
        Err(SyntaxError::ExtraInput)
    }
}

/// Parse a list of component values up to the end of input.
pub fn parse_component_value_list(input: &mut TokenStream) -> Vec<ComponentValue> {
    consume_a_list_of_component_values(input, false, Delimiter::None)
}

/// Parse comma-separated groups of component values. Commas inside
/// blocks and functions do not split groups. Wholly empty input gives
/// no groups; empty groups between commas are kept.
pub fn parse_comma_separated_value_list(input: &mut TokenStream) -> Vec<Vec<ComponentValue>> {
    let mut groups = Vec::new();
    while !input.is_empty() {
        groups.push(consume_a_list_of_component_values(
            input,
            false,
            Delimiter::Comma,
        ));
        // The comma, or EOF after the last group.
        input.discard();
    }
    groups
}

// https://drafts.csswg.org/css-syntax/#consume-stylesheet-contents
fn consume_a_stylesheets_contents(s: &mut TokenStream) -> Vec<Rule> {
    let mut rules = Vec::new();
    loop {
        match *s.peek_kind() {
            TokenKind::WhiteSpace | TokenKind::CDO | TokenKind::CDC => s.discard(),
            TokenKind::EOF => return rules,
            TokenKind::AtKeyword(_) => {
                if let Some(rule) = consume_an_at_rule(s, false) {
                    rules.push(Rule::AtRule(rule));
                }
            }
            _ => {
                if let Some(rule) = consume_a_qualified_rule(s, false, Delimiter::None) {
                    rules.push(Rule::QualifiedRule(rule));
                }
            }
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-at-rule
fn consume_an_at_rule(s: &mut TokenStream, nested: bool) -> Option<AtRule> {
    let token = s.consume();
    let name = match token.kind {
        TokenKind::AtKeyword(name) => name,
        kind => panic!("consume_an_at_rule called on {:?}", kind),
    };
    let from = token.span.from;
    let mut prelude = Vec::new();
    loop {
        match *s.peek_kind() {
            TokenKind::Semicolon | TokenKind::EOF => {
                s.discard();
                return Some(AtRule {
                    name,
                    prelude,
                    block: None,
                    span: SourceSpan {
                        from,
                        to: s.position(),
                    },
                });
            }
            TokenKind::CloseCurlyBracket => {
                if nested {
                    return Some(AtRule {
                        name,
                        prelude,
                        block: None,
                        span: SourceSpan {
                            from,
                            to: s.position(),
                        },
                    });
                }
                s.parse_error(ParseErrorKind::UnexpectedCloseBrace);
                prelude.push(ComponentValue::Preserved(s.consume()));
            }
            TokenKind::CurlyBracketBlock => {
                let contents = consume_a_block(s);
                return Some(AtRule {
                    name,
                    prelude,
                    block: Some(contents),
                    span: SourceSpan {
                        from,
                        to: s.position(),
                    },
                });
            }
            _ => prelude.push(consume_a_component_value(s)),
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-qualified-rule
fn consume_a_qualified_rule(
    s: &mut TokenStream,
    nested: bool,
    stop: Delimiter,
) -> Option<QualifiedRule> {
    let from = s.position();
    let mut prelude = Vec::new();
    loop {
        if s.is_empty() || stop.matches(s.peek_kind()) {
            s.parse_error(ParseErrorKind::QualifiedRuleWithoutBlock);
            return None;
        }
        match *s.peek_kind() {
            TokenKind::CloseCurlyBracket => {
                s.parse_error(ParseErrorKind::UnexpectedCloseBrace);
                if nested {
                    return None;
                }
                prelude.push(ComponentValue::Preserved(s.consume()));
            }
            TokenKind::CurlyBracketBlock => {
                // `--foo:bar {}` is a broken declaration, not a rule
                // whose selector happens to start with a double dash.
                if looks_like_a_custom_property(&prelude) {
                    s.parse_error(ParseErrorKind::InvalidDeclaration);
                    consume_the_remnants_of_a_bad_declaration(s, nested);
                    return None;
                }
                let contents = consume_a_block(s);
                // A semicolon in the prelude means a statement was
                // mistaken for the start of a selector, which can only
                // happen at the top level. The block is consumed either
                // way, then the whole rule is dropped.
                if prelude.iter().any(|v| {
                    matches!(
                        v,
                        ComponentValue::Preserved(Token {
                            kind: TokenKind::Semicolon,
                            ..
                        })
                    )
                }) {
                    s.parse_error(ParseErrorKind::InvalidRule);
                    return None;
                }
                return Some(QualifiedRule {
                    prelude,
                    declarations: contents.declarations,
                    rules: contents.rules,
                    span: SourceSpan {
                        from,
                        to: s.position(),
                    },
                });
            }
            _ => prelude.push(consume_a_component_value(s)),
        }
    }
}

// A prelude that starts with `--ident :` can only be a custom property
// declaration that went wrong, most likely an unquoted block value.
fn looks_like_a_custom_property(prelude: &[ComponentValue]) -> bool {
    let mut found_name = false;
    for value in prelude {
        match *value {
            ComponentValue::Preserved(Token {
                kind: TokenKind::WhiteSpace,
                ..
            }) => {}
            ComponentValue::Preserved(Token {
                kind: TokenKind::Ident(ref name),
                ..
            }) if !found_name && name.starts_with("--") => found_name = true,
            ComponentValue::Preserved(Token {
                kind: TokenKind::Colon,
                ..
            }) if found_name => return true,
            _ => return false,
        }
    }
    false
}

// https://drafts.csswg.org/css-syntax/#consume-block
fn consume_a_block(s: &mut TokenStream) -> BlockContents {
    match *s.peek_kind() {
        TokenKind::CurlyBracketBlock => s.discard(),
        ref kind => panic!("consume_a_block called on {:?}", kind),
    }
    let contents = consume_a_blocks_contents(s);
    // The close brace, or EOF for an unclosed block.
    s.discard();
    contents
}

// https://drafts.csswg.org/css-syntax/#consume-block-contents
//
// Anything that is not an at-rule is tried as a declaration first and
// reparsed as a qualified rule from a saved position if that fails.
fn consume_a_blocks_contents(s: &mut TokenStream) -> BlockContents {
    let mut contents = BlockContents::default();
    loop {
        match *s.peek_kind() {
            TokenKind::WhiteSpace | TokenKind::Semicolon => s.discard(),
            TokenKind::EOF | TokenKind::CloseCurlyBracket => return contents,
            TokenKind::AtKeyword(_) => {
                if let Some(rule) = consume_an_at_rule(s, true) {
                    contents.rules.push(Rule::AtRule(rule));
                }
            }
            _ => {
                s.mark();
                if let Some(declaration) = consume_a_declaration(s, true) {
                    s.discard_mark();
                    contents.declarations.push(declaration);
                } else {
                    s.restore_mark();
                    if let Some(rule) = consume_a_qualified_rule(s, true, Delimiter::Semicolon) {
                        contents.rules.push(Rule::QualifiedRule(rule));
                    }
                }
            }
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-declaration
//
// Returns `None` without diagnostics: in block contents a failure here
// is routine and just means the construct is a nested rule instead.
fn consume_a_declaration(s: &mut TokenStream, nested: bool) -> Option<Declaration> {
    if !matches!(*s.peek_kind(), TokenKind::Ident(_)) {
        consume_the_remnants_of_a_bad_declaration(s, nested);
        return None;
    }
    let token = s.consume();
    let from = token.span.from;
    let name = match token.kind {
        TokenKind::Ident(name) => name,
        _ => unreachable!(),
    };
    s.skip_whitespace();
    if *s.peek_kind() != TokenKind::Colon {
        consume_the_remnants_of_a_bad_declaration(s, nested);
        return None;
    }
    s.discard();
    s.skip_whitespace();
    let mut value = consume_a_list_of_component_values(s, nested, Delimiter::Semicolon);
    let mut important = false;

    // Scan backwards for `! important`, skipping whitespace. Anything
    // else before the keyword means it is not a priority marker.
    let mut found_keyword = false;
    for i in (0..value.len()).rev() {
        match value[i] {
            ComponentValue::Preserved(Token {
                kind: TokenKind::WhiteSpace,
                ..
            }) => {}
            ComponentValue::Preserved(Token {
                kind: TokenKind::Ident(ref keyword),
                ..
            }) if !found_keyword && keyword.eq_ignore_ascii_case("important") => {
                found_keyword = true
            }
            ComponentValue::Preserved(Token {
                kind: TokenKind::Delim('!'),
                ..
            }) if found_keyword => {
                value.truncate(i);
                important = true;
                break;
            }
            _ => break,
        }
    }
    while matches!(
        value.last(),
        Some(&ComponentValue::Preserved(Token {
            kind: TokenKind::WhiteSpace,
            ..
        }))
    ) {
        value.pop();
    }

    // Custom properties take any value. For everything else a top-level
    // `{ … }` block means the construct was not a declaration at all.
    if !name.starts_with("--")
        && value.iter().any(|v| {
            matches!(v, ComponentValue::Block(SimpleBlock { name: '{', .. }))
        })
    {
        return None;
    }

    let to = value.last().map_or_else(|| s.position(), |v| v.span().to);
    Some(Declaration {
        name,
        value,
        important,
        span: SourceSpan { from, to },
    })
}

// https://drafts.csswg.org/css-syntax/#consume-the-remnants-of-a-bad-declaration
fn consume_the_remnants_of_a_bad_declaration(s: &mut TokenStream, nested: bool) {
    loop {
        match *s.peek_kind() {
            TokenKind::EOF | TokenKind::Semicolon => {
                s.discard();
                return;
            }
            TokenKind::CloseCurlyBracket => {
                if nested {
                    return;
                }
                s.discard();
            }
            _ => {
                consume_a_component_value(s);
            }
        }
    }
}

// https://drafts.csswg.org/css-syntax/#consume-list-of-components
fn consume_a_list_of_component_values(
    s: &mut TokenStream,
    nested: bool,
    stop: Delimiter,
) -> Vec<ComponentValue> {
    let mut values = Vec::new();
    loop {
        if s.is_empty() || stop.matches(s.peek_kind()) {
            return values;
        }
        if *s.peek_kind() == TokenKind::CloseCurlyBracket {
            if nested {
                return values;
            }
            s.parse_error(ParseErrorKind::UnexpectedCloseBrace);
            values.push(ComponentValue::Preserved(s.consume()));
            continue;
        }
        values.push(consume_a_component_value(s));
    }
}

// https://drafts.csswg.org/css-syntax/#consume-component-value
fn consume_a_component_value(s: &mut TokenStream) -> ComponentValue {
    match *s.peek_kind() {
        TokenKind::ParenthesisBlock
        | TokenKind::SquareBracketBlock
        | TokenKind::CurlyBracketBlock => ComponentValue::Block(consume_a_simple_block(s)),
        TokenKind::Function(_) => ComponentValue::Function(consume_a_function(s)),
        _ => ComponentValue::Preserved(s.consume()),
    }
}

// https://drafts.csswg.org/css-syntax/#consume-simple-block
fn consume_a_simple_block(s: &mut TokenStream) -> SimpleBlock {
    let open = s.consume();
    let mirror = match open.kind.mirror() {
        Some(mirror) => mirror,
        None => panic!("consume_a_simple_block called on {:?}", open.kind),
    };
    let name = match open.kind {
        TokenKind::SquareBracketBlock => '[',
        TokenKind::CurlyBracketBlock => '{',
        _ => '(',
    };
    let from = open.span.from;
    let mut value = Vec::new();
    loop {
        if s.is_empty() || *s.peek_kind() == mirror {
            let to = s.peek().span.from;
            s.discard();
            return SimpleBlock {
                name,
                value,
                span: SourceSpan { from, to },
            };
        }
        value.push(consume_a_component_value(s));
    }
}

// https://drafts.csswg.org/css-syntax/#consume-function
fn consume_a_function(s: &mut TokenStream) -> Function {
    let open = s.consume();
    let name = match open.kind {
        TokenKind::Function(name) => name,
        kind => panic!("consume_a_function called on {:?}", kind),
    };
    let from = open.span.from;
    let mut value = Vec::new();
    loop {
        if s.is_empty() || *s.peek_kind() == TokenKind::CloseParenthesis {
            let to = s.peek().span.from;
            s.discard();
            return Function {
                name,
                value,
                span: SourceSpan { from, to },
            };
        }
        value.push(consume_a_component_value(s));
    }
}
