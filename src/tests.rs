/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use difference::Changeset;

use super::{
    parse_block_contents, parse_comma_separated_value_list, parse_component_value_list,
    parse_one_component_value, parse_one_declaration, parse_one_rule, parse_stylesheet,
    parse_stylesheet_rules, serialize_identifier, tokenize, BlockContents, ComponentValue,
    Declaration, Function, ParseErrorKind, Rule, SimpleBlock, SourceSpan, Stylesheet,
    SyntaxError, ToCss, Token, TokenKind, TokenStream,
};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).0.into_iter().map(|t| t.kind).collect()
}

fn assert_text_eq(actual: &str, expected: &str) {
    if actual != expected {
        let changeset = Changeset::new(expected, actual, "\n");
        panic!("serialization mismatch:\n{}", changeset);
    }
}

fn ident(value: &str) -> TokenKind {
    TokenKind::Ident(value.to_owned())
}

// Span scrubbing, so parsed trees can be compared structurally across
// a serialize/re-parse cycle where all the positions move.

fn scrub_stylesheet(sheet: &mut Stylesheet) {
    sheet.span = SourceSpan::default();
    scrub_rules(&mut sheet.rules);
}

fn scrub_rules(rules: &mut [Rule]) {
    for rule in rules {
        match *rule {
            Rule::AtRule(ref mut rule) => {
                rule.span = SourceSpan::default();
                scrub_values(&mut rule.prelude);
                if let Some(ref mut block) = rule.block {
                    scrub_block_contents(block);
                }
            }
            Rule::QualifiedRule(ref mut rule) => {
                rule.span = SourceSpan::default();
                scrub_values(&mut rule.prelude);
                scrub_declarations(&mut rule.declarations);
                scrub_rules(&mut rule.rules);
            }
        }
    }
}

fn scrub_block_contents(contents: &mut BlockContents) {
    scrub_declarations(&mut contents.declarations);
    scrub_rules(&mut contents.rules);
}

fn scrub_declarations(declarations: &mut [Declaration]) {
    for declaration in declarations {
        declaration.span = SourceSpan::default();
        scrub_values(&mut declaration.value);
    }
}

fn scrub_values(values: &mut [ComponentValue]) {
    for value in values {
        match *value {
            ComponentValue::Preserved(ref mut token) => token.span = SourceSpan::default(),
            ComponentValue::Function(ref mut function) => {
                function.span = SourceSpan::default();
                scrub_values(&mut function.value);
            }
            ComponentValue::Block(ref mut block) => {
                block.span = SourceSpan::default();
                scrub_values(&mut block.value);
            }
        }
    }
}

#[test]
fn token_list_always_ends_with_eof() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
    assert_eq!(kinds("foo"), vec![ident("foo"), TokenKind::EOF]);
    // An unterminated comment still produces a single EOF.
    assert_eq!(kinds("a/*x"), vec![ident("a"), TokenKind::EOF]);
}

#[test]
fn preprocessing() {
    // All newline flavors collapse before tokenization.
    assert_eq!(kinds("\r\n\r\x0C"), vec![TokenKind::WhiteSpace, TokenKind::EOF]);
    assert_eq!(kinds("a\0b"), vec![ident("a\u{FFFD}b"), TokenKind::EOF]);
}

#[test]
fn numeric_tokens() {
    assert_eq!(
        kinds("12"),
        vec![
            TokenKind::Number {
                value: 12.0,
                is_integer: true,
                sign: None
            },
            TokenKind::EOF
        ]
    );
    assert_eq!(
        kinds("+3.0e1"),
        vec![
            TokenKind::Number {
                value: 30.0,
                is_integer: false,
                sign: Some('+')
            },
            TokenKind::EOF
        ]
    );
    assert_eq!(
        kinds("-.5"),
        vec![
            TokenKind::Number {
                value: -0.5,
                is_integer: false,
                sign: Some('-')
            },
            TokenKind::EOF
        ]
    );
    assert_eq!(
        kinds("4px"),
        vec![
            TokenKind::Dimension {
                value: 4.0,
                unit: "px".to_owned(),
                sign: None
            },
            TokenKind::EOF
        ]
    );
    assert_eq!(
        kinds("50%"),
        vec![
            TokenKind::Percentage {
                value: 50.0,
                sign: None
            },
            TokenKind::EOF
        ]
    );
}

#[test]
fn hash_tokens() {
    assert_eq!(
        kinds("#fff"),
        vec![
            TokenKind::Hash {
                value: "fff".to_owned(),
                is_identifier: true
            },
            TokenKind::EOF
        ]
    );
    // Digits make a hash value but not an identifier.
    assert_eq!(
        kinds("#00"),
        vec![
            TokenKind::Hash {
                value: "00".to_owned(),
                is_identifier: false
            },
            TokenKind::EOF
        ]
    );
    assert_eq!(kinds("#"), vec![TokenKind::Delim('#'), TokenKind::EOF]);
}

#[test]
fn unicode_range_tokens() {
    fn range(start: &str, end: &str) -> TokenKind {
        TokenKind::UnicodeRange {
            start: start.to_owned(),
            end: end.to_owned(),
        }
    }
    assert_eq!(kinds("u+26"), vec![range("26", "26"), TokenKind::EOF]);
    assert_eq!(kinds("U+0-7F"), vec![range("0", "7F"), TokenKind::EOF]);
    // Wildcards pad with 0 for the start and F for the end.
    assert_eq!(kinds("u+4??"), vec![range("400", "4FF"), TokenKind::EOF]);
    // Not a range at all without a hex digit or ? after the +.
    assert_eq!(
        kinds("u+z"),
        vec![
            ident("u"),
            TokenKind::Delim('+'),
            ident("z"),
            TokenKind::EOF
        ]
    );
}

#[test]
fn string_tokens() {
    assert_eq!(
        kinds("'abc'"),
        vec![TokenKind::QuotedString("abc".to_owned()), TokenKind::EOF]
    );
    assert_eq!(
        kinds("\"a\\62 c\""),
        vec![TokenKind::QuotedString("abc".to_owned()), TokenKind::EOF]
    );
    // An unescaped newline aborts the string and stays in the input.
    let (tokens, errors) = tokenize("\"abc\n\"x\"");
    let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::BadString,
            TokenKind::WhiteSpace,
            TokenKind::QuotedString("x".to_owned()),
            TokenKind::EOF
        ]
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParseErrorKind::NewlineInString);
}

#[test]
fn escapes() {
    // Out-of-range and surrogate escapes decode to the replacement
    // character; the whitespace after the digits belongs to the escape.
    assert_eq!(kinds("\\110000 x"), vec![ident("\u{FFFD}x"), TokenKind::EOF]);
    assert_eq!(kinds("\\d800 x"), vec![ident("\u{FFFD}x"), TokenKind::EOF]);
    assert_eq!(kinds("\\66 oo"), vec![ident("foo"), TokenKind::EOF]);
    // A backslash before a newline is not an escape outside strings.
    let (tokens, errors) = tokenize("\\\nx");
    assert_eq!(tokens[0].kind, TokenKind::Delim('\\'));
    assert_eq!(errors[0].kind, ParseErrorKind::InvalidEscape);
}

#[test]
fn url_tokens() {
    assert_eq!(
        kinds("url(foo)"),
        vec![TokenKind::Url("foo".to_owned()), TokenKind::EOF]
    );
    assert_eq!(
        kinds("url(  foo  )"),
        vec![TokenKind::Url("foo".to_owned()), TokenKind::EOF]
    );
    assert_eq!(kinds("url()"), vec![TokenKind::Url(String::new()), TokenKind::EOF]);
    // A quoted url is a plain function containing a string.
    assert_eq!(
        kinds("url('x')"),
        vec![
            TokenKind::Function("url".to_owned()),
            TokenKind::QuotedString("x".to_owned()),
            TokenKind::CloseParenthesis,
            TokenKind::EOF
        ]
    );
    let (tokens, errors) = tokenize("url(foo bar)");
    assert_eq!(tokens[0].kind, TokenKind::BadUrl);
    assert_eq!(errors[0].kind, ParseErrorKind::BadUrl);
}

#[test]
fn comments() {
    assert_eq!(kinds("/* a */x/* b */"), vec![ident("x"), TokenKind::EOF]);
    let (_, errors) = tokenize("x/* b");
    assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedComment);
}

#[test]
fn line_numbers() {
    let (tokens, _) = tokenize("foo bar\nbaz");
    let spans: Vec<_> = tokens
        .iter()
        .map(|t| {
            (
                (t.span.from.line, t.span.from.column),
                (t.span.to.line, t.span.to.column),
            )
        })
        .collect();
    assert_eq!(
        spans,
        vec![
            ((1, 1), (1, 4)), // foo
            ((1, 4), (1, 5)),
            ((1, 5), (1, 8)), // bar
            ((1, 8), (2, 0)), // the newline run
            ((2, 0), (2, 3)), // baz
            ((2, 3), (2, 3)), // EOF
        ]
    );
}

#[test]
fn one_component_value() {
    let mut input = TokenStream::from(" 1 ");
    match parse_one_component_value(&mut input) {
        Ok(ComponentValue::Preserved(Token {
            kind: TokenKind::Number { value, .. },
            ..
        })) => assert_eq!(value, 1.0),
        other => panic!("expected a number, got {:?}", other),
    }
    assert_eq!(
        parse_one_component_value(&mut TokenStream::from("1 2")),
        Err(SyntaxError::ExtraInput)
    );
    assert_eq!(
        parse_one_component_value(&mut TokenStream::from("  ")),
        Err(SyntaxError::EmptyInput)
    );
}

#[test]
fn nested_blocks_and_functions() {
    let value = parse_one_component_value(&mut TokenStream::from("f(a[b{c}])")).unwrap();
    let function = match value {
        ComponentValue::Function(function) => function,
        other => panic!("expected a function, got {:?}", other),
    };
    assert_eq!(function.name, "f");
    assert_eq!(function.value.len(), 2);
    match function.value[1] {
        ComponentValue::Block(SimpleBlock {
            name: '[',
            ref value,
            ..
        }) => match value[1] {
            ComponentValue::Block(SimpleBlock { name: '{', .. }) => {}
            ref other => panic!("expected a curly block, got {:?}", other),
        },
        ref other => panic!("expected a square block, got {:?}", other),
    }
}

#[test]
fn unclosed_constructs_close_at_eof() {
    let values = parse_component_value_list(&mut TokenStream::from("f(a"));
    match values[0] {
        ComponentValue::Function(Function {
            ref name,
            ref value,
            ..
        }) => {
            assert_eq!(name, "f");
            assert_eq!(value.len(), 1);
        }
        ref other => panic!("expected a function, got {:?}", other),
    }
    let values = parse_component_value_list(&mut TokenStream::from("[a"));
    assert!(matches!(
        values[0],
        ComponentValue::Block(SimpleBlock { name: '[', .. })
    ));
}

#[test]
fn simple_stylesheet() {
    let mut input = TokenStream::from("foo { bar: baz }");
    let rules = parse_stylesheet_rules(&mut input);
    assert_eq!(rules.len(), 1);
    let rule = match rules[0] {
        Rule::QualifiedRule(ref rule) => rule,
        ref other => panic!("expected a qualified rule, got {:?}", other),
    };
    assert_eq!(rule.prelude.len(), 2); // `foo` and the space
    assert_eq!(rule.declarations.len(), 1);
    assert_eq!(rule.declarations[0].name, "bar");
    assert!(rule.rules.is_empty());
    assert!(input.errors().is_empty());
}

#[test]
fn at_rules() {
    let rule = parse_one_rule(&mut TokenStream::from("@import url(foo.css);")).unwrap();
    match rule {
        Rule::AtRule(ref rule) => {
            assert_eq!(rule.name, "import");
            assert!(rule.block.is_none());
        }
        ref other => panic!("expected an at-rule, got {:?}", other),
    }

    let rule = parse_one_rule(&mut TokenStream::from("@media screen { a { color: red } }"));
    match rule.unwrap() {
        Rule::AtRule(rule) => {
            let block = rule.block.expect("@media should have a block");
            assert!(block.declarations.is_empty());
            assert_eq!(block.rules.len(), 1);
        }
        other => panic!("expected an at-rule, got {:?}", other),
    }

    // Without a semicolon or block, EOF ends the rule.
    let rule = parse_one_rule(&mut TokenStream::from("@foo bar")).unwrap();
    match rule {
        Rule::AtRule(ref rule) => assert!(rule.block.is_none()),
        ref other => panic!("expected an at-rule, got {:?}", other),
    }
}

#[test]
fn important() {
    let contents = parse_block_contents(&mut TokenStream::from("b: c !important"));
    assert_eq!(contents.declarations.len(), 1);
    assert!(contents.declarations[0].important);
    // The priority marker and surrounding whitespace leave the value.
    match contents.declarations[0].value[..] {
        [ComponentValue::Preserved(Token {
            kind: TokenKind::Ident(ref value),
            ..
        })] => assert_eq!(value, "c"),
        ref other => panic!("expected a bare ident value, got {:?}", other),
    }

    // Whitespace between the two halves is allowed.
    let contents = parse_block_contents(&mut TokenStream::from("b: c ! important ;"));
    assert!(contents.declarations[0].important);
    assert_eq!(contents.declarations[0].value.len(), 1);

    // `!important` must be last to count.
    let contents = parse_block_contents(&mut TokenStream::from("b: c !important x"));
    assert!(!contents.declarations[0].important);

    // A value that is nothing but the priority.
    let contents = parse_block_contents(&mut TokenStream::from("b: !important"));
    assert!(contents.declarations[0].important);
    assert!(contents.declarations[0].value.is_empty());
}

#[test]
fn custom_properties() {
    // In a block, a custom property can hold a braced value.
    let contents = parse_block_contents(&mut TokenStream::from("--foo: { bar: baz }"));
    assert_eq!(contents.declarations.len(), 1);
    assert_eq!(contents.declarations[0].name, "--foo");
    assert!(contents.declarations[0]
        .value
        .iter()
        .any(|v| matches!(v, ComponentValue::Block(SimpleBlock { name: '{', .. }))));

    // Where a rule is expected, the same shape is a broken declaration
    // and produces nothing rather than a rule with a `--foo:` selector.
    let mut input = TokenStream::from("--foo: { bar: baz };");
    let rules = parse_stylesheet_rules(&mut input);
    assert!(rules.is_empty());
    assert!(input
        .errors()
        .iter()
        .any(|e| e.kind == ParseErrorKind::InvalidDeclaration));
}

#[test]
fn declaration_versus_nested_rule() {
    let mut input = TokenStream::from("color: red; a:hover { color: blue }");
    let contents = parse_block_contents(&mut input);
    assert_eq!(contents.declarations.len(), 1);
    assert_eq!(contents.declarations[0].name, "color");
    assert_eq!(contents.rules.len(), 1);
    match contents.rules[0] {
        Rule::QualifiedRule(ref rule) => {
            assert_eq!(rule.declarations.len(), 1);
            assert_eq!(rule.declarations[0].name, "color");
        }
        ref other => panic!("expected a qualified rule, got {:?}", other),
    }
}

#[test]
fn bad_statement_in_block_is_dropped() {
    let mut input = TokenStream::from("foo bar; baz: qux;");
    let contents = parse_block_contents(&mut input);
    assert_eq!(contents.declarations.len(), 1);
    assert_eq!(contents.declarations[0].name, "baz");
    assert!(contents.rules.is_empty());
    assert!(input
        .errors()
        .iter()
        .any(|e| e.kind == ParseErrorKind::QualifiedRuleWithoutBlock));
}

#[test]
fn rule_with_semicolon_in_prelude_is_dropped() {
    // `a;` is a broken statement, not the start of a selector; the
    // whole rule is consumed and then filtered out.
    let mut input = TokenStream::from("a; b {}");
    let rules = parse_stylesheet_rules(&mut input);
    assert!(rules.is_empty());
    assert!(input
        .errors()
        .iter()
        .any(|e| e.kind == ParseErrorKind::InvalidRule));

    // A following rule still parses.
    let mut input = TokenStream::from("a; b {} c {}");
    let rules = parse_stylesheet_rules(&mut input);
    assert_eq!(rules.len(), 1);
}

#[test]
fn stray_close_brace_at_top_level() {
    let mut input = TokenStream::from("} a{}");
    let rules = parse_stylesheet_rules(&mut input);
    // The brace is kept as part of the prelude rather than aborting.
    assert_eq!(rules.len(), 1);
    assert!(input
        .errors()
        .iter()
        .any(|e| e.kind == ParseErrorKind::UnexpectedCloseBrace));
}

#[test]
fn cdo_and_cdc_are_dropped_at_top_level() {
    let rules = parse_stylesheet_rules(&mut TokenStream::from("<!-- a{} -->"));
    assert_eq!(rules.len(), 1);
}

#[test]
fn comma_separated_lists() {
    let groups = parse_comma_separated_value_list(&mut TokenStream::from("a,,b"));
    let lens: Vec<_> = groups.iter().map(|g| g.len()).collect();
    assert_eq!(lens, vec![1, 0, 1]);

    // Commas inside a function do not split groups.
    let groups = parse_comma_separated_value_list(&mut TokenStream::from("f(a,b),c"));
    assert_eq!(groups.len(), 2);

    assert!(parse_comma_separated_value_list(&mut TokenStream::from("")).is_empty());
}

#[test]
fn one_rule_errors() {
    assert_eq!(
        parse_one_rule(&mut TokenStream::from("  ")).unwrap_err(),
        SyntaxError::EmptyInput
    );
    assert_eq!(
        parse_one_rule(&mut TokenStream::from("a{} b{}")).unwrap_err(),
        SyntaxError::ExtraInput
    );
    assert_eq!(
        parse_one_rule(&mut TokenStream::from("a")).unwrap_err(),
        SyntaxError::MissingQualifiedRuleBlock
    );
    assert!(parse_one_rule(&mut TokenStream::from("a{}")).is_ok());
}

#[test]
fn one_declaration() {
    let declaration = parse_one_declaration(&mut TokenStream::from("color: red")).unwrap();
    assert_eq!(declaration.name, "color");
    assert!(!declaration.important);

    assert_eq!(
        parse_one_declaration(&mut TokenStream::from("color")).unwrap_err(),
        SyntaxError::InvalidDeclaration
    );
    assert_eq!(
        parse_one_declaration(&mut TokenStream::from(" ")).unwrap_err(),
        SyntaxError::EmptyInput
    );

    // Anything after the terminating semicolon stays in the stream.
    let mut input = TokenStream::from("color: red; leftover");
    let declaration = parse_one_declaration(&mut input).unwrap();
    assert_eq!(declaration.name, "color");
    assert!(!input.is_empty());
}

#[test]
#[should_panic(expected = "restore_mark with no mark set")]
fn restore_without_mark() {
    TokenStream::from("a").restore_mark();
}

#[test]
fn serialize_identifiers() {
    let mut s = String::new();
    serialize_identifier("1two", &mut s).unwrap();
    assert_eq!(s, "\\31 two");

    let mut s = String::new();
    serialize_identifier("a b", &mut s).unwrap();
    assert_eq!(s, "a\\ b");
}

#[test]
fn serialize_numeric_tokens() {
    assert_eq!(
        TokenKind::Number {
            value: 30.0,
            is_integer: true,
            sign: None
        }
        .to_css_string(),
        "30"
    );
    // A non-integer stays non-integer when re-tokenized.
    assert_eq!(
        TokenKind::Number {
            value: 30.0,
            is_integer: false,
            sign: Some('+')
        }
        .to_css_string(),
        "+30.0"
    );
    assert_eq!(
        TokenKind::Percentage {
            value: 12.5,
            sign: None
        }
        .to_css_string(),
        "12.5%"
    );
    // An integer too large for i64 keeps its value, on the general
    // path rather than the integer one.
    let (tokens, _) = tokenize("10000000000000000000");
    match tokens[0].kind {
        TokenKind::Number { value, .. } => assert_eq!(value, 1e19),
        ref other => panic!("expected a number, got {:?}", other),
    }
    let (reparsed, _) = tokenize(&tokens[0].to_css_string());
    match reparsed[0].kind {
        TokenKind::Number { value, .. } => assert_eq!(value, 1e19),
        ref other => panic!("expected a number, got {:?}", other),
    }

    // A unit that would read as an exponent gets its `e` escaped.
    assert_eq!(
        TokenKind::Dimension {
            value: 3.0,
            unit: "e2".to_owned(),
            sign: None
        }
        .to_css_string(),
        "3\\65 2"
    );
}

#[test]
fn serialize_unicode_ranges() {
    assert_eq!(
        TokenKind::UnicodeRange {
            start: "26".to_owned(),
            end: "26".to_owned()
        }
        .to_css_string(),
        "U+26"
    );
    let (tokens, _) = tokenize("u+4??");
    assert_eq!(tokens[0].to_css_string(), "U+400-4FF");
}

#[test]
fn serialize_error_tokens() {
    assert_eq!(TokenKind::BadString.to_css_string(), "\"\n\"");
    assert_eq!(TokenKind::BadUrl.to_css_string(), "url(BADURL '')");
    assert_eq!(TokenKind::Delim('\\').to_css_string(), "\\\n");
}

#[test]
fn exact_round_trips() {
    for source in &[
        "foo {\n\tbar: baz;\n}",
        "foo {\n\tbar: baz;\n\ta {\n\t\tb: c;\n\t}\n}",
        "@media {\n\n}",
        // An at-rule block keeps the line for its (empty) declaration
        // list before the nested rules.
        "@media screen {\n\n\tfoo {\n\t\tbar: baz;\n\t}\n}",
        "@import foo;",
        "a {\n\tb: c!important;\n}",
    ] {
        let sheet = parse_stylesheet(&mut TokenStream::from(*source));
        assert_text_eq(&sheet.to_css_string(), source);
    }
}

#[test]
fn serialization_normalizes_escapes() {
    let sheet = parse_stylesheet(&mut TokenStream::from("\\66 oo {}"));
    assert_text_eq(&sheet.to_css_string(), "foo {\n}");
}

#[test]
fn reparsing_serialized_output_is_stable() {
    for source in &[
        "a{b:c !important;d:1px}",
        "@media screen and (min-width:10px){a{b:c}}",
        "x[y=\"z\"] , w {\n v: f(1, 2.5e2, u+4??) ;\n}",
        "a { --x: {nested: b} }",
    ] {
        let mut first = parse_stylesheet(&mut TokenStream::from(*source));
        let serialized = first.to_css_string();
        let mut second = parse_stylesheet(&mut TokenStream::from(serialized.as_str()));
        scrub_stylesheet(&mut first);
        scrub_stylesheet(&mut second);
        assert_eq!(first, second, "re-parse diverged for {:?}", source);
    }
}

#[test]
fn stylesheet_spans() {
    let sheet = parse_stylesheet(&mut TokenStream::from("a {\n\tb: c;\n}"));
    let rule = match sheet.rules[0] {
        Rule::QualifiedRule(ref rule) => rule,
        ref other => panic!("expected a qualified rule, got {:?}", other),
    };
    assert_eq!(rule.span.from.line, 1);
    assert_eq!(rule.span.from.column, 1);
    assert_eq!(rule.declarations[0].span.from.line, 2);
}

#[cfg(feature = "serde")]
#[test]
fn tokens_serialize_to_json() {
    let (tokens, _) = tokenize("foo");
    let json = serde_json::to_value(&tokens[0]).unwrap();
    assert_eq!(json["kind"]["Ident"], serde_json::json!("foo"));
    assert_eq!(json["span"]["from"]["line"], serde_json::json!(1));
}
