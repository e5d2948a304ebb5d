use std::sync::Arc;

use hazel_base::source_file::{Position, SourceFile};
use proptest::{
    prelude::any,
    prop_assert, prop_assert_eq, proptest,
    strategy::Strategy,
    test_runner::TestCaseResult,
};

use super::{Lexer, Options, State};
use crate::{
    error::LexicalErrorKind,
    token::{
        AttributeKind, CommentKind, KeywordKind, NumericKind, OperatorKind, Token, TokenKind,
    },
};

const RETAIN_COMMENTS: Options = Options {
    retain_comments: true,
};

fn source(content: &str) -> Arc<SourceFile> { SourceFile::from_source(content, "test.hzl") }

/// Lexes the whole source code, the returned list ends with the first end of file token.
fn lex(content: &str, options: Options) -> Vec<Token> {
    let mut lexer = Lexer::with_options(source(content), options);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let is_eof = token.is_eof();
        tokens.push(token);

        if is_eof {
            return tokens;
        }
    }
}

fn kinds(content: &str) -> Vec<TokenKind> {
    lex(content, Options::default())
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

fn expect_error(token: &Token, kind: LexicalErrorKind, span: &str, culprit: &str) {
    let error = token
        .kind
        .as_illegal()
        .unwrap_or_else(|| panic!("expected an illegal token, got {:?}", token.kind));

    assert_eq!(error.kind, kind);
    assert_eq!(error.span.str(), span);
    assert_eq!(error.culprit.str(), culprit);
    assert_eq!(token.span.str(), span);
}

#[test]
fn advance_n_moves_by_characters() {
    let mut lexer = Lexer::new(source("abcdefghijklmnopqrstuvwxyz0123456789"));

    assert_eq!(lexer.advance_n(4), Some('e'));
    assert_eq!(lexer.position(), Position::new(4, 1, 5));
    assert_eq!(lexer.advance_n(4), Some('i'));
    assert_eq!(lexer.position(), Position::new(8, 1, 9));
    assert_eq!(lexer.advance_n(28), None);
    assert_eq!(lexer.position(), Position::new(8, 1, 9));
    assert_eq!(lexer.advance_n(27), Some('9'));
    assert_eq!(lexer.position(), Position::new(35, 1, 36));
}

#[test]
fn advance_n_past_the_end_keeps_the_cursor() {
    let mut lexer = Lexer::new(source("abcdefghijklmnopqrstuvwxyz012345678"));

    assert_eq!(lexer.advance_n(10), Some('k'));
    assert_eq!(lexer.advance_n(10), Some('u'));
    assert_eq!(lexer.advance_n(10), Some('4'));
    assert_eq!(lexer.advance_n(10), None);
    assert_eq!(lexer.position(), Position::new(30, 1, 31));
    assert_eq!(lexer.advance_n(10), None);
    assert_eq!(lexer.position(), Position::new(30, 1, 31));
}

#[test]
fn advance_and_peek() {
    let mut lexer = Lexer::new(source("aé\nb"));

    assert_eq!(lexer.peek(0), Some('a'));
    assert_eq!(lexer.peek(1), Some('é'));
    assert_eq!(lexer.peek(4), None);
    assert_eq!(lexer.position(), Position::default());

    assert_eq!(lexer.advance(), Some('a'));
    assert_eq!(lexer.advance(), Some('é'));
    assert_eq!(lexer.position(), Position::new(3, 1, 3));
    assert_eq!(lexer.advance(), Some('\n'));
    assert_eq!(lexer.position(), Position::new(4, 2, 1));
    assert_eq!(lexer.advance(), Some('b'));
    assert_eq!(lexer.advance(), None);
    assert_eq!(lexer.position(), Position::new(5, 2, 2));
}

#[test]
fn number_then_identifier() {
    let content = "0123456789abcdefghijklmnopqrstuvwxyz";
    let mut lexer = Lexer::new(source(content));

    let number = lexer.next_token();
    assert_eq!(number.kind, TokenKind::Number(NumericKind::Integer));
    assert_eq!(number.text(), "0123456789");

    let identifier = lexer.next_token();
    assert_eq!(identifier.kind, TokenKind::Identifier);
    assert_eq!(identifier.text(), "abcdefghijklmnopqrstuvwxyz");
    assert_eq!(identifier.position, Position::new(10, 1, 11));

    assert!(lexer.next_token().is_eof());
    assert_eq!(lexer.position(), Position::new(36, 1, 37));
}

#[test]
fn line_breaks_are_tokens() {
    let tokens = lex("a\nb\n", Options::default());
    let summary = tokens
        .iter()
        .map(|token| (token.kind.clone(), token.position.line, token.position.column))
        .collect::<Vec<_>>();

    assert_eq!(summary, vec![
        (TokenKind::Identifier, 1, 1),
        (TokenKind::Newline, 1, 2),
        (TokenKind::Identifier, 2, 1),
        (TokenKind::Newline, 2, 2),
        (TokenKind::Eof, 3, 1),
    ]);
}

#[test]
fn unterminated_string_runs_to_the_end() {
    let tokens = lex("\"unterminated", Options::default());

    assert_eq!(tokens.len(), 2);
    expect_error(
        &tokens[0],
        LexicalErrorKind::UnterminatedString,
        "\"unterminated",
        "\"",
    );
    assert!(tokens[1].is_eof());
}

#[test]
fn variable_declaration() {
    assert_eq!(kinds("var x = 10"), vec![
        TokenKind::Keyword(KeywordKind::Var),
        TokenKind::Identifier,
        TokenKind::Operator(OperatorKind::Equal),
        TokenKind::Number(NumericKind::Integer),
        TokenKind::Eof,
    ]);
}

#[test]
fn end_of_file_is_sticky() {
    let mut lexer = Lexer::new(source("x  "));

    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);

    let first = lexer.next_token();
    let second = lexer.next_token();
    assert!(first.is_eof());
    assert_eq!(first, second);
    assert_eq!(first.span.start(), 3);
    assert!(first.span.is_empty());
}

#[test]
fn empty_source() {
    let tokens = lex("", Options::default());

    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
    assert_eq!(tokens[0].position, Position::default());
}

#[test]
fn byte_order_mark_is_skipped() {
    let tokens = lex("\u{feff}func", Options::default());

    assert_eq!(tokens[0].kind, TokenKind::Keyword(KeywordKind::Func));
    assert_eq!(tokens[0].position, Position::new(3, 1, 1));
    assert_eq!(tokens[0].text(), "func");
}

#[test]
fn shebang_line() {
    let tokens = lex("#!/usr/bin/env hazel\nmain", RETAIN_COMMENTS);

    assert_eq!(tokens[0].kind, TokenKind::Comment(CommentKind::Shebang));
    assert_eq!(tokens[0].text(), "#!/usr/bin/env hazel");
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);

    assert_eq!(kinds("#!hazel\nmain"), vec![
        TokenKind::Newline,
        TokenKind::Identifier,
        TokenKind::Eof
    ]);

    // only the very first line can be a shebang
    assert_eq!(kinds("x #!"), vec![
        TokenKind::Identifier,
        TokenKind::Operator(OperatorKind::Hash),
        TokenKind::Operator(OperatorKind::Exclamation),
        TokenKind::Eof
    ]);
}

#[test]
fn comments() {
    let content = "a // line\n/* block\n */ b";

    assert_eq!(kinds(content), vec![
        TokenKind::Identifier,
        TokenKind::Newline,
        TokenKind::Identifier,
        TokenKind::Eof
    ]);

    let tokens = lex(content, RETAIN_COMMENTS);
    assert_eq!(tokens[1].kind, TokenKind::Comment(CommentKind::Line));
    assert_eq!(tokens[1].text(), "// line");
    assert_eq!(tokens[3].kind, TokenKind::Comment(CommentKind::Delimited));
    assert_eq!(tokens[3].text(), "/* block\n */");
    assert_eq!(tokens[4].position, Position::new(23, 3, 5));
}

#[test]
fn delimited_comments_do_not_nest() {
    let tokens = lex("/* a /* b */ c */", RETAIN_COMMENTS);
    let kinds = tokens
        .iter()
        .map(|token| token.kind.clone())
        .collect::<Vec<_>>();

    assert_eq!(kinds, vec![
        TokenKind::Comment(CommentKind::Delimited),
        TokenKind::Identifier,
        TokenKind::Operator(OperatorKind::Star),
        TokenKind::Operator(OperatorKind::Slash),
        TokenKind::Eof,
    ]);
    assert_eq!(tokens[0].text(), "/* a /* b */");
}

#[test]
fn unterminated_comment() {
    // reported even when comments are discarded
    let tokens = lex("x /* abc\n", Options::default());

    assert_eq!(tokens.len(), 3);
    expect_error(
        &tokens[1],
        LexicalErrorKind::UnterminatedComment,
        "/* abc\n",
        "/*",
    );
    assert!(tokens[2].is_eof());
}

#[test]
fn numbers() {
    let cases = [
        ("42", NumericKind::Integer),
        ("1_000", NumericKind::Integer),
        ("3.14", NumericKind::Float),
        ("1e10", NumericKind::Float),
        ("2.5E-3", NumericKind::Float),
        ("6e+2", NumericKind::Float),
        ("0xFF_ff", NumericKind::Hexadecimal),
        ("0XAB", NumericKind::Hexadecimal),
        ("0o17", NumericKind::Octal),
        ("0b1010", NumericKind::Binary),
        // the digits of a prefixed literal are checked later
        ("0b123", NumericKind::Binary),
        ("1.2.3", NumericKind::Float),
    ];

    for (content, kind) in cases {
        let tokens = lex(content, Options::default());

        assert_eq!(tokens.len(), 2, "{content}");
        assert_eq!(tokens[0].kind, TokenKind::Number(kind), "{content}");
        assert_eq!(tokens[0].text(), content);
    }
}

#[test]
fn dots_after_numbers() {
    assert_eq!(kinds("1..2"), vec![
        TokenKind::Number(NumericKind::Integer),
        TokenKind::Operator(OperatorKind::DotDot),
        TokenKind::Number(NumericKind::Integer),
        TokenKind::Eof,
    ]);

    assert_eq!(kinds("1.len"), vec![
        TokenKind::Number(NumericKind::Integer),
        TokenKind::Operator(OperatorKind::Dot),
        TokenKind::Identifier,
        TokenKind::Eof,
    ]);

    // an exponent needs digits
    let tokens = lex("1e", Options::default());
    assert_eq!(tokens[0].kind, TokenKind::Number(NumericKind::Integer));
    assert_eq!(tokens[0].text(), "1");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].text(), "e");
}

#[test]
fn string_escapes() {
    let tokens = lex(r#""a\tb\u{1F600}\x41\e\\\"""#, Options::default());

    assert_eq!(
        tokens[0].kind,
        TokenKind::String("a\tb\u{1F600}A\u{1b}\\\"".to_string())
    );
    assert!(tokens[1].is_eof());

    let tokens = lex(r#""\?\1\7" '\3'"#, Options::default());
    assert_eq!(tokens[0].kind, TokenKind::String("?\u{01}\u{07}".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::Character('\u{03}'));

    // only `\1` through `\7` are digit escapes
    let tokens = lex(r#""\8""#, Options::default());
    expect_error(&tokens[0], LexicalErrorKind::InvalidEscape, r#""\8""#, r"\8");
}

#[test]
fn invalid_escapes() {
    let tokens = lex(r#""a\qb" x"#, Options::default());
    expect_error(
        &tokens[0],
        LexicalErrorKind::InvalidEscape,
        r#""a\qb""#,
        r"\q",
    );
    assert_eq!(tokens[1].kind, TokenKind::Identifier);

    // only ASCII can be written with `\x`
    let tokens = lex(r#""\xFF""#, Options::default());
    expect_error(
        &tokens[0],
        LexicalErrorKind::InvalidEscape,
        r#""\xFF""#,
        r"\xFF",
    );

    let tokens = lex(r#""\u{110000}" "\u{}" "\u{1234567}""#, Options::default());
    for token in &tokens[..3] {
        assert_eq!(
            token.kind.as_illegal().map(|error| error.kind),
            Some(LexicalErrorKind::InvalidEscape)
        );
    }
}

#[test]
fn unterminated_string_wins_over_invalid_escape() {
    let tokens = lex("\"\\q\nx", Options::default());

    expect_error(&tokens[0], LexicalErrorKind::UnterminatedString, "\"\\q", "\"");
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn string_stops_at_line_break() {
    let tokens = lex("\"abc\n\"def\"", Options::default());

    expect_error(&tokens[0], LexicalErrorKind::UnterminatedString, "\"abc", "\"");
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].kind, TokenKind::String("def".to_string()));
}

#[test]
fn character_literals() {
    assert_eq!(kinds(r"'a' '\n' 'é' '\u{41}'"), vec![
        TokenKind::Character('a'),
        TokenKind::Character('\n'),
        TokenKind::Character('é'),
        TokenKind::Character('A'),
        TokenKind::Eof,
    ]);
}

#[test]
fn character_literal_errors() {
    let tokens = lex("'' 'ab' '\\q' 'a\n'", Options::default());

    expect_error(
        &tokens[0],
        LexicalErrorKind::EmptyCharacterLiteral,
        "''",
        "''",
    );
    expect_error(
        &tokens[1],
        LexicalErrorKind::MultiCharacterLiteral,
        "'ab'",
        "b",
    );
    expect_error(&tokens[2], LexicalErrorKind::InvalidEscape, "'\\q'", "\\q");
    expect_error(&tokens[3], LexicalErrorKind::UnterminatedChar, "'a", "'");
    assert_eq!(tokens[4].kind, TokenKind::Newline);
    expect_error(&tokens[5], LexicalErrorKind::UnterminatedChar, "'", "'");
    assert!(tokens[6].is_eof());
}

#[test]
fn operators_take_the_longest_match() {
    assert_eq!(kinds("<<= << <- < ... .. . :: := &^ && &= -> => >>="), vec![
        TokenKind::Operator(OperatorKind::ShiftLeftEqual),
        TokenKind::Operator(OperatorKind::ShiftLeft),
        TokenKind::Operator(OperatorKind::LeftArrow),
        TokenKind::Operator(OperatorKind::Less),
        TokenKind::Operator(OperatorKind::Ellipsis),
        TokenKind::Operator(OperatorKind::DotDot),
        TokenKind::Operator(OperatorKind::Dot),
        TokenKind::Operator(OperatorKind::ColonColon),
        TokenKind::Operator(OperatorKind::ColonEqual),
        TokenKind::Operator(OperatorKind::AmpersandCaret),
        TokenKind::Operator(OperatorKind::AmpersandAmpersand),
        TokenKind::Operator(OperatorKind::AmpersandEqual),
        TokenKind::Operator(OperatorKind::RightArrow),
        TokenKind::Operator(OperatorKind::FatArrow),
        TokenKind::Operator(OperatorKind::ShiftRightEqual),
        TokenKind::Eof,
    ]);

    assert_eq!(kinds("a+++b"), vec![
        TokenKind::Identifier,
        TokenKind::Operator(OperatorKind::PlusPlus),
        TokenKind::Operator(OperatorKind::Plus),
        TokenKind::Identifier,
        TokenKind::Eof,
    ]);
}

#[test]
fn unexpected_characters() {
    let tokens = lex("a $ b`", Options::default());

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    expect_error(&tokens[1], LexicalErrorKind::UnexpectedCharacter, "$", "$");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    expect_error(&tokens[3], LexicalErrorKind::UnexpectedCharacter, "`", "`");
    assert!(tokens[4].is_eof());
}

#[test]
fn macros_and_attributes() {
    let tokens = lex("@assert [inline] [x] [noreturn @", Options::default());
    let kinds = tokens
        .iter()
        .map(|token| token.kind.clone())
        .collect::<Vec<_>>();

    assert_eq!(kinds[..7], [
        TokenKind::Macro,
        TokenKind::Attribute(AttributeKind::Inline),
        TokenKind::Operator(OperatorKind::LeftBracket),
        TokenKind::Identifier,
        TokenKind::Operator(OperatorKind::RightBracket),
        TokenKind::Operator(OperatorKind::LeftBracket),
        TokenKind::Identifier,
    ]);
    assert_eq!(tokens[0].text(), "@assert");
    assert_eq!(tokens[1].text(), "[inline]");
    expect_error(&tokens[7], LexicalErrorKind::UnexpectedCharacter, "@", "@");
    assert!(tokens[8].is_eof());
}

#[test]
fn nest_level_follows_braces() {
    let mut lexer = Lexer::new(source("{ { } } }"));
    let mut levels = Vec::new();

    while !lexer.next_token().is_eof() {
        levels.push(lexer.nest_level());
    }

    assert_eq!(levels, vec![1, 2, 1, 0, -1]);
}

#[test]
fn state_is_reset_between_tokens() {
    let mut lexer = Lexer::with_options(source("\"a\" /* b */ @c"), RETAIN_COMMENTS);

    while !lexer.next_token().is_eof() {
        assert_eq!(lexer.state(), State::Default);
        assert!(!lexer.is_inside_string());
    }
}

#[test]
fn positions_count_characters() {
    let tokens = lex("ab\n  cé d\r\ne", Options::default());
    let positions = tokens
        .iter()
        .map(|token| token.position)
        .collect::<Vec<_>>();

    assert_eq!(positions, vec![
        Position::new(0, 1, 1),
        Position::new(2, 1, 3),
        Position::new(5, 2, 3),
        Position::new(9, 2, 6),
        Position::new(11, 2, 8),
        Position::new(12, 3, 1),
        Position::new(13, 3, 2),
    ]);
}

/// Drains the lexer and checks the properties every token list has.
fn check_token_list(content: &str) -> TestCaseResult {
    let source_file = source(content);
    let mut lexer = Lexer::with_options(source_file.clone(), RETAIN_COMMENTS);
    let has_byte_order_mark = content.starts_with('\u{feff}');

    let mut previous_end = lexer.position().offset;
    let mut nest_level = 0;

    loop {
        let token = lexer.next_token();

        prop_assert_eq!(lexer.state(), State::Default);
        prop_assert!(token.span.start() >= previous_end);
        prop_assert_eq!(token.span.end(), lexer.position().offset);

        // only whitespace is skipped between tokens
        let gap = &content[previous_end..token.span.start()];
        prop_assert!(gap.chars().all(|x| x != '\n' && x.is_whitespace()));

        if token.is_eof() {
            prop_assert!(token.span.is_empty());
            break;
        }

        prop_assert!(!token.span.is_empty());
        if !has_byte_order_mark {
            prop_assert_eq!(
                Some(token.position),
                source_file.get_position(token.span.start())
            );
        }

        match token.kind {
            TokenKind::Operator(OperatorKind::LeftBrace) => nest_level += 1,
            TokenKind::Operator(OperatorKind::RightBrace) => nest_level -= 1,
            _ => {}
        }

        previous_end = token.span.end();
    }

    prop_assert_eq!(lexer.position().offset, content.len());
    prop_assert_eq!(lexer.position().line, content.matches('\n').count() + 1);
    prop_assert_eq!(lexer.nest_level(), nest_level);

    let position = lexer.position();
    prop_assert!(lexer.next_token().is_eof());
    prop_assert_eq!(lexer.position(), position);

    Ok(())
}

proptest! {
    #[test]
    fn any_text_is_tokenized(
        content in proptest::collection::vec(any::<char>(), 0..64)
            .prop_map(|characters| characters.into_iter().collect::<String>())
    ) {
        check_token_list(&content)?;
    }

    #[test]
    fn punctuation_heavy_text_is_tokenized(
        content in r#"[a-z0-9 \n\r\t"'/*@\[\]{}().+=<>!#_\\-]{0,64}"#
    ) {
        check_token_list(&content)?;
    }
}
