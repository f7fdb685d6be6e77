//! Scanner policy behavior over both token sources.

use descent::{
    CaseFolding, Category, Language, MemoryStream, Opcode, ScanPolicy, Scanner, Token,
};
use std::rc::Rc;

fn packed(tokens: &[Token]) -> MemoryStream {
    let mut stream = MemoryStream::new("code");
    for token in tokens {
        token.write_to(&mut stream).unwrap();
    }
    stream.seek_start();
    stream
}

fn tiny_language() -> Rc<Language> {
    let mut lang = Language::with_folding(CaseFolding::Preserve);
    lang.bind("begin", Opcode::from_parts(Category::KEYWORD, 1));
    lang.bind("end", Opcode::from_parts(Category::KEYWORD, 2));
    lang.bind(";", Opcode::from_parts(Category::DELIMITER, 1));
    Rc::new(lang)
}

#[test]
fn test_whitespace_discard_over_code() {
    // [SPACE, IDENT, SPACE, <end>] yields [IDENT, <end>].
    let stream = packed(&[
        Token::plain(Opcode::SPACE),
        Token::symbolic(Opcode::IDENTIFIER, "x"),
        Token::plain(Opcode::SPACE),
    ]);
    let mut scanner = Scanner::over_code(stream, ScanPolicy::default()).unwrap();

    assert_eq!(scanner.current().unwrap().opcode(), Opcode::IDENTIFIER);
    scanner.next().unwrap();
    assert!(scanner.current().unwrap().is_end());
}

#[test]
fn test_whitespace_consolidation_over_code() {
    // Three SPACE records collapse to one current SPACE token.
    let policy = ScanPolicy {
        discard_whitespace: false,
        consolidate_whitespace: true,
        consolidate_line_endings: false,
    };
    let stream = packed(&[
        Token::plain(Opcode::SPACE),
        Token::plain(Opcode::SPACE),
        Token::plain(Opcode::SPACE),
        Token::symbolic(Opcode::IDENTIFIER, "x"),
    ]);
    let mut scanner = Scanner::over_code(stream, policy).unwrap();

    assert_eq!(scanner.current().unwrap().category(), Category::SPACE);
    scanner.next().unwrap();
    assert_eq!(scanner.current().unwrap().category(), Category::IDENTIFIER);
}

#[test]
fn test_line_count_accumulation_over_source() {
    let mut scanner = Scanner::over_source(
        tiny_language(),
        "demo.src",
        "begin\n;\n\nend\n",
        ScanPolicy::default(),
    )
    .unwrap();
    assert_eq!(scanner.line_number(), 1);
    while scanner.continues() {
        scanner.next().unwrap();
    }
    assert_eq!(scanner.line_number(), 5, "four terminators scanned");
}

#[test]
fn test_line_ending_consolidation_over_source() {
    let policy = ScanPolicy {
        consolidate_line_endings: true,
        ..ScanPolicy::default()
    };
    let mut scanner =
        Scanner::over_source(tiny_language(), "demo.src", "begin\n\n\n\nend", policy).unwrap();

    scanner.next().unwrap(); // past 'begin'
    let run = scanner.current().unwrap();
    assert_eq!(run.opcode(), Opcode::EOL);
    assert_eq!(run.line_count(), 4);
    assert_eq!(scanner.line_number(), 5);

    scanner.next().unwrap();
    assert_eq!(
        scanner.current().unwrap().opcode(),
        Opcode::from_parts(Category::KEYWORD, 2)
    );
}

#[test]
fn test_consolidated_line_endings_roundtrip_through_code() {
    // Source-side consolidation must survive the intermediate format.
    let policy = ScanPolicy {
        consolidate_line_endings: true,
        ..ScanPolicy::default()
    };
    let mut source =
        Scanner::over_source(tiny_language(), "demo.src", ";\n\n\n;", policy).unwrap();

    let mut stream = MemoryStream::new("code");
    while source.continues() {
        source.current().unwrap().write_to(&mut stream).unwrap();
        source.next().unwrap();
    }
    stream.seek_start();

    let mut recall = Scanner::over_code(stream, policy).unwrap();
    recall.next().unwrap(); // past ';'
    assert_eq!(recall.current().unwrap().line_count(), 3);
    assert_eq!(recall.line_number(), 4);
}

#[test]
fn test_peek_does_not_advance_either_scanner() {
    let mut source = Scanner::over_source(
        tiny_language(),
        "demo.src",
        "begin end",
        ScanPolicy::default(),
    )
    .unwrap();
    let peeked = source.peek().unwrap();
    assert_eq!(peeked.opcode(), Opcode::from_parts(Category::KEYWORD, 2));
    assert_eq!(
        source.current().unwrap().opcode(),
        Opcode::from_parts(Category::KEYWORD, 1)
    );
    source.next().unwrap();
    assert_eq!(source.current().unwrap().opcode(), peeked.opcode());
}

#[test]
fn test_rewind_then_next_reproduces_token() {
    let mut scanner = Scanner::over_source(
        tiny_language(),
        "demo.src",
        "begin ; end",
        ScanPolicy::default(),
    )
    .unwrap();
    scanner.next().unwrap();
    assert_eq!(scanner.current().unwrap().category(), Category::DELIMITER);

    scanner.rewind().unwrap();
    assert!(scanner.current().is_none());
    scanner.next().unwrap();
    assert_eq!(scanner.current().unwrap().category(), Category::DELIMITER);
}
