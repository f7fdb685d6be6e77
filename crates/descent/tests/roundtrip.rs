//! Intermediate-code round-trip properties.
//!
//! These tests pin the universal invariants of the binary token format:
//! category derivation by masking, exact payload reproduction, synthesis
//! of the end-of-stream token, and return-to-source idempotence.

use descent::{
    Category, MemoryStream, Opcode, ScopeId, StreamError, SymbolRef, Token, CATEGORY_MASK,
    MAX_RECORD_LEN,
};

fn packed(tokens: &[Token]) -> MemoryStream {
    let mut stream = MemoryStream::new("code");
    for token in tokens {
        token.write_to(&mut stream).unwrap();
    }
    stream.seek_start();
    stream
}

#[test]
fn test_category_is_always_the_masked_opcode() {
    let tokens = [
        Token::plain(Opcode::from_parts(Category::KEYWORD, 0x11)),
        Token::symbolic(Opcode::NUMBER, "7"),
        Token::line_ending(2),
        Token::stream_end(),
    ];
    for token in &tokens {
        assert_eq!(token.category().raw(), token.opcode().raw() & CATEGORY_MASK);
    }
}

#[test]
fn test_generic_tokens_roundtrip() {
    let opcodes = [
        Opcode::from_parts(Category::KEYWORD, 1),
        Opcode::from_parts(Category::OPERATOR, 0x7F),
        Opcode::from_parts(Category::DELIMITER, 3),
        Opcode::SPACE,
        Opcode::from_parts(Category::USER, 0xFFFF),
    ];
    let tokens: Vec<Token> = opcodes.iter().map(|op| Token::plain(*op)).collect();
    let mut stream = packed(&tokens);

    for expected in &opcodes {
        let token = Token::read_from(&mut stream).unwrap();
        assert_eq!(token.opcode(), *expected);
    }
    assert!(Token::read_from(&mut stream).unwrap().is_end());
}

#[test]
fn test_symbolic_token_roundtrips_reference_exactly() {
    let reference = SymbolRef::new(ScopeId::new(3), 41);
    let mut token = Token::symbolic(Opcode::STRING, "payload");
    token.set_symbol_ref(reference);

    let mut stream = packed(std::slice::from_ref(&token));
    let back = Token::read_from(&mut stream).unwrap();
    assert_eq!(back.opcode(), Opcode::STRING);
    assert_eq!(back.symbol_ref(), Some(reference));
}

#[test]
fn test_unplaced_reference_roundtrips_as_none() {
    let token = Token::symbolic(Opcode::IDENTIFIER, "x");
    let mut stream = packed(std::slice::from_ref(&token));
    let back = Token::read_from(&mut stream).unwrap();
    assert_eq!(back.symbol_ref(), Some(SymbolRef::NONE));
}

#[test]
fn test_line_ending_roundtrips_count() {
    for count in [1u32, 2, 17, 40_000] {
        let mut stream = packed(&[Token::line_ending(count)]);
        let back = Token::read_from(&mut stream).unwrap();
        assert_eq!(back.opcode(), Opcode::EOL);
        assert_eq!(back.line_count(), count);
    }
}

#[test]
fn test_silencing_is_not_persisted() {
    let mut token = Token::plain(Opcode::from_parts(Category::KEYWORD, 5));
    token.silence(true);
    let mut stream = packed(std::slice::from_ref(&token));
    let back = Token::read_from(&mut stream).unwrap();
    assert!(!back.is_silenced());
}

#[test]
fn test_stream_end_after_last_record() {
    let mut stream = packed(&[Token::plain(Opcode::from_parts(Category::KEYWORD, 1))]);
    Token::read_from(&mut stream).unwrap();
    let end = Token::read_from(&mut stream).unwrap();
    assert!(end.is_end());
    assert_eq!(end.opcode(), Opcode::EOS);
    // The end state never produces anything else.
    assert!(Token::read_from(&mut stream).unwrap().is_end());
}

#[test]
fn test_return_to_source_is_idempotent() {
    let reference = SymbolRef::new(ScopeId::GLOBAL, 9);
    let mut symbolic = Token::symbolic(Opcode::IDENTIFIER, "x");
    symbolic.set_symbol_ref(reference);
    let tokens = [
        Token::plain(Opcode::from_parts(Category::OPERATOR, 2)),
        symbolic,
        Token::line_ending(3),
    ];
    let mut stream = packed(&tokens);

    for _ in 0..tokens.len() {
        let first = Token::read_from(&mut stream).unwrap();
        let copy = first.clone();
        first.return_to(&mut stream).unwrap();
        let second = Token::read_from(&mut stream).unwrap();
        assert_eq!(copy, second);
    }
}

#[test]
fn test_record_sizes_fit_the_rewind_guarantee() {
    let mut symbolic = Token::symbolic(Opcode::NUMBER, "1");
    symbolic.set_symbol_ref(SymbolRef::new(ScopeId::GLOBAL, 0));
    assert_eq!(Token::plain(Opcode::SPACE).streaming_len(), 4);
    assert_eq!(symbolic.streaming_len(), MAX_RECORD_LEN);
    assert_eq!(Token::line_ending(1).streaming_len(), 8);
    assert_eq!(Token::stream_end().streaming_len(), 0);
}

#[test]
fn test_partial_trailing_record_is_reported() {
    let mut bytes = packed(&[Token::line_ending(9)]).into_bytes();
    bytes.truncate(5);
    let mut stream = MemoryStream::from_bytes("code", bytes);
    assert!(matches!(
        Token::read_from(&mut stream),
        Err(StreamError::Truncated { .. })
    ));
}
