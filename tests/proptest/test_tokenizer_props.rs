//! Property-based tests for the tokenizer
//!
//! Random input never makes the tokenizer panic, and joining tokens with
//! escaping reads back the same tokens.

use proptest::prelude::*;
use webtty::terminal::{join, quote, tokenize};

proptest! {
    #[test]
    fn test_tokenize_doesnt_panic_on_random_input(s in "\\PC*") {
        let _ = tokenize(&s);
    }

    #[test]
    fn test_tokens_are_never_empty(s in "[a-z \"'\\\\]{0,64}") {
        for token in tokenize(&s) {
            prop_assert!(!token.is_empty());
        }
    }

    #[test]
    fn test_plain_words_split_on_whitespace(words in prop::collection::vec("[a-zA-Z0-9_./-]{1,12}", 0..10)) {
        let line = words.join("  ");
        prop_assert_eq!(tokenize(&line), words);
    }

    #[test]
    fn test_join_then_tokenize_is_identity(tokens in prop::collection::vec("\\PC{1,12}", 0..8)) {
        prop_assert_eq!(tokenize(&join(&tokens)), tokens);
    }

    #[test]
    fn test_quoted_token_is_single(token in "\\PC{1,24}") {
        let tokens = tokenize(&quote(&token));
        prop_assert_eq!(tokens, vec![token]);
    }
}
