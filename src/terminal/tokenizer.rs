//! Command Line Tokenization
//!
//! Splits a raw input line into an argument vector, honouring single and
//! double quotes and backslash escapes. Malformed input (an open quote, a
//! trailing backslash) never fails: whatever was collected is kept.

/// Character that escapes the next character
const ESCAPE: char = '\\';

/// Quote characters recognised by the tokenizer
const QUOTES: [char; 2] = ['\'', '"'];

/// Scanner state carried across characters
#[derive(Debug, Default)]
struct Scanner {
    /// Completed tokens
    tokens: Vec<String>,
    /// Token being built
    current: String,
    /// Next character is taken literally
    escaping: bool,
    /// Quote character of the open quoted region, if any
    quote: Option<char>,
}

impl Scanner {
    fn feed(&mut self, ch: char) {
        if self.escaping {
            self.current.push(ch);
            self.escaping = false;
            return;
        }

        if ch == ESCAPE {
            self.escaping = true;
            return;
        }

        if QUOTES.contains(&ch) {
            match self.quote {
                None => self.quote = Some(ch),
                Some(open) if open == ch => self.quote = None,
                Some(_) => self.current.push(ch),
            }
            return;
        }

        if self.quote.is_some() {
            self.current.push(ch);
            return;
        }

        if ch.is_whitespace() {
            self.close_token();
            return;
        }

        self.current.push(ch);
    }

    fn close_token(&mut self) {
        if !self.current.is_empty() {
            self.tokens.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<String> {
        // A dangling escape or open quote just ends the token as-is
        self.close_token();
        self.tokens
    }
}

/// Split `input` into tokens.
///
/// The first token is the command name, the rest are its arguments. Empty or
/// whitespace-only input yields an empty vector.
///
/// ```
/// use webtty::terminal::tokenize;
///
/// assert_eq!(tokenize(r#"echo "hello world" it\'s"#), vec!["echo", "hello world", "it's"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let mut scanner = Scanner::default();
    for ch in input.chars() {
        scanner.feed(ch);
    }
    scanner.finish()
}

/// Escape a single token so that [`tokenize`] reads it back unchanged.
///
/// Whitespace, quotes and backslashes are prefixed with a backslash; all other
/// characters pass through. An empty token has no representation and comes
/// back empty.
pub fn quote(token: &str) -> String {
    let mut quoted = String::with_capacity(token.len());
    for ch in token.chars() {
        if needs_escape(ch) {
            quoted.push(ESCAPE);
        }
        quoted.push(ch);
    }
    quoted
}

/// Join tokens into a single line, escaping each one with [`quote`]
pub fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|token| quote(token.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn needs_escape(ch: char) -> bool {
    ch == ESCAPE || QUOTES.contains(&ch) || ch.is_whitespace()
}
