//! Tokenizer for definition source files
//!
//! The lexer is tolerant: it never fails, it just produces the
//! best token stream it can. Comments and whitespace are dropped. Malformed
//! input (an unterminated string, a stray byte) degrades into tokens the
//! parser will refuse to evaluate, which is the correct end state for a
//! scanner that must never execute or reject a whole file over one bad
//! expression.

/// A single lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Single- or double-quoted string literal, unescaped
    Str(String),
    /// Backtick template literal; `has_spans` is true if it contains `${`
    Template { text: String, has_spans: bool },
    /// Numeric literal
    Num(f64),
    /// Identifier or keyword (`export`, `const`, `true`, ...)
    Ident(String),
    /// `=>`
    Arrow,
    /// `...`
    Spread,
    /// Any other single punctuation character
    Punct(char),
}

impl Token {
    /// Renders the token back to source-ish text (used to capture type
    /// annotation text for the marker substring check)
    pub fn text(&self) -> String {
        match self {
            Token::Str(s) => format!("\"{}\"", s),
            Token::Template { text, .. } => format!("`{}`", text),
            Token::Num(n) => n.to_string(),
            Token::Ident(s) => s.clone(),
            Token::Arrow => "=>".to_string(),
            Token::Spread => "...".to_string(),
            Token::Punct(c) => c.to_string(),
        }
    }
}

/// Tokenizes a source string; never fails
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Whitespace
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Comments
        if c == '/' && i + 1 < chars.len() {
            match chars[i + 1] {
                '/' => {
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                    }
                    continue;
                }
                '*' => {
                    i += 2;
                    while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                        i += 1;
                    }
                    i = (i + 2).min(chars.len());
                    continue;
                }
                _ => {}
            }
        }

        // String literals
        if c == '\'' || c == '"' {
            let (value, next) = read_string(&chars, i + 1, c);
            tokens.push(Token::Str(value));
            i = next;
            continue;
        }

        // Template literals
        if c == '`' {
            let (text, has_spans, next) = read_template(&chars, i + 1);
            tokens.push(Token::Template { text, has_spans });
            i = next;
            continue;
        }

        // Numbers
        if c.is_ascii_digit() {
            let (value, next) = read_number(&chars, i);
            tokens.push(Token::Num(value));
            i = next;
            continue;
        }

        // Identifiers and keywords
        if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }

        // Multi-character punctuation
        if c == '=' && i + 1 < chars.len() && chars[i + 1] == '>' {
            tokens.push(Token::Arrow);
            i += 2;
            continue;
        }
        if c == '.' && i + 2 < chars.len() && chars[i + 1] == '.' && chars[i + 2] == '.' {
            tokens.push(Token::Spread);
            i += 3;
            continue;
        }

        tokens.push(Token::Punct(c));
        i += 1;
    }

    tokens
}

/// Reads a quoted string body starting after the opening quote.
/// Returns the unescaped value and the index past the closing quote.
fn read_string(chars: &[char], mut i: usize, quote: char) -> (String, usize) {
    let mut value = String::new();

    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            return (value, i + 1);
        }
        if c == '\\' && i + 1 < chars.len() {
            value.push(unescape(chars[i + 1]));
            i += 2;
            continue;
        }
        value.push(c);
        i += 1;
    }

    // Unterminated string: take what we have
    (value, i)
}

/// Reads a template literal body starting after the opening backtick.
/// Tracks `${...}` spans (including nested braces) so the closing backtick
/// is found reliably even when spans contain object literals.
fn read_template(chars: &[char], mut i: usize) -> (String, bool, usize) {
    let mut text = String::new();
    let mut has_spans = false;
    let mut span_depth: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if span_depth == 0 {
            if c == '`' {
                return (text, has_spans, i + 1);
            }
            if c == '\\' && i + 1 < chars.len() {
                text.push(unescape(chars[i + 1]));
                i += 2;
                continue;
            }
            if c == '$' && i + 1 < chars.len() && chars[i + 1] == '{' {
                has_spans = true;
                span_depth = 1;
                text.push_str("${");
                i += 2;
                continue;
            }
        } else {
            if c == '{' {
                span_depth += 1;
            } else if c == '}' {
                span_depth -= 1;
            }
        }

        text.push(c);
        i += 1;
    }

    (text, has_spans, i)
}

/// Reads a numeric literal (decimal, optional fraction and exponent)
fn read_number(chars: &[char], mut i: usize) -> (f64, usize) {
    let start = i;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            i = j;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    let text: String = chars[start..i].iter().collect();
    (text.parse().unwrap_or(0.0), i)
}

/// Resolves a single-character escape sequence
fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_declaration() {
        let tokens = tokenize("export const x = 'hi';");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("export".into()),
                Token::Ident("const".into()),
                Token::Ident("x".into()),
                Token::Punct('='),
                Token::Str("hi".into()),
                Token::Punct(';'),
            ]
        );
    }

    #[test]
    fn skips_comments() {
        let tokens = tokenize("// line\n/* block */ 42");
        assert_eq!(tokens, vec![Token::Num(42.0)]);
    }

    #[test]
    fn string_escapes() {
        let tokens = tokenize(r#"'it\'s' "a\nb""#);
        assert_eq!(
            tokens,
            vec![Token::Str("it's".into()), Token::Str("a\nb".into())]
        );
    }

    #[test]
    fn numbers() {
        let tokens = tokenize("1 2.5 1e3 1.5e-2");
        assert_eq!(
            tokens,
            vec![
                Token::Num(1.0),
                Token::Num(2.5),
                Token::Num(1000.0),
                Token::Num(0.015),
            ]
        );
    }

    #[test]
    fn plain_template_has_no_spans() {
        let tokens = tokenize("`hello world`");
        assert_eq!(
            tokens,
            vec![Token::Template {
                text: "hello world".into(),
                has_spans: false
            }]
        );
    }

    #[test]
    fn interpolated_template_is_flagged() {
        let tokens = tokenize("`hi ${name}`");
        match &tokens[0] {
            Token::Template { has_spans, .. } => assert!(has_spans),
            other => panic!("expected template, got {:?}", other),
        }
    }

    #[test]
    fn template_span_with_nested_braces() {
        // The closing backtick must not be lost inside the span
        let tokens = tokenize("`x ${ { a: 1 } }` 7");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], Token::Num(7.0));
    }

    #[test]
    fn arrow_and_spread() {
        let tokens = tokenize("() => [...] ");
        assert_eq!(
            tokens,
            vec![
                Token::Punct('('),
                Token::Punct(')'),
                Token::Arrow,
                Token::Punct('['),
                Token::Spread,
                Token::Punct(']'),
            ]
        );
    }

    #[test]
    fn unterminated_string_does_not_panic() {
        let tokens = tokenize("'oops");
        assert_eq!(tokens, vec![Token::Str("oops".into())]);
    }
}
