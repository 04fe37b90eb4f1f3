use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::parser::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    LParen,
    RParen,
    Comma,

    Select,
    From,
    Where,
    Group,
    By,
    Join,
    On,
    As,
    And,
    Or,
    Not,
    Is,
    Null,
    In,
    Distinct,
    True,
    False,

    Identifier,
    Number,
    String,
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "select" => TokenKind::Select,
            "from" => TokenKind::From,
            "where" => TokenKind::Where,
            "group" => TokenKind::Group,
            "by" => TokenKind::By,
            "join" => TokenKind::Join,
            "on" => TokenKind::On,
            "as" => TokenKind::As,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "is" => TokenKind::Is,
            "null" => TokenKind::Null,
            "in" => TokenKind::In,
            "distinct" => TokenKind::Distinct,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        };
        Some(kind)
    }

    fn operator(symbol: &str) -> Option<TokenKind> {
        let kind = match symbol {
            "+" => TokenKind::Plus,
            "-" => TokenKind::Minus,
            "*" => TokenKind::Star,
            "/" => TokenKind::Slash,
            "%" => TokenKind::Percent,
            "=" | "==" => TokenKind::Eq,
            "!=" | "<>" => TokenKind::NotEq,
            ">" => TokenKind::Gt,
            "<" => TokenKind::Lt,
            ">=" => TokenKind::GtEq,
            "<=" => TokenKind::LtEq,
            "(" => TokenKind::LParen,
            ")" => TokenKind::RParen,
            "," => TokenKind::Comma,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Literal payload carried by number and string tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text; lowercased for identifiers and keywords.
    pub text: String,
    pub value: TokenValue,
    /// Byte offset into the query text.
    pub position: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

// Alternatives are tried left to right, so two-character operators come
// before their one-character prefixes.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?P<ws>\s+)",
        r"|(?P<num>[0-9]+\b)",
        r#"|(?P<str>"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')"#,
        r"|(?P<word>[A-Za-z_][A-Za-z_0-9]*(?:\.[A-Za-z_][A-Za-z_0-9]*)*)",
        r"|(?P<op>!=|<>|>=|<=|==|[-+*/%=<>(),])",
        r")"
    ))
    .expect("token pattern is valid")
});

/// Split query text into tokens. There is no end-of-input token; callers
/// detect exhaustion.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < text.len() {
        let rest = &text[position..];
        let Some(caps) = TOKEN_RE.captures(rest) else {
            let bad: String = rest.chars().take(1).collect();
            return Err(LexError::new("unexpected character", position, &bad));
        };
        let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();

        if caps.name("ws").is_none() {
            tokens.push(build_token(&caps, matched, position)?);
        }
        position += matched.len();
    }

    trace!(count = tokens.len(), "tokenized query");
    Ok(tokens)
}

fn build_token(caps: &regex::Captures<'_>, matched: &str, position: usize) -> Result<Token, LexError> {
    if caps.name("num").is_some() {
        let n: i64 = matched
            .parse()
            .map_err(|_| LexError::new("integer literal out of range", position, matched))?;
        return Ok(Token { kind: TokenKind::Number, text: matched.to_string(), value: TokenValue::Int(n), position });
    }

    if caps.name("str").is_some() {
        let body = &matched[1..matched.len() - 1];
        return Ok(Token {
            kind: TokenKind::String,
            text: matched.to_string(),
            value: TokenValue::Str(unescape(body)),
            position,
        });
    }

    if caps.name("word").is_some() {
        let word = matched.to_ascii_lowercase();
        let kind = TokenKind::keyword(&word).unwrap_or(TokenKind::Identifier);
        return Ok(Token { kind, text: word, value: TokenValue::None, position });
    }

    let kind = TokenKind::operator(matched).ok_or_else(|| LexError::new("unexpected operator", position, matched))?;
    Ok(Token { kind, text: matched.to_string(), value: TokenValue::None, position })
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
