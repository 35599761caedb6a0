//! SQL lexer: character stream to token stream
//!
//! Keywords match case-insensitively; identifiers preserve their case.
//! Strings are single- or double-quoted with backslash escapes, dates are
//! `#YYYY-MM-DD#`. Whitespace is skipped and never emitted. A character the
//! lexer does not recognize becomes a `Garbage` token, which forces an
//! "Expected ..." error once the parser reaches it.

use chrono::NaiveDate;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// A lexed token: its kind plus the byte offset where it starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    Bool(bool),

    Equal,        // =
    NotEqual,     // !=
    GreaterThan,  // >
    LessThan,     // <
    GreaterEqual, // >=
    LessEqual,    // <=
    Plus,         // +
    Minus,        // -
    Asterisk,     // *
    Slash,        // /

    Comma,        // ,
    OpenParen,    // (
    CloseParen,   // )
    OpenBracket,  // [
    CloseBracket, // ]
    Semicolon,    // ;
    Period,       // .

    /// An unrecognized character; poisons the parse at its position.
    Garbage(char),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "{}", keyword),
            TokenKind::Ident(ident) => write!(f, "{}", ident),
            TokenKind::Int(i) => write!(f, "{}", i),
            TokenKind::Float(v) => write!(f, "{}", v),
            TokenKind::Str(s) => write!(f, "'{}'", s),
            TokenKind::Date(d) => write!(f, "#{}#", d),
            TokenKind::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            TokenKind::Equal => write!(f, "="),
            TokenKind::NotEqual => write!(f, "!="),
            TokenKind::GreaterThan => write!(f, ">"),
            TokenKind::LessThan => write!(f, "<"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::OpenBracket => write!(f, "["),
            TokenKind::CloseBracket => write!(f, "]"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Period => write!(f, "."),
            TokenKind::Garbage(c) => write!(f, "{}", c),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// Recognized SQL keywords. Type names (INT, VARCHAR, ...) are not keywords;
/// they lex as identifiers and are resolved in column declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Add,
    All,
    Alter,
    And,
    As,
    Asc,
    Between,
    By,
    Case,
    Check,
    Column,
    Constraint,
    Create,
    Cross,
    Default,
    Delete,
    Desc,
    Distinct,
    Drop,
    Else,
    End,
    Engine,
    Exists,
    Foreign,
    From,
    Full,
    Group,
    Having,
    If,
    Import,
    In,
    Inner,
    Insert,
    Into,
    Is,
    Join,
    Key,
    Left,
    Like,
    Match,
    Not,
    Null,
    On,
    Or,
    Order,
    Outer,
    Over,
    Partition,
    Perc,
    Primary,
    Print,
    References,
    Right,
    Select,
    Set,
    Show,
    Table,
    Tables,
    Then,
    Top,
    Truncate,
    Union,
    Unique,
    Update,
    Values,
    When,
    Where,
}

impl Keyword {
    fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_str() {
            "ADD" => Keyword::Add,
            "ALL" => Keyword::All,
            "ALTER" => Keyword::Alter,
            "AND" => Keyword::And,
            "AS" => Keyword::As,
            "ASC" => Keyword::Asc,
            "BETWEEN" => Keyword::Between,
            "BY" => Keyword::By,
            "CASE" => Keyword::Case,
            "CHECK" => Keyword::Check,
            "COLUMN" => Keyword::Column,
            "CONSTRAINT" => Keyword::Constraint,
            "CREATE" => Keyword::Create,
            "CROSS" => Keyword::Cross,
            "DEFAULT" => Keyword::Default,
            "DELETE" => Keyword::Delete,
            "DESC" => Keyword::Desc,
            "DISTINCT" => Keyword::Distinct,
            "DROP" => Keyword::Drop,
            "ELSE" => Keyword::Else,
            "END" => Keyword::End,
            "ENGINE" => Keyword::Engine,
            "EXISTS" => Keyword::Exists,
            "FOREIGN" => Keyword::Foreign,
            "FROM" => Keyword::From,
            "FULL" => Keyword::Full,
            "GROUP" => Keyword::Group,
            "HAVING" => Keyword::Having,
            "IF" => Keyword::If,
            "IMPORT" => Keyword::Import,
            "IN" => Keyword::In,
            "INNER" => Keyword::Inner,
            "INSERT" => Keyword::Insert,
            "INTO" => Keyword::Into,
            "IS" => Keyword::Is,
            "JOIN" => Keyword::Join,
            "KEY" => Keyword::Key,
            "LEFT" => Keyword::Left,
            "LIKE" => Keyword::Like,
            "MATCH" => Keyword::Match,
            "NOT" => Keyword::Not,
            "NULL" => Keyword::Null,
            "ON" => Keyword::On,
            "OR" => Keyword::Or,
            "ORDER" => Keyword::Order,
            "OUTER" => Keyword::Outer,
            "OVER" => Keyword::Over,
            "PARTITION" => Keyword::Partition,
            "PERC" => Keyword::Perc,
            "PRIMARY" => Keyword::Primary,
            "PRINT" => Keyword::Print,
            "REFERENCES" => Keyword::References,
            "RIGHT" => Keyword::Right,
            "SELECT" => Keyword::Select,
            "SET" => Keyword::Set,
            "SHOW" => Keyword::Show,
            "TABLE" => Keyword::Table,
            "TABLES" => Keyword::Tables,
            "THEN" => Keyword::Then,
            "TOP" => Keyword::Top,
            "TRUNCATE" => Keyword::Truncate,
            "UNION" => Keyword::Union,
            "UNIQUE" => Keyword::Unique,
            "UPDATE" => Keyword::Update,
            "VALUES" => Keyword::Values,
            "WHEN" => Keyword::When,
            "WHERE" => Keyword::Where,
            _ => return None,
        })
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_uppercase())
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Lexes the whole input. The returned vector always ends with an Eof
    /// token, so the parser can index past the last real token safely.
    pub fn lex(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(&(offset, c)) = self.chars.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    offset: self.source.len(),
                });
                return tokens;
            };
            let kind = self.scan_token(c);
            tokens.push(Token { kind, offset });
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .chars
            .peek()
            .is_some_and(|&(_, c)| c.is_whitespace())
        {
            self.chars.next();
        }
    }

    fn scan_token(&mut self, first: char) -> TokenKind {
        match first {
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            '\'' | '"' => self.scan_string(first),
            '#' => self.scan_date(),
            _ => self.scan_symbol(first),
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut text = String::new();
        let mut is_float = false;
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.chars.next();
            } else if c == '.' && !is_float {
                // Only a digit after the dot makes this a float; otherwise
                // the dot is a separate Period token (e.g. "t.c").
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if !lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
                    break;
                }
                is_float = true;
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if is_float {
            match text.parse() {
                Ok(value) => TokenKind::Float(value),
                Err(_) => TokenKind::Garbage('.'),
            }
        } else {
            match text.parse() {
                Ok(value) => TokenKind::Int(value),
                Err(_) => TokenKind::Garbage('0'),
            }
        }
    }

    fn scan_word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        match text.to_uppercase().as_str() {
            "TRUE" => return TokenKind::Bool(true),
            "FALSE" => return TokenKind::Bool(false),
            _ => {}
        }
        match Keyword::from_str(&text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident(text),
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.chars.next(); // opening quote
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return TokenKind::Str(text),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, c)) => text.push(c),
                    None => return TokenKind::Garbage(quote),
                },
                Some((_, c)) => text.push(c),
                // Unterminated string.
                None => return TokenKind::Garbage(quote),
            }
        }
    }

    fn scan_date(&mut self) -> TokenKind {
        self.chars.next(); // opening '#'
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some((_, '#')) => break,
                Some((_, c)) => text.push(c),
                None => return TokenKind::Garbage('#'),
            }
        }
        match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
            Ok(date) => TokenKind::Date(date),
            Err(_) => TokenKind::Garbage('#'),
        }
    }

    fn scan_symbol(&mut self, first: char) -> TokenKind {
        self.chars.next();
        let followed_by_equal = self.chars.peek().is_some_and(|&(_, c)| c == '=');
        match first {
            '=' => TokenKind::Equal,
            '!' if followed_by_equal => {
                self.chars.next();
                TokenKind::NotEqual
            }
            '>' if followed_by_equal => {
                self.chars.next();
                TokenKind::GreaterEqual
            }
            '>' => TokenKind::GreaterThan,
            '<' if followed_by_equal => {
                self.chars.next();
                TokenKind::LessEqual
            }
            '<' => TokenKind::LessThan,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            ',' => TokenKind::Comma,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Period,
            other => TokenKind::Garbage(other),
        }
    }
}
