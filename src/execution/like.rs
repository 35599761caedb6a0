//! LIKE wildcard matching
//!
//! Patterns are anchored at both ends. Metacharacters: `*` matches any run
//! of characters (including empty), `?` exactly one character, `#` one
//! decimal digit, `[abc]` a character class, `[!abc]` a negated class, and
//! `[a-z]` a range inside a class. Each `*` extends greedily to the longest
//! run that still lets the rest of the pattern match.

use crate::error::{Error, Result};

#[derive(Debug)]
enum PatternToken {
    Literal(char),
    AnyOne,
    Digit,
    AnyRun,
    Class { negate: bool, items: Vec<ClassItem> },
}

#[derive(Debug)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

/// Matches `text` against the wildcard `pattern`. Malformed patterns
/// (unclosed `[`, empty class) are errors.
pub fn like_match(text: &str, pattern: &str) -> Result<bool> {
    let tokens = compile(pattern)?;
    let chars: Vec<char> = text.chars().collect();
    Ok(matches(&chars, &tokens))
}

fn compile(pattern: &str) -> Result<Vec<PatternToken>> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => tokens.push(PatternToken::AnyRun),
            '?' => tokens.push(PatternToken::AnyOne),
            '#' => tokens.push(PatternToken::Digit),
            '[' => {
                let negate = chars.peek() == Some(&'!');
                if negate {
                    chars.next();
                }
                let mut items = Vec::new();
                loop {
                    let Some(item) = chars.next() else {
                        return Err(Error::unpositioned(
                            "Unclosed character class in LIKE pattern",
                        ));
                    };
                    if item == ']' {
                        break;
                    }
                    // "a-z" forms a range unless the dash ends the class.
                    if chars.peek() == Some(&'-') {
                        let mut lookahead = chars.clone();
                        lookahead.next();
                        match lookahead.peek() {
                            Some(&end) if end != ']' => {
                                chars.next();
                                chars.next();
                                items.push(ClassItem::Range(item, end));
                                continue;
                            }
                            _ => {}
                        }
                    }
                    items.push(ClassItem::Char(item));
                }
                if items.is_empty() {
                    return Err(Error::unpositioned("Empty character class in LIKE pattern"));
                }
                tokens.push(PatternToken::Class { negate, items });
            }
            literal => tokens.push(PatternToken::Literal(literal)),
        }
    }
    Ok(tokens)
}

fn matches(text: &[char], pattern: &[PatternToken]) -> bool {
    let Some(token) = pattern.first() else {
        return text.is_empty();
    };
    if let PatternToken::AnyRun = token {
        // Greedy: try the longest run first, backtracking as needed.
        return (0..=text.len())
            .rev()
            .any(|consumed| matches(&text[consumed..], &pattern[1..]));
    }
    let Some(&c) = text.first() else {
        return false;
    };
    if !matches_one(c, token) {
        return false;
    }
    matches(&text[1..], &pattern[1..])
}

fn matches_one(c: char, token: &PatternToken) -> bool {
    match token {
        PatternToken::Literal(l) => c == *l,
        PatternToken::AnyOne => true,
        PatternToken::Digit => c.is_ascii_digit(),
        PatternToken::Class { negate, items } => {
            let hit = items.iter().any(|item| match item {
                ClassItem::Char(ch) => c == *ch,
                ClassItem::Range(low, high) => *low <= c && c <= *high,
            });
            hit != *negate
        }
        PatternToken::AnyRun => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_without_wildcards() {
        assert!(like_match("abc", "abc").unwrap());
        assert!(!like_match("abcd", "abc").unwrap());
        assert!(!like_match("ab", "abc").unwrap());
    }

    #[test]
    fn question_mark_matches_exactly_one() {
        assert!(like_match("abc", "a?c").unwrap());
        assert!(!like_match("ac", "a?c").unwrap());
    }

    #[test]
    fn star_matches_any_run() {
        assert!(like_match("abc", "a?c*").unwrap());
        assert!(like_match("aXcZZ", "a?c*").unwrap());
        assert!(like_match("abcd", "a?c*").unwrap());
        assert!(!like_match("ac", "a?c*").unwrap());
        assert!(like_match("", "*").unwrap());
        assert!(like_match("a.b.c", "a*c").unwrap());
    }

    #[test]
    fn hash_matches_one_digit() {
        assert!(like_match("a1", "a#").unwrap());
        assert!(!like_match("ax", "a#").unwrap());
    }

    #[test]
    fn character_classes() {
        assert!(like_match("abc", "[abc]bc").unwrap());
        assert!(!like_match("dbc", "[abc]bc").unwrap());
        assert!(like_match("dbc", "[!abc]bc").unwrap());
        assert!(like_match("mbc", "[a-z]bc").unwrap());
        assert!(!like_match("Mbc", "[a-z]bc").unwrap());
        assert!(like_match("-bc", "[a-]bc").unwrap());
    }

    #[test]
    fn malformed_patterns_are_errors() {
        assert!(like_match("a", "[abc").is_err());
        assert!(like_match("a", "[]a").is_err());
    }

    #[test]
    fn backtracking_star() {
        assert!(like_match("aXbXc", "a*X*c").unwrap());
        assert!(like_match("abbbc", "a*bc").unwrap());
    }
}
