//! Host-style token matching for history rows.
//!
//! The filter text is split on whitespace into tokens; a row matches when
//! every token matches it. A token starting with `-` is negated and must not
//! match. `normal` tokens match as substrings, `fuzzy` tokens as skim-style
//! subsequences.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use regex::{Regex, RegexBuilder};
use rofi_ts_config::MatchingMethod;

/// Decides whether a row's text passes the current filter.
pub trait TokenMatcher {
    fn matches(&self, text: &str) -> bool;
}

enum Pattern {
    Substring(Regex),
    Fuzzy(String),
}

struct Token {
    pattern: Pattern,
    invert: bool,
}

/// Parsed filter tokens.
pub struct Tokens {
    tokens: Vec<Token>,
    fuzzy: SkimMatcherV2,
}

impl Tokens {
    /// Tokenize `input` for the given matching method.
    pub fn parse(input: &str, method: MatchingMethod, case_sensitive: bool) -> Self {
        let tokens = input
            .split_whitespace()
            .filter_map(|word| {
                let (invert, word) = match word.strip_prefix('-') {
                    Some(rest) if !rest.is_empty() => (true, rest),
                    _ => (false, word),
                };
                let pattern = match method {
                    MatchingMethod::Normal => {
                        match RegexBuilder::new(&regex::escape(word))
                            .case_insensitive(!case_sensitive)
                            .build()
                        {
                            Ok(re) => Pattern::Substring(re),
                            Err(e) => {
                                log::warn!("Skipping filter token {:?}: {}", word, e);
                                return None;
                            }
                        }
                    }
                    MatchingMethod::Fuzzy => Pattern::Fuzzy(word.to_string()),
                };
                Some(Token { pattern, invert })
            })
            .collect();

        let fuzzy = if case_sensitive {
            SkimMatcherV2::default().respect_case()
        } else {
            SkimMatcherV2::default().ignore_case()
        };
        Self { tokens, fuzzy }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// An empty filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenMatcher for Tokens {
    fn matches(&self, text: &str) -> bool {
        self.tokens.iter().all(|token| {
            let hit = match &token.pattern {
                Pattern::Substring(re) => re.is_match(text),
                Pattern::Fuzzy(needle) => self.fuzzy.fuzzy_match(text, needle).is_some(),
            };
            hit != token.invert
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(input: &str) -> Tokens {
        Tokens::parse(input, MatchingMethod::Normal, false)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let tokens = normal("   ");
        assert!(tokens.is_empty());
        assert!(tokens.matches("anything"));
    }

    #[test]
    fn test_all_tokens_must_match() {
        let tokens = normal("hel hol");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.matches("hello->hola"));
        assert!(!tokens.matches("hello->bonjour"));
    }

    #[test]
    fn test_case_insensitive_by_default() {
        assert!(normal("HELLO").matches("hello->hola"));
        let sensitive = Tokens::parse("HELLO", MatchingMethod::Normal, true);
        assert!(!sensitive.matches("hello->hola"));
    }

    #[test]
    fn test_negated_token() {
        let tokens = normal("-hola");
        assert!(!tokens.matches("hello->hola"));
        assert!(tokens.matches("cat->gato"));
    }

    #[test]
    fn test_lone_dash_is_literal() {
        assert!(normal("-").matches("a-b"));
        assert!(!normal("-").matches("ab"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(normal("a.b").matches("x a.b y"));
        assert!(!normal("a.b").matches("axb"));
        assert!(normal("o->h").matches("hello->hola"));
    }

    #[test]
    fn test_fuzzy_subsequence() {
        let tokens = Tokens::parse("hlo", MatchingMethod::Fuzzy, false);
        assert!(tokens.matches("hello->hola"));
        assert!(!tokens.matches("cat->gato"));
    }
}
