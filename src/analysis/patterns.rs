// ============================================================
// Layer 4b — Pattern Analyzer
// ============================================================
// Deterministic corpus statistics, independent of the model.
//
// Per password p:
//   mask      X = letter, D = digit, S = one of !@#$%^&*()-_=+,
//             _ = anything else            "Pass123!" → "XXXXDDDS"
//   numbers   +1 per distinct digit in p (not per occurrence)
//   words     +1 per substring of 3..=7 characters, overlapping
//             windows counted separately
//   mutation  +1 for p if the leet table changes it
//   zigzag    +1 if p has both an upper- and a lower-case letter
//
// Substrings are taken over chars, not bytes, so multi-byte
// passwords never split a code point.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::corpus::Corpus;
use crate::domain::report::PatternReport;

/// Symbols that count as `S` in a mask.
pub const SPECIALS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '_', '=', '+'];

/// Shortest and longest substring recorded in `words`.
pub const MIN_WORD: usize = 3;
pub const MAX_WORD: usize = 7;

/// Any Unicode numeric character: decimal digits, but also
/// fractions and other numerals such as '½'.
fn is_digit(c: char) -> bool {
    c.is_numeric()
}

/// Leet substitution: look-alike digit/symbol → letter.
fn unleet(c: char) -> char {
    match c {
        '0' => 'o',
        '1' => 'i',
        '@' => 'a',
        '$' => 's',
        '3' => 'e',
        '5' => 's',
        '7' => 't',
        other => other,
    }
}

/// Character-class shape of one password.
pub fn shape_mask(password: &str) -> String {
    password
        .chars()
        .map(|c| {
            if c.is_alphabetic() {
                'X'
            } else if is_digit(c) {
                'D'
            } else if SPECIALS.contains(&c) {
                'S'
            } else {
                '_'
            }
        })
        .collect()
}

/// True if the leet table rewrites at least one character.
pub fn is_leet_mutation(password: &str) -> bool {
    password.chars().any(|c| unleet(c) != c)
}

/// True if the password mixes upper- and lower-case letters.
pub fn is_zigzag(password: &str) -> bool {
    password.chars().any(char::is_uppercase) && password.chars().any(char::is_lowercase)
}

pub struct PatternAnalyzer;

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate statistics over every password, merged with the corpus
    /// frequency table.
    pub fn analyze(&self, corpus: &Corpus) -> PatternReport {
        let mut report = PatternReport {
            password_counts: corpus.counts().clone(),
            ..PatternReport::default()
        };

        for p in corpus.passwords() {
            *report.masks.entry(shape_mask(p)).or_insert(0) += 1;

            let digits: BTreeSet<char> = p.chars().filter(|&c| is_digit(c)).collect();
            for d in digits {
                *report.numbers.entry(d.to_string()).or_insert(0) += 1;
            }

            count_substrings(p, &mut report.words);

            if is_leet_mutation(p) {
                *report.mutations.entry(p.clone()).or_insert(0) += 1;
            }

            if is_zigzag(p) {
                report.zigzag += 1;
            }
        }

        tracing::info!(
            "Pattern report: {} masks, {} substrings, {} leet mutations, zigzag={}",
            report.masks.len(),
            report.words.len(),
            report.mutations.values().sum::<u64>(),
            report.zigzag,
        );
        report
    }
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn count_substrings(password: &str, words: &mut BTreeMap<String, u64>) {
    let chars: Vec<char> = password.chars().collect();
    for len in MIN_WORD..=MAX_WORD {
        for window in chars.windows(len) {
            *words.entry(window.iter().collect()).or_insert(0) += 1;
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(pws: &[&str]) -> Corpus {
        pws.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_shape_mask() {
        assert_eq!(shape_mask("Pass123!"), "XXXXDDDS");
        assert_eq!(shape_mask("a b.c"), "X_X_X");
        assert_eq!(shape_mask("()-_=+"), "SSSSSS");
        assert_eq!(shape_mask("[~]"), "___");
        assert_eq!(shape_mask(""), "");
    }

    #[test]
    fn test_password_vs_password1() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["password", "Password1!"]));
        assert_eq!(r.zigzag, 1);
        assert_eq!(r.masks, map(&[("XXXXXXXX", 1), ("XXXXXXXXDS", 1)]));
    }

    #[test]
    fn test_no_mixed_case() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["abc123", "ABC123", "abc!23"]));
        assert_eq!(r.masks, map(&[("XXXDDD", 2), ("XXXSDD", 1)]));
        assert_eq!(r.zigzag, 0);
    }

    #[test]
    fn test_any_numeric_char_is_a_digit() {
        assert_eq!(shape_mask("a½٣"), "XDD");
        let r = PatternAnalyzer::new().analyze(&corpus(&["½"]));
        assert_eq!(r.numbers, map(&[("½", 1)]));
    }

    #[test]
    fn test_numbers_count_distinct_digits_per_password() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["1111", "a1b2", "xyz"]));
        assert_eq!(r.numbers, map(&[("1", 2), ("2", 1)]));
    }

    #[test]
    fn test_words_count_overlapping_windows() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["aaaa"]));
        // len 3: "aaa" twice, len 4: "aaaa" once
        assert_eq!(r.words, map(&[("aaa", 2), ("aaaa", 1)]));

        let r = PatternAnalyzer::new().analyze(&corpus(&["abcdefgh"]));
        assert_eq!(r.words.len(), 6 + 5 + 4 + 3 + 2);
        assert!(r.words.contains_key("abcdefg"));
        assert!(!r.words.contains_key("abcdefgh"));
        assert!(!r.words.contains_key("ab"));
    }

    #[test]
    fn test_words_sum_across_corpus() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["love1", "iloveyou"]));
        assert_eq!(r.words["love"], 2);
        assert_eq!(r.words["lov"], 2);
    }

    #[test]
    fn test_words_multibyte() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["пароль"]));
        assert_eq!(r.words["пар"], 1);
        assert_eq!(r.words["пароль"], 1);
    }

    #[test]
    fn test_leet_mutations() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["p@ssw0rd", "password", "p@ssw0rd", "l33t"]));
        assert_eq!(r.mutations, map(&[("p@ssw0rd", 2), ("l33t", 1)]));
        assert!(!is_leet_mutation("hunter"));
    }

    #[test]
    fn test_password_counts_merged() {
        let r = PatternAnalyzer::new().analyze(&corpus(&["a", "b", "a"]));
        assert_eq!(r.password_counts, map(&[("a", 2), ("b", 1)]));
    }

    #[test]
    fn test_zigzag_ignores_non_letters() {
        assert!(is_zigzag("aB"));
        assert!(!is_zigzag("A1!"));
        assert!(!is_zigzag("a1!"));
    }
}
