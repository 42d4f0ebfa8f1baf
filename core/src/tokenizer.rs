use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::fallback::{FallbackChain, Resolved};
use crate::stopwords::Stopwords;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Alphabetic runs, with internal apostrophes kept for contractions.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\p{L}+(?:'\p{L}+)*";

/// Splits normalized text into word tokens.
#[derive(Debug, Clone)]
pub enum Segmenter {
    Pattern(Regex),
    /// Char-class scanner used when no pattern can be compiled.
    LetterScan,
}

impl Segmenter {
    /// Custom pattern, then the default Unicode pattern, then the scanner.
    pub fn resolve(custom: Option<&str>) -> Result<Resolved<Self>> {
        FallbackChain::new("word segmenter")
            .then_if(custom.is_some(), "custom-pattern", move || {
                compile(custom.unwrap_or_default())
            })
            .then("unicode-words", || compile(DEFAULT_TOKEN_PATTERN))
            .then("letter-scan", || Ok(Segmenter::LetterScan))
            .resolve()
    }

    pub fn segment<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match self {
            Segmenter::Pattern(re) => re
                .find_iter(text)
                .map(|m| m.as_str())
                .filter(|t| !t.is_empty())
                .collect(),
            Segmenter::LetterScan => scan_letters(text),
        }
    }
}

fn compile(pattern: &str) -> std::result::Result<Segmenter, String> {
    Regex::new(pattern)
        .map(Segmenter::Pattern)
        .map_err(|e| format!("invalid token pattern {pattern:?}: {e}"))
}

fn scan_letters(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c.is_alphabetic() {
            if start.is_none() {
                start = Some(i);
            }
            continue;
        }
        let joins_word = c == '\''
            && start.is_some()
            && chars.peek().map_or(false, |&(_, next)| next.is_alphabetic());
        if joins_word {
            continue;
        }
        if let Some(s) = start.take() {
            tokens.push(&text[s..i]);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

/// NFKC, typographic apostrophes folded to ASCII, lowercase.
pub fn normalize(text: &str) -> String {
    text.nfkc()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{02BC}' => '\'',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// The two token views of one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    /// Every word token, stopwords included.
    pub all_tokens: Vec<String>,
    /// Tokens left after stopword and length filtering.
    pub content_tokens: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VocabularyStats {
    pub total_words: usize,
    pub unique_words: usize,
    pub content_words: usize,
    pub unique_content_words: usize,
}

impl TokenStream {
    pub fn stats(&self) -> VocabularyStats {
        VocabularyStats {
            total_words: self.all_tokens.len(),
            unique_words: distinct(&self.all_tokens),
            content_words: self.content_tokens.len(),
            unique_content_words: distinct(&self.content_tokens),
        }
    }
}

fn distinct(tokens: &[String]) -> usize {
    tokens.iter().map(String::as_str).collect::<HashSet<_>>().len()
}

/// Tokenizer plus content filter, built once per run and shared read-only.
pub struct Preprocessor {
    segmenter: Segmenter,
    stopwords: Stopwords,
    min_token_length: usize,
    stemmer: Option<Stemmer>,
}

impl Preprocessor {
    pub fn new(segmenter: Segmenter, stopwords: Stopwords, min_token_length: usize) -> Self {
        Self { segmenter, stopwords, min_token_length, stemmer: None }
    }

    /// Resolve the segmenter and stopword chains from `config`.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let segmenter = Segmenter::resolve(config.token_pattern.as_deref())?;
        let stopwords = Stopwords::resolve(config.stopwords_path.as_deref())?;
        tracing::info!(
            segmenter = %segmenter.strategy,
            stopwords = %stopwords.strategy,
            stopword_count = stopwords.value.len(),
            "preprocessor ready"
        );
        let pre = Self::new(segmenter.value, stopwords.value, config.min_token_length);
        Ok(if config.stem_content { pre.with_stemming() } else { pre })
    }

    /// Snowball-stem content tokens after filtering.
    pub fn with_stemming(mut self) -> Self {
        self.stemmer = Some(Stemmer::create(Algorithm::English));
        self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        self.segmenter
            .segment(&normalized)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn is_content(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_length && !self.stopwords.contains(token)
    }

    pub fn content_tokens(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| self.is_content(t))
            .map(|t| match &self.stemmer {
                Some(stemmer) => stemmer.stem(t).into_owned(),
                None => t.clone(),
            })
            .collect()
    }

    pub fn process(&self, text: &str) -> TokenStream {
        let all_tokens = self.tokenize(text);
        let content_tokens = self.content_tokens(&all_tokens);
        TokenStream { all_tokens, content_tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor() -> Preprocessor {
        let segmenter = Segmenter::resolve(None).unwrap().value;
        Preprocessor::new(segmenter, Stopwords::builtin(), 2)
    }

    #[test]
    fn splits_on_punctuation_and_digits() {
        let t = preprocessor().tokenize("The 3 ravens, croaking; flew-away!");
        assert_eq!(t, vec!["the", "ravens", "croaking", "flew", "away"]);
    }

    #[test]
    fn keeps_internal_apostrophes_only() {
        let t = preprocessor().tokenize("'Twas the night; I don't know, ma'am's 'quote'");
        assert_eq!(t, vec!["twas", "the", "night", "i", "don't", "know", "ma'am's", "quote"]);
    }

    #[test]
    fn curly_apostrophes_are_folded() {
        let t = preprocessor().tokenize("She didn\u{2019}t go");
        assert_eq!(t, vec!["she", "didn't", "go"]);
    }

    #[test]
    fn content_tokens_drop_stopwords_and_short_tokens() {
        let s = preprocessor().process("The dark castle and a raven x");
        assert_eq!(s.all_tokens.len(), 7);
        assert_eq!(s.content_tokens, vec!["dark", "castle", "raven"]);
    }

    #[test]
    fn scanner_matches_default_pattern() {
        let text = "it's a dreary night, o'er the moor... 1818 AD";
        let scanned = scan_letters(text);
        let re = Regex::new(DEFAULT_TOKEN_PATTERN).unwrap();
        let matched: Vec<&str> = re.find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(scanned, matched);
    }

    #[test]
    fn invalid_custom_pattern_falls_back() {
        let resolved = Segmenter::resolve(Some("([unclosed")).unwrap();
        assert_eq!(resolved.strategy, "unicode-words");
        assert!(resolved.degraded());
    }

    #[test]
    fn empty_text_has_zero_stats() {
        let stats = preprocessor().process("").stats();
        assert_eq!(stats, VocabularyStats::default());
    }

    #[test]
    fn stemming_applies_to_content_only() {
        let pre = preprocessor().with_stemming();
        let s = pre.process("Running through haunted corridors");
        assert!(s.all_tokens.contains(&"running".to_string()));
        assert!(s.content_tokens.contains(&"run".to_string()));
        assert!(s.content_tokens.contains(&"haunt".to_string()));
    }
}
