use crate::record::{round4, LexicalDiversity};
use crate::tokenizer::TokenStream;

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Vocabulary-richness metrics; every ratio is 0.0 when its denominator is empty.
pub fn lexical_diversity(stream: &TokenStream) -> LexicalDiversity {
    let stats = stream.stats();
    let root_ttr = if stats.total_words == 0 {
        0.0
    } else {
        stats.unique_words as f64 / (stats.total_words as f64).sqrt()
    };

    LexicalDiversity {
        total_words: stats.total_words,
        unique_words: stats.unique_words,
        content_words: stats.content_words,
        unique_content_words: stats.unique_content_words,
        type_token_ratio: round4(ratio(stats.unique_words, stats.total_words)),
        content_ttr: round4(ratio(stats.unique_content_words, stats.content_words)),
        root_ttr: round4(root_ttr),
        lexical_density: round4(ratio(stats.content_words, stats.total_words)),
    }
}
