use crate::record::WordFrequencies;
use std::collections::HashMap;

/// The `top_n` most frequent tokens, ties broken by first occurrence.
pub fn word_frequencies(tokens: &[String], top_n: usize) -> WordFrequencies {
    // token -> (count, first index)
    let mut counts: HashMap<&str, (u64, usize)> = HashMap::new();
    for (pos, token) in tokens.iter().enumerate() {
        counts.entry(token.as_str()).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(&str, u64, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(top_n);

    WordFrequencies(ranked.into_iter().map(|(w, c, _)| (w.to_string(), c)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn ranks_by_count_then_first_occurrence() {
        let wf = word_frequencies(&tokens("moor raven castle raven moor ghost raven"), 10);
        let order: Vec<(&str, u64)> = wf.iter().collect();
        assert_eq!(order, vec![("raven", 3), ("moor", 2), ("castle", 1), ("ghost", 1)]);
    }

    #[test]
    fn truncates_to_top_n() {
        let wf = word_frequencies(&tokens("a b c d e f a"), 3);
        assert_eq!(wf.len(), 3);
        assert_eq!(wf.get("a"), Some(2));
        assert_eq!(wf.get("c"), Some(1));
        assert_eq!(wf.get("d"), None);
    }

    #[test]
    fn empty_input() {
        assert!(word_frequencies(&[], 100).is_empty());
    }
}
