use crate::fallback::{FallbackChain, Resolved};
use crate::error::Result;
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::path::Path;

lazy_static! {
    static ref BUILTIN: HashSet<&'static str> = {
        let words: &[&str] = &[
            "i","me","my","myself","we","our","ours","ourselves",
            "you","you're","you've","you'll","you'd","your","yours","yourself","yourselves",
            "he","him","his","himself","she","she's","her","hers","herself",
            "it","it's","its","itself","they","them","their","theirs","themselves",
            "what","which","who","whom","this","that","that'll","these","those",
            "am","is","are","was","were","be","been","being","have","has","had","having",
            "do","does","did","doing","a","an","the","and","but","if","or","because","as",
            "until","while","of","at","by","for","with","about","against","between","into",
            "through","during","before","after","above","below","to","from","up","down",
            "in","out","on","off","over","under","again","further","then","once",
            "here","there","when","where","why","how","all","any","both","each","few",
            "more","most","other","some","such","no","nor","not","only","own","same",
            "so","than","too","very","s","t","can","will","just","don","don't",
            "should","should've","now","d","ll","m","o","re","ve","y",
            "ain","aren","aren't","couldn","couldn't","didn","didn't","doesn","doesn't",
            "hadn","hadn't","hasn","hasn't","haven","haven't","isn","isn't","ma",
            "mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't",
            "shouldn","shouldn't","wasn","wasn't","weren","weren't","won","won't",
            "wouldn","wouldn't",
        ];
        words.iter().copied().collect()
    };
}

/// Immutable English stopword set shared by every text in a run.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    pub fn builtin() -> Self {
        Self { words: BUILTIN.iter().map(|w| w.to_string()).collect() }
    }

    /// One word per line; blank lines and `#` comments are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let words = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|w| w.to_lowercase())
            .collect();
        Ok(Self { words })
    }

    /// Configured file first, built-in list otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Resolved<Self>> {
        FallbackChain::new("stopwords")
            .then_if(path.is_some(), "stopword-file", move || {
                let path = path.unwrap_or(Path::new(""));
                match Self::from_file(path) {
                    Ok(list) if list.is_empty() => Err(format!("{} is empty", path.display())),
                    Ok(list) => Ok(list),
                    Err(e) => Err(format!("{}: {e}", path.display())),
                }
            })
            .then("builtin-english", || Ok(Self::builtin()))
            .resolve()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
