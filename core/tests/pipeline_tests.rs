use litmetrics::persist::{load_artifact, load_meta, meta_path, to_json_bytes};
use litmetrics::{analyze_text, run, AnalysisConfig, AnalysisError, Corpus, Polarity, Resources};
use std::fs;
use tempfile::tempdir;

// 10 stopword tokens and 40 content tokens over 34 distinct content words
fn fifty_word_text() -> String {
    let content = [
        "raven", "chamber", "midnight", "dreary", "weary", "volume", "lore", "napping", "tapping", "rapping",
        "door", "december", "ember", "ghost", "floor", "morrow", "sorrow", "lenore", "maiden", "angels",
        "silken", "purple", "curtain", "thrilled", "terrors", "heart", "beating", "visitor", "entreating", "entrance",
    ];
    let repeated = ["raven", "door", "lenore", "midnight", "chamber", "heart"];
    let extra = ["nevermore", "bust", "pallas", "shadow"];
    let mut words: Vec<&str> = Vec::new();
    words.extend(content);
    words.extend(extra);
    words.extend(repeated);
    words.extend(std::iter::repeat("the").take(10));
    words.join(" ")
}

#[test]
fn fifty_word_scenario_matches_hand_counts() {
    let config = AnalysisConfig::default();
    let resources = Resources::load(&config).unwrap();
    let record = analyze_text("The Raven", &fifty_word_text(), &resources, &config);

    let lex = &record.lexical_diversity;
    assert_eq!(lex.total_words, 50);
    assert_eq!(lex.unique_words, 35);
    assert_eq!(lex.content_words, 40);
    assert_eq!(lex.unique_content_words, 34);
    assert_eq!(lex.type_token_ratio, 0.7);
    assert_eq!(lex.lexical_density, 0.8);
    assert_eq!(lex.content_ttr, 0.85);
    assert_eq!(lex.root_ttr, 4.9497);

    // repeated words come first, in first-occurrence order
    let top: Vec<(&str, u64)> = record.word_frequencies.iter().take(6).collect();
    assert_eq!(
        top,
        vec![("raven", 2), ("chamber", 2), ("midnight", 2), ("door", 2), ("lenore", 2), ("heart", 2)]
    );
    assert_eq!(record.word_frequencies.len(), 34);
    assert!(record.word_frequencies.get("the").is_none());

    // one chunk supports a single topic; equal weights keep first-occurrence order
    assert_eq!(record.topics.len(), 1);
    let words: Vec<&str> = record.topics[0].words.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(
        words,
        vec!["raven", "chamber", "midnight", "door", "lenore", "heart", "dreary", "weary", "volume", "lore"]
    );
    let weights: Vec<f64> = record.topics[0].words.iter().map(|w| w.weight).collect();
    assert_eq!(weights[..6], [0.0405; 6]);
    assert_eq!(weights[6..], [0.027; 4]);
}

#[test]
fn record_invariants_hold() {
    let config = AnalysisConfig { top_n_words: 5, ..AnalysisConfig::default() };
    let resources = Resources::load(&config).unwrap();
    let text = "It was a dark and stormy night. The rain fell in torrents, except at occasional intervals, \
                when it was checked by a violent gust of wind which swept up the streets. "
        .repeat(40);
    let record = analyze_text("Paul Clifford", &text, &resources, &config);

    let s = &record.sentiment.scores;
    let sum = s.positive + s.negative + s.neutral;
    assert!((sum - 1.0).abs() <= 0.002, "proportions sum to {sum}");
    assert!((-1.0..=1.0).contains(&s.compound));
    assert_eq!(record.sentiment.overall, Polarity::from_compound(s.compound));

    let lex = &record.lexical_diversity;
    assert!(lex.unique_words <= lex.total_words);
    assert!(lex.content_words <= lex.total_words);
    assert!(lex.unique_content_words <= lex.unique_words);

    assert!(record.word_frequencies.len() <= 5);
    let counts: Vec<u64> = record.word_frequencies.iter().map(|(_, c)| c).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));

    assert!(!record.topics.is_empty());
    for (i, topic) in record.topics.iter().enumerate() {
        assert_eq!(topic.topic_id, i);
        assert!(topic.words.len() <= config.topics.words_per_topic);
        let non_increasing = topic.words.windows(2).all(|w| w[0].weight >= w[1].weight);
        assert!(non_increasing, "topic {i} weights rise");
    }
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("raven_clean.txt"), fifty_word_text()).unwrap();
    fs::write(
        dir.path().join("usher_clean.txt"),
        "During the whole of a dull, dark, and soundless day in the autumn of the year. ".repeat(30),
    )
    .unwrap();

    let config = AnalysisConfig::default();
    let corpus = Corpus::from_dir(dir.path()).unwrap();
    let first = run(&corpus, &config, &dir.path().join("a.json")).unwrap();
    let second = run(&corpus, &config, &dir.path().join("b.json")).unwrap();

    assert_eq!(to_json_bytes(&first).unwrap(), to_json_bytes(&second).unwrap());
    assert_eq!(fs::read(dir.path().join("a.json")).unwrap(), fs::read(dir.path().join("b.json")).unwrap());
}

#[test]
fn run_writes_artifact_and_meta() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("raven_clean.txt"), fifty_word_text()).unwrap();
    let output = dir.path().join("out/analysis_results.json");

    let corpus = Corpus::from_dir(dir.path()).unwrap();
    run(&corpus, &AnalysisConfig::default(), &output).unwrap();

    let artifact = load_artifact(&output).unwrap();
    assert_eq!(artifact.titles().collect::<Vec<_>>(), vec!["raven"]);
    let meta = load_meta(&meta_path(&output)).unwrap();
    assert_eq!(meta.num_texts, 1);
    assert_eq!(meta.config, AnalysisConfig::default());
}

#[test]
fn duplicate_title_aborts_before_output() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("second")).unwrap();
    fs::write(dir.path().join("monk_clean.txt"), "Ambrosio").unwrap();
    fs::write(dir.path().join("second/monk_clean.txt"), "Matilda").unwrap();

    let err = Corpus::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, AnalysisError::DuplicateTitle { .. }));
    assert!(!dir.path().join("analysis_results.json").exists());
}

#[test]
fn invalid_config_writes_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("raven_clean.txt"), fifty_word_text()).unwrap();
    let output = dir.path().join("analysis_results.json");
    let corpus = Corpus::from_dir(dir.path()).unwrap();

    let mut config = AnalysisConfig::default();
    config.topics.num_topics = 0;
    assert!(matches!(run(&corpus, &config, &output), Err(AnalysisError::Config(_))));
    assert!(!output.exists());
}
