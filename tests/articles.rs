use std::fs;

use phrase_miner::{
    data::articles::{
        filter_article, filter_sections, parse_pmids, persist_json, read_articles, write_sentences,
        ArticleRecord, MAX_SECTION_CHARS,
    },
    nlp::entities::{parse_entities, EntityDictionary},
};

fn article(pmid: &str, doi: &str, abstract_text: &str) -> ArticleRecord {
    ArticleRecord {
        pmid: pmid.into(),
        doi: doi.into(),
        abstract_text: abstract_text.into(),
        ..Default::default()
    }
}

#[test]
fn entity_list_is_trimmed_and_lowercased() {
    assert_eq!(
        parse_entities("  Brain \n\nNeuron\n   \n"),
        vec!["brain".to_string(), "neuron".to_string()]
    );
}

#[test]
fn articles_without_mentions_are_dropped() {
    let dictionary = EntityDictionary::new(&["brain", "neuron"]).unwrap();

    let kept = filter_article(
        article("1", "", "Neurons in the BRAIN fire together."),
        &dictionary,
    )
    .unwrap();
    assert_eq!(
        kept.text.get("abstract").map(String::as_str),
        Some("Neurons in the BRAIN fire together.")
    );

    assert!(filter_article(article("2", "", "Kidneys filter blood."), &dictionary).is_none());
    assert!(filter_article(article("3", "", "Brainstorming helps."), &dictionary).is_none());
}

#[test]
fn only_mentioning_sections_are_kept() {
    let dictionary = EntityDictionary::new(&["glia"]).unwrap();
    let mut record = article("4", "", "unused");
    record.text.insert("intro".into(), "Glia support neurons.".into());
    record.text.insert("methods".into(), "We used mice.".into());
    record
        .text
        .insert("oversized".into(), "glia ".repeat(MAX_SECTION_CHARS / 5 + 1));

    let kept = filter_article(record, &dictionary).unwrap();
    let sections: Vec<&str> = kept.text.keys().map(String::as_str).collect();
    assert_eq!(sections, vec!["intro"]);
}

#[test]
fn section_limit_counts_characters() {
    let dictionary = EntityDictionary::new(&["glia"]).unwrap();
    // two bytes per character: over the limit in bytes, under it in characters
    let long = format!("glia {}", "é".repeat(MAX_SECTION_CHARS / 2 + 10));
    assert!(long.len() >= MAX_SECTION_CHARS);
    assert!(filter_article(article("6", "", &long), &dictionary).is_some());

    let too_long = format!("glia {}", "é".repeat(MAX_SECTION_CHARS));
    assert!(filter_article(article("6", "", &too_long), &dictionary).is_none());
}

#[test]
fn paragraphs_of_one_section_are_joined() {
    let dictionary = EntityDictionary::new(&["brain"]).unwrap();
    let paragraphs = vec![
        ("Introduction".to_string(), "The brain is soft.".to_string()),
        ("Methods".to_string(), "Mice were housed.".to_string()),
        ("Introduction".to_string(), "Kidneys differ.".to_string()),
        ("Introduction".to_string(), "Brains vary in size.".to_string()),
    ];
    let kept = filter_sections(article("8", "", ""), paragraphs, &dictionary).unwrap();
    assert_eq!(kept.text.len(), 1);
    assert_eq!(
        kept.text["Introduction"],
        "The brain is soft. Brains vary in size."
    );
}

#[test]
fn empty_dictionary_matches_nothing() {
    let dictionary = EntityDictionary::new::<&str>(&[]).unwrap();
    assert!(filter_article(article("5", "", "Brain."), &dictionary).is_none());
}

#[test]
fn pmids_accept_float_formatting() {
    assert_eq!(parse_pmids("123\n\n456.0\n 789 \n").unwrap(), vec![123, 456, 789]);
    let err = parse_pmids("12\nabc\n").unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn doc_id_prefers_doi() {
    assert_eq!(article("9", "10.1/x", "").doc_id(), "10.1/x");
    assert_eq!(article("9", "", "").doc_id(), "pmid:9");
}

#[test]
fn sentences_are_written_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("sentences.txt");
    let articles = vec![
        article("1", "10.1/a", "The brain is an organ. It weighs 1.4 kg."),
        article("2", "", "Glia are cells!"),
    ];

    let count = write_sentences(&articles, &path).unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# newdoc id = 10.1/a\nThe brain is an organ.\nIt weighs 1.4 kg.\n# newdoc id = pmid:2\nGlia are cells!\n"
    );
}

#[test]
fn articles_survive_json_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    let mut record = article("7", "10.1/z", "Brain.");
    record.text.insert("abstract".into(), "Brain.".into());

    persist_json(&vec![record.clone()], &path).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"abstract\": \"Brain.\""));
    assert_eq!(read_articles(&path).unwrap(), vec![record]);
}
