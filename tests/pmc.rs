mod common;

use std::fs;

use phrase_miner::{
    data::pmc::{filter_full_text, parse_pmc_article, pmc_files, read_pmc_article, Paragraph, PmcError},
    nlp::entities::EntityDictionary,
};

#[test]
fn front_matter_fills_the_record() {
    let article = parse_pmc_article(common::JATS_ARTICLE).unwrap();
    let record = &article.record;
    assert_eq!(record.pmid, "12345");
    assert_eq!(record.doi, "10.1000/xyz");
    assert_eq!(record.title, "The human brain");
    assert_eq!(record.journal, "Brain Research");
    assert_eq!(record.authors, "Jane Doe; Rick Roe");
    assert_eq!(record.affiliation, "Institute of Neuroscience");
    assert_eq!(record.keywords, "cortex;glia");
    assert_eq!(record.year, "2020");
    assert_eq!(record.abstract_text, "Neurons & glia shape the brain.");
}

#[test]
fn paragraphs_carry_their_innermost_section() {
    let article = parse_pmc_article(common::JATS_ARTICLE).unwrap();
    let paragraph = |section: &str, text: &str| Paragraph {
        section: section.into(),
        text: text.into(),
    };
    assert_eq!(
        article.paragraphs,
        vec![
            paragraph("Introduction", "The brain is an organ."),
            paragraph("Introduction", "Kidneys filter blood."),
            paragraph("Introduction", "Brains are large."),
            paragraph("History", "Early brain studies."),
            paragraph("Methods", "Mice were housed."),
        ]
    );
}

#[test]
fn mentioning_paragraphs_merge_per_section() {
    let dictionary = EntityDictionary::new(&["brain"]).unwrap();
    let article = parse_pmc_article(common::JATS_ARTICLE).unwrap();
    let kept = filter_full_text(article, &dictionary).unwrap();

    let sections: Vec<&str> = kept.text.keys().map(String::as_str).collect();
    assert_eq!(sections, vec!["Introduction", "History", "abstract"]);
    assert_eq!(
        kept.text["Introduction"],
        "The brain is an organ. Brains are large."
    );
    assert_eq!(kept.pmid, "12345");

    let unrelated = EntityDictionary::new(&["liver"]).unwrap();
    let article = parse_pmc_article(common::JATS_ARTICLE).unwrap();
    assert!(filter_full_text(article, &unrelated).is_none());
}

#[test]
fn broken_documents_are_rejected() {
    assert!(parse_pmc_article("<article><front><article-meta>").is_err());
    assert!(parse_pmc_article("<article><body></front></article>").is_err());
    assert!(matches!(
        parse_pmc_article("<book><title>Brains</title></book>"),
        Err(PmcError::NotAnArticle)
    ));
}

#[test]
fn folders_list_xml_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.xml"), common::JATS_ARTICLE).unwrap();
    fs::write(dir.path().join("a.xml"), common::JATS_ARTICLE).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested/c.xml"), common::JATS_ARTICLE).unwrap();

    let files = pmc_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.xml", "b.xml"]);

    assert!(pmc_files(&dir.path().join("a.xml")).is_err());
    let article = read_pmc_article(&files[0]).unwrap();
    assert_eq!(article.record.doi, "10.1000/xyz");
}
