mod common;

use std::fs;

use assert_cmd::Command;
use phrase_miner::nlp::MatchedDocument;

fn cli(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("phrase-miner").expect("binary exists");
    cmd.env("OUTPUTS_DIR", workdir.join("outputs"))
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("phrase-miner").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn find_writes_matched_documents() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus.conllu");
    let entities = dir.path().join("entities.txt");
    fs::write(&corpus, common::CORPUS).unwrap();
    fs::write(&entities, "Brain\n").unwrap();

    cli(dir.path())
        .args(["find", "-i"])
        .arg(&corpus)
        .arg("--entities")
        .arg(&entities)
        .args(["-n", "2"])
        .assert()
        .success();

    let raw = fs::read_to_string(dir.path().join("outputs/matched_articles.json")).unwrap();
    let mut found: Vec<MatchedDocument> = serde_json::from_str(&raw).unwrap();
    found.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));
    let ids: Vec<&str> = found.iter().map(|d| d.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["10.1000/alpha", "10.1000/beta"]);
}

#[test]
fn find_skips_malformed_documents() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus.conllu");
    let entities = dir.path().join("entities.txt");
    let broken = "\n# newdoc id = 10.1000/broken\n1\tbrain\n";
    fs::write(&corpus, format!("{}{broken}", common::CORPUS)).unwrap();
    fs::write(&entities, "brain\n").unwrap();

    cli(dir.path())
        .args(["find", "-i"])
        .arg(&corpus)
        .arg("--entities")
        .arg(&entities)
        .assert()
        .success();

    let raw = fs::read_to_string(dir.path().join("outputs/matched_articles.json")).unwrap();
    let found: Vec<MatchedDocument> = serde_json::from_str(&raw).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|d| d.doc_id != "10.1000/broken"));
}

#[test]
fn filter_reads_pmc_folders() {
    use phrase_miner::data::articles::read_articles;

    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("pmc");
    let entities = dir.path().join("entities.txt");
    let output = dir.path().join("pmc_articles.json");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("PMC999.xml"), common::JATS_ARTICLE).unwrap();
    fs::write(folder.join("PMC000.xml"), "<article><front>").unwrap();
    fs::write(&entities, "brain\n").unwrap();

    cli(dir.path())
        .args(["filter", "--pmc-folder"])
        .arg(&folder)
        .arg("--entities")
        .arg(&entities)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let kept = read_articles(&output).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(
        kept[0].text["Introduction"],
        "The brain is an organ. Brains are large."
    );
}

#[cfg(not(feature = "embeddings"))]
#[test]
fn embed_writes_one_row_per_phrase() {
    use phrase_miner::data::phrases::read_phrases;

    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus.conllu");
    let entities = dir.path().join("entities.txt");
    let output = dir.path().join("phrases.parquet");
    fs::write(&corpus, common::CORPUS).unwrap();
    fs::write(&entities, "brain\n").unwrap();

    cli(dir.path())
        .env("EMBEDDING_DIM", "8")
        .args(["embed", "-i"])
        .arg(&corpus)
        .arg("--entities")
        .arg(&entities)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let frame = read_phrases(&output).unwrap();
    assert_eq!(frame.height(), 3);
    let columns: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(columns, vec!["doc_id", "label", "phrase", "embedding"]);
}
