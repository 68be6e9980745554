//! End-to-end tests for the batch pipeline.
//!
//! Fixtures are copied into a temporary directory first, since `.prepared`
//! files are written next to their source documents.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use tmx_preparer::{run_batch, AbortOnEmpty, BatchOptions, ContinueOnEmpty, PreparerError};

/// Path of a fixture file.
fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy fixtures into a fresh `corpus` directory and return it.
fn corpus(names: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    for name in names {
        let source = fixture(name);
        let target = corpus.join(source.file_name().unwrap());
        fs::copy(&source, &target)
            .unwrap_or_else(|e| panic!("Failed to copy {}: {}", source.display(), e));
    }
    (dir, corpus)
}

fn options(dir: &TempDir) -> BatchOptions {
    BatchOptions::new("parsed").with_metadata_path(dir.path().join("meta.csv"))
}

fn read_prepared(corpus: &Path, name: &str) -> String {
    let path = corpus.join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Metadata table as header plus rows.
fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

#[test]
fn test_batch_writes_prepared_texts() {
    let (dir, corpus) = corpus(&["batch/alpha.tmx", "batch/beta.tmx", "batch/README.txt"]);

    let report = run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap();

    assert_eq!(report.documents, 2);
    assert_eq!(report.records.len(), 5);
    assert_eq!(report.files_written, 5);

    assert_eq!(
        read_prepared(&corpus, "alpha.tmx_gb_en.prepared"),
        "!!!!!!!!!!!!!!!\n  \" Good morning, \" she said.\n\
         !!!!!!!!!!!!!!!\n It's late.\n\
         !!!!!!!!!!!!!!!\n Go."
    );
    assert_eq!(
        read_prepared(&corpus, "alpha.tmx_fi1_fi.prepared"),
        "!!!!!!!!!!!!!!!\n  \" Hyvää huomenta \" , hän sanoi.\n\
         !!!!!!!!!!!!!!!\n On myöhä.\n\
         !!!!!!!!!!!!!!!\n Mene."
    );
}

/// A document with an English and a Finnish text of `units` aligned units.
fn generated_document(title: &str, units: usize) -> String {
    let body: String = (1..=units)
        .map(|n| {
            format!(
                "<tu><tuv xml:lang=\"en\"><seg>{title} line {n}.</seg></tuv>\
                 <tuv xml:lang=\"fi\"><seg>{title} rivi {n}.</seg></tuv></tu>\n"
            )
        })
        .collect();
    format!(
        "<tmx version=\"1.4\"><header>\
         <textdef lang=\"en\" code=\"gb\" title=\"{title}\"/>\
         <textdef lang=\"fi\" code=\"fi1\" title=\"{title}\"/>\
         </header><body>\n{body}</body></tmx>\n"
    )
}

#[test]
fn test_two_documents_of_ten_units() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    fs::write(corpus.join("first.tmx"), generated_document("First", 10)).unwrap();
    fs::write(corpus.join("second.tmx"), generated_document("Second", 10)).unwrap();

    let report = run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap();

    assert_eq!(report.files_written, 4);
    assert_eq!(report.records.len(), 4);
    assert!(report.records.iter().all(|r| r.filename.is_some()));

    let (_, rows) = read_table(&dir.path().join("meta.csv"));
    assert_eq!(rows.len(), 4);

    let first_fi = read_prepared(&corpus, "first.tmx_fi1_fi.prepared");
    assert_eq!(first_fi.matches("!!!!!!!!!!!!!!!").count(), 10);
    assert!(first_fi.ends_with("!!!!!!!!!!!!!!!\n First rivi 10."));
}

#[test]
fn test_batch_separates_retranslations_by_code() {
    let (dir, corpus) = corpus(&["batch/beta.tmx"]);

    run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap();

    assert_eq!(
        read_prepared(&corpus, "beta.tmx_us_en.prepared"),
        "!!!!!!!!!!!!!!!\n Yes.\n!!!!!!!!!!!!!!!\n No."
    );
    assert_eq!(
        read_prepared(&corpus, "beta.tmx_fi1_fi.prepared"),
        "!!!!!!!!!!!!!!!\n Kyllä.\n!!!!!!!!!!!!!!!\n Ei."
    );
    assert_eq!(
        read_prepared(&corpus, "beta.tmx_fi2_fi.prepared"),
        "!!!!!!!!!!!!!!!\n Joo.\n!!!!!!!!!!!!!!!\n Ei ikinä."
    );
}

#[test]
fn test_metadata_table_unifies_attributes() {
    let (dir, corpus) = corpus(&["batch/alpha.tmx", "batch/beta.tmx"]);

    run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap();
    let (header, rows) = read_table(&dir.path().join("meta.csv"));

    assert_eq!(
        header,
        vec!["lang", "code", "title", "translator", "year", "pair_id", "filename"]
    );

    let without_pair_id: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(i, _)| *i != 5)
                .map(|(_, v)| v.as_str())
                .collect()
        })
        .collect();
    assert_eq!(
        without_pair_id,
        vec![
            vec!["en", "gb", "Alpha", "", "", "parsed/en/alpha.tmx_gb_en.prepared.conll"],
            vec!["fi", "fi1", "Alfa", "Virtanen", "", "parsed/fi/alpha.tmx_fi1_fi.prepared.conll"],
            vec!["en", "us", "Beta", "", "", "parsed/en/beta.tmx_us_en.prepared.conll"],
            vec!["fi", "fi1", "", "Korhonen", "", "parsed/fi/beta.tmx_fi1_fi.prepared.conll"],
            vec!["fi", "fi2", "", "Nieminen", "1990", "parsed/fi/beta.tmx_fi2_fi.prepared.conll"],
        ]
    );

    let pair_ids: Vec<&str> = rows.iter().map(|row| row[5].as_str()).collect();
    assert_eq!(pair_ids[0], pair_ids[1]);
    assert_eq!(pair_ids[2], pair_ids[3]);
    assert_eq!(pair_ids[3], pair_ids[4]);
    assert_ne!(pair_ids[0], pair_ids[2]);
    assert!(uuid::Uuid::parse_str(pair_ids[0]).is_ok());
}

#[test]
fn test_misaligned_document_aborts_batch() {
    let (dir, corpus) = corpus(&["misaligned.tmx"]);

    let err = run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap_err();

    match err {
        PreparerError::Alignment { counts, .. } => assert_eq!(counts, "en/gb=2, fi/fi1=1"),
        other => panic!("expected alignment error, got {other}"),
    }
    assert!(!dir.path().join("meta.csv").exists());
}

#[test]
fn test_empty_extraction_aborts_by_policy() {
    let (dir, corpus) = corpus(&["empty_text.tmx"]);

    let err = run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap_err();

    assert!(matches!(err, PreparerError::EmptyExtraction { ref lang, .. } if lang == "sv"));
    assert!(!dir.path().join("meta.csv").exists());
}

#[test]
fn test_continued_empty_extraction_still_fails_alignment() {
    let (dir, corpus) = corpus(&["empty_text.tmx"]);

    let err = run_batch(&corpus, &options(&dir), &mut ContinueOnEmpty, &mut ()).unwrap_err();

    match err {
        PreparerError::Alignment { counts, .. } => assert_eq!(counts, "en/gb=1, sv/sv1=0"),
        other => panic!("expected alignment error, got {other}"),
    }
    assert!(!corpus.join("empty_text.tmx_sv1_sv.prepared").exists());
    assert!(!dir.path().join("meta.csv").exists());
}

#[test]
fn test_empty_extraction_continues_by_policy() {
    let (dir, corpus) = corpus(&["all_empty.tmx"]);

    let report = run_batch(&corpus, &options(&dir), &mut ContinueOnEmpty, &mut ()).unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.files_written, 0);
    assert_eq!(report.records[0].filename, None);
    assert!(!corpus.join("all_empty.tmx_sv1_sv.prepared").exists());

    let (header, rows) = read_table(&dir.path().join("meta.csv"));
    assert_eq!(header, vec!["lang", "code", "translator", "pair_id", "filename"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "sv");
    assert_eq!(rows[0][2], "Lindgren");
    assert_eq!(rows[0][4], "");
}

#[test]
fn test_length_filter_drops_whole_units() {
    let (dir, corpus) = corpus(&["long_units.tmx"]);

    run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap();
    assert_eq!(
        read_prepared(&corpus, "long_units.tmx_fi1_fi.prepared")
            .matches("!!!!!!!!!!!!!!!")
            .count(),
        3
    );

    let limited = options(&dir).with_max_segment_chars(Some(20));
    let report = run_batch(&corpus, &limited, &mut AbortOnEmpty, &mut ()).unwrap();

    assert_eq!(
        read_prepared(&corpus, "long_units.tmx_gb_en.prepared"),
        "!!!!!!!!!!!!!!!\n Short.\n!!!!!!!!!!!!!!!\n Fine."
    );
    assert_eq!(
        read_prepared(&corpus, "long_units.tmx_fi1_fi.prepared"),
        "!!!!!!!!!!!!!!!\n Lyhyt.\n!!!!!!!!!!!!!!!\n Hyvä."
    );
    assert_eq!(report.files_written, 2);
}

#[test]
fn test_single_file_source_with_utf16_bom() {
    let (dir, corpus) = corpus(&["utf16.tmx"]);

    let report =
        run_batch(&corpus.join("utf16.tmx"), &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap();

    assert_eq!(report.documents, 1);
    assert_eq!(
        read_prepared(&corpus, "utf16.tmx_fi1_fi.prepared"),
        "!!!!!!!!!!!!!!!\n Teetä?"
    );
}

#[test]
fn test_undecodable_document_names_file() {
    let (dir, corpus) = corpus(&["latin1.tmx"]);

    let err = run_batch(&corpus, &options(&dir), &mut AbortOnEmpty, &mut ()).unwrap_err();

    match err {
        PreparerError::Encoding { path } => assert!(path.ends_with("latin1.tmx")),
        other => panic!("expected encoding error, got {other}"),
    }
}
