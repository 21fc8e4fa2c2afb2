use std::fs;
use std::path::PathBuf;

use gcide_reader::gcide::batch::{convert_path, expand_paths};
use gcide_reader::gcide::sink::{persist, PersistSummary};
use gcide_reader::gcide::source::{decode, list_sources, parse_encoding, read_source};
use gcide_reader::{
    convert_paths, ConvertOptions, DictionaryEntry, GcideError, JsonLinesSink, MemorySink,
    PersistenceSink, Result,
};
use tempfile::tempdir;

const SAMPLE: &str = include_str!("fixtures/CIDE.T.xml");

#[test]
fn decodes_utf8_latin1_and_bom_input() {
    assert_eq!(decode("café".as_bytes(), None), "café");
    assert_eq!(decode(b"caf\xe9", None), "café");
    assert_eq!(decode(b"\xEF\xBB\xBFword", None), "word");
    assert_eq!(decode(b"\xFF\xFEh\x00i\x00", None), "hi");

    let latin1 = parse_encoding("latin1").expect("latin1 label");
    assert_eq!(decode(b"\xe9t\xe9", Some(latin1)), "été");
}

#[test]
fn unknown_encoding_label_is_rejected() {
    assert!(matches!(
        parse_encoding("no-such-encoding"),
        Err(GcideError::UnknownEncoding(_))
    ));
}

#[test]
fn empty_and_missing_files_are_file_level_errors() {
    let dir = tempdir().expect("temp dir");
    let empty = dir.path().join("CIDE.E.xml");
    fs::write(&empty, "  \n").expect("write empty file");

    assert!(matches!(read_source(&empty, None), Err(GcideError::EmptyFile { .. })));
    assert!(matches!(
        read_source(dir.path().join("missing.xml"), None),
        Err(GcideError::Io(_))
    ));
}

#[test]
fn directory_listing_filters_by_prefix_and_extension() {
    let dir = tempdir().expect("temp dir");
    for name in ["CIDE.B.xml", "CIDE.A.xml", "notes.txt", "other.xml", "CIDE.C.txt"] {
        fs::write(dir.path().join(name), "<p></p>").expect("write file");
    }
    fs::create_dir(dir.path().join("CIDE.D.xml")).expect("create dir");

    let options = ConvertOptions::default();
    let names: Vec<String> = list_sources(dir.path(), &options)
        .expect("list sources")
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["CIDE.A.xml", "CIDE.B.xml"]);

    let expanded = expand_paths(&[dir.path().to_path_buf(), PathBuf::from("single.xml")], &options)
        .expect("expand paths");
    assert_eq!(expanded.len(), 3);
    assert_eq!(expanded[2], PathBuf::from("single.xml"));
}

#[test]
fn single_path_conversion_persists_every_entry() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("CIDE.T.xml");
    fs::write(&path, SAMPLE).expect("write sample");

    let sink = MemorySink::new();
    let summary = convert_path(&path, &ConvertOptions::default(), &sink).expect("convert");
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.skipped_blocks, 2);
    assert_eq!(summary.saved, 3);
    assert_eq!(summary.failed, 0);

    let words: Vec<String> = sink
        .into_entries()
        .expect("entries")
        .into_iter()
        .map(|e| e.entry_word)
        .collect();
    assert_eq!(words, vec!["Test", "Test", "Testament"]);
}

#[test]
fn one_failing_file_does_not_affect_the_others() {
    let dir = tempdir().expect("temp dir");
    let good = dir.path().join("CIDE.T.xml");
    let empty = dir.path().join("CIDE.E.xml");
    fs::write(&good, SAMPLE).expect("write sample");
    fs::write(&empty, "").expect("write empty");
    let missing = dir.path().join("CIDE.M.xml");

    let paths = vec![good.clone(), empty, missing, good];
    let sink = MemorySink::new();
    let outcomes = convert_paths(&paths, &ConvertOptions::default().with_threads(2), &sink);

    assert_eq!(outcomes.len(), 4);
    let ok: Vec<bool> = outcomes.iter().map(|o| o.is_ok()).collect();
    assert_eq!(ok, vec![true, false, false, true]);
    assert_eq!(outcomes[0].path, paths[0]);
    assert_eq!(sink.len(), 6);
}

struct RejectingSink;

impl PersistenceSink for RejectingSink {
    fn save(&self, entry: DictionaryEntry) -> Result<DictionaryEntry> {
        if entry.entry_word.starts_with('b') {
            Err(GcideError::Sink(format!("duplicate {}", entry.entry_word)))
        } else {
            Ok(entry)
        }
    }
}

#[test]
fn sink_rejections_are_counted_not_fatal() {
    let entries = vec![
        DictionaryEntry::new("a"),
        DictionaryEntry::new("b"),
        DictionaryEntry::new("c"),
    ];
    assert_eq!(persist(entries, &RejectingSink), PersistSummary { saved: 2, failed: 1 });
    assert_eq!(persist(Vec::new(), &RejectingSink), PersistSummary::default());
}

#[test]
fn json_lines_sink_writes_one_entry_per_line() {
    let sink = JsonLinesSink::new(Vec::new());
    let mut entry = DictionaryEntry::new("test");
    entry.head_word = Some("Test".to_string());
    sink.save(entry).expect("save");
    sink.save(DictionaryEntry::new("other")).expect("save");

    let bytes = sink.into_inner().expect("writer");
    let text = String::from_utf8(bytes).expect("utf-8 output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);

    let parsed: DictionaryEntry = serde_json::from_str(lines[0]).expect("valid json");
    assert_eq!(parsed.entry_word, "test");
    assert!(lines[0].contains("\"entryWord\":\"test\""));
    assert!(lines[0].contains("\"headWord\":\"Test\""));
}
