//! # Entry Field Extraction
//!
//! Turns one normalized block into either a fresh [`DictionaryEntry`] or a
//! set of fields merged into the entry that precedes it.
//!
//! ## Block kinds
//! - **New entry**: the block has an `<ent>` tag. Headword (`<hw>`), first
//!   definition (`<def>` + `<source>`), etymology (`<ety>`), parts of speech
//!   (`<pos>` outside any `<def>`), synonyms (`<syn>`) and the verb
//!   morphology table (`<vmorph>` with `<conjf>`/`<pos>` pairs) are read.
//! - **Continuation**: no `<ent>`, but a quote (`<q>`), a numbered sense
//!   (`<sn>` + `<def>`) or synonyms (`<syn>`). Each is appended to the
//!   previous entry.
//!
//! Missing tags simply leave fields unset.

use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use crate::gcide::format::tree::{Node, Tree};
use crate::gcide::types::abbreviations;
use crate::gcide::types::error::Result;
use crate::gcide::types::models::*;

const ENTRY: &str = "ent";
const HEADWORD: &str = "hw";
const DEFINITION: &str = "def";
const SOURCE: &str = "source";
const ETYMOLOGY: &str = "ety";
const PART_OF_SPEECH: &str = "pos";
const SYNONYM: &str = "syn";
const VERB_MORPHOLOGY: &str = "vmorph";
const CONJUGATED_FORM: &str = "conjf";
const QUOTE: &str = "q";
const QUOTE_AUTHOR: &str = "qau";
const SENSE_NUMBER: &str = "sn";
const MARK: &str = "mark";

static SYNONYM_PREFIX_PATTERN: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn synonym_prefix_regex() -> &'static Regex {
    SYNONYM_PREFIX_PATTERN.get_or_init(|| Regex::new(r"Syn\. --[ ]*").expect("Invalid synonym prefix regex pattern"))
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_PATTERN.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex pattern"))
}

/// Extracts one normalized block.
///
/// `previous` is the entry continuation fields are merged into. Without it a
/// block lacking `<ent>` is always [`ExtractionResult::Empty`].
///
/// # Errors
/// Returns [`GcideError::MalformedBlock`](crate::GcideError::MalformedBlock)
/// when the block does not parse as structured text. An absent tag is never
/// an error.
pub fn extract(block: &str, previous: Option<&mut DictionaryEntry>) -> Result<ExtractionResult> {
    let tree = Tree::parse(block)?;

    if let Some(entry) = extract_new_entry(&tree) {
        trace!("New entry: {}", entry.entry_word);
        return Ok(ExtractionResult::NewEntry(entry));
    }

    let Some(previous) = previous else {
        return Ok(ExtractionResult::Empty);
    };

    if merge_continuation(&tree, previous) {
        trace!("Continuation merged into: {}", previous.entry_word);
        Ok(ExtractionResult::Continuation)
    } else {
        Ok(ExtractionResult::Empty)
    }
}

/// Builds an entry from a block with an `<ent>` tag, or `None` without one.
pub fn extract_new_entry(tree: &Tree) -> Option<DictionaryEntry> {
    let entry_word = fold_lines(&tree.first(ENTRY)?.text());
    let mut entry = DictionaryEntry::new(entry_word);

    if let Some(hw) = tree.first(HEADWORD) {
        entry.head_word = Some(normalize_headword(&hw.text()));
    }

    if let Some(def) = tree.first(DEFINITION) {
        let mut definition = Definition::new(clean_definition(&fold_lines(&def.text())));
        definition.source = tree.first(SOURCE).map(|s| fold_lines(&s.text()));
        entry.definitions.push(definition);
    }

    if let Some(ety) = tree.first(ETYMOLOGY) {
        entry.etymology = Some(fold_lines(&ety.text()));
    }

    // A <pos> inside a <def> labels that sense, not the headword.
    for pos in tree.elements_by_name(PART_OF_SPEECH) {
        if pos.has_ancestor(DEFINITION) {
            continue;
        }
        let labels = abbreviations::resolve_all(&fold_lines(&pos.text()));
        entry
            .parts_of_speech
            .extend(labels.into_iter().flatten().map(str::to_string));
    }

    if let Some(syn) = tree.first(SYNONYM) {
        let text = fold_lines(&syn.text());
        let text = synonym_prefix_regex().replace_all(&text, "");
        entry.synonym.synonym_list.extend(split_list(&text, ","));
    }

    if let Some(vmorph) = tree.first(VERB_MORPHOLOGY) {
        entry.verb_morphology_entries = extract_verb_morphology(vmorph);
    }

    Some(entry)
}

/// Pairs each `<conjf>` with the `<pos>` at the same index.
///
/// Forms past the last `<pos>` get an empty list. Unknown codes stay in
/// place as `None`.
fn extract_verb_morphology(vmorph: Node<'_>) -> Vec<VerbMorphologyEntry> {
    let pos_tags: Vec<_> = vmorph.descendants(PART_OF_SPEECH).collect();

    vmorph
        .descendants(CONJUGATED_FORM)
        .enumerate()
        .map(|(i, conjf)| {
            let parts_of_speech = pos_tags
                .get(i)
                .map(|pos| {
                    abbreviations::resolve_all(&fold_lines(&pos.text()))
                        .into_iter()
                        .map(|label| label.map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            VerbMorphologyEntry {
                conjugated_form: fold_lines(&conjf.text()),
                parts_of_speech,
            }
        })
        .collect()
}

/// Merges the continuation fields of `tree` into `entry`.
///
/// Returns whether the block was a continuation at all.
pub fn merge_continuation(tree: &Tree, entry: &mut DictionaryEntry) -> bool {
    let mut merged = false;

    if let Some(q) = tree.first(QUOTE) {
        entry.quotes.push(Quote {
            text: q.text().trim().to_string(),
            author: tree.first(QUOTE_AUTHOR).map(|a| fold_lines(&a.text())),
            source: tree.first(SOURCE).map(|s| s.text().trim().to_string()),
        });
        merged = true;
    }

    if tree.contains(SENSE_NUMBER) {
        if let Some(def) = tree.first(DEFINITION) {
            entry.definitions.push(Definition {
                definition: clean_definition(&fold_lines(&def.text())),
                mark: tree.first(MARK).map(|m| fold_lines(&m.text())),
                source: tree.first(SOURCE).map(|s| fold_lines(&s.text())),
            });
            merged = true;
        }
    }

    if let Some(syn) = tree.first(SYNONYM) {
        let text = fold_lines(&syn.text()).replace("Syn. -- ", "").replace('.', "");
        entry.synonym.synonym_list.extend(split_list(&text, "; "));
        if let Some(source) = tree.first(SOURCE) {
            entry.synonym.source = Some(source.text().trim().to_string());
        }
        merged = true;
    }

    merged
}

/// Newlines become spaces; the result is trimmed.
pub fn fold_lines(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ").trim().to_string()
}

/// Headword syllable and stress marks become `·`, backticks go away.
pub fn normalize_headword(raw: &str) -> String {
    let marked = raw
        .replace("\\\"", "\"")
        .replace(['"', '*'], "·")
        .replace('`', "");
    whitespace_regex().replace_all(&marked, " ").trim().to_string()
}

/// Folds quote placeholders that survived normalization.
fn clean_definition(text: &str) -> String {
    text.replace("{ldquo/}", "\"").replace("{rdquo/}", "\"")
}

/// Splits a synonym list, trimming items and dropping empty ones.
fn split_list(text: &str, separator: &str) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
