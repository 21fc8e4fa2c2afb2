//! Part-of-speech abbreviation table.
//!
//! Maps the short codes found inside `<pos>` tags (`n.`, `v. t.`, `p. pr.`)
//! to the labels stored on an entry. Lookup is an exact match on the trimmed
//! code; unknown codes resolve to `None`.

use std::collections::HashMap;
use std::sync::OnceLock;

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("n", "noun"),
    ("n.", "noun"),
    ("n. pl.", "noun (plural)"),
    ("n. sing.", "noun (singular)"),
    ("n. collect.", "noun (collective)"),
    ("n. fem.", "noun (feminine)"),
    ("n. masc.", "noun (masculine)"),
    ("pl.", "plural"),
    ("sing.", "singular"),
    ("v", "verb"),
    ("v.", "verb"),
    ("v. t.", "verb (transitive)"),
    ("v.t.", "verb (transitive)"),
    ("v. i.", "verb (intransitive)"),
    ("v.i.", "verb (intransitive)"),
    ("t.", "verb (transitive)"),
    ("i.", "verb (intransitive)"),
    ("v. impers.", "verb (impersonal)"),
    ("v. aux.", "verb (auxiliary)"),
    ("a", "adjective"),
    ("a.", "adjective"),
    ("adj", "adjective"),
    ("adj.", "adjective"),
    ("adv", "adverb"),
    ("adv.", "adverb"),
    ("prep", "preposition"),
    ("prep.", "preposition"),
    ("conj", "conjunction"),
    ("conj.", "conjunction"),
    ("interj", "interjection"),
    ("interj.", "interjection"),
    ("pron", "pronoun"),
    ("pron.", "pronoun"),
    ("pers. pron.", "pronoun (personal)"),
    ("poss. pron.", "pronoun (possessive)"),
    ("dem. pron.", "pronoun (demonstrative)"),
    ("rel. pron.", "pronoun (relative)"),
    ("interrog. pron.", "pronoun (interrogative)"),
    ("imp.", "imperfect"),
    ("pret.", "preterit"),
    ("p. p.", "past participle"),
    ("p.p.", "past participle"),
    ("p. pr.", "present participle"),
    ("p.pr.", "present participle"),
    ("p. a.", "participial adjective"),
    ("vb. n.", "verbal noun"),
    ("inf.", "infinitive"),
    ("pres.", "present"),
    ("compar.", "comparative"),
    ("superl.", "superlative"),
    ("prefix", "prefix"),
    ("pref.", "prefix"),
    ("suffix", "suffix"),
    ("suff.", "suffix"),
    ("abbr.", "abbreviation"),
    ("art.", "article"),
    ("indef. art.", "article (indefinite)"),
];

static ABBREVIATION_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn abbreviation_map() -> &'static HashMap<&'static str, &'static str> {
    ABBREVIATION_MAP.get_or_init(|| ABBREVIATIONS.iter().copied().collect())
}

/// Resolves a part-of-speech code to its canonical label.
pub fn resolve(abbreviation: &str) -> Option<&'static str> {
    abbreviation_map().get(abbreviation.trim()).copied()
}

/// Splits a `<pos>` text on `&` and resolves every code, keeping position.
///
/// `"v. t. & i."` yields `[Some("verb (transitive)"), Some("verb (intransitive)")]`.
pub fn resolve_all(pos_text: &str) -> Vec<Option<&'static str>> {
    pos_text.split('&').map(resolve).collect()
}
