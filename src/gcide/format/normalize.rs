//! # Markup Normalization
//!
//! The GCIDE source mixes real tags with SGML-era pseudo-entities such as
//! `<ldquo/`, `<lt/` or `<ae/`, which no XML reader accepts. Before a block
//! is parsed it goes through an ordered list of rewrite rules that turn those
//! notations into text or into a `{name/}` placeholder.
//!
//! Order matters: quote and angle escapes must run before the generic
//! self-closing rewrite, and `&` escaping must see the `&lt`/`&gt` it produced.
//!
//! Every rule is pure and the pipeline runs once. Ordinary blocks come out
//! unchanged from a second pass, but a rule can assemble a token an earlier
//! rule would have rewritten (`{ld{br/}quo/}` becomes `{ldquo/}`), and that
//! token is left for the next pass.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// A single named rewrite step.
pub struct Rule {
    pub name: &'static str,
    rewrite: fn(&str) -> Cow<'_, str>,
}

impl Rule {
    /// Applies just this rule to `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        (self.rewrite)(text)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// The rewrite pipeline, in application order.
pub const RULES: &[Rule] = &[
    Rule { name: "strip_comments", rewrite: strip_comments },
    Rule { name: "strip_escaped_close", rewrite: strip_escaped_close },
    Rule { name: "directional_quotes", rewrite: directional_quotes },
    Rule { name: "angle_escapes", rewrite: angle_escapes },
    Rule { name: "self_closing_placeholders", rewrite: self_closing_placeholders },
    Rule { name: "strip_line_breaks", rewrite: strip_line_breaks },
    Rule { name: "escape_ampersands", rewrite: escape_ampersands },
    Rule { name: "strip_inline_formatting", rewrite: strip_inline_formatting },
];

/// Looks a rule up by name.
pub fn rule(name: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.name == name)
}

/// Runs every rule over `fragment`, in order.
pub fn normalize(fragment: &str) -> String {
    let mut text = fragment.to_string();
    for rule in RULES {
        let rewritten = match rule.apply(&text) {
            Cow::Borrowed(_) => None,
            Cow::Owned(s) => Some(s),
        };
        if let Some(s) = rewritten {
            text = s;
        }
    }
    text
}

static COMMENT_PATTERN: OnceLock<Regex> = OnceLock::new();
static SELF_CLOSING_PATTERN: OnceLock<Regex> = OnceLock::new();
static LINE_BREAK_PATTERN: OnceLock<Regex> = OnceLock::new();
static AMPERSAND_PATTERN: OnceLock<Regex> = OnceLock::new();

fn comment_regex() -> &'static Regex {
    COMMENT_PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex pattern"))
}

fn self_closing_regex() -> &'static Regex {
    SELF_CLOSING_PATTERN.get_or_init(|| Regex::new(r"<(\w+)/").expect("Invalid self-closing regex pattern"))
}

fn line_break_regex() -> &'static Regex {
    LINE_BREAK_PATTERN.get_or_init(|| Regex::new(r"(?i)\{br\s*/?\}").expect("Invalid line break regex pattern"))
}

fn ampersand_regex() -> &'static Regex {
    // `&` optionally followed by a complete entity reference; the closure
    // below only escapes the bare ones.
    AMPERSAND_PATTERN.get_or_init(|| Regex::new(r"&(#?\w+;)?").expect("Invalid ampersand regex pattern"))
}

/// Replaces each `(from, to)` pair in turn, borrowing when nothing matches.
fn replace_literals<'t>(text: &'t str, pairs: &[(&str, &str)]) -> Cow<'t, str> {
    if !pairs.iter().any(|(from, _)| text.contains(from)) {
        return Cow::Borrowed(text);
    }
    let mut out = text.to_string();
    for (from, to) in pairs {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    Cow::Owned(out)
}

/// Drops `<!-- ... -->`, including comments spanning lines.
fn strip_comments(text: &str) -> Cow<'_, str> {
    comment_regex().replace_all(text, "")
}

/// Drops the `<?/` token left behind by the upstream SGML conversion.
fn strip_escaped_close(text: &str) -> Cow<'_, str> {
    replace_literals(text, &[("<?/", "")])
}

/// Directional quote pseudo-entities become plain quotes.
///
/// Placeholders already in `{name/}` form are folded as well.
fn directional_quotes(text: &str) -> Cow<'_, str> {
    replace_literals(
        text,
        &[
            ("<ldquo/", "\""),
            ("<rdquo/", "\""),
            ("<lsquo/", "'"),
            ("<rsquo/", "'"),
            ("{ldquo/}", "\""),
            ("{rdquo/}", "\""),
            ("{lsquo/}", "'"),
            ("{rsquo/}", "'"),
        ],
    )
}

/// `<lt/` and `<gt/` become `&lt` and `&gt`, without the trailing semicolon.
fn angle_escapes(text: &str) -> Cow<'_, str> {
    replace_literals(text, &[("<lt/", "&lt"), ("<gt/", "&gt")])
}

/// Any other `<name/` becomes `{name/}`.
fn self_closing_placeholders(text: &str) -> Cow<'_, str> {
    self_closing_regex().replace_all(text, "{${1}/}")
}

/// `{br/}` and `{br }` render as nothing.
fn strip_line_breaks(text: &str) -> Cow<'_, str> {
    line_break_regex().replace_all(text, "")
}

/// Bare `&` becomes `&amp;`; existing entity references are left alone.
fn escape_ampersands(text: &str) -> Cow<'_, str> {
    ampersand_regex().replace_all(text, |caps: &Captures<'_>| match caps.get(1) {
        Some(_) => caps[0].to_string(),
        None => "&amp;".to_string(),
    })
}

/// Unwraps `<cs>` and `<note>`, keeping their content.
fn strip_inline_formatting(text: &str) -> Cow<'_, str> {
    replace_literals(
        text,
        &[("<cs>", ""), ("</cs>", ""), ("<note>", ""), ("</note>", "")],
    )
}
