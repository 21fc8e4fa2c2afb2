//! # Block Segmentation
//!
//! Splits a whole source file into top-level `<p>...</p>` blocks. Blocks may
//! nest further `<p>` pairs; each start is matched with the end that
//! balances it and only the outer span is yielded. A start that never
//! balances is dropped, and the balanced blocks inside it are yielded instead.
//!
//! ```text
//! <p>outer <p>inner</p> text</p>   → one block, the full outer span
//! <p>dangling ...                  → nothing
//! <p>dangling <p>inner</p>         → <p>inner</p>
//! ```

use std::collections::VecDeque;
use std::sync::OnceLock;

use log::{debug, trace};
use regex::Regex;

pub const BLOCK_START: &str = "<p>";
pub const BLOCK_END: &str = "</p>";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

static DELIMITER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn delimiter_regex() -> &'static Regex {
    DELIMITER_PATTERN.get_or_init(|| Regex::new(r"</?p>").expect("Invalid block delimiter regex pattern"))
}

/// A balanced block borrowed from the file text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// Byte offset of the opening `<p>` in the file text.
    pub offset: usize,
    /// The full span, both delimiters included.
    pub text: &'a str,
}

impl<'a> Block<'a> {
    /// See [`has_unclosed_comment`].
    pub fn has_unclosed_comment(&self) -> bool {
        has_unclosed_comment(self.text)
    }
}

/// Lazily yields the balanced top-level blocks of `text`.
///
/// Each call starts a fresh scan from the beginning.
pub fn segments(text: &str) -> Segments<'_> {
    Segments {
        text,
        cursor: 0,
        pending: VecDeque::new(),
    }
}

/// Iterator over the balanced blocks of one file's text.
///
/// Created by [`segments()`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    cursor: usize,
    /// Blocks found inside starts that never balanced, ready to be yielded.
    pending: VecDeque<Block<'a>>,
}

/// An open `<p>` and the balanced blocks closed directly inside it.
struct Frame<'a> {
    start: usize,
    inner: Vec<Block<'a>>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(block) = self.pending.pop_front() {
            return Some(block);
        }

        let text = self.text;
        let start = find_from(text, BLOCK_START, self.cursor)?;
        let scan_from = start + BLOCK_START.len();
        let mut open = vec![Frame {
            start,
            inner: Vec::new(),
        }];

        for delimiter in delimiter_regex().find_iter(&text[scan_from..]) {
            let at = scan_from + delimiter.start();
            if delimiter.as_str() == BLOCK_START {
                open.push(Frame {
                    start: at,
                    inner: Vec::new(),
                });
                continue;
            }

            let Some(frame) = open.pop() else {
                break;
            };
            let end = at + BLOCK_END.len();
            let block = Block {
                offset: frame.start,
                text: &text[frame.start..end],
            };
            match open.last_mut() {
                Some(parent) => parent.inner.push(block),
                None => {
                    self.cursor = end;
                    return Some(block);
                }
            }
        }

        // Input ran out with starts still open. Those starts are dropped and
        // the outermost balanced blocks inside them are yielded instead.
        for frame in &open {
            debug!(
                "Unbalanced block at offset {}, dropping its start delimiter",
                frame.start
            );
        }
        self.pending = open.into_iter().flat_map(|frame| frame.inner).collect();
        trace!(
            "Segmentation reached end of input with {} blocks pending",
            self.pending.len()
        );
        self.cursor = text.len();
        self.pending.pop_front()
    }
}

/// Whether a comment is opened after the block start and never closed.
///
/// Such blocks cannot be parsed and are skipped before normalization.
pub fn has_unclosed_comment(fragment: &str) -> bool {
    let Some(start) = fragment.find(BLOCK_START) else {
        return false;
    };
    let body = &fragment[start + BLOCK_START.len()..];
    // The last opener is unclosed whenever any opener is.
    let Some(open) = body.rfind(COMMENT_OPEN) else {
        return false;
    };
    let tail = &body[open + COMMENT_OPEN.len()..];
    !tail.contains(COMMENT_CLOSE) && tail.contains(BLOCK_END)
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|pos| pos + from)
}
