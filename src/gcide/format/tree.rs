//! A small element tree built from one normalized block.
//!
//! Field extraction only needs a handful of queries: the first element with
//! a given name, its text content, and whether it sits below some other
//! element. Nodes live in an arena in document order, so a scan over the
//! arena is a pre-order walk.

use std::borrow::Cow;

use log::trace;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::gcide::types::error::{GcideError, Result};

type NodeId = usize;

const DOCUMENT: NodeId = 0;

#[derive(Debug)]
enum Content {
    Element(NodeId),
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    name: String,
    parent: Option<NodeId>,
    content: Vec<Content>,
}

/// Parsed element tree of a single block.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// Parses `xml` into a tree.
    ///
    /// Comments, processing instructions and declarations are dropped.
    ///
    /// # Errors
    /// Returns [`GcideError::MalformedBlock`] if the text is not well-formed:
    /// mismatched or unclosed tags, a stray `<`, or an unresolvable entity.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut tree = Tree {
            nodes: vec![NodeData {
                name: "#document".to_string(),
                parent: None,
                content: Vec::new(),
            }],
        };
        let mut open: Vec<NodeId> = vec![DOCUMENT];
        let mut reader = Reader::from_str(xml);

        loop {
            let parent = *open.last().unwrap_or(&DOCUMENT);
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let id = tree.push_element(parent, element_name(e.name().as_ref()));
                    open.push(id);
                }
                Ok(Event::Empty(e)) => {
                    tree.push_element(parent, element_name(e.name().as_ref()));
                }
                Ok(Event::End(e)) => {
                    if open.len() <= 1 {
                        return Err(GcideError::malformed(
                            format!("unmatched closing tag </{}>", element_name(e.name().as_ref())),
                            xml,
                        ));
                    }
                    open.pop();
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|err| {
                        GcideError::malformed(
                            format!("bad text at position {}: {}", reader.buffer_position(), err),
                            xml,
                        )
                    })?;
                    tree.push_text(parent, text);
                }
                Ok(Event::CData(e)) => {
                    let raw = e.into_inner();
                    tree.push_text(parent, String::from_utf8_lossy(&raw));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    return Err(GcideError::malformed(
                        format!("{} at position {}", err, reader.buffer_position()),
                        xml,
                    ));
                }
            }
        }

        if let Some(&unclosed) = open.get(1) {
            return Err(GcideError::malformed(
                format!("unclosed element <{}>", tree.nodes[unclosed].name),
                xml,
            ));
        }

        trace!("Parsed block into {} elements", tree.nodes.len() - 1);
        Ok(tree)
    }

    fn push_element(&mut self, parent: NodeId, name: String) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            name,
            parent: Some(parent),
            content: Vec::new(),
        });
        self.nodes[parent].content.push(Content::Element(id));
        id
    }

    fn push_text(&mut self, parent: NodeId, text: Cow<'_, str>) {
        if !text.is_empty() {
            self.nodes[parent].content.push(Content::Text(text.into_owned()));
        }
    }

    /// The document node; its children are the block's top-level elements.
    pub fn root(&self) -> Node<'_> {
        Node { tree: self, id: DOCUMENT }
    }

    /// All elements named `name`, in document order.
    pub fn elements_by_name<'t>(&'t self, name: &'t str) -> impl Iterator<Item = Node<'t>> + 't {
        self.root().descendants(name)
    }

    /// The first element named `name`, in document order.
    pub fn first(&self, name: &str) -> Option<Node<'_>> {
        self.root().first(name)
    }

    /// Whether any element named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.first(name).is_some()
    }
}

/// A borrowed handle to one element of a [`Tree`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id]
    }

    pub fn name(&self) -> &'t str {
        &self.data().name
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| Node { tree: self.tree, id })
    }

    /// Direct child elements, in order.
    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data().content.iter().filter_map(move |c| match c {
            Content::Element(id) => Some(Node { tree, id: *id }),
            Content::Text(_) => None,
        })
    }

    /// Enclosing elements from the parent up to the document node.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'t>> + 't {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Whether some enclosing element is named `name` (ASCII case-insensitive).
    pub fn has_ancestor(&self, name: &str) -> bool {
        self.ancestors().any(|node| node.name().eq_ignore_ascii_case(name))
    }

    fn is_descendant_of(&self, ancestor: NodeId) -> bool {
        self.ancestors().any(|node| node.id == ancestor)
    }

    /// Elements named `name` below this one, in document order.
    pub fn descendants<'n>(&self, name: &'n str) -> impl Iterator<Item = Node<'t>> + 'n
    where
        't: 'n,
    {
        let tree = self.tree;
        let ancestor = self.id;
        (ancestor + 1..tree.nodes.len())
            .map(move |id| Node { tree, id })
            .filter(move |node| node.name() == name && node.is_descendant_of(ancestor))
    }

    /// The first element named `name` below this one.
    pub fn first(&self, name: &str) -> Option<Node<'t>> {
        self.descendants(name).next()
    }

    /// Concatenated text of this element and everything below it.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for content in &self.data().content {
            match content {
                Content::Text(text) => out.push_str(text),
                Content::Element(id) => Node { tree: self.tree, id: *id }.collect_text(out),
            }
        }
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
