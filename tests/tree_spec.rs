use gcide_reader::gcide::format::tree::{Node, Tree};
use gcide_reader::GcideError;

fn parse(xml: &str) -> Tree {
    Tree::parse(xml).unwrap_or_else(|e| panic!("failed to parse {}: {}", xml, e))
}

fn names<'t>(nodes: impl Iterator<Item = Node<'t>>) -> Vec<&'t str> {
    nodes.map(|n| n.name()).collect()
}

#[test]
fn children_are_direct_elements_in_order() {
    let tree = parse("<p><a>1</a>text<b><c/></b><a>2</a></p>");
    assert_eq!(names(tree.root().children()), vec!["p"]);

    let p = tree.first("p").expect("p element");
    assert_eq!(names(p.children()), vec!["a", "b", "a"]);

    let b = tree.first("b").expect("b element");
    assert_eq!(names(b.children()), vec!["c"]);
    assert_eq!(tree.first("c").expect("c element").children().count(), 0);
}

#[test]
fn ancestors_run_from_parent_to_document() {
    let tree = parse("<p><def>a <i><pos>n.</pos></i></def></p>");
    let pos = tree.first("pos").expect("pos element");
    assert_eq!(names(pos.ancestors()), vec!["i", "def", "p", "#document"]);
    assert_eq!(pos.parent().map(|n| n.name()), Some("i"));
    assert!(tree.root().parent().is_none());
}

#[test]
fn ancestor_lookup_ignores_ascii_case() {
    let tree = parse("<p><Def><pos>v.</pos></Def><pos>n.</pos></p>");
    let nested: Vec<bool> = tree
        .elements_by_name("pos")
        .map(|pos| pos.has_ancestor("DEF"))
        .collect();
    assert_eq!(nested, vec![true, false]);
    assert!(!tree.first("pos").expect("pos element").has_ancestor("q"));
}

#[test]
fn text_concatenates_descendants_and_skips_comments() {
    let tree = parse("<p>one <a>two <b>three</b></a><!-- hidden --> four</p>");
    assert_eq!(tree.first("p").expect("p element").text(), "one two three four");
    assert_eq!(tree.first("a").expect("a element").text(), "two three");
}

#[test]
fn lookups_follow_document_order() {
    let tree = parse("<p><q>first</q><x><q>second</q></x></p>");
    let x = tree.first("x").expect("x element");
    assert_eq!(tree.first("q").map(|q| q.text()).as_deref(), Some("first"));
    assert_eq!(x.first("q").map(|q| q.text()).as_deref(), Some("second"));
    assert_eq!(tree.elements_by_name("q").count(), 2);
    assert!(tree.contains("x"));
    assert!(!tree.contains("hw"));
}

#[test]
fn ill_formed_blocks_are_rejected() {
    for xml in [
        "<p><a>unclosed</p>",
        "<p><a>open</a>",
        "</a>",
        "<p>&bogus;</p>",
        "<p>a < b</p>",
    ] {
        match Tree::parse(xml) {
            Err(GcideError::MalformedBlock { block, .. }) => {
                assert_eq!(block, xml, "error should carry the raw block")
            }
            other => panic!("expected {} to be malformed, got {:?}", xml, other.map(|_| ())),
        }
    }
}
