//! Integration tests for the tree builder.

use tern_dom::{DomTree, NodeId, NodeKind};
use tern_html::parse;

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    tree.descendants(from).find(|&id| tree.tag(id) == Some(tag))
}

/// Helper: tag names of an element's element children, in order.
fn child_tags<'t>(tree: &'t DomTree, id: NodeId) -> Vec<&'t str> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.tag(child))
        .collect()
}

#[test]
fn explicit_document_structure() {
    let tree = parse("<html><head></head><body></body></html>");

    assert_eq!(tree.tag(tree.root()), Some("html"));
    assert_eq!(child_tags(&tree, tree.root()), ["head", "body"]);
}

#[test]
fn every_input_yields_a_single_html_root() {
    let inputs = [
        "",
        "just text",
        "<div>unclosed",
        "</div>",
        "<!doctype html>",
        "<!-- only a comment -->",
        "<p>a<p>b<p>c",
    ];
    for input in inputs {
        let tree = parse(input);
        assert_eq!(tree.tag(tree.root()), Some("html"), "input: {input:?}");
        assert!(tree.parent(tree.root()).is_none());
        for id in tree.descendants(tree.root()) {
            if id != tree.root() {
                assert!(tree.parent(id).is_some(), "dangling node for {input:?}");
            }
        }
    }
}

#[test]
fn implicit_html_and_head_for_bare_title() {
    let tree = parse("<title>x</title>");

    let root = tree.root();
    assert_eq!(tree.tag(root), Some("html"));
    assert_eq!(child_tags(&tree, root), ["head"]);

    let head = tree.children(root)[0];
    assert_eq!(child_tags(&tree, head), ["title"]);

    let title = tree.children(head)[0];
    assert_eq!(tree.text_content(title), "x");
}

#[test]
fn implicit_body_for_bare_text() {
    let tree = parse("hello");
    let body = tree.body().expect("implicit body");
    assert_eq!(tree.text_content(body), "hello");
}

#[test]
fn implicit_head_close_before_body_content() {
    let tree = parse("<meta charset=utf-8><div>x</div>");

    let root = tree.root();
    assert_eq!(child_tags(&tree, root), ["head", "body"]);

    let head = tree.children(root)[0];
    assert_eq!(child_tags(&tree, head), ["meta"]);

    let body = tree.children(root)[1];
    assert_eq!(child_tags(&tree, body), ["div"]);
}

#[test]
fn paragraphs_do_not_nest() {
    let tree = parse("<p>hello<p>world</p>");

    let body = tree.body().expect("body");
    assert_eq!(child_tags(&tree, body), ["p", "p"]);

    let first = tree.children(body)[0];
    let second = tree.children(body)[1];
    assert_eq!(tree.text_content(first), "hello");
    assert_eq!(tree.text_content(second), "world");
}

#[test]
fn paragraph_split_reopens_formatting_tags() {
    let tree = parse("<p>one<b>two<p>three");

    let body = tree.body().expect("body");
    assert_eq!(child_tags(&tree, body), ["p", "p"]);

    // The <b> open at the split is closed with the first paragraph and a
    // fresh <b> wraps the content of the second.
    let first = tree.children(body)[0];
    let second = tree.children(body)[1];
    assert_eq!(tree.text_content(first), "onetwo");
    assert_eq!(child_tags(&tree, second), ["b"]);
    assert_eq!(tree.text_content(second), "three");
}

#[test]
fn comments_produce_no_nodes() {
    let tree = parse("<!-- <b>not a tag</b> -->hi");

    let body = tree.body().expect("body");
    let children = tree.children(body);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.as_text(children[0]), Some("hi"));
    assert!(find_element(&tree, tree.root(), "b").is_none());
}

#[test]
fn comment_inside_element_keeps_surrounding_text() {
    let tree = parse("<div>before<!-- skip -->after</div>");
    let div = find_element(&tree, tree.root(), "div").expect("div");
    assert_eq!(tree.text_content(div), "beforeafter");
}

#[test]
fn script_content_is_literal_text() {
    let tree = parse("<script>if (a<b) {}</script>");

    let script = find_element(&tree, tree.root(), "script").expect("script");
    assert_eq!(tree.text_content(script), "if (a<b) {}");
    // Nothing inside the script became an element.
    assert_eq!(child_tags(&tree, script), Vec::<&str>::new());

    // Script belongs in the head.
    let head = find_element(&tree, tree.root(), "head").expect("head");
    assert_eq!(child_tags(&tree, head), ["script"]);
}

#[test]
fn angle_brackets_in_quoted_attributes() {
    let tree = parse(r#"<div title="a > b">x</div>"#);
    let div = find_element(&tree, tree.root(), "div").expect("div");
    let data = tree.as_element(div).expect("element");
    assert_eq!(data.attrs.get("title"), Some(&"a > b".to_string()));
    assert_eq!(tree.text_content(div), "x");
}

#[test]
fn void_elements_take_no_children() {
    let tree = parse("<div>a<br>b<img src=x>c</div>");

    let div = find_element(&tree, tree.root(), "div").expect("div");
    let kinds: Vec<String> = tree
        .children(div)
        .iter()
        .map(|&id| match &tree.get(id).expect("node").kind {
            NodeKind::Text(text) => format!("{text:?}"),
            NodeKind::Element(data) => format!("<{}>", data.tag),
        })
        .collect();
    assert_eq!(kinds, ["\"a\"", "<br>", "\"b\"", "<img>", "\"c\""]);

    let br = tree.children(div)[1];
    assert!(tree.children(br).is_empty());
}

#[test]
fn doctype_is_discarded() {
    let tree = parse("<!doctype html><p>x</p>");
    let body = tree.body().expect("body");
    assert_eq!(child_tags(&tree, body), ["p"]);
}

#[test]
fn stray_close_at_root_is_ignored() {
    // The second </html> arrives with only the root left open.
    let tree = parse("<html><p>x</p></html></html>");
    let root = tree.root();
    assert_eq!(child_tags(&tree, root), ["body"]);
    let body = tree.body().expect("body");
    assert_eq!(child_tags(&tree, body), ["p"]);
}

#[test]
fn whitespace_only_text_is_dropped() {
    let tree = parse("<div>  \n  </div>");
    let div = find_element(&tree, tree.root(), "div").expect("div");
    assert!(tree.children(div).is_empty());
}

#[test]
fn basic_entities_are_decoded_in_text() {
    let tree = parse("<p>1 &lt; 2 &amp;&amp; 3 &gt; 2 &quot;ok&quot;</p>");
    let p = find_element(&tree, tree.root(), "p").expect("p");
    assert_eq!(tree.text_content(p), "1 < 2 && 3 > 2 \"ok\"");
}

#[test]
fn tree_outline_rendering() {
    let tree = parse("<p id=a>hi</p>");
    let outline = tern_html::tree_to_string(&tree, tree.root());
    let lines: Vec<&str> = outline.lines().collect();
    assert_eq!(
        lines,
        ["<html>", "  <body>", "    <p id=\"a\">", "      \"hi\""]
    );
}
