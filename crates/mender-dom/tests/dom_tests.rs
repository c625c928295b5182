//! Tests for the document tree types: arena building, conversion, traversal,
//! and the debug/JSON renderings.

use mender_dom::{AttributesMap, DocumentNode, DomTree, NodeId, TagNode};

/// Helper to allocate a tag node and attach it under `parent`.
fn append_tag(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc_tag(tag, AttributesMap::new());
    tree.append_child(parent, id);
    id
}

fn attrs(pairs: &[(&str, &str)]) -> AttributesMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ========== arena ==========

#[test]
fn test_new_tree_has_root_only() {
    let tree = DomTree::new("html");
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root(), NodeId::ROOT);
    assert_eq!(tree.tag_type(NodeId::ROOT), Some("html"));
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_append_sets_parent_and_order() {
    let mut tree = DomTree::new("html");
    let p = append_tag(&mut tree, NodeId::ROOT, "p");
    let text = tree.alloc_text("hi");
    tree.append_child(p, text);

    assert_eq!(tree.children(NodeId::ROOT), &[p]);
    assert_eq!(tree.parent(text), Some(p));
    assert_eq!(tree.as_text(text), Some("hi"));
    assert_eq!(tree.tag_type(text), None);
}

#[test]
fn test_into_document_node_keeps_structure() {
    let mut tree = DomTree::new("html");
    let table = append_tag(&mut tree, NodeId::ROOT, "table");
    let tr = append_tag(&mut tree, table, "tr");
    let td = append_tag(&mut tree, tr, "td");
    let x = tree.alloc_text("x");
    tree.append_child(td, x);
    let head = tree.alloc_tag("head", AttributesMap::new());
    tree.insert_child(NodeId::ROOT, 0, head);

    let expected = DocumentNode::tag(
        "html",
        vec![
            DocumentNode::tag("head", vec![]),
            DocumentNode::tag(
                "table",
                vec![DocumentNode::tag(
                    "tr",
                    vec![DocumentNode::tag("td", vec![DocumentNode::text("x")])],
                )],
            ),
        ],
    );
    assert_eq!(tree.into_document_node(), expected);
}

#[test]
fn test_deep_nesting_converts_without_recursion() {
    let mut tree = DomTree::new("html");
    let mut parent = NodeId::ROOT;
    for _ in 0..50_000 {
        parent = append_tag(&mut tree, parent, "b");
    }
    let root = tree.into_document_node();
    assert_eq!(root.descendants().count(), 50_001);

    let copy = root.clone();
    assert_eq!(copy, root);
    drop(root);
    assert_eq!(copy.to_debug_string().matches("</b>").count(), 50_000);
}

// ========== owned tree ==========

#[test]
fn test_attribute_lookup() {
    let node = TagNode::with_children("a", attrs(&[("href", "x/y.html")]), vec![]);
    assert_eq!(node.attribute("href"), Some("x/y.html"));
    assert_eq!(node.attribute("name"), None);
    assert_eq!(node.tag_type(), "a");
}

#[test]
fn test_descendants_are_pre_order() {
    let root = DocumentNode::tag(
        "html",
        vec![
            DocumentNode::tag("p", vec![DocumentNode::text("a")]),
            DocumentNode::text("b"),
        ],
    );
    let order: Vec<String> = root
        .descendants()
        .map(|node| match node {
            DocumentNode::Tag(tag) => tag.tag_type().to_string(),
            DocumentNode::Text(text) => text.text().to_string(),
        })
        .collect();
    assert_eq!(order, ["html", "p", "a", "b"]);
    assert_eq!(root.text_content(), "ab");
}

#[test]
fn test_clone_and_equality_compare_whole_subtrees() {
    let tree = |last: &str, color: &str| {
        DocumentNode::tag(
            "html",
            vec![
                DocumentNode::Tag(TagNode::with_children(
                    "font",
                    attrs(&[("color", color)]),
                    vec![DocumentNode::text("a"), DocumentNode::tag("b", vec![])],
                )),
                DocumentNode::text(last),
            ],
        )
    };
    let root = tree("z", "red");
    assert_eq!(root.clone(), root);
    assert_eq!(root.clone().to_debug_string(), root.to_debug_string());
    assert_ne!(tree("y", "red"), root);
    assert_ne!(tree("z", "blue"), root);
    assert_ne!(
        DocumentNode::tag("p", vec![DocumentNode::text("b")]),
        DocumentNode::tag("p", vec![DocumentNode::tag("b", vec![])])
    );
    assert_ne!(
        DocumentNode::tag("p", vec![]),
        DocumentNode::tag("p", vec![DocumentNode::text("")])
    );
}

#[test]
fn test_text_nodes_have_no_children() {
    let text = DocumentNode::text("leaf");
    assert!(text.children().is_empty());
    assert_eq!(text.tag_type(), None);
    assert_eq!(text.as_text().map(|t| t.text()), Some("leaf"));
}

#[test]
fn test_debug_string_format() {
    let root = DocumentNode::Tag(TagNode::with_children(
        "html",
        AttributesMap::new(),
        vec![
            DocumentNode::Tag(TagNode::with_children(
                "font",
                attrs(&[("size", "3"), ("color", "red")]),
                vec![DocumentNode::text(" x ")],
            )),
            DocumentNode::tag("br", vec![]),
        ],
    ));
    assert_eq!(
        root.to_debug_string(),
        "<html>\r\n<font color=\"red\" size=\"3\">\r\n[ x ]\r\n</font>\r\n<br>\r\n</br>\r\n</html>"
    );
}

#[test]
fn test_json_shape() {
    let root = DocumentNode::Tag(TagNode::with_children(
        "html",
        AttributesMap::new(),
        vec![DocumentNode::Tag(TagNode::with_children(
            "img",
            attrs(&[("src", "a.png")]),
            vec![],
        ))],
    ));
    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "tag",
            "type": "html",
            "children": [
                { "kind": "tag", "type": "img", "attributes": { "src": "a.png" } }
            ]
        })
    );
}
