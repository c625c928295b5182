//! Property tests: the tree builder accepts anything and keeps its structural
//! guarantees.

use mender_dom::DocumentNode;
use mender_html::{Token, Tokenizer, parse};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// Markup soup assembled from fragments that exercise every repair rule.
#[derive(Debug, Clone)]
struct Markup(String);

const FRAGMENTS: &[&str] = &[
    "<table>", "</table>", "<tr>", "</tr>", "<td>", "</td>", "<th>", "</th>", "<ul>", "</ul>",
    "<ol>", "</ol>", "<li>", "</li>", "<p>", "</p>", "<b>", "</b>", "<i>", "</I>", "<pre>",
    "</pre>", "<br>", "<img src=x>", "<title>", "</title>", "<html>", "</body>", "<!--", "-->",
    "<", ">", "</", "<>", "< / >", "<font size='3'>", "</font>", " ", "  ", "\n", "\t", "word",
    "&amp;", "=", "\"",
];

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (g.size() + 1);
        let markup = (0..len)
            .filter_map(|_| g.choose(FRAGMENTS).copied())
            .collect();
        Self(markup)
    }
}

/// Helper to check `check(parent, child)` for every parent/child tag pair.
fn all_edges(root: &DocumentNode, check: impl Fn(&str, &str) -> bool) -> bool {
    root.descendants().all(|parent| {
        parent.children().iter().all(|child| match (parent.tag_type(), child.tag_type()) {
            (Some(parent), Some(child)) => check(parent, child),
            _ => true,
        })
    })
}

/// Helper to collect text nodes that are not under any of `excluded`.
fn texts_outside<'a>(node: &'a DocumentNode, excluded: &[&str], out: &mut Vec<&'a str>) {
    match node {
        DocumentNode::Text(text) => out.push(text.text()),
        DocumentNode::Tag(tag) if !excluded.contains(&tag.tag_type()) => {
            for child in tag.children() {
                texts_outside(child, excluded, out);
            }
        }
        DocumentNode::Tag(_) => {}
    }
}

#[quickcheck]
fn any_string_parses_to_html_root(input: String) -> bool {
    let parsed = parse(&input);
    parsed.root().tag_type() == Some("html")
        && parsed.is_conformant() == parsed.issues().is_empty()
}

#[quickcheck]
fn cells_sit_in_rows_and_rows_in_tables(markup: Markup) -> bool {
    let parsed = parse(&markup.0);
    all_edges(parsed.root(), |parent, child| match child {
        "td" => parent == "tr",
        "tr" => parent == "table",
        _ => true,
    })
}

#[quickcheck]
fn list_items_sit_in_lists(markup: Markup) -> bool {
    let parsed = parse(&markup.0);
    all_edges(parsed.root(), |parent, child| {
        child != "li" || matches!(parent, "ul" | "ol")
    })
}

#[quickcheck]
fn no_scaffolding_or_header_cells_in_tree(markup: Markup) -> bool {
    let parsed = parse(&markup.0);
    parsed
        .root()
        .descendants()
        .skip(1)
        .all(|node| !matches!(node.tag_type(), Some("html" | "body" | "th")))
}

#[quickcheck]
fn text_outside_pre_is_collapsed(markup: Markup) -> bool {
    let parsed = parse(&markup.0);
    let mut texts = Vec::new();
    texts_outside(parsed.root(), &["pre", "head"], &mut texts);
    texts.iter().all(|text| {
        !text.contains("  ") && !text.contains(['\n', '\t', '\r', '\u{000B}', '\u{000C}'])
    })
}

#[quickcheck]
fn text_without_tags_is_one_token(input: String) -> bool {
    if input.contains('<') {
        return true;
    }
    let tokens: Vec<Token> = Tokenizer::new(input.as_str()).collect();
    if input.is_empty() {
        tokens.is_empty()
    } else {
        tokens == vec![Token::Text(input)]
    }
}

#[quickcheck]
fn words_survive_in_source_order(pieces: Vec<(usize, String)>) -> bool {
    const TAGS: &[&str] = &[
        "<table>", "</tr>", "<td>", "<th>", "<li>", "</ul>", "<ol>", "<p>", "</p>", "<b>", "</i>",
        "<pre>", "</pre>", "<br>", "<html>", "<font>",
    ];
    let mut markup = String::new();
    let mut expected = String::new();
    for (tag, word) in &pieces {
        let word: String = word.chars().filter(char::is_ascii_alphanumeric).collect();
        markup.push_str(TAGS[tag % TAGS.len()]);
        markup.push_str(&word);
        expected.push_str(&word);
    }

    parse(&markup).root().text_content() == expected
}
