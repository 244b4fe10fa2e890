//! Verse extraction from chapter page markup.
//!
//! The page shape is pinned to a small, named selector set: one container
//! (with a single fallback), verse-start markers, and a list of decoration
//! subtrees that are dropped wholesale. A shape change at the source shows
//! up as one explicit `ParseError::ContainerMissing` instead of wrong data.

use crate::error::ParseError;
use scraper::{Html, Node, Selector};
use scriptura_model::VerseRecord;
use std::ops::Deref;
use unicode_normalization::UnicodeNormalization;

/// Classes whose whole subtree is stripped before text collection.
const STRIPPED_CLASSES: [&str; 4] = ["footnote", "footnotes", "crossreference", "crossrefs"];

/// Extract the ordered verse list from a chapter page.
///
/// Verses come back in document order, duplicate labels preserved. A verse
/// element without a printed label falls back to its 1-based position.
/// Fails when the verse container is absent or yields zero verses.
pub fn extract(markup: &str) -> Result<Vec<VerseRecord>, ParseError> {
    let document = Html::parse_document(markup);

    let container_sel =
        Selector::parse(r#"div[class^="passage-content"]"#).expect("valid selector");
    let fallback_sel = Selector::parse(r#"div[class^="passage-text"]"#).expect("valid selector");

    let container = document
        .select(&container_sel)
        .next()
        .or_else(|| document.select(&fallback_sel).next())
        .ok_or(ParseError::ContainerMissing)?;

    // (label, accumulated raw text) per verse marker, in document order
    let mut verses: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, String)> = None;
    walk_node(container.id(), container.tree(), &mut verses, &mut current);
    if let Some(verse) = current.take() {
        verses.push(verse);
    }

    let mut records = Vec::new();
    for (position, (label, body)) in verses.into_iter().enumerate() {
        let normalized: String = body.nfc().collect();
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            // A marker with no following text would break the non-empty
            // invariant, so it is dropped rather than written out.
            tracing::debug!(label = %label, "Dropping verse marker with no text");
            continue;
        }
        let verse = if label.is_empty() {
            (position + 1).to_string()
        } else {
            label
        };
        let readable = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        records.push(VerseRecord {
            verse,
            text: format!("{trimmed}\n"),
            readable_text: format!("{readable}\n\n"),
        });
    }

    if records.is_empty() {
        return Err(ParseError::NoVerses);
    }
    Ok(records)
}

fn walk_node(
    node_id: ego_tree::NodeId,
    tree: &ego_tree::Tree<Node>,
    verses: &mut Vec<(String, String)>,
    current: &mut Option<(String, String)>,
) {
    let node = tree.get(node_id).expect("valid node id");

    match node.value() {
        Node::Text(text) => {
            // Text before the first verse marker is page chrome, dropped.
            if let Some((_, body)) = current {
                body.push_str(text.deref());
            }
        }
        Node::Element(elem) => {
            match elem.name() {
                // Section headings are decoration, never verse text
                "h3" => return,
                "br" => {
                    if let Some((_, body)) = current {
                        if !body.ends_with('\n') {
                            body.push('\n');
                        }
                    }
                    return;
                }
                _ => {}
            }

            if elem
                .classes()
                .any(|c| STRIPPED_CLASSES.contains(&c))
            {
                return;
            }

            if elem.name() == "sup" && elem.classes().any(|c| c == "versenum") {
                let label = collect_all_text(node_id, tree).trim().to_string();
                start_verse(verses, current, label);
                // The label itself is not part of the verse body
                return;
            }

            // Verse 1 is usually marked with the chapter number instead
            if elem.name() == "span" && elem.classes().any(|c| c == "chapternum") {
                let text = collect_all_text(node_id, tree);
                let trimmed = text.trim();
                if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
                    start_verse(verses, current, "1".to_string());
                    return;
                }
            }

            for child in node.children() {
                walk_node(child.id(), tree, verses, current);
            }
        }
        _ => {}
    }
}

fn start_verse(
    verses: &mut Vec<(String, String)>,
    current: &mut Option<(String, String)>,
    label: String,
) {
    if let Some(finished) = current.replace((label, String::new())) {
        verses.push(finished);
    }
}

/// Collect all text content under a node, recursively.
fn collect_all_text(node_id: ego_tree::NodeId, tree: &ego_tree::Tree<Node>) -> String {
    let node = tree.get(node_id).expect("valid node id");
    let mut text = String::new();

    for child in node.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t.deref()),
            Node::Element(elem) => {
                if elem.name() == "br" {
                    text.push('\n');
                } else {
                    text.push_str(&collect_all_text(child.id(), tree));
                }
            }
            _ => {}
        }
    }

    text
}
