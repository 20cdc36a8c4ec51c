//! Search response parsing.
//!
//! `feed-rs` handles the Atom/RSS structure. The OpenSearch response
//! elements (`totalResults`, `startIndex`, `itemsPerPage`, `Query`) and the
//! per-entry `hint` and `Name` elements are namespaced extensions the generic
//! feed model drops, so a second pass with `quick-xml` picks them up.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::types::{QueryElement, SearchEntry, SearchFeed};
use crate::{OpenSearchError, Result};

/// Parse a search response body (Atom or RSS) into a [`SearchFeed`].
pub fn parse_feed(body: &str) -> Result<SearchFeed> {
    let feed = feed_rs::parser::parse(body.as_bytes())?;
    let ext = scan_extensions(body)?;

    let entries = feed
        .entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let first_link = entry.links.first();
            let extra = ext.entries.get(i).cloned().unwrap_or_default();
            SearchEntry {
                url: first_link.map(|l| l.href.clone()),
                formatted_url: first_link.and_then(|l| l.title.clone()),
                id: entry.id,
                title: entry.title.map(|t| t.content),
                summary: entry.summary.map(|t| t.content),
                content: entry.content.and_then(|c| c.body),
                hints: extra.hints,
                hint_type: extra.hint_type,
            }
        })
        .collect();

    Ok(SearchFeed {
        title: feed.title.map(|t| t.content),
        entries,
        total_results: ext.total_results,
        start_index: ext.start_index,
        items_per_page: ext.items_per_page,
        query: ext.query,
    })
}

#[derive(Debug, Default)]
struct Extensions {
    total_results: Option<String>,
    start_index: Option<String>,
    items_per_page: Option<String>,
    query: Option<QueryElement>,
    /// One per entry, in document order.
    entries: Vec<EntryExtensions>,
}

#[derive(Debug, Clone, Default)]
struct EntryExtensions {
    hints: Vec<String>,
    hint_type: Option<String>,
}

fn scan_extensions(body: &str) -> Result<Extensions> {
    let feed_err = |e: quick_xml::Error| OpenSearchError::Feed(e.to_string());

    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut ext = Extensions::default();
    // Local names of open elements.
    let mut stack: Vec<String> = Vec::new();
    // Stack depth at which the current entry was opened.
    let mut entry_depth: Option<usize> = None;

    loop {
        match reader.read_event().map_err(feed_err)? {
            Event::Start(e) => {
                let name = local_name(&e);
                if entry_depth.is_none() && is_entry(&name) {
                    ext.entries.push(EntryExtensions::default());
                    entry_depth = Some(stack.len());
                }
                on_element(&e, &name, &stack, &mut ext).map_err(feed_err)?;
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(&e);
                if entry_depth.is_none() && is_entry(&name) {
                    ext.entries.push(EntryExtensions::default());
                }
                on_element(&e, &name, &stack, &mut ext).map_err(feed_err)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(feed_err)?;
                on_text(&text, &stack, entry_depth.is_some(), &mut ext);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                on_text(&text, &stack, entry_depth.is_some(), &mut ext);
            }
            Event::End(_) => {
                stack.pop();
                if entry_depth == Some(stack.len()) {
                    entry_depth = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ext)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn is_entry(name: &str) -> bool {
    name == "entry" || name == "item"
}

fn is_feed_level(stack: &[String]) -> bool {
    matches!(stack.last().map(String::as_str), Some("feed" | "channel"))
}

fn on_element(
    e: &BytesStart<'_>,
    name: &str,
    stack: &[String],
    ext: &mut Extensions,
) -> std::result::Result<(), quick_xml::Error> {
    if name == "Query" && ext.query.is_none() && is_feed_level(stack) {
        ext.query = Some(QueryElement {
            role: attribute(e, "role")?,
            search_terms: attribute(e, "searchTerms")?,
            start_page: attribute(e, "startPage")?,
        });
    }
    Ok(())
}

fn on_text(text: &str, stack: &[String], in_entry: bool, ext: &mut Extensions) {
    let Some((name, parents)) = stack.split_last() else {
        return;
    };
    if in_entry {
        let Some(entry) = ext.entries.last_mut() else {
            return;
        };
        match name.as_str() {
            "hint" => entry.hints.push(text.to_string()),
            "Name" => entry
                .hint_type
                .get_or_insert_with(String::new)
                .push_str(text),
            _ => {}
        }
        return;
    }
    if !is_feed_level(parents) {
        return;
    }
    let slot = match name.as_str() {
        "totalResults" => &mut ext.total_results,
        "startIndex" => &mut ext.start_index,
        "itemsPerPage" => &mut ext.items_per_page,
        _ => return,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

fn attribute(
    e: &BytesStart<'_>,
    name: &str,
) -> std::result::Result<Option<String>, quick_xml::Error> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}
