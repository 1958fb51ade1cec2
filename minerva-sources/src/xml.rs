//! Minimal hand-rolled XML field extraction.
//!
//! The arXiv Atom feed and the PubMed efetch payload are both shallow,
//! well-formed XML; extracting a handful of known tags by string scanning
//! avoids a full XML dependency and tolerates the namespace noise both APIs
//! emit.

/// Extract all `<tag>...</tag>` blocks from the document, in order.
///
/// The opening tag may carry attributes.
pub(crate) fn extract_blocks(xml: &str, tag: &str) -> Vec<String> {
    let open = format!("<{}", tag);
    let end_tag = format!("</{}>", tag);
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = xml[search_from..].find(&open) {
        let start = search_from + pos;
        // Reject longer tag names sharing this prefix.
        let after = xml[start + open.len()..].chars().next();
        if !matches!(after, Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('\r')) {
            search_from = start + open.len();
            continue;
        }
        let end = match xml[start..].find(&end_tag) {
            Some(pos) => start + pos + end_tag.len(),
            None => break,
        };
        blocks.push(xml[start..end].to_string());
        search_from = end;
    }

    blocks
}

/// Extract the text content of the first occurrence of `<tag ...>text</tag>`.
pub(crate) fn extract_tag_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let start_pos = xml.find(&open)?;
    // The opening tag may carry attributes.
    let content_start = xml[start_pos..].find('>')? + start_pos + 1;
    let content_end = xml[content_start..].find(&close)? + content_start;

    Some(xml[content_start..content_end].trim().to_string())
}

/// Extract an attribute value from a tag string.
pub(crate) fn extract_attribute(tag: &str, attr: &str) -> Option<String> {
    let search = format!("{}=\"", attr);
    let start = tag.find(&search)? + search.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}
