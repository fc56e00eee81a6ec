//! Turning documents and raw files into practice text.
//!
//! The default [`ExtractionStrategy::DepthSearch`] looks at every node at a
//! fixed depth below the root and keeps the one with the most text, walking
//! back up towards the root when the tree is too shallow. The older
//! [`ExtractionStrategy::ContentContainer`] policy only trusts one semantic
//! container such as `<article>`.

pub mod html;

use itertools::Itertools;
use tracing::debug;

use crate::error::{AcquireError, Result};

pub use html::{extract_html, HtmlDocument};

pub const DEFAULT_SEARCH_DEPTH: usize = 3;
pub const DEFAULT_CONTAINER_TAG: &str = "article";

/// Read-only view of a node in a structured document.
pub trait DocumentNode: Clone {
    fn tag_name(&self) -> &str;

    /// Direct children in document order.
    fn child_nodes(&self) -> Vec<Self>;

    /// Text as a reader would see it, before whitespace normalization.
    fn rendered_text(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    DepthSearch { depth: usize },
    ContentContainer { tag: String },
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        Self::DepthSearch {
            depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

pub fn extract<N: DocumentNode>(root: &N, strategy: &ExtractionStrategy) -> Result<String> {
    match strategy {
        ExtractionStrategy::DepthSearch { depth } => depth_search(root, *depth),
        ExtractionStrategy::ContentContainer { tag } => container_search(root, tag),
    }
}

/// Longest normalized text among the nodes at `depth`, falling back to
/// shallower depths when nothing lives that deep.
pub fn depth_search<N: DocumentNode>(root: &N, depth: usize) -> Result<String> {
    let (found_at, candidates) = candidates_with_fallback(root, depth);
    debug!(
        requested = depth,
        found_at,
        candidates = candidates.len(),
        "depth search"
    );

    // strict comparison keeps the first candidate on ties
    let best = candidates
        .iter()
        .map(|node| normalize_whitespace(&node.rendered_text()))
        .fold(String::new(), |best, text| {
            if text.chars().count() > best.chars().count() {
                text
            } else {
                best
            }
        });

    if best.is_empty() {
        Err(AcquireError::NoContentFound)
    } else {
        Ok(best)
    }
}

/// Nodes at exactly `depth`, or at the deepest shallower level that has any.
/// Depth 0 is the root itself, so the result is never empty.
pub fn candidates_with_fallback<N: DocumentNode>(root: &N, depth: usize) -> (usize, Vec<N>) {
    for level in (0..=depth).rev() {
        let mut found = Vec::new();
        collect_at_depth(root, level, &mut found);
        if !found.is_empty() {
            return (level, found);
        }
    }
    (0, vec![root.clone()])
}

fn collect_at_depth<N: DocumentNode>(node: &N, depth: usize, out: &mut Vec<N>) {
    if depth == 0 {
        out.push(node.clone());
        return;
    }
    for child in node.child_nodes() {
        collect_at_depth(&child, depth - 1, out);
    }
}

/// The first node (pre-order) named `tag`, normalized.
pub fn container_search<N: DocumentNode>(root: &N, tag: &str) -> Result<String> {
    let text = find_first(root, tag)
        .map(|node| normalize_whitespace(&node.rendered_text()))
        .unwrap_or_default();

    if text.is_empty() {
        debug!(tag, "content container missing or empty");
        Err(AcquireError::NoContentFound)
    } else {
        Ok(text)
    }
}

// Pre-order walk on an explicit stack; documents can nest arbitrarily deep.
fn find_first<N: DocumentNode>(root: &N, tag: &str) -> Option<N> {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if node.tag_name().eq_ignore_ascii_case(tag) {
            return Some(node);
        }
        stack.extend(node.child_nodes().into_iter().rev());
    }
    None
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Collapse every run of whitespace to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(is_space).filter(|word| !word.is_empty()).join(" ")
}

/// Clean up decoded file contents: unify line endings, then collapse
/// whitespace like any other source.
pub fn normalize_file_text(raw: &str) -> Result<String> {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = normalize_whitespace(&unified);
    if text.is_empty() {
        Err(AcquireError::EmptyContent)
    } else {
        Ok(text)
    }
}
