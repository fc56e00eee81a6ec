use scraper::{node::Text, ElementRef, Html, Node};

use super::{extract, DocumentNode, ExtractionStrategy};
use crate::error::{AcquireError, Result};

/// Subtrees a reader never sees.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// A parsed HTML page. Parsing is error tolerant; the only structural
/// failure is a page without a `<body>`.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn body(&self) -> Result<ElementRef<'_>> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .ok_or_else(|| AcquireError::parse("document has no body"))
    }
}

/// Parse `markup` and pull the practice text out of its body.
pub fn extract_html(markup: &str, strategy: &ExtractionStrategy) -> Result<String> {
    let doc = HtmlDocument::parse(markup);
    let body = doc.body()?;
    extract(&body, strategy)
}

impl<'a> DocumentNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn child_nodes(&self) -> Vec<Self> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn rendered_text(&self) -> String {
        let mut out = String::new();
        if !HIDDEN_TAGS.contains(&self.value().name()) {
            render_into(*self, &mut out);
        }
        out
    }
}

enum Step<'a> {
    Enter(ElementRef<'a>),
    Text(&'a Text),
    Newline,
}

// Roughly what a browser's innerText gives: hidden subtrees dropped, block
// boundaries turned into line breaks. Walks with an explicit stack so deeply
// nested markup cannot exhaust the thread stack.
fn render_into(root: ElementRef<'_>, out: &mut String) {
    let mut stack = Vec::new();
    push_children(root, &mut stack);
    while let Some(step) = stack.pop() {
        match step {
            Step::Text(text) => out.push_str(text),
            Step::Newline => out.push('\n'),
            Step::Enter(element) => {
                let name = element.value().name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if BLOCK_TAGS.contains(&name) {
                    out.push('\n');
                    // popped once the children are done
                    stack.push(Step::Newline);
                }
                push_children(element, &mut stack);
            }
        }
    }
}

// Children go on in reverse so the first one is popped first.
fn push_children<'a>(element: ElementRef<'a>, stack: &mut Vec<Step<'a>>) {
    let children: Vec<_> = element.children().collect();
    for child in children.into_iter().rev() {
        match child.value() {
            Node::Text(text) => stack.push(Step::Text(text)),
            Node::Element(el) if !HIDDEN_TAGS.contains(&el.name()) => {
                if let Some(element) = ElementRef::wrap(child) {
                    stack.push(Step::Enter(element));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PAGE: &str = r#"
        <html>
          <head><title>Ignored title</title></head>
          <body>
            <header><nav><a href="/">Home</a></nav></header>
            <div id="content">
              <div class="post">
                <p>First paragraph<br>continues here.</p>
                <p>Second <b>bold</b> paragraph.</p>
                <script>var tracking = true;</script>
              </div>
              <aside><div>Related</div></aside>
            </div>
          </body>
        </html>
    "#;

    #[test]
    fn test_body_is_the_root() {
        let doc = HtmlDocument::parse(PAGE);
        let body = doc.body().unwrap();
        assert_eq!(body.tag_name(), "body");
        let children: Vec<_> = body
            .child_nodes()
            .iter()
            .map(|c| c.tag_name().to_string())
            .collect();
        assert_eq!(children, vec!["header", "div"]);
    }

    #[test]
    fn test_rendered_text_skips_scripts_and_separates_blocks() {
        let doc =
            HtmlDocument::parse("<body><div><p>a</p><p>b</p><script>x()</script></div></body>");
        let body = doc.body().unwrap();
        let text = super::super::normalize_whitespace(&body.rendered_text());
        assert_eq!(text, "a b");
    }

    #[test]
    fn test_extract_html_depth_search() {
        let text = extract_html(PAGE, &ExtractionStrategy::DepthSearch { depth: 2 }).unwrap();
        assert_eq!(
            text,
            "First paragraph continues here. Second bold paragraph."
        );
    }

    #[test]
    fn test_extract_html_falls_back_on_shallow_page() {
        let text = extract_html(
            "<body><p>tiny</p><p>the longest one</p></body>",
            &ExtractionStrategy::DepthSearch { depth: 3 },
        )
        .unwrap();
        assert_eq!(text, "the longest one");
    }

    #[test]
    fn test_extract_html_container_strategy() {
        let markup =
            "<body><div>menu</div><article><h1>Title</h1><p>Body text</p></article></body>";
        let text = extract_html(
            markup,
            &ExtractionStrategy::ContentContainer {
                tag: "article".to_string(),
            },
        )
        .unwrap();
        assert_eq!(text, "Title Body text");
    }

    #[test]
    fn test_extract_html_empty_page() {
        assert_matches!(
            extract_html("<html><body>  </body></html>", &ExtractionStrategy::default()),
            Err(AcquireError::NoContentFound)
        );
    }

    #[test]
    fn test_frameset_page_has_no_body() {
        let doc = HtmlDocument::parse("<html><frameset><frame src=\"a.html\"></frameset></html>");
        assert_matches!(doc.body(), Err(AcquireError::Parse { .. }));
    }

    #[test]
    fn test_deeply_nested_page_does_not_overflow() {
        const LEVELS: usize = 10_000;
        let markup = format!(
            "<body>{}<article><p>deep text</p></article>{}</body>",
            "<div>".repeat(LEVELS),
            "</div>".repeat(LEVELS)
        );

        // a small stack so a recursive walk of this page would overflow it
        let worker = std::thread::Builder::new()
            .stack_size(512 * 1024)
            .spawn(move || {
                let depth = extract_html(&markup, &ExtractionStrategy::default());
                let container = extract_html(
                    &markup,
                    &ExtractionStrategy::ContentContainer {
                        tag: "article".to_string(),
                    },
                );
                (depth, container)
            })
            .unwrap();

        let (depth, container) = worker.join().unwrap();
        assert_eq!(depth.unwrap(), "deep text");
        assert_eq!(container.unwrap(), "deep text");
    }
}
