//! HTML extraction for Microsoft Learn API reference pages.
//!
//! A reference page looks roughly like:
//!
//! ```html
//! <meta property="og:description" content="Closes an open object handle.">
//! <h2>Syntax</h2>
//! <pre><code>BOOL CloseHandle(
//!   [in] HANDLE hObject
//! );</code></pre>
//! <h2>Parameters</h2>
//! <p><code>[in] hObject</code></p>
//! <p>A valid handle to an open object.</p>
//! <h2>Return value</h2>
//! <p>If the function succeeds, the return value is nonzero.</p>
//! ```
//!
//! Paragraphs are attributed to the nearest preceding `<h2>`. Syntax is the
//! first `<pre>` in the Syntax section, or failing that the text of the
//! element right after the Syntax heading. The page
//! layout is outside our control, so extraction reports what it saw and
//! lets the caller classify the page.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::types::DocSections;

const SYNTAX_HEADING: &str = "Syntax";
const PARAMETERS_HEADING: &str = "Parameters";
const RETURN_VALUE_HEADING: &str = "Return value";

static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:description"]"#).expect("valid og:description selector")
});

/// What a page turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageShape {
    /// A function reference page with a Syntax section.
    Function(DocSections),
    /// A recognizable article without a Syntax section (overview, guide).
    NotAFunction,
    /// No `<h2>` sections at all, or a Syntax section with nothing in it.
    Unrecognized,
}

/// Parse a reference page and classify it.
pub(crate) fn extract_page(html: &str) -> PageShape {
    let document = Html::parse_document(html);

    let mut headings = 0usize;
    let mut current: Option<String> = None;
    let mut syntax_heading_seen = false;
    let mut awaiting_syntax = false;
    let mut syntax: Option<String> = None;
    let mut syntax_fallback: Option<String> = None;
    let mut paragraphs: HashMap<String, Vec<String>> = HashMap::new();

    for node in document.root_element().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        match element.value().name() {
            "h2" => {
                headings += 1;
                // A code block only counts inside the Syntax section.
                awaiting_syntax = false;
                let title = collapse_whitespace(element);
                if !syntax_heading_seen && title == SYNTAX_HEADING {
                    syntax_heading_seen = true;
                    awaiting_syntax = true;
                    syntax_fallback = element
                        .next_siblings()
                        .find_map(ElementRef::wrap)
                        .filter(|next| next.value().name() != "h2")
                        .map(code_block_text)
                        .filter(|s| !s.is_empty());
                }
                current = Some(title);
            }
            "pre" if awaiting_syntax => {
                syntax = Some(code_block_text(element)).filter(|s| !s.is_empty());
                awaiting_syntax = syntax.is_none();
            }
            "p" => {
                if let Some(heading) = &current {
                    let text = collapse_whitespace(element);
                    if !text.is_empty() {
                        paragraphs.entry(heading.clone()).or_default().push(text);
                    }
                }
            }
            _ => {}
        }
    }

    if headings == 0 {
        return PageShape::Unrecognized;
    }
    let syntax = match syntax.or(syntax_fallback) {
        Some(syntax) => syntax,
        // A Syntax heading marks a function page we failed to read.
        None if syntax_heading_seen => return PageShape::Unrecognized,
        None => return PageShape::NotAFunction,
    };

    let description = document
        .select(&OG_DESCRIPTION)
        .find_map(|meta| meta.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let return_value = paragraphs
        .remove(RETURN_VALUE_HEADING)
        .map(|lines| lines.join("\n"))
        .filter(|s| !s.is_empty());

    PageShape::Function(DocSections {
        syntax: Some(syntax),
        description,
        return_value,
        parameters: paragraphs.remove(PARAMETERS_HEADING),
        resolved_as: None,
    })
}

/// All descendant text, whitespace runs collapsed to single spaces.
fn collapse_whitespace(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of a `<pre>` block with blank lines and trailing spaces removed.
/// Leading indentation is kept.
fn code_block_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOSE_HANDLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta property="og:description" content="Closes an open object handle.">
  <title>CloseHandle function (handleapi.h)</title>
</head>
<body>
  <h1>CloseHandle function (handleapi.h)</h1>
  <p>Closes an open object handle.</p>
  <h2 id="syntax">Syntax</h2>
  <pre><code class="lang-cpp">BOOL CloseHandle(
  [in] HANDLE hObject
);
</code></pre>
  <h2 id="parameters">Parameters</h2>
  <p><code>[in] hObject</code></p>
  <p>A valid handle to an open object.</p>
  <h2 id="return-value">Return value</h2>
  <p>If the function succeeds, the return value is nonzero.</p>
  <p>If the function fails, the return value is zero.</p>
  <h2 id="remarks">Remarks</h2>
  <p>The CloseHandle function closes handles to the following objects.</p>
</body>
</html>"#;

    #[test]
    fn extracts_all_sections() {
        let PageShape::Function(sections) = extract_page(CLOSE_HANDLE_PAGE) else {
            panic!("expected a function page");
        };
        assert_eq!(
            sections.syntax.as_deref(),
            Some("BOOL CloseHandle(\n  [in] HANDLE hObject\n);")
        );
        assert_eq!(
            sections.description.as_deref(),
            Some("Closes an open object handle.")
        );
        assert_eq!(
            sections.return_value.as_deref(),
            Some(
                "If the function succeeds, the return value is nonzero.\n\
                 If the function fails, the return value is zero."
            )
        );
        assert_eq!(
            sections.parameters,
            Some(vec![
                "[in] hObject".to_string(),
                "A valid handle to an open object.".to_string()
            ])
        );
    }

    #[test]
    fn missing_return_value_is_partial_not_failure() {
        let html = r#"<html><body>
            <h2>Syntax</h2><pre>void ExitProcess(UINT uExitCode);</pre>
            <h2>Parameters</h2><p>uExitCode</p>
        </body></html>"#;
        let PageShape::Function(sections) = extract_page(html) else {
            panic!("expected a function page");
        };
        assert_eq!(
            sections.syntax.as_deref(),
            Some("void ExitProcess(UINT uExitCode);")
        );
        assert_eq!(sections.return_value, None);
        assert_eq!(sections.description, None);
    }

    #[test]
    fn article_without_syntax_is_not_a_function() {
        let html = r#"<html><body>
            <h2>Overview</h2><p>This header is used by System Services.</p>
            <h2>Functions</h2><p>CloseHandle</p>
        </body></html>"#;
        assert_eq!(extract_page(html), PageShape::NotAFunction);
    }

    #[test]
    fn page_without_headings_is_unrecognized() {
        assert_eq!(
            extract_page("<html><body><p>Service unavailable</p></body></html>"),
            PageShape::Unrecognized
        );
        assert_eq!(extract_page(""), PageShape::Unrecognized);
    }

    #[test]
    fn syntax_without_pre_uses_next_element() {
        let html = r#"<html><body>
            <h2>Syntax</h2>
            <div class="code">BOOL CloseHandle(HANDLE hObject);</div>
            <h2>Return value</h2><p>Nonzero on success.</p>
        </body></html>"#;
        let PageShape::Function(sections) = extract_page(html) else {
            panic!("expected a function page");
        };
        assert_eq!(
            sections.syntax.as_deref(),
            Some("BOOL CloseHandle(HANDLE hObject);")
        );
        assert_eq!(sections.return_value.as_deref(), Some("Nonzero on success."));
    }

    #[test]
    fn empty_syntax_section_is_unrecognized() {
        let html = r#"<html><body>
            <h2>Syntax</h2>
            <h2>Remarks</h2><p>See the header.</p>
            <pre>int unrelated();</pre>
        </body></html>"#;
        assert_eq!(extract_page(html), PageShape::Unrecognized);
    }

    #[test]
    fn collapses_nested_markup_whitespace() {
        let html = r#"<html><body>
            <h2>Syntax</h2><pre>int f();</pre>
            <h2>Return value</h2>
            <p>Returns   <b>TRUE</b>
               on success.</p>
        </body></html>"#;
        let PageShape::Function(sections) = extract_page(html) else {
            panic!("expected a function page");
        };
        assert_eq!(
            sections.return_value.as_deref(),
            Some("Returns TRUE on success.")
        );
    }
}
