//! Writing text into elements of an HTML page on disk
//!
//! This is not an HTML parser. Opening tags are located with a regex and the content of a
//! matched element runs up to the next closing tag with the same name, so an element nested
//! inside another element of the same tag is not supported. Comments are skipped.

use crate::sink::Sink;
use eyre::WrapErr;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A tag name followed by attributes, quoted values may contain `>`
static OPENING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?|\s*/)*)\s*>"#,
    )
    .unwrap()
});

/// One `name`, `name=value`, `name="value"` or `name='value'` pair
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

/// A comment runs to the end of the page when it is never closed
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--(?:.*?-->|.*)").unwrap());

/// Elements that never have content
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr", "param",
];

/// Value of the first attribute with the name, empty when it has no value
fn attribute_value<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE
        .captures_iter(attributes)
        .find(|captures| captures[1].eq_ignore_ascii_case(name))
        .map(|captures| {
            (2..=4)
                .find_map(|group| captures.get(group))
                .map_or("", |value| value.as_str())
        })
}

/// Blank out comments byte for byte, so offsets still point into the original page
fn mask_comments(document: &str) -> String {
    COMMENT
        .replace_all(document, |captures: &regex::Captures| " ".repeat(captures[0].len()))
        .into_owned()
}

/// The subset of CSS selectors understood when rewriting a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `.date`
    Class(String),

    /// `#date`
    Id(String),

    /// `time`
    Tag(String),
}

impl FromStr for Selector {
    type Err = eyre::Report;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let is_name = |name: &str| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        let selector = if let Some(class) = value.strip_prefix('.') {
            is_name(class).then(|| Selector::Class(class.to_string()))
        } else if let Some(id) = value.strip_prefix('#') {
            is_name(id).then(|| Selector::Id(id.to_string()))
        } else {
            is_name(value).then(|| Selector::Tag(value.to_ascii_lowercase()))
        };

        selector.ok_or_else(|| {
            eyre::eyre!("Unsupported selector {value:?}, use .class, #id or a tag name")
        })
    }
}

impl Selector {
    fn matches(&self, tag: &str, attributes: &str) -> bool {
        match self {
            Selector::Tag(name) => tag.eq_ignore_ascii_case(name),

            Selector::Id(id) => attribute_value(attributes, "id") == Some(id.as_str()),

            Selector::Class(class) => attribute_value(attributes, "class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
        }
    }

    /// Replace the content of every matching element with the escaped text
    ///
    /// Returns the new document and the number of elements rewritten. Elements inside
    /// comments are left alone.
    pub fn replace_text(&self, document: &str, text: &str) -> (String, usize) {
        let escaped = escape(text);
        let masked = mask_comments(document);
        let lowercase = masked.to_ascii_lowercase();
        let mut output = String::with_capacity(document.len());
        let mut cursor = 0;
        let mut count = 0;

        for captures in OPENING_TAG.captures_iter(&masked) {
            let (Some(whole), Some(tag)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            // Inside an element that was already rewritten
            if whole.start() < cursor {
                continue;
            }

            let tag = tag.as_str();
            let attributes = captures.get(2).map_or("", |a| a.as_str());

            if attributes.trim_end().ends_with('/')
                || VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
                || !self.matches(tag, attributes)
            {
                continue;
            }

            let Some(offset) = find_closing(&lowercase[whole.end()..], tag) else {
                log::warn!("No closing tag for <{tag}> at byte {}", whole.start());
                continue;
            };

            output.push_str(&document[cursor..whole.end()]);
            output.push_str(&escaped);
            cursor = whole.end() + offset;
            count += 1;
        }

        output.push_str(&document[cursor..]);
        (output, count)
    }
}

/// Offset of `</tag>` in a lowercased document, `</tag  >` included but not `</tagline>`
fn find_closing(lowercase: &str, tag: &str) -> Option<usize> {
    let closing = format!("</{}", tag.to_ascii_lowercase());
    let mut from = 0;

    while let Some(offset) = lowercase[from..].find(&closing) {
        let start = from + offset;
        let next = lowercase[start + closing.len()..].chars().next();

        if next.is_some_and(|c| c == '>' || c.is_ascii_whitespace()) {
            return Some(start);
        }

        from = start + closing.len();
    }

    None
}

/// Same escaping a browser applies when serializing a text node
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\u{a0}', "&nbsp;")
}

/// An HTML file whose elements matching a selector receive the text
#[derive(Debug)]
pub struct HtmlDocument {
    path: PathBuf,
    selector: Selector,
}

impl HtmlDocument {
    pub fn new(path: &Path, selector: Selector) -> Self {
        Self {
            path: path.to_path_buf(),
            selector,
        }
    }
}

impl Sink for HtmlDocument {
    /// Rewrite the file in place
    ///
    /// The file is not touched at all when no element matches.
    fn write(&mut self, text: &str) -> eyre::Result<()> {
        let path = &self.path;

        let document = std::fs::read_to_string(path)
            .inspect_err(|e| log::error!("Failed to read {path:?}: {e:?}"))
            .wrap_err(format!("Failed to read {}", path.display()))?;

        let (updated, count) = self.selector.replace_text(&document, text);

        if count == 0 {
            log::warn!("No element matches {:?} in {path:?}", self.selector);
            return Ok(());
        }

        log::info!("Rewrote {count} element(s) in {path:?}");

        std::fs::write(path, updated)
            .inspect_err(|e| log::error!("Failed to write {path:?}: {e:?}"))
            .wrap_err(format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<body>
  <h1 id="title">Home</h1>
  <p class="footer date">Loading...</p>
  <div>
    <span class='date'><em>stale</em></span>
  </div>
  <p class="update">keep me</p>
</body>
</html>"#;

    fn selector(value: &str) -> Selector {
        value.parse().unwrap()
    }

    #[test]
    fn selector_forms() {
        assert_eq!(selector(".date"), Selector::Class("date".into()));
        assert_eq!(selector("#title"), Selector::Id("title".into()));
        assert_eq!(selector("SPAN"), Selector::Tag("span".into()));
        assert!("div > .date".parse::<Selector>().is_err());
        assert!(".".parse::<Selector>().is_err());
    }

    #[test]
    fn every_element_with_class_is_rewritten() {
        let (page, count) = selector(".date").replace_text(PAGE, "Last updated: 2021-2-5");

        assert_eq!(count, 2);
        assert!(page.contains(r#"<p class="footer date">Last updated: 2021-2-5</p>"#));
        assert!(page.contains("<span class='date'>Last updated: 2021-2-5</span>"));
        assert!(page.contains(r#"<p class="update">keep me</p>"#));
        assert!(!page.contains("stale"));
    }

    #[test]
    fn id_selector_rewrites_single_element() {
        let (page, count) = selector("#title").replace_text(PAGE, "New");

        assert_eq!(count, 1);
        assert!(page.contains(r#"<h1 id="title">New</h1>"#));
    }

    #[test]
    fn text_is_escaped() {
        let (page, _) = selector("#title").replace_text(PAGE, "<b>&</b>");
        assert!(page.contains(r#"<h1 id="title">&lt;b&gt;&amp;&lt;/b&gt;</h1>"#));
    }

    #[test]
    fn rewriting_twice_gives_same_page() {
        let date = selector(".date");
        let (once, _) = date.replace_text(PAGE, "Last updated: 2021-2-5");
        let (twice, _) = date.replace_text(&once, "Last updated: 2021-2-5");

        assert_eq!(once, twice);
    }

    #[test]
    fn no_match_leaves_page_as_is() {
        let (page, count) = selector(".missing").replace_text(PAGE, "x");

        assert_eq!(count, 0);
        assert_eq!(page, PAGE);
    }

    #[test]
    fn void_and_unclosed_elements_are_skipped() {
        let page = r#"<img class="date" src="a.png"><br class="date"/><i class="date">open"#;
        let (result, count) = selector(".date").replace_text(page, "x");

        assert_eq!(count, 0);
        assert_eq!(result, page);
    }

    #[test]
    fn closing_tag_must_match_whole_name() {
        let page = "<i class=\"date\">a</img></i >";
        let (result, count) = selector(".date").replace_text(page, "x");

        assert_eq!(count, 1);
        assert_eq!(result, "<i class=\"date\">x</i >");
    }

    #[test]
    fn quoted_angle_bracket_stays_in_attribute() {
        let page = r#"<span class="date" title="a>b">old</span>"#;
        let (result, count) = selector(".date").replace_text(page, "new");

        assert_eq!(count, 1);
        assert_eq!(result, r#"<span class="date" title="a>b">new</span>"#);
    }

    #[test]
    fn class_inside_another_value_does_not_match() {
        let page = r#"<span title="x class=date">old</span><b data-id='id=title'>b</b>"#;

        assert_eq!(selector(".date").replace_text(page, "new"), (page.to_string(), 0));
        assert_eq!(selector("#title").replace_text(page, "new"), (page.to_string(), 0));
    }

    #[test]
    fn commented_out_elements_are_kept() {
        let page = r#"<!-- <span class="date">c</span> --><p class="date">old</p><!-- <i class="date">"#;
        let (result, count) = selector(".date").replace_text(page, "new");

        assert_eq!(count, 1);
        assert_eq!(
            result,
            r#"<!-- <span class="date">c</span> --><p class="date">new</p><!-- <i class="date">"#
        );
    }

    #[test]
    fn attribute_names_ignore_case_and_quotes() {
        assert_eq!(attribute_value(r#" CLASS="a date""#, "class"), Some("a date"));
        assert_eq!(attribute_value(" id=title hidden", "id"), Some("title"));
        assert_eq!(attribute_value(" hidden", "hidden"), Some(""));
        assert_eq!(attribute_value(r#" title="id=x""#, "id"), None);
    }

    #[test]
    fn document_sink_rewrites_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), PAGE).unwrap();

        let mut document = HtmlDocument::new(file.path(), selector(".date"));
        document.write("Last updated: 2021-2-5").unwrap();

        let page = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(page.matches("Last updated: 2021-2-5").count(), 2);
    }

    #[test]
    fn document_sink_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut document = HtmlDocument::new(&dir.path().join("index.html"), selector(".date"));

        assert!(document.write("x").is_err());
    }
}
