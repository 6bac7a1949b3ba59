//! Data block location and URL extraction
//!
//! Finds `const <name> = [ ... ];` literals in page source, parses each with
//! the lenient parser, and collects the link fields of every record.
//!
//! Block matching is non-greedy: the first `];` after the opening bracket
//! ends the block, even when it sits inside a string value.

use crate::error::{BlockError, ExtractError};
use crate::lenient;
use crate::schema::Record;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A named array literal located in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedArrayBlock<'a> {
    pub name: &'a str,
    /// The literal from `[` to `]`, without the statement terminator
    pub text: &'a str,
    /// 1-based line where the declaration starts
    pub line: usize,
}

/// Unique URLs in discovery order
#[derive(Debug, Clone, Default)]
pub struct UrlSet {
    seen: HashSet<String>,
    urls: Vec<String>,
}

impl UrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a URL, ignoring blanks and duplicates. Returns true if it was new.
    pub fn insert(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());
        self.urls.push(url.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.urls.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }
}

impl<'a> IntoIterator for &'a UrlSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Everything extraction learned about a document
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Number of named blocks located, parsed or not
    pub blocks_found: usize,
    /// Blocks that failed to parse
    pub skipped: Vec<BlockError>,
    pub urls: UrlSet,
}

/// Locates named data blocks and pulls link fields out of their records
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    pattern: Regex,
    names: Vec<String>,
}

impl RecordExtractor {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, ExtractError> {
        if names.is_empty() {
            return Err(ExtractError::NoBlockNames);
        }

        let alternatives = names
            .iter()
            .map(|n| regex::escape(n.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"(?s)\b(?:const|let|var)\s+({})\s*=\s*(\[.*?\]);",
            alternatives
        ))?;

        Ok(Self {
            pattern,
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        })
    }

    /// Locate every named block, in document order
    pub fn blocks<'a>(&self, document: &'a str) -> Vec<NamedArrayBlock<'a>> {
        self.pattern
            .captures_iter(document)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(NamedArrayBlock {
                    name: caps.get(1)?.as_str(),
                    text: caps.get(2)?.as_str(),
                    line: document[..whole.start()].matches('\n').count() + 1,
                })
            })
            .collect()
    }

    /// Collect unique URLs from all parseable blocks.
    ///
    /// Fails only when no block is located at all; a block that does not
    /// parse is recorded in [`Extraction::skipped`] and the rest continue.
    pub fn extract(&self, document: &str) -> Result<Extraction, ExtractError> {
        let blocks = self.blocks(document);
        if blocks.is_empty() {
            return Err(ExtractError::NoDataBlocks {
                names: self.names.clone(),
            });
        }

        let mut extraction = Extraction {
            blocks_found: blocks.len(),
            ..Extraction::default()
        };

        for block in &blocks {
            match lenient::parse(block.text) {
                Ok(value) => {
                    let added = collect_urls(&value, &mut extraction.urls);
                    debug!(block = block.name, line = block.line, added, "Parsed data block");
                }
                Err(source) => {
                    let err = BlockError {
                        name: block.name.to_string(),
                        line: block.line,
                        source,
                    };
                    warn!(block = block.name, line = block.line, "{}", err);
                    extraction.skipped.push(err);
                }
            }
        }

        Ok(extraction)
    }
}

/// Add the link fields of every record in `value`; returns how many were new
fn collect_urls(value: &Value, urls: &mut UrlSet) -> usize {
    let Some(items) = value.as_array() else {
        return 0;
    };

    items
        .iter()
        .filter_map(Record::from_value)
        .map(|record| record.urls().filter(|url| urls.insert(url)).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BLOCK_NAMES;

    fn extractor() -> RecordExtractor {
        RecordExtractor::new(&DEFAULT_BLOCK_NAMES).unwrap()
    }

    const PAGE: &str = r#"
        <html>
        <body>
        <script>
            const institutes = [
                {"name": "A", "url": "https://good.example", "homepageUrl": "https://a.example"},
                {"name": "B", "url": "https://bad.example"},
            ];
            const jobBoards = [
                { name: 'Board', url: 'https://jobs.example', homepageUrl: "https://a.example" },
            ];
            const unrelated = [{"url": "https://ignored.example"}];
        </script>
        </body>
        </html>
    "#;

    #[test]
    fn test_locates_named_blocks() {
        let blocks = extractor().blocks(PAGE);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "institutes");
        assert_eq!(blocks[0].line, 5);
        assert!(blocks[0].text.starts_with('['));
        assert!(blocks[0].text.ends_with(']'));
        assert_eq!(blocks[1].name, "jobBoards");
    }

    #[test]
    fn test_extract_urls_in_discovery_order() {
        let extraction = extractor().extract(PAGE).unwrap();
        assert_eq!(extraction.blocks_found, 2);
        assert!(extraction.skipped.is_empty());
        assert_eq!(
            extraction.urls.as_slice(),
            [
                "https://good.example",
                "https://a.example",
                "https://bad.example",
                "https://jobs.example",
            ]
        );
        assert!(!extraction
            .urls
            .iter()
            .any(|url| url == "https://ignored.example"));
    }

    #[test]
    fn test_no_blocks_is_fatal() {
        let err = extractor()
            .extract("<html><script>const other = [];</script></html>")
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoDataBlocks { .. }));
    }

    #[test]
    fn test_blocks_without_urls() {
        let doc = r#"const institutes = [{"name": "A"}, {"name": "B", "url": ""}];"#;
        let extraction = extractor().extract(doc).unwrap();
        assert_eq!(extraction.blocks_found, 1);
        assert!(extraction.urls.is_empty());
    }

    #[test]
    fn test_bad_block_is_skipped() {
        let doc = r#"
            const institutes = [{"url": "https://a.example"} {"url": "https://b.example"}];
            const jobBoards = [{"url": "https://jobs.example"}];
        "#;
        let extraction = extractor().extract(doc).unwrap();
        assert_eq!(extraction.blocks_found, 2);
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].name, "institutes");
        assert_eq!(extraction.skipped[0].line, 2);
        assert_eq!(extraction.urls.as_slice(), ["https://jobs.example"]);
    }

    #[test]
    fn test_deeply_nested_block_is_skipped() {
        let doc = format!(
            "const institutes = {}];\nconst jobBoards = [{{\"url\": \"https://jobs.example\"}}];",
            "[".repeat(200_000)
        );
        let extraction = extractor().extract(&doc).unwrap();
        assert_eq!(extraction.blocks_found, 2);
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].name, "institutes");
        assert_eq!(extraction.skipped[0].source.message, "nesting too deep");
        assert_eq!(extraction.urls.as_slice(), ["https://jobs.example"]);
    }

    #[test]
    fn test_trailing_comma_yields_same_urls() {
        let plain = r#"const institutes = [{"name":"A","url":"https://good.example"},{"name":"B","url":"https://bad.example"}];"#;
        let trailing = r#"const institutes = [{"name":"A","url":"https://good.example",},{"name":"B","url":"https://bad.example"}];"#;
        let a = extractor().extract(plain).unwrap();
        let b = extractor().extract(trailing).unwrap();
        assert_eq!(a.urls.as_slice(), b.urls.as_slice());
        assert_eq!(a.urls.len(), 2);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extractor().extract(PAGE).unwrap();
        let second = extractor().extract(PAGE).unwrap();
        let a: HashSet<_> = first.urls.iter().collect();
        let b: HashSet<_> = second.urls.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_block_names() {
        let extractor = RecordExtractor::new(&["links"]).unwrap();
        let extraction = extractor
            .extract(r#"let links = [{url: "https://x.example"}];"#)
            .unwrap();
        assert_eq!(extraction.urls.as_slice(), ["https://x.example"]);

        assert!(matches!(
            RecordExtractor::new::<&str>(&[]),
            Err(ExtractError::NoBlockNames)
        ));
    }

    #[test]
    fn test_url_set_dedup() {
        let mut urls = UrlSet::new();
        assert!(urls.insert("https://dup.example"));
        assert!(!urls.insert("https://dup.example"));
        assert!(!urls.insert(" https://dup.example "));
        assert!(!urls.insert("   "));
        assert_eq!(urls.len(), 1);
    }
}
