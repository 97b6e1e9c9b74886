use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    // "CHAPTER <word>", then a line break (optionally a blank line), then the title line
    static ref CHAPTER_HEADER: Regex =
        Regex::new(r"(?i)(CHAPTER\s+\w+)\s*(?:\n\n|\n\s*)([^\n]+)").expect("valid chapter pattern");
}

/// A chapter heading and the title line that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterHeader {
    pub chapter: String,
    pub title: String,
}

/// Find chapter headings in raw document text.
///
/// Must see the text before line breaks are collapsed: the title is the
/// first non-blank line after the heading.
pub fn extract_chapter_headers(text: &str) -> Vec<ChapterHeader> {
    CHAPTER_HEADER
        .captures_iter(text)
        .map(|caps| ChapterHeader {
            chapter: caps[1].trim().to_string(),
            title: caps[2].trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(text: &str) -> Vec<(String, String)> {
        extract_chapter_headers(text)
            .into_iter()
            .map(|h| (h.chapter, h.title))
            .collect()
    }

    #[test]
    fn test_headings_with_blank_line_and_single_break() {
        let text = "CHAPTER I\n\nDown the Rabbit-Hole\nAlice was beginning to get very tired.\n\n\
                    Chapter 2\nThe Pool of Tears\nCurious.";
        assert_eq!(
            pairs(text),
            vec![
                ("CHAPTER I".to_string(), "Down the Rabbit-Hole".to_string()),
                ("Chapter 2".to_string(), "The Pool of Tears".to_string()),
            ]
        );
    }

    #[test]
    fn test_title_is_trimmed_and_crlf_tolerated() {
        let text = "chapter Twelve \r\n\r\n   Alice's Evidence  \r\nmore text";
        assert_eq!(
            pairs(text),
            vec![("chapter Twelve".to_string(), "Alice's Evidence".to_string())]
        );
    }

    #[test]
    fn test_heading_needs_a_following_line() {
        assert!(pairs("See chapter three for details.").is_empty());
        assert!(pairs("CHAPTER IV").is_empty());
        assert!(pairs("").is_empty());
    }
}
