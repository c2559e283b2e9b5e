//! PDF text extraction with approximate page boundaries.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::text::normalize;
use crate::types::ExtractionError;

/// Extracts per-page text from PDF bytes.
///
/// The text layer of a PDF does not reliably preserve page boundaries once
/// flattened, so this approximates them: the normalized full text is divided
/// into `page_count` equal-length slices, one per reported page. Pages whose
/// slice is empty after trimming are omitted, so the returned map holds at
/// most `page_count` entries keyed by 1-based page number.
///
/// Fails with [`ExtractionError`] when the bytes are not a parseable PDF or
/// the document reports zero pages.
pub fn extract_pages(bytes: &[u8]) -> Result<BTreeMap<u32, String>, ExtractionError> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|err| ExtractionError::Unreadable(err.to_string()))?;
    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(ExtractionError::EmptyDocument);
    }

    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|err| ExtractionError::Unreadable(err.to_string()))?;
    let text = normalize(&raw);
    debug!(page_count, chars = text.chars().count(), "extracted document text");

    Ok(paginate(&text, page_count))
}

/// Divides `text` into `page_count` equal-length slices keyed by 1-based page
/// number, dropping slices that are empty after trimming.
///
/// Slice length is `ceil(len / page_count)` characters, so the final slice
/// may be shorter and trailing pages of a mostly-empty document disappear
/// entirely.
pub fn paginate(text: &str, page_count: usize) -> BTreeMap<u32, String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pages = BTreeMap::new();
    if page_count == 0 {
        return pages;
    }
    let slice_len = chars.len().div_ceil(page_count).max(1);

    for index in 0..page_count {
        let start = index * slice_len;
        if start >= chars.len() {
            break;
        }
        let end = (start + slice_len).min(chars.len());
        let page_text: String = chars[start..end].iter().collect();
        if page_text.trim().is_empty() {
            warn!(page = index + 1, "omitting empty page slice");
            continue;
        }
        pages.insert(index as u32 + 1, page_text);
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_extraction() {
        let err = extract_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }

    #[test]
    fn paginate_splits_into_equal_slices() {
        let pages = paginate("abcdefghij", 2);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[&1], "abcde");
        assert_eq!(pages[&2], "fghij");
    }

    #[test]
    fn paginate_rounds_slice_length_up() {
        // 10 chars over 3 pages: ceil(10/3) = 4, so the last page is short.
        let pages = paginate("abcdefghij", 3);
        assert_eq!(pages[&1], "abcd");
        assert_eq!(pages[&2], "efgh");
        assert_eq!(pages[&3], "ij");
    }

    #[test]
    fn paginate_omits_empty_slices() {
        // Text shorter than the page count leaves trailing pages without content.
        let pages = paginate("ab", 4);
        assert_eq!(pages.len(), 2);
        assert!(pages.contains_key(&1));
        assert!(pages.contains_key(&2));
    }

    #[test]
    fn paginate_page_numbers_are_one_based_and_contiguous() {
        let pages = paginate("The sky is blue. Water is wet. Fire is hot.", 3);
        let keys: Vec<u32> = pages.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn paginate_never_returns_more_than_page_count_entries() {
        for count in 1..6 {
            assert!(paginate("some text to spread around", count).len() <= count);
        }
    }
}
