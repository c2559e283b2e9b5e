//! Sentence-aligned greedy chunking.

/// Splits text into sentences.
///
/// A sentence ends at `.`, `!`, or `?` followed by whitespace; the terminal
/// punctuation stays with the preceding sentence and the whitespace run
/// between sentences is dropped. Trailing text without a terminal boundary is
/// returned as a final sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else {
            continue;
        };
        if !next.is_whitespace() {
            continue;
        }
        sentences.push(&text[start..idx + ch.len_utf8()]);
        while let Some(&(_, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }
        start = chars.peek().map_or(text.len(), |&(i, _)| i);
    }

    if start < text.len() && !text[start..].trim().is_empty() {
        sentences.push(text[start..].trim_end());
    }

    sentences
}

/// Packs sentences greedily into chunks of at most `max_chunk_chars`
/// characters.
///
/// Sentences are joined with a single space while the joined length stays
/// under the bound; otherwise the running buffer is flushed and the sentence
/// opens a new one. A single sentence longer than the bound is emitted as its
/// own oversized chunk rather than being split mid-sentence; that is the
/// accepted policy trade-off. Output order matches input order and every
/// sentence appears exactly once.
pub fn split_chunks(text: &str, max_chunk_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in split_sentences(text) {
        let sentence_chars = sentence.chars().count();
        if current_chars + 1 + sentence_chars < max_chunk_chars {
            if !current.is_empty() {
                current.push(' ');
                current_chars += 1;
            }
            current.push_str(sentence);
            current_chars += sentence_chars;
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current = sentence.to_string();
            current_chars = sentence_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
