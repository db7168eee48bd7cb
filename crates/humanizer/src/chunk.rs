//! Word-boundary message chunking.
//!
//! Long replies are fragmented into chunks of at most `max_chars` characters,
//! packed greedily on whitespace boundaries.  Words are never split: a single
//! token longer than the limit becomes its own oversized chunk rather than
//! being broken mid-word.  Joining the chunks with single spaces reconstructs
//! the whitespace-normalized original.

/// Split `text` into word-packed chunks of at most `max_chars` characters.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("hello there", 280), vec!["hello there"]);
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(split_chunks("", 10).is_empty());
        assert!(split_chunks("   \n\t ", 10).is_empty());
    }

    #[test]
    fn chunks_respect_the_limit_and_word_boundaries() {
        let text = "the quick brown fox jumps over the lazy dog near the river bank";
        let chunks = split_chunks(text, 20);

        for chunk in &chunks {
            assert!(chunk.chars().count() <= 20, "chunk too long: {chunk:?}");
            // No chunk starts or ends mid-word.
            assert!(!chunk.starts_with(' ') && !chunk.ends_with(' '));
        }
        // Every chunk boundary falls between words of the original.
        for chunk in &chunks {
            for word in chunk.split(' ') {
                assert!(text.split_whitespace().any(|w| w == word), "split word: {word:?}");
            }
        }
    }

    #[test]
    fn joining_reconstructs_the_normalized_text() {
        let text = "one  two\n three\tfour five six seven eight nine ten";
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let chunks = split_chunks(text, 12);
        assert_eq!(chunks.join(" "), normalized);
    }

    #[test]
    fn oversized_word_becomes_its_own_chunk() {
        let chunks = split_chunks("ok supercalifragilisticexpialidocious done", 10);
        assert_eq!(
            chunks,
            vec!["ok", "supercalifragilisticexpialidocious", "done"]
        );
    }

    #[test]
    fn multibyte_text_counts_characters_not_bytes() {
        // 12 characters of accented text fit a 12-char chunk even though
        // they exceed 12 bytes.
        let text = "não às vezes";
        assert_eq!(split_chunks(text, 12), vec!["não às vezes"]);
    }
}
