use std::collections::VecDeque;

use tracing::warn;

/// Folds small pieces into chunks close to `chunk_size`, retaining a
/// trailing window of at most `chunk_overlap` (soft bound) that is carried
/// into the following chunk.
///
/// The kernel never splits inside a piece; a single piece longer than
/// `chunk_size` is emitted as its own oversized chunk and the caller is
/// responsible for re-splitting it at a finer granularity.
pub(crate) fn merge_splits(
    splits: &[&str],
    separator: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    len_func: &dyn Fn(&str) -> usize,
) -> Vec<String> {
    let sep_len = len_func(separator);
    let mut chunks: Vec<String> = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for split in splits {
        let split_len = len_func(split);
        let mut total_with_split = total + split_len;
        if !current.is_empty() {
            total_with_split += sep_len;
        }

        if total_with_split > chunk_size && !current.is_empty() {
            flush(&mut chunks, &current, separator, chunk_size, len_func);

            // Retain the tail of the window as overlap for the next chunk.
            while should_pop(
                chunk_overlap,
                chunk_size,
                total,
                split_len,
                sep_len,
                current.len(),
            ) {
                if let Some(popped) = current.pop_front() {
                    total -= len_func(popped);
                    if !current.is_empty() {
                        total -= sep_len;
                    }
                }
            }
        }

        current.push_back(split);
        total += split_len;
        if current.len() > 1 {
            total += sep_len;
        }
    }

    flush(&mut chunks, &current, separator, chunk_size, len_func);
    chunks
}

/// Joins the window with the separator, trims it, and emits it when
/// non-empty.
fn flush(
    chunks: &mut Vec<String>,
    current: &VecDeque<&str>,
    separator: &str,
    chunk_size: usize,
    len_func: &dyn Fn(&str) -> usize,
) {
    if current.is_empty() {
        return;
    }
    let pieces: Vec<&str> = current.iter().copied().collect();
    let chunk = pieces.join(separator).trim().to_string();
    if chunk.is_empty() {
        return;
    }
    let chunk_len = len_func(&chunk);
    if chunk_len > chunk_size {
        warn!(
            chunk_len,
            chunk_size, "created a chunk larger than the configured chunk size"
        );
    }
    chunks.push(chunk);
}

// Keep popping while the window is still larger than the overlap, or while
// it would not leave room for the incoming piece.
fn should_pop(
    chunk_overlap: usize,
    chunk_size: usize,
    total: usize,
    split_len: usize,
    sep_len: usize,
    current_len: usize,
) -> bool {
    let sep_len = if current_len < 2 { 0 } else { sep_len };
    current_len > 0
        && (total > chunk_overlap || (total + split_len + sep_len > chunk_size && total > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    #[test]
    fn test_merge_respects_chunk_size_bound() {
        let pieces = vec!["aaa", "bbbb", "cc", "ddddd", "e", "ffff", "ggg"];
        for chunk_size in [6usize, 8, 10] {
            for overlap in [0usize, 2, 4] {
                let chunks = merge_splits(&pieces, " ", chunk_size, overlap, &char_len);
                for chunk in &chunks {
                    assert!(
                        char_len(chunk) <= chunk_size + overlap,
                        "chunk {chunk:?} exceeds {chunk_size}+{overlap}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_merge_joins_up_to_chunk_size() {
        let pieces = vec!["哈里森", "很高兴遇见你", "欢迎来中国"];
        let chunks = merge_splits(&pieces, "\n", 10, 0, &char_len);
        assert_eq!(chunks, vec!["哈里森\n很高兴遇见你", "欢迎来中国"]);
    }

    #[test]
    fn test_merge_zero_overlap_drops_window() {
        let pieces = vec!["one", "two", "three"];
        let chunks = merge_splits(&pieces, " ", 7, 0, &char_len);
        assert_eq!(chunks, vec!["one two", "three"]);
    }

    #[test]
    fn test_merge_carries_overlap_into_next_chunk() {
        // Single characters merged with an empty separator window over
        // by one character.
        let pieces: Vec<String> = "splittingggg".chars().map(String::from).collect();
        let refs: Vec<&str> = pieces.iter().map(String::as_str).collect();
        let chunks = merge_splits(&refs, "", 10, 1, &char_len);
        assert_eq!(chunks, vec!["splittingg", "ggg"]);
    }

    #[test]
    fn test_oversized_piece_is_emitted_whole() {
        let pieces = vec!["short", "averyveryverylongpiece", "tail"];
        let chunks = merge_splits(&pieces, " ", 8, 0, &char_len);
        assert!(chunks.contains(&"averyveryverylongpiece".to_string()));
    }

    #[test]
    fn test_empty_pieces_are_dropped_after_trim() {
        let pieces = vec!["", "  ", "text"];
        let chunks = merge_splits(&pieces, " ", 4, 0, &char_len);
        assert_eq!(chunks, vec!["text"]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunks = merge_splits(&[], " ", 10, 2, &char_len);
        assert!(chunks.is_empty());
    }
}
