//! Array and delimited-string chunking.

use std::fmt::Display;

/// Split items into consecutive groups of at most `size` elements.
///
/// A `size` of zero is treated as one.
pub fn array_chunks<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

/// Join values with `delimiter` into chunks no longer than `max_len` chars.
///
/// Chunks break only between values. A single value longer than `max_len`
/// becomes its own oversized chunk.
///
/// ```
/// use api_toolkit::utils::chunk_delimited;
///
/// let ids = [123, 456, 789, 1234, 5678, 9012, 3456, 7890];
/// assert_eq!(
///     chunk_delimited(&ids, 15, ","),
///     vec!["123,456,789", "1234,5678,9012", "3456,7890"],
/// );
/// ```
pub fn chunk_delimited<T: Display>(values: &[T], max_len: usize, delimiter: &str) -> Vec<String> {
    let mut values = values.iter().map(ToString::to_string);
    let Some(mut current) = values.next() else {
        return Vec::new();
    };

    let delimiter_len = delimiter.chars().count();
    let mut chunks = Vec::new();
    for next in values {
        let joined_len = current.chars().count() + delimiter_len + next.chars().count();
        if joined_len <= max_len {
            current.push_str(delimiter);
            current.push_str(&next);
        } else {
            chunks.push(std::mem::replace(&mut current, next));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// [`chunk_delimited`] over a string split at `delimiter`.
pub fn chunk_delimited_str(text: &str, max_len: usize, delimiter: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split(delimiter).collect();
    chunk_delimited(&parts, max_len, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_chunks() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(array_chunks(&items, 2), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert_eq!(array_chunks(&items, 10), vec![items.to_vec()]);
        assert_eq!(array_chunks(&items, 0).len(), 5);
        assert!(array_chunks::<u8>(&[], 3).is_empty());
    }

    #[test]
    fn test_words_split_at_spaces() {
        let chunks = chunk_delimited_str(
            "Lorem ipsum dolor sit amet consectetur adipisicing elit",
            20,
            " ",
        );
        assert_eq!(chunks, vec!["Lorem ipsum dolor", "sit amet consectetur", "adipisicing elit"]);
        assert!(chunks.iter().all(|c| c.len() <= 20));
    }

    #[test]
    fn test_oversized_value_kept_whole() {
        let chunks = chunk_delimited(&["a", "abcdefghij", "b"], 5, ",");
        assert_eq!(chunks, vec!["a", "abcdefghij", "b"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(chunk_delimited_str("", 10, " ").is_empty());
        assert!(chunk_delimited::<String>(&[], 10, ",").is_empty());
    }
}
