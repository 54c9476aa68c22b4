//! Order-independent request signatures.

use std::collections::BTreeSet;

/// Lower-case, drop punctuation, then join the unique words in sorted order.
///
/// `"Design a B-tree index"` and `"index: design a btree"` share a signature.
pub fn signature(request: &str) -> String {
    let cleaned: String = request
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let words: BTreeSet<&str> = cleaned.split_whitespace().collect();
    words.into_iter().collect::<Vec<_>>().join(" ")
}
