//! Dynamic-programming helpers for the alignment engine.

/// Index pairs `(old, new)` of a longest common subsequence, in order.
///
/// The table is filled in suffix form, `table[i][j]` being the LCS length of
/// `old[i..]` and `new[j..]`, and walked forward from `(0, 0)`. On a mismatch
/// the old side is skipped only when that keeps a strictly longer
/// subsequence; otherwise the new side is skipped.
pub(crate) fn lcs_pairs<T: PartialEq>(old: &[T], new: &[T]) -> Vec<(usize, usize)> {
    let (m, n) = (old.len(), new.len());
    let width = n + 1;
    let mut table = vec![0usize; (m + 1) * width];

    for i in (0..m).rev() {
        for j in (0..n).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[0]);
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if old[i] == new[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] > table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

/// Levenshtein distance over `char`s.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_common_subsequence() {
        let old = ["a", "b", "c", "d"];
        let new = ["b", "x", "d"];
        assert_eq!(lcs_pairs(&old, &new), vec![(1, 0), (3, 2)]);
    }

    #[test]
    fn repeated_words_pair_in_order() {
        let old = ["la", "la", "la"];
        let new = ["la", "la"];
        assert_eq!(lcs_pairs(&old, &new), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn ties_skip_the_new_side() {
        // Both "a" and "b" give a one-word subsequence.
        let old = ["a", "b"];
        let new = ["b", "a"];
        assert_eq!(lcs_pairs(&old, &new), vec![(0, 1)]);
    }

    #[test]
    fn empty_inputs() {
        assert!(lcs_pairs::<&str>(&[], &["a"]).is_empty());
        assert!(lcs_pairs::<&str>(&["a"], &[]).is_empty());
    }

    #[test]
    fn counts_character_edits() {
        assert_eq!(edit_distance("songd", "songs"), 1);
        assert_eq!(edit_distance("", "ab"), 2);
        assert_eq!(edit_distance("la", "different"), 9);
        assert_eq!(edit_distance("שלום", "שלומ"), 1);
        assert_eq!(edit_distance("same", "same"), 0);
    }
}
