//! Longest-matching-blocks similarity (Ratcliff/Obershelp)
//!
//! `ratio = 2 * M / T`, where `T` is the combined length of both sequences and
//! `M` the number of elements covered by the recursively found longest
//! common blocks. The first sequence is scanned, the second is indexed; ties
//! pick the block that starts earliest in the first sequence, then earliest
//! in the second. The measure is therefore not symmetric in general.
//!
//! For long second sequences (200+ elements) elements occurring in more
//! than 1% of positions are left out of the index and only picked up when a
//! block is extended, the usual "autojunk" heuristic.

use std::collections::HashMap;
use std::hash::Hash;

const AUTOJUNK_MIN_LEN: usize = 200;

pub struct SequenceMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest block `(i, j, size)` with `a[i..i+size] == b[j..j+size]`
    /// inside `a[alo..ahi]` and `b[blo..bhi]`.
    pub fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the block ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j == 0 {
                        0
                    } else {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    /// Total number of matched elements across all matching blocks
    pub fn matched_len(&self) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_len() as f64 / total as f64
    }
}

/// Similarity of two strings in `[0, 1]`, compared char by char
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_empty() {
        assert!(close(ratio("RED", "RED"), 1.0));
        assert!(close(ratio("", ""), 1.0));
        assert!(close(ratio("RED", ""), 0.0));
        assert!(close(ratio("", "RED"), 0.0));
    }

    #[test]
    fn test_known_ratios() {
        assert!(close(ratio("BANANA", "BANAN"), 10.0 / 11.0));
        assert!(close(ratio("DOG", "DOT"), 4.0 / 6.0));
        assert!(close(ratio("CAT", "CUP"), 2.0 / 6.0));
        assert!(close(ratio("WED", "I SAID WED"), 6.0 / 13.0));
        assert!(close(ratio("RED", "I SAID WED"), 4.0 / 13.0));
    }

    #[test]
    fn test_longest_match_prefers_earliest_block() {
        let a: Vec<char> = "ABXAB".chars().collect();
        let b: Vec<char> = "AB".chars().collect();
        let matcher = SequenceMatcher::new(&a, &b);
        assert_eq!(matcher.find_longest_match(0, a.len(), 0, b.len()), (0, 0, 2));
    }

    #[test]
    fn test_recursion_covers_both_sides() {
        // blocks: "A" + "CD" + "F"
        let a: Vec<char> = "ABCDEF".chars().collect();
        let b: Vec<char> = "AXCDYF".chars().collect();
        let matcher = SequenceMatcher::new(&a, &b);
        assert_eq!(matcher.matched_len(), 4);
    }

    #[test]
    fn test_autojunk_extends_over_popular_elements() {
        let long: String = "A".repeat(250);
        let short: String = "A".repeat(3);
        let a: Vec<char> = short.chars().collect();
        let b: Vec<char> = long.chars().collect();
        let matcher = SequenceMatcher::new(&a, &b);
        assert!(matcher.b2j.is_empty());
        // the unindexed block is still recovered by extension
        assert!(close(matcher.ratio(), 6.0 / 253.0));
        assert!(close(ratio(&long, &short), 6.0 / 253.0));
    }

    #[test]
    fn test_generic_over_tokens() {
        let a = ["I", "SEE", "RED"];
        let b = ["I", "SEE", "WED"];
        let matcher = SequenceMatcher::new(&a, &b);
        assert!(close(matcher.ratio(), 4.0 / 6.0));
    }
}
