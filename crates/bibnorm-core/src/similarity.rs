//! Longest-matching-blocks string similarity
//!
//! The ratio is `2 * M / T`, where `M` is the number of characters in the
//! matching blocks found by repeatedly taking the longest common substring
//! (and recursing on both sides of it) and `T` is the combined length of
//! both strings.
//!
//! Scores are kept as exact fractions. Ordering and threshold checks use
//! integer cross-multiplication so equal ratios compare equal on every
//! platform.

use std::cmp::Ordering;
use std::collections::HashMap;

/// An exact similarity ratio
#[derive(Debug, Clone, Copy)]
pub struct Similarity {
    /// Twice the number of matched characters
    matched: u64,
    /// Combined character count
    total: u64,
}

impl Similarity {
    /// Similarity of two strings, compared character by character
    pub fn between(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let matched: usize = matching_blocks(&a, &b).iter().map(|m| m.size).sum();
        Self {
            matched: 2 * matched as u64,
            total: (a.len() + b.len()) as u64,
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    /// `ratio > numerator / denominator`, exactly
    pub fn exceeds(&self, numerator: u64, denominator: u64) -> bool {
        if self.total == 0 {
            return denominator > numerator;
        }
        self.matched * denominator > numerator * self.total
    }

    /// Two empty strings are identical
    fn normalized(&self) -> (u64, u64) {
        if self.total == 0 {
            (1, 1)
        } else {
            (self.matched, self.total)
        }
    }
}

impl PartialEq for Similarity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Similarity {}

impl PartialOrd for Similarity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Similarity {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a_num, a_den) = self.normalized();
        let (b_num, b_den) = other.normalized();
        (a_num * b_den).cmp(&(b_num * a_den))
    }
}

/// Similarity ratio of two strings in `[0, 1]`
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    Similarity::between(a, b).ratio()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    a: usize,
    b: usize,
    size: usize,
}

/// Matching blocks in order of position in `a`
fn matching_blocks(a: &[char], b: &[char]) -> Vec<Match> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let m = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if m.size == 0 {
            continue;
        }
        if alo < m.a && blo < m.b {
            queue.push((alo, m.a, blo, m.b));
        }
        if m.a + m.size < ahi && m.b + m.size < bhi {
            queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
        }
        blocks.push(m);
    }

    blocks.sort_by_key(|m| (m.a, m.b));
    blocks
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`. Among equally
/// long matches the one starting earliest in `a`, then earliest in `b`, wins.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> Match {
    let mut best = Match {
        a: alo,
        b: blo,
        size: 0,
    };
    // Length of the match ending at (i - 1, j), keyed by j
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.size {
                    best = Match {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        j2len = next;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_ratio("federated learning", "federated learning"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        // "abcd" vs "bcde": one block "bcd" -> 2 * 3 / 8
        assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
        // "abxcd" vs "abcd": blocks "ab" and "cd" -> 2 * 4 / 9
        let s = Similarity::between("abxcd", "abcd");
        assert_eq!(s.matched, 8);
        assert_eq!(s.total, 9);
    }

    #[test]
    fn test_blocks_are_found_on_both_sides() {
        let a: Vec<char> = "qabxcdq".chars().collect();
        let b: Vec<char> = "abycd".chars().collect();
        let blocks = matching_blocks(&a, &b);
        let sizes: Vec<usize> = blocks.iter().map(|m| m.size).collect();
        assert_eq!(sizes, vec![2, 2]);
        assert_eq!(blocks[0], Match { a: 1, b: 0, size: 2 });
    }

    #[test]
    fn test_symmetric_on_titles() {
        let a = "Attention Is All You Need";
        let b = "Attention is all you need.";
        assert_eq!(Similarity::between(a, b), Similarity::between(b, a));
    }

    #[test]
    fn test_exact_threshold_comparison() {
        // 9 of 10 characters match on each side: exactly 0.9
        let s = Similarity::between("abcdefghij", "abcdefghiX");
        assert_eq!(s.ratio(), 0.9);
        assert!(!s.exceeds(9, 10));
        assert!(s.exceeds(89, 100));
    }

    #[test]
    fn test_ordering_is_exact() {
        // 2/3 expressed with different totals
        let a = Similarity { matched: 2, total: 3 };
        let b = Similarity { matched: 4, total: 6 };
        assert_eq!(a, b);
        assert!(Similarity { matched: 5, total: 6 } > a);
    }

    #[test]
    fn test_unicode_counts_characters() {
        assert_eq!(similarity_ratio("Müller", "Muller"), 2.0 * 5.0 / 12.0);
    }
}
