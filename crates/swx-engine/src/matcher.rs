//! Similarity matcher: decides whether an observed item name corresponds to
//! an expected one, tolerant of minor textual drift (gendered suffixes,
//! retyping variance) while still catching true mismatches.
//!
//! The ratio is a Ratcliff/Obershelp-style normalized matching-blocks score
//! (2·M / (|a|+|b|), M = characters covered by recursively-found longest
//! common substrings), not raw edit distance.

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
/// Returns (start in a, start in b, length); ties keep the earliest block.
fn longest_match(
    a: &[char],
    alo: usize,
    ahi: usize,
    b: &[char],
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0usize);
    // Row of run lengths ending at each position of b for the previous a row.
    let mut prev = vec![0usize; bhi - blo];
    for i in alo..ahi {
        let mut row = vec![0usize; bhi - blo];
        for j in blo..bhi {
            if a[i] == b[j] {
                let run = if j > blo { prev[j - blo - 1] } else { 0 } + 1;
                row[j - blo] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = row;
    }
    best
}

/// Total characters covered by common blocks, found greedily longest-first
/// and recursed on either side (iterative with an explicit stack).
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0usize;
    let mut stack = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = stack.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, k) = longest_match(a, alo, ahi, b, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        stack.push((alo, i, blo, j));
        stack.push((i + k, ahi, j + k, bhi));
    }
    total
}

/// Normalized similarity of two strings in [0,1]. Case-sensitive; callers
/// lowercase first. Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let denom = a.len() + b.len();
    if denom == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / denom as f64
}

/// Does `observed` plausibly name the `expected` item?
///
/// Accepts when the lowercased similarity ratio reaches `threshold`, or when
/// the lowercased expected name is a substring of the observed one (so
/// "X" matches "X Y" regardless of ratio). Empty inputs never match.
pub fn items_match(expected: &str, observed: &str, threshold: f64) -> bool {
    let e = expected.trim().to_lowercase();
    let o = observed.trim().to_lowercase();
    if e.is_empty() || o.is_empty() {
        return false;
    }
    similarity_ratio(&e, &o) >= threshold || o.contains(&e)
}
