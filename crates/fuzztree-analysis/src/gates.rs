//! Interval arithmetic for static gates.
//!
//! Children are assumed independent. AND, OR and voting gates are monotone in
//! every input, so their bounds come from the bounds of the children. XOR is
//! not monotone and is bounded by trying every lower/upper combination.

use fuzztree_core::Interval;

/// All children fail.
pub fn and(children: &[Interval]) -> Interval {
    children
        .iter()
        .fold(Interval::CERTAIN, |acc, c| Interval::bounded(acc.lower * c.lower, acc.upper * c.upper))
}

/// At least one child fails.
pub fn or(children: &[Interval]) -> Interval {
    children.iter().fold(Interval::IMPOSSIBLE, |acc, c| {
        Interval::bounded(
            acc.lower + c.lower - acc.lower * c.lower,
            acc.upper + c.upper - acc.upper * c.upper,
        )
    })
}

/// Exactly one child fails.
///
/// Evaluates all `2^n` combinations of child bounds; the caller limits `n`.
pub fn xor(children: &[Interval]) -> Interval {
    let n = children.len();
    let mut values = vec![0.0; n];
    let mut lower = f64::INFINITY;
    let mut upper = f64::NEG_INFINITY;

    for mask in 0u64..(1u64 << n) {
        for (j, child) in children.iter().enumerate() {
            values[j] = if (mask >> j) & 1 == 1 {
                child.upper
            } else {
                child.lower
            };
        }
        let p = exactly_one(&values);
        lower = lower.min(p);
        upper = upper.max(p);
    }

    Interval::bounded(lower, upper)
}

/// At least `k` children fail.
pub fn voting_or(children: &[Interval], k: u32) -> Interval {
    let lower: Vec<f64> = children.iter().map(|c| c.lower).collect();
    let upper: Vec<f64> = children.iter().map(|c| c.upper).collect();
    Interval::bounded(at_least_k(&lower, k), at_least_k(&upper, k))
}

/// Probability that exactly one of the independent events occurs.
pub fn exactly_one(p: &[f64]) -> f64 {
    (0..p.len())
        .map(|i| {
            p.iter()
                .enumerate()
                .map(|(j, &pj)| if i == j { pj } else { 1.0 - pj })
                .product::<f64>()
        })
        .sum()
}

/// Probability that at least `k` of the independent events occur.
///
/// `dp[j]` holds the probability of at least `j` occurrences among the events
/// seen so far.
pub fn at_least_k(p: &[f64], k: u32) -> f64 {
    let k = k as usize;
    if k > p.len() {
        return 0.0;
    }
    let mut dp = vec![0.0; k + 1];
    dp[0] = 1.0;
    for &pi in p {
        for j in (1..=k).rev() {
            dp[j] = pi * dp[j - 1] + (1.0 - pi) * dp[j];
        }
    }
    dp[k]
}
