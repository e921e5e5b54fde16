//! Pure maths for haplotype calls.
//!
//! The confidence score is the Phred-scaled probability that a fair coin over
//! `n1 + n2` reads shows a majority at least as large as the observed one. The
//! exact binomial tail is summed up to [`NORMAL_THRESHOLD`] reads; deeper sites
//! use the continuity-corrected normal approximation, which cannot overflow.

use statrs::function::erf::erfc;
use statrs::function::factorial::binomial;

use svphaser_core::consts::{MAX_GQ, MIN_TAIL_PROBABILITY, NORMAL_THRESHOLD};
use svphaser_core::{Genotype, WorkerOpts};

/// `P(X >= k)` for `X ~ Binom(total, 0.5)`, summed exactly.
fn exact_upper_tail(k: u64, total: u64) -> f64 {
    let mass: f64 = (k..=total).map(|i| binomial(total, i)).sum();
    mass * 0.5f64.powi(total as i32)
}

/// `P(X >= k)` for `X ~ Binom(total, 0.5)` via the normal survival function.
fn normal_upper_tail(k: u64, total: u64) -> f64 {
    let mu = total as f64 / 2.0;
    let sigma = (total as f64 * 0.25).sqrt();
    let z = (k as f64 - 0.5 - mu) / sigma;
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

///
/// Phred-scaled genotype quality of a `n1` vs `n2` read split, capped at 99.
///
/// Symmetric in its arguments and non-decreasing in `|n1 - n2|` for a fixed depth.
/// No reads at all gives 0.
///
pub fn phasing_quality(n1: u32, n2: u32) -> u8 {
    let total = u64::from(n1) + u64::from(n2);
    if total == 0 {
        return 0;
    }

    let k = u64::from(n1.max(n2));
    let p_err = if total > u64::from(NORMAL_THRESHOLD) {
        normal_upper_tail(k, total)
    } else {
        exact_upper_tail(k, total)
    };

    let p_err = p_err.max(MIN_TAIL_PROBABILITY);
    let gq = (-10.0 * p_err.log10()).round();

    gq.clamp(0.0, f64::from(MAX_GQ)) as u8
}

///
/// Decide the genotype of one variant from its haplotype read counts.
///
/// Fewer than `min_support` reads in total gives `./.` with GQ 0. Otherwise a
/// haplotype holding at least `major_delta` of the reads wins; failing that, an
/// imbalance `|n1 - n2| / total` of at most `equal_delta` is called `1|1`, and
/// anything else stays `./.`. The majority checks run first, so when both rules
/// could apply the majority wins.
///
pub fn classify_haplotype(
    n1: u32,
    n2: u32,
    min_support: u32,
    major_delta: f64,
    equal_delta: f64,
) -> (Genotype, u8) {
    let total = u64::from(n1) + u64::from(n2);
    if total < u64::from(min_support) || total == 0 {
        return (Genotype::Unphased, 0);
    }

    let gq = phasing_quality(n1, n2);
    let total = total as f64;
    let n1_ratio = f64::from(n1) / total;
    let n2_ratio = f64::from(n2) / total;

    let genotype = if n1_ratio >= major_delta {
        Genotype::Hap1
    } else if n2_ratio >= major_delta {
        Genotype::Hap2
    } else if (f64::from(n1) - f64::from(n2)).abs() / total <= equal_delta {
        Genotype::Both
    } else {
        Genotype::Unphased
    };

    (genotype, gq)
}

/// [`classify_haplotype`] with thresholds taken from `opts`.
pub fn classify(n1: u32, n2: u32, opts: &WorkerOpts) -> (Genotype, u8) {
    classify_haplotype(
        n1,
        n2,
        opts.min_support(),
        opts.major_delta(),
        opts.equal_delta(),
    )
}
