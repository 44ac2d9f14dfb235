//! Probability representations and alpha-cut evaluation.
//!
//! A basic event carries one of four numeric representations. Every
//! representation can be reduced to a closed probability interval for a given
//! alpha level; crisp inputs always reduce to a degenerate interval.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProbabilityError;

/// Tolerance used when matching alpha keys in a decomposed table.
pub const ALPHA_EPSILON: f64 = 1e-9;

/// A closed probability interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// The interval of an event that certainly occurs.
    pub const CERTAIN: Interval = Interval {
        lower: 1.0,
        upper: 1.0,
    };

    /// The interval of an event that never occurs.
    pub const IMPOSSIBLE: Interval = Interval {
        lower: 0.0,
        upper: 0.0,
    };

    /// A point interval [v, v].
    pub fn point(v: f64) -> Self {
        Self { lower: v, upper: v }
    }

    /// A bounded interval [lower, upper].
    pub fn bounded(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Whether both bounds coincide.
    pub fn is_degenerate(&self) -> bool {
        (self.upper - self.lower).abs() <= f64::EPSILON
    }

    /// Linear interpolation between two intervals, bound by bound.
    pub fn lerp(&self, other: &Interval, t: f64) -> Interval {
        Interval {
            lower: self.lower + t * (other.lower - self.lower),
            upper: self.upper + t * (other.upper - self.upper),
        }
    }

    /// Both bounds are finite and inside [0, 1].
    pub fn is_probability(&self) -> bool {
        self.lower.is_finite()
            && self.upper.is_finite()
            && (0.0..=1.0).contains(&self.lower)
            && (0.0..=1.0).contains(&self.upper)
            && self.lower <= self.upper
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_degenerate() {
            write!(f, "{}", self.lower)
        } else {
            write!(f, "[{}, {}]", self.lower, self.upper)
        }
    }
}

/// One row of a decomposed fuzzy number: the interval at membership `alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaCut {
    pub alpha: f64,
    pub interval: Interval,
}

impl AlphaCut {
    pub fn new(alpha: f64, interval: Interval) -> Self {
        Self { alpha, interval }
    }
}

/// A fuzzy number stored as a table of alpha-cuts, ascending by alpha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AlphaCut>", into = "Vec<AlphaCut>")]
pub struct DecomposedFuzzyNumber {
    cuts: Vec<AlphaCut>,
}

impl DecomposedFuzzyNumber {
    /// Build a table from unordered cuts. Later duplicates of an alpha key win.
    pub fn new(mut cuts: Vec<AlphaCut>) -> Self {
        cuts.sort_by(|a, b| a.alpha.total_cmp(&b.alpha));
        let mut deduped: Vec<AlphaCut> = Vec::with_capacity(cuts.len());
        for cut in cuts {
            match deduped.last_mut() {
                Some(last) if (last.alpha - cut.alpha).abs() <= ALPHA_EPSILON => *last = cut,
                _ => deduped.push(cut),
            }
        }
        Self { cuts: deduped }
    }

    pub fn cuts(&self) -> &[AlphaCut] {
        &self.cuts
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Interval at `alpha`: exact key, linear interpolation between the
    /// bracketing keys, or the nearest end of the table.
    pub fn at(&self, alpha: f64) -> Option<Interval> {
        let first = self.cuts.first()?;
        let last = self.cuts.last()?;

        if let Some(exact) = self
            .cuts
            .iter()
            .find(|c| (c.alpha - alpha).abs() <= ALPHA_EPSILON)
        {
            return Some(exact.interval);
        }
        if alpha <= first.alpha {
            return Some(first.interval);
        }
        if alpha >= last.alpha {
            return Some(last.interval);
        }

        self.cuts.windows(2).find_map(|pair| {
            let (lo, hi) = (&pair[0], &pair[1]);
            if lo.alpha < alpha && alpha < hi.alpha {
                let t = (alpha - lo.alpha) / (hi.alpha - lo.alpha);
                Some(lo.interval.lerp(&hi.interval, t))
            } else {
                None
            }
        })
    }
}

impl From<Vec<AlphaCut>> for DecomposedFuzzyNumber {
    fn from(cuts: Vec<AlphaCut>) -> Self {
        Self::new(cuts)
    }
}

impl From<DecomposedFuzzyNumber> for Vec<AlphaCut> {
    fn from(number: DecomposedFuzzyNumber) -> Self {
        number.cuts
    }
}

/// Numeric representation of a basic event's failure probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityRepresentation {
    /// A plain probability value.
    Crisp { value: f64 },
    /// Exponential failure rate; unreliability over the mission time.
    FailureRate {
        lambda: f64,
        #[serde(default)]
        mission_time: Option<f64>,
    },
    /// Triangular fuzzy number with support [a, c] and core b.
    TriangularFuzzy { a: f64, b: f64, c: f64 },
    /// Fuzzy number given directly as an alpha-cut table.
    DecomposedFuzzy(DecomposedFuzzyNumber),
}

impl ProbabilityRepresentation {
    pub fn crisp(value: f64) -> Self {
        ProbabilityRepresentation::Crisp { value }
    }

    pub fn failure_rate(lambda: f64) -> Self {
        ProbabilityRepresentation::FailureRate {
            lambda,
            mission_time: None,
        }
    }

    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        ProbabilityRepresentation::TriangularFuzzy { a, b, c }
    }

    /// Reduce the representation to an interval at `alpha`.
    ///
    /// `mission_time` is used for failure rates that carry no override.
    pub fn alpha_cut(&self, alpha: f64, mission_time: f64) -> Result<Interval, ProbabilityError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ProbabilityError::InvalidAlpha(alpha));
        }

        let interval = match self {
            ProbabilityRepresentation::Crisp { value } => Interval::point(*value),
            ProbabilityRepresentation::FailureRate {
                lambda,
                mission_time: over,
            } => {
                if !lambda.is_finite() || *lambda < 0.0 {
                    return Err(ProbabilityError::InvalidFailureRate(*lambda));
                }
                let t = over.unwrap_or(mission_time);
                if !t.is_finite() || t < 0.0 {
                    return Err(ProbabilityError::InvalidMissionTime(t));
                }
                Interval::point(1.0 - (-lambda * t).exp())
            }
            ProbabilityRepresentation::TriangularFuzzy { a, b, c } => {
                if !(a <= b && b <= c) {
                    return Err(ProbabilityError::MalformedTriangle {
                        a: *a,
                        b: *b,
                        c: *c,
                    });
                }
                Interval::bounded(a + alpha * (b - a), c - alpha * (c - b))
            }
            ProbabilityRepresentation::DecomposedFuzzy(table) => table
                .at(alpha)
                .ok_or(ProbabilityError::EmptyDecomposition)?,
        };

        if !interval.is_probability() {
            return Err(ProbabilityError::OutOfRange {
                lower: interval.lower,
                upper: interval.upper,
            });
        }
        Ok(interval)
    }
}

impl fmt::Display for ProbabilityRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilityRepresentation::Crisp { value } => write!(f, "p={value}"),
            ProbabilityRepresentation::FailureRate {
                lambda,
                mission_time: Some(t),
            } => write!(f, "λ={lambda} T={t}"),
            ProbabilityRepresentation::FailureRate { lambda, .. } => write!(f, "λ={lambda}"),
            ProbabilityRepresentation::TriangularFuzzy { a, b, c } => write!(f, "tri({a}, {b}, {c})"),
            ProbabilityRepresentation::DecomposedFuzzy(table) => {
                write!(f, "decomposed({} cuts)", table.cuts().len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn crisp_is_degenerate_at_any_alpha() {
        let p = ProbabilityRepresentation::crisp(0.25);
        for alpha in [0.0, 0.5, 1.0] {
            let iv = p.alpha_cut(alpha, 1.0).unwrap();
            assert!(iv.is_degenerate());
            assert_eq!(iv.lower, 0.25);
        }
    }

    #[test]
    fn failure_rate_uses_override_before_default() {
        let p = ProbabilityRepresentation::failure_rate(0.5);
        let iv = p.alpha_cut(1.0, 2.0).unwrap();
        assert!((iv.lower - (1.0 - (-1.0f64).exp())).abs() < EPS);

        let p = ProbabilityRepresentation::FailureRate {
            lambda: 0.5,
            mission_time: Some(4.0),
        };
        let iv = p.alpha_cut(1.0, 2.0).unwrap();
        assert!((iv.upper - (1.0 - (-2.0f64).exp())).abs() < EPS);
    }

    #[test]
    fn triangular_alpha_cuts() {
        let p = ProbabilityRepresentation::triangular(0.1, 0.2, 0.4);
        let support = p.alpha_cut(0.0, 1.0).unwrap();
        assert!((support.lower - 0.1).abs() < EPS);
        assert!((support.upper - 0.4).abs() < EPS);

        let core = p.alpha_cut(1.0, 1.0).unwrap();
        assert!((core.lower - 0.2).abs() < EPS);
        assert!((core.upper - 0.2).abs() < EPS);

        let half = p.alpha_cut(0.5, 1.0).unwrap();
        assert!((half.lower - 0.15).abs() < EPS);
        assert!((half.upper - 0.3).abs() < EPS);
    }

    #[test]
    fn malformed_triangle_rejected() {
        let p = ProbabilityRepresentation::triangular(0.3, 0.2, 0.4);
        assert!(matches!(
            p.alpha_cut(0.5, 1.0),
            Err(ProbabilityError::MalformedTriangle { .. })
        ));
    }

    #[test]
    fn decomposed_lookup_and_interpolation() {
        let table = DecomposedFuzzyNumber::new(vec![
            AlphaCut::new(1.0, Interval::point(0.2)),
            AlphaCut::new(0.0, Interval::bounded(0.1, 0.3)),
        ]);
        assert_eq!(table.cuts()[0].alpha, 0.0);

        let exact = table.at(0.0).unwrap();
        assert_eq!(exact, Interval::bounded(0.1, 0.3));

        let mid = table.at(0.5).unwrap();
        assert!((mid.lower - 0.15).abs() < EPS);
        assert!((mid.upper - 0.25).abs() < EPS);
    }

    #[test]
    fn decomposed_clamps_outside_table() {
        let table = DecomposedFuzzyNumber::new(vec![
            AlphaCut::new(0.25, Interval::bounded(0.1, 0.3)),
            AlphaCut::new(0.75, Interval::bounded(0.15, 0.2)),
        ]);
        assert_eq!(table.at(0.0).unwrap(), Interval::bounded(0.1, 0.3));
        assert_eq!(table.at(1.0).unwrap(), Interval::bounded(0.15, 0.2));
    }

    #[test]
    fn empty_decomposition_is_an_error() {
        let p = ProbabilityRepresentation::DecomposedFuzzy(DecomposedFuzzyNumber::new(vec![]));
        assert!(matches!(
            p.alpha_cut(0.5, 1.0),
            Err(ProbabilityError::EmptyDecomposition)
        ));
    }

    #[test]
    fn out_of_range_values_rejected() {
        let p = ProbabilityRepresentation::crisp(1.5);
        assert!(matches!(
            p.alpha_cut(1.0, 1.0),
            Err(ProbabilityError::OutOfRange { .. })
        ));
        let p = ProbabilityRepresentation::crisp(0.5);
        assert!(matches!(
            p.alpha_cut(1.5, 1.0),
            Err(ProbabilityError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn serde_representation_shape() {
        let json = r#"{"triangular_fuzzy":{"a":0.1,"b":0.2,"c":0.3}}"#;
        let p: ProbabilityRepresentation = serde_json::from_str(json).unwrap();
        assert_eq!(p, ProbabilityRepresentation::triangular(0.1, 0.2, 0.3));

        let json = r#"{"failure_rate":{"lambda":0.01}}"#;
        let p: ProbabilityRepresentation = serde_json::from_str(json).unwrap();
        assert_eq!(p, ProbabilityRepresentation::failure_rate(0.01));
    }
}
