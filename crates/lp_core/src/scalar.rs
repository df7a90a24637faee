//! Exact Big-M coefficient: `m*M + c` with `m, c` arbitrary-precision rationals.
//!
//! `M` is treated as a symbol strictly larger than every rational, never
//! multiplied by itself. This is what lets the simplex engine detect
//! dominance of the Big-M penalty exactly instead of approximating it with
//! a large floating-point constant (see `megesdal-lemke-rs`'s `BigInt`
//! tableau for the sibling idiom of "no rounding in the inner loop").

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::CoreError;

/// `m*M + c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactScalar {
    pub m: BigRational,
    pub c: BigRational,
}

impl ExactScalar {
    pub fn new(m: BigRational, c: BigRational) -> Self {
        Self { m, c }
    }

    pub fn rational(c: BigRational) -> Self {
        Self { m: BigRational::zero(), c }
    }

    pub fn from_big_m(m: BigRational) -> Self {
        Self { m, c: BigRational::zero() }
    }

    pub fn zero() -> Self {
        Self { m: BigRational::zero(), c: BigRational::zero() }
    }

    pub fn one() -> Self {
        Self { m: BigRational::zero(), c: BigRational::one() }
    }

    pub fn from_i64(n: i64) -> Self {
        Self::rational(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn is_zero(&self) -> bool {
        self.m.is_zero() && self.c.is_zero()
    }

    /// True when this scalar carries no Big-M component, i.e. is an
    /// ordinary rational. Every constraint-matrix entry is rational; only
    /// objective coefficients for artificial variables carry `m != 0`.
    pub fn is_plain_rational(&self) -> bool {
        self.m.is_zero()
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        if self.is_plain_rational() {
            Some(&self.c)
        } else {
            None
        }
    }

    /// Multiplication is only defined when at least one factor has `m = 0`
    /// — `M` is symbolic and never multiplied by itself.
    pub fn checked_mul(&self, other: &ExactScalar) -> Result<ExactScalar, CoreError> {
        if self.m.is_zero() {
            Ok(ExactScalar {
                m: &other.m * &self.c,
                c: &other.c * &self.c,
            })
        } else if other.m.is_zero() {
            Ok(ExactScalar {
                m: &self.m * &other.c,
                c: &self.c * &other.c,
            })
        } else {
            Err(CoreError::UnsupportedOp(
                "cannot multiply two Big-M-bearing scalars (M * M is undefined)".into(),
            ))
        }
    }

    /// Division by a plain rational is componentwise; division by another
    /// `M`-bearing scalar is rejected.
    pub fn checked_div(&self, other: &ExactScalar) -> Result<ExactScalar, CoreError> {
        if other.m.is_zero() {
            if other.c.is_zero() {
                return Err(CoreError::UnsupportedOp("division by zero scalar".into()));
            }
            Ok(ExactScalar {
                m: &self.m / &other.c,
                c: &self.c / &other.c,
            })
        } else {
            Err(CoreError::UnsupportedOp(
                "cannot divide by a Big-M-bearing scalar".into(),
            ))
        }
    }

    pub fn floor(&self) -> BigInt {
        // Only meaningful (and only ever called) on plain rationals: rhs
        // values never carry an M component once the basis is optimal.
        self.c.numer().div_floor(self.c.denom())
    }

    /// `x - floor(x)`, always in `[0, 1)`, for the plain-rational part.
    pub fn fractional_part(&self) -> BigRational {
        &self.c - BigRational::from_integer(self.floor())
    }

    /// Gomory row-selection convention (spec §4.6 / §8): a value whose
    /// rational part is already an integer reports a fractional part of
    /// exactly `1`, a sentinel outside `[0, 1)` that keeps already-integer
    /// rows out of the "largest fractional part" contest.
    pub fn row_selection_fraction(&self) -> BigRational {
        let f = self.fractional_part();
        if f.is_zero() {
            BigRational::one()
        } else {
            f
        }
    }
}

impl Add for &ExactScalar {
    type Output = ExactScalar;
    fn add(self, rhs: &ExactScalar) -> ExactScalar {
        ExactScalar { m: &self.m + &rhs.m, c: &self.c + &rhs.c }
    }
}

impl Add for ExactScalar {
    type Output = ExactScalar;
    fn add(self, rhs: ExactScalar) -> ExactScalar {
        &self + &rhs
    }
}

impl Sub for &ExactScalar {
    type Output = ExactScalar;
    fn sub(self, rhs: &ExactScalar) -> ExactScalar {
        ExactScalar { m: &self.m - &rhs.m, c: &self.c - &rhs.c }
    }
}

impl Sub for ExactScalar {
    type Output = ExactScalar;
    fn sub(self, rhs: ExactScalar) -> ExactScalar {
        &self - &rhs
    }
}

impl Neg for &ExactScalar {
    type Output = ExactScalar;
    fn neg(self) -> ExactScalar {
        ExactScalar { m: -&self.m, c: -&self.c }
    }
}

impl Neg for ExactScalar {
    type Output = ExactScalar;
    fn neg(self) -> ExactScalar {
        -&self
    }
}

/// Scaling by a plain rational is always defined (componentwise).
impl Mul<&BigRational> for &ExactScalar {
    type Output = ExactScalar;
    fn mul(self, rhs: &BigRational) -> ExactScalar {
        ExactScalar { m: &self.m * rhs, c: &self.c * rhs }
    }
}

impl Div<&BigRational> for &ExactScalar {
    type Output = ExactScalar;
    fn div(self, rhs: &BigRational) -> ExactScalar {
        ExactScalar { m: &self.m / rhs, c: &self.c / rhs }
    }
}

/// Scalar-by-scalar multiplication, used when pricing a row cost
/// (`A[i,j] * c_basis(i)`) where at most one side carries `M`. Panics via
/// `UnsupportedOp` if both sides do — a programmer error per spec §7, never
/// reachable from correct canonicalization (constraint-matrix entries are
/// always plain rationals).
impl Mul for &ExactScalar {
    type Output = ExactScalar;
    fn mul(self, rhs: &ExactScalar) -> ExactScalar {
        self.checked_mul(rhs)
            .expect("ExactScalar multiplication requires at least one plain-rational factor")
    }
}

impl PartialOrd for ExactScalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactScalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.m.cmp(&other.m) {
            Ordering::Equal => self.c.cmp(&other.c),
            ord => ord,
        }
    }
}

impl fmt::Display for ExactScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.m.is_zero() && self.c.is_zero() {
            return write!(f, "0");
        }
        if self.m.is_zero() {
            return write!(f, "{}", render_rational(&self.c));
        }
        let m_abs = self.m.abs();
        let m_part = if m_abs.is_one() {
            "M".to_string()
        } else {
            format!("{}M", render_rational(&m_abs))
        };
        let sign = if self.m.is_negative() { "-" } else { "" };
        if self.c.is_zero() {
            write!(f, "{sign}{m_part}")
        } else {
            let c_sign = if self.c.is_negative() { "-" } else { "+" };
            write!(f, "{sign}{m_part} {c_sign} {}", render_rational(&self.c.abs()))
        }
    }
}

pub(crate) fn render_rational(r: &BigRational) -> String {
    if r.is_integer() {
        r.numer().to_string()
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}

/// Rendered as `p/q` (or `p` if `q == 1`), or per §4.1 when `M`-bearing —
/// spec §6's rendering rule for the solver's JSON-facing output.
impl serde::Serialize for ExactScalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn render_zero() {
        assert_eq!(ExactScalar::zero().to_string(), "0");
    }

    #[test]
    fn render_plain_rational() {
        assert_eq!(ExactScalar::rational(r(2, 3)).to_string(), "2/3");
        assert_eq!(ExactScalar::rational(r(4, 1)).to_string(), "4");
    }

    #[test]
    fn render_big_m() {
        let s = ExactScalar::new(r(1, 1), r(0, 1));
        assert_eq!(s.to_string(), "M");
        let s = ExactScalar::new(r(-1, 1), r(5, 1));
        assert_eq!(s.to_string(), "-M + 5");
        let s = ExactScalar::new(r(3, 1), r(-2, 1));
        assert_eq!(s.to_string(), "3M - 2");
    }

    #[test]
    fn ordering_m_dominates() {
        let small_m = ExactScalar::new(r(1, 1), r(-1_000_000, 1));
        let large_rational = ExactScalar::rational(r(1_000_000, 1));
        assert!(small_m > large_rational);
    }

    #[test]
    fn mul_rejects_m_times_m() {
        let a = ExactScalar::from_big_m(r(1, 1));
        let b = ExactScalar::from_big_m(r(2, 1));
        assert!(a.checked_mul(&b).is_err());
    }

    #[test]
    fn mul_allows_rational_times_m() {
        let a = ExactScalar::rational(r(2, 1));
        let b = ExactScalar::from_big_m(r(1, 1));
        let result = a.checked_mul(&b).unwrap();
        assert_eq!(result.m, r(2, 1));
        assert_eq!(result.c, BigRational::zero());
    }

    #[test]
    fn div_rejects_m_bearing_divisor() {
        let a = ExactScalar::rational(r(1, 1));
        let b = ExactScalar::from_big_m(r(1, 1));
        assert!(a.checked_div(&b).is_err());
    }

    #[test]
    fn add_then_sub_is_identity() {
        let a = ExactScalar::new(r(1, 2), r(3, 4));
        let b = ExactScalar::new(r(-1, 3), r(5, 6));
        let sum = &a + &b;
        let round_trip = &sum - &b;
        assert_eq!(round_trip, a);
    }

    #[test]
    fn fractional_part_positive_and_negative() {
        assert_eq!(ExactScalar::rational(r(7, 2)).fractional_part(), r(1, 2));
        assert_eq!(ExactScalar::rational(r(-7, 2)).fractional_part(), r(1, 2));
        assert_eq!(ExactScalar::rational(r(4, 1)).fractional_part(), BigRational::zero());
    }

    #[test]
    fn row_selection_fraction_flags_integers() {
        assert_eq!(ExactScalar::rational(r(4, 1)).row_selection_fraction(), BigRational::one());
        assert_eq!(ExactScalar::rational(r(9, 2)).row_selection_fraction(), r(1, 2));
    }
}
