// ExactRational - Big-integer fractions for consensus arithmetic
// Principle: No floating point on any path that decides a slash

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash as StdHash, Hasher};
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// Rounding policy used by [`ExactRational::round_to_i64`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingPolicy {
    /// Nearest integer, ties move away from zero: 2.5 -> 3, -2.5 -> -3
    HalfAwayFromZero,
}

/// CONSENSUS CONSTANT: every node must derive thresholds with this policy.
/// Changing it changes `MinSignedThreshold` for odd windows at a 1/2 fraction
/// and is therefore a hard fork.
pub const ROUNDING_POLICY: RoundingPolicy = RoundingPolicy::HalfAwayFromZero;

/// Exact fraction with arbitrary precision numerator and denominator.
///
/// The pair is kept as constructed (no eager reduction) apart from moving a
/// negative sign onto the numerator, so `denominator > 0` always holds.
/// Equality, ordering and hashing are by value: `2/4 == 1/2`.
#[derive(Debug, Clone)]
pub struct ExactRational {
    numer: BigInt,
    denom: BigInt,
}

impl ExactRational {
    /// Construct `numerator / denominator`. Fails on a zero denominator.
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, RationalError> {
        let numer = numerator.into();
        let denom = denominator.into();

        if denom.is_zero() {
            return Err(RationalError::InvalidRational(format!(
                "{}/0: denominator must be non-zero",
                numer
            )));
        }

        if denom.is_negative() {
            return Ok(Self { numer: -numer, denom: -denom });
        }

        Ok(Self { numer, denom })
    }

    /// Whole number `n / 1`
    pub fn from_int(n: i64) -> Self {
        Self::from_integer(n)
    }

    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self {
            numer: n.into(),
            denom: BigInt::one(),
        }
    }

    /// `n / 100`, kept unreduced
    pub fn percent(n: u64) -> Self {
        Self {
            numer: BigInt::from(n),
            denom: BigInt::from(100u32),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numer.is_negative()
    }

    /// True when `0 <= self <= 1`
    pub fn is_unit_interval(&self) -> bool {
        !self.is_negative() && self.numer <= self.denom
    }

    /// Canonical lowest-terms copy
    pub fn reduced(&self) -> Self {
        Self::from_ratio(self.to_ratio())
    }

    /// Exact quotient. Fails if `other` has value zero, whatever its denominator.
    pub fn checked_div(&self, other: &ExactRational) -> Result<ExactRational, RationalError> {
        if other.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        Ok(Self::from_ratio(self.to_ratio() / other.to_ratio()))
    }

    /// Round to the nearest i64 under [`ROUNDING_POLICY`].
    ///
    /// Truncating division leaves a remainder carrying the numerator's sign;
    /// when twice its magnitude reaches the denominator the quotient steps one
    /// unit away from zero.
    pub fn round_to_i64(&self) -> Result<i64, RationalError> {
        let rounded = match ROUNDING_POLICY {
            RoundingPolicy::HalfAwayFromZero => {
                let quotient = &self.numer / &self.denom;
                let remainder = &self.numer % &self.denom;
                if remainder.abs() * 2u32 >= self.denom {
                    quotient + self.numer.signum()
                } else {
                    quotient
                }
            }
        };

        rounded
            .to_i64()
            .ok_or_else(|| RationalError::Overflow(rounded.to_string()))
    }

    /// Apply this fraction to an unsigned amount, truncating toward zero.
    ///
    /// Used by stake consumers: `1/100` of `10_000` is exactly `100`. A
    /// negative fraction is rejected as invalid rather than as an overflow.
    pub fn mul_truncate(&self, amount: u128) -> Result<u128, RationalError> {
        if self.is_negative() {
            return Err(RationalError::InvalidRational(format!(
                "{}: negative fraction cannot scale an unsigned amount",
                self
            )));
        }

        let product = &self.numer * BigInt::from(amount) / &self.denom;
        product
            .to_u128()
            .ok_or_else(|| RationalError::Overflow(product.to_string()))
    }

    fn to_ratio(&self) -> BigRational {
        BigRational::new(self.numer.clone(), self.denom.clone())
    }

    fn from_ratio(ratio: BigRational) -> Self {
        Self {
            numer: ratio.numer().clone(),
            denom: ratio.denom().clone(),
        }
    }
}

/// Exact product
impl<'a> Mul<&'a ExactRational> for &'a ExactRational {
    type Output = ExactRational;

    fn mul(self, rhs: &'a ExactRational) -> ExactRational {
        ExactRational::from_ratio(self.to_ratio() * rhs.to_ratio())
    }
}

impl<'a> Add<&'a ExactRational> for &'a ExactRational {
    type Output = ExactRational;

    fn add(self, rhs: &'a ExactRational) -> ExactRational {
        ExactRational::from_ratio(self.to_ratio() + rhs.to_ratio())
    }
}

impl<'a> Sub<&'a ExactRational> for &'a ExactRational {
    type Output = ExactRational;

    fn sub(self, rhs: &'a ExactRational) -> ExactRational {
        ExactRational::from_ratio(self.to_ratio() - rhs.to_ratio())
    }
}

impl PartialEq for ExactRational {
    fn eq(&self, other: &Self) -> bool {
        &self.numer * &other.denom == &other.numer * &self.denom
    }
}

impl Eq for ExactRational {}

impl PartialOrd for ExactRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactRational {
    // Both denominators are positive, so cross-multiplication preserves order
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl StdHash for ExactRational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let canonical = self.reduced();
        canonical.numer.hash(state);
        canonical.denom.hash(state);
    }
}

impl fmt::Display for ExactRational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.denom.is_one() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl FromStr for ExactRational {
    type Err = RationalError;

    /// Parses `"n/d"` or `"n"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            BigInt::from_str(part)
                .map_err(|e| RationalError::InvalidRational(format!("{:?}: {}", s, e)))
        };

        match s.split_once('/') {
            Some((n, d)) => Self::new(parse(n)?, parse(d)?),
            None => Ok(Self::from_integer(parse(s)?)),
        }
    }
}

impl From<i64> for ExactRational {
    fn from(n: i64) -> Self {
        Self::from_int(n)
    }
}

impl Serialize for ExactRational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExactRational {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Rational arithmetic errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RationalError {
    #[error("Invalid rational: {0}")]
    InvalidRational(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow: {0} does not fit the target integer")]
    Overflow(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;

    fn r(n: i64, d: i64) -> ExactRational {
        ExactRational::new(n, d).unwrap()
    }

    fn hash_of(value: &ExactRational) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_zero_denominator_rejected() {
        let err = ExactRational::new(1, 0).unwrap_err();
        assert!(matches!(err, RationalError::InvalidRational(_)));
    }

    #[test]
    fn test_negative_denominator_normalized() {
        let value = r(1, -2);
        assert_eq!(value.numer(), &BigInt::from(-1));
        assert_eq!(value.denom(), &BigInt::from(2));
        assert!(value.is_negative());
    }

    #[test]
    fn test_value_equality_ignores_representation() {
        assert_eq!(r(2, 4), r(1, 2));
        assert_eq!(r(-3, -6), r(1, 2));
        assert_eq!(hash_of(&r(2, 4)), hash_of(&r(1, 2)));
        assert_ne!(r(1, 3), r(1, 2));
    }

    #[test]
    fn test_lazy_reduction_keeps_inputs() {
        let value = r(50, 100);
        assert_eq!(value.to_string(), "50/100");
        assert_eq!(value.reduced().to_string(), "1/2");
    }

    #[test]
    fn test_percent() {
        let five = ExactRational::percent(5);
        assert_eq!(five, r(1, 20));
        assert_eq!(five.to_string(), "5/100");
        assert_eq!(ExactRational::percent(100), ExactRational::one());
        assert!(ExactRational::percent(0).is_zero());
    }

    #[test]
    fn test_ordering() {
        assert!(r(1, 3) < r(1, 2));
        assert!(r(-1, 2) < ExactRational::zero());
        assert!(r(3, 2) > ExactRational::one());
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(ROUNDING_POLICY, RoundingPolicy::HalfAwayFromZero);
        assert_eq!(r(5, 2).round_to_i64().unwrap(), 3);
        assert_eq!(r(-5, 2).round_to_i64().unwrap(), -3);
        assert_eq!(r(7, 2).round_to_i64().unwrap(), 4);
        assert_eq!(r(-7, 2).round_to_i64().unwrap(), -4);
    }

    #[test]
    fn test_round_non_ties() {
        assert_eq!(r(100, 3).round_to_i64().unwrap(), 33);
        assert_eq!(r(200, 3).round_to_i64().unwrap(), 67);
        assert_eq!(r(-100, 3).round_to_i64().unwrap(), -33);
        assert_eq!(r(-200, 3).round_to_i64().unwrap(), -67);
        assert_eq!(r(1, 3).round_to_i64().unwrap(), 0);
        assert_eq!(r(0, 7).round_to_i64().unwrap(), 0);
    }

    #[test]
    fn test_round_overflow() {
        let max = ExactRational::from_int(i64::MAX);
        assert_eq!(max.round_to_i64().unwrap(), i64::MAX);

        let beyond = &max + &ExactRational::one();
        assert!(matches!(beyond.round_to_i64(), Err(RationalError::Overflow(_))));

        // i64::MAX + 1/2 rounds up past the range
        let half_past = &max + &r(1, 2);
        assert!(matches!(half_past.round_to_i64(), Err(RationalError::Overflow(_))));

        let min = ExactRational::from_int(i64::MIN);
        assert_eq!(min.round_to_i64().unwrap(), i64::MIN);
    }

    #[test]
    fn test_multiply_exact() {
        let product = &ExactRational::from_int(100) * &r(1, 3);
        assert_eq!(product, r(100, 3));

        // Beyond 64 bits without loss
        let max = ExactRational::from_int(i64::MAX);
        let big = &max * &max;
        let back = big.checked_div(&max).unwrap();
        assert_eq!(back, ExactRational::from_int(i64::MAX));
    }

    #[test]
    fn test_divide_by_zero_valued() {
        let zero_forms = [ExactRational::zero(), r(0, 5), r(0, -9)];
        for zero in &zero_forms {
            assert_eq!(r(3, 4).checked_div(zero).unwrap_err(), RationalError::DivisionByZero);
        }
        assert_eq!(r(1, 2).checked_div(&r(1, 4)).unwrap(), ExactRational::from_int(2));
    }

    #[test]
    fn test_unit_interval() {
        assert!(ExactRational::zero().is_unit_interval());
        assert!(ExactRational::one().is_unit_interval());
        assert!(r(5, 5).is_unit_interval());
        assert!(r(1, 20).is_unit_interval());
        assert!(!r(21, 20).is_unit_interval());
        assert!(!r(-1, 20).is_unit_interval());
    }

    #[test]
    fn test_mul_truncate_stake() {
        assert_eq!(r(1, 100).mul_truncate(10_000).unwrap(), 100);
        assert_eq!(r(1, 20).mul_truncate(10_000).unwrap(), 500);
        assert_eq!(r(1, 3).mul_truncate(10).unwrap(), 3);
        assert_eq!(r(0, 7).mul_truncate(10_000).unwrap(), 0);
        assert!(matches!(r(-1, 2).mul_truncate(10), Err(RationalError::InvalidRational(_))));
        assert!(matches!(r(1, -2).mul_truncate(0), Err(RationalError::InvalidRational(_))));
        assert!(matches!(
            ExactRational::from_int(2).mul_truncate(u128::MAX),
            Err(RationalError::Overflow(_))
        ));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("1/2".parse::<ExactRational>().unwrap(), r(1, 2));
        assert_eq!("-7".parse::<ExactRational>().unwrap(), ExactRational::from_int(-7));
        assert_eq!(ExactRational::from_int(42).to_string(), "42");
        assert_eq!(r(3, -4).to_string(), "-3/4");

        assert!(matches!("1/0".parse::<ExactRational>(), Err(RationalError::InvalidRational(_))));
        assert!(matches!("one/2".parse::<ExactRational>(), Err(RationalError::InvalidRational(_))));
        assert!(matches!("1.5".parse::<ExactRational>(), Err(RationalError::InvalidRational(_))));
    }

    #[test]
    fn test_serde_json_string_form() {
        let json = serde_json::to_string(&r(1, 20)).unwrap();
        assert_eq!(json, "\"1/20\"");
        let back: ExactRational = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r(1, 20));

        assert!(serde_json::from_str::<ExactRational>("\"5/0\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_round_within_half(n in -1_000_000i64..1_000_000, d in 1i64..10_000) {
            let value = r(n, d);
            let rounded = value.round_to_i64().unwrap();
            let diff = &value - &ExactRational::from_int(rounded);
            prop_assert!(diff <= r(1, 2));
            prop_assert!(diff >= r(-1, 2));
        }

        #[test]
        fn prop_round_is_odd_symmetric(n in 0i64..1_000_000, d in 1i64..10_000) {
            let up = r(n, d).round_to_i64().unwrap();
            let down = r(-n, d).round_to_i64().unwrap();
            prop_assert_eq!(up, -down);
        }

        #[test]
        fn prop_divide_by_zero_valued(
            n in any::<i64>(),
            d in any::<i64>().prop_filter("non-zero", |d| *d != 0),
            k in any::<i64>().prop_filter("non-zero", |k| *k != 0),
        ) {
            prop_assert_eq!(r(n, d).checked_div(&r(0, k)), Err(RationalError::DivisionByZero));
        }

        #[test]
        fn prop_representation_independent(n in -10_000i64..10_000, d in 1i64..1_000, k in 1i64..1_000) {
            let base = r(n, d);
            let scaled = r(n * k, d * k);
            prop_assert_eq!(&base, &scaled);
            prop_assert_eq!(base.round_to_i64().unwrap(), scaled.round_to_i64().unwrap());
            prop_assert_eq!(hash_of(&base), hash_of(&scaled));
        }

        #[test]
        fn prop_text_round_trip(n in any::<i64>(), d in 1i64..i64::MAX) {
            let value = r(n, d);
            let parsed: ExactRational = value.to_string().parse().unwrap();
            prop_assert_eq!(parsed.numer(), value.numer());
            prop_assert_eq!(parsed.denom(), value.denom());
        }
    }
}
