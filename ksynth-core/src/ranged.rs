//! Range-constrained scalar values
//!
//! Each synth parameter is a newtype over `i32` declared with
//! [`ranged_value!`](crate::ranged_value). The newtype knows its domain, its
//! default, and the rule that maps it to and from the wire byte:
//!
//! | Rule | Wire transform |
//! |---|---|
//! | [`WireRule::Direct`] | `wire = value`, decode keeps the low 7 bits |
//! | [`WireRule::Unmasked`] | `wire = value`, used for multi-byte composites |
//! | [`WireRule::Centered`] | `wire = value + center` |
//! | [`WireRule::OneBased`] | `wire = value - 1` |
//!
//! Construction never clamps implicitly. [`RangedValue::new`] rejects an
//! out-of-domain value with a [`RangeError`], and so does
//! [`RangedValue::from_wide`] when a wire value lands outside the domain after
//! the transform. Saturation is available as the explicit
//! [`RangedValue::clamped`].
//!
//! Values whose whole wire image fits one byte also implement [`ByteValue`].
//! Wider values (10-bit wave numbers and the like) are declared `wide` and can
//! only travel through [`RangedValue::to_wide`], split by the caller.

use rand::Rng;

use crate::error::RangeError;

/// Mapping between a domain value and its wire representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireRule {
    /// `wire = value`; decoding keeps only the low 7 bits
    Direct,
    /// `wire = value` over the full wire width (10-bit wave numbers etc.)
    Unmasked,
    /// `wire = value + center`, `value = wire - center`
    Centered(i32),
    /// `wire = value - 1`, `value = wire + 1`
    OneBased,
}

impl WireRule {
    /// Wire bits to domain value
    #[inline]
    pub const fn decode(self, wire: u16) -> i32 {
        match self {
            Self::Direct => (wire & 0x7F) as i32,
            Self::Unmasked => wire as i32,
            Self::Centered(center) => wire as i32 - center,
            Self::OneBased => wire as i32 + 1,
        }
    }

    /// Domain value to wire bits
    #[inline]
    pub const fn encode(self, value: i32) -> u16 {
        self.shift(value) as u16
    }

    const fn shift(self, value: i32) -> i32 {
        match self {
            Self::Direct | Self::Unmasked => value,
            Self::Centered(center) => value + center,
            Self::OneBased => value - 1,
        }
    }

    /// Whether every value in `min..=max` survives a one-byte round trip
    ///
    /// `Direct` decoding drops bit 7, so its ceiling is 0x7F.
    pub const fn fits_byte(self, min: i32, max: i32) -> bool {
        let ceiling = match self {
            Self::Direct => 0x7F,
            _ => 0xFF,
        };
        self.shift(min) >= 0 && self.shift(max) <= ceiling
    }
}

/// A scalar with an inclusive domain, a default and a wire rule
///
/// Implemented by the newtypes [`ranged_value!`](crate::ranged_value)
/// generates; the provided methods are the whole public surface.
pub trait RangedValue: Copy + Sized {
    /// Symbolic name used in diagnostics
    const NAME: &'static str;
    /// Inclusive lower bound
    const MIN: i32;
    /// Inclusive upper bound
    const MAX: i32;
    /// Value of a freshly initialized parameter
    const DEFAULT: i32;
    /// Wire mapping
    const RULE: WireRule;

    /// Wrap a value that is already known to be in the domain
    #[doc(hidden)]
    fn from_raw(value: i32) -> Self;

    /// Current value
    fn value(&self) -> i32;

    /// Whether `value` lies in the domain
    fn is_valid(value: i32) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }

    /// Build from a domain value, rejecting anything outside the bounds
    fn new(value: i32) -> Result<Self, RangeError> {
        if Self::is_valid(value) {
            Ok(Self::from_raw(value))
        } else {
            Err(Self::range_error(value))
        }
    }

    /// Build from a domain value, saturating at the bounds
    fn clamped(value: i32) -> Self {
        Self::from_raw(value.clamp(Self::MIN, Self::MAX))
    }

    /// Replace the value, re-checking the domain
    fn set(&mut self, value: i32) -> Result<(), RangeError> {
        *self = Self::new(value)?;
        Ok(())
    }

    /// Decode a wire value assembled from several bytes
    fn from_wide(wire: u16) -> Result<Self, RangeError> {
        Self::new(Self::RULE.decode(wire))
    }

    /// Encode to a wide wire value, to be split across bytes by the caller
    fn to_wide(&self) -> u16 {
        Self::RULE.encode(self.value())
    }

    /// Uniformly random value from the domain
    fn random<R: Rng>(rng: &mut R) -> Self {
        Self::from_raw(rng.random_range(Self::MIN..=Self::MAX))
    }

    /// The error a rejected `value` produces
    fn range_error(value: i32) -> RangeError {
        RangeError {
            name: Self::NAME,
            value,
            min: Self::MIN,
            max: Self::MAX,
        }
    }
}

/// A ranged value carried in a single wire byte
///
/// [`ranged_value!`](crate::ranged_value) implements this for every
/// declaration not marked `wide`, and refuses to compile one whose encoded
/// domain does not fit the byte.
pub trait ByteValue: RangedValue {
    /// Decode a single wire byte
    fn from_wire(wire: u8) -> Result<Self, RangeError> {
        Self::from_wide(u16::from(wire))
    }

    /// Encode to a single wire byte
    fn to_wire(&self) -> u8 {
        Self::RULE.encode(self.value()) as u8
    }
}

/// Declare ranged-value newtypes
///
/// ```ignore
/// ranged_value! {
///     /// Filter cutoff (0...100)
///     pub struct Cutoff(0..=100, default 100, WireRule::Direct);
///     /// Fine tune (-63...63), 64 on the wire is zero
///     pub struct Fine(-63..=63, default 0, WireRule::Centered(64));
///     /// Wave number split over two bytes
///     pub struct Wave(0..=1023, default 0, WireRule::Unmasked, wide);
/// }
/// ```
#[macro_export]
macro_rules! ranged_value {
    (@wire $name:ident $min:literal $max:literal) => {
        const _: () = assert!(
            <$name as $crate::RangedValue>::RULE.fits_byte($min, $max),
            concat!(stringify!($name), " does not fit one wire byte; declare it wide"),
        );

        impl $crate::ByteValue for $name {}
    };
    (@wire $name:ident $min:literal $max:literal wide) => {};
    ($(
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($min:literal ..= $max:literal, default $default:literal, $rule:expr $(, $wide:ident)?);
    )+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name(i32);

        const _: () = assert!($min <= $default && $default <= $max);

        impl $crate::RangedValue for $name {
            const NAME: &'static str = stringify!($name);
            const MIN: i32 = $min;
            const MAX: i32 = $max;
            const DEFAULT: i32 = $default;
            const RULE: $crate::WireRule = $rule;

            #[inline]
            fn from_raw(value: i32) -> Self {
                Self(value)
            }

            #[inline]
            fn value(&self) -> i32 {
                self.0
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::convert::TryFrom<i32> for $name {
            type Error = $crate::RangeError;

            fn try_from(value: i32) -> ::core::result::Result<Self, Self::Error> {
                <Self as $crate::RangedValue>::new(value)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.0
            }
        }

        $crate::ranged_value!(@wire $name $min $max $($wide)?);
    )+};
}
