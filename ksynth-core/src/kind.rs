//! Enumerated selectors stored as small bit fields

use rand::Rng;

/// A closed set of variants with fixed wire codes
///
/// Implemented by the enums [`wire_kind!`](crate::wire_kind) generates.
pub trait WireKind: Copy + Sized + 'static {
    /// Symbolic name used in diagnostics
    const NAME: &'static str;
    /// Every variant, in wire-code order
    const ALL: &'static [Self];

    /// Look up the variant for a wire code
    fn from_wire(wire: u8) -> Option<Self>;

    /// Wire code of this variant
    fn to_wire(self) -> u8;

    /// Uniformly random variant
    fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Declare a `#[repr(u8)]` enum with wire codes
///
/// ```ignore
/// wire_kind! {
///     /// Filter mode
///     pub enum FilterMode {
///         #[default]
///         LowPass = 0,
///         HighPass = 1,
///     }
/// }
/// ```
#[macro_export]
macro_rules! wire_kind {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(u8)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $code),+
        }

        impl $crate::WireKind for $name {
            const NAME: &'static str = stringify!($name);
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn from_wire(wire: u8) -> ::core::option::Option<Self> {
                match wire {
                    $($code => ::core::option::Option::Some(Self::$variant),)+
                    _ => ::core::option::Option::None,
                }
            }

            fn to_wire(self) -> u8 {
                self as u8
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire_kind;

    wire_kind! {
        enum Shape {
            #[default]
            Triangle = 0,
            Sawtooth = 1,
            Square = 2,
            Random = 3,
        }
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(Shape::from_wire(2), Some(Shape::Square));
        assert_eq!(Shape::from_wire(4), None);
        assert_eq!(Shape::Random.to_wire(), 3);
        assert_eq!(Shape::default(), Shape::Triangle);
        assert_eq!(Shape::ALL.len(), 4);
    }

    #[test]
    fn test_every_variant_round_trips() {
        for &shape in Shape::ALL {
            assert_eq!(Shape::from_wire(shape.to_wire()), Some(shape));
        }
    }
}
