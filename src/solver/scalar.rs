//! Numeric kinds for electric systems.
//!
//! Systems are assembled either with real entries (time-domain excitation)
//! or with complex entries (phasor excitation). Both share one code path.

use std::fmt::Display;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_complex::Complex64;
use num_traits::{One, Zero};

/// Scalar type usable in the stiffness/mass matrices and potential vectors.
pub trait ElectricScalar:
    nalgebra::Scalar
    + Copy
    + Display
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
{
    /// Embed a real number.
    fn from_real(value: f64) -> Self;

    /// Convert from a complex number. Real scalars keep the real part.
    fn from_complex(value: Complex64) -> Self;

    /// Widen to a complex number.
    fn to_complex(self) -> Complex64;

    /// Absolute value (modulus for complex numbers).
    fn modulus(self) -> f64;

    /// Neither NaN nor infinite.
    fn is_finite_value(self) -> bool;

    /// Whether the value carries a nonzero imaginary part.
    fn has_imaginary(self) -> bool;
}

impl ElectricScalar for f64 {
    #[inline]
    fn from_real(value: f64) -> Self {
        value
    }

    #[inline]
    fn from_complex(value: Complex64) -> Self {
        value.re
    }

    #[inline]
    fn to_complex(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }

    #[inline]
    fn modulus(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn is_finite_value(self) -> bool {
        self.is_finite()
    }

    #[inline]
    fn has_imaginary(self) -> bool {
        false
    }
}

impl ElectricScalar for Complex64 {
    #[inline]
    fn from_real(value: f64) -> Self {
        Complex64::new(value, 0.0)
    }

    #[inline]
    fn from_complex(value: Complex64) -> Self {
        value
    }

    #[inline]
    fn to_complex(self) -> Complex64 {
        self
    }

    #[inline]
    fn modulus(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn is_finite_value(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    #[inline]
    fn has_imaginary(self) -> bool {
        self.im != 0.0
    }
}
