use num_bigint::BigUint;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Failure conditions of field, curve and pairing arithmetic.
///
/// All variants are raised synchronously at the point of detection and are
/// never recovered internally; nothing is coerced to a default element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Field construction was given an even modulus or one below 3.
    #[error("field modulus must be an odd integer >= 3, got {0}")]
    InvalidModulus(BigUint),

    /// Two operands belong to different `Field` (or `ExtField`) instances.
    #[error("operands belong to different fields")]
    IncompatibleField,

    /// Inversion of the zero element, or a division with a zero denominator.
    #[error("division by zero")]
    DivisionByZero,

    /// Coordinates handed to `Curve::point` do not satisfy the curve equation.
    #[error("point does not satisfy the curve equation")]
    PointNotOnCurve,

    /// The discriminant `4a^3 + 27b^2` vanishes, so the curve is singular.
    #[error("curve is singular: discriminant is zero")]
    SingularCurve,

    /// A point constructed against a different curve was passed to a group
    /// or pairing operation.
    #[error("point belongs to a different curve")]
    IncompatibleCurve,

    /// A pairing input is not a member of the configured prime-order subgroup.
    #[error("point is not in the expected subgroup")]
    InvalidSubgroupElement,

    /// Extension construction was given fewer than two modulus-polynomial
    /// coefficients, i.e. a tower of degree below 2.
    #[error("extension degree must be at least 2, got {0}")]
    InvalidExtensionDegree(usize),

    /// The subgroup order does not divide `p^k - 1` (or is zero), so no
    /// reduced Tate pairing exists for the supplied parameters.
    #[error("subgroup order is incompatible with the extension field")]
    InvalidPairingParameters,
}
