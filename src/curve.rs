//! Short Weierstrass curves `y^2 = x^3 + ax + b` and their group law,
//! generic over [`FieldArith`] so the same code runs over the base field
//! and over extension towers.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Signed;

use crate::arithmetic::FieldArith;
use crate::error::{Error, Result};

/// A point of the curve group: either the unified identity / point at
/// infinity, or an affine coordinate pair satisfying the curve equation.
///
/// There is no public negation operator. Where group-law internals need the
/// reflection `(x, -y)` they compute it inline; callers reach the inverse of
/// a point through `scalar_mul(-1, p)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Point<F: FieldArith> {
    Identity,
    Affine { x: F, y: F },
}

impl<F: FieldArith> Point<F> {
    pub fn is_identity(&self) -> bool {
        matches!(self, Point::Identity)
    }
}

/// A non-singular short Weierstrass curve over the field of its
/// coefficients.
///
/// The group operations live here rather than on [`Point`]: a dynamic curve
/// owns its coefficients, and points passed in are checked to lie on `self`
/// (an off-curve operand means the point was built against some other curve
/// and fails with [`Error::IncompatibleCurve`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Curve<F: FieldArith> {
    a: F,
    b: F,
}

impl<F: FieldArith> Curve<F> {
    /// Fails with [`Error::SingularCurve`] when the discriminant
    /// `4a^3 + 27b^2` vanishes, and with [`Error::IncompatibleField`] when
    /// the coefficients come from different fields.
    pub fn new(a: F, b: F) -> Result<Curve<F>> {
        let a3 = a.mul(&a)?.mul(&a)?;
        let b2 = b.mul(&b)?;
        let disc = a
            .constant(4)
            .mul(&a3)?
            .add(&a.constant(27).mul(&b2)?)?;
        if disc.is_zero() {
            return Err(Error::SingularCurve);
        }
        Ok(Curve { a, b })
    }

    pub fn a(&self) -> &F {
        &self.a
    }

    pub fn b(&self) -> &F {
        &self.b
    }

    pub fn identity(&self) -> Point<F> {
        Point::Identity
    }

    /// Whether `(x, y)` satisfies `y^2 = x^3 + ax + b`.
    pub fn on_curve(&self, x: &F, y: &F) -> Result<bool> {
        let lhs = y.mul(y)?;
        let rhs = x.mul(x)?.mul(x)?.add(&self.a.mul(x)?)?.add(&self.b)?;
        Ok(lhs == rhs)
    }

    /// Constructs a validated affine point; fails with
    /// [`Error::PointNotOnCurve`] instead of normalizing bad coordinates.
    pub fn point(&self, x: F, y: F) -> Result<Point<F>> {
        if self.on_curve(&x, &y)? {
            Ok(Point::Affine { x, y })
        } else {
            Err(Error::PointNotOnCurve)
        }
    }

    /// Whether `p` is the identity or a valid affine point of this curve.
    pub fn contains(&self, p: &Point<F>) -> Result<bool> {
        match p {
            Point::Identity => Ok(true),
            Point::Affine { x, y } => self.on_curve(x, y),
        }
    }

    /// Group addition with the exhaustive case dispatch, in priority order:
    /// identity operand, mutual inverses, doubling, generic chord.
    pub fn add(&self, p: &Point<F>, q: &Point<F>) -> Result<Point<F>> {
        self.ensure_member(p)?;
        self.ensure_member(q)?;
        self.add_unchecked(p, q)
    }

    pub fn double(&self, p: &Point<F>) -> Result<Point<F>> {
        self.ensure_member(p)?;
        self.add_unchecked(p, p)
    }

    /// Double-and-add over the bits of `k`, most significant first.
    /// `k = 0` yields the identity; a negative `k` computes with `|k|` and
    /// reflects the final result only.
    pub fn scalar_mul(&self, k: &BigInt, p: &Point<F>) -> Result<Point<F>> {
        self.ensure_member(p)?;
        let mag = k.magnitude();
        let mut acc = Point::Identity;
        for i in (0..mag.bits()).rev() {
            acc = self.add_unchecked(&acc, &acc)?;
            if mag.bit(i) {
                acc = self.add_unchecked(&acc, p)?;
            }
        }
        if k.is_negative() {
            acc = reflect(&acc);
        }
        Ok(acc)
    }

    /// Membership check for the order-`order` subgroup: `order * p` must be
    /// the identity. The order is a caller-supplied curve parameter, never
    /// derived here.
    pub fn in_subgroup(&self, p: &Point<F>, order: &BigUint) -> Result<bool> {
        let k = BigInt::from_biguint(Sign::Plus, order.clone());
        Ok(self.scalar_mul(&k, p)?.is_identity())
    }

    /// Group law without the membership checks; used by `scalar_mul` and
    /// the Miller loop, which validate their inputs once up front.
    pub(crate) fn add_unchecked(&self, p: &Point<F>, q: &Point<F>) -> Result<Point<F>> {
        let (px, py, qx, qy) = match (p, q) {
            (Point::Identity, _) => return Ok(q.clone()),
            (_, Point::Identity) => return Ok(p.clone()),
            (Point::Affine { x: px, y: py }, Point::Affine { x: qx, y: qy }) => (px, py, qx, qy),
        };

        if px == qx && *py == qy.neg() {
            // mutual inverses; covers the shared 2-torsion case y = 0
            return Ok(Point::Identity);
        }

        let lambda = if px == qx {
            // doubling; py != 0 here since the reflection case ate y = 0
            let num = px.constant(3).mul(&px.mul(px)?)?.add(&self.a)?;
            num.div(&py.constant(2).mul(py)?)?
        } else {
            qy.sub(py)?.div(&qx.sub(px)?)?
        };

        let xr = lambda.mul(&lambda)?.sub(px)?.sub(qx)?;
        let yr = lambda.mul(&px.sub(&xr)?)?.sub(py)?;
        Ok(Point::Affine { x: xr, y: yr })
    }

    pub(crate) fn ensure_member(&self, p: &Point<F>) -> Result<()> {
        match self.contains(p) {
            Ok(true) => Ok(()),
            // off-curve or foreign-field points were built against another curve
            Ok(false) | Err(Error::IncompatibleField) => Err(Error::IncompatibleCurve),
            Err(e) => Err(e),
        }
    }
}

/// The intrinsic reflection `(x, -y)`; deliberately not part of the public
/// point API.
pub(crate) fn reflect<F: FieldArith>(p: &Point<F>) -> Point<F> {
    match p {
        Point::Identity => Point::Identity,
        Point::Affine { x, y } => Point::Affine {
            x: x.clone(),
            y: y.neg(),
        },
    }
}
