//! The reduced Tate pairing: an affine Miller loop over a configured
//! subgroup order followed by the full final exponentiation
//! `f^((p^k - 1)/r)` into the order-`r` subgroup of `F_{p^k}^*`.
//!
//! Nothing here assumes a named curve. The caller supplies the base curve,
//! the embedding-degree extension and the subgroup order; the engine lifts
//! the curve into the extension at construction and validates that the
//! parameters admit a pairing at all.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Pow, Zero};

use crate::arithmetic::FieldArith;
use crate::curve::{Curve, Point};
use crate::error::{Error, Result};
use crate::extension::{ExtElement, ExtField};
use crate::field::FieldElement;

/// Pairing engine for one `(curve, extension, order)` configuration.
///
/// G1 inputs are points of the base curve, G2 inputs are points of the
/// lifted extension curve; both must have order dividing `order`. For
/// curves where G2 naturally lives in a twist, the caller maps twist points
/// into the extension curve before handing them over.
#[derive(Clone, Debug)]
pub struct TatePairing {
    base_curve: Curve<FieldElement>,
    ext_curve: Curve<ExtElement>,
    ext: ExtField,
    order: BigUint,
    final_exp: BigUint,
}

impl TatePairing {
    /// Validates and freezes a pairing configuration.
    ///
    /// Fails with [`Error::IncompatibleField`] when the extension is not
    /// built over the curve's field, and with
    /// [`Error::InvalidPairingParameters`] when `order` is zero or does not
    /// divide `p^k - 1` (no order-`order` roots of unity exist in the
    /// extension, so no reduced pairing can land anywhere).
    pub fn new(base_curve: Curve<FieldElement>, ext: ExtField, order: BigUint) -> Result<Self> {
        if ext.base() != base_curve.a().field() {
            return Err(Error::IncompatibleField);
        }
        let ext_curve = Curve::new(ext.embed(base_curve.a())?, ext.embed(base_curve.b())?)?;

        if order.is_zero() {
            return Err(Error::InvalidPairingParameters);
        }
        let pk = Pow::pow(ext.base().modulus(), ext.degree() as u32);
        let unit_order = pk - BigUint::one();
        if (&unit_order % &order) != BigUint::zero() {
            return Err(Error::InvalidPairingParameters);
        }
        Ok(TatePairing {
            base_curve,
            ext_curve,
            ext,
            order: order.clone(),
            final_exp: unit_order / order,
        })
    }

    pub fn base_curve(&self) -> &Curve<FieldElement> {
        &self.base_curve
    }

    /// The base curve's equation over `F_{p^k}`; the curve G2 points live on.
    pub fn ext_curve(&self) -> &Curve<ExtElement> {
        &self.ext_curve
    }

    pub fn ext(&self) -> &ExtField {
        &self.ext
    }

    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// The identity of the target group GT.
    pub fn gt_identity(&self) -> Gt {
        Gt {
            value: self.ext.one(),
        }
    }

    /// Embeds a base-curve point into the extension curve.
    pub fn lift(&self, p: &Point<FieldElement>) -> Result<Point<ExtElement>> {
        self.base_curve.ensure_member(p)?;
        match p {
            Point::Identity => Ok(Point::Identity),
            Point::Affine { x, y } => Ok(Point::Affine {
                x: self.ext.embed(x)?,
                y: self.ext.embed(y)?,
            }),
        }
    }

    /// The bilinear map `e(P, Q)`: validates both inputs, runs the Miller
    /// loop on the lifted `P`, and projects through the final
    /// exponentiation.
    ///
    /// `P` must lie on the base curve and `Q` on the extension curve
    /// ([`Error::IncompatibleCurve`] otherwise); both must be members of the
    /// order-`r` subgroup ([`Error::InvalidSubgroupElement`]).
    pub fn pairing(&self, p: &Point<FieldElement>, q: &Point<ExtElement>) -> Result<Gt> {
        self.base_curve.ensure_member(p)?;
        self.ext_curve.ensure_member(q)?;
        if !self.base_curve.in_subgroup(p, &self.order)? {
            return Err(Error::InvalidSubgroupElement);
        }
        if !self.ext_curve.in_subgroup(q, &self.order)? {
            return Err(Error::InvalidSubgroupElement);
        }
        let lifted = self.lift(p)?;
        let f = self.miller_loop(&lifted, q)?;
        self.final_exponentiation(&f)
    }

    /// The Miller loop: walk the bits of the subgroup order from the second
    /// most significant down, squaring the accumulator value and folding in
    /// `l(Q) / v(Q)` for each step, where `l` is the line through the step's
    /// operands and `v` the vertical through its result, while the point
    /// accumulator traces out `order * P`. The vertical divisions keep the
    /// value a function with the right divisor for any `Q` in the extension;
    /// they only cancel under final exponentiation for special choices of
    /// `Q`, so they cannot be skipped here.
    ///
    /// An identity operand short-circuits to the extension-field one, which
    /// the final exponentiation maps to the GT identity. A `Q` sharing an
    /// x-coordinate with an intermediate multiple of `P` makes a line or
    /// vertical vanish and surfaces as [`Error::DivisionByZero`].
    pub fn miller_loop(
        &self,
        p: &Point<ExtElement>,
        q: &Point<ExtElement>,
    ) -> Result<ExtElement> {
        if p.is_identity() || q.is_identity() {
            return Ok(self.ext.one());
        }
        let mut f = self.ext.one();
        let mut t = p.clone();
        for i in (0..self.order.bits() - 1).rev() {
            let tangent = self.line(&t, &t, q)?;
            t = self.ext_curve.add_unchecked(&t, &t)?;
            f = f.mul(&f)?.mul(&tangent)?.div(&self.vertical(&t, q)?)?;
            if self.order.bit(i) {
                let chord = self.line(&t, p, q)?;
                t = self.ext_curve.add_unchecked(&t, p)?;
                f = f.mul(&chord)?.div(&self.vertical(&t, q)?)?;
            }
        }
        Ok(f)
    }

    /// Evaluates at `q` the vertical line through `t`; the vertical through
    /// the identity is the constant one.
    fn vertical(&self, t: &Point<ExtElement>, q: &Point<ExtElement>) -> Result<ExtElement> {
        match (t, q) {
            (Point::Affine { x: tx, .. }, Point::Affine { x: qx, .. }) => qx.sub(tx),
            _ => Ok(self.ext.one()),
        }
    }

    /// Evaluates at `q` the line through `t` and `s` (tangent when equal).
    ///
    /// Degenerate geometries evaluate the vertical line `x_q - x_t`: an
    /// identity defining point, a mutual-inverse pair, and the 2-torsion
    /// tangent all collapse to it. The slope formulas are the group-law
    /// formulas of [`Curve::add`], reused at `q` instead of deriving a new
    /// point.
    fn line(
        &self,
        t: &Point<ExtElement>,
        s: &Point<ExtElement>,
        q: &Point<ExtElement>,
    ) -> Result<ExtElement> {
        let (qx, qy) = match q {
            Point::Affine { x, y } => (x, y),
            Point::Identity => return Ok(self.ext.one()),
        };
        let (tx, ty, sx, sy) = match (t, s) {
            (Point::Identity, Point::Identity) => return Ok(self.ext.one()),
            (Point::Identity, Point::Affine { x, .. })
            | (Point::Affine { x, .. }, Point::Identity) => return qx.sub(x),
            (Point::Affine { x: tx, y: ty }, Point::Affine { x: sx, y: sy }) => (tx, ty, sx, sy),
        };

        if tx == sx && *ty == sy.neg() {
            // vertical chord (or vertical tangent at a 2-torsion point)
            return qx.sub(tx);
        }
        let lambda = if tx == sx {
            let num = tx.constant(3).mul(&tx.mul(tx)?)?.add(self.ext_curve.a())?;
            num.div(&ty.constant(2).mul(ty)?)?
        } else {
            sy.sub(ty)?.div(&sx.sub(tx)?)?
        };
        qy.sub(ty)?.sub(&lambda.mul(&qx.sub(tx)?)?)
    }

    /// Raises a Miller-loop output to `(p^k - 1)/r` by plain big-integer
    /// square-and-multiply; the correctness baseline with no
    /// Frobenius-endomorphism shortcuts.
    pub fn final_exponentiation(&self, f: &ExtElement) -> Result<Gt> {
        let exp = BigInt::from_biguint(Sign::Plus, self.final_exp.clone());
        Ok(Gt {
            value: f.pow(&exp)?,
        })
    }
}

/// An element of GT, the order-`r` subgroup of the extension field's
/// multiplicative group. Written multiplicatively: the group operation is
/// [`Gt::mul`] and the identity is the extension-field one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gt {
    value: ExtElement,
}

impl Gt {
    pub fn value(&self) -> &ExtElement {
        &self.value
    }

    pub fn is_identity(&self) -> bool {
        self.value == self.value.field().one()
    }

    pub fn mul(&self, rhs: &Gt) -> Result<Gt> {
        Ok(Gt {
            value: self.value.mul(&rhs.value)?,
        })
    }

    /// Exponentiation by any signed integer; GT elements are units, so
    /// negative exponents always succeed.
    pub fn pow(&self, exp: &BigInt) -> Result<Gt> {
        Ok(Gt {
            value: self.value.pow(exp)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    // Supersingular y^2 = x^3 + x over F_59: |E| = 60, r = 5, k = 2,
    // extension modulus u^2 + 1. G1 = (25, 29); G2 = (-25, 29u) is the
    // distortion image of G1 and generates an independent order-5 subgroup.
    fn setup() -> (Field, TatePairing, Point<FieldElement>, Point<ExtElement>) {
        let f = Field::new(BigUint::from(59u32)).unwrap();
        let curve = Curve::new(f.from_u64(1), f.zero()).unwrap();
        let ext = ExtField::new(f.clone(), vec![f.one(), f.zero()]).unwrap();
        let engine = TatePairing::new(curve.clone(), ext.clone(), BigUint::from(5u32)).unwrap();

        let g1 = curve.point(f.from_u64(25), f.from_u64(29)).unwrap();
        let g2 = engine
            .ext_curve()
            .point(
                ext.element(vec![f.from_u64(34)]).unwrap(),
                ext.element(vec![f.zero(), f.from_u64(29)]).unwrap(),
            )
            .unwrap();
        (f, engine, g1, g2)
    }

    #[test]
    fn generators_have_order_five() {
        let (_, engine, g1, g2) = setup();
        let five = BigUint::from(5u32);
        assert!(engine.base_curve().in_subgroup(&g1, &five).unwrap());
        assert!(engine.ext_curve().in_subgroup(&g2, &five).unwrap());
    }

    #[test]
    fn known_pairing_value() {
        let (f, engine, g1, g2) = setup();
        let gt = engine.pairing(&g1, &g2).unwrap();
        let expected = engine
            .ext()
            .element(vec![f.from_u64(42), f.from_u64(40)])
            .unwrap();
        assert_eq!(gt.value(), &expected);
    }

    #[test]
    fn non_degenerate() {
        let (_, engine, g1, g2) = setup();
        let gt = engine.pairing(&g1, &g2).unwrap();
        assert!(!gt.is_identity());
        assert_eq!(
            gt.pow(&BigInt::from(5)).unwrap(),
            engine.gt_identity()
        );
    }

    #[test]
    fn bilinear_in_both_arguments() {
        let (_, engine, g1, g2) = setup();
        let gt = engine.pairing(&g1, &g2).unwrap();
        for a in 1i64..5 {
            for b in 1i64..5 {
                let pa = engine
                    .base_curve()
                    .scalar_mul(&BigInt::from(a), &g1)
                    .unwrap();
                let qb = engine
                    .ext_curve()
                    .scalar_mul(&BigInt::from(b), &g2)
                    .unwrap();
                assert_eq!(
                    engine.pairing(&pa, &qb).unwrap(),
                    gt.pow(&BigInt::from(a * b)).unwrap()
                );
            }
        }
    }

    #[test]
    fn bilinear_outside_the_distortion_image() {
        // R = lift(G1) + G2 = (4u, 41 + 41u) has order 5, but its
        // x-coordinate lies outside F_59, so the vertical-line factors of
        // the Miller value do not collapse under final exponentiation.
        let (_, engine, g1, g2) = setup();
        let r = engine
            .ext_curve()
            .add(&engine.lift(&g1).unwrap(), &g2)
            .unwrap();
        assert!(engine
            .ext_curve()
            .in_subgroup(&r, &BigUint::from(5u32))
            .unwrap());
        let gt = engine.pairing(&g1, &r).unwrap();
        assert!(!gt.is_identity());
        let g1_double = engine
            .base_curve()
            .scalar_mul(&BigInt::from(2), &g1)
            .unwrap();
        assert_eq!(
            engine.pairing(&g1_double, &r).unwrap(),
            gt.pow(&BigInt::from(2)).unwrap()
        );
        // lift(G1) pairs trivially with G1, so R pairs exactly like G2
        assert_eq!(gt, engine.pairing(&g1, &g2).unwrap());
    }

    #[test]
    fn unitary() {
        // e((r-1)P, Q) = e(P, Q)^(-1)
        let (_, engine, g1, g2) = setup();
        let gt = engine.pairing(&g1, &g2).unwrap();
        let p_inv = engine
            .base_curve()
            .scalar_mul(&BigInt::from(4), &g1)
            .unwrap();
        assert_eq!(
            engine.pairing(&p_inv, &g2).unwrap(),
            gt.pow(&BigInt::from(-1)).unwrap()
        );
        assert_eq!(
            engine.pairing(&p_inv, &g2).unwrap().mul(&gt).unwrap(),
            engine.gt_identity()
        );
    }

    #[test]
    fn identity_inputs_map_to_gt_identity() {
        let (_, engine, g1, g2) = setup();
        assert_eq!(
            engine.pairing(&engine.base_curve().identity(), &g2).unwrap(),
            engine.gt_identity()
        );
        assert_eq!(
            engine.pairing(&g1, &engine.ext_curve().identity()).unwrap(),
            engine.gt_identity()
        );
    }

    #[test]
    fn out_of_subgroup_inputs_rejected() {
        let (f, engine, _, g2) = setup();
        // (4, 3) lies on the curve but its order does not divide 5
        let p = engine
            .base_curve()
            .point(f.from_u64(4), f.from_u64(3))
            .unwrap();
        assert!(!engine
            .base_curve()
            .in_subgroup(&p, &BigUint::from(5u32))
            .unwrap());
        assert_eq!(
            engine.pairing(&p, &g2),
            Err(Error::InvalidSubgroupElement)
        );
    }

    #[test]
    fn foreign_curve_inputs_rejected() {
        let (f, engine, g1, _) = setup();
        // (1, 8) lies on y^2 = x^3 + 4x but not on the engine's curve
        let other = Curve::new(f.from_u64(4), f.zero()).unwrap();
        let t = other.point(f.from_u64(1), f.from_u64(8)).unwrap();
        assert_eq!(
            engine.pairing(&t, &engine.ext_curve().identity()),
            Err(Error::IncompatibleCurve)
        );
        let lifted_wrong = Point::Affine {
            x: engine.ext().constant(5),
            y: engine.ext().constant(5),
        };
        assert_eq!(
            engine.pairing(&g1, &lifted_wrong),
            Err(Error::IncompatibleCurve)
        );
    }

    #[test]
    fn bad_configurations_rejected() {
        let f = Field::new(BigUint::from(59u32)).unwrap();
        let curve = Curve::new(f.from_u64(1), f.zero()).unwrap();
        let ext = ExtField::new(f.clone(), vec![f.one(), f.zero()]).unwrap();
        // 7 does not divide 59^2 - 1 = 3480
        assert!(matches!(
            TatePairing::new(curve.clone(), ext.clone(), BigUint::from(7u32)),
            Err(Error::InvalidPairingParameters)
        ));
        assert!(matches!(
            TatePairing::new(curve.clone(), ext, BigUint::from(0u32)),
            Err(Error::InvalidPairingParameters)
        ));
        // extension over a different base field
        let g = Field::new(BigUint::from(101u32)).unwrap();
        let foreign = ExtField::new(g.clone(), vec![g.one(), g.zero()]).unwrap();
        assert!(matches!(
            TatePairing::new(curve, foreign, BigUint::from(5u32)),
            Err(Error::IncompatibleField)
        ));
    }

    #[test]
    fn miller_loop_value_projects_to_subgroup() {
        let (_, engine, g1, g2) = setup();
        let lifted = engine.lift(&g1).unwrap();
        let f = engine.miller_loop(&lifted, &g2).unwrap();
        let gt = engine.final_exponentiation(&f).unwrap();
        assert_eq!(gt.pow(&BigInt::from(5)).unwrap(), engine.gt_identity());
    }
}
