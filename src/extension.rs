//! Polynomial-basis extension fields `F_p[u]/(m(u))` of arbitrary degree.
//!
//! The degree and the (monic, irreducible) modulus polynomial are runtime
//! parameters, so one implementation serves every tower level a pairing
//! configuration needs. Elements are coefficient vectors of fixed length
//! `d`, lowest degree first; multiplication reduces by substituting
//! `u^d = -(c_{d-1} u^{d-1} + ... + c_0)` and inversion runs the extended
//! Euclidean algorithm over `F_p[u]`.

use std::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, Sign};
use rand_core::RngCore;

use crate::error::{Error, Result};
use crate::field::{Field, FieldElement};

#[derive(Debug)]
struct ExtFieldRepr {
    base: Field,
    /// Non-leading coefficients of the monic modulus polynomial, low to
    /// high; the implied leading coefficient of `u^degree` is one.
    modulus_poly: Vec<FieldElement>,
}

/// An extension field handle, shared by every [`ExtElement`] derived from it.
///
/// Irreducibility of the modulus polynomial is a caller-guaranteed
/// precondition, like primality on [`Field`]. A reducible modulus surfaces
/// later as [`Error::DivisionByZero`] when inverting a zero divisor.
#[derive(Clone, Debug)]
pub struct ExtField {
    repr: Arc<ExtFieldRepr>,
}

impl PartialEq for ExtField {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.repr, &other.repr)
            || (self.repr.base == other.repr.base
                && self.repr.modulus_poly == other.repr.modulus_poly)
    }
}

impl Eq for ExtField {}

impl ExtField {
    /// Builds `F_p[u]/(u^d + c_{d-1} u^{d-1} + ... + c_0)` where
    /// `modulus_poly` lists `c_0 ..= c_{d-1}` and `d = modulus_poly.len()`.
    pub fn new(base: Field, modulus_poly: Vec<FieldElement>) -> Result<ExtField> {
        if modulus_poly.len() < 2 {
            return Err(Error::InvalidExtensionDegree(modulus_poly.len()));
        }
        for c in &modulus_poly {
            if c.field() != &base {
                return Err(Error::IncompatibleField);
            }
        }
        Ok(ExtField {
            repr: Arc::new(ExtFieldRepr { base, modulus_poly }),
        })
    }

    pub fn base(&self) -> &Field {
        &self.repr.base
    }

    pub fn degree(&self) -> usize {
        self.repr.modulus_poly.len()
    }

    pub fn zero(&self) -> ExtElement {
        ExtElement {
            field: self.clone(),
            coeffs: vec![self.base().zero(); self.degree()],
        }
    }

    pub fn one(&self) -> ExtElement {
        let mut coeffs = vec![self.base().zero(); self.degree()];
        coeffs[0] = self.base().one();
        ExtElement {
            field: self.clone(),
            coeffs,
        }
    }

    /// A small base-field constant viewed as a degree-zero polynomial.
    pub fn constant(&self, value: u64) -> ExtElement {
        let mut coeffs = vec![self.base().zero(); self.degree()];
        coeffs[0] = self.base().from_u64(value);
        ExtElement {
            field: self.clone(),
            coeffs,
        }
    }

    /// Injects a base-field element as a constant polynomial. This is how
    /// G1 points and curve coefficients are lifted into the tower.
    pub fn embed(&self, value: &FieldElement) -> Result<ExtElement> {
        if value.field() != self.base() {
            return Err(Error::IncompatibleField);
        }
        let mut coeffs = vec![self.base().zero(); self.degree()];
        coeffs[0] = value.clone();
        Ok(ExtElement {
            field: self.clone(),
            coeffs,
        })
    }

    /// Builds an element from explicit coefficients, lowest degree first.
    /// Shorter vectors are zero-padded; longer ones are reduced modulo the
    /// modulus polynomial.
    pub fn element(&self, coeffs: Vec<FieldElement>) -> Result<ExtElement> {
        for c in &coeffs {
            if c.field() != self.base() {
                return Err(Error::IncompatibleField);
            }
        }
        let d = self.degree();
        let reduced = if coeffs.len() > d {
            let mut full = self.repr.modulus_poly.clone();
            full.push(self.base().one());
            let (_, rem) = poly_divmod(&coeffs, &full, self.base())?;
            rem
        } else {
            coeffs
        };
        let mut out = vec![self.base().zero(); d];
        for (i, c) in reduced.into_iter().take(d).enumerate() {
            out[i] = c;
        }
        Ok(ExtElement {
            field: self.clone(),
            coeffs: out,
        })
    }

    pub fn random(&self, mut rng: impl RngCore) -> ExtElement {
        let coeffs = (0..self.degree())
            .map(|_| self.base().random(&mut rng))
            .collect();
        ExtElement {
            field: self.clone(),
            coeffs,
        }
    }

    fn ensure_same(&self, other: &ExtField) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(Error::IncompatibleField)
        }
    }
}

/// An element of an [`ExtField`]: `d` base-field coefficients, lowest
/// degree first, always fully reduced. Immutable value semantics.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtElement {
    field: ExtField,
    coeffs: Vec<FieldElement>,
}

impl fmt::Debug for ExtElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coeffs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

impl ExtElement {
    pub fn field(&self) -> &ExtField {
        &self.field
    }

    pub fn coeffs(&self) -> &[FieldElement] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(FieldElement::is_zero)
    }

    pub fn add(&self, rhs: &ExtElement) -> Result<ExtElement> {
        self.field.ensure_same(&rhs.field)?;
        let coeffs = self
            .coeffs
            .iter()
            .zip(&rhs.coeffs)
            .map(|(a, b)| a.add(b))
            .collect::<Result<_>>()?;
        Ok(ExtElement {
            field: self.field.clone(),
            coeffs,
        })
    }

    pub fn sub(&self, rhs: &ExtElement) -> Result<ExtElement> {
        self.field.ensure_same(&rhs.field)?;
        let coeffs = self
            .coeffs
            .iter()
            .zip(&rhs.coeffs)
            .map(|(a, b)| a.sub(b))
            .collect::<Result<_>>()?;
        Ok(ExtElement {
            field: self.field.clone(),
            coeffs,
        })
    }

    pub fn neg(&self) -> ExtElement {
        ExtElement {
            field: self.field.clone(),
            coeffs: self.coeffs.iter().map(FieldElement::neg).collect(),
        }
    }

    pub fn mul(&self, rhs: &ExtElement) -> Result<ExtElement> {
        self.field.ensure_same(&rhs.field)?;
        let base = self.field.base();
        let d = self.field.degree();
        let m = &self.field.repr.modulus_poly;
        let mut prod = poly_mul(&self.coeffs, &rhs.coeffs, base)?;
        // substitute u^i = u^(i-d) * u^d, highest power first
        for i in (d..prod.len()).rev() {
            let c = prod[i].clone();
            if c.is_zero() {
                continue;
            }
            prod[i] = base.zero();
            for (j, mj) in m.iter().enumerate() {
                prod[i - d + j] = prod[i - d + j].sub(&c.mul(mj)?)?;
            }
        }
        prod.truncate(d);
        Ok(ExtElement {
            field: self.field.clone(),
            coeffs: prod,
        })
    }

    pub fn div(&self, rhs: &ExtElement) -> Result<ExtElement> {
        self.field.ensure_same(&rhs.field)?;
        self.mul(&rhs.invert()?)
    }

    /// Multiplicative inverse via the extended Euclidean algorithm on
    /// `F_p[u]`. Fails with [`Error::DivisionByZero`] on the zero element,
    /// or on a zero divisor when the modulus polynomial is reducible.
    pub fn invert(&self) -> Result<ExtElement> {
        if self.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let base = self.field.base();
        let mut full = self.field.repr.modulus_poly.clone();
        full.push(base.one());

        let mut r0 = full.clone();
        let mut r1 = self.coeffs.clone();
        let mut t0 = vec![base.zero()];
        let mut t1 = vec![base.one()];
        while poly_deg(&r1).is_some() {
            let (q, rem) = poly_divmod(&r0, &r1, base)?;
            let t2 = poly_sub(&t0, &poly_mul(&q, &t1, base)?, base)?;
            r0 = r1;
            r1 = rem;
            t0 = t1;
            t1 = t2;
        }
        let g = poly_deg(&r0).ok_or(Error::DivisionByZero)?;
        if g != 0 {
            // gcd has positive degree: self is a zero divisor
            return Err(Error::DivisionByZero);
        }
        let scale = r0[0].invert()?;
        let (_, t_red) = poly_divmod(&t0, &full, base)?;
        let mut coeffs = vec![base.zero(); self.field.degree()];
        for (i, c) in t_red.iter().take(coeffs.len()).enumerate() {
            coeffs[i] = c.mul(&scale)?;
        }
        Ok(ExtElement {
            field: self.field.clone(),
            coeffs,
        })
    }

    /// Signed square-and-multiply exponentiation.
    pub fn pow(&self, exp: &BigInt) -> Result<ExtElement> {
        let base = match exp.sign() {
            Sign::Minus => self.invert()?,
            _ => self.clone(),
        };
        let mag = exp.magnitude();
        let mut acc = self.field.one();
        for i in (0..mag.bits()).rev() {
            acc = acc.mul(&acc)?;
            if mag.bit(i) {
                acc = acc.mul(&base)?;
            }
        }
        Ok(acc)
    }
}

/// Index of the highest non-zero coefficient, or `None` for the zero
/// polynomial.
fn poly_deg(p: &[FieldElement]) -> Option<usize> {
    p.iter().rposition(|c| !c.is_zero())
}

fn poly_mul(a: &[FieldElement], b: &[FieldElement], base: &Field) -> Result<Vec<FieldElement>> {
    let mut out = vec![base.zero(); a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.iter().enumerate() {
            out[i + j] = out[i + j].add(&ai.mul(bj)?)?;
        }
    }
    Ok(out)
}

fn poly_sub(a: &[FieldElement], b: &[FieldElement], base: &Field) -> Result<Vec<FieldElement>> {
    let n = a.len().max(b.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let ai = a.get(i).cloned().unwrap_or_else(|| base.zero());
        let bi = b.get(i).cloned().unwrap_or_else(|| base.zero());
        out.push(ai.sub(&bi)?);
    }
    Ok(out)
}

/// Long division of polynomials over `F_p`; returns `(quotient, remainder)`.
fn poly_divmod(
    num: &[FieldElement],
    den: &[FieldElement],
    base: &Field,
) -> Result<(Vec<FieldElement>, Vec<FieldElement>)> {
    let dd = poly_deg(den).ok_or(Error::DivisionByZero)?;
    let lead_inv = den[dd].invert()?;
    let mut rem = num.to_vec();
    let mut quo = vec![base.zero(); num.len().max(1)];
    while let Some(dr) = poly_deg(&rem) {
        if dr < dd {
            break;
        }
        let coef = rem[dr].mul(&lead_inv)?;
        let shift = dr - dd;
        quo[shift] = quo[shift].add(&coef)?;
        for j in 0..=dd {
            rem[shift + j] = rem[shift + j].sub(&coef.mul(&den[j])?)?;
        }
    }
    Ok((quo, rem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use rand_core::SeedableRng;
    use rand_xorshift::XorShiftRng;

    const SEED: [u8; 16] = [
        0x59, 0x62, 0xbe, 0x5d, 0x76, 0x3d, 0x31, 0x8d, 0x17, 0xdb, 0x37, 0x32, 0x54, 0x06, 0xbc,
        0xe5,
    ];

    // F_59[u]/(u^2 + 1); 59 = 3 mod 4 so u^2 + 1 is irreducible
    fn f59_2() -> (Field, ExtField) {
        let f = Field::new(BigUint::from(59u32)).unwrap();
        let ext = ExtField::new(f.clone(), vec![f.one(), f.zero()]).unwrap();
        (f, ext)
    }

    fn el(ext: &ExtField, c0: u64, c1: u64) -> ExtElement {
        let f = ext.base().clone();
        ext.element(vec![f.from_u64(c0), f.from_u64(c1)]).unwrap()
    }

    #[test]
    fn rejects_degenerate_towers() {
        let f = Field::new(BigUint::from(59u32)).unwrap();
        assert_eq!(
            ExtField::new(f.clone(), vec![f.one()]),
            Err(Error::InvalidExtensionDegree(1))
        );
        let g = Field::new(BigUint::from(101u32)).unwrap();
        assert_eq!(
            ExtField::new(f, vec![g.one(), g.zero()]),
            Err(Error::IncompatibleField)
        );
    }

    #[test]
    fn u_squared_is_minus_one() {
        let (f, ext) = f59_2();
        let u = el(&ext, 0, 1);
        let minus_one = ext.embed(&f.one().neg()).unwrap();
        assert_eq!(u.mul(&u).unwrap(), minus_one);
    }

    #[test]
    fn norm_multiplication() {
        // (a + bu)(a - bu) = a^2 + b^2 under u^2 = -1
        let (f, ext) = f59_2();
        let x = el(&ext, 7, 12);
        let conj = ext
            .element(vec![f.from_u64(7), f.from_u64(12).neg()])
            .unwrap();
        let norm = el(&ext, (7 * 7 + 12 * 12) % 59, 0);
        assert_eq!(x.mul(&conj).unwrap(), norm);
    }

    #[test]
    fn inversion_round_trips() {
        let (_, ext) = f59_2();
        let mut rng = XorShiftRng::from_seed(SEED);
        for _ in 0..50 {
            let x = ext.random(&mut rng);
            if x.is_zero() {
                continue;
            }
            assert_eq!(x.mul(&x.invert().unwrap()).unwrap(), ext.one());
        }
    }

    #[test]
    fn zero_has_no_inverse() {
        let (_, ext) = f59_2();
        assert_eq!(ext.zero().invert(), Err(Error::DivisionByZero));
        assert_eq!(ext.one().div(&ext.zero()), Err(Error::DivisionByZero));
    }

    #[test]
    fn oversized_coefficient_vectors_reduce() {
        // u^2 maps to -1
        let (f, ext) = f59_2();
        let x = ext
            .element(vec![f.zero(), f.zero(), f.one()])
            .unwrap();
        assert_eq!(x, ext.embed(&f.one().neg()).unwrap());
    }

    #[test]
    fn pow_matches_repeated_multiplication() {
        let (_, ext) = f59_2();
        let x = el(&ext, 3, 5);
        let mut acc = ext.one();
        for _ in 0..9 {
            acc = acc.mul(&x).unwrap();
        }
        assert_eq!(x.pow(&BigInt::from(9)).unwrap(), acc);
        assert_eq!(x.pow(&BigInt::from(0)).unwrap(), ext.one());
        let inv = x.pow(&BigInt::from(-1)).unwrap();
        assert_eq!(x.mul(&inv).unwrap(), ext.one());
    }

    #[test]
    fn multiplicative_group_order() {
        // |F_{59^2}^*| = 59^2 - 1
        let (_, ext) = f59_2();
        let x = el(&ext, 2, 1);
        assert_eq!(x.pow(&BigInt::from(59 * 59 - 1)).unwrap(), ext.one());
    }

    #[test]
    fn mismatched_towers_rejected() {
        let (_, ext) = f59_2();
        let g = Field::new(BigUint::from(101u32)).unwrap();
        let other = ExtField::new(g.clone(), vec![g.one(), g.zero()]).unwrap();
        assert_eq!(
            ext.one().add(&other.one()),
            Err(Error::IncompatibleField)
        );
        assert_eq!(ext.embed(&g.one()), Err(Error::IncompatibleField));
    }
}
