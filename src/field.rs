use std::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;

use crate::error::{Error, Result};

/// A prime field `F_p`, identified by its modulus.
///
/// The handle is a cheap `Arc` clone; every [`FieldElement`] derived from it
/// keeps a clone so that mismatched-field operations can be rejected at
/// runtime. Two fields compare equal iff their moduli are equal.
///
/// Primality of the modulus is a caller-guaranteed precondition; oddness and
/// `p >= 3` are checked at construction.
#[derive(Clone, Debug)]
pub struct Field {
    modulus: Arc<BigUint>,
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.modulus, &other.modulus) || self.modulus == other.modulus
    }
}

impl Eq for Field {}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}", self.modulus)
    }
}

impl Field {
    /// Constructs the field of residues modulo `modulus`.
    ///
    /// Fails with [`Error::InvalidModulus`] when the modulus is even or
    /// below 3. Square roots and point-negation arithmetic elsewhere in the
    /// crate rely on odd characteristic.
    pub fn new(modulus: BigUint) -> Result<Field> {
        if modulus < BigUint::from(3u8) || modulus.is_even() {
            return Err(Error::InvalidModulus(modulus));
        }
        Ok(Field {
            modulus: Arc::new(modulus),
        })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Builds an element by reducing `value` into `[0, p)`. Negative inputs
    /// reduce to their positive representative.
    pub fn element(&self, value: BigInt) -> FieldElement {
        let (sign, mag) = value.into_parts();
        let r = mag % self.modulus();
        let value = if sign == Sign::Minus && !r.is_zero() {
            self.modulus() - r
        } else {
            r
        };
        FieldElement {
            field: self.clone(),
            value,
        }
    }

    pub fn from_u64(&self, value: u64) -> FieldElement {
        FieldElement {
            field: self.clone(),
            value: BigUint::from(value) % self.modulus(),
        }
    }

    pub fn zero(&self) -> FieldElement {
        FieldElement {
            field: self.clone(),
            value: BigUint::zero(),
        }
    }

    pub fn one(&self) -> FieldElement {
        FieldElement {
            field: self.clone(),
            value: BigUint::one(),
        }
    }

    /// Samples a uniform element by reducing `bits(p) + 64` random bits.
    pub fn random(&self, mut rng: impl RngCore) -> FieldElement {
        let nbytes = (self.modulus.bits() as usize + 7) / 8 + 8;
        let mut buf = vec![0u8; nbytes];
        rng.fill_bytes(&mut buf);
        FieldElement {
            field: self.clone(),
            value: BigUint::from_bytes_le(&buf) % self.modulus(),
        }
    }

    fn ensure_same(&self, other: &Field) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(Error::IncompatibleField)
        }
    }
}

/// A residue in `[0, p)` tagged with its parent [`Field`].
///
/// Immutable value semantics: every operation returns a new element, already
/// reduced. Elements of different fields never compare equal and refuse to
/// combine (`Error::IncompatibleField`).
#[derive(Clone, PartialEq, Eq)]
pub struct FieldElement {
    field: Field,
    value: BigUint,
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FieldElement {
    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn add(&self, rhs: &FieldElement) -> Result<FieldElement> {
        self.field.ensure_same(&rhs.field)?;
        let mut v = &self.value + &rhs.value;
        if v >= *self.field.modulus() {
            v -= self.field.modulus();
        }
        Ok(FieldElement {
            field: self.field.clone(),
            value: v,
        })
    }

    pub fn sub(&self, rhs: &FieldElement) -> Result<FieldElement> {
        self.field.ensure_same(&rhs.field)?;
        let v = (&self.value + self.field.modulus() - &rhs.value) % self.field.modulus();
        Ok(FieldElement {
            field: self.field.clone(),
            value: v,
        })
    }

    pub fn mul(&self, rhs: &FieldElement) -> Result<FieldElement> {
        self.field.ensure_same(&rhs.field)?;
        Ok(FieldElement {
            field: self.field.clone(),
            value: &self.value * &rhs.value % self.field.modulus(),
        })
    }

    pub fn div(&self, rhs: &FieldElement) -> Result<FieldElement> {
        self.field.ensure_same(&rhs.field)?;
        self.mul(&rhs.invert()?)
    }

    /// Additive inverse. Total, so it stays infallible; the crate exposes no
    /// negation on points, only on field values.
    pub fn neg(&self) -> FieldElement {
        let value = if self.value.is_zero() {
            BigUint::zero()
        } else {
            self.field.modulus() - &self.value
        };
        FieldElement {
            field: self.field.clone(),
            value,
        }
    }

    /// Multiplicative inverse by Fermat exponentiation `a^(p-2)`.
    ///
    /// Fails with [`Error::DivisionByZero`] iff `self` is the zero residue.
    pub fn invert(&self) -> Result<FieldElement> {
        if self.value.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let exp = self.field.modulus() - 2u8;
        Ok(FieldElement {
            field: self.field.clone(),
            value: self.value.modpow(&exp, self.field.modulus()),
        })
    }

    /// Square-and-multiply exponentiation. Negative exponents go through
    /// [`FieldElement::invert`] first and inherit its zero-base failure.
    pub fn pow(&self, exp: &BigInt) -> Result<FieldElement> {
        let base = match exp.sign() {
            Sign::Minus => self.invert()?,
            _ => self.clone(),
        };
        Ok(FieldElement {
            field: self.field.clone(),
            value: base.value.modpow(exp.magnitude(), self.field.modulus()),
        })
    }
}
