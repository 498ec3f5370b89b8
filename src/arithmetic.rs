//! Shared arithmetic seam so the group law and the Miller loop are written
//! once and instantiated over both the base field and its extensions.

use std::fmt::Debug;

use num_bigint::BigInt;

use crate::error::Result;
use crate::extension::ExtElement;
use crate::field::FieldElement;

/// Field-element behaviour required by generic curve and pairing code.
///
/// Runtime-parametrized fields cannot mint constants out of thin air, so the
/// trait derives `zero`/`one`/small constants from an existing element of the
/// same field (`*_like`). Arithmetic is checked: combining elements of
/// different field instances is an error, not a panic.
pub trait FieldArith: Clone + PartialEq + Debug + Sized {
    /// The zero of this element's field.
    fn zero_like(&self) -> Self;

    /// The one of this element's field.
    fn one_like(&self) -> Self;

    /// A small integer constant embedded into this element's field.
    fn constant(&self, value: u64) -> Self;

    fn is_zero(&self) -> bool;

    fn add(&self, rhs: &Self) -> Result<Self>;

    fn sub(&self, rhs: &Self) -> Result<Self>;

    fn mul(&self, rhs: &Self) -> Result<Self>;

    fn div(&self, rhs: &Self) -> Result<Self>;

    /// Additive inverse; total on every field element.
    fn neg(&self) -> Self;

    /// Multiplicative inverse; fails on zero.
    fn invert(&self) -> Result<Self>;

    /// Signed exponentiation; negative exponents invert first.
    fn pow(&self, exp: &BigInt) -> Result<Self>;
}

impl FieldArith for FieldElement {
    fn zero_like(&self) -> Self {
        self.field().zero()
    }

    fn one_like(&self) -> Self {
        self.field().one()
    }

    fn constant(&self, value: u64) -> Self {
        self.field().from_u64(value)
    }

    fn is_zero(&self) -> bool {
        FieldElement::is_zero(self)
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        FieldElement::add(self, rhs)
    }

    fn sub(&self, rhs: &Self) -> Result<Self> {
        FieldElement::sub(self, rhs)
    }

    fn mul(&self, rhs: &Self) -> Result<Self> {
        FieldElement::mul(self, rhs)
    }

    fn div(&self, rhs: &Self) -> Result<Self> {
        FieldElement::div(self, rhs)
    }

    fn neg(&self) -> Self {
        FieldElement::neg(self)
    }

    fn invert(&self) -> Result<Self> {
        FieldElement::invert(self)
    }

    fn pow(&self, exp: &BigInt) -> Result<Self> {
        FieldElement::pow(self, exp)
    }
}

impl FieldArith for ExtElement {
    fn zero_like(&self) -> Self {
        self.field().zero()
    }

    fn one_like(&self) -> Self {
        self.field().one()
    }

    fn constant(&self, value: u64) -> Self {
        self.field().constant(value)
    }

    fn is_zero(&self) -> bool {
        ExtElement::is_zero(self)
    }

    fn add(&self, rhs: &Self) -> Result<Self> {
        ExtElement::add(self, rhs)
    }

    fn sub(&self, rhs: &Self) -> Result<Self> {
        ExtElement::sub(self, rhs)
    }

    fn mul(&self, rhs: &Self) -> Result<Self> {
        ExtElement::mul(self, rhs)
    }

    fn div(&self, rhs: &Self) -> Result<Self> {
        ExtElement::div(self, rhs)
    }

    fn neg(&self) -> Self {
        ExtElement::neg(self)
    }

    fn invert(&self) -> Result<Self> {
        ExtElement::invert(self)
    }

    fn pow(&self, exp: &BigInt) -> Result<Self> {
        ExtElement::pow(self, exp)
    }
}
