//! Prime-field, elliptic-curve and bilinear-pairing arithmetic over
//! runtime-chosen parameters.
//!
//! Layers, leaves first: [`Field`]/[`FieldElement`] (residues modulo an odd
//! prime fixed at construction), [`ExtField`]/[`ExtElement`] (polynomial
//! extension towers of arbitrary degree), [`Curve`]/[`Point`] (the short
//! Weierstrass group law, generic over both), and [`TatePairing`] (Miller
//! loop plus final exponentiation into [`Gt`]). Data flows strictly upward;
//! everything is an immutable value and safe to share across threads once
//! constructed.
//!
//! Every fallible operation returns [`Result`]; misuse such as mixing
//! elements of different fields or pairing out-of-subgroup points surfaces
//! as a distinguishable [`Error`], never as a silently normalized value.

mod arithmetic;
mod curve;
mod error;
mod extension;
mod field;
mod pairing;

pub use arithmetic::FieldArith;
pub use curve::{Curve, Point};
pub use error::{Error, Result};
pub use extension::{ExtElement, ExtField};
pub use field::{Field, FieldElement};
pub use pairing::{Gt, TatePairing};
