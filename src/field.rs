use crate::errors::Groth16Error;
use ark_ff::{BigInteger, PrimeField, Zero};
use rootcause::{Report, report};
use std::marker::PhantomData;

/// Arithmetic context for the prime field `F`.
///
/// The modulus is fixed by the type parameter, so every value handed out is already the
/// canonical representative in `[0, p)`. The context is passed explicitly to the components
/// that need it instead of being reached through global state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldContext<F: PrimeField> {
    _field: PhantomData<F>,
}

impl<F: PrimeField> FieldContext<F> {
    pub fn new() -> Self {
        FieldContext {
            _field: PhantomData,
        }
    }

    pub fn modulus(&self) -> F::BigInt {
        F::MODULUS
    }

    pub fn modulus_bits(&self) -> u32 {
        F::MODULUS_BIT_SIZE
    }

    /// Number of bytes in the fixed-width big-endian encoding of an element.
    pub fn element_byte_width(&self) -> usize {
        F::MODULUS_BIT_SIZE.div_ceil(8) as usize
    }

    /// Reduce a signed integer into the field.
    pub fn element(&self, value: i128) -> F {
        let magnitude = F::from(value.unsigned_abs());
        if value < 0 { -magnitude } else { magnitude }
    }

    pub fn from_be_bytes_mod_order(&self, bytes: &[u8]) -> F {
        F::from_be_bytes_mod_order(bytes)
    }

    pub fn to_be_bytes(&self, value: &F) -> Vec<u8> {
        let bytes = value.into_bigint().to_bytes_be();
        bytes[bytes.len() - self.element_byte_width()..].to_vec()
    }

    /// Decode a fixed-width big-endian element, rejecting values `>= p`.
    pub fn from_canonical_be_bytes(&self, bytes: &[u8]) -> Result<F, Report<Groth16Error>> {
        if bytes.len() != self.element_byte_width() {
            return Err(report!(Groth16Error::MalformedInput(format!(
                "expected {} bytes per field element, got {}",
                self.element_byte_width(),
                bytes.len()
            ))));
        }

        let value = F::from_be_bytes_mod_order(bytes);
        if self.to_be_bytes(&value) != bytes {
            return Err(
                report!(Groth16Error::MalformedInput(
                    "field element is not reduced".to_string()
                ))
                .attach(format!("Bytes: {:?}", bytes)),
            );
        }
        Ok(value)
    }

    /// Parse a decimal integer, optionally negative, reducing it modulo the prime.
    pub fn parse_decimal(&self, text: &str) -> Result<F, Report<Groth16Error>> {
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(report!(Groth16Error::MalformedInput(format!(
                "`{}` is not a decimal integer",
                text
            ))));
        }

        let ten = F::from(10u64);
        let value = digits
            .bytes()
            .fold(F::zero(), |acc, digit| acc * ten + F::from(u64::from(digit - b'0')));
        Ok(if negative { -value } else { value })
    }

    pub fn add(&self, lhs: &F, rhs: &F) -> F {
        *lhs + rhs
    }

    pub fn sub(&self, lhs: &F, rhs: &F) -> F {
        *lhs - rhs
    }

    pub fn mul(&self, lhs: &F, rhs: &F) -> F {
        *lhs * rhs
    }

    pub fn neg(&self, value: &F) -> F {
        -*value
    }

    pub fn pow(&self, base: &F, exponent: u64) -> F {
        base.pow([exponent])
    }

    pub fn inverse(&self, value: &F) -> Result<F, Report<Groth16Error>> {
        value
            .inverse()
            .ok_or_else(|| report!(Groth16Error::DivisionByZero))
    }

    pub fn div(&self, lhs: &F, rhs: &F) -> Result<F, Report<Groth16Error>> {
        Ok(*lhs * self.inverse(rhs)?)
    }
}
