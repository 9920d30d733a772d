//! Fixed-width byte encoding of BN254 proofs.
//!
//! Twelve 32-byte big-endian base field elements, in order:
//!
//! - `A.x, A.y, A.z`
//! - `B.x.c0, B.x.c1, B.y.c0, B.y.c1, B.z.c0, B.z.c1`
//! - `C.x, C.y, C.z`
//!
//! Points are normalised before encoding so that `z = 1`, and the identity is written as
//! `(1, 1, 0)`. Any `z = 0` triple decodes to the identity.

use super::prover::Proof;
use crate::errors::Groth16Error;
use crate::field::FieldContext;
use ark_bn254::{Bn254, Fq, Fq2, G1Projective, G2Projective};
use ark_ec::short_weierstrass::{Projective, SWCurveConfig};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{One, Zero};
use rootcause::{Report, report};

/// Bytes per base field coordinate.
pub const FQ_BYTES: usize = 32;

/// Bytes in an encoded proof.
pub const PROOF_BYTES: usize = 12 * FQ_BYTES;

fn normalized_coordinates<P: SWCurveConfig>(point: &Projective<P>) -> [P::BaseField; 3] {
    let affine = point.into_affine();
    if affine.infinity {
        [
            P::BaseField::one(),
            P::BaseField::one(),
            P::BaseField::zero(),
        ]
    } else {
        [affine.x, affine.y, P::BaseField::one()]
    }
}

fn point_from_coordinates<P: SWCurveConfig>(
    [x, y, z]: [P::BaseField; 3],
) -> Result<Projective<P>, Report<Groth16Error>> {
    let affine = Projective::<P>::new_unchecked(x, y, z).into_affine();
    if !affine.is_on_curve() {
        return Err(report!(Groth16Error::MalformedInput(
            "point is not on the curve".to_string()
        )));
    }
    if !affine.is_in_correct_subgroup_assuming_on_curve() {
        return Err(report!(Groth16Error::MalformedInput(
            "point is not in the prime order subgroup".to_string()
        )));
    }
    Ok(affine.into_group())
}

impl Proof<Bn254> {
    /// Encode as [`PROOF_BYTES`] bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let field = FieldContext::<Fq>::new();
        let mut out = Vec::with_capacity(PROOF_BYTES);
        let mut push = |element: &Fq| out.extend(field.to_be_bytes(element));

        normalized_coordinates(self.a()).iter().for_each(&mut push);
        for coordinate in normalized_coordinates(self.b()) {
            push(&coordinate.c0);
            push(&coordinate.c1);
        }
        normalized_coordinates(self.c()).iter().for_each(&mut push);
        out
    }

    /// Decode a proof, rejecting wrong lengths, unreduced coordinates and points outside the
    /// prime order subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Report<Groth16Error>> {
        if bytes.len() != PROOF_BYTES {
            return Err(report!(Groth16Error::MalformedInput(format!(
                "expected {} bytes, got {}",
                PROOF_BYTES,
                bytes.len()
            ))));
        }

        let field = FieldContext::<Fq>::new();
        let e = bytes
            .chunks(FQ_BYTES)
            .map(|chunk| field.from_canonical_be_bytes(chunk))
            .collect::<Result<Vec<Fq>, _>>()?;

        let a: G1Projective = point_from_coordinates([e[0], e[1], e[2]])?;
        let b: G2Projective = point_from_coordinates([
            Fq2::new(e[3], e[4]),
            Fq2::new(e[5], e[6]),
            Fq2::new(e[7], e[8]),
        ])?;
        let c: G1Projective = point_from_coordinates([e[9], e[10], e[11]])?;
        Ok(Proof::new(a, b, c))
    }
}
