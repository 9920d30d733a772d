use ark_ff::{Field, Zero};
use rand::Rng;
use zeroize::Zeroize;

/// Sample a uniformly random field element by rejection sampling over random byte strings.
pub fn rand_scalar<R, S>(rng: &mut R) -> S
where
    R: Rng,
    S: Field,
{
    // Wider than any supported modulus, `from_random_bytes` only reads what it needs.
    let mut bytes = [0u8; 128];
    sample_into(rng, &mut bytes)
}

/// Rejection sampling over `bytes`, which is wiped before returning.
fn sample_into<R, S>(rng: &mut R, bytes: &mut [u8]) -> S
where
    R: Rng,
    S: Field,
{
    loop {
        rng.fill(&mut bytes[..]);
        if let Some(out) = S::from_random_bytes(bytes) {
            bytes.zeroize();
            return out;
        }
    }
}

/// Sample a nonzero field element.
pub fn rand_nonzero_scalar<R, S>(rng: &mut R) -> S
where
    R: Rng,
    S: Field,
{
    loop {
        let out: S = rand_scalar(rng);
        if !out.is_zero() {
            return out;
        }
    }
}
