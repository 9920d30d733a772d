use crate::errors::Groth16Error;
use crate::field::FieldContext;
use ark_ec::CurveGroup;
use ark_ff::{Field, One, PrimeField, Zero};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid,
    Validate, Write,
};
use rootcause::{Report, report};
use std::collections::HashSet;
use std::iter::{Sum, zip};
use std::ops::{Add, Mul, Neg, Sub};

/// Dense univariate polynomial.
///
/// Coefficients are stored lowest degree first and never carry trailing zeros, so the zero
/// polynomial is the empty sequence and `len()` is always `degree + 1`.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Polynomial<F>
where
    F: Field,
{
    /// x^0, x^1, x^2, ...
    coefficients: Vec<F>,
}

impl<F: Field> Polynomial<F> {
    pub fn new(mut coefficients: Vec<F>) -> Self {
        trim(&mut coefficients);
        Polynomial { coefficients }
    }

    pub fn zero() -> Self {
        Polynomial {
            coefficients: Vec::new(),
        }
    }

    /// The monic linear polynomial `x - root`.
    pub fn linear_root(root: F) -> Self {
        Polynomial {
            coefficients: vec![-root, F::one()],
        }
    }

    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vec<F> {
        self.coefficients
    }

    /// Number of coefficients after trimming.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    pub fn leading_coefficient(&self) -> Option<&F> {
        self.coefficients.last()
    }

    /// Horner's method.
    pub fn evaluate(&self, x: &F) -> F {
        self.coefficients
            .iter()
            .rev()
            .fold(F::zero(), |acc, coefficient| acc * x + coefficient)
    }
}

impl<F: PrimeField> Polynomial<F> {
    /// Evaluate the polynomial "in the exponent": given `srs[i] = [s * tau^i]`, returns
    /// `[s * p(tau)]` without knowing `tau`.
    pub fn evaluate_over_srs<T>(&self, srs: &[T]) -> Result<T, Report<Groth16Error>>
    where
        T: CurveGroup<ScalarField = F>,
    {
        if srs.len() < self.coefficients.len() {
            return Err(report!(Groth16Error::MalformedInput(
                "SRS too small for polynomial".to_string()
            ))
            .attach(format!("SRS length: {}", srs.len()))
            .attach(format!("Polynomial: {:?}", self.coefficients)));
        }

        Ok(zip(srs, &self.coefficients)
            .map(|(power, coefficient)| *power * coefficient)
            .sum())
    }
}

fn trim<F: Field>(coefficients: &mut Vec<F>) {
    match coefficients.iter().rposition(|c| !c.is_zero()) {
        Some(pos) => coefficients.truncate(pos + 1),
        None => coefficients.clear(),
    }
}

fn zip_longest<F: Field>(a: &[F], b: &[F], op: impl Fn(F, F) -> F) -> Polynomial<F> {
    let coefficients = (0..a.len().max(b.len()))
        .map(|i| {
            op(
                a.get(i).copied().unwrap_or_else(F::zero),
                b.get(i).copied().unwrap_or_else(F::zero),
            )
        })
        .collect();
    Polynomial::new(coefficients)
}

impl<F: Field> Add<&Polynomial<F>> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: &Polynomial<F>) -> Self::Output {
        zip_longest(&self.coefficients, &rhs.coefficients, |a, b| a + b)
    }
}

impl<F: Field> Add for Polynomial<F> {
    type Output = Polynomial<F>;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl<F: Field> Sub<&Polynomial<F>> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: &Polynomial<F>) -> Self::Output {
        zip_longest(&self.coefficients, &rhs.coefficients, |a, b| a - b)
    }
}

impl<F: Field> Sub for Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl<F: Field> Mul<&Polynomial<F>> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: &Polynomial<F>) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }

        // Schoolbook convolution; the leading product is nonzero so no trimming is needed.
        let mut out = vec![F::zero(); self.len() + rhs.len() - 1];
        for (i, a_i) in self.coefficients.iter().enumerate() {
            for (j, b_j) in rhs.coefficients.iter().enumerate() {
                out[i + j] += *a_i * b_j;
            }
        }
        Polynomial { coefficients: out }
    }
}

impl<F: Field> Mul for Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: Polynomial<F>) -> Self::Output {
        &self * &rhs
    }
}

impl<F: Field> Mul<F> for &Polynomial<F> {
    type Output = Polynomial<F>;

    fn mul(self, rhs: F) -> Self::Output {
        if rhs.is_zero() {
            return Polynomial::zero();
        }
        Polynomial {
            coefficients: self.coefficients.iter().map(|x| *x * rhs).collect(),
        }
    }
}

impl<F: Field> Neg for Polynomial<F> {
    type Output = Polynomial<F>;

    fn neg(self) -> Self::Output {
        Polynomial {
            coefficients: self.coefficients.into_iter().map(|x| -x).collect(),
        }
    }
}

impl<F: Field> Sum for Polynomial<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(std::ops::Add::add)
            .unwrap_or_else(Polynomial::zero)
    }
}

impl<F: Field> From<Vec<u64>> for Polynomial<F> {
    fn from(coefficients: Vec<u64>) -> Self {
        Polynomial::new(coefficients.into_iter().map(F::from).collect())
    }
}

impl<F: Field> CanonicalSerialize for Polynomial<F> {
    fn serialize_with_mode<W: Write>(
        &self,
        writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        self.coefficients.serialize_with_mode(writer, compress)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        self.coefficients.serialized_size(compress)
    }
}

impl<F: Field> Valid for Polynomial<F> {
    fn check(&self) -> Result<(), SerializationError> {
        if self.coefficients.last().is_some_and(|c| c.is_zero()) {
            return Err(SerializationError::InvalidData);
        }
        self.coefficients.check()
    }
}

impl<F: Field> CanonicalDeserialize for Polynomial<F> {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let coefficients = Vec::<F>::deserialize_with_mode(reader, compress, validate)?;
        Ok(Polynomial::new(coefficients))
    }
}

/// Polynomial arithmetic over the field described by a [`FieldContext`].
///
/// Infallible operations forward to the operator overloads on [`Polynomial`]; the ring adds
/// the operations that can fail (division, interpolation) and the evaluation-domain helpers
/// used by the QAP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolynomialRing<F: PrimeField> {
    field: FieldContext<F>,
}

impl<F: PrimeField> PolynomialRing<F> {
    pub fn new(field: FieldContext<F>) -> Self {
        PolynomialRing { field }
    }

    pub fn field(&self) -> &FieldContext<F> {
        &self.field
    }

    pub fn add(&self, a: &Polynomial<F>, b: &Polynomial<F>) -> Polynomial<F> {
        a + b
    }

    pub fn sub(&self, a: &Polynomial<F>, b: &Polynomial<F>) -> Polynomial<F> {
        a - b
    }

    pub fn mul(&self, a: &Polynomial<F>, b: &Polynomial<F>) -> Polynomial<F> {
        a * b
    }

    pub fn scale(&self, a: &Polynomial<F>, scalar: F) -> Polynomial<F> {
        a * scalar
    }

    pub fn evaluate(&self, p: &Polynomial<F>, x: &F) -> F {
        p.evaluate(x)
    }

    /// Long division, returning `(quotient, remainder)` with `deg(remainder) < deg(divisor)`.
    pub fn divide(
        &self,
        dividend: &Polynomial<F>,
        divisor: &Polynomial<F>,
    ) -> Result<(Polynomial<F>, Polynomial<F>), Report<Groth16Error>> {
        let leading = divisor.leading_coefficient().ok_or_else(|| {
            report!(Groth16Error::DivisionByZero).attach("Divisor is the zero polynomial")
        })?;
        let leading_inverse = self.field.inverse(leading)?;

        if dividend.len() < divisor.len() {
            return Ok((Polynomial::zero(), dividend.clone()));
        }

        let mut remainder = dividend.coefficients.clone();
        let mut quotient = vec![F::zero(); dividend.len() - divisor.len() + 1];
        for i in (0..quotient.len()).rev() {
            let coefficient = remainder[i + divisor.len() - 1] * leading_inverse;
            quotient[i] = coefficient;
            for (j, d_j) in divisor.coefficients.iter().enumerate() {
                remainder[i + j] -= coefficient * d_j;
            }
        }
        remainder.truncate(divisor.len() - 1);

        Ok((Polynomial::new(quotient), Polynomial::new(remainder)))
    }

    /// `(x - p_0)(x - p_1)...(x - p_{n-1})`.
    pub fn vanishing_polynomial(&self, points: &[F]) -> Polynomial<F> {
        points
            .iter()
            .map(|point| Polynomial::linear_root(*point))
            .fold(Polynomial::new(vec![F::one()]), |acc, factor| &acc * &factor)
    }

    /// The evaluation domain `1, 2, ..., m` used for a QAP with `m` constraints.
    pub fn evaluation_points(&self, m: usize) -> Vec<F> {
        (1..=m as u64).map(F::from).collect()
    }

    /// Lagrange basis `L_k` over `points`, with `L_k(points[j]) = [k == j]`.
    pub fn lagrange_basis(&self, points: &[F]) -> Result<Vec<Polynomial<F>>, Report<Groth16Error>> {
        let distinct: HashSet<&F> = points.iter().collect();
        if distinct.len() != points.len() {
            return Err(report!(Groth16Error::InvalidInterpolationPoints)
                .attach(format!("Points: {:?}", points)));
        }

        let vanishing = self.vanishing_polynomial(points);
        points
            .iter()
            .map(|point| -> Result<Polynomial<F>, Report<Groth16Error>> {
                let (numerator, _) = self.divide(&vanishing, &Polynomial::linear_root(*point))?;
                let denominator = numerator.evaluate(point);
                Ok(&numerator * self.field.inverse(&denominator)?)
            })
            .collect()
    }

    /// Unique polynomial of degree `< points.len()` through `(points[k], values[k])`.
    pub fn interpolate(
        &self,
        points: &[F],
        values: &[F],
    ) -> Result<Polynomial<F>, Report<Groth16Error>> {
        if points.len() != values.len() {
            return Err(report!(Groth16Error::InvalidInterpolationPoints)
                .attach(format!("{} points for {} values", points.len(), values.len())));
        }

        Ok(zip(self.lagrange_basis(points)?, values)
            .map(|(basis, value)| &basis * *value)
            .sum())
    }
}
