use crate::errors::Groth16Error;
use crate::field::FieldContext;
use crate::polynomial::{Polynomial, PolynomialRing};
use ark_ff::{PrimeField, Zero};
use ark_std::cfg_iter;
use itertools::izip;
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rootcause::prelude::ResultExt;
use rootcause::{Report, report};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::zip;

/// One R1CS row: signal index to nonzero coefficient.
pub type SparseRow<F> = BTreeMap<usize, F>;

/// Signal layout of a compiled circuit.
///
/// Signals are ordered `[one, public inputs.., private inputs.., intermediates..]`. The
/// constant one together with the public inputs form the instance known to the verifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    signals: Vec<String>,
    public_inputs: usize,
    private_inputs: usize,
}

impl Circuit {
    pub fn new(
        signals: Vec<String>,
        public_inputs: usize,
        private_inputs: usize,
    ) -> Result<Self, Report<Groth16Error>> {
        let declared = public_inputs
            .checked_add(private_inputs)
            .and_then(|inputs| inputs.checked_add(1));
        if declared.is_none_or(|declared| signals.len() < declared) {
            return Err(report!(Groth16Error::MalformedInput(
                "circuit declares more inputs than signals".to_string()
            ))
            .attach(format!("Signals: {:?}", signals))
            .attach(format!(
                "Public inputs: {}, private inputs: {}",
                public_inputs, private_inputs
            )));
        }
        Ok(Circuit {
            signals,
            public_inputs,
            private_inputs,
        })
    }

    pub fn signals(&self) -> &[String] {
        &self.signals
    }

    pub fn signal_index(&self, name: &str) -> Option<usize> {
        self.signals.iter().position(|signal| signal == name)
    }

    pub fn num_signals(&self) -> usize {
        self.signals.len()
    }

    pub fn num_public_inputs(&self) -> usize {
        self.public_inputs
    }

    pub fn num_private_inputs(&self) -> usize {
        self.private_inputs
    }

    /// The constant one plus the public inputs.
    pub fn num_instance_signals(&self) -> usize {
        1 + self.public_inputs
    }

    pub fn is_public(&self, index: usize) -> bool {
        index < self.num_instance_signals()
    }

    /// The public input values of a full witness, without the leading constant one.
    pub fn public_inputs<'a, F>(&self, witness: &'a [F]) -> Result<&'a [F], Report<Groth16Error>> {
        if witness.len() != self.num_signals() {
            return Err(report!(Groth16Error::MalformedInput(format!(
                "witness has {} values for {} signals",
                witness.len(),
                self.num_signals()
            ))));
        }
        Ok(&witness[1..self.num_instance_signals()])
    }
}

/// Which of the three R1CS matrices a row or column belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matrix {
    A,
    B,
    C,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CS<F: PrimeField> {
    num_signals: usize,
    a: Vec<SparseRow<F>>,
    b: Vec<SparseRow<F>>,
    c: Vec<SparseRow<F>>,
}

impl<F: PrimeField> R1CS<F> {
    pub fn new(
        num_signals: usize,
        a: Vec<SparseRow<F>>,
        b: Vec<SparseRow<F>>,
        c: Vec<SparseRow<F>>,
    ) -> Result<Self, Report<Groth16Error>> {
        if a.len() != b.len() || b.len() != c.len() {
            return Err(report!(Groth16Error::MalformedInput(
                "R1CS matrices have different row counts".to_string()
            ))
            .attach(format!("Rows: {} / {} / {}", a.len(), b.len(), c.len())));
        }
        if a.is_empty() {
            return Err(report!(Groth16Error::MalformedInput(
                "R1CS has no constraints".to_string()
            )));
        }
        if let Some(index) = [&a, &b, &c]
            .into_iter()
            .flatten()
            .flat_map(|row| row.keys())
            .find(|index| **index >= num_signals)
        {
            return Err(report!(Groth16Error::MalformedInput(format!(
                "signal index {} out of range for {} signals",
                index, num_signals
            ))));
        }

        let strip = |rows: Vec<SparseRow<F>>| -> Vec<SparseRow<F>> {
            rows.into_iter()
                .map(|row| row.into_iter().filter(|(_, c)| !c.is_zero()).collect())
                .collect()
        };
        Ok(R1CS {
            num_signals,
            a: strip(a),
            b: strip(b),
            c: strip(c),
        })
    }

    /// Build from dense column-wise matrices, i.e. `l[signal][constraint]`.
    pub fn from_columns(
        l: Vec<Vec<F>>,
        r: Vec<Vec<F>>,
        o: Vec<Vec<F>>,
    ) -> Result<Self, Report<Groth16Error>> {
        let num_signals = l.len();
        if r.len() != num_signals || o.len() != num_signals {
            return Err(report!(Groth16Error::MalformedInput(
                "column matrices have different signal counts".to_string()
            )));
        }
        let num_constraints = l.first().map(Vec::len).unwrap_or(0);
        if izip!(&l, &r, &o).any(|(l_i, r_i, o_i)| {
            l_i.len() != num_constraints || r_i.len() != num_constraints || o_i.len() != num_constraints
        }) {
            return Err(report!(Groth16Error::MalformedInput(
                "columns have different lengths".to_string()
            )));
        }

        let rows = |columns: &[Vec<F>]| -> Vec<SparseRow<F>> {
            (0..num_constraints)
                .map(|k| {
                    columns
                        .iter()
                        .enumerate()
                        .map(|(i, column)| (i, column[k]))
                        .collect()
                })
                .collect()
        };
        R1CS::new(num_signals, rows(&l), rows(&r), rows(&o))
    }

    pub fn num_signals(&self) -> usize {
        self.num_signals
    }

    pub fn num_constraints(&self) -> usize {
        self.a.len()
    }

    pub fn rows(&self, matrix: Matrix) -> &[SparseRow<F>] {
        match matrix {
            Matrix::A => &self.a,
            Matrix::B => &self.b,
            Matrix::C => &self.c,
        }
    }

    /// Dense copy of one column (all rows for one signal).
    pub fn column(&self, matrix: Matrix, signal: usize) -> Vec<F> {
        self.rows(matrix)
            .iter()
            .map(|row| row.get(&signal).copied().unwrap_or_else(F::zero))
            .collect()
    }

    fn check_witness(&self, witness: &[F]) -> Result<(), Report<Groth16Error>> {
        if witness.len() != self.num_signals {
            return Err(report!(Groth16Error::MalformedInput(format!(
                "witness has {} values for {} signals",
                witness.len(),
                self.num_signals
            ))));
        }
        Ok(())
    }

    /// Indices of the rows with `(A_i·w)(B_i·w) != C_i·w`.
    pub fn unsatisfied_rows(&self, witness: &[F]) -> Result<Vec<usize>, Report<Groth16Error>> {
        self.check_witness(witness)?;
        Ok(izip!(&self.a, &self.b, &self.c)
            .enumerate()
            .filter(|(_, (a_i, b_i, c_i))| {
                dot(a_i, witness) * dot(b_i, witness) != dot(c_i, witness)
            })
            .map(|(i, _)| i)
            .collect())
    }

    pub fn is_satisfied(&self, witness: &[F]) -> Result<bool, Report<Groth16Error>> {
        Ok(self.unsatisfied_rows(witness)?.is_empty())
    }
}

fn dot<F: PrimeField>(row: &SparseRow<F>, witness: &[F]) -> F {
    row.iter()
        .map(|(index, coefficient)| witness[*index] * coefficient)
        .sum()
}

/// One constraint as emitted by the circuit compiler, coefficients as decimal strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDescription {
    #[serde(default)]
    pub a: BTreeMap<usize, String>,
    #[serde(default)]
    pub b: BTreeMap<usize, String>,
    #[serde(default)]
    pub c: BTreeMap<usize, String>,
}

/// JSON interchange format for a compiled circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription {
    pub signals: Vec<String>,
    pub public_inputs: usize,
    pub private_inputs: usize,
    pub constraints: Vec<ConstraintDescription>,
}

impl CircuitDescription {
    pub fn from_json(json: &str) -> Result<Self, Report<Groth16Error>> {
        serde_json::from_str(json)
            .map_err(|e| report!(Groth16Error::MalformedInput(e.to_string())))
    }

    pub fn to_json(&self) -> Result<String, Report<Groth16Error>> {
        serde_json::to_string_pretty(self)
            .map_err(|e| report!(Groth16Error::MalformedInput(e.to_string())))
    }

    pub fn into_r1cs<F: PrimeField>(
        self,
        field: &FieldContext<F>,
    ) -> Result<(Circuit, R1CS<F>), Report<Groth16Error>> {
        let parse_row = |row: &BTreeMap<usize, String>| -> Result<SparseRow<F>, Report<Groth16Error>> {
            row.iter()
                .map(|(index, value)| field.parse_decimal(value).map(|v| (*index, v)))
                .collect()
        };

        let mut a = Vec::with_capacity(self.constraints.len());
        let mut b = Vec::with_capacity(self.constraints.len());
        let mut c = Vec::with_capacity(self.constraints.len());
        for (k, constraint) in self.constraints.iter().enumerate() {
            a.push(parse_row(&constraint.a).attach(format!("Constraint {}", k))?);
            b.push(parse_row(&constraint.b).attach(format!("Constraint {}", k))?);
            c.push(parse_row(&constraint.c).attach(format!("Constraint {}", k))?);
        }

        let num_signals = self.signals.len();
        let circuit = Circuit::new(self.signals, self.public_inputs, self.private_inputs)?;
        let r1cs = R1CS::new(num_signals, a, b, c)?;
        Ok((circuit, r1cs))
    }
}

/// Quadratic Arithmetic Program derived from an R1CS.
///
/// Column `i` of each matrix is interpolated over the points `1..=m` into `u_i`, `v_i`, `w_i`.
/// The target polynomial `Z(x)` is computed here once and shared with the trusted setup and
/// the prover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QAP<F>
where
    F: PrimeField,
{
    /// LHS of multiplication
    u: Vec<Polynomial<F>>,
    /// RHS of multiplication
    v: Vec<Polynomial<F>>,
    /// Output
    w: Vec<Polynomial<F>>,
    points: Vec<F>,
    target: Polynomial<F>,
}

impl<F: PrimeField> QAP<F> {
    pub fn from_r1cs(
        ring: &PolynomialRing<F>,
        r1cs: &R1CS<F>,
    ) -> Result<Self, Report<Groth16Error>> {
        let points = ring.evaluation_points(r1cs.num_constraints());
        let basis = ring.lagrange_basis(&points)?;
        let target = ring.vanishing_polynomial(&points);

        debug!(
            "Interpolating {} signals over {} constraints",
            r1cs.num_signals(),
            r1cs.num_constraints()
        );

        Ok(QAP {
            u: interpolate_columns(&basis, r1cs.rows(Matrix::A), r1cs.num_signals()),
            v: interpolate_columns(&basis, r1cs.rows(Matrix::B), r1cs.num_signals()),
            w: interpolate_columns(&basis, r1cs.rows(Matrix::C), r1cs.num_signals()),
            points,
            target,
        })
    }

    pub fn u(&self) -> &[Polynomial<F>] {
        &self.u
    }

    pub fn v(&self) -> &[Polynomial<F>] {
        &self.v
    }

    pub fn w(&self) -> &[Polynomial<F>] {
        &self.w
    }

    pub fn points(&self) -> &[F] {
        &self.points
    }

    /// `Z(x)`, vanishing exactly on the evaluation points.
    pub fn target_polynomial(&self) -> &Polynomial<F> {
        &self.target
    }

    pub fn num_signals(&self) -> usize {
        self.u.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.points.len()
    }

    /// Evaluate every per-signal polynomial at the point of constraint `row`, giving back the
    /// dense R1CS row.
    pub fn row_coefficients(&self, row: usize) -> Option<(Vec<F>, Vec<F>, Vec<F>)> {
        let x = self.points.get(row)?;
        let at = |polys: &[Polynomial<F>]| -> Vec<F> { polys.iter().map(|p| p.evaluate(x)).collect() };
        Some((at(&self.u), at(&self.v), at(&self.w)))
    }

    /// Combine the per-signal polynomials with a witness into `A(x)`, `B(x)`, `C(x)` and the
    /// error polynomial `P(x) = A(x)·B(x) - C(x)`.
    pub fn combine(
        &self,
        ring: &PolynomialRing<F>,
        witness: &[F],
    ) -> Result<CombinedPolynomials<F>, Report<Groth16Error>> {
        if witness.len() != self.num_signals() {
            return Err(report!(Groth16Error::MalformedInput(format!(
                "witness has {} values for {} signals",
                witness.len(),
                self.num_signals()
            ))));
        }

        let weighted = |polys: &[Polynomial<F>]| -> Polynomial<F> {
            zip(polys, witness)
                .map(|(poly, a_i)| ring.scale(poly, *a_i))
                .sum()
        };
        let a = weighted(&self.u);
        let b = weighted(&self.v);
        let c = weighted(&self.w);
        let p = ring.sub(&ring.mul(&a, &b), &c);
        Ok(CombinedPolynomials { a, b, c, p })
    }

    /// `P(x)` is divisible by `Z(x)` iff the witness satisfies every constraint.
    pub fn is_satisfied(
        &self,
        ring: &PolynomialRing<F>,
        witness: &[F],
    ) -> Result<bool, Report<Groth16Error>> {
        let combined = self.combine(ring, witness)?;
        let (_, remainder) = ring.divide(&combined.p, &self.target)?;
        Ok(remainder.is_zero())
    }
}

fn interpolate_columns<F: PrimeField>(
    basis: &[Polynomial<F>],
    rows: &[SparseRow<F>],
    num_signals: usize,
) -> Vec<Polynomial<F>> {
    let mut columns: Vec<Vec<(usize, F)>> = vec![Vec::new(); num_signals];
    for (k, row) in rows.iter().enumerate() {
        for (signal, coefficient) in row {
            columns[*signal].push((k, *coefficient));
        }
    }

    cfg_iter!(columns)
        .map(|column| {
            column
                .iter()
                .map(|(k, coefficient)| &basis[*k] * *coefficient)
                .sum()
        })
        .collect()
}

/// `A(x)`, `B(x)`, `C(x)` and `P(x) = A(x)·B(x) - C(x)` for one witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedPolynomials<F: PrimeField> {
    pub a: Polynomial<F>,
    pub b: Polynomial<F>,
    pub c: Polynomial<F>,
    pub p: Polynomial<F>,
}

impl<F: PrimeField> CombinedPolynomials<F> {
    /// `H(x) = P(x) / Z(x)`.
    pub fn quotient(
        &self,
        ring: &PolynomialRing<F>,
        target: &Polynomial<F>,
    ) -> Result<Polynomial<F>, Report<Groth16Error>> {
        divide_by_target(ring, &self.p, target)
    }
}

/// Exact division of an error polynomial by the target polynomial; a nonzero remainder means
/// the witness does not satisfy the circuit.
pub(crate) fn divide_by_target<F: PrimeField>(
    ring: &PolynomialRing<F>,
    error_polynomial: &Polynomial<F>,
    target: &Polynomial<F>,
) -> Result<Polynomial<F>, Report<Groth16Error>> {
    let (h, remainder) = ring.divide(error_polynomial, target)?;
    if !remainder.is_zero() {
        return Err(report!(Groth16Error::UnsatisfiedWitness)
            .attach(format!("Remainder degree: {:?}", remainder.degree()))
            .attach(format!("Target degree: {:?}", target.degree())));
    }
    Ok(h)
}
