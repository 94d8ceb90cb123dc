//! Fault injection for simulating a Byzantine server

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use pir_core::{AnswerVector, QueryMatrix};
use rand::Rng;

use crate::{responder::Responder, server_set::AnswerServer, Result, ServerError};

/// Largest multiple of `beta` used by `FaultPlan::random`
const MAX_RANDOM_MULTIPLE: i64 = 9;

/// Signed offsets added to chosen rows of an honest answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    faults: Vec<(usize, BigInt)>,
}

impl FaultPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `offset` to `row`. Offsets on the same row accumulate.
    pub fn with_fault(mut self, row: usize, offset: impl Into<BigInt>) -> Result<Self> {
        let offset = offset.into();
        if offset.is_zero() {
            return Err(ServerError::ZeroOffset(row));
        }
        self.faults.push((row, offset));
        Ok(self)
    }

    /// Shift every row in `rows` by `multiple * beta`
    pub fn shift_by_beta(rows: &[usize], beta: &BigUint, multiple: i64) -> Result<Self> {
        let offset = BigInt::from(beta.clone()) * multiple;
        rows.iter()
            .try_fold(Self::new(), |plan, &row| plan.with_fault(row, offset.clone()))
    }

    /// Pick `count` distinct rows out of `rows` and shift each by a random
    /// nonzero multiple of `beta` in `[-9, 9]`
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        count: usize,
        beta: &BigUint,
        rng: &mut R,
    ) -> Result<Self> {
        if count > rows {
            return Err(ServerError::TooManyFaults { count, rows });
        }

        let beta = BigInt::from(beta.clone());
        let mut plan = Self::new();
        for row in rand::seq::index::sample(rng, rows, count).into_iter() {
            let magnitude = rng.gen_range(1..=MAX_RANDOM_MULTIPLE);
            let multiple = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
            plan = plan.with_fault(row, &beta * multiple)?;
        }

        let mut rows: Vec<usize> = plan.rows().collect();
        rows.sort_unstable();
        tracing::debug!(?rows, "Generated random fault plan");
        Ok(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// Rows touched by this plan, in insertion order
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.faults.iter().map(|(row, _)| *row)
    }

    /// Return a perturbed copy of `answer`
    pub fn apply(&self, answer: &AnswerVector) -> Result<AnswerVector> {
        let mut values = answer.as_slice().to_vec();
        for (row, offset) in &self.faults {
            let len = values.len();
            let value = values
                .get_mut(*row)
                .ok_or(ServerError::FaultRowOutOfRange { row: *row, len })?;
            *value += offset;
        }
        Ok(AnswerVector::new(values))
    }
}

/// An honest responder whose answers are tampered with before leaving
#[derive(Debug, Clone)]
pub struct FaultyResponder {
    inner: Responder,
    plan: FaultPlan,
}

impl FaultyResponder {
    pub fn new(inner: Responder, plan: FaultPlan) -> Self {
        Self { inner, plan }
    }

    pub fn plan(&self) -> &FaultPlan {
        &self.plan
    }
}

impl AnswerServer for FaultyResponder {
    fn respond(&self, queries: &QueryMatrix) -> Result<AnswerVector> {
        let honest = self.inner.respond(queries)?;
        let tampered = self.plan.apply(&honest)?;
        if !self.plan.is_empty() {
            tracing::debug!(rows = ?self.plan.rows().collect::<Vec<_>>(), "Tampered answer");
        }
        Ok(tampered)
    }
}
