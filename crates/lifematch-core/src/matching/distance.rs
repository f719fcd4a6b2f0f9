//! Geographic distance penalty sources for patient-first scoring.
//!
//! Donor and patient records carry no coordinates, so the penalty is
//! simulated. The source is injected so that runs can be made reproducible.

use rand::Rng;

use crate::models::{Donor, Patient};

/// Produces a distance penalty in `[0, max_exclusive)` for a pair.
pub trait DistancePenalty {
    fn penalty(&mut self, donor: &Donor, patient: &Patient, max_exclusive: u32) -> u32;
}

/// Uniformly random penalty drawn from the wrapped RNG.
#[derive(Debug, Clone)]
pub struct RandomDistancePenalty<R> {
    rng: R,
}

impl<R: Rng> RandomDistancePenalty<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> DistancePenalty for RandomDistancePenalty<R> {
    fn penalty(&mut self, _donor: &Donor, _patient: &Patient, max_exclusive: u32) -> u32 {
        if max_exclusive == 0 {
            return 0;
        }
        self.rng.gen_range(0..max_exclusive)
    }
}

/// Same penalty for every pair, capped below the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDistancePenalty(pub u32);

impl DistancePenalty for FixedDistancePenalty {
    fn penalty(&mut self, _donor: &Donor, _patient: &Patient, max_exclusive: u32) -> u32 {
        self.0.min(max_exclusive.saturating_sub(1))
    }
}

/// No distance penalty at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDistancePenalty;

impl DistancePenalty for NoDistancePenalty {
    fn penalty(&mut self, _donor: &Donor, _patient: &Patient, _max_exclusive: u32) -> u32 {
        0
    }
}

impl<T: DistancePenalty + ?Sized> DistancePenalty for &mut T {
    fn penalty(&mut self, donor: &Donor, patient: &Patient, max_exclusive: u32) -> u32 {
        (**self).penalty(donor, patient, max_exclusive)
    }
}
