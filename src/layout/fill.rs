//! Fill constraint: share leftover space between sibling controls
//!
//! The sizes are found by relaxation rather than solved directly. Each round
//! the fill guesses a total, hands every control but the first its share of
//! it, and lets the surrounding align/static chain back-compute the first
//! control's size. If that size disagrees with the others, the observed total
//! becomes the next guess and the container runs another round.

use super::config::LayoutConfig;
use super::coord::Axis;
use super::error::LayoutError;
use super::tree::{ControlArena, ControlId};

#[derive(Debug, Clone)]
pub struct FillConstraint {
    controls: Vec<ControlId>,
    axis: Axis,
    ratios: Vec<f64>,
    /// Current guess for the summed size of all controls
    total: Option<i32>,
    /// Container size the guess was made for
    last_parent_size: Option<i32>,
    /// Shares written in the current round
    shares: Vec<i32>,
}

impl FillConstraint {
    pub(crate) fn new(controls: Vec<ControlId>, axis: Axis, ratios: Vec<f64>) -> Self {
        Self {
            controls,
            axis,
            ratios,
            total: None,
            last_parent_size: None,
            shares: Vec::new(),
        }
    }

    pub fn controls(&self) -> &[ControlId] {
        &self.controls
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// The current total guess, if the fill has run
    pub fn total(&self) -> Option<i32> {
        self.total
    }

    /// Split `total` by ratio, rounding down, then hand out the remainder one
    /// unit at a time starting from the second control.
    fn split(&self, total: i32) -> Vec<i32> {
        let sum: f64 = self.ratios.iter().sum();
        let mut shares: Vec<i32> = self
            .ratios
            .iter()
            .map(|ratio| (f64::from(total) * ratio / sum).floor() as i32)
            .collect();
        let count = shares.len();
        let mut remainder = total - shares.iter().sum::<i32>();
        let mut index = 1;
        while remainder > 0 {
            shares[index % count] += 1;
            remainder -= 1;
            index += 1;
        }
        shares
    }

    pub(crate) fn apply(
        &mut self,
        owner: ControlId,
        arena: &mut ControlArena,
        config: &LayoutConfig,
        description: &str,
    ) -> Result<bool, LayoutError> {
        let coord = self.axis.size();
        let parent = arena.coord(owner, coord);
        let count = self.controls.len() as i32;

        let out_of_range = || LayoutError::out_of_range(arena.label(owner), coord);
        let mut total = match self.total {
            Some(total) => total,
            None => config.fill_seed.checked_mul(count).ok_or_else(out_of_range)?,
        };
        if let (Some(now), Some(before)) = (parent, self.last_parent_size) {
            if now != before && before != 0 {
                let scaled = i64::from(total) * i64::from(now) / i64::from(before);
                total = i32::try_from(scaled).map_err(|_| out_of_range())?;
            }
        }
        self.total = Some(total);

        let shares = self.split(total);
        // The first control is left for the surrounding constraints to size.
        for (control, share) in self.controls.iter().zip(&shares).skip(1) {
            if arena.coord(*control, coord).is_some() {
                return Err(LayoutError::FillConflict {
                    control: arena.label(*control),
                    coord,
                    constraint: description.to_string(),
                });
            }
            arena.write(*control, coord, *share)?;
        }
        tracing::trace!(constraint = description, total, ?shares, "fill guess");
        self.shares = shares;
        Ok(true)
    }

    pub(crate) fn done(
        &mut self,
        round: usize,
        owner: ControlId,
        arena: &ControlArena,
        description: &str,
    ) -> Result<bool, LayoutError> {
        if self.shares.is_empty() {
            return Ok(true);
        }
        let coord = self.axis.size();
        let first = arena
            .coord(self.controls[0], coord)
            .ok_or_else(|| LayoutError::FillUnresolved {
                control: arena.label(self.controls[0]),
                coord,
                constraint: description.to_string(),
            })?;

        let first_ratio = self.ratios[0];
        let error: f64 = self
            .shares
            .iter()
            .zip(&self.ratios)
            .skip(1)
            .map(|(share, ratio)| (f64::from(first) * ratio / first_ratio - f64::from(*share)).abs())
            .sum();

        self.last_parent_size = arena.coord(owner, coord);
        if error <= self.controls.len() as f64 {
            return Ok(true);
        }

        let observed = i64::from(first)
            + self
                .shares
                .iter()
                .skip(1)
                .map(|share| i64::from(*share))
                .sum::<i64>();
        let guess = self.total.map_or(observed, i64::from);
        // Averaging with the previous guess damps oscillation between nested fills.
        let next = if round == 0 {
            observed
        } else {
            (observed + guess) / 2
        };
        let next = i32::try_from(next)
            .map_err(|_| LayoutError::out_of_range(arena.label(owner), coord))?;
        tracing::trace!(constraint = description, round, observed, next, "fill not converged");
        self.total = Some(next);
        Ok(false)
    }
}
