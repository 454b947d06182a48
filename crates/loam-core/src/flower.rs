//! Flowers, flower types, and the per-session flower catalog.

use crate::id::{AgentId, FlowerTypeId};
use smallvec::SmallVec;

/// Static properties of one flower type.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerSpec {
    /// Money credited when a fully grown flower of this type is harvested.
    pub price: f32,
    /// Pollution reduction per growth stage, one entry per stage
    /// starting at stage 0. The list length fixes the type's stage
    /// count: the maximum stage is `len - 1`.
    pub pollution_reduction: SmallVec<[f32; 8]>,
}

impl FlowerSpec {
    /// Build a spec from a price and a per-stage reduction table.
    pub fn new(price: f32, pollution_reduction: impl IntoIterator<Item = f32>) -> Self {
        Self {
            price,
            pollution_reduction: pollution_reduction.into_iter().collect(),
        }
    }

    /// Highest growth stage a flower of this type can reach.
    pub fn max_stage(&self) -> u32 {
        (self.pollution_reduction.len() - 1) as u32
    }

    /// Pollution reduction at the given stage.
    pub fn reduction_at(&self, stage: u32) -> f32 {
        self.pollution_reduction[stage as usize]
    }

    /// Pollution reduction at the final stage.
    pub fn final_reduction(&self) -> f32 {
        *self
            .pollution_reduction
            .last()
            .expect("catalog validation guarantees a non-empty table")
    }

    /// Sum of the reduction table across all stages.
    pub fn total_reduction(&self) -> f32 {
        self.pollution_reduction.iter().sum()
    }
}

/// Immutable, validated list of flower types for one session.
///
/// [`FlowerTypeId(n)`](FlowerTypeId) indexes the n-th spec. The catalog
/// is fixed at session construction; the discrete action set is sized
/// from it.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerCatalog {
    specs: Vec<FlowerSpec>,
}

impl FlowerCatalog {
    /// Validate and build a catalog.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the catalog is empty, any reduction table is
    /// empty, or any price or reduction is non-finite or negative.
    pub fn new(specs: Vec<FlowerSpec>) -> Result<Self, String> {
        if specs.is_empty() {
            return Err("flower catalog must contain at least one type".into());
        }
        for (i, spec) in specs.iter().enumerate() {
            if spec.pollution_reduction.is_empty() {
                return Err(format!("flower type {i}: empty pollution reduction table"));
            }
            if !spec.price.is_finite() || spec.price < 0.0 {
                return Err(format!(
                    "flower type {i}: price must be finite and >= 0, got {}",
                    spec.price
                ));
            }
            if let Some(r) = spec
                .pollution_reduction
                .iter()
                .find(|r| !r.is_finite() || **r < 0.0)
            {
                return Err(format!(
                    "flower type {i}: reductions must be finite and >= 0, got {r}"
                ));
            }
        }
        Ok(Self { specs })
    }

    /// Number of flower types.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Always `false`: construction rejects empty catalogs.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `flower_type` indexes a spec in this catalog.
    pub fn contains(&self, flower_type: FlowerTypeId) -> bool {
        (flower_type.0 as usize) < self.specs.len()
    }

    /// Spec for a flower type, if it exists.
    pub fn get(&self, flower_type: FlowerTypeId) -> Option<&FlowerSpec> {
        self.specs.get(flower_type.0 as usize)
    }

    /// Iterate over `(type, spec)` pairs in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (FlowerTypeId, &FlowerSpec)> {
        self.specs
            .iter()
            .enumerate()
            .map(|(i, s)| (FlowerTypeId(i as u32), s))
    }

    /// All type IDs in ascending order.
    pub fn type_ids(&self) -> impl Iterator<Item = FlowerTypeId> + '_ {
        (0..self.specs.len() as u32).map(FlowerTypeId)
    }

    /// Highest price across the catalog.
    pub fn max_price(&self) -> f32 {
        self.specs.iter().map(|s| s.price).fold(0.0, f32::max)
    }
}

impl Default for FlowerCatalog {
    /// The three-type catalog the original garden ships with: a slow,
    /// valuable type, a mid-range type, and a cheap instant one.
    fn default() -> Self {
        Self::new(vec![
            FlowerSpec::new(10.0, [0.0, 0.0, 0.0, 0.0, 5.0]),
            FlowerSpec::new(5.0, [0.0, 0.0, 1.0, 3.0]),
            FlowerSpec::new(2.0, [1.0]),
        ])
        .expect("default catalog is valid")
    }
}

/// A flower planted on a cell.
///
/// Created at stage 0 by a plant action, advanced one stage per step by
/// the dynamics update, and destroyed on harvest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flower {
    flower_type: FlowerTypeId,
    owner: AgentId,
    stage: u32,
}

impl Flower {
    /// A freshly planted flower at stage 0.
    pub fn new(flower_type: FlowerTypeId, owner: AgentId) -> Self {
        Self {
            flower_type,
            owner,
            stage: 0,
        }
    }

    /// A flower restored at a given stage (layout / file initialization).
    pub fn at_stage(flower_type: FlowerTypeId, owner: AgentId, stage: u32) -> Self {
        Self {
            flower_type,
            owner,
            stage,
        }
    }

    /// Catalog index of this flower's type.
    pub fn flower_type(&self) -> FlowerTypeId {
        self.flower_type
    }

    /// The agent that planted this flower.
    pub fn owner(&self) -> AgentId {
        self.owner
    }

    /// Current growth stage.
    pub fn stage(&self) -> u32 {
        self.stage
    }

    /// Advance one growth stage, saturating at `max_stage`.
    pub fn grow(&mut self, max_stage: u32) {
        if self.stage < max_stage {
            self.stage += 1;
        }
    }

    /// Whether the flower has reached its type's final stage.
    pub fn is_grown(&self, spec: &FlowerSpec) -> bool {
        self.stage == spec.max_stage()
    }
}
