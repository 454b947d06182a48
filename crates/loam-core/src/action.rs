//! The discrete action space and legality masks.
//!
//! The action set is dynamically sized: four moves, harvest, and wait,
//! plus one plant action per flower type in the session's catalog. It is
//! built once at session initialization and immutable afterwards, so
//! action indices are stable for the whole episode.

use crate::id::FlowerTypeId;
use crate::pos::Direction;

/// One discrete action an agent can take in a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move one cell in a cardinal direction.
    Move(Direction),
    /// Harvest the fully grown flower on the current cell.
    Harvest,
    /// Do nothing this step.
    Wait,
    /// Plant a flower of the given type on the current cell.
    Plant(FlowerTypeId),
}

/// The full ordered action space for one session.
///
/// Index layout: `Up, Down, Left, Right, Harvest, Wait,
/// Plant(0), …, Plant(n-1)` for a catalog of `n` flower types.
///
/// # Examples
///
/// ```
/// use loam_core::{Action, ActionSet, FlowerTypeId};
///
/// let set = ActionSet::new(3);
/// assert_eq!(set.len(), 9);
/// assert_eq!(set.get(4), Some(Action::Harvest));
/// assert_eq!(set.index_of(Action::Plant(FlowerTypeId(2))), Some(8));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSet {
    actions: Vec<Action>,
}

/// Number of fixed (non-plant) actions preceding the plant block.
const FIXED_ACTIONS: usize = 6;

impl ActionSet {
    /// Build the action set for a catalog of `num_flower_types` types.
    pub fn new(num_flower_types: usize) -> Self {
        let mut actions = Vec::with_capacity(FIXED_ACTIONS + num_flower_types);
        actions.extend(Direction::ALL.map(Action::Move));
        actions.push(Action::Harvest);
        actions.push(Action::Wait);
        actions.extend((0..num_flower_types as u32).map(|t| Action::Plant(FlowerTypeId(t))));
        Self { actions }
    }

    /// Total number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always `false`: the fixed actions are always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of flower types this set was built for.
    pub fn num_flower_types(&self) -> usize {
        self.actions.len() - FIXED_ACTIONS
    }

    /// Action at a discrete index, if the index is in range.
    pub fn get(&self, index: usize) -> Option<Action> {
        self.actions.get(index).copied()
    }

    /// Discrete index of an action, if it belongs to this set.
    pub fn index_of(&self, action: Action) -> Option<usize> {
        match action {
            Action::Move(d) => Some(d as usize),
            Action::Harvest => Some(4),
            Action::Wait => Some(5),
            Action::Plant(t) => {
                let idx = FIXED_ACTIONS + t.0 as usize;
                (idx < self.actions.len()).then_some(idx)
            }
        }
    }

    /// Iterate over all actions in index order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + Clone + '_ {
        self.actions.iter().copied()
    }
}

/// Boolean legality vector over an [`ActionSet`].
///
/// `mask.as_slice()[i]` tells whether the action at index `i` is legal
/// for the agent and state the mask was computed from. Masks are
/// recomputed on demand; any change to the agent's position, cell
/// contents, or seed counts can invalidate a previously computed mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionMask {
    legal: Vec<bool>,
}

impl ActionMask {
    /// Wrap a legality vector (one entry per action-set index).
    pub fn new(legal: Vec<bool>) -> Self {
        Self { legal }
    }

    /// Number of entries (equals the action-set length).
    pub fn len(&self) -> usize {
        self.legal.len()
    }

    /// Whether the mask has no entries.
    pub fn is_empty(&self) -> bool {
        self.legal.is_empty()
    }

    /// Whether the action at `index` is legal. Out-of-range indices are
    /// illegal.
    pub fn is_legal(&self, index: usize) -> bool {
        self.legal.get(index).copied().unwrap_or(false)
    }

    /// Whether `action` is legal under this mask, resolved through `set`.
    pub fn allows(&self, set: &ActionSet, action: Action) -> bool {
        set.index_of(action)
            .map(|i| self.is_legal(i))
            .unwrap_or(false)
    }

    /// The raw legality vector.
    pub fn as_slice(&self) -> &[bool] {
        &self.legal
    }
}
