//! Room definitions and the per-pass catalogs they are grouped into
//!
//! Subordinate links between definitions are resolved to [`DefinitionId`]s
//! when a catalog is built, so nothing downstream depends on list positions
//! lining up between separately filtered collections.

use std::collections::HashMap;

use crate::algorithm::ruleset::NeighbourRuleset;
use crate::io::error::{Result, invalid_configuration};
use crate::io::configuration::DEFAULT_GRID_SIZE;
use crate::spatial::room::{RoomType, UNLIMITED_CONNECTIONS};
use crate::spatial::shape::Shape;

/// Index of a definition within its pass catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefinitionId(pub usize);

/// Configured room kind: footprint, sampling weight and count limits
#[derive(Debug, Clone, PartialEq)]
pub struct RoomDefinition {
    /// Stable identifier used by subordinate links
    pub id: String,
    /// Footprint of every instance
    pub shape: Shape,
    /// Relative sampling weight (non-negative)
    pub weight: f64,
    /// Instances always queued
    pub min_count: usize,
    /// Upper bound on instances; `None` is unbounded
    pub max_count: Option<usize>,
    /// Connection cap copied onto each placed room
    pub connection_cap: usize,
    /// Ruleset replacing the pass default for this definition
    pub ruleset_override: Option<NeighbourRuleset>,
    /// Definitions whose counts are credited whenever this one is chosen
    pub subordinates: Vec<DefinitionId>,
    /// Type given to placed instances
    pub room_type: RoomType,
}

impl RoomDefinition {
    /// A normal, unbounded, weight-1 definition
    pub fn new(id: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            shape,
            weight: 1.0,
            min_count: 0,
            max_count: None,
            connection_cap: UNLIMITED_CONNECTIONS,
            ruleset_override: None,
            subordinates: Vec::new(),
            room_type: RoomType::Normal,
        }
    }

    /// Set the sampling weight
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the count limits; a `max` of zero or less is unbounded
    #[must_use]
    pub fn with_counts(mut self, min: usize, max: i64) -> Self {
        self.min_count = min;
        self.max_count = usize::try_from(max).ok().filter(|&m| m > 0);
        self
    }

    /// Set the connection cap
    #[must_use]
    pub const fn with_connection_cap(mut self, cap: usize) -> Self {
        self.connection_cap = cap;
        self
    }

    /// Override the pass ruleset for this definition
    #[must_use]
    pub fn with_ruleset(mut self, ruleset: NeighbourRuleset) -> Self {
        self.ruleset_override = Some(ruleset);
        self
    }

    /// Set the placed room type
    #[must_use]
    pub const fn with_room_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    /// Effective maximum, `usize::MAX` when unbounded
    pub fn effective_max(&self) -> usize {
        self.max_count.unwrap_or(usize::MAX)
    }
}

/// Everything one pass needs: size bounds, default rules and definitions
#[derive(Debug, Clone, PartialEq)]
pub struct PassCatalog {
    /// Inclusive lower bound of the total cell target
    pub min_size: usize,
    /// Exclusive upper bound of the total cell target
    pub max_size: usize,
    /// Ruleset for definitions without an override
    pub default_ruleset: NeighbourRuleset,
    definitions: Vec<RoomDefinition>,
}

impl PassCatalog {
    /// Build a catalog, clamping `min_size` to at most `max_size`
    pub fn new(min_size: usize, max_size: usize, default_ruleset: NeighbourRuleset) -> Self {
        Self {
            min_size: min_size.min(max_size),
            max_size,
            default_ruleset,
            definitions: Vec::new(),
        }
    }

    /// Append a definition, returning its id
    pub fn add(&mut self, definition: RoomDefinition) -> DefinitionId {
        self.definitions.push(definition);
        DefinitionId(self.definitions.len() - 1)
    }

    /// Append a definition, builder style
    #[must_use]
    pub fn with_definition(mut self, definition: RoomDefinition) -> Self {
        self.add(definition);
        self
    }

    /// Link `primary` so choosing it also credits the definitions named in
    /// `subordinates`
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenerationError::InvalidConfiguration`] if any id is
    /// unknown.
    pub fn link_subordinates(&mut self, primary: &str, subordinates: &[&str]) -> Result<()> {
        let lookup = self.id_lookup();
        let resolved = subordinates
            .iter()
            .map(|id| {
                lookup.get(*id).copied().ok_or_else(|| {
                    invalid_configuration(&format!("unknown subordinate room '{id}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let primary_id = lookup
            .get(primary)
            .copied()
            .ok_or_else(|| invalid_configuration(&format!("unknown room '{primary}'")))?;

        if let Some(definition) = self.definitions.get_mut(primary_id.0) {
            definition.subordinates = resolved;
        }
        Ok(())
    }

    fn id_lookup(&self) -> HashMap<String, DefinitionId> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (definition.id.clone(), DefinitionId(index)))
            .collect()
    }

    /// All definitions in configuration order
    pub fn definitions(&self) -> &[RoomDefinition] {
        &self.definitions
    }

    /// Look up a definition
    pub fn definition(&self, id: DefinitionId) -> Option<&RoomDefinition> {
        self.definitions.get(id.0)
    }

    /// Definitions whose shape is contiguous, the only ones ever queued
    pub fn eligible(&self) -> impl Iterator<Item = (DefinitionId, &RoomDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .filter(|(_, definition)| definition.shape.is_contiguous())
            .map(|(index, definition)| (DefinitionId(index), definition))
    }

    /// Ruleset governing a definition: its override, else the pass default
    pub fn ruleset_for<'d>(&'d self, definition: &'d RoomDefinition) -> &'d NeighbourRuleset {
        definition
            .ruleset_override
            .as_ref()
            .unwrap_or(&self.default_ruleset)
    }
}

/// A starting shape plus the ordered passes grown from it
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationGroup {
    /// Side length of the grid
    pub grid_size: usize,
    /// Footprint of the start room, placed at the grid centre
    pub starting_room: Shape,
    /// Passes in execution order
    pub passes: Vec<PassCatalog>,
}

impl GenerationGroup {
    /// A group on the default grid size with no passes yet
    pub const fn new(starting_room: Shape) -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            starting_room,
            passes: Vec::new(),
        }
    }

    /// Set the grid size
    #[must_use]
    pub const fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Append a pass
    #[must_use]
    pub fn with_pass(mut self, pass: PassCatalog) -> Self {
        self.passes.push(pass);
        self
    }
}
