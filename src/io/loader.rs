//! JSON generation group files
//!
//! A file names its rulesets once and refers to them by name from passes and
//! room definitions. Subordinate links refer to room ids within the same pass.
//! Everything is resolved and validated here so the engine only ever sees
//! well-formed catalogs.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::algorithm::catalog::{GenerationGroup, PassCatalog, RoomDefinition};
use crate::algorithm::ruleset::{NeighbourRule, NeighbourRuleset};
use crate::io::configuration::DEFAULT_GRID_SIZE;
use crate::io::error::{GenerationError, Result, invalid_configuration};
use crate::spatial::room::{RoomType, UNLIMITED_CONNECTIONS};
use crate::spatial::shape::Shape;

/// Top-level file contents
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupFile {
    /// Side length of the grid
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    /// Footprint of the start room
    pub starting_room: ShapeConfig,
    /// Named rulesets
    #[serde(default)]
    pub rulesets: HashMap<String, RulesetConfig>,
    /// Passes in execution order
    pub passes: Vec<PassConfig>,
}

const fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

const fn default_weight() -> f64 {
    1.0
}

const fn default_modifier() -> f64 {
    1.0
}

/// Room footprint, either a flattened mask or text rows
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShapeConfig {
    /// `size` and a row-major list of `size²` cells, non-zero meaning active
    Mask {
        /// Side length
        size: usize,
        /// Flattened cells
        cells: Vec<u8>,
    },
    /// Equal-length rows with `#` marking active cells
    Rows {
        /// Mask rows
        rows: Vec<String>,
    },
}

impl ShapeConfig {
    /// Build the shape
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfiguration`] if the mask is not
    /// square.
    pub fn to_shape(&self) -> Result<Shape> {
        match self {
            Self::Mask { size, cells } => {
                let mask: Vec<bool> = cells.iter().map(|&cell| cell != 0).collect();
                Shape::from_cells(*size, &mask)
            }
            Self::Rows { rows } => {
                let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
                Shape::from_rows(&rows)
            }
        }
    }
}

/// One neighbour table row
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Contact count
    pub neighbours: usize,
    /// Acceptance weight
    pub weight: f64,
    /// Search priority
    #[serde(default)]
    pub priority: i32,
}

/// Named ruleset
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesetConfig {
    /// Neighbour table rows
    pub table: Vec<RuleConfig>,
    /// Scale applied to every probability
    #[serde(default = "default_modifier")]
    pub universal_modifier: f64,
    /// Distance at which falloff is 0
    #[serde(default)]
    pub distance_mod_zero: f64,
    /// Distance at which falloff reaches 1
    #[serde(default)]
    pub distance_mod_one: f64,
    /// Clamp high contact counts to the last row
    #[serde(default)]
    pub propagate_higher: bool,
    /// Disable connection caps
    #[serde(default)]
    pub ignore_connections: bool,
}

impl RulesetConfig {
    fn to_ruleset(&self) -> NeighbourRuleset {
        let rules: Vec<NeighbourRule> = self
            .table
            .iter()
            .map(|rule| NeighbourRule::new(rule.neighbours, rule.weight, rule.priority))
            .collect();
        NeighbourRuleset::new(&rules)
            .with_universal_modifier(self.universal_modifier)
            .with_distance_falloff(self.distance_mod_zero, self.distance_mod_one)
            .with_propagate_higher(self.propagate_higher)
            .with_ignore_connections(self.ignore_connections)
    }
}

/// One pass
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassConfig {
    /// Inclusive lower bound of the cell target
    pub min_size: usize,
    /// Exclusive upper bound of the cell target
    pub max_size: usize,
    /// Name of the default ruleset; the built-in default when absent
    #[serde(default)]
    pub ruleset: Option<String>,
    /// Room definitions
    pub rooms: Vec<RoomConfig>,
}

/// Placed room category as written in files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomTypeConfig {
    /// Ordinary room
    #[default]
    Normal,
    /// Start room
    Start,
    /// End room
    End,
}

impl From<RoomTypeConfig> for RoomType {
    fn from(config: RoomTypeConfig) -> Self {
        match config {
            RoomTypeConfig::Normal => Self::Normal,
            RoomTypeConfig::Start => Self::Start,
            RoomTypeConfig::End => Self::End,
        }
    }
}

/// One room definition
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomConfig {
    /// Identifier, unique within the pass
    pub id: String,
    /// Footprint
    pub shape: ShapeConfig,
    /// Sampling weight
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Instances always queued
    #[serde(default)]
    pub min_count: usize,
    /// Upper bound, zero or less meaning unbounded
    #[serde(default)]
    pub max_count: i64,
    /// Connection cap, unlimited when absent
    #[serde(default)]
    pub max_connections: Option<usize>,
    /// Name of a ruleset overriding the pass default
    #[serde(default)]
    pub ruleset: Option<String>,
    /// Ids of definitions credited alongside this one
    #[serde(default)]
    pub subordinates: Vec<String>,
    /// Type of placed instances
    #[serde(default)]
    pub room_type: RoomTypeConfig,
}

/// Read and resolve a generation group file
///
/// # Errors
///
/// Returns [`GenerationError::FileSystem`] if the file cannot be read,
/// [`GenerationError::ConfigParse`] for malformed JSON and
/// [`GenerationError::InvalidConfiguration`] for unresolvable content.
pub fn load_group(path: &Path) -> Result<GenerationGroup> {
    let text = std::fs::read_to_string(path).map_err(|source| GenerationError::FileSystem {
        path: path.to_path_buf(),
        operation: "read configuration",
        source,
    })?;
    parse_group(&text, path)
}

/// Parse and resolve generation group JSON; `path` is used in errors only
///
/// # Errors
///
/// Returns [`GenerationError::ConfigParse`] for malformed JSON and
/// [`GenerationError::InvalidConfiguration`] for unresolvable content.
pub fn parse_group(text: &str, path: &Path) -> Result<GenerationGroup> {
    let file: GroupFile =
        serde_json::from_str(text).map_err(|source| GenerationError::ConfigParse {
            path: PathBuf::from(path),
            source,
        })?;
    resolve_group(&file)
}

/// Turn parsed file contents into a validated group
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfiguration`] if a shape is not
/// square, a ruleset or subordinate name is unknown, an id repeats, a weight
/// is negative or the grid size is zero.
pub fn resolve_group(file: &GroupFile) -> Result<GenerationGroup> {
    if file.grid_size == 0 {
        return Err(invalid_configuration(&"grid size must be at least 1"));
    }

    let rulesets: HashMap<&str, NeighbourRuleset> = file
        .rulesets
        .iter()
        .map(|(name, config)| (name.as_str(), config.to_ruleset()))
        .collect();

    let mut group =
        GenerationGroup::new(file.starting_room.to_shape()?).with_grid_size(file.grid_size);
    for (index, pass) in file.passes.iter().enumerate() {
        let catalog = resolve_pass(pass, &rulesets).map_err(|error| match error {
            GenerationError::InvalidConfiguration { reason } => {
                invalid_configuration(&format!("pass {index}: {reason}"))
            }
            other => other,
        })?;
        group.passes.push(catalog);
    }
    Ok(group)
}

fn lookup_ruleset(
    rulesets: &HashMap<&str, NeighbourRuleset>,
    name: &str,
) -> Result<NeighbourRuleset> {
    rulesets
        .get(name)
        .cloned()
        .ok_or_else(|| invalid_configuration(&format!("unknown ruleset '{name}'")))
}

fn resolve_pass(
    pass: &PassConfig,
    rulesets: &HashMap<&str, NeighbourRuleset>,
) -> Result<PassCatalog> {
    let default_ruleset = match &pass.ruleset {
        Some(name) => lookup_ruleset(rulesets, name)?,
        None => NeighbourRuleset::default(),
    };
    let mut catalog = PassCatalog::new(pass.min_size, pass.max_size, default_ruleset);

    for room in &pass.rooms {
        if catalog
            .definitions()
            .iter()
            .any(|definition| definition.id == room.id)
        {
            return Err(invalid_configuration(&format!(
                "duplicate room id '{}'",
                room.id
            )));
        }
        if room.weight.is_nan() || room.weight < 0.0 {
            return Err(invalid_configuration(&format!(
                "room '{}' has negative weight {}",
                room.id, room.weight
            )));
        }

        let mut definition = RoomDefinition::new(room.id.clone(), room.shape.to_shape()?)
            .with_weight(room.weight)
            .with_counts(room.min_count, room.max_count)
            .with_connection_cap(room.max_connections.unwrap_or(UNLIMITED_CONNECTIONS))
            .with_room_type(room.room_type.into());
        if let Some(name) = &room.ruleset {
            definition = definition.with_ruleset(lookup_ruleset(rulesets, name)?);
        }
        catalog.add(definition);
    }

    for room in pass.rooms.iter().filter(|room| !room.subordinates.is_empty()) {
        let subordinates: Vec<&str> = room.subordinates.iter().map(String::as_str).collect();
        catalog.link_subordinates(&room.id, &subordinates)?;
    }

    Ok(catalog)
}
