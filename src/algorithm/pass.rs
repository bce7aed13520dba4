//! Pass engine: drains a room queue against the grid
//!
//! Each queued room gets one random orientation and a bounded number of
//! candidate cells. Candidates come from the open boundary of rooms taken off
//! a frontier queue; when the frontier runs dry it is refilled with a shuffle
//! of every known room, and every few refills the accepted contact counts move
//! to the next priority tier. Rooms that exhaust their attempts go to the back
//! of the queue, and the whole pass gives up once it has dequeued far more
//! often than the queue is long.

use log::{debug, error, warn};
use std::collections::VecDeque;

use crate::algorithm::catalog::{DefinitionId, PassCatalog, RoomDefinition};
use crate::algorithm::queue::build_room_queue;
use crate::algorithm::ruleset::NeighbourRuleset;
use crate::io::configuration::{
    GUARANTEED_PLACEMENT_ATTEMPT, MAX_QUEUE_REJECTIONS, PLACEMENT_ATTEMPT_CAP, TIER_SWEEPS,
    TRAVERSAL_FACTOR,
};
use crate::io::error::{Result, WithPass};
use crate::io::trace::GenerationTrace;
use crate::math::probability::RandomSelector;
use crate::spatial::grid::TileGrid;
use crate::spatial::room::{GridCoord, RoomHandle};
use crate::spatial::shape::{Facing, Shape};

/// Bounds on the placement search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementLimits {
    /// Candidate cells examined per queued room before requeueing it
    pub attempt_cap: usize,
    /// Attempt count from which acceptance is forced
    pub guarantee_threshold: usize,
    /// Frontier refreshes spent on each priority tier
    pub tier_sweeps: usize,
    /// Dequeues allowed per initially queued room
    pub traversal_factor: usize,
    /// Consecutive rejected samples allowed while building the queue
    pub max_queue_rejections: usize,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            attempt_cap: PLACEMENT_ATTEMPT_CAP,
            guarantee_threshold: GUARANTEED_PLACEMENT_ATTEMPT,
            tier_sweeps: TIER_SWEEPS,
            traversal_factor: TRAVERSAL_FACTOR,
            max_queue_rejections: MAX_QUEUE_REJECTIONS,
        }
    }
}

/// Outcome of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Zero-based pass index
    pub pass_index: usize,
    /// Rooms in the built queue
    pub queued: usize,
    /// Rooms placed, in order
    pub placed: Vec<RoomHandle>,
    /// Times a room exhausted its attempts and went back in the queue
    pub requeues: usize,
    /// Total dequeues performed
    pub dequeues: usize,
    /// Whether the anti-stall cap ended the pass early
    pub stalled: bool,
    /// Definitions still queued when the pass ended
    pub unplaced: Vec<DefinitionId>,
}

impl PassReport {
    /// True when every queued room was placed
    pub fn is_complete(&self) -> bool {
        !self.stalled && self.unplaced.is_empty()
    }
}

/// Frontier of rooms to search from, shared by every room in a pass
struct SearchState {
    frontier: VecDeque<RoomHandle>,
    all_rooms: Vec<RoomHandle>,
    refreshes: usize,
    tier: usize,
}

impl SearchState {
    fn seeded(grid: &TileGrid) -> Self {
        let all_rooms: Vec<RoomHandle> = grid.handles().collect();
        Self {
            frontier: all_rooms.iter().copied().collect(),
            all_rooms,
            refreshes: 0,
            tier: 0,
        }
    }

    fn refresh(&mut self, selector: &mut RandomSelector, tier_sweeps: usize) {
        let mut shuffled = self.all_rooms.clone();
        selector.shuffle(&mut shuffled);
        self.frontier.extend(shuffled);

        self.refreshes += 1;
        if tier_sweeps > 0 && self.refreshes % tier_sweeps == 0 {
            self.tier += 1;
        }
    }

    /// Whether this is the last sweep before the tier advances
    const fn on_final_sweep(&self, tier_count: usize, tier_sweeps: usize) -> bool {
        tier_count > 1 && tier_sweeps > 0 && self.refreshes % tier_sweeps == tier_sweeps - 1
    }

    fn active_tier<'t>(&self, tiers: &'t [Vec<usize>]) -> Option<&'t Vec<usize>> {
        if tiers.is_empty() {
            return None;
        }
        tiers.get(self.tier % tiers.len())
    }

    fn push(&mut self, handle: RoomHandle) {
        self.frontier.push_back(handle);
        self.all_rooms.push(handle);
    }
}

/// Per-room search inputs that stay fixed across candidate cells
struct Placement<'p> {
    definition: &'p RoomDefinition,
    shape: Shape,
    ruleset: &'p NeighbourRuleset,
    tiers: Vec<Vec<usize>>,
}

/// Runs a single pass of a [`PassCatalog`] against a grid
#[derive(Debug, Clone, Copy)]
pub struct PassEngine<'a> {
    catalog: &'a PassCatalog,
    start: GridCoord,
    pass_index: usize,
    limits: PlacementLimits,
}

impl<'a> PassEngine<'a> {
    /// Engine for pass `pass_index`, measuring distance from `start`
    pub fn new(catalog: &'a PassCatalog, start: GridCoord, pass_index: usize) -> Self {
        Self {
            catalog,
            start,
            pass_index,
            limits: PlacementLimits::default(),
        }
    }

    /// Replace the search bounds
    #[must_use]
    pub const fn with_limits(mut self, limits: PlacementLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Whether distance falloff applies in this pass
    pub const fn uses_distance(&self) -> bool {
        self.pass_index > 0
    }

    /// Build the queue and place as many rooms as possible
    ///
    /// A stall is not an error: the report is marked `stalled` and lists the
    /// rooms left unplaced.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenerationError::InfeasibleRoomCounts`] if the room
    /// queue cannot be built.
    pub fn run(
        &self,
        grid: &mut TileGrid,
        selector: &mut RandomSelector,
        trace: &mut GenerationTrace,
    ) -> Result<PassReport> {
        self.warn_about_ignored_distance();

        let queue = build_room_queue(self.catalog, selector, self.limits.max_queue_rejections)
            .with_pass(self.pass_index)?;
        trace.record(format!(
            "Pass {} queue built ({} rooms)",
            self.pass_index,
            queue.len()
        ));

        if grid.rooms().is_empty() {
            error!(
                "Pass {} started on an empty grid; nothing can be attached",
                self.pass_index
            );
        }

        let mut report = PassReport {
            pass_index: self.pass_index,
            queued: queue.len(),
            ..PassReport::default()
        };
        let traversal_cap = queue.len().saturating_mul(self.limits.traversal_factor);
        let mut pending: VecDeque<DefinitionId> = queue.entries.into_iter().collect();
        let mut state = SearchState::seeded(grid);

        while let Some(id) = pending.pop_front() {
            report.dequeues += 1;
            if report.dequeues > traversal_cap {
                pending.push_front(id);
                report.stalled = true;
                report.unplaced = pending.drain(..).collect();
                error!(
                    "Pass {} failed: {} rooms left unplaced after {} dequeues",
                    self.pass_index,
                    report.unplaced.len(),
                    traversal_cap
                );
                break;
            }

            let Some(definition) = self.catalog.definition(id) else {
                continue;
            };

            match self.place_one(definition, grid, &mut state, selector) {
                Some(handle) => report.placed.push(handle),
                None => {
                    warn!(
                        "Pass {}: could not place room '{}' within {} attempts, requeueing",
                        self.pass_index, definition.id, self.limits.attempt_cap
                    );
                    report.requeues += 1;
                    pending.push_back(id);
                }
            }
        }

        Ok(report)
    }

    /// Whether a ruleset of this pass declares distance thresholds that the
    /// pass will not apply
    pub fn ignores_declared_distance(&self) -> bool {
        if self.uses_distance() {
            return false;
        }
        let overrides = self
            .catalog
            .definitions()
            .iter()
            .filter_map(|definition| definition.ruleset_override.as_ref());
        std::iter::once(&self.catalog.default_ruleset)
            .chain(overrides)
            .any(NeighbourRuleset::uses_distance)
    }

    fn warn_about_ignored_distance(&self) {
        if self.ignores_declared_distance() {
            warn!(
                "Pass {} declares distance thresholds, but distance falloff is disabled on the first pass",
                self.pass_index
            );
        }
    }

    /// Search for a spot for one queued room and commit it
    fn place_one(
        &self,
        definition: &RoomDefinition,
        grid: &mut TileGrid,
        state: &mut SearchState,
        selector: &mut RandomSelector,
    ) -> Option<RoomHandle> {
        let orientations = definition.shape.orientations();
        let shape = selector.choose(&orientations)?.clone();
        let ruleset = self.catalog.ruleset_for(definition);
        let placement = Placement {
            definition,
            shape,
            ruleset,
            tiers: ruleset.neighbours_by_priority(),
        };

        let cap = self.limits.attempt_cap;
        let mut attempts = 0;
        let mut attempts_at_refresh = None;

        while attempts < cap {
            if state.frontier.is_empty() {
                // A whole sweep without a single candidate cell
                if attempts_at_refresh == Some(attempts) {
                    return None;
                }
                attempts_at_refresh = Some(attempts);
                state.refresh(selector, self.limits.tier_sweeps);
            }

            let Some(room) = state.frontier.pop_front() else {
                return None;
            };

            let mut open = grid.boundary_of_room(room, false).cells;
            selector.shuffle(&mut open);

            for (cell, facing) in open {
                if let Some(handle) =
                    self.try_candidate(&placement, cell, facing, attempts, grid, state, selector)
                {
                    return Some(handle);
                }
                attempts += 1;
                if attempts >= cap {
                    break;
                }
            }
        }

        None
    }

    /// Evaluate one boundary cell; commits and returns the room on acceptance
    fn try_candidate(
        &self,
        placement: &Placement<'_>,
        cell: GridCoord,
        facing: Facing,
        attempts: usize,
        grid: &mut TileGrid,
        state: &mut SearchState,
        selector: &mut RandomSelector,
    ) -> Option<RoomHandle> {
        // The new room's edge facing back must meet the existing room's edge
        let anchor = placement
            .shape
            .random_on_boundary(facing.opposite(), selector)?;
        let neighbours = grid.count_neighbours(cell, &placement.shape, anchor)?;

        if state
            .active_tier(&placement.tiers)
            .is_some_and(|tier| !tier.contains(&neighbours.count))
        {
            return None;
        }

        let ruleset = placement.ruleset;
        if !ruleset.ignore_connections && grid.violates_connection_caps(&neighbours) {
            return None;
        }

        let forced = attempts >= self.limits.guarantee_threshold
            || state.on_final_sweep(placement.tiers.len(), self.limits.tier_sweeps);
        let probability = if forced {
            1.0
        } else {
            let distance = self
                .uses_distance()
                .then(|| euclidean_distance(cell, self.start));
            ruleset.probability(neighbours.count, distance)
        };
        if !selector.chance(probability) {
            return None;
        }

        let definition = placement.definition;
        let handle = grid.place_room(
            cell,
            &placement.shape,
            anchor,
            definition.room_type,
            definition.connection_cap,
        )?;
        if !ruleset.ignore_connections {
            grid.record_connections(handle, &neighbours);
        }
        state.push(handle);

        debug!(
            "Pass {}: placed '{}' as room {handle} at ({}, {}) touching {} cells",
            self.pass_index, definition.id, cell[0], cell[1], neighbours.count
        );
        Some(handle)
    }
}

/// Straight-line distance between two grid cells
pub fn euclidean_distance(a: GridCoord, b: GridCoord) -> f64 {
    let dx = f64::from(a[0] - b[0]);
    let dy = f64::from(a[1] - b[1]);
    dx.hypot(dy)
}
