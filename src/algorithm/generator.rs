//! Multi-pass driver: start room, then every pass in order

use log::info;

use crate::algorithm::catalog::GenerationGroup;
use crate::algorithm::pass::{PassEngine, PassReport, PlacementLimits};
use crate::io::error::{GenerationError, Result, WithPass};
use crate::io::trace::GenerationTrace;
use crate::math::probability::RandomSelector;
use crate::spatial::grid::TileGrid;
use crate::spatial::room::{RoomHandle, RoomType};

const END_LABEL: &str = "End";

/// Owns the grid and random state for one generation group
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    group: GenerationGroup,
    selector: RandomSelector,
    limits: PlacementLimits,
    grid: TileGrid,
    start: Option<RoomHandle>,
    trace: GenerationTrace,
}

impl DungeonGenerator {
    /// Create a generator; the grid stays empty until [`Self::init`]
    pub fn new(group: GenerationGroup, selector: RandomSelector) -> Self {
        let grid = TileGrid::new(group.grid_size);
        Self {
            group,
            selector,
            limits: PlacementLimits::default(),
            grid,
            start: None,
            trace: GenerationTrace::new(),
        }
    }

    /// Replace the search bounds used by every pass
    #[must_use]
    pub const fn with_limits(mut self, limits: PlacementLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Discard any placed rooms and start a fresh trace
    pub fn init(&mut self) {
        self.grid = TileGrid::new(self.group.grid_size);
        self.start = None;
        self.trace = GenerationTrace::new();
        self.trace.record("Initialised");
    }

    /// Place the group's starting shape at the grid centre as the start room
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::StartingRoomRejected`] if no anchor of the
    /// shape fits at the centre.
    pub fn place_starting_room(&mut self) -> Result<RoomHandle> {
        let at = self.grid.middle();
        let handle = self
            .grid
            .place_room_anywhere(at, &self.group.starting_room, RoomType::Start)
            .ok_or(GenerationError::StartingRoomRejected { at })?;
        self.start = Some(handle);
        self.trace.record("Starting room placed");
        Ok(handle)
    }

    /// Run one pass against the current grid
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::PassIndexOutOfRange`] for an unknown pass,
    /// or [`GenerationError::InfeasibleRoomCounts`] tagged with the pass index
    /// if its queue cannot be built.
    pub fn run_pass(&mut self, index: usize) -> Result<PassReport> {
        let passes = self.group.passes.len();
        let catalog = self
            .group
            .passes
            .get(index)
            .ok_or(GenerationError::PassIndexOutOfRange { index, passes })?;

        let report = PassEngine::new(catalog, self.grid.middle(), index)
            .with_limits(self.limits)
            .run(&mut self.grid, &mut self.selector, &mut self.trace)
            .with_pass(index)?;

        info!(
            "Pass {index}: placed {} of {} queued rooms ({} requeues)",
            report.placed.len(),
            report.queued,
            report.requeues
        );
        self.trace.record(format!("Pass {index} finished"));
        Ok(report)
    }

    /// Initialise, place the start room and run every pass
    ///
    /// Stalled passes are reported and generation moves on; an infeasible
    /// queue aborts.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::place_starting_room`] and
    /// [`Self::run_pass`].
    pub fn generate(&mut self) -> Result<Vec<PassReport>> {
        self.init();
        self.place_starting_room()?;

        let mut reports = Vec::with_capacity(self.group.passes.len());
        for index in 0..self.group.passes.len() {
            reports.push(self.run_pass(index)?);
        }

        self.trace.record(END_LABEL);
        info!("{}", self.grid);
        Ok(reports)
    }

    /// Return to the state just after the start room was placed
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::StartingRoomRejected`] if the start room
    /// cannot be placed again.
    pub fn reset(&mut self) -> Result<RoomHandle> {
        self.init();
        self.place_starting_room()
    }

    /// Generation group being run
    pub const fn group(&self) -> &GenerationGroup {
        &self.group
    }

    /// Current grid
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Handle of the start room, once placed
    pub const fn start_room(&self) -> Option<RoomHandle> {
        self.start
    }

    /// Timing trace of the current run
    pub const fn trace(&self) -> &GenerationTrace {
        &self.trace
    }

    /// Close the trace and take the finished grid, leaving an empty one
    ///
    /// A trace already closed by [`Self::generate`] is left as it is.
    pub fn finish(&mut self) -> TileGrid {
        if self.trace.last_label() != Some(END_LABEL) {
            self.trace.record(END_LABEL);
        }
        self.start = None;
        std::mem::replace(&mut self.grid, TileGrid::new(self.group.grid_size))
    }
}
