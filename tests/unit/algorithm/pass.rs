//! Tests for the pass engine: placement, forced acceptance, caps and stalls

#[cfg(test)]
mod tests {
    use roomlattice::GenerationError;
    use roomlattice::algorithm::catalog::{DefinitionId, PassCatalog, RoomDefinition};
    use roomlattice::algorithm::pass::{PassEngine, PassReport, PlacementLimits, euclidean_distance};
    use roomlattice::algorithm::ruleset::{NeighbourRule, NeighbourRuleset};
    use roomlattice::io::configuration::{
        GUARANTEED_PLACEMENT_ATTEMPT, MAX_QUEUE_REJECTIONS, PLACEMENT_ATTEMPT_CAP, TIER_SWEEPS,
        TRAVERSAL_FACTOR,
    };
    use roomlattice::io::trace::GenerationTrace;
    use roomlattice::math::probability::RandomSelector;
    use roomlattice::spatial::grid::TileGrid;
    use roomlattice::spatial::room::{GridCoord, RoomType};
    use roomlattice::spatial::shape::Shape;

    fn grid_with_start() -> TileGrid {
        let mut grid = TileGrid::new(63);
        let middle = grid.middle();
        grid.place_room_anywhere(middle, &Shape::single(), RoomType::Start)
            .expect("start fits");
        grid
    }

    fn singles(ruleset: NeighbourRuleset, count: usize) -> PassCatalog {
        PassCatalog::new(0, 0, ruleset).with_definition(
            RoomDefinition::new("cell", Shape::single()).with_counts(count, count as i64),
        )
    }

    #[test]
    fn test_default_limits_match_constants() {
        let limits = PlacementLimits::default();
        assert_eq!(limits.attempt_cap, PLACEMENT_ATTEMPT_CAP);
        assert_eq!(limits.guarantee_threshold, GUARANTEED_PLACEMENT_ATTEMPT);
        assert_eq!(limits.tier_sweeps, TIER_SWEEPS);
        assert_eq!(limits.traversal_factor, TRAVERSAL_FACTOR);
        assert_eq!(limits.max_queue_rejections, MAX_QUEUE_REJECTIONS);
    }

    // Tests four single-contact rooms attach around a single start room
    #[test]
    fn test_places_every_queued_room() {
        let mut grid = grid_with_start();
        let catalog = singles(NeighbourRuleset::default(), 4);
        let mut selector = RandomSelector::new(42);
        let mut trace = GenerationTrace::new();

        let report = PassEngine::new(&catalog, grid.middle(), 0)
            .run(&mut grid, &mut selector, &mut trace)
            .expect("queue is feasible");

        assert_eq!(report.queued, 4);
        assert_eq!(report.placed.len(), 4);
        assert!(report.is_complete());
        assert_eq!(grid.rooms().len(), 5);
        assert_eq!(grid.doors().len(), 4);

        // Each placement touched exactly one cell, so contacts equal rooms placed
        for &handle in &report.placed {
            let room = grid.room(handle).expect("placed room exists");
            assert_eq!(room.room_type(), RoomType::Normal);
            assert!(!grid.boundary_of_room(handle, true).rooms.is_empty());
        }
        assert!(
            trace
                .events()
                .iter()
                .any(|event| event.label == "Pass 0 queue built (4 rooms)")
        );
    }

    // Tests acceptance is forced once the attempt count reaches the threshold
    // Verified by raising the guarantee threshold past the attempt cap
    #[test]
    fn test_forced_acceptance() {
        let never = NeighbourRuleset::new(&[NeighbourRule::new(1, 0.0, 0)]);
        let mut grid = grid_with_start();
        let catalog = singles(never.clone(), 2);
        let mut selector = RandomSelector::new(7);
        let mut trace = GenerationTrace::new();

        let report = PassEngine::new(&catalog, grid.middle(), 0)
            .run(&mut grid, &mut selector, &mut trace)
            .expect("queue is feasible");
        assert_eq!(report.placed.len(), 2);

        let limits = PlacementLimits {
            guarantee_threshold: usize::MAX,
            traversal_factor: 3,
            ..PlacementLimits::default()
        };
        let (unforced_grid, unforced) = run_fresh(&singles(never, 1), None, 0, limits, &mut selector);
        assert!(unforced.placed.is_empty());
        assert!(unforced.stalled);
        assert_eq!(unforced.requeues, 3);
        assert_eq!(unforced_grid.rooms().len(), 1);
    }

    // Tests a pass on an empty grid stalls instead of looping forever
    #[test]
    fn test_empty_grid_stalls() {
        let mut grid = TileGrid::new(15);
        let catalog = singles(NeighbourRuleset::default(), 4);
        let mut selector = RandomSelector::new(1);
        let mut trace = GenerationTrace::new();

        let report = PassEngine::new(&catalog, grid.middle(), 0)
            .run(&mut grid, &mut selector, &mut trace)
            .expect("queue is feasible");

        assert!(report.stalled);
        assert!(!report.is_complete());
        assert!(report.placed.is_empty());
        assert_eq!(report.unplaced.len(), 4);
        assert_eq!(report.requeues, 40);
        assert_eq!(report.dequeues, 41);
    }

    #[test]
    fn test_infeasible_queue_reports_pass() {
        let mut grid = grid_with_start();
        let catalog = PassCatalog::new(0, 0, NeighbourRuleset::default()).with_definition(
            RoomDefinition::new("cell", Shape::single()).with_counts(3, 2),
        );
        let mut selector = RandomSelector::new(1);
        let mut trace = GenerationTrace::new();

        let result = PassEngine::new(&catalog, grid.middle(), 2).run(&mut grid, &mut selector, &mut trace);
        assert!(matches!(
            result,
            Err(GenerationError::InfeasibleRoomCounts { pass: Some(2), .. })
        ));
    }

    // Tests no room ever ends up with more connections than its cap
    // Verified by skipping the cap check before acceptance
    #[test]
    fn test_connection_caps_respected() {
        let mut grid = grid_with_start();
        let catalog = PassCatalog::new(0, 0, NeighbourRuleset::default()).with_definition(
            RoomDefinition::new("cell", Shape::single())
                .with_counts(3, 3)
                .with_connection_cap(1),
        );
        let mut selector = RandomSelector::new(9);
        let mut trace = GenerationTrace::new();

        let report = PassEngine::new(&catalog, grid.middle(), 0)
            .run(&mut grid, &mut selector, &mut trace)
            .expect("queue is feasible");

        assert_eq!(report.placed.len(), 3);
        for room in grid.rooms() {
            assert!(room.connections() <= room.connection_cap());
        }
        // Capped rooms are full after one contact, so all hang off the start
        let start = grid.handles().next().expect("start room");
        assert_eq!(grid.room(start).map(|r| r.connections()), Some(3));
    }

    #[test]
    fn test_ignore_connections_skips_bookkeeping() {
        let mut grid = grid_with_start();
        let ruleset = NeighbourRuleset::default().with_ignore_connections(true);
        let catalog = PassCatalog::new(0, 0, ruleset).with_definition(
            RoomDefinition::new("cell", Shape::single())
                .with_counts(2, 2)
                .with_connection_cap(0),
        );
        let mut selector = RandomSelector::new(4);
        let mut trace = GenerationTrace::new();

        let report = PassEngine::new(&catalog, grid.middle(), 0)
            .run(&mut grid, &mut selector, &mut trace)
            .expect("queue is feasible");

        assert_eq!(report.placed.len(), 2);
        assert!(grid.rooms().iter().all(|room| room.connections() == 0));
    }

    fn strict_limits(tier_sweeps: usize) -> PlacementLimits {
        PlacementLimits {
            guarantee_threshold: usize::MAX,
            tier_sweeps,
            traversal_factor: 1,
            ..PlacementLimits::default()
        }
    }

    /// Run one pass on a fresh grid holding only the start room
    fn run_fresh(
        catalog: &PassCatalog,
        start: Option<GridCoord>,
        pass_index: usize,
        limits: PlacementLimits,
        selector: &mut RandomSelector,
    ) -> (TileGrid, PassReport) {
        let mut grid = grid_with_start();
        let mut trace = GenerationTrace::new();
        let report = PassEngine::new(catalog, start.unwrap_or_else(|| grid.middle()), pass_index)
            .with_limits(limits)
            .run(&mut grid, selector, &mut trace)
            .expect("queue is feasible");
        (grid, report)
    }

    // Tests contact counts outside the active tier are rejected until the tier advances
    // Verified by ignoring the active tier when filtering candidates
    #[test]
    fn test_priority_tier_advances_after_sweeps() {
        // Two contacts are searched first, but a single cell can only ever touch one
        let tiered = NeighbourRuleset::new(&[
            NeighbourRule::new(1, 1.0, 0),
            NeighbourRule::new(2, 1.0, 1),
        ]);
        assert_eq!(tiered.neighbours_by_priority(), vec![vec![2], vec![1]]);
        let catalog = singles(tiered, 1);
        let mut selector = RandomSelector::new(11);

        // Four sweeps of the start room's four open cells, then the second tier
        let (grid, advanced) = run_fresh(&catalog, None, 0, strict_limits(4), &mut selector);
        assert!(advanced.is_complete());
        assert_eq!(advanced.requeues, 0);
        assert_eq!(grid.rooms().len(), 2);

        // Six sweeps per tier exhaust the attempt cap before the tier moves
        let (_, stuck) = run_fresh(&catalog, None, 0, strict_limits(6), &mut selector);
        assert!(stuck.stalled);
        assert!(stuck.placed.is_empty());
        assert_eq!(stuck.requeues, 1);
    }

    // Tests the last sweep of a tier accepts a zero-weight placement
    // Verified by never forcing acceptance on the final sweep
    #[test]
    fn test_final_sweep_forces_acceptance() {
        let zero_tiers = NeighbourRuleset::new(&[
            NeighbourRule::new(1, 0.0, 1),
            NeighbourRule::new(2, 0.0, 0),
        ]);
        let mut selector = RandomSelector::new(12);

        let (_, forced) = run_fresh(
            &singles(zero_tiers, 1),
            None,
            0,
            strict_limits(4),
            &mut selector,
        );
        assert!(forced.is_complete());
        assert_eq!(forced.placed.len(), 1);

        // A single tier has no final sweep, so the same weights never place
        let zero_single = NeighbourRuleset::new(&[NeighbourRule::new(1, 0.0, 0)]);
        let (_, unforced) = run_fresh(
            &singles(zero_single, 1),
            None,
            0,
            strict_limits(4),
            &mut selector,
        );
        assert!(unforced.stalled);
        assert!(unforced.placed.is_empty());
    }

    // Tests distance falloff suppresses placements near the start after the first pass
    // Verified by passing no distance to the ruleset
    #[test]
    fn test_distance_falloff_changes_acceptance() {
        let falloff = NeighbourRuleset::default().with_distance_falloff(10.0, 20.0);
        let catalog = singles(falloff, 1);
        let mut selector = RandomSelector::new(13);

        // Every open cell is one step from the start, where the multiplier is 0
        let (_, near) = run_fresh(&catalog, None, 1, strict_limits(4), &mut selector);
        assert!(near.stalled);
        assert!(near.placed.is_empty());

        // Measured from a far corner the same cells are past the one threshold
        let (_, far) = run_fresh(&catalog, Some([0, 0]), 1, strict_limits(4), &mut selector);
        assert!(far.is_complete());

        // The first pass ignores the thresholds
        assert!(PassEngine::new(&catalog, [31, 31], 0).ignores_declared_distance());
        let (_, first) = run_fresh(&catalog, None, 0, strict_limits(4), &mut selector);
        assert!(first.is_complete());
    }

    #[test]
    fn test_ignored_distance_detection() {
        let plain = singles(NeighbourRuleset::default(), 1);
        assert!(!PassEngine::new(&plain, [0, 0], 0).ignores_declared_distance());

        let with_override = plain.clone().with_definition(
            RoomDefinition::new("far", Shape::single())
                .with_ruleset(NeighbourRuleset::default().with_distance_falloff(0.0, 5.0)),
        );
        assert!(PassEngine::new(&with_override, [0, 0], 0).ignores_declared_distance());
        assert!(!PassEngine::new(&with_override, [0, 0], 1).ignores_declared_distance());
    }

    // Tests a room that cannot be placed goes to the back of the queue
    // Verified by requeueing at the front, which starves the other room
    #[test]
    fn test_requeue_goes_to_back() {
        let never = NeighbourRuleset::new(&[NeighbourRule::new(1, 0.0, 0)]);
        let catalog = PassCatalog::new(0, 0, NeighbourRuleset::default())
            .with_definition(
                RoomDefinition::new("blocked", Shape::single())
                    .with_counts(1, 1)
                    .with_ruleset(never),
            )
            .with_definition(RoomDefinition::new("free", Shape::single()).with_counts(1, 1));
        let limits = PlacementLimits {
            guarantee_threshold: usize::MAX,
            ..PlacementLimits::default()
        };

        for seed in 0..8 {
            let mut selector = RandomSelector::new(seed);
            let (_, report) = run_fresh(&catalog, None, 0, limits, &mut selector);

            assert_eq!(report.placed.len(), 1);
            assert!(report.stalled);
            assert_eq!(report.unplaced, vec![DefinitionId(0)]);
            assert_eq!(report.dequeues, 21);
            assert_eq!(report.requeues, 19);
        }
    }

    #[test]
    fn test_distance_only_after_first_pass() {
        let catalog = singles(NeighbourRuleset::default(), 1);
        assert!(!PassEngine::new(&catalog, [0, 0], 0).uses_distance());
        assert!(PassEngine::new(&catalog, [0, 0], 1).uses_distance());
        assert!((euclidean_distance([0, 0], [3, 4]) - 5.0).abs() < f64::EPSILON);
    }
}
