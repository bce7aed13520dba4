//! Neighbour rulesets: placement probability by contact count and distance
//!
//! A ruleset maps "how many active cells a prospective room would touch" to
//! an acceptance weight and a search priority. The table is normalised once
//! at construction: counts `1..=K` are all present, missing ones get zero
//! weight and priority, and weights are clamped to `[0, 1]`.

use crate::io::configuration::DISTANCE_THRESHOLD_TOLERANCE;
use crate::math::interpolation::{approximately_equal, clamp_unit, inverse_lerp, lerp};

/// One configured table row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighbourRule {
    /// Contact count this row applies to (counts below 1 are raised to 1)
    pub neighbours: usize,
    /// Acceptance weight, clamped to `[0, 1]`
    pub weight: f64,
    /// Search priority; higher tiers are searched first
    pub priority: i32,
}

impl NeighbourRule {
    /// Build a table row
    pub const fn new(neighbours: usize, weight: f64, priority: i32) -> Self {
        Self {
            neighbours,
            weight,
            priority,
        }
    }
}

/// Placement probability rules shared by a pass or overriding one definition
#[derive(Debug, Clone, PartialEq)]
pub struct NeighbourRuleset {
    /// Scale applied to every probability, clamped to `[0, 1]`
    pub universal_modifier: f64,
    /// Distance at which the falloff multiplier is 0
    pub distance_mod_zero: f64,
    /// Distance at which the falloff multiplier reaches 1
    pub distance_mod_one: f64,
    /// Clamp contact counts above the table down to its last row
    pub propagate_higher: bool,
    /// Skip connection-cap checks and bookkeeping entirely
    pub ignore_connections: bool,
    table: Vec<NeighbourRule>,
}

impl NeighbourRuleset {
    /// Build a ruleset from table rows
    ///
    /// The table covers counts `1..=K`, where `K` is the larger of the number
    /// of rows and the highest configured count. Later rows for the same count
    /// replace earlier ones.
    pub fn new(rules: &[NeighbourRule]) -> Self {
        let largest = rules
            .iter()
            .map(|rule| rule.neighbours.max(1))
            .max()
            .unwrap_or(0);
        let max_neighbours = largest.max(rules.len());

        let mut table: Vec<NeighbourRule> = (1..=max_neighbours)
            .map(|n| NeighbourRule::new(n, 0.0, 0))
            .collect();
        for rule in rules {
            let neighbours = rule.neighbours.max(1);
            if let Some(slot) = table.get_mut(neighbours - 1) {
                *slot = NeighbourRule::new(neighbours, clamp_unit(rule.weight), rule.priority);
            }
        }

        Self {
            universal_modifier: 1.0,
            distance_mod_zero: 0.0,
            distance_mod_one: 0.0,
            propagate_higher: false,
            ignore_connections: false,
            table,
        }
    }

    /// Set the universal probability scale
    #[must_use]
    pub fn with_universal_modifier(mut self, modifier: f64) -> Self {
        self.universal_modifier = clamp_unit(modifier);
        self
    }

    /// Set the distance falloff thresholds
    #[must_use]
    pub const fn with_distance_falloff(mut self, zero_at: f64, one_at: f64) -> Self {
        self.distance_mod_zero = zero_at;
        self.distance_mod_one = one_at;
        self
    }

    /// Clamp out-of-table counts to the last row
    #[must_use]
    pub const fn with_propagate_higher(mut self, propagate: bool) -> Self {
        self.propagate_higher = propagate;
        self
    }

    /// Disable connection caps
    #[must_use]
    pub const fn with_ignore_connections(mut self, ignore: bool) -> Self {
        self.ignore_connections = ignore;
        self
    }

    /// Normalised table, ascending by contact count
    pub fn table(&self) -> &[NeighbourRule] {
        &self.table
    }

    /// Highest contact count represented in the table
    pub const fn max_represented_neighbours(&self) -> usize {
        self.table.len()
    }

    /// Whether distance falloff thresholds are configured
    pub fn uses_distance(&self) -> bool {
        !(approximately_equal(self.distance_mod_zero, 0.0, DISTANCE_THRESHOLD_TOLERANCE)
            && approximately_equal(self.distance_mod_one, 0.0, DISTANCE_THRESHOLD_TOLERANCE))
    }

    /// Multiplier from distance to the start room
    ///
    /// Negative or absent distances, and rulesets without thresholds, give 1.
    pub fn distance_multiplier(&self, distance: Option<f64>) -> f64 {
        match distance {
            Some(d) if d >= 0.0 && self.uses_distance() => lerp(
                0.0,
                1.0,
                inverse_lerp(self.distance_mod_zero, self.distance_mod_one, d),
            ),
            _ => 1.0,
        }
    }

    /// Acceptance probability for a placement touching `neighbours` cells
    pub fn probability(&self, neighbours: usize, distance: Option<f64>) -> f64 {
        let max = self.max_represented_neighbours();
        let effective = if self.propagate_higher {
            neighbours.min(max)
        } else {
            neighbours
        };
        if effective == 0 || effective > max {
            return 0.0;
        }

        let weight = self
            .table
            .get(effective - 1)
            .map_or(0.0, |rule| rule.weight);
        self.universal_modifier * self.distance_multiplier(distance) * weight
    }

    /// Contact counts grouped by priority, highest priority first
    ///
    /// Counts sharing a priority share a group regardless of where they sit
    /// in the table; each group is ascending.
    pub fn neighbours_by_priority(&self) -> Vec<Vec<usize>> {
        let mut ordered: Vec<&NeighbourRule> = self.table.iter().collect();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut tiers: Vec<Vec<usize>> = Vec::new();
        let mut current: Option<i32> = None;
        for rule in ordered {
            if current == Some(rule.priority) {
                if let Some(tier) = tiers.last_mut() {
                    tier.push(rule.neighbours);
                }
            } else {
                tiers.push(vec![rule.neighbours]);
                current = Some(rule.priority);
            }
        }
        tiers
    }
}

impl Default for NeighbourRuleset {
    /// Single-contact placements always accepted, nothing else
    fn default() -> Self {
        Self::new(&[NeighbourRule::new(1, 1.0, 0)])
    }
}
