//! Room queue building: which rooms a pass will try to place
//!
//! The queue is seeded until every definition's minimum count is met (credits
//! from earlier subordinate links count towards it), then topped up
//! by weighted sampling until the total cell count reaches a target drawn
//! uniformly from the pass's size bounds. Choosing a definition credits its
//! subordinates in lockstep, so a candidate is only accepted when it and all
//! its subordinates stay within their maximums.

use crate::algorithm::catalog::{DefinitionId, PassCatalog};
use crate::io::error::{GenerationError, Result};
use crate::math::probability::RandomSelector;

/// Shuffled list of definitions to place, with the bookkeeping that built it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomQueue {
    /// Definitions in placement order
    pub entries: Vec<DefinitionId>,
    /// Sampled size floor the queue had to reach
    pub size_target: usize,
    /// Sum of the cell counts of every queued room
    pub total_cells: usize,
    /// Credited instance count per definition, subordinate credits included
    pub counts: Vec<usize>,
}

impl RoomQueue {
    /// Number of queued rooms
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was queued
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct CountLedger<'a> {
    catalog: &'a PassCatalog,
    counts: Vec<usize>,
}

impl<'a> CountLedger<'a> {
    fn new(catalog: &'a PassCatalog) -> Self {
        Self {
            catalog,
            counts: vec![0; catalog.definitions().len()],
        }
    }

    fn count(&self, id: DefinitionId) -> usize {
        self.counts.get(id.0).copied().unwrap_or(0)
    }

    fn credited_ids(&self, id: DefinitionId) -> Vec<DefinitionId> {
        let mut ids = vec![id];
        if let Some(definition) = self.catalog.definition(id) {
            ids.extend(definition.subordinates.iter().copied());
        }
        ids
    }

    fn can_credit(&self, id: DefinitionId) -> bool {
        let mut projected = self.counts.clone();
        for credited in self.credited_ids(id) {
            let Some(count) = projected.get_mut(credited.0) else {
                return false;
            };
            *count += 1;
            let max = self
                .catalog
                .definition(credited)
                .map_or(0, |definition| definition.effective_max());
            if *count > max {
                return false;
            }
        }
        true
    }

    fn credit(&mut self, id: DefinitionId) {
        for credited in self.credited_ids(id) {
            if let Some(count) = self.counts.get_mut(credited.0) {
                *count += 1;
            }
        }
    }
}

/// Build the shuffled room queue for one pass
///
/// # Errors
///
/// Returns [`GenerationError::InfeasibleRoomCounts`] if the minimum counts
/// already break a maximum, if no contiguous definition has positive weight
/// while the target is unmet, or if `max_rejections` consecutive samples are
/// rejected.
pub fn build_room_queue(
    catalog: &PassCatalog,
    selector: &mut RandomSelector,
    max_rejections: usize,
) -> Result<RoomQueue> {
    let size_target = selector.range(catalog.min_size..catalog.max_size);
    let mut ledger = CountLedger::new(catalog);
    let mut entries = Vec::new();
    let mut total_cells = 0;

    for (id, definition) in catalog.eligible() {
        while ledger.count(id) < definition.min_count {
            if !ledger.can_credit(id) {
                return Err(infeasible(
                    0,
                    format!(
                        "minimum count of '{}' exceeds a maximum in its group",
                        definition.id
                    ),
                ));
            }
            ledger.credit(id);
            entries.push(id);
            total_cells += definition.shape.cell_count();
        }
    }

    let candidates: Vec<(DefinitionId, f64)> = catalog
        .eligible()
        .map(|(id, definition)| (id, definition.weight))
        .collect();

    let mut rejections = 0;
    while total_cells < size_target {
        let Some(&id) = selector.weighted_pick(&candidates) else {
            return Err(infeasible(
                rejections,
                "no contiguous room definition has a positive weight".to_string(),
            ));
        };

        if !ledger.can_credit(id) {
            rejections += 1;
            if rejections >= max_rejections {
                return Err(infeasible(
                    rejections,
                    "maximum room counts are likely inconsistent with the desired size".to_string(),
                ));
            }
            continue;
        }

        rejections = 0;
        ledger.credit(id);
        entries.push(id);
        total_cells += catalog
            .definition(id)
            .map_or(0, |definition| definition.shape.cell_count());
    }

    selector.shuffle(&mut entries);

    Ok(RoomQueue {
        entries,
        size_target,
        total_cells,
        counts: ledger.counts,
    })
}

const fn infeasible(rejections: usize, reason: String) -> GenerationError {
    GenerationError::InfeasibleRoomCounts {
        pass: None,
        rejections,
        reason,
    }
}
