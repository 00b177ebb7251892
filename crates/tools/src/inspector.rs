use std::collections::BTreeMap;

use asciicraft_common::BlockId;
use asciicraft_kernel::{BlockCoord, World};

/// World inspector for developer tooling.
///
/// Provides read-only queries against the block grid for debugging and the
/// CLI's status output.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let mut by_block = BTreeMap::new();
        for (_, id) in world.iter_blocks() {
            if id != world.empty_block() {
                *by_block.entry(id).or_insert(0) += 1;
            }
        }
        WorldSummary {
            extents: world.extents(),
            solid: by_block.values().sum(),
            by_block,
            pending_events: world.events().len(),
        }
    }

    /// Height of the topmost solid cell in column `(x, y)`, if any.
    pub fn column_top(world: &World, x: i64, y: i64) -> Option<i64> {
        let (_, _, z_blocks) = world.extents();
        (0..z_blocks as i64).rev().find(|z| !world.is_empty(x, y, *z))
    }

    /// Coordinates of every cell holding `id`, in storage order.
    pub fn find_blocks(world: &World, id: BlockId) -> Vec<BlockCoord> {
        world
            .iter_blocks()
            .filter(|(_, b)| *b == id)
            .map(|(c, _)| c)
            .collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub extents: (usize, usize, usize),
    pub solid: usize,
    pub by_block: BTreeMap<BlockId, usize>,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (x, y, z) = self.extents;
        write!(
            f,
            "World: {x}x{y}x{z} solid={} pending_events={}",
            self.solid, self.pending_events
        )?;
        for (id, count) in &self.by_block {
            write!(f, " '{id}'={count}")?;
        }
        Ok(())
    }
}
