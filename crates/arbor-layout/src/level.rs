use crate::node::NodeId;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelRecord {
    pub max_width: f64,
    pub max_height: f64,
    /// Rightmost node visited at this depth so far in the current pass.
    pub last_node: Option<NodeId>,
}

/// Per-depth bookkeeping for one layout pass.
#[derive(Debug, Clone, Default)]
pub struct LevelTracker {
    levels: Vec<LevelRecord>,
}

impl LevelTracker {
    pub fn reset(&mut self) {
        self.levels.clear();
    }

    fn record_mut(&mut self, level: usize) -> &mut LevelRecord {
        if self.levels.len() <= level {
            self.levels.resize(level + 1, LevelRecord::default());
        }
        &mut self.levels[level]
    }

    /// Makes `id` the rightmost node at `level`, returning the previous one.
    pub fn push_node(&mut self, level: usize, id: NodeId) -> Option<NodeId> {
        self.record_mut(level).last_node.replace(id)
    }

    pub fn observe_size(&mut self, level: usize, width: f64, height: f64) {
        let record = self.record_mut(level);
        record.max_width = record.max_width.max(width);
        record.max_height = record.max_height.max(height);
    }

    pub fn get(&self, level: usize) -> Option<&LevelRecord> {
        self.levels.get(level)
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }
}
