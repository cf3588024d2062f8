use crate::{
    index::Index,
    middle::tac::{LabelId, TempId},
};

/// First index handed out for both temporaries and labels
pub const FIRST_INDEX: usize = 1;

/// Hands out fresh temporary and label names for one generation run. Names
/// are never freed or reused, so two allocations never collide.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    next_temp: TempId,
    next_label: LabelId,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self {
            next_temp: TempId::new(FIRST_INDEX),
            next_label: LabelId::new(FIRST_INDEX),
        }
    }

    pub fn new_temp(&mut self) -> TempId {
        let prev = self.next_temp;
        self.next_temp.increment_by(1);
        prev
    }

    pub fn new_label(&mut self) -> LabelId {
        let prev = self.next_label;
        self.next_label.increment_by(1);
        prev
    }

    pub fn temps_allocated(&self) -> usize {
        self.next_temp.index() - FIRST_INDEX
    }

    pub fn labels_allocated(&self) -> usize {
        self.next_label.index() - FIRST_INDEX
    }
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new()
    }
}
