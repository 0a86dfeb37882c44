//! Fluent chain assembly.

use std::sync::Arc;

use crate::chain::{Chain, ChainError, Handler};

/// Collects stages in order and assembles them into a [`Chain`].
#[derive(Default)]
pub struct ChainBuilder {
    stages: Vec<Arc<dyn Handler>>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage after the ones already collected.
    pub fn stage(self, handler: impl Handler) -> Self {
        self.stage_shared(Arc::new(handler))
    }

    pub fn stage_shared(mut self, handler: Arc<dyn Handler>) -> Self {
        self.stages.push(handler);
        self
    }

    /// Add the stage produced by `make` only when `enabled` holds.
    pub fn stage_if<H, F>(self, enabled: bool, make: F) -> Self
    where
        H: Handler,
        F: FnOnce() -> H,
    {
        if enabled {
            self.stage(make())
        } else {
            self
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn build(self) -> Result<Chain, ChainError> {
        Chain::from_stages(self.stages)
    }
}

impl std::fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|stage| stage.name()))
            .finish()
    }
}
