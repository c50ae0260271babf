//! The pipeline's stage machine and progress reporting.

use crate::error::PipelineError;
use coverpress_types::ProgressEvent;
use log::{info, warn};
use std::fmt;

/// Where an invocation is. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    Staging,
    Capturing,
    BuildingCover,
    /// No companion file: the cover is saved on its own.
    Direct,
    CompanionLoad,
    Converting,
    Parsing,
    Merging,
    Saving,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    /// Whether `next` may directly follow `self`.
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        if next == Failed {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Init, Staging)
                | (Staging, Capturing)
                | (Capturing, BuildingCover)
                | (BuildingCover, Direct)
                | (BuildingCover, CompanionLoad)
                | (Direct, Done)
                | (CompanionLoad, Converting)
                | (CompanionLoad, Parsing)
                | (Converting, Parsing)
                | (Parsing, Merging)
                | (Merging, Saving)
                | (Saving, Done)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks the current stage of one invocation and forwards progress events.
///
/// Percentages never go backwards: a lower value than the last one emitted
/// is raised to it.
pub struct StageTracker<F: FnMut(ProgressEvent)> {
    stage: Stage,
    last_percentage: u8,
    on_progress: F,
}

impl<F: FnMut(ProgressEvent)> StageTracker<F> {
    pub fn new(on_progress: F) -> Self {
        Self {
            stage: Stage::Init,
            last_percentage: 0,
            on_progress,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn enter(&mut self, next: Stage) -> Result<(), PipelineError> {
        if !self.stage.can_advance_to(next) {
            return Err(PipelineError::Other(format!(
                "invalid stage transition {} -> {}",
                self.stage, next
            )));
        }
        info!("Pipeline stage: {} -> {}", self.stage, next);
        self.stage = next;
        Ok(())
    }

    pub fn report(&mut self, message: impl Into<String>, percentage: u8) {
        let mut percentage = percentage.min(100);
        if percentage < self.last_percentage {
            warn!(
                "Progress went backwards ({} < {}), holding at {}",
                percentage, self.last_percentage, self.last_percentage
            );
            percentage = self.last_percentage;
        }
        self.last_percentage = percentage;
        (self.on_progress)(ProgressEvent::new(message, percentage));
    }

    /// Moves to [`Stage::Failed`] unless the invocation already ended.
    pub fn fail(&mut self, error: &PipelineError) {
        if self.stage.can_advance_to(Stage::Failed) {
            log::error!("Pipeline failed during {}: {}", self.stage, error);
            self.stage = Stage::Failed;
        }
    }
}
