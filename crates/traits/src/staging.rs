//! Off-screen staging of content that is about to be rasterized.
//!
//! A staging host owns the shared document tree. Anything it mounts must be
//! removed again on every exit path, so mounted nodes are only handed out
//! wrapped in a [`StagingNode`], which releases its node when dropped.

use coverpress_types::StyledMarkup;
use log::debug;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    #[error("element not found: '{0}'")]
    ElementNotFound(String),

    #[error("failed to mount staging node: {0}")]
    Mount(String),
}

/// A surface that can mount detached, full-scale copies of content.
pub trait StagingHost {
    /// Handle to whatever was mounted. Released exactly once.
    type Node;

    /// Clones the live element `source_id` and mounts the copy off-screen at
    /// a fixed `width_px`×`height_px`, with transforms, margins and
    /// positioning neutralised so it renders at true scale.
    fn stage_clone(
        &self,
        source_id: &str,
        width_px: u32,
        height_px: u32,
    ) -> Result<Self::Node, StagingError>;

    /// Mounts styled markup off-screen at its declared width, with its
    /// stylesheet installed for as long as the node is mounted.
    fn stage_markup(&self, markup: &StyledMarkup) -> Result<Self::Node, StagingError>;

    /// Detaches everything `stage_clone`/`stage_markup` inserted for `node`.
    /// Must not fail; a node that is already gone is ignored.
    fn release(&self, node: &Self::Node);
}

/// A mounted node that is released when this guard goes out of scope.
pub struct StagingNode<'h, H: StagingHost + ?Sized> {
    host: &'h H,
    node: H::Node,
}

impl<'h, H: StagingHost + ?Sized> StagingNode<'h, H> {
    pub fn clone_of(
        host: &'h H,
        source_id: &str,
        width_px: u32,
        height_px: u32,
    ) -> Result<Self, StagingError> {
        let node = host.stage_clone(source_id, width_px, height_px)?;
        debug!("Staged clone of '{}' at {}x{}px", source_id, width_px, height_px);
        Ok(Self { host, node })
    }

    pub fn markup(host: &'h H, markup: &StyledMarkup) -> Result<Self, StagingError> {
        let node = host.stage_markup(markup)?;
        debug!("Staged markup container ({}px wide)", markup.width_px);
        Ok(Self { host, node })
    }

    pub fn node(&self) -> &H::Node {
        &self.node
    }
}

impl<H: StagingHost + ?Sized> Drop for StagingNode<'_, H> {
    fn drop(&mut self) {
        self.host.release(&self.node);
        debug!("Released staging node");
    }
}

impl<H: StagingHost + ?Sized> fmt::Debug for StagingNode<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagingNode").finish_non_exhaustive()
    }
}
