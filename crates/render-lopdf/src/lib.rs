//! Page builder backed by lopdf.
//!
//! Bitmaps come in as data URIs; documents come out as PDF bytes. A single
//! bitmap can become one full-bleed page, or a tall bitmap of flowing content
//! can be cut into as many pages as it needs.

mod builder;
mod xobject;
pub mod paginate;
mod writer;

pub use builder::LopdfDocumentBuilder;
pub use paginate::{BLANK_LUMA_THRESHOLD, plan_slices};
