//! # packvis Core
//!
//! Data model and the first two pipeline stages of the rectangle-layout
//! visualizer: the input normalizer, which resolves packer output into a
//! canonical bottom-left, y-up frame, and the scene builder, which turns that
//! geometry into an ordered list of drawable primitives.
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod geometry;
pub mod normalize;
pub mod scene;

pub use error::{Result, Subject, VisError};
pub use geometry::{AnchorMode, BBox, ContainerShape, Point, Rectangle};
pub use normalize::{normalize, LayoutInput, NormalizedRect, NormalizedScene};
pub use scene::{build, Primitive, Scene, SceneSummary};
