//! Core library for the Beat Collage planner.
//!
//! Given a list of beat timestamps and a pool of images, the crate decides a
//! layout for every group of beats (one full-bleed image, a stacked grid, or a
//! few freely placed images) and produces a timeline of positioned draw
//! instructions. Rendering, encoding and audio playback live elsewhere; the
//! [`render`] module only answers which items are on screen at a given frame.

pub mod cache;
pub mod composition;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod rng;
pub mod schedule;
pub mod timeline;

pub use cache::{TimelineCache, TimelineKey};
pub use composition::{Composition, CompositionProps, FrameScene, Layer, TitleOverlay};
pub use config::{AppConfig, VideoConfig};
pub use error::{CollageError, Result};
pub use layout::{AlternationMemory, CoordsPosition, LayoutCategory, LayoutRules, Orientation};
pub use render::{visible, DrawRect};
pub use schedule::{BeatSchedule, ImagePool};
pub use timeline::{build_timeline, Geometry, RenderItem, Timeline, TimelineBuilder};
