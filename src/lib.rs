//! Core of an inpainting editor: draw a selection over an image, turn it into a
//! binary mask and send both to the Flux Fill API.
//!
//! # Pipeline overview
//!
//! 1. **Select**: pointer events on an [`EditorSession`] paint cyan marker pixels onto
//!    an [`OverlaySurface`] sized to the on-screen image (brush, rectangle or lasso).
//! 2. **Synthesize**: every committed edit re-samples the overlay into a [`MaskBuffer`]
//!    at the image's natural resolution (white = inpaint, black = keep).
//! 3. **Validate**: [`MaskValidator`] blocks empty or mis-sized masks before any request.
//! 4. **Generate**: [`Submitter`] posts the request and polls the job until it is ready,
//!    fails or times out.
//!
//! [`Workspace`] ties these together with settings and snapshot persistence.
//!
//! Overlay pixels are straight (non-premultiplied) RGBA8 throughout.
#![forbid(unsafe_code)]

mod config;
mod editor;
mod foundation;
mod generation;
mod mask;
mod persist;
mod raster;
mod source;
mod workspace;

/// `tracing` subscriber setup for binaries.
pub mod logging;

pub use config::{ApiConfig, EditorConfig, InpaintConfig, PollOpts, SessionOpts};
pub use editor::ants::{MARCHING_ANTS_TICK, MarchingAnts};
pub use editor::coords::{PointerInput, map_to_buffer};
pub use editor::lasso::{LassoTrail, lasso_path};
pub use editor::overlay::OverlaySurface;
pub use editor::script::{EditScript, ReplaySummary, ScriptEvent};
pub use editor::session::{EditOutcome, EditorSession};
pub use editor::tools::{BrushMode, Tool};
pub use foundation::core::{BezPath, Canvas, Point, Rect, Rgba8, Vec2};
pub use foundation::data_url::{
    decode_data_url, encode_base64, encode_data_url, strip_data_url_prefix,
};
pub use foundation::error::{InpaintError, InpaintResult};
pub use generation::api::{Delay, HttpInpaintApi, InpaintApi, ThreadSleep};
pub use generation::request::{
    FinetuneParams, GenerationResult, InpaintRequest, JobStatus, StatusResponse, StatusResult,
    SubmitResponse,
};
pub use generation::settings::{GenerationSettings, OutputFormat};
pub use generation::submitter::{GenerationState, Submitter};
pub use mask::classify::{CyanThresholds, PixelClass, classify};
pub use mask::synth::{MaskBuffer, MaskStats, MaskSynthesizer};
pub use mask::validate::MaskValidator;
pub use persist::clock::{Clock, FixedClock, SystemClock};
pub use persist::store::{
    FileStorage, MemoryStorage, SNAPSHOT_KEY, SessionPersistence, SessionSnapshot,
    SnapshotStorage,
};
pub use raster::composite::Compose;
pub use raster::coverage::{Coverage, DashPattern, Rasterizer, Shape, StrokeStyle};
pub use source::{DEFAULT_DISPLAY_BOX, OriginalImage, fit_within};
pub use workspace::Workspace;
