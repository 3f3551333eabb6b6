//! Framewarp is a nearest-pixel frame resampling and geometric warping
//! engine.
//!
//! It maps every output pixel to a source position through one of four
//! spatial mappings, samples the nearest source pixel, and handles the
//! out-of-range case with a border color or a validity mask:
//!
//! 1. **Resize**: per-axis truncating scale mapping, no matrix
//!    ([`resize`], [`resize_in_place`])
//! 2. **Affine**: 2×3 matrix ([`affine`])
//! 3. **Homography**: 3×3 projective matrix with homogeneous divide
//!    ([`homography`], [`homography_mask`], [`covers_input_frame`])
//! 4. **Lookup field**: positions interpolated from a coarse vector grid
//!    ([`lookup`], [`lookup_mask`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate. The fast kernels
//!   are portable blocked/fixed-point code selected via [`Strategy`], with
//!   the scalar kernel as the bit-exact reference.
//! - **Checked preconditions**: buffer geometry, layout compatibility and
//!   transform invertibility are validated at every entry point and surface
//!   as [`WarpError`] in all build configurations.
//! - **Deterministic parallelism**: a [`Worker`] splits the output into
//!   disjoint row bands; results are byte-identical for every thread count.
//! - **Caller-owned memory**: the engine reads and writes through borrowed
//!   views ([`FrameView`], [`FrameViewMut`]) and never caches state.
//!
//! Callers that only know their pixel layout at runtime use the
//! [`Frame`]/[`FrameMut`] dispatch layer (`*_frames` functions), which
//! validates layout compatibility and routes into the same kernels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod transform;
mod warp;
mod worker;

pub use foundation::core::{
    Affine, DataType, FrameBuffer, FrameView, FrameViewMut, OutputOrigin, PixelElement,
    PixelLayout, PixelOrigin, Point, Vec2,
};
pub use foundation::error::{WarpError, WarpResult};
pub use transform::homography::Homography;
pub use transform::lookup::{FieldMode, VectorField};
pub use warp::frames::{
    BorderColor, Frame, FrameData, FrameDataMut, FrameMut, FrameWarpOptions, affine_frames,
    homography_frames, homography_mask_frames, lookup_frames, lookup_mask_frames, resize_frames,
};
pub use warp::{
    Division, Strategy, WarpOptions, affine, covers_input_frame, homography, homography_mask,
    lookup, lookup_mask, resize, resize_in_place,
};
pub use worker::Worker;
