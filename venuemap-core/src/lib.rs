//! Core domain types and geometry for the venuemap engine.
//!
//! This crate holds the pieces every other crate builds on: validated
//! coordinates and pixel-space values, the [`Hit`] model, the shared
//! [`EngineError`], distance and projection maths in [`geo_math`], region
//! tests in [`boundary`] and the U.S. state reference set in [`states`].
//!
//! All operations are synchronous pure functions. Static tables are
//! read-only constants.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod hit;
mod model;

pub mod boundary;
pub mod geo_math;
pub mod states;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use error::{EngineError, ErrorKind, HitError};
pub use hit::{Hit, MatchAttributes};
pub use model::{
    GeoPoint, MAX_LATITUDE, MAX_LONGITUDE, Segment, Viewport, WorldPixel, validate_lat_lng,
};
