//! Umbrella crate for the demos; everything lives in `geoprox-core`.
pub use geoprox_core::*;
