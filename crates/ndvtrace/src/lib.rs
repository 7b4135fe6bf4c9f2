#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use ndvtrace_geometry as geometry;

#[doc(inline)]
pub use ndvtrace_bitgrid as bitgrid;

#[doc(inline)]
pub use ndvtrace_mask as mask;
