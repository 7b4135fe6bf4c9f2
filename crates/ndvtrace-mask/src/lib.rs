#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the mask module.
pub mod error;

/// raster sources and sample types.
pub mod source;

/// no-data value definitions and predicates.
pub mod ndv;

/// progress and debug plot observers of a raster scan.
pub mod observe;

/// mask construction from rasters.
pub mod builder;

/// whole band reads into 8-bit buffers.
pub mod read8;

pub use crate::builder::{bitgrid_for_8bit_raster, bitgrid_for_dataset, MaskBuilder};
pub use crate::error::MaskError;
pub use crate::ndv::{NdvDef, NdvInterval, NdvPredicate, NdvSlab};
pub use crate::observe::{debug_color, DebugPlot, ScanObservers};
pub use crate::read8::{read_raster_8bit, ValueHistogram};
pub use crate::source::{BandData, InMemoryRaster, RasterSource, Sample, SampleType, TileWindow};
