use ndvtrace_bitgrid::BitGridError;

/// An error type for the mask module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MaskError {
    /// Error when a band index is outside of `1..=band_count`.
    #[error("Band index ({0}) out of range, the raster has {1} bands")]
    BandOutOfRange(usize, usize),

    /// Error when no band is selected.
    #[error("No band selected")]
    EmptyBandList,

    /// Error when the length of a pixel buffer does not match the raster size.
    #[error("Data length ({0}) does not match the raster size ({1})")]
    BufferSizeMismatch(usize, usize),

    /// Error when a no-data slab has no range for the requested band.
    #[error("No-data definition has no range for band index {0} ({1} ranges defined)")]
    NdvBandMismatch(usize, usize),

    /// Error when a no-data interval cannot be parsed.
    #[error("Invalid no-data interval: {0}")]
    InvalidNdvInterval(String),

    /// Error when a band reports an empty block size.
    #[error("Band {0} has an empty block size")]
    InvalidBlockSize(usize),

    /// Error when a tile cannot be read from the source.
    #[error("Failed to read tile. {0}")]
    TileRead(String),

    /// Error when the mask cannot be allocated.
    #[error(transparent)]
    BitGrid(#[from] BitGridError),
}
