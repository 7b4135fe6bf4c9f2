/// An error type for the bitgrid module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BitGridError {
    /// Error when the grid storage cannot be allocated.
    #[error("Failed to allocate a bit grid of {0} x {1}")]
    AllocationFailed(usize, usize),

    /// Error when an operation needs at least one set pixel.
    #[error("The grid has no set pixels")]
    EmptyGrid,
}
