use ndvtrace_geometry::Vertex;

use crate::error::BitGridError;

const WORD_BITS: usize = u64::BITS as usize;

/// Grid size in pixels
///
/// # Examples
///
/// ```
/// use ndvtrace_bitgrid::GridSize;
///
/// let size = GridSize::from([10, 20]);
///
/// assert_eq!(size.width, 10);
/// assert_eq!(size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    /// Width of the grid in pixels
    pub width: usize,
    /// Height of the grid in pixels
    pub height: usize,
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

impl From<[usize; 2]> for GridSize {
    fn from(size: [usize; 2]) -> Self {
        GridSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl GridSize {
    /// Number of pixels in the grid.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }
}

/// A dense boolean grid packed one bit per pixel.
///
/// Rows start on a word boundary so that a row can be scanned without
/// touching its neighbours. Bits past the width of a row are always zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitGrid {
    size: GridSize,
    words_per_row: usize,
    words: Vec<u64>,
}

impl BitGrid {
    /// Create a new grid with every pixel unset.
    ///
    /// # Errors
    ///
    /// Returns [`BitGridError::AllocationFailed`] if the storage does not fit in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndvtrace_bitgrid::BitGrid;
    ///
    /// let mut grid = BitGrid::new(4, 3).unwrap();
    /// assert!(!grid.get(3, 2));
    ///
    /// grid.set(3, 2, true);
    /// assert!(grid.get(3, 2));
    /// assert_eq!(grid.count_ones(), 1);
    /// ```
    pub fn new(width: usize, height: usize) -> Result<Self, BitGridError> {
        let words_per_row = width.div_ceil(WORD_BITS);
        let num_words = words_per_row
            .checked_mul(height)
            .ok_or(BitGridError::AllocationFailed(width, height))?;

        let mut words = Vec::new();
        words
            .try_reserve_exact(num_words)
            .map_err(|_| BitGridError::AllocationFailed(width, height))?;
        words.resize(num_words, 0);

        Ok(Self {
            size: GridSize { width, height },
            words_per_row,
            words,
        })
    }

    /// Create a new grid of the given size with every pixel unset.
    pub fn from_size(size: GridSize) -> Result<Self, BitGridError> {
        Self::new(size.width, size.height)
    }

    /// Width of the grid in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Height of the grid in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Size of the grid in pixels.
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    fn locate(&self, x: usize, y: usize) -> (usize, u64) {
        debug_assert!(
            x < self.size.width && y < self.size.height,
            "pixel ({x}, {y}) out of bounds for grid of {}",
            self.size
        );
        (
            y * self.words_per_row + x / WORD_BITS,
            1u64 << (x % WORD_BITS),
        )
    }

    /// Value of the pixel at `(x, y)`.
    ///
    /// The caller must guarantee `x < width` and `y < height`. This is only
    /// checked in debug builds; out of range coordinates may read another
    /// pixel or panic. Use [`BitGrid::get_checked`] otherwise.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        let (idx, mask) = self.locate(x, y);
        self.words[idx] & mask != 0
    }

    /// Set the pixel at `(x, y)`.
    ///
    /// Same precondition as [`BitGrid::get`].
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        let (idx, mask) = self.locate(x, y);
        if value {
            self.words[idx] |= mask;
        } else {
            self.words[idx] &= !mask;
        }
    }

    /// Value of the pixel at `(x, y)`, or `None` outside of the grid.
    pub fn get_checked(&self, x: usize, y: usize) -> Option<bool> {
        (x < self.size.width && y < self.size.height).then(|| self.get(x, y))
    }

    /// Unset every pixel.
    pub fn zero(&mut self) {
        self.words.fill(0);
    }

    /// Number of set pixels.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Copy the row `y` into `out`, one `bool` per pixel.
    pub fn read_row(&self, y: usize, out: &mut [bool]) {
        debug_assert_eq!(out.len(), self.size.width);
        for (x, px) in out.iter_mut().enumerate() {
            *px = self.get(x, y);
        }
    }

    /// Iterate over the coordinates of the set pixels in row major order.
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let words_per_row = self.words_per_row.max(1);
        self.words
            .iter()
            .enumerate()
            .flat_map(move |(idx, &word)| {
                let y = idx / words_per_row;
                let x0 = (idx % words_per_row) * WORD_BITS;
                SetBits(word).map(move |bit| (x0 + bit, y))
            })
    }

    /// Mean position of the set pixels.
    ///
    /// # Errors
    ///
    /// Returns [`BitGridError::EmptyGrid`] if no pixel is set.
    pub fn centroid(&self) -> Result<Vertex, BitGridError> {
        let mut accum_x: u128 = 0;
        let mut accum_y: u128 = 0;
        let mut count: u128 = 0;
        for (x, y) in self.iter_set() {
            accum_x += x as u128;
            accum_y += y as u128;
            count += 1;
        }

        if count == 0 {
            return Err(BitGridError::EmptyGrid);
        }

        Ok(Vertex::new(
            accum_x as f64 / count as f64,
            accum_y as f64 / count as f64,
        ))
    }
}

/// Positions of the set bits of a word, lowest first.
struct SetBits(u64);

impl Iterator for SetBits {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(bit)
    }
}
