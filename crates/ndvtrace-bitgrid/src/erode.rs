use crate::grid::BitGrid;

/// Sliding window over three consecutive rows of a [`BitGrid`].
///
/// The window keeps snapshots of the rows above, at and below the row being
/// processed, so the grid can be written in place while the neighbourhood is
/// still read from the values the grid had before the pass. Rows outside the
/// grid read as unset.
#[derive(Debug)]
pub struct RowWindow {
    above: Vec<bool>,
    current: Vec<bool>,
    below: Vec<bool>,
}

impl RowWindow {
    /// Create a window positioned just before the first row of `grid`.
    pub fn new(grid: &BitGrid) -> Self {
        let width = grid.width();
        let mut below = vec![false; width];
        if grid.height() > 0 {
            grid.read_row(0, &mut below);
        }
        Self {
            above: vec![false; width],
            current: vec![false; width],
            below,
        }
    }

    /// Move the window down so that `y` becomes the current row.
    ///
    /// Rows are rotated: the current row becomes the row above and the row
    /// below becomes current. Only the new row below is read from `grid`, so
    /// `advance` must be called with consecutive rows starting at 0.
    pub fn advance(&mut self, grid: &BitGrid, y: usize) {
        std::mem::swap(&mut self.above, &mut self.current);
        std::mem::swap(&mut self.current, &mut self.below);

        if y + 1 < grid.height() {
            grid.read_row(y + 1, &mut self.below);
        } else {
            self.below.fill(false);
        }
    }

    /// Snapshot of the current row.
    pub fn current(&self) -> &[bool] {
        &self.current
    }

    /// Whether the pixel at column `x` of the current row survives erosion.
    ///
    /// A pixel survives if it is set and two consecutive pixels of its
    /// 8-neighbourhood, walking around it, are set.
    pub fn survives(&self, x: usize) -> bool {
        if !self.current[x] {
            return false;
        }

        let width = self.current.len();
        let left = |row: &[bool]| x > 0 && row[x - 1];
        let right = |row: &[bool]| x + 1 < width && row[x + 1];

        let ul = left(&self.above);
        let u = self.above[x];
        let ur = right(&self.above);
        let l = left(&self.current);
        let r = right(&self.current);
        let ll = left(&self.below);
        let d = self.below[x];
        let lr = right(&self.below);

        (ul && u)
            || (u && ur)
            || (ur && r)
            || (r && lr)
            || (lr && d)
            || (d && ll)
            || (ll && l)
            || (l && ul)
    }
}

impl BitGrid {
    /// Remove the pixels that are only weakly connected to the region.
    ///
    /// A set pixel is cleared unless two consecutive neighbours around it are
    /// also set. Neighbours outside the grid count as unset. The pass is
    /// computed from the values before erosion, using a three row
    /// [`RowWindow`] as the only extra memory.
    ///
    /// # Returns
    ///
    /// The number of pixels that were cleared.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndvtrace_bitgrid::BitGrid;
    ///
    /// let mut grid = BitGrid::new(5, 5).unwrap();
    /// // a lonely pixel does not survive
    /// grid.set(2, 2, true);
    /// assert_eq!(grid.erode(), 1);
    /// assert_eq!(grid.count_ones(), 0);
    /// ```
    pub fn erode(&mut self) -> usize {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return 0;
        }

        let mut window = RowWindow::new(self);
        let mut cleared = 0;

        for y in 0..height {
            window.advance(self, y);
            for x in 0..width {
                if window.current()[x] && !window.survives(x) {
                    self.set(x, y, false);
                    cleared += 1;
                }
            }
        }

        log::debug!("erosion cleared {} pixels of a {} grid", cleared, self.size());

        cleared
    }
}
