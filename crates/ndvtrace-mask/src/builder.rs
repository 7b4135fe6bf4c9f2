use ndvtrace_bitgrid::{BitGrid, GridSize};

use crate::{
    error::MaskError,
    ndv::NdvPredicate,
    observe::{debug_color, DebugPlot, ScanObservers},
    source::{RasterSource, Sample, SampleType, TileWindow},
};

/// Mask of the pixels of an 8-bit image equal to `wanted`.
///
/// # Arguments
///
/// * `size` - The size of the image in pixels.
/// * `raster` - The pixels of the image, row major.
/// * `wanted` - The value of the pixels to select.
///
/// # Errors
///
/// Returns [`MaskError::BufferSizeMismatch`] if `raster` does not hold one byte per pixel.
///
/// # Examples
///
/// ```
/// use ndvtrace_mask::bitgrid_for_8bit_raster;
///
/// let mask = bitgrid_for_8bit_raster([3, 1].into(), &[7, 1, 7], 7).unwrap();
///
/// assert!(mask.get(0, 0));
/// assert!(!mask.get(1, 0));
/// assert!(mask.get(2, 0));
/// ```
pub fn bitgrid_for_8bit_raster(
    size: GridSize,
    raster: &[u8],
    wanted: u8,
) -> Result<BitGrid, MaskError> {
    if raster.len() != size.num_pixels() {
        return Err(MaskError::BufferSizeMismatch(
            raster.len(),
            size.num_pixels(),
        ));
    }

    let mut mask = BitGrid::from_size(size)?;
    if size.width == 0 {
        return Ok(mask);
    }

    for (y, row) in raster.chunks_exact(size.width).enumerate() {
        for (x, &px) in row.iter().enumerate() {
            mask.set(x, y, px == wanted);
        }
    }

    Ok(mask)
}

/// Check that every band of the list exists in a raster with `band_count` bands.
pub(crate) fn validate_band(band: usize, band_count: usize) -> Result<(), MaskError> {
    if band < 1 || band > band_count {
        return Err(MaskError::BandOutOfRange(band, band_count));
    }
    Ok(())
}

/// Builds the valid-data mask of a multi-band raster.
///
/// Bands are scanned one after the other, tile by tile, in their native
/// tiling. The first band of the list seeds the mask with its valid pixels.
/// Each following band then either adds its valid pixels (union) or, when
/// the predicate is inverted, removes its no-data pixels (intersection).
///
/// # Examples
///
/// ```
/// use ndvtrace_mask::{BandData, InMemoryRaster, MaskBuilder, NdvDef};
///
/// let mut raster = InMemoryRaster::new([2, 1].into(), (2, 1))
///     .with_band(BandData::U8(vec![0, 9]))
///     .unwrap();
/// let ndv = NdvDef::from_values(&[0.0]);
///
/// let mut fractions = Vec::new();
/// let mut progress = |f: f64| fractions.push(f);
/// let mask = MaskBuilder::new(&ndv)
///     .with_progress(&mut progress)
///     .build(&mut raster, &[1])
///     .unwrap();
///
/// assert!(!mask.get(0, 0));
/// assert!(mask.get(1, 0));
/// assert_eq!(fractions.last(), Some(&1.0));
/// ```
pub struct MaskBuilder<'a, P: NdvPredicate> {
    ndv: &'a P,
    observers: ScanObservers<'a>,
}

impl<'a, P: NdvPredicate> MaskBuilder<'a, P> {
    /// Create a builder classifying samples with `ndv`.
    pub fn new(ndv: &'a P) -> Self {
        Self {
            ndv,
            observers: ScanObservers::default(),
        }
    }

    /// Attach a debug plot receiving a preview of the first band and of the
    /// excluded pixels.
    pub fn with_debug_plot(mut self, plot: &'a mut dyn DebugPlot) -> Self {
        self.observers.debug_plot = Some(plot);
        self
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, progress: &'a mut dyn FnMut(f64)) -> Self {
        self.observers.progress = Some(progress);
        self
    }

    /// Scan the bands of `band_list` and build the mask.
    ///
    /// # Arguments
    ///
    /// * `source` - The raster to read.
    /// * `band_list` - The bands to combine, numbered from 1, in order.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::BandOutOfRange`] before reading anything if a band
    /// does not exist, and propagates tile read and predicate errors. No
    /// partial mask is returned.
    pub fn build<S: RasterSource + ?Sized>(
        &mut self,
        source: &mut S,
        band_list: &[usize],
    ) -> Result<BitGrid, MaskError> {
        if band_list.is_empty() {
            return Err(MaskError::EmptyBandList);
        }

        let band_count = source.band_count();
        for &band in band_list {
            validate_band(band, band_count)?;
        }

        let size = GridSize {
            width: source.width(),
            height: source.height(),
        };
        log::info!(
            "Reading {} bands of size {} (raster has {} bands)",
            band_list.len(),
            size,
            band_count
        );

        let mut mask = BitGrid::from_size(size)?;

        for (band_pos, &band) in band_list.iter().enumerate() {
            let scan = BandScan {
                band,
                band_pos,
                num_bands: band_list.len(),
                size,
            };
            match source.sample_type(band) {
                SampleType::U8 => self.scan_band::<u8, S>(source, &mut mask, &scan)?,
                SampleType::F64 => self.scan_band::<f64, S>(source, &mut mask, &scan)?,
            }
        }

        if let Some((stride_x, stride_y)) = self.observers.stride() {
            for y in (0..size.height).step_by(stride_y) {
                for x in (0..size.width).step_by(stride_x) {
                    if !mask.get(x, y) {
                        self.observers.plot(x, y, [0, 0, 0]);
                    }
                }
            }
        }

        self.observers.report(1.0);

        Ok(mask)
    }

    fn scan_band<T: Sample, S: RasterSource + ?Sized>(
        &mut self,
        source: &mut S,
        mask: &mut BitGrid,
        scan: &BandScan,
    ) -> Result<(), MaskError> {
        let (block_w, block_h) = source.block_size(scan.band);
        if block_w == 0 || block_h == 0 {
            return Err(MaskError::InvalidBlockSize(scan.band));
        }

        log::debug!(
            "band {}: block size = {},{}, sample type = {:?}",
            scan.band,
            block_w,
            block_h,
            T::SAMPLE_TYPE
        );

        let GridSize { width, height } = scan.size;
        let block_w = block_w.min(width.max(1));
        let block_h = block_h.min(height.max(1));

        let mut tile = vec![T::default(); block_w * block_h];
        let mut row_ndv = vec![false; block_w];
        let invert = self.ndv.is_invert();
        let stride = if scan.band_pos == 0 {
            self.observers.stride()
        } else {
            None
        };

        for tile_y in (0..height).step_by(block_h) {
            let tile_h = block_h.min(height - tile_y);
            for tile_x in (0..width).step_by(block_w) {
                let tile_w = block_w.min(width - tile_x);

                self.observers.report(scan.progress(tile_x, tile_y, tile_h));

                let window = TileWindow {
                    x: tile_x,
                    y: tile_y,
                    width: tile_w,
                    height: tile_h,
                };
                let buf = &mut tile[..window.num_pixels()];
                T::read_tile(&mut *source, scan.band, window, buf)?;

                let flags = &mut row_ndv[..tile_w];
                for (j, row) in buf.chunks_exact(tile_w).enumerate() {
                    let y = tile_y + j;

                    self.ndv.classify_row(scan.band_pos, row, flags)?;

                    if let Some((stride_x, stride_y)) = stride {
                        if y % stride_y == 0 {
                            for (i, &sample) in row.iter().enumerate() {
                                let x = tile_x + i;
                                if x % stride_x == 0 {
                                    self.observers.plot(x, y, debug_color(sample.as_()));
                                }
                            }
                        }
                    }

                    for (i, &is_ndv) in flags.iter().enumerate() {
                        let x = tile_x + i;
                        if scan.band_pos == 0 {
                            mask.set(x, y, !is_ndv);
                        } else if invert {
                            if is_ndv {
                                mask.set(x, y, false);
                            }
                        } else if !is_ndv {
                            mask.set(x, y, true);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Position of one band scan within a whole build.
struct BandScan {
    band: usize,
    band_pos: usize,
    num_bands: usize,
    size: GridSize,
}

impl BandScan {
    /// Fraction of the build done when the tile at `(tile_x, tile_y)` starts.
    fn progress(&self, tile_x: usize, tile_y: usize, tile_h: usize) -> f64 {
        let GridSize { width, height } = self.size;
        let done = self.band_pos * width * height + tile_y * width + tile_x * tile_h;
        let total = self.num_bands * width * height;
        if total == 0 {
            return 0.0;
        }
        done as f64 / total as f64
    }
}

/// Build the valid-data mask of `band_list` without observers.
///
/// See [`MaskBuilder::build`].
pub fn bitgrid_for_dataset<S: RasterSource + ?Sized, P: NdvPredicate>(
    source: &mut S,
    band_list: &[usize],
    ndv: &P,
) -> Result<BitGrid, MaskError> {
    MaskBuilder::new(ndv).build(source, band_list)
}
