use crate::{
    builder::validate_band,
    error::MaskError,
    observe::{debug_color, ScanObservers},
    source::{RasterSource, Sample, SampleType, TileWindow},
};

/// Number of pixels of each byte value in a raster.
#[derive(Clone, PartialEq, Eq)]
pub struct ValueHistogram {
    counts: [usize; 256],
}

impl Default for ValueHistogram {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

impl ValueHistogram {
    /// Count one more pixel of value `value`.
    pub fn add(&mut self, value: u8) {
        self.counts[value as usize] += 1;
    }

    /// Number of pixels of value `value`.
    pub fn count(&self, value: u8) -> usize {
        self.counts[value as usize]
    }

    /// Whether at least one pixel has value `value`.
    pub fn contains(&self, value: u8) -> bool {
        self.count(value) > 0
    }

    /// The values present in the raster, in increasing order.
    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&v| self.contains(v))
    }

    /// Number of distinct values present.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Whether no pixel was counted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of pixels counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl std::fmt::Debug for ValueHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.values().map(|v| (v, self.count(v))))
            .finish()
    }
}

/// Read a whole band as bytes and count the values it uses.
///
/// Floating point bands are rounded and saturated to `0..=255`, with a
/// warning. The scan reports progress and feeds the debug plot the same
/// way a mask build does.
///
/// # Arguments
///
/// * `source` - The raster to read.
/// * `band` - The band to read, numbered from 1.
/// * `observers` - Progress and debug plot observers.
///
/// # Returns
///
/// The pixels of the band, row major, and the histogram of their values.
///
/// # Examples
///
/// ```
/// use ndvtrace_mask::{read_raster_8bit, BandData, InMemoryRaster, ScanObservers};
///
/// let mut raster = InMemoryRaster::new([3, 1].into(), (3, 1))
///     .with_band(BandData::U8(vec![4, 2, 4]))
///     .unwrap();
///
/// let (pixels, histogram) =
///     read_raster_8bit(&mut raster, 1, &mut ScanObservers::default()).unwrap();
///
/// assert_eq!(pixels, vec![4, 2, 4]);
/// assert_eq!(histogram.count(4), 2);
/// assert_eq!(histogram.values().collect::<Vec<_>>(), vec![2, 4]);
/// ```
pub fn read_raster_8bit<S: RasterSource + ?Sized>(
    source: &mut S,
    band: usize,
    observers: &mut ScanObservers,
) -> Result<(Vec<u8>, ValueHistogram), MaskError> {
    validate_band(band, source.band_count())?;

    match source.sample_type(band) {
        SampleType::U8 => read_band::<u8, S>(source, band, observers),
        SampleType::F64 => {
            log::warn!(
                "band {} is not 8-bit, values are rounded and clamped to 0..=255",
                band
            );
            read_band::<f64, S>(source, band, observers)
        }
    }
}

fn read_band<T: Sample, S: RasterSource + ?Sized>(
    source: &mut S,
    band: usize,
    observers: &mut ScanObservers,
) -> Result<(Vec<u8>, ValueHistogram), MaskError> {
    let (width, height) = (source.width(), source.height());
    let (block_w, block_h) = source.block_size(band);
    if block_w == 0 || block_h == 0 {
        return Err(MaskError::InvalidBlockSize(band));
    }
    let block_w = block_w.min(width.max(1));
    let block_h = block_h.min(height.max(1));

    log::info!("Reading band {} of size {}x{} as bytes", band, width, height);

    let mut pixels = vec![0u8; width * height];
    let mut histogram = ValueHistogram::default();
    let mut tile = vec![T::default(); block_w * block_h];
    let stride = observers.stride();
    let total = (width * height) as f64;

    for tile_y in (0..height).step_by(block_h) {
        let tile_h = block_h.min(height - tile_y);
        for tile_x in (0..width).step_by(block_w) {
            let tile_w = block_w.min(width - tile_x);

            observers.report((tile_y * width + tile_x * tile_h) as f64 / total);

            let window = TileWindow {
                x: tile_x,
                y: tile_y,
                width: tile_w,
                height: tile_h,
            };
            let buf = &mut tile[..window.num_pixels()];
            T::read_tile(&mut *source, band, window, buf)?;

            for (j, row) in buf.chunks_exact(tile_w).enumerate() {
                let y = tile_y + j;
                let start = y * width + tile_x;
                for (i, (dst, &sample)) in pixels[start..start + tile_w]
                    .iter_mut()
                    .zip(row)
                    .enumerate()
                {
                    let value = sample.to_u8_lossy();
                    *dst = value;
                    histogram.add(value);

                    if let Some((stride_x, stride_y)) = stride {
                        let x = tile_x + i;
                        if x % stride_x == 0 && y % stride_y == 0 {
                            observers.plot(x, y, debug_color(f64::from(value)));
                        }
                    }
                }
            }
        }
    }

    observers.report(1.0);

    Ok((pixels, histogram))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        observe::DebugPlot,
        source::{BandData, InMemoryRaster},
    };

    struct Counter(usize);

    impl DebugPlot for Counter {
        fn stride(&self) -> (usize, usize) {
            (2, 1)
        }

        fn plot_point(&mut self, _x: usize, _y: usize, _r: u8, _g: u8, _b: u8) {
            self.0 += 1;
        }
    }

    #[test]
    fn reads_tiles_in_place() -> Result<(), MaskError> {
        let data: Vec<u8> = (0..15).map(|i| (i % 4) as u8).collect();
        let mut raster =
            InMemoryRaster::new([5, 3].into(), (2, 2)).with_band(BandData::U8(data.clone()))?;

        let (pixels, histogram) =
            read_raster_8bit(&mut raster, 1, &mut ScanObservers::default())?;
        assert_eq!(pixels, data);
        assert_eq!(histogram.len(), 4);
        assert_eq!(histogram.total(), 15);
        assert_eq!(histogram.count(0), 4);
        assert_eq!(histogram.count(3), 3);
        assert!(!histogram.contains(4));
        Ok(())
    }

    #[test]
    fn float_band_is_clamped() -> Result<(), MaskError> {
        let mut raster = InMemoryRaster::new([4, 1].into(), (4, 1))
            .with_band(BandData::F64(vec![-2.0, 2.6, 999.0, f64::NAN]))?;

        let (pixels, histogram) =
            read_raster_8bit(&mut raster, 1, &mut ScanObservers::default())?;
        assert_eq!(pixels, vec![0, 3, 255, 0]);
        assert_eq!(histogram.values().collect::<Vec<_>>(), vec![0, 3, 255]);
        assert_eq!(histogram.count(0), 2);
        Ok(())
    }

    #[test]
    fn observers_are_fed() -> Result<(), MaskError> {
        let mut raster =
            InMemoryRaster::new([3, 2].into(), (1, 1)).with_band(BandData::U8(vec![1; 6]))?;
        let mut counter = Counter(0);
        let mut fractions = Vec::new();
        let mut progress = |f: f64| fractions.push(f);
        {
            let mut observers = ScanObservers {
                debug_plot: Some(&mut counter),
                progress: Some(&mut progress),
            };
            read_raster_8bit(&mut raster, 1, &mut observers)?;
        }
        // columns 0 and 2 of both rows
        assert_eq!(counter.0, 4);
        assert_eq!(fractions.len(), 7);
        assert_eq!(fractions.last(), Some(&1.0));
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn band_out_of_range() -> Result<(), MaskError> {
        let mut raster =
            InMemoryRaster::new([1, 1].into(), (1, 1)).with_band(BandData::U8(vec![0]))?;
        assert_eq!(
            read_raster_8bit(&mut raster, 2, &mut ScanObservers::default()),
            Err(MaskError::BandOutOfRange(2, 1))
        );
        Ok(())
    }

    #[test]
    fn empty_histogram() {
        let histogram = ValueHistogram::default();
        assert!(histogram.is_empty());
        assert_eq!(histogram.values().count(), 0);
        assert_eq!(format!("{histogram:?}"), "{}");
    }
}
