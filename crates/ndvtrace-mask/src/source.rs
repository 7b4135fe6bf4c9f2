use ndvtrace_bitgrid::GridSize;
use num_traits::AsPrimitive;

use crate::error::MaskError;

/// Sample representation of a raster band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleType {
    /// unsigned 8-bit samples.
    U8,
    /// double precision floating point samples.
    F64,
}

/// A rectangular region of a raster, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileWindow {
    /// column of the top left pixel.
    pub x: usize,
    /// row of the top left pixel.
    pub y: usize,
    /// width of the window.
    pub width: usize,
    /// height of the window.
    pub height: usize,
}

impl TileWindow {
    /// Number of pixels in the window.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }
}

/// A multi-band raster read one tile at a time.
///
/// Bands are numbered from 1. Implementations wrap the actual raster
/// decoder; the tile size reported by [`RasterSource::block_size`] should
/// follow the storage layout of the underlying file.
pub trait RasterSource {
    /// Width of the raster in pixels.
    fn width(&self) -> usize;

    /// Height of the raster in pixels.
    fn height(&self) -> usize;

    /// Number of bands.
    fn band_count(&self) -> usize;

    /// Native tile size `(width, height)` of a band.
    fn block_size(&self, band: usize) -> (usize, usize);

    /// Sample representation of a band.
    fn sample_type(&self, band: usize) -> SampleType;

    /// Read the pixels of `window` into `buf` as bytes, row major.
    ///
    /// `buf` holds exactly `window.width * window.height` samples.
    fn read_tile_u8(
        &mut self,
        band: usize,
        window: TileWindow,
        buf: &mut [u8],
    ) -> Result<(), MaskError>;

    /// Read the pixels of `window` into `buf` as doubles, row major.
    ///
    /// `buf` holds exactly `window.width * window.height` samples.
    fn read_tile_f64(
        &mut self,
        band: usize,
        window: TileWindow,
        buf: &mut [f64],
    ) -> Result<(), MaskError>;
}

/// A sample type that can be read from a [`RasterSource`].
///
/// Implemented for `u8` and `f64`, the two representations a source exposes.
pub trait Sample: Copy + Default + AsPrimitive<f64> {
    /// The representation tag of this sample type.
    const SAMPLE_TYPE: SampleType;

    /// Read a tile of samples of this type from the source.
    fn read_tile<S: RasterSource + ?Sized>(
        source: &mut S,
        band: usize,
        window: TileWindow,
        buf: &mut [Self],
    ) -> Result<(), MaskError>;

    /// Convert to a byte, rounding and saturating.
    fn to_u8_lossy(self) -> u8;
}

impl Sample for u8 {
    const SAMPLE_TYPE: SampleType = SampleType::U8;

    fn read_tile<S: RasterSource + ?Sized>(
        source: &mut S,
        band: usize,
        window: TileWindow,
        buf: &mut [Self],
    ) -> Result<(), MaskError> {
        source.read_tile_u8(band, window, buf)
    }

    fn to_u8_lossy(self) -> u8 {
        self
    }
}

impl Sample for f64 {
    const SAMPLE_TYPE: SampleType = SampleType::F64;

    fn read_tile<S: RasterSource + ?Sized>(
        source: &mut S,
        band: usize,
        window: TileWindow,
        buf: &mut [Self],
    ) -> Result<(), MaskError> {
        source.read_tile_f64(band, window, buf)
    }

    fn to_u8_lossy(self) -> u8 {
        // NaN maps to 0
        self.round().clamp(0.0, 255.0) as u8
    }
}

/// Pixel data of one band of an [`InMemoryRaster`].
#[derive(Clone, Debug, PartialEq)]
pub enum BandData {
    /// unsigned 8-bit samples.
    U8(Vec<u8>),
    /// double precision samples.
    F64(Vec<f64>),
}

impl BandData {
    fn len(&self) -> usize {
        match self {
            BandData::U8(data) => data.len(),
            BandData::F64(data) => data.len(),
        }
    }
}

/// A [`RasterSource`] over already decoded bands held in memory.
///
/// # Examples
///
/// ```
/// use ndvtrace_mask::{BandData, InMemoryRaster, RasterSource, SampleType};
///
/// let raster = InMemoryRaster::new([2, 2].into(), (2, 1))
///     .with_band(BandData::U8(vec![1, 2, 3, 4]))
///     .unwrap();
///
/// assert_eq!(raster.band_count(), 1);
/// assert_eq!(raster.sample_type(1), SampleType::U8);
/// assert_eq!(raster.block_size(1), (2, 1));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InMemoryRaster {
    size: GridSize,
    block_size: (usize, usize),
    bands: Vec<BandData>,
}

impl InMemoryRaster {
    /// Create a raster without bands.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the raster in pixels.
    /// * `block_size` - The tile size reported for every band.
    pub fn new(size: GridSize, block_size: (usize, usize)) -> Self {
        Self {
            size,
            block_size,
            bands: Vec::new(),
        }
    }

    /// Append a band.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::BufferSizeMismatch`] if the band does not have
    /// one sample per pixel.
    pub fn add_band(&mut self, data: BandData) -> Result<(), MaskError> {
        if data.len() != self.size.num_pixels() {
            return Err(MaskError::BufferSizeMismatch(
                data.len(),
                self.size.num_pixels(),
            ));
        }
        self.bands.push(data);
        Ok(())
    }

    /// Append a band, builder style.
    pub fn with_band(mut self, data: BandData) -> Result<Self, MaskError> {
        self.add_band(data)?;
        Ok(self)
    }

    fn band_data(&self, band: usize) -> Result<&BandData, MaskError> {
        band.checked_sub(1)
            .and_then(|idx| self.bands.get(idx))
            .ok_or(MaskError::BandOutOfRange(band, self.bands.len()))
    }

    fn check_window(&self, window: &TileWindow, buf_len: usize) -> Result<(), MaskError> {
        if window.x + window.width > self.size.width || window.y + window.height > self.size.height
        {
            return Err(MaskError::TileRead(format!(
                "window {:?} outside of raster {}",
                window, self.size
            )));
        }
        if buf_len != window.num_pixels() {
            return Err(MaskError::BufferSizeMismatch(buf_len, window.num_pixels()));
        }
        Ok(())
    }

    fn copy_window<T: Copy, U: Copy>(
        &self,
        src: &[T],
        window: &TileWindow,
        buf: &mut [U],
        convert: impl Fn(T) -> U,
    ) {
        if window.width == 0 {
            return;
        }
        for (j, dst_row) in buf.chunks_exact_mut(window.width).enumerate() {
            let start = (window.y + j) * self.size.width + window.x;
            let src_row = &src[start..start + window.width];
            for (dst, &src) in dst_row.iter_mut().zip(src_row) {
                *dst = convert(src);
            }
        }
    }
}

impl RasterSource for InMemoryRaster {
    fn width(&self) -> usize {
        self.size.width
    }

    fn height(&self) -> usize {
        self.size.height
    }

    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn block_size(&self, _band: usize) -> (usize, usize) {
        self.block_size
    }

    fn sample_type(&self, band: usize) -> SampleType {
        match self.band_data(band) {
            Ok(BandData::F64(_)) => SampleType::F64,
            _ => SampleType::U8,
        }
    }

    fn read_tile_u8(
        &mut self,
        band: usize,
        window: TileWindow,
        buf: &mut [u8],
    ) -> Result<(), MaskError> {
        self.check_window(&window, buf.len())?;
        match self.band_data(band)? {
            BandData::U8(data) => self.copy_window(data, &window, buf, |v| v),
            BandData::F64(data) => self.copy_window(data, &window, buf, f64::to_u8_lossy),
        }
        Ok(())
    }

    fn read_tile_f64(
        &mut self,
        band: usize,
        window: TileWindow,
        buf: &mut [f64],
    ) -> Result<(), MaskError> {
        self.check_window(&window, buf.len())?;
        match self.band_data(band)? {
            BandData::U8(data) => self.copy_window(data, &window, buf, f64::from),
            BandData::F64(data) => self.copy_window(data, &window, buf, |v| v),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster() -> Result<InMemoryRaster, MaskError> {
        InMemoryRaster::new([3, 2].into(), (2, 2))
            .with_band(BandData::U8(vec![0, 1, 2, 3, 4, 5]))?
            .with_band(BandData::F64(vec![0.4, 1.6, -3.0, 300.0, f64::NAN, 5.0]))
    }

    #[test]
    fn reads_windows() -> Result<(), MaskError> {
        let mut raster = raster()?;
        let window = TileWindow {
            x: 1,
            y: 0,
            width: 2,
            height: 2,
        };

        let mut buf = [0u8; 4];
        raster.read_tile_u8(1, window, &mut buf)?;
        assert_eq!(buf, [1, 2, 4, 5]);

        let mut buf = [0f64; 4];
        raster.read_tile_f64(1, window, &mut buf)?;
        assert_eq!(buf, [1.0, 2.0, 4.0, 5.0]);
        Ok(())
    }

    #[test]
    fn converts_float_bands_to_bytes() -> Result<(), MaskError> {
        let mut raster = raster()?;
        let window = TileWindow {
            x: 0,
            y: 0,
            width: 3,
            height: 2,
        };
        let mut buf = [0u8; 6];
        raster.read_tile_u8(2, window, &mut buf)?;
        assert_eq!(buf, [0, 2, 0, 255, 0, 5]);
        Ok(())
    }

    #[test]
    fn sample_types() -> Result<(), MaskError> {
        let raster = raster()?;
        assert_eq!(raster.sample_type(1), SampleType::U8);
        assert_eq!(raster.sample_type(2), SampleType::F64);
        assert_eq!(raster.band_count(), 2);
        Ok(())
    }

    #[test]
    fn rejects_bad_input() -> Result<(), MaskError> {
        let mut raster = raster()?;
        assert_eq!(
            raster.add_band(BandData::U8(vec![0; 5])),
            Err(MaskError::BufferSizeMismatch(5, 6))
        );

        let window = TileWindow {
            x: 2,
            y: 0,
            width: 2,
            height: 1,
        };
        let mut buf = [0u8; 2];
        assert!(matches!(
            raster.read_tile_u8(1, window, &mut buf),
            Err(MaskError::TileRead(_))
        ));

        let window = TileWindow {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        assert_eq!(
            raster.read_tile_u8(3, window, &mut buf[..1]),
            Err(MaskError::BandOutOfRange(3, 2))
        );
        Ok(())
    }
}
