use std::str::FromStr;

use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::{error::MaskError, source::Sample};

/// Decides which samples of a band are no-data.
pub trait NdvPredicate {
    /// Flag every sample of a row that is no-data.
    ///
    /// # Arguments
    ///
    /// * `band_list_index` - Position of the band in the list of selected bands.
    /// * `samples` - The samples of one tile row.
    /// * `ndv` - Output flags, same length as `samples`.
    fn classify_row<T: Sample>(
        &self,
        band_list_index: usize,
        samples: &[T],
        ndv: &mut [bool],
    ) -> Result<(), MaskError>;

    /// Whether the selected bands are intersected instead of united.
    fn is_invert(&self) -> bool;
}

/// A closed range of sample values.
///
/// An interval with a NaN bound matches NaN samples only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NdvInterval {
    /// smallest value of the range.
    pub min: f64,
    /// largest value of the range.
    pub max: f64,
}

impl NdvInterval {
    /// Create an interval, checking that `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, MaskError> {
        if min > max {
            return Err(MaskError::InvalidNdvInterval(format!("{min}..{max}")));
        }
        Ok(Self { min, max })
    }

    /// An interval matching a single value.
    pub fn single(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Whether the value falls in the interval.
    pub fn contains(&self, value: f64) -> bool {
        if self.min.is_nan() || self.max.is_nan() {
            value.is_nan()
        } else {
            value >= self.min && value <= self.max
        }
    }
}

impl FromStr for NdvInterval {
    type Err = MaskError;

    /// Parse `"5"`, `"0..10"` or `"nan"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| MaskError::InvalidNdvInterval(s.to_string()))
        };
        match s.split_once("..") {
            Some((min, max)) => NdvInterval::new(parse(min)?, parse(max)?),
            None => Ok(NdvInterval::single(parse(s)?)),
        }
    }
}

/// One no-data condition, as a range per band.
///
/// A slab with a single range applies it to every band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NdvSlab {
    /// ranges, one per band or a single shared one.
    pub ranges: Vec<NdvInterval>,
}

impl NdvSlab {
    /// Create a slab from its ranges.
    pub fn new(ranges: Vec<NdvInterval>) -> Self {
        Self { ranges }
    }

    /// The range applying to the band at `band_list_index`.
    pub fn range_for_band(&self, band_list_index: usize) -> Result<&NdvInterval, MaskError> {
        let range = if self.ranges.len() == 1 {
            self.ranges.first()
        } else {
            self.ranges.get(band_list_index)
        };
        range.ok_or(MaskError::NdvBandMismatch(
            band_list_index,
            self.ranges.len(),
        ))
    }
}

impl FromStr for NdvSlab {
    type Err = MaskError;

    /// Parse whitespace separated intervals, e.g. `"0 0 0"` or `"0..5 255"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ranges = s
            .split_whitespace()
            .map(NdvInterval::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if ranges.is_empty() {
            return Err(MaskError::InvalidNdvInterval(s.to_string()));
        }
        Ok(Self { ranges })
    }
}

/// No-data definition: a list of slabs and an invert flag.
///
/// A sample is no-data when it falls in the range of some slab. With
/// `invert` set the ranges describe valid data instead, so the flags are
/// negated, and a mask over several bands keeps only the pixels valid in
/// every band.
///
/// # Examples
///
/// ```
/// use ndvtrace_mask::{NdvDef, NdvPredicate};
///
/// let ndv: NdvDef = NdvDef::from_values(&[0.0, 255.0]);
///
/// let mut flags = [false; 4];
/// ndv.classify_row(0, &[0u8, 12, 255, 254], &mut flags).unwrap();
/// assert_eq!(flags, [true, false, true, false]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NdvDef {
    /// no-data conditions.
    pub slabs: Vec<NdvSlab>,
    /// whether the slabs describe valid data instead.
    #[serde(default)]
    pub invert: bool,
}

impl NdvDef {
    /// Create a definition from its slabs.
    pub fn new(slabs: Vec<NdvSlab>, invert: bool) -> Self {
        Self { slabs, invert }
    }

    /// One single-value slab per value, applying to all bands.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            slabs: values
                .iter()
                .map(|&v| NdvSlab::new(vec![NdvInterval::single(v)]))
                .collect(),
            invert: false,
        }
    }

    /// Whether no slab is defined.
    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }
}

impl NdvPredicate for NdvDef {
    fn classify_row<T: Sample>(
        &self,
        band_list_index: usize,
        samples: &[T],
        ndv: &mut [bool],
    ) -> Result<(), MaskError> {
        debug_assert_eq!(samples.len(), ndv.len());
        ndv.fill(false);

        for slab in &self.slabs {
            let range = slab.range_for_band(band_list_index)?;
            for (flag, &sample) in ndv.iter_mut().zip(samples) {
                let value: f64 = sample.as_();
                if range.contains(value) {
                    *flag = true;
                }
            }
        }

        if self.invert {
            ndv.iter_mut().for_each(|flag| *flag = !*flag);
        }

        Ok(())
    }

    fn is_invert(&self) -> bool {
        self.invert
    }
}
