/// Receives a sparse preview of a raster scan.
///
/// Only pixels whose coordinates are multiples of the stride are plotted.
pub trait DebugPlot {
    /// Horizontal and vertical sampling stride, in pixels.
    fn stride(&self) -> (usize, usize);

    /// Paint the pixel at `(x, y)`.
    fn plot_point(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8);
}

/// Preview colour of a raw sample value.
///
/// Values are compressed into a bright cyan-ish ramp, `50 + value / 3`
/// clamped to `50..=254`, with the red channel at three quarters.
///
/// # Examples
///
/// ```
/// use ndvtrace_mask::debug_color;
///
/// assert_eq!(debug_color(0.0), [37, 50, 50]);
/// assert_eq!(debug_color(300.0), [112, 150, 150]);
/// assert_eq!(debug_color(1e9), [190, 254, 254]);
/// ```
pub fn debug_color(value: f64) -> [u8; 3] {
    // truncation, NaN becomes 0
    let v = (50 + (value as i64) / 3).clamp(50, 254);
    let r = (v as f64 * 0.75) as u8;
    [r, v as u8, v as u8]
}

/// Optional observers of a raster scan.
///
/// Both observers are passive: they never influence the produced mask.
#[derive(Default)]
pub struct ScanObservers<'a> {
    /// receives a preview of the raster and of the excluded pixels.
    pub debug_plot: Option<&'a mut dyn DebugPlot>,
    /// receives the fraction of work done, increasing from 0 to 1.
    pub progress: Option<&'a mut dyn FnMut(f64)>,
}

impl ScanObservers<'_> {
    /// Report the fraction of work done.
    pub fn report(&mut self, fraction: f64) {
        if let Some(progress) = self.progress.as_deref_mut() {
            progress(fraction.clamp(0.0, 1.0));
        }
    }

    /// Debug plot stride, if a plot is attached. A zero stride counts as 1.
    pub fn stride(&self) -> Option<(usize, usize)> {
        self.debug_plot
            .as_deref()
            .map(|plot| {
                let (sx, sy) = plot.stride();
                (sx.max(1), sy.max(1))
            })
    }

    /// Plot a point on the attached debug plot, if any.
    pub fn plot(&mut self, x: usize, y: usize, [r, g, b]: [u8; 3]) {
        if let Some(plot) = self.debug_plot.as_deref_mut() {
            plot.plot_point(x, y, r, g, b);
        }
    }
}

impl std::fmt::Debug for ScanObservers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanObservers")
            .field("debug_plot", &self.debug_plot.is_some())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        points: Vec<(usize, usize, [u8; 3])>,
    }

    impl DebugPlot for Recorder {
        fn stride(&self) -> (usize, usize) {
            (0, 2)
        }

        fn plot_point(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
            self.points.push((x, y, [r, g, b]));
        }
    }

    #[test]
    fn colors() {
        assert_eq!(debug_color(-100.0), [37, 50, 50]);
        assert_eq!(debug_color(f64::NAN), [37, 50, 50]);
        assert_eq!(debug_color(255.0), [101, 135, 135]);
    }

    #[test]
    fn observers() {
        let mut recorder = Recorder::default();
        let mut fractions = Vec::new();
        let mut record = |f: f64| fractions.push(f);
        {
            let mut observers = ScanObservers {
                debug_plot: Some(&mut recorder),
                progress: Some(&mut record),
            };
            assert_eq!(observers.stride(), Some((1, 2)));
            observers.plot(3, 4, [1, 2, 3]);
            observers.report(0.5);
            observers.report(1.5);
        }
        assert_eq!(recorder.points, vec![(3, 4, [1, 2, 3])]);
        assert_eq!(fractions, vec![0.5, 1.0]);

        let mut none = ScanObservers::default();
        assert_eq!(none.stride(), None);
        none.report(0.1);
    }
}
