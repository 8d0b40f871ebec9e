//! The tone data model shared by both front-end parsers and the renderer.

use crate::format::Format;

/// One frequency/amplitude/phase/duration quadruple -- the atomic rendering
/// unit. `hz` may be negative (a carrier offset below the reference
/// frequency). `db` below `-24` is treated by the renderer as "continue the
/// previous frequency" rather than as a literal attenuation (see
/// [`crate::render`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tone {
    pub hz: i32,
    pub db: i32,
    pub ph: i32,
    pub us: i32,
}

impl Tone {
    pub fn new(hz: i32, db: i32, ph: i32, us: i32) -> Self {
        Tone { hz, db, ph, us }
    }

    /// The zero tone: `us == 0 && hz == 0`. Tone lists are conventionally
    /// terminated by one of these, though the renderer also accepts a slice
    /// with no terminator present.
    pub fn is_end(&self) -> bool {
        self.us == 0 && self.hz == 0
    }
}

/// The zero/terminator tone.
pub const TONE_END: Tone = Tone { hz: 0, db: 0, ph: 0, us: 0 };

/// Returns `tones` up to (but excluding) its first terminator tone, if any.
pub(crate) fn active_tones(tones: &[Tone]) -> &[Tone] {
    match tones.iter().position(Tone::is_end) {
        Some(end) => &tones[..end],
        None => tones,
    }
}

/// Sum of `us` across a tone list. Pure, allocation-free: callable before
/// any rendering or buffer sizing.
pub fn length_us(tones: &[Tone]) -> u64 {
    active_tones(tones).iter().map(|t| t.us.max(0) as u64).sum()
}

/// Sum of `floor(us * sample_rate / 1e6)` across a tone list, i.e. the exact
/// sample count [`render_to_buffer`](crate::render::render_to_buffer) would
/// produce, without doing any rendering.
pub fn length_samples(sample_rate: f64, tones: &[Tone]) -> u64 {
    active_tones(tones)
        .iter()
        .map(|t| samples_for_duration(t.us, sample_rate))
        .sum()
}

/// Number of samples a tone of `us` microseconds produces at `sample_rate`.
#[inline]
pub(crate) fn samples_for_duration(us: i32, sample_rate: f64) -> u64 {
    ((us.max(0) as f64) * sample_rate / 1_000_000.0) as u64
}

/// Render-time parameters, read-only for the duration of one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSpec {
    pub sample_rate_hz: f64,
    pub noise_floor_db: f64,
    pub noise_signal_db: f64,
    pub gain_db: f64,
    pub filter_wc: f64,
    pub step_width_us: u32,
    pub sample_format: Format,
    /// `0.0` means "use the format's default full scale".
    pub full_scale: f64,
    /// Flush granularity in bytes. For packed 12-bit formats this is
    /// rounded down to a multiple of 3 at render init.
    pub frame_size: usize,
}

impl Default for RenderSpec {
    fn default() -> Self {
        RenderSpec {
            sample_rate_hz: 1_000_000.0,
            noise_floor_db: -36.0,
            noise_signal_db: -24.0,
            gain_db: -3.0,
            filter_wc: 0.1,
            step_width_us: 50,
            sample_format: Format::Cu8,
            full_scale: 0.0,
            frame_size: 16384,
        }
    }
}

/// Result of a render: how much signal was produced and how long it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub microseconds: u64,
    pub samples: u64,
    pub elapsed: std::time::Duration,
    /// `true` if the render stopped early because the abort flag was set.
    pub cancelled: bool,
}

/// A thin, `Sync` wrapper around an atomic bool, polled by the renderer
/// between tones (and before every buffer flush) to support graceful
/// cancellation from another thread.
#[derive(Debug, Default)]
pub struct AbortFlag(std::sync::atomic::AtomicBool);

impl AbortFlag {
    pub fn new() -> Self {
        AbortFlag(std::sync::atomic::AtomicBool::new(false))
    }

    pub fn set(&self) {
        self.0.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::Relaxed)
    }
}
