//! The tone renderer: walks a tone list, driving the NCO, ramp, filter,
//! noise and codec while preserving phase/filter state across tone
//! boundaries, and flushing quantized frames to a [`Sink`].

use crate::biquad::{Biquad, BiquadCoefs, RampTable};
use crate::error::{Error, Result};
use crate::format::{self, Format};
use crate::nco;
use crate::noise::{noise_pp_level, sine_pk_level, UniformNoise};
use crate::sink::{BufferSink, Sink};
use crate::tone::{active_tones, samples_for_duration, AbortFlag, RenderSpec, RenderStats, Tone};

/// `db` values at or below this are a "continuation of previous frequency"
/// marker rather than a literal attenuation (see spec Design Notes, Open
/// Question 1).
const SILENCE_THRESHOLD_DB: i32 = -24;

struct RenderState {
    sample_rate: f64,
    noise_floor: f64,
    noise_signal: f64,
    gain: f64,
    format: Format,
    full_scale: f64,
    frame_size: usize,

    phi: u32,
    g_db: i32,
    g_hz: i32,

    ramp: RampTable,
    filter_i: Biquad,
    filter_q: Biquad,
    noise: UniformNoise,

    frame: Vec<u8>,
}

impl RenderState {
    fn new(spec: &RenderSpec) -> Result<Self> {
        if spec.sample_rate_hz == 0.0 {
            return Err(Error::ZeroSampleRate);
        }
        if (spec.step_width_us as i64) < 0 {
            return Err(Error::NegativeStepWidth(spec.step_width_us as i64));
        }

        let full_scale = if spec.full_scale == 0.0 {
            spec.sample_format.default_full_scale()
        } else {
            spec.full_scale
        };

        let unit = spec.sample_format.bytes_per_pair();
        let mut frame_size = spec.frame_size;
        if frame_size % unit != 0 {
            let adjusted = frame_size - frame_size % unit;
            log::warn!("adjusting frame size from {frame_size} to {adjusted} bytes to align to the {unit}-byte sample unit");
            frame_size = adjusted;
        }

        let coefs = BiquadCoefs::butterworth_lowpass(spec.filter_wc);

        Ok(RenderState {
            sample_rate: spec.sample_rate_hz,
            noise_floor: noise_pp_level(spec.noise_floor_db),
            noise_signal: noise_pp_level(spec.noise_signal_db),
            gain: sine_pk_level(spec.gain_db),
            format: spec.sample_format,
            full_scale,
            frame_size,
            phi: 0,
            g_db: -40,
            g_hz: 0,
            ramp: RampTable::new(spec.step_width_us, spec.sample_rate_hz),
            filter_i: Biquad::new(coefs),
            filter_q: Biquad::new(coefs),
            noise: UniformNoise::new(0),
            frame: Vec::with_capacity(frame_size.max(unit)),
        })
    }

    fn maybe_flush(&mut self, sink: &mut dyn Sink) -> Result<()> {
        if self.frame.len() >= self.frame_size {
            self.flush(sink)?;
        }
        Ok(())
    }

    fn flush(&mut self, sink: &mut dyn Sink) -> Result<()> {
        if !self.frame.is_empty() {
            sink.write_all(&self.frame)?;
            self.frame.clear();
        }
        Ok(())
    }

    /// Renders one tone's samples into the frame buffer, flushing as needed.
    fn add_tone(&mut self, tone: &Tone, sink: &mut dyn Sink) -> Result<u64> {
        let hz = if tone.db < SILENCE_THRESHOLD_DB { self.g_hz } else { tone.hz };

        let ph = nco::normalize_degrees(tone.ph);
        if ph != 0 {
            self.phi = self.phi.wrapping_add(nco::phase_from_degrees(ph));
        }

        let d_phi = nco::d_phase(hz, self.sample_rate);
        let new_mag = nco::db_to_mag(tone.db);
        let old_mag = nco::db_to_mag(self.g_db);

        let n = samples_for_duration(tone.us, self.sample_rate);
        let ramp_len = self.ramp.len() as u64;

        for t in 0..n {
            let mag = if t < ramp_len {
                let idx = t as usize;
                self.ramp.step_out[idx] * old_mag + self.ramp.step_in[idx] * new_mag
            } else {
                new_mag
            };

            let mut i = nco::cos_phi(self.phi) * self.gain * mag;
            let mut q = nco::sin_phi(self.phi) * self.gain * mag;
            self.phi = self.phi.wrapping_add(d_phi);

            i += self.noise.next() * self.noise_signal;
            q += self.noise.next() * self.noise_signal;

            i = self.filter_i.tick(i);
            q = self.filter_q.tick(q);

            i += self.noise.next() * self.noise_floor;
            q += self.noise.next() * self.noise_floor;

            format::encode_sample(self.format, i, q, self.full_scale, &mut self.frame);
            self.maybe_flush(sink)?;
        }

        self.g_db = tone.db;
        self.g_hz = hz;

        Ok(n)
    }
}

/// Validates `spec` and renders `tones` to `sink`, polling `abort` between
/// tones. Returns statistics on success or graceful cancellation.
pub fn render_to_sink(
    spec: &RenderSpec,
    tones: &[Tone],
    sink: &mut dyn Sink,
    abort: &AbortFlag,
) -> Result<RenderStats> {
    let start = std::time::Instant::now();
    let mut state = RenderState::new(spec)?;

    let mut total_us: u64 = 0;
    let mut total_samples: u64 = 0;
    let mut cancelled = false;

    for tone in active_tones(tones) {
        if abort.is_set() {
            cancelled = true;
            break;
        }
        total_samples += state.add_tone(tone, sink)?;
        total_us += tone.us.max(0) as u64;
    }

    state.flush(sink)?;
    sink.flush()?;

    Ok(RenderStats {
        microseconds: total_us,
        samples: total_samples,
        elapsed: start.elapsed(),
        cancelled,
    })
}

/// Renders `tones` into a freshly allocated buffer sized exactly to
/// `samples * bytes_per_pair(format)`.
pub fn render_to_buffer(
    spec: &RenderSpec,
    tones: &[Tone],
    abort: &AbortFlag,
) -> Result<(Vec<u8>, RenderStats)> {
    let expected_samples = crate::tone::length_samples(spec.sample_rate_hz, tones);
    let mut sink = BufferSink::new();
    sink.bytes
        .try_reserve_exact(expected_samples as usize * spec.sample_format.bytes_per_pair())
        .map_err(|_| Error::Allocation(expected_samples as usize * spec.sample_format.bytes_per_pair()))?;

    let stats = render_to_sink(spec, tones, &mut sink, abort)?;
    Ok((sink.bytes, stats))
}
