use iq_render::prelude::*;

#[test]
fn code_text_end_to_end_renders_expected_byte_count() {
    let mut symbols = SymbolTable::new();
    let tones = parse_code("(100000Hz -3dB 1000us)(-100000Hz -3dB 1000us)", &mut symbols).unwrap();

    let spec = RenderSpec { sample_rate_hz: 1_000_000.0, sample_format: Format::Cu8, ..Default::default() };
    let (buf, stats) = render_to_buffer(&spec, &tones, &AbortFlag::new()).unwrap();

    assert_eq!(stats.microseconds, 2000);
    assert_eq!(buf.len(), stats.samples as usize * Format::Cu8.bytes_per_pair());
}

#[test]
fn pulse_text_end_to_end_matches_length_helpers() {
    let mut defaults = PulseSetup { freq_mark: 50_000, freq_space: -50_000, ..Default::default() };
    let tones = parse_pulses("500 500\n500 500\n", &mut defaults).unwrap();

    let spec = RenderSpec::default();
    let expected_samples = length_samples(spec.sample_rate_hz, &tones);
    let expected_us = length_us(&tones);

    let (_buf, stats) = render_to_buffer(&spec, &tones, &AbortFlag::new()).unwrap();
    assert_eq!(stats.samples, expected_samples);
    assert_eq!(stats.microseconds, expected_us);
}

#[test]
fn transform_call_feeds_symbol_table_into_renderable_tones() {
    let mut symbols = SymbolTable::new();
    symbols.define('0', vec![Tone::new(10_000, -3, 0, 10)]);
    symbols.define('1', vec![Tone::new(-10_000, -3, 0, 10)]);
    let tones = parse_code("{HEXAf}", &mut symbols).unwrap();

    let spec = RenderSpec::default();
    let (_buf, stats) = render_to_buffer(&spec, &tones, &AbortFlag::new()).unwrap();
    assert_eq!(stats.microseconds, length_us(&tones));
}

#[test]
fn misaligned_frame_size_is_rounded_down_with_a_logged_warning() {
    let _ = env_logger::builder().is_test(true).try_init();

    let spec = RenderSpec { sample_format: Format::Cs12, frame_size: 10, ..Default::default() };
    let tones = [Tone::new(1000, 0, 0, 4), TONE_END];
    let (buf, stats) = render_to_buffer(&spec, &tones, &AbortFlag::new()).unwrap();
    assert_eq!(stats.samples, 4);
    assert_eq!(buf.len(), 6);
}

#[test]
fn cancellation_before_any_progress_yields_empty_render() {
    let tones = vec![Tone::new(10_000, -3, 0, 1_000_000), TONE_END];
    let abort = AbortFlag::new();
    abort.set();

    let spec = RenderSpec::default();
    let (buf, stats) = render_to_buffer(&spec, &tones, &abort).unwrap();
    assert!(stats.cancelled);
    assert!(buf.is_empty());
}
