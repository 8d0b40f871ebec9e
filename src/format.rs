//! Packed sample-format codec: quantizes (I, Q) float pairs into any of the
//! nine on-wire layouts an SDR transmitter might expect, and resolves a
//! format from a file path's inline annotation or extension.

use std::fmt;

/// One of the nine packed binary layouts a rendered I/Q stream can be
/// quantized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Cu4,
    Cs4,
    Cu8,
    Cs8,
    Cu12,
    Cs12,
    Cu16,
    Cs16,
    Cu32,
    Cs32,
    Cu64,
    Cs64,
    Cf32,
    Cf64,
}

impl Format {
    /// Canonical uppercase extension/annotation for this format, e.g. `"CU8"`.
    pub fn name(self) -> &'static str {
        match self {
            Format::Cu4 => "CU4",
            Format::Cs4 => "CS4",
            Format::Cu8 => "CU8",
            Format::Cs8 => "CS8",
            Format::Cu12 => "CU12",
            Format::Cs12 => "CS12",
            Format::Cu16 => "CU16",
            Format::Cs16 => "CS16",
            Format::Cu32 => "CU32",
            Format::Cs32 => "CS32",
            Format::Cu64 => "CU64",
            Format::Cs64 => "CS64",
            Format::Cf32 => "CF32",
            Format::Cf64 => "CF64",
        }
    }

    fn from_name(name: &str) -> Option<Format> {
        match name.to_ascii_uppercase().as_str() {
            "CU4" => Some(Format::Cu4),
            "CS4" => Some(Format::Cs4),
            "CU8" => Some(Format::Cu8),
            "CS8" => Some(Format::Cs8),
            "CU12" => Some(Format::Cu12),
            "CS12" => Some(Format::Cs12),
            "CU16" => Some(Format::Cu16),
            "CS16" => Some(Format::Cs16),
            "CU32" => Some(Format::Cu32),
            "CS32" => Some(Format::Cs32),
            "CU64" => Some(Format::Cu64),
            "CS64" => Some(Format::Cs64),
            "CF32" => Some(Format::Cf32),
            "CF64" => Some(Format::Cf64),
            // legacy aliases
            "DATA" => Some(Format::Cu8),
            "CFILE" => Some(Format::Cf32),
            "COMPLEX16U" => Some(Format::Cu8),
            "COMPLEX16S" => Some(Format::Cs8),
            "COMPLEX" => Some(Format::Cf32),
            _ => None,
        }
    }

    /// Total bytes written per (I, Q) sample pair. Equal to
    /// `sample_format_length` in the spec.
    pub fn bytes_per_pair(self) -> usize {
        match self {
            Format::Cu4 | Format::Cs4 => 1,
            Format::Cu8 | Format::Cs8 => 2,
            Format::Cu12 | Format::Cs12 => 3,
            Format::Cu16 | Format::Cs16 => 4,
            Format::Cu32 | Format::Cs32 => 8,
            Format::Cu64 | Format::Cs64 => 16,
            Format::Cf32 => 8,
            Format::Cf64 => 16,
        }
    }

    /// The default `full_scale` bias/clamp constant used when the render
    /// spec leaves `full_scale == 0.0`.
    pub fn default_full_scale(self) -> f64 {
        match self {
            Format::Cu4 => 7.999999,
            Format::Cs4 => 7.49999,
            Format::Cu8 => 127.999999,
            Format::Cs8 => 127.4999,
            Format::Cu12 => 2047.999999,
            Format::Cs12 => 2047.4999,
            Format::Cu16 => 32767.999999,
            Format::Cs16 => 32767.4999,
            Format::Cu32 => 2147483647.999999,
            Format::Cs32 => 2147483647.4999,
            Format::Cu64 => 9223372036854775999.999999,
            Format::Cs64 => 9223372036854775999.4999,
            Format::Cf32 | Format::Cf64 => 1.0,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encodes one (I, Q) float pair (each normally in `[-1.0, 1.0]`) into `out`,
/// appending exactly `bytes_per_pair(format)` bytes. `full_scale` is the
/// resolved scale constant (spec default, or caller override).
pub fn encode_sample(format: Format, i: f64, q: f64, full_scale: f64, out: &mut Vec<u8>) {
    match format {
        Format::Cu4 => {
            let iv = bound_u4((i * full_scale + 7.5 + 0.5) as i32);
            let qv = bound_u4((q * full_scale + 7.5 + 0.5) as i32);
            out.push((iv << 4) | qv);
        }
        Format::Cs4 => {
            let iv = bound_s4((i * full_scale + 8.0 + 0.5) as i32 - 8);
            let qv = bound_s4((q * full_scale + 8.0 + 0.5) as i32 - 8);
            out.push(((iv as u8) << 4) | (qv as u8 & 0xf));
        }
        Format::Cu8 => {
            out.push(bound_u8((i * full_scale + 127.5 + 0.5) as i32));
            out.push(bound_u8((q * full_scale + 127.5 + 0.5) as i32));
        }
        Format::Cs8 => {
            out.push(bound_s8((i * full_scale + 128.0 + 0.5) as i32 - 128) as u8);
            out.push(bound_s8((q * full_scale + 128.0 + 0.5) as i32 - 128) as u8);
        }
        Format::Cu12 => write_packed_12(bound_u16((i + 1.0) * full_scale), bound_u16((q + 1.0) * full_scale), out),
        Format::Cs12 => {
            let iv = bound_s16((i * full_scale + 2048.0 + 0.5) as i32 - 2048) as u16;
            let qv = bound_s16((q * full_scale + 2048.0 + 0.5) as i32 - 2048) as u16;
            write_packed_12(iv, qv, out);
        }
        Format::Cu16 => {
            out.extend_from_slice(&bound_u16((i + 1.0) * full_scale).to_le_bytes());
            out.extend_from_slice(&bound_u16((q + 1.0) * full_scale).to_le_bytes());
        }
        Format::Cs16 => {
            let iv = bound_s16((i * full_scale + 32768.0 + 0.5) as i32 - 32768);
            let qv = bound_s16((q * full_scale + 32768.0 + 0.5) as i32 - 32768);
            out.extend_from_slice(&iv.to_le_bytes());
            out.extend_from_slice(&qv.to_le_bytes());
        }
        Format::Cu32 => {
            out.extend_from_slice(&bound_u32((i + 1.0) * full_scale).to_le_bytes());
            out.extend_from_slice(&bound_u32((q + 1.0) * full_scale).to_le_bytes());
        }
        Format::Cs32 => {
            out.extend_from_slice(&bound_s32(i * full_scale).to_le_bytes());
            out.extend_from_slice(&bound_s32(q * full_scale).to_le_bytes());
        }
        Format::Cu64 => {
            out.extend_from_slice(&bound_u64((i + 1.0) * full_scale).to_le_bytes());
            out.extend_from_slice(&bound_u64((q + 1.0) * full_scale).to_le_bytes());
        }
        Format::Cs64 => {
            out.extend_from_slice(&bound_s64(i * full_scale).to_le_bytes());
            out.extend_from_slice(&bound_s64(q * full_scale).to_le_bytes());
        }
        Format::Cf32 => {
            out.extend_from_slice(&((i * full_scale) as f32).to_le_bytes());
            out.extend_from_slice(&((q * full_scale) as f32).to_le_bytes());
        }
        Format::Cf64 => {
            out.extend_from_slice(&(i * full_scale).to_le_bytes());
            out.extend_from_slice(&(q * full_scale).to_le_bytes());
        }
    }
}

/// Packed-12 layout: one I/Q pair into 3 bytes, `iiqIQQ` nibble order.
/// `i_val`/`q_val` are LSB-aligned 12-bit magnitudes (scale 2048).
fn write_packed_12(i_val: u16, q_val: u16, out: &mut Vec<u8>) {
    out.push((i_val & 0xff) as u8);
    out.push((((q_val & 0x0f) << 4) | (i_val >> 8 & 0x0f)) as u8);
    out.push((q_val >> 4) as u8);
}

#[inline]
fn bound_u4(x: i32) -> u8 {
    x.clamp(0, 0xf) as u8
}
#[inline]
fn bound_s4(x: i32) -> i8 {
    x.clamp(-0x8, 0x7) as i8
}
#[inline]
fn bound_u8(x: i32) -> u8 {
    x.clamp(0, 0xff) as u8
}
#[inline]
fn bound_s8(x: i32) -> i8 {
    x.clamp(-0x80, 0x7f) as i8
}
#[inline]
fn bound_u16(x: f64) -> u16 {
    x.clamp(0.0, 0xffff as f64) as u16
}
#[inline]
fn bound_s16(x: i32) -> i16 {
    x.clamp(-0x8000, 0x7fff) as i16
}
#[inline]
fn bound_u32(x: f64) -> u32 {
    x.clamp(0.0, u32::MAX as f64) as u32
}
#[inline]
fn bound_s32(x: f64) -> i32 {
    x.clamp(i32::MIN as f64, i32::MAX as f64) as i32
}
#[inline]
fn bound_u64(x: f64) -> u64 {
    x.clamp(0.0, u64::MAX as f64) as u64
}
#[inline]
fn bound_s64(x: f64) -> i64 {
    x.clamp(i64::MIN as f64, i64::MAX as f64) as i64
}

/// Resolves a sample format from a path that may carry a trailing extension
/// (`"out.cu8"`) or an inline annotation (`"out:CU8"`). Case-insensitive.
/// Inline annotations win over extensions; when multiple colons are present,
/// the last one not immediately followed by a path separator is used (so
/// `C:\out.raw:CU8` resolves to the annotation, not the drive letter).
/// Returns the format together with the path the annotation was stripped
/// from.
pub fn format_from_path(path: &str) -> Option<(String, Format)> {
    let mut colon_pos = None;
    let mut search_from = 0;
    while let Some(rel) = path[search_from..].find(':') {
        let pos = search_from + rel;
        let followed_by_sep = path.as_bytes().get(pos + 1) == Some(&b'\\');
        if !followed_by_sep {
            colon_pos = Some(pos);
        }
        search_from = pos + 1;
    }

    if let Some(pos) = colon_pos {
        let annotation = &path[pos + 1..];
        if let Some(fmt) = Format::from_name(annotation) {
            return Some((path[..pos].to_string(), fmt));
        }
    }

    let ext = path.rsplit_once('.').map(|(_, ext)| ext);
    if let Some(ext) = ext {
        if let Some(fmt) = Format::from_name(ext) {
            let stem_len = path.len() - ext.len() - 1;
            return Some((path[..stem_len].to_string(), fmt));
        }
    }

    None
}
