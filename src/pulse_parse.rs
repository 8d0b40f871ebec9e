//! Pulse-text front end: parses a directive header plus mark/space integer
//! pairs into a tone list, expanding each pulse into a mark tone followed by
//! a space tone.

use crate::error::{Error, Result};
use crate::tone::{Tone, TONE_END};

/// Defaults consumed (and mutated by directive lines) while parsing a pulse
/// text buffer. `time_base` is the reciprocal of the pulse width unit, e.g.
/// `1_000_000` for microseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseSetup {
    pub time_base: u32,
    pub freq_mark: i32,
    pub freq_space: i32,
    pub att_mark: i32,
    pub att_space: i32,
    pub phase_mark: i32,
    pub phase_space: i32,
}

impl Default for PulseSetup {
    fn default() -> Self {
        PulseSetup {
            time_base: 1_000_000,
            freq_mark: 0,
            freq_space: 0,
            att_mark: 0,
            att_space: 0,
            phase_mark: 0,
            phase_space: 0,
        }
    }
}

const WS: [char; 4] = [' ', '\t', '\r', '\n'];

fn skip_ws(s: &str) -> &str {
    s.trim_start_matches(WS)
}

fn split_eol(s: &str) -> (&str, &str) {
    match s.find(['\r', '\n']) {
        Some(pos) => (&s[..pos], &s[pos..]),
        None => (s, ""),
    }
}

/// Parses one `mark`/`space` style token (optionally signed, optionally
/// fractional/exponent), returning its value and the unconsumed remainder.
/// Mirrors the reference parser's use of `strtod` followed by a negative/
/// range check, with `-1` specially permitted.
fn parse_len<'a>(s: &'a str, context: &'static str) -> Result<(i32, &'a str)> {
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '+' || c == '-' || c == '.' || c == 'e' || c == 'E' {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    if end == 0 {
        let token = s.chars().next().map(|c| c.to_string()).unwrap_or_default();
        return Err(Error::InvalidNumber { context, token });
    }
    let mut len = end;
    loop {
        if len == 0 {
            return Err(Error::InvalidNumber { context, token: s[..end].to_string() });
        }
        match s[..len].parse::<f64>() {
            Ok(val) => {
                if !(-2147483648.0..2147483648.0).contains(&val) {
                    return Err(Error::NumberOutOfRange { context, token: s[..end].to_string() });
                }
                let ival = val as i32;
                if ival < 0 && ival != -1 {
                    return Err(Error::NegativeNumber { context, token: s[..end].to_string() });
                }
                return Ok((ival, &s[len..]));
            }
            Err(_) => len -= 1,
        }
    }
}

/// Like [`parse_len`] but allows any negative value (used for dB/phase
/// directive values, which are not mark/space durations).
fn parse_signed<'a>(s: &'a str, context: &'static str) -> Result<(i32, &'a str)> {
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '+' || c == '-' {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    if end == 0 {
        let token = s.chars().next().map(|c| c.to_string()).unwrap_or_default();
        return Err(Error::InvalidNumber { context, token });
    }
    s[..end]
        .parse::<i32>()
        .map(|v| (v, &s[end..]))
        .map_err(|_| Error::InvalidNumber { context, token: s[..end].to_string() })
}

fn parse_float<'a>(s: &'a str, context: &'static str) -> Result<(f64, &'a str)> {
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || c == '+' || c == '-' || c == '.' || c == 'e' || c == 'E' {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    if end == 0 {
        let token = s.chars().next().map(|c| c.to_string()).unwrap_or_default();
        return Err(Error::InvalidNumber { context, token });
    }
    let mut len = end;
    loop {
        if len == 0 {
            return Err(Error::InvalidNumber { context, token: s[..end].to_string() });
        }
        match s[..len].parse::<f64>() {
            Ok(val) => return Ok((val, &s[len..])),
            Err(_) => len -= 1,
        }
    }
}

fn apply_timescale(value: &str, defaults: &mut PulseSetup) -> Result<()> {
    let (num, rest) = parse_float(value, "timescale")?;
    let unit = rest.trim();
    let seconds = match unit.to_ascii_lowercase().as_str() {
        "ns" => num * 1e-9,
        "us" => num * 1e-6,
        "ms" => num * 1e-3,
        "s" => num,
        _ => return Err(Error::UnknownUnit { context: "timescale", token: unit.to_string() }),
    };
    if seconds <= 0.0 {
        return Err(Error::InvalidNumber { context: "timescale", token: value.to_string() });
    }
    defaults.time_base = (1.0 / seconds).round() as u32;
    Ok(())
}

fn apply_directive(line: &str, defaults: &mut PulseSetup) -> Result<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    let (key, value) = match line.split_once(char::is_whitespace) {
        Some((k, v)) => (k, v.trim()),
        None => (line, ""),
    };
    match key {
        "timescale" => apply_timescale(value, defaults)?,
        "time_base" => defaults.time_base = parse_signed(value, "time_base")?.0 as u32,
        "freq_mark" => defaults.freq_mark = parse_signed(value, "freq_mark")?.0,
        "freq_space" => defaults.freq_space = parse_signed(value, "freq_space")?.0,
        "att_mark" => defaults.att_mark = parse_signed(value, "att_mark")?.0,
        "att_space" => defaults.att_space = parse_signed(value, "att_space")?.0,
        "phase_mark" => defaults.phase_mark = parse_signed(value, "phase_mark")?.0,
        "phase_space" => defaults.phase_space = parse_signed(value, "phase_space")?.0,
        other => log::warn!("ignoring unknown pulse directive {other:?}"),
    }
    Ok(())
}

/// Parses a pulse-text buffer into a tone list terminated by the zero tone.
/// `defaults` is both the initial header state and, on return, the final
/// directive state (directives update it in place as they're read).
pub fn parse_pulses(text: &str, defaults: &mut PulseSetup) -> Result<Vec<Tone>> {
    let mut pos = text;
    let mut tones = Vec::new();

    loop {
        pos = skip_ws(pos);
        if pos.is_empty() {
            break;
        }
        if let Some(rest) = pos.strip_prefix('#') {
            let (_, eol) = split_eol(rest);
            pos = eol;
            continue;
        }
        if let Some(rest) = pos.strip_prefix(';') {
            let (line, eol) = split_eol(rest);
            apply_directive(line, defaults)?;
            pos = eol;
            continue;
        }

        let (mark, rest) = parse_len(pos, "pulse mark")?;
        let rest = skip_ws(rest);
        let (space, rest) = parse_len(rest, "pulse space")?;
        pos = rest;

        let time_base = defaults.time_base.max(1) as i64;

        if mark == -1 {
            tones.push(Tone::new(defaults.freq_mark, defaults.att_mark, defaults.phase_mark, 0));
            let us = (space as i64 * 1_000_000 / time_base) as i32;
            tones.push(Tone::new(defaults.freq_space, -200, defaults.phase_space, us));
            continue;
        }

        let mark_us = (mark as i64 * 1_000_000 / time_base) as i32;
        tones.push(Tone::new(defaults.freq_mark, defaults.att_mark, defaults.phase_mark, mark_us));

        let space_us = (space as i64 * 1_000_000 / time_base) as i32;
        tones.push(Tone::new(defaults.freq_space, defaults.att_space, defaults.phase_space, space_us));
    }

    tones.push(TONE_END);
    Ok(tones)
}
