//! Code-text front end: a small macro language over a 128-entry symbol
//! table (tone literals, symbol definitions, transform calls) that expands
//! into a tone list.

use crate::error::{Error, Result};
use crate::tone::{Tone, TONE_END};
use crate::transform::named_transform;

const TABLE_LEN: usize = 128;

/// The persistent `char -> tone sequence` symbol table. `~` is preset to a
/// 10 kHz, 0 dB, 1 us base tone, matching the reference renderer's default
/// reference symbol.
#[derive(Debug, Clone)]
pub struct SymbolTable(Vec<Vec<Tone>>);

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = vec![Vec::new(); TABLE_LEN];
        table[b'~' as usize] = vec![Tone::new(10_000, 0, 0, 1)];
        SymbolTable(table)
    }

    /// The tones currently defined for `c`; empty if `c` is undefined or out
    /// of the 7-bit ASCII range the table covers.
    pub fn get(&self, c: char) -> &[Tone] {
        let idx = c as usize;
        if idx < self.0.len() {
            &self.0[idx]
        } else {
            &[]
        }
    }

    /// Overwrites `c`'s definition (later definitions replace earlier ones).
    pub fn define(&mut self, c: char, tones: Vec<Tone>) {
        if (c as usize) < self.0.len() {
            self.0[(c as usize)] = tones;
        }
    }

    /// The first tone defined for `c`, or the zeroed tone if `c` is
    /// undefined -- the "zeroed reference" edge case for tone-literal
    /// leading references.
    fn reference_tone(&self, c: char) -> Tone {
        self.get(c).first().copied().unwrap_or_default()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

/// Skips whitespace and `#`-to-end-of-line comments.
fn skip_ws(s: &str) -> &str {
    let mut p = s;
    loop {
        let trimmed = p.trim_start_matches([' ', '\t', '\r', '\n']);
        if let Some(rest) = trimmed.strip_prefix('#') {
            p = rest.trim_start_matches(|c| c != '\r' && c != '\n');
        } else {
            return trimmed;
        }
    }
}

/// Parses a leading signed decimal integer, like `strtol(..., 10)`. Returns
/// `None` (with `s` unconsumed) if no digits follow an optional sign.
fn take_int(s: &str) -> (Option<i32>, &str) {
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return (None, s);
    }
    match s[..i].parse::<i32>() {
        Ok(v) => (Some(v), &s[i..]),
        Err(_) => (None, s),
    }
}

/// Parses a `(...)` tone literal starting at `s` (which must begin with
/// `(`), returning the tone and the remainder after the closing paren.
fn parse_tone<'a>(s: &'a str, symbols: &SymbolTable) -> Result<(Tone, &'a str)> {
    let mut p = s.strip_prefix('(').unwrap_or(s);
    p = skip_ws(p);

    let mut tone;
    let mut db_unset;
    match p.chars().next() {
        Some(c) if !(c.is_ascii_digit() || c == '-' || c == '.') => {
            p = &p[c.len_utf8()..];
            let r = symbols.reference_tone(c);
            tone = Tone { hz: r.hz, db: r.db, ph: r.ph, us: r.us };
            db_unset = false;
            p = skip_ws(p);
        }
        Some(_) => {
            tone = Tone::default();
            db_unset = true;
        }
        None => return Err(Error::Unterminated('(')),
    }

    loop {
        match p.chars().next() {
            Some(')') => {
                p = &p[1..];
                break;
            }
            None => return Err(Error::Unterminated('(')),
            Some(c) => {
                let (num, after_num) = take_int(p);
                match num {
                    None => p = &p[c.len_utf8()..],
                    Some(v) => {
                        if let Some(rest) = after_num.strip_prefix("Hz") {
                            tone.hz = v;
                            if db_unset {
                                tone.db = 0;
                                db_unset = false;
                            }
                            p = rest;
                        } else if let Some(rest) = after_num.strip_prefix("kHz") {
                            tone.hz = v * 1000;
                            if db_unset {
                                tone.db = 0;
                                db_unset = false;
                            }
                            p = rest;
                        } else if let Some(rest) = after_num.strip_prefix("dB") {
                            tone.db = v;
                            db_unset = false;
                            p = rest;
                        } else if let Some(rest) = after_num.strip_prefix("us") {
                            tone.us = v;
                            p = rest;
                        } else if let Some(rest) = after_num.strip_prefix("ms") {
                            tone.us = v * 1000;
                            p = rest;
                        } else if let Some(rest) = after_num.strip_prefix('s') {
                            tone.us = v * 1_000_000;
                            p = rest;
                        } else {
                            p = after_num;
                        }
                    }
                }
            }
        }
        p = skip_ws(p);
    }

    if db_unset {
        tone.db = -99;
    }

    Ok((tone, p))
}

/// Parses a `[C ...]` symbol definition starting at `s` (which must begin
/// with `[`), mutating `symbols` and returning the remainder after `]`.
fn parse_define<'a>(s: &'a str, symbols: &mut SymbolTable) -> Result<&'a str> {
    let mut p = s.strip_prefix('[').unwrap_or(s);
    p = skip_ws(p);
    let target = p.chars().next().ok_or(Error::Unterminated('['))?;
    p = &p[target.len_utf8()..];

    let mut tones = Vec::new();
    loop {
        p = skip_ws(p);
        match p.chars().next() {
            None => return Err(Error::Unterminated('[')),
            Some(']') => {
                p = &p[1..];
                break;
            }
            Some('(') => {
                let (tone, rest) = parse_tone(p, symbols)?;
                tones.push(tone);
                p = rest;
            }
            Some(c) => {
                tones.extend_from_slice(symbols.get(c));
                p = &p[c.len_utf8()..];
            }
        }
    }

    symbols.define(target, tones);
    Ok(p)
}

/// Parses a code-text buffer into a flat tone list, expanding symbol
/// references, tone literals, symbol definitions, and transform calls
/// against (and into) `symbols`. The returned list is terminated by the
/// zero tone.
pub fn parse_code(code: &str, symbols: &mut SymbolTable) -> Result<Vec<Tone>> {
    let mut output = Vec::new();
    let mut p = code;

    loop {
        p = skip_ws(p);
        let Some(c) = p.chars().next() else { break };

        match c {
            '[' => {
                p = parse_define(p, symbols)?;
            }
            '(' => {
                let (tone, rest) = parse_tone(p, symbols)?;
                output.push(tone);
                p = rest;
            }
            '{' => {
                let body = &p[1..];
                let end = body.find('}').ok_or(Error::Unterminated('{'))?;
                let bits = named_transform(&body[..end]);
                for b in bits.chars() {
                    output.extend_from_slice(symbols.get(b));
                }
                p = &body[end + 1..];
            }
            _ => {
                output.extend_from_slice(symbols.get(c));
                p = &p[c.len_utf8()..];
            }
        }
    }

    output.push(TONE_END);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_tone_symbol_is_preset() {
        let symbols = SymbolTable::new();
        assert_eq!(symbols.get('~'), &[Tone::new(10_000, 0, 0, 1)]);
    }

    #[test]
    fn symbol_reference_expands_to_its_tones() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("~~", &mut symbols).unwrap();
        assert_eq!(&tones[..2], &[Tone::new(10_000, 0, 0, 1), Tone::new(10_000, 0, 0, 1)]);
        assert!(tones[2].is_end());
    }

    #[test]
    fn undefined_symbol_reference_emits_nothing() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("Q", &mut symbols).unwrap();
        assert_eq!(tones, vec![TONE_END]);
    }

    #[test]
    fn tone_literal_parses_units() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("(100kHz -3dB 50us)", &mut symbols).unwrap();
        assert_eq!(tones[0], Tone::new(100_000, -3, 0, 50));
    }

    #[test]
    fn tone_literal_without_db_defaults_to_minus_99() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("(10us)", &mut symbols).unwrap();
        assert_eq!(tones[0].db, -99);
    }

    #[test]
    fn hz_without_db_implicitly_sets_db_zero() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("(5000Hz)", &mut symbols).unwrap();
        assert_eq!(tones[0], Tone::new(5000, 0, 0, 0));
    }

    #[test]
    fn db_without_hz_inherits_reference_hz() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("(~-10dB)", &mut symbols).unwrap();
        assert_eq!(tones[0], Tone::new(10_000, -10, 0, 1));
    }

    #[test]
    fn symbol_definition_then_reference_expands() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("[A(1000Hz 0dB 10us)]AA", &mut symbols).unwrap();
        assert_eq!(&tones[..2], &[Tone::new(1000, 0, 0, 10), Tone::new(1000, 0, 0, 10)]);
    }

    #[test]
    fn later_definition_overwrites_earlier_one() {
        let mut symbols = SymbolTable::new();
        parse_code("[A(1000Hz 0dB 10us)]", &mut symbols).unwrap();
        parse_code("[A(2000Hz 0dB 20us)]", &mut symbols).unwrap();
        assert_eq!(symbols.get('A'), &[Tone::new(2000, 0, 0, 20)]);
    }

    #[test]
    fn transform_call_expands_bits_through_symbol_table() {
        let mut symbols = SymbolTable::new();
        symbols.define('0', vec![Tone::new(1000, 0, 0, 5)]);
        symbols.define('1', vec![Tone::new(2000, 0, 0, 5)]);
        let tones = parse_code("{HEXA}0", &mut symbols).unwrap();
        // HEX 'A' = 1010 -> symbols '1','0','1','0' concatenated, then a bare '0'.
        assert_eq!(tones.len(), 6); // 4 from transform + 1 literal '0' + terminator
    }

    #[test]
    fn comments_are_ignored() {
        let mut symbols = SymbolTable::new();
        let tones = parse_code("# a comment\n~", &mut symbols).unwrap();
        assert_eq!(tones[0], Tone::new(10_000, 0, 0, 1));
    }

    #[test]
    fn unterminated_transform_call_is_an_error() {
        let mut symbols = SymbolTable::new();
        let err = parse_code("{HEXAf", &mut symbols).unwrap_err();
        assert!(matches!(err, Error::Unterminated('{')));
    }

    #[test]
    fn unterminated_tone_literal_is_an_error() {
        let mut symbols = SymbolTable::new();
        let err = parse_code("(100Hz", &mut symbols).unwrap_err();
        assert!(matches!(err, Error::Unterminated('(')));
    }

    #[test]
    fn unterminated_definition_is_an_error() {
        let mut symbols = SymbolTable::new();
        let err = parse_code("[A(100Hz)", &mut symbols).unwrap_err();
        assert!(matches!(err, Error::Unterminated('[')));
    }
}
