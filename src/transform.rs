//! Transform encoders: expand a short textual payload into an ASCII
//! `'0'`/`'1'` bit string via Manchester (two polarities), Differential
//! Manchester, or raw hex/ASCII expansion. Used by the code parser's `{...}`
//! transform-call tokens.

/// MSB-first binary expansion of each non-whitespace byte of `data`.
pub fn encode_ascii(data: &str) -> String {
    let mut out = String::with_capacity(data.len() * 8);
    for &byte in data.as_bytes() {
        if byte.is_ascii_whitespace() {
            continue;
        }
        for bit in (0..8).rev() {
            out.push(if byte & (1 << bit) != 0 { '1' } else { '0' });
        }
    }
    out
}

/// MSB-first nibble expansion of hex digits in `data`. Non-hex,
/// non-whitespace characters are invalid and are skipped with a warning,
/// matching the reference transform's recoverable behavior.
pub fn encode_hex(data: &str) -> String {
    let mut out = String::with_capacity(data.len() * 4);
    for c in data.chars() {
        if c.is_whitespace() {
            continue;
        }
        let Some(v) = c.to_digit(16) else {
            log::warn!("not a valid hex char: {c:?}");
            continue;
        };
        for bit in (0..4).rev() {
            out.push(if v & (1 << bit) != 0 { '1' } else { '0' });
        }
    }
    out
}

/// Manchester encoding, G. E. Thomas convention: `0 -> "01"`, anything else
/// (conventionally `1`) `-> "10"`. Whitespace in `bits` is ignored.
pub fn encode_mc_thomas(bits: &str) -> String {
    let mut out = String::with_capacity(bits.len() * 2);
    for c in bits.chars() {
        if c.is_whitespace() {
            continue;
        }
        out.push_str(if c == '0' { "01" } else { "10" });
    }
    out
}

/// Manchester encoding, IEEE 802.3 convention: `0 -> "10"`, else `-> "01"`.
pub fn encode_mc_ieee(bits: &str) -> String {
    let mut out = String::with_capacity(bits.len() * 2);
    for c in bits.chars() {
        if c.is_whitespace() {
            continue;
        }
        out.push_str(if c == '0' { "10" } else { "01" });
    }
    out
}

/// Differential Manchester: each input bit emits two output bits, always
/// with a transition at the bit's midpoint. A `1` leaves the carried
/// differential state unchanged for the following bit; a `0` inverts it.
/// `start_inverted` selects the complementary initial state, so that
/// [`encode_dmc_lo`] begins every output bit flipped relative to
/// [`encode_dmc_hi`].
fn encode_dmc(bits: &str, mut level: bool) -> String {
    let mut out = String::with_capacity(bits.len() * 2);
    for c in bits.chars() {
        if c.is_whitespace() {
            continue;
        }
        let first = if level { '1' } else { '0' };
        let second = if level { '0' } else { '1' };
        out.push(first);
        out.push(second);
        if c == '0' {
            level = !level;
        }
    }
    out
}

/// Differential Manchester starting high.
pub fn encode_dmc_hi(bits: &str) -> String {
    encode_dmc(bits, false)
}

/// Differential Manchester starting low (every output bit complementary to
/// [`encode_dmc_hi`]'s).
pub fn encode_dmc_lo(bits: &str) -> String {
    encode_dmc(bits, true)
}

fn strip_ci_prefix<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Dispatches a `{...}`-body transform argument by its case-insensitive
/// prefix (`ASCII`, `DMC`, `MC`, `IMC`, `HEX`), returning the expanded
/// `'0'`/`'1'` bit string. An unrecognized (or absent) prefix is hex-decoded
/// as-is, per the reference transform's fallback.
pub fn named_transform(arg: &str) -> String {
    if let Some(rest) = strip_ci_prefix(arg, "ASCII") {
        return encode_ascii(rest);
    }
    if let Some(rest) = strip_ci_prefix(arg, "DMC") {
        return encode_dmc_hi(&encode_hex(rest));
    }
    if let Some(rest) = strip_ci_prefix(arg, "MC") {
        return encode_mc_thomas(&encode_hex(rest));
    }
    if let Some(rest) = strip_ci_prefix(arg, "IMC") {
        return encode_mc_ieee(&encode_hex(rest));
    }
    if let Some(rest) = strip_ci_prefix(arg, "HEX") {
        return encode_hex(rest);
    }
    encode_hex(arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_expands_msb_first() {
        assert_eq!(encode_ascii("A"), "01000001");
    }

    #[test]
    fn hex_expands_nibbles_msb_first() {
        assert_eq!(encode_hex("Af"), "10101111");
    }

    #[test]
    fn hex_skips_invalid_digits() {
        assert_eq!(encode_hex("A!f"), "10101111");
    }

    #[test]
    fn hex_ignores_whitespace() {
        assert_eq!(encode_hex("A f"), "10101111");
    }

    #[test]
    fn mc_thomas_matches_reference_vector() {
        assert_eq!(encode_mc_thomas("01"), "0110");
    }

    #[test]
    fn mc_ieee_matches_reference_vector() {
        assert_eq!(encode_mc_ieee("01"), "1001");
    }

    #[test]
    fn dmc_hi_consecutive_zeros_flip_each_time() {
        assert_eq!(encode_dmc_hi("00"), "0110");
    }

    #[test]
    fn dmc_hi_consecutive_ones_keep_state() {
        assert_eq!(encode_dmc_hi("11"), "0101");
    }

    #[test]
    fn dmc_lo_starts_in_opposite_state_from_hi() {
        assert_eq!(encode_dmc_lo("00"), "1001");
        assert_eq!(encode_dmc_lo("11"), "1010");
    }

    #[test]
    fn named_transform_dispatches_by_prefix_case_insensitively() {
        assert_eq!(named_transform("hexAf"), encode_hex("Af"));
        assert_eq!(named_transform("MC01"), encode_mc_thomas(&encode_hex("01")));
        assert_eq!(named_transform("imc01"), encode_mc_ieee(&encode_hex("01")));
        assert_eq!(named_transform("dmcAf"), encode_dmc_hi(&encode_hex("Af")));
        assert_eq!(named_transform("asciiA"), encode_ascii("A"));
    }

    #[test]
    fn named_transform_defaults_to_hex_for_unprefixed_input() {
        assert_eq!(named_transform("Af"), encode_hex("Af"));
    }
}
