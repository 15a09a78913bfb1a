//! Lexical scanner for floating-point literals.
//!
//! Splits the input into `(sign, significand digits, exponent)` while
//! tracking whether the 64-bit accumulator dropped digits, then hands the
//! pieces to the integer back-end. All state is function-local; the scanner
//! never allocates on the success path.

use crate::InvalidNumber;
use crate::chartab::{CHAR_TO_HEX_MAP, DECIMAL_POINT_CLASS};
use crate::slowpath;
use crate::uscale;

/// Smallest 19-digit integer. The re-scan of an overlong significand stops
/// once the accumulator reaches this, keeping every retained digit exact.
const MIN_19_DIGIT_INTEGER: u64 = 1_000_000_000_000_000_000;

/// Explicit-exponent clamp. Once the running exponent reaches eight digits
/// the value is already far outside the representable range, so further
/// digits are consumed but ignored.
const MIN_8_DIGIT_INTEGER: i64 = 10_000_000;

/// Parse a complete literal: `[ws] [sign] (NaN | Infinity | decimal | hex) [ws]`.
pub(crate) fn parse_float(bytes: &[u8]) -> Result<f64, InvalidNumber> {
    let len = bytes.len();
    let mut index = skip_whitespace(bytes, 0);
    if index == len {
        return Err(InvalidNumber::empty());
    }
    let mut ch = bytes[index];

    let is_negative = ch == b'-';
    if is_negative || ch == b'+' {
        index += 1;
        ch = match bytes.get(index) {
            Some(&c) => c,
            None => return Err(InvalidNumber::for_input(bytes)),
        };
    }

    if ch == b'N' {
        return parse_nan(bytes, index);
    }
    if ch == b'I' {
        return parse_infinity(bytes, index, is_negative);
    }

    // A consumed leading zero relaxes the at-least-one-digit rule and is
    // where the hex prefix can appear.
    let has_leading_zero = ch == b'0';
    if has_leading_zero {
        index += 1;
        if let Some(&c) = bytes.get(index) {
            if c == b'x' || c == b'X' {
                return parse_rest_of_hex_literal(bytes, index + 1, is_negative);
            }
        }
    }

    parse_rest_of_dec_literal(bytes, index, is_negative, has_leading_zero)
}

/// Scan `[digits] [. digits] [(e|E) [sign] digits]` starting at `start`.
fn parse_rest_of_dec_literal(
    bytes: &[u8],
    start: usize,
    is_negative: bool,
    has_leading_zero: bool,
) -> Result<f64, InvalidNumber> {
    let len = bytes.len();
    let mut index = start;
    let index_of_first_digit = index;
    let mut digits: u64 = 0;

    // Two simple loops (integer part, then fraction) beat one merged loop
    // when most inputs have no decimal point. The accumulator may wrap; the
    // re-scan below repairs that.
    while index < len {
        let ch = bytes[index];
        if ch.is_ascii_digit() {
            digits = digits.wrapping_mul(10).wrapping_add((ch - b'0') as u64);
        } else {
            break;
        }
        index += 1;
    }
    let virtual_index_of_point = index;
    let digit_count;
    let mut exponent: i64;
    if index < len && bytes[index] == b'.' {
        index += 1;
        while index < len {
            let ch = bytes[index];
            if ch.is_ascii_digit() {
                digits = digits.wrapping_mul(10).wrapping_add((ch - b'0') as u64);
            } else {
                break;
            }
            index += 1;
        }
        digit_count = index - index_of_first_digit - 1;
        exponent = virtual_index_of_point as i64 - index as i64 + 1;
    } else {
        digit_count = index - index_of_first_digit;
        exponent = 0;
    }
    let index_after_digits = index;

    let mut exp_number: i64 = 0;
    if index < len && (bytes[index] == b'e' || bytes[index] == b'E') {
        index += 1;
        exp_number = parse_exponent_number(bytes, &mut index)?;
        exponent += exp_number;
    }

    index = skip_whitespace(bytes, index);
    if index < len || (!has_leading_zero && digit_count == 0) {
        return Err(InvalidNumber::for_input(bytes));
    }

    // Re-scan when the accumulator may have wrapped. Retained digits stay
    // exact; the stop position feeds the exponent correction.
    let mut is_digits_truncated = false;
    if digit_count > 19 {
        digits = 0;
        let mut skip_count: i64 = 0;
        let mut i = index_of_first_digit;
        while i < index_after_digits {
            let ch = bytes[i];
            if ch == b'.' {
                skip_count += 1;
            } else if digits < MIN_19_DIGIT_INTEGER {
                digits = 10 * digits + (ch - b'0') as u64;
            } else {
                break;
            }
            i += 1;
        }
        is_digits_truncated = i < index_after_digits;
        if is_digits_truncated {
            // Each digit the re-scan stopped short of scales the value by
            // ten; the skip count re-aligns runs that crossed the point.
            exponent = virtual_index_of_point as i64 - i as i64 + skip_count + exp_number;
        }
    }

    match uscale::dec_to_f64(is_negative, digits, exponent, is_digits_truncated) {
        Some(value) => Ok(value),
        None => slowpath::parse_reference(bytes).ok_or_else(|| InvalidNumber::for_input(bytes)),
    }
}

/// Scan `hexdigits [. hexdigits] (p|P) [sign] digits` starting at `start`
/// (just past the `0x` prefix). The binary-exponent part is mandatory.
fn parse_rest_of_hex_literal(
    bytes: &[u8],
    start: usize,
    is_negative: bool,
) -> Result<f64, InvalidNumber> {
    let len = bytes.len();
    if start >= len {
        return Err(InvalidNumber::for_input(bytes));
    }
    let mut index = start;
    let index_of_first_digit = index;
    let mut digits: u64 = 0;
    let mut point: Option<usize> = None;

    while index < len {
        let class = CHAR_TO_HEX_MAP[bytes[index] as usize];
        if class >= 0 {
            digits = (digits << 4) | class as u64;
        } else if class == DECIMAL_POINT_CLASS {
            if point.is_some() {
                return Err(InvalidNumber::for_input(bytes));
            }
            point = Some(index);
        } else {
            break;
        }
        index += 1;
    }
    let index_after_digits = index;
    let digit_count;
    let mut exponent: i64;
    let virtual_index_of_point = match point {
        None => {
            digit_count = index_after_digits - index_of_first_digit;
            exponent = 0;
            index_after_digits
        }
        Some(p) => {
            digit_count = index_after_digits - index_of_first_digit - 1;
            // Hex digit positions translate to binary powers in steps of 4.
            exponent = (p as i64 - index_after_digits as i64 + 1) * 4;
            p
        }
    };

    let mut exp_number: i64 = 0;
    let has_exponent = index < len && (bytes[index] == b'p' || bytes[index] == b'P');
    if has_exponent {
        index += 1;
        exp_number = parse_exponent_number(bytes, &mut index)?;
        exponent += exp_number;
    }

    index = skip_whitespace(bytes, index);
    if index < len || digit_count == 0 || !has_exponent {
        return Err(InvalidNumber::for_input(bytes));
    }

    let mut is_digits_truncated = false;
    if digit_count > 16 {
        digits = 0;
        let mut skip_count: i64 = 0;
        let mut i = index_of_first_digit;
        while i < index_after_digits {
            let class = CHAR_TO_HEX_MAP[bytes[i] as usize];
            if class >= 0 {
                if digits < MIN_19_DIGIT_INTEGER {
                    digits = (digits << 4) | class as u64;
                } else {
                    break;
                }
            } else {
                skip_count += 1;
            }
            i += 1;
        }
        is_digits_truncated = i < index_after_digits;
        if is_digits_truncated {
            exponent = (virtual_index_of_point as i64 - i as i64 + skip_count) * 4 + exp_number;
        }
    }

    Ok(uscale::hex_to_f64(
        is_negative,
        digits,
        exponent,
        is_digits_truncated,
    ))
}

/// Parse `[sign] digits` after an exponent indicator, clamping accumulation
/// so a hostile exponent cannot wrap the i64.
fn parse_exponent_number(bytes: &[u8], index: &mut usize) -> Result<i64, InvalidNumber> {
    let len = bytes.len();
    let mut neg_exp = false;
    if *index < len && (bytes[*index] == b'+' || bytes[*index] == b'-') {
        neg_exp = bytes[*index] == b'-';
        *index += 1;
    }
    if *index >= len || !bytes[*index].is_ascii_digit() {
        return Err(InvalidNumber::for_input(bytes));
    }
    let mut exp_number: i64 = 0;
    while *index < len && bytes[*index].is_ascii_digit() {
        if exp_number < MIN_8_DIGIT_INTEGER {
            exp_number = 10 * exp_number + (bytes[*index] - b'0') as i64;
        }
        *index += 1;
    }
    Ok(if neg_exp { -exp_number } else { exp_number })
}

fn parse_nan(bytes: &[u8], index: usize) -> Result<f64, InvalidNumber> {
    if bytes.len() >= index + 3 && &bytes[index..index + 3] == b"NaN" {
        let rest = skip_whitespace(bytes, index + 3);
        if rest == bytes.len() {
            // The sign is deliberately ignored: every NaN spelling maps to
            // the one canonical quiet NaN.
            return Ok(f64::NAN);
        }
    }
    Err(InvalidNumber::for_input(bytes))
}

fn parse_infinity(bytes: &[u8], index: usize, is_negative: bool) -> Result<f64, InvalidNumber> {
    if bytes.len() >= index + 8 && &bytes[index..index + 8] == b"Infinity" {
        let rest = skip_whitespace(bytes, index + 8);
        if rest == bytes.len() {
            return Ok(if is_negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            });
        }
    }
    Err(InvalidNumber::for_input(bytes))
}

/// Advance past bytes ≤ 0x20 (the ASCII control-and-space block).
fn skip_whitespace(bytes: &[u8], mut index: usize) -> usize {
    while index < bytes.len() && bytes[index] <= 0x20 {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_the_control_and_space_block() {
        assert_eq!(skip_whitespace(b"\x00\x09\x0a\x0d\x20x", 0), 5);
        assert_eq!(skip_whitespace(b"x  ", 0), 0);
        assert_eq!(skip_whitespace(b"  ", 0), 2);
    }

    #[test]
    fn exponent_accumulation_clamps() {
        let mut index = 0;
        let exp = parse_exponent_number(b"99999999999999999999", &mut index).unwrap();
        assert_eq!(index, 20);
        assert!(exp >= MIN_8_DIGIT_INTEGER);
        assert!(exp < MIN_8_DIGIT_INTEGER * 10);

        let mut index = 0;
        let exp = parse_exponent_number(b"-00000123", &mut index).unwrap();
        assert_eq!(exp, -123);
    }

    #[test]
    fn truncation_keeps_nineteen_exact_digits() {
        // 1 followed by 24 zeros: the re-scan stops after 19 digits and the
        // exponent absorbs the rest.
        let s = format!("1{}", "0".repeat(24));
        assert_eq!(parse_float(s.as_bytes()).unwrap(), 1e24);
        // Leading zeros never force truncation.
        let s = format!("{}5", "0".repeat(30));
        assert_eq!(parse_float(s.as_bytes()).unwrap(), 5.0);
    }

    #[test]
    fn rescan_crossing_the_point_stays_aligned() {
        let s = format!("{}.{}", "1".repeat(25), "9".repeat(25));
        let expected: f64 = s.parse().unwrap();
        assert_eq!(parse_float(s.as_bytes()).unwrap().to_bits(), expected.to_bits());

        let s = format!("0.{}1e10", "0".repeat(40));
        let expected: f64 = s.parse().unwrap();
        assert_eq!(parse_float(s.as_bytes()).unwrap().to_bits(), expected.to_bits());
    }
}
