//! Fast, correctly-rounded parsing of `f64` literals.
//!
//! Converts decimal and hexadecimal floating-point literals (plus the
//! symbolic tokens `NaN` and `Infinity`) into the nearest IEEE 754 binary64,
//! bit-identical to the host's reference converter, without decimal
//! arithmetic on the hot path: the scanner packs the significand into a
//! 64-bit integer and the back-end resolves it with one or two 64×64→128
//! multiplications against a precomputed power-of-ten table.
//!
//! References:
//! - Daniel Lemire, Number Parsing at a Gigabyte per Second,
//!   <https://arxiv.org/abs/2101.11408>
//! - fast_float, <https://github.com/fastfloat/fast_float>

mod chartab;
mod pow10tab;
mod scan;
mod slowpath;
mod uscale;

use std::fmt;
use std::sync::OnceLock;

/// The one error this crate produces: the input is not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNumber {
    diagnostic: String,
}

impl InvalidNumber {
    /// Inputs longer than this are reported by length, not content.
    const MAX_SHOWN_LEN: usize = 1024;

    fn empty() -> Self {
        InvalidNumber {
            diagnostic: "empty input".to_string(),
        }
    }

    fn for_input(bytes: &[u8]) -> Self {
        let diagnostic = if bytes.len() > Self::MAX_SHOWN_LEN {
            format!("for input of length {}", bytes.len())
        } else {
            format!("for input string: {:?}", String::from_utf8_lossy(bytes))
        };
        InvalidNumber { diagnostic }
    }

    /// Human-readable description of what was rejected.
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }
}

impl fmt::Display for InvalidNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid number: {}", self.diagnostic)
    }
}

impl std::error::Error for InvalidNumber {}

/// Result type alias for this crate's parsing functions.
pub type Result<T> = std::result::Result<T, InvalidNumber>;

/// Which numeric back-end resolves decimal literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecBackend {
    Fast,
    Reference,
}

static DEC_BACKEND: OnceLock<DecBackend> = OnceLock::new();

/// Returns the back-end used for decimal literals.
///
/// Read once from `FAF_DEC_BACKEND` (`fast` or `reference`), then cached.
/// `reference` routes every decimal literal through the host converter —
/// useful for differential testing. When unset, defaults to `fast`.
pub(crate) fn dec_backend() -> DecBackend {
    *DEC_BACKEND.get_or_init(|| match std::env::var("FAF_DEC_BACKEND") {
        Ok(value) => {
            if value.eq_ignore_ascii_case("fast") {
                DecBackend::Fast
            } else if value.eq_ignore_ascii_case("reference") {
                DecBackend::Reference
            } else {
                panic!("invalid FAF_DEC_BACKEND={value:?}; expected \"fast\" or \"reference\"")
            }
        }
        Err(std::env::VarError::NotPresent) => DecBackend::Fast,
        Err(std::env::VarError::NotUnicode(_)) => {
            panic!("FAF_DEC_BACKEND must be valid UTF-8")
        }
    })
}

/// Parse a floating-point literal into the nearest `f64`.
///
/// Accepts, after stripping bytes ≤ 0x20 at both ends:
///
/// - decimal literals: `365`, `-3.65`, `.5`, `5.`, `1e-10`, `+1.5E+300`
/// - hexadecimal literals with a mandatory binary exponent:
///   `0x1.8p1`, `-0X1P-1074`
/// - the case-sensitive symbolic tokens `NaN` and `Infinity`, optionally
///   signed (the sign of a `NaN` is ignored)
///
/// The result is bit-identical to the host's correctly-rounded converter;
/// in particular `-0` parses to negative zero.
///
/// ```
/// assert_eq!(faf::parse_f64("365").unwrap(), 365.0);
/// assert_eq!(faf::parse_f64("0x1.8p1").unwrap(), 3.0);
/// assert!(faf::parse_f64("1e").is_err());
/// ```
pub fn parse_f64<S: AsRef<[u8]>>(input: S) -> Result<f64> {
    scan::parse_float(input.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bits(input: &str, expected: f64) {
        let parsed = parse_f64(input).unwrap_or_else(|e| panic!("{input:?} failed: {e}"));
        assert_eq!(
            parsed.to_bits(),
            expected.to_bits(),
            "input={input:?}: got {parsed} ({:#018x}), expected {expected} ({:#018x})",
            parsed.to_bits(),
            expected.to_bits(),
        );
    }

    #[test]
    fn decimal_edge_cases() {
        let cases: &[(&str, f64)] = &[
            // Exact integers
            ("0", 0.0),
            ("1", 1.0),
            ("42", 42.0),
            ("365", 365.0),
            ("9007199254740992", 9007199254740992.0), // 2^53
            ("9007199254740993", 9007199254740992.0), // 2^53 + 1 rounds back
            // Simple decimals
            ("0.5", 0.5),
            ("1.0", 1.0),
            ("3.65", 3.65),
            ("3.14", 3.14),
            ("2.718281828459045", 2.718281828459045),
            ("0.1", 0.1),
            // Signs
            ("-1.0", -1.0),
            ("-3.14", -3.14),
            ("+1.5", 1.5),
            // Point placement
            ("5.", 5.0),
            (".5", 0.5),
            ("5.e3", 5000.0),
            (".5e1", 5.0),
            // Leading zeros
            ("0.001", 0.001),
            ("0.0000000000000000000001", 1e-22),
            ("0.", 0.0),
            ("0e5", 0.0),
            ("007", 7.0),
            // Scientific notation
            ("1e10", 1e10),
            ("1.5e2", 150.0),
            ("1e-10", 1e-10),
            ("1E10", 1e10),
            ("1e+10", 1e10),
            ("1e0", 1.0),
            ("1e-0", 1.0),
            // Large/small magnitudes
            ("1e308", 1e308),
            ("1.7976931348623157e308", f64::MAX),
            ("1e-308", 1e-308),
            ("2.2250738585072014e-308", 2.2250738585072014e-308), // min normal
            ("2.2250738585072011e-308", 2.2250738585072011e-308),
            ("4.9e-324", 4.9e-324),
            ("4.9406564584124654e-324", f64::from_bits(1)), // min subnormal
            // Overflow and underflow
            ("1e309", f64::INFINITY),
            ("-1e309", f64::NEG_INFINITY),
            ("1e400", f64::INFINITY),
            ("1e-400", 0.0),
            ("-1e-400", -0.0),
            // More than 19 significant digits
            ("12345678901234567890.0", 12345678901234567890.0),
            (
                "2.22507385850720113605740979670913197593481954635164564e-308",
                2.2250738585072011e-308,
            ),
            // A canada.json style coordinate
            ("-65.613616999999977", -65.613616999999977),
        ];
        for &(input, expected) in cases {
            assert_bits(input, expected);
        }
    }

    #[test]
    fn sign_of_zero() {
        assert_eq!(parse_f64("0").unwrap().to_bits(), 0.0f64.to_bits());
        assert_eq!(parse_f64("-0").unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(parse_f64("-0.0").unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(parse_f64("-0.0e7").unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(parse_f64("+0").unwrap().to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn symbolic_tokens() {
        for input in ["NaN", "+NaN", "-NaN", " NaN "] {
            let parsed = parse_f64(input).unwrap();
            assert!(parsed.is_nan(), "{input:?}");
            assert_eq!(parsed.to_bits(), f64::NAN.to_bits(), "{input:?}");
        }
        assert_eq!(parse_f64("Infinity").unwrap(), f64::INFINITY);
        assert_eq!(parse_f64("+Infinity").unwrap(), f64::INFINITY);
        assert_eq!(parse_f64("-Infinity").unwrap(), f64::NEG_INFINITY);
        assert_eq!(parse_f64("  Infinity\t").unwrap(), f64::INFINITY);
    }

    #[test]
    fn grammar_rejections() {
        let bad = [
            "", ".", "+", "-", "1e", "1e+", "1e-", "e5", ".e5", "1e++5", "0x", "0x1", "0x1p",
            "0x1p+", "0xp3", "0x.p3", "0x1.0.0p0", "1.2.3", "--1", "+-1", "1 2", "+ 1", "1.5x",
            "00x1p1", "Infini", "InfinityX", "infinity", "nan", "NAN", "NaNa",
        ];
        for input in bad {
            assert!(
                parse_f64(input).is_err(),
                "expected {input:?} to be rejected"
            );
        }
        // Non-ASCII bytes never panic, only fail.
        assert!(parse_f64([0xffu8, 0x31]).is_err());
        assert!(parse_f64("1.5\u{00a0}").is_err());
        assert!(parse_f64("١").is_err());
    }

    #[test]
    fn whitespace_stripping() {
        assert_bits("  1.5  ", 1.5);
        assert_bits("\t42\n", 42.0);
        assert_bits(" -0.5", -0.5);
        assert_bits("\x001\x00", 1.0);
        assert_bits("\x0b365\x1f", 365.0);
        assert!(parse_f64("1 .5").is_err());
        assert!(parse_f64("- 1").is_err());
        assert!(parse_f64("   ").is_err());
    }

    #[test]
    fn long_significands() {
        assert_bits(&format!("1.{}1", "0".repeat(50)), 1.0);
        assert_bits(&format!("1{}", "0".repeat(20)), 1e20);
        assert_bits(&format!("1{}e-30", "0".repeat(30)), 1.0);
        // Digit runs that make the re-scan stop before and after the point.
        for s in [
            format!("{}.{}", "1".repeat(25), "9".repeat(25)),
            format!("{}.{}", "9".repeat(19), "9".repeat(19)),
            format!("0.{}1", "0".repeat(100)),
            format!("{}e-40", "7".repeat(25)),
        ] {
            let expected: f64 = s.parse().unwrap();
            assert_bits(&s, expected);
        }
    }

    #[test]
    fn exponent_clamp() {
        let huge = format!("1e{}", "9".repeat(20));
        assert_eq!(parse_f64(&huge).unwrap(), f64::INFINITY);
        let tiny = format!("1e-{}", "9".repeat(20));
        assert_eq!(parse_f64(&tiny).unwrap().to_bits(), 0);
        let s = format!("1e+{}", "0".repeat(40));
        assert_bits(&s, 1.0);
    }

    #[test]
    fn hex_literals() {
        let cases: &[(&str, f64)] = &[
            ("0x0p0", 0.0),
            ("0x0.0p0", 0.0),
            ("0x1p0", 1.0),
            ("0x1p1", 2.0),
            ("0x1.8p1", 3.0),
            ("0x1.0p0", 1.0),
            ("0X1P10", 1024.0),
            ("0x10p-4", 1.0),
            ("0x.8p1", 1.0),
            ("0xA.8p0", 10.5),
            ("0xa.8p0", 10.5),
            ("-0x1.8p-1", -0.75),
            ("0x1p+8", 256.0),
            ("0x1.fffffffffffffp+1023", f64::MAX),
            ("0x1p-1074", f64::from_bits(1)),
            ("0x1.1p-1075", f64::from_bits(1)),
            ("0x1p-1075", 0.0),
            ("0x1p-1100", 0.0),
            ("0x1p1024", f64::INFINITY),
            ("-0x1p1024", f64::NEG_INFINITY),
            // Max normal plus exactly half an ULP rounds to even: infinity.
            ("0x1.fffffffffffff8p+1023", f64::INFINITY),
            ("  0x1.8p1  ", 3.0),
        ];
        for &(input, expected) in cases {
            assert_bits(input, expected);
        }
        assert_eq!(parse_f64("-0x0p0").unwrap().to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn hex_truncated_significands() {
        // 17 hex digits force the re-scan; the value stays exact because the
        // dropped digit only feeds the sticky bit.
        let expected = 0x1234_5678_9abc_def0_1u128 as f64;
        assert_bits("0x123456789abcdef01p0", expected);
        // Scaling by a power of two shifts the exponent only.
        let expected = 0x1234_5678_9abc_def0_1u128 as f64 * (2.0f64).powi(-100);
        assert_bits("0x123456789abcdef01p-100", expected);
        // Point inside the truncated run: nine fraction digits scale by 16^-9.
        let expected = 0x1234_5678_9abc_def0_1u128 as f64 * (2.0f64).powi(-36);
        assert_bits("0x12345678.9abcdef01p0", expected);
    }

    #[test]
    fn matches_reference_across_magnitudes() {
        for q in -345..=310 {
            for m in [
                "1",
                "17",
                "123456789",
                "999999999999999999",
                "10000000000000000001",
            ] {
                let s = format!("{m}e{q}");
                let expected: f64 = s.parse().unwrap();
                assert_bits(&s, expected);
            }
        }
    }

    #[test]
    fn diagnostics() {
        let err = parse_f64("").unwrap_err();
        assert_eq!(err.diagnostic(), "empty input");
        let err = parse_f64("   ").unwrap_err();
        assert_eq!(err.diagnostic(), "empty input");
        let err = parse_f64("bogus").unwrap_err();
        assert!(err.diagnostic().contains("bogus"));
        assert!(format!("{err}").starts_with("invalid number"));
        let err = parse_f64("z".repeat(5000)).unwrap_err();
        assert!(err.diagnostic().contains("length 5000"));
    }
}
