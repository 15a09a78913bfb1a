//! Randomized differential tests against the host converter.
//!
//! Bit patterns drawn from the whole u64 space are rendered in decimal and
//! hexadecimal textual forms and must parse back bit-identical. Fixed-seed
//! property tests catch edge cases hand-written tables miss.

use proptest::prelude::*;

/// Format a finite f64 as a hex literal, `±0x1.fffp±e` for normals and
/// `±0x0.fffp-1022` for subnormals (the C `%a` shape).
fn to_hex_string(value: f64) -> String {
    let bits = value.to_bits();
    let sign = if bits >> 63 == 1 { "-" } else { "" };
    let biased = ((bits >> 52) & 0x7FF) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    if biased == 0 {
        if fraction == 0 {
            format!("{sign}0x0.0p0")
        } else {
            format!("{sign}0x0.{fraction:013x}p-1022")
        }
    } else {
        format!("{sign}0x1.{fraction:013x}p{}", biased - 1023)
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 25_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn decimal_shortest_form_roundtrips(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        prop_assume!(value.is_finite());
        let s = format!("{value}");
        let parsed = faf::parse_f64(&s).unwrap();
        prop_assert_eq!(parsed.to_bits(), value.to_bits(), "{}", s);
    }

    #[test]
    fn decimal_exponent_form_matches_reference(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        prop_assume!(value.is_finite());
        let s = format!("{value:e}");
        let expected: f64 = s.parse().unwrap();
        let parsed = faf::parse_f64(&s).unwrap();
        prop_assert_eq!(parsed.to_bits(), expected.to_bits(), "{}", s);
    }

    #[test]
    fn hex_form_roundtrips(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        prop_assume!(value.is_finite());
        let s = to_hex_string(value);
        let parsed = faf::parse_f64(&s).unwrap();
        prop_assert_eq!(parsed.to_bits(), value.to_bits(), "{}", s);
    }

    #[test]
    fn integer_times_power_matches_reference(
        significand in any::<u64>(),
        exponent in -350i32..=350,
    ) {
        let s = format!("{significand}e{exponent}");
        let expected: f64 = s.parse().unwrap();
        let parsed = faf::parse_f64(&s).unwrap();
        prop_assert_eq!(parsed.to_bits(), expected.to_bits(), "{}", s);
    }

    #[test]
    fn long_mantissas_match_reference(
        digits in proptest::collection::vec(0u8..10, 1..45),
        point in proptest::option::of(0usize..45),
        exponent in proptest::option::of(-320i32..=320),
    ) {
        let mut s = String::new();
        for (i, d) in digits.iter().enumerate() {
            if point == Some(i) {
                s.push('.');
            }
            s.push((b'0' + d) as char);
        }
        if let Some(e) = exponent {
            s.push_str(&format!("e{e}"));
        }
        let expected: f64 = s.parse().unwrap();
        let parsed = faf::parse_f64(&s).unwrap();
        prop_assert_eq!(parsed.to_bits(), expected.to_bits(), "{}", s);
    }
}

#[test]
fn every_power_of_two_roundtrips() {
    for k in -1074..=1023i32 {
        let value = f64::from_bits(if k < -1022 {
            // Subnormals: a single mantissa bit.
            1u64 << (k + 1074)
        } else {
            ((k + 1023) as u64) << 52
        });
        for s in [format!("{value:e}"), to_hex_string(value)] {
            let parsed = faf::parse_f64(&s).unwrap();
            assert_eq!(parsed.to_bits(), value.to_bits(), "{s}");
        }
    }
}

#[test]
fn near_halfway_neighborhoods_match_reference() {
    // Walk a few ULPs around powers of ten, where ties cluster.
    for p in [0i32, 1, 10, 22, 23, 100, 288, 308, -10, -22, -100, -300] {
        let center: f64 = format!("1e{p}").parse().unwrap();
        let bits = center.to_bits();
        for offset in -3i64..=3 {
            let value = f64::from_bits(bits.wrapping_add(offset as u64));
            if !value.is_finite() {
                continue;
            }
            for s in [format!("{value}"), format!("{value:e}"), to_hex_string(value)] {
                let parsed = faf::parse_f64(&s).unwrap();
                assert_eq!(parsed.to_bits(), value.to_bits(), "{s}");
            }
        }
    }
}
