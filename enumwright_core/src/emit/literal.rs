//! C++ literal formatting.

use crate::config::StringType;

const I32_MIN: i128 = i32::MIN as i128;
const I32_MAX: i128 = i32::MAX as i128;
const U32_MAX: i128 = u32::MAX as i128;
const I64_MIN: i128 = i64::MIN as i128;
const I64_MAX: i128 = i64::MAX as i128;
const U64_MAX: i128 = u64::MAX as i128;

/// Decimal literal whose type holds `value`. Values past 64 bits are built
/// from two halves cast to `wide_type`.
pub fn int_literal(value: i128, wide_type: &str) -> String {
    match value {
        I32_MIN => "(-2147483647 - 1)".to_string(),
        v if v > I32_MIN && v <= I32_MAX => v.to_string(),
        v if v > I32_MAX && v <= U32_MAX => format!("{}U", v),
        I64_MIN => "(-9223372036854775807LL - 1)".to_string(),
        v if v > I64_MIN && v <= I64_MAX => format!("{}LL", v),
        v if v > I64_MAX && v <= U64_MAX => format!("{}ULL", v),
        v => composed_literal(v as u128, wide_type),
    }
}

/// Hexadecimal literal for a flag mask.
pub fn hex_literal(value: u128, wide_type: &str) -> String {
    if value <= u32::MAX as u128 {
        format!("0x{:X}", value)
    } else if value <= u64::MAX as u128 {
        format!("0x{:X}ULL", value)
    } else {
        composed_literal(value, wide_type)
    }
}

fn composed_literal(bits: u128, wide_type: &str) -> String {
    let high = (bits >> 64) as u64;
    let low = bits as u64;
    format!(
        "((static_cast<{ty}>(0x{high:X}ULL) << 64) | static_cast<{ty}>(0x{low:X}ULL))",
        ty = wide_type
    )
}

/// Quoted string literal, escaped, with the prefix the string type needs.
pub fn string_literal(text: &str, string_type: StringType) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    out.push_str(string_type.literal_prefix());
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // ?? followed by certain characters forms a trigraph in older standards
            '?' => out.push_str("\\?"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Splits free text into `//` comment lines.
pub fn comment_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                "//".to_string()
            } else if line.ends_with('\\') {
                // A trailing backslash would splice the next source line into the comment
                format!("// {} //", line)
            } else {
                format!("// {}", line)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_literals_are_plain() {
        assert_eq!(int_literal(0, "T"), "0");
        assert_eq!(int_literal(-5, "T"), "-5");
        assert_eq!(int_literal(2147483647, "T"), "2147483647");
        assert_eq!(int_literal(-2147483647, "T"), "-2147483647");
    }

    #[test]
    fn test_boundary_literals() {
        assert_eq!(int_literal(i32::MIN as i128, "T"), "(-2147483647 - 1)");
        assert_eq!(int_literal(2147483648, "T"), "2147483648U");
        assert_eq!(int_literal(u32::MAX as i128, "T"), "4294967295U");
        assert_eq!(int_literal(4294967296, "T"), "4294967296LL");
        assert_eq!(int_literal(-2147483649, "T"), "-2147483649LL");
        assert_eq!(int_literal(i64::MIN as i128, "T"), "(-9223372036854775807LL - 1)");
        assert_eq!(int_literal(u64::MAX as i128, "T"), "18446744073709551615ULL");
    }

    #[test]
    fn test_wide_literals_compose_halves() {
        assert_eq!(
            int_literal(1i128 << 64, "underlying_type"),
            "((static_cast<underlying_type>(0x1ULL) << 64) | static_cast<underlying_type>(0x0ULL))"
        );
        assert_eq!(
            int_literal(-1i128 << 70, "T"),
            "((static_cast<T>(0xFFFFFFFFFFFFFFC0ULL) << 64) | static_cast<T>(0x0ULL))"
        );
    }

    #[test]
    fn test_hex_literals() {
        assert_eq!(hex_literal(0, "T"), "0x0");
        assert_eq!(hex_literal(0x80, "T"), "0x80");
        assert_eq!(hex_literal(0x1_0000_0000, "T"), "0x100000000ULL");
        assert!(hex_literal(1u128 << 100, "T").starts_with("((static_cast<T>"));
    }

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(string_literal("Red", StringType::Narrow), "\"Red\"");
        assert_eq!(string_literal("Red", StringType::Wide), "L\"Red\"");
        assert_eq!(
            string_literal("say \"hi\"\\now?", StringType::Narrow),
            "\"say \\\"hi\\\"\\\\now\\?\""
        );
        assert_eq!(string_literal("a\nb", StringType::Narrow), "\"a\\nb\"");
        assert_eq!(string_literal("\u{1}", StringType::Narrow), "\"\\001\"");
    }

    #[test]
    fn test_comment_lines() {
        assert_eq!(comment_lines("one\n\ntwo  "), vec!["// one", "//", "// two"]);
        assert!(comment_lines("").is_empty());
    }

    #[test]
    fn test_comment_line_ending_in_backslash_is_closed() {
        assert_eq!(
            comment_lines("Windows root C:\\\nsecond"),
            vec!["// Windows root C:\\ //", "// second"]
        );
        for line in comment_lines("a\\\nb\\  ") {
            assert!(!line.ends_with('\\'), "line continues: {:?}", line);
        }
    }
}
