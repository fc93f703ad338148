//! Query compilation: user-facing pattern strings to canonical byte
//! sequences.

use crate::error::{FindError, Result};

/// Encoded width for integer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntWidth {
    W1,
    W2,
    #[default]
    W4,
    W8,
}

impl IntWidth {
    pub fn bytes(self) -> usize {
        match self {
            IntWidth::W1 => 1,
            IntWidth::W2 => 2,
            IntWidth::W4 => 4,
            IntWidth::W8 => 8,
        }
    }

    /// Smallest width that holds an unsigned value.
    pub fn fitting(value: u64) -> Self {
        if value <= u8::MAX as u64 {
            IntWidth::W1
        } else if value <= u16::MAX as u64 {
            IntWidth::W2
        } else if value <= u32::MAX as u64 {
            IntWidth::W4
        } else {
            IntWidth::W8
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatWidth {
    #[default]
    F32,
    F64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindMode {
    Text,
    Hex,
    Int { width: IntWidth },
    Float { width: FloatWidth },
}

/// One search request as typed by the user. Transient; rebuilt per
/// invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub pattern: String,
    pub mode: FindMode,
    /// Meaningful for Text mode only; other modes compare raw bytes.
    pub case_sensitive: bool,
}

/// Canonical byte sequence derived deterministically from a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    bytes: Vec<u8>,
}

impl CompiledPattern {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn compile(pattern: &str, mode: FindMode) -> Result<CompiledPattern> {
    let bytes = match mode {
        FindMode::Text => pattern.as_bytes().to_vec(),
        FindMode::Hex => compile_hex(pattern)?,
        FindMode::Int { width } => compile_int(pattern, width)?,
        FindMode::Float { width } => compile_float(pattern, width)?,
    };
    Ok(CompiledPattern { bytes })
}

/// Hex digit pairs, optionally whitespace-separated. Every nibble is exact;
/// no wildcards.
fn compile_hex(pattern: &str) -> Result<Vec<u8>> {
    let invalid = || FindError::InvalidHexPattern(pattern.to_string());

    let mut nibbles = Vec::new();
    for c in pattern.chars() {
        if c.is_ascii_whitespace() {
            continue;
        }
        let nibble = c.to_digit(16).ok_or_else(invalid)?;
        nibbles.push(nibble as u8);
    }
    if nibbles.is_empty() || nibbles.len() % 2 != 0 {
        return Err(invalid());
    }
    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Signed/unsigned decimal or 0x-prefixed integer, encoded little-endian at
/// the requested width (two's complement for negatives).
fn compile_int(pattern: &str, width: IntWidth) -> Result<Vec<u8>> {
    let invalid = || FindError::InvalidInt(pattern.to_string());
    let s = pattern.trim();

    let value: i128 = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|_| invalid())? as i128
    } else {
        s.parse::<i128>().map_err(|_| invalid())?
    };

    let bytes = match width {
        IntWidth::W1 => {
            fits(value, i8::MIN as i128, u8::MAX as i128, invalid)?;
            (value as u8).to_le_bytes().to_vec()
        }
        IntWidth::W2 => {
            fits(value, i16::MIN as i128, u16::MAX as i128, invalid)?;
            (value as u16).to_le_bytes().to_vec()
        }
        IntWidth::W4 => {
            fits(value, i32::MIN as i128, u32::MAX as i128, invalid)?;
            (value as u32).to_le_bytes().to_vec()
        }
        IntWidth::W8 => {
            fits(value, i64::MIN as i128, u64::MAX as i128, invalid)?;
            (value as u64).to_le_bytes().to_vec()
        }
    };
    Ok(bytes)
}

fn fits(
    value: i128,
    min: i128,
    max: i128,
    invalid: impl Fn() -> FindError,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid());
    }
    Ok(())
}

/// Decimal float literal, encoded as little-endian IEEE-754.
fn compile_float(pattern: &str, width: FloatWidth) -> Result<Vec<u8>> {
    let value: f64 = pattern
        .trim()
        .parse()
        .map_err(|_| FindError::InvalidFloat(pattern.to_string()))?;
    Ok(match width {
        FloatWidth::F32 => (value as f32).to_le_bytes().to_vec(),
        FloatWidth::F64 => value.to_le_bytes().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_compiles_to_raw_bytes() {
        let p = compile("RIFF", FindMode::Text).unwrap();
        assert_eq!(p.bytes(), b"RIFF");
    }

    #[test]
    fn hex_pairs_with_and_without_spaces() {
        assert_eq!(compile("41 42", FindMode::Hex).unwrap().bytes(), b"AB");
        assert_eq!(compile("4142", FindMode::Hex).unwrap().bytes(), b"AB");
        assert_eq!(
            compile(" de AD be ef ", FindMode::Hex).unwrap().bytes(),
            &[0xDE, 0xAD, 0xBE, 0xEF]
        );
    }

    #[test]
    fn hex_rejections_carry_the_pattern() {
        for bad in ["414", "4g", "", "  ", "0x41"] {
            let err = compile(bad, FindMode::Hex).unwrap_err();
            assert_eq!(err, FindError::InvalidHexPattern(bad.to_string()));
            assert_eq!(
                err.to_string(),
                format!("Hex pattern '{}' is not valid", bad)
            );
        }
    }

    #[test]
    fn int_256_default_width_is_le_u32() {
        let p = compile("256", FindMode::Int { width: IntWidth::default() }).unwrap();
        assert_eq!(p.bytes(), &[0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn int_widths_and_signs() {
        let w1 = compile("255", FindMode::Int { width: IntWidth::W1 }).unwrap();
        assert_eq!(w1.bytes(), &[0xFF]);

        let neg = compile("-1", FindMode::Int { width: IntWidth::W2 }).unwrap();
        assert_eq!(neg.bytes(), &[0xFF, 0xFF]);

        let hex = compile("0x1234", FindMode::Int { width: IntWidth::W2 }).unwrap();
        assert_eq!(hex.bytes(), &[0x34, 0x12]);

        let w8 = compile("1", FindMode::Int { width: IntWidth::W8 }).unwrap();
        assert_eq!(w8.bytes(), &[1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn int_out_of_range_or_garbage_rejected() {
        assert!(compile("256", FindMode::Int { width: IntWidth::W1 }).is_err());
        assert!(compile("-129", FindMode::Int { width: IntWidth::W1 }).is_err());
        assert!(compile("twelve", FindMode::Int { width: IntWidth::W4 }).is_err());
        let err = compile("nope", FindMode::Int { width: IntWidth::W4 }).unwrap_err();
        assert_eq!(err, FindError::InvalidInt("nope".to_string()));
    }

    #[test]
    fn fitting_width_matches_value_magnitude() {
        assert_eq!(IntWidth::fitting(200), IntWidth::W1);
        assert_eq!(IntWidth::fitting(256), IntWidth::W2);
        assert_eq!(IntWidth::fitting(70_000), IntWidth::W4);
        assert_eq!(IntWidth::fitting(u64::MAX), IntWidth::W8);
    }

    #[test]
    fn float_encodings() {
        let f32p = compile("1.5", FindMode::Float { width: FloatWidth::F32 }).unwrap();
        assert_eq!(f32p.bytes(), &1.5f32.to_le_bytes());

        let f64p = compile("-2.25", FindMode::Float { width: FloatWidth::F64 }).unwrap();
        assert_eq!(f64p.bytes(), &(-2.25f64).to_le_bytes());

        let err = compile("1.2.3", FindMode::Float { width: FloatWidth::F32 }).unwrap_err();
        assert_eq!(err, FindError::InvalidFloat("1.2.3".to_string()));
    }
}
