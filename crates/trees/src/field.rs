//! Field element encodings.
//!
//! Field elements travel as arbitrary-precision integers (decimal text or
//! `0x`-prefixed big-endian hex). Every decoder rejects values at or above the
//! BN254 scalar modulus instead of silently reducing them.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;

use crate::error::Error;

/// Number of hex digits in an encoded field element (32 bytes).
pub const HEX_DIGITS: usize = 64;

/// The BN254 scalar field modulus.
pub fn modulus() -> BigUint {
    Fr::MODULUS.into()
}

/// Convert an integer to a field element, rejecting values `>= modulus`.
pub fn from_biguint(value: &BigUint) -> Result<Fr, Error> {
    if *value >= modulus() {
        return Err(Error::FieldElement(format!(
            "{value} is not below the field modulus"
        )));
    }
    Ok(Fr::from(value.clone()))
}

/// Canonical integer representative of a field element.
pub fn to_biguint(value: Fr) -> BigUint {
    value.into()
}

/// Parse a decimal string into a field element.
pub fn from_decimal(s: &str) -> Result<Fr, Error> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::FieldElement(format!("{s:?} is not a decimal integer")));
    }
    let value = BigUint::from_str_radix(s, 10)
        .map_err(|e| Error::FieldElement(format!("{s:?}: {e}")))?;
    from_biguint(&value)
}

/// Encode as `0x` followed by 64 lowercase big-endian hex digits.
pub fn to_hex(value: Fr) -> String {
    format!("0x{}", hex::encode(value.into_bigint().to_bytes_be()))
}

/// Parse a hex string (optional `0x` prefix, at most 64 digits).
pub fn from_hex(s: &str) -> Result<Fr, Error> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() || digits.len() > HEX_DIGITS {
        return Err(Error::FieldElement(format!(
            "{s:?} must have between 1 and {HEX_DIGITS} hex digits"
        )));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::FieldElement(format!("{s:?} is not hex")));
    }
    let value = BigUint::from_str_radix(digits, 16)
        .map_err(|e| Error::FieldElement(format!("{s:?}: {e}")))?;
    from_biguint(&value)
}

/// Serde adapter writing a field element as a hex string.
pub mod serde_hex {
    use ark_bn254::Fr;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fr, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::from_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn test_hex_is_zero_padded() {
        let hex = to_hex(Fr::from(255u64));

        assert_eq!(hex.len(), 2 + HEX_DIGITS);
        assert!(hex.starts_with("0x"));
        assert!(hex.ends_with("00ff"));
        assert_eq!(&hex[2..62], "0".repeat(60));
    }

    #[test]
    fn test_hex_parses_back() {
        let value = from_decimal(
            "2186774891605521484511138647132707263205739024356090574223746683689524510919",
        )
        .unwrap();

        assert_eq!(from_hex(&to_hex(value)).unwrap(), value);
        assert_eq!(from_hex("ff").unwrap(), Fr::from(255u64));
    }

    #[test]
    fn test_modulus_rejected() {
        let p = modulus();

        assert!(from_biguint(&p).is_err());
        assert!(from_biguint(&(p.clone() - BigUint::one())).is_ok());
        assert!(from_decimal(&p.to_string()).is_err());
        assert!(from_hex(&format!("0x{}", p.to_str_radix(16))).is_err());
    }

    #[test]
    fn test_bad_text_rejected() {
        assert!(from_decimal("").is_err());
        assert!(from_decimal("-1").is_err());
        assert!(from_decimal("12a").is_err());
        assert!(from_hex("0x").is_err());
        assert!(from_hex("0xzz").is_err());
        assert!(from_hex(&format!("0x1{}", "0".repeat(64))).is_err());
    }

    #[test]
    fn test_biguint_roundtrip() {
        let value = BigUint::from(123_456_789u64);
        assert_eq!(to_biguint(from_biguint(&value).unwrap()), value);
    }
}
