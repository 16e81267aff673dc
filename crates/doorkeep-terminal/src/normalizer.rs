//! Swipe code normalizer.
//!
//! Some sites use readers that prepend a fixed-length header to every
//! swipe and store badges with a class sentinel in place of the first code
//! character. With the transform enabled the normalizer drops the header and
//! writes the sentinel; with it disabled codes pass through unchanged.
//!
//! ```
//! use doorkeep_core::RawCode;
//! use doorkeep_terminal::{Normalizer, NormalizerConfig};
//!
//! let normalizer = Normalizer::new(NormalizerConfig {
//!     strip_header: true,
//!     ..NormalizerConfig::default()
//! });
//!
//! let code = normalizer.normalize(&RawCode::new("XXXXXXXXXXu123")).unwrap();
//! assert_eq!(code.as_str(), "u123");
//! ```

use doorkeep_core::constants::{DEFAULT_HEADER_LENGTH, DEFAULT_SENTINEL};
use doorkeep_core::{Error, NormalizedCode, RawCode, Result};
use serde::{Deserialize, Serialize};

/// Site transform settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Enable the header-strip transform.
    pub strip_header: bool,

    /// Number of leading characters dropped.
    pub header_len: usize,

    /// Character written over the first remaining character.
    pub sentinel: char,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_header: false,
            header_len: DEFAULT_HEADER_LENGTH,
            sentinel: DEFAULT_SENTINEL,
        }
    }
}

/// Turns a [`RawCode`] into the form stored in the credential table.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Apply the configured transform.
    ///
    /// Slicing counts characters, not bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCode`] when the transform is enabled and the
    /// code is not longer than the header.
    pub fn normalize(&self, raw: &RawCode) -> Result<NormalizedCode> {
        if !self.config.strip_header {
            return Ok(NormalizedCode::new(raw.as_str()));
        }

        let length = raw.char_len();
        if length <= self.config.header_len {
            return Err(Error::malformed(format!(
                "{length} characters, expected more than the {}-character header",
                self.config.header_len
            )));
        }

        let code: String = std::iter::once(self.config.sentinel)
            .chain(raw.as_str().chars().skip(self.config.header_len + 1))
            .collect();

        Ok(NormalizedCode::new(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn stripping() -> Normalizer {
        Normalizer::new(NormalizerConfig {
            strip_header: true,
            ..NormalizerConfig::default()
        })
    }

    #[rstest]
    #[case("XXXXXXXXXXu123", "u123")]
    #[case("XXXXXXXXXX9123", "u123")]
    #[case("0123456789A", "u")]
    #[case("HHHHHHHHHH\u{e9}\u{e9}\u{e9}", "u\u{e9}\u{e9}")]
    fn test_strip_and_sentinel(#[case] raw: &str, #[case] expected: &str) {
        let code = stripping().normalize(&RawCode::new(raw)).unwrap();
        assert_eq!(code.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("short")]
    #[case("XXXXXXXXXX")]
    #[case("\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}")]
    fn test_header_only_codes_are_malformed(#[case] raw: &str) {
        let result = stripping().normalize(&RawCode::new(raw));
        assert!(matches!(result, Err(Error::MalformedCode { .. })));
    }

    #[test]
    fn test_disabled_transform_passes_through() {
        let normalizer = Normalizer::default();
        for raw in ["", "u123", "XXXXXXXXXXu123"] {
            assert_eq!(normalizer.normalize(&RawCode::new(raw)).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_disabled_transform_is_idempotent() {
        let normalizer = Normalizer::default();
        for raw in ["", "u123", "XXXXXXXXXXu123", "%B;9042?"] {
            let once = normalizer.normalize(&RawCode::new(raw)).unwrap();
            let twice = normalizer.normalize(&RawCode::new(once.as_str())).unwrap();
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_custom_header_and_sentinel() {
        let normalizer = Normalizer::new(NormalizerConfig {
            strip_header: true,
            header_len: 3,
            sentinel: 'k',
        });

        let code = normalizer.normalize(&RawCode::new("%B;9042")).unwrap();
        assert_eq!(code.as_str(), "k042");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: NormalizerConfig = serde_json::from_str(r#"{"strip_header": true}"#).unwrap();
        assert!(config.strip_header);
        assert_eq!(config.header_len, 10);
        assert_eq!(config.sentinel, 'u');
    }

    proptest! {
        #[test]
        fn prop_length_drops_by_header(raw in ".{11,80}") {
            let code = stripping().normalize(&RawCode::new(raw.clone())).unwrap();
            prop_assert_eq!(code.char_len(), raw.chars().count() - DEFAULT_HEADER_LENGTH);
            prop_assert!(code.as_str().starts_with(DEFAULT_SENTINEL));
        }

        #[test]
        fn prop_never_panics(raw in ".{0,40}", header_len in 0usize..20) {
            let normalizer = Normalizer::new(NormalizerConfig {
                strip_header: true,
                header_len,
                sentinel: 'u',
            });
            let _ = normalizer.normalize(&RawCode::new(raw));
        }
    }
}
