//! Charset transcoding for text payloads.
//!
//! CSV responses from the API arrive in one encoding and are persisted in
//! another (e.g. `shift_jis` source re-encoded to `utf-8`, or `utf-8`
//! re-encoded to `cp932` for spreadsheet tools on Windows). The read and
//! write sides are distinct values so locale-specific pairs can be expressed.

use encoding_rs::{Encoding, UTF_8};

use super::error::FetchError;

/// A (read, write) pair of text encodings.
///
/// `read` describes the bytes received from the server; `write` describes
/// the bytes persisted to disk. Both sides are strict: malformed input or
/// unmappable output is reported as a decode failure rather than replaced.
#[derive(Debug, Clone, Copy)]
pub struct Transcoding {
    read: &'static Encoding,
    write: &'static Encoding,
}

impl Default for Transcoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl Transcoding {
    /// UTF-8 on both sides (the common case; transcoding is a no-op).
    #[must_use]
    pub fn utf8() -> Self {
        Self {
            read: UTF_8,
            write: UTF_8,
        }
    }

    /// Resolves a transcoding pair from WHATWG encoding labels.
    ///
    /// Labels are matched case-insensitively; `"shift_jis"`, `"sjis"`,
    /// `"cp932"` and `"windows-31j"` all resolve to the same decoder.
    /// Returns `None` for a label that does not name a known encoding.
    #[must_use]
    pub fn from_labels(read: &str, write: &str) -> Option<Self> {
        let read = Encoding::for_label(normalize_label(read).as_bytes())?;
        let write = Encoding::for_label(normalize_label(write).as_bytes())?;
        Some(Self { read, write })
    }

    /// Returns the name of the read-side encoding.
    #[must_use]
    pub fn read_name(&self) -> &'static str {
        self.read.name()
    }

    /// Returns the name of the write-side encoding.
    #[must_use]
    pub fn write_name(&self) -> &'static str {
        self.write.name()
    }

    /// Decodes `bytes` with the read encoding and re-encodes the result
    /// with the write encoding.
    ///
    /// When both sides are the same encoding and the input is well-formed,
    /// the bytes pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` when the input is malformed for the
    /// read encoding, or the decoded text has no representation in the
    /// write encoding. `url` is used for error context only.
    pub fn transcode(&self, url: &str, bytes: &[u8]) -> Result<Vec<u8>, FetchError> {
        let (text, _, had_errors) = self.read.decode(bytes);
        if had_errors {
            return Err(FetchError::decode(
                url,
                format!("response body is not valid {}", self.read.name()),
            ));
        }

        let (encoded, _, had_unmappable) = self.write.encode(&text);
        if had_unmappable {
            return Err(FetchError::decode(
                url,
                format!("decoded text cannot be represented in {}", self.write.name()),
            ));
        }

        Ok(encoded.into_owned())
    }
}

/// The WHATWG registry spells the Windows code page label `ms932`;
/// `cp932` is the name locale tooling actually uses, so accept it too.
fn normalize_label(label: &str) -> &str {
    if label.eq_ignore_ascii_case("cp932") {
        "ms932"
    } else {
        label
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_identity_passthrough() {
        let t = Transcoding::utf8();
        let input = "id,name\n001,統計\n".as_bytes();
        let out = t.transcode("http://test/", input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_from_labels_resolves_aliases() {
        // cp932 is an alias of shift_jis in the WHATWG registry
        let t = Transcoding::from_labels("cp932", "utf-8").unwrap();
        assert_eq!(t.read_name(), "Shift_JIS");
        assert_eq!(t.write_name(), "UTF-8");

        let t = Transcoding::from_labels("sjis", "UTF-8").unwrap();
        assert_eq!(t.read_name(), "Shift_JIS");
    }

    #[test]
    fn test_from_labels_rejects_unknown() {
        assert!(Transcoding::from_labels("ebcdic-37", "utf-8").is_none());
        assert!(Transcoding::from_labels("utf-8", "no-such-charset").is_none());
    }

    #[test]
    fn test_shift_jis_to_utf8() {
        // "統計" in Shift_JIS
        let input: &[u8] = &[0x93, 0x9D, 0x8C, 0x76];
        let t = Transcoding::from_labels("shift_jis", "utf-8").unwrap();
        let out = t.transcode("http://test/", input).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "統計");
    }

    #[test]
    fn test_utf8_to_shift_jis() {
        let t = Transcoding::from_labels("utf-8", "shift_jis").unwrap();
        let out = t.transcode("http://test/", "統計".as_bytes()).unwrap();
        assert_eq!(out, vec![0x93, 0x9D, 0x8C, 0x76]);
    }

    #[test]
    fn test_malformed_input_is_decode_error() {
        // 0x80 is not a valid UTF-8 lead byte
        let t = Transcoding::from_labels("utf-8", "utf-8").unwrap();
        let result = t.transcode("http://test/", &[0x80, 0x81]);
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }

    #[test]
    fn test_unmappable_output_is_decode_error() {
        // Cyrillic maps into JIS X 0208, so use an emoji, which does not.
        let t = Transcoding::from_labels("utf-8", "shift_jis").unwrap();
        let result = t.transcode("http://test/", "🗾".as_bytes());
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }
}
