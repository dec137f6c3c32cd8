//! Template file reading and decoding

use std::fs;
use std::io::ErrorKind;
use std::str::FromStr;

use thiserror::Error;

use crate::error::LoadError;
use crate::repository::path::TemplateId;

/// Character encodings a template file may be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Utf16Le,
    Utf16Be,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Latin1 => "Latin-1",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        };
        write!(f, "{}", name)
    }
}

/// Error for encoding names `FromStr` does not recognize
#[derive(Debug, Error)]
#[error("Unknown encoding: {0:?} (expected utf-8, latin-1, utf-16le, or utf-16be)")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "utf-16le" | "utf16le" => Ok(Encoding::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Encoding::Utf16Be),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

/// Read and decode the file a template id resolves to
///
/// The whole file is read or the call fails; there are no partial results.
/// A leading byte order mark is not part of the template and is dropped.
pub fn load(id: &TemplateId, encoding: Encoding) -> Result<String, LoadError> {
    let path = id.path();
    let bytes = fs::read(&path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            LoadError::NotFound {
                name: id.name().to_string(),
                path: path.clone(),
            }
        } else {
            LoadError::Io {
                path: path.clone(),
                source: err,
            }
        }
    })?;
    let text = decode(&bytes, encoding).ok_or(LoadError::Decoding { path, encoding })?;
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(text),
    }
}

fn decode(bytes: &[u8], encoding: Encoding) -> Option<String> {
    match encoding {
        Encoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
        // Latin-1 code points map one-to-one onto the first 256 scalars
        Encoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        Encoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
    }
}

fn decode_utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| combine([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_for(dir: &std::path::Path, name: &str) -> TemplateId {
        TemplateId::new(dir, name, "txt").expect("Should build id")
    }

    #[test]
    fn test_load_utf8() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        fs::write(dir.path().join("hello.txt"), "Hello {{name}}!").expect("Should write");
        let text = load(&id_for(dir.path(), "hello"), Encoding::Utf8).expect("Should load");
        assert_eq!(text, "Hello {{name}}!");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let err = load(&id_for(dir.path(), "absent"), Encoding::Utf8).expect_err("Should fail");
        match err {
            LoadError::NotFound { name, path } => {
                assert_eq!(name, "absent");
                assert!(path.ends_with("absent.txt"));
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_decoding_error() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        fs::write(dir.path().join("bad.txt"), [0xc3, 0x28]).expect("Should write");
        let err = load(&id_for(dir.path(), "bad"), Encoding::Utf8).expect_err("Should fail");
        assert!(matches!(
            err,
            LoadError::Decoding {
                encoding: Encoding::Utf8,
                ..
            }
        ));
    }

    #[test]
    fn test_latin1_never_fails_to_decode() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        fs::write(dir.path().join("cafe.txt"), [b'c', b'a', b'f', 0xe9]).expect("Should write");
        let text = load(&id_for(dir.path(), "cafe"), Encoding::Latin1).expect("Should load");
        assert_eq!(text, "café");
    }

    #[test]
    fn test_utf16le_with_bom() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let mut bytes = vec![0xff, 0xfe];
        for unit in "Hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(dir.path().join("hi.txt"), bytes).expect("Should write");
        let text = load(&id_for(dir.path(), "hi"), Encoding::Utf16Le).expect("Should load");
        assert_eq!(text, "Hi");
    }

    #[test]
    fn test_utf16be_without_bom() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let mut bytes = Vec::new();
        for unit in "Hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        fs::write(dir.path().join("hi.txt"), bytes).expect("Should write");
        let text = load(&id_for(dir.path(), "hi"), Encoding::Utf16Be).expect("Should load");
        assert_eq!(text, "Hi");
    }

    #[test]
    fn test_odd_length_utf16_is_decoding_error() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        fs::write(dir.path().join("odd.txt"), [0x00, 0x48, 0x00]).expect("Should write");
        let err = load(&id_for(dir.path(), "odd"), Encoding::Utf16Be).expect_err("Should fail");
        assert!(matches!(err, LoadError::Decoding { .. }));
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        fs::write(dir.path().join("bom.txt"), b"\xef\xbb\xbfHello").expect("Should write");
        let text = load(&id_for(dir.path(), "bom"), Encoding::Utf8).expect("Should load");
        assert_eq!(text, "Hello");
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("utf-8".parse::<Encoding>().ok(), Some(Encoding::Utf8));
        assert_eq!("UTF8".parse::<Encoding>().ok(), Some(Encoding::Utf8));
        assert_eq!("latin-1".parse::<Encoding>().ok(), Some(Encoding::Latin1));
        assert_eq!(
            "ISO-8859-1".parse::<Encoding>().ok(),
            Some(Encoding::Latin1)
        );
        assert_eq!("utf-16le".parse::<Encoding>().ok(), Some(Encoding::Utf16Le));
        assert_eq!("utf-16be".parse::<Encoding>().ok(), Some(Encoding::Utf16Be));
        assert!("ebcdic".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_encoding_display() {
        assert_eq!(Encoding::Utf8.to_string(), "UTF-8");
        assert_eq!(Encoding::Utf16Be.to_string(), "UTF-16BE");
    }
}
