use std::fmt::{Display, Formatter};
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::common::{CodecError, CodecResult};

pub const FILE_RECORD_PREFIX: &str = "FILEINFO:";

/// Largest file, in bytes, accepted for wrapping.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

// File record
//------------------------------------------------------------------------------

/// A binary file carried as text: `FILEINFO:<name>:<extension>:<base64 payload>`.
///
/// The name is the full file name and the extension keeps its leading dot, or is empty.
/// Neither may contain `':'`. The payload uses the standard padded base64 alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    data: Vec<u8>,
    name: String,
    ext: String,
}

impl FileRecord {
    pub fn new(data: Vec<u8>, name: impl Into<String>, ext: impl Into<String>) -> CodecResult<Self> {
        let size = data.len() as u64;
        if size > MAX_FILE_SIZE {
            return Err(CodecError::FileTooLarge { size, limit: MAX_FILE_SIZE });
        }

        let (name, ext) = (name.into(), ext.into());
        if name.contains(':') {
            return Err(CodecError::InvalidFormat("file name contains ':'"));
        }
        if ext.contains(':') {
            return Err(CodecError::InvalidFormat("file extension contains ':'"));
        }

        Ok(Self { data, name, ext })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    pub fn into_parts(self) -> (Vec<u8>, String, String) {
        (self.data, self.name, self.ext)
    }
}

impl Display for FileRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{FILE_RECORD_PREFIX}{}:{}:{}", self.name, self.ext, STANDARD.encode(&self.data))
    }
}

impl FromStr for FileRecord {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with(FILE_RECORD_PREFIX) {
            return Err(CodecError::InvalidFormat("missing FILEINFO prefix"));
        }

        let mut fields = s.splitn(4, ':').skip(1);
        let (Some(name), Some(ext), Some(payload)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(CodecError::InvalidFormat("expected name, extension and payload fields"));
        };

        let data = STANDARD.decode(payload)?;
        debug!(name, ext, size = data.len(), "Unpacked file record");

        Ok(Self { data, name: name.to_string(), ext: ext.to_string() })
    }
}

/// Wraps file bytes into the record text that gets encoded into an image.
pub fn wrap(data: &[u8], name: &str, ext: &str) -> CodecResult<String> {
    Ok(FileRecord::new(data.to_vec(), name, ext)?.to_string())
}

/// Inverse of [`wrap`]: returns the file bytes, name and extension.
pub fn unwrap(text: &str) -> CodecResult<(Vec<u8>, String, String)> {
    Ok(text.parse::<FileRecord>()?.into_parts())
}

#[cfg(test)]
mod package_tests {
    use test_case::test_case;

    use super::{unwrap, wrap, FileRecord, MAX_FILE_SIZE};
    use crate::common::CodecError;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(&[1, 2, 3], "a.bin", ".bin").unwrap(), "FILEINFO:a.bin:.bin:AQID");
        assert_eq!(wrap(b"", "empty", "").unwrap(), "FILEINFO:empty::");
    }

    #[test]
    fn test_unwrap() {
        let (data, name, ext) = unwrap("FILEINFO:a.bin:.bin:AQID").unwrap();
        assert_eq!(data, [1, 2, 3]);
        assert_eq!(name, "a.bin");
        assert_eq!(ext, ".bin");

        let (data, name, ext) = unwrap("FILEINFO:empty::").unwrap();
        assert!(data.is_empty());
        assert_eq!((name.as_str(), ext.as_str()), ("empty", ""));
    }

    #[test]
    fn test_size_limit() {
        let data = vec![0x5A; MAX_FILE_SIZE as usize];
        let text = wrap(&data, "big.dat", ".dat").unwrap();
        assert_eq!(unwrap(&text).unwrap().0, data);

        let data = vec![0x5A; MAX_FILE_SIZE as usize + 1];
        match wrap(&data, "big.dat", ".dat") {
            Err(CodecError::FileTooLarge { size, limit }) => {
                assert_eq!(size, MAX_FILE_SIZE + 1);
                assert_eq!(limit, MAX_FILE_SIZE);
            }
            res => panic!("Unexpected result {res:?}"),
        }
    }

    #[test_case("a:b", ".bin")]
    #[test_case("a.bin", ".b:n")]
    fn test_colon_rejected(name: &str, ext: &str) {
        let res = FileRecord::new(vec![1], name, ext);
        assert!(matches!(res, Err(CodecError::InvalidFormat(_))));
    }

    #[test_case("a.bin:.bin:AQID"; "missing prefix")]
    #[test_case("fileinfo:a.bin:.bin:AQID"; "lowercase prefix")]
    #[test_case("FILEINFO:a.bin"; "missing fields")]
    #[test_case("FILEINFO:a.bin:.bin"; "missing payload")]
    fn test_unwrap_invalid_format(text: &str) {
        assert!(matches!(unwrap(text), Err(CodecError::InvalidFormat(_))));
    }

    #[test]
    fn test_unwrap_invalid_base64() {
        assert!(matches!(unwrap("FILEINFO:a:.b:***"), Err(CodecError::Base64Decode(_))));
        // Extra separators end up in the payload field
        assert!(matches!(unwrap("FILEINFO:a:.b:AQ:ID"), Err(CodecError::Base64Decode(_))));
    }

    #[test]
    fn test_record_accessors() {
        let record: FileRecord = "FILEINFO:notes.txt:.txt:aGk=".parse().unwrap();
        assert_eq!(record.name(), "notes.txt");
        assert_eq!(record.ext(), ".txt");
        assert_eq!(record.data(), b"hi");
        assert_eq!(record.to_string(), "FILEINFO:notes.txt:.txt:aGk=");
        assert_eq!(record.into_data(), b"hi");
    }
}
