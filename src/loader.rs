//! Reads a program image file into the word sequence that becomes segment 0.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Raised while turning a file on disk into a sequence of instruction words.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file's length is not a positive multiple of 4.
    #[error("image is {len} bytes long, which is not a positive multiple of 4")]
    InvalidImageSize { len: usize },

    /// The file could not be opened or read.
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Read `path` and decode it as a sequence of big-endian 32-bit instruction words.
pub fn load(path: &Path) -> Result<Vec<u32>, LoadError> {
    let bytes = fs::read(path)?;
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(LoadError::InvalidImageSize { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_not_a_multiple_of_four() {
        let dir = std::env::temp_dir().join("uvm-loader-test-short");
        fs::write(&dir, [0u8; 5]).unwrap();
        assert!(matches!(
            load(&dir),
            Err(LoadError::InvalidImageSize { len: 5 })
        ));
        let _ = fs::remove_file(&dir);
    }

    #[test]
    fn rejects_empty_image() {
        let dir = std::env::temp_dir().join("uvm-loader-test-empty");
        fs::write(&dir, []).unwrap();
        assert!(matches!(
            load(&dir),
            Err(LoadError::InvalidImageSize { len: 0 })
        ));
        let _ = fs::remove_file(&dir);
    }

    #[test]
    fn decodes_big_endian_words() {
        let dir = std::env::temp_dir().join("uvm-loader-test-words");
        fs::write(&dir, [0xD0, 0x00, 0x00, 0x41, 0xE0, 0x00, 0x00, 0x07]).unwrap();
        assert_eq!(load(&dir).unwrap(), vec![0xD0000041, 0xE0000007]);
        let _ = fs::remove_file(&dir);
    }
}
