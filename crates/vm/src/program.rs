//! Program images and the loaders that produce them.

use std::path::PathBuf;

use wordvm_common::instruction::fetch_word;
use wordvm_common::Word;

use crate::error::{LoaderError, RuntimeError};

/// Where a program comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSource {
    /// An in-memory image.
    Bytes(Vec<u8>),
    /// A file on disk.
    File(PathBuf),
    /// A remote location. No built-in loader fetches these.
    Url(String),
}

impl ProgramSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ProgramSource::Bytes(_) => "bytes",
            ProgramSource::File(_) => "file",
            ProgramSource::Url(_) => "url",
        }
    }
}

/// Resolves a [`ProgramSource`] into a raw image.
pub trait ProgramLoader {
    fn load(&self, source: &ProgramSource) -> Result<Vec<u8>, LoaderError>;
}

impl<F> ProgramLoader for F
where
    F: Fn(&ProgramSource) -> Result<Vec<u8>, LoaderError>,
{
    fn load(&self, source: &ProgramSource) -> Result<Vec<u8>, LoaderError> {
        self(source)
    }
}

/// Accepts only in-memory images.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesLoader;

impl ProgramLoader for BytesLoader {
    fn load(&self, source: &ProgramSource) -> Result<Vec<u8>, LoaderError> {
        match source {
            ProgramSource::Bytes(bytes) => Ok(bytes.clone()),
            other => Err(LoaderError::Unsupported { kind: other.kind() }),
        }
    }
}

/// The currently loaded program image, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    data: Option<Vec<u8>>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load through `loader`. On failure the previous image is kept.
    pub fn load(
        &mut self,
        loader: &dyn ProgramLoader,
        source: &ProgramSource,
    ) -> Result<(), LoaderError> {
        self.load_within(loader, source, usize::MAX)
    }

    /// Like [`Program::load`], but also reject images longer than `capacity`.
    pub fn load_within(
        &mut self,
        loader: &dyn ProgramLoader,
        source: &ProgramSource,
        capacity: usize,
    ) -> Result<(), LoaderError> {
        let bytes = loader.load(source)?;
        if bytes.len() > capacity {
            return Err(LoaderError::TooLarge {
                len: bytes.len(),
                capacity,
            });
        }
        self.data = Some(bytes);
        Ok(())
    }

    /// Install an image directly.
    pub fn set(&mut self, bytes: Vec<u8>) {
        self.data = Some(bytes);
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Image length in bytes; 0 when nothing is loaded.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The big-endian word at `address`, relative to the start of the image.
    pub fn fetch(&self, address: u16) -> Result<Word, RuntimeError> {
        self.data
            .as_deref()
            .and_then(|bytes| fetch_word(bytes, usize::from(address)))
            .ok_or(RuntimeError::Bounds {
                address,
                len: self.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_loader_accepts_bytes_only() {
        let loader = BytesLoader;
        assert_eq!(
            loader.load(&ProgramSource::Bytes(vec![1, 2])).unwrap(),
            vec![1, 2]
        );
        let err = loader
            .load(&ProgramSource::Url("https://example.org/rom".into()))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Unsupported { kind: "url" }));
        let err = loader
            .load(&ProgramSource::File("rom.ch8".into()))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Unsupported { kind: "file" }));
    }

    #[test]
    fn closures_are_loaders() {
        let loader = |_: &ProgramSource| -> Result<Vec<u8>, LoaderError> { Ok(vec![0x12, 0x04]) };
        let mut program = Program::new();
        program
            .load(&loader, &ProgramSource::Url("anything".into()))
            .unwrap();
        assert_eq!(program.fetch(0).unwrap(), 0x1204);
    }

    #[test]
    fn fetch_is_big_endian() {
        let mut program = Program::new();
        program.set(vec![0x12, 0x04, 0x00, 0xee]);
        assert_eq!(program.fetch(0).unwrap(), 0x1204);
        assert_eq!(program.fetch(2).unwrap(), 0x00ee);
    }

    #[test]
    fn fetch_out_of_bounds() {
        let mut program = Program::new();
        assert_eq!(
            program.fetch(0),
            Err(RuntimeError::Bounds { address: 0, len: 0 })
        );
        program.set(vec![0x12, 0x04, 0x00]);
        assert_eq!(
            program.fetch(2),
            Err(RuntimeError::Bounds { address: 2, len: 3 })
        );
        assert_eq!(
            program.fetch(0xffff),
            Err(RuntimeError::Bounds {
                address: 0xffff,
                len: 3
            })
        );
    }

    #[test]
    fn failed_load_keeps_previous_image() {
        let mut program = Program::new();
        program
            .load(&BytesLoader, &ProgramSource::Bytes(vec![0x00, 0xee]))
            .unwrap();
        assert!(program
            .load(&BytesLoader, &ProgramSource::File("missing.ch8".into()))
            .is_err());
        assert_eq!(program.data(), Some(&[0x00, 0xee][..]));

        assert!(program
            .load_within(&BytesLoader, &ProgramSource::Bytes(vec![0; 8]), 4)
            .is_err());
        assert_eq!(program.len(), 2);
    }
}
