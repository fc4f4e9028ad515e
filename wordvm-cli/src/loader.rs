//! Program loader for ROM files.

use std::fs;

use wordvm_vm::{LoaderError, ProgramLoader, ProgramSource};

/// Reads `File` sources from disk and passes `Bytes` through.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl ProgramLoader for FileLoader {
    fn load(&self, source: &ProgramSource) -> Result<Vec<u8>, LoaderError> {
        match source {
            ProgramSource::File(path) => fs::read(path).map_err(|source| LoaderError::Io {
                path: path.clone(),
                source,
            }),
            ProgramSource::Bytes(bytes) => Ok(bytes.clone()),
            other => Err(LoaderError::Unsupported { kind: other.kind() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rom.ch8");
        fs::write(&path, [0x12, 0x00]).unwrap();
        assert_eq!(
            FileLoader.load(&ProgramSource::File(path)).unwrap(),
            vec![0x12, 0x00]
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FileLoader
            .load(&ProgramSource::File("/nonexistent/rom.ch8".into()))
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert!(err.to_string().starts_with("cannot read '/nonexistent/rom.ch8'"));
    }

    #[test]
    fn urls_are_unsupported() {
        assert!(matches!(
            FileLoader.load(&ProgramSource::Url("http://rom".into())),
            Err(LoaderError::Unsupported { kind: "url" })
        ));
    }
}
