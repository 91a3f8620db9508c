use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::{ChunkDescriptor, TransferError};

/// Where the bytes of an upload come from.
#[derive(Debug, Clone)]
pub enum ChunkSource {
    /// A file on disk, reopened for every chunk so reads can run in parallel.
    File { path: PathBuf, len: u64 },
    /// Bytes already in memory.
    Memory(Bytes),
}

impl ChunkSource {
    /// Opens a file source, recording its current length.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, TransferError> {
        let path = path.as_ref().to_path_buf();
        let len = tokio::fs::metadata(&path).await?.len();
        Ok(Self::File { path, len })
    }

    /// Wraps an in-memory buffer.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Memory(data.into())
    }

    /// Total length in bytes.
    pub fn len(&self) -> u64 {
        match self {
            Self::File { len, .. } => *len,
            Self::Memory(data) => data.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads exactly the bytes of `chunk`.
    pub async fn read(&self, chunk: &ChunkDescriptor) -> Result<Bytes, TransferError> {
        if chunk.end > self.len() || chunk.start > chunk.end {
            return Err(TransferError::OutOfBounds {
                ordinal: chunk.ordinal,
                start: chunk.start,
                end: chunk.end,
                len: self.len(),
            });
        }

        match self {
            Self::Memory(data) => Ok(data.slice(chunk.start as usize..chunk.end as usize)),
            Self::File { path, .. } => {
                let mut file = tokio::fs::File::open(path).await?;
                file.seek(SeekFrom::Start(chunk.start)).await?;
                let mut buf = vec![0u8; chunk.size() as usize];
                // A file truncated after planning surfaces as UnexpectedEof.
                file.read_exact(&mut buf).await?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan_chunks;

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[tokio::test]
    async fn file_source_reads_planned_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_file(dir.path(), "model.bin", b"AABBCCDDEE");

        let source = ChunkSource::from_path(&path).await.unwrap();
        assert_eq!(source.len(), 10);

        let plan = plan_chunks(source.len(), 4).unwrap();
        let mut parts = Vec::new();
        for chunk in &plan {
            parts.push(source.read(chunk).await.unwrap());
        }
        assert_eq!(&parts[0][..], b"AABB");
        assert_eq!(&parts[1][..], b"CCDD");
        assert_eq!(&parts[2][..], b"EE");
    }

    #[tokio::test]
    async fn memory_source_slices() {
        let source = ChunkSource::from_bytes(b"0123456789".to_vec());
        let chunk = ChunkDescriptor {
            ordinal: 2,
            start: 6,
            end: 10,
        };
        assert_eq!(&source.read(&chunk).await.unwrap()[..], b"6789");
    }

    #[tokio::test]
    async fn out_of_bounds_rejected() {
        let source = ChunkSource::from_bytes(b"abc".to_vec());
        let chunk = ChunkDescriptor {
            ordinal: 1,
            start: 0,
            end: 4,
        };
        assert!(matches!(
            source.read(&chunk).await,
            Err(TransferError::OutOfBounds { ordinal: 1, .. })
        ));
    }

    #[tokio::test]
    async fn truncated_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_file(dir.path(), "model.bin", b"0123456789");
        let source = ChunkSource::from_path(&path).await.unwrap();

        std::fs::write(&path, b"0123").unwrap();

        let chunk = ChunkDescriptor {
            ordinal: 1,
            start: 0,
            end: 8,
        };
        assert!(matches!(source.read(&chunk).await, Err(TransferError::Io(_))));
    }

    #[tokio::test]
    async fn missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChunkSource::from_path(dir.path().join("nope.bin")).await;
        assert!(matches!(result, Err(TransferError::Io(_))));
    }

    #[test]
    fn empty_memory_source() {
        let source = ChunkSource::from_bytes(Vec::new());
        assert!(source.is_empty());
    }
}
