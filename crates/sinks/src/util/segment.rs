//! Output segments
//!
//! A segment is one member of a worker's rotating file sequence. Its path is
//! a pure function of base name, worker and sequence number, so workers can
//! never collide on a path.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{self, AsyncWriteExt, BufWriter};
use unload_protocol::Delimiter;

/// `{base}[_{worker}]_{seq:07}.{csv|tsv}`
///
/// # Example
///
/// ```
/// use unload_protocol::Delimiter;
/// use unload_sinks::util::segment_path;
///
/// let path = segment_path("out/orders", Some(2), 1, Delimiter::Comma);
/// assert_eq!(path.to_str(), Some("out/orders_2_0000001.csv"));
/// ```
pub fn segment_path(base: &str, worker: Option<usize>, seq: u64, delimiter: Delimiter) -> PathBuf {
    let ext = delimiter.extension();
    match worker {
        Some(worker) => PathBuf::from(format!("{base}_{worker}_{seq:07}.{ext}")),
        None => PathBuf::from(format!("{base}_{seq:07}.{ext}")),
    }
}

/// Buffered writer over one segment file that counts bytes written
pub struct SegmentWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes_written: u64,
}

impl SegmentWriter {
    /// Create (truncate) the segment file
    pub async fn create(path: PathBuf, buffer_size: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = File::create(&path).await?;
        Ok(Self {
            path,
            writer: BufWriter::with_capacity(buffer_size, file),
            bytes_written: 0,
        })
    }

    pub async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf).await?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }

    /// Bytes accepted so far, buffered ones included
    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush everything to disk and close the file
    pub async fn finish(mut self) -> io::Result<PathBuf> {
        self.writer.flush().await?;
        self.writer.get_mut().sync_all().await?;
        Ok(self.path)
    }
}
