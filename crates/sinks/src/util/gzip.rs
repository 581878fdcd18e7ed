//! Gzip compression of closed output files

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// `{path}.gz`
pub fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Compress `path` to `{path}.gz` and remove the original
///
/// The original is only removed once the compressed file is complete. On
/// failure a partial `.gz` is removed and the original kept.
pub fn compress_file_blocking(path: &Path) -> io::Result<PathBuf> {
    let target = gz_path(path);
    match write_gzip(path, &target) {
        Ok(()) => {
            fs::remove_file(path)?;
            Ok(target)
        }
        Err(e) => {
            let _ = fs::remove_file(&target);
            Err(e)
        }
    }
}

fn write_gzip(source: &Path, target: &Path) -> io::Result<()> {
    let mut input = BufReader::new(File::open(source)?);
    let output = BufWriter::new(File::create(target)?);
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    let mut output = encoder.finish()?;
    output.flush()?;
    output.get_ref().sync_all()
}

/// Compress on the blocking thread pool
pub async fn compress_file(path: PathBuf) -> io::Result<PathBuf> {
    tokio::task::spawn_blocking(move || compress_file_blocking(&path))
        .await
        .map_err(io::Error::other)?
}
