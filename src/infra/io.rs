use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::core::error::ExtractError;

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

/// Whole input header, either mapped or read into memory.
pub enum FileContent {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl AsRef<[u8]> for FileContent {
    fn as_ref(&self) -> &[u8] {
        match self {
            FileContent::Mapped(mmap) => &mmap[..],
            FileContent::Buffered(bytes) => bytes.as_slice(),
        }
    }
}

/// Load the input header, refusing anything larger than `limit` bytes
/// before reading a single byte of content.
pub fn read_input<P: AsRef<Path>>(path: P, limit: u64) -> Result<FileContent, ExtractError> {
    let path = path.as_ref();
    let open_err = |source| ExtractError::CannotOpenInput { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(open_err)?;
    let size = file.metadata().map_err(open_err)?.len();

    if size > limit {
        return Err(ExtractError::InputTooLarge { path: path.to_path_buf(), size, limit });
    }

    if size > MMAP_THRESHOLD {
        // Safety: the mapping is only read, and lives no longer than this run
        let mmap = unsafe { Mmap::map(&file) }.map_err(open_err)?;
        Ok(FileContent::Mapped(mmap))
    } else {
        let mut bytes = Vec::with_capacity(size as usize);
        (&file).read_to_end(&mut bytes).map_err(open_err)?;
        Ok(FileContent::Buffered(bytes))
    }
}

/// Read a whole text file used as a side input (rule stream).
pub fn read_rule_stream<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ExtractError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| ExtractError::CannotOpenDefinitionStream {
        path: path.to_path_buf(),
        source,
    })
}

/// Output artifact opened for writing, plus whatever it held before.
pub struct OutputSink {
    pub file: File,
    /// Prior content; always empty in fresh mode
    pub existing: Vec<u8>,
}

impl OutputSink {
    /// Fresh mode truncates or creates. Append mode reads the prior content
    /// first, then positions the write cursor at end of file.
    pub fn open<P: AsRef<Path>>(path: P, append: bool) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let open_err = |source| ExtractError::CannotOpenOutput { path: path.to_path_buf(), source };

        if !append {
            let file = File::create(path).map_err(open_err)?;
            return Ok(Self { file, existing: Vec::new() });
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(open_err)?;

        let mut existing = Vec::new();
        file.read_to_end(&mut existing).map_err(open_err)?;
        file.seek(SeekFrom::End(0)).map_err(open_err)?;

        Ok(Self { file, existing })
    }

    /// Prior content without opening for write (dry runs). A missing file
    /// reads as empty.
    pub fn peek<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ExtractError> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(ExtractError::CannotOpenOutput { path: path.to_path_buf(), source }),
        }
    }

    /// True when appended lines need a leading newline to start cleanly.
    pub fn needs_separator(&self) -> bool {
        self.existing.last().is_some_and(|&b| b != b'\n')
    }
}
