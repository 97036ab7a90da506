use std::{
    fs::{self, File},
    io::{self, Read},
    path::Path,
};

/// Result of asking whether a candidate is on disk.
#[derive(Debug)]
pub enum Presence {
    Present,
    Missing,
    /// The path could not be inspected for a reason other than absence.
    Inaccessible(io::Error),
}

pub trait FileSystem {
    fn probe(&self, path: &Path) -> Presence;

    /// Reads at most `len` bytes from the start of the file.
    fn read_header(&self, path: &Path, len: usize) -> io::Result<Vec<u8>>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn probe(&self, path: &Path) -> Presence {
        (**self).probe(path)
    }

    fn read_header(&self, path: &Path, len: usize) -> io::Result<Vec<u8>> {
        (**self).read_header(path, len)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn probe(&self, path: &Path) -> Presence {
        match fs::metadata(path) {
            Ok(_) => Presence::Present,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Presence::Missing,
            Err(err) => Presence::Inaccessible(err),
        }
    }

    fn read_header(&self, path: &Path, len: usize) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut header = Vec::with_capacity(len);
        file.take(len as u64).read_to_end(&mut header)?;
        Ok(header)
    }
}
