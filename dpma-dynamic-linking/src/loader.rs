use std::{
    ffi::c_void,
    path::{Path, PathBuf},
};

use libloading::{Library, Symbol};

use crate::errors::SendableError;

/// The dynamic-load primitive. Only ever called with paths that exist and
/// carry the native signature of the current platform.
pub trait NativeLoader {
    type Handle;

    fn load(&self, path: &Path) -> Result<Self::Handle, SendableError>;
}

impl<L: NativeLoader + ?Sized> NativeLoader for &L {
    type Handle = L::Handle;

    fn load(&self, path: &Path) -> Result<Self::Handle, SendableError> {
        (**self).load(path)
    }
}

/// Loads shared libraries into the process with `libloading`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryLoader;

impl NativeLoader for LibraryLoader {
    type Handle = Library;

    fn load(&self, path: &Path) -> Result<Library, SendableError> {
        let lib = unsafe { Library::new(path)? };
        Ok(lib)
    }
}

/// A successfully loaded module and the candidate it came from.
#[derive(Debug)]
pub struct LoadedModule<H> {
    pub path: PathBuf,
    pub handle: H,
}

impl<H> LoadedModule<H> {
    pub fn into_handle(self) -> H {
        self.handle
    }
}

impl LoadedModule<Library> {
    /// Whether the library exports `name`. Does not call the symbol.
    pub fn has_symbol(&self, name: &str) -> bool {
        let symbol: Result<Symbol<*mut c_void>, _> = unsafe { self.handle.get(name.as_bytes()) };
        symbol.is_ok()
    }
}
