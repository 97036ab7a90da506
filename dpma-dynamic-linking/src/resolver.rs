use std::{cell::RefCell, path::PathBuf};

use libloading::Library;

use crate::{
    candidates::enumerate_candidates,
    config::{ResolverConfig, Settings},
    errors::{Diagnostic, DiagnosticKind, ResolveError, Result},
    fs::{FileSystem, StdFileSystem},
    host::{HostEnvironment, ProcessHost},
    identity::{resolve_identity, PlatformIdentity},
    loader::{LibraryLoader, LoadedModule, NativeLoader},
    request::ResolutionRequest,
    signature::BinaryFormat,
    validator::{load_first, precheck},
};

thread_local! {
    static LAST_ERRORS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Diagnostics from the most recent resolution on the calling thread.
pub fn last_errors() -> Vec<String> {
    LAST_ERRORS.with(|errors| errors.borrow().clone())
}

fn record_last_errors(diagnostics: &[Diagnostic]) {
    LAST_ERRORS.with(|errors| {
        *errors.borrow_mut() = diagnostics.iter().map(ToString::to_string).collect();
    });
}

/// A candidate and, when it would be skipped, the reason why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    pub path: PathBuf,
    pub problem: Option<DiagnosticKind>,
}

/// Finds and loads the native module matching the host platform.
pub struct Resolver<L, F = StdFileSystem, H = ProcessHost> {
    loader: L,
    fs: F,
    host: H,
}

impl<L: NativeLoader> Resolver<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            fs: StdFileSystem,
            host: ProcessHost,
        }
    }
}

impl<L, F, H> Resolver<L, F, H>
where
    L: NativeLoader,
    F: FileSystem,
    H: HostEnvironment,
{
    pub fn with_filesystem<F2: FileSystem>(self, fs: F2) -> Resolver<L, F2, H> {
        Resolver {
            loader: self.loader,
            fs,
            host: self.host,
        }
    }

    pub fn with_host<H2: HostEnvironment>(self, host: H2) -> Resolver<L, F, H2> {
        Resolver {
            loader: self.loader,
            fs: self.fs,
            host,
        }
    }

    pub fn identity(&self) -> PlatformIdentity {
        resolve_identity(&self.host.platform(), &self.host.arch())
    }

    pub fn resolve(&self, request: &ResolutionRequest) -> Result<LoadedModule<L::Handle>> {
        if request.library_name().is_empty() {
            record_last_errors(&[]);
            return Err(ResolveError::MissingLibraryName);
        }

        let settings = Settings::resolve(request.config(), &self.host);
        let identity = self.identity();
        let candidates = enumerate_candidates(
            request.library_name(),
            &identity,
            request.search_hints(),
            &settings.root,
        );

        settings.trace(&format!("DPMA root {}", settings.root.display()));
        settings.trace(&format!("searches {:?}", candidates));

        match load_first(&candidates, &identity.platform, &self.fs, &self.loader, &settings) {
            Ok(loaded) => {
                record_last_errors(&[]);
                Ok(loaded)
            }
            Err(diagnostics) => {
                record_last_errors(&diagnostics);
                Err(ResolveError::Exhausted {
                    library: request.library_name().to_string(),
                    platform: identity.platform,
                    arch: identity.arch,
                    diagnostics,
                })
            }
        }
    }

    /// The candidate list for `request`, without touching the filesystem.
    pub fn candidates(&self, request: &ResolutionRequest) -> Result<Vec<PathBuf>> {
        if request.library_name().is_empty() {
            return Err(ResolveError::MissingLibraryName);
        }
        let settings = Settings::resolve(request.config(), &self.host);
        Ok(enumerate_candidates(
            request.library_name(),
            &self.identity(),
            request.search_hints(),
            &settings.root,
        ))
    }

    /// Runs the existence and signature checks on every candidate without
    /// loading any of them.
    pub fn inspect(&self, request: &ResolutionRequest) -> Result<Vec<CandidateReport>> {
        let format = BinaryFormat::for_platform(&self.identity().platform);
        Ok(self
            .candidates(request)?
            .into_iter()
            .map(|path| CandidateReport {
                problem: precheck(&path, format, &self.fs).err(),
                path,
            })
            .collect())
    }
}

/// Resolves `library_name` with the process host, the real filesystem and
/// `libloading`.
pub fn resolve_and_load(
    library_name: &str,
    search_hints: Option<&[&str]>,
    config: Option<ResolverConfig>,
) -> Result<LoadedModule<Library>> {
    let mut request = ResolutionRequest::new(library_name);
    if let Some(hints) = search_hints {
        request = request.with_hints(hints.iter().copied());
    }
    if let Some(config) = config {
        request = request.with_config(config);
    }
    Resolver::new(LibraryLoader).resolve(&request)
}
