use std::path::{Path, PathBuf};

use crate::{
    config::Settings,
    errors::{Diagnostic, DiagnosticKind},
    fs::{FileSystem, Presence},
    loader::{LoadedModule, NativeLoader},
    signature::BinaryFormat,
};

/// What happened to one candidate.
#[derive(Debug)]
pub enum ValidationOutcome<H> {
    NotFound,
    Inaccessible(String),
    InvalidSignature,
    LoadFailed(String),
    Loaded(H),
}

impl<H> ValidationOutcome<H> {
    fn into_loaded(self) -> Result<H, DiagnosticKind> {
        match self {
            ValidationOutcome::Loaded(handle) => Ok(handle),
            ValidationOutcome::NotFound => Err(DiagnosticKind::NotFound),
            ValidationOutcome::Inaccessible(reason) => Err(DiagnosticKind::Inaccessible(reason)),
            ValidationOutcome::InvalidSignature => Err(DiagnosticKind::SignatureMismatch),
            ValidationOutcome::LoadFailed(reason) => Err(DiagnosticKind::LoadFailed(reason)),
        }
    }
}

/// Existence and signature checks, without loading anything.
pub fn precheck<F: FileSystem + ?Sized>(
    path: &Path,
    format: Option<BinaryFormat>,
    fs: &F,
) -> Result<(), DiagnosticKind> {
    match fs.probe(path) {
        Presence::Present => {}
        Presence::Missing => return Err(DiagnosticKind::NotFound),
        Presence::Inaccessible(err) => return Err(DiagnosticKind::Inaccessible(err.to_string())),
    }

    let Some(format) = format else {
        return Err(DiagnosticKind::SignatureMismatch);
    };
    match fs.read_header(path, format.header_len()) {
        Ok(header) if format.matches(&header) => Ok(()),
        _ => Err(DiagnosticKind::SignatureMismatch),
    }
}

pub fn validate_candidate<F, L>(
    path: &Path,
    format: Option<BinaryFormat>,
    fs: &F,
    loader: &L,
) -> ValidationOutcome<L::Handle>
where
    F: FileSystem + ?Sized,
    L: NativeLoader + ?Sized,
{
    match precheck(path, format, fs) {
        Ok(()) => {}
        Err(DiagnosticKind::NotFound) => return ValidationOutcome::NotFound,
        Err(DiagnosticKind::Inaccessible(reason)) => return ValidationOutcome::Inaccessible(reason),
        Err(_) => return ValidationOutcome::InvalidSignature,
    }

    match loader.load(path) {
        Ok(handle) => ValidationOutcome::Loaded(handle),
        Err(err) => ValidationOutcome::LoadFailed(err.to_string()),
    }
}

/// Walks `candidates` in order and stops at the first one that loads.
/// On exhaustion returns one diagnostic per candidate, in attempt order.
pub(crate) fn load_first<F, L>(
    candidates: &[PathBuf],
    platform: &str,
    fs: &F,
    loader: &L,
    settings: &Settings,
) -> Result<LoadedModule<L::Handle>, Vec<Diagnostic>>
where
    F: FileSystem + ?Sized,
    L: NativeLoader + ?Sized,
{
    let format = BinaryFormat::for_platform(platform);
    if format.is_none() {
        settings.trace(&format!("no known binary signature for platform '{}'", platform));
    }

    let mut diagnostics = Vec::with_capacity(candidates.len());
    for path in candidates {
        match validate_candidate(path, format, fs, loader).into_loaded() {
            Ok(handle) => {
                settings.trace(&format!("-- {} loaded ok", path.display()));
                return Ok(LoadedModule {
                    path: path.clone(),
                    handle,
                });
            }
            Err(kind) => {
                let diagnostic = Diagnostic::new(path.clone(), kind);
                match diagnostic.kind {
                    DiagnosticKind::LoadFailed(_) => settings.trace_error(&format!("-- {}", diagnostic)),
                    _ => settings.trace(&format!("-- {}", diagnostic)),
                }
                diagnostics.push(diagnostic);
            }
        }
    }
    Err(diagnostics)
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::{HashMap, HashSet},
        io,
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::{config::ResolverConfig, errors::SendableError, host::StaticHost};

    const ELF: &[u8] = b"\x7fELF\x02\x01\x01";

    #[derive(Default)]
    struct MemoryFs {
        files: HashMap<PathBuf, Vec<u8>>,
        denied: HashSet<PathBuf>,
        touched: RefCell<Vec<PathBuf>>,
    }

    impl MemoryFs {
        fn with_file(mut self, path: &str, bytes: &[u8]) -> Self {
            self.files.insert(PathBuf::from(path), bytes.to_vec());
            self
        }

        fn with_denied(mut self, path: &str) -> Self {
            self.denied.insert(PathBuf::from(path));
            self
        }
    }

    impl FileSystem for MemoryFs {
        fn probe(&self, path: &Path) -> Presence {
            self.touched.borrow_mut().push(path.to_path_buf());
            if self.denied.contains(path) {
                Presence::Inaccessible(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
            } else if self.files.contains_key(path) {
                Presence::Present
            } else {
                Presence::Missing
            }
        }

        fn read_header(&self, path: &Path, len: usize) -> io::Result<Vec<u8>> {
            self.touched.borrow_mut().push(path.to_path_buf());
            let bytes = self
                .files
                .get(path)
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
            Ok(bytes[..bytes.len().min(len)].to_vec())
        }
    }

    struct PathLoader {
        failing: HashSet<PathBuf>,
    }

    impl NativeLoader for PathLoader {
        type Handle = PathBuf;

        fn load(&self, path: &Path) -> Result<PathBuf, SendableError> {
            if self.failing.contains(path) {
                return Err("undefined symbol: napi_register_module_v1".into());
            }
            Ok(path.to_path_buf())
        }
    }

    fn loader() -> PathLoader {
        PathLoader { failing: HashSet::new() }
    }

    fn settings(config: ResolverConfig) -> Settings {
        Settings::resolve(&config, &StaticHost::new("linux", "x64"))
    }

    fn paths(raw: &[&str]) -> Vec<PathBuf> {
        raw.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn precheck_classifies_each_failure() {
        let fs = MemoryFs::default()
            .with_file("/ok.node", ELF)
            .with_file("/empty.node", b"")
            .with_file("/mach.node", &[0xCF, 0xFA, 0xED, 0xFE])
            .with_denied("/locked.node");
        let elf = BinaryFormat::for_platform("linux");

        assert_eq!(precheck(Path::new("/ok.node"), elf, &fs), Ok(()));
        assert_eq!(precheck(Path::new("/missing.node"), elf, &fs), Err(DiagnosticKind::NotFound));
        assert_eq!(precheck(Path::new("/empty.node"), elf, &fs), Err(DiagnosticKind::SignatureMismatch));
        assert_eq!(precheck(Path::new("/mach.node"), elf, &fs), Err(DiagnosticKind::SignatureMismatch));
        assert_eq!(precheck(Path::new("/ok.node"), None, &fs), Err(DiagnosticKind::SignatureMismatch));
        assert!(matches!(
            precheck(Path::new("/locked.node"), elf, &fs),
            Err(DiagnosticKind::Inaccessible(_))
        ));
    }

    #[test]
    fn mismatch_is_not_a_load_attempt() {
        let fs = MemoryFs::default().with_file("/bad.node", b"MZ\0\0");
        let failing = PathLoader { failing: paths(&["/bad.node"]).into_iter().collect() };
        let outcome = validate_candidate(Path::new("/bad.node"), BinaryFormat::for_platform("linux"), &fs, &failing);
        assert!(matches!(outcome, ValidationOutcome::InvalidSignature));
    }

    #[test]
    fn stops_at_first_success() {
        let fs = MemoryFs::default()
            .with_file("/b/m.node", ELF)
            .with_file("/c/m.node", ELF);
        let candidates = paths(&["/a/m.node", "/b/m.node", "/c/m.node"]);

        let loaded = load_first(&candidates, "linux", &fs, &loader(), &settings(ResolverConfig::default()))
            .expect("second candidate loads");

        assert_eq!(loaded.path, PathBuf::from("/b/m.node"));
        assert_eq!(loaded.handle, PathBuf::from("/b/m.node"));
        assert!(!fs.touched.borrow().contains(&PathBuf::from("/c/m.node")));
    }

    #[test]
    fn load_failure_moves_on() {
        let fs = MemoryFs::default()
            .with_file("/a/m.node", ELF)
            .with_file("/b/m.node", ELF);
        let failing = PathLoader { failing: paths(&["/a/m.node"]).into_iter().collect() };
        let candidates = paths(&["/a/m.node", "/b/m.node"]);

        let loaded = load_first(&candidates, "linux", &fs, &failing, &settings(ResolverConfig::default()))
            .expect("falls through to second");
        assert_eq!(loaded.path, PathBuf::from("/b/m.node"));
    }

    #[test]
    fn exhaustion_reports_every_candidate_in_order() {
        let fs = MemoryFs::default()
            .with_file("/b/m.node", b"garbage")
            .with_file("/c/m.node", ELF)
            .with_denied("/d/m.node");
        let failing = PathLoader { failing: paths(&["/c/m.node"]).into_iter().collect() };
        let candidates = paths(&["/a/m.node", "/b/m.node", "/c/m.node", "/d/m.node"]);

        let diagnostics = load_first(&candidates, "linux", &fs, &failing, &settings(ResolverConfig::default()))
            .expect_err("nothing loads");

        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::NotFound,
                DiagnosticKind::SignatureMismatch,
                DiagnosticKind::LoadFailed("undefined symbol: napi_register_module_v1".into()),
                DiagnosticKind::Inaccessible("permission denied".into()),
            ]
        );
        let order: Vec<_> = diagnostics.into_iter().map(|d| d.path).collect();
        assert_eq!(order, candidates);
    }

    #[test]
    fn unknown_platform_never_loads() {
        let fs = MemoryFs::default().with_file("/a/m.node", ELF);
        let diagnostics = load_first(&paths(&["/a/m.node"]), "plan9", &fs, &loader(), &settings(ResolverConfig::default()))
            .expect_err("no signature for plan9");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::SignatureMismatch);
    }

    #[test]
    fn debug_routes_load_errors_to_error_sink() {
        let info = Arc::new(Mutex::new(Vec::<String>::new()));
        let errors = Arc::new(Mutex::new(Vec::<String>::new()));
        let config = {
            let info = Arc::clone(&info);
            let errors = Arc::clone(&errors);
            ResolverConfig::default()
                .with_debug(true)
                .with_info_sink(move |msg| info.lock().unwrap().push(msg.to_string()))
                .with_error_sink(move |msg| errors.lock().unwrap().push(msg.to_string()))
        };
        let fs = MemoryFs::default().with_file("/b/m.node", ELF);
        let failing = PathLoader { failing: paths(&["/b/m.node"]).into_iter().collect() };

        let _ = load_first(&paths(&["/a/m.node", "/b/m.node"]), "linux", &fs, &failing, &settings(config));

        assert_eq!(*info.lock().unwrap(), vec!["-- /a/m.node does not exist".to_string()]);
        assert_eq!(errors.lock().unwrap().len(), 1);
        assert!(errors.lock().unwrap()[0].contains("error on load"));
    }
}
