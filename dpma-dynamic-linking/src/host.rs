use std::{
    collections::HashMap,
    env, io,
    path::PathBuf,
};

pub const DEBUG_ENV_VAR: &str = "DPMA_DEBUG";
pub const ROOT_ENV_VAR: &str = "DPMA_ROOT";
pub const REFS_ENV_VAR: &str = "DPMA_REFS";

/// Source of everything the resolver needs to know about the running process.
pub trait HostEnvironment {
    /// Raw operating system token, before aliasing.
    fn platform(&self) -> String;

    /// Raw CPU architecture token, before aliasing.
    fn arch(&self) -> String;

    fn var(&self, key: &str) -> Option<String>;

    /// Directory containing the application's entry point.
    fn entry_dir(&self) -> io::Result<PathBuf>;

    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// The real process. Platform and architecture are reported with the same
/// tokens the Node.js addon toolchain uses when naming `.node` artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessHost;

impl HostEnvironment for ProcessHost {
    fn platform(&self) -> String {
        node_platform(env::consts::OS).to_string()
    }

    fn arch(&self) -> String {
        node_arch(env::consts::ARCH).to_string()
    }

    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn entry_dir(&self) -> io::Result<PathBuf> {
        let exe_path = env::current_exe()?;
        exe_path
            .parent()
            .map(|dir| dir.to_path_buf())
            .ok_or_else(|| io::Error::other("executable path has no parent directory"))
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        env::current_dir()
    }
}

pub(crate) fn node_platform(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

pub(crate) fn node_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Host with fixed values, for embedding in tests or sandboxes where the
/// real process must not be consulted.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    pub platform: String,
    pub arch: String,
    pub vars: HashMap<String, String>,
    pub entry_dir: PathBuf,
    pub current_dir: PathBuf,
}

impl StaticHost {
    pub fn new(platform: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            arch: arch.into(),
            ..Self::default()
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_entry_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.entry_dir = dir.into();
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = dir.into();
        self
    }
}

impl HostEnvironment for StaticHost {
    fn platform(&self) -> String {
        self.platform.clone()
    }

    fn arch(&self) -> String {
        self.arch.clone()
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn entry_dir(&self) -> io::Result<PathBuf> {
        if self.entry_dir.as_os_str().is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no entry directory configured"));
        }
        Ok(self.entry_dir.clone())
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.current_dir.clone())
    }
}
