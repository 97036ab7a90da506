use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{error, info, warn};

use crate::host::{HostEnvironment, DEBUG_ENV_VAR, ROOT_ENV_VAR};

/// Destination for diagnostic text.
pub type Sink = Arc<dyn Fn(&str) + Send + Sync>;

/// Caller-supplied options. Anything left unset falls back to the
/// environment, then to built-in defaults.
#[derive(Clone, Default)]
pub struct ResolverConfig {
    pub root: Option<PathBuf>,
    pub debug: Option<bool>,
    pub on_info: Option<Sink>,
    pub on_error: Option<Sink>,
}

impl ResolverConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_info_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_info = Some(Arc::new(sink));
        self
    }

    pub fn with_error_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(sink));
        self
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("root", &self.root)
            .field("debug", &self.debug)
            .field("on_info", &self.on_info.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Effective settings for one invocation, resolved once at the top.
pub(crate) struct Settings {
    pub root: PathBuf,
    pub debug: bool,
    info: Sink,
    error: Sink,
}

impl Settings {
    pub fn resolve(config: &ResolverConfig, host: &impl HostEnvironment) -> Self {
        let debug = config
            .debug
            .unwrap_or_else(|| debug_flag(host.var(DEBUG_ENV_VAR).as_deref()));

        Settings {
            root: resolve_root(config.root.as_deref(), host),
            debug,
            info: config.on_info.clone().unwrap_or_else(|| Arc::new(log_info) as Sink),
            error: config.on_error.clone().unwrap_or_else(|| Arc::new(log_error) as Sink),
        }
    }

    /// Verbose tracing, emitted only in debug mode.
    pub fn trace(&self, message: &str) {
        if self.debug {
            (self.info)(message);
        }
    }

    pub fn trace_error(&self, message: &str) {
        if self.debug {
            (self.error)(message);
        }
    }
}

fn log_info(message: &str) {
    info!("{}", message);
}

fn log_error(message: &str) {
    error!("{}", message);
}

/// `DPMA_DEBUG` enables tracing when its leading integer is positive.
pub fn debug_flag(raw: Option<&str>) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    let raw = raw.trim_start();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<i64>()
        .map(|value| sign * value > 0)
        .unwrap_or(false)
}

fn resolve_root(configured: Option<&Path>, host: &impl HostEnvironment) -> PathBuf {
    let root = match configured {
        Some(root) => root.to_path_buf(),
        None => match host.var(ROOT_ENV_VAR).filter(|value| !value.is_empty()) {
            Some(root) => PathBuf::from(root),
            None => match host.entry_dir() {
                Ok(dir) => dir,
                Err(err) => {
                    warn!("Could not determine entry point directory, using current directory: {}", err);
                    PathBuf::from(".")
                }
            },
        },
    };

    if root.is_absolute() {
        return root;
    }
    match host.current_dir() {
        Ok(cwd) => cwd.join(root),
        Err(err) => {
            warn!("Could not determine current directory: {}", err);
            root
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::host::StaticHost;

    #[test]
    fn debug_flag_parses_leading_integer() {
        assert!(debug_flag(Some("1")));
        assert!(debug_flag(Some("42abc")));
        assert!(debug_flag(Some(" 2")));
        assert!(!debug_flag(Some("0")));
        assert!(!debug_flag(Some("-3")));
        assert!(!debug_flag(Some("true")));
        assert!(!debug_flag(Some("")));
        assert!(!debug_flag(None));
    }

    #[test]
    fn explicit_debug_wins_over_environment() {
        let host = StaticHost::new("linux", "x64").with_var(DEBUG_ENV_VAR, "1");
        let settings = Settings::resolve(&ResolverConfig::default().with_debug(false), &host);
        assert!(!settings.debug);

        let settings = Settings::resolve(&ResolverConfig::default(), &host);
        assert!(settings.debug);
    }

    #[test]
    fn root_precedence() {
        let host = StaticHost::new("linux", "x64")
            .with_entry_dir("/srv/app/bin")
            .with_current_dir("/home/me");
        assert_eq!(Settings::resolve(&ResolverConfig::default(), &host).root, PathBuf::from("/srv/app/bin"));

        let host = host.with_var(ROOT_ENV_VAR, "/from/env");
        assert_eq!(Settings::resolve(&ResolverConfig::default(), &host).root, PathBuf::from("/from/env"));

        let config = ResolverConfig::default().with_root("/from/config");
        assert_eq!(Settings::resolve(&config, &host).root, PathBuf::from("/from/config"));
    }

    #[test]
    fn relative_root_is_anchored_at_current_dir() {
        let host = StaticHost::new("linux", "x64").with_current_dir("/home/me");
        let config = ResolverConfig::default().with_root("vendor");
        assert_eq!(Settings::resolve(&config, &host).root, PathBuf::from("/home/me/vendor"));
    }

    #[test]
    fn missing_entry_dir_falls_back_to_current_dir() {
        let host = StaticHost::new("linux", "x64").with_current_dir("/home/me");
        assert_eq!(
            Settings::resolve(&ResolverConfig::default(), &host).root,
            PathBuf::from("/home/me/.")
        );
    }

    #[test]
    fn trace_is_silent_unless_debug() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |msg: &str| seen.lock().unwrap().push(msg.to_string())
        };
        let host = StaticHost::new("linux", "x64");

        let quiet = Settings::resolve(&ResolverConfig::default().with_info_sink(sink.clone()), &host);
        quiet.trace("hidden");
        let loud = Settings::resolve(
            &ResolverConfig::default().with_debug(true).with_info_sink(sink),
            &host,
        );
        loud.trace("shown");

        assert_eq!(*seen.lock().unwrap(), vec!["shown".to_string()]);
    }
}
