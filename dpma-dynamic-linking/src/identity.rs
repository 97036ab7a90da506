use std::fmt;

const LEGACY_X86_ARCH: &str = "ia32";
const X86_ARCH: &str = "x86";

/// Canonical platform and architecture tokens used to name native modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformIdentity {
    pub platform: String,
    pub arch: String,
}

impl fmt::Display for PlatformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)
    }
}

pub fn resolve_identity(raw_platform: &str, raw_arch: &str) -> PlatformIdentity {
    PlatformIdentity {
        platform: map_platform(raw_platform),
        arch: map_arch(raw_arch),
    }
}

// No platform aliases are defined yet.
fn map_platform(raw: &str) -> String {
    raw.to_string()
}

fn map_arch(raw: &str) -> String {
    if raw == LEGACY_X86_ARCH {
        X86_ARCH.to_string()
    } else {
        raw.to_string()
    }
}
