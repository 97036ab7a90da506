//! Finds and loads the `<lib>-<platform>-<arch>.node` build that matches the
//! running host, checking each candidate's binary signature before handing it
//! to the dynamic linker.

pub mod candidates;
pub mod config;
pub mod errors;
pub mod fs;
pub mod host;
pub mod identity;
pub mod loader;
pub mod refs;
pub mod request;
mod resolver;
pub mod signature;
pub mod validator;

pub use config::{ResolverConfig, Sink};
pub use errors::{Diagnostic, DiagnosticKind, ResolveError, SendableError};
pub use identity::{resolve_identity, PlatformIdentity};
pub use loader::{LibraryLoader, LoadedModule, NativeLoader};
pub use refs::ReferenceChains;
pub use request::ResolutionRequest;
pub use resolver::{last_errors, resolve_and_load, CandidateReport, Resolver};
