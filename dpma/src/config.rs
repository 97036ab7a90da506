use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dpma_dynamic_linking::{
    host::ProcessHost, ReferenceChains, ResolutionRequest, ResolverConfig,
};

#[derive(Debug, Parser)]
#[command(
    name = "dpma",
    author,
    version,
    about = "Locate and load the native module built for this platform"
)]
pub struct Cli {
    /// Trace every candidate (also enabled by DPMA_DEBUG=1).
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Also write log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve and load the module, printing the path that loaded.
    Load {
        #[command(flatten)]
        target: TargetArgs,

        /// Require the loaded module to export this symbol.
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List candidate paths and whether each would pass the pre-load checks.
    Candidates {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Logical library name, e.g. `hid` for `hid-linux-x64.node`.
    pub library: String,

    /// Directory to search; repeatable, tried in order. Relative hints
    /// resolve against the root.
    #[arg(long = "hint", value_name = "PATH")]
    pub hints: Vec<String>,

    /// Search root, overriding DPMA_ROOT and the executable's directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Append the nested dependency hint for this module id from DPMA_REFS.
    #[arg(long, value_name = "MODULE_ID")]
    pub refs_module: Option<String>,
}

impl TargetArgs {
    pub fn to_request(&self, debug: bool) -> ResolutionRequest {
        let mut config = ResolverConfig::default();
        if let Some(root) = &self.root {
            config = config.with_root(root);
        }
        if debug {
            config = config.with_debug(true);
        }

        let mut request = ResolutionRequest::new(self.library.as_str())
            .with_hints(self.hints.iter().map(String::as_str))
            .with_config(config);
        if let Some(module_id) = &self.refs_module {
            let chains = ReferenceChains::from_host(&ProcessHost);
            request = request.with_reference_chain(&chains, module_id);
        }
        request
    }
}

pub fn parse_config() -> Cli {
    Cli::parse()
}
