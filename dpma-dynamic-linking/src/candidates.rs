use std::path::{Component, Path, PathBuf};

use crate::identity::PlatformIdentity;

pub const MODULE_EXTENSION: &str = "node";

/// `<library>-<platform>-<arch>.node`, the name the build side produces.
pub fn module_file_name(library_name: &str, identity: &PlatformIdentity) -> String {
    format!(
        "{}-{}-{}.{}",
        library_name, identity.platform, identity.arch, MODULE_EXTENSION
    )
}

/// One candidate per hint, in hint order. Absolute hints ignore `root`.
/// Duplicates are kept.
pub fn enumerate_candidates<P: AsRef<Path>>(
    library_name: &str,
    identity: &PlatformIdentity,
    search_hints: &[P],
    root: &Path,
) -> Vec<PathBuf> {
    let file_name = module_file_name(library_name, identity);
    search_hints
        .iter()
        .map(|hint| {
            let hint = hint.as_ref();
            let dir = if hint.is_absolute() {
                hint.to_path_buf()
            } else {
                root.join(hint)
            };
            normalize(&dir.join(&file_name))
        })
        .collect()
}

/// Lexical cleanup: drops `.` segments and folds `..` into its parent.
/// Leading `..` on a relative path is kept; `..` at a root is dropped.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
