use std::path::{Path, PathBuf};
use tokensweep_core::paths::TOKENSWEEP_DIR;

/// Resolve the working root.
///
/// Priority:
/// 1. `--root` flag / `TOKENSWEEP_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.tokensweep/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd).unwrap_or(cwd)
}

fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(TOKENSWEEP_DIR).is_dir())
        .map(Path::to_path_buf)
}
