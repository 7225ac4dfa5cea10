use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TOKENSWEEP_DIR: &str = ".tokensweep";
pub const CONFIG_FILE: &str = ".tokensweep/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_under_root() {
        let p = config_path(Path::new("/work"));
        assert_eq!(p, PathBuf::from("/work/.tokensweep/config.yaml"));
    }
}
