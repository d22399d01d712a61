use std::fs;
use std::path::{Path, PathBuf};

pub const WALLET: &str = "0xbad5eebd86acebf1a9457ef881b0e22a1fb5b56d";

/// A valid configuration pointing at `upstream` and storing in `database`.
pub fn minimal_toml(upstream: &str, database: &str) -> String {
    format!(
        r#"
database = "{database}"

[upstream]
base_url = "{upstream}"

[subscription]
wallet = "{WALLET}"
"#
    )
}

/// Write `contents` to `config.toml` inside `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}
