use std::path::PathBuf;

const DATA_DIR_NAME: &str = "agent-ledger";

/// Configured directory if set, else the XDG data home.
pub fn resolve_data_dir(configured: Option<&PathBuf>) -> Result<PathBuf, String> {
    if let Some(dir) = configured {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os("XDG_DATA_HOME").filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir).join(DATA_DIR_NAME));
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join(DATA_DIR_NAME))
}
