//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use sqsx_core::error::{Result, SqsxError};

pub use schema::{ClientSection, FileConfig, PayloadStoreConfiguration};

pub fn load_from_file(path: &str) -> Result<FileConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SqsxError::BadConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FileConfig> {
    let cfg: FileConfig = serde_yaml::from_str(s)
        .map_err(|e| SqsxError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
