use crate::error::{cfgerr, Result};
use crate::exclude::{ExcludeList, STATE_DIR};
use crate::logging::LoggingConfig;

use abst_fs::{self as fs, AbstPath};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Regex rules for paths to leave out of every tree
    #[serde(default)]
    pub exclude_list: Vec<String>,

    /// Snapshot location, relative to the tree folder
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_snapshot_file() -> String {
    format!("{STATE_DIR}/snapshot.bin")
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            exclude_list: Vec::new(),
            snapshot_file: default_snapshot_file(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn default_path(home_dir: &AbstPath) -> AbstPath {
        home_dir
            .add_last(".config")
            .add_last("merkle-sync")
            .add_last("config.toml")
    }
    pub fn load(path: &AbstPath) -> Result<SyncConfig> {
        fs::load(path).map_err(cfgerr(format!("could not load config at path {path}")))
    }
    /// Like [`SyncConfig::load`], but a missing file gives the defaults
    pub fn load_or_default(path: &AbstPath) -> Result<SyncConfig> {
        match path.exists() {
            true => SyncConfig::load(path),
            false => Ok(SyncConfig::default()),
        }
    }
    /// Config of the current user, defaults if they never wrote one
    pub fn load_user() -> Result<SyncConfig> {
        let home_dir = fs::home_dir().map_err(cfgerr("could not locate user config"))?;
        SyncConfig::load_or_default(&SyncConfig::default_path(&home_dir))
    }
    pub fn save(&self, path: &AbstPath) -> Result<()> {
        fs::save(path, self).map_err(cfgerr(format!("could not save config at path {path}")))
    }

    pub fn exclude_list(&self) -> Result<ExcludeList> {
        ExcludeList::from(&self.exclude_list).map_err(cfgerr("could not compile exclude list"))
    }
    /// Where the snapshot of the tree built from `folder` lives
    pub fn snapshot_path(&self, folder: &AbstPath) -> AbstPath {
        folder.append(&AbstPath::from(&self.snapshot_file))
    }
}
