//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration files of the
//! `flighttracks` tools.  The engine is neutral w.r.t. the actual configuration struct, it only
//! knows where to look, how to parse HCL and how to check the `version` field.
//!
//! Search order for `load()`:
//! - the file given by the caller (must exist),
//! - `$HOME/.config/<tag>/<T::FILENAME>` (`%LOCALAPPDATA%\<tag>` on Windows),
//! - the built-in default `T::DEFAULT`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::makepath;

/// What a configuration struct needs to be loaded by `ConfigFile`.
///
pub trait IntoConfig: Debug + DeserializeOwned {
    /// Version the file must have
    const VERSION: usize;
    /// Filename in the configuration directory
    const FILENAME: &'static str;
    /// Built-in configuration, in HCL
    const DEFAULT: &'static str;

    /// Version read from the file
    fn version(&self) -> usize;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config file {0:?}")]
    Missing(PathBuf),
    #[error("Can not read {0:?}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("Bad configuration: {0}")]
    Parse(#[from] hcl::Error),
    #[error("Bad config version {found}, expected {expected}")]
    BadVersion { found: usize, expected: usize },
}

/// A loaded configuration of type `T`, with where it came from.
///
#[derive(Debug)]
pub struct ConfigFile<T: IntoConfig> {
    /// Tag is the project name.
    tag: String,
    /// File used, `None` for the built-in default
    source: Option<PathBuf>,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: IntoConfig,
{
    /// Returns the path of the default config directory for `tag`
    ///
    pub fn config_path(tag: &str) -> Option<PathBuf> {
        let base = BaseDirs::new()?;

        #[cfg(unix)]
        let base = base.home_dir().join(".config");

        #[cfg(windows)]
        let base = base.data_local_dir().to_path_buf();

        debug!("base = {base:?}");
        Some(makepath!(base, tag))
    }

    /// Returns the path of the default config file for `tag`
    ///
    pub fn default_file(tag: &str) -> Option<PathBuf> {
        Self::config_path(tag).map(|p| p.join(T::FILENAME))
    }

    /// Load the given file, the default one or fall back to the built-in configuration.
    ///
    #[tracing::instrument]
    pub fn load(tag: &str, fname: Option<&Path>) -> Result<ConfigFile<T>, ConfigError> {
        let source = match fname {
            Some(fname) => {
                if !fname.exists() {
                    return Err(ConfigError::Missing(fname.to_path_buf()));
                }
                Some(fname.to_path_buf())
            }
            None => Self::default_file(tag).filter(|f| f.exists()),
        };

        let inner = match &source {
            Some(fname) => {
                trace!("Loading config file {fname:?}");
                let data = fs::read_to_string(fname)
                    .map_err(|e| ConfigError::Read(fname.clone(), e))?;
                parse_config::<T>(&data)?
            }
            None => {
                trace!("Using built-in configuration");
                parse_config::<T>(T::DEFAULT)?
            }
        };

        Ok(ConfigFile {
            tag: tag.to_string(),
            source,
            inner,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// File the configuration was read from, `None` means built-in.
    ///
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Return the inner configuration
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Parse HCL into `T` and check its version.
///
pub fn parse_config<T: IntoConfig>(data: &str) -> Result<T, ConfigError> {
    let data: T = hcl::from_str(data)?;
    debug!("struct data = {data:?}");

    if data.version() != T::VERSION {
        return Err(ConfigError::BadVersion {
            found: data.version(),
            expected: T::VERSION,
        });
    }
    Ok(data)
}
