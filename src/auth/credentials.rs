//! Persisted token storage.
//!
//! Only the access and refresh tokens are written to disk, as JSON under
//! fixed key names in `~/.sigmalite/.credentials.json`.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::CredentialPair;

/// The credentials directory name.
pub const CREDENTIALS_DIR: &str = ".sigmalite";

/// The credentials file name.
pub const CREDENTIALS_FILE: &str = ".credentials.json";

/// Tokens as persisted between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Both tokens present.
    pub fn is_complete(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    /// Neither token present.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    /// Convert into a pair when both tokens are present.
    pub fn to_pair(&self) -> Option<CredentialPair> {
        Some(CredentialPair::new(
            self.access_token.clone()?,
            self.refresh_token.clone()?,
        ))
    }
}

impl From<&CredentialPair> for Credentials {
    fn from(pair: &CredentialPair) -> Self {
        Self {
            access_token: Some(pair.access_token.clone()),
            refresh_token: Some(pair.refresh_token.clone()),
        }
    }
}

/// Default location of the credentials file.
///
/// Returns `None` if the home directory cannot be determined.
pub fn default_credentials_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
}

/// Reads and writes the credentials file.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Manager for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials. A missing file yields empty credentials.
    pub fn load(&self) -> io::Result<Credentials> {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Credentials::default()),
            Err(e) => return Err(e),
        };

        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write credentials, creating the parent directory when needed.
    pub fn save(&self, credentials: &Credentials) -> io::Result<()> {
        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.credentials_path)?;
        restrict_permissions(&file)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writer.flush()
    }

    /// Remove the credentials file. Succeeds if it does not exist.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}
