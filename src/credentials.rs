//! Application credentials for the messaging backend.
//!
//! `API_ID` and `API_HASH` come from the process environment or an env file
//! in the data directory. When neither has them, the user is asked once and
//! the answers are appended to the env file.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

const API_ID: &str = "API_ID";
const API_HASH: &str = "API_HASH";

/// Application id and hash issued by the messaging service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Parses raw values; both must be non-empty and the id must be an integer.
    pub fn parse(api_id: &str, api_hash: &str) -> Result<Self> {
        let api_id = api_id.trim();
        let api_hash = api_hash.trim();
        if api_id.is_empty() || api_hash.is_empty() {
            return Err(Error::validation(
                "API_ID and API_HASH are required",
                None,
            ));
        }
        let api_id = api_id.parse::<i32>().map_err(|_| {
            Error::validation(
                format!("API_ID must be an integer, got {api_id:?}"),
                Some(API_ID.to_string()),
            )
        })?;
        Ok(Self {
            api_id,
            api_hash: api_hash.to_string(),
        })
    }

    /// Reads credentials from the process environment, then `env_file`.
    ///
    /// Process variables win over the file. Returns `Ok(None)` when either
    /// value is missing everywhere.
    pub fn from_env(env_file: &Path) -> Result<Option<Self>> {
        let file_vars = read_env_file(env_file)?;
        let lookup = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .or_else(|| file_vars.get(key).cloned())
        };
        match (lookup(API_ID), lookup(API_HASH)) {
            (Some(id), Some(hash)) => Self::parse(&id, &hash).map(Some),
            _ => Ok(None),
        }
    }

    /// Like [`from_env`](Self::from_env), but asks through `prompt` for
    /// missing values and appends the answers to `env_file`.
    pub fn load_or_prompt<F>(env_file: &Path, mut prompt: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<String>,
    {
        if let Some(credentials) = Self::from_env(env_file)? {
            return Ok(credentials);
        }
        let api_id = prompt("API_ID: ")?;
        let api_hash = prompt("API_HASH: ")?;
        let credentials = Self::parse(&api_id, &api_hash)?;
        credentials.append_to(env_file)?;
        tracing::info!(path = %env_file.display(), "stored credentials");
        Ok(credentials)
    }

    fn append_to(&self, env_file: &Path) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(env_file)
            .map_err(|err| Error::io(format!("failed to open {}", env_file.display()), err))?;
        write!(
            file,
            "\n{API_ID}={}\n{API_HASH}={}\n",
            self.api_id, self.api_hash
        )?;
        Ok(())
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(HashMap::new()),
        Err(err) => {
            return Err(Error::client(
                format!("failed to read {}", path.display()),
                Some(Box::new(err)),
            ));
        }
    };
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|err| {
            Error::client(
                format!("malformed line in {}", path.display()),
                Some(Box::new(err)),
            )
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_and_non_numeric() {
        assert!(Credentials::parse("", "abc").unwrap_err().is_validation());
        assert!(Credentials::parse("12", " ").unwrap_err().is_validation());
        assert!(Credentials::parse("twelve", "abc").unwrap_err().is_validation());
        let ok = Credentials::parse(" 12345 ", "deadbeef").unwrap();
        assert_eq!(ok.api_id, 12345);
        assert_eq!(ok.api_hash, "deadbeef");
    }

    #[test]
    fn reads_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "API_ID=777\nAPI_HASH=cafe\n").unwrap();
        // Process variables would shadow the file; only assert when they are unset.
        if std::env::var(API_ID).is_err() && std::env::var(API_HASH).is_err() {
            let creds = Credentials::from_env(&path).unwrap().unwrap();
            assert_eq!(creds.api_id, 777);
            assert_eq!(creds.api_hash, "cafe");
        }
    }

    #[test]
    fn prompts_and_appends() {
        if std::env::var(API_ID).is_ok() || std::env::var(API_HASH).is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OTHER=1").unwrap();

        let mut answers = vec!["cafebabe".to_string(), "4242".to_string()];
        let creds = Credentials::load_or_prompt(&path, |_| Ok(answers.pop().unwrap())).unwrap();
        assert_eq!(creds.api_id, 4242);

        let again = Credentials::load_or_prompt(&path, |_| {
            panic!("credentials should come from the file now")
        })
        .unwrap();
        assert_eq!(again, creds);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("OTHER=1"));
    }

    #[test]
    fn empty_answer_is_an_error() {
        if std::env::var(API_ID).is_ok() || std::env::var(API_HASH).is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let err = Credentials::load_or_prompt(&path, |_| Ok(String::new())).unwrap_err();
        assert!(err.is_validation());
        assert!(!path.exists());
    }

    #[test]
    fn debug_hides_hash() {
        let creds = Credentials::parse("1", "secret").unwrap();
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
