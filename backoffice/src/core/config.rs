use crate::auth::RoleAssignments;
use std::path::PathBuf;
use std::str::FromStr;

/// Persistence backend for the role store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Embedded redb file under the work directory
    Redb,
    /// Nothing survives the process
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Back-office configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./work_dir | database and logs |
/// | STORE_BACKEND | redb | `redb` or `memory` |
/// | DATABASE_FILE | backoffice.redb | file name inside WORK_DIR |
/// | LOG_LEVEL | info | tracing filter, RUST_LOG wins |
/// | LOG_JSON | false | JSON console output |
/// | LOG_TO_FILE | false | rotating files under WORK_DIR/logs |
/// | ENVIRONMENT | development | development, staging, production |
/// | ROLE_ASSIGNMENTS | built-in | `user_id=role_id,...` |
/// | CURRENT_USER_ID | unset | user signed in at startup |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/backoffice ROLE_ASSIGNMENTS="1=owner,7=host" cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database file and logs
    pub work_dir: String,
    pub store_backend: StoreBackend,
    pub database_file: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_to_file: bool,
    /// development | staging | production
    pub environment: String,
    pub role_assignments: RoleAssignments,
    pub current_user_id: Option<u64>,
}

impl Config {
    /// Load from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            work_dir: lookup("WORK_DIR").unwrap_or_else(|| "./work_dir".into()),
            store_backend: lookup("STORE_BACKEND")
                .and_then(|v| match v.parse::<StoreBackend>() {
                    Ok(backend) => Some(backend),
                    Err(e) => {
                        tracing::warn!(error = %e, "Falling back to redb store");
                        None
                    }
                })
                .unwrap_or(StoreBackend::Redb),
            database_file: lookup("DATABASE_FILE").unwrap_or_else(|| "backoffice.redb".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_var(&lookup, "LOG_JSON").unwrap_or(false),
            log_to_file: parse_var(&lookup, "LOG_TO_FILE").unwrap_or(false),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            role_assignments: lookup("ROLE_ASSIGNMENTS")
                .map(|raw| RoleAssignments::parse(&raw))
                .unwrap_or_default(),
            current_user_id: parse_var(&lookup, "CURRENT_USER_ID"),
        }
    }

    /// Defaults, rooted at `work_dir`
    ///
    /// Used by tests
    pub fn with_work_dir(work_dir: impl Into<String>, store_backend: StoreBackend) -> Self {
        let mut config = Self::from_lookup(|_| None);
        config.work_dir = work_dir.into();
        config.store_backend = store_backend;
        config
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.database_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.work_dir, "./work_dir");
        assert_eq!(config.store_backend, StoreBackend::Redb);
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.is_development());
        assert_eq!(config.current_user_id, None);
        assert_eq!(config.role_assignments, RoleAssignments::builtin());
        assert_eq!(
            config.database_path(),
            PathBuf::from("./work_dir").join("backoffice.redb")
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("WORK_DIR", "/data/backoffice"),
            ("STORE_BACKEND", "Memory"),
            ("LOG_JSON", "true"),
            ("ENVIRONMENT", "production"),
            ("ROLE_ASSIGNMENTS", "7=host"),
            ("CURRENT_USER_ID", "7"),
        ]));
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.log_json);
        assert!(config.is_production());
        assert_eq!(config.role_assignments.resolve(Some(7)), "host");
        assert_eq!(config.role_assignments.resolve(Some(1)), "staff");
        assert_eq!(config.current_user_id, Some(7));
        assert_eq!(config.log_dir(), PathBuf::from("/data/backoffice/logs"));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "sqlite"),
            ("LOG_TO_FILE", "yes please"),
            ("CURRENT_USER_ID", "abc"),
        ]));
        assert_eq!(config.store_backend, StoreBackend::Redb);
        assert!(!config.log_to_file);
        assert_eq!(config.current_user_id, None);
    }
}
