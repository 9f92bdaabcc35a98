//! Connection configuration
//!
//! Layering, lowest precedence first:
//! 1. built-in defaults (local `studentdb` as `postgres`)
//! 2. `[database]` table of `~/.studentctl/config.toml`
//! 3. `DATABASE_URL`, replacing only the parts the URL spells out
//! 4. explicit overrides (CLI flags)

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding a full `postgres://` URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "STUDENTCTL_CONFIG";

const REDACTED: &str = "********";

/// On-disk layout of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Parameters for opening a PostgreSQL connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Full connection URL; the parts it contains replace the discrete fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip)]
    overrides: ConnectionOverrides,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "studentdb".to_string(),
            user: "postgres".to_string(),
            password: "password".to_string(),
            url: None,
            overrides: ConnectionOverrides::default(),
        }
    }
}

/// Values given explicitly on the command line.
///
/// These win over both the config file and `DATABASE_URL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl DatabaseConfig {
    /// Default config file path: ~/.studentctl/config.toml
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".studentctl/config.toml")
    }

    /// Config path from `STUDENTCTL_CONFIG`, falling back to [`Self::default_path`].
    pub fn config_path() -> PathBuf {
        Self::config_path_with(|key| env::var(key).ok())
    }

    fn config_path_with(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        lookup(CONFIG_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path)
    }

    /// Load the layered configuration from the process environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    /// [`Self::load`] with environment variables read through `lookup`.
    fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::config_path_with(&lookup);
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    tracing::debug!(path = %default.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };

        config.expand_variables(&lookup);

        if let Some(url) = lookup(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.url = Some(url);
            }
        }

        Ok(config)
    }

    /// Parse the `[database]` table of a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(file.database)
    }

    /// Write this config as a `[database]` table, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = self.to_toml()?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize as a config file body.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            database: self.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Record command-line overrides.
    pub fn with_overrides(mut self, overrides: ConnectionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Expand `${VAR}` references in string values.
    fn expand_variables(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let mut cache: HashMap<String, String> = HashMap::new();
        let mut expand = |s: &str| expand_string(s, &lookup, &mut cache);

        self.host = expand(&self.host);
        self.dbname = expand(&self.dbname);
        self.user = expand(&self.user);
        self.password = expand(&self.password);
        if let Some(url) = self.url.take() {
            self.url = Some(expand(&url));
        }
    }

    /// Parsed URL options and the parts the URL supplies itself.
    fn url_options(&self) -> Result<Option<(PgConnectOptions, UrlParts)>, ConfigError> {
        let Some(url) = &self.url else {
            return Ok(None);
        };
        let options = PgConnectOptions::from_str(url).map_err(ConfigError::Url)?;
        Ok(Some((options, UrlParts::of(url)?)))
    }

    /// Reject configurations that cannot possibly connect.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let from_url = self
            .url_options()?
            .map(|(_, parts)| parts)
            .unwrap_or_default();

        if !from_url.host && self.host.trim().is_empty() {
            return Err(ConfigError::invalid("host", "cannot be empty"));
        }
        if !from_url.dbname && self.dbname.trim().is_empty() {
            return Err(ConfigError::invalid("dbname", "cannot be empty"));
        }
        if !from_url.user && self.user.trim().is_empty() {
            return Err(ConfigError::invalid("user", "cannot be empty"));
        }
        if !from_url.port && self.port == 0 {
            return Err(ConfigError::invalid("port", "must be between 1 and 65535"));
        }

        if self.overrides.port == Some(0) {
            return Err(ConfigError::invalid("port", "must be between 1 and 65535"));
        }
        for (field, value) in [
            ("host", &self.overrides.host),
            ("dbname", &self.overrides.dbname),
            ("user", &self.overrides.user),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::invalid(field, "cannot be empty"));
            }
        }

        Ok(())
    }

    /// Build driver options: discrete fields, then whatever the URL names,
    /// then overrides.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let (mut options, from_url) = match self.url_options()? {
            Some(parsed) => parsed,
            None => (PgConnectOptions::new(), UrlParts::default()),
        };

        if !from_url.host {
            options = options.host(&self.host);
        }
        if !from_url.port {
            options = options.port(self.port);
        }
        if !from_url.dbname {
            options = options.database(&self.dbname);
        }
        if !from_url.user {
            options = options.username(&self.user);
        }
        if !from_url.password {
            options = options.password(&self.password);
        }

        let o = &self.overrides;
        if let Some(host) = &o.host {
            options = options.host(host);
        }
        if let Some(port) = o.port {
            options = options.port(port);
        }
        if let Some(dbname) = &o.dbname {
            options = options.database(dbname);
        }
        if let Some(user) = &o.user {
            options = options.username(user);
        }
        if let Some(password) = &o.password {
            options = options.password(password);
        }

        Ok(options.application_name("studentctl"))
    }

    /// Connection target with every layer applied, for display.
    pub fn effective(&self) -> Result<EffectiveConfig, ConfigError> {
        let options = self.connect_options()?;
        let url_password = self
            .url_options()?
            .is_some_and(|(_, parts)| parts.password);
        let has_password = self.overrides.password.is_some()
            || url_password
            || !self.password.is_empty();

        Ok(EffectiveConfig {
            host: options.get_host().to_string(),
            port: options.get_port(),
            dbname: options.get_database().unwrap_or_default().to_string(),
            user: options.get_username().to_string(),
            password: if has_password { REDACTED } else { "" }.to_string(),
        })
    }
}

/// Resolved connection settings. The password is only ever shown masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl EffectiveConfig {
    /// Render as a `[database]` table.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        #[derive(Serialize)]
        struct Shown<'a> {
            database: &'a EffectiveConfig,
        }
        Ok(toml::to_string_pretty(&Shown { database: self })?)
    }
}

/// Which connection parameters a URL spells out, in its authority, path or
/// query string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct UrlParts {
    host: bool,
    port: bool,
    dbname: bool,
    user: bool,
    password: bool,
}

impl UrlParts {
    fn of(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::Url(sqlx::Error::Configuration(Box::new(e))))?;
        let in_query = |key: &str| url.query_pairs().any(|(k, _)| k == key);

        Ok(Self {
            host: url.host_str().is_some_and(|h| !h.is_empty()) || in_query("host"),
            port: url.port().is_some() || in_query("port"),
            dbname: !url.path().trim_start_matches('/').is_empty() || in_query("dbname"),
            user: !url.username().is_empty() || in_query("user"),
            password: url.password().is_some() || in_query("password"),
        })
    }
}

/// Replace `${key}` occurrences using `lookup`; unknown keys expand to "".
fn expand_string(
    s: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    cache: &mut HashMap<String, String>,
) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let key = &rest[start + 2..start + 2 + len];
        result.push_str(&rest[..start]);
        let value = cache
            .entry(key.to_string())
            .or_insert_with(|| lookup(key).unwrap_or_default());
        result.push_str(value);
        rest = &rest[start + 2 + len + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_local_development_database() {
        let config = DatabaseConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "studentdb");
        assert_eq!(config.user, "postgres");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config("[database]\nhost = \"db.internal\"\nport = 6543\n");
        let config = DatabaseConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.dbname, "studentdb");
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let file = write_config("[database\nhost = ");
        let err = DatabaseConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatabaseConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn save_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = DatabaseConfig {
            dbname: "school".into(),
            ..DatabaseConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(DatabaseConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn variables_expand_from_lookup() {
        let mut config = DatabaseConfig {
            password: "${PGPASS_TEST}".into(),
            host: "${MISSING}fallback".into(),
            ..DatabaseConfig::default()
        };
        config.expand_variables(|key| (key == "PGPASS_TEST").then(|| "s3cret".to_string()));
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.host, "fallback");
    }

    #[test]
    fn unterminated_reference_left_alone() {
        let mut cache = HashMap::new();
        let out = expand_string("abc${DEF", &|_| Some("x".into()), &mut cache);
        assert_eq!(out, "abc${DEF");
    }

    #[test]
    fn validate_rejects_empty_and_zero() {
        let config = DatabaseConfig {
            host: "  ".into(),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "host", .. })
        ));

        let config = DatabaseConfig {
            port: 0,
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "port", .. })
        ));

        let config = DatabaseConfig::default().with_overrides(ConnectionOverrides {
            user: Some(String::new()),
            ..Default::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "user", .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_url() {
        let config = DatabaseConfig {
            url: Some("not a url at all".into()),
            ..DatabaseConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Url(_))));
    }

    #[test]
    fn overrides_win_over_url() {
        let config = DatabaseConfig {
            url: Some("postgres://alice:pw@url-host:5433/urldb".into()),
            ..DatabaseConfig::default()
        }
        .with_overrides(ConnectionOverrides {
            dbname: Some("flagdb".into()),
            ..Default::default()
        });

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "url-host");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_username(), "alice");
        assert_eq!(options.get_database(), Some("flagdb"));
    }

    #[test]
    fn url_keeps_file_fields_it_does_not_name() {
        let config = DatabaseConfig {
            user: "filebob".into(),
            password: "filepw".into(),
            port: 6543,
            url: Some("postgres://url-host/urldb".into()),
            ..DatabaseConfig::default()
        };

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "url-host");
        assert_eq!(options.get_database(), Some("urldb"));
        assert_eq!(options.get_username(), "filebob");
        assert_eq!(options.get_port(), 6543);
    }

    #[test]
    fn url_query_parameters_count_as_named() {
        let config = DatabaseConfig {
            user: "filebob".into(),
            url: Some("postgres://url-host/urldb?user=queryuser".into()),
            ..DatabaseConfig::default()
        };
        assert_eq!(config.connect_options().unwrap().get_username(), "queryuser");
    }

    #[test]
    fn url_without_database_needs_a_file_dbname() {
        let mut config = DatabaseConfig {
            url: Some("postgres://alice@url-host".into()),
            ..DatabaseConfig::default()
        };
        config.dbname = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "dbname", .. })
        ));

        config.url = Some("postgres://alice@url-host/urldb".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_layers_file_env_url_and_variables() {
        let file = write_config(
            "[database]\nhost = \"file-host\"\nuser = \"filebob\"\npassword = \"${STUDENT_PW}\"\n",
        );
        let env: HashMap<&str, &str> = [
            ("STUDENT_PW", "s3cret"),
            (DATABASE_URL_ENV, "postgres://url-host:5433/urldb"),
        ]
        .into_iter()
        .collect();

        let config = DatabaseConfig::load_with(Some(file.path()), |key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.url.as_deref(), Some("postgres://url-host:5433/urldb"));

        let shown = config.effective().unwrap();
        assert_eq!(shown.host, "url-host");
        assert_eq!(shown.port, 5433);
        assert_eq!(shown.dbname, "urldb");
        assert_eq!(shown.user, "filebob");
        assert_eq!(shown.password, REDACTED);
    }

    #[test]
    fn load_reads_process_environment() {
        let file = write_config("[database]\nuser = \"${STUDENTCTL_TEST_LOAD_USER}\"\n");
        env::set_var("STUDENTCTL_TEST_LOAD_USER", "envuser");
        let previous_url = env::var_os(DATABASE_URL_ENV);
        env::set_var(DATABASE_URL_ENV, "postgres://env-host/envdb");

        let loaded = DatabaseConfig::load(Some(file.path()));

        env::remove_var("STUDENTCTL_TEST_LOAD_USER");
        match previous_url {
            Some(url) => env::set_var(DATABASE_URL_ENV, url),
            None => env::remove_var(DATABASE_URL_ENV),
        }

        let options = loaded.unwrap().connect_options().unwrap();
        assert_eq!(options.get_host(), "env-host");
        assert_eq!(options.get_database(), Some("envdb"));
        assert_eq!(options.get_username(), "envuser");
    }

    #[test]
    fn effective_applies_overrides() {
        let config = DatabaseConfig::default().with_overrides(ConnectionOverrides {
            host: Some("flag-host".into()),
            ..Default::default()
        });
        let shown = config.effective().unwrap();
        assert_eq!(shown.host, "flag-host");
        assert_eq!(shown.dbname, "studentdb");
        let toml = shown.to_toml().unwrap();
        assert!(toml.contains("host = \"flag-host\""));
        assert!(!toml.contains("\"password\""));
    }

    #[test]
    fn discrete_fields_build_options() {
        let options = DatabaseConfig::default().connect_options().unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("studentdb"));
        assert_eq!(options.get_username(), "postgres");
    }
}
