//! Environment-driven configuration.

use std::fmt;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

use seedbed_shared::{SeedbedError, SeedbedResult};

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DATASET_FILE: &str = "data.json";
pub const UPLOADS_DIR: &str = "uploads";
pub const SETTINGS_DB_FILE: &str = "seedbed.db";
pub const LOGS_DIR: &str = "logs";

/// Credentials for the bootstrap admin account.
#[derive(Clone, Default)]
pub struct AdminCredentials {
    pub username: Option<String>,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Options for one bootstrap run.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Deployment environment; scopes the first-run flag.
    pub environment: String,
    /// Admin provisioning runs unless explicitly disabled.
    pub admin_create: bool,
    /// Content seeding runs only when explicitly enabled.
    pub bootstrap_content: bool,
    pub admin: AdminCredentials,
    /// Directory holding `data.json` and `uploads/`.
    pub data_dir: PathBuf,
    /// Upper bound on concurrent entry imports per phase.
    pub max_concurrency: usize,
    /// Directory holding the settings database.
    pub home_dir: PathBuf,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            admin_create: true,
            bootstrap_content: false,
            admin: AdminCredentials::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            home_dir: default_home_dir(),
        }
    }
}

impl SeedOptions {
    pub fn from_env() -> SeedbedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary variable source.
    ///
    /// `ADMIN_CREATE` disables admin provisioning only when set to `false`.
    /// `BOOTSTRAP_CONTENT` enables seeding only when set to `true`.
    pub fn from_lookup<F>(lookup: F) -> SeedbedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_concurrency = match lookup("SEED_MAX_CONCURRENCY") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                SeedbedError::Config(format!("SEED_MAX_CONCURRENCY '{}': {}", raw, e))
            })?,
            None => defaults.max_concurrency,
        };

        let options = Self {
            environment: lookup("NODE_ENV").unwrap_or(defaults.environment),
            admin_create: lookup("ADMIN_CREATE").as_deref() != Some("false"),
            bootstrap_content: lookup("BOOTSTRAP_CONTENT").as_deref() == Some("true"),
            admin: AdminCredentials {
                username: lookup("ADMIN_USERNAME"),
                email: lookup("ADMIN_EMAIL"),
                firstname: lookup("ADMIN_FN"),
                lastname: lookup("ADMIN_LN"),
                password: lookup("ADMIN_PASS"),
            },
            data_dir: lookup("SEED_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            max_concurrency,
            home_dir: lookup("SEEDBED_HOME")
                .map(PathBuf::from)
                .unwrap_or(defaults.home_dir),
        };

        options.sanitize()?;
        Ok(options)
    }

    pub fn sanitize(&self) -> SeedbedResult<()> {
        if self.environment.trim().is_empty() {
            return Err(SeedbedError::Config("environment must not be empty".into()));
        }
        if self.max_concurrency == 0 {
            return Err(SeedbedError::Config(
                "max_concurrency must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(DATASET_FILE)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join(UPLOADS_DIR)
    }

    pub fn settings_db_path(&self) -> PathBuf {
        self.home_dir.join(SETTINGS_DB_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home_dir.join(LOGS_DIR)
    }
}

fn default_home_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("seedbed"))
        .unwrap_or_else(|| PathBuf::from(".seedbed"))
}

/// Where the host stores uploaded binaries.
#[derive(Clone, PartialEq, Eq)]
pub enum UploadProvider {
    Local,
    Cloudinary {
        cloud_name: String,
        api_key: String,
        api_secret: String,
    },
}

impl fmt::Debug for UploadProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadProvider::Local => f.write_str("Local"),
            UploadProvider::Cloudinary {
                cloud_name,
                api_key,
                ..
            } => f
                .debug_struct("Cloudinary")
                .field("cloud_name", cloud_name)
                .field("api_key", api_key)
                .field("api_secret", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Host plugin settings handed to the platform at startup.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub seo_enabled: bool,
    pub users_permissions: JwtConfig,
    pub upload: UploadProvider,
}

impl PluginConfig {
    pub fn from_env(options: &SeedOptions) -> SeedbedResult<Self> {
        Self::from_lookup(options, |key| std::env::var(key).ok())
    }

    /// The upload provider switches to Cloudinary in production only.
    ///
    /// The JWT secret is regenerated on every call.
    pub fn from_lookup<F>(options: &SeedOptions, lookup: F) -> SeedbedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upload = if options.is_production() {
            let required = |key: &str| {
                lookup(key).ok_or_else(|| {
                    SeedbedError::Config(format!("{} is required in production", key))
                })
            };
            UploadProvider::Cloudinary {
                cloud_name: required("CLOUDINARY_NAME")?,
                api_key: required("CLOUDINARY_KEY")?,
                api_secret: required("CLOUDINARY_SECRET")?,
            }
        } else {
            UploadProvider::Local
        };

        Ok(Self {
            seo_enabled: true,
            users_permissions: JwtConfig {
                secret: generate_jwt_secret(),
                expires_in: "7d".to_string(),
            },
            upload,
        })
    }
}

/// 16 random bytes, base64 encoded.
fn generate_jwt_secret() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}
