use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt, path::PathBuf, str::FromStr};

/// Token used when none is configured. Startup warns loudly about it.
pub const DEFAULT_ADMIN_TOKEN: &str = "changeme";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub database_url: String,
    pub admin_token: String,
    pub max_upload_mb: usize,
    pub seed: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Portfolio project catalog API")]
pub struct Args {
    /// Host to bind to (overrides CATALOG_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides CATALOG_PORT / PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding the database and uploads (overrides CATALOG_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Database URL (overrides CATALOG_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Shared admin secret (overrides CATALOG_ADMIN_TOKEN / ADMIN_TOKEN)
    #[arg(long)]
    pub admin_token: Option<String>,

    /// Request body limit for uploads, in MiB (overrides CATALOG_MAX_UPLOAD_MB)
    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    /// Do not insert the example projects into an empty catalog
    #[arg(long)]
    pub no_seed: bool,

    /// Run schema initialization and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::resolve(args, |key| env::var(key))?, migrate))
    }

    /// Merge CLI values over values looked up through `lookup`.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        // --- Environment fallback ---
        let env_host = lookup("CATALOG_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = parse_var(&lookup, &["CATALOG_PORT", "PORT"])?.unwrap_or(4000);
        let env_data_dir = lookup("CATALOG_DATA_DIR").unwrap_or_else(|_| "./data".into());
        let env_max_upload = parse_var(&lookup, &["CATALOG_MAX_UPLOAD_MB"])?.unwrap_or(50);
        let env_seed = parse_var::<bool, _>(&lookup, &["CATALOG_SEED"])?.unwrap_or(true);

        // --- Merge ---
        let data_dir = args.data_dir.unwrap_or_else(|| PathBuf::from(env_data_dir));
        let database_url = args
            .database_url
            .or_else(|| lookup("CATALOG_DATABASE_URL").ok())
            .unwrap_or_else(|| format!("sqlite://{}", data_dir.join("db.sqlite").display()));
        let admin_token = args
            .admin_token
            .or_else(|| first_var(&lookup, &["CATALOG_ADMIN_TOKEN", "ADMIN_TOKEN"]))
            .unwrap_or_else(|| DEFAULT_ADMIN_TOKEN.into());

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            data_dir,
            database_url,
            admin_token,
            max_upload_mb: args.max_upload_mb.unwrap_or(env_max_upload),
            seed: env_seed && !args.no_seed,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn uses_default_token(&self) -> bool {
        self.admin_token == DEFAULT_ADMIN_TOKEN
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("database_url", &self.database_url)
            .field("admin_token", &"<redacted>")
            .field("max_upload_mb", &self.max_upload_mb)
            .field("seed", &self.seed)
            .finish()
    }
}

fn first_var<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    keys.iter().find_map(|key| lookup(*key).ok().filter(|v| !v.is_empty()))
}

/// Parse the first set variable among `keys`; unset is `None`, garbage is an error.
fn parse_var<T, F>(lookup: &F, keys: &[&str]) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Result<String, env::VarError>,
{
    for key in keys {
        match lookup(*key) {
            Ok(value) => {
                return value
                    .trim()
                    .parse::<T>()
                    .map(Some)
                    .with_context(|| format!("parsing {} value `{}`", key, value));
            }
            Err(env::VarError::NotPresent) => continue,
            Err(err) => return Err(err).with_context(|| format!("reading {}", key)),
        }
    }
    Ok(None)
}
