use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::Settings;

/// Loads run settings from `omzet.toml` in the working directory.
///
/// The file is optional; when absent, defaults apply. A present but
/// malformed file is an error, not a silent fallback.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("omzet").required(false))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;

    if settings.top_n == 0 {
        return Err(ConfigError::ValidationError(
            "top_n must be at least 1".to_string(),
        ));
    }

    Ok(settings)
}
