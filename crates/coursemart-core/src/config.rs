/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper snake case
/// env vars (`database_url` ← `DATABASE_URL`). Load once at startup and pass the
/// value down to constructors.
///
/// # Panics
///
/// [`Config::from_env`] panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().unwrap_or_else(|e| panic!("failed to load config from environment: {e}"))
    }

    /// Load from an explicit set of `(KEY, value)` pairs instead of the process environment.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
