/// Service configuration read from environment variables.
///
/// Implementors derive `serde::Deserialize`; each field is read from the
/// upper-cased env var of the same name (`jwt_secret` → `JWT_SECRET`).
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}
