//! Version strings.

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` sent by `triton`, also printed by `triton version`.
#[must_use]
pub fn triton_user_agent() -> String {
    user_agent("triton")
}

/// `User-Agent` sent by `manta`, also printed by `manta version`.
#[must_use]
pub fn manta_user_agent() -> String {
    user_agent("manta")
}

fn user_agent(tool: &str) -> String {
    format!(
        "{tool}-cli/{VERSION} ({}-{})",
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

/// Man page footer, e.g. `Triton 0.1.0`.
#[must_use]
pub fn man_source(product: &str) -> String {
    format!("{product} {VERSION}")
}
