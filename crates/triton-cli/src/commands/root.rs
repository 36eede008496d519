//! Root commands and the flags every subcommand inherits.

use triton_kernel::{
    Command, Context, Declarations, EnvName, Flag, LogFormat, LogSettings, Result, SetupError,
    init_logging, logging::DEFAULT_LEVEL,
};

use crate::keys;

/// `triton` root: CloudAPI credentials plus the shared flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct TritonRoot;

impl Command for TritonRoot {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(
            keys::TRITON_ACCOUNT,
            Flag::string("account")
                .short('a')
                .help("Triton account name")
                .persistent(),
        )?;
        decl.bind_env(keys::TRITON_ACCOUNT, EnvName::Prefixed("ACCOUNT"))?;
        decl.bind_flag(
            keys::TRITON_URL,
            Flag::string("url")
                .short('u')
                .help("CloudAPI endpoint URL")
                .persistent(),
        )?;
        decl.bind_env(keys::TRITON_URL, EnvName::Prefixed("URL"))?;
        decl.bind_flag(
            keys::TRITON_KEY_ID,
            Flag::string("key-id")
                .short('k')
                .help("Fingerprint of the signing key")
                .persistent(),
        )?;
        decl.bind_env(keys::TRITON_KEY_ID, EnvName::Prefixed("KEY_ID"))?;
        decl.bind_flag(
            keys::TRITON_KEY_MATERIAL,
            Flag::string("key-material")
                .help("PEM private key, or the path to one")
                .persistent(),
        )?;
        decl.bind_env(keys::TRITON_KEY_MATERIAL, EnvName::Prefixed("KEY_MATERIAL"))?;
        declare_shared(decl)
    }

    fn persistent_pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        configure(ctx)
    }
}

/// `manta` root: Manta credentials plus the shared flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct MantaRoot;

impl Command for MantaRoot {
    fn setup(&self, decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
        decl.bind_flag(
            keys::MANTA_ACCOUNT,
            Flag::string("account")
                .short('a')
                .help("Manta account name")
                .persistent(),
        )?;
        decl.bind_env(keys::MANTA_ACCOUNT, EnvName::Exact("MANTA_USER"))?;
        decl.bind_flag(
            keys::MANTA_URL,
            Flag::string("url")
                .short('u')
                .help("Manta endpoint URL")
                .persistent(),
        )?;
        decl.bind_env(keys::MANTA_URL, EnvName::Exact("MANTA_URL"))?;
        decl.bind_flag(
            keys::MANTA_KEY_ID,
            Flag::string("key-id")
                .short('k')
                .help("Fingerprint of the signing key")
                .persistent(),
        )?;
        decl.bind_env(keys::MANTA_KEY_ID, EnvName::Exact("MANTA_KEY_ID"))?;
        decl.bind_flag(
            keys::MANTA_KEY_MATERIAL,
            Flag::string("key-material")
                .help("PEM private key, or the path to one")
                .persistent(),
        )?;
        decl.bind_env(keys::MANTA_KEY_MATERIAL, EnvName::Exact("MANTA_KEY_MATERIAL"))?;
        declare_shared(decl)
    }

    fn persistent_pre_run(&self, ctx: &mut Context<'_>) -> Result<()> {
        configure(ctx)
    }
}

fn declare_shared(decl: &mut Declarations<'_>) -> std::result::Result<(), SetupError> {
    decl.bind_flag(
        keys::USE_PAGER,
        Flag::bool("use-pager")
            .help("Page output through $PAGER")
            .persistent(),
    )?;
    decl.bind_flag(
        keys::UTC,
        Flag::bool("utc").help("Show times in UTC").persistent(),
    )?;
    decl.bind_flag(
        keys::LOG_FORMAT,
        Flag::string("log-format")
            .help("Log format: text or json")
            .default_value("text")
            .persistent(),
    )?;
    decl.bind_env(keys::LOG_FORMAT, EnvName::Prefixed("LOG_FORMAT"))?;
    decl.bind_flag(
        keys::LOG_LEVEL,
        Flag::string("log-level")
            .help("Log filter, e.g. debug or triton_sdk=trace")
            .default_value(DEFAULT_LEVEL)
            .persistent(),
    )?;
    decl.bind_env(keys::LOG_LEVEL, EnvName::Prefixed("LOG_LEVEL"))?;
    decl.bind_flag(
        keys::LOG_STATS,
        Flag::bool("log-stats")
            .help("Log command timing")
            .persistent(),
    )?;
    decl.bind_flag(
        keys::LOG_USE_COLOR,
        Flag::bool("use-color")
            .help("Colorize log output")
            .persistent(),
    )
}

/// Applies logging, pager and stats settings for the invocation.
fn configure(ctx: &mut Context<'_>) -> Result<()> {
    let config = ctx.config();
    let settings = LogSettings {
        format: config.get_string(keys::LOG_FORMAT)?.parse::<LogFormat>()?,
        level: config.get_string(keys::LOG_LEVEL)?,
        color: config.get_bool(keys::LOG_USE_COLOR)?,
    };
    init_logging(&settings)?;
    ctx.use_pager(config.get_bool(keys::USE_PAGER)?);
    ctx.enable_stats(config.get_bool(keys::LOG_STATS)?);
    Ok(())
}
