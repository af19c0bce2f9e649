use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initialize logging from the verbosity flag.
///
/// `RUST_LOG` directives still take precedence over the flag so individual
/// targets can be tuned without restarting with a higher global level.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let fmt_layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false);

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?);

    let subscriber = Registry::default().with(fmt_layer).with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
