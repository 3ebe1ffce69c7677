/// Installs the global `tracing` subscriber.
///
/// Uses `RUST_LOG` if set, otherwise `info,food_lens=debug`. Calling it
/// again (e.g. from several tests) is harmless.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,food_lens=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}
