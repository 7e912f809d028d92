use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";
const QUIET_TARGETS: [&str; 3] = ["hyper=warn", "reqwest=warn", "teloxide=warn"];

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default level.
pub fn setup_logger() {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    for directive in QUIET_TARGETS {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }

    tracing_subscriber::fmt()
        // .with_file(true)
        // .with_line_number(true)
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(filter)
        .init();
}
