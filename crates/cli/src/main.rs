mod commands;

use anyhow::Result;
use cmdtree::{GroupBuilder, LogOutput};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    init_tracing();

    let app = GroupBuilder::new("cmdtree-demo: a small tool built from declarative commands")
        .cmd("greet", commands::greet()?)
        .cmd("cat", commands::cat()?)
        .cmd("exec", commands::exec()?)
        .cmd("math", commands::math()?)
        .build()?;

    let code = app.main_with(LogOutput::StdOut);
    tracing::debug!(code, "finished");
    std::process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
