//! `env_logger` set-up for the binary.

use anyhow::{Context, Result};
use env_logger::{Env, Target};
use std::fs::OpenOptions;
use std::io::Write;

/// Log file used when `DEBUG` is set.
pub const DEBUG_LOG_FILE: &str = "logs.log";

/// Default level is `warn`; `RUST_LOG` overrides it.
pub fn init(debug: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));

    builder.format(move |buf, record| {
        let stamp = if debug {
            chrono::Local::now().format("%H:%M:%S")
        } else {
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        };
        writeln!(
            buf,
            "[{}] {{{}:{}}} {} - {}",
            stamp,
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.level(),
            record.args()
        )
    });

    if debug {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG_FILE)
            .with_context(|| format!("opening {DEBUG_LOG_FILE}"))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("logger already initialised")?;
    Ok(())
}
