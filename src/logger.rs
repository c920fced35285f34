use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Timestamped console logging. `RUST_LOG` overrides the default level.
pub fn init(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .parse_default_env()
        .init();

    log::debug!("Logger initialized at {}.", level);
}
