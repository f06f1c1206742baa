use crate::shared::config::{get_log_dir, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Инициализация системы трассировки (tracing)
///
/// Логи пишутся в:
/// - stdout (с цветами)
/// - <logging.dir>/catalog_tree.log (без цветов)
pub fn initialize(config: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = get_log_dir(config);

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("✗ ERROR: Cannot create log directory {}: {}", log_dir.display(), e);
        eprintln!("  Error kind: {:?}", e.kind());
        return Err(anyhow::anyhow!("Cannot create log directory: {}", e));
    }

    let log_file_path = log_dir.join("catalog_tree.log");
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("✗ ERROR: Cannot open log file {}: {}", log_file_path.display(), e);
            eprintln!("  Error kind: {:?}", e.kind());
            return Err(anyhow::anyhow!("Cannot open log file: {}", e));
        }
    };

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .try_init()?;

    tracing::debug!(
        "Tracing initialized: level={}, file={}",
        log_level,
        log_file_path.display()
    );

    Ok(())
}
