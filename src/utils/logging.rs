use tracing_appender::non_blocking::WorkerGuard;

pub fn setup_console_log() {
    use std::io;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let console_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stdout)
        .boxed();

    tracing_subscriber::registry()
        .with(vec![console_log])
        .with(EnvFilter::from_default_env())
        .init();
}

/// Console logging plus a daily rolling file under `log_dir`.
///
/// The returned guard flushes the file writer on drop, keep it alive for the
/// whole process.
pub fn setup_logging(log_dir: Option<&str>) -> Option<WorkerGuard> {
    use std::io;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let Some(log_dir) = log_dir else {
        setup_console_log();
        return None;
    };

    let console_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stdout)
        .boxed();

    let appender = tracing_appender::rolling::daily(log_dir, "tagmark.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .boxed();

    tracing_subscriber::registry()
        .with(vec![console_log, file_log])
        .with(EnvFilter::from_default_env())
        .init();

    Some(guard)
}
