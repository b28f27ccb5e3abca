use std::fmt;

/// Sink for the error-level messages the executor emits on every retry.
pub trait Logger: Send + Sync {
    /// Records an error-level message.
    fn error(&self, args: fmt::Arguments<'_>);
}

/// Forwards messages to `tracing::error!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!("{args}");
    }
}

impl<F> Logger for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn error(&self, args: fmt::Arguments<'_>) {
        self(args)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{Logger, TracingLogger};

    #[test]
    fn closures_are_loggers() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        let logger = move |args: std::fmt::Arguments<'_>| {
            sink.lock().expect("log mutex must not be poisoned").push(args.to_string());
        };

        logger.error(format_args!("retry {}", 2));

        assert_eq!(*lines.lock().expect("log mutex must not be poisoned"), ["retry 2"]);
    }

    #[test]
    fn tracing_logger_accepts_messages_without_subscriber() {
        TracingLogger.error(format_args!("nobody listening"));
    }
}
