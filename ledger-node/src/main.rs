use anyhow::Context;
use ledger_node::{
    ApiResponse, AppError, Config, ErrorCode, Invocation, LedgerContext, LedgerNode, LedgerStorage,
    NotificationBus, setup_environment,
};
use std::io::{BufRead, Write};
use tokio::sync::broadcast::error::RecvError;

fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, work dir, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    setup_environment(&config)?;

    tracing::info!(environment = %config.environment, "Ledger node starting...");

    // 2. Ledger
    let path = config.ledger_path();
    let storage = LedgerStorage::open(&path)
        .with_context(|| format!("failed to open ledger at {}", path.display()))?;
    tracing::info!(path = %path.display(), keys = storage.key_count()?, "Ledger opened");

    // 3. Notifications are logged as they are committed
    let bus = NotificationBus::new(config.notify_channel_capacity);
    let mut rx = bus.subscribe();
    std::thread::spawn(move || {
        loop {
            match rx.blocking_recv() {
                Ok(n) => tracing::info!(
                    topic = %n.topic,
                    payload = %String::from_utf8_lossy(&n.payload),
                    "Notification"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification listener lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let node = LedgerNode::new(LedgerContext::new(storage, bus), config.refund_terms.clone());

    // 4. One JSON invocation per stdin line, one JSON response per stdout line
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Invocation>(&line) {
            Ok(invocation) => node.invoke(&invocation),
            Err(e) => ApiResponse::from(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid invocation: {e}"),
            )),
        };

        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
        stdout.flush()?;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
