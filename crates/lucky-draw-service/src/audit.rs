//! Audit trail for key issuance and draws.
//!
//! The engine reports every committed mutation through a [`DrawAudit`]. The
//! default sink writes structured `tracing` events on the `lucky_draw::audit`
//! target, so audit records can be routed separately with an `EnvFilter`
//! directive such as `lucky_draw::audit=info`.

use lucky_draw_core::{DrawKey, DrawMode, DrawResult, KeyCode};

/// Receives a record of each committed key mutation.
pub trait DrawAudit: Send + Sync {
    /// A key was issued.
    fn key_issued(&self, key: &DrawKey);

    /// Draws were committed against a key.
    fn draws_committed(
        &self,
        code: &KeyCode,
        mode: DrawMode,
        results: &[DrawResult],
        remaining: u32,
    );

    /// All keys were deleted.
    fn keys_cleared(&self, removed: usize);
}

/// Writes audit records as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

impl DrawAudit for TracingAudit {
    fn key_issued(&self, key: &DrawKey) {
        tracing::info!(
            target: "lucky_draw::audit",
            key = %key.code,
            usage_count = key.remaining_uses,
            "Draw key issued"
        );
    }

    fn draws_committed(
        &self,
        code: &KeyCode,
        mode: DrawMode,
        results: &[DrawResult],
        remaining: u32,
    ) {
        tracing::info!(
            target: "lucky_draw::audit",
            key = %code,
            mode = %mode,
            draws = results.len(),
            remaining,
            ?results,
            "Draw results"
        );
    }

    fn keys_cleared(&self, removed: usize) {
        tracing::warn!(target: "lucky_draw::audit", removed, "All draw keys cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn draw_record_carries_every_result_with_its_time() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let code: KeyCode = "0042".parse().unwrap();
        let results = vec![
            DrawResult {
                prize: "谢谢参与".into(),
                time: "2024-05-01T12:00:00Z".parse().unwrap(),
            },
            DrawResult {
                prize: "四等奖: 10元".into(),
                time: "2024-05-01T12:00:01Z".parse().unwrap(),
            },
        ];

        tracing::subscriber::with_default(subscriber, || {
            TracingAudit.draws_committed(&code, DrawMode::Batch, &results, 0);
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("0042"), "{output}");
        assert!(output.contains("谢谢参与"), "{output}");
        assert!(output.contains("四等奖: 10元"), "{output}");
        assert!(output.contains("2024-05-01T12:00:00Z"), "{output}");
        assert!(output.contains("2024-05-01T12:00:01Z"), "{output}");
    }
}
