//! Out-of-band code delivery.
//!
//! The SMS gateway is not part of this service. `CodeDelivery` is the seam
//! where one plugs in; the default implementation only logs.

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery to {identifier} failed: {reason}")]
    Failed { identifier: String, reason: String },
}

/// Sends an issued code to its recipient.
pub trait CodeDelivery: Send + Sync {
    fn deliver(&self, identifier: &str, purpose: &str, code: &str) -> Result<(), DeliveryError>;
}

/// Records that a code went out without sending it anywhere. The code
/// itself is never logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

impl CodeDelivery for LogDelivery {
    fn deliver(&self, identifier: &str, purpose: &str, code: &str) -> Result<(), DeliveryError> {
        info!(%identifier, %purpose, digits = code.len(), "OTP issued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_delivery_keeps_code_out_of_logs() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            LogDelivery
                .deliver("+911234567890", "dpr_submit", "482913")
                .expect("deliver");
        });

        let out = String::from_utf8(captured.0.lock().expect("log buffer").clone())
            .expect("utf8 log");
        assert!(out.contains("OTP issued"));
        assert!(!out.contains("482913"));
    }
}
