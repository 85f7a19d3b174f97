//! Port bundle and tokio sleeper for the expiry scanner.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{MedicineRepository, UserRepository};

use super::ScanSleeper;

/// Repositories the scanner reads from.
pub struct ExpiryScannerPorts {
    pub medicines: Arc<dyn MedicineRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl ExpiryScannerPorts {
    pub fn new(medicines: Arc<dyn MedicineRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { medicines, users }
    }
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl ScanSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
