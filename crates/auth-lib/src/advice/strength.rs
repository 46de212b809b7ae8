//! Debounced, versioned password-strength checks.
//!
//! Every input bumps a version. The pending check for an older version is
//! aborted, and a result that finishes after a newer input arrived is
//! dropped instead of being published.
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use metrics::counter;
use parking_lot::Mutex;
use secureauth_common::PasswordStrength;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use super::service::AdviceClient;
use crate::config::StrengthSettings;
use crate::metrics::STRENGTH_STALE_DROPPED;

/// Latest published result and the input version it belongs to
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrengthReading {
    pub version: u64,
    pub strength: Option<PasswordStrength>,
}

pub struct StrengthMonitor {
    advice: Arc<AdviceClient>,
    settings: StrengthSettings,
    version: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    readings: Arc<watch::Sender<StrengthReading>>,
}

impl StrengthMonitor {
    pub fn new(advice: Arc<AdviceClient>, settings: StrengthSettings) -> Self {
        let (tx, _rx) = watch::channel(StrengthReading::default());
        Self {
            advice,
            settings,
            version: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            readings: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StrengthReading> {
        self.readings.subscribe()
    }

    pub fn current(&self) -> Option<PasswordStrength> {
        self.readings.borrow().strength.clone()
    }

    /// Feed the latest password text; returns the version assigned to it.
    /// Must be called from within a tokio runtime.
    pub fn input(&self, password: &str) -> u64 {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;

        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        if password.chars().count() < self.settings.min_length {
            publish(&self.readings, &self.version, version, None);
            return version;
        }

        let advice = Arc::clone(&self.advice);
        let readings = Arc::clone(&self.readings);
        let current = Arc::clone(&self.version);
        let delay = self.settings.debounce();
        let password = password.to_string();

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != version {
                return;
            }
            let strength = advice.analyze_password_strength(&password).await;
            publish(&readings, &current, version, Some(strength));
        }));
        version
    }
}

impl Drop for StrengthMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

fn publish(
    readings: &watch::Sender<StrengthReading>,
    current: &AtomicU64,
    version: u64,
    strength: Option<PasswordStrength>,
) {
    readings.send_if_modified(|reading| {
        if current.load(Ordering::SeqCst) != version || reading.version > version {
            debug!(version, "dropping stale strength result");
            counter!(STRENGTH_STALE_DROPPED).increment(1);
            return false;
        }
        *reading = StrengthReading { version, strength };
        true
    });
}
