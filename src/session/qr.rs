use hourglass_rs::SafeTimeProvider;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};
use crate::events::{Event, EventStore};

/// body posted when a web-login qr code is scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrLoginRequest {
    pub qr_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanState {
    #[default]
    Ready,
    Pending,
    Done,
}

/// accepts one qr scan at a time
#[derive(Debug, Default)]
pub struct QrScanner {
    state: ScanState,
    events: EventStore,
}

impl QrScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a scanned value into a request.
    ///
    /// Further scans are refused until the request fails or the scanner is
    /// rearmed.
    pub fn handle_scan(
        &mut self,
        value: &str,
        app_key: Option<&str>,
        time: &SafeTimeProvider,
    ) -> Result<QrLoginRequest> {
        if self.state != ScanState::Ready {
            debug!("qr scan ignored, state {:?}", self.state);
            return Err(ClientError::ScanInProgress);
        }
        let qr_code = value.trim();
        if qr_code.is_empty() {
            return Err(ClientError::InvalidQrCode {
                message: "empty qr code".to_string(),
            });
        }

        self.state = ScanState::Pending;
        info!("qr login requested");
        self.events.emit(Event::QrLoginRequested {
            timestamp: time.now(),
        });
        Ok(QrLoginRequest {
            qr_code: qr_code.to_string(),
            app_key: app_key.map(str::to_string),
        })
    }

    /// request failed; accept the next scan
    pub fn fail(&mut self) {
        self.state = ScanState::Ready;
    }

    /// request succeeded; scanning is over
    pub fn finish(&mut self) {
        self.state = ScanState::Done;
    }

    /// "scan again"
    pub fn rearm(&mut self) {
        self.state = ScanState::Ready;
    }

    pub fn is_pending(&self) -> bool {
        self.state == ScanState::Pending
    }

    pub fn is_ready(&self) -> bool {
        self.state == ScanState::Ready
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
