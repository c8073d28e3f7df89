use ganttgrab::browser::{Locator, SessionCookie, UiSurface};
use ganttgrab::download::{Fetch, FetchReport};
use ganttgrab::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted browser surface that records every interaction in order
pub struct FakeSurface {
    actions: Mutex<Vec<String>>,
    /// Text of the credential-error element, if the page shows one
    error_text: Option<String>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            error_text: None,
        }
    }

    pub fn with_error_text(text: &str) -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            error_text: Some(text.to_string()),
        }
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: String) {
        self.actions.lock().unwrap().push(action);
    }
}

impl UiSurface for FakeSurface {
    async fn open(&self, url: &str) -> Result<()> {
        self.record(format!("open {url}"));
        Ok(())
    }

    async fn wait_clickable(&self, locator: Locator<'_>, _timeout: Duration) -> Result<()> {
        self.record(format!("wait {locator}"));
        Ok(())
    }

    async fn click(&self, locator: Locator<'_>) -> Result<()> {
        self.record(format!("click {locator}"));
        Ok(())
    }

    async fn type_into(&self, locator: Locator<'_>, text: &str) -> Result<()> {
        self.record(format!("type {locator} {text}"));
        Ok(())
    }

    async fn element_text(&self, locator: Locator<'_>) -> Result<Option<String>> {
        self.record(format!("read {locator}"));
        Ok(self.error_text.clone())
    }

    async fn select_value(&self, locator: Locator<'_>, value: &str) -> Result<()> {
        self.record(format!("select {locator} {value}"));
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<SessionCookie>> {
        Ok(vec![SessionCookie {
            name: "session".to_string(),
            value: "abc123".to_string(),
        }])
    }

    async fn close(&self) -> Result<()> {
        self.record("close".to_string());
        Ok(())
    }
}

/// Fetch stub that records requests instead of touching the network
pub struct RecordingFetcher {
    requests: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, PathBuf)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetch for RecordingFetcher {
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        _cookies: &[SessionCookie],
    ) -> Result<FetchReport> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        Ok(FetchReport {
            status: 200,
            bytes_written: 0,
        })
    }
}
