use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{Locator, UiSurface};
use crate::download::Fetch;
use crate::error::{Error, Result};
use crate::export::{self, ExportSpec, ExportStage};
use crate::settings::Settings;

/// Single generous budget for every UI wait
const WAIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Marker text the site puts in its error element on bad credentials
const CREDENTIALS_REJECTED_MARKER: &str = "username or password is not correct";

const EMAIL_INPUT: Locator<'static> = Locator::Id("email_input");
const PASSWORD_INPUT: Locator<'static> = Locator::Id("password_input");
const SUBMIT_BUTTON: Locator<'static> = Locator::Id("submit_button");
const ERROR_MESSAGE: Locator<'static> = Locator::Id("error_message");
/// First element of the project list; clickable only once login completed
const PROJECT_LIST_MARKER: Locator<'static> = Locator::ClassName("project-name");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    NotStarted,
    LoggedIn,
    Failed,
}

/// One login→export cycle against the site, driven through a [`UiSurface`]
pub struct Session<S: UiSurface> {
    surface: S,
    timeout: Duration,
    state: LoginState,
    current_project: String,
}

impl<S: UiSurface> Session<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            timeout: WAIT_TIMEOUT,
            state: LoginState::NotStarted,
            current_project: String::new(),
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Open the login page, submit credentials, and wait for the project
    /// list to appear.
    ///
    /// One attempt only. A detected credential rejection closes the browser
    /// and returns [`Error::LoginRejected`]; a wait timeout propagates with
    /// the browser left as-is.
    pub async fn login(&mut self, settings: &Settings) -> Result<()> {
        self.surface.open(&settings.url).await?;

        self.surface.wait_clickable(EMAIL_INPUT, self.timeout).await?;
        self.surface.type_into(EMAIL_INPUT, &settings.email).await?;
        self.surface
            .type_into(PASSWORD_INPUT, &settings.password)
            .await?;
        self.surface.click(SUBMIT_BUTTON).await?;

        if let Some(text) = self.surface.element_text(ERROR_MESSAGE).await? {
            if text.contains(CREDENTIALS_REJECTED_MARKER) {
                self.state = LoginState::Failed;
                if let Err(e) = self.surface.close().await {
                    tracing::warn!(error = %e, "failed to close browser after login rejection");
                }
                return Err(Error::LoginRejected);
            }
        }

        self.surface
            .wait_clickable(PROJECT_LIST_MARKER, self.timeout)
            .await?;
        self.state = LoginState::LoggedIn;
        tracing::info!("login successful");
        Ok(())
    }

    /// Click the project entry and record it as the current context.
    ///
    /// The identifier doubles as the entry's class name; nothing validates
    /// its shape before the lookup.
    pub async fn select_project(&mut self, project_id: &str) -> Result<()> {
        self.wait_click(Locator::ClassName(project_id)).await?;
        self.current_project = project_id.to_string();
        tracing::debug!(project = project_id, "project selected");
        Ok(())
    }

    pub async fn export_as_image<F: Fetch>(
        &mut self,
        fetcher: &F,
        save_path: &Path,
    ) -> Result<PathBuf> {
        self.run_export(&export::IMAGE_EXPORT, fetcher, save_path).await
    }

    pub async fn export_as_spreadsheet<F: Fetch>(
        &mut self,
        fetcher: &F,
        save_path: &Path,
    ) -> Result<PathBuf> {
        self.run_export(&export::SPREADSHEET_EXPORT, fetcher, save_path)
            .await
    }

    /// Walk one export dialog through its stages and download the artifact
    async fn run_export<F: Fetch>(
        &mut self,
        spec: &ExportSpec,
        fetcher: &F,
        save_path: &Path,
    ) -> Result<PathBuf> {
        self.wait_click(spec.menu).await?;
        trace_stage(spec, ExportStage::MenuOpened);

        self.wait_click(spec.entry).await?;
        trace_stage(spec, ExportStage::DialogOpened);

        if let Some(option) = &spec.configure {
            self.surface.wait_clickable(option.select, self.timeout).await?;
            self.surface.select_value(option.select, option.value).await?;
        }

        if spec.wait_for_generate {
            self.wait_click(spec.generate).await?;
        } else {
            self.surface.click(spec.generate).await?;
        }
        trace_stage(spec, ExportStage::Generating);

        self.surface.wait_clickable(spec.ready, self.timeout).await?;
        trace_stage(spec, ExportStage::Ready);

        let url = export::download_url(&self.current_project, spec.url_suffix);
        let dest = export::artifact_path(save_path, spec, Local::now());
        let cookies = self.surface.cookies().await?;
        let report = fetcher.fetch(&url, &dest, &cookies).await?;
        trace_stage(spec, ExportStage::Downloaded);
        tracing::info!(
            export = spec.label,
            status = report.status,
            bytes = report.bytes_written,
            path = %dest.display(),
            "artifact downloaded"
        );

        self.surface.click(spec.close).await?;
        trace_stage(spec, ExportStage::Closed);

        // Let the dialog fade out before the next interaction
        tokio::time::sleep(export::DIALOG_FADE).await;

        Ok(dest)
    }

    async fn wait_click(&self, locator: Locator<'_>) -> Result<()> {
        self.surface.wait_clickable(locator, self.timeout).await?;
        self.surface.click(locator).await
    }
}

fn trace_stage(spec: &ExportSpec, stage: ExportStage) {
    tracing::debug!(export = spec.label, stage = ?stage, "export stage reached");
}
