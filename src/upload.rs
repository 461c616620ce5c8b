//! Crop photo selection, preview, and submission.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ClientError, GatewayError};
use crate::gateway::Backend;
use crate::models::CropAnalysis;
use crate::state::{FetchState, RequestToken};

/// Fixed message stored in `Failed` when analysis fails.
const ANALYZE_FAILED: &str = "Failed to analyze crop. Please try again.";

/// Ephemeral on-disk copy of the selected photo, for display.
///
/// The backing temp file is deleted when the handle is dropped, so the
/// preview is released on replace, clear, and controller teardown alike —
/// including error paths.
#[derive(Debug)]
pub struct PreviewHandle {
    file: tempfile::NamedTempFile,
}

impl PreviewHandle {
    fn create(bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Path a renderer can load the preview from.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// The currently selected photo.
#[derive(Debug)]
pub struct UploadSelection {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
    preview: PreviewHandle,
}

impl UploadSelection {
    /// Original file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type of the selected file.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size of the selected file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the selection holds no bytes (never the case for a
    /// selection accepted by [`UploadController::select_file`]).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The preview derived from this selection.
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Orchestrates crop photo upload and analysis.
pub struct UploadController {
    gateway: Arc<dyn Backend>,
    selection: Option<UploadSelection>,
    state: FetchState<CropAnalysis>,
}

impl UploadController {
    pub fn new(gateway: Arc<dyn Backend>) -> Self {
        Self {
            gateway,
            selection: None,
            state: FetchState::new(),
        }
    }

    /// The current selection, if any.
    pub fn selection(&self) -> Option<&UploadSelection> {
        self.selection.as_ref()
    }

    /// The analysis state machine.
    pub fn state(&self) -> &FetchState<CropAnalysis> {
        &self.state
    }

    /// The completed analysis, if the last submission succeeded.
    pub fn analysis(&self) -> Option<&CropAnalysis> {
        self.state.value()
    }

    /// The failure message, if the last submission failed.
    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Record a newly chosen photo.
    ///
    /// Releases any prior preview, derives a fresh one from the new file,
    /// and clears any previous result or error. No network call is made.
    ///
    /// # Errors
    ///
    /// Rejects empty files before anything else happens; fails with an
    /// I/O error if the preview copy cannot be written.
    pub fn select_file(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> crate::error::Result<()> {
        if bytes.is_empty() {
            return Err(ClientError::EmptyInput("no file selected".to_owned()));
        }
        let preview = PreviewHandle::create(&bytes)?;
        // Replacing the option drops the old selection and its preview.
        self.selection = Some(UploadSelection {
            file_name: file_name.to_owned(),
            mime_type: mime_type.to_owned(),
            bytes,
            preview,
        });
        self.state.reset();
        Ok(())
    }

    /// Drop the selection and its preview and return to `Idle`.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.state.reset();
    }

    /// First half of [`submit`](Self::submit): transition to `Pending` if
    /// a submission should proceed. Returns `None` when no file is
    /// selected or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<RequestToken> {
        if self.selection.is_none() {
            return None;
        }
        if self.state.is_pending() {
            tracing::debug!("analysis already in flight; ignoring submit");
            return None;
        }
        Some(self.state.start())
    }

    /// Second half of [`submit`](Self::submit): apply the gateway outcome
    /// for `token`. Stale outcomes are discarded; returns whether the
    /// outcome was applied.
    pub fn finish_submit(
        &mut self,
        token: RequestToken,
        result: Result<CropAnalysis, GatewayError>,
    ) -> bool {
        match result {
            Ok(analysis) => self.state.resolve(token, analysis),
            Err(e) => {
                tracing::warn!(error = %e, "crop analysis failed");
                self.state.reject(token, ANALYZE_FAILED)
            }
        }
    }

    /// Submit the selected photo for analysis.
    ///
    /// No-op without a selection or while a submission is pending.
    pub async fn submit(&mut self) {
        let Some(token) = self.begin_submit() else {
            return;
        };
        let (file_name, mime_type, bytes) = match &self.selection {
            Some(selection) => (
                selection.file_name.clone(),
                selection.mime_type.clone(),
                selection.bytes.clone(),
            ),
            None => return,
        };
        let result = self.gateway.analyze_crop(&file_name, &mime_type, bytes).await;
        self.finish_submit(token, result);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::test_utils::{FakeBackend, sample_analysis};
    use std::path::PathBuf;

    fn controller() -> (UploadController, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend::new());
        (UploadController::new(backend.clone()), backend)
    }

    fn select(controller: &mut UploadController) -> PathBuf {
        controller
            .select_file("leaf.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
            .unwrap();
        controller.selection().unwrap().preview().path().to_path_buf()
    }

    #[test]
    fn select_creates_preview_file() {
        let (mut controller, _) = controller();
        let preview = select(&mut controller);
        assert!(preview.exists());
        assert_eq!(controller.selection().unwrap().file_name(), "leaf.jpg");
        assert!(controller.state().is_idle());
    }

    #[test]
    fn empty_file_is_rejected_without_selection() {
        let (mut controller, backend) = controller();
        let result = controller.select_file("leaf.jpg", "image/jpeg", Vec::new());
        assert!(matches!(result, Err(ClientError::EmptyInput(_))));
        assert!(controller.selection().is_none());
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn clear_releases_preview_and_returns_to_idle() {
        let (mut controller, _) = controller();
        let preview = select(&mut controller);
        controller.clear_selection();
        assert!(!preview.exists(), "preview file must be deleted on clear");
        assert!(controller.selection().is_none());
        assert!(controller.state().is_idle());
    }

    #[test]
    fn reselect_releases_previous_preview() {
        let (mut controller, _) = controller();
        let first = select(&mut controller);
        let second = select(&mut controller);
        assert!(!first.exists(), "replaced preview must be released");
        assert!(second.exists());
    }

    #[tokio::test]
    async fn submit_without_selection_is_a_no_op() {
        let (mut controller, backend) = controller();
        controller.submit().await;
        assert!(controller.state().is_idle());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn submit_succeeds_with_report() {
        let (mut controller, backend) = controller();
        backend.push_crop(Ok(sample_analysis()));
        select(&mut controller);
        controller.submit().await;
        assert_eq!(controller.analysis().unwrap().crop.name, "Tomato");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn submit_failure_stores_fixed_message() {
        let (mut controller, backend) = controller();
        backend.push_crop(Err(GatewayError::ServerError {
            status: 500,
            detail: "boom".into(),
        }));
        select(&mut controller);
        controller.submit().await;
        assert_eq!(controller.error(), Some(ANALYZE_FAILED));
    }

    #[test]
    fn begin_while_pending_is_ignored() {
        let (mut controller, _) = controller();
        select(&mut controller);
        let first = controller.begin_submit();
        assert!(first.is_some());
        assert!(controller.begin_submit().is_none(), "no duplicate submission");
    }

    #[test]
    fn late_result_after_clear_is_discarded() {
        let (mut controller, _) = controller();
        select(&mut controller);
        let token = controller.begin_submit().unwrap();
        controller.clear_selection();
        let applied = controller.finish_submit(token, Ok(sample_analysis()));
        assert!(!applied, "stale result must not be applied");
        assert!(controller.state().is_idle());
        assert!(controller.analysis().is_none());
    }

    #[test]
    fn selecting_new_file_clears_previous_result() {
        let (mut controller, _) = controller();
        select(&mut controller);
        let token = controller.begin_submit().unwrap();
        controller.finish_submit(token, Ok(sample_analysis()));
        assert!(controller.analysis().is_some());
        select(&mut controller);
        assert!(controller.analysis().is_none());
        assert!(controller.state().is_idle());
    }
}
