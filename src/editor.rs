//! The editor owns the one live recipe and funnels every change through
//! whole-document replacement.
//!
//! Drafting and exporting are the only operations that suspend. Both can run
//! in the background: `request_*` spawns the work and the result comes back as
//! an [`EditorEvent`] on the channel returned by [`Editor::new`], to be handed
//! to [`Editor::apply`] by whoever drives the editor. The `*_now` variants do
//! the same work inline.

use std::path::Path;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Settings;
use crate::error::{EditError, ExportError, ExtractionError, ImageError};
use crate::export::{ExportJob, ExportOutcome, ExportPipeline};
use crate::extractors::{RecipeExtractor, SimulatedExtractor};
use crate::images::ImageRegistry;
use crate::model::{Field, ImageSource, RecipeDocument, StepField};
use crate::presenter::{render_text, Mode};

/// Shown when a draft fails; the document stays as it was.
pub const DRAFT_FAILED_MESSAGE: &str = "Failed to draft recipe. Please try again.";

/// Completion of background work started by the editor
#[derive(Debug)]
pub enum EditorEvent {
    Drafted(Result<RecipeDocument, ExtractionError>),
    Exported(Result<ExportOutcome, ExportError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user about the outcome of background work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct Editor {
    document: RecipeDocument,
    mode: Mode,
    drafting: bool,
    notice: Option<Notice>,
    images: ImageRegistry,
    exporter: Arc<ExportPipeline>,
    extractor: Arc<dyn RecipeExtractor>,
    events: UnboundedSender<EditorEvent>,
}

impl Editor {
    /// Create an editor holding the built-in default recipe.
    pub fn new(
        exporter: ExportPipeline,
        extractor: Arc<dyn RecipeExtractor>,
    ) -> (Self, UnboundedReceiver<EditorEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let editor = Self {
            document: RecipeDocument::default(),
            mode: Mode::View,
            drafting: false,
            notice: None,
            images: ImageRegistry::new(),
            exporter: Arc::new(exporter),
            extractor,
            events,
        };
        (editor, receiver)
    }

    /// Editor wired with the default pipeline and the simulated extractor.
    pub fn from_settings(settings: &Settings) -> (Self, UnboundedReceiver<EditorEvent>) {
        Self::new(
            ExportPipeline::new(settings.export.clone()),
            Arc::new(SimulatedExtractor::new(&settings.extraction)),
        )
    }

    pub fn document(&self) -> &RecipeDocument {
        &self.document
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn images(&self) -> &ImageRegistry {
        &self.images
    }

    pub fn is_generating(&self) -> bool {
        self.exporter.is_generating()
    }

    pub fn is_drafting(&self) -> bool {
        self.drafting
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn render(&self) -> String {
        render_text(&self.document, self.mode)
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Swap in a new document, revoking the outgoing transient image if the
    /// new one no longer uses it.
    fn replace_document(&mut self, next: RecipeDocument) {
        if let Some(old) = self.document.image_url.transient() {
            let still_used = next.image_url.transient().is_some_and(|new| new.id() == old.id());
            if !still_used {
                self.images.revoke(old);
            }
        }
        self.document = next;
    }

    fn editable(&self) -> Result<&RecipeDocument, EditError> {
        match self.mode {
            Mode::Edit => Ok(&self.document),
            Mode::View => Err(EditError::ReadOnly),
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), EditError> {
        let next = self.editable()?.with_field(field, value);
        self.replace_document(next);
        Ok(())
    }

    pub fn set_ingredient(&mut self, index: usize, value: impl Into<String>) -> Result<(), EditError> {
        let next = self.editable()?.with_ingredient(index, value)?;
        self.replace_document(next);
        Ok(())
    }

    pub fn add_ingredient(&mut self) -> Result<(), EditError> {
        let next = self.editable()?.with_empty_ingredient();
        self.replace_document(next);
        Ok(())
    }

    pub fn remove_ingredient(&mut self, index: usize) -> Result<(), EditError> {
        let next = self.editable()?.without_ingredient(index)?;
        self.replace_document(next);
        Ok(())
    }

    pub fn set_step_field(
        &mut self,
        index: usize,
        field: StepField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let next = self.editable()?.with_step_field(index, field, value)?;
        self.replace_document(next);
        Ok(())
    }

    pub fn add_step(&mut self) -> Result<(), EditError> {
        let next = self.editable()?.with_empty_step();
        self.replace_document(next);
        Ok(())
    }

    pub fn remove_step(&mut self, index: usize) -> Result<(), EditError> {
        let next = self.editable()?.without_step(index)?;
        self.replace_document(next);
        Ok(())
    }

    /// Change servings by `delta` (floored at 1), rescaling ingredients.
    ///
    /// Returns false when the servings count stayed the same.
    pub fn adjust_servings(&mut self, delta: i64) -> Result<bool, EditError> {
        match self.editable()?.with_servings_delta(delta)? {
            Some(next) => {
                debug!("Servings {} → {}", self.document.servings, next.servings);
                self.replace_document(next);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Use `bytes` as the recipe image, releasing any previous local image.
    pub fn replace_image(&mut self, bytes: Vec<u8>) -> Result<(), EditError> {
        self.editable()?;
        let handle = self.images.create(bytes)?;
        info!("Recipe image replaced with {}", handle.url());
        let next = self.document.with_image(ImageSource::Transient(handle));
        self.replace_document(next);
        Ok(())
    }

    pub async fn replace_image_from_path(&mut self, path: &Path) -> Result<(), EditError> {
        self.editable()?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ImageError::Read(format!("{}: {}", path.display(), e)))?;
        self.replace_image(bytes)
    }

    fn begin_draft(&mut self, url: &str) -> bool {
        if url.trim().is_empty() {
            debug!("Ignoring draft request with blank URL");
            return false;
        }
        if self.drafting {
            warn!("A recipe draft is already in progress; ignoring request");
            return false;
        }
        self.drafting = true;
        self.notice = None;
        true
    }

    fn finish_draft(&mut self, result: Result<RecipeDocument, ExtractionError>) {
        self.drafting = false;
        match result {
            Ok(document) => {
                info!("Drafted recipe '{}'", document.title);
                self.replace_document(document);
            }
            Err(e) => {
                error!("{}", e);
                self.notice = Some(Notice::error(DRAFT_FAILED_MESSAGE));
            }
        }
    }

    /// Start drafting a recipe from `url` in the background.
    ///
    /// Returns false if the URL is blank or a draft is already running.
    pub fn request_draft(&mut self, url: &str) -> bool {
        if !self.begin_draft(url) {
            return false;
        }
        let extractor = Arc::clone(&self.extractor);
        let events = self.events.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            let result = extractor.extract(&url).await;
            let _ = events.send(EditorEvent::Drafted(result));
        });
        true
    }

    /// Draft a recipe from `url` and apply it before returning.
    pub async fn draft_now(&mut self, url: &str) -> bool {
        if !self.begin_draft(url) {
            return false;
        }
        let result = self.extractor.extract(url).await;
        self.finish_draft(result);
        true
    }

    fn finish_export(&mut self, result: &Result<ExportOutcome, ExportError>) {
        match result {
            Ok(ExportOutcome::Saved(file)) => {
                self.notice = Some(Notice::info(format!(
                    "Saved {} ({} pages)",
                    file.path.display(),
                    file.pages
                )));
            }
            Ok(ExportOutcome::Skipped) => {}
            Err(e) => {
                self.notice = Some(Notice::error(format!("Failed to generate PDF: {}", e)));
            }
        }
    }

    /// Start exporting the current document in the background.
    ///
    /// Returns false if an export is already running.
    pub fn request_export(&mut self) -> bool {
        let Some(guard) = self.exporter.try_reserve() else {
            warn!("PDF export already in progress; ignoring request");
            return false;
        };
        let job = ExportJob::capture(&self.document);
        let exporter = Arc::clone(&self.exporter);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = exporter.run(guard, job).await.map(ExportOutcome::Saved);
            let _ = events.send(EditorEvent::Exported(result));
        });
        true
    }

    /// Export the current document and record the outcome before returning.
    pub async fn export_now(&mut self) -> Result<ExportOutcome, ExportError> {
        let result = self.exporter.export(&self.document).await;
        self.finish_export(&result);
        result
    }

    /// Apply the result of background work.
    pub fn apply(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::Drafted(result) => self.finish_draft(result),
            EditorEvent::Exported(result) => self.finish_export(&result),
        }
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        if let Some(handle) = self.document.image_url.transient() {
            self.images.revoke(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::images::png_bytes;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingExtractor;

    #[async_trait]
    impl RecipeExtractor for FailingExtractor {
        fn name(&self) -> &str {
            "failing"
        }

        async fn extract(&self, url: &str) -> Result<RecipeDocument, ExtractionError> {
            Err(ExtractionError::Failed {
                url: url.to_string(),
                reason: "no recipe here".to_string(),
            })
        }
    }

    fn editor_with(extractor: Arc<dyn RecipeExtractor>) -> (Editor, UnboundedReceiver<EditorEvent>) {
        Editor::new(ExportPipeline::new(ExportConfig::default()), extractor)
    }

    fn quick_editor() -> (Editor, UnboundedReceiver<EditorEvent>) {
        editor_with(Arc::new(SimulatedExtractor::with_delay(Duration::from_millis(5))))
    }

    #[test]
    fn test_view_mode_is_read_only() {
        let (mut editor, _rx) = quick_editor();
        assert_eq!(editor.mode(), Mode::View);
        assert_eq!(editor.set_field(Field::Title, "x"), Err(EditError::ReadOnly));
        assert_eq!(editor.add_ingredient(), Err(EditError::ReadOnly));
        assert_eq!(editor.adjust_servings(1), Err(EditError::ReadOnly));
        assert_eq!(editor.document(), &RecipeDocument::default());
    }

    #[test]
    fn test_toggle_mode_both_ways() {
        let (mut editor, _rx) = quick_editor();
        assert_eq!(editor.toggle_mode(), Mode::Edit);
        assert_eq!(editor.toggle_mode(), Mode::View);
    }

    #[test]
    fn test_edits_replace_document() {
        let (mut editor, _rx) = quick_editor();
        editor.toggle_mode();
        let before = editor.document().clone();

        editor.set_field(Field::Title, "Weeknight Pasta").unwrap();
        editor.add_step().unwrap();
        editor.set_step_field(5, StepField::Title, "Rest:").unwrap();

        assert_eq!(before.title, "Zesty Lemon Garlic Shrimp Pasta");
        assert_eq!(editor.document().title, "Weeknight Pasta");
        assert_eq!(editor.document().instructions[5].step, 6);
        assert_eq!(editor.document().instructions[5].title, "Rest:");
    }

    #[test]
    fn test_servings_floor() {
        let (mut editor, _rx) = quick_editor();
        editor.toggle_mode();
        editor.set_field(Field::Servings, "1").unwrap();
        let ingredients = editor.document().ingredients.clone();

        for _ in 0..3 {
            assert!(!editor.adjust_servings(-1).unwrap());
        }
        assert_eq!(editor.document().servings, "1");
        assert_eq!(editor.document().ingredients, ingredients);
    }

    #[test]
    fn test_image_replace_keeps_one_live_handle() {
        let (mut editor, _rx) = quick_editor();
        editor.toggle_mode();

        editor.replace_image(png_bytes(4, 4)).unwrap();
        let first = editor.document().image_url.transient().cloned().unwrap();
        editor.replace_image(png_bytes(4, 4)).unwrap();

        assert!(!first.is_live());
        assert_eq!(editor.images().live_count(), 1);

        // Unrelated edits keep the current handle alive
        editor.set_field(Field::Tips, "More lemon.").unwrap();
        assert_eq!(editor.images().live_count(), 1);
    }

    #[test]
    fn test_rejected_image_leaves_document() {
        let (mut editor, _rx) = quick_editor();
        editor.toggle_mode();
        let result = editor.replace_image(b"plain text".to_vec());
        assert!(matches!(result, Err(EditError::Image(ImageError::UnknownFormat))));
        assert_eq!(editor.document(), &RecipeDocument::default());
    }

    #[test]
    fn test_drop_releases_image() {
        let (mut editor, _rx) = quick_editor();
        editor.toggle_mode();
        editor.replace_image(png_bytes(2, 2)).unwrap();
        let registry = editor.images().clone();
        assert_eq!(registry.live_count(), 1);
        drop(editor);
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn test_draft_replaces_document_and_image() {
        let (mut editor, _rx) = quick_editor();
        editor.toggle_mode();
        editor.replace_image(png_bytes(2, 2)).unwrap();

        assert!(editor.draft_now("https://youtu.be/dQw4w9WgXcQ").await);
        assert_eq!(editor.document().title, "Classic Spaghetti Carbonara");
        assert_eq!(editor.images().live_count(), 0);
        assert!(!editor.is_drafting());
    }

    #[tokio::test]
    async fn test_blank_url_is_ignored() {
        let (mut editor, _rx) = quick_editor();
        assert!(!editor.draft_now("   ").await);
        assert!(!editor.request_draft(""));
        assert_eq!(editor.document(), &RecipeDocument::default());
    }

    #[tokio::test]
    async fn test_failed_draft_keeps_document() {
        let (mut editor, _rx) = editor_with(Arc::new(FailingExtractor));
        assert!(editor.draft_now("https://example.com/video").await);

        assert_eq!(editor.document(), &RecipeDocument::default());
        assert_eq!(
            editor.take_notice(),
            Some(Notice {
                level: NoticeLevel::Error,
                message: DRAFT_FAILED_MESSAGE.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_background_draft_arrives_as_event() {
        let (mut editor, mut rx) = quick_editor();
        assert!(editor.request_draft("https://example.com/v"));
        assert!(editor.is_drafting());
        // Second request while the first is in flight is ignored
        assert!(!editor.request_draft("https://example.com/w"));

        let event = rx.recv().await.unwrap();
        editor.apply(event);

        assert!(!editor.is_drafting());
        assert_eq!(editor.document().title, "Classic Spaghetti Carbonara");
    }
}
