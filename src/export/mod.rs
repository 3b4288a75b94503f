//! PDF export: snapshot → off-screen layout → raster → A4 page slices → PDF.
//!
//! Only one export runs at a time per pipeline; a request that arrives while
//! one is in progress is skipped rather than queued.

pub mod layout;
pub mod paginate;
pub mod pdf;
pub mod raster;

pub use layout::{DisplayList, OffscreenContainer, Primitive, Rect};
pub use paginate::{page_slices, paginate, PageGeometry, PageImage, PageSlice};
pub use raster::{BitmapRasterizer, Rasterizer};

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::NamedTempFile;

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::model::RecipeDocument;
use crate::presenter::Snapshot;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// File stem for a recipe title: lower-cased, whitespace runs become `-`.
pub fn slugify(title: &str) -> String {
    let slug = WHITESPACE_RE.replace_all(&title.to_lowercase(), "-").into_owned();
    if slug.is_empty() {
        "recipe".to_string()
    } else {
        slug
    }
}

/// A PDF written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub pages: usize,
}

/// What an export request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(ExportedFile),
    /// Another export was already running
    Skipped,
}

/// Holds the pipeline's busy flag until dropped.
///
/// Obtained from [`ExportPipeline::try_reserve`] and consumed by
/// [`ExportPipeline::run`], so a request can claim the pipeline before the
/// export itself is scheduled.
#[derive(Debug)]
pub struct ExportGuard {
    flag: Arc<AtomicBool>,
}

impl ExportGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Everything an export needs from the document, captured at trigger time
#[derive(Debug, Clone)]
pub struct ExportJob {
    snapshot: Snapshot,
    file_name: String,
}

impl ExportJob {
    pub fn capture(document: &RecipeDocument) -> Self {
        Self {
            snapshot: Snapshot::capture(document),
            file_name: format!("{}.pdf", slugify(&document.title)),
        }
    }
}

pub struct ExportPipeline {
    config: ExportConfig,
    rasterizer: Arc<dyn Rasterizer>,
    busy: Arc<AtomicBool>,
}

impl ExportPipeline {
    pub fn new(config: ExportConfig) -> Self {
        Self::with_rasterizer(config, Arc::new(BitmapRasterizer))
    }

    pub fn with_rasterizer(config: ExportConfig, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            config,
            rasterizer,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether an export is in progress.
    pub fn is_generating(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the pipeline, or `None` if an export is already running.
    pub fn try_reserve(&self) -> Option<ExportGuard> {
        ExportGuard::acquire(&self.busy)
    }

    /// Export `document` as `<slug>.pdf` into the output directory.
    ///
    /// The document itself is never touched; failures are logged and
    /// returned, and the busy flag is cleared either way.
    pub async fn export(&self, document: &RecipeDocument) -> Result<ExportOutcome, ExportError> {
        let Some(guard) = self.try_reserve() else {
            warn!("PDF export already in progress; ignoring request");
            return Ok(ExportOutcome::Skipped);
        };
        self.run(guard, ExportJob::capture(document))
            .await
            .map(ExportOutcome::Saved)
    }

    /// Render and write a captured job while holding `guard`.
    pub async fn run(&self, guard: ExportGuard, job: ExportJob) -> Result<ExportedFile, ExportError> {
        let path = self.config.output_dir.join(&job.file_name);
        let config = self.config.clone();
        let rasterizer = Arc::clone(&self.rasterizer);

        let result = tokio::task::spawn_blocking(move || {
            render_blocking(&job.snapshot, &config, rasterizer.as_ref(), &path)
        })
        .await
        .map_err(|e| ExportError::Task(format!("Render task panicked: {}", e)))
        .and_then(|rendered| rendered);
        drop(guard);

        match &result {
            Ok(file) => info!("Saved {} ({} pages)", file.path.display(), file.pages),
            Err(e) => error!("Error generating PDF: {}", e),
        }
        result
    }
}

/// Blocking implementation of the export: layout, raster, slice, write.
fn render_blocking(
    snapshot: &Snapshot,
    config: &ExportConfig,
    rasterizer: &dyn Rasterizer,
    path: &Path,
) -> Result<ExportedFile, ExportError> {
    let raster = {
        let container = OffscreenContainer::mount(snapshot, config.render_width);
        rasterizer.rasterize(container.display_list(), config.supersample)?
    };
    debug!("Raster is {}x{} px", raster.width(), raster.height());

    let geometry = PageGeometry::from_config(config);
    let pages = paginate(&raster, &geometry)?;
    let bytes = pdf::assemble(&pages, &geometry)?;

    write_atomically(path, &bytes)?;
    Ok(ExportedFile {
        path: path.to_path_buf(),
        pages: pages.len(),
    })
}

/// Write through a temp file in the target directory so a failed export
/// never leaves a partial PDF behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Zesty Lemon Garlic Shrimp Pasta"),
            "zesty-lemon-garlic-shrimp-pasta"
        );
        assert_eq!(slugify("  Two   Spaces\tTab "), "-two-spaces-tab-");
        assert_eq!(slugify(""), "recipe");
    }

    #[test]
    fn test_reservation_is_exclusive() {
        let pipeline = ExportPipeline::new(ExportConfig::default());
        let first = pipeline.try_reserve();
        assert!(first.is_some());
        assert!(pipeline.is_generating());
        assert!(pipeline.try_reserve().is_none());
        drop(first);
        assert!(!pipeline.is_generating());
        assert!(pipeline.try_reserve().is_some());
    }

    #[test]
    fn test_job_file_name() {
        let job = ExportJob::capture(&RecipeDocument::default());
        assert_eq!(job.file_name, "zesty-lemon-garlic-shrimp-pasta.pdf");
    }
}
