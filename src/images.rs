//! Transient image handles.
//!
//! A user-supplied image never leaves the process. Its bytes are parked in an
//! [`ImageRegistry`] and the recipe only carries a [`TransientImage`] handle
//! pointing at them. Revoking a handle drops the bytes; any clone of the
//! handle that outlives the revocation resolves to nothing.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use image::{ImageFormat, ImageReader};
use log::debug;

use crate::error::ImageError;

/// Scheme prefix of transient handle URLs.
pub const TRANSIENT_SCHEME: &str = "blob:recipe-printer/";

/// Largest image accepted, in bytes (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Allowed image formats for recipe photos.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashMap<u64, Arc<[u8]>>,
}

/// Owner of every live transient image in a session.
#[derive(Debug, Clone, Default)]
pub struct ImageRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register validated image bytes and hand out a new handle for them.
    pub fn create(&self, bytes: Vec<u8>) -> Result<Arc<TransientImage>, ImageError> {
        let content_type = validate_image(&bytes)?;
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = inner.next_id;
        inner.live.insert(id, Arc::from(bytes));
        debug!("Created transient image {} ({})", id, content_type);

        Ok(Arc::new(TransientImage {
            id,
            content_type,
            registry: Arc::downgrade(&self.inner),
        }))
    }

    /// Release the bytes behind `handle`. Returns false if already released.
    pub fn revoke(&self, handle: &TransientImage) -> bool {
        revoke_id(&self.inner, handle.id)
    }

    /// Number of handles whose bytes are still held.
    pub fn live_count(&self) -> usize {
        lock(&self.inner).live.len()
    }
}

/// Revocable reference to image bytes held by an [`ImageRegistry`].
///
/// Dropping the last reference revokes it.
#[derive(Debug)]
pub struct TransientImage {
    id: u64,
    content_type: String,
    registry: Weak<Mutex<RegistryInner>>,
}

impl TransientImage {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> String {
        format!("{}{}", TRANSIENT_SCHEME, self.id)
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The image bytes, or `None` once the handle has been revoked.
    pub fn bytes(&self) -> Option<Arc<[u8]>> {
        let registry = self.registry.upgrade()?;
        let inner = lock(&registry);
        inner.live.get(&self.id).cloned()
    }

    pub fn is_live(&self) -> bool {
        self.bytes().is_some()
    }
}

impl Drop for TransientImage {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            revoke_id(&registry, self.id);
        }
    }
}

impl PartialEq for TransientImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.registry, &other.registry)
    }
}

fn revoke_id(registry: &Mutex<RegistryInner>, id: u64) -> bool {
    let released = lock(registry).live.remove(&id).is_some();
    if released {
        debug!("Released transient image {}", id);
    }
    released
}

fn lock(registry: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    // Registry state stays consistent even if a holder panicked
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validate image data: check size and format, and make sure it decodes.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, ImageError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Read(e.to_string()))?;

    let format = reader.format().ok_or(ImageError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
    }

    reader
        .decode()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok(format.to_mime_type().to_string())
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, Rgba, RgbaImage};

    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([200, 80, 40, 255]),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}
