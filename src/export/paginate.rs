use image::imageops;
use image::RgbaImage;

use crate::config::ExportConfig;
use crate::error::ExportError;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Physical page size the raster is sliced against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageGeometry {
    pub const A4_PORTRAIT: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            width_mm: config.page_width_mm,
            height_mm: config.page_height_mm,
        }
    }

    pub fn width_pt(&self) -> f32 {
        self.width_mm * POINTS_PER_MM
    }

    pub fn height_pt(&self) -> f32 {
        self.height_mm * POINTS_PER_MM
    }

    /// Raster rows covering one page when the raster spans the page width.
    pub fn page_height_px(&self, raster_width: u32) -> u32 {
        let rows = (raster_width as f64 * self.height_mm as f64 / self.width_mm as f64).round();
        (rows as u32).max(1)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4_PORTRAIT
    }
}

/// Vertical band of the source raster shown on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub top: u32,
    pub height: u32,
}

/// Cut `total_height` rows into consecutive bands of `page_height`.
///
/// Yields `ceil(total_height / page_height)` slices; only the last may be short.
pub fn page_slices(total_height: u32, page_height: u32) -> Vec<PageSlice> {
    let page_height = page_height.max(1);
    let mut slices = Vec::new();
    let mut top = 0;
    while top < total_height {
        let height = page_height.min(total_height - top);
        slices.push(PageSlice { top, height });
        top += height;
    }
    slices
}

/// One output page: its slice of the raster and the pixels themselves
#[derive(Debug, Clone)]
pub struct PageImage {
    pub slice: PageSlice,
    /// Rows in a full page at this raster width
    pub page_height_px: u32,
    pub image: RgbaImage,
}

impl PageImage {
    /// Fraction of the page height this image covers.
    pub fn coverage(&self) -> f32 {
        self.slice.height as f32 / self.page_height_px as f32
    }
}

/// Slice a tall raster into page images.
pub fn paginate(raster: &RgbaImage, geometry: &PageGeometry) -> Result<Vec<PageImage>, ExportError> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyRender);
    }

    let page_height_px = geometry.page_height_px(width);
    Ok(page_slices(height, page_height_px)
        .into_iter()
        .map(|slice| PageImage {
            slice,
            page_height_px,
            image: imageops::crop_imm(raster, 0, slice.top, width, slice.height).to_image(),
        })
        .collect())
}
