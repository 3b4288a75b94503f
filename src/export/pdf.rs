//! Assemble page images into a PDF: one full-bleed raster per page, no text
//! layer.

use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::paginate::{PageGeometry, PageImage};
use crate::error::ExportError;

fn pdf_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// Build the PDF bytes for `pages`, each placed top-aligned across the full
/// page width.
pub fn assemble(pages: &[PageImage], geometry: &PageGeometry) -> Result<Vec<u8>, ExportError> {
    if pages.is_empty() {
        return Err(ExportError::EmptyRender);
    }

    let page_w = geometry.width_pt();
    let page_h = geometry.height_pt();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let (width, height) = page.image.dimensions();
        let rgb = DynamicImage::ImageRgba8(page.image.clone()).into_rgb8();

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.into_raw(),
        ));

        // A short last slice covers only the top part of its page
        let draw_h = page_h * page.coverage();
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(page_w),
                        0.into(),
                        0.into(),
                        Object::Real(draw_h),
                        0.into(),
                        Object::Real(page_h - draw_h),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(pdf_error)?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(page_w), Object::Real(page_h)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(pdf_error)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::paginate::paginate;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_one_pdf_page_per_image() {
        let raster = RgbaImage::from_pixel(210, 700, Rgba([10, 20, 30, 255]));
        let pages = paginate(&raster, &PageGeometry::A4_PORTRAIT).unwrap();
        assert_eq!(pages.len(), 3);

        let bytes = assemble(&pages, &PageGeometry::A4_PORTRAIT).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_no_pages_is_an_error() {
        assert!(matches!(
            assemble(&[], &PageGeometry::A4_PORTRAIT),
            Err(ExportError::EmptyRender)
        ));
    }
}
