use super::{DocumentId, ExportOptions, ImageEditor};
use crate::channels::Channel;
use crate::error::{Result, TexBatchError};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tga::TgaEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageBuffer, Pixel, Rgb, RgbImage};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

struct Document {
    image: DynamicImage,
    source: Option<PathBuf>,
    alpha: bool,
}

/// In-process editor backed by the `image` crate.
///
/// Documents live in memory; the clipboard holds the luminance of the last
/// copied document, which is what a channel paste consumes.
#[derive(Default)]
pub struct LocalEditor {
    docs: HashMap<DocumentId, Document>,
    next_id: usize,
    clipboard: Option<GrayImage>,
}

impl LocalEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently open.
    pub fn open_documents(&self) -> usize {
        self.docs.len()
    }

    /// Pixels of an open document, for inspection.
    pub fn image(&self, doc: DocumentId) -> Result<&DynamicImage> {
        Ok(&self.doc(doc)?.image)
    }

    fn insert(&mut self, doc: Document) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.docs.insert(id, doc);
        id
    }

    fn doc(&self, id: DocumentId) -> Result<&Document> {
        self.docs.get(&id).ok_or(TexBatchError::UnknownDocument(id.0))
    }

    fn doc_mut(&mut self, id: DocumentId) -> Result<&mut Document> {
        self.docs
            .get_mut(&id)
            .ok_or(TexBatchError::UnknownDocument(id.0))
    }
}

impl ImageEditor for LocalEditor {
    fn open(&mut self, path: &Path) -> Result<DocumentId> {
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        let alpha = image.color().has_alpha();
        let id = self.insert(Document {
            image,
            source: Some(path.to_path_buf()),
            alpha,
        });
        debug!(?path, doc = %id, "opened");
        Ok(id)
    }

    fn dimensions(&self, doc: DocumentId) -> Result<(u32, u32)> {
        let img = &self.doc(doc)?.image;
        Ok((img.width(), img.height()))
    }

    fn has_alpha(&self, doc: DocumentId) -> Result<bool> {
        Ok(self.doc(doc)?.alpha)
    }

    fn copy(&mut self, doc: DocumentId) -> Result<()> {
        let luma = self.doc(doc)?.image.to_luma8();
        self.clipboard = Some(luma);
        Ok(())
    }

    fn new_canvas(&mut self, width: u32, height: u32) -> Result<DocumentId> {
        if width == 0 || height == 0 {
            return Err(TexBatchError::InvalidConfig(format!(
                "canvas size {}x{} is empty",
                width, height
            )));
        }
        let white = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        Ok(self.insert(Document {
            image: DynamicImage::ImageRgb8(white),
            source: None,
            alpha: false,
        }))
    }

    fn paste_into_channel(&mut self, doc: DocumentId, channel: Channel) -> Result<()> {
        let clip = self.clipboard.as_ref().ok_or(TexBatchError::EmptyClipboard)?;
        let document = self
            .docs
            .get_mut(&doc)
            .ok_or(TexBatchError::UnknownDocument(doc.0))?;
        if channel == Channel::Alpha || document.alpha {
            let mut rgba = document.image.to_rgba8();
            if !document.alpha {
                // a freshly added alpha channel starts black
                for px in rgba.pixels_mut() {
                    px[3] = 0;
                }
                document.alpha = true;
            }
            paste_centered(&mut rgba, channel.index(), clip);
            document.image = DynamicImage::ImageRgba8(rgba);
        } else {
            let mut rgb = document.image.to_rgb8();
            paste_centered(&mut rgb, channel.index(), clip);
            document.image = DynamicImage::ImageRgb8(rgb);
        }
        Ok(())
    }

    fn resize(&mut self, doc: DocumentId, width: u32, height: u32) -> Result<()> {
        let document = self.doc_mut(doc)?;
        document.image = document
            .image
            .resize_exact(width, height, FilterType::CatmullRom);
        Ok(())
    }

    fn export_as(&mut self, doc: DocumentId, path: &Path, options: &ExportOptions) -> Result<()> {
        let document = self.doc(doc)?;
        let writer = BufWriter::new(File::create(path)?);
        match *options {
            ExportOptions::Targa { alpha, rle } => {
                let mut enc = TgaEncoder::new(writer);
                if !rle {
                    enc = enc.disable_rle();
                }
                if alpha {
                    DynamicImage::ImageRgba8(document.image.to_rgba8()).write_with_encoder(enc)?;
                } else {
                    DynamicImage::ImageRgb8(document.image.to_rgb8()).write_with_encoder(enc)?;
                }
            }
            ExportOptions::Png => {
                let enc = PngEncoder::new(writer);
                if document.alpha {
                    DynamicImage::ImageRgba8(document.image.to_rgba8()).write_with_encoder(enc)?;
                } else {
                    DynamicImage::ImageRgb8(document.image.to_rgb8()).write_with_encoder(enc)?;
                }
            }
            ExportOptions::Jpeg { quality } => {
                let enc = JpegEncoder::new_with_quality(writer, quality);
                DynamicImage::ImageRgb8(document.image.to_rgb8()).write_with_encoder(enc)?;
            }
        }
        info!(?path, bits = options.bit_depth(), "exported");
        Ok(())
    }

    fn close(&mut self, doc: DocumentId, save: bool) -> Result<()> {
        let document = self
            .docs
            .remove(&doc)
            .ok_or(TexBatchError::UnknownDocument(doc.0))?;
        if save {
            if let Some(src) = &document.source {
                document.image.save(src)?;
            }
        }
        Ok(())
    }
}

/// Writes `src` luminance into channel `idx` of `dst`, centered and clipped.
fn paste_centered<P>(dst: &mut ImageBuffer<P, Vec<u8>>, idx: usize, src: &GrayImage)
where
    P: Pixel<Subpixel = u8>,
{
    let (dw, dh) = dst.dimensions();
    let (sw, sh) = src.dimensions();
    let ox = (dw as i64 - sw as i64) / 2;
    let oy = (dh as i64 - sh as i64) / 2;
    for (sx, sy, luma) in src.enumerate_pixels() {
        let x = ox + sx as i64;
        let y = oy + sy as i64;
        if x < 0 || y < 0 || x >= dw as i64 || y >= dh as i64 {
            continue;
        }
        dst.get_pixel_mut(x as u32, y as u32).channels_mut()[idx] = luma[0];
    }
}
