use crate::utils::config::Config;
use crate::utils::logging::*;
use common::detection::detection_set::DetectionSet;
use image::{ImageReader, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;

#[derive(Debug, Clone, Copy)]
pub struct AnnotationStyle {
    pub border_width: u32,
    pub border_color: Rgb<u8>,
}

impl From<&Config> for AnnotationStyle {
    fn from(config: &Config) -> Self {
        Self {
            border_width: config.border_width,
            border_color: Rgb(config.border_color),
        }
    }
}

pub struct Annotator;

impl Annotator {
    pub async fn load(image_path: PathBuf) -> Result<RgbImage, LogEntry> {
        spawn_blocking(move || Self::decode(&image_path))
            .await
            .map_err(|err| error_entry!(SystemEntry::TaskPanickedError(err)))?
    }

    // Format is sniffed from content first, the extension is only a fallback.
    fn decode(image_path: &Path) -> Result<RgbImage, LogEntry> {
        let decode_error = |err: String| warning_entry!(DetectionEntry::DecodeImageError(image_path.display().to_string(), err));
        let image = ImageReader::open(image_path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_error(err.to_string()))?
            .decode()
            .map_err(|err| decode_error(err.to_string()))?;
        Ok(image.to_rgb8())
    }

    pub async fn render(mut image: RgbImage, detections: DetectionSet, style: AnnotationStyle, output_path: PathBuf) -> Result<(), LogEntry> {
        spawn_blocking(move || {
            Self::draw_bounding_boxes(&mut image, &detections, &style);
            image.save(&output_path)
                .map_err(|err| error_entry!(DetectionEntry::SaveImageError(output_path.display().to_string(), err.to_string())))
        })
        .await
        .map_err(|err| error_entry!(SystemEntry::TaskPanickedError(err)))?
    }

    pub fn draw_bounding_boxes(image: &mut RgbImage, detections: &DetectionSet, style: &AnnotationStyle) {
        let (image_width, image_height) = (image.width() as i64, image.height() as i64);
        for bounding_box in detections {
            let (x1, y1) = (bounding_box.x1() as i64, bounding_box.y1() as i64);
            let x2 = x1 + bounding_box.width().max(1) as i64 - 1;
            let y2 = y1 + bounding_box.height().max(1) as i64 - 1;
            for i in 0..style.border_width as i64 {
                // edges beyond the image are pinned one pixel outside it and stay undrawn
                let left = (x1 - i).clamp(-1, image_width);
                let top = (y1 - i).clamp(-1, image_height);
                let right = (x2 + i).clamp(-1, image_width);
                let bottom = (y2 + i).clamp(-1, image_height);
                let offset_rect = Rect::at(left as i32, top as i32)
                    .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
                draw_hollow_rect_mut(image, offset_rect, style.border_color);
            }
        }
    }
}
