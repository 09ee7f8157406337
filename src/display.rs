use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::compositor::encode_png;
use crate::types::{Control, InstanceId, WidgetAction, WidgetViewModel};

/// Where rendered widgets end up. Implementations decide how to draw;
/// the last write for an instance wins.
pub trait DisplaySurface: Send + Sync {
    /// Replace everything the instance shows. `artwork` is `None` while a fetch is pending,
    /// in which case whatever image was shown before stays.
    fn render_full(
        &self,
        id: InstanceId,
        view: &WidgetViewModel,
        artwork: Option<&RgbaImage>,
    ) -> Result<()>;

    /// Replace only the artwork of the instance
    fn render_partial(&self, id: InstanceId, artwork: &RgbaImage) -> Result<()>;

    fn open_foreground_player(&self) -> Result<()>;

    fn active_instance_ids(&self) -> Vec<InstanceId>;
}

/// Which action a tap on a control sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBinding {
    pub control: Control,
    pub action: WidgetAction,
}

pub fn control_bindings() -> Vec<ControlBinding> {
    Control::ALL
        .iter()
        .map(|&control| ControlBinding {
            control,
            action: control.action(),
        })
        .collect()
}

/// Document written per instance by [`PngDirectoryDisplay`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedWidget {
    #[serde(flatten)]
    pub view: WidgetViewModel,
    pub controls: Vec<ControlBinding>,
}

/// Writes `widget-<id>.json` (view model) and `widget-<id>.png` (artwork) into a directory
pub struct PngDirectoryDisplay {
    dir: PathBuf,
    instances: Vec<InstanceId>,
}

impl PngDirectoryDisplay {
    pub fn new(dir: impl Into<PathBuf>, instances: Vec<InstanceId>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir,
            instances,
        })
    }

    pub fn view_path(&self, id: InstanceId) -> PathBuf {
        self.dir.join(format!("widget-{}.json", id))
    }

    pub fn artwork_path(&self, id: InstanceId) -> PathBuf {
        self.dir.join(format!("widget-{}.png", id))
    }

    fn write_artwork(&self, id: InstanceId, artwork: &RgbaImage) -> Result<()> {
        let bytes = encode_png(artwork)?;
        self.replace_file(&self.artwork_path(id), &bytes)
    }

    /// Write to a fresh temp file in the same directory, then rename over `path`,
    /// so concurrent writers each land a whole file
    fn replace_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.persist(path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

impl DisplaySurface for PngDirectoryDisplay {
    fn render_full(
        &self,
        id: InstanceId,
        view: &WidgetViewModel,
        artwork: Option<&RgbaImage>,
    ) -> Result<()> {
        let path = self.view_path(id);
        let document = RenderedWidget {
            view: view.clone(),
            controls: control_bindings(),
        };
        let json =
            serde_json::to_vec_pretty(&document).context("Failed to serialize view model")?;
        self.replace_file(&path, &json)?;

        if let Some(artwork) = artwork {
            self.write_artwork(id, artwork)?;
        }

        log::debug!("Rendered widget {}: {} - {}", id, view.title_text, view.artist_text);
        Ok(())
    }

    fn render_partial(&self, id: InstanceId, artwork: &RgbaImage) -> Result<()> {
        self.write_artwork(id, artwork)?;
        log::debug!("Updated artwork of widget {}", id);
        Ok(())
    }

    fn open_foreground_player(&self) -> Result<()> {
        log::info!("Open player requested");
        Ok(())
    }

    fn active_instance_ids(&self) -> Vec<InstanceId> {
        self.instances.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Placeholders;
    use crate::projection::project;
    use image::Rgba;
    use std::sync::Arc;

    #[test]
    fn test_writes_view_and_artwork() {
        let dir = tempfile::tempdir().unwrap();
        let display = PngDirectoryDisplay::new(dir.path(), vec![4]).unwrap();
        let view = project(None, &Placeholders::default());
        let artwork = RgbaImage::from_pixel(200, 200, Rgba([1, 2, 3, 255]));

        display.render_full(4, &view, Some(&artwork)).unwrap();

        let written: RenderedWidget =
            serde_json::from_slice(&std::fs::read(display.view_path(4)).unwrap()).unwrap();
        assert_eq!(written.view, view);
        assert_eq!(written.controls.len(), Control::ALL.len());
        assert!(written.controls.contains(&ControlBinding {
            control: Control::Root,
            action: WidgetAction::OpenApp,
        }));

        let png = image::open(display.artwork_path(4)).unwrap().to_rgba8();
        assert_eq!(png, artwork);

        assert_eq!(display.active_instance_ids(), vec![4]);
    }

    #[test]
    fn test_full_render_without_artwork_keeps_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let display = PngDirectoryDisplay::new(dir.path(), vec![1]).unwrap();
        let view = project(None, &Placeholders::default());
        let artwork = RgbaImage::from_pixel(200, 200, Rgba([9, 9, 9, 255]));

        display.render_partial(1, &artwork).unwrap();
        display.render_full(1, &view, None).unwrap();

        let png = image::open(display.artwork_path(1)).unwrap().to_rgba8();
        assert_eq!(png, artwork);
    }

    #[test]
    fn test_concurrent_writers_leave_a_whole_png() {
        let dir = tempfile::tempdir().unwrap();
        let display = Arc::new(PngDirectoryDisplay::new(dir.path(), vec![1]).unwrap());
        let view = project(None, &Placeholders::default());

        // Different sizes so a torn write could not decode as either one
        let small = RgbaImage::from_pixel(20, 20, Rgba([200, 0, 0, 255]));
        let large = RgbaImage::from_fn(200, 200, |x, y| Rgba([x as u8, y as u8, 7, 255]));

        let partial = {
            let display = display.clone();
            let large = large.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    display.render_partial(1, &large).unwrap();
                }
            })
        };
        for _ in 0..25 {
            display.render_full(1, &view, Some(&small)).unwrap();
        }
        partial.join().unwrap();

        let png = image::open(display.artwork_path(1)).unwrap().to_rgba8();
        assert!(png == small || png == large);

        // No temp files are left behind next to the outputs
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["widget-1.json", "widget-1.png"]);
    }
}
