//! The map surface the widget draws on.
//!
//! The widget never talks to a map toolkit directly. It asks the surface for
//! an overlay layer and a set of frame-selector widgets, and from then on only
//! pushes images and control state into those.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::geometry::Extent;
use crate::raster::GeoImage;

/// Icon shown on the play/pause toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIcon {
    /// Playback is paused, clicking starts it
    Play,
    /// Playback is running, clicking pauses it
    Pause,
}

/// Overlay layer that shows one image at a time
pub trait ImageLayer: Send + 'static {
    fn set_source(&mut self, source: Arc<GeoImage>);
}

/// Slider, label and toggle of the frame selector
pub trait FrameWidgets: Send + 'static {
    /// Update the slider bounds and position
    fn set_slider(&mut self, max: usize, value: usize);

    /// Update the time label
    fn set_label(&mut self, text: &str);

    /// Update the play/pause icon
    fn set_toggle(&mut self, icon: ToggleIcon);
}

/// A map that can host the radar overlay and its controls
pub trait MapSurface {
    /// Center the view on web mercator coordinates
    fn set_view(&mut self, center: [f64; 2], zoom: u8);

    /// Add an image layer above the basemap
    fn add_image_layer(&mut self) -> Box<dyn ImageLayer>;

    /// Add the frame selector control
    fn add_frame_control(&mut self) -> Box<dyn FrameWidgets>;
}

/// Surface without a display, used by the command-line binary
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    output_dir: Option<PathBuf>,
    center: Option<[f64; 2]>,
    zoom: Option<u8>,
}

impl HeadlessSurface {
    /// Create a surface, optionally mirroring the overlay into a directory
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir,
            center: None,
            zoom: None,
        }
    }

    /// Current view center and zoom
    pub fn view(&self) -> Option<([f64; 2], u8)> {
        self.center.zip(self.zoom)
    }
}

impl MapSurface for HeadlessSurface {
    fn set_view(&mut self, center: [f64; 2], zoom: u8) {
        info!(x = center[0], y = center[1], zoom = zoom, "Map view set");
        self.center = Some(center);
        self.zoom = Some(zoom);
    }

    fn add_image_layer(&mut self) -> Box<dyn ImageLayer> {
        let Some(dir) = self.output_dir.clone() else {
            return Box::new(HeadlessLayer { latest: None });
        };
        let Ok(runtime) = Handle::try_current() else {
            warn!(dir = %dir.display(), "No async runtime, overlay will not be written");
            return Box::new(HeadlessLayer { latest: None });
        };

        let (tx, rx) = watch::channel(None);
        runtime.spawn(mirror_overlay(dir, rx));
        Box::new(HeadlessLayer { latest: Some(tx) })
    }

    fn add_frame_control(&mut self) -> Box<dyn FrameWidgets> {
        Box::new(LoggingWidgets)
    }
}

/// Sidecar describing the mirrored overlay
#[derive(Debug, Serialize)]
struct OverlayInfo<'a> {
    projection: &'a str,
    extent: Extent,
    width: u32,
    height: u32,
    interpolate: bool,
    attribution: &'a str,
}

/// Hands each new overlay to the writer task; only the latest is kept
struct HeadlessLayer {
    latest: Option<watch::Sender<Option<Arc<GeoImage>>>>,
}

impl ImageLayer for HeadlessLayer {
    fn set_source(&mut self, source: Arc<GeoImage>) {
        if let Some(latest) = &self.latest {
            latest.send_replace(Some(source));
        }
    }
}

/// Write the most recent overlay until the layer goes away
async fn mirror_overlay(dir: PathBuf, mut latest: watch::Receiver<Option<Arc<GeoImage>>>) {
    while latest.changed().await.is_ok() {
        let Some(source) = latest.borrow_and_update().clone() else {
            continue;
        };

        let target = dir.clone();
        match tokio::task::spawn_blocking(move || write_overlay(&target, &source)).await {
            Ok(Ok(())) => debug!(dir = %dir.display(), "Overlay written"),
            Ok(Err(e)) => warn!(dir = %dir.display(), error = %e, "Failed to write overlay"),
            Err(e) => warn!(dir = %dir.display(), error = %e, "Overlay writer task failed"),
        }
    }
    debug!(dir = %dir.display(), "Overlay writer stopped");
}

fn write_overlay(dir: &Path, source: &GeoImage) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let info = OverlayInfo {
        projection: &source.projection,
        extent: source.extent,
        width: source.image.width(),
        height: source.image.height(),
        interpolate: source.interpolate,
        attribution: &source.attribution,
    };

    replace_file(&dir.join("overlay.png"), &source.to_png()?)?;
    replace_file(&dir.join("overlay.json"), &serde_json::to_vec_pretty(&info)?)?;
    Ok(())
}

/// Write through a temporary file so readers never see a partial image
fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

struct LoggingWidgets;

impl FrameWidgets for LoggingWidgets {
    fn set_slider(&mut self, max: usize, value: usize) {
        debug!(value = value, max = max, "Slider moved");
    }

    fn set_label(&mut self, text: &str) {
        debug!(label = text, "Showing frame");
    }

    fn set_toggle(&mut self, icon: ToggleIcon) {
        info!(icon = ?icon, "Playback toggle changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn source() -> Arc<GeoImage> {
        Arc::new(GeoImage {
            image: RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 200])),
            projection: "DE1200".to_string(),
            extent: Extent {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 3000.0,
                max_y: 2000.0,
            },
            interpolate: true,
            attribution: "test".to_string(),
        })
    }

    #[test]
    fn test_headless_view() {
        let mut surface = HeadlessSurface::new(None);
        assert!(surface.view().is_none());
        surface.set_view([1.0, 2.0], 9);
        assert_eq!(surface.view(), Some(([1.0, 2.0], 9)));
    }

    /// Wait until the writer task has produced a readable overlay
    async fn wait_for_overlay(dir: &Path, width: u32) -> serde_json::Value {
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            loop {
                if let Ok(bytes) = std::fs::read(dir.join("overlay.json")) {
                    let info: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
                    if info["width"] == width {
                        return info;
                    }
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for overlay")
    }

    #[tokio::test]
    async fn test_headless_layer_mirrors_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = HeadlessSurface::new(Some(dir.path().to_path_buf()));
        let mut layer = surface.add_image_layer();

        layer.set_source(source());

        let info = wait_for_overlay(dir.path(), 3).await;
        assert_eq!(info["projection"], "DE1200");
        assert_eq!(info["extent"]["max_x"], 3000.0);

        let png = std::fs::read(dir.path().join("overlay.png")).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert!(!dir.path().join("overlay.tmp").exists());
    }

    #[tokio::test]
    async fn test_headless_layer_keeps_latest_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = HeadlessSurface::new(Some(dir.path().to_path_buf()));
        let mut layer = surface.add_image_layer();

        let mut wide = (*source()).clone();
        wide.image = RgbaImage::from_pixel(5, 2, image::Rgba([1, 2, 3, 4]));

        // A burst of updates ends with the wide image on disk
        for _ in 0..10 {
            layer.set_source(source());
        }
        layer.set_source(Arc::new(wide));

        wait_for_overlay(dir.path(), 5).await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let png = std::fs::read(dir.path().join("overlay.png")).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (5, 2));
    }

    #[tokio::test]
    async fn test_set_source_does_not_write_inline() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = HeadlessSurface::new(Some(dir.path().to_path_buf()));
        let mut layer = surface.add_image_layer();

        // The current-thread runtime cannot run the writer until we yield
        layer.set_source(source());
        assert!(!dir.path().join("overlay.png").exists());

        wait_for_overlay(dir.path(), 3).await;
    }

    #[test]
    fn test_headless_layer_without_output_dir() {
        let mut surface = HeadlessSurface::new(None);
        let mut layer = surface.add_image_layer();
        layer.set_source(source());
    }
}
