//! A map surface that records everything pushed into it.

use parking_lot::Mutex;
use std::sync::Arc;

use regenradar::{FrameWidgets, GeoImage, ImageLayer, MapSurface, ToggleIcon};

#[derive(Default)]
struct SurfaceLog {
    view: Option<([f64; 2], u8)>,
    sources: Vec<Arc<GeoImage>>,
    labels: Vec<String>,
    slider: Option<(usize, usize)>,
    icons: Vec<ToggleIcon>,
}

/// Cloneable view of everything a widget did to its surface
#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn view(&self) -> Option<([f64; 2], u8)> {
        self.log.lock().view
    }

    /// Every image pushed into the overlay layer, in order
    pub fn sources(&self) -> Vec<Arc<GeoImage>> {
        self.log.lock().sources.clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.log.lock().labels.clone()
    }

    /// Last `(max, value)` the slider was set to
    pub fn slider(&self) -> Option<(usize, usize)> {
        self.log.lock().slider
    }

    pub fn icons(&self) -> Vec<ToggleIcon> {
        self.log.lock().icons.clone()
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, center: [f64; 2], zoom: u8) {
        self.log.lock().view = Some((center, zoom));
    }

    fn add_image_layer(&mut self) -> Box<dyn ImageLayer> {
        Box::new(self.clone())
    }

    fn add_frame_control(&mut self) -> Box<dyn FrameWidgets> {
        Box::new(self.clone())
    }
}

impl ImageLayer for RecordingSurface {
    fn set_source(&mut self, source: Arc<GeoImage>) {
        self.log.lock().sources.push(source);
    }
}

impl FrameWidgets for RecordingSurface {
    fn set_slider(&mut self, max: usize, value: usize) {
        self.log.lock().slider = Some((max, value));
    }

    fn set_label(&mut self, text: &str) {
        self.log.lock().labels.push(text.to_string());
    }

    fn set_toggle(&mut self, icon: ToggleIcon) {
        self.log.lock().icons.push(icon);
    }
}
