//! Frame selector control.
//!
//! Mirrors what the host shows (slider, time label, toggle icon) so the
//! sequencer can read the slider position back without asking the surface.

use crate::surface::{FrameWidgets, ToggleIcon};

/// Owned state of the slider, label and play/pause toggle
pub struct FrameControl {
    widgets: Box<dyn FrameWidgets>,
    slider_max: usize,
    slider_value: usize,
    label: String,
    icon: ToggleIcon,
}

impl FrameControl {
    pub fn new(mut widgets: Box<dyn FrameWidgets>) -> Self {
        widgets.set_toggle(ToggleIcon::Play);
        Self {
            widgets,
            slider_max: 0,
            slider_value: 0,
            label: String::new(),
            icon: ToggleIcon::Play,
        }
    }

    /// Rebind the slider to `[0, frame_count - 1]` and rewind it
    pub fn reset(&mut self, frame_count: usize) {
        self.slider_max = frame_count.saturating_sub(1);
        self.slider_value = 0;
        self.widgets.set_slider(self.slider_max, self.slider_value);
    }

    /// Move the slider and show a label
    pub fn show(&mut self, index: usize, label: &str) {
        self.slider_value = index.min(self.slider_max);
        self.widgets.set_slider(self.slider_max, self.slider_value);
        if self.label != label {
            self.label = label.to_string();
            self.widgets.set_label(label);
        }
    }

    pub fn set_icon(&mut self, icon: ToggleIcon) {
        if self.icon != icon {
            self.icon = icon;
            self.widgets.set_toggle(icon);
        }
    }

    pub fn slider_value(&self) -> usize {
        self.slider_value
    }

    pub fn slider_max(&self) -> usize {
        self.slider_max
    }

    pub fn icon(&self) -> ToggleIcon {
        self.icon
    }
}
