use crate::calc::geometry::{ScrollBehavior, StripGeometry};
use crate::calc::header::{HeaderConfig, ViewMode};
use crate::calc::normalize::DateInput;
use crate::calc::selection::ChangeFormat;
use crate::data::persistence::{FileFormat, Persistable};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub view: ViewMode,
    pub picker_enabled: bool,
    pub item_width: f64,
    /// Gap after each strip item, as a fraction of `item_width`.
    pub item_margin: f64,
    pub leading_padding: f64,
    pub scroll: ScrollBehavior,
    pub emit: ChangeFormat,
    /// Date to show on start instead of the earliest event.
    pub active_date: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let header = HeaderConfig::default();
        AppSettings {
            view: header.view,
            picker_enabled: header.picker_enabled,
            item_width: header.geometry.item_width,
            item_margin: header.geometry.item_margin,
            leading_padding: header.geometry.leading_padding,
            scroll: header.scroll,
            emit: header.emit,
            active_date: None,
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct SettingsWrapper {
    #[serde(default)]
    pub(crate) settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn format() -> FileFormat {
        FileFormat::Yaml
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        let settings = SettingsWrapper::load()?.settings;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save()
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.item_width.is_finite() && self.item_width > 0.0,
            "item_width must be a positive number, got {}",
            self.item_width
        );
        ensure!(
            self.item_margin.is_finite() && self.item_margin >= 0.0,
            "item_margin must not be negative, got {}",
            self.item_margin
        );
        ensure!(
            self.leading_padding.is_finite() && self.leading_padding >= 0.0,
            "leading_padding must not be negative, got {}",
            self.leading_padding
        );
        Ok(())
    }

    pub fn header_config(&self) -> HeaderConfig {
        HeaderConfig {
            view: self.view,
            picker_enabled: self.picker_enabled,
            geometry: StripGeometry {
                item_width: self.item_width,
                item_margin: self.item_margin,
                leading_padding: self.leading_padding,
            },
            scroll: self.scroll,
            emit: self.emit,
        }
    }

    pub fn target(&self) -> Option<DateInput> {
        self.active_date.as_deref().map(DateInput::from)
    }
}
