//! Session Settings
//!
//! Display settings for a terminal session, resolved in layers: a value set
//! on the session wins over the default table, and a setting with neither
//! resolves to `None`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names of the settings a session understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Marker shown before the input line and before echoed commands
    Prompt,
    /// Font size in pixels
    FontSize,
    /// Default text color
    Foreground,
    /// Surface background color
    Background,
    /// Surface title; has no default
    Title,
}

impl Setting {
    /// Every setting, in declaration order
    pub const ALL: [Setting; 5] = [
        Setting::Prompt,
        Setting::FontSize,
        Setting::Foreground,
        Setting::Background,
        Setting::Title,
    ];

    /// Configuration key of the setting
    pub fn name(self) -> &'static str {
        match self {
            Setting::Prompt => "prompt",
            Setting::FontSize => "font_size",
            Setting::Foreground => "foreground",
            Setting::Background => "background",
            Setting::Title => "title",
        }
    }

    fn expects_number(self) -> bool {
        matches!(self, Setting::FontSize)
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Setting {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Setting::ALL
            .into_iter()
            .find(|setting| setting.name() == name)
            .ok_or_else(|| Error::UnknownSetting {
                name: name.to_string(),
            })
    }
}

/// A resolved setting value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Number(u32),
}

impl SettingValue {
    /// Parse a raw string for `setting`, as typed on a command line
    pub fn parse_for(setting: Setting, raw: &str) -> Result<Self> {
        if setting.expects_number() {
            raw.trim()
                .parse()
                .map(SettingValue::Number)
                .map_err(|_| Error::SettingTypeMismatch {
                    setting: setting.name(),
                    expected: "number",
                })
        } else {
            Ok(SettingValue::Text(raw.to_string()))
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(text) => f.write_str(text),
            SettingValue::Number(number) => write!(f, "{}", number),
        }
    }
}

/// One layer of settings; unset fields fall through to the next layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Settings {
    /// The built-in default table
    pub fn defaults() -> Self {
        Self {
            prompt: Some("> ".to_string()),
            font_size: Some(16),
            foreground: Some("lightgrey".to_string()),
            background: Some("black".to_string()),
            title: None,
        }
    }

    /// Value stored in this layer only
    pub fn get(&self, setting: Setting) -> Option<SettingValue> {
        match setting {
            Setting::Prompt => self.prompt.clone().map(SettingValue::Text),
            Setting::FontSize => self.font_size.map(SettingValue::Number),
            Setting::Foreground => self.foreground.clone().map(SettingValue::Text),
            Setting::Background => self.background.clone().map(SettingValue::Text),
            Setting::Title => self.title.clone().map(SettingValue::Text),
        }
    }

    /// Store `value` in this layer, checking its kind
    pub fn put(&mut self, setting: Setting, value: SettingValue) -> Result<()> {
        match (setting, value) {
            (Setting::FontSize, SettingValue::Number(size)) => self.font_size = Some(size),
            (Setting::FontSize, SettingValue::Text(_)) => {
                return Err(Error::SettingTypeMismatch {
                    setting: setting.name(),
                    expected: "number",
                })
            }
            (_, SettingValue::Number(_)) => {
                return Err(Error::SettingTypeMismatch {
                    setting: setting.name(),
                    expected: "text",
                })
            }
            (Setting::Prompt, SettingValue::Text(text)) => self.prompt = Some(text),
            (Setting::Foreground, SettingValue::Text(text)) => self.foreground = Some(text),
            (Setting::Background, SettingValue::Text(text)) => self.background = Some(text),
            (Setting::Title, SettingValue::Text(text)) => self.title = Some(text),
        }
        Ok(())
    }

    /// Overlay `other` onto `self`, keeping values `other` leaves unset
    pub fn merged_with(&self, other: &Settings) -> Settings {
        Settings {
            prompt: other.prompt.clone().or_else(|| self.prompt.clone()),
            font_size: other.font_size.or(self.font_size),
            foreground: other.foreground.clone().or_else(|| self.foreground.clone()),
            background: other.background.clone().or_else(|| self.background.clone()),
            title: other.title.clone().or_else(|| self.title.clone()),
        }
    }
}

/// Explicit values layered over a default table
#[derive(Debug, Clone)]
pub struct SettingsStore {
    values: Settings,
    defaults: Settings,
}

impl SettingsStore {
    /// Store backed by the built-in defaults
    pub fn new() -> Self {
        Self::with_defaults(Settings::defaults())
    }

    /// Store backed by a custom default table
    pub fn with_defaults(defaults: Settings) -> Self {
        Self {
            values: Settings::default(),
            defaults,
        }
    }

    /// Explicit value, else default, else `None`
    pub fn get(&self, setting: Setting) -> Option<SettingValue> {
        self.values
            .get(setting)
            .or_else(|| self.defaults.get(setting))
    }

    /// Set an explicit value.
    ///
    /// Returns `Ok(false)` without storing anything when `value` equals the
    /// currently resolved value, `Ok(true)` when the store changed.
    pub fn set(&mut self, setting: Setting, value: SettingValue) -> Result<bool> {
        if self.get(setting).as_ref() == Some(&value) {
            return Ok(false);
        }
        self.values.put(setting, value)?;
        Ok(true)
    }

    /// Fully resolved view of every setting
    pub fn resolved(&self) -> Settings {
        self.defaults.merged_with(&self.values)
    }

    /// Explicit values only
    pub fn explicit(&self) -> &Settings {
        &self.values
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
