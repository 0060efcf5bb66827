use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Alignment, Element, Length};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::media::{ACCENT_GOLD, BACKGROUND, TEXT_MUTED, TEXT_PRIMARY};

pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    pub api_key: String,
    #[serde(default)]
    pub language: String,
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("cinescope")
                .join("config.json")
        })
    }

    /// Settings from the config file, with `TMDB_API_KEY` and `TMDB_LANGUAGE` taking precedence.
    pub fn load() -> Option<Self> {
        let from_file = match Self::config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    error!("Ignoring unreadable settings: {:#}", e);
                    None
                }
            },
            _ => None,
        };
        let settings = from_file.unwrap_or_default().with_overrides(
            std::env::var("TMDB_API_KEY").ok(),
            std::env::var("TMDB_LANGUAGE").ok(),
        );
        settings.is_valid().then_some(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| anyhow!("Could not determine config path"))?;
        self.save_to(&path)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn with_overrides(mut self, api_key: Option<String>, language: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        if let Some(lang) = language.filter(|l| !l.trim().is_empty()) {
            self.language = lang.trim().to_string();
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum SetupMessage {
    ApiKeyChanged(String),
    LanguageChanged(String),
    Submit,
}

pub struct SetupPage {
    pub api_key: String,
    pub language: String,
    pub error: Option<String>,
}

impl Default for SetupPage {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: String::from(DEFAULT_LANGUAGE),
            error: None,
        }
    }
}

impl SetupPage {
    /// Validated settings from the form, without touching disk.
    fn settings(&self) -> Option<AppSettings> {
        if self.api_key.trim().is_empty() {
            return None;
        }
        Some(AppSettings {
            api_key: self.api_key.trim().to_string(),
            language: if self.language.trim().is_empty() {
                String::from(DEFAULT_LANGUAGE)
            } else {
                self.language.trim().to_string()
            },
        })
    }

    pub fn update(&mut self, message: SetupMessage) -> Option<AppSettings> {
        match message {
            SetupMessage::ApiKeyChanged(key) => {
                self.api_key = key;
                self.error = None;
                None
            }
            SetupMessage::LanguageChanged(lang) => {
                self.language = lang;
                None
            }
            SetupMessage::Submit => {
                let Some(settings) = self.settings() else {
                    self.error = Some(String::from("API key is required"));
                    return None;
                };
                if let Err(e) = settings.save() {
                    error!("Failed to save settings: {:#}", e);
                    self.error = Some(format!("Failed to save: {}", e));
                    return None;
                }
                Some(settings)
            }
        }
    }

    pub fn view(&self) -> Element<'_, SetupMessage> {
        let logo = text("CINESCOPE")
            .size(48)
            .color(ACCENT_GOLD)
            .font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..Default::default()
            });

        let title = text("Welcome to Cinescope").size(28).color(TEXT_PRIMARY);
        let subtitle = text("Add your TMDB API key to start browsing")
            .size(14)
            .color(TEXT_MUTED);

        let api_label = text("TMDB API Key").size(14).color(TEXT_PRIMARY);
        let api_hint = text("Get a free key at themoviedb.org/settings/api, or set TMDB_API_KEY")
            .size(12)
            .color(TEXT_MUTED);
        let api_input = text_input("Enter your TMDB API key...", &self.api_key)
            .on_input(SetupMessage::ApiKeyChanged)
            .on_submit(SetupMessage::Submit)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let lang_label = text("Language").size(14).color(TEXT_PRIMARY);
        let lang_hint = text("Examples: en-US, de-DE, fr-FR, es-ES")
            .size(12)
            .color(TEXT_MUTED);
        let lang_input = text_input(DEFAULT_LANGUAGE, &self.language)
            .on_input(SetupMessage::LanguageChanged)
            .on_submit(SetupMessage::Submit)
            .padding(12)
            .size(14)
            .width(Length::Fill);

        let submit_button = button(text("Get Started").size(16).color(iced::Color::BLACK))
            .padding([12, 32])
            .style(|_theme, status| {
                let bg = match status {
                    button::Status::Hovered => iced::Color::from_rgb(1.0, 0.84, 0.2),
                    _ => ACCENT_GOLD,
                };
                button::Style {
                    background: Some(iced::Background::Color(bg)),
                    text_color: iced::Color::BLACK,
                    border: iced::Border::default().rounded(4),
                    ..Default::default()
                }
            })
            .on_press(SetupMessage::Submit);

        let error_text = match &self.error {
            Some(err) => text(err).size(14).color(iced::Color::from_rgb(0.9, 0.3, 0.3)),
            None => text("").size(14),
        };

        let spacer = || Space::new().height(16);
        let small_spacer = || Space::new().height(4);

        let form = column![
            logo,
            spacer(),
            title,
            small_spacer(),
            subtitle,
            spacer(),
            spacer(),
            api_label,
            small_spacer(),
            api_hint,
            small_spacer(),
            api_input,
            spacer(),
            lang_label,
            small_spacer(),
            lang_hint,
            small_spacer(),
            lang_input,
            spacer(),
            error_text,
            small_spacer(),
            row![submit_button].width(Length::Fill),
        ]
        .width(Length::Fixed(400.0))
        .align_x(Alignment::Start);

        container(form)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND)),
                ..Default::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cinescope-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = AppSettings {
            api_key: String::from("from-file"),
            language: String::from("de-DE"),
        };
        let merged = file
            .clone()
            .with_overrides(Some(String::from(" from-env ")), None);
        assert_eq!(merged.api_key, "from-env");
        assert_eq!(merged.language, "de-DE");

        let untouched = file.clone().with_overrides(Some(String::from("  ")), None);
        assert_eq!(untouched, file);
    }

    #[test]
    fn blank_key_is_invalid() {
        assert!(!AppSettings::default().is_valid());
        assert!(!AppSettings {
            api_key: String::from("   "),
            language: String::new(),
        }
        .is_valid());
    }

    #[test]
    fn settings_survive_save_and_load() {
        let path = scratch_file("roundtrip/config.json");
        let settings = AppSettings {
            api_key: String::from("abc123"),
            language: String::from("fr-FR"),
        };
        settings.save_to(&path).expect("save");
        assert_eq!(AppSettings::load_from(&path).expect("load"), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_file("broken/config.json");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(AppSettings::load_from(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn setup_form_requires_key_and_defaults_language() {
        let mut page = SetupPage::default();
        assert_eq!(page.update(SetupMessage::Submit), None);
        assert_eq!(page.error.as_deref(), Some("API key is required"));

        page.update(SetupMessage::ApiKeyChanged(String::from(" key ")));
        page.update(SetupMessage::LanguageChanged(String::new()));
        assert!(page.error.is_none());
        assert_eq!(
            page.settings(),
            Some(AppSettings {
                api_key: String::from("key"),
                language: String::from(DEFAULT_LANGUAGE),
            })
        );
    }
}
