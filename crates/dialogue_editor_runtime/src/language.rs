// SPDX-License-Identifier: MIT OR Apache-2.0
//! Active playback language and the font used for each language.

use dialogue_editor_graph::LanguageTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a font asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontRef(pub String);

impl fmt::Display for FontRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Font to render one language with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageFont {
    /// Language the font applies to
    pub language: LanguageTag,
    /// Font asset
    pub font: FontRef,
}

/// Language selection shared by everything that renders dialogue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageContext {
    language: LanguageTag,
    fonts: Vec<LanguageFont>,
}

impl LanguageContext {
    /// Create a context with no fonts assigned
    pub fn new(language: LanguageTag) -> Self {
        Self {
            language,
            fonts: Vec::new(),
        }
    }

    /// Assign fonts, keeping the first font given for each language
    pub fn with_fonts(mut self, fonts: impl IntoIterator<Item = LanguageFont>) -> Self {
        for pair in fonts {
            self.set_font(pair.language, pair.font);
        }
        self
    }

    /// Active language
    pub fn language(&self) -> LanguageTag {
        self.language
    }

    /// Switch the active language
    pub fn set_language(&mut self, language: LanguageTag) {
        if self.language != language {
            tracing::debug!("Dialogue language {} -> {language}", self.language);
        }
        self.language = language;
    }

    /// Assign a font to a language if it has none yet
    pub fn set_font(&mut self, language: LanguageTag, font: FontRef) {
        if self.fonts.iter().any(|pair| pair.language == language) {
            tracing::warn!("Font for {language} already assigned; ignoring {font}");
            return;
        }
        self.fonts.push(LanguageFont { language, font });
    }

    /// Font for a language, if one is assigned
    pub fn font_for_language(&self, language: LanguageTag) -> Option<&FontRef> {
        self.fonts
            .iter()
            .find(|pair| pair.language == language)
            .map(|pair| &pair.font)
    }

    /// Font for the active language
    pub fn active_font(&self) -> Option<&FontRef> {
        self.font_for_language(self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_lookup() {
        let ctx = LanguageContext::new(LanguageTag::Japanese).with_fonts([
            LanguageFont {
                language: LanguageTag::Japanese,
                font: FontRef("fonts/NotoSansJP.ttf".into()),
            },
            LanguageFont {
                language: LanguageTag::Japanese,
                font: FontRef("fonts/Other.ttf".into()),
            },
        ]);
        assert_eq!(ctx.active_font(), Some(&FontRef("fonts/NotoSansJP.ttf".into())));
        assert_eq!(ctx.font_for_language(LanguageTag::English), None);
    }

    #[test]
    fn test_switch_language() {
        let mut ctx = LanguageContext::default();
        assert_eq!(ctx.language(), LanguageTag::English);
        ctx.set_language(LanguageTag::Danish);
        assert_eq!(ctx.language(), LanguageTag::Danish);
    }
}
