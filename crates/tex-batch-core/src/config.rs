use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extensions considered textures by default. Matching is case-insensitive.
pub const DEFAULT_EXTENSIONS: [&str; 3] = [".tga", ".png", ".jpg"];

/// Target edge lengths offered for resizing.
///   - Also used as the "already sized" name tokens: a file whose name contains
///     any of these numbers is assumed to have been resized before.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum TextureSize {
    S64,
    S128,
    S256,
    S512,
    S1024,
    S2048,
    S4096,
}

impl TextureSize {
    /// Largest first, the order the sizes are presented to users.
    pub const ALL: [TextureSize; 7] = [
        TextureSize::S4096,
        TextureSize::S2048,
        TextureSize::S1024,
        TextureSize::S512,
        TextureSize::S256,
        TextureSize::S128,
        TextureSize::S64,
    ];

    pub fn pixels(self) -> u32 {
        match self {
            Self::S64 => 64,
            Self::S128 => 128,
            Self::S256 => 256,
            Self::S512 => 512,
            Self::S1024 => 1024,
            Self::S2048 => 2048,
            Self::S4096 => 4096,
        }
    }

    pub fn from_pixels(px: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.pixels() == px)
    }
}

impl fmt::Display for TextureSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

impl FromStr for TextureSize {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_pixels)
            .ok_or(())
    }
}

impl TryFrom<u32> for TextureSize {
    type Error = String;
    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::from_pixels(v).ok_or_else(|| format!("unsupported texture size: {}", v))
    }
}

impl From<TextureSize> for u32 {
    fn from(s: TextureSize) -> u32 {
        s.pixels()
    }
}

/// Output naming convention used when deriving packed/resized file names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NamingKind {
    /// Drop the trailing `_token` of the source stem before appending the suffix.
    TrailingToken,
    /// Keep the whole source stem and append the suffix.
    FullStem,
}

impl FromStr for NamingKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trailing-token" | "trailing_token" | "trailing" => Ok(Self::TrailingToken),
            "full-stem" | "full_stem" | "full" => Ok(Self::FullStem),
            _ => Err(()),
        }
    }
}

/// Settings for the resize workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// Textures whose (square, power-of-two) edge exceeds this are resized down to it.
    pub target_size: TextureSize,
    /// Allow-listed extensions including the leading dot, compared case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_naming")]
    pub naming: NamingKind,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            target_size: TextureSize::S1024,
            extensions: default_extensions(),
            naming: default_naming(),
        }
    }
}

impl ResizeConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        validate_extensions(&self.extensions)
    }

    pub fn builder() -> ResizeConfigBuilder {
        ResizeConfigBuilder::default()
    }
}

/// Settings for the channel-pack workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConfig {
    /// Substring identifying the red channel source, e.g. `_d`.
    pub red: String,
    pub green: String,
    pub blue: String,
    /// Alpha source substring; only used while `alpha_enabled` is set.
    #[serde(default)]
    pub alpha: String,
    #[serde(default)]
    pub alpha_enabled: bool,
    /// Appended to the derived base name of every packed texture.
    pub packed_suffix: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_naming")]
    pub naming: NamingKind,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            red: String::new(),
            green: String::new(),
            blue: String::new(),
            alpha: String::new(),
            alpha_enabled: false,
            packed_suffix: String::new(),
            extensions: default_extensions(),
            naming: default_naming(),
        }
    }
}

impl PackConfig {
    /// Returns an error if the packed suffix or any of the R/G/B suffixes is empty.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::TexBatchError;

        if self.packed_suffix.is_empty() {
            return Err(TexBatchError::MissingSuffix("packed texture"));
        }
        if self.red.is_empty() {
            return Err(TexBatchError::MissingSuffix("red channel"));
        }
        if self.green.is_empty() {
            return Err(TexBatchError::MissingSuffix("green channel"));
        }
        if self.blue.is_empty() {
            return Err(TexBatchError::MissingSuffix("blue channel"));
        }
        validate_extensions(&self.extensions)
    }

    /// Alpha suffix if the toggle is on and something was entered.
    pub fn alpha_suffix(&self) -> Option<&str> {
        (self.alpha_enabled && !self.alpha.is_empty()).then_some(self.alpha.as_str())
    }

    pub fn builder() -> PackConfigBuilder {
        PackConfigBuilder::default()
    }
}

fn validate_extensions(exts: &[String]) -> crate::error::Result<()> {
    use crate::error::TexBatchError;

    if exts.is_empty() {
        return Err(TexBatchError::InvalidConfig(
            "extension allow-list is empty".into(),
        ));
    }
    if let Some(bad) = exts.iter().find(|e| !e.starts_with('.') || e.len() < 2) {
        return Err(TexBatchError::InvalidConfig(format!(
            "extension {:?} must start with '.'",
            bad
        )));
    }
    Ok(())
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}
fn default_naming() -> NamingKind {
    NamingKind::TrailingToken
}

/// Builder for `ResizeConfig`.
#[derive(Debug, Default, Clone)]
pub struct ResizeConfigBuilder {
    cfg: ResizeConfig,
}

impl ResizeConfigBuilder {
    pub fn target_size(mut self, v: TextureSize) -> Self {
        self.cfg.target_size = v;
        self
    }
    pub fn extensions<I, S>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.extensions = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn naming(mut self, v: NamingKind) -> Self {
        self.cfg.naming = v;
        self
    }
    pub fn build(self) -> ResizeConfig {
        self.cfg
    }
}

/// Builder for `PackConfig`.
#[derive(Debug, Default, Clone)]
pub struct PackConfigBuilder {
    cfg: PackConfig,
}

impl PackConfigBuilder {
    pub fn channels(
        mut self,
        red: impl Into<String>,
        green: impl Into<String>,
        blue: impl Into<String>,
    ) -> Self {
        self.cfg.red = red.into();
        self.cfg.green = green.into();
        self.cfg.blue = blue.into();
        self
    }
    /// Sets the alpha suffix and turns the alpha toggle on.
    pub fn alpha(mut self, v: impl Into<String>) -> Self {
        self.cfg.alpha = v.into();
        self.cfg.alpha_enabled = true;
        self
    }
    pub fn alpha_enabled(mut self, v: bool) -> Self {
        self.cfg.alpha_enabled = v;
        self
    }
    pub fn packed_suffix(mut self, v: impl Into<String>) -> Self {
        self.cfg.packed_suffix = v.into();
        self
    }
    pub fn extensions<I, S>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cfg.extensions = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn naming(mut self, v: NamingKind) -> Self {
        self.cfg.naming = v;
        self
    }
    pub fn build(self) -> PackConfig {
        self.cfg
    }
}
