//! Context version, profile and debug settings.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// An OpenGL version encoded as `major * 100 + minor * 10`, e.g. `330` for 3.3.
///
/// OpenGL 1.2.1 is the single point release and is encoded as `121`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion(u32);

impl GlVersion {
    /// OpenGL 2.0
    pub const V2_0: Self = Self(200);
    /// OpenGL 3.0
    pub const V3_0: Self = Self(300);
    /// OpenGL 3.1
    pub const V3_1: Self = Self(310);
    /// OpenGL 3.2
    pub const V3_2: Self = Self(320);
    /// OpenGL 3.3
    pub const V3_3: Self = Self(330);
    /// OpenGL 4.0
    pub const V4_0: Self = Self(400);
    /// OpenGL 4.2
    pub const V4_2: Self = Self(420);
    /// OpenGL 4.3
    pub const V4_3: Self = Self(430);
    /// OpenGL 4.4
    pub const V4_4: Self = Self(440);
    /// OpenGL 4.5
    pub const V4_5: Self = Self(450);
    /// OpenGL 4.6
    pub const V4_6: Self = Self(460);

    /// Newest version the library knows about.
    pub const MAX: Self = Self::V4_6;
    /// Oldest version the library accepts.
    pub const MIN: Self = Self(110);

    /// Validates an encoded version number.
    ///
    /// # Errors
    /// Returns [`Error::Version`] for zero, out-of-range values, and encodings that don't name a
    /// released OpenGL version.
    pub fn new(encoded: u32) -> Result<Self, Error> {
        if encoded == 0 {
            return Err(Error::version_missing());
        }
        if encoded % 10 != 0 && encoded != 121 {
            return Err(Error::invalid_version(encoded));
        }
        if encoded > Self::MAX.0 {
            return Err(Error::version_above_max(encoded));
        }
        if encoded < Self::MIN.0 {
            return Err(Error::version_below_min(encoded));
        }

        // no 1.6-1.9, 2.2-2.9 or 3.4-3.9
        let in_gap = |lo: u32, hi: u32| encoded > lo && encoded < hi;
        if in_gap(150, 200) || in_gap(210, 300) || in_gap(330, 400) {
            return Err(Error::invalid_version(encoded));
        }

        Ok(Self(encoded))
    }

    /// The `major * 100 + minor * 10` form, e.g. `450`.
    #[must_use]
    pub const fn encoded(self) -> u32 {
        self.0
    }

    /// Major version number.
    #[must_use]
    pub const fn major(self) -> u8 {
        (self.0 / 100) as u8
    }

    /// Minor version number; `2` for OpenGL 1.2.1.
    #[must_use]
    pub const fn minor(self) -> u8 {
        ((self.0 / 10) % 10) as u8
    }

    /// Direct state access entry points (`glCreateBuffers`, `glNamedBufferData`, ...) are core
    /// from OpenGL 4.5.
    #[must_use]
    pub const fn supports_dsa(self) -> bool {
        self.0 >= Self::V4_5.0
    }

    /// `glDebugMessageCallback` is core from OpenGL 4.3.
    #[must_use]
    pub const fn supports_debug_output(self) -> bool {
        self.0 >= Self::V4_3.0
    }

    /// Fails if `self` is older than `required`.
    pub(crate) fn require(self, required: Self, what: &str) -> Result<(), Error> {
        if self < required {
            tracing::warn!(
                %what,
                required = %required,
                configured = %self,
                "OpenGL version too low"
            );
            return Err(Error::version_too_low(what, required, self));
        }
        Ok(())
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 121 {
            return f.write_str("1.2.1");
        }
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl FromStr for GlVersion {
    type Err = Error;

    /// Accepts the encoded form (`"330"`) or dotted form (`"3.3"`, `"1.2.1"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let encoded = if s.contains('.') {
            let parts: Vec<&str> = s.split('.').collect();
            let digit = |p: &str| p.parse::<u32>().ok().filter(|d| *d < 10);
            match parts.as_slice() {
                [major, minor] => digit(major).zip(digit(minor)).map(|(a, b)| a * 100 + b * 10),
                [major, minor, patch] => digit(major)
                    .zip(digit(minor))
                    .zip(digit(patch))
                    .map(|((a, b), c)| a * 100 + b * 10 + c),
                _ => None,
            }
        } else {
            s.parse::<u32>().ok()
        };

        encoded
            .ok_or_else(|| Error::unparsable_version(s))
            .and_then(Self::new)
    }
}

/// OpenGL context profile requested from the windowing system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    /// Core profile, deprecated functionality removed.
    #[default]
    Core,
    /// Compatibility profile.
    Compatibility,
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "compat" | "compatibility" => Ok(Self::Compatibility),
            other => Err(Error::unknown_profile(other)),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => f.write_str("core"),
            Self::Compatibility => f.write_str("compatibility"),
        }
    }
}

/// Library configuration, fixed for the lifetime of a [`crate::Bindery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderyConfig {
    /// Version of the context the library will drive.
    pub version: GlVersion,
    /// Profile of that context.
    pub profile: Profile,
    /// Whether to route driver debug messages to `tracing` (4.3+).
    pub debug_output: bool,
}

impl Default for BinderyConfig {
    fn default() -> Self {
        Self {
            version: GlVersion::V3_3,
            profile: Profile::Core,
            debug_output: false,
        }
    }
}

impl BinderyConfig {
    /// Create a configuration from environment variables, falling back to defaults.
    ///
    /// - `BINDERY_GL_VERSION`: `"330"` or `"3.3"`
    /// - `BINDERY_GL_PROFILE`: `"core"` or `"compat"`
    /// - `BINDERY_GL_DEBUG`: enables debug output when set
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();

        if let Ok(version) = std::env::var("BINDERY_GL_VERSION") {
            config.version = version.parse()?;
        }

        if let Ok(profile) = std::env::var("BINDERY_GL_PROFILE") {
            config.profile = profile.parse()?;
        }

        if std::env::var("BINDERY_GL_DEBUG").is_ok() {
            config.debug_output = true;
        }

        Ok(config)
    }

    /// Sets the requested context version.
    #[must_use]
    pub fn with_version(mut self, version: GlVersion) -> Self {
        self.version = version;
        self
    }

    /// Sets the requested context profile.
    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Requests a debug context and driver debug output.
    #[must_use]
    pub fn with_debug_output(mut self, enabled: bool) -> Self {
        self.debug_output = enabled;
        self
    }
}
