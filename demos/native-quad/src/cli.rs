use bindery_core::{BinderyConfig, GlVersion, Profile};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "native-quad",
    about = "Draws a textured quad through bindery-core",
    long_about = "Opens a native OpenGL window and draws a textured, tinted quad using only \
                  bindery-core for object creation, binding and deletion. Settings default to \
                  the BINDERY_GL_* environment variables."
)]
pub struct Cli {
    /// OpenGL version to request, e.g. 3.3, 4.6 or 330
    #[arg(long = "gl-version", value_name = "VERSION")]
    pub gl_version: Option<GlVersion>,

    /// Context profile: core or compat
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<Profile>,

    /// Request a debug context and log driver messages
    #[arg(long)]
    pub debug_output: bool,

    /// Window width in logical pixels
    #[arg(long, default_value = "800", value_name = "PIXELS")]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value = "600", value_name = "PIXELS")]
    pub height: u32,
}

impl Cli {
    /// Applies command line overrides on top of `config`.
    pub fn apply(&self, mut config: BinderyConfig) -> BinderyConfig {
        if let Some(version) = self.gl_version {
            config = config.with_version(version);
        }
        if let Some(profile) = self.profile {
            config = config.with_profile(profile);
        }
        if self.debug_output {
            config = config.with_debug_output(true);
        }
        config
    }
}
