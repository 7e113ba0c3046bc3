//! Driver debug output routed into `tracing`.

use glow::HasContext;

use crate::{config::GlVersion, error::Error};

/// Silences (or re-enables) driver messages matching a source, type and severity.
///
/// Each field takes the GL enumerator, or `glow::DONT_CARE` to match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugFilter {
    /// `DEBUG_SOURCE_*`
    pub source: u32,
    /// `DEBUG_TYPE_*`
    pub message_type: u32,
    /// `DEBUG_SEVERITY_*`
    pub severity: u32,
    /// Whether matching messages are delivered.
    pub enabled: bool,
}

impl DebugFilter {
    /// Drops every message of `severity`.
    #[must_use]
    pub const fn mute_severity(severity: u32) -> Self {
        Self {
            source: glow::DONT_CARE,
            message_type: glow::DONT_CARE,
            severity,
            enabled: false,
        }
    }

    /// Drops every message of `message_type`.
    #[must_use]
    pub const fn mute_type(message_type: u32) -> Self {
        Self {
            source: glow::DONT_CARE,
            message_type,
            severity: glow::DONT_CARE,
            enabled: false,
        }
    }
}

/// Turns on synchronous debug output and logs every driver message through `tracing`.
///
/// # Errors
/// Returns [`Error::Version`] below OpenGL 4.3.
pub fn enable_debug_output(gl: &mut glow::Context, version: GlVersion) -> Result<(), Error> {
    version.require(GlVersion::V4_3, "debug output")?;

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(log_debug_message);
    }

    tracing::debug!("driver debug output enabled");
    Ok(())
}

/// Applies `filter` to the messages forwarded by [`enable_debug_output`].
pub fn apply_debug_filter(gl: &glow::Context, filter: &DebugFilter) {
    unsafe {
        gl.debug_message_control(
            filter.source,
            filter.message_type,
            filter.severity,
            &[],
            filter.enabled,
        );
    }
}

fn log_debug_message(source: u32, message_type: u32, id: u32, severity: u32, message: &str) {
    let source = source_name(source);
    let kind = type_name(message_type);

    match severity {
        glow::DEBUG_SEVERITY_HIGH => tracing::error!(source, kind, id, "{message}"),
        glow::DEBUG_SEVERITY_MEDIUM => tracing::warn!(source, kind, id, "{message}"),
        glow::DEBUG_SEVERITY_LOW => tracing::info!(source, kind, id, "{message}"),
        _ => tracing::debug!(source, kind, id, "{message}"),
    }
}

fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "api",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "window system",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "shader compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "third party",
        glow::DEBUG_SOURCE_APPLICATION => "application",
        _ => "other",
    }
}

fn type_name(message_type: u32) -> &'static str {
    match message_type {
        glow::DEBUG_TYPE_ERROR => "error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "undefined",
        glow::DEBUG_TYPE_PORTABILITY => "portability",
        glow::DEBUG_TYPE_PERFORMANCE => "performance",
        glow::DEBUG_TYPE_MARKER => "marker",
        glow::DEBUG_TYPE_PUSH_GROUP => "push group",
        glow::DEBUG_TYPE_POP_GROUP => "pop group",
        _ => "other",
    }
}
