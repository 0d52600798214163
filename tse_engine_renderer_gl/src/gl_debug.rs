/// GL debug output - routes KHR_debug messages into the engine logger
///
/// Only compiled with the `gl-debug` feature. Notification-level messages go
/// to TRACE, and a fixed set of driver hint ids is dropped entirely.

use glow::HasContext;
use std::sync::atomic::{AtomicU32, Ordering};
use tse_engine::tse::log::LogSeverity;
use tse_engine::tse::render::IGNORED_DEBUG_MESSAGE_IDS;
use tse_engine::{engine_error, engine_info, engine_trace, engine_warn};

/// Messages received since the callback was installed, per severity
static ERRORS: AtomicU32 = AtomicU32::new(0);
static WARNINGS: AtomicU32 = AtomicU32::new(0);

/// Install the debug callback on the current context
///
/// Does nothing if the context lacks debug output support.
pub fn install(gl: &mut glow::Context) {
    unsafe {
        if !gl.supports_debug() {
            engine_warn!("tse::gl::Debug", "Debug output not supported by this context");
            return;
        }
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|source, gl_type, id, severity, message| {
            handle_message(source, gl_type, id, severity, message);
        });
    }
    ERRORS.store(0, Ordering::Relaxed);
    WARNINGS.store(0, Ordering::Relaxed);
    engine_info!("tse::gl::Debug", "GL debug output enabled");
}

/// (errors, warnings) received so far
pub fn message_counts() -> (u32, u32) {
    (ERRORS.load(Ordering::Relaxed), WARNINGS.load(Ordering::Relaxed))
}

/// Engine severity for a GL debug severity, None when the id is ignored
pub fn classify(id: u32, severity: u32) -> Option<LogSeverity> {
    if IGNORED_DEBUG_MESSAGE_IDS.contains(&id) {
        return None;
    }
    Some(match severity {
        glow::DEBUG_SEVERITY_HIGH => LogSeverity::Error,
        glow::DEBUG_SEVERITY_MEDIUM | glow::DEBUG_SEVERITY_LOW => LogSeverity::Warn,
        _ => LogSeverity::Trace,
    })
}

pub fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        _ => "Other",
    }
}

pub fn type_name(gl_type: u32) -> &'static str {
    match gl_type {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behavior",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        _ => "Other",
    }
}

fn handle_message(source: u32, gl_type: u32, id: u32, severity: u32, message: &str) {
    let Some(level) = classify(id, severity) else {
        return;
    };
    let text = format!("[{}] [{}] ({}) {}", source_name(source), type_name(gl_type), id, message.trim_end());
    match level {
        LogSeverity::Error => {
            ERRORS.fetch_add(1, Ordering::Relaxed);
            engine_error!("tse::gl::Debug", "{}", text);
        }
        LogSeverity::Warn => {
            WARNINGS.fetch_add(1, Ordering::Relaxed);
            engine_warn!("tse::gl::Debug", "{}", text);
        }
        _ => engine_trace!("tse::gl::Debug", "{}", text),
    }
}

#[cfg(test)]
#[path = "gl_debug_tests.rs"]
mod tests;
