//! Deprecation notices for legacy entry points

/// Log target carrying deprecation notices
pub const DEPRECATION_TARGET: &str = "karamel::deprecation";

/// Emit a deprecation warning for `name`, then run `f`.
///
/// The notice goes out on every call and never affects the outcome of `f`.
pub fn deprecated<T>(name: &str, message: Option<&str>, f: impl FnOnce() -> T) -> T {
    match message {
        Some(message) => tracing::warn!(
            target: DEPRECATION_TARGET,
            function = name,
            "{}",
            message
        ),
        None => tracing::warn!(
            target: DEPRECATION_TARGET,
            function = name,
            "Call to deprecated function {}",
            name
        ),
    }
    f()
}
