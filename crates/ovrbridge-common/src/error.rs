//! Error types for ovrbridge.
//!
//! Failures come in two tiers. Fatal errors are authoring defects or lost
//! devices: they are returned as `Err` so tests can observe them, and the
//! composition root ends the process with [`VrError::abort`]. Soft errors are
//! logged through [`soft_abort`] and otherwise ignored.

use thiserror::Error;

/// Result type alias using ovrbridge's error type.
pub type VrResult<T> = std::result::Result<T, VrError>;

#[derive(Debug, Error)]
pub enum VrError {
    /// A profile path that no registered family owns.
    #[error("could not find interaction profile '{0}'")]
    UnknownProfile(String),

    /// A family's legacy table names a path outside its own valid set.
    #[error("found legacy input path {path}, not supported by profile {profile}")]
    InvalidLegacyPath { path: String, profile: String },

    /// A legacy control was bound before its action was created.
    #[error("legacy action '{control}' for {hand_path} has not been created")]
    NullAction {
        control: &'static str,
        hand_path: String,
    },

    /// The runtime refused to turn a string into a path handle.
    #[error("failed to resolve path {path}: {reason}")]
    PathResolution { path: String, reason: String },

    /// Swapchain creation failed with the given runtime result code.
    #[error("cannot create swapchain for eye {eye}: runtime returned {code}")]
    SwapchainCreation { eye: usize, code: i64 },

    /// Acquire, wait or release on an existing swapchain failed.
    #[error("swapchain image operation failed: {0}")]
    SwapchainImage(String),

    /// A device-level operation failed; `reason` is the device removal reason.
    #[error("device operation {operation} failed, device removed: {reason}")]
    DeviceLost { operation: String, reason: String },

    /// A soft failure escalated because `stop_on_soft_abort` is set.
    #[error("soft abort escalated: {0}")]
    Escalated(String),

    /// Recoverable failure, see [`soft_abort`].
    #[error("{0}")]
    Soft(String),
}

impl VrError {
    /// Create a soft error from any displayable type.
    pub fn soft(msg: impl std::fmt::Display) -> Self {
        Self::Soft(msg.to_string())
    }

    /// Create a path resolution error from any displayable reason.
    pub fn path_resolution(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::PathResolution {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a swapchain image error from any displayable type.
    pub fn swapchain_image(msg: impl std::fmt::Display) -> Self {
        Self::SwapchainImage(msg.to_string())
    }

    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Soft(_))
    }

    /// Log the diagnostic and terminate the process.
    pub fn abort(self) -> ! {
        tracing::error!(error = %self, "fatal error, aborting");
        eprintln!("ovrbridge fatal error: {self}");
        std::process::abort()
    }
}

/// Unwraps a result, aborting the process on error.
pub trait OrAbort<T> {
    fn or_abort(self) -> T;
}

impl<T> OrAbort<T> for VrResult<T> {
    fn or_abort(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => err.abort(),
        }
    }
}

/// Log a soft failure and carry on, or escalate it when `stop_on_soft_abort`
/// is configured.
pub fn soft_abort(err: VrError, stop_on_soft_abort: bool) -> VrResult<()> {
    tracing::warn!(error = %err, "soft abort");
    if stop_on_soft_abort {
        return Err(VrError::Escalated(err.to_string()));
    }
    Ok(())
}
