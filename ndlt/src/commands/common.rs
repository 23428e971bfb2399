//! Common message templates shared by ndlt commands.

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message prefixes, followed by the offending path.
pub mod error_messages {
    /// Error when the init target exists but is a file.
    pub const TARGET_NOT_DIR: &str = "Target path is not a directory:";

    /// Error when the build root does not exist.
    pub const BUILD_ROOT_NOT_EXIST: &str = "Build root does not exist:";
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard log message templates.
pub mod output_messages {
    /// Logged when a directory is created.
    pub const CREATED_DIR: &str = "created directory";

    /// Logged when a file is created.
    pub const CREATED_FILE: &str = "created file";

    /// Logged when an existing file is left alone.
    pub const SKIPPED_FILE: &str = "file already exists, skipping";
}
