use thiserror::Error;
use wiregroup_core_types::RunId;

/// Result type alias using WireGroupError
pub type Result<T> = std::result::Result<T, WireGroupError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used by the CLI exit path,
/// structured logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Corpus integrity (fatal, abort immediately)
    CorpusInconsistency,
    MissingBaseVersion,
    CycleDetected,

    // Grouping / manifest consistency
    AmbiguousGroup,
    StaleAlias,
    SlotFailures,
    ManifestStale,

    // Generation (non-fatal, reported as gaps)
    GenerationUnavailable,
    GenerationFailed,

    // Configuration / input
    InvalidInput,
    InvalidConfig,
    DuplicateSlot,
    NotFound,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::CorpusInconsistency => "ERR_CORPUS_INCONSISTENCY",
            ExErrorKind::MissingBaseVersion => "ERR_MISSING_BASE_VERSION",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::AmbiguousGroup => "ERR_AMBIGUOUS_GROUP",
            ExErrorKind::StaleAlias => "ERR_STALE_ALIAS",
            ExErrorKind::SlotFailures => "ERR_SLOT_FAILURES",
            ExErrorKind::ManifestStale => "ERR_MANIFEST_STALE",
            ExErrorKind::GenerationUnavailable => "ERR_GENERATION_UNAVAILABLE",
            ExErrorKind::GenerationFailed => "ERR_GENERATION_FAILED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::DuplicateSlot => "ERR_DUPLICATE_SLOT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Corpus-level kinds abort a run immediately instead of being
    /// collected per slot.
    pub fn is_corpus_fatal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::CorpusInconsistency
                | ExErrorKind::MissingBaseVersion
                | ExErrorKind::CycleDetected
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the slot/version context needed to
/// name the offending entry in a report.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    slot: Option<String>,
    version: Option<u32>,
    run_id: Option<RunId>,
    message: String,
    path: Option<Vec<String>>,
    failures: Vec<ExError>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            slot: None,
            version: None,
            run_id: None,
            message: String::new(),
            path: None,
            failures: Vec::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add slot context
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Add protocol version context
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Add run correlation context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a reference path (cycle path for CycleDetected)
    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = Some(path);
        self
    }

    /// Attach the individual failures of a batch operation
    pub fn with_failures(mut self, failures: Vec<ExError>) -> Self {
        self.failures = failures;
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> Option<&[String]> {
        self.path.as_deref()
    }

    pub fn failures(&self) -> &[ExError] {
        &self.failures
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(slot) = &self.slot {
            write!(f, " (slot: {})", slot)?;
        }
        if let Some(version) = self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.join(" -> "))?;
        }
        for failure in &self.failures {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for the grouping pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireGroupError {
    // ===== Corpus Inconsistency =====
    /// A packet is present in the id mapping but its definition cannot be resolved
    #[error("Version {version}: packet {direction}.{state}.{packet} has no resolvable definition")]
    UnresolvedPacket {
        version: u32,
        direction: String,
        state: String,
        packet: String,
    },

    /// A packet name is mapped under more than one wire id within a version
    #[error("Version {version}: packet {direction}.{state}.{packet} mapped to both {first:#04x} and {second:#04x}")]
    ConflictingWireId {
        version: u32,
        direction: String,
        state: String,
        packet: String,
        first: u32,
        second: u32,
    },

    /// An id mapping key is not a hexadecimal integer
    #[error("Version {version}: malformed wire id {key:?} in {direction}.{state}")]
    MalformedWireId {
        version: u32,
        direction: String,
        state: String,
        key: String,
    },

    /// The packet table of a direction does not have the expected shape
    #[error("Version {version}: malformed packet table in {direction}.{state}: {reason}")]
    MalformedPacketTable {
        version: u32,
        direction: String,
        state: String,
        reason: String,
    },

    /// No version at or below the configured minimum exists in the corpus
    #[error("No protocol version at or below the configured minimum {min_version} was found")]
    MissingBaseVersion { min_version: u32 },

    // ===== Equivalence =====
    /// A tracked type references itself through a chain of tracked types
    #[error("Cycle detected among tracked types: {}", path.join(" -> "))]
    TypeCycle { path: Vec<String> },

    // ===== Grouping / Manifest =====
    /// A version matched the representatives of two distinct groups
    #[error("Slot {slot}: version {version} matches the representatives of groups {first} and {second}")]
    AmbiguousGroup {
        slot: String,
        version: u32,
        first: u32,
        second: u32,
    },

    /// An alias points at a version that is not a kept document
    #[error("Alias {alias} points at {target}, which is not a kept version")]
    StaleAlias { alias: u32, target: u32 },

    // ===== Configuration =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Slot declared more than once: {slot}")]
    DuplicateSlot { slot: String },

    #[error("Invalid type path {path:?}: expected `name` or `direction.state.name`")]
    InvalidTypePath { path: String },

    #[error("Unknown direction {direction:?}: expected `c2s` or `s2c`")]
    UnknownDirection { direction: String },

    // ===== Generation =====
    #[error("No generator configured for {slot} v{version}")]
    GenerationUnavailable { slot: String, version: u32 },

    #[error("Generation failed for {slot} v{version}: {reason}")]
    GenerationFailed {
        slot: String,
        version: u32,
        reason: String,
    },

    // ===== Internal =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<WireGroupError> for ExError {
    fn from(err: WireGroupError) -> Self {
        let message = err.to_string();
        match err {
            WireGroupError::UnresolvedPacket { version, .. }
            | WireGroupError::ConflictingWireId { version, .. }
            | WireGroupError::MalformedWireId { version, .. }
            | WireGroupError::MalformedPacketTable { version, .. } => {
                ExError::new(ExErrorKind::CorpusInconsistency)
                    .with_version(version)
                    .with_message(message)
            }

            WireGroupError::MissingBaseVersion { min_version } => {
                ExError::new(ExErrorKind::MissingBaseVersion)
                    .with_version(min_version)
                    .with_message(message)
            }

            WireGroupError::TypeCycle { path } => ExError::new(ExErrorKind::CycleDetected)
                .with_path(path)
                .with_message("Tracked type reference graph is cyclic"),

            WireGroupError::AmbiguousGroup { slot, version, .. } => {
                ExError::new(ExErrorKind::AmbiguousGroup)
                    .with_slot(slot)
                    .with_version(version)
                    .with_message(message)
            }

            WireGroupError::StaleAlias { alias, .. } => ExError::new(ExErrorKind::StaleAlias)
                .with_version(alias)
                .with_message(message),

            WireGroupError::InvalidConfig { .. }
            | WireGroupError::InvalidTypePath { .. }
            | WireGroupError::UnknownDirection { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            WireGroupError::DuplicateSlot { slot } => ExError::new(ExErrorKind::DuplicateSlot)
                .with_slot(slot)
                .with_message("Slot declared more than once"),

            WireGroupError::GenerationUnavailable { slot, version } => {
                ExError::new(ExErrorKind::GenerationUnavailable)
                    .with_slot(slot)
                    .with_version(version)
                    .with_message("No generator configured")
            }

            WireGroupError::GenerationFailed {
                slot,
                version,
                reason,
            } => ExError::new(ExErrorKind::GenerationFailed)
                .with_slot(slot)
                .with_version(version)
                .with_message(reason),

            WireGroupError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            WireGroupError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for WireGroupError {
    fn from(err: serde_json::Error) -> Self {
        WireGroupError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for WireGroupError {
    fn from(err: toml::ser::Error) -> Self {
        WireGroupError::Serialization {
            message: err.to_string(),
        }
    }
}
