//! External command generator.
//!
//! Runs an operator-configured program once per request: the request is
//! written to its stdin as JSON, the generated source is read from stdout.
//! The credential, when set, reaches the child only through its
//! environment.

#![allow(clippy::result_large_err)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use wiregroup_core::dispatch::{GenerationRequest, SourceGenerator};
use wiregroup_core::errors::{ExError, WireGroupError};
use wiregroup_core_types::Sensitive;

/// Environment variable holding the generator credential
pub const GENERATOR_KEY_ENV: &str = "WIREGROUP_GENERATOR_KEY";

/// Longest stderr excerpt carried into a gap reason
const STDERR_EXCERPT: usize = 200;

#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: PathBuf,
    args: Vec<String>,
    credential: Option<Sensitive<String>>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            credential: None,
        }
    }

    /// Like [`CommandGenerator::new`], picking the credential up from
    /// `WIREGROUP_GENERATOR_KEY` when it is set and non-empty
    pub fn from_env(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        let credential = std::env::var(GENERATOR_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .map(Sensitive::new);
        Self {
            credential,
            ..Self::new(program, args)
        }
    }

    pub fn with_credential(mut self, credential: Sensitive<String>) -> Self {
        self.credential = Some(credential);
        self
    }

    fn failure(request: &GenerationRequest, reason: String) -> ExError {
        WireGroupError::GenerationFailed {
            slot: request.slot.clone(),
            version: request.version,
            reason,
        }
        .into()
    }
}

impl SourceGenerator for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, ExError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| Self::failure(request, format!("request encoding failed: {}", e)))?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(key) = &self.credential {
            command.env(GENERATOR_KEY_ENV, key.expose());
        }

        tracing::debug!(
            program = %self.program.display(),
            slot = %request.slot,
            version = request.version,
            credential = ?self.credential,
            "invoking generator"
        );

        let mut child = command.spawn().map_err(|e| {
            Self::failure(
                request,
                format!("failed to start {}: {}", self.program.display(), e),
            )
        })?;

        // stdin is fed from its own thread while wait_with_output drains stdout
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || stdin.write_all(&payload))
        });

        let output = child
            .wait_with_output()
            .map_err(|e| Self::failure(request, format!("generator did not finish: {}", e)))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // A child that exits without reading its input is judged by its output
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(Self::failure(request, format!("writing request failed: {}", e)))
                }
                Err(_) => {
                    return Err(Self::failure(request, "request writer panicked".to_string()))
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let excerpt: String = stderr.trim().chars().take(STDERR_EXCERPT).collect();
            return Err(Self::failure(
                request,
                format!("generator exited with {}: {}", output.status, excerpt),
            ));
        }

        let source = String::from_utf8(output.stdout)
            .map_err(|_| Self::failure(request, "generator output is not UTF-8".to_string()))?;
        if source.trim().is_empty() {
            return Err(Self::failure(
                request,
                "generator returned an empty response".to_string(),
            ));
        }

        Ok(source)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;
    use wiregroup_core::errors::ExErrorKind;

    fn request() -> GenerationRequest {
        GenerationRequest {
            name: "set_protocol".to_string(),
            slot: "c2s.handshaking.set_protocol".to_string(),
            version: 5,
            spec: json!(["container", []]),
        }
    }

    fn shell(script: &str) -> CommandGenerator {
        CommandGenerator::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_returns_stdout() {
        let generator = shell("cat > /dev/null; echo 'pub struct SetProtocol;'");

        let source = generator.generate(&request()).unwrap();

        assert_eq!(source.trim(), "pub struct SetProtocol;");
    }

    #[test]
    fn test_request_is_json_on_stdin() {
        let generator = shell("cat");

        let echoed = generator.generate(&request()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&echoed).unwrap();

        assert_eq!(parsed["name"], "set_protocol");
        assert_eq!(parsed["version"], 5);
        assert_eq!(parsed["spec"], json!(["container", []]));
    }

    #[test]
    fn test_non_zero_exit_is_failure() {
        let generator = shell("cat > /dev/null; echo boom >&2; exit 3");

        let err = generator.generate(&request()).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::GenerationFailed);
        assert!(err.message().contains("boom"));
        assert_eq!(err.version(), Some(5));
    }

    #[test]
    fn test_empty_output_is_failure() {
        let generator = shell("cat > /dev/null");

        let err = generator.generate(&request()).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::GenerationFailed);
    }

    #[test]
    fn test_missing_program_is_failure() {
        let generator = CommandGenerator::new("/nonexistent/wiregroup-generator", Vec::new());

        let err = generator.generate(&request()).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::GenerationFailed);
    }

    #[test]
    fn test_credential_reaches_child_environment() {
        let generator = shell("cat > /dev/null; printf %s \"$WIREGROUP_GENERATOR_KEY\"")
            .with_credential(Sensitive::new("sk-test".to_string()));

        let source = generator.generate(&request()).unwrap();

        assert_eq!(source, "sk-test");
        assert!(!format!("{:?}", generator).contains("sk-test"));
    }
}
