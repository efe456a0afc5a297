//! Vale CLI transport.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::debug;

use crate::alert::AlertsByFormat;
use crate::engine::DiagnosticEngine;
use crate::error::EngineError;

/// Engine that runs the Vale binary once per check.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    binary: PathBuf,
    config: PathBuf,
}

impl LocalEngine {
    pub fn new(binary: impl Into<PathBuf>, config: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config: config.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn config(&self) -> &Path {
        &self.config
    }

    fn command(&self, format: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--config")
            .arg(&self.config)
            .arg("--ext")
            .arg(format)
            .arg("--output")
            .arg("JSON")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl DiagnosticEngine for LocalEngine {
    async fn vale(&self, text: &str, format: &str) -> Result<AlertsByFormat, EngineError> {
        debug!("Spawning {} --ext {}", self.binary.display(), format);

        let mut child = self.command(format).spawn().map_err(EngineError::Spawn)?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Io(std::io::Error::other("stdin not captured")))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Io(std::io::Error::other("stdout not captured")))?;

        // Feed stdin while draining stdout so neither pipe can fill up and stall.
        let write = async move {
            let result = match stdin.write_all(text.as_bytes()).await {
                Ok(()) => stdin.shutdown().await,
                Err(e) => Err(e),
            };
            match result {
                // The engine may exit without consuming its input.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("Engine closed stdin early");
                    Ok(())
                }
                other => other,
            }
        };
        let read = async move {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).await.map(|_| buf)
        };

        let ((), output) = tokio::try_join!(write, read)?;
        let status = child.wait().await?;

        interpret_exit(status, &output)
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

/// Applies the engine's exit-code contract.
///
/// `0` means no alerts and stdout is not inspected, `1` means alerts were
/// printed as JSON, anything else is a failure.
pub fn interpret_exit(status: ExitStatus, stdout: &[u8]) -> Result<AlertsByFormat, EngineError> {
    match status.code() {
        Some(code) => interpret_exit_code(code, stdout),
        None => Err(EngineError::Terminated),
    }
}

/// Same as [`interpret_exit`] for a raw exit code.
pub fn interpret_exit_code(code: i32, stdout: &[u8]) -> Result<AlertsByFormat, EngineError> {
    match code {
        0 => Ok(AlertsByFormat::new()),
        1 => Ok(serde_json::from_slice(stdout)?),
        other => Err(EngineError::UnexpectedExit(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exit_zero_ignores_stdout() {
        let result = interpret_exit_code(0, b"this is not json").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_exit_one_parses_stdout() {
        let stdout = br#"{"a.md":[{"Check":"Vale.Repetition","Line":2,"Message":"'the' is repeated!","Severity":"error","Span":[1,7],"Match":"the the"}]}"#;
        let result = interpret_exit_code(1, stdout).unwrap();

        let alerts = result.get("a.md").unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].check, "Vale.Repetition");
        assert_eq!(alerts[0].line, 2);
    }

    #[test]
    fn test_exit_one_with_garbage_is_malformed() {
        let result = interpret_exit_code(1, b"panic: runtime error");
        assert!(matches!(result, Err(EngineError::MalformedOutput(_))));
    }

    #[test]
    fn test_other_exit_codes_fail() {
        match interpret_exit_code(2, b"{}") {
            Err(EngineError::UnexpectedExit(code)) => assert_eq!(code, 2),
            other => panic!("Expected UnexpectedExit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let engine = LocalEngine::new("/nonexistent/bin/vale", "/nonexistent/.vale.ini");
        let result = engine.vale("text", ".md").await;
        assert!(matches!(result, Err(EngineError::Spawn(_))));
    }

    #[cfg(unix)]
    mod process {
        use super::super::*;
        use pretty_assertions::assert_eq;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Writes an executable shell script standing in for the engine.
        fn fake_engine(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("vale");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn test_exit_zero_with_garbage_stdout() {
            let dir = TempDir::new().unwrap();
            let bin = fake_engine(&dir, "cat > /dev/null\necho 'not json'\nexit 0");

            let engine = LocalEngine::new(bin, dir.path().join(".vale.ini"));
            let result = engine.vale("Some text.", ".md").await.unwrap();
            assert!(result.is_empty());
        }

        #[tokio::test]
        async fn test_exit_one_returns_alerts() {
            let dir = TempDir::new().unwrap();
            let bin = fake_engine(
                &dir,
                r#"cat > /dev/null
echo '{"a.md":[{"Check":"Vale.Spelling","Line":1,"Message":"m","Severity":"warning","Span":[1,3],"Match":"abc"}]}'
exit 1"#,
            );

            let engine = LocalEngine::new(bin, dir.path().join(".vale.ini"));
            let result = engine.vale("abc", ".md").await.unwrap();
            assert_eq!(result.get("a.md").unwrap()[0].match_text, "abc");
        }

        #[tokio::test]
        async fn test_exit_two_is_unexpected() {
            let dir = TempDir::new().unwrap();
            let bin = fake_engine(&dir, "cat > /dev/null\nexit 2");

            let engine = LocalEngine::new(bin, dir.path().join(".vale.ini"));
            match engine.vale("abc", ".md").await {
                Err(EngineError::UnexpectedExit(code)) => assert_eq!(code, 2),
                other => panic!("Expected UnexpectedExit, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_passes_arguments_and_stdin() {
            let dir = TempDir::new().unwrap();
            let args_file = dir.path().join("args.txt");
            let stdin_file = dir.path().join("stdin.txt");
            let bin = fake_engine(
                &dir,
                &format!(
                    "echo \"$@\" > '{}'\ncat > '{}'\nexit 0",
                    args_file.display(),
                    stdin_file.display()
                ),
            );
            let config = dir.path().join(".vale.ini");

            let engine = LocalEngine::new(bin, &config);
            engine.vale("# Title\n\nBody text.", ".md").await.unwrap();

            let args = std::fs::read_to_string(&args_file).unwrap();
            assert_eq!(
                args.trim_end(),
                format!("--config {} --ext .md --output JSON", config.display())
            );
            assert_eq!(
                std::fs::read_to_string(&stdin_file).unwrap(),
                "# Title\n\nBody text."
            );
        }

        #[tokio::test]
        async fn test_engine_ignoring_stdin() {
            let dir = TempDir::new().unwrap();
            let bin = fake_engine(&dir, "exit 0");

            let engine = LocalEngine::new(bin, dir.path().join(".vale.ini"));
            let big = "word ".repeat(200_000);
            let result = engine.vale(&big, ".md").await.unwrap();
            assert!(result.is_empty());
        }
    }
}
