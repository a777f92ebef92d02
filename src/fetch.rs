//! Schema query boundary.
//!
//! [`SchemaSource`] is the seam the walker talks to. The production source
//! shells out to `sozo model schema <name> --json`; tests plug in a
//! [`StaticSchemaSource`].
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::error::FetchError;
use crate::ir::SchemaNode;
use crate::schema::parse_schema_document;

// ————————————————————————————————————————————————————————————————————————————
// SEAM
// ————————————————————————————————————————————————————————————————————————————

pub trait SchemaSource: Send + Sync {
    /// Fetch and parse the full schema of one model. No retries.
    fn fetch_schema(&self, model: &str) -> Result<SchemaNode, FetchError>;
}

// ————————————————————————————————————————————————————————————————————————————
// SOZO
// ————————————————————————————————————————————————————————————————————————————

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone)]
pub struct SozoSchemaSource {
    pub program: String,
    pub rpc_url: String,
    pub world_address: String,
    pub timeout: Option<Duration>,
}

impl SozoSchemaSource {
    pub fn new(rpc_url: impl Into<String>, world_address: impl Into<String>) -> Self {
        Self {
            program: "sozo".to_string(),
            rpc_url: rpc_url.into(),
            world_address: world_address.into(),
            timeout: None,
        }
    }

    /// Whether `<program> --version` runs at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    pub fn schema_args<'a>(&'a self, model: &'a str) -> [&'a str; 8] {
        [
            "model", "schema", model,
            "--rpc-url", self.rpc_url.as_str(),
            "--json",
            "--world", self.world_address.as_str(),
        ]
    }

    fn run(&self, model: &str) -> Result<String, FetchError> {
        let spawn_err = |source| FetchError::Spawn { program: self.program.clone(), source };

        let mut child = Command::new(&self.program)
            .args(self.schema_args(model))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // drain both pipes off-thread so a chatty child never blocks on a full pipe
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout = std::thread::spawn(move || read_all(stdout));
        let stderr = std::thread::spawn(move || read_all(stderr));

        let status = match self.timeout {
            None => child.wait().map_err(spawn_err)?,
            Some(limit) => self.wait_with_deadline(&mut child, limit)?,
        };

        let read_err = |source| FetchError::Read { program: self.program.clone(), source };
        let stdout = join_reader(stdout).map_err(read_err)?;
        let stderr = join_reader(stderr).map_err(read_err)?;

        if !status.success() {
            return Err(FetchError::Exit {
                program: self.program.clone(),
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        String::from_utf8(stdout).map_err(|_| FetchError::Encoding { program: self.program.clone() })
    }

    fn wait_with_deadline(&self, child: &mut Child, limit: Duration) -> Result<ExitStatus, FetchError> {
        let started = Instant::now();
        loop {
            let polled = child
                .try_wait()
                .map_err(|source| FetchError::Spawn { program: self.program.clone(), source })?;
            if let Some(status) = polled {
                return Ok(status);
            }
            if started.elapsed() >= limit {
                let _ = child.kill();
                let _ = child.wait();
                return Err(FetchError::Timeout {
                    program: self.program.clone(),
                    secs: limit.as_secs(),
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl SchemaSource for SozoSchemaSource {
    fn fetch_schema(&self, model: &str) -> Result<SchemaNode, FetchError> {
        tracing::debug!(model, program = %self.program, "querying model schema");
        let output = self.run(model)?;
        Ok(parse_schema_document(&output)?)
    }
}

fn read_all(pipe: Option<impl Read>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn join_reader(reader: std::thread::JoinHandle<io::Result<Vec<u8>>>) -> io::Result<Vec<u8>> {
    reader
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("pipe reader thread panicked")))
}

// ————————————————————————————————————————————————————————————————————————————
// IN-MEMORY
// ————————————————————————————————————————————————————————————————————————————

/// Schema documents keyed by model name. Unknown models fail with
/// [`FetchError::Missing`].
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaSource {
    documents: IndexMap<String, String>,
}

impl StaticSchemaSource {
    pub fn new() -> Self { Self::default() }

    pub fn with_document(mut self, model: impl Into<String>, document: impl Into<String>) -> Self {
        self.documents.insert(model.into(), document.into());
        self
    }
}

impl SchemaSource for StaticSchemaSource {
    fn fetch_schema(&self, model: &str) -> Result<SchemaNode, FetchError> {
        let document = self.documents.get(model).ok_or(FetchError::Missing)?;
        Ok(parse_schema_document(document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sozo_arguments_match_cli_contract() {
        let source = SozoSchemaSource::new("http://localhost:5050", "0xabc");
        assert_eq!(
            source.schema_args("Moves"),
            ["model", "schema", "Moves", "--rpc-url", "http://localhost:5050", "--json", "--world", "0xabc"]
        );
    }

    #[test]
    fn missing_program_is_unavailable_and_fails_to_spawn() {
        let mut source = SozoSchemaSource::new("http://localhost:5050", "0x0");
        source.program = "definitely-not-a-real-sozo-binary".to_string();
        assert!(!source.is_available());
        assert!(matches!(source.fetch_schema("Moves"), Err(FetchError::Spawn { .. })));
    }

    /// Stands in for a pipe that breaks after some output.
    struct BrokenPipe {
        sent: bool,
    }

    impl Read for BrokenPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.sent = true;
            buf[..2].copy_from_slice(b"{\"");
            Ok(2)
        }
    }

    #[test]
    fn read_failures_are_not_truncated_output() {
        let err = read_all(Some(BrokenPipe { sent: false })).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(read_all(Some(&b"abc"[..])).unwrap(), b"abc");
        assert!(read_all(None::<&[u8]>).unwrap().is_empty());
    }

    #[test]
    fn panicked_reader_is_a_read_error() {
        let reader = std::thread::spawn(|| -> io::Result<Vec<u8>> { panic!("reader died") });
        assert!(join_reader(reader).is_err());
        let reader = std::thread::spawn(|| Ok(b"ok".to_vec()));
        assert_eq!(join_reader(reader).unwrap(), b"ok");
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        /// Write an executable shell script standing in for the query tool.
        fn fake_tool(dir: &Path, name: &str, body: &str) -> SozoSchemaSource {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            let mut source = SozoSchemaSource::new("http://localhost:5050", "0x0");
            source.program = path.to_string_lossy().into_owned();
            source
        }

        #[test]
        fn non_zero_exit_reports_status_and_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let source = fake_tool(dir.path(), "fail", "echo boom >&2; exit 3");
            match source.fetch_schema("Moves") {
                Err(err @ FetchError::Exit { .. }) => {
                    let FetchError::Exit { status, stderr, .. } = &err else { unreachable!() };
                    assert_eq!(status.code(), Some(3));
                    assert_eq!(stderr, "boom");
                    assert!(err.to_string().contains("boom"), "{err}");
                }
                other => panic!("expected Exit, got {other:?}"),
            }
        }

        #[test]
        fn slow_tool_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let mut source = fake_tool(dir.path(), "slow", "sleep 5");
            source.timeout = Some(Duration::from_secs(1));
            let started = Instant::now();
            let result = source.fetch_schema("Moves");
            assert!(matches!(result, Err(FetchError::Timeout { secs: 1, .. })), "{result:?}");
            assert!(started.elapsed() < Duration::from_secs(4));
        }

        #[test]
        fn non_utf8_output_is_an_encoding_error() {
            let dir = tempfile::tempdir().unwrap();
            let source = fake_tool(dir.path(), "binary", r"printf '\377\376'");
            assert!(matches!(source.fetch_schema("Moves"), Err(FetchError::Encoding { .. })));
        }

        #[test]
        fn tool_output_is_parsed_as_schema() {
            let dir = tempfile::tempdir().unwrap();
            let body = r#"[ "$3" = Moves ] || exit 9
cat <<'JSON'
{"type":"struct","content":{"name":"Moves","children":[
  {"name":"remaining","member_type":{"type":"primitive","content":{"scalar_type":"u8"}}}]}}
JSON"#;
            let source = fake_tool(dir.path(), "ok", body);
            assert_eq!(
                source.fetch_schema("Moves").unwrap(),
                SchemaNode::structure("Moves", [("remaining", SchemaNode::primitive("u8"))])
            );
        }
    }

    #[test]
    fn static_source_parses_documents_and_reports_missing() {
        let source = StaticSchemaSource::new().with_document(
            "Flag",
            r#"{"type":"primitive","content":{"scalar_type":"bool"}}"#,
        );
        assert_eq!(source.fetch_schema("Flag").unwrap(), SchemaNode::primitive("bool"));
        assert!(matches!(source.fetch_schema("Other"), Err(FetchError::Missing)));
    }

    #[test]
    fn static_source_surfaces_parse_errors() {
        let source = StaticSchemaSource::new().with_document("Broken", "not json");
        assert!(matches!(source.fetch_schema("Broken"), Err(FetchError::Schema(_))));
    }
}
