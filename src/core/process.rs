//! Child process output capture
//!
//! A tee reader copies a child's output stream to the user's terminal while
//! keeping a copy in memory. Each reader owns its buffer and hands it back
//! through its join handle.

use std::io::{self, Read, Write};
use std::process::{Child, ExitStatus};
use std::thread::{self, JoinHandle};

const CHUNK_SIZE: usize = 8 * 1024;

/// Output captured from a child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Copy everything from `reader` into both `writer` and an in-memory buffer
pub fn tee<R, W>(mut reader: R, mut writer: W) -> io::Result<Vec<u8>>
where
    R: Read,
    W: Write,
{
    let mut captured = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        captured.extend_from_slice(&chunk[..n]);
        writer.write_all(&chunk[..n])?;
        writer.flush()?;
    }
    Ok(captured)
}

/// Run [`tee`] on a background thread
pub fn spawn_tee<R, W>(reader: R, writer: W) -> JoinHandle<io::Result<Vec<u8>>>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    thread::spawn(move || tee(reader, writer))
}

/// Readers attached to a running child's stdout and stderr
pub struct TeeReaders {
    stdout: Option<JoinHandle<io::Result<Vec<u8>>>>,
    stderr: Option<JoinHandle<io::Result<Vec<u8>>>>,
}

impl TeeReaders {
    /// Start copying the child's piped stdout/stderr to this process's
    /// stdout/stderr
    pub fn attach(child: &mut Child) -> Self {
        Self {
            stdout: child.stdout.take().map(|out| spawn_tee(out, io::stdout())),
            stderr: child.stderr.take().map(|err| spawn_tee(err, io::stderr())),
        }
    }

    /// Wait for both readers to reach end of stream
    pub fn finish(self, status: ExitStatus) -> io::Result<CapturedOutput> {
        Ok(CapturedOutput {
            status,
            stdout: join_reader(self.stdout)?,
            stderr: join_reader(self.stderr)?,
        })
    }
}

fn join_reader(handle: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("output reader thread panicked"))?,
        None => Ok(Vec::new()),
    }
}

/// Split captured output into lines without trailing newlines
pub fn output_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_copies_to_writer_and_buffer() {
        let input: &[u8] = b"line one\nline two\n";
        let mut sink = Vec::new();

        let captured = tee(input, &mut sink).unwrap();

        assert_eq!(captured, input);
        assert_eq!(sink, input);
    }

    #[test]
    fn test_tee_larger_than_chunk() {
        let input = vec![b'x'; CHUNK_SIZE * 3 + 17];
        let mut sink = Vec::new();

        let captured = tee(input.as_slice(), &mut sink).unwrap();

        assert_eq!(captured.len(), input.len());
        assert_eq!(sink.len(), input.len());
    }

    #[test]
    fn test_spawn_tee_returns_buffer() {
        let handle = spawn_tee(io::Cursor::new(b"async".to_vec()), io::sink());
        let captured = handle.join().unwrap().unwrap();
        assert_eq!(captured, b"async");
    }

    #[test]
    fn test_output_lines() {
        assert_eq!(output_lines(b"a\nb\r\nc"), vec!["a", "b", "c"]);
        assert!(output_lines(b"").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_attach_captures_child_streams() {
        use std::process::{Command, Stdio};

        let mut child = Command::new("sh")
            .args(["-c", "echo out; echo err >&2"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        let readers = TeeReaders::attach(&mut child);
        let status = child.wait().unwrap();
        let output = readers.finish(status).unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout_lossy(), "out\n");
        assert_eq!(output.stderr_lossy(), "err\n");
    }
}
