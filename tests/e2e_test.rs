//! End-to-end daemon test
//!
//! Spawns the real binary with the mock engine configured, waits for the
//! readiness marker on stderr, and speaks the wire protocol over actual
//! pipes.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};

fn frame(text: &str) -> Vec<u8> {
    let mut buf = (text.len() as u32).to_le_bytes().to_vec();
    buf.extend_from_slice(text.as_bytes());
    buf
}

#[test]
fn test_full_request_cycle_over_pipes() {
    // Point the daemon at a scratch home so it picks up the mock backend
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(".ttsd.cfg"), "[engine]\nbackend=mock\n").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_ttsd"))
        .env("HOME", home.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("daemon should start");

    // Block on the readiness marker; the launching process contract
    let mut stderr = BufReader::new(child.stderr.take().unwrap());
    let mut sample_rate = None;
    let mut line = String::new();
    while stderr.read_line(&mut line).unwrap() > 0 {
        if let Some(rest) = line.trim_end().strip_prefix("READY sample_rate=") {
            sample_rate = Some(rest.parse::<u32>().unwrap());
            break;
        }
        line.clear();
    }
    assert_eq!(sample_rate, Some(44_100), "readiness marker missing or wrong");

    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = child.stdout.take().unwrap();

    // Health check: raw PONG, no frame
    stdin.write_all(&frame("PING")).unwrap();
    stdin.flush().unwrap();
    let mut pong = [0u8; 5];
    stdout.read_exact(&mut pong).unwrap();
    assert_eq!(&pong, b"PONG\n");

    // Control command: empty-frame acknowledgment
    stdin.write_all(&frame("VOICE:F1")).unwrap();
    stdin.flush().unwrap();
    let mut ack = [0u8; 4];
    stdout.read_exact(&mut ack).unwrap();
    assert_eq!(ack, [0, 0, 0, 0]);

    // Synthesis: framed PCM, even length, non-silent
    stdin.write_all(&frame("hello")).unwrap();
    stdin.flush().unwrap();
    let mut header = [0u8; 4];
    stdout.read_exact(&mut header).unwrap();
    let len = u32::from_le_bytes(header) as usize;
    assert!(len > 0);
    assert_eq!(len % 2, 0);
    let mut payload = vec![0u8; len];
    stdout.read_exact(&mut payload).unwrap();
    assert!(payload.iter().any(|&b| b != 0));

    // Orderly shutdown
    stdin.write_all(&frame("QUIT")).unwrap();
    stdin.flush().unwrap();
    let status = child.wait().expect("daemon should exit");
    assert!(status.success());
}

#[test]
fn test_positional_arguments_override_config() {
    let home = tempfile::tempdir().unwrap();
    // Config says M1/ko; the command line asks for F2/en at 0.8 with 3 steps
    std::fs::write(
        home.path().join(".ttsd.cfg"),
        "[engine]\nbackend=mock\n\n[speech]\nvoice=M1\nlanguage=ko\n",
    )
    .unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_ttsd"))
        .args(["F2", "en", "0.8", "3"])
        .env("HOME", home.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("daemon should start");

    // F2 must resolve against the mock voice table or startup would fail
    // before the readiness marker
    let mut stderr = BufReader::new(child.stderr.take().unwrap());
    let mut ready = false;
    let mut line = String::new();
    while stderr.read_line(&mut line).unwrap() > 0 {
        if line.starts_with("READY sample_rate=") {
            ready = true;
            break;
        }
        line.clear();
    }
    assert!(ready, "daemon did not become ready");

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(&frame("QUIT")).unwrap();
    stdin.flush().unwrap();
    assert!(child.wait().unwrap().success());
}

#[test]
fn test_malformed_speed_argument_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(".ttsd.cfg"), "[engine]\nbackend=mock\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ttsd"))
        .args(["M1", "ko", "notanumber"])
        .env("HOME", home.path())
        .stdin(Stdio::null())
        .output()
        .expect("daemon should spawn");

    // No request loop to protect yet: the process dies instead of serving
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("READY sample_rate="));
}
