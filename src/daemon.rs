//! Daemon request loop
//!
//! Reads one frame at a time from the input stream, routes it through
//! command classification, and writes the response before blocking on the
//! next header. Strictly sequential: one request is fully answered before
//! the next is read, and the session is only ever touched from here.

use crate::protocol::{frame, Command, MAX_REQUEST_LEN};
use crate::session::Session;
use crate::{Result, TtsdError};
use log::{error, info};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Set by the signal handlers when the process should exit
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request an orderly shutdown; safe to call from a signal handler
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Run the request loop until QUIT, end of stream, or shutdown signal
///
/// Generic over the streams so tests can drive it with in-memory
/// buffers; `main` passes locked stdin/stdout.
pub fn run<R: Read, W: Write>(
    input: &mut R,
    output: &mut W,
    session: &mut Session,
) -> Result<()> {
    loop {
        // A signal during a synthesis call does not interrupt it; the
        // flag is picked up here once the in-flight request is answered
        if shutdown_requested() {
            info!("Shutdown requested, exiting");
            break;
        }

        let len = match frame::read_header(input) {
            Ok(Some(len)) => len,
            Ok(None) => {
                info!("Input stream closed, shutting down");
                break;
            }
            Err(TtsdError::Interrupted) => {
                if shutdown_requested() {
                    info!("Interrupt received, shutting down");
                    break;
                }
                // Only the shutdown signals are installed without
                // restart, so this arm is unreachable in practice
                continue;
            }
            Err(e) => return Err(e),
        };

        // Zero-length request is a no-op with no response
        if len == 0 {
            continue;
        }

        // Size policy: reject before allocating or reading the payload
        if len > MAX_REQUEST_LEN {
            error!("Request too long ({} bytes, limit {})", len, MAX_REQUEST_LEN);
            frame::write_frame(output, &[])?;
            continue;
        }

        let payload = match frame::read_payload(input, len as usize) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                info!("Input stream closed mid-request, shutting down");
                break;
            }
            Err(TtsdError::Interrupted) => {
                if shutdown_requested() {
                    info!("Interrupt received, shutting down");
                    break;
                }
                continue;
            }
            Err(e) => return Err(e),
        };

        let text = match std::str::from_utf8(&payload) {
            Ok(text) => text,
            Err(e) => {
                error!("Request is not valid UTF-8: {}", e);
                frame::write_frame(output, &[])?;
                continue;
            }
        };

        match Command::classify(text) {
            Command::Ping => {
                // Health-check exception: raw bytes, no frame
                output.write_all(b"PONG\n")?;
                output.flush()?;
            }
            Command::Quit => {
                info!("QUIT received, exiting");
                break;
            }
            Command::SetVoice(voice) => {
                if let Err(e) = session.set_voice(voice) {
                    // Failure stays out of band; the client only sees
                    // the acknowledgment below
                    error!("Failed to change voice: {}", e);
                }
                frame::write_frame(output, &[])?;
            }
            Command::SetLanguage(language) => {
                session.set_language(language);
                frame::write_frame(output, &[])?;
            }
            Command::SetSpeed(raw) => {
                if let Err(e) = session.set_speed(raw) {
                    error!("Failed to change speed: {}", e);
                }
                frame::write_frame(output, &[])?;
            }
            Command::Speak(text) => {
                speak(text, session, output)?;
            }
        }
    }

    Ok(())
}

/// Answer one synthesis request
///
/// Engine failures are contained here: the client gets an empty frame
/// and the loop keeps serving.
fn speak<W: Write>(text: &str, session: &mut Session, output: &mut W) -> Result<()> {
    let start = Instant::now();

    match session.synthesize(text) {
        Ok((pcm, duration)) => {
            info!(
                "Synthesized {} chars into {:.2}s of audio ({} bytes) in {:.3}s",
                text.chars().count(),
                duration,
                pcm.len(),
                start.elapsed().as_secs_f32()
            );
            frame::write_frame(output, &pcm)
        }
        Err(e) => {
            error!("Synthesis failed: {}", e);
            frame::write_frame(output, &[])
        }
    }
}
