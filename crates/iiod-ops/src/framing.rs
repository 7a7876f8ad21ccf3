//! Wire framing for client-visible responses.
//!
//! Non-verbose clients get a single signed decimal status line per event;
//! verbose clients get human-readable error lines instead. Payload bytes
//! pass through untouched. Framing writes do not abort the stream on their
//! own; only payload delivery failures retire a subscriber.

use crate::client::SharedSink;
use iiod_core::{Error, Result};
use std::io::{self, Write};

/// Emit the numeric status header: the signed value and a newline.
pub(crate) fn status_line(sink: &SharedSink, value: i64) {
    let _ = writeln!(sink.lock(), "{value}");
}

/// Emit the verbose error line for lookup and attribute failures.
pub(crate) fn error_line(sink: &SharedSink, err: &Error) {
    let _ = writeln!(sink.lock(), "ERROR: {err}");
}

/// Emit the verbose error line for a failed streaming read.
pub(crate) fn read_error_line(sink: &SharedSink, err: &Error) {
    let _ = writeln!(sink.lock(), "ERROR reading device: {err}");
}

/// Write the whole buffer, reporting how far we got alongside any failure.
///
/// The byte count lets the reader credit a subscriber for samples that
/// landed before the sink broke.
pub(crate) fn write_all(sink: &SharedSink, buf: &[u8]) -> (usize, Option<io::Error>) {
    let mut out = sink.lock();
    let mut written = 0;
    while written < buf.len() {
        match out.write(&buf[written..]) {
            Ok(0) => {
                let err = io::Error::new(io::ErrorKind::WriteZero, "sink accepted no bytes");
                return (written, Some(err));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return (written, Some(e)),
        }
    }
    (written, None)
}

/// Write an attribute payload: the value bytes, then one newline.
///
/// Returns the payload byte count. A failure writing the trailing newline
/// is ignored, matching the status-line policy above.
pub(crate) fn attr_payload(sink: &SharedSink, value: &[u8]) -> Result<usize> {
    let (n, err) = write_all(sink, value);
    if let Some(e) = err {
        return Err(Error::sink_write(&e));
    }
    let _ = write_all(sink, b"\n");
    Ok(n)
}
