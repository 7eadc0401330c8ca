//! Line input from the card reader and the staff keyboard.
//!
//! Lines are read as raw bytes so reader noise never ends the session:
//! anything that is not UTF-8 is decoded lossily and routed like any other
//! line. While a blocking call runs, input keeps being read; scans that
//! arrive while the loading flag is up are refused, everything else waits
//! in order for the kiosk to become idle.

use log::{debug, warn};
use std::collections::VecDeque;
use std::future::Future;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::{parse_line, Input};
use crate::services::LoadingFlag;
use crate::ui::{Notice, Update};

/// Decode one input line, dropping the line terminator
pub fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

pub struct Console<R> {
    reader: R,
    buf: Vec<u8>,
    queued: VecDeque<String>,
    closed: bool,
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            queued: VecDeque::new(),
            closed: false,
        }
    }

    /// Next line to handle: held-back lines first, then the reader.
    /// `None` once input is closed and nothing is left.
    ///
    /// Safe to use in `tokio::select!`: a partially read line is kept.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.queued.pop_front() {
            return Ok(Some(line));
        }
        if self.closed {
            return Ok(None);
        }

        let line = read_line(&mut self.reader, &mut self.buf).await?;
        if line.is_none() {
            self.closed = true;
        }
        Ok(line)
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Drive `work` to completion while still reading input. With
    /// `refuse_scans` set, a scan that arrives while `loading` is raised is
    /// answered through `on_refused` and dropped; other lines are queued.
    pub async fn while_busy<F>(
        &mut self,
        work: F,
        loading: &LoadingFlag,
        refuse_scans: bool,
        mut on_refused: impl FnMut(Update),
    ) -> F::Output
    where
        F: Future,
    {
        tokio::pin!(work);

        loop {
            tokio::select! {
                biased;

                line = read_line(&mut self.reader, &mut self.buf), if !self.closed => match line {
                    Ok(Some(line)) => {
                        let is_scan = matches!(parse_line(&line), Ok(Input::Scan(_)));
                        if refuse_scans && is_scan && loading.is_loading() {
                            debug!("Refusing '{}' while loading", line);
                            on_refused(Notice::busy().into());
                        } else {
                            self.queued.push_back(line);
                        }
                    }
                    Ok(None) => self.closed = true,
                    Err(e) => {
                        warn!("Input read failed: {}", e);
                        self.closed = true;
                    }
                },
                output = &mut work => return output,
            }
        }
    }
}

/// Read up to the next newline. Bytes already in `buf` from an interrupted
/// read are kept and completed.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }

    let line = decode_line(buf);
    buf.clear();
    Ok(Some(line))
}
