//! A byte source fed from a reader thread.
//!
//! Blocking reads on the serial device happen on a dedicated thread and are
//! forwarded over a channel. Sending [`Message::Interrupt`] on the same
//! channel, for instance from a signal handler, makes the source report
//! end-of-stream so that the dispatch loop ends normally.

use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

/// A message from the reader thread.
#[derive(Debug)]
pub enum Message {
    /// Octets read from the device.
    Data(Vec<u8>),
    /// The device reported end-of-stream.
    Eof,
    /// Reading from the device failed.
    Error(io::Error),
    /// Stop reading.
    Interrupt,
}

/// How many messages [`channel`] queues before a send blocks.
pub const CHANNEL_BOUND: usize = 64;

/// Create a channel and the [`ChannelSource`] reading from it.
///
/// The channel holds at most [`CHANNEL_BOUND`] messages, so a reader thread
/// that outpaces the dispatch loop blocks instead of buffering without limit.
pub fn channel() -> (SyncSender<Message>, ChannelSource) {
    let (tx, rx) = mpsc::sync_channel(CHANNEL_BOUND);
    (tx, ChannelSource::new(rx))
}

/// Read from `reader` on a new thread, forwarding everything to `tx`.
///
/// The thread ends after end-of-stream, an error, or when the receiving side
/// is gone.
pub fn spawn_reader<R>(mut reader: R, tx: SyncSender<Message>) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("reader".into())
        .spawn(move || {
            let mut buf = [0u8; 512];
            loop {
                let message = match reader.read(&mut buf) {
                    Ok(0) => Message::Eof,
                    Ok(n) => Message::Data(buf[..n].to_vec()),
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => Message::Error(err),
                };

                let last = !matches!(message, Message::Data(_));
                if tx.send(message).is_err() || last {
                    break;
                }
            }
            log::debug!("reader thread done");
        })
}

/// A [`Read`] implementation over a channel of [`Message`]s.
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<Message>,
    pending: Vec<u8>,
    offset: usize,
    done: bool,
}

impl ChannelSource {
    /// Create a new source receiving from `rx`.
    pub fn new(rx: Receiver<Message>) -> Self {
        Self {
            rx,
            pending: Vec::new(),
            offset: 0,
            done: false,
        }
    }
}

impl Read for ChannelSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.offset == self.pending.len() {
            if self.done {
                return Ok(0);
            }

            match self.rx.recv() {
                Ok(Message::Data(data)) => {
                    self.pending = data;
                    self.offset = 0;
                }
                Ok(Message::Eof) | Err(_) => self.done = true,
                Ok(Message::Interrupt) => {
                    log::info!("interrupted");
                    self.done = true;
                }
                Ok(Message::Error(err)) => {
                    self.done = true;
                    return Err(err);
                }
            }
        }

        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_until_eof() {
        let (tx, mut source) = channel();
        tx.send(Message::Data(vec![1, 2, 3])).unwrap();
        tx.send(Message::Data(vec![])).unwrap();
        tx.send(Message::Data(vec![4])).unwrap();
        tx.send(Message::Eof).unwrap();
        tx.send(Message::Data(vec![5])).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);

        let mut rest = Vec::new();
        source.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, [3, 4]);
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn interrupt_ends_the_stream() {
        let (tx, mut source) = channel();
        tx.send(Message::Data(vec![1])).unwrap();
        tx.send(Message::Interrupt).unwrap();
        tx.send(Message::Data(vec![2])).unwrap();

        let mut data = Vec::new();
        source.read_to_end(&mut data).unwrap();
        assert_eq!(data, [1]);
    }

    #[test]
    fn error_is_forwarded() {
        let (tx, mut source) = channel();
        tx.send(Message::Error(io::Error::other("unplugged")))
            .unwrap();

        let mut buf = [0u8; 4];
        assert!(source.read(&mut buf).is_err());
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn disconnected_sender_is_eof() {
        let (tx, mut source) = channel();
        drop(tx);
        assert_eq!(source.read(&mut [0u8; 4]).unwrap(), 0);
    }

    #[test]
    fn channel_is_bounded() {
        let (tx, mut source) = channel();
        for _ in 0..CHANNEL_BOUND {
            tx.try_send(Message::Data(vec![1])).unwrap();
        }
        assert!(matches!(
            tx.try_send(Message::Data(vec![1])),
            Err(mpsc::TrySendError::Full(_))
        ));

        let mut buf = [0u8; 1];
        assert_eq!(source.read(&mut buf).unwrap(), 1);
        tx.try_send(Message::Eof).unwrap();
    }

    #[test]
    fn reader_thread() {
        let (tx, mut source) = channel();
        let handle = spawn_reader(io::Cursor::new(vec![7u8; 1000]), tx).unwrap();

        let mut data = Vec::new();
        source.read_to_end(&mut data).unwrap();
        handle.join().unwrap();
        assert_eq!(data, vec![7u8; 1000]);
    }
}
