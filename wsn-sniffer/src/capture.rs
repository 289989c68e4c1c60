//! Append-only pcap capture files.
//!
//! The file starts with the 24 octet global header:
//!
//! | offset | size | field                            |
//! |--------|------|----------------------------------|
//! | 0      | 4    | magic number `0xa1b2c3d4`        |
//! | 4      | 2    | major version (2)                |
//! | 6      | 2    | minor version (4)                |
//! | 8      | 4    | timezone offset (0)              |
//! | 12     | 4    | timestamp accuracy (0)           |
//! | 16     | 4    | snapshot length                  |
//! | 20     | 4    | link type                        |
//!
//! followed by records, each a 16 octet header (seconds, microseconds,
//! captured length, original length) and the captured octets. All integers
//! are little-endian, readers detect the byte order from the magic number.

use std::fs::File;
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// The pcap magic number for microsecond timestamps.
pub const PCAP_MAGIC: u32 = 0xa1b2_c3d4;
/// The pcap major version.
pub const PCAP_VERSION_MAJOR: u16 = 2;
/// The pcap minor version.
pub const PCAP_VERSION_MINOR: u16 = 4;
/// The length of the global header.
pub const GLOBAL_HEADER_LEN: usize = 24;
/// The length of a record header.
pub const RECORD_HEADER_LEN: usize = 16;
/// The snapshot length used when none is configured.
pub const DEFAULT_SNAPLEN: u32 = 65535;

/// Link-type identifiers for IEEE 802.15.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// `LINKTYPE_IEEE802_15_4_WITHFCS`: frames end with their FCS.
    Ieee802154WithFcs = 195,
    /// `LINKTYPE_IEEE802_15_4_NOFCS`: frames without FCS.
    Ieee802154NoFcs = 230,
}

/// Options of a capture file, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// The maximum number of octets stored per record.
    pub snaplen: u32,
    /// The link type written in the global header.
    pub link_type: LinkType,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            snaplen: DEFAULT_SNAPLEN,
            link_type: LinkType::Ieee802154NoFcs,
        }
    }
}

/// The time at which a frame was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    /// Seconds since the UNIX epoch.
    pub secs: u32,
    /// Microseconds within the second.
    pub micros: u32,
}

impl Timestamp {
    /// Return the current time.
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            secs: u32::try_from(since_epoch.as_secs()).unwrap_or(u32::MAX),
            micros: since_epoch.subsec_micros(),
        }
    }
}

/// An error on the capture file.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Writing or flushing the capture file failed.
    #[error("capture file i/o error: {0}")]
    Io(#[from] io::Error),
    /// The capture file was already closed.
    #[error("capture file is closed")]
    Closed,
    /// A snapshot length of zero was requested.
    #[error("invalid snapshot length 0")]
    InvalidSnaplen,
}

/// A sink a [`CaptureWriter`] can write to.
///
/// A failed write is undone by truncating the sink back to the end of the
/// last complete record.
pub trait CaptureSink: Write + Seek {
    /// Truncate the sink to `len` octets.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl CaptureSink for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl CaptureSink for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(io::Error::other)?;
        self.get_mut().truncate(len);
        Ok(())
    }
}

/// A pcap capture file on disk.
pub type CaptureFile = CaptureWriter<File>;

/// Writes a pcap capture into a [`CaptureSink`].
///
/// Every record is written with a single write followed by a flush, records
/// appear in the order [`append`](Self::append) is called. The writer is
/// closed when dropped.
#[derive(Debug)]
pub struct CaptureWriter<S: CaptureSink> {
    sink: Option<S>,
    options: CaptureOptions,
    /// Offset of the end of the last complete record.
    committed: u64,
    records: u64,
}

impl CaptureWriter<File> {
    /// Create or truncate the file at `path` and write the global header.
    pub fn open(path: impl AsRef<Path>, options: CaptureOptions) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let writer = Self::new(File::create(path)?, options)?;
        log::info!("capturing to {}", path.display());
        Ok(writer)
    }
}

impl<S: CaptureSink> CaptureWriter<S> {
    /// Write the global header into `sink`.
    pub fn new(sink: S, options: CaptureOptions) -> Result<Self, CaptureError> {
        if options.snaplen == 0 {
            return Err(CaptureError::InvalidSnaplen);
        }

        let mut writer = Self {
            sink: Some(sink),
            options,
            committed: 0,
            records: 0,
        };

        let mut header = Vec::with_capacity(GLOBAL_HEADER_LEN);
        header.extend_from_slice(&PCAP_MAGIC.to_le_bytes());
        header.extend_from_slice(&PCAP_VERSION_MAJOR.to_le_bytes());
        header.extend_from_slice(&PCAP_VERSION_MINOR.to_le_bytes());
        header.extend_from_slice(&0i32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&options.snaplen.to_le_bytes());
        header.extend_from_slice(&(options.link_type as u32).to_le_bytes());
        writer.commit(&header)?;

        Ok(writer)
    }

    /// Return the options the file was created with.
    pub fn options(&self) -> CaptureOptions {
        self.options
    }

    /// Return the number of records appended so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Returns `true` once the writer is closed.
    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }

    /// Append a record holding `raw`, truncated to the snapshot length.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Closed`] after [`close`](Self::close), and
    /// [`CaptureError::Io`] when the write fails. A failed record is not left
    /// in the file.
    pub fn append(&mut self, raw: &[u8], timestamp: Timestamp) -> Result<(), CaptureError> {
        let captured = raw.len().min(self.options.snaplen as usize);
        let original = u32::try_from(raw.len()).unwrap_or(u32::MAX);

        let mut record = Vec::with_capacity(RECORD_HEADER_LEN + captured);
        record.extend_from_slice(&timestamp.secs.to_le_bytes());
        record.extend_from_slice(&timestamp.micros.to_le_bytes());
        record.extend_from_slice(&(captured as u32).to_le_bytes());
        record.extend_from_slice(&original.to_le_bytes());
        record.extend_from_slice(&raw[..captured]);

        self.commit(&record)?;
        self.records += 1;

        if captured < raw.len() {
            log::debug!("record truncated from {} to {captured} octets", raw.len());
        }

        Ok(())
    }

    fn commit(&mut self, chunk: &[u8]) -> Result<(), CaptureError> {
        let sink = self.sink.as_mut().ok_or(CaptureError::Closed)?;

        match sink.write_all(chunk).and_then(|_| sink.flush()) {
            Ok(()) => {
                self.committed += chunk.len() as u64;
                Ok(())
            }
            Err(err) => {
                let committed = self.committed;
                let rollback = sink
                    .truncate(committed)
                    .and_then(|_| sink.seek(SeekFrom::Start(committed)));
                if let Err(rollback) = rollback {
                    log::error!("cannot roll back capture file to offset {committed}: {rollback}");
                }
                Err(err.into())
            }
        }
    }

    /// Flush and release the sink. Closing a closed writer does nothing.
    pub fn close(&mut self) -> Result<(), CaptureError> {
        let Some(mut sink) = self.sink.take() else {
            return Ok(());
        };

        sink.flush()?;
        log::info!("capture closed with {} records", self.records);
        Ok(())
    }

    /// Close the writer and return the sink.
    pub fn finish(mut self) -> Result<S, CaptureError> {
        let mut sink = self.sink.take().ok_or(CaptureError::Closed)?;
        sink.flush()?;
        Ok(sink)
    }
}

impl<S: CaptureSink> Drop for CaptureWriter<S> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::error!("cannot close capture file: {err}");
        }
    }
}
