use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use wsn_sniffer::source::{self, Message};
use wsn_sniffer::*;

/// Sniff IEEE 802.15.4 frames forwarded by a radio over a serial link.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The serial device the radio is attached to.
    #[arg(value_name = "TTY")]
    device: PathBuf,

    /// Save frames to a pcap file.
    #[arg(short, long, value_name = "FILE")]
    pcap: Option<PathBuf>,

    /// Show the frame control field.
    #[arg(short = 'c', long)]
    show_control: bool,

    /// Show the sequence number.
    #[arg(short = 's', long)]
    show_seqno: bool,

    /// Show the addressing fields.
    #[arg(short = 'a', long)]
    show_addr: bool,

    /// Show the auxiliary security header.
    #[arg(short = 'S', long)]
    show_security: bool,

    /// Show the whole MAC header.
    #[arg(short = 'M', long)]
    show_mac: bool,

    /// Dump frame payloads.
    #[arg(short = 'P', long)]
    show_payload: bool,

    /// Show the MAC header and dump payloads.
    #[arg(short = 'A', long)]
    show_all: bool,

    /// How events are delimited on the serial link.
    #[arg(long, value_enum, default_value_t)]
    framing: Framing,

    /// Frames end with their FCS.
    #[arg(long)]
    fcs: bool,

    /// The pcap snapshot length.
    #[arg(long, default_value_t = capture::DEFAULT_SNAPLEN,
          value_parser = clap::value_parser!(u32).range(1..))]
    snaplen: u32,

    /// Which frames are saved to the pcap file.
    #[arg(long, value_enum, default_value_t)]
    capture_policy: CapturePolicy,

    /// Stop on the first failure to save a frame.
    #[arg(long)]
    capture_errors_fatal: bool,
}

impl Args {
    fn config(&self) -> SnifferConfig {
        let mut display = DisplayMask::empty();
        display.set(DisplayMask::CONTROL, self.show_control);
        display.set(DisplayMask::SEQNO, self.show_seqno);
        display.set(DisplayMask::ADDR, self.show_addr);
        display.set(DisplayMask::SECURITY, self.show_security);
        if self.show_mac || self.show_all {
            display = DisplayMask::ALL;
        }

        SnifferConfig {
            display,
            show_payload: self.show_payload || self.show_all,
            framing: self.framing,
            capture_policy: self.capture_policy,
            capture_errors_fatal: self.capture_errors_fatal,
            fcs: self.fcs,
            snaplen: self.snaplen,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();

    if args.pcap.is_none() && config.is_silent() {
        log::warn!("doing nothing as requested");
    }

    let capture = args
        .pcap
        .as_ref()
        .map(|path| {
            CaptureFile::open(path, config.capture_options())
                .with_context(|| format!("cannot create {}", path.display()))
        })
        .transpose()?;

    let device = File::open(&args.device)
        .with_context(|| format!("cannot open {}", args.device.display()))?;

    let (tx, input) = source::channel();
    let interrupt = tx.clone();
    ctrlc::set_handler(move || {
        // The receiver may already be gone while shutting down.
        let _ = interrupt.send(Message::Interrupt);
    })
    .context("cannot install the interrupt handler")?;
    source::spawn_reader(device, tx).context("cannot start the reader thread")?;

    log::info!("sniffing on {}", args.device.display());

    let sniffer = Sniffer::new(config.clone(), capture, io::stdout(), io::stdout());
    sniffer
        .run(EventFramer::new(input, config.framing))
        .context("sniffer failed")?;

    Ok(())
}
