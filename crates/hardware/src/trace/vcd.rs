//! Value Change Dump output.
//!
//! [`VcdWriter`] emits IEEE 1364 VCD text to any `Write`: a definitions
//! section with one `$var wire` per port, an initial `$dumpvars` block at the
//! first timestamp, then value changes only. [`VcdTraceSink`] drives a
//! writer over a buffered file as a [`TraceSink`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::SinkError;
use crate::dut::{PortWidths, Signal, SignalSnapshot};

use super::{Lifecycle, Timeline, TraceHeader, TraceSink};

/// First printable identifier character.
const ID_FIRST: u8 = b'!';
/// Number of printable identifier characters (`!` through `~`).
const ID_RADIX: usize = 94;

/// Streaming VCD encoder.
#[derive(Debug)]
pub struct VcdWriter<W> {
    out: W,
    signals: Vec<(Signal, String)>,
    previous: Option<Vec<u32>>,
}

impl<W: Write> VcdWriter<W> {
    /// Creates a writer over `out`. Nothing is written until [`Self::header`].
    pub const fn new(out: W) -> Self {
        Self {
            out,
            signals: Vec::new(),
            previous: None,
        }
    }

    /// Writes the definitions section for `header`.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn header(&mut self, header: &TraceHeader) -> io::Result<()> {
        self.signals = header
            .ports
            .signals()
            .into_iter()
            .enumerate()
            .map(|(i, s)| (s, identifier(i)))
            .collect();

        writeln!(self.out, "$version {} {} $end", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))?;
        writeln!(self.out, "$timescale 1ns $end")?;
        writeln!(self.out, "$scope module {} $end", header.scope)?;
        for (signal, id) in &self.signals {
            writeln!(self.out, "$var wire {} {} {} $end", signal.width, id, signal.name)?;
        }
        writeln!(self.out, "$upscope $end")?;
        writeln!(self.out, "$enddefinitions $end")
    }

    /// Writes the values at `time`, in the order of [`PortWidths::signals`].
    ///
    /// The first call dumps every value; later calls only changed ones.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn change(&mut self, time: u64, values: &[u32]) -> io::Result<()> {
        writeln!(self.out, "#{time}")?;
        match self.previous.take() {
            None => {
                writeln!(self.out, "$dumpvars")?;
                for ((signal, id), value) in self.signals.iter().zip(values) {
                    write_value(&mut self.out, signal.width, *value, id)?;
                }
                writeln!(self.out, "$end")?;
            }
            Some(previous) => {
                let changed = self
                    .signals
                    .iter()
                    .zip(values.iter().zip(&previous))
                    .filter(|(_, (now, before))| now != before);
                for ((signal, id), (value, _)) in changed {
                    write_value(&mut self.out, signal.width, *value, id)?;
                }
            }
        }
        self.previous = Some(values.to_vec());
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Propagates flush failures.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Short identifier code for the `index`-th signal.
fn identifier(mut index: usize) -> String {
    let mut id = String::new();
    loop {
        id.push(char::from(ID_FIRST + (index % ID_RADIX) as u8));
        index /= ID_RADIX;
        if index == 0 {
            return id;
        }
        index -= 1;
    }
}

fn write_value<W: Write>(out: &mut W, width: u8, value: u32, id: &str) -> io::Result<()> {
    if width == 1 {
        writeln!(out, "{}{id}", value & 1)
    } else {
        let width = usize::from(width);
        writeln!(out, "b{value:0width$b} {id}")
    }
}

/// Trace sink writing a VCD file.
#[derive(Debug)]
pub struct VcdTraceSink {
    path: PathBuf,
    writer: Option<VcdWriter<BufWriter<File>>>,
    ports: Option<PortWidths>,
    lifecycle: Lifecycle,
    timeline: Timeline,
}

impl VcdTraceSink {
    const KIND: &'static str = "vcd";

    /// Creates a sink that will write to `path` when opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            ports: None,
            lifecycle: Lifecycle::Pending,
            timeline: Timeline::default(),
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io(&self, action: &'static str) -> impl FnOnce(io::Error) -> SinkError + '_ {
        move |source| SinkError::Io {
            action,
            path: self.path.clone(),
            source,
        }
    }
}

impl TraceSink for VcdTraceSink {
    fn open(&mut self, header: &TraceHeader) -> Result<(), SinkError> {
        self.lifecycle.ensure_pending(Self::KIND)?;
        let file = File::create(&self.path).map_err(self.io("create"))?;
        let mut writer = VcdWriter::new(BufWriter::new(file));
        writer.header(header).map_err(self.io("write"))?;
        debug!(path = %self.path.display(), scope = %header.scope, "VCD trace opened");
        self.writer = Some(writer);
        self.ports = Some(header.ports);
        self.lifecycle = Lifecycle::Open;
        Ok(())
    }

    fn record(&mut self, time: u64, snapshot: &SignalSnapshot) -> Result<(), SinkError> {
        self.lifecycle.ensure_open(Self::KIND)?;
        self.timeline.advance(time)?;
        let (Some(writer), Some(ports)) = (self.writer.as_mut(), self.ports.as_ref()) else {
            return Err(SinkError::NotOpen { sink: Self::KIND });
        };
        let values = snapshot.values(ports);
        writer.change(time, &values).map_err(|source| SinkError::Io {
            action: "write",
            path: self.path.clone(),
            source,
        })
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.lifecycle.ensure_open(Self::KIND)?;
        self.lifecycle = Lifecycle::Closed;
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        drop(writer.finish().map_err(self.io("flush"))?);
        debug!(path = %self.path.display(), "VCD trace closed");
        Ok(())
    }
}
