//! Report output for accepted images.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::AcceptedImage;

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `Downloaded: <filename> (<size> bytes)` line per image
    #[default]
    Text,
    /// A single JSON array
    Json,
    /// One JSON object per line
    JsonLines,
}

/// Writes accepted-image reports to an underlying writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects the JSON array format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write the report for `images` and flush.
    pub fn write_images(&mut self, images: &[AcceptedImage]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                for image in images {
                    writeln!(
                        self.writer,
                        "Downloaded: {} ({} bytes)",
                        image.filename, image.size_bytes
                    )?;
                }
            }
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, images)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, images).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::JsonLines => {
                for image in images {
                    self.write_line(image)?;
                }
            }
        }
        self.writer.flush()
    }

    fn write_line<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        writeln!(self.writer)
    }
}
