//! Result distribution
//!
//! The engine signals `begin`, then one `report` per error as it is
//! collected, then `end`. [`WriterDistributor`] renders errors through a
//! [`Formatter`] onto any `io::Write`.

pub mod formatter;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::validation::ValidationError;

pub use formatter::{Formatter, JsonFormatter, PlainFormatter, XmlFormatter};

pub trait ResultDistributor {
    fn begin(&mut self) -> io::Result<()>;

    fn report(&mut self, error: &ValidationError) -> io::Result<()>;

    fn end(&mut self) -> io::Result<()>;
}

/// Output formats for [`WriterDistributor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFormat {
    #[default]
    Plain,
    Xml,
    Json,
}

impl ResultFormat {
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            ResultFormat::Plain => Box::new(PlainFormatter),
            ResultFormat::Xml => Box::new(XmlFormatter),
            ResultFormat::Json => Box::new(JsonFormatter),
        }
    }
}

impl FromStr for ResultFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(ResultFormat::Plain),
            "xml" => Ok(ResultFormat::Xml),
            "json" => Ok(ResultFormat::Json),
            other => Err(format!("unknown result format '{}'", other)),
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultFormat::Plain => write!(f, "plain"),
            ResultFormat::Xml => write!(f, "xml"),
            ResultFormat::Json => write!(f, "json"),
        }
    }
}

/// Writes formatted errors, one per line, between the formatter's header
/// and footer
pub struct WriterDistributor<W: Write> {
    writer: W,
    formatter: Box<dyn Formatter>,
    reported: usize,
}

impl<W: Write> WriterDistributor<W> {
    pub fn new(writer: W, formatter: Box<dyn Formatter>) -> Self {
        Self {
            writer,
            formatter,
            reported: 0,
        }
    }

    pub fn with_format(writer: W, format: ResultFormat) -> Self {
        Self::new(writer, format.formatter())
    }

    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultDistributor for WriterDistributor<W> {
    fn begin(&mut self) -> io::Result<()> {
        self.reported = 0;
        if let Some(header) = self.formatter.header() {
            writeln!(self.writer, "{}", header)?;
        }
        Ok(())
    }

    fn report(&mut self, error: &ValidationError) -> io::Result<()> {
        // the line break of the previous entry is held back so a separator
        // can follow it
        if self.reported > 0 {
            let separator = self.formatter.separator().unwrap_or("");
            writeln!(self.writer, "{}", separator)?;
        }
        write!(self.writer, "{}", self.formatter.format(error))?;
        self.reported += 1;
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        if self.reported > 0 {
            writeln!(self.writer)?;
        }
        if let Some(footer) = self.formatter.footer() {
            writeln!(self.writer, "{}", footer)?;
        }
        self.writer.flush()
    }
}

/// Keeps everything it is given; useful for embedding and tests
#[derive(Debug, Default)]
pub struct CollectingDistributor {
    errors: Vec<ValidationError>,
    began: bool,
    ended: bool,
}

impl CollectingDistributor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn began(&self) -> bool {
        self.began
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl ResultDistributor for CollectingDistributor {
    fn begin(&mut self) -> io::Result<()> {
        self.began = true;
        Ok(())
    }

    fn report(&mut self, error: &ValidationError) -> io::Result<()> {
        self.errors.push(error.clone());
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        self.ended = true;
        Ok(())
    }
}
