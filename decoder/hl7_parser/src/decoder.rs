use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use hl7_ast::Message;

use crate::config::DecoderConfig;
use crate::error::DecodeError;

/// Decodes a message from any reader.
///
/// The whole input is buffered before decoding; the tree is built from the
/// complete buffer exactly as [`decode_with`](crate::decode_with) would.
///
/// ```no_run
/// use hl7_parser::Decoder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let message = Decoder::from_path("admit.hl7")?.decode()?;
/// println!("{} segments", message.len());
/// # Ok(())
/// # }
/// ```
pub struct Decoder<R> {
    reader: R,
    config: DecoderConfig,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            config: DecoderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads the input to the end and decodes it.
    pub fn decode(mut self) -> Result<Message, DecodeError> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf)?;
        crate::decode_with(&buf, &self.config)
    }
}

impl Decoder<BufReader<File>> {
    /// Opens `path` for decoding.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}
