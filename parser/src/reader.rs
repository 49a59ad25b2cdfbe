//! Chunk source: yields successive text fragments of a schedule file.

use std::fs::File;
use std::io::{self, BufReader, Read};

use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use tracing::debug;

use crate::input::ScheduleInput;

/// Iterator over UTF-8 text fragments read from `R`.
///
/// With a chunk size each fragment holds at most that many bytes (plus any
/// bytes of a character carried over from the previous read); a multi-byte
/// character is never split across fragments. Without a chunk size the whole
/// stream is returned as a single fragment.
pub struct FragmentReader<R> {
    reader: R,
    chunk_size: Option<usize>,
    pending: Vec<u8>,
    done: bool,
}

impl<R: Read> FragmentReader<R> {
    pub fn new(reader: R, chunk_size: Option<usize>) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.filter(|&size| size > 0),
            pending: Vec::new(),
            done: false,
        }
    }

    fn read_fragment(&mut self) -> io::Result<Option<String>> {
        let Some(size) = self.chunk_size else {
            let mut text = String::new();
            self.reader.read_to_string(&mut text)?;
            self.done = true;
            return Ok((!text.is_empty()).then_some(text));
        };

        let mut chunk = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            match self.reader.read(&mut chunk[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        let at_eof = filled < size;
        if at_eof {
            self.done = true;
        }

        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(&chunk[..filled]);
        if bytes.is_empty() {
            return Ok(None);
        }

        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(err) if !at_eof && err.utf8_error().error_len().is_none() => {
                // Incomplete trailing character: carry it into the next read.
                let valid = err.utf8_error().valid_up_to();
                let mut bytes = err.into_bytes();
                self.pending = bytes.split_off(valid);
                String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
            }
            Err(err) => Err(io::Error::new(io::ErrorKind::InvalidData, err)),
        }
    }
}

impl<R: Read> Iterator for FragmentReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_fragment() {
            Ok(Some(fragment)) => Some(Ok(fragment)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Opens a checked schedule file, decoding it from `encoding` to UTF-8.
pub fn open_fragments(
    input: &ScheduleInput,
    encoding: &'static Encoding,
    chunk_size: Option<usize>,
) -> io::Result<FragmentReader<Box<dyn Read>>> {
    debug!(
        path = %input.path().display(),
        encoding = encoding.name(),
        ?chunk_size,
        "Opening schedule"
    );
    let file = File::open(input.path())?;
    let decoded = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(BufReader::new(file));
    Ok(FragmentReader::new(Box::new(decoded), chunk_size))
}
