//! Schedule parsing pipeline.
//!
//! Text flows through four stages: [`normalize`] turns raw deck text into
//! token lines, [`segment`] cuts the line stream into blocks on `DATES` and
//! `END` markers, [`classify`] groups each block's lines by keyword, and
//! [`decode`] appends the block's rows to the result table.
//!
//! [`SchedulePipeline`] accepts the input as arbitrary text fragments. Text is
//! buffered until a complete `DATES` header line is seen; everything before
//! that header consists of finished sections and is normalized right away,
//! while the rest is carried into the next fragment. Any fragmentation of the
//! same file therefore yields the same table as parsing it in one piece.

pub mod classify;
pub mod decode;
pub mod normalize;
pub mod segment;

use std::path::Path;

use eclipse_schedule_core::ResultTable;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::error::{MalformedRecord, ParseError, Result};
use crate::input::ScheduleInput;
use crate::reader::open_fragments;

use self::classify::classify_block;
use self::decode::RecordDecoder;
use self::segment::{Block, BlockSegmenter, Remainder};

/// Counters collected while parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    /// Text fragments fed to the pipeline.
    pub fragments: usize,
    /// Lines left after normalization.
    pub normalized_lines: usize,
    /// Blocks flushed by the segmenter.
    pub blocks: usize,
    /// Connection rows appended.
    pub records: usize,
    /// Date-only rows appended.
    pub date_only_records: usize,
    /// Lines dropped for appearing outside any keyword or after the final
    /// `END` marker.
    pub discarded_lines: usize,
    /// Whether input ended with an `END` marker.
    pub terminated: bool,
    /// Trailing lines never flushed because `END` was missing.
    pub unterminated_lines: usize,
    /// Record lines skipped for having the wrong number of fields.
    #[serde(skip)]
    pub skipped: Vec<MalformedRecord>,
}

impl ParseDiagnostics {
    /// Total rows in the resulting table.
    pub fn rows(&self) -> usize {
        self.records + self.date_only_records
    }
}

/// A parsed table together with the run's diagnostics.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub table: ResultTable,
    pub diagnostics: ParseDiagnostics,
}

/// Incremental parser fed with text fragments.
///
/// # Examples
///
/// ```
/// use eclipse_schedule_parser::{ParserConfig, SchedulePipeline};
///
/// let mut pipeline = SchedulePipeline::new(&ParserConfig::default());
/// pipeline.feed("DATES\n01 JUN 2018 /\n/\nCOMP").unwrap();
/// pipeline
///     .feed("DAT\n'W1' 10 10 1 3 OPEN 1* 1 2 1 3* 1.0 /\n/\nEND\n")
///     .unwrap();
/// let outcome = pipeline.finish().unwrap();
///
/// assert_eq!(outcome.table.len(), 1);
/// assert_eq!(outcome.table.rows()[0].date.as_deref(), Some("01 JUN 2018"));
/// ```
#[derive(Debug)]
pub struct SchedulePipeline {
    carry: String,
    segmenter: BlockSegmenter,
    decoder: RecordDecoder,
    require_terminator: bool,
    table: ResultTable,
    diagnostics: ParseDiagnostics,
}

impl SchedulePipeline {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            carry: String::new(),
            segmenter: BlockSegmenter::new(),
            decoder: RecordDecoder::new(config),
            require_terminator: config.require_terminator,
            table: ResultTable::new(),
            diagnostics: ParseDiagnostics::default(),
        }
    }

    /// Feeds the next text fragment.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecord`](ParseError::MalformedRecord) under the
    /// abort policy.
    pub fn feed(&mut self, fragment: &str) -> Result<()> {
        self.diagnostics.fragments += 1;

        // Only the last, possibly incomplete, line of the carry and the new
        // text can hold a header that was not there before.
        let search_from = self.carry.rfind('\n').map_or(0, |index| index + 1);
        self.carry
            .push_str(&normalize::canonicalize_line_endings(fragment));

        if let Some(boundary) = normalize::carry_boundary(&self.carry, search_from) {
            let rest = self.carry.split_off(boundary);
            let ready = std::mem::replace(&mut self.carry, rest);
            self.process_text(&ready)?;
        }
        Ok(())
    }

    /// Flushes the carried text and returns the finished table.
    ///
    /// # Errors
    ///
    /// Returns [`Unterminated`](ParseError::Unterminated) when the input
    /// lacks an `END` marker and the terminator is required, or
    /// [`MalformedRecord`](ParseError::MalformedRecord) under the abort
    /// policy.
    pub fn finish(mut self) -> Result<ParseOutcome> {
        let rest = std::mem::take(&mut self.carry);
        self.process_text(&rest)?;

        match self.segmenter.finish() {
            Remainder::Empty => {}
            Remainder::Terminated { ignored } => {
                self.diagnostics.terminated = true;
                self.diagnostics.discarded_lines += ignored;
                if ignored > 0 {
                    debug!(lines = ignored, "Ignoring content after final END marker");
                }
            }
            Remainder::Unterminated(lines) => {
                if self.require_terminator {
                    return Err(ParseError::Unterminated { lines: lines.len() });
                }
                warn!(
                    lines = lines.len(),
                    first = %lines[0],
                    "Schedule has no END marker; dropping trailing lines"
                );
                self.diagnostics.unterminated_lines = lines.len();
            }
        }

        Ok(ParseOutcome {
            table: self.table,
            diagnostics: self.diagnostics,
        })
    }

    fn process_text(&mut self, text: &str) -> Result<()> {
        let lines = normalize::normalize_schedule_text(text);
        debug!(bytes = text.len(), lines = lines.len(), "Normalized text");
        self.diagnostics.normalized_lines += lines.len();

        for line in lines {
            if let Some(block) = self.segmenter.push(line) {
                self.process_block(block)?;
            }
        }
        Ok(())
    }

    fn process_block(&mut self, block: Block) -> Result<()> {
        self.diagnostics.blocks += 1;
        let groups = classify_block(block);
        debug!(
            date = ?groups.effective_date(),
            compdat = groups.compdat.len(),
            compdatl = groups.compdatl.len(),
            "Classified block"
        );
        self.diagnostics.discarded_lines += groups.discarded;

        let summary = self.decoder.append(groups, &mut self.table)?;
        self.diagnostics.records += summary.records;
        if summary.date_only {
            self.diagnostics.date_only_records += 1;
        }
        self.diagnostics.skipped.extend(summary.skipped);
        Ok(())
    }
}

/// Parser bound to one checked schedule file.
#[derive(Debug, Clone)]
pub struct ScheduleParser {
    input: ScheduleInput,
    config: ParserConfig,
    encoding: &'static Encoding,
}

impl ScheduleParser {
    /// Validates the input contract and the configured encoding.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`](ParseError::InvalidInput) for paths that are
    /// not non-empty `.inc` files, or
    /// [`UnknownEncoding`](ParseError::UnknownEncoding).
    pub fn new(path: impl AsRef<Path>, config: ParserConfig) -> Result<Self> {
        let input = ScheduleInput::check(path)?;
        let encoding = config.source_encoding()?;
        Ok(Self {
            input,
            config,
            encoding,
        })
    }

    /// Reads the file fragment by fragment and builds the result table.
    pub fn parse(&self) -> Result<ParseOutcome> {
        let mut pipeline = SchedulePipeline::new(&self.config);
        for fragment in open_fragments(&self.input, self.encoding, self.config.chunk_size)? {
            pipeline.feed(&fragment?)?;
        }
        let outcome = pipeline.finish()?;

        info!(
            path = %self.input.path().display(),
            rows = outcome.table.len(),
            records = outcome.diagnostics.records,
            skipped = outcome.diagnostics.skipped.len(),
            "Parsed schedule"
        );
        Ok(outcome)
    }

    /// Reads the whole file and returns its normalized lines.
    pub fn normalized_lines(&self) -> Result<Vec<String>> {
        let text = open_fragments(&self.input, self.encoding, None)?
            .collect::<std::io::Result<String>>()?;
        Ok(normalize::normalize_schedule_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MalformedPolicy;

    const SCHEDULE: &str = "COMPDAT\n\
        'W1' 10 10 1 3 OPEN 1* 1 2 1 3* 1.0 /\n\
        /\n\
        DATES\n\
        01 JUN 2018 /\n\
        /\n\
        DATES\n\
        01 JUL 2018 /\n\
        /\n\
        COMPDAT\n\
        'W3' 32 10 1 1 OPEN 1* 1 2 1 3* 1.0718 /\n\
        /\n\
        END\n";

    fn parse_in_fragments(text: &str, size: usize, config: &ParserConfig) -> ParseOutcome {
        let mut pipeline = SchedulePipeline::new(config);
        let bytes = text.as_bytes();
        let mut start = 0;
        while start < bytes.len() {
            let mut end = (start + size).min(bytes.len());
            while !text.is_char_boundary(end) {
                end += 1;
            }
            pipeline.feed(&text[start..end]).unwrap();
            start = end;
        }
        pipeline.finish().unwrap()
    }

    #[test]
    fn test_pipeline_whole_text() {
        let outcome = parse_in_fragments(SCHEDULE, SCHEDULE.len(), &ParserConfig::default());
        let dates: Vec<_> = outcome.table.iter().map(|row| row.date.as_deref()).collect();
        assert_eq!(dates, vec![None, Some("01 JUN 2018"), Some("01 JUL 2018")]);
        assert!(outcome.table.rows()[1].is_date_only());

        let diagnostics = outcome.diagnostics;
        assert_eq!(diagnostics.records, 2);
        assert_eq!(diagnostics.date_only_records, 1);
        assert_eq!(diagnostics.blocks, 3);
        assert!(diagnostics.terminated);
        assert_eq!(diagnostics.rows(), 3);
    }

    #[test]
    fn test_fragment_size_does_not_change_result() {
        let whole = parse_in_fragments(SCHEDULE, SCHEDULE.len(), &ParserConfig::default());
        for size in [1, 2, 5, 13, 40] {
            let outcome = parse_in_fragments(SCHEDULE, size, &ParserConfig::default());
            assert_eq!(outcome.table, whole.table, "fragment size {size}");
        }
    }

    #[test]
    fn test_unclosed_section_survives_fragmentation() {
        let text = "COMPDAT\n\
            'W1' 10 10 1 3 OPEN 1* 1 2 1 3* 1.0 /\n\
            DATES\n\
            01 JUN 2018 /\n\
            /\n\
            DATES\n\
            01 JUL 2018 /\n\
            /\n\
            END\n";
        let whole = parse_in_fragments(text, text.len(), &ParserConfig::default());
        assert_eq!(whole.diagnostics.records, 1);
        assert_eq!(whole.diagnostics.date_only_records, 2);
        assert_eq!(whole.table.rows()[0].date, None);

        for size in [1, 8, 20] {
            let outcome = parse_in_fragments(text, size, &ParserConfig::default());
            assert_eq!(outcome.table, whole.table, "fragment size {size}");
        }
    }

    #[test]
    fn test_crlf_split_across_fragments() {
        let crlf = SCHEDULE.replace('\n', "\r\n");
        let whole = parse_in_fragments(SCHEDULE, SCHEDULE.len(), &ParserConfig::default());
        let outcome = parse_in_fragments(&crlf, 3, &ParserConfig::default());
        assert_eq!(outcome.table, whole.table);
    }

    #[test]
    fn test_missing_end_drops_trailing_block() {
        let text = SCHEDULE.trim_end_matches("END\n");
        let outcome = parse_in_fragments(text, text.len(), &ParserConfig::default());
        assert!(!outcome.diagnostics.terminated);
        assert_eq!(outcome.diagnostics.unterminated_lines, 4);
        assert_eq!(outcome.table.len(), 2);
    }

    #[test]
    fn test_missing_end_fails_when_required() {
        let config = ParserConfig {
            require_terminator: true,
            ..ParserConfig::default()
        };
        let mut pipeline = SchedulePipeline::new(&config);
        pipeline.feed("DATES\n01 JUN 2018 /\n/\n").unwrap();
        assert!(matches!(
            pipeline.finish(),
            Err(ParseError::Unterminated { lines: 2 })
        ));
    }

    #[test]
    fn test_abort_policy_stops_pipeline() {
        let config = ParserConfig {
            on_malformed: MalformedPolicy::Abort,
            ..ParserConfig::default()
        };
        let mut pipeline = SchedulePipeline::new(&config);
        pipeline
            .feed("COMPDAT\n'W1' 10 10 /\n/\nDATES\n01 JUN 2018 /\n/\nEND\n")
            .unwrap();
        let err = pipeline.finish().unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord(ref record) if record.found == 3));
    }

    #[test]
    fn test_empty_text_yields_empty_table() {
        let outcome = SchedulePipeline::new(&ParserConfig::default())
            .finish()
            .unwrap();
        assert!(outcome.table.is_empty());
        assert!(!outcome.diagnostics.terminated);
    }
}
