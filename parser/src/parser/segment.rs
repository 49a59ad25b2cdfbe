//! Block segmentation on `DATES` and `END` markers.

use eclipse_schedule_core::{END_MARKER, Keyword};

/// Normalized lines between two block markers, starting with the marker that
/// opened the block (except for a leading block before any marker).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// What was left in the segmenter when input ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remainder {
    /// Nothing followed the last flushed block.
    Empty,
    /// Input ended with an `END` marker; `ignored` lines followed it.
    Terminated { ignored: usize },
    /// Input ended without an `END` marker; these lines never formed a block.
    Unterminated(Vec<String>),
}

/// Returns `true` for lines that close the pending block.
pub fn is_block_marker(line: &str) -> bool {
    line == Keyword::Dates.as_str() || line == END_MARKER
}

/// Accumulates normalized lines and emits a [`Block`] each time a `DATES` or
/// `END` marker arrives while lines are pending.
///
/// The segmenter keeps its state across calls to [`push`](Self::push), so
/// lines may be fed from any number of fragments.
#[derive(Debug, Default)]
pub struct BlockSegmenter {
    pending: Vec<String>,
}

impl BlockSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line; returns the finished block when the line is a marker.
    ///
    /// The marker itself opens the next pending block.
    pub fn push(&mut self, line: String) -> Option<Block> {
        let flushed = (is_block_marker(&line) && !self.pending.is_empty())
            .then(|| Block::new(std::mem::take(&mut self.pending)));
        self.pending.push(line);
        flushed
    }

    /// Ends segmentation and reports the unflushed lines.
    pub fn finish(self) -> Remainder {
        match self.pending.first() {
            None => Remainder::Empty,
            Some(first) if first == END_MARKER => Remainder::Terminated {
                ignored: self.pending.len() - 1,
            },
            Some(_) => Remainder::Unterminated(self.pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(lines: &[&str]) -> (Vec<Block>, Remainder) {
        let mut segmenter = BlockSegmenter::new();
        let blocks = lines
            .iter()
            .filter_map(|line| segmenter.push(line.to_string()))
            .collect();
        (blocks, segmenter.finish())
    }

    fn lines(block: &Block) -> Vec<&str> {
        block.lines().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_blocks_split_on_dates_and_end() {
        let (blocks, rest) = feed(&[
            "COMPDAT",
            "W1 ...",
            "DATES",
            "01 JUN 2018",
            "COMPDAT",
            "W2 ...",
            "DATES",
            "01 JUL 2018",
            "END",
        ]);

        assert_eq!(blocks.len(), 3);
        assert_eq!(lines(&blocks[0]), vec!["COMPDAT", "W1 ..."]);
        assert_eq!(
            lines(&blocks[1]),
            vec!["DATES", "01 JUN 2018", "COMPDAT", "W2 ..."]
        );
        assert_eq!(lines(&blocks[2]), vec!["DATES", "01 JUL 2018"]);
        assert_eq!(rest, Remainder::Terminated { ignored: 0 });
    }

    #[test]
    fn test_leading_marker_does_not_emit_empty_block() {
        let (blocks, rest) = feed(&["DATES", "01 JUN 2018", "END"]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(lines(&blocks[0]), vec!["DATES", "01 JUN 2018"]);
        assert_eq!(rest, Remainder::Terminated { ignored: 0 });
    }

    #[test]
    fn test_missing_end_leaves_unterminated_lines() {
        let (blocks, rest) = feed(&["DATES", "01 JUN 2018", "DATES", "01 JUL 2018"]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            rest,
            Remainder::Unterminated(vec!["DATES".to_string(), "01 JUL 2018".to_string()])
        );
    }

    #[test]
    fn test_lines_after_final_end_are_counted() {
        let (_, rest) = feed(&["DATES", "01 JUN 2018", "END", "COMPDAT", "W9 ..."]);
        assert_eq!(rest, Remainder::Terminated { ignored: 2 });
    }

    #[test]
    fn test_empty_input() {
        let (blocks, rest) = feed(&[]);
        assert!(blocks.is_empty());
        assert_eq!(rest, Remainder::Empty);
    }

    #[test]
    fn test_compdatl_is_not_a_marker() {
        assert!(is_block_marker("DATES"));
        assert!(is_block_marker("END"));
        assert!(!is_block_marker("COMPDATL"));
        assert!(!is_block_marker("01 JUN 2018"));
    }
}
