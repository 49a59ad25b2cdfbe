//! Keyword classification of block lines.
//!
//! A block is scanned top to bottom with a small state machine: a header line
//! switches the active keyword, every other line is filed under the keyword
//! that is active at that point. Lines seen while no keyword is active (the
//! `END` marker, for instance) are discarded.

use eclipse_schedule_core::Keyword;

use super::segment::Block;

/// Classifier state while scanning a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveKeyword {
    #[default]
    None,
    Dates,
    Compdat,
    Compdatl,
}

impl ActiveKeyword {
    /// The state a header line switches to, or `None` for non-header lines.
    pub fn from_header(line: &str) -> Option<Self> {
        Keyword::from_header(line).map(Self::from)
    }

    pub fn keyword(self) -> Option<Keyword> {
        match self {
            ActiveKeyword::None => None,
            ActiveKeyword::Dates => Some(Keyword::Dates),
            ActiveKeyword::Compdat => Some(Keyword::Compdat),
            ActiveKeyword::Compdatl => Some(Keyword::Compdatl),
        }
    }
}

impl From<Keyword> for ActiveKeyword {
    fn from(keyword: Keyword) -> Self {
        match keyword {
            Keyword::Dates => ActiveKeyword::Dates,
            Keyword::Compdat => ActiveKeyword::Compdat,
            Keyword::Compdatl => ActiveKeyword::Compdatl,
        }
    }
}

/// Block lines grouped by the keyword they belong to, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordGroups {
    pub dates: Vec<String>,
    pub compdat: Vec<String>,
    pub compdatl: Vec<String>,
    /// Lines that appeared while no keyword was active.
    pub discarded: usize,
}

impl KeywordGroups {
    pub fn group(&self, keyword: Keyword) -> &[String] {
        match keyword {
            Keyword::Dates => &self.dates,
            Keyword::Compdat => &self.compdat,
            Keyword::Compdatl => &self.compdatl,
        }
    }

    /// The date the block's connections take effect at: the last date line.
    pub fn effective_date(&self) -> Option<&str> {
        self.dates.last().map(String::as_str)
    }

    /// Total number of connection lines across COMPDAT and COMPDATL.
    pub fn connection_lines(&self) -> usize {
        self.compdat.len() + self.compdatl.len()
    }

    fn file(&mut self, state: ActiveKeyword, line: String) {
        match state {
            ActiveKeyword::None => self.discarded += 1,
            ActiveKeyword::Dates => self.dates.push(line),
            ActiveKeyword::Compdat => self.compdat.push(line),
            ActiveKeyword::Compdatl => self.compdatl.push(line),
        }
    }
}

/// Splits a block into keyword groups, consuming its lines.
pub fn classify_block(block: Block) -> KeywordGroups {
    let mut groups = KeywordGroups::default();
    let mut state = ActiveKeyword::None;

    for line in block.into_lines() {
        match ActiveKeyword::from_header(&line) {
            Some(next) => state = next,
            None => groups.file(state, line),
        }
    }

    groups
}
