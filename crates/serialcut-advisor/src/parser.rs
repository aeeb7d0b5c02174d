use std::sync::LazyLock;

use regex::Regex;

static BREAK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"BREAK_PARA\s*:[^\d\n]*?(\d+)").expect("valid BREAK_PARA regex")
});
static REASON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"REASON\s*:\s*(.*\S)").expect("valid REASON regex"));

const BREAK_TAG: &str = "BREAK_PARA";
const NO_BREAK_TOKENS: [&str; 2] = ["NO_BREAKS_NEEDED", "NO BREAKS"];

/// One recognised line of a boundary-advice response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyLine {
    Break(usize),
    Reason(String),
    NoBreaks,
}

/// A paragraph the service proposes to start a new segment at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakLine {
    /// 1-based paragraph number, as numbered in the prompt.
    pub paragraph: usize,
    pub reason: Option<String>,
}

/// Parsed boundary-advice response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisorReply {
    NoBreaksNeeded,
    Breaks(Vec<BreakLine>),
}

impl AdvisorReply {
    pub fn breaks(&self) -> &[BreakLine] {
        match self {
            AdvisorReply::NoBreaksNeeded => &[],
            AdvisorReply::Breaks(lines) => lines,
        }
    }
}

/// Line-oriented parser for `BREAK_PARA:` / `REASON:` responses.
///
/// Unrecognised lines are skipped, never fatal. Markdown decoration such as
/// `**BREAK_PARA:** 12` is tolerated. When at least one break line parses,
/// a stray no-breaks token elsewhere in the text is ignored.
///
/// A `REASON:` line belongs to the most recent break line only if that line
/// parsed; the reason after a malformed break is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakLineParser;

impl BreakLineParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_line(&self, line: &str) -> Option<ReplyLine> {
        if let Some(caps) = BREAK_LINE.captures(line) {
            return caps[1].parse().ok().map(ReplyLine::Break);
        }
        if let Some(caps) = REASON_LINE.captures(line) {
            let reason = caps[1].trim_matches(|c: char| c == '*' || c.is_whitespace());
            return (!reason.is_empty()).then(|| ReplyLine::Reason(reason.to_string()));
        }
        if NO_BREAK_TOKENS.iter().any(|t| line.contains(t)) {
            return Some(ReplyLine::NoBreaks);
        }
        None
    }

    pub fn parse(&self, response: &str) -> AdvisorReply {
        let mut breaks: Vec<BreakLine> = Vec::new();
        let mut no_breaks = false;
        // Index of the break still waiting for its reason.
        let mut awaiting_reason: Option<usize> = None;

        for line in response.lines() {
            match self.parse_line(line) {
                Some(ReplyLine::Break(paragraph)) => {
                    awaiting_reason = Some(breaks.len());
                    breaks.push(BreakLine {
                        paragraph,
                        reason: None,
                    });
                }
                Some(ReplyLine::Reason(reason)) => {
                    if let Some(index) = awaiting_reason.take() {
                        breaks[index].reason = Some(reason);
                    }
                }
                Some(ReplyLine::NoBreaks) => no_breaks = true,
                None if line.contains(BREAK_TAG) => awaiting_reason = None,
                None => {}
            }
        }

        if breaks.is_empty() && no_breaks {
            AdvisorReply::NoBreaksNeeded
        } else {
            AdvisorReply::Breaks(breaks)
        }
    }
}
