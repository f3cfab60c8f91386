//! Minimal SubRip cue handling
//!
//! Just enough structure to translate cue text while leaving timings
//! untouched. Not a general subtitle parser.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtCue {
    pub index: u32,
    /// Raw timing line ("00:00:01,000 --> 00:00:04,000"), preserved as-is.
    pub timing: String,
    pub lines: Vec<String>,
}

/// Parse SRT text into cues.
///
/// Lenient about numbering and stray blank lines; a block without a timing
/// line is skipped rather than failing the whole file.
pub fn parse(input: &str) -> Result<Vec<SrtCue>> {
    let normalized = input.replace("\r\n", "\n").replace('\u{feff}', "");
    let mut cues = Vec::new();

    for (block_no, block) in normalized.split("\n\n").enumerate() {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim_end)
            .skip_while(|line| line.is_empty())
            .collect();
        if lines.is_empty() {
            continue;
        }

        let (timing_pos, timing) = match lines.iter().enumerate().find(|(_, l)| l.contains("-->")) {
            Some((pos, line)) => (pos, (*line).to_string()),
            None => {
                tracing::debug!(block = block_no, "SRT block without timing line skipped");
                continue;
            }
        };

        let index = if timing_pos > 0 {
            lines[timing_pos - 1].trim().parse::<u32>().ok()
        } else {
            None
        };

        let text: Vec<String> = lines[timing_pos + 1..]
            .iter()
            .map(|line| (*line).to_string())
            .collect();

        cues.push(SrtCue {
            index: index.unwrap_or(cues.len() as u32 + 1),
            timing,
            lines: text,
        });
    }

    if cues.is_empty() {
        return Err(Error::InvalidInput("No cues found in SRT data".to_string()));
    }
    Ok(cues)
}

/// Serialize cues back to SRT text.
#[must_use]
pub fn serialize(cues: &[SrtCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&cue.index.to_string());
        out.push('\n');
        out.push_str(&cue.timing);
        out.push('\n');
        for line in &cue.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:04,000\nHello there.\n\n2\n00:00:05,000 --> 00:00:07,500\nTwo lines\nof text.\n";

    #[test]
    fn test_parse_basic() {
        let cues = parse(SAMPLE).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].timing, "00:00:01,000 --> 00:00:04,000");
        assert_eq!(cues[0].lines, vec!["Hello there."]);
        assert_eq!(cues[1].lines, vec!["Two lines", "of text."]);
    }

    #[test]
    fn test_parse_crlf_and_bom() {
        let crlf = format!("\u{feff}{}", SAMPLE.replace('\n', "\r\n"));
        let cues = parse(&crlf).unwrap();
        assert_eq!(cues.len(), 2);
    }

    #[test]
    fn test_parse_skips_blocks_without_timing() {
        let input = "garbage block\n\n1\n00:00:01,000 --> 00:00:02,000\nok\n";
        let cues = parse(input).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].lines, vec!["ok"]);
    }

    #[test]
    fn test_parse_missing_index_gets_sequential() {
        let input = "00:00:01,000 --> 00:00:02,000\nno index\n";
        let cues = parse(input).unwrap();
        assert_eq!(cues[0].index, 1);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(parse("").is_err());
        assert!(parse("\n\n\n").is_err());
    }

    #[test]
    fn test_round_trip() {
        let cues = parse(SAMPLE).unwrap();
        let serialized = serialize(&cues);
        assert_eq!(parse(&serialized).unwrap(), cues);
    }
}
