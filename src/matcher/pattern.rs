use regex::{Regex, RegexBuilder};

/// Literal, case-insensitive matcher for one case number
///
/// Every regex metacharacter in the case number is escaped, so `1.2*3`
/// only ever matches the text `1.2*3`.
#[derive(Debug, Clone)]
pub struct CasePattern {
    case_number: String,
    regex: Regex,
}

impl CasePattern {
    /// Compile a matcher for the given case number
    pub fn new(case_number: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&regex::escape(case_number))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            case_number: case_number.to_string(),
            regex,
        })
    }

    /// The case number this pattern was built from
    pub fn case_number(&self) -> &str {
        &self.case_number
    }

    /// Whether the text contains the case number
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Compile every usable case number, keeping its position in the input
///
/// Blank entries are skipped: an empty pattern would match every row.
pub fn compile_patterns(case_numbers: &[String]) -> Vec<(usize, CasePattern)> {
    case_numbers
        .iter()
        .enumerate()
        .filter_map(|(i, case_number)| {
            if case_number.trim().is_empty() {
                log::debug!("Skipping blank case number at position {}", i);
                return None;
            }
            match CasePattern::new(case_number) {
                Ok(pattern) => Some((i, pattern)),
                Err(e) => {
                    log::warn!("Cannot build matcher for '{}': {}", case_number, e);
                    None
                }
            }
        })
        .collect()
}
