use serde::{Deserialize, Serialize};

use super::{CapturedOutput, Pattern, Stream};
use crate::error::SanityError;

pub fn assert_found(pattern: &Pattern, text: &str, stream: Stream) -> Result<(), SanityError> {
    if pattern.regex().is_match(text) {
        Ok(())
    } else {
        Err(SanityError::NotFound {
            pattern: pattern.to_string(),
            stream: stream.to_string(),
        })
    }
}

pub fn assert_not_found(pattern: &Pattern, text: &str, stream: Stream) -> Result<(), SanityError> {
    if pattern.regex().is_match(text) {
        Err(SanityError::UnexpectedlyFound {
            pattern: pattern.to_string(),
            stream: stream.to_string(),
        })
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    #[default]
    Found,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanityCheck {
    pub pattern: Pattern,
    pub stream: Stream,
    pub expect: Expect,
}

impl SanityCheck {
    pub fn found(pattern: Pattern) -> Self {
        Self {
            pattern,
            stream: Stream::Stdout,
            expect: Expect::Found,
        }
    }

    pub fn not_found(pattern: Pattern) -> Self {
        Self {
            pattern,
            stream: Stream::Stdout,
            expect: Expect::NotFound,
        }
    }

    pub fn on(mut self, stream: Stream) -> Self {
        self.stream = stream;
        self
    }

    pub fn evaluate(&self, output: &CapturedOutput) -> Result<(), SanityError> {
        let text = output.stream(self.stream);
        match self.expect {
            Expect::Found => assert_found(&self.pattern, text, self.stream),
            Expect::NotFound => assert_not_found(&self.pattern, text, self.stream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> Pattern {
        Pattern::new("Solution Validates").unwrap()
    }

    #[test]
    fn marker_anywhere_in_text_passes() {
        let out = CapturedOutput::new("Copy: 1\nSolution Validates\nbye\n", "");
        assert!(SanityCheck::found(marker()).evaluate(&out).is_ok());
    }

    #[test]
    fn missing_marker_fails_with_pattern_in_message() {
        let out = CapturedOutput::new("Solution does not validate\n", "");
        let err = SanityCheck::found(marker()).evaluate(&out).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pattern `Solution Validates` not found in stdout"
        );
    }

    #[test]
    fn empty_output_fails() {
        let out = CapturedOutput::default();
        assert!(SanityCheck::found(marker()).evaluate(&out).is_err());
    }

    #[test]
    fn checks_only_look_at_their_stream() {
        let out = CapturedOutput::new("", "Solution Validates");
        assert!(SanityCheck::found(marker()).evaluate(&out).is_err());
        assert!(SanityCheck::found(marker())
            .on(Stream::Stderr)
            .evaluate(&out)
            .is_ok());
    }

    #[test]
    fn not_found_rejects_matches() {
        let p = Pattern::new("(?i)error").unwrap();
        let check = SanityCheck::not_found(p);
        assert!(check.evaluate(&CapturedOutput::new("all good", "")).is_ok());
        assert!(matches!(
            check.evaluate(&CapturedOutput::new("ERROR: oom", "")),
            Err(SanityError::UnexpectedlyFound { .. })
        ));
    }
}
