//! Log redaction for patient readings.
//!
//! Readings are health data. The application never formats them into log
//! messages, but errors bubbling up from parsers or third-party code can echo
//! input back. Every formatted log line therefore passes through [`redact`]
//! before reaching the sink, which masks:
//! - `field=value` / `field: value` pairs for the eight reading fields
//! - Email addresses
//! - UUIDs
//!
//! Input is capped at `GLUCOSENSE_REDACT_MAX_BYTES` (default 16 KiB) per call.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<RedactionPatterns> = OnceLock::new();

const DEFAULT_REDACT_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct RedactionPatterns {
    any: RegexSet,
    rules: Vec<Rule>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_redact_bytes() -> usize {
    std::env::var("GLUCOSENSE_REDACT_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_REDACT_MAX_BYTES)
}

fn patterns() -> &'static RedactionPatterns {
    PATTERNS.get_or_init(|| {
        let rules: Vec<(&'static str, &'static str)> = vec![
            // Reading fields, by canonical name, dataset column or short alias.
            (
                r"(?i)\b(pregnancies|glucose|blood[_ ]?pressure|bp|skin[_ ]?thickness|insulin|bmi|diabetes[_ ]?pedigree[_ ]?function|dpf|age)\b(\s*[:=]\s*)-?\d+(?:\.\d+)?",
                "$1$2[REDACTED]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
        ];

        let any = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        RedactionPatterns { any, rules }
    })
}

/// Mask reading values and identifiers in a string.
#[must_use]
pub fn redact(input: &str) -> String {
    redact_with_limit(input, max_redact_bytes())
}

fn redact_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.any.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check whether a string would be altered by [`redact`].
#[must_use]
pub fn contains_sensitive(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_redact_bytes());
    patterns().any.is_match(prefix)
}

/// A `tracing_subscriber` writer that redacts each formatted line before it
/// reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> RedactingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    /// Write `bytes` redacted; with `end_line`, the output always ends in a
    /// newline even when truncation cut the original one off.
    fn write_redacted(&mut self, bytes: &[u8], end_line: bool) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        let mut out = redact(&text);
        if end_line && !out.ends_with('\n') {
            out.push('\n');
        }
        self.inner.write_all(out.as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_redacted(&line, true)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line longer than twice the cap is emitted truncated.
        if self.buffer.len() > max_redact_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_redacted(&pending, true)?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_redacted(&pending, false)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new(self.inner.make_writer())
    }
}
