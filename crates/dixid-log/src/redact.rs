use regex::Regex;
use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::LazyLock;

/// What a masked value is replaced with.
pub const REDACTED_PLACEHOLDER: &str = "secret";

// Captures the key-and-separator prefix and the closing quote so the
// substitution preserves the surrounding structure; only the quoted
// value between them is replaced.
static SECRET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(['"]?(?:atok\w*|token\w*|passw\w*|pswd\w*)['"]?\s*[:=\s]\s*['"])([^'"]*)(['"])"#,
    )
    .expect("secret pattern compiles")
});

/// Masks values whose keys look like credentials.
///
/// Keys matching `atok*`, `token*`, `passw*` or `pswd*`
/// (case-insensitive) in `key: "value"` or `key = "value"` shapes have
/// their quoted value replaced with `secret`; everything around the
/// value is left untouched.
///
/// ```
/// use dixid_log::redact_secrets;
///
/// let masked = redact_secrets("{'my_token': '1111111'}");
/// assert_eq!(masked, "{'my_token': 'secret'}");
/// ```
pub fn redact_secrets(message: &str) -> Cow<'_, str> {
    SECRET_PATTERN.replace_all(message, format!("${{1}}{REDACTED_PLACEHOLDER}${{3}}"))
}

/// An [`io::Write`] adapter that runs [`redact_secrets`] over every
/// complete line before passing it through.
///
/// Input is buffered until a newline so a secret split across two write
/// calls still matches. Partial trailing data is redacted and flushed on
/// [`flush`](io::Write::flush) and on drop.
pub struct RedactingWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    fn emit(&mut self, line: &[u8], newline: bool) -> io::Result<()> {
        let text = String::from_utf8_lossy(line);
        self.inner.write_all(redact_secrets(&text).as_bytes())?;
        if newline {
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        while let Some(at) = self.buf.iter().position(|&b| b == b'\n') {
            let rest = self.buf.split_off(at + 1);
            let line = std::mem::replace(&mut self.buf, rest);
            self.emit(&line[..line.len() - 1], true)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let tail = std::mem::take(&mut self.buf);
            self.emit(&tail, false)?;
        }
        self.inner.flush()
    }
}

impl<W: Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
