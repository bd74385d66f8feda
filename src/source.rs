use std::io::{self, BufRead};

/// Feed URLs read from a newline-delimited list, one per line.
///
/// Lines are yielded as-is apart from the line terminator (`\n` or `\r\n`).
/// Blank lines are yielded too. If reading fails the iterator stops and the
/// error is held until [`FeedUrls::finish`] is called.
pub struct FeedUrls<R> {
    lines: io::Lines<R>,
    error: Option<io::Error>,
}

impl<R: BufRead> FeedUrls<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            error: None,
        }
    }

    /// Consume the reader, returning the read error that ended iteration, if any.
    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<R: BufRead> Iterator for FeedUrls<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }

        match self.lines.next()? {
            Ok(line) => Some(line),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}
