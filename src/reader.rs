//! Word reader: splits a raw input line into space-separated words on demand.

use thiserror::Error;

/// Returned when reading past the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read past end of input at position {position}")]
pub struct OutOfRange {
    pub position: usize,
}

/// Reads words from one input line.
///
/// A word is a maximal run of non-space characters. Runs of spaces around a
/// word are skipped, so `" hello   world "` yields `hello` then `world`.
/// A blank (all-space) line still yields a single empty word, while a
/// zero-length line yields nothing.
///
/// The reader keeps a start mark; [`reset`](Self::reset) rewinds to it so
/// the original input can be re-read for error reporting.
#[derive(Debug, Clone)]
pub struct WordReader<'a> {
    input: &'a str,
    position: usize,
    mark: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            mark: 0,
        }
    }

    /// Whether another word (possibly empty, for blank input) can be read.
    pub fn can_read(&self) -> bool {
        self.position < self.input.len()
    }

    /// Read the next word.
    pub fn read_word(&mut self) -> Result<&'a str, OutOfRange> {
        if !self.can_read() {
            return Err(OutOfRange {
                position: self.position,
            });
        }
        let bytes = self.input.as_bytes();
        while self.position < bytes.len() && bytes[self.position] == b' ' {
            self.position += 1;
        }
        let start = self.position;
        while self.position < bytes.len() && bytes[self.position] != b' ' {
            self.position += 1;
        }
        let end = self.position;
        // Trailing spaces belong to no word.
        while self.position < bytes.len() && bytes[self.position] == b' ' {
            self.position += 1;
        }
        Ok(&self.input[start..end])
    }

    /// Read everything from the current position to the end, unparsed.
    ///
    /// At position zero this returns the whole input, even when it is empty.
    /// Afterwards [`can_read`](Self::can_read) is false until a reset.
    pub fn read_remaining(&mut self) -> Result<&'a str, OutOfRange> {
        if self.position == 0 {
            return Ok(self.input);
        }
        if !self.can_read() {
            return Err(OutOfRange {
                position: self.position,
            });
        }
        let start = self.position;
        self.position = self.input.len();
        Ok(&self.input[start..])
    }

    /// Rewind to the start-of-input mark.
    pub fn reset(&mut self) {
        self.position = self.mark;
    }

    /// The full input this reader was created for.
    pub fn input(&self) -> &'a str {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_cannot_read() {
        let mut reader = WordReader::new("");
        assert!(!reader.can_read());
        assert_eq!(reader.read_word(), Err(OutOfRange { position: 0 }));
    }

    #[test]
    fn test_blank_input_yields_single_empty_word() {
        let mut reader = WordReader::new(" ");
        assert!(reader.can_read());
        assert_eq!(reader.read_word(), Ok(""));
        assert!(!reader.can_read());

        let long_blank = " ".repeat(65535);
        assert_eq!(WordReader::new(&long_blank).read_word(), Ok(""));
    }

    #[test]
    fn test_single_word_with_surrounding_spaces() {
        assert_eq!(WordReader::new("hello").read_word(), Ok("hello"));
        assert_eq!(WordReader::new(" hello").read_word(), Ok("hello"));

        let mut reader = WordReader::new("hello   ");
        assert_eq!(reader.read_word(), Ok("hello"));
        assert!(!reader.can_read());
    }

    #[test]
    fn test_multiple_words() {
        let mut reader = WordReader::new("hello  world");
        assert_eq!(reader.read_word(), Ok("hello"));
        assert_eq!(reader.read_word(), Ok("world"));
        assert!(!reader.can_read());

        let sentence = [
            "Lorem", "ipsum", "dolor", "sit", "amet,", "consetetur", "sadipscing", "elitr,",
        ];
        let joined = sentence.join(" ");
        let mut reader = WordReader::new(&joined);
        for expected in sentence {
            assert_eq!(reader.read_word(), Ok(expected));
        }
    }

    #[test]
    fn test_read_remaining() {
        assert_eq!(WordReader::new("").read_remaining(), Ok(""));

        let all = " hello  world ";
        assert_eq!(WordReader::new(all).read_remaining(), Ok(all));

        let mut reader = WordReader::new("cmd a b");
        reader.read_word().unwrap();
        assert_eq!(reader.read_remaining(), Ok("a b"));
        assert!(!reader.can_read());
        assert!(reader.read_remaining().is_err());
    }

    #[test]
    fn test_reset_rewinds_to_start() {
        let mut reader = WordReader::new("hello");
        assert_eq!(reader.read_word(), Ok("hello"));
        assert!(!reader.can_read());
        assert!(reader.read_word().is_err());

        reader.reset();
        assert!(reader.can_read());
        assert_eq!(reader.read_word(), Ok("hello"));

        let all = " hello  world ";
        let mut reader = WordReader::new(all);
        reader.read_word().unwrap();
        reader.reset();
        assert_eq!(reader.read_remaining(), Ok(all));
        assert_eq!(reader.input(), all);
    }
}
