/// Character cursor over a single header value.
///
/// The scanner always holds the last character it read: grammar routines look at
/// [`current`](Scanner::current), decide what to parse, and call [`advance`](Scanner::advance) to
/// consume it. There is no way back.
pub(crate) struct Scanner<'a> {
    input: &'a str,
    offset: usize,
    current: Option<char>,
    eof: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned on the first character of `input`.
    pub(crate) fn new(input: &'a str) -> Self {
        let mut scanner = Scanner {
            input,
            offset: 0,
            current: None,
            eof: false,
        };
        scanner.advance();
        scanner
    }

    /// Reads the next character, which becomes the current one.
    pub(crate) fn advance(&mut self) -> Option<char> {
        match self.input[self.offset..].chars().next() {
            Some(ch) => {
                self.offset += ch.len_utf8();
                self.current = Some(ch);
            }
            None => {
                self.current = None;
                self.eof = true;
            }
        }
        self.current
    }

    pub(crate) fn current(&self) -> Option<char> {
        self.current
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while matches!(self.current, Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }
}
