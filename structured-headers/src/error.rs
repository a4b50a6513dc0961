use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The first character cannot start a bare item. Callers use this to fall back to parsing
    /// an inner list.
    #[error("not an item")]
    NotAnItem,
    #[error("not an inner list")]
    NotAnInnerList,
    #[error("list item neither item nor inner list")]
    NeitherItemNorInnerList,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("number `{0}` has too many digits")]
    NumberTooLong(String),
    #[error("wrong escape sequence `\\{0}`")]
    WrongEscape(char),
    #[error("string contains non-printable character {0:?}")]
    NonPrintable(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated binary")]
    UnterminatedBinary,
    #[error("not a boolean character: {0:?}")]
    NotABoolean(Option<char>),
    #[error("can't scan key starting with {0:?}")]
    InvalidKey(Option<char>),
    #[error("parameter `{0}` has no valid value")]
    InvalidParameter(String),
    #[error("unterminated inner list")]
    UnterminatedInnerList,
    #[error("wrong inner list delimiter {0:?}")]
    InnerListDelimiter(char),
    #[error("wrong list delimiter {0:?}")]
    ListDelimiter(char),
    #[error("wrong dictionary delimiter {0:?}")]
    DictionaryDelimiter(char),
    #[error("unexpected {0:?} after dictionary key")]
    DictionaryValue(char),
    /// A typed accessor was used on a value of another type.
    #[error("not {expected}")]
    TypeMismatch { expected: &'static str },
    #[error("header value is not visible ASCII")]
    InvalidHeaderValue,
    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        source: Box<Error>,
    },
}

impl Error {
    /// The innermost error, with every [`Error::Context`] layer removed.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Error::Context { source, .. } = err {
            err = &**source;
        }
        err
    }

    pub fn is_not_an_item(&self) -> bool {
        matches!(self.root(), Error::NotAnItem)
    }

    pub fn is_not_an_inner_list(&self) -> bool {
        matches!(self.root(), Error::NotAnInnerList)
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.root(), Error::TypeMismatch { .. })
    }
}

pub(crate) trait Context<T> {
    /// Prefixes the error with the name of the sub-parse that failed.
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| Error::Context {
            context,
            source: Box::new(source),
        })
    }
}
