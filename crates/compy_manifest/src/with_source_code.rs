use std::{
    error::Error,
    fmt::{Debug, Display, Formatter},
};

use miette::{Diagnostic, LabeledSpan, SourceCode};

/// Binds a [`Diagnostic`] to the [`SourceCode`] it was raised for, so spans
/// in the error can be rendered without losing the error type.
#[derive(Debug)]
pub struct WithSourceCode<E, S> {
    pub error: E,
    pub source: S,
}

impl<E: Error, S: Debug> Error for WithSourceCode<E, S> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

impl<E: Display, S> Display for WithSourceCode<E, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<E: Diagnostic, S: SourceCode + Debug> Diagnostic for WithSourceCode<E, S> {
    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.error.help()
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.error.source_code().or(Some(&self.source))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.error.labels()
    }
}
