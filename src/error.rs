//! Top-level error categories for the CLI.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// What failed, phrased for the person running the tool.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum ErrorKind {
    /// The source document could not be opened or parsed.
    #[display("could not read source document")]
    Source,
    /// The database could not be opened or prepared.
    #[display("could not open database")]
    Database,
    /// The export run itself failed.
    #[display("export failed")]
    Export,
}
