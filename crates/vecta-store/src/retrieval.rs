//! Store addressing: `format:directory:file`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use vecta_data::Vector;

use crate::error::{StoreError, StoreResult};

/// Key of the string-list item in which a vector carries its own address.
pub const RETRIEVAL_KEY: &str = "store.retrieval.string";

/// An ordered store address. The first part names the store (and doubles as
/// the file extension); file-backed stores also need a directory and a file
/// stem.
///
/// Parsing is lenient so that single-part addresses such as `STDOUT` work;
/// [`path`](Retrieval::path) is where missing parts become an error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Retrieval {
    parts: Vec<String>,
}

impl Retrieval {
    /// A complete file address.
    pub fn new(
        format: impl Into<String>,
        directory: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            parts: vec![format.into(), directory.into(), file.into()],
        }
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// The address a vector carries, if any.
    pub fn of_vector(vector: &Vector) -> Option<Self> {
        let parts = vector.get_strings(RETRIEVAL_KEY);
        (!parts.is_empty()).then_some(Self { parts })
    }

    /// Record this address on `vector`.
    pub fn attach(&self, vector: &Vector) {
        vector.set_strings(RETRIEVAL_KEY, self.parts.iter().cloned());
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The store name, `""` for an empty address.
    pub fn format(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or_default()
    }

    /// `directory/file.format`.
    pub fn path(&self) -> StoreResult<PathBuf> {
        match self.parts.as_slice() {
            [format, directory, file, ..] => {
                Ok(PathBuf::from(directory).join(format!("{file}.{format}")))
            }
            _ => Err(StoreError::MalformedRetrieval {
                retrieval: self.to_string(),
                reason: "expected length equal to or greater than three".to_string(),
            }),
        }
    }
}

impl fmt::Display for Retrieval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join(":"))
    }
}

impl FromStr for Retrieval {
    type Err = StoreError;

    /// Split on `:`. The first part is the format and the last the file;
    /// anything between is the directory, colons included.
    fn from_str(s: &str) -> StoreResult<Self> {
        if s.is_empty() {
            return Err(StoreError::MalformedRetrieval {
                retrieval: String::new(),
                reason: "empty address".to_string(),
            });
        }
        let Some((format, rest)) = s.split_once(':') else {
            return Ok(Self::from_parts([s]));
        };
        match rest.rsplit_once(':') {
            Some((directory, file)) => Ok(Self::new(format, directory, file)),
            None => Ok(Self::from_parts([format, rest])),
        }
    }
}
