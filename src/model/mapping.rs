use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

/// The byte order mark that some spreadsheet exports put in front of the first header.
const BOM: char = '\u{feff}';

/// Maps the header row of a sheet to column indexes. Headers are matched by their exact text.
///
/// Sheets sometimes repeat a header (most commonly the empty header of an unnamed column). When
/// that happens the first column with that header is the one that `index` returns, and the
/// repeated header is listed by `duplicates`.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<Header>,
    header_map: HashMap<Header, usize>,
    duplicates: Vec<Header>,
}

impl Mapping {
    /// Create a new `Mapping` from a list of header strings.
    pub fn new<S, I>(headers: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<Header> = headers
            .into_iter()
            .enumerate()
            .map(|(ix, s)| {
                let s: String = s.into();
                if ix == 0 {
                    s.trim_start_matches(BOM).to_string().into()
                } else {
                    s.into()
                }
            })
            .collect();

        let mut header_map = HashMap::new();
        let mut duplicates = Vec::new();
        for (ix, header) in headers.iter().enumerate() {
            if header_map.contains_key(header) {
                duplicates.push(header.clone());
            } else {
                header_map.insert(header.clone(), ix);
            }
        }

        Self {
            headers,
            header_map,
            duplicates,
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn duplicates(&self) -> &[Header] {
        &self.duplicates
    }

    /// The index of the first column whose header is exactly `header`.
    pub fn index(&self, header: impl Into<Header>) -> Option<usize> {
        let h = header.into();
        self.header_map.get(&h).cloned()
    }
}

impl Serialize for Mapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.headers.len()))?;
        for header in &self.headers {
            seq.serialize_element(header.as_ref())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items: Vec<String> = Vec::deserialize(deserializer)?;
        Ok(Mapping::new(items))
    }
}

/// Represents a header in the sheet, for example, `Término da Leitura`
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(String);

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl FromStr for Header {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}
