use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A tag in a format string that is not one of
/// `list float grid str file version`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown format tag '{0}'")]
pub struct UnknownFormatTag(pub String);

/// Declared shape of a parameter as independent capabilities.
///
/// Capabilities combine freely and each one adds its own check; nothing
/// makes `list` and `string` mutually exclusive. The tag-string form
/// (`"list_float_grid"`) parses with [`FromStr`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub list: bool,
    pub float: bool,
    pub grid: bool,
    pub string: bool,
    pub file: bool,
    pub version: bool,
}

impl FormatSpec {
    pub const LIST_FLOAT: FormatSpec = FormatSpec {
        list: true,
        float: true,
        grid: false,
        string: false,
        file: false,
        version: false,
    };

    pub const LIST_FLOAT_GRID: FormatSpec = FormatSpec {
        grid: true,
        ..FormatSpec::LIST_FLOAT
    };

    pub const STR_FILE: FormatSpec = FormatSpec {
        list: false,
        float: false,
        grid: false,
        string: true,
        file: true,
        version: false,
    };

    pub const VERSION: FormatSpec = FormatSpec {
        list: false,
        float: false,
        grid: false,
        string: false,
        file: false,
        version: true,
    };

    fn tags(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.list, "list"),
            (self.float, "float"),
            (self.grid, "grid"),
            (self.string, "str"),
            (self.file, "file"),
            (self.version, "version"),
        ]
        .into_iter()
        .filter_map(|(on, tag)| on.then_some(tag))
    }
}

impl FromStr for FormatSpec {
    type Err = UnknownFormatTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut spec = FormatSpec::default();
        for tag in s.split('_').filter(|t| !t.is_empty()) {
            match tag {
                "list" => spec.list = true,
                "float" => spec.float = true,
                "grid" => spec.grid = true,
                "str" => spec.string = true,
                "file" => spec.file = true,
                "version" => spec.version = true,
                other => return Err(UnknownFormatTag(other.to_string())),
            }
        }
        Ok(spec)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.tags().collect();
        write!(f, "{}", tags.join("_"))
    }
}
