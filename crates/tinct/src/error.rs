use std::fmt;
use std::path::PathBuf;

/// The namespace a failed lookup was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    ColorSpace,
    Display,
    View,
    Role,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ColorSpace => "color space",
            Self::Display => "display",
            Self::View => "view",
            Self::Role => "role",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("unknown {kind} `{name}`")]
    UnknownName { kind: NameKind, name: String },
    #[error("cannot build processor: {0}")]
    Build(String),
}

impl Error {
    pub(crate) fn unknown(kind: NameKind, name: &str) -> Self {
        Self::UnknownName {
            kind,
            name: name.to_owned(),
        }
    }
}
