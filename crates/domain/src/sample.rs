use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subset {
    Train,
    Validation,
}

impl Subset {
    pub const ALL: [Subset; 2] = [Subset::Train, Subset::Validation];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Train => Self::Validation,
            Self::Validation => Self::Train,
        }
    }
}

impl Display for Subset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subset {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "train" => Ok(Self::Train),
            "validation" => Ok(Self::Validation),
            other => Err(DomainError::UnknownSubset(other.to_string())),
        }
    }
}

/// Where a sample's files currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLocation {
    Live,
    Quarantined,
}

/// An image plus its same-stem annotation inside one subset.
///
/// Serialized as a `[subset, file_name]` pair, which is the shape the
/// snapshot history uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(Subset, String)", into = "(Subset, String)")]
pub struct Sample {
    subset: Subset,
    file_name: String,
}

impl Sample {
    pub fn new(subset: Subset, file_name: impl Into<String>) -> Result<Self, DomainError> {
        let file_name = file_name.into();
        validate_file_name(&file_name)?;
        Ok(Self { subset, file_name })
    }

    pub fn subset(&self) -> Subset {
        self.subset
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn annotation_name(&self) -> String {
        annotation_file_name(&self.file_name)
    }
}

impl Display for Sample {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.subset, self.file_name)
    }
}

impl TryFrom<(Subset, String)> for Sample {
    type Error = DomainError;

    fn try_from((subset, file_name): (Subset, String)) -> Result<Self, Self::Error> {
        Self::new(subset, file_name)
    }
}

impl From<Sample> for (Subset, String) {
    fn from(sample: Sample) -> Self {
        (sample.subset, sample.file_name)
    }
}

pub fn is_image_file_name(name: &str) -> bool {
    let Some(ext) = Path::new(name).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// `photo.JPG` -> `photo.xml`
pub fn annotation_file_name(image_name: &str) -> String {
    let stem = Path::new(image_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(image_name);
    format!("{stem}.xml")
}

fn validate_file_name(name: &str) -> Result<(), DomainError> {
    let is_bare = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\');
    if !is_bare {
        return Err(DomainError::InvalidFileName(name.to_string()));
    }
    if !is_image_file_name(name) {
        return Err(DomainError::NotAnImage(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_file_name("a.jpg"));
        assert!(is_image_file_name("a.JPEG"));
        assert!(is_image_file_name("b.Png"));
        assert!(!is_image_file_name("a.xml"));
        assert!(!is_image_file_name("noext"));
    }

    #[test]
    fn annotation_name_swaps_extension() {
        let sample = Sample::new(Subset::Train, "frame.001.JPG").expect("sample");
        assert_eq!(sample.annotation_name(), "frame.001.xml");
    }

    #[test]
    fn sample_rejects_paths_and_non_images() {
        assert!(matches!(
            Sample::new(Subset::Train, "../a.jpg"),
            Err(DomainError::InvalidFileName(_))
        ));
        assert!(matches!(
            Sample::new(Subset::Validation, "a.xml"),
            Err(DomainError::NotAnImage(_))
        ));
        assert!(matches!(
            Sample::new(Subset::Train, ""),
            Err(DomainError::InvalidFileName(_))
        ));
    }

    #[test]
    fn sample_serializes_as_pair() {
        let sample = Sample::new(Subset::Validation, "x.png").expect("sample");
        let json = serde_json::to_string(&sample).expect("serialize");
        assert_eq!(json, r#"["validation","x.png"]"#);

        let bad: Result<Sample, _> = serde_json::from_str(r#"["test","x.png"]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn subset_parses_known_names_only() {
        assert_eq!("train".parse::<Subset>(), Ok(Subset::Train));
        assert_eq!(Subset::Train.other(), Subset::Validation);
        assert!(matches!(
            "defective".parse::<Subset>(),
            Err(DomainError::UnknownSubset(_))
        ));
    }
}
