//! Typed records for the fixed set of source-file types, each variant
//! carrying its declarative schema and its mapping from a validated row.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use lazy_static::lazy_static;
use url::Url;

use crate::consts;
use crate::schema::{lower, lower_extension, FieldSpec, Schema, ValidatedRow};

/// License URLs accepted in the `license` column.
pub const LICENSE_URLS: &[&str] = &[
    "https://creativecommons.org/publicdomain/zero/1.0/",
    "https://creativecommons.org/publicdomain/mark/1.0/",
    "https://creativecommons.org/licenses/by/4.0/",
    "https://creativecommons.org/licenses/by-sa/4.0/",
    "https://creativecommons.org/licenses/by-nc/4.0/",
    "https://creativecommons.org/licenses/by-nc-sa/4.0/",
    "https://creativecommons.org/licenses/by-nd/4.0/",
    "https://creativecommons.org/licenses/by-nc-nd/4.0/",
];

pub const RESOLUTIONS: &[&str] = &["low", "mid", "high"];

// a filename is a single path segment with an extension
const FILENAME_PATTERN: &str = r"^[^/\\]+\.[0-9A-Za-z]+$";
const URL_PATTERN: &str = r"^https?://\S+$";

fn digital_object_fields(schema: Schema) -> Schema {
    schema
        .field(
            FieldSpec::new("filename")
                .required()
                .pattern(FILENAME_PATTERN)
                .coerce(lower_extension),
        )
        .field(FieldSpec::new("rights_statement"))
        .field(FieldSpec::new("license").allowed(LICENSE_URLS))
        .field(FieldSpec::new("licensor"))
        .field(FieldSpec::new("entity"))
        .field(FieldSpec::new("url").pattern(URL_PATTERN))
        .exclusive("rights_statement", "license")
        .dependent("license", "licensor")
        .one_required("rights_statement", "license")
}

lazy_static! {
    pub static ref DATASET_DESCRIPTION_SCHEMA: Schema = Schema::new("dataset description")
        .field(
            FieldSpec::new("file_namespace")
                .required()
                .pattern(r"^https?://\S+/$")
        )
        .field(FieldSpec::new("data_provider").required().pattern(URL_PATTERN));
    pub static ref IMAGES_SCHEMA: Schema = digital_object_fields(Schema::new("images"));
    pub static ref AUDIO_VIDEO_SCHEMA: Schema =
        digital_object_fields(Schema::new("audio_video"))
            .field(FieldSpec::new("duration").required().pattern(r"^\S+$"));
    pub static ref THREE_D_SCHEMA: Schema = digital_object_fields(Schema::new("3d"))
        .field(
            FieldSpec::new("thumbnail_filename")
                .required()
                .pattern(FILENAME_PATTERN)
                .coerce(lower_extension)
        )
        .field(
            FieldSpec::new("resolution")
                .required()
                .coerce(lower)
                .allowed(RESOLUTIONS)
        )
        .field(FieldSpec::new("geometry_type"))
        .field(FieldSpec::new("file_type"))
        .field(FieldSpec::new("texture"))
        .field(FieldSpec::new("vertex_color").coerce(lower).allowed(&["true", "false"]));
    pub static ref ENTITIES_SCHEMA: Schema = Schema::new("entities")
        .field(FieldSpec::new("identifier").required())
        .field(FieldSpec::new("label").required())
        .field(FieldSpec::new("url").pattern(URL_PATTERN))
        .allow_unknown();
}

/// The dataset-level description read from `dataset.yml`. Immutable once
/// validated; one per import run.
#[derive(Debug, Clone)]
pub struct DatasetDescription {
    pub file_namespace: Url,
    pub data_provider: Url,
}

impl DatasetDescription {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let document: BTreeMap<String, serde_yaml::Value> =
            serde_yaml::from_str(text).context("dataset description is not a YAML mapping")?;
        let mut row = BTreeMap::new();
        for (key, value) in document {
            match value {
                serde_yaml::Value::String(value) => {
                    row.insert(key, value);
                }
                other => bail!(
                    "dataset description field '{}' must be a string, got {:?}",
                    key,
                    other
                ),
            }
        }
        let validated = DATASET_DESCRIPTION_SCHEMA.validate(&row).map_err(|errors| {
            anyhow!(crate::errors::ValidationFailure {
                source: "dataset description".to_string(),
                record: row
                    .get("file_namespace")
                    .cloned()
                    .unwrap_or_else(|| "<missing>".to_string()),
                problems: errors.iter().map(|e| e.to_string()).collect(),
            })
        })?;
        Ok(Self {
            file_namespace: Url::parse(required(&validated, "file_namespace")?)?,
            data_provider: Url::parse(required(&validated, "data_provider")?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rights {
    Statement(String),
    License { url: String, licensor: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Low,
    Mid,
    High,
}

impl Resolution {
    pub fn iri(&self) -> oxigraph::model::NamedNodeRef<'static> {
        match self {
            Resolution::Low => consts::LOW_RESOLUTION,
            Resolution::Mid => consts::MID_RESOLUTION,
            Resolution::High => consts::HIGH_RESOLUTION,
        }
    }
}

/// Type-specific payload of a digital object; a closed set of variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Image,
    AudioVideo {
        duration: String,
    },
    ThreeD {
        thumbnail: String,
        resolution: Resolution,
        geometry_type: Option<String>,
        file_type: Option<String>,
        texture: Option<String>,
        vertex_color: Option<bool>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DigitalObject {
    pub filename: String,
    /// `None` never survives validation plus building; the builder treats it
    /// as an internal invariant violation.
    pub rights: Option<Rights>,
    pub entity_ref: Option<String>,
    pub url: Option<String>,
    pub kind: ObjectKind,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub identifier: String,
    pub label: String,
    pub url: Option<String>,
    pub extras: BTreeMap<String, String>,
}

impl Entity {
    pub fn from_row(mut row: ValidatedRow) -> Result<Self> {
        Ok(Self {
            identifier: row
                .take("identifier")
                .ok_or_else(|| anyhow!("validated entity row lost its identifier"))?,
            label: row
                .take("label")
                .ok_or_else(|| anyhow!("validated entity row lost its label"))?,
            url: row.take("url"),
            extras: row.extras,
        })
    }
}

/// The three digital-object source types. Each knows its file name, its
/// schema and how a validated row maps into a [`DigitalObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Images,
    AudioVideo,
    ThreeD,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [RecordType::Images, RecordType::AudioVideo, RecordType::ThreeD];

    pub fn file_name(&self) -> &'static str {
        match self {
            RecordType::Images => "images.csv",
            RecordType::AudioVideo => "audio_video.csv",
            RecordType::ThreeD => "3d.csv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordType::Images => "images'",
            RecordType::AudioVideo => "audios'",
            RecordType::ThreeD => "3D objects'",
        }
    }

    pub fn schema(&self) -> &'static Schema {
        match self {
            RecordType::Images => &IMAGES_SCHEMA,
            RecordType::AudioVideo => &AUDIO_VIDEO_SCHEMA,
            RecordType::ThreeD => &THREE_D_SCHEMA,
        }
    }

    pub fn map(&self, mut row: ValidatedRow) -> Result<DigitalObject> {
        let filename = row
            .take("filename")
            .ok_or_else(|| anyhow!("validated row lost its filename"))?;
        let rights = match (row.take("rights_statement"), row.take("license")) {
            (Some(statement), None) => Some(Rights::Statement(statement)),
            (None, Some(url)) => Some(Rights::License {
                url,
                licensor: row
                    .take("licensor")
                    .ok_or_else(|| anyhow!("validated row lost its licensor"))?,
            }),
            (None, None) => None,
            (Some(_), Some(_)) => bail!("mutually exclusive rights fields both present"),
        };
        let entity_ref = row.take("entity");
        let url = row.take("url");
        let kind = match self {
            RecordType::Images => ObjectKind::Image,
            RecordType::AudioVideo => ObjectKind::AudioVideo {
                duration: row
                    .take("duration")
                    .ok_or_else(|| anyhow!("validated row lost its duration"))?,
            },
            RecordType::ThreeD => ObjectKind::ThreeD {
                thumbnail: row
                    .take("thumbnail_filename")
                    .ok_or_else(|| anyhow!("validated row lost its thumbnail"))?,
                resolution: match row.take("resolution").as_deref() {
                    Some("low") => Resolution::Low,
                    Some("mid") => Resolution::Mid,
                    Some("high") => Resolution::High,
                    other => bail!("unexpected geometry resolution {:?}", other),
                },
                geometry_type: row.take("geometry_type"),
                file_type: row.take("file_type"),
                texture: row.take("texture"),
                vertex_color: row.take("vertex_color").map(|v| v == "true"),
            },
        };
        Ok(DigitalObject {
            filename,
            rights,
            entity_ref,
            url,
            kind,
        })
    }
}

fn required<'a>(row: &'a ValidatedRow, field: &str) -> Result<&'a str> {
    row.get(field)
        .ok_or_else(|| anyhow!("validated row lost required field '{}'", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::preprocess;

    fn validate(kind: RecordType, pairs: Vec<(&str, &str)>) -> Result<DigitalObject> {
        let row = preprocess(pairs);
        let validated = kind
            .schema()
            .validate(&row)
            .map_err(|errors| anyhow!("{:?}", errors))?;
        kind.map(validated)
    }

    #[test]
    fn test_dataset_description_from_yaml() {
        let description = DatasetDescription::from_yaml(
            "file_namespace: \"https://example.org/project/\"\n\
             data_provider: \"https://example.org/org/\"\n",
        )
        .unwrap();
        assert_eq!(description.file_namespace.as_str(), "https://example.org/project/");

        // missing file_namespace is fatal
        assert!(DatasetDescription::from_yaml("data_provider: \"https://example.org/org/\"\n").is_err());

        // the file namespace must end in a slash
        assert!(DatasetDescription::from_yaml(
            "file_namespace: \"https://example.org/project\"\n\
             data_provider: \"https://example.org/org/\"\n",
        )
        .is_err());
    }

    #[test]
    fn test_image_mapping() {
        let object = validate(
            RecordType::Images,
            vec![
                ("filename*", "Photo_01.TIF"),
                ("rights_statement", "CC BY Museum"),
                ("entity", "object_1"),
            ],
        )
        .unwrap();
        assert_eq!(object.filename, "Photo_01.tif");
        assert_eq!(object.rights, Some(Rights::Statement("CC BY Museum".to_string())));
        assert_eq!(object.entity_ref.as_deref(), Some("object_1"));
        assert_eq!(object.kind, ObjectKind::Image);
    }

    #[test]
    fn test_rights_information_is_required() {
        // neither a rights statement nor a license fails validation
        let result = validate(RecordType::Images, vec![("filename", "a.tif")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_license_requires_allow_listed_url() {
        let result = validate(
            RecordType::Images,
            vec![
                ("filename", "a.tif"),
                ("license", "https://example.org/homegrown-license"),
                ("licensor", "Museum"),
            ],
        );
        assert!(result.is_err());

        let object = validate(
            RecordType::Images,
            vec![
                ("filename", "a.tif"),
                ("license", "https://creativecommons.org/licenses/by/4.0/"),
                ("licensor", "Museum"),
            ],
        )
        .unwrap();
        assert_eq!(
            object.rights,
            Some(Rights::License {
                url: "https://creativecommons.org/licenses/by/4.0/".to_string(),
                licensor: "Museum".to_string(),
            })
        );
    }

    #[test]
    fn test_audio_video_requires_duration() {
        assert!(validate(
            RecordType::AudioVideo,
            vec![("filename", "clip.mp4"), ("rights_statement", "x")],
        )
        .is_err());

        let object = validate(
            RecordType::AudioVideo,
            vec![
                ("filename", "clip.mp4"),
                ("rights_statement", "x"),
                ("duration", "PT2M31S"),
            ],
        )
        .unwrap();
        assert_eq!(
            object.kind,
            ObjectKind::AudioVideo {
                duration: "PT2M31S".to_string()
            }
        );
    }

    #[test]
    fn test_three_d_requires_resolution() {
        // a 3D record without the geometry resolution is rejected
        assert!(validate(
            RecordType::ThreeD,
            vec![
                ("filename", "skull.obj"),
                ("rights_statement", "x"),
                ("thumbnail_filename", "skull.png"),
            ],
        )
        .is_err());

        let object = validate(
            RecordType::ThreeD,
            vec![
                ("filename", "skull.obj"),
                ("rights_statement", "x"),
                ("thumbnail_filename", "Skull.PNG"),
                ("resolution", "High"),
                ("vertex_color", "TRUE"),
            ],
        )
        .unwrap();
        match object.kind {
            ObjectKind::ThreeD {
                thumbnail,
                resolution,
                vertex_color,
                ..
            } => {
                assert_eq!(thumbnail, "Skull.png");
                assert_eq!(resolution, Resolution::High);
                assert_eq!(vertex_color, Some(true));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
