//! Orchestrates one import folder: reads the dataset description, streams the
//! record files through validation and the statement builder in a fixed
//! order, and hands the finished graph to the replacement protocol.
//!
//! Validation failure for any record type is fatal to the run; the original
//! tooling was inconsistent here (digital-object failures were only logged)
//! and this implementation deliberately settles on the strict policy.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use log::{debug, info};

use crate::builder::{AvailabilityCheck, GraphBuilder};
use crate::config::Config;
use crate::errors::ValidationFailure;
use crate::records::{DatasetDescription, Entity, RecordType, ENTITIES_SCHEMA};
use crate::schema::{preprocess, Schema, ValidatedRow};
use crate::submit::{replace_named_graph, ReviewGate, UpdateEndpoint};

pub const DATASET_DESCRIPTION_FILE: &str = "dataset.yml";
pub const ENTITIES_FILE: &str = "entities.csv";

/// One import run over one folder. All accumulators live in the
/// [`GraphBuilder`] created by [`DataSetImport::build`] and are discarded
/// with it; nothing persists across runs.
pub struct DataSetImport<'a> {
    config: &'a Config,
    path: PathBuf,
    import_time: String,
    description: DatasetDescription,
    sources: Vec<(RecordType, PathBuf)>,
    entities_file: Option<PathBuf>,
}

impl<'a> DataSetImport<'a> {
    pub fn new(path: &Path, config: &'a Config) -> Result<Self> {
        let import_time = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        info!("Setting up import from {}", path.display());

        let description_path = path.join(DATASET_DESCRIPTION_FILE);
        let text = std::fs::read_to_string(&description_path)
            .with_context(|| format!("failed to read {}", description_path.display()))?;
        let description = DatasetDescription::from_yaml(&text)?;

        let mut sources = Vec::new();
        for kind in RecordType::ALL {
            let file = path.join(kind.file_name());
            if file.exists() {
                sources.push((kind, file));
            } else {
                debug!("No {} metadata found.", kind.label());
            }
        }
        if sources.is_empty() {
            bail!(
                "at least one of 'images.csv', 'audio_video.csv' or '3d.csv' must \
                 be present in {}",
                path.display()
            );
        }
        let entities_file = path.join(ENTITIES_FILE);
        let entities_file = entities_file.exists().then_some(entities_file);

        Ok(Self {
            config,
            path: path.to_path_buf(),
            import_time,
            description,
            sources,
            entities_file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates all source files and assembles the full statement set.
    pub fn build(&self, availability: Option<&dyn AvailabilityCheck>) -> Result<GraphBuilder<'a>> {
        info!("# Processing dataset description.");
        let mut builder = GraphBuilder::new(self.config, &self.description, &self.import_time)?;

        for (kind, file) in &self.sources {
            info!("# Processing {} metadata.", kind.label());
            self.process_objects(*kind, file, &mut builder, availability)?;
        }
        builder.finish_creation_events();

        if let Some(file) = &self.entities_file {
            info!("# Processing entities' metadata.");
            self.process_entities(file, &mut builder)?;
        } else {
            debug!("No entities' metadata found.");
        }
        Ok(builder)
    }

    /// Runs the whole import: build, then replace the named graph remotely.
    pub fn run(
        &self,
        endpoint: &dyn UpdateEndpoint,
        review: Option<&dyn ReviewGate>,
        availability: Option<&dyn AvailabilityCheck>,
    ) -> Result<()> {
        let builder = self.build(availability)?;
        info!("# Submitting graph data via SPARQL.");
        replace_named_graph(builder.graph(), builder.graph_iri(), endpoint, review)
    }

    fn process_objects(
        &self,
        kind: RecordType,
        file: &Path,
        builder: &mut GraphBuilder,
        availability: Option<&dyn AvailabilityCheck>,
    ) -> Result<()> {
        for row in read_rows(file)? {
            let row = row?;
            let validated = validate_row(kind.schema(), &row, "filename")?;
            let object = kind.map(validated)?;
            builder.add_digital_object(&object, availability)?;
        }
        Ok(())
    }

    fn process_entities(&self, file: &Path, builder: &mut GraphBuilder) -> Result<()> {
        for row in read_rows(file)? {
            let row = row?;
            let validated = validate_row(&ENTITIES_SCHEMA, &row, "identifier")?;
            let entity = Entity::from_row(validated)?;
            builder.add_entity(&entity)?;
        }
        Ok(())
    }
}

fn validate_row(
    schema: &Schema,
    row: &BTreeMap<String, String>,
    identifying_field: &str,
) -> Result<ValidatedRow> {
    schema.validate(row).map_err(|errors| {
        anyhow!(ValidationFailure {
            source: schema.name().to_string(),
            record: row
                .get(identifying_field)
                .cloned()
                .unwrap_or_else(|| "<missing>".to_string()),
            problems: errors.iter().map(|e| e.to_string()).collect(),
        })
    })
}

/// Streams a record file as preprocessed field-name to value mappings.
fn read_rows(file: &Path) -> Result<impl Iterator<Item = Result<BTreeMap<String, String>>>> {
    let mut reader = csv::Reader::from_path(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let headers = reader.headers()?.clone();
    let file = file.to_path_buf();
    Ok(reader.into_records().map(move |record| {
        let record = record.with_context(|| format!("malformed row in {}", file.display()))?;
        Ok(preprocess(headers.iter().zip(record.iter())))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::UpdateEndpoint;
    use std::cell::RefCell;
    use std::collections::BTreeMap as Map;
    use std::fs;
    use tempfile::TempDir;

    struct RecordingEndpoint {
        updates: RefCell<Vec<String>>,
    }

    impl RecordingEndpoint {
        fn new() -> Self {
            Self {
                updates: RefCell::new(Vec::new()),
            }
        }
    }

    impl UpdateEndpoint for RecordingEndpoint {
        fn execute_update(&self, update: &str) -> Result<()> {
            self.updates.borrow_mut().push(update.to_string());
            Ok(())
        }
    }

    fn test_config() -> Config {
        Config {
            entities_namespace: "https://enter.museum4punkt0.de/resource/".to_string(),
            media_types: Map::from([(
                "tif".to_string(),
                "https://www.iana.org/assignments/media-types/image/tiff".to_string(),
            )]),
            sparql_endpoint: "https://store.example.org/sparql".to_string(),
            username: "importer".to_string(),
            password: None,
            review: false,
            check_availability: false,
        }
    }

    fn write_dataset_description(dir: &TempDir) {
        fs::write(
            dir.path().join("dataset.yml"),
            "file_namespace: \"https://example.org/project/\"\n\
             data_provider: \"https://example.org/org/\"\n",
        )
        .unwrap();
    }

    fn write_images(dir: &TempDir, rows: &[String]) {
        let mut content = String::from("filename*,rights_statement,entity\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(dir.path().join("images.csv"), content).unwrap();
    }

    #[test]
    fn test_end_to_end_statement_count() {
        let dir = TempDir::new().unwrap();
        write_dataset_description(&dir);
        let rows: Vec<String> = (1..=18)
            .map(|i| format!("image_{:02}.tif,CC BY Museum,", i))
            .collect();
        write_images(&dir, &rows);

        let config = test_config();
        let import = DataSetImport::new(dir.path(), &config).unwrap();
        assert_eq!(import.path(), dir.path());
        let builder = import.build(None).unwrap();
        // 8 dataset-level + 18 * 7 per image + one creation event of 6
        assert_eq!(builder.graph().len(), 8 + 18 * 7 + 6);
    }

    #[test]
    fn test_duplicate_filename_aborts_before_any_remote_call() {
        let dir = TempDir::new().unwrap();
        write_dataset_description(&dir);
        write_images(
            &dir,
            &[
                "photo.tif,CC BY Museum,".to_string(),
                "photo.tif,CC BY Museum,".to_string(),
            ],
        );

        let config = test_config();
        let endpoint = RecordingEndpoint::new();
        let import = DataSetImport::new(dir.path(), &config).unwrap();
        let error = import.run(&endpoint, None, None).unwrap_err();
        assert!(error.to_string().contains("photo.tif"));
        assert!(endpoint.updates.borrow().is_empty());
    }

    #[test]
    fn test_run_submits_two_updates() {
        let dir = TempDir::new().unwrap();
        write_dataset_description(&dir);
        write_images(&dir, &["photo.tif,CC BY Museum,".to_string()]);

        let config = test_config();
        let endpoint = RecordingEndpoint::new();
        let import = DataSetImport::new(dir.path(), &config).unwrap();
        import.run(&endpoint, None, None).unwrap();
        let updates = endpoint.updates.borrow();
        assert_eq!(updates.len(), 2);
        assert!(updates[0].starts_with("DELETE WHERE"));
        assert!(updates[1].contains("INSERT DATA"));
    }

    #[test]
    fn test_invalid_dataset_description_aborts_immediately() {
        let dir = TempDir::new().unwrap();
        // file_namespace is missing entirely
        fs::write(
            dir.path().join("dataset.yml"),
            "data_provider: \"https://example.org/org/\"\n",
        )
        .unwrap();
        write_images(&dir, &["photo.tif,CC BY Museum,".to_string()]);

        let config = test_config();
        let error = DataSetImport::new(dir.path(), &config).unwrap_err();
        assert!(error.to_string().contains("file_namespace"));
    }

    #[test]
    fn test_folder_without_digital_objects_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_dataset_description(&dir);
        fs::write(dir.path().join("entities.csv"), "identifier,label\na,b\n").unwrap();

        let config = test_config();
        let error = DataSetImport::new(dir.path(), &config).unwrap_err();
        assert!(error.to_string().contains("must be present"));
    }

    #[test]
    fn test_invalid_object_row_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_dataset_description(&dir);
        // both rights fields at once violate the exclusivity rule
        fs::write(
            dir.path().join("images.csv"),
            "filename*,rights_statement,license,licensor\n\
             photo.tif,CC BY Museum,https://creativecommons.org/licenses/by/4.0/,Museum\n",
        )
        .unwrap();

        let config = test_config();
        let import = DataSetImport::new(dir.path(), &config).unwrap();
        let error = import.build(None).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("photo.tif"));
        assert!(message.contains("mutually exclusive"));
    }

    #[test]
    fn test_entities_flow_through_referential_integrity() {
        let dir = TempDir::new().unwrap();
        write_dataset_description(&dir);
        write_images(&dir, &["photo.tif,CC BY Museum,object_1".to_string()]);
        fs::write(
            dir.path().join("entities.csv"),
            "identifier*,label*,material\nobject_1,Mask,wood\n",
        )
        .unwrap();

        let config = test_config();
        let import = DataSetImport::new(dir.path(), &config).unwrap();
        let builder = import.build(None).unwrap();
        let entity = builder.entity_iri("object_1").unwrap();
        assert!(builder
            .graph()
            .triples_for_predicate(crate::consts::JSON_DATA)
            .next()
            .is_some());
        assert!(builder
            .graph()
            .triples_for_predicate(crate::consts::REFERS_TO_ENTITY)
            .any(|t| t.object == oxigraph::model::TermRef::NamedNode(entity.as_ref())));

        // an unreferenced entity makes the run fail, naming the identifier
        fs::write(
            dir.path().join("entities.csv"),
            "identifier*,label*\nobject_2,Vase\n",
        )
        .unwrap();
        let import = DataSetImport::new(dir.path(), &config).unwrap();
        let error = import.build(None).unwrap_err();
        assert!(error.to_string().contains("object_2"));
    }
}
