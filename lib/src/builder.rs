//! Maps validated records into RDF statements, one run-scoped graph per
//! import. The builder owns the accumulators that give the mapping its
//! invariants: the filename uniqueness set and the creation-event set that is
//! emitted once per distinct media type after all objects are processed.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use log::debug;
use oxigraph::model::{Graph, Literal, NamedNode, NamedNodeRef, TermRef, TripleRef};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use uuid::Uuid;

use crate::config::Config;
use crate::consts;
use crate::ids;
use crate::records::{DatasetDescription, DigitalObject, Entity, ObjectKind, Rights};

// characters that may not appear raw in the path segment of an IRI
const FILENAME_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'%')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'`');

/// Probe for a digital object's URL. Injected into the builder so tests can
/// substitute a recording fake; the real implementation issues HEAD requests.
pub trait AvailabilityCheck {
    fn is_available(&self, url: &str) -> Result<bool>;
}

pub struct HeadAvailabilityCheck {
    client: reqwest::blocking::Client,
}

impl HeadAvailabilityCheck {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
        })
    }
}

impl AvailabilityCheck for HeadAvailabilityCheck {
    fn is_available(&self, url: &str) -> Result<bool> {
        let resp = self.client.head(url).send()?;
        Ok(resp.status().is_success())
    }
}

pub struct GraphBuilder<'a> {
    config: &'a Config,
    graph: Graph,
    graph_iri: NamedNode,
    run_ns: Uuid,
    file_namespace: String,
    data_provider: NamedNode,
    filenames: HashSet<String>,
    // media type IRI -> creation event IRI, ordered for deterministic emission
    events: BTreeMap<String, NamedNode>,
}

impl<'a> GraphBuilder<'a> {
    /// Establishes the graph identity and emits the dataset-level statements.
    pub fn new(
        config: &'a Config,
        description: &DatasetDescription,
        import_time: &str,
    ) -> Result<Self> {
        let file_namespace = description.file_namespace.to_string();
        let run_ns = ids::run_namespace(&file_namespace);
        let graph_iri = NamedNode::new(format!("{}{}", config.entities_namespace, run_ns))?;
        let data_provider = NamedNode::new(description.data_provider.as_str())?;
        debug!("Graph identity for {} is {}", file_namespace, graph_iri);

        let mut graph = Graph::new();
        graph.insert(TripleRef::new(&graph_iri, consts::TYPE, consts::RDF_GRAPH));
        graph.insert(TripleRef::new(
            &graph_iri,
            consts::LABEL,
            &Literal::new_simple_literal(format!("{} @ {}", file_namespace, import_time)),
        ));
        graph.insert(TripleRef::new(
            &graph_iri,
            consts::DATE,
            &Literal::new_typed_literal(import_time, consts::XSD_DATE_TIME),
        ));
        graph.insert(TripleRef::new(
            &graph_iri,
            consts::FILE_NAMESPACE,
            &Literal::new_typed_literal(file_namespace.as_str(), consts::XSD_ANY_URI),
        ));
        graph.insert(TripleRef::new(
            &graph_iri,
            consts::ENTITIES_NAMESPACE,
            &Literal::new_typed_literal(config.entities_namespace.as_str(), consts::XSD_ANY_URI),
        ));
        graph.insert(TripleRef::new(
            &graph_iri,
            consts::DATA_PROVIDER,
            &data_provider,
        ));
        graph.insert(TripleRef::new(&data_provider, consts::TYPE, consts::AGENT));
        graph.insert(TripleRef::new(&data_provider, consts::TYPE, consts::E39_ACTOR));

        Ok(Self {
            config,
            graph,
            graph_iri,
            run_ns,
            file_namespace,
            data_provider,
            filenames: HashSet::new(),
            events: BTreeMap::new(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_iri(&self) -> NamedNodeRef<'_> {
        self.graph_iri.as_ref()
    }

    /// The subject IRI of a digital object: file namespace + escaped filename.
    fn object_iri(&self, filename: &str) -> Result<NamedNode> {
        let escaped = utf8_percent_encode(filename, FILENAME_ESCAPE);
        NamedNode::new(format!("{}{}", self.file_namespace, escaped))
            .with_context(|| format!("cannot build an IRI for filename '{}'", filename))
    }

    /// The subject IRI of an entity record, derived from its identifier.
    pub fn entity_iri(&self, identifier: &str) -> Result<NamedNode> {
        NamedNode::new(format!(
            "{}{}",
            self.config.entities_namespace,
            ids::derive(&self.run_ns, identifier)
        ))
        .with_context(|| format!("cannot build an IRI for entity '{}'", identifier))
    }

    fn media_type(&self, filename: &str) -> Result<NamedNode> {
        // the schema guarantees an extension, already lower-cased
        let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        let media_type = self.config.media_types.get(extension).ok_or_else(|| {
            anyhow!(
                "no media type is configured for the extension '{}' of '{}'",
                extension,
                filename
            )
        })?;
        NamedNode::new(media_type.clone())
            .with_context(|| format!("media type for '{}' is not a valid IRI", extension))
    }

    pub fn add_digital_object(
        &mut self,
        object: &DigitalObject,
        check: Option<&dyn AvailabilityCheck>,
    ) -> Result<()> {
        if !self.filenames.insert(object.filename.clone()) {
            bail!(
                "the filename '{}' appears more than once in this import",
                object.filename
            );
        }
        let subject = self.object_iri(&object.filename)?;
        if let Some(check) = check {
            if !check.is_available(subject.as_str())? {
                bail!("the object URL {} is not available", subject);
            }
        }
        let media_type = self.media_type(&object.filename)?;
        let event = match self.events.get(media_type.as_str()) {
            Some(event) => event.clone(),
            None => {
                let event = NamedNode::new(format!(
                    "{}{}",
                    self.config.entities_namespace,
                    ids::derive(&self.run_ns, media_type.as_str())
                ))?;
                self.events
                    .insert(media_type.as_str().to_string(), event.clone());
                event
            }
        };

        self.graph
            .insert(TripleRef::new(&subject, consts::TYPE, consts::D1_DIGITAL_OBJECT));
        self.graph.insert(TripleRef::new(
            &subject,
            consts::FILE_NAME,
            &Literal::new_simple_literal(&object.filename),
        ));
        self.graph.insert(TripleRef::new(
            &subject,
            consts::DATA_PROVIDER,
            &self.data_provider,
        ));
        self.graph
            .insert(TripleRef::new(&subject, consts::HAS_MEDIA_TYPE, &media_type));
        self.graph
            .insert(TripleRef::new(&event, consts::L11_HAD_OUTPUT, &subject));
        self.graph
            .insert(TripleRef::new(&subject, consts::L11I_WAS_OUTPUT_OF, &event));

        match &object.rights {
            Some(Rights::Statement(statement)) => {
                self.graph.insert(TripleRef::new(
                    &subject,
                    consts::RIGHTS,
                    &Literal::new_simple_literal(statement),
                ));
            }
            Some(Rights::License { url, licensor }) => {
                let license = NamedNode::new(url.clone())?;
                self.graph
                    .insert(TripleRef::new(&subject, consts::LICENSE, &license));
                self.graph.insert(TripleRef::new(
                    &subject,
                    consts::LICENSOR,
                    &Literal::new_simple_literal(licensor),
                ));
            }
            // the validator rules this out for any record it accepts
            None => bail!(
                "internal invariant violated: '{}' carries neither a rights \
                 statement nor a license",
                object.filename
            ),
        }

        if let Some(url) = &object.url {
            self.graph.insert(TripleRef::new(
                &subject,
                consts::URL,
                &Literal::new_typed_literal(url.as_str(), consts::XSD_ANY_URI),
            ));
        }
        if let Some(identifier) = &object.entity_ref {
            let entity = self.entity_iri(identifier)?;
            self.graph
                .insert(TripleRef::new(&subject, consts::REFERS_TO_ENTITY, &entity));
        }

        match &object.kind {
            ObjectKind::Image => {}
            ObjectKind::AudioVideo { duration } => {
                self.graph.insert(TripleRef::new(
                    &subject,
                    consts::DURATION,
                    &Literal::new_simple_literal(duration),
                ));
            }
            ObjectKind::ThreeD {
                thumbnail,
                resolution,
                geometry_type,
                file_type,
                texture,
                vertex_color,
            } => {
                self.graph.insert(TripleRef::new(
                    &subject,
                    consts::THUMBNAIL_FILE_NAME,
                    &Literal::new_simple_literal(thumbnail),
                ));
                self.graph.insert(TripleRef::new(
                    &subject,
                    consts::GEOMETRY_RESOLUTION,
                    resolution.iri(),
                ));
                if let Some(geometry_type) = geometry_type {
                    self.graph.insert(TripleRef::new(
                        &subject,
                        consts::GEOMETRY_TYPE,
                        &Literal::new_simple_literal(geometry_type),
                    ));
                }
                if let Some(file_type) = file_type {
                    self.graph.insert(TripleRef::new(
                        &subject,
                        consts::FILE_TYPE,
                        &Literal::new_simple_literal(file_type),
                    ));
                }
                if let Some(texture) = texture {
                    self.graph.insert(TripleRef::new(
                        &subject,
                        consts::TEXTURE_DESCRIPTION,
                        &Literal::new_simple_literal(texture),
                    ));
                }
                if let Some(vertex_color) = vertex_color {
                    self.graph.insert(TripleRef::new(
                        &subject,
                        consts::VERTEX_COLOR,
                        &Literal::new_typed_literal(
                            if *vertex_color { "true" } else { "false" },
                            consts::XSD_BOOLEAN,
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Emits one statement group per distinct media type encountered. Called
    /// once, after all digital-object files are processed.
    pub fn finish_creation_events(&mut self) {
        for (media_type, event) in &self.events {
            let media_type_ref = NamedNodeRef::new_unchecked(media_type);
            self.graph.insert(TripleRef::new(
                event,
                consts::TYPE,
                consts::D2_DIGITIZATION_PROCESS,
            ));
            self.graph
                .insert(TripleRef::new(event, consts::TYPE, consts::E12_PRODUCTION));
            self.graph
                .insert(TripleRef::new(event, consts::P2_HAS_TYPE, media_type_ref));
            self.graph.insert(TripleRef::new(
                event,
                consts::CREATION_PHASE,
                consts::DIGITIZATION,
            ));
            self.graph.insert(TripleRef::new(
                event,
                consts::P33_USED_SPECIFIC_TECHNIQUE,
                consts::DIGITIZATION_METHOD,
            ));
            self.graph.insert(TripleRef::new(
                event,
                consts::LABEL,
                &Literal::new_simple_literal(format!("Digitization event for {}", media_type)),
            ));
        }
    }

    /// Adds an entity record. Referential integrity is checked entity-side: at
    /// least one digital object of this run must refer to the entity.
    pub fn add_entity(&mut self, entity: &Entity) -> Result<()> {
        let subject = self.entity_iri(&entity.identifier)?;
        let referenced = self
            .graph
            .triples_for_predicate(consts::REFERS_TO_ENTITY)
            .any(|triple| triple.object == TermRef::NamedNode(subject.as_ref()));
        if !referenced {
            bail!(
                "the entity '{}' is not referenced by any digital object",
                entity.identifier
            );
        }

        self.graph
            .insert(TripleRef::new(&subject, consts::TYPE, consts::E1_CRM_ENTITY));
        self.graph.insert(TripleRef::new(
            &subject,
            consts::LABEL,
            &Literal::new_simple_literal(&entity.label),
        ));
        self.graph.insert(TripleRef::new(
            &subject,
            consts::IDENTIFIER,
            &Literal::new_simple_literal(&entity.identifier),
        ));
        if let Some(url) = &entity.url {
            self.graph.insert(TripleRef::new(
                &subject,
                consts::URL,
                &Literal::new_typed_literal(url.as_str(), consts::XSD_ANY_URI),
            ));
        }
        if !entity.extras.is_empty() {
            // unmodeled spreadsheet columns travel as one JSON literal
            let node = NamedNode::new(format!(
                "{}{}",
                self.config.entities_namespace,
                ids::derive(&self.run_ns, &format!("{}/json", entity.identifier))
            ))?;
            self.graph
                .insert(TripleRef::new(&subject, consts::DESCRIBED_BY, &node));
            self.graph
                .insert(TripleRef::new(&node, consts::TYPE, consts::JSON_OBJECT));
            self.graph.insert(TripleRef::new(
                &node,
                consts::JSON_DATA,
                &Literal::new_simple_literal(serde_json::to_string(&entity.extras)?),
            ));
        }
        Ok(())
    }
}
