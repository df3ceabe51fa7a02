//! Defines constant NamedNodeRefs for the fixed set of ontology terms emitted
//! by the statement builder, drawn from the m4p0, EDM, CIDOC CRM and CRMdig
//! vocabularies alongside the usual RDF/RDFS/DC/XSD terms.

use oxigraph::model::NamedNodeRef;

// namespace strings, also used for prefix registration when serializing
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const EDM_NS: &str = "http://www.europeana.eu/schemas/edm/";
pub const CRM_NS: &str = "http://www.cidoc-crm.org/cidoc-crm/";
pub const CRMDIG_NS: &str = "http://www.ics.forth.gr/isl/rdfs/3D-COFORM_CRMdig.rdfs#";
pub const M4P0_NS: &str = "https://enter.museum4punkt0.de/ontology/";

/// Prefix table registered with the Turtle serializer. The insert command
/// reuses these declarations, so every term below must fall under one of them.
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("dc", DC_NS),
    ("dcterms", DCTERMS_NS),
    ("xsd", XSD_NS),
    ("edm", EDM_NS),
    ("crm", CRM_NS),
    ("crmdig", CRMDIG_NS),
    ("m4p0", M4P0_NS),
];

pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const LABEL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label");

// dc / dcterms
pub const DATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/date");
pub const IDENTIFIER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/identifier");
pub const RIGHTS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/rights");
pub const LICENSE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://purl.org/dc/terms/license");

// xsd datatypes
pub const XSD_DATE_TIME: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#dateTime");
pub const XSD_ANY_URI: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#anyURI");
pub const XSD_BOOLEAN: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#boolean");

// edm
pub const DATA_PROVIDER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.europeana.eu/schemas/edm/dataProvider");
pub const AGENT: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.europeana.eu/schemas/edm/Agent");

// cidoc crm
pub const E1_CRM_ENTITY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.cidoc-crm.org/cidoc-crm/E1_CRM_Entity");
pub const E12_PRODUCTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.cidoc-crm.org/cidoc-crm/E12_Production");
pub const E39_ACTOR: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.cidoc-crm.org/cidoc-crm/E39_Actor");
pub const P2_HAS_TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.cidoc-crm.org/cidoc-crm/P2_has_type");
pub const P33_USED_SPECIFIC_TECHNIQUE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.cidoc-crm.org/cidoc-crm/P33_used_specific_technique");

// crmdig
pub const D1_DIGITAL_OBJECT: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
    "http://www.ics.forth.gr/isl/rdfs/3D-COFORM_CRMdig.rdfs#D1.Digital_Object",
);
pub const D2_DIGITIZATION_PROCESS: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
    "http://www.ics.forth.gr/isl/rdfs/3D-COFORM_CRMdig.rdfs#D2.Digitization_Process",
);
pub const L11_HAD_OUTPUT: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
    "http://www.ics.forth.gr/isl/rdfs/3D-COFORM_CRMdig.rdfs#L11_had_output",
);
pub const L11I_WAS_OUTPUT_OF: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
    "http://www.ics.forth.gr/isl/rdfs/3D-COFORM_CRMdig.rdfs#L11i_was_output_of",
);

// m4p0
pub const RDF_GRAPH: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/RDFGraph");
pub const FILE_NAMESPACE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/fileNamespace");
pub const ENTITIES_NAMESPACE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/entitiesNamespace");
pub const FILE_NAME: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/fileName");
pub const HAS_MEDIA_TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/hasMediaType");
pub const URL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/url");
pub const REFERS_TO_ENTITY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/refersToEntity");
pub const LICENSOR: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/licensor");
pub const DURATION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/duration");
pub const THUMBNAIL_FILE_NAME: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/thumbnailFileName");
pub const GEOMETRY_TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/geometryType");
pub const FILE_TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/fileType");
pub const TEXTURE_DESCRIPTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/textureDescription");
pub const VERTEX_COLOR: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/vertexColor");
pub const GEOMETRY_RESOLUTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/geometryResolution");
pub const LOW_RESOLUTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/LowResolution");
pub const MID_RESOLUTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/MidResolution");
pub const HIGH_RESOLUTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/HighResolution");
pub const CREATION_PHASE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/creationPhase");
pub const DIGITIZATION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/Digitization");
pub const DIGITIZATION_METHOD: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/DigitizationMethod");
pub const DESCRIBED_BY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/describedBy");
pub const JSON_OBJECT: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/JSONObject");
pub const JSON_DATA: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://enter.museum4punkt0.de/ontology/jsonData");
