//! The named-graph replacement protocol: serialize the assembled statement
//! set, derive the delete/insert command pair, pass the optional operator
//! review gate, and execute both commands against the SPARQL endpoint.
//!
//! Failures on either call are terminal; there is no retry and no rollback.
//! A crash between the two calls leaves the named graph empty, which is
//! acceptable because the graph is owned exclusively by this importer and a
//! re-run reproduces identical IRIs.

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{Graph, NamedNodeRef, Triple};
use reqwest::header::CONTENT_TYPE;

use crate::consts::PREFIXES;

/// Execution of one SPARQL update. The importer only ever needs this single
/// capability from the remote store, so tests substitute a recording fake.
pub trait UpdateEndpoint {
    fn execute_update(&self, update: &str) -> Result<()>;
}

pub struct HttpUpdateEndpoint {
    client: reqwest::blocking::Client,
    url: String,
    username: String,
    password: Option<String>,
}

impl HttpUpdateEndpoint {
    pub fn new(url: &str, username: &str, password: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?,
            url: url.to_string(),
            username: username.to_string(),
            password: password.map(str::to_string),
        })
    }
}

impl UpdateEndpoint for HttpUpdateEndpoint {
    fn execute_update(&self, update: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, self.password.as_deref())
            .header(CONTENT_TYPE, "application/sparql-update")
            .body(update.to_string())
            .send()
            .with_context(|| format!("failed to reach the SPARQL endpoint {}", self.url))?;
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        if !status.is_success() {
            bail!(
                "the SPARQL endpoint {} rejected the update ({}): {}",
                self.url,
                status,
                body.trim()
            );
        }
        debug!("endpoint answered: {}", body.trim());
        Ok(())
    }
}

/// Human-review gate before anything is sent over the network.
pub trait ReviewGate {
    fn approve(&self, update: &str) -> Result<bool>;
}

/// Shows the insert command on stdout and reads the answer from stdin. Only
/// an explicit `y` or `yes` proceeds.
pub struct ConsoleReview;

impl ReviewGate for ConsoleReview {
    fn approve(&self, update: &str) -> Result<bool> {
        println!("{}", update);
        print!("Submit this update? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// Renders the statement set as Turtle with the fixed prefix table declared
/// up front.
pub fn serialize_graph(graph: &Graph) -> Result<String> {
    let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
    for (prefix, namespace) in PREFIXES {
        serializer = serializer.with_prefix(*prefix, *namespace)?;
    }
    let mut buffer = Vec::new();
    let mut writer = serializer.for_writer(&mut buffer);
    for triple in graph.iter() {
        writer.serialize_triple(triple)?;
    }
    writer.finish()?;
    Ok(String::from_utf8(buffer)?)
}

/// Parses a Turtle document back into a graph; the counterpart used to check
/// that command construction loses nothing.
pub fn parse_turtle(text: &str) -> Result<Graph> {
    let parser = RdfParser::from_format(RdfFormat::Turtle);
    let mut graph = Graph::new();
    for quad in parser.for_reader(text.as_bytes()) {
        let quad = quad?;
        let triple = Triple::new(quad.subject, quad.predicate, quad.object);
        graph.insert(&triple);
    }
    Ok(graph)
}

/// Splits a Turtle document into its prefix header, rewritten as SPARQL
/// `PREFIX` declarations, and the statement body. The header is the run of
/// leading `@prefix` lines up to the first non-prefix line.
pub fn split_prefixes(turtle: &str) -> (String, String) {
    let mut header = Vec::new();
    let mut body = Vec::new();
    let mut in_header = true;
    for line in turtle.lines() {
        if in_header {
            if let Some(declaration) = line.strip_prefix("@prefix") {
                let declaration = declaration.trim().trim_end_matches('.').trim_end();
                header.push(format!("PREFIX {}", declaration));
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            in_header = false;
        }
        body.push(line);
    }
    (header.join("\n"), body.join("\n"))
}

/// The command that empties the named graph.
pub fn delete_command(graph_iri: NamedNodeRef) -> String {
    format!("DELETE WHERE {{ GRAPH {} {{ ?s ?p ?o }} }}", graph_iri)
}

/// The command that fills the named graph with the serialized statements.
pub fn insert_command(graph_iri: NamedNodeRef, prefixes: &str, body: &str) -> String {
    format!(
        "{}\nINSERT DATA {{\n  GRAPH {} {{\n{}\n  }}\n}}",
        prefixes, graph_iri, body
    )
}

/// Replaces the named graph on the endpoint: delete, then insert, as two
/// sequential blocking calls. A declined review aborts before any call.
pub fn replace_named_graph(
    graph: &Graph,
    graph_iri: NamedNodeRef,
    endpoint: &dyn UpdateEndpoint,
    review: Option<&dyn ReviewGate>,
) -> Result<()> {
    let turtle = serialize_graph(graph)?;
    let (prefixes, body) = split_prefixes(&turtle);
    let insert = insert_command(graph_iri, &prefixes, &body);
    if let Some(gate) = review {
        if !gate.approve(&insert)? {
            bail!("the update was declined during operator review");
        }
    }
    info!("Replacing the named graph {}", graph_iri);
    endpoint
        .execute_update(&delete_command(graph_iri))
        .context("failed to clear the named graph")?;
    endpoint
        .execute_update(&insert)
        .context("failed to insert the new graph contents")?;
    Ok(())
}
