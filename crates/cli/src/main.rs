// ABOUTME: CLI for querying and editing HTML/XML documents with pagedom.
// ABOUTME: Reads a file or stdin, applies selection edits in a fixed order, prints markup, text or JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use pagedom::{Document, DocumentBuilder, DocumentKind, HtmlPage, Node, Selection};
use serde::Serialize;

/// Select nodes with CSS and edit them jQuery-style.
#[derive(Parser, Debug)]
#[command(name = "pagedom")]
#[command(about = "Query and edit HTML or XML documents with CSS selectors", long_about = None)]
struct Args {
    /// Input file. Use "-" to read from stdin.
    #[arg(default_value = "-")]
    input: String,

    /// Parse the input as XML instead of HTML
    #[arg(long)]
    xml: bool,

    /// Charset label or Content-Type used to decode the input
    #[arg(long)]
    charset: Option<String>,

    /// CSS selector choosing the nodes to edit and print
    #[arg(short = 's', long = "select", default_value = ":root")]
    select: String,

    /// Class names to add (space separated)
    #[arg(long = "add-class", value_name = "NAMES")]
    add_class: Option<String>,

    /// Class names to remove (space separated)
    #[arg(long = "remove-class", value_name = "NAMES")]
    remove_class: Option<String>,

    /// Class names to toggle (space separated)
    #[arg(long = "toggle-class", value_name = "NAMES")]
    toggle_class: Option<String>,

    /// Set an attribute; an empty value removes it. Repeatable.
    #[arg(long = "attr", value_name = "K=V")]
    attrs: Vec<String>,

    /// Set an inline style property; an empty value removes it. Repeatable.
    #[arg(long = "css", value_name = "K=V")]
    css: Vec<String>,

    /// Markup to append to every selected node
    #[arg(long, value_name = "MARKUP")]
    append: Option<String>,

    /// Markup to prepend to every selected node
    #[arg(long, value_name = "MARKUP")]
    prepend: Option<String>,

    /// Wrap every selected node in a copy of this markup
    #[arg(long, value_name = "MARKUP")]
    wrap: Option<String>,

    /// Remove the parents of the selected nodes
    #[arg(long)]
    unwrap: bool,

    /// Remove the selected nodes
    #[arg(long)]
    remove: bool,

    /// Set the page title (HTML only)
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// What to print after editing
    #[arg(long, value_enum, default_value_t = PrintMode::Document)]
    print: PrintMode,

    /// Output a JSON report instead of raw markup
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PrintMode {
    Selection,
    Document,
    Text,
}

#[derive(Serialize)]
struct AttrReport {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct NodeReport {
    name: String,
    attributes: Vec<AttrReport>,
    text: String,
    html: String,
}

#[derive(Serialize)]
struct Report {
    kind: DocumentKind,
    selector: String,
    matched: usize,
    nodes: Vec<NodeReport>,
    document: String,
}

impl NodeReport {
    fn from_node(node: &Node) -> Self {
        Self {
            name: node.node_name(),
            attributes: node
                .attrs()
                .into_iter()
                .map(|a| AttrReport {
                    name: a.name,
                    value: a.value,
                })
                .collect(),
            text: node.text(),
            html: node.outer_html(),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let kind = if args.xml {
        DocumentKind::Xml
    } else {
        DocumentKind::Html
    };
    let bytes = load_bytes(&args.input)?;
    let doc = DocumentBuilder::new()
        .kind(kind)
        .parse_bytes(&bytes, args.charset.as_deref())
        .with_context(|| format!("cannot parse {}", args.input))?;

    if let Some(title) = &args.title {
        if kind != DocumentKind::Html {
            bail!("--title requires an HTML document");
        }
        HtmlPage::from(doc.clone()).set_title(title);
    }

    let selection = doc.select(&args.select)?;
    log::debug!("{:?} matched {} node(s)", args.select, selection.len());
    apply_edits(args, &selection)?;

    let output = if args.json_output {
        let report = Report {
            kind,
            selector: args.select.clone(),
            matched: selection.len(),
            nodes: selection.iter().map(NodeReport::from_node).collect(),
            document: doc.html(),
        };
        serde_json::to_string_pretty(&report)?
    } else {
        render(args.print, &doc, &selection)
    };

    match &args.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => println!("{}", output),
    }
    Ok(())
}

fn apply_edits(args: &Args, selection: &Selection) -> Result<()> {
    for pair in &args.attrs {
        let (key, value) = split_pair(pair, "--attr")?;
        if value.is_empty() {
            selection.remove_attr(key);
        } else {
            selection.set_attr(key, value);
        }
    }
    for pair in &args.css {
        let (key, value) = split_pair(pair, "--css")?;
        selection.set_css(key, value);
    }
    if let Some(names) = &args.add_class {
        selection.add_class(names);
    }
    if let Some(names) = &args.remove_class {
        selection.remove_class(names);
    }
    if let Some(names) = &args.toggle_class {
        selection.toggle_class(names);
    }
    if let Some(markup) = &args.prepend {
        selection.prepend(markup)?;
    }
    if let Some(markup) = &args.append {
        selection.append(markup)?;
    }
    if let Some(markup) = &args.wrap {
        selection.wrap(markup)?;
    }
    if args.unwrap {
        selection.unwrap()?;
    }
    if args.remove {
        selection.remove();
    }
    Ok(())
}

fn render(mode: PrintMode, doc: &Document, selection: &Selection) -> String {
    match mode {
        PrintMode::Document => doc.html(),
        PrintMode::Selection => selection
            .iter()
            .map(Node::outer_html)
            .collect::<Vec<_>>()
            .join("\n"),
        PrintMode::Text => selection
            .iter()
            .map(Node::text)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn split_pair<'a>(pair: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    pair.split_once('=')
        .map(|(k, v)| (k.trim(), v))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| anyhow!("{} expects KEY=VALUE, got {:?}", flag, pair))
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
