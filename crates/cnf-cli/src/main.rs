//! `cnf` CLI — inspect and edit OpenSSL configuration files without disturbing
//! their formatting.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a file and print a summary
//! cnf check -i /etc/ssl/openssl.cnf
//!
//! # Read a value from a section (or from the preamble when -s is omitted)
//! cnf get default_md -s CA_default -i openssl.cnf
//!
//! # List section names
//! cnf sections -i openssl.cnf
//!
//! # Rewrite with a guaranteed trailing newline (stdin → stdout)
//! cat openssl.cnf | cnf fmt --newline crlf
//!
//! # Change or add a value, keeping everything else byte-identical
//! cnf set CN example.com -s req -i req.cnf -o req.cnf
//!
//! # Dump the parsed tree as JSON
//! cnf tree -i openssl.cnf
//! ```
//!
//! Set `CNF_LOG=debug` (or `trace`) to see parser logging on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cnf_core::{Document, KeyValue, Node, ParseOptions, Section, Whitespace};
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cnf",
    version,
    about = "Lossless OpenSSL configuration file tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Stop at the first unrecognised character instead of failing
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report what it contains
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the value of a key
    Get {
        /// Key to look up (exact match)
        key: String,
        /// Section to search; the preamble before the first section if omitted
        #[arg(short, long)]
        section: Option<String>,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List section names in file order
    Sections {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Reserialize, making sure the output ends with a newline
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Line ending to append when one is missing
        #[arg(long, value_enum, default_value_t = LineEnding::Lf)]
        newline: LineEnding,
    },
    /// Set a key in a section, adding the key or section if missing
    Set {
        /// Key to set
        key: String,
        /// New value
        value: String,
        /// Section holding the key
        #[arg(short, long)]
        section: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the parsed tree as JSON
    Tree {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let options = if cli.lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::strict()
    };

    match cli.command {
        Commands::Check { input } => {
            let doc = read_document(input.as_deref(), options)?;
            let section_pairs: usize = doc.sections().map(|s| s.kvp().count()).sum();
            println!("nodes:     {}", doc.len());
            println!("sections:  {}", doc.sections().count());
            println!("pairs:     {}", doc.kvp().count() + section_pairs);
        }
        Commands::Get {
            key,
            section,
            input,
        } => {
            let doc = read_document(input.as_deref(), options)?;
            let kv = match section.as_deref() {
                Some(name) => doc
                    .get_section(name)
                    .with_context(|| format!("Section not found: [{}]", name))?
                    .get_kvp(&key)
                    .with_context(|| format!("Key not found in [{}]: {}", name, key))?,
                None => doc
                    .get_kvp(&key)
                    .with_context(|| format!("Key not found before the first section: {}", key))?,
            };
            println!("{}", kv.value.trim_end());
        }
        Commands::Sections { input } => {
            let doc = read_document(input.as_deref(), options)?;
            for section in doc.sections() {
                println!("{}", section.name);
            }
        }
        Commands::Fmt {
            input,
            output,
            newline,
        } => {
            let mut doc = read_document(input.as_deref(), options)?;
            doc.ensure_last_new_line(newline.as_str())?;
            write_document(&doc, output.as_deref())?;
        }
        Commands::Set {
            key,
            value,
            section,
            input,
            output,
        } => {
            let mut doc = read_document(input.as_deref(), options)?;
            let newline = detect_newline(&doc);
            let edit = Edit {
                section: &section,
                key: &key,
                value: &value,
            };
            edit.apply(&mut doc, newline)?;
            write_document(&doc, output.as_deref())?;
        }
        Commands::Tree { input } => {
            let doc = read_document(input.as_deref(), options)?;
            let json = serde_json::to_string_pretty(&doc)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("CNF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// A `set` request: put `value` under `key` in `[section]`.
struct Edit<'a> {
    section: &'a str,
    key: &'a str,
    value: &'a str,
}

impl Edit<'_> {
    /// Update the key, or add it (and the section) when missing.
    ///
    /// Names and the value are checked up front, so a rejected edit leaves
    /// `doc` untouched and an accepted one always parses back. An existing
    /// pair keeps its spacing, the padding after its value, and its trailing
    /// comment. A new pair goes on its own line after the last pair of the
    /// section; a missing section is appended at the end of the document.
    fn apply(&self, doc: &mut Document, newline: &str) -> Result<()> {
        Section::validate_name(self.section)?;
        KeyValue::validate_key(self.key)?;
        let pair = self.new_pair()?;
        let (section, key) = (self.section, self.key);

        if let Some(existing) = doc.get_section_mut(section) {
            if let Some(kv) = existing.get_kvp_mut(key) {
                debug!(section, key, "replacing value");
                // Padding before a trailing comment belongs to the old value text.
                let padding = &kv.value[kv.value.trim_end().len()..];
                let padded = format!("{}{}", self.value, padding);
                kv.set_value(padded)?;
                return Ok(());
            }
            debug!(section, key, "adding key");
            let at = insertion_point(existing);
            let nodes = existing.nodes_mut();
            nodes.insert(at, Node::from(pair));
            nodes.insert(at, Node::from(Whitespace::new(newline)?));
            return Ok(());
        }

        debug!(section, key, "adding section");
        doc.ensure_last_new_line(newline)?;
        let mut new_section = Section::new(section);
        new_section.append(Whitespace::new(newline)?);
        new_section.append(pair);
        new_section.append(Whitespace::new(newline)?);
        doc.append(new_section);
        Ok(())
    }

    /// A `key = value` pair; fails if the value would not read back as written.
    fn new_pair(&self) -> Result<KeyValue> {
        let mut kv = KeyValue::with_spacing(self.key, " ", " ", "");
        kv.set_value(self.value)?;
        Ok(kv)
    }
}

/// Where a new pair (preceded by a line break) goes: the first line-ending
/// whitespace after the last pair, or after the header when the section has
/// no pairs. Comments on those lines stay where they are.
fn insertion_point(section: &Section) -> usize {
    let nodes = section.nodes();
    let from = nodes
        .iter()
        .rposition(|n| n.as_key_value().is_some())
        .unwrap_or(0);
    nodes[from..]
        .iter()
        .position(|n| {
            n.as_whitespace()
                .is_some_and(|ws| ws.as_str().contains(['\r', '\n']))
        })
        .map_or(nodes.len(), |offset| from + offset)
}

/// CRLF if any line break in the file is CRLF, otherwise LF.
fn detect_newline(doc: &Document) -> &'static str {
    if uses_crlf(doc.nodes()) {
        "\r\n"
    } else {
        "\n"
    }
}

fn uses_crlf(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Whitespace(ws) => ws.as_str().contains("\r\n"),
        Node::Section(section) => uses_crlf(section.nodes()),
        _ => false,
    })
}

/// Load from `path`, or from stdin when no path is given.
fn read_document(path: Option<&str>, options: ParseOptions) -> Result<Document> {
    match path {
        Some(path) => cnf_core::load_with(path, options)
            .with_context(|| format!("Failed to load config: {}", path)),
        None => cnf_core::from_reader(io::stdin().lock(), options)
            .context("Failed to load config from stdin"),
    }
}

/// Write to `path`, or to stdout when no path is given.
fn write_document(doc: &Document, path: Option<&str>) -> Result<()> {
    match path {
        Some(path) => doc
            .dump(path)
            .with_context(|| format!("Failed to write config: {}", path)),
        None => cnf_core::write_to(doc, io::stdout().lock()).context("Failed to write to stdout"),
    }
}
