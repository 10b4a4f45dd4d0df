//! glossator - glossary annotator for HTML documents

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use glossator::{AnnotateOptions, Annotator};

#[derive(Parser)]
#[command(name = "glossator")]
#[command(version, about = "Annotate HTML with glossary markers and citation links", long_about = None)]
#[command(after_help = "EXAMPLES:
    glossator page.html annotated.html    Annotate a document
    glossator page.html --stats           Annotate and print counts
    glossator page.html --terms           List the indexed glossary terms
    cat page.html | glossator -           Read from stdin, write to stdout")]
struct Cli {
    /// Input HTML file ("-" for stdin)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (defaults to stdout)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// List the indexed glossary terms instead of annotating
    #[arg(short, long)]
    terms: bool,

    /// Emit the term list or stats as JSON
    #[arg(short, long)]
    json: bool,

    /// Print annotation counts to stderr
    #[arg(short, long)]
    stats: bool,

    /// Class of the content region to annotate
    #[arg(long, value_name = "CLASS", default_value = "main-content")]
    content_class: String,

    /// Class of the glossary definition list
    #[arg(long, value_name = "CLASS", default_value = "glossary-list")]
    glossary_class: String,

    /// Extra exclusion rule (tag, .class, or #id); repeatable
    #[arg(long = "exclude", value_name = "RULE")]
    exclude: Vec<String>,

    /// Skip linking AI Act citations to EUR-Lex
    #[arg(long)]
    no_citations: bool,

    /// Skip stamping anchor ids on headings and terms
    #[arg(long)]
    no_anchors: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let bytes = read_input(&cli.input).map_err(|e| e.to_string())?;

    let defaults = AnnotateOptions::default();
    let mut exclude = defaults.exclude.clone();
    exclude.extend(cli.exclude.iter().cloned());
    let options = AnnotateOptions {
        content_class: cli.content_class.clone(),
        glossary_class: cli.glossary_class.clone(),
        exclude,
        link_citations: !cli.no_citations,
        anchor_headings: !cli.no_anchors,
        ..defaults
    };

    let annotator = Annotator::new(options).map_err(|e| e.to_string())?;

    if cli.terms {
        return list_terms(&annotator, &bytes, cli.json);
    }

    let out = annotator.annotate_bytes(&bytes);

    if cli.stats {
        if cli.json {
            let stats =
                serde_json::to_string_pretty(&out.report).map_err(|e| e.to_string())?;
            eprintln!("{stats}");
        } else {
            eprintln!("terms indexed:    {}", out.report.terms_indexed);
            eprintln!("markers inserted: {}", out.report.markers_inserted);
            eprintln!("citations linked: {}", out.report.citations_linked);
            eprintln!("term anchors:     {}", out.report.term_anchors);
            eprintln!("heading ids:      {}", out.report.heading_ids);
        }
    }

    write_output(cli.output.as_deref(), &out.html).map_err(|e| e.to_string())?;

    if !cli.quiet
        && let Some(ref path) = cli.output
    {
        eprintln!(
            "{}: {} markers, {} citations",
            path, out.report.markers_inserted, out.report.citations_linked
        );
    }

    Ok(())
}

fn list_terms(annotator: &Annotator, bytes: &[u8], json: bool) -> Result<(), String> {
    let html = glossator::util::decode_text(bytes, None);
    let index = annotator.extract_terms(&html);

    if json {
        let terms = serde_json::to_string_pretty(index.entries()).map_err(|e| e.to_string())?;
        println!("{terms}");
    } else {
        for entry in index.entries() {
            println!("{:>3}. {} (#term-{})", entry.ordinal, entry.display, entry.slug);
        }
    }
    Ok(())
}

fn read_input(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

fn write_output(path: Option<&str>, html: &str) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, html),
        None => io::stdout().write_all(html.as_bytes()),
    }
}
