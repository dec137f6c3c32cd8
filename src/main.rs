//! whisker CLI
//!
//! Usage:
//!   whisker [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -d, --data <FILE>      Context data file (TOML)
//!   -e, --encoding <NAME>  Template file encoding
//!   --syntax               Show template syntax reference
//!   --debug                Enable debug logging
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use whisker::{load_template, parse, render, Encoding, LoadError, Value};

#[derive(Parser)]
#[command(name = "whisker")]
#[command(about = "Directory-backed Mustache template rendering")]
struct Cli {
    /// Template file; partials resolve against its directory
    /// (reads the template from stdin if not provided)
    template: Option<PathBuf>,

    /// Context data file (TOML)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Template file encoding: utf-8, latin-1, utf-16le, utf-16be
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,

    /// Show template syntax reference
    #[arg(long)]
    syntax: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    if cli.syntax {
        print_syntax();
        return;
    }

    // If no template file and stdin is a terminal (interactive), show intro help
    if cli.template.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let encoding = match cli.encoding.parse::<Encoding>() {
        Ok(encoding) => encoding,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let context = match &cli.data {
        Some(path) => match Value::from_toml_file(path) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("Error loading context '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Value::Null,
    };

    let rendered = match &cli.template {
        Some(path) => match load_template(path, encoding) {
            Ok(template) => template.render(&context),
            Err(e) => {
                report_load_error(&e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            match parse(&buffer) {
                Ok(ast) => render(&ast, &context),
                Err(e) => {
                    eprintln!("{}", e.format(&buffer, "<stdin>"));
                    std::process::exit(1);
                }
            }
        }
    };

    // No trailing newline: the template's own text is the whole output
    print!("{}", rendered);
}

/// Logs go to stderr so rendered output on stdout stays clean
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("whisker=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("whisker=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Print a load failure, with source context when the template parsed badly
fn report_load_error(err: &LoadError) {
    if let LoadError::Parse { path, source, .. } = err {
        if let Ok(text) = fs::read_to_string(path) {
            eprintln!("{}", source.format(&text, &path.display().to_string()));
            return;
        }
    }
    eprintln!("Error: {}", err);
}

fn print_intro() {
    println!(
        "{}",
        r#"whisker - directory-backed Mustache template rendering

USAGE:
    whisker [OPTIONS] [TEMPLATE]
    echo 'Hello {{name}}!' | whisker -d context.toml

OPTIONS:
    -d, --data <FILE>      Context data file (TOML)
    -e, --encoding <NAME>  Template file encoding (default utf-8)
    --syntax               Show template syntax reference
    --debug                Enable debug logging
    -h, --help             Print help

QUICK START:
    echo 'Hello {{name}}!' > greeting.mustache
    echo 'name = "World"' > context.toml
    whisker greeting.mustache -d context.toml

Partials ({{>name}}) resolve against the template file's directory, so
templates read from stdin cannot include them. Run --syntax for the tag
reference."#
    );
}

fn print_syntax() {
    println!(
        "{}",
        r#"WHISKER TEMPLATE SYNTAX
=======================

TAGS
----
{{key}}                Interpolate a value, HTML-escaped
{{&key}}               Interpolate without escaping
{{{key}}}              Interpolate without escaping
{{#key}}...{{/key}}    Section: skipped when falsey, repeated for lists
{{^key}}...{{/key}}    Inverted section: rendered when falsey
{{>name}}              Include the named partial template
{{! text }}            Comment, never rendered

KEYS
----
Dot-separated identifiers reach into nested tables: {{user.address.city}}
Inside a list section, {{.}} is the item under iteration.
Lookup walks the context stack innermost-first; missing keys render
nothing.

FALSEY VALUES
-------------
false, 0, the empty string, the empty list, and absent keys. Everything
else, including an empty table, is truthy.

PARTIALS
--------
{{>name}} loads <directory>/name.<extension> through the same repository:
same extension, same encoding, same cache. Names may carry sub-paths
({{>shared/header}}) but always resolve against the root template's
directory, not the including file's. Cyclic partial references are an
error.

DATA FILES
----------
Context data is TOML:

    name = "World"
    admin = false
    items = ["a", "b"]

    [user]
    city = "Oslo"

ENCODINGS
---------
utf-8 (default), latin-1, utf-16le, utf-16be. A leading byte order mark
is dropped."#
    );
}
