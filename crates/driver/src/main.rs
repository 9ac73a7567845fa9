use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::LevelFilter;

use graph::Graph;
use parse::{Node, ScopeStack, TranslationUnit};

#[derive(Parser, Debug)]
#[command(
    name = "c2dot",
    about = "Parse preprocessed C99 and render its AST as a Graphviz graph",
    version
)]
struct Cli {
    /// More logging: -v info, -vv debug, -vvv trace (RUST_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lex a C source file and print its tokens
    Tokens(InputArgs),
    /// Parse a C source file and print the AST (debug format)
    Ast(InputArgs),
    /// Parse a C source file and emit the AST in DOT format
    Dot(DotArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Preprocessed C file, or `-` for standard input
    input: PathBuf,
    /// Treat NAME as a typedef declared before the input (repeatable)
    #[arg(short = 'T', long = "typedef", value_name = "NAME")]
    typedefs: Vec<String>,
}

#[derive(Args, Debug)]
struct DotArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Write the graph to FILE instead of standard output
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
    /// Name of the emitted digraph
    #[arg(long, env = "C2DOT_GRAPH_NAME", default_value = "AST")]
    graph_name: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let result = match cli.command {
        Commands::Tokens(args) => cmd_tokens(&args),
        Commands::Ast(args) => cmd_ast(&args),
        Commands::Dot(args) => cmd_dot(&args),
    };
    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str()));
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

fn display_name(input: &Path) -> String {
    if input == Path::new("-") {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

fn read_source(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read standard input")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn parse_input(args: &InputArgs) -> Result<TranslationUnit> {
    let src = read_source(&args.input)?;
    let name = display_name(&args.input);
    let scopes = ScopeStack::with_typedefs(args.typedefs.iter().cloned());
    let mut parser = parse::Parser::with_scopes(&src, scopes);
    let tu = parser
        .parse_translation_unit()
        .with_context(|| format!("failed to parse {}", name))?;
    log::info!("{}: {} external declarations", name, tu.items.len());
    Ok(tu)
}

fn cmd_tokens(args: &InputArgs) -> Result<()> {
    let src = read_source(&args.input)?;
    let names: HashSet<String> = args.typedefs.iter().cloned().collect();
    let toks = lex::tokenize(&src, &names)
        .with_context(|| format!("failed to lex {}", display_name(&args.input)))?;
    let mut out = io::stdout().lock();
    for tok in &toks {
        writeln!(out, "{} {} @{}", tok.kind.category(), tok.lexeme, tok.loc)?;
    }
    Ok(())
}

fn cmd_ast(args: &InputArgs) -> Result<()> {
    let tu = parse_input(args)?;
    println!("{:#?}", tu);
    Ok(())
}

fn cmd_dot(args: &DotArgs) -> Result<()> {
    if args.graph_name.trim().is_empty() {
        bail!("graph name must not be empty");
    }
    let tu = parse_input(&args.input)?;
    let graph = Graph::build(&args.graph_name, Node::from(&tu));
    let text = graph.to_string();
    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} nodes, {} edges to {}", graph.nodes.len(), graph.edge_count(), path.display());
        }
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}
