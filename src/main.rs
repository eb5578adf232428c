mod logging;

use std::env;
use std::path::PathBuf;
use std::process;

use cs_docs_sync::{DocsSyncManager, SyncConfig, SyncResult};
use log::{error, info};
use tokio::fs;

/// Parsed command line request
#[derive(Debug)]
enum Command {
    ListTypes,
    GetDocs {
        type_ids: Vec<String>,
        files: Vec<PathBuf>,
    },
    ApplyDocs {
        document: PathBuf,
        files: Vec<PathBuf>,
    },
}

#[derive(Debug)]
struct CliOptions {
    command: Command,
    root: PathBuf,
    excluded_paths: Vec<PathBuf>,
    defines: Vec<String>,
    references: Vec<PathBuf>,
    dump_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
    verbose: bool,
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {} list-types <root> [--exclude P]... [--define S]... [--reference F]... [--dump-dir D] [--config FILE]", program);
    eprintln!("  {} get-docs <root> <type-id>... --files <file>... [--define S]...", program);
    eprintln!("  {} apply-docs <root> <doc.xml> <file>... [--define S]...", program);
    eprintln!("Options:");
    eprintln!("  --verbose   Log skipped declarations as well");
    eprintln!("Example: {} get-docs ./Assets Acme.Widget --files Scripts/Widget.cs", program);
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let command_name = args.get(1).ok_or("Missing command")?;
    let root = args.get(2).ok_or("Missing root directory")?;

    let mut options = CliOptions {
        command: Command::ListTypes,
        root: PathBuf::from(root),
        excluded_paths: Vec::new(),
        defines: Vec::new(),
        references: Vec::new(),
        dump_dir: None,
        config_file: None,
        verbose: false,
    };

    let mut positional = Vec::new();
    let mut files = Vec::new();
    let mut in_files = false;
    let mut iter = args.iter().skip(3);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {}", name))
        };
        match arg.as_str() {
            "--exclude" => options.excluded_paths.push(PathBuf::from(value(arg.as_str())?)),
            "--define" => options.defines.push(value(arg.as_str())?),
            "--reference" => options.references.push(PathBuf::from(value(arg.as_str())?)),
            "--dump-dir" => options.dump_dir = Some(PathBuf::from(value(arg.as_str())?)),
            "--config" => options.config_file = Some(PathBuf::from(value(arg.as_str())?)),
            "--verbose" => options.verbose = true,
            "--files" => in_files = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
            _ if in_files => files.push(PathBuf::from(arg)),
            _ => positional.push(arg.clone()),
        }
    }

    options.command = match command_name.as_str() {
        "list-types" => {
            if !positional.is_empty() {
                return Err(format!("Unexpected arguments: {}", positional.join(" ")));
            }
            Command::ListTypes
        }
        "get-docs" => {
            if positional.is_empty() || files.is_empty() {
                return Err("get-docs needs at least one type id and --files".to_string());
            }
            Command::GetDocs {
                type_ids: positional,
                files,
            }
        }
        "apply-docs" => {
            let mut positional = positional.into_iter();
            let document = positional.next().ok_or("apply-docs needs a documentation file")?;
            let mut files: Vec<PathBuf> = positional.map(PathBuf::from).chain(files).collect();
            if files.is_empty() {
                return Err("apply-docs needs at least one source file".to_string());
            }
            files.dedup();
            Command::ApplyDocs {
                document: PathBuf::from(document),
                files,
            }
        }
        other => return Err(format!("Unknown command {}", other)),
    };

    Ok(options)
}

async fn build_config(options: &CliOptions) -> SyncResult<SyncConfig> {
    let mut config = match &options.config_file {
        Some(path) => SyncConfig::load(path).await?,
        None => SyncConfig::default(),
    };
    config.root = options.root.clone();
    config.excluded_paths.extend(options.excluded_paths.iter().cloned());
    config.defines.extend(options.defines.iter().cloned());
    config.references.extend(options.references.iter().cloned());
    if options.dump_dir.is_some() {
        config.dump_dir = options.dump_dir.clone();
    }
    Ok(config)
}

async fn run(options: CliOptions) -> SyncResult<()> {
    let config = build_config(&options).await?;
    let mut manager = DocsSyncManager::new(config)?;

    match options.command {
        Command::ListTypes => {
            let manifest = manager.list_types().await?;
            print!("{}", manifest);
        }
        Command::GetDocs { type_ids, files } => {
            let document = manager.get_documentation(&type_ids, &files).await?;
            print!("{}", document);
        }
        Command::ApplyDocs { document, files } => {
            let content = fs::read_to_string(&document).await?;
            let written = manager.apply_documentation(&content, &files).await?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cs_docs_sync");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            // Use eprintln for usage info since logger isn't initialized yet
            eprintln!("{}", message);
            print_usage(program);
            process::exit(1);
        }
    };

    match logging::init_logger(options.verbose) {
        Ok(path) => info!("Logging to {}", path.display()),
        Err(e) => eprintln!("Failed to initialize logger: {}", e),
    }
    info!("Command line arguments: {:?}", args);

    if let Err(e) = run(options).await {
        error!("Request failed: {}", e);
        eprintln!("Error: {}", e);
        // Rejected requests are told apart from failures while processing
        process::exit(if e.is_validation_error() { 2 } else { 1 });
    }
}
