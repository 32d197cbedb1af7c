use clap::{Parser, Subcommand};
use javelin_runtime::{Value, VirtualMachine, VmConfig};
use std::path::PathBuf;
use tracing_log::log::debug;

const EX_OK: i32 = 0;
const EX_SOFTWARE: i32 = 1;
const EX_USAGE: i32 = 64;
const EX_NOINPUT: i32 = 66;
const EX_UNAVAILABLE: i32 = 69;

#[derive(Parser, Debug)]
#[command(name = "javelin", version, about = "An interpreter for Java 8 class files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a class from the classpath
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    #[arg(help = "Main class, dotted or internal form (e.g. pkg.Main or pkg/Main)")]
    main_class: String,
    #[arg(
        short = 'c',
        long = "classpath",
        visible_alias = "cp",
        default_value = ".",
        help = "Classpath entries (directories only); use ':' as separator"
    )]
    class_path: String,
    #[arg(long, help = "Name of the static method to execute (e.g. run)")]
    entry: Option<String>,
    #[arg(long, help = "Descriptor of the entry method (e.g. ()I)")]
    desc: Option<String>,
    #[arg(long = "log", help = "Log level filter (error, warn, info, debug, trace)")]
    log_level: Option<String>,
}

fn init_tracing(level: Option<&str>) {
    let filter = level
        .map(str::to_string)
        .or_else(|| std::env::var("JAVELIN_LOG").ok())
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn split_class_path(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn run(args: RunArgs) -> i32 {
    init_tracing(args.log_level.as_deref());
    debug!("parsed command line arguments: {:?}", args);

    let class_path = split_class_path(&args.class_path);
    let missing: Vec<&PathBuf> = class_path.iter().filter(|path| !path.is_dir()).collect();
    if !missing.is_empty() {
        eprintln!("javelin: classpath entries do not exist: {:?}", missing);
        return EX_NOINPUT;
    }

    let main_class = args.main_class.replace('.', "/");
    let (Some(entry), Some(desc)) = (args.entry, args.desc) else {
        eprintln!("javelin: running `main` without --entry/--desc is not implemented");
        return EX_UNAVAILABLE;
    };

    let config = VmConfig {
        class_path,
        main_class,
    };
    let mut vm = VirtualMachine::new(&config);
    match vm.run_static(&config.main_class, &entry, &desc) {
        Ok(Some(Value::Int(value))) => {
            println!("RET: {value}");
            EX_OK
        }
        Ok(_) => EX_OK,
        Err(error) => {
            eprintln!("javelin: {error}");
            EX_SOFTWARE
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // --help and --version land here as well; they are not failures
            let code = if error.use_stderr() { EX_USAGE } else { EX_OK };
            let _ = error.print();
            std::process::exit(code);
        }
    };
    let code = match cli.command {
        Command::Run(args) => run(args),
    };
    std::process::exit(code);
}
