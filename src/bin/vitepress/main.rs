use clap::Parser as _;

mod args;
mod debug;
mod error;

fn main() {
    human_panic::setup_panic!();
    let result = run();
    proc_exit::exit(result);
}

fn run() -> proc_exit::ExitResult {
    let cli = Cli::parse();

    cli.color.write_global();
    let colored_stderr = !matches!(
        anstream::AutoStream::choice(&std::io::stderr()),
        colorchoice::ColorChoice::Never
    );
    args::init_logging(&cli.verbose, colored_stderr);

    let result = match &cli.command {
        Command::Debug(cmd) => cmd.run(),
    };
    result.map_err(|e| {
        proc_exit::Exit::new(proc_exit::Code::FAILURE).with_message(format!("{e:#}"))
    })?;

    Ok(())
}

/// Inspect how a VitePress site's configuration resolves
#[derive(Clone, Debug, clap::Parser)]
#[command(name = "vitepress", version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    color: colorchoice_clap::Color,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
enum Command {
    #[command(subcommand)]
    Debug(debug::DebugCommands),
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
