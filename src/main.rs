use clap::Parser;
use passman::cli::commands::{self, set::SetArgs};
use passman::cli::{Cli, Commands};
use passman::passgen::CharSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "passman=debug"
    } else {
        "passman=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Init { log_n, r, p } => commands::init::execute(&cli, log_n, r, p),
        Commands::Get { ref id } => commands::get::execute(&cli, id),
        Commands::Set {
            ref id,
            ref name,
            ref meta,
            ref rename,
            password,
        } => {
            let args = SetArgs {
                name: name.as_deref(),
                meta,
                rename: rename.as_deref(),
                password,
            };
            commands::set::execute(&cli, id, &args)
        }
        Commands::Delete { ref id, force } => commands::delete::execute(&cli, id, force),
        Commands::List { ref pattern } => commands::list::execute(&cli, pattern.as_deref()),
        Commands::Stat => commands::stat::execute(&cli),
        Commands::SetParam { param, value } => commands::set_param::execute(&cli, param, value),
        Commands::Gen {
            length,
            count,
            lower,
            upper,
            digit,
            symbol,
        } => commands::gen::execute(
            length,
            count,
            CharSet {
                lower,
                upper,
                digit,
                symbol,
            },
        ),
        Commands::Export { ref output } => commands::export::execute(&cli, output.as_deref()),
        Commands::Clip {
            ref id,
            ref field,
            timeout,
        } => commands::clip::execute(&cli, id, field, timeout),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passman::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
