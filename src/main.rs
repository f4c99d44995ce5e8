use clap::Parser;
use weekflow::cli::commands::Cli;
use weekflow::cli::handlers;

fn main() {
    let cli = Cli::parse();

    let ctx = match handlers::context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    // Logging failures are not fatal
    if let Err(e) = weekflow::logging::init(&ctx.data_dir, &ctx.config.log.level) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let result = match cli.command {
        // No subcommand → launch TUI
        None => weekflow::tui::run(&ctx.config, &ctx.data_dir, cli.mode.as_deref()),
        Some(_) => handlers::dispatch(cli, &ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
