mod ai;
mod api;
mod cli;
mod error;
mod storage;
mod store;
mod task;

use clap::Parser;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = cli::open_store();

    // 无子命令：进入交互式菜单
    let Some(command) = cli.command else {
        cli::menu::execute(&store);
        return Ok(());
    };

    match command {
        Commands::Add {
            title,
            subject,
            notes,
            due,
            priority,
        } => cli::tasks::add(&store, title, subject, notes, due, priority),
        Commands::List => cli::tasks::list(&store),
        Commands::Filter {
            status,
            priority,
            subject,
        } => cli::tasks::filter(&store, status, priority, subject),
        Commands::Update {
            id,
            title,
            notes,
            subject,
            due,
            clear_due,
            priority,
            status,
        } => cli::tasks::update(
            &store, &id, title, notes, subject, due, clear_due, priority, status,
        ),
        Commands::Delete { id, yes } => cli::tasks::delete(&store, &id, yes),
        Commands::Upcoming { days } => cli::tasks::upcoming(&store, days),
        Commands::Summary => cli::tasks::summary(&store),
        Commands::Chat { message } => {
            let assistant = cli::open_assistant()?;
            cli::chat::execute(&store, &assistant, message)
        }
        Commands::Suggest { id } => {
            let assistant = cli::open_assistant()?;
            cli::chat::suggest(&store, &assistant, &id)
        }
        Commands::Subtasks { id } => {
            let assistant = cli::open_assistant()?;
            cli::chat::subtasks(&store, &assistant, &id)
        }
        Commands::Web { port } => tokio::runtime::Runtime::new()
            .expect("Failed to create tokio runtime")
            .block_on(cli::web::execute(port)),
    }
}
