mod error;
mod flow;
mod parser;
mod schedule;
mod display;
mod export;
mod web;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use parser::{load_availability_csv, load_problem};
use schedule::find_best_schedule;
use display::{print_schedule, write_schedule, write_schedule_to_file};
use export::export_schedule_to_csv;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Assigns matches to hosts and timeslots using min-cost max-flow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a problem file and print the best schedule
    Solve {
        /// The JSON file describing days, sessions, people, matches and availability
        data_path: PathBuf,

        /// Optional CSV file with extra availability rows (role,name,day,session,kind)
        #[arg(short, long)]
        availability: Option<PathBuf>,

        /// Write the schedule blocks here instead of stdout
        #[arg(short, long)]
        output_path: Option<PathBuf>,

        /// Also export the schedule as CSV
        #[arg(long)]
        csv_output: Option<PathBuf>,

        /// Override the maximum number of parallel matches per timeslot
        #[arg(short, long)]
        max_parallel: Option<u32>,
    },

    /// Run the web server
    Serve {
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123")]
        admin_password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port, admin_password } => {
            println!("Starting web server on port {}...", port);
            println!("Access the API at http://localhost:{}/api", port);

            web::start_server(port, admin_password).await?;
        }
        Command::Solve {
            data_path,
            availability,
            output_path,
            csv_output,
            max_parallel,
        } => {
            println!("Loading problem from {}...", data_path.display());
            let mut problem = load_problem(&data_path)?;

            if let Some(csv_path) = availability {
                let rows = load_availability_csv(&csv_path, &mut problem)?;
                println!("Merged {} availability rows from {}", rows, csv_path.display());
            }
            if let Some(max_parallel) = max_parallel {
                problem.max_parallel = max_parallel;
            }

            println!(
                "Loaded {} matches, {} hosts, {} contestants",
                problem.matches.len(),
                problem.hosts.len(),
                problem.contestants.len()
            );

            let best = find_best_schedule(&problem)?;

            match output_path {
                Some(path) => {
                    print_schedule(&best);
                    write_schedule_to_file(&best, &path)?;
                    println!("\nSchedule saved to {}", path.display());
                }
                None => write_schedule(&best, &mut std::io::stdout().lock())?,
            }

            if let Some(path) = csv_output {
                export_schedule_to_csv(&best, &path)?;
                println!("CSV export saved to {}", path.display());
            }
        }
    }

    Ok(())
}
