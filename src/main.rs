use anyhow::Result;
use campus_store::cli::{self, OutputMode};
use campus_store::config::CampusConfig;
use campus_store::logging::init_logging;
use campus_store::model::{ApplicationStatus, Collection, Role};
use campus_store::store::{ApplicationFilter, OpportunityFilter, ReportFilter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "campus-store")]
#[command(about = "Query the campus opportunity marketplace store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Extra config file, applied after user and project config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, conflicts_with = "quiet")]
    json: bool,

    /// Print bare ids only
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List published opportunities of every kind
    Published,

    /// Query opportunities
    Opportunities {
        /// Owner user id
        #[arg(long)]
        owner: Option<String>,

        /// Only published (true) or unpublished (false) records
        #[arg(long)]
        published: Option<bool>,

        /// projects, student_projects or organizations
        #[arg(long)]
        kind: Option<Collection>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Treat the owner as a demo account signed in with this role
        #[arg(long)]
        as_role: Option<Role>,
    },

    /// Query applications
    Applications {
        /// Student user id
        #[arg(long)]
        student: Option<String>,

        /// Opportunity id
        #[arg(long)]
        opportunity: Option<String>,

        /// pending, accepted, waitlisted or rejected
        #[arg(long)]
        status: Option<ApplicationStatus>,

        /// Treat the student as a demo account signed in with this role
        #[arg(long)]
        as_role: Option<Role>,
    },

    /// Query weekly reports
    Reports {
        /// Student user id
        #[arg(long)]
        student: Option<String>,

        /// Professor or TA user id
        #[arg(long)]
        recipient: Option<String>,

        /// Treat the student as a demo account signed in with this role
        #[arg(long)]
        as_role: Option<Role>,
    },

    /// Look up an opportunity of any kind by id
    Resolve {
        /// Opportunity id
        id: String,
    },

    /// List professors and TAs who receive weekly reports
    Recipients,

    /// Show collection counts and store settings
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CampusConfig::load(None, cli.config.as_deref())?;
    let level = config.logging.level.as_deref().unwrap_or("info");
    let log_file = config.log_file()?;
    init_logging(cli.debug, cli.quiet, level, log_file.as_deref())?;

    let handler = cli::create_handler(OutputMode::from_flags(cli.json, cli.quiet));
    let mut store = cli::build_store(&config)?;

    let exit_code = match cli.command {
        Commands::Published => {
            cli::list_published(&store, &*handler);
            0
        }

        Commands::Opportunities {
            owner,
            published,
            kind,
            limit,
            as_role,
        } => {
            let filter = OpportunityFilter {
                owner_id: owner,
                published,
                collection: kind,
                limit,
            };
            cli::list_opportunities(&mut store, filter, as_role, &*handler);
            0
        }

        Commands::Applications {
            student,
            opportunity,
            status,
            as_role,
        } => {
            let filter = ApplicationFilter {
                student_id: student,
                opportunity_id: opportunity,
                status,
                ..Default::default()
            };
            cli::list_applications(&mut store, filter, as_role, &*handler);
            0
        }

        Commands::Reports {
            student,
            recipient,
            as_role,
        } => {
            let filter = ReportFilter {
                student_id: student,
                recipient_id: recipient,
                ..Default::default()
            };
            cli::list_reports(&mut store, filter, as_role, &*handler);
            0
        }

        Commands::Resolve { id } => cli::resolve(&store, &id, &*handler),

        Commands::Recipients => {
            cli::list_recipients(&store, &*handler);
            0
        }

        Commands::Status => {
            cli::status(&store, &config, &*handler);
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
