use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;

use rollcall_cli::seeder::{self, SeedConfig};
use rollcall_config::DatabaseConfig;
use rollcall_db::{PgPool, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "rollcall-cli")]
#[command(about = "Rollcall CLI - Database tools for Rollcall", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Seed the database with fake classes, teachers and students
    Seed {
        /// Number of classes to create
        #[arg(short = 'c', long, default_value = "5")]
        classes: usize,

        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "5")]
        teachers: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "100")]
        students: usize,

        /// Student limit for every seeded class
        #[arg(short = 'l', long, default_value = "30")]
        student_limit: i32,
    },
    /// Delete all classes, teachers and students
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::Seed {
            classes,
            teachers,
            students,
            student_limit,
        } => {
            let config =
                SeedConfig::new(classes, teachers, students).with_student_limit(student_limit);
            handle_seed(&pool, config).await
        }
        Commands::Clear { yes } => handle_clear(&pool, yes).await,
    }
}

async fn handle_migrate(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool).await?;
    println!("✅ Migrations applied");
    Ok(())
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    if config.students > config.capacity() {
        println!(
            "⚠️  {} students exceed the {} available seats; the rest stay unassigned",
            config.students,
            config.capacity()
        );
    }

    let summary = seeder::seed_all(pool, config)
        .await
        .context("Error seeding database")?;

    println!(
        "   {} classes, {} teachers ({} assigned), {} students ({} enrolled)",
        summary.classes,
        summary.teachers,
        summary.teacher_links,
        summary.students,
        summary.enrolments
    );
    Ok(())
}

async fn handle_clear(pool: &PgPool, yes: bool) -> anyhow::Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("This deletes every class, teacher and student. Continue?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;

    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    seeder::clear_all(pool)
        .await
        .context("Error clearing database")?;
    println!("✅ Database cleared");
    Ok(())
}
