pub mod config;
mod db;

use anyhow::Context;
use clap::Parser;
use std::{fs, path::PathBuf};

use self::config::{Config, EnvOverride};

#[derive(Parser)]
#[clap(long_about = None)]
struct Cli {
    #[clap(short, long, env = "AMANAH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
    #[clap(
        long,
        env = "AMANAH_HOME",
        default_value = ".amanah",
        value_name = "DIRECTORY"
    )]
    amanah_home: String,
    #[clap(env = "PG_CON")]
    pg_con: String,
    #[clap(long, env = "AMANAH_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_config(
        cli.config,
        EnvOverride {
            db_con: cli.pg_con,
            jwt_secret: cli.jwt_secret,
        },
    )?;

    run_cmd(&cli.amanah_home, config).await?;

    Ok(())
}

async fn run_cmd(amanah_home: &str, config: Config) -> anyhow::Result<()> {
    amanah_tracing::init_tracer(config.tracing)?;
    store_server_pid(amanah_home, std::process::id())?;
    let pool = db::init_pool(&config.db).await?;
    let app = crate::app::AmanahApp::run(pool, config.app).await?;
    let res = crate::server::run(config.server, config.auth, app).await;
    amanah_tracing::shutdown_tracer();
    res
}

pub fn store_server_pid(amanah_home: &str, pid: u32) -> anyhow::Result<()> {
    create_amanah_dir(amanah_home)?;
    let _ = fs::remove_file(format!("{amanah_home}/server-pid"));
    fs::write(format!("{amanah_home}/server-pid"), pid.to_string())
        .context("Writing PID file")?;
    Ok(())
}

fn create_amanah_dir(amanah_home: &str) -> anyhow::Result<()> {
    let _ = fs::create_dir(amanah_home);
    Ok(())
}
