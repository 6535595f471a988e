use std::env;
use std::ffi::OsStr;

use anyhow::Context as _;
use log::{error, info};

use week_logs::generate_week_reports;
use week_logs::input::Config;
use week_logs::sheets::{self, SheetsClient};

const CONFIG_FILE: &str = "config.json";
const CREDENTIALS_FILE: &str = "credentials.json";
const TOKEN_FILE: &str = "token.json";

fn set_env_if_absent<K: AsRef<OsStr>, V: AsRef<OsStr>>(var: K, default: impl FnOnce() -> V) {
    if env::var(var.as_ref()).is_err() {
        env::set_var(var, default());
    }
}

fn main() {
    set_env_if_absent("RUST_APP_LOG", || "info");
    color_backtrace::install();
    pretty_env_logger::init_custom_env("RUST_APP_LOG");

    if let Err(e) = run() {
        error!("{:?}", e);
        ::std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::try_from_file(CONFIG_FILE)
        .with_context(|| format!("failed to load the config `{}`", CONFIG_FILE))?;

    let access_token = sheets::authorize(CREDENTIALS_FILE, TOKEN_FILE)
        .context("failed to authorize the access to the sheet")?;
    let client = SheetsClient::new(access_token);

    for path in generate_week_reports(&config, &client)? {
        info!("wrote {}", path.display());
    }

    Ok(())
}
