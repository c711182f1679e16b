use anyhow::{Result, anyhow};
use std::process::ExitCode;
use std::sync::Arc;

use superid::config::{self, AppConfig};
use superid::shell::ShellConfig;
use superid::store::{LocalStore, Vault};
use superid::{App, Shell, init_logging};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            log::error!("Fatal: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let config_path = config::default_config_path();
    let mut config = AppConfig::load(&config_path)?;
    if config.ensure_device_id()? {
        config.save(&config_path)?;
    }

    init_logging(&config.log_config())?;
    if let Err(e) = config.parse_level() {
        log::warn!("Unknown log level '{}' ({}), using info", config.log_level, e);
    }

    println!("Welcome to SuperID!");
    let is_new = Vault::is_new_at(&config.vault_path);
    let master_password = prompt_master_password(is_new)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let vault = Vault::new(config.vault_path.clone(), master_password);
    let store = runtime
        .block_on(LocalStore::open(vault))
        .map_err(|e| anyhow!("Could not unlock vault: {}", e))?;

    let mut app = App::new(Arc::new(store), &config);
    let shell = Shell::with_config(ShellConfig::from_app_config(&config));
    shell.run(&mut app, runtime.handle())
}

fn prompt_master_password(is_new: bool) -> Result<String> {
    if is_new {
        println!("No vault found. Choose a MASTER password to create one.");
    } else {
        println!("Please enter your MASTER password to unlock the vault.");
    }

    let password = rpassword::prompt_password("Master Password: ")
        .map_err(|e| anyhow!("Error reading master password: {}", e))?;
    if password.is_empty() {
        return Err(anyhow!("master password cannot be empty"));
    }

    if is_new {
        let confirm = rpassword::prompt_password("Confirm Master Password: ")
            .map_err(|e| anyhow!("Error reading master password: {}", e))?;
        if confirm != password {
            return Err(anyhow!("passwords do not match"));
        }
    }
    Ok(password)
}
