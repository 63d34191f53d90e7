use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use dialoguer::{Input, Password};
use followed_shows_config::{
    Config, CredentialStore, PathManager, TraktConfig, DEFAULT_TRAKT_API_URL, TRAKT_ACCESS_TOKEN_ENV,
};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Trakt { client_id, access_token, user } => {
            configure_trakt(client_id, access_token, user, output)
        }
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Run 'followed-shows config trakt' to create it.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let mut cred_store = CredentialStore::new(path_manager.credentials_file());
    cred_store.load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;
    let token_origin = token_source(&cred_store);

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut info_table = Table::new();
            info_table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            info_table.load_preset(comfy_table::presets::UTF8_FULL);
            info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", info_table);
            println!();

            if let Some(trakt) = &config.trakt {
                let mut trakt_table = Table::new();
                trakt_table.set_header(vec![
                    Cell::new("Trakt Configuration").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold)
                ]);
                trakt_table.add_row(vec![
                    Cell::new("Enabled"),
                    Cell::new(if trakt.enabled { "✓".green().to_string() } else { "✗".red().to_string() }),
                ]);
                let client_id_display = if full { trakt.client_id.clone() } else { mask_string(&trakt.client_id) };
                trakt_table.add_row(vec![Cell::new("Client ID"), Cell::new(client_id_display)]);
                trakt_table.add_row(vec![Cell::new("API URL"), Cell::new(&trakt.api_url)]);
                trakt_table.add_row(vec![
                    Cell::new("User"),
                    Cell::new(trakt.user.as_deref().unwrap_or("me (token owner)")),
                ]);
                let token_display = match cred_store.resolve_trakt_access_token() {
                    Some(token) if full => token,
                    Some(token) => mask_string(&token),
                    None => "<not set>".to_string(),
                };
                trakt_table.add_row(vec![
                    Cell::new("Access Token"),
                    Cell::new(format!("{} ({})", token_display, token_origin)),
                ]);
                if cred_store.is_trakt_token_expired() {
                    trakt_table.add_row(vec![Cell::new("Token Status"), Cell::new("expired".red().to_string())]);
                }
                trakt_table.load_preset(comfy_table::presets::UTF8_FULL);
                trakt_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                println!("{}", trakt_table);
                println!();
            } else {
                println!("{}", "Trakt: Not configured".bright_black());
                println!();
            }

            let mut retry_table = Table::new();
            retry_table.set_header(vec![
                Cell::new("Retry Policy").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold)
            ]);
            retry_table.add_row(vec![Cell::new("Max Attempts"), Cell::new(config.retry.max_attempts)]);
            retry_table.add_row(vec![Cell::new("Initial Delay"), Cell::new(format!("{} ms", config.retry.initial_delay_ms))]);
            retry_table.add_row(vec![Cell::new("Max Delay"), Cell::new(format!("{} ms", config.retry.max_delay_ms))]);
            retry_table.add_row(vec![Cell::new("Factor"), Cell::new(config.retry.factor)]);
            retry_table.load_preset(comfy_table::presets::UTF8_FULL);
            retry_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", retry_table);

            if let Err(e) = config.validate() {
                println!();
                output.warn(format!("Configuration is incomplete: {}", e));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let trakt = config.trakt.as_ref().map(|trakt| {
                json!({
                    "enabled": trakt.enabled,
                    "client_id": if full { trakt.client_id.clone() } else { mask_string(&trakt.client_id) },
                    "api_url": trakt.api_url,
                    "user": trakt.user,
                    "access_token_source": token_origin,
                    "token_expired": cred_store.is_trakt_token_expired(),
                })
            });
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "trakt": trakt,
                "retry": config.retry,
                "valid": config.validate().is_ok(),
            }));
        }
    }

    Ok(())
}

fn configure_trakt(
    client_id_arg: Option<String>,
    access_token_arg: Option<String>,
    user_arg: Option<String>,
    output: &Output,
) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager.ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let trakt_config = config.trakt.get_or_insert_with(|| TraktConfig {
        enabled: true,
        client_id: String::new(),
        api_url: DEFAULT_TRAKT_API_URL.to_string(),
        user: None,
    });

    let client_id = match client_id_arg {
        Some(id) => id,
        None => {
            let existing = Some(trakt_config.client_id.as_str())
                .filter(|id| !id.is_empty() && *id != "YOUR_CLIENT_ID");
            prompt_string("Trakt Client ID", existing)?
        }
    };
    validate_client_id(&client_id)
        .map_err(|e| color_eyre::eyre::eyre!("Validation error: {}", e))?;

    trakt_config.enabled = true;
    trakt_config.client_id = client_id.trim().to_string();
    if let Some(user) = user_arg {
        let user = user.trim().to_string();
        trakt_config.user = if user.is_empty() || user == "me" { None } else { Some(user) };
    }

    config.save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Saved Trakt configuration to {}", config_file.display()));

    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store.load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    let access_token = match access_token_arg {
        Some(token) => Some(token),
        None if cred_store.get_trakt_access_token().is_some() => None,
        None => Some(prompt_password("Trakt access token")?),
    };

    if let Some(token) = access_token {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(color_eyre::eyre::eyre!("Access token cannot be empty"));
        }
        // A replaced token has an unknown lifetime
        cred_store.clear_trakt();
        cred_store.set_trakt_access_token(token);
        cred_store.save()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;
        output.success(format!("Saved Trakt access token to {}", credentials_file.display()));
    } else {
        output.info("Keeping the stored Trakt access token");
    }

    tracing::info!("Trakt configuration updated");
    Ok(())
}

fn token_source(cred_store: &CredentialStore) -> &'static str {
    let from_env = std::env::var(TRAKT_ACCESS_TOKEN_ENV)
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false);
    if from_env {
        "environment"
    } else if cred_store.get_trakt_access_token().is_some() {
        "credentials file"
    } else {
        "missing"
    }
}

fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder.interact_text().map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read password: {}", e))
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_CLIENT_ID" {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

fn validate_client_id(input: &str) -> Result<(), &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Client ID cannot be empty");
    }
    if trimmed == "YOUR_CLIENT_ID" || trimmed.len() < 10 {
        return Err("Client ID seems too short. Please verify it's correct.");
    }
    Ok(())
}
