use crate::output::{Output, OutputFormat};
use crate::ShowArgs;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use followed_shows_config::{Config, CredentialStore, PathManager};
use followed_shows_core::{trakt_resolver, FollowedListResolver};
use followed_shows_models::{RemoteList, ShowRef};
use followed_shows_sources::TraktClient;
use serde_json::json;

fn build_resolver() -> Result<FollowedListResolver<TraktClient>> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config.validate()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration validation failed: {}. Run 'followed-shows config trakt' first.", e))?;

    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store.load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    Ok(trakt_resolver(&config, cred_store))
}

fn show_ref(args: ShowArgs) -> Result<ShowRef> {
    let mut show = ShowRef::new();
    if let Some(id) = args.trakt {
        show = show.with_trakt_id(id);
    }
    if let Some(id) = args.imdb {
        show = show.with_imdb_id(id);
    }
    if let Some(id) = args.tmdb {
        show = show.with_tmdb_id(id);
    }

    if show.is_empty() {
        return Err(color_eyre::eyre::eyre!("Specify at least one of --trakt, --imdb or --tmdb"));
    }
    Ok(show)
}

fn describe_list(list: &RemoteList) -> String {
    format!("\"{}\" (id {}, {}, {} items)", list.name, list.id, list.privacy.as_str(), list.item_count)
}

pub async fn run_resolve(output: &Output) -> Result<()> {
    let resolver = build_resolver()?;
    let list = resolver.resolve_followed_list().await?;

    match output.format() {
        OutputFormat::Human => output.success(format!("Followed list {}", describe_list(&list))),
        OutputFormat::Json | OutputFormat::JsonPretty => output.json(&serde_json::to_value(&list)?),
    }
    Ok(())
}

pub async fn run_list(output: &Output) -> Result<()> {
    let resolver = build_resolver()?;
    let list = resolver.resolve_followed_list().await?;
    let shows = resolver.list_shows_in_list(list.id).await?;
    tracing::debug!("Fetched {} followed shows from list {}", shows.len(), list.id);

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if shows.is_empty() {
                output.info(format!("No shows in followed list {}", describe_list(&list)));
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Trakt").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("IMDB").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("TMDB").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Followed").add_attribute(comfy_table::Attribute::Bold),
            ]);
            for (entry, show) in &shows {
                table.add_row(vec![
                    Cell::new(&show.title),
                    Cell::new(show.year.map(|y| y.to_string()).unwrap_or_default()),
                    Cell::new(show.ids.trakt_id.map(|id| id.to_string()).unwrap_or_default()),
                    Cell::new(show.ids.imdb_id.clone().unwrap_or_default()),
                    Cell::new(show.ids.tmdb_id.map(|id| id.to_string()).unwrap_or_default()),
                    Cell::new(entry.followed_at.map(|at| at.format("%Y-%m-%d").to_string()).unwrap_or_default()),
                ]);
            }
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
            output.info(format!("{} followed shows", shows.len()));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let items: Vec<_> = shows
                .iter()
                .map(|(entry, show)| json!({ "followed": entry, "show": show }))
                .collect();
            output.json(&json!({
                "list": list,
                "shows": items,
            }));
        }
    }
    Ok(())
}

pub async fn run_follow(args: ShowArgs, output: &Output) -> Result<()> {
    let show = show_ref(args)?;
    let resolver = build_resolver()?;
    let list = resolver.resolve_followed_list().await?;
    resolver.add_shows_to_list(list.id, std::slice::from_ref(&show)).await?;

    output.success(format!(
        "Followed {} in list {}",
        show.primary_id().unwrap_or_default(),
        describe_list(&list)
    ));
    Ok(())
}

pub async fn run_unfollow(args: ShowArgs, output: &Output) -> Result<()> {
    let show = show_ref(args)?;
    let resolver = build_resolver()?;
    let list = resolver.resolve_followed_list().await?;
    resolver.remove_shows_from_list(list.id, std::slice::from_ref(&show)).await?;

    output.success(format!(
        "Unfollowed {} from list {}",
        show.primary_id().unwrap_or_default(),
        describe_list(&list)
    ));
    Ok(())
}
