//! Genealogy desk application
//!
//! Console front end over the command layer. Every command prints its
//! result as JSON; `--data` keeps the family books between runs.

mod cli;
mod commands;
mod state;

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Command, FamilyCommand, PersonCommand, PersonFields, RegionCommand, SurnameCommand};
use genealogy::config::AppConfig;
use genealogy::narrative::{GeminiClient, NarrativeService};
use genealogy::seed::default_registry;
use genealogy::tree::TreeOptions;
use genealogy::{ClanInfo, Gender, Hall, Location, NewFamily, Person, Registry, SurnameData};
use state::{parse_reference, AppState};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&config.log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = match &cli.data {
        Some(path) if path.exists() => {
            let (registry, result) = Registry::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            info!("Loaded {} families from {}", result.families, path.display());
            registry
        }
        _ => default_registry(),
    };

    let app_state = AppState {
        registry: Arc::new(Mutex::new(registry)),
        narrator: narrator(&config),
        config,
        data_path: cli.data.clone(),
    };

    run(&app_state, cli.command)
}

fn log_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

fn narrator(config: &AppConfig) -> Option<Arc<dyn NarrativeService>> {
    let settings = config.narrative.gemini()?;
    match GeminiClient::new(settings) {
        Ok(client) => {
            info!("Narrative service: {}", client.model());
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("Narrative service disabled: {}", e);
            None
        }
    }
}

fn print<T: Serialize>(result: Result<T, String>) -> anyhow::Result<()> {
    let value = result.map_err(|e| anyhow!(e))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    use commands::{config, kinship, persist, snapshot, surnames, tree};

    match command {
        Command::Config => print(Ok(config::get_config(state))),
        Command::Family(command) => run_family(state, command),
        Command::Person(command) => run_person(state, command),
        Command::Tree {
            family,
            root,
            max_depth,
            hide_female,
        } => {
            let options = TreeOptions {
                max_depth: max_depth.unwrap_or(state.config.tree.max_depth),
                show_female: state.config.tree.show_female && !hide_female,
            };
            print(tree::get_family_tree(state, family, root, Some(options)))
        }
        Command::Migration { family } => print(tree::get_migration_map(state, family)),
        Command::Wufu { person } => print(kinship::get_wufu_chart(state, person)),
        Command::Relation { a, b } => print(kinship::analyze_relationship(state, a, b)),
        Command::Bio { person, save } => print(kinship::generate_biography(state, person, save)),
        Command::Surname(command) => run_surname(state, command),
        Command::Region(RegionCommand::List) => print(surnames::get_regions(state)),
        Command::Region(RegionCommand::Add { name, province }) => {
            print(surnames::add_region(state, &name, &province))
        }
        Command::Export { path } => print(snapshot::save_snapshot(state, &path)),
        Command::Import { path } => {
            let loaded = snapshot::load_snapshot(state, &path);
            if loaded.is_ok() {
                let registry = state.registry().map_err(|e| anyhow!(e))?;
                persist(state, &registry).map_err(|e| anyhow!(e))?;
            }
            print(loaded)
        }
    }
}

fn run_family(state: &AppState, command: FamilyCommand) -> anyhow::Result<()> {
    use commands::families;

    match command {
        FamilyCommand::List => print(families::list_families(state)),
        FamilyCommand::Show { id } => print(families::get_family(state, id)),
        FamilyCommand::Create {
            surname,
            hall,
            origin,
            ancestor,
        } => print(families::create_family(
            state,
            NewFamily {
                surname,
                hall_name: hall,
                origin,
                ancestor,
            },
        )),
        FamilyCommand::Update {
            id,
            hall,
            origin,
            ancestor,
            motto,
            poem,
        } => {
            let current = families::get_family(state, id).map_err(|e| anyhow!(e))?.info;
            let info = ClanInfo {
                surname: current.surname,
                hall_name: hall.unwrap_or(current.hall_name),
                origin: origin.unwrap_or(current.origin),
                ancestor: ancestor.unwrap_or(current.ancestor),
                motto: motto.unwrap_or(current.motto),
                generation_poem: poem.unwrap_or(current.generation_poem),
            };
            print(families::update_clan_info(state, id, info))
        }
        FamilyCommand::Delete { id, yes } => print(families::delete_family(state, id, yes)),
        FamilyCommand::Event {
            id,
            year,
            title,
            description,
            category,
        } => print(families::add_event(state, id, year, title, description, category.into())),
    }
}

fn run_person(state: &AppState, command: PersonCommand) -> anyhow::Result<()> {
    use commands::{families, people};

    match command {
        PersonCommand::List { family } => print(people::get_family_members(state, family)),
        PersonCommand::Show { id } => print(people::get_person(state, id)),
        PersonCommand::Add { family, fields } => {
            let surname = match &fields.surname {
                Some(surname) => surname.clone(),
                None => families::get_family(state, family).map_err(|e| anyhow!(e))?.info.surname,
            };
            let given = fields
                .given
                .clone()
                .ok_or_else(|| anyhow!("--given is required for a new member"))?;
            let id = people::allocate_person_id(state).map_err(|e| anyhow!(e))?;
            let gender = fields.gender.map(Gender::from).unwrap_or(Gender::Male);
            let person = apply_fields(Person::new(id, surname, given, gender, 1), fields);
            print(people::save_person(state, family, person))
        }
        PersonCommand::Edit { id, fields } => {
            let (family, record) = people::get_person_record(state, id).map_err(|e| anyhow!(e))?;
            print(people::save_person(state, family, apply_fields(record, fields)))
        }
        PersonCommand::Delete { family, id, yes } => print(people::delete_person(state, family, id, yes)),
        PersonCommand::Fathers { family, generation } => {
            print(people::get_potential_fathers(state, family, generation))
        }
    }
}

fn run_surname(state: &AppState, command: SurnameCommand) -> anyhow::Result<()> {
    use commands::surnames;

    match command {
        SurnameCommand::List => print(surnames::get_surnames(state)),
        SurnameCommand::Show { character } => print(surnames::get_surname(state, &character)),
        SurnameCommand::Add {
            character,
            pinyin,
            origin,
            distribution,
            famous_ancestors,
            rank,
            replace,
        } => {
            let data = SurnameData {
                character,
                pinyin,
                origin,
                totem_description: None,
                halls: Vec::new(),
                famous_ancestors,
                distribution,
                population_rank: rank,
            };
            print(surnames::save_surname(state, data, replace))
        }
        SurnameCommand::Hall {
            character,
            name,
            description,
            region,
        } => print(surnames::add_hall(
            state,
            &character,
            Hall {
                name,
                description,
                region,
            },
        )),
    }
}

/// Overlay the fields given on the command line onto a record.
fn apply_fields(mut person: Person, fields: PersonFields) -> Person {
    if let Some(surname) = fields.surname {
        person.surname = surname;
    }
    if let Some(given) = fields.given {
        person.given_name = given;
    }
    if fields.courtesy.is_some() {
        person.courtesy_name = fields.courtesy;
    }
    if fields.art.is_some() {
        person.art_name = fields.art;
    }
    if let Some(gender) = fields.gender {
        person.gender = gender.into();
    }
    if let Some(birth) = fields.birth {
        person.birth_year = birth;
    }
    if fields.death.is_some() {
        person.death_year = fields.death;
    }
    if let Some(generation) = fields.generation {
        person.generation = generation;
    }
    if let Some(name) = fields.generation_name {
        person.generation_name = name;
    }
    if fields.father.is_some() {
        person.father_id = fields.father.map(genealogy::PersonId);
    }
    if let Some(mother) = fields.mother {
        person.mother = Some(parse_reference(&mother));
    }
    if !fields.spouses.is_empty() {
        person.spouses = fields.spouses.iter().map(|s| parse_reference(s)).collect();
    }
    if let Some(place) = fields.place {
        let province = fields.province.unwrap_or_default();
        person.location = Some(Location::new(place, province));
    }
    if fields.biography.is_some() {
        person.biography = fields.biography;
    }
    person
}
