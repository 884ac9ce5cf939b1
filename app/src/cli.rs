use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use genealogy::{EventCategory, Gender};

#[derive(Parser, Debug)]
#[command(name = "genealogy-app")]
#[command(about = "Keep family books: members, ancestry trees and the Five Degrees of Mourning")]
pub struct Cli {
    /// Snapshot file holding the family books. Created on first mutation.
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the effective configuration
    Config,
    #[command(subcommand)]
    Family(FamilyCommand),
    #[command(subcommand)]
    Person(PersonCommand),
    /// Ancestry tree of a family
    Tree {
        family: u64,
        /// Start from this member instead of every root
        #[arg(long)]
        root: Option<u64>,
        #[arg(long)]
        max_depth: Option<usize>,
        #[arg(long)]
        hide_female: bool,
    },
    /// Father to child settlement moves of a family
    Migration { family: u64 },
    /// Five Degrees of Mourning chart around a member
    Wufu { person: u64 },
    /// Relationship between two members
    Relation { a: u64, b: u64 },
    /// Draft a biography with the narrative service
    Bio {
        person: u64,
        /// Store the draft on the member record
        #[arg(long)]
        save: bool,
    },
    #[command(subcommand)]
    Surname(SurnameCommand),
    #[command(subcommand)]
    Region(RegionCommand),
    /// Write every family book to a snapshot file
    Export { path: PathBuf },
    /// Replace every family book with a snapshot file
    Import { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum FamilyCommand {
    List,
    Show { id: u64 },
    Create {
        #[arg(long)]
        surname: String,
        #[arg(long)]
        hall: String,
        #[arg(long, default_value = "")]
        origin: String,
        /// Given name of the founding ancestor
        #[arg(long)]
        ancestor: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        hall: Option<String>,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        ancestor: Option<String>,
        #[arg(long)]
        motto: Option<String>,
        #[arg(long)]
        poem: Option<String>,
    },
    /// Preview the deletion, or apply it with --yes
    Delete {
        id: u64,
        #[arg(long)]
        yes: bool,
    },
    Event {
        id: u64,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value = "achievement")]
        category: CategoryArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum PersonCommand {
    List { family: u64 },
    Show { id: u64 },
    Add {
        family: u64,
        #[command(flatten)]
        fields: PersonFields,
    },
    /// Replace fields of an existing member; unset flags keep stored values
    Edit {
        id: u64,
        #[command(flatten)]
        fields: PersonFields,
    },
    /// Preview the cascade, or apply it with --yes
    Delete {
        family: u64,
        id: u64,
        #[arg(long)]
        yes: bool,
    },
    /// Candidate fathers for a new member of `generation`
    Fathers { family: u64, generation: i32 },
}

#[derive(Args, Debug, Default)]
pub struct PersonFields {
    #[arg(long)]
    pub surname: Option<String>,
    #[arg(long)]
    pub given: Option<String>,
    #[arg(long)]
    pub courtesy: Option<String>,
    #[arg(long)]
    pub art: Option<String>,
    #[arg(long, value_enum)]
    pub gender: Option<GenderArg>,
    #[arg(long, allow_hyphen_values = true)]
    pub birth: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    pub death: Option<i32>,
    #[arg(long)]
    pub generation: Option<i32>,
    #[arg(long)]
    pub generation_name: Option<String>,
    #[arg(long)]
    pub father: Option<u64>,
    /// `#id` for a recorded member, otherwise a name
    #[arg(long)]
    pub mother: Option<String>,
    /// Repeat for several spouses; replaces the stored list
    #[arg(long = "spouse")]
    pub spouses: Vec<String>,
    #[arg(long)]
    pub place: Option<String>,
    #[arg(long)]
    pub province: Option<String>,
    #[arg(long)]
    pub biography: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SurnameCommand {
    List,
    Show { character: String },
    Add {
        character: String,
        #[arg(long)]
        pinyin: String,
        #[arg(long)]
        origin: String,
        #[arg(long, default_value = "")]
        distribution: String,
        #[arg(long = "ancestor")]
        famous_ancestors: Vec<String>,
        #[arg(long)]
        rank: Option<u32>,
        /// Replace an existing entry
        #[arg(long)]
        replace: bool,
    },
    Hall {
        character: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        region: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegionCommand {
    List,
    Add { name: String, province: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CategoryArg {
    Birth,
    Death,
    Marriage,
    Migration,
    Achievement,
    Disaster,
}

impl From<CategoryArg> for EventCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Birth => EventCategory::Birth,
            CategoryArg::Death => EventCategory::Death,
            CategoryArg::Marriage => EventCategory::Marriage,
            CategoryArg::Migration => EventCategory::Migration,
            CategoryArg::Achievement => EventCategory::Achievement,
            CategoryArg::Disaster => EventCategory::Disaster,
        }
    }
}
