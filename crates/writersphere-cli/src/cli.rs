//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use writersphere_core::{ArticleId, ArticleStatus, CatalogStatus, CategoryId, Role, SubcategoryId};

/// Writersphere - write, organize, and publish articles
#[derive(Parser, Debug)]
#[command(name = "writersphere", version)]
#[command(about = "Write, organize, and publish articles", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign up, sign in, and sign out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Category and subcategory counts
    Dashboard,
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage subcategories
    Subcategory {
        #[command(subcommand)]
        action: SubcategoryAction,
    },
    /// Write and manage articles
    Article {
        #[command(subcommand)]
        action: ArticleAction,
    },
    /// Read a published article
    Read {
        /// Article id
        id: ArticleId,
        /// Print the body as HTML
        #[arg(long, conflicts_with = "preview")]
        html: bool,
        /// Print only the opening paragraph
        #[arg(long)]
        preview: bool,
    },
    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Email and password, from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct Credentials {
    /// Account email
    #[arg(long, env = "WRITERSPHERE_EMAIL")]
    pub email: String,
    /// Account password
    #[arg(long, env = "WRITERSPHERE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// `auth` subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Create an account
    Signup {
        #[command(flatten)]
        credentials: Credentials,
        /// Writer or reader
        #[arg(long, default_value_t = Role::Writer)]
        role: Role,
    },
    /// Sign in with email and password
    Signin {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Sign out and forget the stored session
    Signout,
    /// Show who is signed in
    Whoami,
}

/// Fields shared by the category and subcategory forms.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogFields {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,
    /// Description; an empty value clears it
    #[arg(long)]
    pub description: Option<String>,
    /// active or inactive
    #[arg(long)]
    pub status: Option<CatalogStatus>,
    /// Image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// `category` subcommands.
#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    /// List categories, newest first
    List {
        /// Filter on name or description
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show a category and its subcategories
    Show {
        /// Category id
        id: CategoryId,
        /// Filter subcategories on name or description
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Create a category
    New {
        #[command(flatten)]
        fields: CatalogFields,
    },
    /// Change a category
    Edit {
        /// Category id
        id: CategoryId,
        #[command(flatten)]
        fields: CatalogFields,
    },
    /// Switch between active and inactive
    Toggle {
        /// Category id
        id: CategoryId,
    },
}

/// `subcategory` subcommands.
#[derive(Subcommand, Debug)]
pub enum SubcategoryAction {
    /// List subcategories with their category, newest first
    List {
        /// Filter on name, description, or category name
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Create a subcategory
    New {
        /// Parent category id
        #[arg(long)]
        category: Option<CategoryId>,
        #[command(flatten)]
        fields: CatalogFields,
    },
    /// Change a subcategory
    Edit {
        /// Subcategory id
        id: SubcategoryId,
        /// Move under another category
        #[arg(long)]
        category: Option<CategoryId>,
        #[command(flatten)]
        fields: CatalogFields,
    },
    /// Switch between active and inactive
    Toggle {
        /// Subcategory id
        id: SubcategoryId,
    },
    /// Delete a subcategory
    Delete {
        /// Subcategory id
        id: SubcategoryId,
    },
}

/// Article list filters.
#[derive(Args, Debug, Clone, Default)]
pub struct ListFilters {
    /// Search title and body
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only this status
    #[arg(long)]
    pub status: Option<ArticleStatus>,
    /// Only this category
    #[arg(long)]
    pub category: Option<CategoryId>,
    /// Only this subcategory
    #[arg(long)]
    pub subcategory: Option<SubcategoryId>,
    /// Articles with any of these tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// `article` subcommands.
#[derive(Subcommand, Debug)]
pub enum ArticleAction {
    /// Start a new draft
    New,
    /// List articles, most recently updated first
    List {
        #[command(flatten)]
        filters: ListFilters,
    },
    /// Search interactively: each line read from stdin replaces the query
    Search {
        #[command(flatten)]
        filters: ListFilters,
    },
    /// Show an article as the editor sees it
    Show {
        /// Article id
        id: ArticleId,
    },
    /// Change an article and save it
    Edit {
        /// Article id
        id: ArticleId,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// Replace the body with this file's contents
        #[arg(long)]
        body_file: Option<PathBuf>,
        /// Set the category
        #[arg(long, conflicts_with = "no_category")]
        category: Option<CategoryId>,
        /// Clear the category and subcategory
        #[arg(long)]
        no_category: bool,
        /// Set the subcategory
        #[arg(long)]
        subcategory: Option<SubcategoryId>,
        /// Add a tag
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Remove a tag
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
    },
    /// Move an article to another status
    Status {
        /// Article id
        id: ArticleId,
        /// draft, published, unpublished, archived, or deleted
        status: ArticleStatus,
    },
    /// Edit the body in a file; changes are autosaved until Ctrl-C
    Watch {
        /// Article id
        id: ArticleId,
        /// Markdown file to watch; created from the stored body if missing
        file: PathBuf,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Get a value by dotted key
    Get {
        /// Dotted key, e.g. `editor.autosave_secs`
        key: String,
    },
    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Write a default config file
    Init {
        /// Path to write instead of the default
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=value`
        #[arg(long)]
        docker_env: bool,
    },
}
