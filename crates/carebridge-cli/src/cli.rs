//! CLI argument definitions.

use clap::{Parser, Subcommand};

use carebridge_core::models::{ActivityType, Role, ALL_CATEGORIES};
use carebridge_core::nav::Route;

/// Terminal front end for CareBridge: children, mentors, resources and community.
#[derive(Parser, Debug)]
#[command(name = "carebridge")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in
    Login {
        /// Email address (defaults to CAREBRIDGE_EMAIL, then the last one used)
        email: Option<String>,
    },

    /// Create an account and sign in
    Register {
        name: String,
        email: String,
        /// parent or mentor
        role: Role,
    },

    /// Sign out and forget the stored credential
    Logout,

    /// Show the signed-in user
    #[command(name = "whoami")]
    WhoAmI,

    /// Children, mentor and sessions for parents; clients and sessions for mentors
    Dashboard,

    #[command(flatten)]
    Data(DataCommand),
}

/// Commands that read or write service data for the signed-in user
#[derive(Subcommand, Debug)]
pub enum DataCommand {
    /// List your children
    Children,

    /// Add a child
    AddChild {
        name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        born: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        /// Diagnosis date (YYYY-MM-DD)
        #[arg(long)]
        diagnosed: Option<String>,
    },

    /// Show a child's growth measurements
    Growth { child_id: i64 },

    /// Record a growth measurement
    LogGrowth {
        child_id: i64,
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Head circumference in centimetres
        #[arg(long)]
        head: Option<f64>,
        /// Free-text note
        note: Vec<String>,
    },

    /// Show a child's activities
    Activities { child_id: i64 },

    /// Schedule an activity for a child
    AddActivity {
        child_id: i64,
        /// learning, speech, therapy or play
        #[arg(long = "type", default_value = "learning")]
        activity_type: ActivityType,
        /// When it happens (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        when: String,
        #[arg(required = true)]
        title: Vec<String>,
    },

    /// List available mentors
    Mentors,

    /// Connect with a mentor
    Connect { mentor_id: i64 },

    /// List mentoring sessions
    Sessions,

    /// Schedule a mentoring session (mentors)
    CreateSession {
        /// Start time (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        when: String,
        /// Meeting link
        #[arg(long)]
        link: String,
        #[arg(required = true)]
        title: Vec<String>,
    },

    /// List connected parents (mentors)
    Clients,

    /// Browse the resource library
    Resources {
        /// Category filter; "All" shows everything
        category: Option<String>,
    },

    /// Publish a resource (mentors)
    AddResource {
        #[arg(value_parser = parse_category)]
        category: String,
        /// Article, Video, PDF ...
        #[arg(long = "type", default_value = "Article")]
        kind: String,
        #[arg(long)]
        url: String,
        #[arg(required = true)]
        title: Vec<String>,
    },

    /// Delete a resource you published (mentors)
    DeleteResource { resource_id: i64 },

    /// Read the community board
    Posts {
        /// Channel filter; "All Posts" shows everything
        category: Option<String>,
    },

    /// Write a community post
    Post {
        #[arg(long, default_value = "General")]
        category: String,
        #[arg(required = true)]
        content: Vec<String>,
    },

    /// Like a post
    Like { post_id: i64 },

    /// Read a post's comments
    Comments { post_id: i64 },

    /// Comment on a post
    Comment {
        post_id: i64,
        #[arg(required = true)]
        content: Vec<String>,
    },
}

/// Resource categories a mentor may publish under ("All" is only a filter)
fn parse_category(value: &str) -> Result<String, String> {
    ALL_CATEGORIES[1..]
        .iter()
        .find(|c| c.eq_ignore_ascii_case(value.trim()))
        .map(|c| c.to_string())
        .ok_or_else(|| format!("expected one of {}", ALL_CATEGORIES[1..].join(", ")))
}

/// Join trailing words into free text
pub fn text(words: &[String]) -> String {
    words.join(" ")
}

impl Command {
    /// The view a command belongs to, checked against the route guard
    pub fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout => Route::Login,
            Command::Register { .. } => Route::Register,
            Command::WhoAmI | Command::Dashboard => Route::Dashboard,
            Command::Data(command) => command.route(),
        }
    }
}

impl DataCommand {
    pub fn route(&self) -> Route {
        match self {
            DataCommand::Children
            | DataCommand::AddChild { .. }
            | DataCommand::Growth { .. }
            | DataCommand::LogGrowth { .. }
            | DataCommand::Activities { .. }
            | DataCommand::AddActivity { .. }
            | DataCommand::Mentors
            | DataCommand::Connect { .. }
            | DataCommand::Clients => Route::Dashboard,
            DataCommand::Sessions | DataCommand::CreateSession { .. } => Route::Schedule,
            DataCommand::Resources { .. }
            | DataCommand::AddResource { .. }
            | DataCommand::DeleteResource { .. } => Route::Resources,
            DataCommand::Posts { .. }
            | DataCommand::Post { .. }
            | DataCommand::Like { .. }
            | DataCommand::Comments { .. }
            | DataCommand::Comment { .. } => Route::Community,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(line: &str) -> Result<Command, clap::Error> {
        let args = std::iter::once("carebridge").chain(line.split_whitespace());
        Cli::try_parse_from(args).map(|cli| cli.command)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_register_role() {
        match parse("register Mo mo@example.com Mentor").expect("parse") {
            Command::Register { name, email, role } => {
                assert_eq!(name, "Mo");
                assert_eq!(email, "mo@example.com");
                assert_eq!(role, Role::Mentor);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse("register Mo mo@example.com admin").is_err());
    }

    #[test]
    fn test_parse_growth_measurement() {
        match parse("log-growth 3 --height 101.5 after the holidays").expect("parse") {
            Command::Data(DataCommand::LogGrowth {
                child_id,
                height,
                weight,
                note,
                ..
            }) => {
                assert_eq!(child_id, 3);
                assert_eq!(height, Some(101.5));
                assert_eq!(weight, None);
                assert_eq!(text(&note), "after the holidays");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse("growth three").is_err());
    }

    #[test]
    fn test_parse_activity_type() {
        match parse("add-activity 3 --type speech --when 2024-04-01T09:00 Flash cards")
            .expect("parse")
        {
            Command::Data(DataCommand::AddActivity {
                activity_type,
                title,
                ..
            }) => {
                assert_eq!(activity_type, ActivityType::Speech);
                assert_eq!(text(&title), "Flash cards");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse("add-activity 3 --type chores --when 2024-04-01T09:00 Dishes").is_err());
    }

    #[test]
    fn test_free_text_is_required() {
        assert!(parse("comment 4").is_err());
        assert!(parse("post --category General").is_err());
    }

    #[test]
    fn test_resource_category_is_checked() {
        match parse("add-resource speech --url https://x.test Talk").expect("parse") {
            Command::Data(DataCommand::AddResource { category, kind, .. }) => {
                assert_eq!(category, "Speech");
                assert_eq!(kind, "Article");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse("add-resource All --url https://x.test Talk").is_err());
    }

    #[test]
    fn test_command_routes() {
        assert_eq!(parse("whoami").expect("parse").route(), Route::Dashboard);
        assert!(!parse("logout").expect("parse").route().is_protected());
        assert!(!parse("login").expect("parse").route().is_protected());
        assert_eq!(parse("sessions").expect("parse").route(), Route::Schedule);
        assert_eq!(parse("posts").expect("parse").route(), Route::Community);
        assert_eq!(parse("delete-resource 4").expect("parse").route(), Route::Resources);
    }

    #[test]
    fn test_no_arguments_prints_help() {
        assert!(parse("").is_err());
    }
}
