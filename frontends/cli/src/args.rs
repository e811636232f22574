use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "gallery")]
#[command(about = "Browse, reorder and delete images in your gallery")]
pub struct Args {
    /// YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and store the session token
    Login { email: String, password: String },

    /// Create an account
    Register {
        email: String,
        phone: String,
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// List images in display order
    List {
        /// Only show images with this exact title, ignoring case
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Move the image at one position to another
    Reorder {
        from: usize,
        to: usize,

        /// Positions count within the images matching this title
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Delete images by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("gallery").chain(line.split_whitespace()))
    }

    #[test]
    fn test_global_options_anywhere() {
        let parsed = args("list --config gallery.yaml --search Cat").unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("gallery.yaml")));
        assert_eq!(
            parsed.command,
            Command::List {
                search: Some("Cat".into())
            }
        );

        let parsed = args("--log-file gallery.log logout").unwrap();
        assert_eq!(parsed.log_file, Some(PathBuf::from("gallery.log")));
        assert_eq!(parsed.command, Command::Logout);
    }

    #[test]
    fn test_reorder_indices() {
        let parsed = args("reorder 0 2").unwrap();
        assert_eq!(
            parsed.command,
            Command::Reorder {
                from: 0,
                to: 2,
                search: None
            }
        );
        assert!(args("reorder 0 two").is_err());
        assert!(args("reorder -1 2").is_err());
        assert!(args("reorder 1").is_err());
    }

    #[test]
    fn test_delete_needs_ids() {
        assert!(args("delete --yes").is_err());
        let parsed = args("delete -y a b").unwrap();
        assert_eq!(
            parsed.command,
            Command::Delete {
                ids: vec!["a".into(), "b".into()],
                yes: true
            }
        );
    }

    #[test]
    fn test_unknown_input_is_rejected() {
        assert!(args("").is_err());
        assert!(args("upload cat.png").is_err());
        assert!(args("list --verbose").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
