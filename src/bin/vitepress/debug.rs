use futures::executor::block_on;

use crate::args;
use crate::error::Result;

/// Print site debug information
#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
pub(crate) enum DebugCommands {
    /// Prints the fully resolved site config
    Config {
        #[command(flatten, next_help_heading = "Config")]
        config: args::ConfigArgs,
    },

    /// Prints the user config, with `extends` applied
    UserConfig {
        #[command(flatten, next_help_heading = "Config")]
        config: args::ConfigArgs,
    },

    /// Prints the site data shared with pages
    SiteData {
        /// Apply the locale matching this route
        #[arg(long, value_name = "ROUTE")]
        route: Option<String>,

        #[arg(long, value_enum, default_value_t)]
        format: Format,

        #[command(flatten, next_help_heading = "Config")]
        config: args::ConfigArgs,
    },

    /// Lists the site's pages
    Pages {
        #[command(flatten, next_help_heading = "Config")]
        config: args::ConfigArgs,
    },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Format {
    #[default]
    Yaml,
    Json,
}

impl DebugCommands {
    pub(crate) fn run(&self) -> Result<()> {
        match self {
            Self::Config { config } => {
                let root = config.root()?;
                let site = block_on(config.resolver()?.resolve_config(&root))?;
                println!("{site}");
            }
            Self::UserConfig { config } => {
                let root = config.root()?;
                let user_config = block_on(config.resolver()?.load_user_config(&root))?;
                println!("{user_config}");
            }
            Self::SiteData {
                route,
                format,
                config,
            } => {
                let root = config.root()?;
                let mut data = block_on(config.resolver()?.resolve_site_data(&root, None))?;
                if let Some(route) = route {
                    data = data.for_route(route);
                }
                match format {
                    Format::Yaml => println!("{data}"),
                    Format::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                }
            }
            Self::Pages { config } => {
                let root = config.root()?;
                let site = block_on(config.resolver()?.resolve_config(&root))?;
                for page in &site.pages {
                    println!("{page}");
                }
            }
        }

        Ok(())
    }
}
