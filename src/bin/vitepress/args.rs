use std::io::Write as _;
use std::path;

use anyhow::Context as _;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct ConfigArgs {
    /// Site root [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub(crate) root: Option<path::PathBuf>,

    /// Install directory holding the client and default theme [default: next to this program]
    #[arg(long, value_name = "DIR")]
    pub(crate) app_root: Option<path::PathBuf>,
}

impl ConfigArgs {
    pub(crate) fn root(&self) -> Result<path::PathBuf> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let root = dunce::canonicalize(&root)
            .with_context(|| format!("Site root {} not found", root.display()))?;
        log::debug!("Using site root {}", root.display());
        Ok(root)
    }

    pub(crate) fn app_paths(&self) -> Result<vitepress::AppPaths> {
        let app_root = match &self.app_root {
            Some(app_root) => path::absolute(app_root)
                .with_context(|| format!("Invalid install directory {}", app_root.display()))?,
            None => {
                let exe = std::env::current_exe().context("Failed to locate this program")?;
                let exe = dunce::canonicalize(&exe).unwrap_or(exe);
                exe.parent()
                    .map(path::Path::to_path_buf)
                    .context("Failed to locate install directory")?
            }
        };
        log::trace!("Using install directory {}", app_root.display());
        Ok(vitepress::AppPaths::new(app_root))
    }

    pub(crate) fn resolver(&self) -> Result<vitepress::Resolver> {
        Ok(vitepress::Resolver::new(self.app_paths()?))
    }
}

pub(crate) fn init_logging(
    level: &clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
    colored: bool,
) {
    let Some(level) = level.log_level() else {
        return;
    };

    let mut builder = env_logger::Builder::new();
    builder.write_style(if colored {
        env_logger::WriteStyle::Always
    } else {
        env_logger::WriteStyle::Never
    });
    builder.filter(None, level.to_level_filter());

    if level == log::Level::Trace {
        builder.format_timestamp_secs();
    } else {
        builder.format(|f, record| {
            let style = level_style(record.level());
            let level = record.level().as_str().to_lowercase();
            writeln!(f, "{style}{level}{style:#}: {}", record.args())
        });
    }

    builder.init();
}

fn level_style(level: log::Level) -> anstyle::Style {
    let color = match level {
        log::Level::Error => anstyle::AnsiColor::Red,
        log::Level::Warn => anstyle::AnsiColor::Yellow,
        log::Level::Info => anstyle::AnsiColor::Green,
        log::Level::Debug => anstyle::AnsiColor::Blue,
        log::Level::Trace => anstyle::AnsiColor::Cyan,
    };
    anstyle::Style::new().fg_color(Some(color.into())).bold()
}
