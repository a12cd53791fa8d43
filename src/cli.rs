use std::path::PathBuf;

use clap::Parser;
use devpal_action::Inputs;

/// Action inputs; the runner passes `with:` values as `INPUT_*` variables
#[derive(Parser, Debug)]
#[command(name = "devpal-action")]
#[command(version, about = "Download the micromap scanner and scan the workspace")]
pub struct Args {
    /// API token for the release repository
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Release to use: `latest`, `tags/<tag>` or a numeric release id
    #[arg(long = "version-spec", env = "INPUT_VERSION")]
    pub version_spec: Option<String>,

    /// Destination the scanner reports to
    #[arg(long, env = "INPUT_HOST")]
    pub host: Option<String>,

    /// Checked-out repository to scan
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<String>,

    /// GitHub API base URL (GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// File the runner collects step outputs from
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<String>,

    /// TOML settings file (release source, retry policy, timeouts)
    #[arg(long, short = 'c', env = "DEVPAL_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn into_inputs(self) -> Inputs {
        Inputs {
            token: self.token,
            version: self.version_spec,
            host: self.host,
            workspace: self.workspace.map(PathBuf::from),
            api_url: self.api_url,
            output_file: self.output_file.map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_inputs() {
        let args = Args::try_parse_from([
            "devpal-action",
            "--token",
            "abc",
            "--version-spec",
            "tags/v2.0",
            "--host",
            "scan.example.com",
            "--workspace",
            "/work",
        ])
        .unwrap();

        let inputs = args.into_inputs();
        assert_eq!(inputs.token.as_deref(), Some("abc"));
        assert_eq!(inputs.version.as_deref(), Some("tags/v2.0"));
        assert_eq!(inputs.host.as_deref(), Some("scan.example.com"));
        assert_eq!(inputs.workspace, Some(PathBuf::from("/work")));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
