//! Action outputs and workflow-command formatting

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use log::info;

use crate::release::Release;

/// Appends named outputs to the runner's `GITHUB_OUTPUT` file
///
/// Without a file (local runs) outputs are only logged.
#[derive(Debug, Clone, Default)]
pub struct OutputWriter {
    file: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn set_output(&self, name: &str, value: &str) -> io::Result<()> {
        let Some(path) = &self.file else {
            info!("output {name}={value}");
            return Ok(());
        };

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        let entry = format_output(name, value, &delimiter)?;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.as_bytes())
    }

    /// Expose `tag_name`, `name` and `body` of the resolved release
    pub fn publish_release(&self, release: &Release) -> io::Result<()> {
        self.set_output("tag_name", &release.tag_name)?;
        self.set_output("name", release.display_name())?;
        self.set_output("body", release.body.as_deref().unwrap_or_default())
    }
}

/// `name<<DELIM\nvalue\nDELIM\n`, the multi-line safe output format
fn format_output(name: &str, value: &str, delimiter: &str) -> io::Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output `{name}` collides with its delimiter"),
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Escape a message for use inside a `::command::message` line
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
