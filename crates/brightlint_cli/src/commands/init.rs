//! Init command implementation

use std::path::{Path, PathBuf};

use brightlint_core::{CONFIG_FILES, LinterConfig};
use miette::{IntoDiagnostic, Result};
use tracing::info;

pub fn run_init(path: Option<&Path>, force: bool) -> Result<()> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILES[0]));

    let mut content = LinterConfig::recommended().to_json_pretty().into_diagnostic()?;
    content.push('\n');

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOFOLLOW);
        }

        match options.open(&config_path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(content.as_bytes()).into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
