pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

use crate::commands::CliResult;

/// Resolve a command's input: `--input` file first, then piped stdin, then
/// the individual flags.
pub fn load<T, F>(path: Option<&str>, from_flags: F) -> CliResult<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> CliResult<T>,
{
    if let Some(path) = path {
        return file::read_json(path);
    }
    if let Some(parsed) = stdin::read_stdin()? {
        log::info!("read input from stdin");
        return Ok(parsed);
    }
    from_flags()
}

/// Error for a flag that is required when no JSON input was supplied.
pub fn missing(flag: &str) -> String {
    format!("--{flag} is required (or provide --input)")
}
