use std::path::Path;

use crate::Config;

pub(crate) fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let config = toml::from_str(&content)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;

    use crate::{Config, Error};

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();

        let content = indoc! {r#"
            [poll]
            interval = "1s"
        "#};

        file.write_all(content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.poll.interval, std::time::Duration::from_secs(1));

        // Untouched sections keep their defaults.
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = Config::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(Error::ConfigOpen(_))));
    }
}
