pub mod base_url {
    use reqwest::Url;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    /// A base URL that is guaranteed to end with `/`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        normalize(&value).map_err(D::Error::custom)
    }

    pub fn normalize(value: &str) -> Result<String, String> {
        let value = value.trim();
        if value.is_empty() {
            return Err("remote url must not be empty".to_owned());
        }
        let mut url = Url::parse(value).map_err(|e| format!("'{}' must be an URL: {}", value, e))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url.to_string())
    }
}

pub mod duration {
    use crate::time::timeunit::DurationUnit;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use std::convert::TryFrom;
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Text(String),
    }

    /// Whole seconds, or a duration unit string such as `20m`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDuration::deserialize(deserializer)? {
            RawDuration::Seconds(seconds) => Ok(Duration::from_secs(seconds)),
            RawDuration::Text(text) => text
                .parse::<DurationUnit>()
                .and_then(Duration::try_from)
                .map_err(|err| D::Error::custom(err.to_string())),
        }
    }
}
