use crate::time::error::Error;
use core::str::FromStr;
use std::convert::TryFrom;
use lazy_static::*;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    static ref DURATION_REGEX: Regex = Regex::new(
        r"^(?P<value>\d+)\s*(?P<unit>ns|us|ms|s|m|h|d|[a-z]+)?$"
    )
    .expect("Regex compilation error");
}

/// A configured amount of time such as `1200s` or `20m`. A bare number is seconds.
#[derive(Debug, PartialEq)]
pub struct DurationUnit {
    value: u64,
    unit: TimeUnit,
}

#[derive(Debug, PartialEq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DURATION_REGEX.captures(s.trim()).ok_or_else(|| {
            Error::Syntax(format!("'{}' is not a correct duration unit value", s))
        })?;
        let value = caps["value"]
            .parse()
            .map_err(|_| Error::Syntax(format!("'{}' is out of range", &caps["value"])))?;
        let unit = match caps.name("unit") {
            Some(unit) => unit.as_str().parse::<TimeUnit>()?,
            None => TimeUnit::Second,
        };
        Ok(Self { value, unit })
    }
}

impl TryFrom<DurationUnit> for Duration {
    type Error = Error;

    fn try_from(unit: DurationUnit) -> Result<Duration, Self::Error> {
        let seconds = |factor: u64| {
            unit.value
                .checked_mul(factor)
                .map(Duration::from_secs)
                .ok_or_else(|| Error::Syntax(format!("'{}{}' is out of range", unit.value, unit.unit.symbol())))
        };
        match unit.unit {
            TimeUnit::Millisecond => Ok(Duration::from_millis(unit.value)),
            TimeUnit::Second => Ok(Duration::from_secs(unit.value)),
            TimeUnit::Minute => seconds(60),
            TimeUnit::Hour => seconds(60 * 60),
        }
    }
}

impl TimeUnit {
    fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Millisecond => "ms",
            TimeUnit::Second => "s",
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millisecond" | "millis" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "second" | "secs" | "seconds" => Ok(TimeUnit::Second),
            "m" | "minute" | "mins" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            _ => Err(Error::UnitNotSupported(format!(
                "Unit '{}' not supported",
                s
            ))),
        }
    }
}
