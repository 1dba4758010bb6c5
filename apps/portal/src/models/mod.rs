pub mod admin;
pub mod biodata;
pub mod user;

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Text(String),
    Number(serde_json::Number),
}

/// Accepts `null`, a native JSON value, or a string or number holding one.
/// The backend returns DECIMAL columns as strings, leaves unset columns `null`,
/// and may send digit-only text (KTP numbers, phones) or 0/1 flags as numbers.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr + Default,
    T::Err: Display,
{
    match Option::<Lenient<T>>::deserialize(deserializer)? {
        None => Ok(T::default()),
        Some(Lenient::Value(v)) => Ok(v),
        Some(Lenient::Text(s)) if s.trim().is_empty() => Ok(T::default()),
        Some(Lenient::Text(s)) => parse_text(s.trim()).map_err(serde::de::Error::custom),
        Some(Lenient::Number(n)) => parse_text(&n.to_string()).map_err(serde::de::Error::custom),
    }
}

fn parse_text<T>(s: &str) -> Result<T, T::Err>
where
    T: FromStr,
{
    s.parse().or_else(|err| match s.parse::<f64>() {
        // "5000.00" into an integer field
        Ok(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", f as i64)
            .parse()
            // 0/1 into a flag
            .or_else(|_| (f != 0.0).to_string().parse())
            .map_err(|_| err),
        _ => Err(err),
    })
}
