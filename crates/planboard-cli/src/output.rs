//! JSON envelopes written by every CLI command.

use serde::Serialize;
use std::io::Write;

const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            api_version: API_VERSION,
            data: Some(data),
            error: None,
        }
    }

    fn write_line(&self, out: &mut impl Write) -> anyhow::Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

impl Envelope<()> {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            api_version: API_VERSION,
            data: None,
            error: Some(message.to_owned()),
        }
    }
}

#[derive(Serialize)]
struct Listing<T: Serialize> {
    count: usize,
    items: Vec<T>,
}

impl<T: Serialize> From<Vec<T>> for Listing<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

pub fn output_success<T: Serialize>(data: T) -> anyhow::Result<()> {
    Envelope::ok(data).write_line(&mut std::io::stdout().lock())
}

pub fn output_list<T: Serialize>(items: Vec<T>) -> anyhow::Result<()> {
    output_success(Listing::from(items))
}

/// Report `message` on stderr and exit with code 1.
pub fn output_error(message: &str) -> ! {
    let mut stderr = std::io::stderr().lock();
    if Envelope::failure(message).write_line(&mut stderr).is_err() {
        let _ = writeln!(stderr, "{}", message);
    }
    std::process::exit(1);
}
