use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tps_core::text;

/// Optional key=value file read from the working directory.
pub const CONFIG_FILE: &str = "app.config";

// Loads a configuration value from `app.config` for a given key.
pub fn load_config_value(key_to_find: &str) -> Option<String> {
    let config_path = Path::new(CONFIG_FILE);
    if !config_path.exists() {
        return None;
    }

    let file = File::open(config_path).ok()?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.ok()?;
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == key_to_find {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Settings resolved from the command line, then `app.config`, then defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub fit_height: f64,
    pub jobs: usize,
}

impl RunConfig {
    pub fn resolve(cli_fit_height: Option<f64>, cli_jobs: Option<usize>, canvas_height: u32) -> Self {
        let fit_height = cli_fit_height
            .or_else(|| parse_config_value::<f64>("fit_height"))
            .filter(|h| h.is_finite())
            .unwrap_or(canvas_height as f64);

        let num_procs = num_cpus::get();
        let jobs = match cli_jobs.or_else(|| parse_config_value::<usize>("jobs")) {
            Some(max_jobs) if max_jobs > 0 => max_jobs.min(num_procs),
            Some(_) => {
                println!(
                    "{}: 'jobs' value must be greater than 0. Using the number of processors.\n",
                    text::warning("Warning")
                );
                num_procs
            }
            None => num_procs,
        };

        RunConfig { fit_height, jobs }
    }
}

fn parse_config_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = load_config_value(key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            println!(
                "{}: '{}' value '{}' in {} is not valid. Ignoring it.\n",
                text::warning("Warning"),
                key,
                raw,
                CONFIG_FILE
            );
            None
        }
    }
}
