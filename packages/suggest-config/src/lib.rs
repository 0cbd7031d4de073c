mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	CacheRetention, Config, DEFAULT_REFRESH_INTERVAL_MS, Friends, RankingMode, Service, Suggest,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.suggest.refresh_interval_ms == 0 {
		return Err(Error::Validation {
			message: "suggest.refresh_interval_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.friends.hops < 0 {
		return Err(Error::Validation {
			message: "friends.hops must be zero or greater.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.service.log_level.trim();

	if trimmed.is_empty() {
		cfg.service.log_level = types::default_log_level();
	} else if trimmed.len() != cfg.service.log_level.len() {
		cfg.service.log_level = trimmed.to_string();
	}
}
