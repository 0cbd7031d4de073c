pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Missing required capability: {capability}.")]
	MissingCapability { capability: &'static str },
	#[error("Missing local identity.")]
	MissingLocalId,
	#[error("Profile index is not loaded.")]
	ProfileIndexAbsent,
	#[error("No async runtime available: {message}")]
	Runtime { message: String },
	#[error("Index {index} failed to drain: {message}")]
	IndexDrain { index: String, message: String },
	#[error("Suggestion service stopped.")]
	Stopped,
	#[error(transparent)]
	Config(#[from] suggest_config::Error),
}
