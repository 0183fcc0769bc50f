pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid configuration: {message}")]
	Config { message: String },
	#[error("Search engine error: {message}")]
	Engine { message: String },
	#[error("Invalid search engine response: {message}")]
	InvalidResponse { message: String },
}
impl From<planfeed_engine::Error> for Error {
	fn from(err: planfeed_engine::Error) -> Self {
		match err {
			planfeed_engine::Error::InvalidResponse { message } => Self::InvalidResponse { message },
			other => Self::Engine { message: other.to_string() },
		}
	}
}
