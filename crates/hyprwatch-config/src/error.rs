use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to parse KDL")]
    #[diagnostic(code(hyprwatch::config::parse_error))]
    ParseError {
        #[source_code]
        src: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source]
        source: kdl::KdlError,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(hyprwatch::config::invalid))]
    Invalid { message: String },

    #[error("Unknown entity: {name}")]
    #[diagnostic(
        code(hyprwatch::config::unknown_entity),
        help("expected one of: workspace, window, monitor, all")
    )]
    UnknownEntity { name: String },

    #[error("Unknown event: {name}")]
    #[diagnostic(
        code(hyprwatch::config::unknown_event),
        help("run `hyprwatch events` to list supported events")
    )]
    UnknownEvent { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
