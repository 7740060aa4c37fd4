use optgate_derive::optgate_error;
use std::borrow::Cow;

#[optgate_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unknown flag '{name}'{}", format_context(.context))]
    UnknownFlag { name: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("missing").context("reading source")
}

fn fail() -> Result<(), DemoError> {
    Err("boom".into())
}

fn main() {
    let _ = read();
    let _ = fail().context("demo");
    let err = DemoError::UnknownFlag { name: "X".to_owned(), context: None };
    let _ = err.to_string();
}
