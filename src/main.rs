mod batch;
mod cli;
mod config;
mod error;
mod meta;
mod musicbrainz;
mod quality;
mod rename;
mod runtime;
mod tags;
mod template;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
