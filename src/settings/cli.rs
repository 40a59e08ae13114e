use super::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "pc-club account and session API")]
pub struct Cli {
    /// Path to a TOML settings file; defaults to settings/dev.toml or settings/release.toml.
    #[arg(long)]
    pub settings: Option<String>,
}
