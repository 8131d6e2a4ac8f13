use clap::Subcommand;
use duct::cmd;

#[derive(Subcommand)]
pub enum Fuzz {
    /// Fuzz the whole compile of a configuration file
    Menu,

    /// Fuzz the colour value parser
    Color,
}

pub fn fuzz_compiler(command: Fuzz) -> anyhow::Result<()> {
    let mut args = vec!["fuzz", "run"];
    match command {
        Fuzz::Menu => args.push("menu"),
        Fuzz::Color => args.push("color"),
    }

    cmd!("cargo", "install", "cargo-fuzz").run()?; // will not install if its already installed
    cmd("cargo", args).run()?;
    Ok(())
}
