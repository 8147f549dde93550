mod opt_accumulate;
mod opt_common;
mod opt_npfcands;
mod opt_plot;
mod opt_ptcheck;
mod opt_ratio;
mod opt_selection_test;

use std::{
    env::var_os,
    fs::{create_dir_all, File},
    io::{stdout, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{Command, CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, shells::*, Generator};
use dirs::home_dir;
use strum::Display;

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq, Hash, ValueEnum)]
#[strum(serialize_all = "lowercase")]
enum Shell {
    Bash,
    Elvish,
    Fish,
    #[allow(clippy::enum_variant_names)]
    PowerShell,
    Zsh,
}

/// Generate shell completions for all jetimages programs
#[derive(Debug, Parser)]
#[clap(about, author, version)]
struct ShellSelect {
    /// Shell for which to generate completions
    #[clap(value_enum)]
    shell: Shell,
}

fn commands() -> [(Command, &'static str); 6] {
    [
        (opt_plot::Opt::command(), "jetimages-plot"),
        (opt_accumulate::Opt::command(), "jetimages-accumulate"),
        (opt_ratio::Opt::command(), "jetimages-ratio"),
        (opt_npfcands::Opt::command(), "jetimages-npfcands"),
        (opt_selection_test::Opt::command(), "jetimages-selection-test"),
        (opt_ptcheck::Opt::command(), "jetimages-ptcheck"),
    ]
}

fn gen_completion<S: Copy + Generator, W: Write>(shell: S, mut to: W) {
    for (mut cmd, name) in commands() {
        generate(shell, &mut cmd, name, &mut to);
    }
}

fn main() -> Result<()> {
    let shell = ShellSelect::parse().shell;
    eprintln!("Generating {shell} completions");
    match shell {
        Shell::Bash => gen_completion(Bash, gen_bash_outfile()?),
        Shell::Elvish => gen_completion(Elvish, &mut stdout()),
        Shell::Fish => gen_completion(Fish, gen_fish_outfile()?),
        Shell::PowerShell => gen_completion(PowerShell, &mut stdout()),
        Shell::Zsh => gen_completion(Zsh, &mut stdout()),
    }
    Ok(())
}

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = var_os("XDG_DATA_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let mut dir = home_dir().ok_or_else(|| anyhow!("No home directory found"))?;
    dir.push(".local");
    dir.push("share");
    Ok(dir)
}

fn gen_bash_outfile() -> Result<File> {
    let mut outfile = match var_os("BASH_COMPLETION_USER_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => data_dir()?.join("bash-completion"),
    };
    outfile.push("completions");
    outfile.push("jetimages.bash");
    create_file(outfile)
}

fn gen_fish_outfile() -> Result<File> {
    let mut outfile = data_dir()?;
    for part in ["fish", "vendor_completions.d", "jetimages.fish"] {
        outfile.push(part);
    }
    create_file(outfile)
}

fn create_file<P: AsRef<Path>>(name: P) -> Result<File> {
    let name = name.as_ref();
    if let Some(dir) = name.parent() {
        create_dir_all(dir)
            .with_context(|| format!("Failed to create {dir:?}"))?;
    }
    eprintln!("Writing to {name:?}");
    File::create(name).with_context(|| format!("Failed to create {name:?}"))
}
