use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

const BIN: &str = "bootnet";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or("OUT_DIR not set by Cargo")?);

    write_man_pages(&out_dir.join("man"))?;
    write_completions(&out_dir.join("completions"))?;
    Ok(())
}

/// One page per visible command, `bootnet.1`, `bootnet-config-init.1` and so on.
fn write_man_pages(dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;

    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let page_name = cmd.get_name().to_owned();
        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{page_name}-{}", sub.get_name()))),
        );

        let mut page = Vec::new();
        clap_mangen::Man::new(cmd)
            .render(&mut page)
            .map_err(|e| format!("rendering man page for `{page_name}`: {e}"))?;
        fs::write(dir.join(format!("{page_name}.1")), page)?;
    }
    Ok(())
}

fn write_completions(dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;

    let mut cmd = cli::Cli::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        clap_complete::generate_to(shell, &mut cmd, BIN, dir)?;
    }
    Ok(())
}
