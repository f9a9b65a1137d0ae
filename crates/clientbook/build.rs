use std::path::{Path, PathBuf};

use clap::CommandFactory;

// The build script only calls `Cli::command()`; the parsed fields are
// never read here.
#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        panic!("OUT_DIR not set by Cargo");
    };
    let man_dir = PathBuf::from(out_dir).join("man");

    if let Err(e) = write_man_pages(&man_dir) {
        panic!("man page generation failed: {e}");
    }
}

/// One page per visible command: `clientbook.1`, `clientbook-clients.1`,
/// `clientbook-clients-list.1`, and so on.
fn write_man_pages(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let page = cmd.get_name().to_owned();

        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{page}-{}", sub.get_name()))),
        );

        let mut buf = Vec::new();
        clap_mangen::Man::new(cmd).render(&mut buf)?;
        std::fs::write(dir.join(format!("{page}.1")), buf)?;
    }
    Ok(())
}
