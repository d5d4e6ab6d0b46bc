use std::env::args;
use std::io::{stdin, stdout};
use std::path::PathBuf;

use anyhow::Result;

use deckscript::interpreter::global_env;
use deckscript::repl::repl;
use deckscript::scripts::{load_script_dir, run_script_file};

fn main() -> Result<()> {
    let args = args();
    if args.len() > 2 {
        eprintln!("Usage: deckscript [script.scm]");
        std::process::exit(64);
    }

    let env = global_env();
    if let Some(libdir) = std::env::var_os("DECKSCRIPT_LIBDIR") {
        load_script_dir(&PathBuf::from(libdir), &env)?;
    }

    if args.len() == 2 {
        // Arg count is checked above
        let script_path = args.skip(1).next().unwrap();
        let result = run_script_file(&PathBuf::from(script_path), &env)?;
        println!("{}", result);
    } else {
        repl(stdin().lock(), stdout().lock(), &env)?;
    }
    Ok(())
}
