use std::fs::{read_dir, read_to_string};
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::interpreter::Environment;
use crate::run_source;

/// Runs one script file against `env` and returns the rendered result of
/// its final form. I/O and interpreter failures both carry the path.
pub fn run_script_file(path: &Path, env: &Rc<Environment>) -> Result<String> {
    let source = read_to_string(path)
        .with_context(|| format!("unable to read script file {}", path.display()))?;
    run_source(&source, env).with_context(|| format!("script {} failed", path.display()))
}

/// Evaluates every `*.scm` file in `dir`, sorted by name, into `env`.
/// This is the per-project script directory of the surrounding shell:
/// results are discarded, only the definitions matter.
pub fn load_script_dir(dir: &Path, env: &Rc<Environment>) -> Result<()> {
    let entries = read_dir(dir)
        .with_context(|| format!("unable to read script directory {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("unable to read script directory {}", dir.display()))?
            .path();
        if path.extension().map_or(false, |ext| ext == "scm") {
            paths.push(path);
        }
    }
    paths.sort();
    for path in paths {
        run_script_file(&path, env)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::interpreter::global_env;

    #[test]
    fn runs_a_script_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("double.scm");
        fs::write(&path, "(define double (lambda (n) (* n 2))) (double 21)").unwrap();
        let env = global_env();
        assert_eq!(run_script_file(&path, &env).unwrap(), "42");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let env = global_env();
        let err = run_script_file(Path::new("no/such/script.scm"), &env).unwrap_err();
        assert!(err.to_string().contains("no/such/script.scm"));
    }

    #[test]
    fn script_error_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.scm");
        fs::write(&path, "(ghost)").unwrap();
        let env = global_env();
        let err = run_script_file(&path, &env).unwrap_err();
        assert!(err.to_string().contains("broken.scm"));
        assert!(format!("{:#}", err).contains("undefined symbol: ghost"));
    }

    #[test]
    fn loads_scm_files_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.scm"), "(define base 40)").unwrap();
        fs::write(dir.path().join("b.scm"), "(define shifted (+ base 2))").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a script").unwrap();
        let env = global_env();
        load_script_dir(dir.path(), &env).unwrap();
        assert_eq!(crate::run_source("shifted", &env).unwrap(), "42");
    }
}
