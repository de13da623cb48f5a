//! `mason init` — project scaffolding.

use std::path::Path;

use crate::GlobalArgs;

/// Runs the `mason init` command.
///
/// With a name, creates that subdirectory and scaffolds a project inside it;
/// without one, scaffolds the current directory using its name.
pub fn run(name: Option<&str>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let (dir, project_name) = match name {
        Some(name) => (cwd.join(name), name.to_string()),
        None => {
            let project_name = cwd
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or("cannot infer a project name from the current directory")?;
            (cwd, project_name)
        }
    };

    scaffold(&dir, &project_name)?;

    if !global.quiet {
        eprintln!("   Created {} at {}", project_name, dir.display());
    }
    Ok(0)
}

/// Writes the starter project files into `dir`.
///
/// Refuses to overwrite an existing `mason.toml`.
pub fn scaffold(dir: &Path, project_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = dir.join("mason.toml");
    if manifest.exists() {
        return Err(format!("{} already exists", manifest.display()).into());
    }

    std::fs::create_dir_all(dir.join("src"))?;
    std::fs::write(&manifest, manifest_template(project_name))?;
    std::fs::write(dir.join("src").join("main.c"), MAIN_TEMPLATE)?;
    std::fs::write(dir.join(".gitignore"), GITIGNORE_TEMPLATE)?;
    Ok(())
}

fn manifest_template(project_name: &str) -> String {
    format!(
        r#"[project]
name = "{project_name}"
version = "0.1.0"

[toolchain]
cc = "cc"
cflags = ["-Wall", "-Wextra"]
"#
    )
}

const MAIN_TEMPLATE: &str = r#"#include <stdio.h>

int main(void) {
    printf("hello from mason\n");
    return 0;
}
"#;

const GITIGNORE_TEMPLATE: &str = "/build/\n/.mason/\n";
